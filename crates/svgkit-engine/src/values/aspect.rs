//! `viewBox` and `preserveAspectRatio`.

use super::parse_number_list;
use crate::geometry::{Align, PreserveAspectRatio, Scale, SvgBox};

/// Four numbers `min-x min-y width height`. `None` when fewer are given or
/// the size is negative.
pub fn parse_view_box(s: &str) -> Option<SvgBox> {
    let values = parse_number_list(s);
    if values.len() < 4 {
        return None;
    }
    let view_box = SvgBox::new(values[0], values[1], values[2], values[3]);
    if view_box.width < 0.0 || view_box.height < 0.0 {
        return None;
    }
    Some(view_box)
}

/// Keyword search over the attribute: `none`, `x{Min,Mid,Max}`,
/// `Y{Min,Mid,Max}`, `slice`. Anything missing keeps its default.
pub fn parse_preserve_aspect_ratio(s: &str) -> PreserveAspectRatio {
    let mut aspect = PreserveAspectRatio::default();

    if s.contains("none") {
        aspect.scale = Scale::None;
        return aspect;
    }

    if s.contains("xMin") {
        aspect.align_x = Align::Min;
    } else if s.contains("xMax") {
        aspect.align_x = Align::Max;
    }

    if s.contains("YMin") {
        aspect.align_y = Align::Min;
    } else if s.contains("YMax") {
        aspect.align_y = Align::Max;
    }

    if s.contains("slice") {
        aspect.scale = Scale::Slice;
    }

    aspect
}
