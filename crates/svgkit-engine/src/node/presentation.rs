//! Presentation attributes carried by every element.

use crate::canvas::DEFAULT_MITER_LIMIT;
use crate::geometry::Transform;
use crate::values::{
    atof, parse_color, parse_dash_array, parse_transform, FillRule, Length, LineCap, LineJoin,
    Paint, SvgColor,
};

/// The attributes a container hands down to its children.
///
/// `None` means "not specified here".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Inheritable {
    pub fill: Option<Paint>,
    pub stroke: Option<Paint>,
    pub clip_path: Option<Paint>,
    pub stroke_width: Option<Length>,
    pub opacity: Option<f32>,
    pub fill_opacity: Option<f32>,
    pub stroke_opacity: Option<f32>,
    pub color: Option<SvgColor>,
}

/// All presentation attributes of one element as written.
#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub inheritable: Inheritable,
    pub transform: Transform,
    pub fill_rule: FillRule,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub dash_array: Vec<f32>,
    pub dash_offset: f32,
    /// `mask="url(#id)"`.
    pub mask: Option<Paint>,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            inheritable: Inheritable::default(),
            transform: Transform::identity(),
            fill_rule: FillRule::NonZero,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
            dash_array: Vec::new(),
            dash_offset: 0.0,
            mask: None,
        }
    }
}

impl Presentation {
    /// Apply a presentation attribute. Returns `false` if `name` is not one.
    ///
    /// Unrecognized keyword values leave the previous value in place.
    pub fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        let own = &mut self.inheritable;
        match name {
            "fill" => own.fill = Some(Paint::parse(value)),
            "stroke" => own.stroke = Some(Paint::parse(value)),
            "clip-path" => own.clip_path = Some(Paint::parse(value)),
            "stroke-width" => own.stroke_width = Some(Length::parse(value)),
            "opacity" => own.opacity = Some(atof(value)),
            "fill-opacity" => own.fill_opacity = Some(atof(value)),
            "stroke-opacity" => own.stroke_opacity = Some(atof(value)),
            // `color: currentColor` is the same as not setting it.
            "color" => {
                own.color = match parse_color(value) {
                    SvgColor::Current => None,
                    color => Some(color),
                }
            }
            "transform" => self.transform = parse_transform(value),
            "fill-rule" => {
                if let Some(rule) = FillRule::parse(value) {
                    self.fill_rule = rule;
                }
            }
            "stroke-linecap" => {
                if let Some(cap) = LineCap::parse(value) {
                    self.line_cap = cap;
                }
            }
            "stroke-linejoin" => {
                if let Some(join) = LineJoin::parse(value) {
                    self.line_join = join;
                }
            }
            "stroke-miterlimit" => self.miter_limit = atof(value),
            "stroke-dasharray" => self.dash_array = parse_dash_array(value),
            "stroke-dashoffset" => self.dash_offset = atof(value),
            "mask" => self.mask = Some(Paint::parse(value)),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::{Color, LengthUnit};

    #[test]
    fn test_inheritable_attributes() {
        let mut p = Presentation::default();
        assert!(p.parse_attribute("fill", "red"));
        assert!(p.parse_attribute("stroke-width", "2px"));
        assert!(p.parse_attribute("opacity", "0.5"));
        assert!(p.parse_attribute("clip-path", "url(#c)"));

        let own = &p.inheritable;
        assert_eq!(own.fill, Some(Paint::Color(SvgColor::Value(Color::rgb(255, 0, 0)))));
        assert_eq!(own.stroke_width, Some(Length::new(2.0, LengthUnit::Px)));
        assert_eq!(own.opacity, Some(0.5));
        assert_eq!(own.clip_path, Some(Paint::Reference("c".into())));
    }

    #[test]
    fn test_current_color_for_color_is_unset() {
        let mut p = Presentation::default();
        p.parse_attribute("color", "currentColor");
        assert_eq!(p.inheritable.color, None);
        p.parse_attribute("color", "green");
        assert_eq!(p.inheritable.color, Some(SvgColor::Value(Color::rgb(0, 128, 0))));
    }

    #[test]
    fn test_stroke_keywords() {
        let mut p = Presentation::default();
        p.parse_attribute("stroke-linecap", "round");
        p.parse_attribute("stroke-linejoin", "bevel");
        p.parse_attribute("stroke-linejoin", "bogus");
        p.parse_attribute("fill-rule", "evenodd");
        p.parse_attribute("stroke-dasharray", "4 2");
        p.parse_attribute("stroke-dashoffset", "1.5");
        assert_eq!(p.line_cap, LineCap::Round);
        assert_eq!(p.line_join, LineJoin::Bevel);
        assert_eq!(p.fill_rule, FillRule::EvenOdd);
        assert_eq!(p.dash_array, vec![4.0, 2.0]);
        assert_eq!(p.dash_offset, 1.5);
        assert_eq!(p.miter_limit, 4.0);
    }

    #[test]
    fn test_unknown_attribute() {
        let mut p = Presentation::default();
        assert!(!p.parse_attribute("x", "10"));
        assert_eq!(p, Presentation::default());
    }
}
