//! Values that lengths resolve against during one render call.

use crate::geometry::SvgBox;

/// Resolution context for one render call.
///
/// Copied down the recursion; never stored on nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderContext {
    /// Pixels per inch for absolute units.
    pub dpi: f32,
    /// Font size in pixels for `em`/`ex`.
    pub font_size: f32,
    /// The rectangle the document is drawn into.
    pub view_port: SvgBox,
    /// The user coordinate system percentages refer to.
    pub view_box: SvgBox,
}

impl RenderContext {
    pub fn new(dpi: f32, font_size: f32, view_port: SvgBox, view_box: SvgBox) -> Self {
        Self {
            dpi,
            font_size,
            view_port,
            view_box,
        }
    }
}

impl Default for RenderContext {
    fn default() -> Self {
        Self {
            dpi: 96.0,
            font_size: 16.0,
            view_port: SvgBox::default(),
            view_box: SvgBox::default(),
        }
    }
}
