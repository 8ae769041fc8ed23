//! Backend contract.
//!
//! The engine never rasterizes anything itself. Every draw, clip and
//! gradient registration goes through [`Canvas`]; clip and mask geometry is
//! built with the canvas' [`PathFactory`]; text is handed to a
//! [`ParagraphFactory`].

use serde::{Deserialize, Serialize};
use std::any::Any;
use std::fmt::Debug;

use crate::geometry::{Point, PreserveAspectRatio, SvgBox, Transform};
use crate::values::{
    Color, FillRule, LineCap, LineJoin, PathCommand, SpreadMethod, TextAnchor, Units,
};

/// `stroke-miterlimit` when none is given.
pub const DEFAULT_MITER_LIMIT: f32 = 4.0;

// ==================== Render State ====================

/// What a fill or stroke resolved to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PaintSource {
    None,
    Color(Color),
    /// A gradient registered earlier under this id.
    Gradient(String),
}

impl PaintSource {
    pub fn is_none(&self) -> bool {
        matches!(self, PaintSource::None)
    }

    pub fn color(&self) -> Option<Color> {
        match self {
            PaintSource::Color(c) => Some(*c),
            _ => None,
        }
    }
}

/// Fully resolved paint parameters for one shape draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderState {
    pub fill: PaintSource,
    pub stroke: PaintSource,
    /// Element opacity, already folded into the two values below.
    pub opacity: f32,
    pub fill_opacity: f32,
    pub stroke_opacity: f32,
    pub stroke_width: f32,
    pub fill_rule: FillRule,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub dash_offset: f32,
    /// Empty for a solid stroke.
    pub dash_array: Vec<f32>,
}

impl Default for RenderState {
    fn default() -> Self {
        Self {
            fill: PaintSource::Color(Color::BLACK),
            stroke: PaintSource::None,
            opacity: 1.0,
            fill_opacity: 1.0,
            stroke_opacity: 1.0,
            stroke_width: 1.0,
            fill_rule: FillRule::NonZero,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Miter,
            miter_limit: DEFAULT_MITER_LIMIT,
            dash_offset: 0.0,
            dash_array: Vec::new(),
        }
    }
}

impl RenderState {
    pub fn has_fill(&self) -> bool {
        !self.fill.is_none()
    }

    pub fn has_stroke(&self) -> bool {
        !self.stroke.is_none() && self.stroke_width > 0.0
    }
}

// ==================== Shape Geometry ====================

/// Resolved rectangle; `rx`/`ry` already follow the auto and clamp rules.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RectShape {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub rx: f32,
    pub ry: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CircleShape {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EllipseShape {
    pub cx: f32,
    pub cy: f32,
    pub rx: f32,
    pub ry: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LineShape {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

// ==================== Gradients ====================

/// One resolved gradient stop.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    /// In `0..=1`.
    pub offset: f32,
    pub color: Color,
    pub opacity: f32,
}

/// A linear gradient as registered with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearGradient {
    pub id: String,
    pub transform: Transform,
    pub spread: SpreadMethod,
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
    pub stops: Vec<GradientStop>,
    pub units: Units,
}

/// A radial gradient as registered with the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RadialGradient {
    pub id: String,
    pub transform: Transform,
    pub spread: SpreadMethod,
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub fx: f32,
    pub fy: f32,
    pub stops: Vec<GradientStop>,
    pub units: Units,
}

// ==================== Paths ====================

/// Boolean path operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathOp {
    Difference,
    Intersect,
    Union,
    Xor,
    ReverseDifference,
}

/// A backend path object.
pub trait Path: Debug {
    /// Tight (or conservative) bounds in the path's own coordinates.
    fn bounds(&self) -> SvgBox;

    /// Transform the path in place.
    fn transform(&mut self, transform: &Transform);

    /// Downcast hooks for backends that need their concrete type back.
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Creates and combines backend paths.
pub trait PathFactory {
    fn create_circle(&mut self, circle: &CircleShape) -> Box<dyn Path>;
    fn create_rect(&mut self, rect: &RectShape) -> Box<dyn Path>;
    fn create_line(&mut self, line: &LineShape) -> Box<dyn Path>;
    fn create_ellipse(&mut self, ellipse: &EllipseShape) -> Box<dyn Path>;
    fn create_polygon(&mut self, points: &[Point]) -> Box<dyn Path>;
    fn create_polyline(&mut self, points: &[Point]) -> Box<dyn Path>;
    /// An empty path to accumulate into.
    fn create_mutable(&mut self) -> Box<dyn Path>;
    fn create_path(&mut self, commands: &[PathCommand]) -> Box<dyn Path>;

    /// Outline of `path` stroked with the given parameters, if the backend
    /// can compute one.
    fn create_stroke_path(
        &mut self,
        path: &dyn Path,
        width: f32,
        cap: LineCap,
        join: LineJoin,
        miter_limit: f32,
    ) -> Option<Box<dyn Path>>;

    /// Combine `other` into `target`. Returns false when the backend could
    /// not apply the operation; `target` is left unchanged then.
    fn op(&mut self, target: &mut dyn Path, other: &dyn Path, op: PathOp) -> bool;
}

// ==================== Text ====================

/// Style pushed for a run of text.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    pub color: Color,
    pub font_size: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub text_anchor: TextAnchor,
}

/// A laid-out block of text.
pub trait Paragraph {
    fn layout(&mut self, max_width: f32);
    fn draw(&self, canvas: &mut dyn Canvas, x: f32, y: f32);
}

/// Builds a [`Paragraph`] from styled runs.
pub trait ParagraphFactory {
    fn push_text_style(&mut self, style: TextStyle);
    fn pop_text_style(&mut self);
    fn add_text(&mut self, text: &str);
    fn set_paragraph_style(&mut self, style: ParagraphStyle);
    fn create_paragraph(&mut self) -> Option<Box<dyn Paragraph>>;
}

// ==================== Canvas ====================

/// Drawing surface implemented by each backend.
///
/// Calls arrive strictly nested: every `save` is matched by a `restore`
/// before the enclosing node finishes.
pub trait Canvas {
    /// The viewport the root is fitted into.
    fn set_view_box(&mut self, view_port: SvgBox);

    fn save(&mut self);
    fn restore(&mut self);
    fn translate(&mut self, dx: f32, dy: f32);
    /// Concatenate `transform` onto the current matrix.
    fn transform(&mut self, transform: &Transform);

    fn draw_rect(&mut self, id: Option<&str>, rect: &RectShape, state: &RenderState);
    fn draw_circle(&mut self, id: Option<&str>, circle: &CircleShape, state: &RenderState);
    fn draw_ellipse(&mut self, id: Option<&str>, ellipse: &EllipseShape, state: &RenderState);
    fn draw_line(&mut self, id: Option<&str>, line: &LineShape, state: &RenderState);
    fn draw_polygon(&mut self, id: Option<&str>, points: &[Point], state: &RenderState);
    fn draw_polyline(&mut self, id: Option<&str>, points: &[Point], state: &RenderState);
    fn draw_path(&mut self, id: Option<&str>, commands: &[PathCommand], state: &RenderState);

    /// Register a gradient so later draws can refer to it by id.
    fn update_linear_gradient(&mut self, gradient: &LinearGradient);
    fn update_radial_gradient(&mut self, gradient: &RadialGradient);

    fn draw_image(&mut self, href: &str, rect: SvgBox, aspect: PreserveAspectRatio);

    /// Notification that a `use` element is about to draw its target.
    fn draw_use(&mut self, _href: &str) {}

    /// Intersect the clip with `path`.
    fn clip_path(&mut self, path: &dyn Path, rule: FillRule);

    fn path_factory(&mut self) -> &mut dyn PathFactory;

    /// `None` when the backend cannot draw text; text elements are skipped.
    fn paragraph_factory(&mut self) -> Option<Box<dyn ParagraphFactory>> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_state_defaults() {
        let state = RenderState::default();
        assert_eq!(state.fill, PaintSource::Color(Color::BLACK));
        assert!(state.has_fill());
        assert!(!state.has_stroke());
        assert_eq!(state.miter_limit, 4.0);
    }

    #[test]
    fn test_stroke_needs_width() {
        let state = RenderState {
            stroke: PaintSource::Color(Color::WHITE),
            stroke_width: 0.0,
            ..Default::default()
        };
        assert!(!state.has_stroke());
    }
}
