//! # SVGKit Engine
//!
//! SVG document model and render traversal. Parses SVG text into a typed
//! node tree and replays it as calls on a backend [`Canvas`].
//!
//! ## Features
//!
//! - **Lenient parsing**: malformed markup is skipped, unknown elements are
//!   dropped with their subtree, unresolved references draw nothing
//! - **Strict parsing**: opt-in, reports the first problem as an error
//! - **Shapes**: rect, circle, ellipse, line, polygon, polyline, path, image
//! - **Structure**: svg, g, defs, use, clipPath, mask
//! - **Paint servers**: linearGradient, radialGradient, stop
//! - **Text**: text and tspan through a paragraph builder
//! - **Inheritance**: fill, stroke, opacity, color and friends flow down
//!   the tree and through `use`
//!
//! ## Architecture
//!
//! ```text
//! &str ──► svgkit-xml ──► XmlTree ──► builder ──► Document (node arena + id map)
//!                                                     │
//!                                                     ▼
//!                                   Renderer ──► dyn Canvas / PathFactory / ParagraphFactory
//! ```
//!
//! The engine owns no pixels. [`recording::RecordingCanvas`] is a backend
//! that logs every call, useful for tests and inspection.

mod builder;
pub mod canvas;
pub mod config;
pub mod context;
pub mod document;
pub mod geometry;
pub mod node;
pub mod recording;
pub mod render;
pub mod values;

pub use canvas::{
    Canvas, CircleShape, EllipseShape, GradientStop, LineShape, LinearGradient, PaintSource,
    Paragraph, ParagraphFactory, ParagraphStyle, Path, PathFactory, PathOp, RadialGradient,
    RectShape, RenderState, TextStyle,
};
pub use config::RenderOptions;
pub use context::RenderContext;
pub use document::Document;
pub use geometry::{Point, PreserveAspectRatio, SvgBox, Transform};
pub use node::{NodeId, NodeKind, SvgNode};
pub use recording::{DrawCall, RecordingCanvas};
pub use render::{InheritedStyle, Renderer};
pub use svgkit_common::{Result, SvgKitError};
pub use values::{Color, FillRule, Length, LengthUnit, Paint, PathCommand, SvgColor};
