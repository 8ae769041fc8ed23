//! # Recording Backend
//!
//! A [`Canvas`] that draws nothing and logs every call as a [`DrawCall`].
//! Paths keep their command list and bounds, so clip and mask geometry can
//! be inspected. Used by the tests, the benchmarks and `svg-dump`.

use serde::Serialize;
use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::canvas::{
    Canvas, CircleShape, EllipseShape, LineShape, LinearGradient, Paragraph, ParagraphFactory,
    ParagraphStyle, Path, PathFactory, PathOp, RadialGradient, RectShape, RenderState, TextStyle,
};
use crate::geometry::{ellipse_to_cubics, Point, PreserveAspectRatio, SvgBox, Transform};
use crate::values::path::flatten_arcs;
use crate::values::{FillRule, LineCap, LineJoin, PathCommand, TextAnchor};

// ==================== Draw Calls ====================

/// One recorded backend call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "call", rename_all = "snake_case")]
pub enum DrawCall {
    SetViewBox {
        view_port: SvgBox,
    },
    Save,
    Restore,
    Translate {
        dx: f32,
        dy: f32,
    },
    Transform {
        transform: Transform,
    },
    DrawRect {
        id: Option<String>,
        rect: RectShape,
        state: RenderState,
    },
    DrawCircle {
        id: Option<String>,
        circle: CircleShape,
        state: RenderState,
    },
    DrawEllipse {
        id: Option<String>,
        ellipse: EllipseShape,
        state: RenderState,
    },
    DrawLine {
        id: Option<String>,
        line: LineShape,
        state: RenderState,
    },
    DrawPolygon {
        id: Option<String>,
        points: Vec<Point>,
        state: RenderState,
    },
    DrawPolyline {
        id: Option<String>,
        points: Vec<Point>,
        state: RenderState,
    },
    DrawPath {
        id: Option<String>,
        commands: Vec<PathCommand>,
        state: RenderState,
    },
    UpdateLinearGradient {
        gradient: LinearGradient,
    },
    UpdateRadialGradient {
        gradient: RadialGradient,
    },
    DrawImage {
        href: String,
        rect: SvgBox,
        aspect: PreserveAspectRatio,
    },
    DrawUse {
        href: String,
    },
    ClipPath {
        bounds: SvgBox,
        commands: Vec<PathCommand>,
        rule: FillRule,
    },
    PushTextStyle {
        style: TextStyle,
    },
    PopTextStyle,
    AddText {
        text: String,
    },
    SetParagraphStyle {
        style: ParagraphStyle,
    },
    LayoutParagraph {
        max_width: f32,
    },
    DrawParagraph {
        text: String,
        anchor: TextAnchor,
        x: f32,
        y: f32,
    },
}

impl DrawCall {
    /// The call's name as it appears in JSON output.
    pub fn name(&self) -> &'static str {
        match self {
            DrawCall::SetViewBox { .. } => "set_view_box",
            DrawCall::Save => "save",
            DrawCall::Restore => "restore",
            DrawCall::Translate { .. } => "translate",
            DrawCall::Transform { .. } => "transform",
            DrawCall::DrawRect { .. } => "draw_rect",
            DrawCall::DrawCircle { .. } => "draw_circle",
            DrawCall::DrawEllipse { .. } => "draw_ellipse",
            DrawCall::DrawLine { .. } => "draw_line",
            DrawCall::DrawPolygon { .. } => "draw_polygon",
            DrawCall::DrawPolyline { .. } => "draw_polyline",
            DrawCall::DrawPath { .. } => "draw_path",
            DrawCall::UpdateLinearGradient { .. } => "update_linear_gradient",
            DrawCall::UpdateRadialGradient { .. } => "update_radial_gradient",
            DrawCall::DrawImage { .. } => "draw_image",
            DrawCall::DrawUse { .. } => "draw_use",
            DrawCall::ClipPath { .. } => "clip_path",
            DrawCall::PushTextStyle { .. } => "push_text_style",
            DrawCall::PopTextStyle => "pop_text_style",
            DrawCall::AddText { .. } => "add_text",
            DrawCall::SetParagraphStyle { .. } => "set_paragraph_style",
            DrawCall::LayoutParagraph { .. } => "layout_paragraph",
            DrawCall::DrawParagraph { .. } => "draw_paragraph",
        }
    }

    /// Render state of a shape draw.
    pub fn state(&self) -> Option<&RenderState> {
        match self {
            DrawCall::DrawRect { state, .. }
            | DrawCall::DrawCircle { state, .. }
            | DrawCall::DrawEllipse { state, .. }
            | DrawCall::DrawLine { state, .. }
            | DrawCall::DrawPolygon { state, .. }
            | DrawCall::DrawPolyline { state, .. }
            | DrawCall::DrawPath { state, .. } => Some(state),
            _ => None,
        }
    }

    pub fn is_shape(&self) -> bool {
        self.state().is_some()
    }
}

impl fmt::Display for DrawCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())?;
        match self {
            DrawCall::SetViewBox { view_port: b } | DrawCall::DrawImage { rect: b, .. } => {
                write!(f, " {} {} {} {}", b.left, b.top, b.width, b.height)
            }
            DrawCall::Translate { dx, dy } => write!(f, " {dx} {dy}"),
            DrawCall::Transform { transform } => {
                let [a, b, c, d, e, g] = transform.to_array();
                write!(f, " [{a} {b} {c} {d} {e} {g}]")
            }
            DrawCall::DrawUse { href } => write!(f, " #{href}"),
            DrawCall::UpdateLinearGradient { gradient } => write!(f, " #{}", gradient.id),
            DrawCall::UpdateRadialGradient { gradient } => write!(f, " #{}", gradient.id),
            DrawCall::ClipPath { bounds, rule, .. } => write!(
                f,
                " {} {} {} {} {:?}",
                bounds.left, bounds.top, bounds.width, bounds.height, rule
            ),
            DrawCall::AddText { text } => write!(f, " {text:?}"),
            DrawCall::DrawParagraph { text, x, y, .. } => write!(f, " {text:?} at {x} {y}"),
            _ => {
                if let Some(state) = self.state() {
                    write!(f, " fill={:?} stroke={:?}", state.fill, state.stroke)?;
                }
                Ok(())
            }
        }
    }
}

type CallLog = Rc<RefCell<Vec<DrawCall>>>;

// ==================== Paths ====================

/// A path that keeps its commands.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordingPath {
    commands: Vec<PathCommand>,
    bounds: SvgBox,
    ops: Vec<PathOp>,
}

impl RecordingPath {
    pub fn from_commands(commands: Vec<PathCommand>) -> Self {
        let bounds = command_bounds(&commands);
        Self {
            commands,
            bounds,
            ops: Vec::new(),
        }
    }

    pub fn commands(&self) -> &[PathCommand] {
        &self.commands
    }

    /// Boolean operations applied to this path, in order.
    pub fn ops(&self) -> &[PathOp] {
        &self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl Path for RecordingPath {
    fn bounds(&self) -> SvgBox {
        self.bounds
    }

    fn transform(&mut self, transform: &Transform) {
        for cmd in &mut self.commands {
            *cmd = map_command(*cmd, transform);
        }
        self.bounds = transform.map_box(&self.bounds);
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn map_command(cmd: PathCommand, t: &Transform) -> PathCommand {
    let p = |x: f32, y: f32| t.apply(Point::new(x, y));
    match cmd {
        PathCommand::MoveTo(x, y) => {
            let q = p(x, y);
            PathCommand::MoveTo(q.x, q.y)
        }
        PathCommand::LineTo(x, y) => {
            let q = p(x, y);
            PathCommand::LineTo(q.x, q.y)
        }
        PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
            let (a, b, c) = (p(x1, y1), p(x2, y2), p(x, y));
            PathCommand::CubicTo(a.x, a.y, b.x, b.y, c.x, c.y)
        }
        PathCommand::QuadTo(x1, y1, x, y) => {
            let (a, b) = (p(x1, y1), p(x, y));
            PathCommand::QuadTo(a.x, a.y, b.x, b.y)
        }
        // Only endpoints move; factories flatten arcs before this point.
        PathCommand::ArcTo {
            start_x,
            start_y,
            rx,
            ry,
            rotation,
            large_arc,
            sweep,
            x,
            y,
        } => {
            let (s, e) = (p(start_x, start_y), p(x, y));
            PathCommand::ArcTo {
                start_x: s.x,
                start_y: s.y,
                rx,
                ry,
                rotation,
                large_arc,
                sweep,
                x: e.x,
                y: e.y,
            }
        }
        PathCommand::Close => PathCommand::Close,
    }
}

/// Bounds over every end and control point.
fn command_bounds(commands: &[PathCommand]) -> SvgBox {
    let points = commands.iter().flat_map(|cmd| {
        let pts: Vec<Point> = match *cmd {
            PathCommand::MoveTo(x, y) | PathCommand::LineTo(x, y) => vec![Point::new(x, y)],
            PathCommand::CubicTo(x1, y1, x2, y2, x, y) => {
                vec![Point::new(x1, y1), Point::new(x2, y2), Point::new(x, y)]
            }
            PathCommand::QuadTo(x1, y1, x, y) => vec![Point::new(x1, y1), Point::new(x, y)],
            PathCommand::ArcTo {
                start_x, start_y, x, y, ..
            } => vec![Point::new(start_x, start_y), Point::new(x, y)],
            PathCommand::Close => Vec::new(),
        };
        pts
    });
    SvgBox::from_points(points).unwrap_or_default()
}

fn box_commands(b: &SvgBox) -> Vec<PathCommand> {
    vec![
        PathCommand::MoveTo(b.left, b.top),
        PathCommand::LineTo(b.right(), b.top),
        PathCommand::LineTo(b.right(), b.bottom()),
        PathCommand::LineTo(b.left, b.bottom()),
        PathCommand::Close,
    ]
}

/// Path factory producing [`RecordingPath`]s.
#[derive(Debug, Default)]
pub struct RecordingPathFactory;

impl RecordingPathFactory {
    fn ellipse(cx: f32, cy: f32, rx: f32, ry: f32) -> Box<dyn Path> {
        let (start, segments) = ellipse_to_cubics(cx, cy, rx, ry);
        let mut commands = vec![PathCommand::MoveTo(start.x, start.y)];
        commands.extend(segments.iter().map(|c| {
            PathCommand::CubicTo(c.ctrl1.x, c.ctrl1.y, c.ctrl2.x, c.ctrl2.y, c.to.x, c.to.y)
        }));
        commands.push(PathCommand::Close);
        Box::new(RecordingPath::from_commands(commands))
    }

    fn points(points: &[Point], close: bool) -> Box<dyn Path> {
        let mut commands: Vec<PathCommand> = points
            .iter()
            .enumerate()
            .map(|(i, p)| {
                if i == 0 {
                    PathCommand::MoveTo(p.x, p.y)
                } else {
                    PathCommand::LineTo(p.x, p.y)
                }
            })
            .collect();
        if close && !commands.is_empty() {
            commands.push(PathCommand::Close);
        }
        Box::new(RecordingPath::from_commands(commands))
    }
}

impl PathFactory for RecordingPathFactory {
    fn create_circle(&mut self, circle: &CircleShape) -> Box<dyn Path> {
        Self::ellipse(circle.cx, circle.cy, circle.r, circle.r)
    }

    fn create_rect(&mut self, rect: &RectShape) -> Box<dyn Path> {
        let b = SvgBox::new(rect.x, rect.y, rect.width, rect.height);
        if rect.rx <= 0.0 || rect.ry <= 0.0 {
            return Box::new(RecordingPath::from_commands(box_commands(&b)));
        }
        let (rx, ry) = (rect.rx, rect.ry);
        let arc = |start: (f32, f32), end: (f32, f32)| PathCommand::ArcTo {
            start_x: start.0,
            start_y: start.1,
            rx,
            ry,
            rotation: 0.0,
            large_arc: false,
            sweep: true,
            x: end.0,
            y: end.1,
        };
        let (l, t, r, btm) = (b.left, b.top, b.right(), b.bottom());
        let commands = vec![
            PathCommand::MoveTo(l + rx, t),
            PathCommand::LineTo(r - rx, t),
            arc((r - rx, t), (r, t + ry)),
            PathCommand::LineTo(r, btm - ry),
            arc((r, btm - ry), (r - rx, btm)),
            PathCommand::LineTo(l + rx, btm),
            arc((l + rx, btm), (l, btm - ry)),
            PathCommand::LineTo(l, t + ry),
            arc((l, t + ry), (l + rx, t)),
            PathCommand::Close,
        ];
        Box::new(RecordingPath::from_commands(flatten_arcs(&commands)))
    }

    fn create_line(&mut self, line: &LineShape) -> Box<dyn Path> {
        Box::new(RecordingPath::from_commands(vec![
            PathCommand::MoveTo(line.x1, line.y1),
            PathCommand::LineTo(line.x2, line.y2),
        ]))
    }

    fn create_ellipse(&mut self, ellipse: &EllipseShape) -> Box<dyn Path> {
        Self::ellipse(ellipse.cx, ellipse.cy, ellipse.rx, ellipse.ry)
    }

    fn create_polygon(&mut self, points: &[Point]) -> Box<dyn Path> {
        Self::points(points, true)
    }

    fn create_polyline(&mut self, points: &[Point]) -> Box<dyn Path> {
        Self::points(points, false)
    }

    fn create_mutable(&mut self) -> Box<dyn Path> {
        Box::new(RecordingPath::default())
    }

    fn create_path(&mut self, commands: &[PathCommand]) -> Box<dyn Path> {
        Box::new(RecordingPath::from_commands(flatten_arcs(commands)))
    }

    /// Approximates the outline by growing the bounds by half the width.
    fn create_stroke_path(
        &mut self,
        path: &dyn Path,
        width: f32,
        _cap: LineCap,
        _join: LineJoin,
        _miter_limit: f32,
    ) -> Option<Box<dyn Path>> {
        let path = path.as_any().downcast_ref::<RecordingPath>()?;
        if path.is_empty() {
            return None;
        }
        let half = width / 2.0;
        let b = path.bounds;
        let grown = SvgBox::new(b.left - half, b.top - half, b.width + width, b.height + width);
        Some(Box::new(RecordingPath::from_commands(box_commands(&grown))))
    }

    fn op(&mut self, target: &mut dyn Path, other: &dyn Path, op: PathOp) -> bool {
        let Some(other) = other.as_any().downcast_ref::<RecordingPath>() else {
            return false;
        };
        let Some(target) = target.as_any_mut().downcast_mut::<RecordingPath>() else {
            return false;
        };
        match op {
            PathOp::Union | PathOp::Xor => {
                if !other.is_empty() {
                    target.bounds = if target.is_empty() {
                        other.bounds
                    } else {
                        target.bounds.union(&other.bounds)
                    };
                }
                target.commands.extend_from_slice(&other.commands);
            }
            PathOp::Intersect => target.bounds = target.bounds.intersect(&other.bounds),
            PathOp::Difference => {}
            PathOp::ReverseDifference => {
                target.commands = other.commands.clone();
                target.bounds = other.bounds;
            }
        }
        target.ops.push(op);
        true
    }
}

// ==================== Text ====================

/// Collects runs and hands out a [`RecordingParagraph`].
#[derive(Debug)]
pub struct RecordingParagraphFactory {
    log: CallLog,
    text: String,
    anchor: TextAnchor,
}

impl RecordingParagraphFactory {
    fn new(log: CallLog) -> Self {
        Self {
            log,
            text: String::new(),
            anchor: TextAnchor::Start,
        }
    }

    fn record(&self, call: DrawCall) {
        self.log.borrow_mut().push(call);
    }
}

impl ParagraphFactory for RecordingParagraphFactory {
    fn push_text_style(&mut self, style: TextStyle) {
        self.record(DrawCall::PushTextStyle { style });
    }

    fn pop_text_style(&mut self) {
        self.record(DrawCall::PopTextStyle);
    }

    fn add_text(&mut self, text: &str) {
        self.text.push_str(text);
        self.record(DrawCall::AddText {
            text: text.to_string(),
        });
    }

    fn set_paragraph_style(&mut self, style: ParagraphStyle) {
        self.anchor = style.text_anchor;
        self.record(DrawCall::SetParagraphStyle { style });
    }

    fn create_paragraph(&mut self) -> Option<Box<dyn Paragraph>> {
        Some(Box::new(RecordingParagraph {
            log: Rc::clone(&self.log),
            text: std::mem::take(&mut self.text),
            anchor: self.anchor,
        }))
    }
}

#[derive(Debug)]
pub struct RecordingParagraph {
    log: CallLog,
    text: String,
    anchor: TextAnchor,
}

impl Paragraph for RecordingParagraph {
    fn layout(&mut self, max_width: f32) {
        self.log
            .borrow_mut()
            .push(DrawCall::LayoutParagraph { max_width });
    }

    fn draw(&self, _canvas: &mut dyn Canvas, x: f32, y: f32) {
        self.log.borrow_mut().push(DrawCall::DrawParagraph {
            text: self.text.clone(),
            anchor: self.anchor,
            x,
            y,
        });
    }
}

// ==================== Canvas ====================

/// Canvas that records calls instead of drawing.
#[derive(Debug)]
pub struct RecordingCanvas {
    log: CallLog,
    paths: RecordingPathFactory,
    text: bool,
}

impl Default for RecordingCanvas {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self {
            log: Rc::new(RefCell::new(Vec::new())),
            paths: RecordingPathFactory,
            text: true,
        }
    }

    /// A canvas reporting no text support.
    pub fn without_text() -> Self {
        Self {
            text: false,
            ..Self::new()
        }
    }

    /// Copy of everything recorded so far.
    pub fn calls(&self) -> Vec<DrawCall> {
        self.log.borrow().clone()
    }

    /// Drain the log.
    pub fn take_calls(&mut self) -> Vec<DrawCall> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    pub fn len(&self) -> usize {
        self.log.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.borrow().is_empty()
    }

    /// The log as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.log.borrow())
    }

    fn record(&self, call: DrawCall) {
        self.log.borrow_mut().push(call);
    }
}

impl Canvas for RecordingCanvas {
    fn set_view_box(&mut self, view_port: SvgBox) {
        self.record(DrawCall::SetViewBox { view_port });
    }

    fn save(&mut self) {
        self.record(DrawCall::Save);
    }

    fn restore(&mut self) {
        self.record(DrawCall::Restore);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.record(DrawCall::Translate { dx, dy });
    }

    fn transform(&mut self, transform: &Transform) {
        self.record(DrawCall::Transform {
            transform: *transform,
        });
    }

    fn draw_rect(&mut self, id: Option<&str>, rect: &RectShape, state: &RenderState) {
        self.record(DrawCall::DrawRect {
            id: id.map(str::to_string),
            rect: *rect,
            state: state.clone(),
        });
    }

    fn draw_circle(&mut self, id: Option<&str>, circle: &CircleShape, state: &RenderState) {
        self.record(DrawCall::DrawCircle {
            id: id.map(str::to_string),
            circle: *circle,
            state: state.clone(),
        });
    }

    fn draw_ellipse(&mut self, id: Option<&str>, ellipse: &EllipseShape, state: &RenderState) {
        self.record(DrawCall::DrawEllipse {
            id: id.map(str::to_string),
            ellipse: *ellipse,
            state: state.clone(),
        });
    }

    fn draw_line(&mut self, id: Option<&str>, line: &LineShape, state: &RenderState) {
        self.record(DrawCall::DrawLine {
            id: id.map(str::to_string),
            line: *line,
            state: state.clone(),
        });
    }

    fn draw_polygon(&mut self, id: Option<&str>, points: &[Point], state: &RenderState) {
        self.record(DrawCall::DrawPolygon {
            id: id.map(str::to_string),
            points: points.to_vec(),
            state: state.clone(),
        });
    }

    fn draw_polyline(&mut self, id: Option<&str>, points: &[Point], state: &RenderState) {
        self.record(DrawCall::DrawPolyline {
            id: id.map(str::to_string),
            points: points.to_vec(),
            state: state.clone(),
        });
    }

    fn draw_path(&mut self, id: Option<&str>, commands: &[PathCommand], state: &RenderState) {
        self.record(DrawCall::DrawPath {
            id: id.map(str::to_string),
            commands: commands.to_vec(),
            state: state.clone(),
        });
    }

    fn update_linear_gradient(&mut self, gradient: &LinearGradient) {
        self.record(DrawCall::UpdateLinearGradient {
            gradient: gradient.clone(),
        });
    }

    fn update_radial_gradient(&mut self, gradient: &RadialGradient) {
        self.record(DrawCall::UpdateRadialGradient {
            gradient: gradient.clone(),
        });
    }

    fn draw_image(&mut self, href: &str, rect: SvgBox, aspect: PreserveAspectRatio) {
        self.record(DrawCall::DrawImage {
            href: href.to_string(),
            rect,
            aspect,
        });
    }

    fn draw_use(&mut self, href: &str) {
        self.record(DrawCall::DrawUse {
            href: href.to_string(),
        });
    }

    fn clip_path(&mut self, path: &dyn Path, rule: FillRule) {
        let commands = path
            .as_any()
            .downcast_ref::<RecordingPath>()
            .map(|p| p.commands.clone())
            .unwrap_or_default();
        self.record(DrawCall::ClipPath {
            bounds: path.bounds(),
            commands,
            rule,
        });
    }

    fn path_factory(&mut self) -> &mut dyn PathFactory {
        &mut self.paths
    }

    fn paragraph_factory(&mut self) -> Option<Box<dyn ParagraphFactory>> {
        if !self.text {
            return None;
        }
        Some(Box::new(RecordingParagraphFactory::new(Rc::clone(&self.log))))
    }
}
