//! # Render Traversal
//!
//! Depth-first walk over the node arena that turns a [`Document`] into
//! [`Canvas`] calls.
//!
//! ## Architecture
//!
//! Every node is rendered the same way:
//!
//! ```text
//! save -> prepare (clip, mask, paint servers) -> content -> restore
//! ```
//!
//! Inherited presentation values travel down as an [`InheritedStyle`]
//! value, rebuilt per child. References (`use`, `clip-path`, `mask`,
//! gradient fills) are looked up by id and tracked on an active stack, so
//! cyclic documents terminate.

pub mod inherit;
pub mod path;
pub mod resolve;
pub mod state;

pub use inherit::InheritedStyle;
pub use state::{resolve_paint, resolve_render_state, text_color};

use tracing::{debug, trace, warn};

use crate::canvas::{
    Canvas, GradientStop, LinearGradient, ParagraphFactory, ParagraphStyle, RadialGradient,
    TextStyle,
};
use crate::context::RenderContext;
use crate::document::Document;
use crate::geometry::{view_box_transform, Transform};
use crate::node::{NodeId, NodeKind, SvgNode};
use crate::values::LengthAxis;

use resolve::PaintResolver;

use LengthAxis::{Horizontal, Numeric, Vertical};

// ==================== Phases ====================

/// Where a node is in its render call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Phase {
    NotVisited,
    Preparing,
    Rendering,
    Done,
}

/// Per-call record of one node's progress. Never stored on the node.
#[derive(Debug)]
struct Frame {
    node: NodeId,
    tag: &'static str,
    phase: Phase,
}

impl Frame {
    fn new(node: NodeId, tag: &'static str) -> Self {
        Self {
            node,
            tag,
            phase: Phase::NotVisited,
        }
    }

    fn advance(&mut self, next: Phase) {
        debug_assert!(next > self.phase, "phases only move forward");
        trace!(node = self.node.raw(), tag = self.tag, from = ?self.phase, to = ?next, "phase");
        self.phase = next;
    }
}

// ==================== Renderer ====================

/// State of one render call over a document.
pub struct Renderer<'d> {
    pub(crate) doc: &'d Document,
    pub(crate) ctx: RenderContext,
    /// Reference targets currently being expanded.
    active: Vec<NodeId>,
    max_depth: usize,
    /// Current recursion depth across nodes, paths and mask coverage.
    nesting: usize,
    max_nesting: usize,
}

impl<'d> Renderer<'d> {
    pub fn new(doc: &'d Document, ctx: RenderContext, max_depth: usize) -> Self {
        Self {
            doc,
            ctx,
            active: Vec::new(),
            max_depth,
            nesting: 0,
            max_nesting: doc.options().max_nesting_depth,
        }
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    /// Render the whole document.
    pub fn render(&mut self, canvas: &mut dyn Canvas) {
        debug!(
            nodes = self.doc.len(),
            width = self.ctx.view_port.width,
            height = self.ctx.view_port.height,
            "rendering document"
        );
        self.render_node(canvas, self.doc.root(), InheritedStyle::default());
    }

    /// Render one node and its subtree. `inherited` holds the values the
    /// parent hands down, not yet layered with the node's own.
    pub fn render_node(
        &mut self,
        canvas: &mut dyn Canvas,
        id: NodeId,
        inherited: InheritedStyle<'d>,
    ) {
        if !self.descend(id) {
            return;
        }
        let doc = self.doc;
        let node = doc.get(id);
        let mut frame = Frame::new(id, node.tag_name());
        let style = InheritedStyle::of(node.own()).layer(inherited);

        canvas.save();
        frame.advance(Phase::Preparing);
        self.prepare(canvas, id, &style);
        frame.advance(Phase::Rendering);
        self.render_content(canvas, node, inherited, &style);
        canvas.restore();
        frame.advance(Phase::Done);
        self.ascend();
    }

    /// Count one level of recursion into `id`. Refused (and logged) once
    /// the nesting limit is reached; `use` chains can exceed the depth of
    /// the tree itself.
    pub(crate) fn descend(&mut self, id: NodeId) -> bool {
        if self.nesting >= self.max_nesting {
            warn!(
                node = id.raw(),
                depth = self.nesting,
                "nesting limit reached, skipping subtree"
            );
            return false;
        }
        self.nesting += 1;
        true
    }

    pub(crate) fn ascend(&mut self) {
        self.nesting = self.nesting.saturating_sub(1);
    }

    /// Push `target` on the active stack. Refused (and logged) when the
    /// target is already being expanded or the stack is too deep.
    pub(crate) fn enter_reference(&mut self, target: NodeId) -> bool {
        if self.active.contains(&target) {
            warn!(node = target.raw(), "reference cycle, dropping reference");
            return false;
        }
        if self.active.len() >= self.max_depth {
            warn!(
                node = target.raw(),
                depth = self.active.len(),
                "reference depth limit reached, dropping reference"
            );
            return false;
        }
        self.active.push(target);
        true
    }

    pub(crate) fn leave_reference(&mut self) {
        self.active.pop();
    }

    fn prepare(&mut self, canvas: &mut dyn Canvas, id: NodeId, style: &InheritedStyle<'d>) {
        if id == self.doc.root() {
            self.fit_view_box(canvas);
        }
        PaintResolver::new(self).resolve(canvas, id, style);
    }

    /// Map the root's viewBox onto the viewport. Skipped when either box
    /// is empty; an identity fit only sets the view box.
    fn fit_view_box(&mut self, canvas: &mut dyn Canvas) {
        let NodeKind::Svg(root) = self.doc.get(self.doc.root()).kind() else {
            return;
        };
        let RenderContext {
            view_port, view_box, ..
        } = self.ctx;
        if view_port.is_empty() || view_box.is_empty() {
            debug!("empty viewport or viewBox, skipping fit");
            return;
        }
        canvas.set_view_box(view_port);
        apply_transform(canvas, &view_box_transform(&view_box, &view_port, &root.aspect));
    }

    fn render_children(
        &mut self,
        canvas: &mut dyn Canvas,
        node: &'d SvgNode,
        inherited: InheritedStyle<'d>,
    ) {
        let doc = self.doc;
        for &child in node.children() {
            let style = InheritedStyle::for_child(node.own(), inherited, &doc.get(child).seed);
            self.render_node(canvas, child, style);
        }
    }

    fn render_content(
        &mut self,
        canvas: &mut dyn Canvas,
        node: &'d SvgNode,
        inherited: InheritedStyle<'d>,
        style: &InheritedStyle<'d>,
    ) {
        let ctx = self.ctx;
        let transform = &node.presentation().transform;

        match node.kind() {
            NodeKind::Svg(_) | NodeKind::G => {
                apply_transform(canvas, transform);
                self.render_children(canvas, node, inherited);
            }
            NodeKind::Defs
            | NodeKind::ClipPath(_)
            | NodeKind::Mask(_)
            | NodeKind::Stop(_)
            | NodeKind::TextRun(_)
            | NodeKind::TSpan(_) => {}
            NodeKind::LinearGradient(_) | NodeKind::RadialGradient(_) => {
                self.update_gradient(canvas, node, inherited);
            }
            NodeKind::Use(_) => self.render_use(canvas, node, inherited),
            NodeKind::Text(_) => self.render_text(canvas, node, inherited),
            NodeKind::Image(image) => {
                if image.href.is_empty() {
                    debug!("image without href");
                    return;
                }
                apply_transform(canvas, transform);
                canvas.draw_image(&image.href, image.resolve(&ctx), image.aspect);
            }
            kind => {
                let state = resolve_render_state(self.doc, &ctx, node, style);
                apply_transform(canvas, transform);
                let id = node.id();
                match kind {
                    NodeKind::Rect(rect) => canvas.draw_rect(id, &rect.resolve(&ctx), &state),
                    NodeKind::Circle(circle) => {
                        canvas.draw_circle(id, &circle.resolve(&ctx), &state)
                    }
                    NodeKind::Ellipse(ellipse) => {
                        canvas.draw_ellipse(id, &ellipse.resolve(&ctx), &state)
                    }
                    NodeKind::Line(line) if state.has_stroke() => {
                        canvas.draw_line(id, &line.resolve(&ctx), &state)
                    }
                    NodeKind::Polygon(poly) if !poly.points.is_empty() => {
                        canvas.draw_polygon(id, &poly.points, &state)
                    }
                    NodeKind::Polyline(poly) if !poly.points.is_empty() => {
                        canvas.draw_polyline(id, &poly.points, &state)
                    }
                    NodeKind::Path(path) => canvas.draw_path(id, &path.commands, &state),
                    _ => {}
                }
            }
        }
    }

    fn render_use(
        &mut self,
        canvas: &mut dyn Canvas,
        node: &'d SvgNode,
        inherited: InheritedStyle<'d>,
    ) {
        let NodeKind::Use(use_node) = node.kind() else {
            return;
        };
        let Some(target) = self.use_target(use_node) else {
            return;
        };
        if !self.enter_reference(target) {
            return;
        }
        let (x, y) = self.use_offset(use_node);
        apply_transform(canvas, &node.presentation().transform);
        if x != 0.0 || y != 0.0 {
            canvas.translate(x, y);
        }
        if let Some(href) = use_node.href.as_deref() {
            canvas.draw_use(href);
        }

        let doc = self.doc;
        let style = InheritedStyle::for_child(node.own(), inherited, &doc.get(target).seed);
        self.render_node(canvas, target, style);
        self.leave_reference();
    }

    fn update_gradient(
        &mut self,
        canvas: &mut dyn Canvas,
        node: &'d SvgNode,
        inherited: InheritedStyle<'d>,
    ) {
        let ctx = self.ctx;
        let id = node.id().unwrap_or_default().to_string();
        let stops = self.gradient_stops(node, inherited);

        match node.kind() {
            NodeKind::LinearGradient(g) => {
                trace!(id = %id, stops = stops.len(), "registering linear gradient");
                canvas.update_linear_gradient(&LinearGradient {
                    id,
                    transform: g.transform,
                    spread: g.spread,
                    x1: g.x1.resolve(&ctx, Numeric),
                    y1: g.y1.resolve(&ctx, Numeric),
                    x2: g.x2.resolve(&ctx, Numeric),
                    y2: g.y2.resolve(&ctx, Numeric),
                    stops,
                    units: g.units,
                });
            }
            NodeKind::RadialGradient(g) => {
                trace!(id = %id, stops = stops.len(), "registering radial gradient");
                let cx = g.cx.resolve(&ctx, Numeric);
                let cy = g.cy.resolve(&ctx, Numeric);
                canvas.update_radial_gradient(&RadialGradient {
                    id,
                    transform: g.transform,
                    spread: g.spread,
                    cx,
                    cy,
                    r: g.r.resolve(&ctx, Numeric),
                    fx: g.fx.map_or(cx, |fx| fx.resolve(&ctx, Numeric)),
                    fy: g.fy.map_or(cy, |fy| fy.resolve(&ctx, Numeric)),
                    stops,
                    units: g.units,
                });
            }
            _ => {}
        }
    }

    fn gradient_stops(
        &self,
        node: &'d SvgNode,
        inherited: InheritedStyle<'d>,
    ) -> Vec<GradientStop> {
        let doc = self.doc;
        node.children()
            .iter()
            .map(|&child| doc.get(child))
            .filter_map(|child| match child.kind() {
                NodeKind::Stop(stop) => {
                    let style = InheritedStyle::of(child.own())
                        .layer(InheritedStyle::for_child(node.own(), inherited, &child.seed));
                    Some(stop.resolve(&self.ctx, style.current_color()))
                }
                _ => None,
            })
            .collect()
    }

    fn render_text(
        &mut self,
        canvas: &mut dyn Canvas,
        node: &'d SvgNode,
        inherited: InheritedStyle<'d>,
    ) {
        let NodeKind::Text(text) = node.kind() else {
            return;
        };
        let Some(mut factory) = canvas.paragraph_factory() else {
            debug!("canvas has no text support, skipping text");
            return;
        };
        apply_transform(canvas, &node.presentation().transform);

        self.append_to_paragraph(factory.as_mut(), node, inherited);
        factory.set_paragraph_style(ParagraphStyle {
            text_anchor: text.anchor,
        });
        let Some(mut paragraph) = factory.create_paragraph() else {
            debug!("paragraph factory produced nothing");
            return;
        };
        paragraph.layout(f32::MAX);
        paragraph.draw(
            canvas,
            text.x.resolve(&self.ctx, Horizontal),
            text.y.resolve(&self.ctx, Vertical),
        );
    }

    fn append_to_paragraph(
        &self,
        factory: &mut dyn ParagraphFactory,
        node: &'d SvgNode,
        inherited: InheritedStyle<'d>,
    ) {
        let (NodeKind::Text(text) | NodeKind::TSpan(text)) = node.kind() else {
            return;
        };
        let doc = self.doc;
        let style = InheritedStyle::of(node.own()).layer(inherited);
        factory.push_text_style(TextStyle {
            color: text_color(&style),
            font_size: text.font_size.resolve(&self.ctx, Numeric),
        });
        for &child in node.children() {
            let child_node = doc.get(child);
            match child_node.kind() {
                NodeKind::TextRun(run) => factory.add_text(run),
                NodeKind::TSpan(_) => {
                    let child_style =
                        InheritedStyle::for_child(node.own(), inherited, &child_node.seed);
                    self.append_to_paragraph(factory, child_node, child_style);
                }
                _ => {}
            }
        }
        factory.pop_text_style();
    }
}

/// Concatenate `transform` unless it is the identity.
fn apply_transform(canvas: &mut dyn Canvas, transform: &Transform) {
    if !transform.is_identity() {
        canvas.transform(transform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RenderOptions;
    use crate::geometry::SvgBox;

    fn doc(svg: &str) -> Document {
        Document::make(svg).unwrap()
    }

    fn renderer(doc: &Document, depth: usize) -> Renderer<'_> {
        let view = SvgBox::new(0.0, 0.0, 100.0, 100.0);
        Renderer::new(doc, RenderContext::new(96.0, 16.0, view, view), depth)
    }

    #[test]
    fn test_phase_order() {
        assert!(Phase::NotVisited < Phase::Preparing);
        assert!(Phase::Rendering < Phase::Done);
        let mut frame = Frame::new(NodeId(0), "g");
        frame.advance(Phase::Preparing);
        frame.advance(Phase::Rendering);
        frame.advance(Phase::Done);
        assert_eq!(frame.phase, Phase::Done);
    }

    #[test]
    fn test_reference_guard() {
        let d = doc("<svg><g/><g/></svg>");
        let mut r = renderer(&d, 1);
        assert!(r.enter_reference(NodeId(1)));
        assert!(!r.enter_reference(NodeId(1)));
        assert!(!r.enter_reference(NodeId(2)));
        r.leave_reference();
        assert!(r.enter_reference(NodeId(2)));
    }

    #[test]
    fn test_nesting_guard() {
        let options = RenderOptions {
            max_nesting_depth: 2,
            ..Default::default()
        };
        let d = Document::make_with("<svg><g/></svg>", options).unwrap();
        let mut r = renderer(&d, 8);
        assert!(r.descend(NodeId(0)));
        assert!(r.descend(NodeId(1)));
        assert!(!r.descend(NodeId(1)));
        r.ascend();
        assert!(r.descend(NodeId(1)));
    }
}
