//! Node geometry as backend paths, for clipping and masking.

use tracing::debug;

use crate::canvas::{Path, PathFactory, PathOp};
use crate::context::RenderContext;
use crate::geometry::Transform;
use crate::node::{NodeId, NodeKind, SvgNode, UseNode};
use crate::values::{Color, LengthAxis, Paint};

use super::inherit::InheritedStyle;
use super::Renderer;

/// Untransformed geometry of a single shape, `None` for anything else.
pub fn shape_path(
    factory: &mut dyn PathFactory,
    ctx: &RenderContext,
    node: &SvgNode,
) -> Option<Box<dyn Path>> {
    let path = match node.kind() {
        NodeKind::Rect(rect) => factory.create_rect(&rect.resolve(ctx)),
        NodeKind::Circle(circle) => factory.create_circle(&circle.resolve(ctx)),
        NodeKind::Ellipse(ellipse) => factory.create_ellipse(&ellipse.resolve(ctx)),
        NodeKind::Line(line) => factory.create_line(&line.resolve(ctx)),
        NodeKind::Polygon(poly) => factory.create_polygon(&poly.points),
        NodeKind::Polyline(poly) => factory.create_polyline(&poly.points),
        NodeKind::Path(path) => factory.create_path(&path.commands),
        _ => return None,
    };
    Some(path)
}

impl<'d> Renderer<'d> {
    /// Geometry of `id` in its parent's coordinates: shapes as drawn,
    /// containers as the union of their children, `use` as its target.
    pub(crate) fn as_path(
        &mut self,
        factory: &mut dyn PathFactory,
        id: NodeId,
    ) -> Option<Box<dyn Path>> {
        if !self.descend(id) {
            return None;
        }
        let path = self.node_path(factory, id);
        self.ascend();
        path
    }

    fn node_path(&mut self, factory: &mut dyn PathFactory, id: NodeId) -> Option<Box<dyn Path>> {
        let doc = self.doc;
        let node = doc.get(id);
        let mut path = match node.kind() {
            NodeKind::Svg(_) | NodeKind::G | NodeKind::ClipPath(_) | NodeKind::Mask(_) => {
                self.union_children(factory, node)
            }
            NodeKind::Use(use_node) => {
                let target = self.use_target(use_node)?;
                if !self.enter_reference(target) {
                    return None;
                }
                let path = self.as_path(factory, target);
                self.leave_reference();
                let mut path = path?;
                let (x, y) = self.use_offset(use_node);
                path.transform(&Transform::from_translate(x, y));
                path
            }
            _ => shape_path(factory, &self.ctx, node)?,
        };
        path.transform(&node.presentation().transform);
        Some(path)
    }

    fn union_children(&mut self, factory: &mut dyn PathFactory, node: &SvgNode) -> Box<dyn Path> {
        let mut acc = factory.create_mutable();
        for &child in node.children() {
            if let Some(path) = self.as_path(factory, child) {
                if !factory.op(acc.as_mut(), path.as_ref(), PathOp::Union) {
                    debug!(child = child.raw(), "path union failed, child skipped");
                }
            }
        }
        acc
    }

    pub(crate) fn use_target(&self, use_node: &UseNode) -> Option<NodeId> {
        let href = use_node.href.as_deref()?;
        let target = self.doc.lookup(href);
        if target.is_none() {
            debug!(href, "use target not found");
        }
        target
    }

    pub(crate) fn use_offset(&self, use_node: &UseNode) -> (f32, f32) {
        (
            use_node.x.resolve(&self.ctx, LengthAxis::Horizontal),
            use_node.y.resolve(&self.ctx, LengthAxis::Vertical),
        )
    }

    /// Coverage of a mask's content as a single path.
    pub(crate) fn mask_coverage(
        &mut self,
        factory: &mut dyn PathFactory,
        mask: NodeId,
    ) -> Box<dyn Path> {
        let doc = self.doc;
        let node = doc.get(mask);
        let mut coverage = factory.create_mutable();
        for &child in node.children() {
            let style = InheritedStyle::for_child(
                node.own(),
                InheritedStyle::default(),
                &doc.get(child).seed,
            );
            self.add_coverage(factory, coverage.as_mut(), child, Transform::identity(), style);
        }
        coverage
    }

    /// White fills add coverage, other fills toggle it, strokes add their
    /// outline.
    fn add_coverage(
        &mut self,
        factory: &mut dyn PathFactory,
        coverage: &mut dyn Path,
        id: NodeId,
        parent: Transform,
        inherited: InheritedStyle<'d>,
    ) {
        if self.descend(id) {
            self.add_node_coverage(factory, coverage, id, parent, inherited);
            self.ascend();
        }
    }

    fn add_node_coverage(
        &mut self,
        factory: &mut dyn PathFactory,
        coverage: &mut dyn Path,
        id: NodeId,
        parent: Transform,
        inherited: InheritedStyle<'d>,
    ) {
        let doc = self.doc;
        let node = doc.get(id);
        let transform = parent.multiply(&node.presentation().transform);

        match node.kind() {
            NodeKind::Svg(_) | NodeKind::G => {
                for &child in node.children() {
                    let style =
                        InheritedStyle::for_child(node.own(), inherited, &doc.get(child).seed);
                    self.add_coverage(factory, coverage, child, transform, style);
                }
            }
            NodeKind::Use(use_node) => {
                let Some(target) = self.use_target(use_node) else {
                    return;
                };
                if !self.enter_reference(target) {
                    return;
                }
                let (x, y) = self.use_offset(use_node);
                let style =
                    InheritedStyle::for_child(node.own(), inherited, &doc.get(target).seed);
                self.add_coverage(factory, coverage, target, transform.translate(x, y), style);
                self.leave_reference();
            }
            _ => {
                let Some(mut raw) = shape_path(factory, &self.ctx, node) else {
                    return;
                };
                let style = InheritedStyle::of(node.own()).layer(inherited);
                let presentation = node.presentation();

                let outline = match style.stroke {
                    Some(paint) if !paint.is_none() => {
                        let width = style
                            .stroke_width
                            .map(|w| w.resolve(&self.ctx, LengthAxis::Diagonal))
                            .unwrap_or(1.0);
                        if width > 0.0 {
                            factory.create_stroke_path(
                                raw.as_ref(),
                                width,
                                presentation.line_cap,
                                presentation.line_join,
                                presentation.miter_limit,
                            )
                        } else {
                            None
                        }
                    }
                    _ => None,
                };

                if let Some(op) = fill_op(&style) {
                    raw.transform(&transform);
                    factory.op(coverage, raw.as_ref(), op);
                }
                if let Some(mut outline) = outline {
                    outline.transform(&transform);
                    factory.op(coverage, outline.as_ref(), PathOp::Union);
                }
            }
        }
    }
}

fn fill_op(style: &InheritedStyle<'_>) -> Option<PathOp> {
    match style.fill {
        Some(Paint::None) => None,
        Some(Paint::Color(color)) if style.resolve_color(*color) == Color::WHITE => {
            Some(PathOp::Union)
        }
        _ => Some(PathOp::Xor),
    }
}
