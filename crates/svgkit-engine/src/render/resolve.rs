//! The prepare step: clip, mask and paint server registration.

use tracing::{debug, trace};

use crate::canvas::Canvas;
use crate::geometry::{SvgBox, Transform};
use crate::node::{NodeId, NodeKind};
use crate::values::{FillRule, Paint, Units};

use super::inherit::InheritedStyle;
use super::Renderer;

/// Runs before a node draws, inside its `save`/`restore` pair.
pub(crate) struct PaintResolver<'r, 'd> {
    renderer: &'r mut Renderer<'d>,
}

impl<'r, 'd> PaintResolver<'r, 'd> {
    pub(crate) fn new(renderer: &'r mut Renderer<'d>) -> Self {
        Self { renderer }
    }

    /// `style` is the node's own values layered over what it inherited.
    pub(crate) fn resolve(
        mut self,
        canvas: &mut dyn Canvas,
        id: NodeId,
        style: &InheritedStyle<'d>,
    ) {
        let doc = self.renderer.doc;
        let node = doc.get(id);
        if !node.kind().is_gradient() {
            if let Some(paint) = style.clip_path {
                self.apply_clip(canvas, id, paint);
            }
            if let Some(paint) = node.presentation().mask.as_ref() {
                self.apply_mask(canvas, id, paint);
            }
        }

        // Shapes and text paint with inherited servers too, so those
        // must be registered before the draw call.
        let paints_itself = !node.kind().is_container() && !matches!(node.kind(), NodeKind::Use(_));
        let own = node.own();
        let (fill, stroke) = if paints_itself {
            (style.fill, style.stroke)
        } else {
            (own.fill.as_ref(), own.stroke.as_ref())
        };
        for paint in [fill, stroke].into_iter().flatten() {
            self.register_gradient(canvas, paint);
        }
    }

    /// Resolve `paint` to a node of the wanted kind, logging misses.
    fn target(&self, paint: &Paint, wanted: fn(&NodeKind) -> bool) -> Option<NodeId> {
        let href = paint.reference()?;
        let doc = self.renderer.doc;
        match doc.lookup(href) {
            Some(target) if wanted(doc.get(target).kind()) => Some(target),
            Some(_) => {
                debug!(href, "reference points at the wrong element kind");
                None
            }
            None => {
                debug!(href, "reference target not found");
                None
            }
        }
    }

    fn apply_clip(&mut self, canvas: &mut dyn Canvas, id: NodeId, paint: &Paint) {
        let Some(clip) = self.target(paint, |k| matches!(k, NodeKind::ClipPath(_))) else {
            return;
        };
        let doc = self.renderer.doc;
        let NodeKind::ClipPath(clip_node) = doc.get(clip).kind() else {
            return;
        };
        if !self.renderer.enter_reference(clip) {
            return;
        }
        let factory = canvas.path_factory();
        let path = self.renderer.as_path(factory, clip);
        self.renderer.leave_reference();
        let Some(mut path) = path else {
            return;
        };

        if clip_node.units == Units::ObjectBoundingBox {
            let Some(bbox) = self.renderer.as_path(factory, id).map(|p| p.bounds()) else {
                debug!(node = id.raw(), "no bounding box for clip");
                return;
            };
            path.transform(&bbox_transform(bbox));
        }
        trace!(clip = clip.raw(), node = id.raw(), "applying clip path");
        canvas.clip_path(path.as_ref(), clip_node.clip_rule);
    }

    fn apply_mask(&mut self, canvas: &mut dyn Canvas, id: NodeId, paint: &Paint) {
        let Some(mask) = self.target(paint, |k| matches!(k, NodeKind::Mask(_))) else {
            return;
        };
        let doc = self.renderer.doc;
        let NodeKind::Mask(mask_node) = doc.get(mask).kind() else {
            return;
        };
        if !self.renderer.enter_reference(mask) {
            return;
        }
        let factory = canvas.path_factory();
        let mut coverage = self.renderer.mask_coverage(factory, mask);
        self.renderer.leave_reference();

        if mask_node.content_units == Units::ObjectBoundingBox {
            let Some(bbox) = self.renderer.as_path(factory, id).map(|p| p.bounds()) else {
                debug!(node = id.raw(), "no bounding box for mask");
                return;
            };
            coverage.transform(&bbox_transform(bbox));
        }
        trace!(mask = mask.raw(), node = id.raw(), "applying mask coverage");
        canvas.clip_path(coverage.as_ref(), FillRule::NonZero);
    }

    fn register_gradient(&mut self, canvas: &mut dyn Canvas, paint: &Paint) {
        let Some(gradient) = self.target(paint, NodeKind::is_gradient) else {
            return;
        };
        if !self.renderer.enter_reference(gradient) {
            return;
        }
        let doc = self.renderer.doc;
        let seed = InheritedStyle::of(&doc.get(gradient).seed);
        self.renderer.render_node(canvas, gradient, seed);
        self.renderer.leave_reference();
    }
}

/// Maps the unit square onto `bbox`.
fn bbox_transform(bbox: SvgBox) -> Transform {
    Transform::new(bbox.width, 0.0, 0.0, bbox.height, bbox.left, bbox.top)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_transform() {
        let t = bbox_transform(SvgBox::new(10.0, 20.0, 100.0, 50.0));
        let mapped = t.map_box(&SvgBox::new(0.0, 0.0, 1.0, 1.0));
        assert_eq!(mapped, SvgBox::new(10.0, 20.0, 100.0, 50.0));
    }
}
