//! The parsed document and its public entry points.

use std::collections::HashMap;

use svgkit_common::{Result, SvgKitError};
use svgkit_xml::XmlTree;
use tracing::{debug, info};

use crate::builder::{BuildOutput, TreeBuilder};
use crate::canvas::Canvas;
use crate::config::RenderOptions;
use crate::context::RenderContext;
use crate::geometry::SvgBox;
use crate::node::{NodeId, NodeKind, SvgNode, SvgRoot};
use crate::render::Renderer;
use crate::values::LengthAxis;

/// A parsed SVG document.
///
/// Immutable once built; render it as often as needed, each call with its
/// own canvas.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<SvgNode>,
    root: NodeId,
    /// Copy of the root element's attributes.
    svg: SvgRoot,
    ids: HashMap<String, NodeId>,
    /// Pixels per inch used for absolute units.
    pub dpi: f32,
    options: RenderOptions,
}

impl Document {
    /// Parse leniently with default options. `None` when there is no usable
    /// `<svg>` root.
    pub fn make(svg: &str) -> Option<Document> {
        Self::make_with(svg, RenderOptions::default())
    }

    /// Parse with `options`; strict options reject any diagnostic.
    pub fn make_with(svg: &str, options: RenderOptions) -> Option<Document> {
        let result = if options.strict {
            Self::parse_strict(svg, options)
        } else {
            Self::parse_lenient(svg, options)
        };
        match result {
            Ok(doc) => Some(doc),
            Err(err) => {
                debug!(category = err.category(), error = %err, "document rejected");
                None
            }
        }
    }

    /// Parse, failing on the first markup diagnostic or unknown element.
    pub fn parse_strict(svg: &str, options: RenderOptions) -> Result<Document> {
        options.validate()?;
        let xml = XmlTree::parse(svg);
        if let Some(diagnostic) = xml.diagnostics().first() {
            return Err(diagnostic.clone().into_error());
        }
        let output = TreeBuilder::new(&xml, options.max_nesting_depth).build();
        if let Some(name) = output.unknown.first() {
            return Err(SvgKitError::UnknownElement(name.clone()));
        }
        if output.too_deep > 0 {
            return Err(SvgKitError::NestingTooDeep(options.max_nesting_depth));
        }
        Self::finish(output, options)
    }

    /// Parse UTF-8 bytes. Invalid UTF-8 is a markup error at the first bad
    /// byte.
    pub fn from_bytes(bytes: &[u8], options: RenderOptions) -> Result<Document> {
        let svg = std::str::from_utf8(bytes)
            .map_err(|e| SvgKitError::markup("invalid UTF-8", e.valid_up_to()))?;
        if options.strict {
            Self::parse_strict(svg, options)
        } else {
            Self::parse_lenient(svg, options)
        }
    }

    fn parse_lenient(svg: &str, options: RenderOptions) -> Result<Document> {
        options.validate()?;
        let xml = XmlTree::parse(svg);
        for diagnostic in xml.diagnostics() {
            debug!(offset = diagnostic.offset, "tolerated: {}", diagnostic.kind);
        }
        let output = TreeBuilder::new(&xml, options.max_nesting_depth).build();
        Self::finish(output, options)
    }

    fn finish(output: BuildOutput, options: RenderOptions) -> Result<Document> {
        let Some(root) = output.root else {
            return Err(match output.unknown.into_iter().next() {
                Some(name) => SvgKitError::UnknownElement(name),
                None => SvgKitError::EmptyDocument,
            });
        };
        let root_node = &output.nodes[root.0];
        let NodeKind::Svg(svg) = root_node.kind() else {
            return Err(SvgKitError::NonRootSvg(root_node.tag_name().to_string()));
        };
        let svg = svg.clone();
        info!(nodes = output.nodes.len(), ids = output.ids.len(), "document ready");
        Ok(Document {
            nodes: output.nodes,
            root,
            svg,
            ids: output.ids,
            dpi: options.dpi,
            options,
        })
    }

    // ==================== Accessors ====================

    /// The `<svg>` element.
    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&SvgNode> {
        self.nodes.get(id.0)
    }

    /// Ids handed out by this document are always in range.
    pub(crate) fn get(&self, id: NodeId) -> &SvgNode {
        &self.nodes[id.0]
    }

    /// Node registered under `id`.
    pub fn lookup(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    /// Like [`Self::lookup`], but a miss is an error.
    pub fn require(&self, id: &str) -> Result<NodeId> {
        self.lookup(id)
            .ok_or_else(|| SvgKitError::UnresolvedReference(id.to_string()))
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(SvgNode::children).unwrap_or(&[])
    }

    /// Number of nodes in the arena, including rejected children.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Attributes of the root element.
    pub fn svg_root(&self) -> &SvgRoot {
        &self.svg
    }

    // ==================== Rendering ====================

    /// The viewport implied by the root: its `width`/`height` when both
    /// are given, else its viewBox, else empty.
    pub fn intrinsic_viewport(&self) -> SvgBox {
        let root = self.svg_root();
        match (root.width, root.height) {
            (Some(width), Some(height)) => {
                let ctx = RenderContext::new(
                    self.dpi,
                    self.options.font_size,
                    SvgBox::default(),
                    root.view_box(),
                );
                SvgBox::new(
                    0.0,
                    0.0,
                    width.resolve(&ctx, LengthAxis::Horizontal),
                    height.resolve(&ctx, LengthAxis::Vertical),
                )
            }
            _ => root.view_box(),
        }
    }

    /// Render at the document's own size.
    pub fn render(&self, canvas: &mut dyn Canvas) {
        self.render_in(canvas, self.intrinsic_viewport());
    }

    /// Render fitted into `view_port`.
    pub fn render_in(&self, canvas: &mut dyn Canvas, view_port: SvgBox) {
        let view_box = self.svg_root().view_box.unwrap_or(view_port);
        let ctx = RenderContext::new(self.dpi, self.options.font_size, view_port, view_box);
        Renderer::new(self, ctx, self.options.max_reference_depth).render(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make() {
        let doc = Document::make(r#"<svg width="10" height="20"><rect id="r"/></svg>"#).unwrap();
        assert_eq!(doc.dpi, 96.0);
        assert_eq!(doc.len(), 2);
        assert_eq!(doc.children(doc.root()).len(), 1);
        assert_eq!(doc.intrinsic_viewport(), SvgBox::new(0.0, 0.0, 10.0, 20.0));
        assert!(doc.lookup("r").is_some());
        assert!(matches!(
            doc.require("nope"),
            Err(SvgKitError::UnresolvedReference(_))
        ));
    }

    #[test]
    fn test_non_svg_root() {
        assert!(Document::make("<g/>").is_none());
        assert!(Document::make("").is_none());
        assert!(Document::make("<foo><svg/></foo>").is_none());
        let err = Document::parse_strict("<g/>", RenderOptions::default()).unwrap_err();
        assert!(matches!(err, SvgKitError::NonRootSvg(name) if name == "g"));
        let err = Document::parse_strict("   ", RenderOptions::default()).unwrap_err();
        assert!(matches!(err, SvgKitError::EmptyDocument));
    }

    #[test]
    fn test_strict_rejects_unknown_elements() {
        let svg = "<svg><foo/><rect/></svg>";
        assert!(Document::make(svg).is_some());
        let err = Document::parse_strict(svg, RenderOptions::default()).unwrap_err();
        assert!(matches!(err, SvgKitError::UnknownElement(name) if name == "foo"));
        assert!(Document::make_with(svg, RenderOptions::default().with_strict(true)).is_none());
    }

    #[test]
    fn test_from_bytes() {
        let doc = Document::from_bytes(b"<svg/>", RenderOptions::default()).unwrap();
        assert!(doc.children(doc.root()).is_empty());
        let err = Document::from_bytes(b"<svg>\xff</svg>", RenderOptions::default()).unwrap_err();
        assert!(matches!(err, SvgKitError::Markup { offset: 5, .. }));
    }

    #[test]
    fn test_options_carry_dpi() {
        let doc = Document::make_with("<svg/>", RenderOptions::default().with_dpi(72.0)).unwrap();
        assert_eq!(doc.dpi, 72.0);
        let bad = RenderOptions::default().with_dpi(0.0);
        assert!(Document::make_with("<svg/>", bad).is_none());
    }
}
