//! Typed SVG scene graph.
//!
//! Nodes live in an arena owned by the [`Document`](crate::Document) and
//! refer to their children by [`NodeId`]. Cross references (`use`,
//! `url(#id)`, clip paths, masks) are id lookups resolved at render time,
//! never ownership edges.

pub mod containers;
pub mod paint_server;
pub mod presentation;
pub mod shapes;
pub mod text;

pub use containers::{ClipPathNode, MaskNode, SvgRoot, UseNode};
pub use paint_server::{LinearGradientNode, RadialGradientNode, StopNode};
pub use presentation::{Inheritable, Presentation};
pub use shapes::{CircleNode, EllipseNode, ImageNode, LineNode, PathNode, PointsNode, RectNode};
pub use text::TextNode;

use serde::Serialize;

use crate::values::declarations;

/// Index of a node in its document's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub(crate) usize);

impl NodeId {
    pub fn raw(self) -> usize {
        self.0
    }
}

/// Element-specific data.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Svg(SvgRoot),
    G,
    Defs,
    ClipPath(ClipPathNode),
    Mask(MaskNode),
    LinearGradient(LinearGradientNode),
    RadialGradient(RadialGradientNode),
    Stop(StopNode),
    Rect(RectNode),
    Circle(CircleNode),
    Ellipse(EllipseNode),
    Line(LineNode),
    Polygon(PointsNode),
    Polyline(PointsNode),
    Path(PathNode),
    Image(ImageNode),
    Use(UseNode),
    Text(TextNode),
    TSpan(TextNode),
    /// Character data inside a text element.
    TextRun(String),
}

impl NodeKind {
    /// Fresh node data for a supported element name.
    pub fn for_tag(tag: &str) -> Option<NodeKind> {
        let kind = match tag {
            "svg" => NodeKind::Svg(SvgRoot::default()),
            "g" => NodeKind::G,
            "defs" => NodeKind::Defs,
            "clipPath" => NodeKind::ClipPath(ClipPathNode::default()),
            "mask" => NodeKind::Mask(MaskNode::default()),
            "linearGradient" => NodeKind::LinearGradient(LinearGradientNode::default()),
            "radialGradient" => NodeKind::RadialGradient(RadialGradientNode::default()),
            "stop" => NodeKind::Stop(StopNode::default()),
            "rect" => NodeKind::Rect(RectNode::default()),
            "circle" => NodeKind::Circle(CircleNode::default()),
            "ellipse" => NodeKind::Ellipse(EllipseNode::default()),
            "line" => NodeKind::Line(LineNode::default()),
            "polygon" => NodeKind::Polygon(PointsNode::default()),
            "polyline" => NodeKind::Polyline(PointsNode::default()),
            "path" => NodeKind::Path(PathNode::default()),
            "image" => NodeKind::Image(ImageNode::default()),
            "use" => NodeKind::Use(UseNode::default()),
            "text" => NodeKind::Text(TextNode::default()),
            "tspan" => NodeKind::TSpan(TextNode::default()),
            _ => return None,
        };
        Some(kind)
    }

    /// Element name, or `#text` for a text run.
    pub fn tag_name(&self) -> &'static str {
        match self {
            NodeKind::Svg(_) => "svg",
            NodeKind::G => "g",
            NodeKind::Defs => "defs",
            NodeKind::ClipPath(_) => "clipPath",
            NodeKind::Mask(_) => "mask",
            NodeKind::LinearGradient(_) => "linearGradient",
            NodeKind::RadialGradient(_) => "radialGradient",
            NodeKind::Stop(_) => "stop",
            NodeKind::Rect(_) => "rect",
            NodeKind::Circle(_) => "circle",
            NodeKind::Ellipse(_) => "ellipse",
            NodeKind::Line(_) => "line",
            NodeKind::Polygon(_) => "polygon",
            NodeKind::Polyline(_) => "polyline",
            NodeKind::Path(_) => "path",
            NodeKind::Image(_) => "image",
            NodeKind::Use(_) => "use",
            NodeKind::Text(_) => "text",
            NodeKind::TSpan(_) => "tspan",
            NodeKind::TextRun(_) => "#text",
        }
    }

    pub fn is_container(&self) -> bool {
        matches!(
            self,
            NodeKind::Svg(_)
                | NodeKind::G
                | NodeKind::Defs
                | NodeKind::ClipPath(_)
                | NodeKind::Mask(_)
                | NodeKind::LinearGradient(_)
                | NodeKind::RadialGradient(_)
        )
    }

    pub fn is_gradient(&self) -> bool {
        matches!(self, NodeKind::LinearGradient(_) | NodeKind::RadialGradient(_))
    }

    /// Whether a node of kind `child` may be appended under this one.
    /// Containers take elements, text containers take runs and spans,
    /// everything else takes nothing.
    pub fn accepts_child(&self, child: &NodeKind) -> bool {
        match self {
            _ if self.is_container() => !matches!(child, NodeKind::TextRun(_)),
            NodeKind::Text(_) | NodeKind::TSpan(_) => {
                matches!(child, NodeKind::TextRun(_) | NodeKind::TSpan(_))
            }
            _ => false,
        }
    }

    fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match self {
            NodeKind::Svg(n) => n.parse_attribute(name, value),
            NodeKind::ClipPath(n) => n.parse_attribute(name, value),
            NodeKind::Mask(n) => n.parse_attribute(name, value),
            NodeKind::LinearGradient(n) => n.parse_attribute(name, value),
            NodeKind::RadialGradient(n) => n.parse_attribute(name, value),
            NodeKind::Stop(n) => n.parse_attribute(name, value),
            NodeKind::Rect(n) => n.parse_attribute(name, value),
            NodeKind::Circle(n) => n.parse_attribute(name, value),
            NodeKind::Ellipse(n) => n.parse_attribute(name, value),
            NodeKind::Line(n) => n.parse_attribute(name, value),
            NodeKind::Polygon(n) | NodeKind::Polyline(n) => n.parse_attribute(name, value),
            NodeKind::Path(n) => n.parse_attribute(name, value),
            NodeKind::Image(n) => n.parse_attribute(name, value),
            NodeKind::Use(n) => n.parse_attribute(name, value),
            NodeKind::Text(n) | NodeKind::TSpan(n) => n.parse_attribute(name, value),
            NodeKind::G | NodeKind::Defs | NodeKind::TextRun(_) => false,
        }
    }
}

/// One element (or text run) of the scene graph.
#[derive(Debug, Clone, PartialEq)]
pub struct SvgNode {
    pub(crate) id: Option<String>,
    pub(crate) kind: NodeKind,
    pub(crate) presentation: Presentation,
    /// The parent's own inheritable values when this node was built. Used
    /// as the last fallback, which matters when the node is drawn through
    /// a `use` rather than under its real parent.
    pub(crate) seed: Inheritable,
    pub(crate) children: Vec<NodeId>,
}

impl SvgNode {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            id: None,
            kind,
            presentation: Presentation::default(),
            seed: Inheritable::default(),
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn tag_name(&self) -> &'static str {
        self.kind.tag_name()
    }

    pub fn presentation(&self) -> &Presentation {
        &self.presentation
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Inheritable values specified on this node itself.
    pub fn own(&self) -> &Inheritable {
        &self.presentation.inheritable
    }

    /// Apply one attribute. `style` is split into declarations and each is
    /// applied as if it were an attribute, so it overrides earlier
    /// attributes. Unknown attributes are ignored.
    pub fn parse_attribute(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "style" => {
                for (decl_name, decl_value) in declarations(value) {
                    if decl_name != "style" {
                        self.parse_attribute(decl_name, decl_value);
                    }
                }
            }
            _ => {
                if !self.kind.parse_attribute(name, value) {
                    self.presentation.parse_attribute(name, value);
                }
            }
        }
    }
}
