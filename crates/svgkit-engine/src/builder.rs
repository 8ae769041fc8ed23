//! Typed tree construction.
//!
//! Walks the untyped [`XmlTree`] depth first and builds [`SvgNode`]s into
//! an arena. Each node is seeded with its parent's own inheritable values
//! before its attributes are applied.

use std::collections::HashMap;

use svgkit_xml::{XmlNodeId, XmlTree};
use tracing::{debug, trace, warn};

use crate::node::{Inheritable, NodeId, NodeKind, SvgNode};
use crate::values::try_push;

/// Everything the builder produced.
#[derive(Debug, Default)]
pub(crate) struct BuildOutput {
    pub nodes: Vec<SvgNode>,
    pub root: Option<NodeId>,
    pub ids: HashMap<String, NodeId>,
    /// Names of unsupported elements whose subtrees were dropped.
    pub unknown: Vec<String>,
    /// Subtrees dropped for nesting past the depth limit.
    pub too_deep: usize,
}

pub(crate) struct TreeBuilder<'x, 'a> {
    xml: &'x XmlTree<'a>,
    max_depth: usize,
    out: BuildOutput,
}

impl<'x, 'a> TreeBuilder<'x, 'a> {
    /// Elements nested more than `max_depth` levels below the root are
    /// dropped with their subtree.
    pub fn new(xml: &'x XmlTree<'a>, max_depth: usize) -> Self {
        Self {
            xml,
            max_depth,
            out: BuildOutput::default(),
        }
    }

    pub fn build(mut self) -> BuildOutput {
        let root = self.xml.root();
        self.out.root = root.and_then(|id| self.build_node(id, &Inheritable::default(), 0));
        debug!(
            nodes = self.out.nodes.len(),
            ids = self.out.ids.len(),
            unknown = self.out.unknown.len(),
            too_deep = self.out.too_deep,
            "svg tree built"
        );
        self.out
    }

    fn build_node(
        &mut self,
        xml_id: XmlNodeId,
        seed: &Inheritable,
        depth: usize,
    ) -> Option<NodeId> {
        let xml_node = self.xml.node(xml_id);
        if depth > self.max_depth {
            if self.out.too_deep == 0 {
                warn!(element = xml_node.name, depth, "nesting too deep, dropping subtree");
            }
            self.out.too_deep += 1;
            return None;
        }
        let kind = if xml_node.is_text() {
            NodeKind::TextRun(xml_node.name.to_string())
        } else {
            match NodeKind::for_tag(xml_node.name) {
                Some(kind) => kind,
                None => {
                    warn!(element = xml_node.name, "unknown element, dropping subtree");
                    self.out.unknown.push(xml_node.name.to_string());
                    return None;
                }
            }
        };

        let mut node = SvgNode::new(kind);
        node.seed = seed.clone();
        for attr in xml_node.attributes() {
            node.parse_attribute(attr.name, attr.value);
        }
        let own = node.own().clone();
        let name = node.id.clone();

        let id = NodeId(self.out.nodes.len());
        if !try_push(&mut self.out.nodes, node) {
            return None;
        }
        // Later duplicates win, and ids of rejected nodes stay reachable.
        if let Some(name) = name {
            self.out.ids.insert(name, id);
        }

        for child in self.xml.children(xml_id) {
            let Some(child_id) = self.build_node(child, &own, depth + 1) else {
                continue;
            };
            let accepted = self.out.nodes[id.0]
                .kind
                .accepts_child(&self.out.nodes[child_id.0].kind);
            if accepted {
                try_push(&mut self.out.nodes[id.0].children, child_id);
            } else {
                trace!(
                    parent = self.out.nodes[id.0].tag_name(),
                    child = self.out.nodes[child_id.0].tag_name(),
                    "child not accepted"
                );
            }
        }
        Some(id)
    }
}
