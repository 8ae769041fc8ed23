//! Generic attribute tree.
//!
//! Built from scanner events with a parent stack. New children are
//! prepended to their parent's list, and the list is reversed once when the
//! parent closes, which puts every sibling chain back into document order.

use tracing::debug;

use crate::tokenizer::parse_xml;
use crate::{Attribute, DiagnosticKind, XmlDiagnostic, XmlSink};

/// Index of a node in an [`XmlTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct XmlNodeId(usize);

impl XmlNodeId {
    pub fn raw(&self) -> usize {
        self.0
    }
}

/// Element or text run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XmlNodeKind {
    Element,
    Text,
}

/// A node of the attribute tree. For text nodes `name` holds the content.
#[derive(Debug, Clone)]
pub struct XmlNode<'a> {
    pub kind: XmlNodeKind,
    pub name: &'a str,
    attrs: Vec<Attribute<'a>>,
    first_child: Option<XmlNodeId>,
    next_sibling: Option<XmlNodeId>,
}

impl<'a> XmlNode<'a> {
    fn new(kind: XmlNodeKind, name: &'a str, attrs: Vec<Attribute<'a>>) -> Self {
        Self {
            kind,
            name,
            attrs,
            first_child: None,
            next_sibling: None,
        }
    }

    pub fn is_element(&self) -> bool {
        self.kind == XmlNodeKind::Element
    }

    pub fn is_text(&self) -> bool {
        self.kind == XmlNodeKind::Text
    }

    /// Attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = &Attribute<'a>> {
        self.attrs.iter()
    }

    /// Value of the first attribute called `name`.
    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.attrs.iter().find(|a| a.name == name).map(|a| a.value)
    }
}

/// The untyped tree. Nodes live in an arena addressed by [`XmlNodeId`].
#[derive(Debug, Clone, Default)]
pub struct XmlTree<'a> {
    nodes: Vec<XmlNode<'a>>,
    root: Option<XmlNodeId>,
    diagnostics: Vec<XmlDiagnostic>,
}

impl<'a> XmlTree<'a> {
    /// Scan `input` and build its tree. Never fails; see [`Self::diagnostics`].
    pub fn parse(input: &'a str) -> Self {
        let mut builder = TreeBuilder::default();
        parse_xml(input, &mut builder);
        let tree = builder.finish(input.len());
        debug!(
            nodes = tree.nodes.len(),
            diagnostics = tree.diagnostics.len(),
            "xml tree built"
        );
        tree
    }

    /// The first top-level element.
    pub fn root(&self) -> Option<XmlNodeId> {
        self.root
    }

    pub fn node(&self, id: XmlNodeId) -> &XmlNode<'a> {
        &self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Everything the scanner and builder tolerated, in input order.
    pub fn diagnostics(&self) -> &[XmlDiagnostic] {
        &self.diagnostics
    }

    /// First child of `id`, optionally the first element called `name`.
    pub fn first_child(&self, id: XmlNodeId, name: Option<&str>) -> Option<XmlNodeId> {
        let first = self.nodes[id.0].first_child?;
        self.matching_from(first, name)
    }

    /// Next sibling of `id`, optionally the next element called `name`.
    pub fn next_sibling(&self, id: XmlNodeId, name: Option<&str>) -> Option<XmlNodeId> {
        let next = self.nodes[id.0].next_sibling?;
        self.matching_from(next, name)
    }

    /// All children of `id`, in document order.
    pub fn children(&self, id: XmlNodeId) -> Children<'_, 'a> {
        Children {
            tree: self,
            next: self.nodes[id.0].first_child,
        }
    }

    fn matching_from(&self, start: XmlNodeId, name: Option<&str>) -> Option<XmlNodeId> {
        let Some(name) = name else {
            return Some(start);
        };
        let mut cursor = Some(start);
        while let Some(id) = cursor {
            let node = &self.nodes[id.0];
            if node.is_element() && node.name == name {
                return Some(id);
            }
            cursor = node.next_sibling;
        }
        None
    }
}

/// Iterator over a node's children.
pub struct Children<'t, 'a> {
    tree: &'t XmlTree<'a>,
    next: Option<XmlNodeId>,
}

impl<'t, 'a> Iterator for Children<'t, 'a> {
    type Item = XmlNodeId;

    fn next(&mut self) -> Option<XmlNodeId> {
        let id = self.next?;
        self.next = self.tree.nodes[id.0].next_sibling;
        Some(id)
    }
}

#[derive(Default)]
struct TreeBuilder<'a> {
    tree: XmlTree<'a>,
    stack: Vec<XmlNodeId>,
    /// Offset of the tag being processed.
    last_offset: usize,
}

impl<'a> TreeBuilder<'a> {
    fn push_node(&mut self, node: XmlNode<'a>) -> XmlNodeId {
        let id = XmlNodeId(self.tree.nodes.len());
        self.tree.nodes.push(node);
        id
    }

    fn attach(&mut self, id: XmlNodeId) {
        let Some(&parent) = self.stack.last() else {
            return;
        };
        let previous = self.tree.nodes[parent.0].first_child.replace(id);
        self.tree.nodes[id.0].next_sibling = previous;
    }

    /// Reverse the child list of `id` in place.
    fn reverse_children(&mut self, id: XmlNodeId) {
        let mut reversed = None;
        let mut cursor = self.tree.nodes[id.0].first_child;
        while let Some(child) = cursor {
            cursor = self.tree.nodes[child.0].next_sibling;
            self.tree.nodes[child.0].next_sibling = reversed;
            reversed = Some(child);
        }
        self.tree.nodes[id.0].first_child = reversed;
    }

    fn report(&mut self, kind: DiagnosticKind) {
        self.tree
            .diagnostics
            .push(XmlDiagnostic::new(kind, self.last_offset));
    }

    fn finish(mut self, end: usize) -> XmlTree<'a> {
        self.last_offset = end;
        while let Some(open) = self.stack.pop() {
            self.reverse_children(open);
            let name = self.tree.nodes[open.0].name.to_string();
            self.report(DiagnosticKind::UnclosedElement(name));
        }
        self.tree
    }
}

impl<'a> XmlSink<'a> for TreeBuilder<'a> {
    fn start_element(&mut self, name: &'a str, attrs: &[Attribute<'a>]) {
        let id = self.push_node(XmlNode::new(XmlNodeKind::Element, name, attrs.to_vec()));

        if self.stack.is_empty() {
            if self.tree.root.is_none() {
                self.tree.root = Some(id);
            } else {
                // Built but left detached.
                self.report(DiagnosticKind::MultipleRoots(name.to_string()));
            }
        } else {
            self.attach(id);
        }
        self.stack.push(id);
    }

    fn end_element(&mut self, name: &'a str) {
        let Some(open) = self.stack.pop() else {
            self.report(DiagnosticKind::StrayEndTag(name.to_string()));
            return;
        };
        let expected = self.tree.nodes[open.0].name;
        if expected != name {
            self.report(DiagnosticKind::MismatchedEndTag {
                expected: expected.to_string(),
                found: name.to_string(),
            });
        }
        self.reverse_children(open);
    }

    fn text(&mut self, content: &'a str) {
        if self.stack.is_empty() {
            self.report(DiagnosticKind::TextOutsideRoot);
            return;
        }
        let id = self.push_node(XmlNode::new(XmlNodeKind::Text, content, Vec::new()));
        self.attach(id);
    }

    fn diagnostic(&mut self, diagnostic: XmlDiagnostic) {
        self.tree.diagnostics.push(diagnostic);
    }

    fn location(&mut self, offset: usize) {
        self.last_offset = offset;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(tree: &XmlTree<'a>, parent: XmlNodeId) -> Vec<&'a str> {
        tree.children(parent).map(|c| tree.node(c).name).collect()
    }

    #[test]
    fn test_children_in_document_order() {
        let tree = XmlTree::parse("<svg><a/><b/><c><d/><e/></c></svg>");
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).name, "svg");
        assert_eq!(names(&tree, root), vec!["a", "b", "c"]);

        let c = tree.first_child(root, Some("c")).unwrap();
        assert_eq!(names(&tree, c), vec!["d", "e"]);
        assert!(tree.diagnostics().is_empty());
    }

    #[test]
    fn test_text_nodes() {
        let tree = XmlTree::parse("<text>Hello<tspan>big</tspan>world</text>");
        let root = tree.root().unwrap();
        let kids: Vec<_> = tree.children(root).collect();
        assert_eq!(kids.len(), 3);
        assert!(tree.node(kids[0]).is_text());
        assert_eq!(tree.node(kids[0]).name, "Hello");
        assert!(tree.node(kids[1]).is_element());
        assert_eq!(tree.node(kids[2]).name, "world");
    }

    #[test]
    fn test_attribute_lookup() {
        let tree = XmlTree::parse(r#"<rect x="1" y="2" x="3"/>"#);
        let root = tree.node(tree.root().unwrap());
        assert_eq!(root.attribute("x"), Some("1"));
        assert_eq!(root.attribute("y"), Some("2"));
        assert_eq!(root.attribute("z"), None);
        let all: Vec<_> = root.attributes().map(|a| a.name).collect();
        assert_eq!(all, vec!["x", "y", "x"]);
    }

    #[test]
    fn test_filtered_siblings() {
        let tree = XmlTree::parse("<g><stop/><rect/><stop/>text<stop/></g>");
        let root = tree.root().unwrap();
        let mut stops = Vec::new();
        let mut cursor = tree.first_child(root, Some("stop"));
        while let Some(id) = cursor {
            stops.push(id);
            cursor = tree.next_sibling(id, Some("stop"));
        }
        assert_eq!(stops.len(), 3);

        let first = tree.first_child(root, None).unwrap();
        assert_eq!(tree.node(first).name, "stop");
        assert_eq!(tree.first_child(first, None), None);
    }

    #[test]
    fn test_second_root_detached() {
        let tree = XmlTree::parse("<svg><g/></svg><svg id=\"other\"/>");
        let root = tree.root().unwrap();
        assert_eq!(tree.node(root).attribute("id"), None);
        assert_eq!(names(&tree, root), vec!["g"]);
        assert_eq!(tree.len(), 3);
        assert_eq!(
            tree.diagnostics()[0].kind,
            DiagnosticKind::MultipleRoots("svg".into())
        );
    }

    #[test]
    fn test_mismatched_and_stray_end_tags() {
        let tree = XmlTree::parse("<svg><g><rect/></svg></g></x>");
        let kinds: Vec<_> = tree.diagnostics().iter().map(|d| d.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                DiagnosticKind::MismatchedEndTag {
                    expected: "g".into(),
                    found: "svg".into()
                },
                DiagnosticKind::MismatchedEndTag {
                    expected: "svg".into(),
                    found: "g".into()
                },
                DiagnosticKind::StrayEndTag("x".into()),
            ]
        );
        let root = tree.root().unwrap();
        assert_eq!(names(&tree, root), vec!["g"]);
    }

    #[test]
    fn test_unclosed_elements_keep_order() {
        let tree = XmlTree::parse("<svg><a/><b/><c/>");
        let root = tree.root().unwrap();
        assert_eq!(names(&tree, root), vec!["a", "b", "c"]);
        assert_eq!(
            tree.diagnostics()[0].kind,
            DiagnosticKind::UnclosedElement("svg".into())
        );
    }

    #[test]
    fn test_empty_input() {
        let tree = XmlTree::parse("");
        assert!(tree.is_empty());
        assert_eq!(tree.root(), None);

        let tree = XmlTree::parse("just text");
        assert_eq!(tree.root(), None);
        assert_eq!(tree.diagnostics()[0].kind, DiagnosticKind::TextOutsideRoot);
    }
}
