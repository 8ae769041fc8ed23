//! Scanner and tree tests over realistic SVG markup.

use svgkit_xml::{parse_xml, Attribute, DiagnosticKind, XmlDiagnostic, XmlSink, XmlTree};

#[derive(Debug, Default)]
struct TestSink {
    events: Vec<String>,
    diagnostics: Vec<XmlDiagnostic>,
}

impl<'a> XmlSink<'a> for TestSink {
    fn start_element(&mut self, name: &'a str, attrs: &[Attribute<'a>]) {
        let attr_str = attrs
            .iter()
            .map(|a| format!("{}={}", a.name, a.value))
            .collect::<Vec<_>>()
            .join(" ");
        if attr_str.is_empty() {
            self.events.push(format!("start:{}", name));
        } else {
            self.events.push(format!("start:{}[{}]", name, attr_str));
        }
    }

    fn end_element(&mut self, name: &'a str) {
        self.events.push(format!("end:{}", name));
    }

    fn text(&mut self, content: &'a str) {
        self.events.push(format!("text:{}", content.trim_end()));
    }

    fn diagnostic(&mut self, diagnostic: XmlDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

fn scan(input: &str) -> TestSink {
    let mut sink = TestSink::default();
    parse_xml(input, &mut sink);
    sink
}

#[test]
fn test_document_with_prolog_and_comments() {
    let input = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE svg PUBLIC "-//W3C//DTD SVG 1.1//EN" "http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd">
<!-- exported by a drawing tool -->
<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <!-- <rect/> inside a comment is not an element -->
  <path d="M0 0L10 10"/>
</svg>
"#;
    let sink = scan(input);
    assert_eq!(
        sink.events,
        vec![
            "start:svg[xmlns=http://www.w3.org/2000/svg viewBox=0 0 24 24]",
            "start:path[d=M0 0L10 10]",
            "end:path",
            "end:svg",
        ]
    );
    assert!(sink.diagnostics.is_empty());
}

#[test]
fn test_quoted_gt_and_single_quotes() {
    let sink = scan(r#"<svg><text style='font-family: "A>B"' x="1">a &gt; b</text></svg>"#);
    assert_eq!(
        sink.events,
        vec![
            "start:svg",
            r#"start:text[style=font-family: "A>B" x=1]"#,
            "text:a &gt; b",
            "end:text",
            "end:svg",
        ]
    );
}

#[test]
fn test_malformed_attributes_are_reported() {
    let sink = scan(r#"<svg width=10 height="5><rect/></svg>"#);
    assert!(sink
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::MissingAttributeValue("width".into())));
    assert!(sink.events[0].starts_with("start:svg[width=10"));
}

#[test]
fn test_unterminated_input() {
    let sink = scan("<svg><rect x=\"1\"");
    assert_eq!(sink.events, vec!["start:svg"]);
    assert_eq!(sink.diagnostics.len(), 1);
    assert_eq!(sink.diagnostics[0].kind, DiagnosticKind::UnterminatedTag);
    assert_eq!(sink.diagnostics[0].offset, 5);
}

#[test]
fn test_tree_shape() {
    let tree = XmlTree::parse(
        r#"<svg>
            <g id="layer">
                <rect id="a"/>
                <circle id="b"/>
            </g>
            <text>Label</text>
        </svg>"#,
    );
    assert!(tree.diagnostics().is_empty());
    let root = tree.root().unwrap();
    assert_eq!(tree.node(root).name, "svg");

    let layer = tree.first_child(root, Some("g")).unwrap();
    assert_eq!(tree.node(layer).attribute("id"), Some("layer"));
    let ids: Vec<_> = tree
        .children(layer)
        .filter_map(|c| tree.node(c).attribute("id"))
        .collect();
    assert_eq!(ids, vec!["a", "b"]);

    let text = tree.next_sibling(layer, Some("text")).unwrap();
    let label = tree.children(text).next().unwrap();
    assert!(tree.node(label).is_text());
    assert_eq!(tree.node(label).name.trim_end(), "Label");
}

#[test]
fn test_tree_recovers_from_broken_nesting() {
    let tree = XmlTree::parse("<svg><g><rect/></svg></g><circle/>");
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
            DiagnosticKind::MultipleRoots("circle".into()),
        ]
    );
    let root = tree.root().unwrap();
    assert_eq!(tree.node(root).name, "svg");
    assert_eq!(tree.children(root).count(), 1);

    let err = tree.diagnostics()[0].clone().into_error();
    assert_eq!(err.category(), "markup");
}
