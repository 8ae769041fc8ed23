//! XML scanner.
//!
//! Two states, toggled on `<` and `>`. The input is sliced, never copied,
//! so every name and value handed to the sink borrows from it.

use tracing::trace;

use crate::{Attribute, DiagnosticKind, XmlDiagnostic, XmlSink};

/// Scanner state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Content,
    Tag,
}

/// XML scanner.
pub struct Scanner<'a> {
    input: &'a str,
    pos: usize,
    state: State,
    /// Reused across tags.
    attrs: Vec<Attribute<'a>>,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            state: State::Content,
            attrs: Vec::new(),
        }
    }

    /// Scan the whole input, reporting events to `sink`.
    pub fn run<S: XmlSink<'a>>(mut self, sink: &mut S) {
        while self.pos < self.input.len() {
            match self.state {
                State::Content => self.scan_content(sink),
                State::Tag => self.scan_tag(sink),
            }
        }
    }

    fn scan_content<S: XmlSink<'a>>(&mut self, sink: &mut S) {
        let input = self.input;
        let rest = &input[self.pos..];
        let end = rest.find('<').unwrap_or(rest.len());

        let content = rest[..end].trim_start_matches(is_space);
        if !content.is_empty() {
            sink.text(content);
        }

        self.pos += end;
        if end < rest.len() {
            // Skip '<'
            self.pos += 1;
            self.state = State::Tag;
        }
    }

    fn scan_tag<S: XmlSink<'a>>(&mut self, sink: &mut S) {
        let input = self.input;
        let start = self.pos;
        let tag_offset = start.saturating_sub(1);
        let rest = &input[start..];
        self.state = State::Content;

        if let Some(body) = rest.strip_prefix("!--") {
            match body.find("-->") {
                Some(i) => self.pos = start + 3 + i + 3,
                None => {
                    sink.diagnostic(XmlDiagnostic::new(
                        DiagnosticKind::UnterminatedComment,
                        tag_offset,
                    ));
                    self.pos = input.len();
                }
            }
            return;
        }

        sink.location(tag_offset);
        match find_tag_end(rest) {
            Some(end) => {
                self.parse_tag(&rest[..end], tag_offset, sink);
                self.pos = start + end + 1;
            }
            None => {
                sink.diagnostic(XmlDiagnostic::new(
                    DiagnosticKind::UnterminatedTag,
                    tag_offset,
                ));
                self.pos = input.len();
            }
        }
    }

    fn parse_tag<S: XmlSink<'a>>(&mut self, tag: &'a str, offset: usize, sink: &mut S) {
        let tag = tag.trim_start_matches(is_space);

        if let Some(rest) = tag.strip_prefix('/') {
            let rest = rest.trim_start_matches(is_space);
            let name = &rest[..rest.find(is_space).unwrap_or(rest.len())];
            if !name.is_empty() {
                trace!("end tag: {}", name);
                sink.end_element(name);
            }
            return;
        }

        if tag.starts_with('?') || tag.starts_with('!') {
            return;
        }

        let name_end = tag
            .find(|c: char| is_space(c) || c == '/')
            .unwrap_or(tag.len());
        let name = &tag[..name_end];
        if name.is_empty() {
            return;
        }

        self.attrs.clear();
        let self_closing = self.parse_attributes(&tag[name_end..], offset, sink);

        trace!("start tag: {} ({} attrs)", name, self.attrs.len());
        sink.start_element(name, &self.attrs);
        if self_closing {
            sink.end_element(name);
        }
    }

    /// Collect attributes into `self.attrs`. Returns whether the tag self-closes.
    fn parse_attributes<S: XmlSink<'a>>(
        &mut self,
        mut rest: &'a str,
        offset: usize,
        sink: &mut S,
    ) -> bool {
        loop {
            rest = rest.trim_start_matches(is_space);
            if rest.is_empty() {
                return false;
            }
            if rest.starts_with('/') {
                return true;
            }

            let name_end = rest
                .find(|c: char| is_space(c) || c == '=' || c == '/')
                .unwrap_or(rest.len());
            let name = &rest[..name_end];
            rest = rest[name_end..].trim_start_matches(is_space);

            let Some(after_eq) = rest.strip_prefix('=') else {
                sink.diagnostic(XmlDiagnostic::new(
                    DiagnosticKind::MissingAttributeValue(name.to_string()),
                    offset,
                ));
                if name.is_empty() {
                    // Unparseable byte; step over it.
                    let skip = rest.chars().next().map_or(0, char::len_utf8);
                    rest = &rest[skip..];
                }
                continue;
            };
            rest = after_eq.trim_start_matches(is_space);

            let value = match rest.chars().next() {
                Some(quote @ ('"' | '\'')) => {
                    let body = &rest[1..];
                    match body.find(quote) {
                        Some(end) => {
                            rest = &body[end + 1..];
                            &body[..end]
                        }
                        None => {
                            sink.diagnostic(XmlDiagnostic::new(
                                DiagnosticKind::UnterminatedAttributeValue(name.to_string()),
                                offset,
                            ));
                            rest = "";
                            body
                        }
                    }
                }
                _ => {
                    // Unquoted value, accepted up to the next space.
                    sink.diagnostic(XmlDiagnostic::new(
                        DiagnosticKind::MissingAttributeValue(name.to_string()),
                        offset,
                    ));
                    let end = rest.find(is_space).unwrap_or(rest.len());
                    let value = &rest[..end];
                    rest = &rest[end..];
                    value
                }
            };

            if !name.is_empty() {
                self.attrs.push(Attribute::new(name, value));
            }
        }
    }
}

/// Scan `input` and report events to `sink`.
pub fn parse_xml<'a, S: XmlSink<'a>>(input: &'a str, sink: &mut S) {
    Scanner::new(input).run(sink);
}

fn is_space(c: char) -> bool {
    c.is_ascii_whitespace()
}

/// Find the `>` closing a tag, skipping quoted attribute values. Falls back
/// to the first `>` when the quotes never balance.
fn find_tag_end(rest: &str) -> Option<usize> {
    let mut quote: Option<u8> = None;
    for (i, b) in rest.bytes().enumerate() {
        match quote {
            Some(q) if b == q => quote = None,
            Some(_) => {}
            None if b == b'"' || b == b'\'' => quote = Some(b),
            None if b == b'>' => return Some(i),
            None => {}
        }
    }
    rest.find('>')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct EventSink {
        events: Vec<String>,
        diagnostics: Vec<DiagnosticKind>,
    }

    impl<'a> XmlSink<'a> for EventSink {
        fn start_element(&mut self, name: &'a str, attrs: &[Attribute<'a>]) {
            let attrs = attrs
                .iter()
                .map(|a| format!("{}={}", a.name, a.value))
                .collect::<Vec<_>>()
                .join(" ");
            if attrs.is_empty() {
                self.events.push(format!("start:{}", name));
            } else {
                self.events.push(format!("start:{}[{}]", name, attrs));
            }
        }

        fn end_element(&mut self, name: &'a str) {
            self.events.push(format!("end:{}", name));
        }

        fn text(&mut self, content: &'a str) {
            self.events.push(format!("text:{}", content));
        }

        fn diagnostic(&mut self, diagnostic: XmlDiagnostic) {
            self.diagnostics.push(diagnostic.kind);
        }
    }

    fn scan(input: &str) -> EventSink {
        let mut sink = EventSink::default();
        parse_xml(input, &mut sink);
        sink
    }

    #[test]
    fn test_simple_tag() {
        let sink = scan("<svg></svg>");
        assert_eq!(sink.events, vec!["start:svg", "end:svg"]);
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_self_closing_tag() {
        let sink = scan("<svg><rect width=\"10\"/><circle/></svg>");
        assert_eq!(
            sink.events,
            vec![
                "start:svg",
                "start:rect[width=10]",
                "end:rect",
                "start:circle",
                "end:circle",
                "end:svg"
            ]
        );
    }

    #[test]
    fn test_attributes() {
        let sink = scan(r#"<rect x = "1" y='2' fill="red"  >"#);
        assert_eq!(sink.events, vec!["start:rect[x=1 y=2 fill=red]"]);
    }

    #[test]
    fn test_quoted_gt_in_value() {
        let sink = scan(r#"<text data="a>b">hi</text>"#);
        assert_eq!(
            sink.events,
            vec!["start:text[data=a>b]", "text:hi", "end:text"]
        );
    }

    #[test]
    fn test_text_leading_whitespace_trimmed() {
        let sink = scan("<text>\n   Hello </text>");
        assert_eq!(sink.events, vec!["start:text", "text:Hello ", "end:text"]);
    }

    #[test]
    fn test_whitespace_only_text_skipped() {
        let sink = scan("<g>\n  \t\n</g>");
        assert_eq!(sink.events, vec!["start:g", "end:g"]);
    }

    #[test]
    fn test_declarations_skipped() {
        let sink = scan(
            "<?xml version=\"1.0\"?><!DOCTYPE svg><svg><!-- a <b> c --></svg>",
        );
        assert_eq!(sink.events, vec!["start:svg", "end:svg"]);
        assert!(sink.diagnostics.is_empty());
    }

    #[test]
    fn test_prefixed_attribute_names() {
        let sink = scan(r##"<use xlink:href="#a"/>"##);
        assert_eq!(sink.events, vec!["start:use[xlink:href=#a]", "end:use"]);
    }

    #[test]
    fn test_unterminated_tag() {
        let sink = scan("<svg><rect width=\"1\"");
        assert_eq!(sink.events, vec!["start:svg"]);
        assert_eq!(sink.diagnostics, vec![DiagnosticKind::UnterminatedTag]);
    }

    #[test]
    fn test_unterminated_comment() {
        let sink = scan("<svg><!-- never closed <rect/>");
        assert_eq!(sink.events, vec!["start:svg"]);
        assert_eq!(sink.diagnostics, vec![DiagnosticKind::UnterminatedComment]);
    }

    #[test]
    fn test_valueless_attribute() {
        let sink = scan(r#"<rect hidden x="3"/>"#);
        assert_eq!(sink.events, vec!["start:rect[x=3]", "end:rect"]);
        assert_eq!(
            sink.diagnostics,
            vec![DiagnosticKind::MissingAttributeValue("hidden".into())]
        );
    }

    #[test]
    fn test_unquoted_value_accepted() {
        let sink = scan("<rect x=3 y=\"4\">");
        assert_eq!(sink.events, vec!["start:rect[x=3 y=4]"]);
        assert_eq!(sink.diagnostics.len(), 1);
    }

    #[test]
    fn test_stray_text_and_garbage() {
        let sink = scan("junk < > <svg>");
        assert_eq!(sink.events, vec!["text:junk ", "start:svg"]);
    }

    #[test]
    fn test_end_tag_with_space() {
        let sink = scan("<g></g >");
        assert_eq!(sink.events, vec!["start:g", "end:g"]);
    }
}
