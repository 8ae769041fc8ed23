//! # SVGKit XML
//!
//! A small, forgiving XML scanner and the untyped attribute tree built
//! from it.
//!
//! The scanner toggles between content and tag states on `<` and `>` and
//! reports what it finds through an [`XmlSink`]. It never fails: broken
//! markup is skipped, and anything noteworthy is reported through
//! [`XmlSink::diagnostic`] for callers that want to be strict.
//!
//! ## Limitations
//!
//! - No entity decoding (`&amp;` stays `&amp;`).
//! - No namespaces; prefixed names such as `xlink:href` are plain names.
//! - Processing instructions, doctypes and comments are skipped.

use svgkit_common::SvgKitError;
use thiserror::Error;

pub mod tokenizer;
pub mod tree;

pub use tokenizer::parse_xml;
pub use tree::{Children, XmlNode, XmlNodeId, XmlNodeKind, XmlTree};

/// A `name="value"` pair borrowed from the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: &'a str,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'a str, value: &'a str) -> Self {
        Self { name, value }
    }
}

/// Something the scanner or tree builder tolerated.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosticKind {
    #[error("unterminated tag")]
    UnterminatedTag,

    #[error("unterminated comment")]
    UnterminatedComment,

    #[error("attribute '{0}' has no quoted value")]
    MissingAttributeValue(String),

    #[error("unterminated value for attribute '{0}'")]
    UnterminatedAttributeValue(String),

    #[error("end tag </{found}> does not match <{expected}>")]
    MismatchedEndTag { expected: String, found: String },

    #[error("end tag </{0}> without an open element")]
    StrayEndTag(String),

    #[error("element <{0}> is never closed")]
    UnclosedElement(String),

    #[error("second top-level element <{0}>")]
    MultipleRoots(String),

    #[error("text outside the root element")]
    TextOutsideRoot,
}

/// A diagnostic with the byte offset it refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDiagnostic {
    pub kind: DiagnosticKind,
    pub offset: usize,
}

impl XmlDiagnostic {
    pub fn new(kind: DiagnosticKind, offset: usize) -> Self {
        Self { kind, offset }
    }

    /// Convert into the crate-wide error type.
    pub fn into_error(self) -> SvgKitError {
        SvgKitError::markup(self.kind.to_string(), self.offset)
    }
}

/// Receives scan events.
///
/// Names, attribute values and text are slices of the original input.
pub trait XmlSink<'a> {
    /// Called for `<name attrs...>` and for the opening half of `<name/>`.
    fn start_element(&mut self, name: &'a str, attrs: &[Attribute<'a>]);

    /// Called for `</name>` and for the closing half of `<name/>`.
    fn end_element(&mut self, name: &'a str);

    /// Called for non-empty content between tags, leading whitespace removed.
    fn text(&mut self, content: &'a str);

    /// Called for tolerated malformations. Ignored by default.
    fn diagnostic(&mut self, _diagnostic: XmlDiagnostic) {}

    /// Called with the byte offset of each `<` before the tag's events.
    fn location(&mut self, _offset: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostic_into_error() {
        let diag = XmlDiagnostic::new(DiagnosticKind::UnterminatedTag, 7);
        let err = diag.into_error();
        assert_eq!(err.category(), "markup");
        assert_eq!(err.to_string(), "Markup error at byte 7: unterminated tag");
    }

    #[test]
    fn test_diagnostic_messages() {
        let kind = DiagnosticKind::MismatchedEndTag {
            expected: "g".into(),
            found: "svg".into(),
        };
        assert_eq!(kind.to_string(), "end tag </svg> does not match <g>");
    }
}
