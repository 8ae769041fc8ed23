//! Fill and stroke paint values.

use serde::{Deserialize, Serialize};

use super::color::{parse_color, SvgColor};

/// Paint value (fill, stroke, clip-path, mask).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Paint {
    /// No paint.
    None,
    /// Solid color, possibly `currentColor`.
    Color(SvgColor),
    /// `url(#id)` reference, stored without the `#`.
    Reference(String),
}

impl Paint {
    /// Parse a paint attribute.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s == "none" {
            return Paint::None;
        }
        if let Some(inner) = url_contents(s) {
            let id = inner.strip_prefix('#').unwrap_or(inner);
            return Paint::Reference(id.to_string());
        }
        Paint::Color(parse_color(s))
    }

    /// The referenced id, if this is a reference.
    pub fn reference(&self) -> Option<&str> {
        match self {
            Paint::Reference(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Paint::None)
    }
}

/// Trimmed text inside `url( ... )`, honoring nested parentheses and
/// dropping surrounding quotes.
fn url_contents(s: &str) -> Option<&str> {
    let body = s.strip_prefix("url(")?;
    let mut depth = 1usize;
    let mut end = body.len();
    for (i, c) in body.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    end = i;
                    break;
                }
            }
            _ => {}
        }
    }
    let inner = body[..end].trim();
    Some(inner.trim_matches(|c| c == '"' || c == '\''))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::values::color::Color;

    #[test]
    fn test_paint_parse() {
        assert_eq!(Paint::parse("none"), Paint::None);
        assert_eq!(
            Paint::parse("#ff0000"),
            Paint::Color(SvgColor::Value(Color::rgb(255, 0, 0)))
        );
        assert_eq!(Paint::parse("currentColor"), Paint::Color(SvgColor::Current));
    }

    #[test]
    fn test_paint_reference() {
        assert_eq!(
            Paint::parse("url(#grad1)"),
            Paint::Reference("grad1".into())
        );
        assert_eq!(
            Paint::parse("url( #a )"),
            Paint::Reference("a".into())
        );
        assert_eq!(
            Paint::parse("url('#q')"),
            Paint::Reference("q".into())
        );
        assert_eq!(Paint::parse("url(#g) red").reference(), Some("g"));
    }

    #[test]
    fn test_unclosed_url() {
        assert_eq!(Paint::parse("url(#open"), Paint::Reference("open".into()));
    }
}
