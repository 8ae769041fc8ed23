//! Keyword-valued attributes.

use serde::{Deserialize, Serialize};

/// `spreadMethod` on gradients.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SpreadMethod {
    #[default]
    Pad,
    Reflect,
    Repeat,
}

impl SpreadMethod {
    /// Unknown keywords fall back to `pad`.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "reflect" => SpreadMethod::Reflect,
            "repeat" => SpreadMethod::Repeat,
            _ => SpreadMethod::Pad,
        }
    }
}

/// `fill-rule` and `clip-rule`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FillRule {
    #[default]
    NonZero,
    EvenOdd,
}

impl FillRule {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "nonzero" => Some(FillRule::NonZero),
            "evenodd" => Some(FillRule::EvenOdd),
            _ => None,
        }
    }
}

/// `stroke-linecap`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    Square,
}

impl LineCap {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "butt" => Some(LineCap::Butt),
            "round" => Some(LineCap::Round),
            "square" => Some(LineCap::Square),
            _ => None,
        }
    }
}

/// `stroke-linejoin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "miter" => Some(LineJoin::Miter),
            "round" => Some(LineJoin::Round),
            "bevel" => Some(LineJoin::Bevel),
            _ => None,
        }
    }
}

/// `text-anchor`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextAnchor {
    #[default]
    Start,
    Middle,
    End,
}

impl TextAnchor {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "start" => Some(TextAnchor::Start),
            "middle" => Some(TextAnchor::Middle),
            "end" => Some(TextAnchor::End),
            _ => None,
        }
    }
}

/// Coordinate system of gradient, clip and mask content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Units {
    #[default]
    UserSpaceOnUse,
    ObjectBoundingBox,
}

impl Units {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "userSpaceOnUse" => Some(Units::UserSpaceOnUse),
            "objectBoundingBox" => Some(Units::ObjectBoundingBox),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spread_method() {
        assert_eq!(SpreadMethod::parse("reflect"), SpreadMethod::Reflect);
        assert_eq!(SpreadMethod::parse(" repeat "), SpreadMethod::Repeat);
        assert_eq!(SpreadMethod::parse("pad"), SpreadMethod::Pad);
        assert_eq!(SpreadMethod::parse("bogus"), SpreadMethod::Pad);
    }

    #[test]
    fn test_stroke_keywords() {
        assert_eq!(LineCap::parse("round"), Some(LineCap::Round));
        assert_eq!(LineCap::parse("flat"), None);
        assert_eq!(LineJoin::parse("bevel"), Some(LineJoin::Bevel));
        assert_eq!(FillRule::parse("evenodd"), Some(FillRule::EvenOdd));
    }

    #[test]
    fn test_units_and_anchor() {
        assert_eq!(
            Units::parse("objectBoundingBox"),
            Some(Units::ObjectBoundingBox)
        );
        assert_eq!(Units::parse("userspaceonuse"), None);
        assert_eq!(TextAnchor::parse("middle"), Some(TextAnchor::Middle));
    }
}
