//! `<text>` and `<tspan>`.

use crate::values::{Length, TextAnchor};

/// Font size used when none is given.
pub const DEFAULT_FONT_SIZE: Length = Length::px(14.0);

/// Attributes of a text container. `x`, `y` and the anchor only matter on
/// `<text>`; a `<tspan>` contributes its font size.
#[derive(Debug, Clone, PartialEq)]
pub struct TextNode {
    pub x: Length,
    pub y: Length,
    pub anchor: TextAnchor,
    pub font_size: Length,
}

impl Default for TextNode {
    fn default() -> Self {
        Self {
            x: Length::px(0.0),
            y: Length::px(0.0),
            anchor: TextAnchor::Start,
            font_size: DEFAULT_FONT_SIZE,
        }
    }
}

impl TextNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "x" => self.x = Length::parse(value),
            "y" => self.y = Length::parse(value),
            "text-anchor" => {
                if let Some(anchor) = TextAnchor::parse(value) {
                    self.anchor = anchor;
                }
            }
            "font-size" => self.font_size = Length::parse(value),
            _ => return false,
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_attributes() {
        let mut text = TextNode::default();
        assert_eq!(text.font_size, Length::px(14.0));
        text.parse_attribute("text-anchor", "middle");
        text.parse_attribute("text-anchor", "sideways");
        text.parse_attribute("font-size", "20");
        text.parse_attribute("x", "5");
        assert_eq!(text.anchor, TextAnchor::Middle);
        assert_eq!(text.font_size, Length::number(20.0));
        assert_eq!(text.x, Length::number(5.0));
        assert!(!text.parse_attribute("fill", "red"));
    }
}
