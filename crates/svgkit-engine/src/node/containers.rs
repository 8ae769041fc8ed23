//! Attributes of `<svg>`, `<clipPath>`, `<mask>` and `<use>`.

use crate::geometry::{PreserveAspectRatio, SvgBox};
use crate::values::{
    parse_preserve_aspect_ratio, parse_view_box, FillRule, Length, Units,
};

/// The document element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SvgRoot {
    pub x: Length,
    pub y: Length,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub view_box: Option<SvgBox>,
    pub aspect: PreserveAspectRatio,
}

impl SvgRoot {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "x" => self.x = Length::parse(value),
            "y" => self.y = Length::parse(value),
            "width" => self.width = Length::try_parse(value),
            "height" => self.height = Length::try_parse(value),
            "viewBox" => self.view_box = parse_view_box(value),
            "preserveAspectRatio" => self.aspect = parse_preserve_aspect_ratio(value),
            _ => return false,
        }
        true
    }

    /// The viewBox, or an empty box when none was given.
    pub fn view_box(&self) -> SvgBox {
        self.view_box.unwrap_or_default()
    }
}

/// `<clipPath>`.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipPathNode {
    pub units: Units,
    pub clip_rule: FillRule,
}

impl Default for ClipPathNode {
    fn default() -> Self {
        Self {
            units: Units::UserSpaceOnUse,
            clip_rule: FillRule::NonZero,
        }
    }
}

impl ClipPathNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "clipPathUnits" => self.units = Units::parse(value).unwrap_or(Units::UserSpaceOnUse),
            "clip-rule" => self.clip_rule = FillRule::parse(value).unwrap_or_default(),
            _ => return false,
        }
        true
    }
}

/// `<mask>`.
///
/// The mask region (`x`, `y`, `width`, `height` with `maskUnits`) is not
/// applied; coverage is bounded by the children alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MaskNode {
    /// Units of the mask children; decides how coverage is rescaled.
    pub content_units: Units,
}

impl MaskNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "maskContentUnits" => {
                self.content_units = Units::parse(value).unwrap_or(Units::UserSpaceOnUse)
            }
            _ => return false,
        }
        true
    }
}

/// `<use>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UseNode {
    /// Target id without the `#`. Only same-document references are kept.
    pub href: Option<String>,
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
}

impl UseNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "href" | "xlink:href" => {
                self.href = value.strip_prefix('#').map(str::to_string);
            }
            "x" => self.x = Length::parse(value),
            "y" => self.y = Length::parse(value),
            "width" => self.width = Length::parse(value),
            "height" => self.height = Length::parse(value),
            _ => return false,
        }
        true
    }
}
