//! Gradients and their stops.

use crate::canvas::GradientStop;
use crate::context::RenderContext;
use crate::geometry::Transform;
use crate::values::{
    parse_color, parse_transform, Color, Length, LengthAxis, LengthUnit, SpreadMethod,
    SvgColor, Units,
};

/// `<linearGradient>`.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearGradientNode {
    pub x1: Length,
    pub y1: Length,
    pub x2: Length,
    pub y2: Length,
    pub transform: Transform,
    pub spread: SpreadMethod,
    pub units: Units,
}

impl Default for LinearGradientNode {
    fn default() -> Self {
        Self {
            x1: Length::zero(),
            y1: Length::zero(),
            x2: Length::number(1.0),
            y2: Length::zero(),
            transform: Transform::identity(),
            spread: SpreadMethod::Pad,
            units: Units::ObjectBoundingBox,
        }
    }
}

impl LinearGradientNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "x1" => self.x1 = Length::parse(value),
            "y1" => self.y1 = Length::parse(value),
            "x2" => self.x2 = Length::parse(value),
            "y2" => self.y2 = Length::parse(value),
            _ => {
                return parse_common(
                    name,
                    value,
                    &mut self.transform,
                    &mut self.spread,
                    &mut self.units,
                );
            }
        }
        true
    }
}

/// `<radialGradient>`.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialGradientNode {
    pub cx: Length,
    pub cy: Length,
    pub r: Length,
    /// Focal point; defaults to the center.
    pub fx: Option<Length>,
    pub fy: Option<Length>,
    pub transform: Transform,
    pub spread: SpreadMethod,
    pub units: Units,
}

impl Default for RadialGradientNode {
    fn default() -> Self {
        Self {
            cx: Length::number(0.5),
            cy: Length::number(0.5),
            r: Length::number(0.5),
            fx: None,
            fy: None,
            transform: Transform::identity(),
            spread: SpreadMethod::Pad,
            units: Units::ObjectBoundingBox,
        }
    }
}

impl RadialGradientNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "cx" => self.cx = Length::parse(value),
            "cy" => self.cy = Length::parse(value),
            "r" => self.r = Length::parse(value),
            "fx" => self.fx = Some(Length::parse(value)),
            "fy" => self.fy = Some(Length::parse(value)),
            _ => {
                return parse_common(
                    name,
                    value,
                    &mut self.transform,
                    &mut self.spread,
                    &mut self.units,
                );
            }
        }
        true
    }
}

fn parse_common(
    name: &str,
    value: &str,
    transform: &mut Transform,
    spread: &mut SpreadMethod,
    units: &mut Units,
) -> bool {
    match name {
        "gradientTransform" => *transform = parse_transform(value),
        "spreadMethod" => *spread = SpreadMethod::parse(value),
        // Anything other than userSpaceOnUse is the bounding box.
        "gradientUnits" => *units = Units::parse(value).unwrap_or(Units::ObjectBoundingBox),
        _ => return false,
    }
    true
}

/// `<stop>`.
#[derive(Debug, Clone, PartialEq)]
pub struct StopNode {
    pub offset: Length,
    pub color: SvgColor,
    pub opacity: Length,
}

impl Default for StopNode {
    fn default() -> Self {
        Self {
            offset: Length::zero(),
            color: SvgColor::Value(Color::BLACK),
            opacity: Length::number(1.0),
        }
    }
}

impl StopNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "offset" => self.offset = Length::parse(value),
            "stop-color" => self.color = parse_color(value),
            "stop-opacity" => {
                self.opacity = Length::try_parse(value).unwrap_or(Length::number(1.0))
            }
            _ => return false,
        }
        true
    }

    /// Resolve against `ctx`. Offset and opacity are fractions, percentages
    /// divided by 100; other units fall back to the defaults.
    /// `currentColor` stops take `current`.
    pub fn resolve(&self, ctx: &RenderContext, current: Color) -> GradientStop {
        let offset = match self.offset.unit {
            LengthUnit::Number | LengthUnit::Percent => {
                self.offset.resolve(ctx, LengthAxis::Numeric)
            }
            _ => 0.0,
        };
        let opacity = match self.opacity.unit {
            LengthUnit::Number | LengthUnit::Percent => {
                self.opacity.resolve(ctx, LengthAxis::Numeric)
            }
            _ => 1.0,
        };
        GradientStop {
            offset: offset.clamp(0.0, 1.0),
            color: self.color.value().unwrap_or(current),
            opacity: opacity.clamp(0.0, 1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_defaults() {
        let node = LinearGradientNode::default();
        assert_eq!(node.x2, Length::number(1.0));
        assert_eq!(node.units, Units::ObjectBoundingBox);
        assert_eq!(node.spread, SpreadMethod::Pad);
    }

    #[test]
    fn test_common_gradient_attributes() {
        let mut node = RadialGradientNode::default();
        assert!(node.parse_attribute("gradientUnits", "userSpaceOnUse"));
        assert!(node.parse_attribute("spreadMethod", "reflect"));
        assert!(node.parse_attribute("gradientTransform", "translate(3)"));
        assert!(node.parse_attribute("fx", "0.25"));
        assert!(!node.parse_attribute("x1", "0"));
        assert_eq!(node.units, Units::UserSpaceOnUse);
        assert_eq!(node.spread, SpreadMethod::Reflect);
        assert_eq!(node.transform.e, 3.0);
        assert_eq!(node.fx, Some(Length::number(0.25)));
        assert_eq!(node.fy, None);
    }

    #[test]
    fn test_stop_resolve() {
        let ctx = RenderContext::default();
        let mut stop = StopNode::default();
        stop.parse_attribute("offset", "50%");
        stop.parse_attribute("stop-color", "#00ff00");
        stop.parse_attribute("stop-opacity", "0.5");
        let resolved = stop.resolve(&ctx, Color::BLACK);
        assert_eq!(resolved.offset, 0.5);
        assert_eq!(resolved.color, Color::rgb(0, 255, 0));
        assert_eq!(resolved.opacity, 0.5);

        let mut stop = StopNode::default();
        stop.parse_attribute("offset", "1.7");
        stop.parse_attribute("stop-color", "currentColor");
        let resolved = stop.resolve(&ctx, Color::WHITE);
        assert_eq!(resolved.offset, 1.0);
        assert_eq!(resolved.color, Color::WHITE);
        assert_eq!(resolved.opacity, 1.0);
    }
}
