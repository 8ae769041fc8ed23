//! Lengths and their resolution to pixels.

use serde::{Deserialize, Serialize};

use super::parse_number_prefix;
use crate::context::RenderContext;

/// Unit suffix of a length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LengthUnit {
    /// No suffix, or one we don't know.
    #[default]
    Number,
    Px,
    Percent,
    Em,
    Ex,
    Pt,
    Pc,
    Mm,
    Cm,
    In,
}

impl LengthUnit {
    fn from_suffix(suffix: &str) -> Self {
        match suffix.trim() {
            "px" => LengthUnit::Px,
            "%" => LengthUnit::Percent,
            "em" => LengthUnit::Em,
            "ex" => LengthUnit::Ex,
            "pt" => LengthUnit::Pt,
            "pc" => LengthUnit::Pc,
            "mm" => LengthUnit::Mm,
            "cm" => LengthUnit::Cm,
            "in" => LengthUnit::In,
            _ => LengthUnit::Number,
        }
    }
}

/// Which side of the viewBox a percentage refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthAxis {
    Horizontal,
    Vertical,
    /// `sqrt((w² + h²) / 2)`, for radii and stroke widths.
    Diagonal,
    /// Percent of 1.
    Numeric,
}

/// A number with a unit.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Length {
    pub value: f32,
    pub unit: LengthUnit,
}

impl Length {
    pub const fn new(value: f32, unit: LengthUnit) -> Self {
        Self { value, unit }
    }

    pub const fn number(value: f32) -> Self {
        Self::new(value, LengthUnit::Number)
    }

    pub const fn px(value: f32) -> Self {
        Self::new(value, LengthUnit::Px)
    }

    pub const fn zero() -> Self {
        Self::number(0.0)
    }

    /// Parse a length, `None` when there is no leading number.
    pub fn try_parse(s: &str) -> Option<Self> {
        let (value, suffix) = parse_number_prefix(s.trim_start())?;
        Some(Self::new(value, LengthUnit::from_suffix(suffix)))
    }

    /// Parse a length; unparseable input is zero.
    pub fn parse(s: &str) -> Self {
        Self::try_parse(s).unwrap_or_default()
    }

    /// Resolve to pixels.
    pub fn resolve(&self, ctx: &RenderContext, axis: LengthAxis) -> f32 {
        let v = self.value;
        match self.unit {
            LengthUnit::Number | LengthUnit::Px => v,
            LengthUnit::Pt => v / 72.0 * ctx.dpi,
            LengthUnit::Pc => v / 6.0 * ctx.dpi,
            LengthUnit::Mm => v / 25.4 * ctx.dpi,
            LengthUnit::Cm => v / 2.54 * ctx.dpi,
            LengthUnit::In => v * ctx.dpi,
            LengthUnit::Em => v * ctx.font_size,
            LengthUnit::Ex => v * ctx.font_size * 0.52,
            LengthUnit::Percent => v / 100.0 * percent_basis(ctx, axis),
        }
    }
}

fn percent_basis(ctx: &RenderContext, axis: LengthAxis) -> f32 {
    let w = ctx.view_box.width;
    let h = ctx.view_box.height;
    match axis {
        LengthAxis::Horizontal => w,
        LengthAxis::Vertical => h,
        LengthAxis::Diagonal => ((w * w + h * h) / 2.0).sqrt(),
        LengthAxis::Numeric => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::SvgBox;

    fn ctx() -> RenderContext {
        RenderContext::new(
            96.0,
            10.0,
            SvgBox::new(0.0, 0.0, 300.0, 400.0),
            SvgBox::new(0.0, 0.0, 300.0, 400.0),
        )
    }

    #[test]
    fn test_length_parse() {
        assert_eq!(Length::parse("100"), Length::number(100.0));
        assert_eq!(Length::parse("50px"), Length::px(50.0));
        assert_eq!(Length::parse(" 50%"), Length::new(50.0, LengthUnit::Percent));
        assert_eq!(Length::parse("2em"), Length::new(2.0, LengthUnit::Em));
        assert_eq!(Length::parse("1.5in"), Length::new(1.5, LengthUnit::In));
        assert_eq!(Length::parse("3furlongs"), Length::number(3.0));
        assert_eq!(Length::parse("auto"), Length::zero());
        assert_eq!(Length::try_parse("auto"), None);
    }

    #[test]
    fn test_absolute_units() {
        let c = ctx();
        let h = LengthAxis::Horizontal;
        assert_eq!(Length::parse("72pt").resolve(&c, h), 96.0);
        assert_eq!(Length::parse("6pc").resolve(&c, h), 96.0);
        assert_eq!(Length::parse("1in").resolve(&c, h), 96.0);
        assert!((Length::parse("25.4mm").resolve(&c, h) - 96.0).abs() < 1e-3);
        assert!((Length::parse("2.54cm").resolve(&c, h) - 96.0).abs() < 1e-3);
    }

    #[test]
    fn test_font_relative_units() {
        let c = ctx();
        assert_eq!(Length::parse("2em").resolve(&c, LengthAxis::Numeric), 20.0);
        assert!((Length::parse("1ex").resolve(&c, LengthAxis::Numeric) - 5.2).abs() < 1e-5);
    }

    #[test]
    fn test_percent_axes() {
        let c = ctx();
        let pct = Length::parse("50%");
        assert_eq!(pct.resolve(&c, LengthAxis::Horizontal), 150.0);
        assert_eq!(pct.resolve(&c, LengthAxis::Vertical), 200.0);
        assert_eq!(pct.resolve(&c, LengthAxis::Numeric), 0.5);
        // sqrt((300² + 400²) / 2) = 353.55
        assert!((pct.resolve(&c, LengthAxis::Diagonal) - 176.776_7).abs() < 1e-2);
    }

    #[test]
    fn test_dpi_changes_resolution() {
        let mut c = ctx();
        c.dpi = 72.0;
        assert_eq!(Length::parse("1in").resolve(&c, LengthAxis::Horizontal), 72.0);
        assert_eq!(Length::parse("1px").resolve(&c, LengthAxis::Horizontal), 1.0);
    }
}
