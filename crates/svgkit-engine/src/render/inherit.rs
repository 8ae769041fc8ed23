//! Inherited presentation values, threaded down the render recursion.

use crate::node::Inheritable;
use crate::values::{Color, Length, Paint, SvgColor};

/// Borrowed view of the inheritable slots in effect for a node.
///
/// Built fresh for each child, so siblings never see each other's values.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct InheritedStyle<'a> {
    pub fill: Option<&'a Paint>,
    pub stroke: Option<&'a Paint>,
    pub clip_path: Option<&'a Paint>,
    pub stroke_width: Option<&'a Length>,
    pub opacity: Option<f32>,
    pub fill_opacity: Option<f32>,
    pub stroke_opacity: Option<f32>,
    pub color: Option<SvgColor>,
}

impl<'a> InheritedStyle<'a> {
    /// View of values specified directly on a node.
    pub fn of(values: &'a Inheritable) -> Self {
        Self {
            fill: values.fill.as_ref(),
            stroke: values.stroke.as_ref(),
            clip_path: values.clip_path.as_ref(),
            stroke_width: values.stroke_width.as_ref(),
            opacity: values.opacity,
            fill_opacity: values.fill_opacity,
            stroke_opacity: values.stroke_opacity,
            color: values.color,
        }
    }

    /// Slot by slot, `self` where set, otherwise `below`.
    pub fn layer(self, below: InheritedStyle<'a>) -> Self {
        Self {
            fill: self.fill.or(below.fill),
            stroke: self.stroke.or(below.stroke),
            clip_path: self.clip_path.or(below.clip_path),
            stroke_width: self.stroke_width.or(below.stroke_width),
            opacity: self.opacity.or(below.opacity),
            fill_opacity: self.fill_opacity.or(below.fill_opacity),
            stroke_opacity: self.stroke_opacity.or(below.stroke_opacity),
            color: self.color.or(below.color),
        }
    }

    /// What a parent hands to one child: the parent's own values, then what
    /// the parent inherited, then the child's build-time seed.
    pub fn for_child(
        parent_own: &'a Inheritable,
        inherited: InheritedStyle<'a>,
        child_seed: &'a Inheritable,
    ) -> Self {
        Self::of(parent_own)
            .layer(inherited)
            .layer(Self::of(child_seed))
    }

    /// The concrete color `currentColor` stands for.
    pub fn current_color(&self) -> Color {
        self.color.and_then(|c| c.value()).unwrap_or(Color::BLACK)
    }

    /// Resolve a paint color, substituting `currentColor`.
    pub fn resolve_color(&self, color: SvgColor) -> Color {
        color.value().unwrap_or_else(|| self.current_color())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn red() -> Paint {
        Paint::Color(SvgColor::Value(Color::rgb(255, 0, 0)))
    }

    #[test]
    fn test_parent_own_wins() {
        let parent = Inheritable {
            fill: Some(red()),
            ..Default::default()
        };
        let grand = Inheritable {
            fill: Some(Paint::None),
            opacity: Some(0.5),
            ..Default::default()
        };
        let seed = Inheritable::default();
        let inherited = InheritedStyle::of(&grand);
        let child = InheritedStyle::for_child(&parent, inherited, &seed);
        assert_eq!(child.fill, Some(&red()));
        assert_eq!(child.opacity, Some(0.5));
    }

    #[test]
    fn test_seed_is_last_resort() {
        let empty = Inheritable::default();
        let seed = Inheritable {
            stroke_width: Some(Length::px(3.0)),
            fill: Some(red()),
            ..Default::default()
        };
        let lender = Inheritable {
            fill: Some(Paint::None),
            ..Default::default()
        };
        let child = InheritedStyle::for_child(&lender, InheritedStyle::default(), &seed);
        assert_eq!(child.fill, Some(&Paint::None));
        assert_eq!(child.stroke_width, Some(&Length::px(3.0)));

        let child = InheritedStyle::for_child(&empty, InheritedStyle::default(), &empty);
        assert_eq!(child, InheritedStyle::default());
    }

    #[test]
    fn test_current_color() {
        let green = Inheritable {
            color: Some(SvgColor::Value(Color::rgb(0, 128, 0))),
            ..Default::default()
        };
        let style = InheritedStyle::of(&green);
        assert_eq!(style.resolve_color(SvgColor::Current), Color::rgb(0, 128, 0));
        assert_eq!(
            InheritedStyle::default().resolve_color(SvgColor::Current),
            Color::BLACK
        );
        assert_eq!(
            style.resolve_color(SvgColor::Value(Color::WHITE)),
            Color::WHITE
        );
    }
}
