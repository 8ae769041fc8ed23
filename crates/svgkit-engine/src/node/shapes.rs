//! Geometry of the basic shapes, `path` and `image`.

use crate::canvas::{CircleShape, EllipseShape, LineShape, RectShape};
use crate::context::RenderContext;
use crate::geometry::{Point, PreserveAspectRatio, SvgBox};
use crate::values::{
    parse_path_data, parse_points, parse_preserve_aspect_ratio, Length, LengthAxis, PathCommand,
};

use LengthAxis::{Diagonal, Horizontal, Vertical};

/// `<rect>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RectNode {
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
    pub rx: Option<Length>,
    pub ry: Option<Length>,
}

impl RectNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "x" => self.x = Length::parse(value),
            "y" => self.y = Length::parse(value),
            "width" => self.width = Length::parse(value),
            "height" => self.height = Length::parse(value),
            "rx" => self.rx = Some(Length::parse(value)),
            "ry" => self.ry = Some(Length::parse(value)),
            _ => return false,
        }
        true
    }

    /// Resolve to pixels. A missing or negative radius takes the other
    /// one's value, then each is clamped to half the matching side.
    pub fn resolve(&self, ctx: &RenderContext) -> RectShape {
        let width = self.width.resolve(ctx, Horizontal);
        let height = self.height.resolve(ctx, Vertical);

        let rx = self.rx.map(|l| l.resolve(ctx, Horizontal)).filter(|r| *r >= 0.0);
        let ry = self.ry.map(|l| l.resolve(ctx, Vertical)).filter(|r| *r >= 0.0);
        let (rx, ry) = match (rx, ry) {
            (Some(rx), Some(ry)) => (rx, ry),
            (Some(r), None) | (None, Some(r)) => (r, r),
            (None, None) => (0.0, 0.0),
        };

        RectShape {
            x: self.x.resolve(ctx, Horizontal),
            y: self.y.resolve(ctx, Vertical),
            width,
            height,
            rx: rx.min(width / 2.0).max(0.0),
            ry: ry.min(height / 2.0).max(0.0),
        }
    }
}

/// `<circle>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CircleNode {
    pub cx: Length,
    pub cy: Length,
    pub r: Length,
}

impl CircleNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "cx" => self.cx = Length::parse(value),
            "cy" => self.cy = Length::parse(value),
            "r" => self.r = Length::parse(value),
            _ => return false,
        }
        true
    }

    pub fn resolve(&self, ctx: &RenderContext) -> CircleShape {
        CircleShape {
            cx: self.cx.resolve(ctx, Horizontal),
            cy: self.cy.resolve(ctx, Vertical),
            r: self.r.resolve(ctx, Diagonal),
        }
    }
}

/// `<ellipse>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EllipseNode {
    pub cx: Length,
    pub cy: Length,
    pub rx: Length,
    pub ry: Length,
}

impl EllipseNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "cx" => self.cx = Length::parse(value),
            "cy" => self.cy = Length::parse(value),
            "rx" => self.rx = Length::parse(value),
            "ry" => self.ry = Length::parse(value),
            _ => return false,
        }
        true
    }

    pub fn resolve(&self, ctx: &RenderContext) -> EllipseShape {
        EllipseShape {
            cx: self.cx.resolve(ctx, Horizontal),
            cy: self.cy.resolve(ctx, Vertical),
            rx: self.rx.resolve(ctx, Horizontal),
            ry: self.ry.resolve(ctx, Vertical),
        }
    }
}

/// `<line>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LineNode {
    pub x1: Length,
    pub y1: Length,
    pub x2: Length,
    pub y2: Length,
}

impl LineNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "x1" => self.x1 = Length::parse(value),
            "y1" => self.y1 = Length::parse(value),
            "x2" => self.x2 = Length::parse(value),
            "y2" => self.y2 = Length::parse(value),
            _ => return false,
        }
        true
    }

    pub fn resolve(&self, ctx: &RenderContext) -> LineShape {
        LineShape {
            x1: self.x1.resolve(ctx, Horizontal),
            y1: self.y1.resolve(ctx, Vertical),
            x2: self.x2.resolve(ctx, Horizontal),
            y2: self.y2.resolve(ctx, Vertical),
        }
    }
}

/// `<polygon>` and `<polyline>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointsNode {
    pub points: Vec<Point>,
}

impl PointsNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        if name != "points" {
            return false;
        }
        self.points = parse_points(value);
        true
    }
}

/// `<path>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathNode {
    pub commands: Vec<PathCommand>,
}

impl PathNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        if name != "d" {
            return false;
        }
        self.commands = parse_path_data(value);
        true
    }
}

/// `<image>`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageNode {
    pub href: String,
    pub x: Length,
    pub y: Length,
    pub width: Length,
    pub height: Length,
    pub aspect: PreserveAspectRatio,
}

impl ImageNode {
    pub(crate) fn parse_attribute(&mut self, name: &str, value: &str) -> bool {
        match name {
            "href" | "xlink:href" => self.href = value.to_string(),
            "x" => self.x = Length::parse(value),
            "y" => self.y = Length::parse(value),
            "width" => self.width = Length::parse(value),
            "height" => self.height = Length::parse(value),
            "preserveAspectRatio" => self.aspect = parse_preserve_aspect_ratio(value),
            _ => return false,
        }
        true
    }

    pub fn resolve(&self, ctx: &RenderContext) -> SvgBox {
        SvgBox::new(
            self.x.resolve(ctx, Horizontal),
            self.y.resolve(ctx, Vertical),
            self.width.resolve(ctx, Horizontal),
            self.height.resolve(ctx, Vertical),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(attrs: &[(&str, &str)]) -> RectShape {
        let mut node = RectNode::default();
        for (name, value) in attrs {
            assert!(node.parse_attribute(name, value));
        }
        node.resolve(&RenderContext::default())
    }

    #[test]
    fn test_rect_without_radii() {
        let r = rect(&[("x", "1"), ("y", "2"), ("width", "30"), ("height", "40")]);
        assert_eq!((r.x, r.y, r.width, r.height), (1.0, 2.0, 30.0, 40.0));
        assert_eq!((r.rx, r.ry), (0.0, 0.0));
    }

    #[test]
    fn test_rect_radius_auto() {
        let r = rect(&[("width", "30"), ("height", "40"), ("rx", "5")]);
        assert_eq!((r.rx, r.ry), (5.0, 5.0));

        let r = rect(&[("width", "30"), ("height", "40"), ("ry", "6")]);
        assert_eq!((r.rx, r.ry), (6.0, 6.0));

        let r = rect(&[("width", "30"), ("height", "40"), ("rx", "-1"), ("ry", "3")]);
        assert_eq!((r.rx, r.ry), (3.0, 3.0));
    }

    #[test]
    fn test_rect_radius_clamped_per_axis() {
        let r = rect(&[("width", "10"), ("height", "40"), ("rx", "50"), ("ry", "50")]);
        assert_eq!((r.rx, r.ry), (5.0, 20.0));
    }

    #[test]
    fn test_circle_percent_radius_is_diagonal() {
        let mut node = CircleNode::default();
        node.parse_attribute("r", "10%");
        let ctx = RenderContext {
            view_box: SvgBox::new(0.0, 0.0, 100.0, 100.0),
            ..Default::default()
        };
        assert!((node.resolve(&ctx).r - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_points_and_path() {
        let mut poly = PointsNode::default();
        assert!(poly.parse_attribute("points", "0,0 10,0 10,10"));
        assert_eq!(poly.points.len(), 3);
        assert!(!poly.parse_attribute("d", "M0 0"));

        let mut path = PathNode::default();
        assert!(path.parse_attribute("d", "M0 0 L5 5"));
        assert_eq!(path.commands.len(), 2);
    }

    #[test]
    fn test_image_href_forms() {
        let mut image = ImageNode::default();
        image.parse_attribute("xlink:href", "a.png");
        assert_eq!(image.href, "a.png");
        image.parse_attribute("href", "b.png");
        assert_eq!(image.href, "b.png");
    }
}
