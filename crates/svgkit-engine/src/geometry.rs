//! Points, boxes, affine transforms, viewBox fitting and arc flattening
//! to cubic Béziers.

use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_4, PI};

/// Control-point distance for approximating a quarter circle with one cubic.
pub const CIRCLE_KAPPA: f32 = 0.551_915_05;

// ==================== Point & Box ====================

/// A point in user space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Reflect `self` about `center`.
    pub fn reflect_about(&self, center: Point) -> Point {
        Point::new(2.0 * center.x - self.x, 2.0 * center.y - self.y)
    }
}

/// An axis-aligned rectangle: left, top, width, height.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SvgBox {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl SvgBox {
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// True when either side has no extent.
    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    /// Smallest box containing every point, or `None` for no points.
    pub fn from_points<I: IntoIterator<Item = Point>>(points: I) -> Option<SvgBox> {
        let mut iter = points.into_iter();
        let first = iter.next()?;
        let (mut min, mut max) = (first, first);
        for p in iter {
            min.x = min.x.min(p.x);
            min.y = min.y.min(p.y);
            max.x = max.x.max(p.x);
            max.y = max.y.max(p.y);
        }
        Some(SvgBox::new(min.x, min.y, max.x - min.x, max.y - min.y))
    }

    pub fn union(&self, other: &SvgBox) -> SvgBox {
        let left = self.left.min(other.left);
        let top = self.top.min(other.top);
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        SvgBox::new(left, top, right - left, bottom - top)
    }

    /// Overlap of two boxes; an empty box at the origin when they are disjoint.
    pub fn intersect(&self, other: &SvgBox) -> SvgBox {
        let left = self.left.max(other.left);
        let top = self.top.max(other.top);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right <= left || bottom <= top {
            return SvgBox::default();
        }
        SvgBox::new(left, top, right - left, bottom - top)
    }

    pub fn corners(&self) -> [Point; 4] {
        [
            Point::new(self.left, self.top),
            Point::new(self.right(), self.top),
            Point::new(self.right(), self.bottom()),
            Point::new(self.left, self.bottom()),
        ]
    }
}

// ==================== Transform ====================

/// 2D affine transform matrix.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    /// Matrix elements [a, b, c, d, e, f]
    /// Represents: [a c e]
    ///             [b d f]
    ///             [0 0 1]
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub e: f32,
    pub f: f32,
}

impl Transform {
    pub const fn new(a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub const fn identity() -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, 0.0, 0.0)
    }

    pub const fn from_translate(tx: f32, ty: f32) -> Self {
        Self::new(1.0, 0.0, 0.0, 1.0, tx, ty)
    }

    pub const fn from_scale(sx: f32, sy: f32) -> Self {
        Self::new(sx, 0.0, 0.0, sy, 0.0, 0.0)
    }

    /// Rotation by `angle` radians.
    pub fn from_rotate(angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(cos, sin, -sin, cos, 0.0, 0.0)
    }

    /// Horizontal skew by `angle` radians.
    pub fn from_skew_x(angle: f32) -> Self {
        Self::new(1.0, 0.0, angle.tan(), 1.0, 0.0, 0.0)
    }

    /// Vertical skew by `angle` radians.
    pub fn from_skew_y(angle: f32) -> Self {
        Self::new(1.0, angle.tan(), 0.0, 1.0, 0.0, 0.0)
    }

    /// `self · translate(tx, ty)`
    pub fn translate(self, tx: f32, ty: f32) -> Self {
        self.multiply(&Self::from_translate(tx, ty))
    }

    /// `self · scale(sx, sy)`
    pub fn scale(self, sx: f32, sy: f32) -> Self {
        self.multiply(&Self::from_scale(sx, sy))
    }

    /// `self · rotate(angle)`, radians.
    pub fn rotate(self, angle: f32) -> Self {
        self.multiply(&Self::from_rotate(angle))
    }

    /// `self · other`: `other` is applied to points first.
    pub fn multiply(&self, other: &Transform) -> Self {
        Transform {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    /// `other · self`: `self` is applied to points first.
    pub fn pre_multiply(&self, other: &Transform) -> Self {
        other.multiply(self)
    }

    /// Transform a point.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::identity()
    }

    /// Inverse matrix, `None` when singular.
    pub fn inverse(&self) -> Option<Transform> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        Some(Transform {
            a: self.d * inv,
            b: -self.b * inv,
            c: -self.c * inv,
            d: self.a * inv,
            e: (self.c * self.f - self.d * self.e) * inv,
            f: (self.b * self.e - self.a * self.f) * inv,
        })
    }

    /// Bounding box of a transformed box.
    pub fn map_box(&self, rect: &SvgBox) -> SvgBox {
        SvgBox::from_points(rect.corners().iter().map(|p| self.apply(*p))).unwrap_or(*rect)
    }

    pub fn to_array(&self) -> [f32; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::identity()
    }
}

// ==================== ViewBox Fitting ====================

/// Alignment along one axis for `preserveAspectRatio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Align {
    Min,
    #[default]
    Mid,
    Max,
}

/// Scaling mode for `preserveAspectRatio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Scale {
    /// Stretch each axis independently.
    None,
    #[default]
    Meet,
    Slice,
}

/// Parsed `preserveAspectRatio`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PreserveAspectRatio {
    pub align_x: Align,
    pub align_y: Align,
    pub scale: Scale,
}

/// Transform mapping `view_box` onto `view_port`.
pub fn view_box_transform(
    view_box: &SvgBox,
    view_port: &SvgBox,
    aspect: &PreserveAspectRatio,
) -> Transform {
    let x_scale = view_port.width / view_box.width;
    let y_scale = view_port.height / view_box.height;
    let mut x_offset = -view_box.left;
    let mut y_offset = -view_box.top;

    let base = Transform::from_translate(view_port.left, view_port.top);

    if aspect.scale == Scale::None {
        return base
            .scale(x_scale, y_scale)
            .translate(x_offset, y_offset);
    }

    let scale = match aspect.scale {
        Scale::Slice => x_scale.max(y_scale),
        _ => x_scale.min(y_scale),
    };

    let leftover_x = view_box.width - view_port.width / scale;
    let leftover_y = view_box.height - view_port.height / scale;
    x_offset -= align_share(aspect.align_x, leftover_x);
    y_offset -= align_share(aspect.align_y, leftover_y);

    base.scale(scale, scale).translate(x_offset, y_offset)
}

fn align_share(align: Align, leftover: f32) -> f32 {
    match align {
        Align::Min => 0.0,
        Align::Mid => leftover / 2.0,
        Align::Max => leftover,
    }
}

// ==================== Curves ====================

/// One cubic segment: two control points and an end point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Cubic {
    pub ctrl1: Point,
    pub ctrl2: Point,
    pub to: Point,
}

/// Convert an SVG elliptical arc to cubic segments.
///
/// Uses the endpoint-to-center parameterisation; radii that cannot span
/// the endpoints are scaled up. Each segment covers at most 45 degrees.
/// Zero radii give a straight segment, coincident endpoints give nothing.
pub fn arc_to_cubics(
    from: Point,
    rx: f32,
    ry: f32,
    x_axis_rotation: f32,
    large_arc: bool,
    sweep: bool,
    to: Point,
) -> Vec<Cubic> {
    if from == to {
        return Vec::new();
    }
    let (mut rx, mut ry) = (f64::from(rx).abs(), f64::from(ry).abs());
    if rx == 0.0 || ry == 0.0 {
        return vec![Cubic {
            ctrl1: from,
            ctrl2: to,
            to,
        }];
    }

    let (x1, y1) = (f64::from(from.x), f64::from(from.y));
    let (x2, y2) = (f64::from(to.x), f64::from(to.y));
    let phi = f64::from(x_axis_rotation).to_radians();
    let (sin_phi, cos_phi) = phi.sin_cos();

    let dx2 = (x1 - x2) / 2.0;
    let dy2 = (y1 - y2) / 2.0;
    let x1p = cos_phi * dx2 + sin_phi * dy2;
    let y1p = -sin_phi * dx2 + cos_phi * dy2;

    let lambda = (x1p * x1p) / (rx * rx) + (y1p * y1p) / (ry * ry);
    if lambda > 1.0 {
        let s = lambda.sqrt();
        rx *= s;
        ry *= s;
    }

    let num = rx * rx * ry * ry - rx * rx * y1p * y1p - ry * ry * x1p * x1p;
    let den = rx * rx * y1p * y1p + ry * ry * x1p * x1p;
    let mut coef = if den == 0.0 { 0.0 } else { (num / den).max(0.0).sqrt() };
    if large_arc == sweep {
        coef = -coef;
    }
    let cxp = coef * rx * y1p / ry;
    let cyp = -coef * ry * x1p / rx;
    let cx = cos_phi * cxp - sin_phi * cyp + (x1 + x2) / 2.0;
    let cy = sin_phi * cxp + cos_phi * cyp + (y1 + y2) / 2.0;

    let theta1 = vector_angle(1.0, 0.0, (x1p - cxp) / rx, (y1p - cyp) / ry);
    let mut dtheta = vector_angle(
        (x1p - cxp) / rx,
        (y1p - cyp) / ry,
        (-x1p - cxp) / rx,
        (-y1p - cyp) / ry,
    );
    if !sweep && dtheta > 0.0 {
        dtheta -= 2.0 * PI;
    } else if sweep && dtheta < 0.0 {
        dtheta += 2.0 * PI;
    }

    let segments = (dtheta.abs() / FRAC_PI_4 - 1e-9).ceil().max(1.0) as usize;
    let delta = dtheta / segments as f64;
    let alpha = delta.sin() * ((4.0 + 3.0 * (delta / 2.0).tan().powi(2)).sqrt() - 1.0) / 3.0;

    let point_at = |t: f64| {
        let (sin_t, cos_t) = t.sin_cos();
        (
            cx + rx * cos_phi * cos_t - ry * sin_phi * sin_t,
            cy + rx * sin_phi * cos_t + ry * cos_phi * sin_t,
        )
    };
    let derivative_at = |t: f64| {
        let (sin_t, cos_t) = t.sin_cos();
        (
            -rx * cos_phi * sin_t - ry * sin_phi * cos_t,
            -rx * sin_phi * sin_t + ry * cos_phi * cos_t,
        )
    };

    let mut cubics = Vec::with_capacity(segments);
    let mut t1 = theta1;
    for i in 0..segments {
        let t2 = t1 + delta;
        let (px1, py1) = point_at(t1);
        let (dx1, dy1) = derivative_at(t1);
        let (px2, py2) = point_at(t2);
        let (dx2, dy2) = derivative_at(t2);
        let end = if i + 1 == segments {
            to
        } else {
            Point::new(px2 as f32, py2 as f32)
        };
        cubics.push(Cubic {
            ctrl1: Point::new((px1 + alpha * dx1) as f32, (py1 + alpha * dy1) as f32),
            ctrl2: Point::new((px2 - alpha * dx2) as f32, (py2 - alpha * dy2) as f32),
            to: end,
        });
        t1 = t2;
    }
    cubics
}

fn vector_angle(ux: f64, uy: f64, vx: f64, vy: f64) -> f64 {
    (ux * vy - uy * vx).atan2(ux * vx + uy * vy)
}

/// Four cubics tracing an axis-aligned ellipse clockwise from its right-most
/// point. Returns the start point and the segments.
pub fn ellipse_to_cubics(cx: f32, cy: f32, rx: f32, ry: f32) -> (Point, [Cubic; 4]) {
    let kx = rx * CIRCLE_KAPPA;
    let ky = ry * CIRCLE_KAPPA;
    let start = Point::new(cx + rx, cy);
    let segments = [
        Cubic {
            ctrl1: Point::new(cx + rx, cy + ky),
            ctrl2: Point::new(cx + kx, cy + ry),
            to: Point::new(cx, cy + ry),
        },
        Cubic {
            ctrl1: Point::new(cx - kx, cy + ry),
            ctrl2: Point::new(cx - rx, cy + ky),
            to: Point::new(cx - rx, cy),
        },
        Cubic {
            ctrl1: Point::new(cx - rx, cy - ky),
            ctrl2: Point::new(cx - kx, cy - ry),
            to: Point::new(cx, cy - ry),
        },
        Cubic {
            ctrl1: Point::new(cx + kx, cy - ry),
            ctrl2: Point::new(cx + rx, cy - ky),
            to: start,
        },
    ];
    (start, segments)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_transform_identity() {
        let t = Transform::identity();
        assert_eq!(t.apply(Point::new(10.0, 20.0)), Point::new(10.0, 20.0));
        assert!(t.is_identity());
    }

    #[test]
    fn test_transform_translate_scale() {
        let t = Transform::identity().translate(5.0, 10.0).scale(2.0, 3.0);
        // scale first, then translate
        assert_eq!(t.apply(Point::new(10.0, 20.0)), Point::new(25.0, 70.0));
    }

    #[test]
    fn test_multiply_vs_pre_multiply() {
        let t = Transform::from_translate(10.0, 0.0);
        let s = Transform::from_scale(2.0, 2.0);
        let p = Point::new(1.0, 1.0);
        assert_eq!(t.multiply(&s).apply(p), Point::new(12.0, 2.0));
        assert_eq!(t.pre_multiply(&s).apply(p), Point::new(22.0, 2.0));
    }

    #[test]
    fn test_rotate() {
        let t = Transform::from_rotate(std::f32::consts::FRAC_PI_2);
        let p = t.apply(Point::new(1.0, 0.0));
        assert!(close(p.x, 0.0) && close(p.y, 1.0));
    }

    #[test]
    fn test_inverse() {
        let t = Transform::identity().translate(3.0, 4.0).scale(2.0, 5.0);
        let inv = t.inverse().unwrap();
        let p = inv.apply(t.apply(Point::new(7.0, -2.0)));
        assert!(close(p.x, 7.0) && close(p.y, -2.0));
        assert!(Transform::from_scale(0.0, 1.0).inverse().is_none());
    }

    #[test]
    fn test_map_box() {
        let t = Transform::from_scale(2.0, -1.0);
        let b = t.map_box(&SvgBox::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(b, SvgBox::new(0.0, -10.0, 20.0, 10.0));
    }

    #[test]
    fn test_box_union() {
        let a = SvgBox::new(0.0, 0.0, 10.0, 10.0);
        let b = SvgBox::new(5.0, -5.0, 10.0, 10.0);
        assert_eq!(a.union(&b), SvgBox::new(0.0, -5.0, 15.0, 15.0));
        assert!(SvgBox::new(0.0, 0.0, 0.0, 5.0).is_empty());
    }

    #[test]
    fn test_box_intersect() {
        let a = SvgBox::new(0.0, 0.0, 10.0, 10.0);
        let b = SvgBox::new(5.0, 5.0, 10.0, 10.0);
        assert_eq!(a.intersect(&b), SvgBox::new(5.0, 5.0, 5.0, 5.0));
        assert!(a.intersect(&SvgBox::new(20.0, 20.0, 1.0, 1.0)).is_empty());
    }

    #[test]
    fn test_view_box_meet_mid() {
        let t = view_box_transform(
            &SvgBox::new(0.0, 0.0, 100.0, 100.0),
            &SvgBox::new(0.0, 0.0, 200.0, 100.0),
            &PreserveAspectRatio::default(),
        );
        assert_eq!(t.a, 1.0);
        assert_eq!(t.d, 1.0);
        assert_eq!(t.e, 50.0);
        assert_eq!(t.f, 0.0);
    }

    #[test]
    fn test_view_box_slice_and_none() {
        let vb = SvgBox::new(0.0, 0.0, 100.0, 100.0);
        let vp = SvgBox::new(0.0, 0.0, 200.0, 100.0);
        let slice = PreserveAspectRatio {
            align_x: Align::Min,
            align_y: Align::Min,
            scale: Scale::Slice,
        };
        let t = view_box_transform(&vb, &vp, &slice);
        assert_eq!((t.a, t.d, t.e, t.f), (2.0, 2.0, 0.0, 0.0));

        let stretch = PreserveAspectRatio {
            scale: Scale::None,
            ..Default::default()
        };
        let t = view_box_transform(&vb, &vp, &stretch);
        assert_eq!((t.a, t.d), (2.0, 1.0));
    }

    #[test]
    fn test_view_box_offset_origin() {
        let t = view_box_transform(
            &SvgBox::new(10.0, 20.0, 50.0, 50.0),
            &SvgBox::new(5.0, 5.0, 100.0, 100.0),
            &PreserveAspectRatio::default(),
        );
        let p = t.apply(Point::new(10.0, 20.0));
        assert_eq!(p, Point::new(5.0, 5.0));
    }

    #[test]
    fn test_arc_quarter_circle() {
        let cubics = arc_to_cubics(
            Point::new(1.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
            Point::new(0.0, 1.0),
        );
        assert_eq!(cubics.len(), 2);
        assert_eq!(cubics[1].to, Point::new(0.0, 1.0));
        let mid = cubics[0].to;
        let radius = (mid.x * mid.x + mid.y * mid.y).sqrt();
        assert!(close(radius, 1.0));
    }

    #[test]
    fn test_arc_radii_scaled_up() {
        let cubics = arc_to_cubics(
            Point::new(0.0, 0.0),
            1.0,
            1.0,
            0.0,
            false,
            true,
            Point::new(10.0, 0.0),
        );
        // Half circle of radius 5 in 45-degree pieces.
        assert_eq!(cubics.len(), 4);
        let mid = cubics[1].to;
        assert!(close(mid.x, 5.0));
        assert!(close(mid.y.abs(), 5.0));
    }

    #[test]
    fn test_arc_degenerate() {
        let p = Point::new(3.0, 3.0);
        assert!(arc_to_cubics(p, 1.0, 1.0, 0.0, false, false, p).is_empty());
        let line = arc_to_cubics(p, 0.0, 1.0, 0.0, false, false, Point::new(4.0, 4.0));
        assert_eq!(line.len(), 1);
    }

    #[test]
    fn test_ellipse_to_cubics() {
        let (start, segs) = ellipse_to_cubics(0.0, 0.0, 2.0, 1.0);
        assert_eq!(start, Point::new(2.0, 0.0));
        assert_eq!(segs[0].to, Point::new(0.0, 1.0));
        assert_eq!(segs[3].to, start);
    }
}
