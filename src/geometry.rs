//! Integer pixel geometry and 2D affine transforms.
//!
//! Screen, window and sprite coordinates are whole pixels with the origin at
//! the top-left corner and `y` growing downwards. Rotation angles are degrees,
//! positive angles turn clockwise on screen.

use serde::Serialize;

/// A point in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// True when this point is `(0, 0)`.
    ///
    /// The layout code treats the origin as "placement unset".
    pub fn is_origin(&self) -> bool {
        self.x == 0 && self.y == 0
    }

    /// Translate by delta.
    pub fn offset(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// A width/height pair in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Size {
    pub w: i32,
    pub h: i32,
}

impl Size {
    pub fn new(w: i32, h: i32) -> Self {
        Self { w, h }
    }

    /// Size of an image buffer.
    pub fn of_image<I: image::GenericImageView>(image: &I) -> Self {
        let (w, h) = image.dimensions();
        Self {
            w: w as i32,
            h: h as i32,
        }
    }

    /// Scale both sides, truncating towards zero.
    pub fn scaled(self, factor: f32) -> Self {
        Self {
            w: (self.w as f32 * factor) as i32,
            h: (self.h as f32 * factor) as i32,
        }
    }

    /// The center point of a rectangle of this size anchored at the origin.
    pub fn center(self) -> Point {
        Point {
            x: self.w / 2,
            y: self.h / 2,
        }
    }
}

/// Axis-aligned rectangle in pixel coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    pub fn from_origin_size(origin: Point, size: Size) -> Self {
        Self {
            x: origin.x,
            y: origin.y,
            w: size.w,
            h: size.h,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.w, self.h)
    }

    /// True when the rectangle has positive area and lies entirely inside
    /// `bounds` anchored at the origin.
    pub fn fits_within(&self, bounds: Size) -> bool {
        self.x >= 0
            && self.y >= 0
            && self.w > 0
            && self.h > 0
            && self.x + self.w <= bounds.w
            && self.y + self.h <= bounds.h
    }
}

/// Normalize an angle in degrees to `[0, 360)`.
pub fn normalize_degrees(degrees: f32) -> f32 {
    let d = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if d >= 360.0 { 0.0 } else { d }
}

/// 2D affine transform mapping `(x, y)` to
/// `(a*x + c*y + tx, b*x + d*y + ty)`.
///
/// Operations compose the way a painter's coordinate system does: each call
/// applies in the local (already transformed) space, so
/// `translate(c).rotate(r).translate(-c)` rotates about `c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform2D {
    pub a: f32,
    pub b: f32,
    pub c: f32,
    pub d: f32,
    pub tx: f32,
    pub ty: f32,
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform2D {
    pub const IDENTITY: Transform2D = Transform2D {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        tx: 0.0,
        ty: 0.0,
    };

    /// `self ∘ other`: apply `other` first, then `self`.
    pub fn then_local(&self, other: &Transform2D) -> Transform2D {
        Transform2D {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            tx: self.a * other.tx + self.c * other.ty + self.tx,
            ty: self.b * other.tx + self.d * other.ty + self.ty,
        }
    }

    pub fn translate(&self, dx: f32, dy: f32) -> Transform2D {
        self.then_local(&Transform2D {
            tx: dx,
            ty: dy,
            ..Self::IDENTITY
        })
    }

    pub fn rotate(&self, degrees: f32) -> Transform2D {
        let (sin, cos) = degrees.to_radians().sin_cos();
        self.then_local(&Transform2D {
            a: cos,
            b: sin,
            c: -sin,
            d: cos,
            tx: 0.0,
            ty: 0.0,
        })
    }

    pub fn scale(&self, sx: f32, sy: f32) -> Transform2D {
        self.then_local(&Transform2D {
            a: sx,
            d: sy,
            ..Self::IDENTITY
        })
    }

    pub fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (
            self.a * x + self.c * y + self.tx,
            self.b * x + self.d * y + self.ty,
        )
    }

    /// Inverse transform, or `None` when the matrix is singular.
    pub fn inverse(&self) -> Option<Transform2D> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < f32::EPSILON {
            return None;
        }
        let inv = 1.0 / det;
        let a = self.d * inv;
        let b = -self.b * inv;
        let c = -self.c * inv;
        let d = self.a * inv;
        Some(Transform2D {
            a,
            b,
            c,
            d,
            tx: -(a * self.tx + c * self.ty),
            ty: -(b * self.tx + d * self.ty),
        })
    }

    /// Integer translation if this transform is a pure pixel-aligned shift.
    pub fn as_integer_translation(&self) -> Option<(i32, i32)> {
        const EPS: f32 = 1e-4;
        let aligned = (self.a - 1.0).abs() < EPS
            && self.b.abs() < EPS
            && self.c.abs() < EPS
            && (self.d - 1.0).abs() < EPS
            && (self.tx - self.tx.round()).abs() < EPS
            && (self.ty - self.ty.round()).abs() < EPS;
        aligned.then(|| (self.tx.round() as i32, self.ty.round() as i32))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn approx_eq(a: f32, b: f32) -> bool {
        (a - b).abs() < EPSILON
    }

    #[test]
    fn normalize_wraps_into_range() {
        assert!(approx_eq(normalize_degrees(0.0), 0.0));
        assert!(approx_eq(normalize_degrees(360.0), 0.0));
        assert!(approx_eq(normalize_degrees(-90.0), 270.0));
        assert!(approx_eq(normalize_degrees(450.0), 90.0));
    }

    #[test]
    fn rotate_90_turns_clockwise_on_screen() {
        let t = Transform2D::IDENTITY.rotate(90.0);
        let (x, y) = t.apply(1.0, 0.0);
        assert!(approx_eq(x, 0.0));
        assert!(approx_eq(y, 1.0));
    }

    #[test]
    fn rotation_about_center_keeps_center_fixed() {
        let t = Transform2D::IDENTITY
            .translate(50.0, 30.0)
            .rotate(37.0)
            .translate(-50.0, -30.0);
        let (x, y) = t.apply(50.0, 30.0);
        assert!(approx_eq(x, 50.0));
        assert!(approx_eq(y, 30.0));
    }

    #[test]
    fn inverse_round_trips_a_point() {
        let t = Transform2D::IDENTITY
            .translate(10.0, -4.0)
            .rotate(30.0)
            .scale(2.0, 2.0);
        let inv = t.inverse().unwrap();
        let (x, y) = t.apply(3.0, 7.0);
        let (bx, by) = inv.apply(x, y);
        assert!(approx_eq(bx, 3.0));
        assert!(approx_eq(by, 7.0));
    }

    #[test]
    fn integer_translation_detection() {
        let t = Transform2D::IDENTITY.translate(5.0, 6.0);
        assert_eq!(t.as_integer_translation(), Some((5, 6)));
        assert_eq!(
            Transform2D::IDENTITY.rotate(10.0).as_integer_translation(),
            None
        );
    }

    #[test]
    fn rect_bounds_check() {
        let bounds = Size::new(100, 50);
        assert!(Rect::new(0, 0, 100, 50).fits_within(bounds));
        assert!(!Rect::new(1, 0, 100, 50).fits_within(bounds));
        assert!(!Rect::new(-1, 0, 10, 10).fits_within(bounds));
        assert!(!Rect::new(0, 0, 0, 10).fits_within(bounds));
    }

    #[test]
    fn scaled_size_truncates() {
        assert_eq!(Size::new(1271, 255).scaled(0.2), Size::new(254, 51));
    }
}
