//! 2D point / vector primitive

use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

/// A 2D coordinate, also used as a free vector.
///
/// Points are plain values: every operation returns a new point. Equality is
/// exact floating point comparison; use [`Point::is_same`] when a tolerance
/// is needed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Create a new point
    pub const fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// The origin
    pub const ORIGIN: Point = Point::new(0.0, 0.0);

    /// Unit X vector
    pub const UNIT_X: Point = Point::new(1.0, 0.0);

    /// Unit Y vector
    pub const UNIT_Y: Point = Point::new(0.0, 1.0);

    /// Point on a circle of `radius` around `centre` at `angle` radians
    pub fn polar(centre: Point, radius: f64, angle: f64) -> Self {
        Point::new(
            centre.x + radius * angle.cos(),
            centre.y + radius * angle.sin(),
        )
    }

    /// Length of the vector from the origin
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Squared length (avoids sqrt)
    pub fn length_squared(&self) -> f64 {
        self.x * self.x + self.y * self.y
    }

    /// Unit vector in the same direction; the zero vector is returned unchanged
    pub fn normalize(&self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Point::new(self.x / len, self.y / len)
        } else {
            *self
        }
    }

    /// Dot product
    pub fn dot(&self, other: &Point) -> f64 {
        self.x * other.x + self.y * other.y
    }

    /// Scalar cross product
    pub fn cross(&self, other: &Point) -> f64 {
        self.x * other.y - self.y * other.x
    }

    /// Distance to another point
    pub fn distance(&self, other: &Point) -> f64 {
        (*self - *other).length()
    }

    /// Angle of the vector `other - self`, in radians within (-π, π]
    pub fn angle_to(&self, other: &Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Vector rotated by +90°
    pub fn perpendicular(&self) -> Self {
        Point::new(-self.y, self.x)
    }

    /// Rotate this point about `centre` by `angle` radians (counter-clockwise)
    pub fn rotate(&self, centre: Point, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        let dx = self.x - centre.x;
        let dy = self.y - centre.y;
        Point::new(
            centre.x + dx * cos - dy * sin,
            centre.y + dx * sin + dy * cos,
        )
    }

    /// Midpoint between two points
    pub fn mid_point(&self, other: &Point) -> Self {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }

    /// Linear interpolation, `t = 0` gives `self` and `t = 1` gives `other`
    pub fn lerp(&self, other: &Point, t: f64) -> Self {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }

    /// Foot of the perpendicular from `self` onto segment `start`-`end`.
    ///
    /// Returns `None` when the projection falls outside the segment span or the
    /// segment is degenerate.
    pub fn perpendicular_on_segment(&self, start: &Point, end: &Point) -> Option<Point> {
        let direction = *end - *start;
        let len_sq = direction.length_squared();
        if len_sq == 0.0 {
            return None;
        }
        let t = (*self - *start).dot(&direction) / len_sq;
        if !(0.0..=1.0).contains(&t) {
            return None;
        }
        Some(start.lerp(end, t))
    }

    /// Nearest point on segment `start`-`end`, clamped to the endpoints
    pub fn nearest_on_segment(&self, start: &Point, end: &Point) -> Point {
        let direction = *end - *start;
        let len_sq = direction.length_squared();
        if len_sq == 0.0 {
            return *start;
        }
        let t = ((*self - *start).dot(&direction) / len_sq).clamp(0.0, 1.0);
        start.lerp(end, t)
    }

    /// Approximate equality within `delta` on both axes
    pub fn is_same(&self, other: &Point, delta: f64) -> bool {
        (self.x - other.x).abs() <= delta && (self.y - other.y).abs() <= delta
    }
}

impl Add for Point {
    type Output = Point;
    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;
    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;
    fn mul(self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

impl Div<f64> for Point {
    type Output = Point;
    fn div(self, scalar: f64) -> Point {
        Point::new(self.x / scalar, self.y / scalar)
    }
}

impl Neg for Point {
    type Output = Point;
    fn neg(self) -> Point {
        Point::new(-self.x, -self.y)
    }
}

impl From<Point> for nalgebra::Vector2<f64> {
    fn from(p: Point) -> Self {
        nalgebra::Vector2::new(p.x, p.y)
    }
}

impl From<nalgebra::Vector2<f64>> for Point {
    fn from(v: nalgebra::Vector2<f64>) -> Self {
        Point::new(v.x, v.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_operations() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(4.0, 6.0);

        assert_eq!(a + b, Point::new(5.0, 8.0));
        assert_eq!(b - a, Point::new(3.0, 4.0));
        assert_eq!(a.distance(&b), 5.0);
        assert_eq!(a.dot(&b), 16.0);
        assert_eq!(-a, Point::new(-1.0, -2.0));
    }

    #[test]
    fn test_rotate_about_centre() {
        let p = Point::new(2.0, 1.0);
        let rotated = p.rotate(Point::new(1.0, 1.0), FRAC_PI_2);
        assert!(rotated.is_same(&Point::new(1.0, 2.0), 1e-12));
    }

    #[test]
    fn test_mid_point_and_lerp() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 20.0);
        assert_eq!(a.mid_point(&b), Point::new(5.0, 10.0));
        assert_eq!(a.lerp(&b, 0.25), Point::new(2.5, 5.0));
    }

    #[test]
    fn test_perpendicular_on_segment() {
        let start = Point::new(0.0, 0.0);
        let end = Point::new(10.0, 0.0);

        let foot = Point::new(5.0, 5.0).perpendicular_on_segment(&start, &end);
        assert_eq!(foot, Some(Point::new(5.0, 0.0)));

        assert_eq!(Point::new(15.0, 5.0).perpendicular_on_segment(&start, &end), None);
        assert_eq!(Point::new(15.0, 5.0).nearest_on_segment(&start, &end), end);
    }

    #[test]
    fn test_exact_equality() {
        let a = Point::new(0.1 + 0.2, 0.0);
        let b = Point::new(0.3, 0.0);
        assert_ne!(a, b);
        assert!(a.is_same(&b, 1e-9));
    }
}
