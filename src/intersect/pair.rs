//! Closed-form solvers for primitive shape pairs

use super::{angle_in_span, is_full_turn, CanonicalForm, EPSILON};
use crate::types::Point;
use nalgebra::{Matrix2, Rotation2, Vector2};

/// A line segment, optionally treated as an infinite line
#[derive(Debug, Clone, Copy)]
pub(crate) struct Segment {
    pub start: Point,
    pub end: Point,
    pub infinite: bool,
}

impl Segment {
    pub fn new(start: Point, end: Point, infinite: bool) -> Self {
        Segment { start, end, infinite }
    }

    fn direction(&self) -> Point {
        self.end - self.start
    }

    fn accepts(&self, t: f64) -> bool {
        self.infinite || (-EPSILON..=1.0 + EPSILON).contains(&t)
    }

    fn at(&self, t: f64) -> Point {
        self.start.lerp(&self.end, t)
    }
}

/// Segment/segment intersection, including the shared end points of
/// collinear overlapping segments
pub(crate) fn line_line(a: &Segment, b: &Segment) -> Vec<Point> {
    let d1 = a.direction();
    let d2 = b.direction();
    let scale = d1.length() * d2.length();
    if scale < EPSILON * EPSILON {
        return Vec::new();
    }

    let matrix = Matrix2::new(d1.x, -d2.x, d1.y, -d2.y);
    let det = matrix.determinant();
    if det.abs() <= EPSILON * scale {
        return collinear_overlap(a, b);
    }

    let rhs = Vector2::new(b.start.x - a.start.x, b.start.y - a.start.y);
    let solution = match matrix.try_inverse() {
        Some(inverse) => inverse * rhs,
        None => return Vec::new(),
    };
    let (t, u) = (solution.x, solution.y);
    if a.accepts(t) && b.accepts(u) {
        vec![a.at(t)]
    } else {
        Vec::new()
    }
}

fn collinear_overlap(a: &Segment, b: &Segment) -> Vec<Point> {
    let d1 = a.direction();
    let offset = b.start - a.start;
    if d1.cross(&offset).abs() > EPSILON * d1.length().max(1.0) {
        return Vec::new();
    }
    let mut points = Vec::new();
    let len_sq = d1.length_squared();
    for p in [b.start, b.end] {
        let t = (p - a.start).dot(&d1) / len_sq;
        if a.accepts(t) {
            points.push(p);
        }
    }
    if !a.infinite {
        let d2 = b.direction();
        let len2 = d2.length_squared();
        for p in [a.start, a.end] {
            let u = (p - b.start).dot(&d2) / len2;
            if b.accepts(u) {
                points.push(p);
            }
        }
    }
    points
}

/// Segment/circle intersection in increasing segment parameter order
pub(crate) fn line_circle(segment: &Segment, centre: Point, radius: f64) -> Vec<Point> {
    solve_unit_circle(segment, |p| (p - centre) / radius)
        .into_iter()
        .map(|t| segment.at(t))
        .collect()
}

/// Segment/arc intersection: circle solutions filtered by the arc span
pub(crate) fn line_arc(segment: &Segment, centre: Point, radius: f64, start: f64, end: f64) -> Vec<Point> {
    line_circle(segment, centre, radius)
        .into_iter()
        .filter(|p| angle_in_span(centre.angle_to(p), start, end))
        .collect()
}

/// Segment/ellipse intersection, solved in the ellipse's own frame
pub(crate) fn line_ellipse(segment: &Segment, ellipse: &CanonicalForm) -> Vec<Point> {
    let (centre, rx, ry, rotation, start, end) = match ellipse {
        CanonicalForm::Ellipse {
            centre,
            radius_x,
            radius_y,
            rotation,
            start_param,
            end_param,
        } => (*centre, *radius_x, *radius_y, *rotation, *start_param, *end_param),
        _ => return Vec::new(),
    };
    if rx <= EPSILON || ry <= EPSILON {
        return Vec::new();
    }

    let to_local = Rotation2::new(-rotation);
    let local = |p: Point| -> Point {
        let v = to_local * Vector2::new(p.x - centre.x, p.y - centre.y);
        Point::new(v.x / rx, v.y / ry)
    };
    let full = is_full_turn(start, end);

    solve_unit_circle(segment, local)
        .into_iter()
        .filter(|t| {
            if full {
                return true;
            }
            let q = local(segment.at(*t));
            angle_in_span(q.y.atan2(q.x), start, end)
        })
        .map(|t| segment.at(t))
        .collect()
}

/// Solve for segment parameters where the mapped segment meets the unit
/// circle. The mapping must be affine so parameters carry over.
fn solve_unit_circle(segment: &Segment, map: impl Fn(Point) -> Point) -> Vec<f64> {
    let p0 = map(segment.start);
    let p1 = map(segment.end);
    let d = p1 - p0;
    let a = d.length_squared();
    if a < EPSILON * EPSILON {
        return Vec::new();
    }
    let b = 2.0 * p0.dot(&d);
    let c = p0.length_squared() - 1.0;
    let disc = b * b - 4.0 * a * c;
    let tolerance = EPSILON * a.max(1.0);

    let roots = if disc < -tolerance {
        Vec::new()
    } else if disc.abs() <= tolerance {
        vec![-b / (2.0 * a)]
    } else {
        let root = disc.sqrt();
        vec![(-b - root) / (2.0 * a), (-b + root) / (2.0 * a)]
    };
    roots.into_iter().filter(|t| segment.accepts(*t)).collect()
}

/// Circle/circle intersection
pub(crate) fn circle_circle(c1: Point, r1: f64, c2: Point, r2: f64) -> Vec<Point> {
    let d = c1.distance(&c2);
    if d < EPSILON || d > r1 + r2 + EPSILON || d < (r1 - r2).abs() - EPSILON {
        return Vec::new();
    }
    let a = (r1 * r1 - r2 * r2 + d * d) / (2.0 * d);
    let h = (r1 * r1 - a * a).max(0.0).sqrt();
    let base = c1 + (c2 - c1) * (a / d);
    if h < EPSILON {
        return vec![base];
    }
    let offset = Point::new((c2.y - c1.y) * h / d, -(c2.x - c1.x) * h / d);
    vec![base + offset, base - offset]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tangent_line_circle() {
        let segment = Segment::new(Point::new(-10.0, 5.0), Point::new(10.0, 5.0), false);
        let points = line_circle(&segment, Point::ORIGIN, 5.0);
        assert_eq!(points.len(), 1);
        assert!(points[0].is_same(&Point::new(0.0, 5.0), 1e-6));
    }

    #[test]
    fn test_collinear_overlap() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), false);
        let b = Segment::new(Point::new(5.0, 0.0), Point::new(15.0, 0.0), false);
        let points = line_line(&a, &b);
        assert!(points.contains(&Point::new(5.0, 0.0)));
        assert!(points.contains(&Point::new(10.0, 0.0)));
    }

    #[test]
    fn test_parallel_lines() {
        let a = Segment::new(Point::new(0.0, 0.0), Point::new(10.0, 0.0), true);
        let b = Segment::new(Point::new(0.0, 1.0), Point::new(10.0, 1.0), false);
        assert!(line_line(&a, &b).is_empty());
    }

    #[test]
    fn test_tangent_circles() {
        let points = circle_circle(Point::ORIGIN, 2.0, Point::new(5.0, 0.0), 3.0);
        assert_eq!(points.len(), 1);
        assert!(points[0].is_same(&Point::new(2.0, 0.0), 1e-9));
    }

    #[test]
    fn test_concentric_circles() {
        assert!(circle_circle(Point::ORIGIN, 2.0, Point::ORIGIN, 3.0).is_empty());
    }
}
