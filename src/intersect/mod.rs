//! Pairwise intersection of canonical shape forms.
//!
//! Every entity reduces itself to a [`CanonicalForm`]; [`intersect`] then
//! dispatches on the pair of forms. Points are reported in the order the
//! parametric solves produce them, with no sorting. Callers that want the
//! point nearest some origin use [`closest_intersection`].

mod pair;
pub mod rect;

use crate::types::{normalize_angle, BoundingBox2D, Point};
use nalgebra::Rotation2;
use pair::Segment;
use std::f64::consts::TAU;

pub use rect::{arc_rect, circle_rect, ellipse_rect, intersect_rect, line_rect, rect_rect};

/// Absolute tolerance for coincident points
pub const EPSILON: f64 = 1e-9;

/// Distance under which a point counts as lying on a shape
pub const ON_SHAPE_TOLERANCE: f64 = 1e-6;

/// Samples per full turn when a rotated ellipse is approximated (1° steps)
pub const ELLIPSE_SAMPLES: usize = 361;

/// Shape reduced to the parameters the intersection routines consume.
///
/// Angles are radians; arcs run counter-clockwise from `start_angle` to
/// `end_angle`, elliptical spans from `start_param` to `end_param`.
#[derive(Debug, Clone, PartialEq)]
pub enum CanonicalForm {
    Line {
        start: Point,
        end: Point,
    },
    Circle {
        centre: Point,
        radius: f64,
    },
    Arc {
        centre: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
    Ellipse {
        centre: Point,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_param: f64,
        end_param: f64,
    },
    Rectangle {
        corners: [Point; 4],
    },
    Polyline {
        points: Vec<Point>,
        closed: bool,
    },
    Point {
        point: Point,
    },
    Composite(Vec<CanonicalForm>),
}

impl CanonicalForm {
    /// Axis-aligned rectangle as a form
    pub fn from_rect(rect: &BoundingBox2D) -> Self {
        CanonicalForm::Rectangle {
            corners: rect.corners(),
        }
    }

    /// Straight segments of polyline-like forms; empty for other forms
    pub fn segments(&self) -> Vec<(Point, Point)> {
        match self {
            CanonicalForm::Line { start, end } => vec![(*start, *end)],
            CanonicalForm::Rectangle { corners } => (0..4)
                .map(|i| (corners[i], corners[(i + 1) % 4]))
                .collect(),
            CanonicalForm::Polyline { points, closed } => {
                let mut segments: Vec<(Point, Point)> =
                    points.windows(2).map(|w| (w[0], w[1])).collect();
                if *closed && points.len() > 2 {
                    segments.push((points[points.len() - 1], points[0]));
                }
                segments
            }
            _ => Vec::new(),
        }
    }

    /// Points along the boundary, sampled at 1° for curves
    pub fn sample(&self) -> Vec<Point> {
        match self {
            CanonicalForm::Line { start, end } => vec![*start, *end],
            CanonicalForm::Circle { centre, radius } => {
                sample_ellipse(*centre, *radius, *radius, 0.0, 0.0, TAU)
            }
            CanonicalForm::Arc {
                centre,
                radius,
                start_angle,
                end_angle,
            } => sample_ellipse(*centre, *radius, *radius, 0.0, *start_angle, *end_angle),
            CanonicalForm::Ellipse {
                centre,
                radius_x,
                radius_y,
                rotation,
                start_param,
                end_param,
            } => sample_ellipse(*centre, *radius_x, *radius_y, *rotation, *start_param, *end_param),
            CanonicalForm::Rectangle { corners } => corners.to_vec(),
            CanonicalForm::Polyline { points, .. } => points.clone(),
            CanonicalForm::Point { point } => vec![*point],
            CanonicalForm::Composite(parts) => parts.iter().flat_map(|p| p.sample()).collect(),
        }
    }

    /// Shortest distance from `p` to the boundary
    pub fn distance_to(&self, p: Point) -> f64 {
        match self {
            CanonicalForm::Line { start, end } => p.distance(&p.nearest_on_segment(start, end)),
            CanonicalForm::Circle { centre, radius } => (p.distance(centre) - radius).abs(),
            CanonicalForm::Arc {
                centre,
                radius,
                start_angle,
                end_angle,
            } => {
                if angle_in_span(centre.angle_to(&p), *start_angle, *end_angle) {
                    (p.distance(centre) - radius).abs()
                } else {
                    let a = Point::polar(*centre, *radius, *start_angle);
                    let b = Point::polar(*centre, *radius, *end_angle);
                    p.distance(&a).min(p.distance(&b))
                }
            }
            CanonicalForm::Ellipse { .. } => polyline_distance(&self.sample(), false, p),
            CanonicalForm::Rectangle { corners } => polyline_distance(corners, true, p),
            CanonicalForm::Polyline { points, closed } => polyline_distance(points, *closed, p),
            CanonicalForm::Point { point } => p.distance(point),
            CanonicalForm::Composite(parts) => parts
                .iter()
                .map(|part| part.distance_to(p))
                .fold(f64::INFINITY, f64::min),
        }
    }
}

/// Whether any intersection was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionStatus {
    Intersection,
    None,
}

/// Result of a pairwise intersection
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection {
    pub status: IntersectionStatus,
    pub points: Vec<Point>,
}

impl Intersection {
    /// Build a result from solved points, dropping repeats of an earlier point
    pub fn from_points(points: Vec<Point>) -> Self {
        let mut unique: Vec<Point> = Vec::with_capacity(points.len());
        for p in points {
            if !unique.iter().any(|q| q.is_same(&p, EPSILON * 1e3)) {
                unique.push(p);
            }
        }
        let status = if unique.is_empty() {
            IntersectionStatus::None
        } else {
            IntersectionStatus::Intersection
        };
        Intersection {
            status,
            points: unique,
        }
    }

    pub fn none() -> Self {
        Intersection {
            status: IntersectionStatus::None,
            points: Vec::new(),
        }
    }

    pub fn is_intersection(&self) -> bool {
        self.status == IntersectionStatus::Intersection
    }
}

/// Intersect two shapes
pub fn intersect(a: &CanonicalForm, b: &CanonicalForm) -> Intersection {
    Intersection::from_points(dispatch(a, b, false))
}

/// Intersect with the first shape extended: a line becomes infinite and an
/// arc its full circle. Used by trim/extend.
pub fn intersect_extended(a: &CanonicalForm, b: &CanonicalForm) -> Intersection {
    Intersection::from_points(dispatch(a, b, true))
}

/// The intersection point nearest `origin`
pub fn closest_intersection(origin: Point, intersection: &Intersection) -> Option<Point> {
    intersection
        .points
        .iter()
        .copied()
        .min_by(|a, b| a.distance(&origin).total_cmp(&b.distance(&origin)))
}

fn dispatch(a: &CanonicalForm, b: &CanonicalForm, extend: bool) -> Vec<Point> {
    use CanonicalForm as F;

    match (a, b) {
        (F::Composite(parts), _) => parts.iter().flat_map(|p| dispatch(p, b, extend)).collect(),
        (_, F::Composite(parts)) => parts.iter().flat_map(|p| dispatch(a, p, extend)).collect(),

        (F::Point { point }, _) => on_shape(*point, b),
        (_, F::Point { point }) => on_shape(*point, a),

        (F::Polyline { .. } | F::Rectangle { .. }, _) => a
            .segments()
            .into_iter()
            .flat_map(|(start, end)| dispatch(&F::Line { start, end }, b, false))
            .collect(),
        (_, F::Polyline { .. } | F::Rectangle { .. }) => b
            .segments()
            .into_iter()
            .flat_map(|(start, end)| dispatch(a, &F::Line { start, end }, extend))
            .collect(),

        (F::Line { start, end }, F::Line { start: s2, end: e2 }) => {
            pair::line_line(&Segment::new(*start, *end, extend), &Segment::new(*s2, *e2, false))
        }
        (F::Line { start, end }, F::Circle { centre, radius }) => {
            pair::line_circle(&Segment::new(*start, *end, extend), *centre, *radius)
        }
        (F::Circle { centre, radius }, F::Line { start, end }) => {
            pair::line_circle(&Segment::new(*start, *end, false), *centre, *radius)
        }
        (
            F::Line { start, end },
            F::Arc {
                centre,
                radius,
                start_angle,
                end_angle,
            },
        ) => pair::line_arc(
            &Segment::new(*start, *end, extend),
            *centre,
            *radius,
            *start_angle,
            *end_angle,
        ),
        (
            F::Arc {
                centre,
                radius,
                start_angle,
                end_angle,
            },
            F::Line { start, end },
        ) => {
            let segment = Segment::new(*start, *end, false);
            if extend {
                pair::line_circle(&segment, *centre, *radius)
            } else {
                pair::line_arc(&segment, *centre, *radius, *start_angle, *end_angle)
            }
        }
        (F::Line { start, end }, F::Ellipse { .. }) => {
            pair::line_ellipse(&Segment::new(*start, *end, extend), b)
        }
        (F::Ellipse { .. }, F::Line { start, end }) => {
            pair::line_ellipse(&Segment::new(*start, *end, false), a)
        }

        (F::Circle { .. } | F::Arc { .. }, F::Circle { .. } | F::Arc { .. }) => {
            let (c1, r1, span1) = circular_parts(a, extend);
            let (c2, r2, span2) = circular_parts(b, false);
            pair::circle_circle(c1, r1, c2, r2)
                .into_iter()
                .filter(|p| span_accepts(span1, c1, *p) && span_accepts(span2, c2, *p))
                .collect()
        }

        (F::Ellipse { .. }, _) => dispatch(&polygonize(a), b, false),
        (_, F::Ellipse { .. }) => dispatch(a, &polygonize(b), extend),
    }
}

fn circular_parts(form: &CanonicalForm, extend: bool) -> (Point, f64, Option<(f64, f64)>) {
    match form {
        CanonicalForm::Circle { centre, radius } => (*centre, *radius, None),
        CanonicalForm::Arc {
            centre,
            radius,
            start_angle,
            end_angle,
        } => {
            let span = if extend {
                None
            } else {
                Some((*start_angle, *end_angle))
            };
            (*centre, *radius, span)
        }
        _ => (Point::ORIGIN, 0.0, None),
    }
}

fn span_accepts(span: Option<(f64, f64)>, centre: Point, p: Point) -> bool {
    match span {
        None => true,
        Some((start, end)) => angle_in_span(centre.angle_to(&p), start, end),
    }
}

fn on_shape(point: Point, form: &CanonicalForm) -> Vec<Point> {
    if form.distance_to(point) <= ON_SHAPE_TOLERANCE {
        vec![point]
    } else {
        Vec::new()
    }
}

/// Replace an ellipse by its 1°-sampled polygon
fn polygonize(form: &CanonicalForm) -> CanonicalForm {
    let closed = match form {
        CanonicalForm::Ellipse {
            start_param,
            end_param,
            ..
        } => is_full_turn(*start_param, *end_param),
        _ => false,
    };
    CanonicalForm::Polyline {
        points: form.sample(),
        closed,
    }
}

/// Whether a span covers the whole turn
pub fn is_full_turn(start: f64, end: f64) -> bool {
    (end - start).abs() >= TAU - EPSILON
}

/// Sweep of a counter-clockwise span in `(0, 2π]`
pub fn span_sweep(start: f64, end: f64) -> f64 {
    if is_full_turn(start, end) {
        return TAU;
    }
    let sweep = normalize_angle(end - start);
    if sweep <= EPSILON {
        TAU
    } else {
        sweep
    }
}

/// Whether `angle` lies on the counter-clockwise span from `start` to `end`
pub fn angle_in_span(angle: f64, start: f64, end: f64) -> bool {
    let sweep = span_sweep(start, end);
    if sweep >= TAU {
        return true;
    }
    let tolerance = 1e-9;
    let rel = normalize_angle(angle - start);
    rel <= sweep + tolerance || rel >= TAU - tolerance
}

/// Point on a (rotated) ellipse at parameter `t`
pub fn ellipse_point(centre: Point, rx: f64, ry: f64, rotation: f64, t: f64) -> Point {
    let local = nalgebra::Vector2::new(rx * t.cos(), ry * t.sin());
    let world = Rotation2::new(rotation) * local;
    Point::new(centre.x + world.x, centre.y + world.y)
}

/// Sample an elliptical span at 1° parameter steps, end points included.
///
/// A full turn yields [`ELLIPSE_SAMPLES`] points.
pub fn sample_ellipse(centre: Point, rx: f64, ry: f64, rotation: f64, start: f64, end: f64) -> Vec<Point> {
    let sweep = span_sweep(start, end);
    let steps = ((sweep.to_degrees() - 1e-6).ceil() as usize).max(1);
    (0..=steps)
        .map(|i| {
            let t = start + sweep * i as f64 / steps as f64;
            ellipse_point(centre, rx, ry, rotation, t)
        })
        .collect()
}

fn polyline_distance(points: &[Point], closed: bool, p: Point) -> f64 {
    if points.len() == 1 {
        return p.distance(&points[0]);
    }
    let mut best = f64::INFINITY;
    for w in points.windows(2) {
        best = best.min(p.distance(&p.nearest_on_segment(&w[0], &w[1])));
    }
    if closed && points.len() > 2 {
        let last = points[points.len() - 1];
        best = best.min(p.distance(&p.nearest_on_segment(&last, &points[0])));
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> CanonicalForm {
        CanonicalForm::Line {
            start: Point::new(x1, y1),
            end: Point::new(x2, y2),
        }
    }

    #[test]
    fn test_line_line_cross() {
        let result = intersect(&line(0.0, 0.0, 10.0, 10.0), &line(0.0, 10.0, 10.0, 0.0));
        assert!(result.is_intersection());
        assert_eq!(result.points.len(), 1);
        assert!(result.points[0].is_same(&Point::new(5.0, 5.0), 1e-9));
    }

    #[test]
    fn test_line_line_disjoint() {
        let result = intersect(&line(0.0, 0.0, 1.0, 1.0), &line(0.0, 10.0, 10.0, 0.0));
        assert_eq!(result.status, IntersectionStatus::None);
        assert!(result.points.is_empty());
    }

    #[test]
    fn test_extended_line_reaches() {
        let short = line(0.0, 0.0, 1.0, 0.0);
        let wall = line(5.0, -1.0, 5.0, 1.0);
        assert!(!intersect(&short, &wall).is_intersection());
        let extended = intersect_extended(&short, &wall);
        assert!(extended.points[0].is_same(&Point::new(5.0, 0.0), 1e-9));
    }

    #[test]
    fn test_line_circle_order() {
        let circle = CanonicalForm::Circle {
            centre: Point::ORIGIN,
            radius: 5.0,
        };
        let result = intersect(&line(-10.0, 0.0, 10.0, 0.0), &circle);
        assert_eq!(result.points.len(), 2);
        assert!(result.points[0].is_same(&Point::new(-5.0, 0.0), 1e-9));
        assert!(result.points[1].is_same(&Point::new(5.0, 0.0), 1e-9));
    }

    #[test]
    fn test_arc_filters_by_span() {
        let arc = CanonicalForm::Arc {
            centre: Point::ORIGIN,
            radius: 5.0,
            start_angle: 0.0,
            end_angle: FRAC_PI_2,
        };
        let result = intersect(&line(-10.0, 0.0, 10.0, 0.0), &arc);
        assert_eq!(result.points.len(), 1);
        assert!(result.points[0].is_same(&Point::new(5.0, 0.0), 1e-9));

        let extended = intersect_extended(&arc, &line(-10.0, 0.0, 10.0, 0.0));
        assert_eq!(extended.points.len(), 2);
    }

    #[test]
    fn test_circle_circle() {
        let a = CanonicalForm::Circle {
            centre: Point::ORIGIN,
            radius: 5.0,
        };
        let b = CanonicalForm::Circle {
            centre: Point::new(8.0, 0.0),
            radius: 5.0,
        };
        let result = intersect(&a, &b);
        assert_eq!(result.points.len(), 2);
        for p in &result.points {
            assert!((p.x - 4.0).abs() < 1e-9);
            assert!((p.y.abs() - 3.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_rotated_ellipse_with_line() {
        let ellipse = CanonicalForm::Ellipse {
            centre: Point::ORIGIN,
            radius_x: 10.0,
            radius_y: 5.0,
            rotation: FRAC_PI_2,
            start_param: 0.0,
            end_param: TAU,
        };
        let result = intersect(&line(0.0, -20.0, 0.0, 20.0), &ellipse);
        assert_eq!(result.points.len(), 2);
        assert!(result.points[0].is_same(&Point::new(0.0, -10.0), 1e-9));
        assert!(result.points[1].is_same(&Point::new(0.0, 10.0), 1e-9));
    }

    #[test]
    fn test_ellipse_with_circle_is_sampled() {
        let ellipse = CanonicalForm::Ellipse {
            centre: Point::ORIGIN,
            radius_x: 10.0,
            radius_y: 5.0,
            rotation: 0.0,
            start_param: 0.0,
            end_param: TAU,
        };
        let circle = CanonicalForm::Circle {
            centre: Point::new(10.0, 0.0),
            radius: 1.0,
        };
        let result = intersect(&ellipse, &circle);
        assert_eq!(result.points.len(), 2);
        for p in &result.points {
            assert!((p.distance(&Point::new(10.0, 0.0)) - 1.0).abs() < 1e-6);
        }
    }

    #[test]
    fn test_composite_folds() {
        let composite = CanonicalForm::Composite(vec![
            line(0.0, 0.0, 10.0, 0.0),
            line(0.0, 2.0, 10.0, 2.0),
        ]);
        let result = intersect(&line(5.0, -1.0, 5.0, 3.0), &composite);
        assert_eq!(result.points.len(), 2);
        assert!(result.points[0].is_same(&Point::new(5.0, 0.0), 1e-9));
    }

    #[test]
    fn test_closest_intersection() {
        let circle = CanonicalForm::Circle {
            centre: Point::ORIGIN,
            radius: 5.0,
        };
        let result = intersect(&line(-10.0, 0.0, 10.0, 0.0), &circle);
        let nearest = closest_intersection(Point::new(9.0, 0.0), &result).unwrap();
        assert!(nearest.is_same(&Point::new(5.0, 0.0), 1e-9));
        assert!(closest_intersection(Point::ORIGIN, &Intersection::none()).is_none());
    }

    #[test]
    fn test_angle_in_span_wraps() {
        assert!(angle_in_span(0.0, 1.5 * PI, 0.5 * PI));
        assert!(!angle_in_span(PI, 1.5 * PI, 0.5 * PI));
        assert!(angle_in_span(PI, 0.0, 0.0));
    }

    #[test]
    fn test_full_sampling_count() {
        let points = sample_ellipse(Point::ORIGIN, 2.0, 1.0, 0.3, 0.0, TAU);
        assert_eq!(points.len(), ELLIPSE_SAMPLES);
    }
}
