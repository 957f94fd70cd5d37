//! Geometry helpers shared by several entity variants

use super::{ClosestPoint, EntityData, EntityKind};
use crate::error::{DxfError, Result};
use crate::intersect::{angle_in_span, span_sweep};
use crate::settings::{SnapCollector, SnapKind};
use crate::types::{BoundingBox2D, Point};
use std::f64::consts::FRAC_PI_2;

/// Fail unless `data` carries at least `count` points
pub(crate) fn require_points(kind: EntityKind, data: &EntityData, count: usize) -> Result<()> {
    if data.points.len() < count {
        return Err(DxfError::invalid_entity(
            kind.name(),
            format!("needs {} points, got {}", count, data.points.len()),
        ));
    }
    Ok(())
}

/// Fail unless `value` is finite and strictly positive
pub(crate) fn require_positive(kind: EntityKind, what: &str, value: f64) -> Result<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(DxfError::invalid_entity(
            kind.name(),
            format!("{} must be positive, got {}", what, value),
        ))
    }
}

/// Foot of the perpendicular on a segment; not found outside the span
pub(crate) fn segment_closest(p: Point, start: Point, end: Point) -> ClosestPoint {
    match p.perpendicular_on_segment(&start, &end) {
        Some(foot) => ClosestPoint::at(foot, p),
        None => ClosestPoint::not_found(p),
    }
}

/// Best perpendicular foot over the edges of a point chain
pub(crate) fn chain_closest(p: Point, points: &[Point], closed: bool) -> ClosestPoint {
    let mut best = ClosestPoint::not_found(p);
    for w in points.windows(2) {
        best = best.nearer(segment_closest(p, w[0], w[1]));
    }
    if closed && points.len() > 2 {
        best = best.nearer(segment_closest(p, points[points.len() - 1], points[0]));
    }
    best
}

/// Nearest point on a densely sampled curve, clamped to the samples
pub(crate) fn sampled_closest(p: Point, samples: &[Point]) -> ClosestPoint {
    match samples {
        [] => ClosestPoint::not_found(p),
        [only] => ClosestPoint::at(*only, p),
        _ => samples
            .windows(2)
            .map(|w| ClosestPoint::at(p.nearest_on_segment(&w[0], &w[1]), p))
            .fold(ClosestPoint::not_found(p), ClosestPoint::nearer),
    }
}

/// Radial projection onto an arc; not found outside the angular span
pub(crate) fn arc_closest(p: Point, centre: Point, radius: f64, start: f64, end: f64) -> ClosestPoint {
    let angle = if p == centre { start } else { centre.angle_to(&p) };
    if angle_in_span(angle, start, end) {
        ClosestPoint::at(Point::polar(centre, radius, angle), p)
    } else {
        ClosestPoint::not_found(p)
    }
}

/// Extent of an arc: its end points plus every quadrant point it sweeps over
pub(crate) fn arc_extremes(centre: Point, radius: f64, start: f64, end: f64) -> BoundingBox2D {
    let mut bbox = BoundingBox2D::from_point(Point::polar(centre, radius, start));
    bbox.expand_to_include(Point::polar(centre, radius, end));
    for quadrant in 0..4 {
        let angle = quadrant as f64 * FRAC_PI_2;
        if angle_in_span(angle, start, end) {
            bbox.expand_to_include(Point::polar(centre, radius, angle));
        }
    }
    bbox
}

/// Midpoint of a counter-clockwise arc
pub(crate) fn arc_mid(centre: Point, radius: f64, start: f64, end: f64) -> Point {
    Point::polar(centre, radius, start + span_sweep(start, end) / 2.0)
}

/// Arc of a polyline segment with non-zero bulge.
///
/// Returns `(centre, radius, start_angle, end_angle)` oriented
/// counter-clockwise, so a negative bulge yields the span from `p1` to `p0`.
pub(crate) fn bulge_arc(p0: Point, p1: Point, bulge: f64) -> Option<(Point, f64, f64, f64)> {
    let chord = p0.distance(&p1);
    if bulge.abs() < 1e-12 || chord < 1e-12 {
        return None;
    }
    let included = 4.0 * bulge.atan();
    let radius = chord / (2.0 * (included / 2.0).sin()).abs();
    let sagitta_offset = radius * (included / 2.0).cos().abs();
    let mid = p0.mid_point(&p1);
    let normal = (p1 - p0).normalize().perpendicular();
    let side = if bulge.abs() > 1.0 { -1.0 } else { 1.0 };
    let centre = mid + normal * (sagitta_offset * side * bulge.signum());
    let (from, to) = if bulge > 0.0 { (p0, p1) } else { (p1, p0) };
    Some((centre, radius, centre.angle_to(&from), centre.angle_to(&to)))
}

/// End and midpoint snaps of a point chain
pub(crate) fn chain_snaps(collector: &mut SnapCollector<'_>, points: &[Point], closed: bool) {
    for p in points {
        collector.push(SnapKind::End, *p);
    }
    for w in points.windows(2) {
        collector.push(SnapKind::Mid, w[0].mid_point(&w[1]));
    }
    if closed && points.len() > 2 {
        collector.push(SnapKind::Mid, points[points.len() - 1].mid_point(&points[0]));
    }
}

/// Nearest snap from a closest-point result
pub(crate) fn nearest_snap(collector: &mut SnapCollector<'_>, closest: ClosestPoint) {
    if closest.found {
        collector.push(SnapKind::Nearest, closest.point);
    }
}
