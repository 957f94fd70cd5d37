//! Arc entity

use super::geometry::{arc_closest, arc_extremes, arc_mid, nearest_snap, require_points, require_positive};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::Result;
use crate::intersect::{angle_in_span, span_sweep, CanonicalForm};
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{normalize_angle, BoundingBox2D, Point};
use std::f64::consts::FRAC_PI_2;

/// A counter-clockwise circular arc; points are `[centre, start, end]`.
///
/// The end point is kept on the radius defined by the start point.
#[derive(Debug, Clone, PartialEq)]
pub struct Arc {
    /// Common entity data
    pub common: EntityCommon,
    points: [Point; 3],
    radius: f64,
    /// Start angle in radians, in `[0, 2π)`
    start_angle: f64,
    /// End angle in radians, in `[0, 2π)`
    end_angle: f64,
}

impl Arc {
    /// Create a new arc with center, radius, and angles in radians
    pub fn from_center_radius_angles(center: Point, radius: f64, start_angle: f64, end_angle: f64) -> Self {
        let start_angle = normalize_angle(start_angle);
        let end_angle = normalize_angle(end_angle);
        Arc {
            common: EntityCommon::new(),
            points: [
                center,
                Point::polar(center, radius, start_angle),
                Point::polar(center, radius, end_angle),
            ],
            radius,
            start_angle,
            end_angle,
        }
    }

    /// Build from `radius` + degree angles and `[centre]`, or from
    /// `[centre, start, end]` swept counter-clockwise
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        let mut arc = match (data.radius, data.start_angle, data.end_angle) {
            (Some(radius), Some(start), Some(end)) => {
                require_points(EntityKind::Arc, data, 1)?;
                let radius = require_positive(EntityKind::Arc, "radius", radius)?;
                Arc::from_center_radius_angles(data.points[0], radius, start.to_radians(), end.to_radians())
            }
            _ => {
                require_points(EntityKind::Arc, data, 3)?;
                let centre = data.points[0];
                let radius = require_positive(EntityKind::Arc, "radius", centre.distance(&data.points[1]))?;
                Arc::from_center_radius_angles(
                    centre,
                    radius,
                    centre.angle_to(&data.points[1]),
                    centre.angle_to(&data.points[2]),
                )
            }
        };
        arc.common = EntityCommon::from_data(data);
        Ok(arc)
    }

    pub fn center(&self) -> Point {
        self.points[0]
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Start angle in radians
    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    /// End angle in radians
    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn start_point(&self) -> Point {
        self.points[1]
    }

    pub fn end_point(&self) -> Point {
        self.points[2]
    }

    /// Get the sweep angle (angular extent) in radians
    pub fn sweep_angle(&self) -> f64 {
        span_sweep(self.start_angle, self.end_angle)
    }

    /// Get the arc length
    pub fn arc_length(&self) -> f64 {
        self.radius * self.sweep_angle()
    }

    pub fn midpoint(&self) -> Point {
        arc_mid(self.center(), self.radius, self.start_angle, self.end_angle)
    }
}

impl Entity for Arc {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Arc
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        arc_closest(p, self.center(), self.radius, self.start_angle, self.end_angle)
    }

    fn extremes(&self) -> BoundingBox2D {
        arc_extremes(self.center(), self.radius, self.start_angle, self.end_angle)
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Arc {
            centre: self.center(),
            radius: self.radius,
            start_angle: self.start_angle,
            end_angle: self.end_angle,
        }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        collector.push(SnapKind::End, self.start_point());
        collector.push(SnapKind::End, self.end_point());
        collector.push(SnapKind::Mid, self.midpoint());
        collector.push(SnapKind::Centre, self.center());
        for i in 0..4 {
            let angle = i as f64 * FRAC_PI_2;
            if angle_in_span(angle, self.start_angle, self.end_angle) {
                collector.push(SnapKind::Quadrant, Point::polar(self.center(), self.radius, angle));
            }
        }
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("ARC");
        record
            .subclass("AcDbCircle")
            .push_point(10, self.center())
            .push(40, self.radius)
            .subclass("AcDbArc")
            .push(50, self.start_angle.to_degrees())
            .push(51, self.end_angle.to_degrees());
        record
    }

    fn translate(&mut self, offset: Point) {
        for p in self.points.iter_mut() {
            *p = *p + offset;
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.points.to_vec());
        self.common.fill_data(&mut data);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    fn quarter() -> Arc {
        Arc::from_center_radius_angles(Point::ORIGIN, 5.0, 0.0, FRAC_PI_2)
    }

    #[test]
    fn test_from_points_projects_end_onto_radius() {
        let data = EntityData::with_points(vec![Point::ORIGIN, Point::new(2.0, 0.0), Point::new(0.0, 7.0)]);
        let arc = Arc::from_data(&data, &QuerySettings::default()).unwrap();
        assert_eq!(arc.radius(), 2.0);
        assert!(arc.end_point().is_same(&Point::new(0.0, 2.0), 1e-12));
    }

    #[test]
    fn test_from_file_fields() {
        let data = EntityData::with_points(vec![Point::new(1.0, 1.0)]).radius(2.0).angles(90.0, 180.0);
        let arc = Arc::from_data(&data, &QuerySettings::default()).unwrap();
        assert!((arc.start_angle() - FRAC_PI_2).abs() < 1e-12);
        assert!(arc.start_point().is_same(&Point::new(1.0, 3.0), 1e-12));
    }

    #[test]
    fn test_closest_point_outside_span() {
        let closest = quarter().closest_point(Point::new(-10.0, -10.0));
        assert!(!closest.found);
        let inside = quarter().closest_point(Point::new(10.0, 10.0));
        assert!(inside.point.is_same(&Point::polar(Point::ORIGIN, 5.0, PI / 4.0), 1e-12));
    }

    #[test]
    fn test_extremes_wrap_through_zero() {
        let arc = Arc::from_center_radius_angles(Point::ORIGIN, 1.0, 1.5 * PI, 0.5 * PI);
        let bbox = arc.extremes();
        assert!((bbox.max.x - 1.0).abs() < 1e-12);
        assert!(bbox.min.x.abs() < 1e-12);
        assert!((arc.sweep_angle() - PI).abs() < 1e-12);
    }

    #[test]
    fn test_dxf_angles_in_degrees() {
        let record = quarter().dxf();
        assert_eq!(record.get_double(50), Some(0.0));
        assert_eq!(record.get_double(51), Some(90.0));
        assert_eq!(record.get_double(40), Some(5.0));
    }
}
