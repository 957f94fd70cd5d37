//! Circle entity

use super::geometry::{nearest_snap, require_points, require_positive};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::Result;
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};
use std::f64::consts::FRAC_PI_2;

/// A circle; points are `[centre, radius reference]`.
///
/// The radius reference is kept at `centre + (radius, 0)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Circle {
    /// Common entity data
    pub common: EntityCommon,
    points: [Point; 2],
    radius: f64,
}

impl Circle {
    /// Create a circle from centre and radius
    pub fn from_center_radius(center: Point, radius: f64) -> Self {
        Circle {
            common: EntityCommon::new(),
            points: [center, center + Point::new(radius, 0.0)],
            radius,
        }
    }

    /// Build from `radius` plus `[centre]`, or from `[centre, point on circle]`
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        let radius = match data.radius {
            Some(radius) => {
                require_points(EntityKind::Circle, data, 1)?;
                radius
            }
            None => {
                require_points(EntityKind::Circle, data, 2)?;
                data.points[0].distance(&data.points[1])
            }
        };
        let radius = require_positive(EntityKind::Circle, "radius", radius)?;
        let mut circle = Circle::from_center_radius(data.points[0], radius);
        circle.common = EntityCommon::from_data(data);
        Ok(circle)
    }

    pub fn center(&self) -> Point {
        self.points[0]
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Points at 0°, 90°, 180° and 270°
    pub fn quadrants(&self) -> [Point; 4] {
        let c = self.center();
        [0.0, 1.0, 2.0, 3.0].map(|i| Point::polar(c, self.radius, i * FRAC_PI_2))
    }
}

impl Entity for Circle {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Circle
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        let c = self.center();
        let direction = if p == c { Point::UNIT_X } else { (p - c).normalize() };
        ClosestPoint::at(c + direction * self.radius, p)
    }

    fn extremes(&self) -> BoundingBox2D {
        let r = Point::new(self.radius, self.radius);
        BoundingBox2D::new(self.center() - r, self.center() + r)
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Circle {
            centre: self.center(),
            radius: self.radius,
        }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        collector.push(SnapKind::Centre, self.center());
        for q in self.quadrants() {
            collector.push(SnapKind::Quadrant, q);
        }
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("CIRCLE");
        record
            .subclass("AcDbCircle")
            .push_point(10, self.center())
            .push(40, self.radius);
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

    fn circle() -> Circle {
        Circle::from_center_radius(Point::ORIGIN, 5.0)
    }

    #[test]
    fn test_from_points_normalizes_reference() {
        let data = EntityData::with_points(vec![Point::new(1.0, 1.0), Point::new(1.0, 4.0)]);
        let circle = Circle::from_data(&data, &QuerySettings::default()).unwrap();
        assert_eq!(circle.radius(), 3.0);
        assert_eq!(circle.points()[1], Point::new(4.0, 1.0));
    }

    #[test]
    fn test_zero_radius_rejected() {
        let data = EntityData::with_points(vec![Point::ORIGIN]).radius(0.0);
        assert!(Circle::from_data(&data, &QuerySettings::default()).is_err());
    }

    #[test]
    fn test_closest_point_radial() {
        let closest = circle().closest_point(Point::new(10.0, 0.0));
        assert_eq!(closest.point, Point::new(5.0, 0.0));
        assert_eq!(closest.distance, 5.0);

        let from_centre = circle().closest_point(Point::ORIGIN);
        assert!(from_centre.found);
        assert_eq!(from_centre.distance, 5.0);
    }

    #[test]
    fn test_within_not_touched() {
        let rect = BoundingBox2D::from_corners(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
        assert!(circle().within(&rect));
        assert!(!circle().touched(&rect));
    }

    #[test]
    fn test_touched_by_partial_rect() {
        let rect = BoundingBox2D::from_corners(Point::new(3.0, -10.0), Point::new(10.0, 10.0));
        assert!(circle().touched(&rect));
        assert!(!circle().within(&rect));
    }

    #[test]
    fn test_quadrant_snaps() {
        let snaps = circle().snaps(Point::new(0.0, 5.2), 0.5, &SnapSettings::only(SnapKind::Quadrant));
        assert_eq!(snaps.len(), 1);
        assert!(snaps[0].point.is_same(&Point::new(0.0, 5.0), 1e-12));
    }
}
