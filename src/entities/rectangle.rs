//! Rectangle entity, stored on the wire as a closed four vertex LWPOLYLINE

use super::geometry::{chain_closest, chain_snaps, nearest_snap};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::{DxfError, Result};
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// A (possibly rotated) rectangle; points are its four corners
/// counter-clockwise.
#[derive(Debug, Clone, PartialEq)]
pub struct Rectangle {
    /// Common entity data
    pub common: EntityCommon,
    corners: [Point; 4],
}

impl Rectangle {
    /// Axis-aligned rectangle spanned by two opposite corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        Rectangle {
            common: EntityCommon::new(),
            corners: BoundingBox2D::from_corners(a, b).corners(),
        }
    }

    /// Rectangle through four corners in drawing order
    pub fn from_four(corners: [Point; 4]) -> Self {
        Rectangle {
            common: EntityCommon::new(),
            corners: counter_clockwise(corners),
        }
    }

    /// Build from two opposite corners or four corners
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        let mut rect = Rectangle::from_points(EntityKind::Rectangle, &data.points)?;
        rect.common = EntityCommon::from_data(data);
        Ok(rect)
    }

    pub(crate) fn from_points(kind: EntityKind, points: &[Point]) -> Result<Self> {
        let rect = match points {
            [a, b, c, d, ..] => Rectangle::from_four([*a, *b, *c, *d]),
            [a, b] => Rectangle::from_corners(*a, *b),
            _ => {
                return Err(DxfError::invalid_entity(
                    kind.name(),
                    format!("needs 2 or 4 corners, got {}", points.len()),
                ))
            }
        };
        if rect.width() <= 0.0 || rect.height() <= 0.0 {
            return Err(DxfError::invalid_entity(kind.name(), "corners are degenerate"));
        }
        if !Rectangle::is_right_angled(&rect.corners) {
            return Err(DxfError::invalid_entity(kind.name(), "corners are not right angles"));
        }
        Ok(rect)
    }

    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    /// Length of the first edge
    pub fn width(&self) -> f64 {
        self.corners[0].distance(&self.corners[1])
    }

    /// Length of the second edge
    pub fn height(&self) -> f64 {
        self.corners[1].distance(&self.corners[2])
    }

    /// Angle of the first edge in radians
    pub fn rotation(&self) -> f64 {
        self.corners[0].angle_to(&self.corners[1])
    }

    pub fn center(&self) -> Point {
        self.corners[0].mid_point(&self.corners[2])
    }

    /// Whether four points form a rectangle (all corners right angles)
    pub fn is_right_angled(points: &[Point]) -> bool {
        if points.len() != 4 {
            return false;
        }
        (0..4).all(|i| {
            let prev = points[(i + 3) % 4];
            let here = points[i];
            let next = points[(i + 1) % 4];
            let a = (prev - here).normalize();
            let b = (next - here).normalize();
            a.length() > 0.0 && b.length() > 0.0 && a.dot(&b).abs() < 1e-9
        })
    }

    pub(crate) fn write_pairs(&self, record: &mut DxfRecord) {
        record.subclass("AcDbPolyline").push(90, 4i32).push(70, 1i16);
        for corner in &self.corners {
            record.push_point(10, *corner);
        }
    }
}

/// Reverse the winding of clockwise corner lists, keeping the first corner
fn counter_clockwise(corners: [Point; 4]) -> [Point; 4] {
    let area: f64 = (0..4)
        .map(|i| corners[i].cross(&corners[(i + 1) % 4]))
        .sum();
    if area < 0.0 {
        [corners[0], corners[3], corners[2], corners[1]]
    } else {
        corners
    }
}

impl Entity for Rectangle {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Rectangle
    }

    fn points(&self) -> &[Point] {
        &self.corners
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        chain_closest(p, &self.corners, true)
    }

    fn extremes(&self) -> BoundingBox2D {
        let [a, b, c, d] = self.corners;
        let mut bbox = BoundingBox2D::from_corners(a, c);
        bbox.expand_to_include(b);
        bbox.expand_to_include(d);
        bbox
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Rectangle { corners: self.corners }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        chain_snaps(&mut collector, &self.corners, true);
        collector.push(SnapKind::Centre, self.center());
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("LWPOLYLINE");
        self.write_pairs(&mut record);
        record
    }

    fn translate(&mut self, offset: Point) {
        for p in self.corners.iter_mut() {
            *p = *p + offset;
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.corners.to_vec());
        self.common.fill_data(&mut data);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_corners_expand() {
        let rect = Rectangle::from_corners(Point::new(4.0, 3.0), Point::new(0.0, 0.0));
        assert_eq!(
            rect.points(),
            &[
                Point::new(0.0, 0.0),
                Point::new(4.0, 0.0),
                Point::new(4.0, 3.0),
                Point::new(0.0, 3.0)
            ]
        );
        assert_eq!(rect.width(), 4.0);
        assert_eq!(rect.height(), 3.0);
    }

    #[test]
    fn test_clockwise_input_reversed() {
        let rect = Rectangle::from_four([
            Point::new(0.0, 0.0),
            Point::new(0.0, 3.0),
            Point::new(4.0, 3.0),
            Point::new(4.0, 0.0),
        ]);
        assert_eq!(rect.points()[1], Point::new(4.0, 0.0));
    }

    #[test]
    fn test_degenerate_rejected() {
        let data = EntityData::with_points(vec![Point::new(1.0, 1.0), Point::new(1.0, 5.0)]);
        assert!(Rectangle::from_data(&data, &QuerySettings::default()).is_err());
    }

    #[test]
    fn test_trapezoid_rejected() {
        let data = EntityData::with_points(vec![
            Point::new(0.0, 0.0),
            Point::new(10.0, 0.0),
            Point::new(7.0, 5.0),
            Point::new(3.0, 5.0),
        ]);
        let err = Rectangle::from_data(&data, &QuerySettings::default()).unwrap_err();
        assert!(matches!(err, DxfError::InvalidEntity { .. }), "{err:?}");
    }

    #[test]
    fn test_rotated_four_corners_accepted() {
        let (sin, cos) = 30f64.to_radians().sin_cos();
        let corner = |x: f64, y: f64| Point::new(x * cos - y * sin + 5.0, x * sin + y * cos - 2.0);
        let data = EntityData::with_points(vec![
            corner(0.0, 0.0),
            corner(6.0, 0.0),
            corner(6.0, 4.0),
            corner(0.0, 4.0),
        ]);
        let rect = Rectangle::from_data(&data, &QuerySettings::default()).unwrap();
        assert!((rect.width() - 6.0).abs() < 1e-9);
        assert!((rect.height() - 4.0).abs() < 1e-9);
        assert!((rect.rotation() - 30f64.to_radians()).abs() < 1e-9);
    }

    #[test]
    fn test_right_angle_check() {
        let rect = Rectangle::from_corners(Point::ORIGIN, Point::new(2.0, 1.0));
        assert!(Rectangle::is_right_angled(rect.points()));
        let skewed = [
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(3.0, 1.0),
            Point::new(1.0, 1.0),
        ];
        assert!(!Rectangle::is_right_angled(&skewed));
    }

    #[test]
    fn test_dxf_is_closed_lwpolyline() {
        let rect = Rectangle::from_corners(Point::ORIGIN, Point::new(2.0, 1.0));
        let record = rect.dxf();
        assert_eq!(record.kind, "LWPOLYLINE");
        assert_eq!(record.count(10), 4);
        assert_eq!(record.get_double(70), Some(1.0));
    }

    #[test]
    fn test_corner_region_not_found() {
        let rect = Rectangle::from_corners(Point::ORIGIN, Point::new(1.0, 1.0));
        assert!(!rect.closest_point(Point::new(2.0, 2.0)).found);
        assert!(rect.closest_point(Point::new(0.5, 2.0)).found);
    }
}
