//! Filled rectangle entity, stored on the wire as a SOLID

use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind, Rectangle};
use crate::error::Result;
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// A rectangle drawn filled.
///
/// Geometry is that of its outline. On the wire the corners follow the
/// SOLID convention: the third and fourth vertices are swapped, so drawing
/// order is 1-2-4-3.
#[derive(Debug, Clone, PartialEq)]
pub struct FilledRectangle {
    outline: Rectangle,
}

impl FilledRectangle {
    /// Axis-aligned filled rectangle spanned by two opposite corners
    pub fn from_corners(a: Point, b: Point) -> Self {
        FilledRectangle {
            outline: Rectangle::from_corners(a, b),
        }
    }

    /// Build from two opposite corners or four corners in drawing order
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        let mut outline = Rectangle::from_points(EntityKind::FilledRectangle, &data.points)?;
        outline.common = EntityCommon::from_data(data);
        Ok(FilledRectangle { outline })
    }

    pub fn outline(&self) -> &Rectangle {
        &self.outline
    }

    pub fn corners(&self) -> [Point; 4] {
        self.outline.corners()
    }
}

impl Entity for FilledRectangle {
    fn common(&self) -> &EntityCommon {
        &self.outline.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.outline.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::FilledRectangle
    }

    fn points(&self) -> &[Point] {
        self.outline.points()
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        self.outline.closest_point(p)
    }

    fn extremes(&self) -> BoundingBox2D {
        self.outline.extremes()
    }

    fn intersect_points(&self) -> CanonicalForm {
        self.outline.intersect_points()
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        self.outline.snaps(mouse, delta, settings)
    }

    fn dxf(&self) -> DxfRecord {
        let [a, b, c, d] = self.corners();
        let mut record = self.outline.common.record("SOLID");
        record
            .subclass("AcDbTrace")
            .push_point(10, a)
            .push_point(11, b)
            .push_point(12, d)
            .push_point(13, c);
        record
    }

    fn translate(&mut self, offset: Point) {
        self.outline.translate(offset);
    }

    fn to_data(&self) -> EntityData {
        self.outline.to_data()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solid_corner_order() {
        let filled = FilledRectangle::from_corners(Point::ORIGIN, Point::new(2.0, 1.0));
        let record = filled.dxf();
        assert_eq!(record.kind, "SOLID");
        assert_eq!((record.get_double(12), record.get_double(22)), (Some(0.0), Some(1.0)));
        assert_eq!((record.get_double(13), record.get_double(23)), (Some(2.0), Some(1.0)));
    }

    #[test]
    fn test_triangle_rejected() {
        // SOLID triangles repeat the third corner as the fourth
        let data = EntityData::with_points(vec![
            Point::new(0.0, 0.0),
            Point::new(4.0, 0.0),
            Point::new(2.0, 3.0),
            Point::new(2.0, 3.0),
        ]);
        assert!(FilledRectangle::from_data(&data, &QuerySettings::default()).is_err());
    }

    #[test]
    fn test_geometry_follows_outline() {
        let filled = FilledRectangle::from_corners(Point::ORIGIN, Point::new(2.0, 1.0));
        assert_eq!(filled.kind(), EntityKind::FilledRectangle);
        assert_eq!(filled.extremes().to_array(), [0.0, 2.0, 0.0, 1.0]);
        assert!(filled.closest_point(Point::new(1.0, -1.0)).found);
    }
}
