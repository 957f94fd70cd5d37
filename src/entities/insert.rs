//! Insert entity (block reference)

use super::geometry::require_points;
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::{DxfError, Result};
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// A placement of a named block; points are `[insertion]`.
///
/// An insert owns no geometry. On its own it behaves as a point at the
/// insertion; [`crate::scene::Scene::explode_insert`] yields the referenced
/// block's children in world coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    /// Common entity data
    pub common: EntityCommon,
    block_name: String,
    points: [Point; 1],
    scale_x: f64,
    scale_y: f64,
    rotation: f64,
}

impl Insert {
    /// Unscaled, unrotated reference to `block_name` at `insertion`
    pub fn new(block_name: impl Into<String>, insertion: Point) -> Self {
        Insert {
            common: EntityCommon::new(),
            block_name: block_name.into(),
            points: [insertion],
            scale_x: 1.0,
            scale_y: 1.0,
            rotation: 0.0,
        }
    }

    /// Builder: scale factors
    pub fn with_scale(mut self, x: f64, y: f64) -> Self {
        self.scale_x = x;
        self.scale_y = y;
        self
    }

    /// Builder: rotation in radians
    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }

    /// Build from block name (2), insertion (10), scale (41/42) and rotation
    /// in degrees (50)
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        require_points(EntityKind::Insert, data, 1)?;
        let block_name = match data.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => {
                return Err(DxfError::invalid_entity(
                    EntityKind::Insert.name(),
                    "insert does not name a block",
                ))
            }
        };
        let (scale_x, scale_y) = data.scale.unwrap_or((1.0, 1.0));
        if scale_x == 0.0 || scale_y == 0.0 || !scale_x.is_finite() || !scale_y.is_finite() {
            return Err(DxfError::invalid_entity(
                EntityKind::Insert.name(),
                format!("invalid scale {} x {}", scale_x, scale_y),
            ));
        }
        Ok(Insert {
            common: EntityCommon::from_data(data),
            block_name,
            points: [data.points[0]],
            scale_x,
            scale_y,
            rotation: data.rotation.unwrap_or(0.0).to_radians(),
        })
    }

    pub fn block_name(&self) -> &str {
        &self.block_name
    }

    pub fn insertion(&self) -> Point {
        self.points[0]
    }

    pub fn scale(&self) -> (f64, f64) {
        (self.scale_x, self.scale_y)
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    /// Whether the placement reverses orientation
    pub fn is_mirrored(&self) -> bool {
        self.scale_x * self.scale_y < 0.0
    }

    /// Map a point from block coordinates (relative to `base`) to world
    /// coordinates
    pub fn transform(&self, base: Point, p: Point) -> Point {
        let local = p - base;
        let scaled = Point::new(local.x * self.scale_x, local.y * self.scale_y);
        self.points[0] + scaled.rotate(Point::ORIGIN, self.rotation)
    }
}

impl Entity for Insert {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Insert
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        ClosestPoint::at(self.points[0], p)
    }

    fn extremes(&self) -> BoundingBox2D {
        BoundingBox2D::from_point(self.points[0])
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Point { point: self.points[0] }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        collector.push(SnapKind::End, self.points[0]);
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("INSERT");
        record
            .subclass("AcDbBlockReference")
            .push(2, self.block_name.as_str())
            .push_point(10, self.points[0]);
        if self.scale_x != 1.0 {
            record.push(41, self.scale_x);
        }
        if self.scale_y != 1.0 {
            record.push(42, self.scale_y);
        }
        if self.rotation != 0.0 {
            record.push(50, self.rotation.to_degrees());
        }
        record
    }

    fn translate(&mut self, offset: Point) {
        self.points[0] = self.points[0] + offset;
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.points.to_vec())
            .name(self.block_name.clone())
            .rotation(self.rotation.to_degrees());
        data.scale = Some((self.scale_x, self.scale_y));
        self.common.fill_data(&mut data);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_point_like_contract() {
        let insert = Insert::new("A", Point::new(2.0, 3.0));
        let closest = insert.closest_point(Point::new(5.0, 7.0));
        assert_eq!(closest.point, Point::new(2.0, 3.0));
        assert_eq!(closest.distance, 5.0);
        assert_eq!(insert.extremes().to_array(), [2.0, 2.0, 3.0, 3.0]);
        assert_eq!(insert.intersect_points(), CanonicalForm::Point { point: Point::new(2.0, 3.0) });
    }

    #[test]
    fn test_transform() {
        let insert = Insert::new("A", Point::new(10.0, 0.0))
            .with_scale(2.0, 2.0)
            .with_rotation(FRAC_PI_2);
        let world = insert.transform(Point::new(1.0, 0.0), Point::new(2.0, 0.0));
        assert!(world.is_same(&Point::new(10.0, 2.0), 1e-12));
    }

    #[test]
    fn test_requires_block_name() {
        let data = EntityData::with_points(vec![Point::ORIGIN]);
        assert!(Insert::from_data(&data, &QuerySettings::default()).is_err());
        let mut data = data.name("A");
        data.scale = Some((0.0, 1.0));
        assert!(Insert::from_data(&data, &QuerySettings::default()).is_err());
    }

    #[test]
    fn test_dxf_omits_defaults() {
        let record = Insert::new("A", Point::ORIGIN).dxf();
        assert_eq!(record.get_str(2), Some("A"));
        assert!(record.get(41).is_none());
        assert!(record.get(50).is_none());
        let record = Insert::new("A", Point::ORIGIN).with_scale(-1.0, 1.0).dxf();
        assert_eq!(record.get_double(41), Some(-1.0));
    }
}
