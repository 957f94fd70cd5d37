//! Line entity

use super::geometry::{nearest_snap, require_points, segment_closest};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::Result;
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// A line segment; points are `[start, end]`
#[derive(Debug, Clone, PartialEq)]
pub struct Line {
    /// Common entity data
    pub common: EntityCommon,
    points: [Point; 2],
}

impl Line {
    /// Create a new line between two points
    pub fn from_points(start: Point, end: Point) -> Self {
        Line {
            common: EntityCommon::new(),
            points: [start, end],
        }
    }

    /// Create a new line from coordinates
    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Line::from_points(Point::new(x1, y1), Point::new(x2, y2))
    }

    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        require_points(EntityKind::Line, data, 2)?;
        Ok(Line {
            common: EntityCommon::from_data(data),
            points: [data.points[0], data.points[1]],
        })
    }

    pub fn start(&self) -> Point {
        self.points[0]
    }

    pub fn end(&self) -> Point {
        self.points[1]
    }

    /// Get the length of the line
    pub fn length(&self) -> f64 {
        self.start().distance(&self.end())
    }

    /// Get the midpoint of the line
    pub fn midpoint(&self) -> Point {
        self.start().mid_point(&self.end())
    }
}

impl Entity for Line {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Line
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        segment_closest(p, self.start(), self.end())
    }

    fn extremes(&self) -> BoundingBox2D {
        BoundingBox2D::from_corners(self.start(), self.end())
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Line {
            start: self.start(),
            end: self.end(),
        }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        collector.push(SnapKind::End, self.start());
        collector.push(SnapKind::End, self.end());
        collector.push(SnapKind::Mid, self.midpoint());
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("LINE");
        record
            .subclass("AcDbLine")
            .push_point(10, self.start())
            .push_point(11, self.end());
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
