//! Ellipse entity (full ellipse or elliptical arc)

use super::geometry::{nearest_snap, require_points, require_positive, sampled_closest};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::Result;
use crate::intersect::{angle_in_span, ellipse_point, is_full_turn, sample_ellipse, CanonicalForm};
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{normalize_angle, BoundingBox2D, Point};
use std::f64::consts::{FRAC_PI_2, TAU};

/// A rotated ellipse; points are `[centre, major axis end, minor axis end]`.
///
/// Axes are normalized so `radius_x >= radius_y`; `rotation` is the angle of
/// the major axis and is fixed at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Ellipse {
    /// Common entity data
    pub common: EntityCommon,
    points: [Point; 3],
    radius_x: f64,
    radius_y: f64,
    rotation: f64,
    start_param: f64,
    end_param: f64,
}

impl Ellipse {
    /// Create a full ellipse
    pub fn new(center: Point, radius_x: f64, radius_y: f64, rotation: f64) -> Self {
        Ellipse::with_params(center, radius_x, radius_y, rotation, 0.0, TAU)
    }

    /// Create an elliptical arc running from `start_param` to `end_param`
    pub fn with_params(
        center: Point,
        radius_x: f64,
        radius_y: f64,
        rotation: f64,
        start_param: f64,
        end_param: f64,
    ) -> Self {
        let (mut rx, mut ry, mut rotation) = (radius_x, radius_y, rotation);
        let (mut start, mut end) = (start_param, end_param);
        if ry > rx {
            std::mem::swap(&mut rx, &mut ry);
            rotation += FRAC_PI_2;
            start -= FRAC_PI_2;
            end -= FRAC_PI_2;
        }
        let rotation = normalize_angle(rotation);
        let (start, end) = if is_full_turn(start, end) {
            (0.0, TAU)
        } else {
            (normalize_angle(start), normalize_angle(end))
        };
        Ellipse {
            common: EntityCommon::new(),
            points: [
                center,
                Point::polar(center, rx, rotation),
                Point::polar(center, ry, rotation + FRAC_PI_2),
            ],
            radius_x: rx,
            radius_y: ry,
            rotation,
            start_param: start,
            end_param: end,
        }
    }

    /// Build from `[centre, major axis vector]` + `ratio` (wire form), or from
    /// `[centre, major axis end, minor axis reference]`
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        let start = data.start_param.unwrap_or(0.0);
        let end = data.end_param.unwrap_or(TAU);
        let mut ellipse = match data.ratio {
            Some(ratio) => {
                require_points(EntityKind::Ellipse, data, 2)?;
                let axis = data.points[1];
                let rx = require_positive(EntityKind::Ellipse, "major axis", axis.length())?;
                let ry = require_positive(EntityKind::Ellipse, "axis ratio", ratio)? * rx;
                Ellipse::with_params(data.points[0], rx, ry, axis.y.atan2(axis.x), start, end)
            }
            None => {
                require_points(EntityKind::Ellipse, data, 3)?;
                let centre = data.points[0];
                let major = data.points[1] - centre;
                let rx = require_positive(EntityKind::Ellipse, "major axis", major.length())?;
                let ry = major.normalize().cross(&(data.points[2] - centre)).abs();
                let ry = require_positive(EntityKind::Ellipse, "minor axis", ry)?;
                Ellipse::with_params(centre, rx, ry, major.y.atan2(major.x), start, end)
            }
        };
        ellipse.common = EntityCommon::from_data(data);
        Ok(ellipse)
    }

    pub fn center(&self) -> Point {
        self.points[0]
    }

    pub fn radius_x(&self) -> f64 {
        self.radius_x
    }

    pub fn radius_y(&self) -> f64 {
        self.radius_y
    }

    /// Angle of the major axis in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn start_param(&self) -> f64 {
        self.start_param
    }

    pub fn end_param(&self) -> f64 {
        self.end_param
    }

    pub fn is_full(&self) -> bool {
        is_full_turn(self.start_param, self.end_param)
    }

    /// Minor to major axis ratio
    pub fn ratio(&self) -> f64 {
        self.radius_y / self.radius_x
    }

    /// Point at parameter `t`
    pub fn point_at(&self, t: f64) -> Point {
        ellipse_point(self.center(), self.radius_x, self.radius_y, self.rotation, t)
    }

    /// Boundary sampled at 1° parameter steps
    pub fn sample(&self) -> Vec<Point> {
        sample_ellipse(
            self.center(),
            self.radius_x,
            self.radius_y,
            self.rotation,
            self.start_param,
            self.end_param,
        )
    }
}

impl Entity for Ellipse {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Ellipse
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        sampled_closest(p, &self.sample())
    }

    fn extremes(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&self.sample()).unwrap_or_else(|| BoundingBox2D::from_point(self.center()))
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Ellipse {
            centre: self.center(),
            radius_x: self.radius_x,
            radius_y: self.radius_y,
            rotation: self.rotation,
            start_param: self.start_param,
            end_param: self.end_param,
        }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        collector.push(SnapKind::Centre, self.center());
        if !self.is_full() {
            collector.push(SnapKind::End, self.point_at(self.start_param));
            collector.push(SnapKind::End, self.point_at(self.end_param));
        }
        for i in 0..4 {
            let t = i as f64 * FRAC_PI_2;
            if angle_in_span(t, self.start_param, self.end_param) {
                collector.push(SnapKind::Quadrant, self.point_at(t));
            }
        }
        if collector.wants(SnapKind::Nearest) {
            nearest_snap(&mut collector, self.closest_point(mouse));
        }
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("ELLIPSE");
        record
            .subclass("AcDbEllipse")
            .push_point(10, self.center())
            .push_point(11, self.points[1] - self.center())
            .push(40, self.ratio())
            .push(41, self.start_param)
            .push(42, self.end_param);
        record
    }

    fn translate(&mut self, offset: Point) {
        for p in self.points.iter_mut() {
            *p = *p + offset;
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.points.to_vec());
        if !self.is_full() {
            data.start_param = Some(self.start_param);
            data.end_param = Some(self.end_param);
        }
        self.common.fill_data(&mut data);
        data
    }
}
