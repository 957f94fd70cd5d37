//! B-spline entity

use super::geometry::{nearest_snap, require_points, sampled_closest};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::Result;
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// Flag bit for a closed spline (70)
const FLAG_CLOSED: i32 = 1;
/// Flag bit for a planar spline (70)
const FLAG_PLANAR: i32 = 8;

/// A non-rational B-spline; points are its control points.
///
/// The curve is evaluated with de Boor's algorithm when the spline is built
/// and kept as a sampled polyline for queries.
#[derive(Debug, Clone, PartialEq)]
pub struct Spline {
    /// Common entity data
    pub common: EntityCommon,
    degree: usize,
    control_points: Vec<Point>,
    knots: Vec<f64>,
    fit_points: Vec<Point>,
    closed: bool,
    curve: Vec<Point>,
}

impl Spline {
    /// Create a spline of `degree` over control points with a clamped
    /// uniform knot vector
    pub fn from_control_points(control_points: Vec<Point>, degree: usize, settings: &QuerySettings) -> Self {
        Spline::build(EntityCommon::new(), control_points, degree, Vec::new(), Vec::new(), false, settings)
    }

    /// Build from control points (or fit points when no control points are
    /// given), degree (default 3) and knots (regenerated when inconsistent)
    pub fn from_data(data: &EntityData, settings: &QuerySettings) -> Result<Self> {
        let control_points = if data.points.len() < 2 && data.fit_points.len() >= 2 {
            data.fit_points.clone()
        } else {
            require_points(EntityKind::Spline, data, 2)?;
            data.points.clone()
        };
        let degree = data.degree.unwrap_or(3).max(1) as usize;
        Ok(Spline::build(
            EntityCommon::from_data(data),
            control_points,
            degree,
            data.knots.clone(),
            data.fit_points.clone(),
            data.closed,
            settings,
        ))
    }

    fn build(
        common: EntityCommon,
        control_points: Vec<Point>,
        degree: usize,
        knots: Vec<f64>,
        fit_points: Vec<Point>,
        closed: bool,
        settings: &QuerySettings,
    ) -> Self {
        let degree = degree.clamp(1, control_points.len().saturating_sub(1).max(1));
        let knots = if knots_are_valid(&knots, control_points.len(), degree) {
            knots
        } else {
            clamped_uniform_knots(control_points.len(), degree)
        };
        let mut spline = Spline {
            common,
            degree,
            control_points,
            knots,
            fit_points,
            closed,
            curve: Vec::new(),
        };
        spline.curve = spline.sample(settings.spline_samples.max(2));
        spline
    }

    pub fn degree(&self) -> usize {
        self.degree
    }

    pub fn knots(&self) -> &[f64] {
        &self.knots
    }

    pub fn fit_points(&self) -> &[Point] {
        &self.fit_points
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Sampled curve used for queries
    pub fn curve(&self) -> &[Point] {
        &self.curve
    }

    /// Evaluate the curve at parameter `u` (clamped to the knot domain)
    pub fn evaluate(&self, u: f64) -> Point {
        let p = self.degree;
        let n = self.control_points.len();
        if n == 0 {
            return Point::ORIGIN;
        }
        if n <= p {
            return self.control_points[0];
        }
        let (lo, hi) = (self.knots[p], self.knots[n]);
        let u = u.clamp(lo, hi);

        let mut k = p;
        while k < n - 1 && u >= self.knots[k + 1] {
            k += 1;
        }

        let mut d: Vec<Point> = (0..=p).map(|j| self.control_points[j + k - p]).collect();
        for r in 1..=p {
            for j in (r..=p).rev() {
                let i = j + k - p;
                let denominator = self.knots[i + p - r + 1] - self.knots[i];
                let alpha = if denominator.abs() < 1e-15 {
                    0.0
                } else {
                    (u - self.knots[i]) / denominator
                };
                d[j] = d[j - 1] * (1.0 - alpha) + d[j] * alpha;
            }
        }
        d[p]
    }

    fn sample(&self, count: usize) -> Vec<Point> {
        let n = self.control_points.len();
        if n <= self.degree {
            return self.control_points.clone();
        }
        let (lo, hi) = (self.knots[self.degree], self.knots[n]);
        (0..count)
            .map(|i| self.evaluate(lo + (hi - lo) * i as f64 / (count - 1) as f64))
            .collect()
    }
}

fn knots_are_valid(knots: &[f64], count: usize, degree: usize) -> bool {
    knots.len() == count + degree + 1 && knots.windows(2).all(|w| w[0] <= w[1]) && knots[0] < knots[knots.len() - 1]
}

/// Clamped knot vector with uniformly spaced interior knots on `[0, 1]`
fn clamped_uniform_knots(count: usize, degree: usize) -> Vec<f64> {
    let spans = count.saturating_sub(degree).max(1);
    let mut knots = vec![0.0; degree + 1];
    for i in 1..spans {
        knots.push(i as f64 / spans as f64);
    }
    knots.extend(std::iter::repeat(1.0).take(degree + 1));
    knots
}

impl Entity for Spline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Spline
    }

    fn points(&self) -> &[Point] {
        &self.control_points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        sampled_closest(p, &self.curve)
    }

    fn extremes(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&self.curve).unwrap_or_default()
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Polyline {
            points: self.curve.clone(),
            closed: self.closed,
        }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        if let (Some(first), Some(last)) = (self.curve.first(), self.curve.last()) {
            collector.push(SnapKind::End, *first);
            collector.push(SnapKind::End, *last);
        }
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        assert!(
            self.control_points.len() >= 2,
            "spline needs at least 2 control points to be written, has {}",
            self.control_points.len()
        );
        let flags = FLAG_PLANAR | if self.closed { FLAG_CLOSED } else { 0 };
        let mut record = self.common.record("SPLINE");
        record
            .subclass("AcDbSpline")
            .push(70, flags as i16)
            .push(71, self.degree as i16)
            .push(72, self.knots.len() as i16)
            .push(73, self.control_points.len() as i16)
            .push(74, self.fit_points.len() as i16);
        for knot in &self.knots {
            record.push(40, *knot);
        }
        for point in &self.control_points {
            record.push_point(10, *point);
        }
        for point in &self.fit_points {
            record.push_point(11, *point);
        }
        record
    }

    fn translate(&mut self, offset: Point) {
        for p in self
            .control_points
            .iter_mut()
            .chain(self.fit_points.iter_mut())
            .chain(self.curve.iter_mut())
        {
            *p = *p + offset;
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.control_points.clone()).closed(self.closed);
        data.degree = Some(self.degree as i32);
        data.knots = self.knots.clone();
        data.fit_points = self.fit_points.clone();
        self.common.fill_data(&mut data);
        data
    }
}
