//! Polyline entity with optional arc segments (bulges)

use super::geometry::{
    arc_closest, arc_extremes, arc_mid, bulge_arc, nearest_snap, require_points, segment_closest,
};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::Result;
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// One segment of a polyline
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PolylineSegment {
    Straight {
        start: Point,
        end: Point,
    },
    /// Counter-clockwise arc from `start_angle` to `end_angle`
    Arc {
        centre: Point,
        radius: f64,
        start_angle: f64,
        end_angle: f64,
    },
}

/// Open or closed chain of vertices; points are the vertices.
///
/// `bulges[i]` is the tangent of a quarter of the included angle of the
/// segment starting at vertex `i`; zero means a straight segment.
#[derive(Debug, Clone, PartialEq)]
pub struct Polyline {
    /// Common entity data
    pub common: EntityCommon,
    points: Vec<Point>,
    bulges: Vec<f64>,
    closed: bool,
}

impl Polyline {
    /// Create a straight-segment polyline
    pub fn from_points(points: Vec<Point>, closed: bool) -> Self {
        let bulges = vec![0.0; points.len()];
        Polyline {
            common: EntityCommon::new(),
            points,
            bulges,
            closed,
        }
    }

    /// Build from vertices, per-vertex bulges (missing ones are zero) and
    /// the closed flag
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        require_points(EntityKind::Polyline, data, 2)?;
        let mut bulges = data.bulges.clone();
        bulges.resize(data.points.len(), 0.0);
        Ok(Polyline {
            common: EntityCommon::from_data(data),
            points: data.points.clone(),
            bulges,
            closed: data.closed,
        })
    }

    pub fn bulges(&self) -> &[f64] {
        &self.bulges
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    pub fn has_bulges(&self) -> bool {
        self.bulges.iter().any(|b| *b != 0.0)
    }

    /// Segments in vertex order, including the closing one
    pub fn segments(&self) -> Vec<PolylineSegment> {
        let n = self.points.len();
        let count = if self.closed && n > 2 { n } else { n.saturating_sub(1) };
        (0..count)
            .map(|i| {
                let start = self.points[i];
                let end = self.points[(i + 1) % n];
                match bulge_arc(start, end, self.bulges[i]) {
                    Some((centre, radius, start_angle, end_angle)) => PolylineSegment::Arc {
                        centre,
                        radius,
                        start_angle,
                        end_angle,
                    },
                    None => PolylineSegment::Straight { start, end },
                }
            })
            .collect()
    }

    fn vertex_record(&self, point: Point, bulge: f64) -> DxfRecord {
        let mut vertex = self.common.record("VERTEX");
        vertex
            .subclass("AcDbVertex")
            .subclass("AcDb2dVertex")
            .push_point(10, point);
        if bulge != 0.0 {
            vertex.push(42, bulge);
        }
        vertex.push(70, 0i16);
        vertex
    }
}

impl Entity for Polyline {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Polyline
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        self.segments()
            .into_iter()
            .map(|segment| match segment {
                PolylineSegment::Straight { start, end } => segment_closest(p, start, end),
                PolylineSegment::Arc {
                    centre,
                    radius,
                    start_angle,
                    end_angle,
                } => arc_closest(p, centre, radius, start_angle, end_angle),
            })
            .fold(ClosestPoint::not_found(p), ClosestPoint::nearer)
    }

    fn extremes(&self) -> BoundingBox2D {
        let mut bbox = match BoundingBox2D::from_points(&self.points) {
            Some(bbox) => bbox,
            None => return BoundingBox2D::default(),
        };
        for segment in self.segments() {
            if let PolylineSegment::Arc {
                centre,
                radius,
                start_angle,
                end_angle,
            } = segment
            {
                bbox = bbox.merge(&arc_extremes(centre, radius, start_angle, end_angle));
            }
        }
        bbox
    }

    fn intersect_points(&self) -> CanonicalForm {
        if !self.has_bulges() {
            return CanonicalForm::Polyline {
                points: self.points.clone(),
                closed: self.closed,
            };
        }
        CanonicalForm::Composite(
            self.segments()
                .into_iter()
                .map(|segment| match segment {
                    PolylineSegment::Straight { start, end } => CanonicalForm::Line { start, end },
                    PolylineSegment::Arc {
                        centre,
                        radius,
                        start_angle,
                        end_angle,
                    } => CanonicalForm::Arc {
                        centre,
                        radius,
                        start_angle,
                        end_angle,
                    },
                })
                .collect(),
        )
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        for p in &self.points {
            collector.push(SnapKind::End, *p);
        }
        for segment in self.segments() {
            let mid = match segment {
                PolylineSegment::Straight { start, end } => start.mid_point(&end),
                PolylineSegment::Arc {
                    centre,
                    radius,
                    start_angle,
                    end_angle,
                } => arc_mid(centre, radius, start_angle, end_angle),
            };
            collector.push(SnapKind::Mid, mid);
        }
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        assert!(
            self.points.len() >= 2,
            "polyline needs at least 2 vertices to be written, has {}",
            self.points.len()
        );
        let mut record = self.common.record("POLYLINE");
        record
            .subclass("AcDb2dPolyline")
            .push(66, 1i16)
            .push(70, if self.closed { 1i16 } else { 0i16 });
        for (point, bulge) in self.points.iter().zip(&self.bulges) {
            record.followers.push(self.vertex_record(*point, *bulge));
        }
        let mut seqend = DxfRecord::new("SEQEND");
        seqend.push(8, self.common.layer.as_str());
        record.followers.push(seqend);
        record
    }

    fn translate(&mut self, offset: Point) {
        for p in self.points.iter_mut() {
            *p = *p + offset;
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.points.clone())
            .bulges(self.bulges.clone())
            .closed(self.closed);
        self.common.fill_data(&mut data);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zigzag() -> Polyline {
        Polyline::from_points(
            vec![Point::new(0.0, 0.0), Point::new(10.0, 0.0), Point::new(10.0, 10.0)],
            false,
        )
    }

    #[test]
    fn test_missing_bulges_default_to_zero() {
        let data = EntityData::with_points(vec![Point::ORIGIN, Point::new(1.0, 0.0), Point::new(1.0, 1.0)])
            .bulges(vec![0.5]);
        let polyline = Polyline::from_data(&data, &QuerySettings::default()).unwrap();
        assert_eq!(polyline.bulges(), &[0.5, 0.0, 0.0]);
    }

    #[test]
    fn test_closest_point_best_segment() {
        let closest = zigzag().closest_point(Point::new(12.0, 5.0));
        assert_eq!(closest.point, Point::new(10.0, 5.0));
        assert_eq!(closest.distance, 2.0);
    }

    #[test]
    fn test_bulge_extends_extremes() {
        let data = EntityData::with_points(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]).bulges(vec![1.0]);
        let polyline = Polyline::from_data(&data, &QuerySettings::default()).unwrap();
        let [_, _, ymin, ymax] = polyline.extremes().to_array();
        assert!((ymin + 1.0).abs() < 1e-12);
        assert!(ymax.abs() < 1e-12);
        assert!(matches!(polyline.intersect_points(), CanonicalForm::Composite(_)));
    }

    #[test]
    fn test_closed_segments() {
        let closed = Polyline::from_points(zigzag().points().to_vec(), true);
        assert_eq!(closed.segments().len(), 3);
        assert_eq!(zigzag().segments().len(), 2);
    }

    #[test]
    fn test_dxf_followers() {
        let record = zigzag().dxf();
        assert_eq!(record.kind, "POLYLINE");
        assert_eq!(record.followers.len(), 4);
        assert_eq!(record.followers[0].kind, "VERTEX");
        assert_eq!(record.followers[3].kind, "SEQEND");
    }

    #[test]
    #[should_panic(expected = "at least 2 vertices")]
    fn test_dxf_panics_without_vertices() {
        Polyline::from_points(vec![Point::ORIGIN], false).dxf();
    }
}
