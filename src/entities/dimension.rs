//! Linear dimension entity (rotated and aligned)

use super::geometry::{nearest_snap, segment_closest};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::{DxfError, Result};
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// Kind of linear dimension (low bits of 70)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DimensionType {
    /// Measured along a fixed direction
    #[default]
    Rotated,
    /// Measured along the line between the definition points
    Aligned,
}

impl DimensionType {
    /// Other dimension kinds read as rotated
    pub fn from_code(code: i16) -> Self {
        match code & 0x0F {
            1 => DimensionType::Aligned,
            _ => DimensionType::Rotated,
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            DimensionType::Rotated => 0,
            DimensionType::Aligned => 1,
        }
    }
}

/// A linear dimension; points are `[first definition (13), second definition
/// (14), dimension line (10), text middle (11)]`.
///
/// Geometry is the two extension lines and the dimension line.
#[derive(Debug, Clone, PartialEq)]
pub struct Dimension {
    /// Common entity data
    pub common: EntityCommon,
    points: [Point; 4],
    dimension_type: DimensionType,
    rotation: f64,
    style: String,
    block_name: Option<String>,
    text: String,
}

impl Dimension {
    /// Aligned dimension between `p1` and `p2` whose line passes through
    /// `location`
    pub fn aligned(p1: Point, p2: Point, location: Point) -> Result<Self> {
        let mut data = EntityData::with_points(vec![p1, p2, location]);
        data.dimension_type = DimensionType::Aligned.code();
        Dimension::from_data(&data, &QuerySettings::default())
    }

    /// Dimension measured along `rotation` (radians) between `p1` and `p2`
    /// whose line passes through `location`
    pub fn rotated(p1: Point, p2: Point, location: Point, rotation: f64) -> Result<Self> {
        let data = EntityData::with_points(vec![p1, p2, location]).rotation(rotation.to_degrees());
        Dimension::from_data(&data, &QuerySettings::default())
    }

    /// Build from the four wire points `[13, 14, 10, 11]`, or from the
    /// interactive picks `[p1, p2, location]`
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        let dimension_type = DimensionType::from_code(data.dimension_type);
        let rotation = data.rotation.unwrap_or(0.0).to_radians();
        let points = match data.points.as_slice() {
            [p1, p2, line, text, ..] => [*p1, *p2, *line, *text],
            [p1, p2, location] => {
                let u = direction(dimension_type, rotation, *p1, *p2).ok_or_else(coincident)?;
                let a = project(*location, u, *p1);
                let b = project(*location, u, *p2);
                [*p1, *p2, b, a.mid_point(&b)]
            }
            _ => {
                return Err(DxfError::invalid_entity(
                    EntityKind::Dimension.name(),
                    format!("needs 3 or 4 points, got {}", data.points.len()),
                ))
            }
        };
        if direction(dimension_type, rotation, points[0], points[1]).is_none() {
            return Err(coincident());
        }
        Ok(Dimension {
            common: EntityCommon::from_data(data),
            points,
            dimension_type,
            rotation,
            style: data.style.clone().unwrap_or_else(|| "STANDARD".to_string()),
            block_name: data.name.clone().filter(|name| !name.is_empty()),
            text: data.text.clone().unwrap_or_default(),
        })
    }

    pub fn dimension_type(&self) -> DimensionType {
        self.dimension_type
    }

    /// Measuring direction in radians (rotated dimensions)
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn block_name(&self) -> Option<&str> {
        self.block_name.as_deref()
    }

    /// Text override; empty means the measurement is shown
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn text_middle(&self) -> Point {
        self.points[3]
    }

    /// Measured distance
    pub fn measurement(&self) -> f64 {
        let [_, _, dim_line] = self.lines();
        dim_line.0.distance(&dim_line.1)
    }

    /// Extension lines (definition point to dimension line) and the
    /// dimension line itself
    pub fn lines(&self) -> [(Point, Point); 3] {
        let [p1, p2, line, _] = self.points;
        let u = direction(self.dimension_type, self.rotation, p1, p2).unwrap_or(Point::UNIT_X);
        let a = project(line, u, p1);
        let b = project(line, u, p2);
        [(p1, a), (p2, b), (a, b)]
    }
}

fn coincident() -> DxfError {
    DxfError::invalid_entity(EntityKind::Dimension.name(), "definition points coincide")
}

fn direction(kind: DimensionType, rotation: f64, p1: Point, p2: Point) -> Option<Point> {
    match kind {
        DimensionType::Rotated => Some(Point::new(rotation.cos(), rotation.sin())),
        DimensionType::Aligned => {
            let d = p2 - p1;
            (d.length() > 0.0).then(|| d.normalize())
        }
    }
}

/// Projection of `p` onto the line through `origin` with unit direction `u`
fn project(origin: Point, u: Point, p: Point) -> Point {
    origin + u * (p - origin).dot(&u)
}

impl Entity for Dimension {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Dimension
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        self.lines()
            .into_iter()
            .map(|(start, end)| segment_closest(p, start, end))
            .fold(ClosestPoint::not_found(p), ClosestPoint::nearer)
    }

    fn extremes(&self) -> BoundingBox2D {
        let ends: Vec<Point> = self.lines().into_iter().flat_map(|(a, b)| [a, b]).collect();
        BoundingBox2D::from_points(&ends).unwrap_or_default()
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Composite(
            self.lines()
                .into_iter()
                .map(|(start, end)| CanonicalForm::Line { start, end })
                .collect(),
        )
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        let [(p1, a), (p2, b), _] = self.lines();
        for p in [p1, p2, a, b] {
            collector.push(SnapKind::End, p);
        }
        collector.push(SnapKind::Mid, a.mid_point(&b));
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let [p1, p2, line, text] = self.points;
        let mut record = self.common.record("DIMENSION");
        record.subclass("AcDbDimension");
        if let Some(name) = &self.block_name {
            record.push(2, name.as_str());
        }
        record
            .push_point(10, line)
            .push_point(11, text)
            .push(70, self.dimension_type.code());
        if !self.text.is_empty() {
            record.push(1, self.text.as_str());
        }
        record
            .push(3, self.style.as_str())
            .subclass("AcDbAlignedDimension")
            .push_point(13, p1)
            .push_point(14, p2);
        if self.dimension_type == DimensionType::Rotated {
            record.push(50, self.rotation.to_degrees()).subclass("AcDbRotatedDimension");
        }
        record
    }

    fn translate(&mut self, offset: Point) {
        for p in self.points.iter_mut() {
            *p = *p + offset;
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.points.to_vec()).rotation(self.rotation.to_degrees());
        data.dimension_type = self.dimension_type.code();
        data.style = Some(self.style.clone());
        data.name = self.block_name.clone();
        if !self.text.is_empty() {
            data.text = Some(self.text.clone());
        }
        self.common.fill_data(&mut data);
        data
    }
}
