//! Block definition: a named group of child entities

use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind, EntityType};
use crate::error::{DxfError, Result};
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};
use bitflags::bitflags;

bitflags! {
    /// Block type flags (70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct BlockFlags: i16 {
        /// Generated name (`*U`, `*D`, ...)
        const ANONYMOUS = 1;
        /// Has attribute definitions
        const HAS_ATTRIBUTES = 2;
        /// External reference
        const EXTERNAL_REFERENCE = 4;
        /// Overlaid external reference
        const XREF_OVERLAY = 8;
        /// Externally dependent
        const EXTERNALLY_DEPENDENT = 16;
        /// Resolved external reference
        const RESOLVED = 32;
        /// Definition is referenced
        const REFERENCED = 64;
    }
}

/// A block definition; points are `[base]`.
///
/// Children are stored in block coordinates and owned by the block. Every
/// geometric query runs over the children.
#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    /// Common entity data
    pub common: EntityCommon,
    name: String,
    base: [Point; 1],
    flags: BlockFlags,
    description: String,
    children: Vec<EntityType>,
}

impl Block {
    /// Empty block with the given name and base point
    pub fn new(name: impl Into<String>, base: Point) -> Self {
        Block {
            common: EntityCommon::new(),
            name: name.into(),
            base: [base],
            flags: BlockFlags::empty(),
            description: String::new(),
            children: Vec::new(),
        }
    }

    /// Build from name (2), base point (10, origin if absent) and flags (70)
    pub fn from_data(data: &EntityData, _settings: &QuerySettings) -> Result<Self> {
        let name = match data.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(DxfError::invalid_entity(EntityKind::Block.name(), "block has no name")),
        };
        Ok(Block {
            common: EntityCommon::from_data(data),
            name,
            base: [data.point(0).unwrap_or(Point::ORIGIN)],
            flags: BlockFlags::from_bits_truncate(data.flags as i16),
            description: data.text.clone().unwrap_or_default(),
            children: Vec::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn base_point(&self) -> Point {
        self.base[0]
    }

    pub fn flags(&self) -> BlockFlags {
        self.flags
    }

    pub fn set_flags(&mut self, flags: BlockFlags) {
        self.flags = flags;
    }

    pub fn is_anonymous(&self) -> bool {
        self.flags.contains(BlockFlags::ANONYMOUS) || self.name.starts_with('*')
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn children(&self) -> &[EntityType] {
        &self.children
    }

    pub fn children_mut(&mut self) -> &mut Vec<EntityType> {
        &mut self.children
    }

    /// Append a child in block coordinates
    pub fn add_child(&mut self, child: EntityType) {
        self.children.push(child);
    }
}

impl Entity for Block {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Block
    }

    fn points(&self) -> &[Point] {
        &self.base
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        self.children
            .iter()
            .map(|child| child.as_entity().closest_point(p))
            .fold(ClosestPoint::not_found(p), ClosestPoint::nearer)
    }

    fn extremes(&self) -> BoundingBox2D {
        self.children
            .iter()
            .map(|child| child.as_entity().extremes())
            .reduce(|a, b| a.merge(&b))
            .unwrap_or_else(|| BoundingBox2D::from_point(self.base[0]))
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Composite(
            self.children
                .iter()
                .map(|child| child.as_entity().intersect_points())
                .collect(),
        )
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        collector.push(SnapKind::End, self.base[0]);
        let mut snaps = collector.finish();
        for child in &self.children {
            snaps.extend(child.as_entity().snaps(mouse, delta, settings));
        }
        snaps
    }

    /// The `BLOCK` header only; the writer emits the children and `ENDBLK`
    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("BLOCK");
        record
            .subclass("AcDbBlockBegin")
            .push(2, self.name.as_str())
            .push(70, self.flags.bits())
            .push_point(10, self.base[0])
            .push(3, self.name.as_str())
            .push(1, "");
        if !self.description.is_empty() {
            record.push(4, self.description.as_str());
        }
        record
    }

    fn translate(&mut self, offset: Point) {
        self.base[0] = self.base[0] + offset;
        for child in self.children.iter_mut() {
            child.as_entity_mut().translate(offset);
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.base.to_vec()).name(self.name.clone());
        data.flags = self.flags.bits() as i32;
        if !self.description.is_empty() {
            data.text = Some(self.description.clone());
        }
        self.common.fill_data(&mut data);
        data
    }
}
