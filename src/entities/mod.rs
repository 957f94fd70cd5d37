//! Drawable entity types and the geometric contract they share

use crate::error::{DxfError, Result};
use crate::intersect::{intersect_rect, CanonicalForm};
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Color, LineWeight, Point};
use ahash::AHashMap;
use once_cell::sync::Lazy;
use std::fmt;

pub mod arc;
pub mod block;
pub mod circle;
pub mod data;
pub mod dimension;
pub mod ellipse;
pub mod filled_rectangle;
pub(crate) mod geometry;
pub mod insert;
pub mod line;
pub mod polyline;
pub mod rectangle;
pub mod spline;
pub mod text;

pub use arc::Arc;
pub use block::{Block, BlockFlags};
pub use circle::Circle;
pub use data::EntityData;
pub use dimension::{Dimension, DimensionType};
pub use ellipse::Ellipse;
pub use filled_rectangle::FilledRectangle;
pub use insert::Insert;
pub use line::Line;
pub use polyline::Polyline;
pub use rectangle::Rectangle;
pub use spline::Spline;
pub use text::{Text, TextHorizontalAlignment, TextVerticalAlignment};

/// Nearest boundary point reported by [`Entity::closest_point`].
///
/// When no candidate exists (e.g. the perpendicular from the query point
/// misses every segment span) `found` is false and `distance` is `+∞`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClosestPoint {
    pub point: Point,
    pub distance: f64,
    pub found: bool,
}

impl ClosestPoint {
    /// A candidate at `point` for query position `query`
    pub fn at(point: Point, query: Point) -> Self {
        ClosestPoint {
            point,
            distance: point.distance(&query),
            found: true,
        }
    }

    /// No candidate for query position `query`
    pub fn not_found(query: Point) -> Self {
        ClosestPoint {
            point: query,
            distance: f64::INFINITY,
            found: false,
        }
    }

    /// The nearer of two results; `self` wins ties
    pub fn nearer(self, other: ClosestPoint) -> ClosestPoint {
        if other.distance < self.distance {
            other
        } else {
            self
        }
    }
}

/// Base trait for all drawable entities
pub trait Entity {
    /// Shared attributes
    fn common(&self) -> &EntityCommon;

    /// Shared attributes, mutable
    fn common_mut(&mut self) -> &mut EntityCommon;

    /// Which variant this is
    fn kind(&self) -> EntityKind;

    /// Ordered defining points; meaning depends on the variant
    fn points(&self) -> &[Point];

    /// Nearest point on the boundary to `p`
    fn closest_point(&self, p: Point) -> ClosestPoint;

    /// Axis-aligned extent
    fn extremes(&self) -> BoundingBox2D;

    /// Shape in the form the intersection routines consume
    fn intersect_points(&self) -> CanonicalForm;

    /// Snap candidates within `delta` of `mouse`
    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint>;

    /// Wire form.
    ///
    /// # Panics
    ///
    /// Panics if the entity is missing a required point.
    fn dxf(&self) -> DxfRecord;

    /// Move the entity by `offset`
    fn translate(&mut self, offset: Point);

    /// Construction data that rebuilds this entity through the registry
    fn to_data(&self) -> EntityData;

    /// Whether the boundary crosses the edges of `rect`
    fn touched(&self, rect: &BoundingBox2D) -> bool {
        intersect_rect(&self.intersect_points(), rect).is_intersection()
    }

    /// Whether the extremes lie strictly inside `rect`
    fn within(&self, rect: &BoundingBox2D) -> bool {
        rect.strictly_contains(&self.extremes())
    }

    /// Get the entity's layer name
    fn layer(&self) -> &str {
        &self.common().layer
    }

    /// Set the entity's layer name
    fn set_layer(&mut self, layer: String) {
        self.common_mut().layer = layer;
    }

    /// Get the entity's color
    fn color(&self) -> Color {
        self.common().color
    }

    /// Set the entity's color
    fn set_color(&mut self, color: Color) {
        self.common_mut().color = color;
    }

    /// Get the entity's line weight
    fn line_weight(&self) -> LineWeight {
        self.common().line_weight
    }

    /// Set the entity's line weight
    fn set_line_weight(&mut self, weight: LineWeight) {
        self.common_mut().line_weight = weight;
    }
}

/// Common entity data shared by all entities
#[derive(Debug, Clone, PartialEq)]
pub struct EntityCommon {
    /// Layer name
    pub layer: String,
    /// Color
    pub color: Color,
    /// Line weight
    pub line_weight: LineWeight,
}

impl EntityCommon {
    /// Create new common entity data with defaults
    pub fn new() -> Self {
        EntityCommon {
            layer: "0".to_string(),
            color: Color::ByLayer,
            line_weight: LineWeight::ByLayer,
        }
    }

    /// Create with a specific layer
    pub fn with_layer(layer: impl Into<String>) -> Self {
        EntityCommon {
            layer: layer.into(),
            ..Self::new()
        }
    }

    /// Attributes carried by construction data; an empty layer becomes "0"
    pub fn from_data(data: &EntityData) -> Self {
        let layer = if data.layer.is_empty() {
            "0".to_string()
        } else {
            data.layer.clone()
        };
        EntityCommon {
            layer,
            color: data.color,
            line_weight: data.line_weight,
        }
    }

    /// Copy these attributes into construction data
    pub fn fill_data(&self, data: &mut EntityData) {
        data.layer = self.layer.clone();
        data.color = self.color;
        data.line_weight = self.line_weight;
    }

    /// Start a record of `kind` carrying these attributes
    pub fn record(&self, kind: &'static str) -> DxfRecord {
        let mut record = DxfRecord::new(kind);
        record.push_common(&self.layer, self.color, self.line_weight);
        record
    }
}

impl Default for EntityCommon {
    fn default() -> Self {
        Self::new()
    }
}

/// The closed set of entity variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Line,
    Arc,
    Circle,
    Ellipse,
    Rectangle,
    FilledRectangle,
    Polyline,
    Spline,
    Text,
    Block,
    Insert,
    Dimension,
}

impl EntityKind {
    /// Every kind, in declaration order
    pub const ALL: [EntityKind; 12] = [
        EntityKind::Line,
        EntityKind::Arc,
        EntityKind::Circle,
        EntityKind::Ellipse,
        EntityKind::Rectangle,
        EntityKind::FilledRectangle,
        EntityKind::Polyline,
        EntityKind::Spline,
        EntityKind::Text,
        EntityKind::Block,
        EntityKind::Insert,
        EntityKind::Dimension,
    ];

    /// Display name
    pub fn name(&self) -> &'static str {
        match self {
            EntityKind::Line => "Line",
            EntityKind::Arc => "Arc",
            EntityKind::Circle => "Circle",
            EntityKind::Ellipse => "Ellipse",
            EntityKind::Rectangle => "Rectangle",
            EntityKind::FilledRectangle => "FilledRectangle",
            EntityKind::Polyline => "Polyline",
            EntityKind::Spline => "Spline",
            EntityKind::Text => "Text",
            EntityKind::Block => "Block",
            EntityKind::Insert => "Insert",
            EntityKind::Dimension => "Dimension",
        }
    }

    /// Record keyword written for this kind
    pub fn dxf_name(&self) -> &'static str {
        match self {
            EntityKind::Line => "LINE",
            EntityKind::Arc => "ARC",
            EntityKind::Circle => "CIRCLE",
            EntityKind::Ellipse => "ELLIPSE",
            EntityKind::Rectangle => "LWPOLYLINE",
            EntityKind::FilledRectangle => "SOLID",
            EntityKind::Polyline => "POLYLINE",
            EntityKind::Spline => "SPLINE",
            EntityKind::Text => "TEXT",
            EntityKind::Block => "BLOCK",
            EntityKind::Insert => "INSERT",
            EntityKind::Dimension => "DIMENSION",
        }
    }

    /// Look a kind up by display name or record keyword, ignoring case.
    ///
    /// `LWPOLYLINE` maps to `Polyline`; the reader decides separately whether
    /// a particular lightweight polyline is a rectangle.
    pub fn from_name(name: &str) -> Option<EntityKind> {
        let upper = name.trim().to_ascii_uppercase();
        let kind = match upper.as_str() {
            "LINE" => EntityKind::Line,
            "ARC" => EntityKind::Arc,
            "CIRCLE" => EntityKind::Circle,
            "ELLIPSE" => EntityKind::Ellipse,
            "RECTANGLE" => EntityKind::Rectangle,
            "FILLEDRECTANGLE" | "SOLID" => EntityKind::FilledRectangle,
            "POLYLINE" | "LWPOLYLINE" => EntityKind::Polyline,
            "SPLINE" => EntityKind::Spline,
            "TEXT" => EntityKind::Text,
            "BLOCK" => EntityKind::Block,
            "INSERT" => EntityKind::Insert,
            "DIMENSION" => EntityKind::Dimension,
            _ => return None,
        };
        Some(kind)
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Enumeration of all entity types for type-safe storage
#[derive(Debug, Clone, PartialEq)]
pub enum EntityType {
    Line(Line),
    Arc(Arc),
    Circle(Circle),
    Ellipse(Ellipse),
    Rectangle(Rectangle),
    FilledRectangle(FilledRectangle),
    Polyline(Polyline),
    Spline(Spline),
    Text(Text),
    Block(Block),
    Insert(Insert),
    Dimension(Dimension),
}

/// Builds an entity from construction data
pub type Constructor = fn(&EntityData, &QuerySettings) -> Result<EntityType>;

macro_rules! constructor {
    ($ty:ident) => {{
        fn build(data: &EntityData, settings: &QuerySettings) -> Result<EntityType> {
            $ty::from_data(data, settings).map(EntityType::$ty)
        }
        build as Constructor
    }};
}

/// Kind → constructor table shared by the reader and interactive creation
static REGISTRY: Lazy<AHashMap<EntityKind, Constructor>> = Lazy::new(|| {
    let mut registry: AHashMap<EntityKind, Constructor> = AHashMap::with_capacity(EntityKind::ALL.len());
    registry.insert(EntityKind::Line, constructor!(Line));
    registry.insert(EntityKind::Arc, constructor!(Arc));
    registry.insert(EntityKind::Circle, constructor!(Circle));
    registry.insert(EntityKind::Ellipse, constructor!(Ellipse));
    registry.insert(EntityKind::Rectangle, constructor!(Rectangle));
    registry.insert(EntityKind::FilledRectangle, constructor!(FilledRectangle));
    registry.insert(EntityKind::Polyline, constructor!(Polyline));
    registry.insert(EntityKind::Spline, constructor!(Spline));
    registry.insert(EntityKind::Text, constructor!(Text));
    registry.insert(EntityKind::Block, constructor!(Block));
    registry.insert(EntityKind::Insert, constructor!(Insert));
    registry.insert(EntityKind::Dimension, constructor!(Dimension));
    registry
});

impl EntityType {
    /// Build an entity of `kind` with default query settings
    pub fn from_data(kind: EntityKind, data: &EntityData) -> Result<Self> {
        Self::from_data_with(kind, data, &QuerySettings::default())
    }

    /// Build an entity of `kind`
    pub fn from_data_with(kind: EntityKind, data: &EntityData, settings: &QuerySettings) -> Result<Self> {
        let constructor = REGISTRY
            .get(&kind)
            .ok_or_else(|| DxfError::invalid_entity(kind.name(), "no constructor registered"))?;
        constructor(data, settings)
    }

    /// Build an entity from a kind name such as `"LINE"` or `"Rectangle"`
    pub fn from_name(name: &str, data: &EntityData) -> Result<Self> {
        let kind = EntityKind::from_name(name)
            .ok_or_else(|| DxfError::invalid_entity(name, "unknown entity kind"))?;
        Self::from_data(kind, data)
    }

    /// Get a reference to the entity trait object
    pub fn as_entity(&self) -> &dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::Rectangle(e) => e,
            EntityType::FilledRectangle(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Text(e) => e,
            EntityType::Block(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Dimension(e) => e,
        }
    }

    /// Get a mutable reference to the entity trait object
    pub fn as_entity_mut(&mut self) -> &mut dyn Entity {
        match self {
            EntityType::Line(e) => e,
            EntityType::Arc(e) => e,
            EntityType::Circle(e) => e,
            EntityType::Ellipse(e) => e,
            EntityType::Rectangle(e) => e,
            EntityType::FilledRectangle(e) => e,
            EntityType::Polyline(e) => e,
            EntityType::Spline(e) => e,
            EntityType::Text(e) => e,
            EntityType::Block(e) => e,
            EntityType::Insert(e) => e,
            EntityType::Dimension(e) => e,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.as_entity().kind()
    }

    pub fn as_block(&self) -> Option<&Block> {
        match self {
            EntityType::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_block_mut(&mut self) -> Option<&mut Block> {
        match self {
            EntityType::Block(block) => Some(block),
            _ => None,
        }
    }

    pub fn as_insert(&self) -> Option<&Insert> {
        match self {
            EntityType::Insert(insert) => Some(insert),
            _ => None,
        }
    }
}
