//! Drawing scene: top-level items, block definitions and symbol tables

use crate::entities::{
    Block, ClosestPoint, Entity, EntityData, EntityKind, EntityType, Insert,
};
use crate::error::{DxfError, Result};
use crate::notification::{NotificationCollection, NotificationType};
use crate::settings::{QuerySettings, SnapPoint, SnapSettings};
use crate::tables::{DimStyle, Layer, LayerLookup, LineType, Table, TextStyle};
use crate::types::{BoundingBox2D, Color, LineWeight, Point};
use ahash::AHashMap;
use rayon::prelude::*;
use std::borrow::Cow;

/// Nesting depth at which insert expansion stops
const MAX_INSERT_DEPTH: usize = 16;

/// Receives the records a reader completes.
///
/// Table registries are populated additively: an entry with a known name
/// updates that entry, nothing is ever cleared.
pub trait SceneBuilder {
    /// Build an entity through the registry and add it at the top level
    fn add_entity(&mut self, kind: EntityKind, data: &EntityData) -> Result<()>;

    /// Build an entity and append it to the named block's children
    fn add_entity_to_block(&mut self, kind: EntityKind, data: &EntityData, block_name: &str) -> Result<()>;

    fn add_layer(&mut self, layer: Layer);

    fn add_style(&mut self, style: TextStyle);

    fn add_dim_style(&mut self, style: DimStyle);

    fn add_line_type(&mut self, line_type: LineType);

    /// Layer new entities go on
    fn set_current_layer(&mut self, name: &str);
}

/// An ordered collection of top-level items (entities and block
/// definitions) plus the tables they refer to
#[derive(Debug, Clone)]
pub struct Scene {
    items: Vec<EntityType>,
    /// Block name (uppercase) → index into `items`
    block_index: AHashMap<String, usize>,
    /// Layer table
    pub layers: Table<Layer>,
    /// Line type table
    pub line_types: Table<LineType>,
    /// Text style table
    pub text_styles: Table<TextStyle>,
    /// Dimension style table
    pub dim_styles: Table<DimStyle>,
    /// Current layer name (`$CLAYER`)
    pub current_layer: String,
    /// Settings used when building and measuring entities
    pub query_settings: QuerySettings,
    /// Anomalies recovered while reading
    pub notifications: NotificationCollection,
}

impl Scene {
    /// Create an empty scene holding the standard table entries
    pub fn new() -> Self {
        let mut scene = Scene {
            items: Vec::new(),
            block_index: AHashMap::new(),
            layers: Table::new(),
            line_types: Table::new(),
            text_styles: Table::new(),
            dim_styles: Table::new(),
            current_layer: "0".to_string(),
            query_settings: QuerySettings::default(),
            notifications: NotificationCollection::new(),
        };
        scene.layers.insert(Layer::layer_0());
        scene.line_types.insert(LineType::by_block());
        scene.line_types.insert(LineType::by_layer());
        scene.line_types.insert(LineType::continuous());
        scene.text_styles.insert(TextStyle::standard());
        scene.dim_styles.insert(DimStyle::standard());
        scene
    }

    /// Create an empty scene using the given query settings
    pub fn with_settings(query_settings: QuerySettings) -> Self {
        Scene {
            query_settings,
            ..Self::new()
        }
    }

    /// Add a built entity at the top level, returning its index.
    ///
    /// A block whose name is already defined replaces the earlier
    /// definition in place.
    pub fn push(&mut self, entity: EntityType) -> usize {
        if let EntityType::Block(block) = &entity {
            let key = block.name().to_uppercase();
            if let Some(&index) = self.block_index.get(&key) {
                self.items[index] = entity;
                return index;
            }
            self.block_index.insert(key, self.items.len());
        }
        self.items.push(entity);
        self.items.len() - 1
    }

    /// Every top-level item, blocks included, in insertion order
    pub fn items(&self) -> &[EntityType] {
        &self.items
    }

    /// Top-level items that are not block definitions
    pub fn entities(&self) -> impl Iterator<Item = &EntityType> {
        self.items.iter().filter(|item| item.as_block().is_none())
    }

    /// Block definitions in insertion order
    pub fn blocks(&self) -> impl Iterator<Item = &Block> {
        self.items.iter().filter_map(EntityType::as_block)
    }

    /// Block definition by name (case-insensitive)
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.block_index
            .get(&name.to_uppercase())
            .and_then(|index| self.items.get(*index))
            .and_then(EntityType::as_block)
    }

    fn block_mut(&mut self, name: &str) -> Option<&mut Block> {
        let index = *self.block_index.get(&name.to_uppercase())?;
        self.items.get_mut(index).and_then(EntityType::as_block_mut)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Colour an entity is drawn with once `BYLAYER` is resolved
    pub fn resolved_colour(&self, entity: &dyn Entity) -> Color {
        let layer_colour = self.layers.layer_colour(entity.layer()).unwrap_or(Color::WHITE);
        entity.color().resolve(layer_colour, None)
    }

    /// Line weight an entity is drawn with once `BYLAYER` is resolved
    pub fn resolved_line_weight(&self, entity: &dyn Entity) -> LineWeight {
        let layer_weight = self
            .layers
            .layer_line_weight(entity.layer())
            .unwrap_or(LineWeight::Default);
        entity.line_weight().resolve(layer_weight, None)
    }

    /// The referenced block's children in world coordinates.
    ///
    /// Nested inserts are expanded recursively. `BYBLOCK` attributes take the
    /// insert's values and children on layer "0" take the insert's layer.
    /// Non-uniform scaling of circular shapes is approximated.
    pub fn explode_insert(&self, insert: &Insert) -> Result<Vec<EntityType>> {
        let mut out = Vec::new();
        self.explode_into(insert, 0, &mut out)?;
        Ok(out)
    }

    fn explode_into(&self, insert: &Insert, depth: usize, out: &mut Vec<EntityType>) -> Result<()> {
        if depth >= MAX_INSERT_DEPTH {
            return Err(DxfError::Custom(format!(
                "block '{}' nests deeper than {} levels",
                insert.block_name(),
                MAX_INSERT_DEPTH
            )));
        }
        let block = self
            .block(insert.block_name())
            .ok_or_else(|| DxfError::UnknownBlock(insert.block_name().to_string()))?;
        for child in block.children() {
            let kind = child.kind();
            let data = transform_data(insert, block.base_point(), kind, child.as_entity().to_data());
            let world = EntityType::from_data_with(kind, &data, &self.query_settings)?;
            match world {
                EntityType::Insert(nested) => self.explode_into(&nested, depth + 1, out)?,
                other => out.push(other),
            }
        }
        Ok(())
    }

    /// World geometry of a top-level item; inserts are exploded
    fn world_geometry<'a>(&self, item: &'a EntityType) -> Cow<'a, [EntityType]> {
        match item {
            EntityType::Insert(insert) => Cow::Owned(self.explode_insert(insert).unwrap_or_default()),
            other => Cow::Borrowed(std::slice::from_ref(other)),
        }
    }

    /// Indices of top-level entities lying strictly inside `rect`
    pub fn select_window(&self, rect: &BoundingBox2D) -> Vec<usize> {
        self.select(|item| match item {
            EntityType::Insert(insert) => {
                let parts = self.explode_insert(insert).unwrap_or_default();
                !parts.is_empty() && parts.iter().all(|part| part.as_entity().within(rect))
            }
            other => other.as_entity().within(rect),
        })
    }

    /// Indices of top-level entities inside or crossing `rect`
    pub fn select_crossing(&self, rect: &BoundingBox2D) -> Vec<usize> {
        self.select(|item| {
            self.world_geometry(item).iter().any(|part| {
                let entity = part.as_entity();
                entity.within(rect) || entity.touched(rect)
            })
        })
    }

    fn select<F>(&self, predicate: F) -> Vec<usize>
    where
        F: Fn(&EntityType) -> bool + Sync,
    {
        self.items
            .par_iter()
            .enumerate()
            .filter(|(_, item)| item.as_block().is_none() && predicate(item))
            .map(|(index, _)| index)
            .collect()
    }

    /// Top-level entity whose boundary is nearest to `p`
    pub fn closest_entity(&self, p: Point) -> Option<(usize, ClosestPoint)> {
        self.items
            .par_iter()
            .enumerate()
            .filter(|(_, item)| item.as_block().is_none())
            .map(|(index, item)| {
                let closest = self
                    .world_geometry(item)
                    .iter()
                    .map(|part| part.as_entity().closest_point(p))
                    .fold(ClosestPoint::not_found(p), ClosestPoint::nearer);
                (index, closest)
            })
            .filter(|(_, closest)| closest.found)
            .min_by(|a, b| a.1.distance.total_cmp(&b.1.distance).then(a.0.cmp(&b.0)))
    }

    /// Snap candidates of every top-level entity, nearest first
    pub fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut snaps: Vec<SnapPoint> = self
            .items
            .par_iter()
            .filter(|item| item.as_block().is_none())
            .flat_map_iter(|item| {
                self.world_geometry(item)
                    .iter()
                    .flat_map(|part| part.as_entity().snaps(mouse, delta, settings))
                    .collect::<Vec<_>>()
            })
            .collect();
        snaps.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        snaps
    }

    /// Extent of all top-level entities, inserts exploded
    pub fn extremes(&self) -> Option<BoundingBox2D> {
        self.entities()
            .flat_map(|item| {
                self.world_geometry(item)
                    .iter()
                    .map(|part| part.as_entity().extremes())
                    .collect::<Vec<_>>()
            })
            .reduce(|a, b| a.merge(&b))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneBuilder for Scene {
    fn add_entity(&mut self, kind: EntityKind, data: &EntityData) -> Result<()> {
        let entity = EntityType::from_data_with(kind, data, &self.query_settings)?;
        if let EntityType::Block(block) = &entity {
            if self.block(block.name()).is_some() {
                self.notifications.notify(
                    NotificationType::Warning,
                    format!("block '{}' defined twice, later definition wins", block.name()),
                );
            }
        }
        self.push(entity);
        Ok(())
    }

    fn add_entity_to_block(&mut self, kind: EntityKind, data: &EntityData, block_name: &str) -> Result<()> {
        let entity = EntityType::from_data_with(kind, data, &self.query_settings)?;
        let block = self
            .block_mut(block_name)
            .ok_or_else(|| DxfError::UnknownBlock(block_name.to_string()))?;
        block.add_child(entity);
        Ok(())
    }

    fn add_layer(&mut self, layer: Layer) {
        self.layers.insert(layer);
    }

    fn add_style(&mut self, style: TextStyle) {
        self.text_styles.insert(style);
    }

    fn add_dim_style(&mut self, style: DimStyle) {
        self.dim_styles.insert(style);
    }

    fn add_line_type(&mut self, line_type: LineType) {
        self.line_types.insert(line_type);
    }

    fn set_current_layer(&mut self, name: &str) {
        self.current_layer = name.to_string();
    }
}

/// Map construction data from block coordinates into the insert's world
/// frame
fn transform_data(insert: &Insert, base: Point, kind: EntityKind, mut data: EntityData) -> EntityData {
    let map = |p: Point| insert.transform(base, p);
    let mirrored = insert.is_mirrored();
    let (sx, sy) = insert.scale();

    // angle of a direction after transformation, in degrees
    let turned = |origin: Point, degrees: f64| {
        let direction = Point::polar(Point::ORIGIN, 1.0, degrees.to_radians());
        let start = map(origin);
        start.angle_to(&map(origin + direction)).to_degrees()
    };

    let origin = data.point(0).unwrap_or(base);
    if let Some(rotation) = data.rotation {
        data.rotation = Some(turned(origin, rotation));
    }
    data.points = data.points.iter().map(|p| map(*p)).collect();
    data.fit_points = data.fit_points.iter().map(|p| map(*p)).collect();
    data.alignment_point = data.alignment_point.map(map);
    data.radius = data.radius.map(|r| r * (sx * sy).abs().sqrt());

    match kind {
        EntityKind::Arc if mirrored && data.points.len() >= 3 => data.points.swap(1, 2),
        EntityKind::Ellipse if mirrored => {
            if let (Some(start), Some(end)) = (data.start_param, data.end_param) {
                data.start_param = Some(-end);
                data.end_param = Some(-start);
            }
        }
        EntityKind::Polyline if mirrored => {
            for bulge in data.bulges.iter_mut() {
                *bulge = -*bulge;
            }
        }
        EntityKind::Text => {
            data.height = data.height.map(|h| h * sy.abs());
        }
        EntityKind::Insert => {
            let (cx, cy) = data.scale.unwrap_or((1.0, 1.0));
            data.scale = Some((cx * sx, cy * sy));
        }
        _ => {}
    }

    if data.color == Color::ByBlock {
        data.color = insert.common.color;
    }
    if data.line_weight == LineWeight::ByBlock {
        data.line_weight = insert.common.line_weight;
    }
    if data.layer == "0" {
        data.layer = insert.common.layer.clone();
    }
    data
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Arc, Circle, Line};
    use std::f64::consts::FRAC_PI_2;

    fn scene_with_block() -> Scene {
        let mut scene = Scene::new();
        scene
            .add_entity(EntityKind::Block, &EntityData::with_points(vec![Point::ORIGIN]).name("A"))
            .unwrap();
        let line = EntityData::with_points(vec![Point::new(0.0, 0.0), Point::new(2.0, 0.0)]);
        scene.add_entity_to_block(EntityKind::Line, &line, "A").unwrap();
        let circle = EntityData::with_points(vec![Point::new(1.0, 1.0)]).radius(0.5);
        scene.add_entity_to_block(EntityKind::Circle, &circle, "a").unwrap();
        scene
    }

    #[test]
    fn test_standard_tables() {
        let scene = Scene::new();
        assert!(scene.layers.contains("0"));
        assert!(scene.line_types.contains("Continuous"));
        assert!(scene.text_styles.contains("STANDARD"));
        assert!(scene.dim_styles.contains("Standard"));
    }

    #[test]
    fn test_block_children() {
        let scene = scene_with_block();
        assert_eq!(scene.len(), 1);
        assert_eq!(scene.block("A").map(|b| b.children().len()), Some(2));
        assert_eq!(scene.entities().count(), 0);
    }

    #[test]
    fn test_redefined_block_replaces_earlier() {
        let mut scene = scene_with_block();
        let origin = Point::new(5.0, 5.0);
        scene
            .add_entity(EntityKind::Block, &EntityData::with_points(vec![origin]).name("a"))
            .unwrap();
        let line = EntityData::with_points(vec![Point::new(0.0, 0.0), Point::new(0.0, 4.0)]);
        scene.add_entity_to_block(EntityKind::Line, &line, "A").unwrap();

        assert_eq!(scene.len(), 1);
        assert_eq!(scene.blocks().count(), 1);
        let block = scene.block("A").unwrap();
        assert_eq!(block.base_point(), origin);
        assert_eq!(block.children().len(), 1);
        assert!(scene.notifications.has_type(NotificationType::Warning));
    }

    #[test]
    fn test_unknown_block() {
        let mut scene = Scene::new();
        let line = EntityData::with_points(vec![Point::ORIGIN, Point::new(1.0, 0.0)]);
        let err = scene.add_entity_to_block(EntityKind::Line, &line, "Missing").unwrap_err();
        assert!(matches!(err, DxfError::UnknownBlock(name) if name == "Missing"));
    }

    #[test]
    fn test_add_layer_updates_existing() {
        let mut scene = Scene::new();
        scene.add_layer(Layer::with_color("0", Color::RED));
        assert_eq!(scene.layers.len(), 1);
        assert_eq!(scene.layers.layer_colour("0"), Some(Color::RED));
    }

    #[test]
    fn test_explode_insert() {
        let scene = scene_with_block();
        let insert = Insert::new("A", Point::new(10.0, 10.0)).with_rotation(FRAC_PI_2);
        let parts = scene.explode_insert(&insert).unwrap();
        assert_eq!(parts.len(), 2);
        let line = parts[0].as_entity();
        assert!(line.points()[0].is_same(&Point::new(10.0, 10.0), 1e-9));
        assert!(line.points()[1].is_same(&Point::new(10.0, 12.0), 1e-9));
        match &parts[1] {
            EntityType::Circle(circle) => {
                assert!(circle.center().is_same(&Point::new(9.0, 11.0), 1e-9));
                assert!((circle.radius() - 0.5).abs() < 1e-9);
            }
            other => panic!("unexpected {:?}", other.kind()),
        }
    }

    #[test]
    fn test_explode_mirrored_arc_keeps_shape() {
        let mut scene = Scene::new();
        scene.push(EntityType::Block(Block::new("B", Point::ORIGIN)));
        let arc = Arc::from_center_radius_angles(Point::ORIGIN, 1.0, 0.0, FRAC_PI_2);
        scene.block_mut("B").unwrap().add_child(EntityType::Arc(arc));
        let insert = Insert::new("B", Point::ORIGIN).with_scale(-1.0, 1.0);
        let parts = scene.explode_insert(&insert).unwrap();
        let bbox = parts[0].as_entity().extremes();
        assert!((bbox.min.x + 1.0).abs() < 1e-9 && bbox.max.x.abs() < 1e-9);
        assert!(bbox.min.y.abs() < 1e-9 && (bbox.max.y - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_explode_resolves_byblock() {
        let mut scene = Scene::new();
        scene.push(EntityType::Block(Block::new("C", Point::ORIGIN)));
        let mut line = Line::from_coords(0.0, 0.0, 1.0, 0.0);
        line.common.color = Color::ByBlock;
        scene.block_mut("C").unwrap().add_child(EntityType::Line(line));
        let mut insert = Insert::new("C", Point::ORIGIN);
        insert.common.color = Color::RED;
        insert.common.layer = "Walls".to_string();
        let parts = scene.explode_insert(&insert).unwrap();
        assert_eq!(parts[0].as_entity().color(), Color::RED);
        assert_eq!(parts[0].as_entity().layer(), "Walls");
    }

    #[test]
    fn test_explode_unknown_block() {
        let scene = Scene::new();
        let err = scene.explode_insert(&Insert::new("Nope", Point::ORIGIN)).unwrap_err();
        assert!(matches!(err, DxfError::UnknownBlock(_)));
    }

    #[test]
    fn test_selection() {
        let mut scene = scene_with_block();
        scene.push(EntityType::Circle(Circle::from_center_radius(Point::ORIGIN, 5.0)));
        scene.push(EntityType::Insert(Insert::new("A", Point::new(20.0, 0.0))));
        scene.push(EntityType::Line(Line::from_coords(-20.0, 0.0, -10.0, 0.0)));

        let window = BoundingBox2D::new(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
        assert_eq!(scene.select_window(&window), vec![1]);

        let crossing = BoundingBox2D::new(Point::new(-15.0, -1.0), Point::new(21.0, 1.0));
        assert_eq!(scene.select_crossing(&crossing), vec![1, 2, 3]);

        let around_insert = BoundingBox2D::new(Point::new(19.0, -1.0), Point::new(23.0, 3.0));
        assert_eq!(scene.select_window(&around_insert), vec![2]);
    }

    #[test]
    fn test_closest_entity() {
        let mut scene = Scene::new();
        scene.push(EntityType::Line(Line::from_coords(0.0, 0.0, 10.0, 0.0)));
        scene.push(EntityType::Line(Line::from_coords(0.0, 3.0, 10.0, 3.0)));
        let (index, closest) = scene.closest_entity(Point::new(5.0, 2.0)).unwrap();
        assert_eq!(index, 1);
        assert_eq!(closest.point, Point::new(5.0, 3.0));
        assert!(scene.closest_entity(Point::new(50.0, 2.0)).is_none());
    }

    #[test]
    fn test_scene_snaps_sorted() {
        let mut scene = Scene::new();
        scene.push(EntityType::Line(Line::from_coords(0.0, 0.0, 10.0, 0.0)));
        let snaps = scene.snaps(Point::new(0.5, 0.0), 1.0, &SnapSettings::default());
        assert!(!snaps.is_empty());
        assert!(snaps.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[test]
    fn test_resolved_colour() {
        let mut scene = Scene::new();
        scene.add_layer(Layer::with_color("Walls", Color::BLUE));
        let line = Line::from_coords(0.0, 0.0, 1.0, 0.0);
        let mut walls = line.clone();
        walls.common.layer = "Walls".to_string();
        assert_eq!(scene.resolved_colour(&walls), Color::BLUE);
        assert_eq!(scene.resolved_colour(&line), Color::WHITE);
    }
}
