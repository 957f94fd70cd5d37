//! Test scene builders.
//!
//! `create_all_kinds_scene()` produces a scene holding one instance of every
//! entity kind, a block with children, and populated tables, laid out on a
//! grid so extents stay readable.

#![allow(dead_code)]

use draftdxf::entities::{EntityData, EntityKind};
use draftdxf::tables::{DimStyle, Layer, LineType, TextStyle};
use draftdxf::{Color, LineWeight, Point, Scene, SceneBuilder};

/// Grid spacing between sample entities.
pub const SPACING: f64 = 25.0;

fn add(scene: &mut Scene, kind: EntityKind, data: EntityData) {
    scene
        .add_entity(kind, &data)
        .unwrap_or_else(|e| panic!("cannot build {kind:?}: {e}"));
}

/// Layers, line types and styles the sample entities refer to.
pub fn populate_tables(scene: &mut Scene) {
    scene.add_line_type(LineType::with_pattern("Dashed", "Dashed __ __ __", vec![5.0, -2.5]));

    let mut walls = Layer::with_color("Walls", Color::RED);
    walls.line_weight = LineWeight::W0_50;
    scene.add_layer(walls);

    let mut hidden = Layer::with_color("Hidden", Color::from_rgb(0x12, 0x34, 0x56));
    hidden.line_type = "Dashed".to_string();
    hidden.off = true;
    scene.add_layer(hidden);

    let mut notes = TextStyle::new("Notes");
    notes.font_file = "romans.shx".to_string();
    notes.width_factor = 0.8;
    scene.add_style(notes);

    let mut arch = DimStyle::new("Arch");
    arch.dimtxt = 3.5;
    arch.dimdec = 2;
    scene.add_dim_style(arch);

    scene.set_current_layer("Walls");
}

/// A scene with one entity of every kind and a populated table set.
pub fn create_all_kinds_scene() -> Scene {
    let mut scene = Scene::new();
    populate_tables(&mut scene);
    let sp = SPACING;

    // Row 1: curves
    add(
        &mut scene,
        EntityKind::Line,
        EntityData::with_points(vec![Point::new(0.0, 0.0), Point::new(10.0, 10.0)])
            .layer("Walls")
            .color(Color::GREEN),
    );
    add(
        &mut scene,
        EntityKind::Circle,
        EntityData::with_points(vec![Point::new(sp, 0.0)]).radius(5.0).color(Color::BLUE),
    );
    add(
        &mut scene,
        EntityKind::Arc,
        EntityData::with_points(vec![Point::new(2.0 * sp, 0.0)])
            .radius(5.0)
            .angles(30.0, 210.0)
            .line_weight(LineWeight::W0_25),
    );
    let mut ellipse = EntityData::with_points(vec![Point::new(3.0 * sp, 0.0), Point::new(8.0, 4.0)]);
    ellipse.ratio = Some(0.5);
    ellipse.start_param = Some(0.25);
    ellipse.end_param = Some(4.5);
    add(&mut scene, EntityKind::Ellipse, ellipse.color(Color::from_rgb(200, 100, 50)));

    // Row 2: outlines
    add(
        &mut scene,
        EntityKind::Rectangle,
        EntityData::with_points(vec![Point::new(0.0, sp), Point::new(12.0, sp + 6.0)]).layer("Hidden"),
    );
    add(
        &mut scene,
        EntityKind::FilledRectangle,
        EntityData::with_points(vec![Point::new(sp, sp), Point::new(sp + 8.0, sp + 4.0)]),
    );
    add(
        &mut scene,
        EntityKind::Polyline,
        EntityData::with_points(vec![
            Point::new(2.0 * sp, sp),
            Point::new(2.0 * sp + 10.0, sp),
            Point::new(2.0 * sp + 10.0, sp + 5.0),
        ])
        .bulges(vec![0.0, 0.5, 0.0])
        .closed(true),
    );
    let mut spline = EntityData::with_points(vec![
        Point::new(3.0 * sp, sp),
        Point::new(3.0 * sp + 3.0, sp + 6.0),
        Point::new(3.0 * sp + 7.0, sp - 2.0),
        Point::new(3.0 * sp + 10.0, sp + 4.0),
    ]);
    spline.degree = Some(3);
    add(&mut scene, EntityKind::Spline, spline);

    // Row 3: annotation
    let mut text = EntityData::with_points(vec![Point::new(0.0, 2.0 * sp)])
        .text("Plan^view 1:50")
        .height(2.5)
        .rotation(15.0);
    text.style = Some("Notes".to_string());
    add(&mut scene, EntityKind::Text, text);

    let mut centred = EntityData::with_points(vec![Point::new(sp, 2.0 * sp)])
        .text("Centred")
        .height(1.5);
    centred.horizontal_alignment = 1;
    centred.vertical_alignment = 2;
    centred.alignment_point = Some(Point::new(sp + 4.0, 2.0 * sp));
    add(&mut scene, EntityKind::Text, centred);

    let mut dimension = EntityData::with_points(vec![
        Point::new(2.0 * sp, 2.0 * sp),
        Point::new(2.0 * sp + 10.0, 2.0 * sp),
        Point::new(2.0 * sp + 10.0, 2.0 * sp + 3.0),
        Point::new(2.0 * sp + 5.0, 2.0 * sp + 3.0),
    ]);
    dimension.style = Some("Arch".to_string());
    dimension.dimension_type = 0;
    add(&mut scene, EntityKind::Dimension, dimension);

    // Row 4: a block and two inserts of it
    add_door_block(&mut scene);
    add(
        &mut scene,
        EntityKind::Insert,
        EntityData::with_points(vec![Point::new(0.0, 3.0 * sp)]).name("Door"),
    );
    let mut turned = EntityData::with_points(vec![Point::new(sp, 3.0 * sp)])
        .name("Door")
        .rotation(90.0);
    turned.scale = Some((2.0, 0.5));
    add(&mut scene, EntityKind::Insert, turned);

    scene
}

/// Block "Door": a frame line and a swing arc, based at the origin.
pub fn add_door_block(scene: &mut Scene) {
    let mut block = EntityData::with_points(vec![Point::ORIGIN]).name("Door");
    block.text = Some("single swing door".to_string());
    add(scene, EntityKind::Block, block);

    scene
        .add_entity_to_block(
            EntityKind::Line,
            &EntityData::with_points(vec![Point::ORIGIN, Point::new(0.0, 9.0)]),
            "Door",
        )
        .unwrap();
    scene
        .add_entity_to_block(
            EntityKind::Arc,
            &EntityData::with_points(vec![Point::ORIGIN]).radius(9.0).angles(0.0, 90.0),
            "Door",
        )
        .unwrap();
}

/// `count` lines fanned out around the origin, for benches and bulk tests.
pub fn create_line_fan(count: usize) -> Scene {
    let mut scene = Scene::new();
    for i in 0..count {
        let angle = i as f64 * 0.01;
        let end = Point::new(100.0 * angle.cos(), 100.0 * angle.sin());
        add(&mut scene, EntityKind::Line, EntityData::with_points(vec![Point::ORIGIN, end]));
    }
    scene
}
