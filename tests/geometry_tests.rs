//! Geometry queries of the entity contract
//!
//! Property tests check that closest points and sampled shapes stay inside
//! the extremes an entity reports; the fixed cases pin known answers.

mod common;

use common::{assert_f64_eq, assert_point_eq, TOL};
use draftdxf::entities::{Arc, Circle, Ellipse, Entity, EntityData, EntityKind, EntityType, Line, Rectangle};
use draftdxf::intersect::{intersect, intersect_extended};
use draftdxf::types::color::{acad_colour, hex_colour};
use draftdxf::{BoundingBox2D, Color, Point, Scene, SceneBuilder};
use proptest::prelude::*;

const SLACK: f64 = 1e-7;

fn coord() -> impl Strategy<Value = f64> {
    -1000.0..1000.0f64
}

fn point() -> impl Strategy<Value = Point> {
    (coord(), coord()).prop_map(|(x, y)| Point::new(x, y))
}

fn assert_inside(bbox: &BoundingBox2D, p: Point) {
    assert!(
        bbox.inflate(SLACK).contains(p),
        "({}, {}) outside {:?}",
        p.x,
        p.y,
        bbox.to_array()
    );
}

proptest! {
    #[test]
    fn line_closest_point_within_extremes(a in point(), b in point(), q in point()) {
        prop_assume!(a.distance(&b) > 1e-3);
        let line = Line::from_points(a, b);
        let closest = line.closest_point(q);
        if closest.found {
            assert_inside(&line.extremes(), closest.point);
            prop_assert!(closest.distance <= q.distance(&a) + SLACK);
            prop_assert!(closest.distance <= q.distance(&b) + SLACK);
        }
    }

    #[test]
    fn circle_closest_point_on_boundary(c in point(), r in 0.1..500.0f64, q in point()) {
        prop_assume!(q.distance(&c) > 1e-3);
        let circle = Circle::from_center_radius(c, r);
        let closest = circle.closest_point(q);
        prop_assert!(closest.found);
        assert_inside(&circle.extremes(), closest.point);
        prop_assert!((closest.point.distance(&c) - r).abs() < 1e-6 * r.max(1.0));
        prop_assert!((closest.distance - (q.distance(&c) - r).abs()).abs() < 1e-6 * r.max(1.0));
    }

    #[test]
    fn arc_closest_point_within_extremes(
        c in point(),
        r in 0.1..500.0f64,
        start in 0.0..360.0f64,
        end in 0.0..360.0f64,
        q in point(),
    ) {
        let arc = Arc::from_center_radius_angles(c, r, start.to_radians(), end.to_radians());
        let closest = arc.closest_point(q);
        if closest.found {
            assert_inside(&arc.extremes(), closest.point);
        }
        assert_inside(&arc.extremes(), arc.start_point());
        assert_inside(&arc.extremes(), arc.end_point());
    }

    #[test]
    fn ellipse_samples_within_extremes(
        c in point(),
        rx in 0.1..300.0f64,
        ratio in 0.05..1.0f64,
        rotation in 0.0..6.3f64,
        q in point(),
    ) {
        let ellipse = Ellipse::new(c, rx, rx * ratio, rotation);
        let bbox = ellipse.extremes();
        for p in ellipse.sample() {
            assert_inside(&bbox, p);
        }
        let closest = ellipse.closest_point(q);
        if closest.found {
            assert_inside(&bbox, closest.point);
        }
    }

    #[test]
    fn rectangle_closest_point_within_extremes(a in point(), b in point(), q in point()) {
        prop_assume!((a.x - b.x).abs() > 1e-3 && (a.y - b.y).abs() > 1e-3);
        let rect = Rectangle::from_corners(a, b);
        let closest = rect.closest_point(q);
        if closest.found {
            assert_inside(&rect.extremes(), closest.point);
        }
    }

    #[test]
    fn line_intersections_lie_on_both_segments(a in point(), b in point(), c in point(), d in point()) {
        prop_assume!(a.distance(&b) > 1e-3 && c.distance(&d) > 1e-3);
        // near-parallel pairs amplify rounding
        prop_assume!((b - a).normalize().cross(&(d - c).normalize()).abs() > 1e-3);
        let first = Line::from_points(a, b);
        let second = Line::from_points(c, d);
        let result = intersect(&first.intersect_points(), &second.intersect_points());
        for p in &result.points {
            assert_inside(&first.extremes().inflate(1e-6), *p);
            assert_inside(&second.extremes().inflate(1e-6), *p);
        }
    }

    #[test]
    fn hex_colour_roundtrip(r in any::<u8>(), g in any::<u8>(), b in any::<u8>()) {
        let colour = Color::from_rgb(r, g, b);
        prop_assert_eq!(Color::from_hex(&colour.to_hex()), Some(colour));
    }
}

#[test]
fn test_line_closest_point() {
    let line = Line::from_coords(0.0, 0.0, 10.0, 0.0);
    let closest = line.closest_point(Point::new(5.0, 5.0));
    assert!(closest.found);
    assert_point_eq(closest.point, Point::new(5.0, 0.0), TOL);
    assert_f64_eq(closest.distance, 5.0, TOL);

    // no perpendicular foot on the segment
    assert!(!line.closest_point(Point::new(20.0, 5.0)).found);
}

#[test]
fn test_circle_window_and_crossing() {
    let circle = Circle::from_center_radius(Point::ORIGIN, 5.0);

    let around = BoundingBox2D::new(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
    assert!(circle.within(&around));
    assert!(!circle.touched(&around));

    let cutting = BoundingBox2D::new(Point::new(3.0, -10.0), Point::new(10.0, 10.0));
    assert!(!circle.within(&cutting));
    assert!(circle.touched(&cutting));
}

#[test]
fn test_line_line_intersection() {
    let a = Line::from_coords(0.0, 0.0, 10.0, 10.0);
    let b = Line::from_coords(0.0, 10.0, 10.0, 0.0);
    let result = intersect(&a.intersect_points(), &b.intersect_points());
    assert!(result.is_intersection());
    assert_eq!(result.points.len(), 1);
    assert_point_eq(result.points[0], Point::new(5.0, 5.0), TOL);
}

#[test]
fn test_extended_intersection_beyond_segments() {
    let a = Line::from_coords(0.0, 0.0, 1.0, 0.0);
    let b = Line::from_coords(5.0, -1.0, 5.0, 2.0);
    assert!(!intersect(&a.intersect_points(), &b.intersect_points()).is_intersection());

    let extended = intersect_extended(&a.intersect_points(), &b.intersect_points());
    assert!(extended.is_intersection());
    assert_point_eq(extended.points[0], Point::new(5.0, 0.0), TOL);
}

#[test]
fn test_line_circle_intersection() {
    let line = Line::from_coords(-10.0, 0.0, 10.0, 0.0);
    let circle = Circle::from_center_radius(Point::ORIGIN, 5.0);
    let mut points = intersect(&line.intersect_points(), &circle.intersect_points()).points;
    points.sort_by(|a, b| a.x.total_cmp(&b.x));
    assert_eq!(points.len(), 2);
    assert_point_eq(points[0], Point::new(-5.0, 0.0), TOL);
    assert_point_eq(points[1], Point::new(5.0, 0.0), TOL);
}

#[test]
fn test_colour_lookups() {
    assert_eq!(hex_colour(1), Some("#FF0000"));
    assert_eq!(hex_colour(256), Some("BYLAYER"));
    assert_eq!(hex_colour(0), Some("BYBLOCK"));
    assert_eq!(hex_colour(300), None);
    assert_eq!(acad_colour("#FF0000"), Some(1));
    assert_eq!(acad_colour("BYLAYER"), Some(256));
    assert_eq!(acad_colour("nonsense"), None);
}

#[test]
fn test_scene_selection() {
    let mut scene = Scene::new();
    scene
        .add_entity(EntityKind::Circle, &EntityData::with_points(vec![Point::ORIGIN]).radius(5.0))
        .unwrap();
    scene
        .add_entity(
            EntityKind::Line,
            &EntityData::with_points(vec![Point::new(20.0, 0.0), Point::new(30.0, 0.0)]),
        )
        .unwrap();

    let window = BoundingBox2D::new(Point::new(-10.0, -10.0), Point::new(10.0, 10.0));
    assert_eq!(scene.select_window(&window), vec![0]);

    let crossing = BoundingBox2D::new(Point::new(3.0, -1.0), Point::new(25.0, 1.0));
    let mut hit = scene.select_crossing(&crossing);
    hit.sort_unstable();
    assert_eq!(hit, vec![0, 1]);

    let (index, closest) = scene.closest_entity(Point::new(25.0, 2.0)).unwrap();
    assert_eq!(index, 1);
    assert_f64_eq(closest.distance, 2.0, TOL);
}

#[test]
fn test_inserted_block_extremes() {
    let mut scene = Scene::new();
    scene
        .add_entity(EntityKind::Block, &EntityData::with_points(vec![Point::ORIGIN]).name("Box"))
        .unwrap();
    scene
        .add_entity_to_block(
            EntityKind::Rectangle,
            &EntityData::with_points(vec![Point::ORIGIN, Point::new(2.0, 1.0)]),
            "Box",
        )
        .unwrap();
    let mut insert = EntityData::with_points(vec![Point::new(10.0, 10.0)]).name("Box");
    insert.scale = Some((3.0, 3.0));
    scene.add_entity(EntityKind::Insert, &insert).unwrap();

    let exploded = match &scene.items()[1] {
        EntityType::Insert(insert) => scene.explode_insert(insert).unwrap(),
        other => panic!("expected an insert, got {:?}", other.kind()),
    };
    assert_eq!(exploded.len(), 1);
    let bbox = exploded[0].as_entity().extremes();
    assert_point_eq(bbox.min, Point::new(10.0, 10.0), TOL);
    assert_point_eq(bbox.max, Point::new(16.0, 13.0), TOL);

    let extent = scene.extremes().unwrap();
    assert_point_eq(extent.max, Point::new(16.0, 13.0), TOL);
}
