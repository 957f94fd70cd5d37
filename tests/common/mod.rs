//! Shared test utilities for draftdxf integration tests.
//!
//! Read/write helpers, a minimal document wrapper for hand-written entity
//! sections, and tolerance-based comparison of construction data.

#![allow(dead_code)]

pub mod builders;

use draftdxf::entities::{EntityData, EntityType};
use draftdxf::io::dxf::{DxfReader, DxfWriter};
use draftdxf::{Point, Scene};

/// Default tolerance for floating-point comparisons.
pub const TOL: f64 = 1e-6;

// ===========================================================================
// Read / write helpers
// ===========================================================================

/// Read DXF text, panicking on a fatal error.
pub fn read_str(text: &str) -> Scene {
    DxfReader::new(text)
        .read()
        .unwrap_or_else(|e| panic!("Failed to read DXF: {e:?}"))
}

/// Write a scene to DXF text.
pub fn write_str(scene: &Scene) -> String {
    DxfWriter::new(scene)
        .write_to_string()
        .unwrap_or_else(|e| panic!("Failed to write DXF: {e:?}"))
}

/// Write then read back.
pub fn roundtrip(scene: &Scene) -> Scene {
    read_str(&write_str(scene))
}

/// Wrap hand-written entity records in a minimal document.
///
/// `body` holds code/value lines and must end with a newline.
pub fn entities_document(body: &str) -> String {
    format!("0\nSECTION\n2\nENTITIES\n{body}0\nENDSEC\n0\nEOF\n")
}

// ===========================================================================
// Comparison
// ===========================================================================

/// Check approximate equality of two f64 values within `tol`.
pub fn approx_eq(a: f64, b: f64, tol: f64) -> bool {
    (a - b).abs() < tol
}

/// Assert two f64 values are approximately equal.
pub fn assert_f64_eq(a: f64, b: f64, tol: f64) {
    assert!(
        approx_eq(a, b, tol),
        "f64 mismatch: {a} vs {b} (delta={}, tol={tol})",
        (a - b).abs()
    );
}

/// Assert two points are approximately equal component-wise.
pub fn assert_point_eq(a: Point, b: Point, tol: f64) {
    assert!(
        approx_eq(a.x, b.x, tol) && approx_eq(a.y, b.y, tol),
        "Point mismatch: ({},{}) vs ({},{}) tol={tol}",
        a.x,
        a.y,
        b.x,
        b.y
    );
}

fn check_option(diffs: &mut Vec<String>, name: &str, a: Option<f64>, b: Option<f64>) {
    match (a, b) {
        (Some(a), Some(b)) if approx_eq(a, b, TOL) => {}
        (None, None) => {}
        _ => diffs.push(format!("{name}: {a:?} vs {b:?}")),
    }
}

fn check_points(diffs: &mut Vec<String>, name: &str, a: &[Point], b: &[Point]) {
    if a.len() != b.len() {
        diffs.push(format!("{name}: {} points vs {}", a.len(), b.len()));
        return;
    }
    for (i, (p, q)) in a.iter().zip(b).enumerate() {
        if !approx_eq(p.x, q.x, TOL) || !approx_eq(p.y, q.y, TOL) {
            diffs.push(format!("{name}[{i}]: ({},{}) vs ({},{})", p.x, p.y, q.x, q.y));
        }
    }
}

fn check_values(diffs: &mut Vec<String>, name: &str, a: &[f64], b: &[f64]) {
    if a.len() != b.len() || a.iter().zip(b).any(|(x, y)| !approx_eq(*x, *y, TOL)) {
        diffs.push(format!("{name}: {a:?} vs {b:?}"));
    }
}

/// Differences between two sets of construction data, floats within [`TOL`].
pub fn data_diffs(a: &EntityData, b: &EntityData) -> Vec<String> {
    let mut diffs = Vec::new();
    check_points(&mut diffs, "points", &a.points, &b.points);
    if a.layer != b.layer {
        diffs.push(format!("layer: {} vs {}", a.layer, b.layer));
    }
    if a.color != b.color {
        diffs.push(format!("color: {:?} vs {:?}", a.color, b.color));
    }
    if a.line_weight != b.line_weight {
        diffs.push(format!("line_weight: {:?} vs {:?}", a.line_weight, b.line_weight));
    }
    check_option(&mut diffs, "radius", a.radius, b.radius);
    check_option(&mut diffs, "start_angle", a.start_angle, b.start_angle);
    check_option(&mut diffs, "end_angle", a.end_angle, b.end_angle);
    check_option(&mut diffs, "ratio", a.ratio, b.ratio);
    check_option(&mut diffs, "start_param", a.start_param, b.start_param);
    check_option(&mut diffs, "end_param", a.end_param, b.end_param);
    check_option(&mut diffs, "height", a.height, b.height);
    check_option(&mut diffs, "rotation", a.rotation, b.rotation);
    if a.text != b.text || a.style != b.style || a.name != b.name {
        diffs.push(format!(
            "text/style/name: {:?}/{:?}/{:?} vs {:?}/{:?}/{:?}",
            a.text, a.style, a.name, b.text, b.style, b.name
        ));
    }
    if a.horizontal_alignment != b.horizontal_alignment || a.vertical_alignment != b.vertical_alignment {
        diffs.push("alignment differs".to_string());
    }
    match (a.alignment_point, b.alignment_point) {
        (Some(p), Some(q)) => check_points(&mut diffs, "alignment_point", &[p], &[q]),
        (None, None) => {}
        (p, q) => diffs.push(format!("alignment_point: {p:?} vs {q:?}")),
    }
    check_values(&mut diffs, "bulges", &a.bulges, &b.bulges);
    if a.closed != b.closed {
        diffs.push(format!("closed: {} vs {}", a.closed, b.closed));
    }
    if a.degree != b.degree {
        diffs.push(format!("degree: {:?} vs {:?}", a.degree, b.degree));
    }
    check_values(&mut diffs, "knots", &a.knots, &b.knots);
    check_points(&mut diffs, "fit_points", &a.fit_points, &b.fit_points);
    match (a.scale, b.scale) {
        (Some(s), Some(t)) => check_values(&mut diffs, "scale", &[s.0, s.1], &[t.0, t.1]),
        (None, None) => {}
        (s, t) => diffs.push(format!("scale: {s:?} vs {t:?}")),
    }
    if a.dimension_type != b.dimension_type {
        diffs.push(format!("dimension_type: {} vs {}", a.dimension_type, b.dimension_type));
    }
    diffs
}

/// Assert two items carry the same kind and construction data, block
/// children included.
pub fn assert_items_equivalent(a: &EntityType, b: &EntityType) {
    assert_eq!(a.kind(), b.kind(), "kind mismatch");
    let diffs = data_diffs(&a.as_entity().to_data(), &b.as_entity().to_data());
    assert!(diffs.is_empty(), "{:?} differs: {}", a.kind(), diffs.join("; "));

    if let (Some(x), Some(y)) = (a.as_block(), b.as_block()) {
        assert_eq!(x.children().len(), y.children().len(), "child count of block {}", x.name());
        for (p, q) in x.children().iter().zip(y.children()) {
            assert_items_equivalent(p, q);
        }
    }
}

/// Assert two scenes hold equivalent blocks and the same entities in the
/// same order. Blocks are matched by name: a written file carries them
/// ahead of every entity.
pub fn assert_scenes_equivalent(a: &Scene, b: &Scene) {
    assert_eq!(a.len(), b.len(), "item count mismatch");

    let ours: Vec<&EntityType> = a.entities().collect();
    let theirs: Vec<&EntityType> = b.entities().collect();
    assert_eq!(ours.len(), theirs.len(), "entity count mismatch");
    for (x, y) in ours.into_iter().zip(theirs) {
        assert_items_equivalent(x, y);
    }

    for block in a.blocks() {
        let other = b
            .items()
            .iter()
            .find(|item| item.as_block().is_some_and(|o| o.name() == block.name()))
            .unwrap_or_else(|| panic!("block {} missing", block.name()));
        let own = a
            .items()
            .iter()
            .find(|item| item.as_block().is_some_and(|o| o.name() == block.name()))
            .unwrap();
        assert_items_equivalent(own, other);
    }
}
