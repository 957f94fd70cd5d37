//! Shape against axis-aligned rectangle, used by crossing selection

use super::{intersect, CanonicalForm, Intersection};
use crate::types::{BoundingBox2D, Point};

/// Intersect any form with the edges of `rect`
pub fn intersect_rect(form: &CanonicalForm, rect: &BoundingBox2D) -> Intersection {
    intersect(form, &CanonicalForm::from_rect(rect))
}

pub fn line_rect(start: Point, end: Point, rect: &BoundingBox2D) -> Intersection {
    intersect_rect(&CanonicalForm::Line { start, end }, rect)
}

pub fn circle_rect(centre: Point, radius: f64, rect: &BoundingBox2D) -> Intersection {
    intersect_rect(&CanonicalForm::Circle { centre, radius }, rect)
}

pub fn arc_rect(centre: Point, radius: f64, start_angle: f64, end_angle: f64, rect: &BoundingBox2D) -> Intersection {
    intersect_rect(
        &CanonicalForm::Arc {
            centre,
            radius,
            start_angle,
            end_angle,
        },
        rect,
    )
}

pub fn ellipse_rect(
    centre: Point,
    radius_x: f64,
    radius_y: f64,
    rotation: f64,
    rect: &BoundingBox2D,
) -> Intersection {
    intersect_rect(
        &CanonicalForm::Ellipse {
            centre,
            radius_x,
            radius_y,
            rotation,
            start_param: 0.0,
            end_param: std::f64::consts::TAU,
        },
        rect,
    )
}

pub fn rect_rect(corners: [Point; 4], rect: &BoundingBox2D) -> Intersection {
    intersect_rect(&CanonicalForm::Rectangle { corners }, rect)
}
