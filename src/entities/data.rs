//! Construction data shared by the reader and interactive creation

use crate::types::{Color, LineWeight, Point};

/// Fields an entity may be built from.
///
/// The reader fills this from a record's tags; interactive tools fill
/// `points` (plus whatever else they know). Angles are in degrees, as stored
/// on the wire. Fields a variant does not use are ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityData {
    /// Ordered defining points
    pub points: Vec<Point>,
    /// Layer name (empty means "0")
    pub layer: String,
    pub color: Color,
    pub line_weight: LineWeight,

    /// Radius (40) of circles and arcs
    pub radius: Option<f64>,
    /// Start angle in degrees (50)
    pub start_angle: Option<f64>,
    /// End angle in degrees (51)
    pub end_angle: Option<f64>,

    /// Minor to major axis ratio of an ellipse (40)
    pub ratio: Option<f64>,
    /// Elliptical start parameter in radians (41)
    pub start_param: Option<f64>,
    /// Elliptical end parameter in radians (42)
    pub end_param: Option<f64>,

    /// Text value (1)
    pub text: Option<String>,
    /// Text height (40)
    pub height: Option<f64>,
    /// Rotation in degrees (50)
    pub rotation: Option<f64>,
    /// Text or dimension style name (7 / 3)
    pub style: Option<String>,
    /// Text horizontal alignment (72)
    pub horizontal_alignment: i16,
    /// Text vertical alignment (73)
    pub vertical_alignment: i16,
    /// Second alignment point (11)
    pub alignment_point: Option<Point>,
    /// Text generation flags (71)
    pub generation_flags: i16,

    /// Block name of blocks, inserts and dimensions (2)
    pub name: Option<String>,
    /// Flag word (70)
    pub flags: i32,

    /// Per-vertex bulges of a polyline (42)
    pub bulges: Vec<f64>,
    /// Closed polyline or spline
    pub closed: bool,

    /// Spline degree (71)
    pub degree: Option<i32>,
    /// Spline knot vector (40)
    pub knots: Vec<f64>,
    /// Spline fit points (11)
    pub fit_points: Vec<Point>,

    /// Insert x/y scale (41/42)
    pub scale: Option<(f64, f64)>,
    /// Dimension type (70)
    pub dimension_type: i16,
}

impl Default for EntityData {
    fn default() -> Self {
        EntityData {
            points: Vec::new(),
            layer: "0".to_string(),
            color: Color::ByLayer,
            line_weight: LineWeight::ByLayer,
            radius: None,
            start_angle: None,
            end_angle: None,
            ratio: None,
            start_param: None,
            end_param: None,
            text: None,
            height: None,
            rotation: None,
            style: None,
            horizontal_alignment: 0,
            vertical_alignment: 0,
            alignment_point: None,
            generation_flags: 0,
            name: None,
            flags: 0,
            bulges: Vec::new(),
            closed: false,
            degree: None,
            knots: Vec::new(),
            fit_points: Vec::new(),
            scale: None,
            dimension_type: 0,
        }
    }
}

impl EntityData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Data holding only the given points
    pub fn with_points(points: Vec<Point>) -> Self {
        EntityData {
            points,
            ..Self::default()
        }
    }

    pub fn layer(mut self, layer: impl Into<String>) -> Self {
        self.layer = layer.into();
        self
    }

    pub fn color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn line_weight(mut self, line_weight: LineWeight) -> Self {
        self.line_weight = line_weight;
        self
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn height(mut self, height: f64) -> Self {
        self.height = Some(height);
        self
    }

    pub fn radius(mut self, radius: f64) -> Self {
        self.radius = Some(radius);
        self
    }

    /// Start and end angle in degrees
    pub fn angles(mut self, start: f64, end: f64) -> Self {
        self.start_angle = Some(start);
        self.end_angle = Some(end);
        self
    }

    /// Rotation in degrees
    pub fn rotation(mut self, degrees: f64) -> Self {
        self.rotation = Some(degrees);
        self
    }

    pub fn closed(mut self, closed: bool) -> Self {
        self.closed = closed;
        self
    }

    pub fn bulges(mut self, bulges: Vec<f64>) -> Self {
        self.bulges = bulges;
        self
    }

    /// The point at `index`, if present
    pub fn point(&self, index: usize) -> Option<Point> {
        self.points.get(index).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let data = EntityData::new();
        assert_eq!(data.layer, "0");
        assert_eq!(data.color, Color::ByLayer);
        assert!(data.points.is_empty());
    }

    #[test]
    fn test_builder() {
        let data = EntityData::with_points(vec![Point::ORIGIN])
            .layer("Walls")
            .color(Color::RED)
            .radius(2.5);
        assert_eq!(data.layer, "Walls");
        assert_eq!(data.radius, Some(2.5));
        assert_eq!(data.point(0), Some(Point::ORIGIN));
        assert_eq!(data.point(1), None);
    }
}
