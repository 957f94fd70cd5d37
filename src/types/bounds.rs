//! Axis-aligned bounding boxes and selection rectangles

use super::Point;
use std::fmt;

/// 2D axis-aligned box.
///
/// Used both for entity extremes and for the selection rectangles passed to
/// `touched`/`within`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox2D {
    /// Minimum point (lower-left corner)
    pub min: Point,
    /// Maximum point (upper-right corner)
    pub max: Point,
}

impl Default for BoundingBox2D {
    fn default() -> Self {
        BoundingBox2D {
            min: Point::ORIGIN,
            max: Point::ORIGIN,
        }
    }
}

impl BoundingBox2D {
    /// Create a new bounding box from min and max points
    pub fn new(min: Point, max: Point) -> Self {
        BoundingBox2D { min, max }
    }

    /// Box spanned by two opposite corners given in any order
    pub fn from_corners(a: Point, b: Point) -> Self {
        BoundingBox2D {
            min: Point::new(a.x.min(b.x), a.y.min(b.y)),
            max: Point::new(a.x.max(b.x), a.y.max(b.y)),
        }
    }

    /// Create a bounding box from a single point
    pub fn from_point(point: Point) -> Self {
        BoundingBox2D {
            min: point,
            max: point,
        }
    }

    /// Create a bounding box that contains all given points
    pub fn from_points(points: &[Point]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bbox = BoundingBox2D::from_point(*first);
        for point in rest {
            bbox.expand_to_include(*point);
        }
        Some(bbox)
    }

    /// `[xmin, xmax, ymin, ymax]`
    pub fn to_array(&self) -> [f64; 4] {
        [self.min.x, self.max.x, self.min.y, self.max.y]
    }

    /// Get the width of the bounding box
    pub fn width(&self) -> f64 {
        self.max.x - self.min.x
    }

    /// Get the height of the bounding box
    pub fn height(&self) -> f64 {
        self.max.y - self.min.y
    }

    /// Get the center point of the bounding box
    pub fn center(&self) -> Point {
        self.min.mid_point(&self.max)
    }

    /// Check if this bounding box contains a point (edges included)
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Check if `other` lies strictly inside this box
    pub fn strictly_contains(&self, other: &BoundingBox2D) -> bool {
        other.min.x > self.min.x
            && other.max.x < self.max.x
            && other.min.y > self.min.y
            && other.max.y < self.max.y
    }

    /// Check if the two boxes overlap (touching edges count)
    pub fn overlaps(&self, other: &BoundingBox2D) -> bool {
        self.min.x <= other.max.x
            && other.min.x <= self.max.x
            && self.min.y <= other.max.y
            && other.min.y <= self.max.y
    }

    /// Corners counter-clockwise from the lower-left one
    pub fn corners(&self) -> [Point; 4] {
        [
            self.min,
            Point::new(self.max.x, self.min.y),
            self.max,
            Point::new(self.min.x, self.max.y),
        ]
    }

    /// The four edges as segments, in corner order
    pub fn edges(&self) -> [(Point, Point); 4] {
        let c = self.corners();
        [(c[0], c[1]), (c[1], c[2]), (c[2], c[3]), (c[3], c[0])]
    }

    /// Expand the bounding box to include another point
    pub fn expand_to_include(&mut self, point: Point) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
    }

    /// Grow the box by `margin` on every side
    pub fn inflate(&self, margin: f64) -> BoundingBox2D {
        BoundingBox2D {
            min: Point::new(self.min.x - margin, self.min.y - margin),
            max: Point::new(self.max.x + margin, self.max.y + margin),
        }
    }

    /// Merge with another bounding box
    pub fn merge(&self, other: &BoundingBox2D) -> BoundingBox2D {
        BoundingBox2D {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }
}

impl fmt::Display for BoundingBox2D {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "BBox2D[{} -> {}]", self.min, self.max)
    }
}
