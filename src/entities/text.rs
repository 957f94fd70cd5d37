//! Single-line text entity

use super::geometry::{chain_closest, nearest_snap, require_points, require_positive};
use super::{ClosestPoint, Entity, EntityCommon, EntityData, EntityKind};
use crate::error::Result;
use crate::intersect::CanonicalForm;
use crate::io::dxf::record::DxfRecord;
use crate::settings::{QuerySettings, SnapCollector, SnapKind, SnapPoint, SnapSettings};
use crate::types::{BoundingBox2D, Point};

/// Text generation flag: mirrored in X
const BACKWARD: i16 = 2;
/// Text generation flag: mirrored in Y
const UPSIDE_DOWN: i16 = 4;

/// Text horizontal alignment (72)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextHorizontalAlignment {
    #[default]
    Left,
    Center,
    Right,
    /// Fit between two points, adjusting height
    Aligned,
    /// Centred horizontally and vertically
    Middle,
    /// Fit between two points, keeping height
    Fit,
}

impl TextHorizontalAlignment {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => TextHorizontalAlignment::Center,
            2 => TextHorizontalAlignment::Right,
            3 => TextHorizontalAlignment::Aligned,
            4 => TextHorizontalAlignment::Middle,
            5 => TextHorizontalAlignment::Fit,
            _ => TextHorizontalAlignment::Left,
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            TextHorizontalAlignment::Left => 0,
            TextHorizontalAlignment::Center => 1,
            TextHorizontalAlignment::Right => 2,
            TextHorizontalAlignment::Aligned => 3,
            TextHorizontalAlignment::Middle => 4,
            TextHorizontalAlignment::Fit => 5,
        }
    }

    /// Fraction of the text width left of the anchor
    fn offset(&self) -> f64 {
        match self {
            TextHorizontalAlignment::Center | TextHorizontalAlignment::Middle => 0.5,
            TextHorizontalAlignment::Right => 1.0,
            _ => 0.0,
        }
    }
}

/// Text vertical alignment (73)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextVerticalAlignment {
    #[default]
    Baseline,
    Bottom,
    Middle,
    Top,
}

impl TextVerticalAlignment {
    pub fn from_code(code: i16) -> Self {
        match code {
            1 => TextVerticalAlignment::Bottom,
            2 => TextVerticalAlignment::Middle,
            3 => TextVerticalAlignment::Top,
            _ => TextVerticalAlignment::Baseline,
        }
    }

    pub fn code(&self) -> i16 {
        match self {
            TextVerticalAlignment::Baseline => 0,
            TextVerticalAlignment::Bottom => 1,
            TextVerticalAlignment::Middle => 2,
            TextVerticalAlignment::Top => 3,
        }
    }

    /// Fraction of the text height below the anchor
    fn offset(&self) -> f64 {
        match self {
            TextVerticalAlignment::Middle => 0.5,
            TextVerticalAlignment::Top => 1.0,
            _ => 0.0,
        }
    }
}

/// Replace caret escapes (`^J`, `^M`, `^I`, `^ `) with the characters they
/// stand for
pub fn decode_caret(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '^' {
            out.push(c);
            continue;
        }
        match chars.peek() {
            Some('J') => out.push('\n'),
            Some('M') => out.push('\r'),
            Some('I') => out.push('\t'),
            Some(' ') => out.push('^'),
            _ => {
                out.push('^');
                continue;
            }
        }
        chars.next();
    }
    out
}

/// Inverse of [`decode_caret`]
pub fn encode_caret(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\n' => out.push_str("^J"),
            '\r' => out.push_str("^M"),
            '\t' => out.push_str("^I"),
            '^' => out.push_str("^ "),
            _ => out.push(c),
        }
    }
    out
}

/// A single line of text; points are `[insertion]`.
///
/// Font metrics belong to the renderer, so the text box is estimated as
/// `height × text_width_factor` per character.
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    /// Common entity data
    pub common: EntityCommon,
    points: [Point; 1],
    value: String,
    height: f64,
    rotation: f64,
    style: String,
    horizontal_alignment: TextHorizontalAlignment,
    vertical_alignment: TextVerticalAlignment,
    alignment_point: Option<Point>,
    generation_flags: i16,
    corners: [Point; 4],
}

impl Text {
    /// Left/baseline aligned text at `insertion`
    pub fn new(value: impl Into<String>, insertion: Point, height: f64, settings: &QuerySettings) -> Self {
        let mut text = Text {
            common: EntityCommon::new(),
            points: [insertion],
            value: value.into(),
            height,
            rotation: 0.0,
            style: "STANDARD".to_string(),
            horizontal_alignment: TextHorizontalAlignment::Left,
            vertical_alignment: TextVerticalAlignment::Baseline,
            alignment_point: None,
            generation_flags: 0,
            corners: [insertion; 4],
        };
        text.corners = text.text_box(settings.text_width_factor);
        text
    }

    /// Build from insertion point, value, height (default 1) and rotation in
    /// degrees
    pub fn from_data(data: &EntityData, settings: &QuerySettings) -> Result<Self> {
        require_points(EntityKind::Text, data, 1)?;
        let height = require_positive(EntityKind::Text, "height", data.height.unwrap_or(1.0))?;
        let mut text = Text {
            common: EntityCommon::from_data(data),
            points: [data.points[0]],
            value: data.text.clone().unwrap_or_default(),
            height,
            rotation: data.rotation.unwrap_or(0.0).to_radians(),
            style: data.style.clone().unwrap_or_else(|| "STANDARD".to_string()),
            horizontal_alignment: TextHorizontalAlignment::from_code(data.horizontal_alignment),
            vertical_alignment: TextVerticalAlignment::from_code(data.vertical_alignment),
            alignment_point: data.alignment_point,
            generation_flags: data.generation_flags,
            corners: [data.points[0]; 4],
        };
        text.corners = text.text_box(settings.text_width_factor);
        Ok(text)
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn insertion(&self) -> Point {
        self.points[0]
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Rotation in radians
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn style(&self) -> &str {
        &self.style
    }

    pub fn horizontal_alignment(&self) -> TextHorizontalAlignment {
        self.horizontal_alignment
    }

    pub fn vertical_alignment(&self) -> TextVerticalAlignment {
        self.vertical_alignment
    }

    pub fn alignment_point(&self) -> Option<Point> {
        self.alignment_point
    }

    /// Corners of the estimated text box, counter-clockwise from the
    /// lower-left corner of unrotated text
    pub fn corners(&self) -> [Point; 4] {
        self.corners
    }

    fn is_default_aligned(&self) -> bool {
        self.horizontal_alignment == TextHorizontalAlignment::Left
            && self.vertical_alignment == TextVerticalAlignment::Baseline
    }

    /// The point the alignment is relative to
    fn anchor(&self) -> Point {
        match self.alignment_point {
            Some(p) if !self.is_default_aligned() => p,
            _ => self.points[0],
        }
    }

    fn text_box(&self, width_factor: f64) -> [Point; 4] {
        let width = self.height * width_factor * self.value.chars().count() as f64;
        let sx = if self.generation_flags & BACKWARD != 0 { -1.0 } else { 1.0 };
        let sy = if self.generation_flags & UPSIDE_DOWN != 0 { -1.0 } else { 1.0 };
        let dx = -width * self.horizontal_alignment.offset();
        let dy = -self.height * self.vertical_alignment.offset();
        let anchor = self.anchor();
        [
            (dx, dy),
            (dx + width, dy),
            (dx + width, dy + self.height),
            (dx, dy + self.height),
        ]
        .map(|(x, y)| (anchor + Point::new(x * sx, y * sy)).rotate(anchor, self.rotation))
    }
}

impl Entity for Text {
    fn common(&self) -> &EntityCommon {
        &self.common
    }

    fn common_mut(&mut self) -> &mut EntityCommon {
        &mut self.common
    }

    fn kind(&self) -> EntityKind {
        EntityKind::Text
    }

    fn points(&self) -> &[Point] {
        &self.points
    }

    fn closest_point(&self, p: Point) -> ClosestPoint {
        chain_closest(p, &self.corners, true)
    }

    fn extremes(&self) -> BoundingBox2D {
        BoundingBox2D::from_points(&self.corners).unwrap_or_else(|| BoundingBox2D::from_point(self.points[0]))
    }

    fn intersect_points(&self) -> CanonicalForm {
        CanonicalForm::Rectangle { corners: self.corners }
    }

    fn snaps(&self, mouse: Point, delta: f64, settings: &SnapSettings) -> Vec<SnapPoint> {
        let mut collector = SnapCollector::new(mouse, delta, settings);
        collector.push(SnapKind::End, self.points[0]);
        if let Some(p) = self.alignment_point {
            collector.push(SnapKind::End, p);
        }
        nearest_snap(&mut collector, self.closest_point(mouse));
        collector.finish()
    }

    fn dxf(&self) -> DxfRecord {
        let mut record = self.common.record("TEXT");
        record
            .subclass("AcDbText")
            .push_point(10, self.points[0])
            .push(40, self.height)
            .push(1, encode_caret(&self.value));
        if self.rotation != 0.0 {
            record.push(50, self.rotation.to_degrees());
        }
        record.push(7, self.style.as_str());
        if self.generation_flags != 0 {
            record.push(71, self.generation_flags);
        }
        if self.horizontal_alignment != TextHorizontalAlignment::Left {
            record.push(72, self.horizontal_alignment.code());
        }
        if let Some(p) = self.alignment_point {
            record.push_point(11, p);
        }
        record.subclass("AcDbText");
        if self.vertical_alignment != TextVerticalAlignment::Baseline {
            record.push(73, self.vertical_alignment.code());
        }
        record
    }

    fn translate(&mut self, offset: Point) {
        self.points[0] = self.points[0] + offset;
        self.alignment_point = self.alignment_point.map(|p| p + offset);
        for p in self.corners.iter_mut() {
            *p = *p + offset;
        }
    }

    fn to_data(&self) -> EntityData {
        let mut data = EntityData::with_points(self.points.to_vec())
            .text(self.value.clone())
            .height(self.height)
            .rotation(self.rotation.to_degrees());
        data.style = Some(self.style.clone());
        data.horizontal_alignment = self.horizontal_alignment.code();
        data.vertical_alignment = self.vertical_alignment.code();
        data.alignment_point = self.alignment_point;
        data.generation_flags = self.generation_flags;
        self.common.fill_data(&mut data);
        data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_caret_escapes() {
        assert_eq!(decode_caret("a^Jb^Ic^ d"), "a\nb\tc^d");
        assert_eq!(decode_caret("x^"), "x^");
        assert_eq!(encode_caret("a\nb^"), "a^Jb^ ");
        assert_eq!(decode_caret(&encode_caret("tab\there\r")), "tab\there\r");
    }

    #[test]
    fn test_box_estimate() {
        let text = Text::new("ABCD", Point::new(1.0, 1.0), 2.0, &QuerySettings::default());
        let bbox = text.extremes();
        assert!((bbox.width() - 4.8).abs() < 1e-12);
        assert!((bbox.height() - 2.0).abs() < 1e-12);
        assert_eq!(bbox.min, Point::new(1.0, 1.0));
    }

    #[test]
    fn test_centred_middle_box() {
        let mut data = EntityData::with_points(vec![Point::ORIGIN]).text("AB").height(1.0);
        data.horizontal_alignment = 4;
        data.vertical_alignment = 2;
        data.alignment_point = Some(Point::new(10.0, 10.0));
        let text = Text::from_data(&data, &QuerySettings::default()).unwrap();
        let center = text.extremes().center();
        assert!(center.is_same(&Point::new(10.0, 10.0), 1e-12));
    }

    #[test]
    fn test_rotated_box() {
        let data = EntityData::with_points(vec![Point::ORIGIN])
            .text("A")
            .height(1.0)
            .rotation(90.0);
        let text = Text::from_data(&data, &QuerySettings::default()).unwrap();
        let [xmin, xmax, ymin, ymax] = text.extremes().to_array();
        assert!((xmin + 1.0).abs() < 1e-12 && xmax.abs() < 1e-12);
        assert!(ymin.abs() < 1e-12 && (ymax - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_zero_height_rejected() {
        let data = EntityData::with_points(vec![Point::ORIGIN]).text("A").height(0.0);
        assert!(Text::from_data(&data, &QuerySettings::default()).is_err());
    }

    #[test]
    fn test_dxf_tags() {
        let text = Text::new("a^b", Point::new(1.0, 2.0), 2.5, &QuerySettings::default());
        let record = text.dxf();
        assert_eq!(record.kind, "TEXT");
        assert_eq!(record.get_str(1), Some("a^ b"));
        assert_eq!(record.get_double(40), Some(2.5));
        assert!(record.get(72).is_none());
    }
}
