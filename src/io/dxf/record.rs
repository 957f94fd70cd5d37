//! Wire form of a single DXF record

use crate::types::{Color, LineWeight, Point};

/// Value carried by one group code
#[derive(Debug, Clone, PartialEq)]
pub enum GroupValue {
    Str(String),
    I16(i16),
    I32(i32),
    Double(f64),
}

impl From<&str> for GroupValue {
    fn from(value: &str) -> Self {
        GroupValue::Str(value.to_string())
    }
}

impl From<String> for GroupValue {
    fn from(value: String) -> Self {
        GroupValue::Str(value)
    }
}

impl From<i16> for GroupValue {
    fn from(value: i16) -> Self {
        GroupValue::I16(value)
    }
}

impl From<i32> for GroupValue {
    fn from(value: i32) -> Self {
        GroupValue::I32(value)
    }
}

impl From<f64> for GroupValue {
    fn from(value: f64) -> Self {
        GroupValue::Double(value)
    }
}

/// A record: the tag-0 keyword followed by ordered (code, value) pairs.
///
/// Handles and owner references are not part of the record; the writer
/// assigns them. `followers` are records that must be written directly after
/// this one (the `VERTEX`/`SEQEND` run of a heavy polyline).
#[derive(Debug, Clone, PartialEq)]
pub struct DxfRecord {
    pub kind: &'static str,
    pub pairs: Vec<(i32, GroupValue)>,
    pub followers: Vec<DxfRecord>,
}

impl DxfRecord {
    pub fn new(kind: &'static str) -> Self {
        DxfRecord {
            kind,
            pairs: Vec::new(),
            followers: Vec::new(),
        }
    }

    /// Append one pair
    pub fn push(&mut self, code: i32, value: impl Into<GroupValue>) -> &mut Self {
        self.pairs.push((code, value.into()));
        self
    }

    /// Append a 2D point as `code`/`code + 10`
    pub fn push_point(&mut self, code: i32, point: Point) -> &mut Self {
        self.pairs.push((code, GroupValue::Double(point.x)));
        self.pairs.push((code + 10, GroupValue::Double(point.y)));
        self
    }

    /// Append a subclass marker (code 100)
    pub fn subclass(&mut self, marker: &str) -> &mut Self {
        self.push(100, marker)
    }

    /// Append layer, colour and line weight in the order the reader expects
    pub fn push_common(&mut self, layer: &str, color: Color, line_weight: LineWeight) -> &mut Self {
        self.subclass("AcDbEntity");
        self.push(8, layer);
        if color != Color::ByLayer {
            self.push(62, color.aci() as i16);
            if !color.has_exact_aci() {
                if let Some(true_colour) = color.true_colour() {
                    self.push(420, true_colour);
                }
            }
        }
        if line_weight != LineWeight::ByLayer {
            self.push(370, line_weight.value());
        }
        self
    }

    /// First value stored under `code`
    pub fn get(&self, code: i32) -> Option<&GroupValue> {
        self.pairs.iter().find(|(c, _)| *c == code).map(|(_, v)| v)
    }

    /// First value under `code` as a double
    pub fn get_double(&self, code: i32) -> Option<f64> {
        match self.get(code)? {
            GroupValue::Double(v) => Some(*v),
            GroupValue::I16(v) => Some(*v as f64),
            GroupValue::I32(v) => Some(*v as f64),
            GroupValue::Str(_) => None,
        }
    }

    /// First value under `code` as a string
    pub fn get_str(&self, code: i32) -> Option<&str> {
        match self.get(code)? {
            GroupValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Number of pairs with the given code
    pub fn count(&self, code: i32) -> usize {
        self.pairs.iter().filter(|(c, _)| *c == code).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_point() {
        let mut record = DxfRecord::new("LINE");
        record.push_point(10, Point::new(1.0, 2.0));
        assert_eq!(record.get_double(10), Some(1.0));
        assert_eq!(record.get_double(20), Some(2.0));
    }

    #[test]
    fn test_common_pairs() {
        let mut record = DxfRecord::new("LINE");
        record.push_common("Walls", Color::from_rgb(18, 52, 86), LineWeight::W0_50);
        assert_eq!(record.get_str(8), Some("Walls"));
        assert!(record.get(62).is_some());
        assert_eq!(record.get(420), Some(&GroupValue::I32(0x123456)));
        assert_eq!(record.get(370), Some(&GroupValue::I16(50)));
    }

    #[test]
    fn test_bylayer_colour_omitted() {
        let mut record = DxfRecord::new("LINE");
        record.push_common("0", Color::ByLayer, LineWeight::ByLayer);
        assert!(record.get(62).is_none());
        assert!(record.get(370).is_none());
    }

    #[test]
    fn test_exact_aci_has_no_true_colour() {
        let mut record = DxfRecord::new("LINE");
        record.push_common("0", Color::RED, LineWeight::ByLayer);
        assert_eq!(record.get(62), Some(&GroupValue::I16(1)));
        assert!(record.get(420).is_none());
    }
}
