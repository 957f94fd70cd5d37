//! DXF stream reader trait and the code/value pair it yields

use crate::error::Result;
use crate::notification::NotificationCollection;

/// A DXF code/value pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DxfCodePair<'a> {
    /// The DXF group code
    pub code: i32,

    /// The value line, line terminator removed
    pub value: &'a str,

    /// 1-based line number of the code line
    pub line: usize,
}

impl<'a> DxfCodePair<'a> {
    pub fn new(code: i32, value: &'a str, line: usize) -> Self {
        Self { code, value, line }
    }

    /// Value with surrounding whitespace removed
    pub fn as_str(&self) -> &'a str {
        self.value.trim()
    }

    pub fn as_i16(&self) -> Option<i16> {
        self.as_str().parse().ok()
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.as_str().parse().ok()
    }

    pub fn as_double(&self) -> Option<f64> {
        self.as_str().parse().ok()
    }

    /// Whether this pair starts the record `keyword`
    pub fn is(&self, keyword: &str) -> bool {
        self.code == 0 && self.as_str() == keyword
    }
}

/// Trait for reading DXF code/value pairs from a document
pub trait DxfStreamReader<'a> {
    /// Read the next code/value pair.
    ///
    /// Running out of lines is an `UnexpectedEndOfInput` error.
    fn read_pair(&mut self) -> Result<DxfCodePair<'a>>;

    /// Push a pair back to be read again on the next `read_pair` call
    fn push_back(&mut self, pair: DxfCodePair<'a>);

    /// Anomalies recorded so far
    fn notifications_mut(&mut self) -> &mut NotificationCollection;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pair_values() {
        let pair = DxfCodePair::new(70, "    42", 3);
        assert_eq!(pair.as_i16(), Some(42));
        assert_eq!(pair.as_i32(), Some(42));
        assert_eq!(pair.as_double(), Some(42.0));

        let pair = DxfCodePair::new(10, "1.5e2", 1);
        assert_eq!(pair.as_double(), Some(150.0));
        assert_eq!(pair.as_i16(), None);
    }

    #[test]
    fn test_is_keyword() {
        assert!(DxfCodePair::new(0, "LINE ", 1).is("LINE"));
        assert!(!DxfCodePair::new(8, "LINE", 1).is("LINE"));
    }
}
