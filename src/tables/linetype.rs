//! Line type table entry

use super::TableEntry;

/// A line type table entry.
///
/// `elements` holds the dash pattern: positive lengths are dashes, negative
/// lengths are gaps and zero is a dot.
#[derive(Debug, Clone, PartialEq)]
pub struct LineType {
    /// Line type name
    pub name: String,
    /// Description
    pub description: String,
    /// Pattern elements
    pub elements: Vec<f64>,
}

impl LineType {
    /// Create a new line type
    pub fn new(name: impl Into<String>) -> Self {
        LineType {
            name: name.into(),
            description: String::new(),
            elements: Vec::new(),
        }
    }

    /// Line type with a description and dash pattern
    pub fn with_pattern(name: impl Into<String>, description: impl Into<String>, elements: Vec<f64>) -> Self {
        LineType {
            name: name.into(),
            description: description.into(),
            elements,
        }
    }

    /// Create the standard "Continuous" line type
    pub fn continuous() -> Self {
        Self::with_pattern("Continuous", "Solid line", Vec::new())
    }

    /// Create the standard "ByLayer" line type
    pub fn by_layer() -> Self {
        Self::new("ByLayer")
    }

    /// Create the standard "ByBlock" line type
    pub fn by_block() -> Self {
        Self::new("ByBlock")
    }

    /// Sum of the absolute element lengths (73/40 on the wire)
    pub fn pattern_length(&self) -> f64 {
        self.elements.iter().map(|e| e.abs()).sum()
    }

    /// Check if this is a continuous line type
    pub fn is_continuous(&self) -> bool {
        self.elements.is_empty()
    }
}

impl TableEntry for LineType {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn is_standard(&self) -> bool {
        matches!(self.name.as_str(), "Continuous" | "ByLayer" | "ByBlock")
    }
}
