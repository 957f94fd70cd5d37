//! Name-keyed symbol tables: layers, line types, text and dimension styles

use crate::error::{DxfError, Result};
use crate::types::{Color, LineWeight};
use indexmap::IndexMap;

pub mod dimstyle;
pub mod layer;
pub mod linetype;
pub mod textstyle;

pub use dimstyle::DimStyle;
pub use layer::{Layer, LayerFlags};
pub use linetype::LineType;
pub use textstyle::{TextGenerationFlags, TextStyle};

/// Base trait for all table entries
pub trait TableEntry {
    /// Get the entry's name
    fn name(&self) -> &str;

    /// Set the entry's name
    fn set_name(&mut self, name: String);

    /// Check if this is a standard/default entry
    fn is_standard(&self) -> bool {
        false
    }
}

/// Resolves `BYLAYER` attributes by layer name
pub trait LayerLookup {
    /// Colour of the named layer
    fn layer_colour(&self, name: &str) -> Option<Color>;

    /// Line weight of the named layer
    fn layer_line_weight(&self, name: &str) -> Option<LineWeight>;
}

/// Generic table for storing named entries in insertion order
#[derive(Debug, Clone, PartialEq)]
pub struct Table<T: TableEntry> {
    /// Entries stored by name (case-insensitive)
    entries: IndexMap<String, T>,
}

impl<T: TableEntry> Table<T> {
    /// Create a new empty table
    pub fn new() -> Self {
        Table {
            entries: IndexMap::new(),
        }
    }

    /// Add an entry; an existing entry of the same name is kept
    pub fn add(&mut self, entry: T) -> Result<()> {
        let key = entry.name().to_uppercase();
        if self.entries.contains_key(&key) {
            return Err(DxfError::Custom(format!(
                "entry '{}' already exists in table",
                entry.name()
            )));
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    /// Add or replace an entry, keeping the position of a replaced one
    pub fn insert(&mut self, entry: T) -> Option<T> {
        self.entries.insert(entry.name().to_uppercase(), entry)
    }

    /// Get an entry by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&T> {
        self.entries.get(&name.to_uppercase())
    }

    /// Get a mutable entry by name (case-insensitive)
    pub fn get_mut(&mut self, name: &str) -> Option<&mut T> {
        self.entries.get_mut(&name.to_uppercase())
    }

    /// Remove an entry by name (case-insensitive), keeping the order of the
    /// rest
    pub fn remove(&mut self, name: &str) -> Option<T> {
        self.entries.shift_remove(&name.to_uppercase())
    }

    /// Check if an entry exists (case-insensitive)
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(&name.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }

    /// Iterate over all entries mutably
    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.entries.values_mut()
    }

    /// Get all entry names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|e| e.name())
    }
}

impl<T: TableEntry> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl LayerLookup for Table<Layer> {
    fn layer_colour(&self, name: &str) -> Option<Color> {
        self.get(name).map(|layer| layer.color)
    }

    fn layer_line_weight(&self, name: &str) -> Option<LineWeight> {
        self.get(name).map(|layer| layer.line_weight)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_add_and_get() {
        let mut table = Table::new();
        assert!(table.add(Layer::new("Walls")).is_ok());
        assert!(table.contains("Walls"));
        assert!(table.contains("WALLS"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_table_duplicate_entry_keeps_first() {
        let mut table = Table::new();
        table.add(Layer::with_color("Walls", Color::RED)).unwrap();
        assert!(table.add(Layer::with_color("walls", Color::BLUE)).is_err());
        assert_eq!(table.get("Walls").map(|l| l.color), Some(Color::RED));
    }

    #[test]
    fn test_table_keeps_insertion_order() {
        let mut table = Table::new();
        for name in ["b", "a", "c"] {
            table.add(Layer::new(name)).unwrap();
        }
        table.remove("a");
        assert_eq!(table.names().collect::<Vec<_>>(), vec!["b", "c"]);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut table = Table::new();
        table.add(Layer::new("0")).unwrap();
        table.add(Layer::new("Walls")).unwrap();
        let old = table.insert(Layer::with_color("0", Color::RED));
        assert!(old.is_some());
        assert_eq!(table.names().next(), Some("0"));
        assert_eq!(table.layer_colour("0"), Some(Color::RED));
    }

    #[test]
    fn test_layer_lookup() {
        let mut table = Table::new();
        table.add(Layer::with_color("Walls", Color::GREEN)).unwrap();
        assert_eq!(table.layer_colour("walls"), Some(Color::GREEN));
        assert_eq!(table.layer_colour("Doors"), None);
    }
}
