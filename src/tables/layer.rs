//! Layer table entry

use super::TableEntry;
use crate::types::{Color, LineWeight};
use bitflags::bitflags;

bitflags! {
    /// Layer state flags (70)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayerFlags: i16 {
        /// Layer is frozen
        const FROZEN = 1;
        /// Layer is frozen in new viewports
        const FROZEN_IN_NEW_VIEWPORTS = 2;
        /// Layer is locked
        const LOCKED = 4;
    }
}

/// A layer table entry.
///
/// A layer that is turned off is written with a negative colour index.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    /// Layer name
    pub name: String,
    /// Layer flags
    pub flags: LayerFlags,
    /// Layer colour; never `ByLayer`/`ByBlock`
    pub color: Color,
    /// Line type name
    pub line_type: String,
    /// Line weight
    pub line_weight: LineWeight,
    /// Layer is turned off
    pub off: bool,
    /// Is this layer plottable?
    pub is_plottable: bool,
}

impl Layer {
    /// Create a new layer with default settings
    pub fn new(name: impl Into<String>) -> Self {
        Layer {
            name: name.into(),
            flags: LayerFlags::empty(),
            color: Color::WHITE,
            line_type: "Continuous".to_string(),
            line_weight: LineWeight::Default,
            off: false,
            is_plottable: true,
        }
    }

    /// Create the standard "0" layer
    pub fn layer_0() -> Self {
        Self::new("0")
    }

    /// Create a layer with a specific colour
    pub fn with_color(name: impl Into<String>, color: Color) -> Self {
        Layer {
            color,
            ..Self::new(name)
        }
    }

    pub fn freeze(&mut self) {
        self.flags.insert(LayerFlags::FROZEN);
    }

    pub fn thaw(&mut self) {
        self.flags.remove(LayerFlags::FROZEN);
    }

    pub fn is_frozen(&self) -> bool {
        self.flags.contains(LayerFlags::FROZEN)
    }

    pub fn lock(&mut self) {
        self.flags.insert(LayerFlags::LOCKED);
    }

    pub fn unlock(&mut self) {
        self.flags.remove(LayerFlags::LOCKED);
    }

    pub fn is_locked(&self) -> bool {
        self.flags.contains(LayerFlags::LOCKED)
    }

    /// Check if the layer is visible (not off and not frozen)
    pub fn is_visible(&self) -> bool {
        !self.off && !self.is_frozen()
    }
}

impl TableEntry for Layer {
    fn name(&self) -> &str {
        &self.name
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
    }

    fn is_standard(&self) -> bool {
        self.name == "0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_defaults() {
        let layer = Layer::layer_0();
        assert!(layer.is_standard());
        assert_eq!(layer.color, Color::WHITE);
        assert!(layer.is_visible());
    }

    #[test]
    fn test_layer_state() {
        let mut layer = Layer::new("Hidden");
        layer.freeze();
        layer.lock();
        assert!(layer.is_frozen() && layer.is_locked());
        assert!(!layer.is_visible());
        layer.thaw();
        assert!(layer.is_visible());
        assert_eq!(layer.flags.bits(), 4);
    }
}
