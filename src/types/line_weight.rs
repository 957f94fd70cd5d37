//! Line weight (display thickness, independent of geometry)

use std::fmt;

/// Line weight of an entity or layer.
///
/// Explicit weights are in 1/100 mm as stored under group code 370. The
/// symbolic values defer to the owning layer or block instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LineWeight {
    /// Use the layer's line weight
    #[default]
    ByLayer,
    /// Use the block instance's line weight
    ByBlock,
    /// Application default weight
    Default,
    /// Explicit weight in 1/100 mm
    Value(i16),
}

/// Width in mm drawn for `LineWeight::Default`
const DEFAULT_WIDTH_MM: f64 = 0.25;

impl LineWeight {
    /// Decode a group code 370 value
    pub fn from_value(value: i16) -> Self {
        match value {
            -1 => LineWeight::ByLayer,
            -2 => LineWeight::ByBlock,
            -3 => LineWeight::Default,
            v => LineWeight::Value(v.max(0)),
        }
    }

    /// Group code 370 value
    pub fn value(&self) -> i16 {
        match self {
            LineWeight::ByLayer => -1,
            LineWeight::ByBlock => -2,
            LineWeight::Default => -3,
            LineWeight::Value(v) => *v,
        }
    }

    /// Explicit weight in millimetres
    pub fn millimeters(&self) -> Option<f64> {
        match self {
            LineWeight::Value(v) => Some(*v as f64 / 100.0),
            _ => None,
        }
    }

    /// Resolve symbolic values against the layer and block instance weights.
    ///
    /// The result is never `ByLayer` or `ByBlock`.
    pub fn resolve(&self, layer_weight: LineWeight, block_weight: Option<LineWeight>) -> LineWeight {
        let resolved = match self {
            LineWeight::ByLayer => layer_weight,
            LineWeight::ByBlock => block_weight.unwrap_or(layer_weight),
            other => *other,
        };
        match resolved {
            LineWeight::ByLayer | LineWeight::ByBlock => LineWeight::Default,
            other => other,
        }
    }

    /// Display width in millimetres of a resolved weight
    pub fn display_width(&self) -> f64 {
        self.millimeters().unwrap_or(DEFAULT_WIDTH_MM)
    }

    pub const W0_00: LineWeight = LineWeight::Value(0);
    pub const W0_25: LineWeight = LineWeight::Value(25);
    pub const W0_50: LineWeight = LineWeight::Value(50);
    pub const W1_00: LineWeight = LineWeight::Value(100);
    pub const W2_11: LineWeight = LineWeight::Value(211);
}

impl fmt::Display for LineWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineWeight::ByLayer => write!(f, "ByLayer"),
            LineWeight::ByBlock => write!(f, "ByBlock"),
            LineWeight::Default => write!(f, "Default"),
            LineWeight::Value(v) => write!(f, "{:.2}mm", *v as f64 / 100.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_weight_from_value() {
        assert_eq!(LineWeight::from_value(-1), LineWeight::ByLayer);
        assert_eq!(LineWeight::from_value(-2), LineWeight::ByBlock);
        assert_eq!(LineWeight::from_value(-3), LineWeight::Default);
        assert_eq!(LineWeight::from_value(25), LineWeight::Value(25));
    }

    #[test]
    fn test_resolve() {
        assert_eq!(LineWeight::ByLayer.resolve(LineWeight::W0_50, None), LineWeight::W0_50);
        assert_eq!(
            LineWeight::ByBlock.resolve(LineWeight::W0_50, Some(LineWeight::W1_00)),
            LineWeight::W1_00
        );
        assert_eq!(LineWeight::ByLayer.resolve(LineWeight::ByLayer, None), LineWeight::Default);
    }

    #[test]
    fn test_display_width() {
        assert_eq!(LineWeight::W0_50.display_width(), 0.5);
        assert_eq!(LineWeight::Default.display_width(), 0.25);
    }

    #[test]
    fn test_line_weight_display() {
        assert_eq!(LineWeight::ByLayer.to_string(), "ByLayer");
        assert_eq!(LineWeight::W0_25.to_string(), "0.25mm");
    }
}
