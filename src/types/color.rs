//! Colour representation and the AutoCAD Color Index (ACI) table

use once_cell::sync::Lazy;
use std::fmt;

/// Colour of an entity or layer.
///
/// Colours are either an explicit RGB value or one of the symbolic values
/// that are resolved at query time:
/// - `ByLayer`: use the owning layer's colour (ACI 256)
/// - `ByBlock`: use the owning block instance's colour (ACI 0)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Color {
    /// Colour by layer (index 256)
    #[default]
    ByLayer,
    /// Colour by block (index 0)
    ByBlock,
    /// Explicit RGB colour
    Rgb { r: u8, g: u8, b: u8 },
}

/// Brightness levels of the generated ACI rows (indices 10..=249)
const ACI_LEVELS: [f64; 5] = [255.0, 165.0, 127.0, 76.0, 38.0];

/// The 256 ACI entries as RGB triples. Index 0 (BYBLOCK) has no colour of its
/// own and is stored as black.
static ACI_TABLE: Lazy<[(u8, u8, u8); 256]> = Lazy::new(build_aci_table);

/// The ACI table as `#RRGGBB` strings, with the symbolic names at 0 and 256
static ACI_HEX: Lazy<Vec<String>> = Lazy::new(|| {
    let mut hex: Vec<String> = ACI_TABLE
        .iter()
        .map(|&(r, g, b)| format!("#{:02X}{:02X}{:02X}", r, g, b))
        .collect();
    hex[0] = "BYBLOCK".to_string();
    hex.push("BYLAYER".to_string());
    hex
});

fn build_aci_table() -> [(u8, u8, u8); 256] {
    let mut table = [(0u8, 0u8, 0u8); 256];

    let fixed: [(u8, u8, u8); 10] = [
        (0, 0, 0),
        (255, 0, 0),
        (255, 255, 0),
        (0, 255, 0),
        (0, 255, 255),
        (0, 0, 255),
        (255, 0, 255),
        (255, 255, 255),
        (128, 128, 128),
        (192, 192, 192),
    ];
    table[..10].copy_from_slice(&fixed);

    // 24 hues in 15° steps, each with 5 levels in a full and a pale variant
    for hue in 0..24 {
        let (hr, hg, hb) = hue_fractions(hue as f64 * 15.0);
        for k in 0..10 {
            let level = ACI_LEVELS[k / 2];
            let pale = k % 2 == 1;
            let channel = |c: f64| -> u8 {
                let v = if pale { level * (1.0 + c) / 2.0 } else { level * c };
                v.floor() as u8
            };
            table[10 + hue * 10 + k] = (channel(hr), channel(hg), channel(hb));
        }
    }

    let greys: [u8; 6] = [0x33, 0x50, 0x69, 0x82, 0xBE, 0xFF];
    for (i, g) in greys.iter().enumerate() {
        table[250 + i] = (*g, *g, *g);
    }

    table
}

/// Fully saturated RGB fractions for a hue angle in degrees
fn hue_fractions(degrees: f64) -> (f64, f64, f64) {
    let sector = degrees / 60.0;
    let i = sector.floor() as i32;
    let f = sector - i as f64;
    match i {
        0 => (1.0, f, 0.0),
        1 => (1.0 - f, 1.0, 0.0),
        2 => (0.0, 1.0, f),
        3 => (0.0, 1.0 - f, 1.0),
        4 => (f, 0.0, 1.0),
        _ => (1.0, 0.0, 1.0 - f),
    }
}

/// Hex colour for an ACI index: `"BYBLOCK"` for 0, `"BYLAYER"` for 256,
/// `"#RRGGBB"` for 1..=255 and `None` outside that range.
pub fn hex_colour(index: i32) -> Option<&'static str> {
    if (0..=256).contains(&index) {
        Some(ACI_HEX[index as usize].as_str())
    } else {
        None
    }
}

/// ACI index for a hex colour string.
///
/// `BYLAYER`/`BYBLOCK` map to 256/0. An RGB value without an exact entry maps
/// to the nearest index by squared RGB distance. Malformed strings give `None`.
pub fn acad_colour(hex: &str) -> Option<u16> {
    Color::from_hex(hex).map(|c| c.aci())
}

impl Color {
    /// Common colour constants
    pub const RED: Color = Color::Rgb { r: 255, g: 0, b: 0 };
    pub const YELLOW: Color = Color::Rgb { r: 255, g: 255, b: 0 };
    pub const GREEN: Color = Color::Rgb { r: 0, g: 255, b: 0 };
    pub const CYAN: Color = Color::Rgb { r: 0, g: 255, b: 255 };
    pub const BLUE: Color = Color::Rgb { r: 0, g: 0, b: 255 };
    pub const MAGENTA: Color = Color::Rgb { r: 255, g: 0, b: 255 };
    pub const WHITE: Color = Color::Rgb { r: 255, g: 255, b: 255 };

    /// Create an RGB colour
    pub const fn from_rgb(r: u8, g: u8, b: u8) -> Self {
        Color::Rgb { r, g, b }
    }

    /// Colour for an ACI index, `None` if the index is out of range
    pub fn from_aci(index: i32) -> Option<Self> {
        match index {
            0 => Some(Color::ByBlock),
            256 => Some(Color::ByLayer),
            1..=255 => {
                let (r, g, b) = ACI_TABLE[index as usize];
                Some(Color::Rgb { r, g, b })
            }
            _ => None,
        }
    }

    /// Colour from a packed 24-bit true colour value (group code 420)
    pub fn from_true_colour(value: i32) -> Self {
        Color::Rgb {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Parse `"#RRGGBB"` (leading `#` optional), `"BYLAYER"` or `"BYBLOCK"`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let trimmed = hex.trim();
        if trimmed.eq_ignore_ascii_case("BYLAYER") {
            return Some(Color::ByLayer);
        }
        if trimmed.eq_ignore_ascii_case("BYBLOCK") {
            return Some(Color::ByBlock);
        }
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(digits, 16).ok()?;
        Some(Color::from_true_colour(value as i32))
    }

    /// `"#RRGGBB"`, `"BYLAYER"` or `"BYBLOCK"`
    pub fn to_hex(&self) -> String {
        match self {
            Color::ByLayer => "BYLAYER".to_string(),
            Color::ByBlock => "BYBLOCK".to_string(),
            Color::Rgb { r, g, b } => format!("#{:02X}{:02X}{:02X}", r, g, b),
        }
    }

    /// RGB components, if this is an explicit colour
    pub fn rgb(&self) -> Option<(u8, u8, u8)> {
        match self {
            Color::Rgb { r, g, b } => Some((*r, *g, *b)),
            _ => None,
        }
    }

    /// Packed 24-bit value for group code 420
    pub fn true_colour(&self) -> Option<i32> {
        self.rgb()
            .map(|(r, g, b)| ((r as i32) << 16) | ((g as i32) << 8) | (b as i32))
    }

    /// ACI index: exact when the colour is in the table, nearest otherwise
    pub fn aci(&self) -> u16 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Rgb { r, g, b } => {
                let mut best = 7u16;
                let mut best_distance = i32::MAX;
                for (index, &(tr, tg, tb)) in ACI_TABLE.iter().enumerate().skip(1) {
                    let dr = *r as i32 - tr as i32;
                    let dg = *g as i32 - tg as i32;
                    let db = *b as i32 - tb as i32;
                    let distance = dr * dr + dg * dg + db * db;
                    if distance < best_distance {
                        best_distance = distance;
                        best = index as u16;
                        if distance == 0 {
                            break;
                        }
                    }
                }
                best
            }
        }
    }

    /// Whether the colour is represented exactly by its ACI index
    pub fn has_exact_aci(&self) -> bool {
        match self {
            Color::Rgb { .. } => Color::from_aci(self.aci() as i32) == Some(*self),
            _ => true,
        }
    }

    /// Check for the symbolic `ByLayer`/`ByBlock` values
    pub fn is_symbolic(&self) -> bool {
        !matches!(self, Color::Rgb { .. })
    }

    /// Resolve symbolic values against the owning layer and block instance
    pub fn resolve(&self, layer_colour: Color, block_colour: Option<Color>) -> Color {
        match self {
            Color::ByLayer => layer_colour,
            Color::ByBlock => block_colour.unwrap_or(layer_colour),
            rgb => *rgb,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
