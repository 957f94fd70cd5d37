//! Value types shared by entities, tables and the DXF codec

pub mod bounds;
pub mod color;
pub mod handle;
pub mod line_weight;
pub mod point;
pub mod version;

pub use bounds::BoundingBox2D;
pub use color::{acad_colour, hex_colour, Color};
pub use handle::{Handle, HandleSeed};
pub use line_weight::LineWeight;
pub use point::Point;
pub use version::DxfVersion;

/// Normalize an angle in radians into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let tau = std::f64::consts::TAU;
    let a = angle % tau;
    if a < 0.0 {
        a + tau
    } else {
        a
    }
}
