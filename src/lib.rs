//! # draftdxf
//!
//! DXF reading and writing for the 2D entity model of an interactive
//! drafting engine.
//!
//! ## Features
//!
//! - Read ASCII DXF into a [`Scene`], tolerating unknown records and tags
//! - Write a [`Scene`] back as ASCII DXF (AutoCAD 2000 layout by default)
//! - Twelve entity variants sharing one geometric [`Entity`] contract:
//!   closest point, extremes, snaps, window/crossing selection
//! - Pairwise intersection of lines, arcs, circles, ellipses and rectangles
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use draftdxf::{DxfReader, DxfWriter};
//!
//! let scene = DxfReader::from_file("sample.dxf")?.read()?;
//! for entity in scene.entities() {
//!     println!("{:?} on {}", entity.kind(), entity.as_entity().layer());
//! }
//!
//! DxfWriter::new(&scene).write_to_file("output.dxf")?;
//! # Ok::<(), draftdxf::DxfError>(())
//! ```
//!
//! ## Architecture
//!
//! - `Entity` - geometric contract every variant implements
//! - `EntityType` - the closed set of variants, built from `EntityData`
//! - `SceneBuilder` - sink the reader hands completed records to
//! - `Scene` - top-level items, block definitions and symbol tables

#![allow(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod entities;
pub mod error;
pub mod intersect;
pub mod io;
pub mod notification;
pub mod scene;
pub mod settings;
pub mod tables;
pub mod types;

// Re-export commonly used types
pub use error::{DxfError, Result};
pub use types::{BoundingBox2D, Color, DxfVersion, Handle, LineWeight, Point};

// Re-export entity types
pub use entities::{
    Arc, Block, Circle, ClosestPoint, Dimension, Ellipse, Entity, EntityData, EntityKind, EntityType,
    FilledRectangle, Insert, Line, Polyline, Rectangle, Spline, Text,
};

// Re-export table types
pub use tables::{DimStyle, Layer, LineType, Table, TextStyle};

pub use intersect::{intersect, intersect_extended, CanonicalForm, Intersection, IntersectionStatus};
pub use notification::{Notification, NotificationCollection, NotificationType};
pub use scene::{Scene, SceneBuilder};
pub use settings::{QuerySettings, SnapKind, SnapPoint, SnapSettings};

// Re-export I/O types
pub use io::dxf::{DxfReader, DxfReaderConfiguration, DxfWriter, DxfWriterConfiguration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
