//! I/O module for reading and writing drawings as DXF

pub mod dxf;

pub use dxf::{DxfReader, DxfReaderConfiguration, DxfWriter, DxfWriterConfiguration};
