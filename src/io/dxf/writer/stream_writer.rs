//! DXF stream writer trait and its extension helpers

use crate::error::Result;
use crate::io::dxf::record::GroupValue;
use crate::types::{Handle, Point};

/// Trait for writing DXF code/value pairs
pub trait DxfStreamWriter {
    /// Write a code/value pair with a string value
    fn write_string(&mut self, code: i32, value: &str) -> Result<()>;

    /// Write a code/value pair with a 16-bit integer value
    fn write_i16(&mut self, code: i32, value: i16) -> Result<()>;

    /// Write a code/value pair with a 32-bit integer value
    fn write_i32(&mut self, code: i32, value: i32) -> Result<()>;

    /// Write a code/value pair with a double value
    fn write_double(&mut self, code: i32, value: f64) -> Result<()>;

    /// Write a code/value pair with a handle value
    fn write_handle(&mut self, code: i32, handle: Handle) -> Result<()>;

    /// Flush the writer
    fn flush(&mut self) -> Result<()>;
}

/// Extension trait for convenient writing operations
pub trait DxfStreamWriterExt: DxfStreamWriter {
    /// Write one pair of a record
    fn write_value(&mut self, code: i32, value: &GroupValue) -> Result<()> {
        match value {
            GroupValue::Str(s) => self.write_string(code, s),
            GroupValue::I16(v) => self.write_i16(code, *v),
            GroupValue::I32(v) => self.write_i32(code, *v),
            GroupValue::Double(v) => self.write_double(code, *v),
        }
    }

    /// Write a 2D point (codes 10/20 or similar)
    fn write_point2d(&mut self, x_code: i32, point: Point) -> Result<()> {
        self.write_double(x_code, point.x)?;
        self.write_double(x_code + 10, point.y)
    }

    /// Write a 2D point with a zero z (codes 10/20/30 or similar)
    fn write_point3d(&mut self, x_code: i32, point: Point) -> Result<()> {
        self.write_point2d(x_code, point)?;
        self.write_double(x_code + 20, 0.0)
    }

    /// Write a subclass marker
    fn write_subclass(&mut self, marker: &str) -> Result<()> {
        self.write_string(100, marker)
    }

    /// Write section start
    fn write_section_start(&mut self, section_name: &str) -> Result<()> {
        self.write_string(0, "SECTION")?;
        self.write_string(2, section_name)
    }

    /// Write section end
    fn write_section_end(&mut self) -> Result<()> {
        self.write_string(0, "ENDSEC")
    }

    /// Write end of file
    fn write_eof(&mut self) -> Result<()> {
        self.write_string(0, "EOF")
    }
}

impl<T: DxfStreamWriter + ?Sized> DxfStreamWriterExt for T {}
