//! DXF (Drawing Exchange Format) reading and writing

mod code_page;
mod reader;
pub mod record;
mod writer;

pub use code_page::{decode_bytes, encoding_from_code_page};
pub use reader::{DxfCodePair, DxfReader, DxfReaderConfiguration, DxfStreamReader, DxfTextReader};
pub use record::{DxfRecord, GroupValue};
pub use writer::{write_dxf, DxfStreamWriter, DxfStreamWriterExt, DxfTextWriter, DxfWriter, DxfWriterConfiguration, SectionWriter};
