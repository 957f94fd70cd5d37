//! DXF writer module

mod section_writer;
mod stream_writer;
mod text_writer;

pub use section_writer::SectionWriter;
pub use stream_writer::{DxfStreamWriter, DxfStreamWriterExt};
pub use text_writer::DxfTextWriter;

use crate::error::{DxfError, Result};
use crate::scene::Scene;
use crate::types::{DxfVersion, HandleSeed};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Configuration for the DXF writer.
#[derive(Debug, Clone)]
pub struct DxfWriterConfiguration {
    /// Identification comment written as a 999 line before the first
    /// section; empty writes none
    pub comment: String,

    /// Value of `$ACADVER`. Output is UTF-8 whatever the version.
    ///
    /// Default: `AC1015`
    pub version: DxfVersion,
}

impl Default for DxfWriterConfiguration {
    fn default() -> Self {
        Self {
            comment: format!("draftdxf {}", env!("CARGO_PKG_VERSION")),
            version: DxfVersion::AC1015,
        }
    }
}

/// DXF file writer
pub struct DxfWriter<'a> {
    scene: &'a Scene,
    config: DxfWriterConfiguration,
}

impl<'a> DxfWriter<'a> {
    /// Create a new DXF writer for `scene`
    pub fn new(scene: &'a Scene) -> Self {
        Self {
            scene,
            config: DxfWriterConfiguration::default(),
        }
    }

    /// Set writer configuration
    pub fn with_configuration(mut self, config: DxfWriterConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Write to a file
    pub fn write_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to_writer(BufWriter::new(file))
    }

    /// Write to a string
    pub fn write_to_string(&self) -> Result<String> {
        let bytes = self.write_to_vec()?;
        String::from_utf8(bytes).map_err(|e| DxfError::Encoding(e.to_string()))
    }

    /// Write to a byte vector
    pub fn write_to_vec(&self) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        self.write_to_writer(&mut buffer)?;
        Ok(buffer)
    }

    /// Write to any writer.
    ///
    /// The sections after HEADER are produced first so that `$HANDSEED`
    /// names the first handle not used.
    pub fn write_to_writer<W: Write>(&self, mut writer: W) -> Result<()> {
        let span = tracing::debug_span!("dxf_write", items = self.scene.len());
        let _enter = span.enter();

        let mut handles = HandleSeed::new(1);
        let mut body = DxfTextWriter::new(Vec::new());
        {
            let mut sections = SectionWriter::new(&mut body, &mut handles);
            sections.write_tables(self.scene)?;
            sections.write_blocks(self.scene)?;
            sections.write_entities(self.scene)?;
            sections.write_objects()?;
        }
        body.write_eof()?;

        let mut head = DxfTextWriter::new(&mut writer);
        if !self.config.comment.is_empty() {
            head.write_string(999, &self.config.comment)?;
        }
        SectionWriter::new(&mut head, &mut handles).write_header(self.scene, self.config.version)?;

        writer.write_all(&body.into_inner())?;
        writer.flush()?;

        tracing::debug!(handles = %handles.peek(), "document written");
        Ok(())
    }
}

/// Convenience function to write a scene to a file
pub fn write_dxf<P: AsRef<Path>>(scene: &Scene, path: P) -> Result<()> {
    DxfWriter::new(scene).write_to_file(path)
}
