//! DXF file reader

mod section_reader;
mod stream_reader;
mod text_reader;

pub use stream_reader::{DxfCodePair, DxfStreamReader};
pub use text_reader::DxfTextReader;

use section_reader::SectionReader;

use crate::error::Result;
use crate::io::dxf::code_page::decode_bytes;
use crate::notification::{NotificationCollection, NotificationType};
use crate::scene::{Scene, SceneBuilder};
use std::borrow::Cow;
use std::fs;
use std::path::Path;

/// Configuration for the DXF reader.
#[derive(Debug, Clone, Default)]
pub struct DxfReaderConfiguration {
    /// When `true`, a group code line that is not an integer aborts the read
    /// with `InvalidGroupCode`. Otherwise the pair is skipped and reported.
    ///
    /// Default: `false`
    pub strict_group_codes: bool,
}

/// DXF file reader
pub struct DxfReader<'a> {
    text: Cow<'a, str>,
    config: DxfReaderConfiguration,
    notifications: NotificationCollection,
}

impl<'a> DxfReader<'a> {
    /// Create a reader over document text
    pub fn new(text: &'a str) -> Self {
        Self {
            text: Cow::Borrowed(text),
            config: DxfReaderConfiguration::default(),
            notifications: NotificationCollection::new(),
        }
    }

    /// Create a reader over raw document bytes, decoded per the header's
    /// code page when they are not UTF-8
    pub fn from_bytes(bytes: &'a [u8]) -> Self {
        let (text, malformed) = decode_bytes(bytes);
        let mut notifications = NotificationCollection::new();
        if malformed {
            notifications.notify(
                NotificationType::Warning,
                "document contains bytes that could not be decoded",
            );
        }
        Self {
            text,
            config: DxfReaderConfiguration::default(),
            notifications,
        }
    }

    /// Create a reader over a file on disk
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<DxfReader<'static>> {
        let bytes = fs::read(path)?;
        let reader = DxfReader::from_bytes(&bytes);
        Ok(DxfReader {
            text: Cow::Owned(reader.text.into_owned()),
            config: reader.config,
            notifications: reader.notifications,
        })
    }

    /// Set reader configuration
    pub fn with_configuration(mut self, config: DxfReaderConfiguration) -> Self {
        self.config = config;
        self
    }

    /// Read the document into a new scene.
    ///
    /// Anomalies met on the way are appended to the scene's notifications.
    pub fn read(self) -> Result<Scene> {
        let mut scene = Scene::new();
        let mut notifications = self.read_into(&mut scene)?;
        scene.notifications.append(&mut notifications);
        Ok(scene)
    }

    /// Read the document into any scene builder and return the anomalies
    /// met on the way
    pub fn read_into<B: SceneBuilder + ?Sized>(self, builder: &mut B) -> Result<NotificationCollection> {
        let span = tracing::debug_span!("dxf_read", bytes = self.text.len());
        let _enter = span.enter();

        let mut notifications = self.notifications;
        let mut reader = DxfTextReader::new(&self.text, self.config.strict_group_codes);
        SectionReader::new(&mut reader, builder).read_document()?;

        notifications.append(reader.notifications_mut());
        tracing::debug!(
            lines = reader.position(),
            notifications = notifications.len(),
            "document read"
        );
        Ok(notifications)
    }
}
