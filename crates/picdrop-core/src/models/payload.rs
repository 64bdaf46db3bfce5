//! File payload model

use bytes::Bytes;

/// A single file as acquired from an input channel: an immutable byte blob
/// with a name and a MIME type. Supplied by the platform (or synthesized by
/// the clipboard channel) and held in memory for one submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FilePayload {
    pub name: String,
    pub content_type: String,
    pub bytes: Bytes,
}

impl FilePayload {
    pub fn new(
        name: impl Into<String>,
        content_type: impl Into<String>,
        bytes: impl Into<Bytes>,
    ) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Byte size as reported to the signing service.
    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
