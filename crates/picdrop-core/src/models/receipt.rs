//! Transfer receipt model

/// Result of a completed transfer: the public retrieval URL.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UploadReceipt {
    pub file_url: String,
}
