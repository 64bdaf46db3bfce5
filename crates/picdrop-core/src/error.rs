//! Error types module
//!
//! All failures below the orchestration boundary are unified under the
//! `UploadError` enum: the no-file validation failure, malformed or incomplete
//! signing responses, transport failures, and server-reported rejections. The
//! orchestrator collapses every kind into a single user-visible message; only
//! the diagnostic channel receives the distinguishing kind and detail.

#[derive(Debug, thiserror::Error)]
pub enum UploadError {
    /// User-correctable input failure (no file selected). Shown inline.
    #[error("Validation error: {0}")]
    Validation(String),

    /// The server response did not match the upload contract's shape.
    #[error("Schema error: {0}")]
    Schema(String),

    /// Transport-level failure or a non-success HTTP status.
    #[error("Network error: {0}")]
    Network(String),

    /// The server explicitly reported an error string.
    #[error("Remote error: {0}")]
    Remote(String),

    /// The response lacked a field required by the chosen upload variant.
    #[error("Contract error: {0}")]
    Contract(String),
}

impl UploadError {
    /// Stable tag for the diagnostic channel (log fields, test assertions).
    pub fn kind(&self) -> &'static str {
        match self {
            UploadError::Validation(_) => "validation",
            UploadError::Schema(_) => "schema",
            UploadError::Network(_) => "network",
            UploadError::Remote(_) => "remote",
            UploadError::Contract(_) => "contract",
        }
    }
}

impl From<serde_json::Error> for UploadError {
    fn from(err: serde_json::Error) -> Self {
        UploadError::Schema(format!("JSON parsing error: {}", err))
    }
}
