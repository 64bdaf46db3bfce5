//! Transfer seam
//!
//! The orchestrator reaches the signing/storage service only through this
//! trait. The HTTP implementation lives in `picdrop-client`; tests substitute
//! scripted mocks.

use async_trait::async_trait;

use crate::contract::UploadAuthorization;
use crate::error::UploadError;
use crate::models::{FilePayload, UploadReceipt};

#[async_trait]
pub trait TransferApi: Send + Sync {
    /// Request an upload authorization for the file's name, MIME type, and
    /// byte size. Must not attempt any upload.
    async fn request_authorization(
        &self,
        file: &FilePayload,
    ) -> Result<UploadAuthorization, UploadError>;

    /// Perform the upload described by a validated authorization and return
    /// the public retrieval URL.
    async fn perform_upload(
        &self,
        file: &FilePayload,
        auth: UploadAuthorization,
    ) -> Result<UploadReceipt, UploadError>;
}
