//! Domain methods for the signing/storage exchange.
//!
//! Two calls per submission: `request_authorization` obtains and validates a
//! signed upload target, `perform_upload` transfers the bytes under whichever
//! protocol variant the authorization selected. Neither call retries.

use picdrop_core::contract::{self, UploadAuthorization, FILE_FIELD};
use picdrop_core::models::{FilePayload, UploadReceipt};
use picdrop_core::transfer::TransferApi;
use picdrop_core::UploadError;

use crate::TransferClient;

impl TransferClient {
    /// Request an upload authorization for a file.
    ///
    /// Sends the file's name, MIME type, and byte size as query parameters to
    /// the configured endpoint and validates the response against the upload
    /// contract. No upload is attempted on any failure path, including a
    /// server-reported rejection.
    pub async fn request_authorization(
        &self,
        file: &FilePayload,
    ) -> Result<UploadAuthorization, UploadError> {
        let query = [
            ("fileName", file.name.clone()),
            ("fileType", file.content_type.clone()),
            ("t", file.size().to_string()),
        ];

        let body = self.get_json(&query).await?;
        match contract::validate(&body)? {
            UploadAuthorization::Rejected { error } => Err(UploadError::Remote(error)),
            auth => Ok(auth),
        }
    }

    /// Perform the upload described by a validated authorization.
    pub async fn perform_upload(
        &self,
        file: &FilePayload,
        auth: UploadAuthorization,
    ) -> Result<UploadReceipt, UploadError> {
        match auth {
            // A rejected authorization never reaches storage.
            UploadAuthorization::Rejected { error } => Err(UploadError::Remote(error)),
            UploadAuthorization::PresignedPost {
                url,
                fields,
                file_url,
            } => {
                self.presigned_post(file, &url, fields).await?;
                Ok(UploadReceipt { file_url })
            }
            UploadAuthorization::Direct { .. } => self.direct_post(file).await,
        }
    }

    /// Presigned-POST variant: every authorization field in mapping order,
    /// then the file under the fixed field name.
    async fn presigned_post(
        &self,
        file: &FilePayload,
        url: &str,
        fields: Vec<(String, String)>,
    ) -> Result<(), UploadError> {
        let mut form = reqwest::multipart::Form::new();
        for (key, value) in fields {
            form = form.text(key, value);
        }
        form = form.part(FILE_FIELD, file_part(file)?);

        tracing::debug!(url, "posting to presigned target");
        // The public URL is already known, but the POST is still awaited so a
        // storage rejection is not silently swallowed.
        self.post_multipart(url, form).await?;
        Ok(())
    }

    /// Direct variant: the file alone, posted to the configured endpoint. The
    /// public URL arrives in the response body, which must itself pass
    /// contract validation.
    async fn direct_post(&self, file: &FilePayload) -> Result<UploadReceipt, UploadError> {
        let form = reqwest::multipart::Form::new().part(FILE_FIELD, file_part(file)?);
        let endpoint = self.endpoint().to_string();

        tracing::debug!(endpoint, "posting directly to endpoint");
        let response = self.post_multipart(&endpoint, form).await?;
        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|e| UploadError::Schema(format!("upload response is not valid JSON: {}", e)))?;

        match contract::validate(&body)? {
            UploadAuthorization::Rejected { error } => Err(UploadError::Remote(error)),
            UploadAuthorization::PresignedPost { file_url, .. } => Ok(UploadReceipt { file_url }),
            UploadAuthorization::Direct {
                file_url: Some(file_url),
            } => Ok(UploadReceipt { file_url }),
            UploadAuthorization::Direct { file_url: None } => Err(UploadError::Contract(
                "upload response is missing fileUrl".to_string(),
            )),
        }
    }
}

fn file_part(file: &FilePayload) -> Result<reqwest::multipart::Part, UploadError> {
    reqwest::multipart::Part::bytes(file.bytes.to_vec())
        .file_name(file.name.clone())
        .mime_str(&file.content_type)
        .map_err(|e| {
            UploadError::Validation(format!("invalid content type {:?}: {}", file.content_type, e))
        })
}

#[async_trait::async_trait]
impl TransferApi for TransferClient {
    async fn request_authorization(
        &self,
        file: &FilePayload,
    ) -> Result<UploadAuthorization, UploadError> {
        TransferClient::request_authorization(self, file).await
    }

    async fn perform_upload(
        &self,
        file: &FilePayload,
        auth: UploadAuthorization,
    ) -> Result<UploadReceipt, UploadError> {
        TransferClient::perform_upload(self, file, auth).await
    }
}
