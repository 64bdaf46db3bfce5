//! Upload contract validation
//!
//! The signing service's response shape, validated before it is trusted
//! anywhere else in the system. This is the single point where untrusted
//! network data becomes a typed value: the protocol variant is decided here,
//! once, instead of being re-inspected downstream.

use serde_json::Value;
use url::Url;

use crate::error::UploadError;

/// Form field name the file is appended under, in both upload variants.
pub const FILE_FIELD: &str = "file";

/// A validated signing-service response, tagged by protocol variant.
///
/// Created per submission attempt and discarded after the attempt completes;
/// never cached or reused across submissions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UploadAuthorization {
    /// The service reported an error. No other field is authoritative and no
    /// upload may be attempted.
    Rejected { error: String },
    /// Presigned-POST target: the form fields accompany the file, in mapping
    /// order, and the public URL is known before the POST.
    PresignedPost {
        url: String,
        fields: Vec<(String, String)>,
        file_url: String,
    },
    /// Direct upload to the configured endpoint. The public URL arrives in the
    /// upload response, which passes through this validator again.
    Direct { file_url: Option<String> },
}

/// Validate an untrusted signing-service payload.
///
/// Every field is individually optional, but a present field must carry the
/// expected primitive type, and `url`/`fileUrl` must be well-formed absolute
/// URLs. A non-empty `error` short-circuits: the remaining fields are not
/// inspected. A present `fields` object selects the presigned-POST variant,
/// which then requires both `url` and `fileUrl`; their absence is a contract
/// failure rather than a schema failure.
///
/// Pure validation: no I/O, no logging.
pub fn validate(raw: &Value) -> Result<UploadAuthorization, UploadError> {
    let object = raw
        .as_object()
        .ok_or_else(|| UploadError::Schema("response is not a JSON object".to_string()))?;

    if let Some(error) = object.get("error").filter(|v| !v.is_null()) {
        let error = error
            .as_str()
            .ok_or_else(|| UploadError::Schema("error must be a string".to_string()))?;
        if !error.is_empty() {
            return Ok(UploadAuthorization::Rejected {
                error: error.to_string(),
            });
        }
    }

    let url = optional_url(object, "url")?;
    let file_url = optional_url(object, "fileUrl")?;

    match object.get("fields").filter(|v| !v.is_null()) {
        Some(fields) => {
            let fields = validate_fields(fields)?;
            let url = url.ok_or_else(|| {
                UploadError::Contract("presigned-POST response is missing url".to_string())
            })?;
            let file_url = file_url.ok_or_else(|| {
                UploadError::Contract("presigned-POST response is missing fileUrl".to_string())
            })?;
            Ok(UploadAuthorization::PresignedPost {
                url,
                fields,
                file_url,
            })
        }
        None => Ok(UploadAuthorization::Direct { file_url }),
    }
}

/// A present `url`-valued field must be a string parsing as an absolute URL.
fn optional_url(
    object: &serde_json::Map<String, Value>,
    key: &str,
) -> Result<Option<String>, UploadError> {
    let Some(value) = object.get(key).filter(|v| !v.is_null()) else {
        return Ok(None);
    };
    let value = value
        .as_str()
        .ok_or_else(|| UploadError::Schema(format!("{} must be a string", key)))?;
    let parsed = Url::parse(value)
        .map_err(|e| UploadError::Schema(format!("{} is not an absolute URL: {}", key, e)))?;
    if !parsed.has_host() {
        return Err(UploadError::Schema(format!(
            "{} is not an absolute URL",
            key
        )));
    }
    Ok(Some(value.to_string()))
}

/// `fields` must be an object whose values are all strings. The exact keys are
/// an external contract, opaque here; their order is preserved because the
/// upload POST must append them in mapping order.
fn validate_fields(fields: &Value) -> Result<Vec<(String, String)>, UploadError> {
    let object = fields
        .as_object()
        .ok_or_else(|| UploadError::Schema("fields must be an object".to_string()))?;

    let mut validated = Vec::with_capacity(object.len());
    for (key, value) in object {
        let value = value
            .as_str()
            .ok_or_else(|| UploadError::Schema(format!("field {:?} must be a string", key)))?;
        validated.push((key.clone(), value.to_string()));
    }
    Ok(validated)
}
