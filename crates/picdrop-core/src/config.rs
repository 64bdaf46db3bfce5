//! Configuration module
//!
//! Environment-driven configuration for the uploader. One setting is required
//! (the signing/storage API endpoint); its absence is a startup failure, not a
//! runtime error. Everything else has a default.

use std::env;

const DEFAULT_ACCEPT: &str = "image/*";
const HTTP_TIMEOUT_SECS: u64 = 60;

/// Uploader configuration.
#[derive(Clone, Debug)]
pub struct UploaderConfig {
    /// Signing/storage API endpoint. The only required setting.
    pub api_endpoint: String,
    /// Accepted MIME filter for the drop and paste channels (e.g. `image/*`).
    pub accept: String,
    /// Enables the clipboard-paste channel.
    pub allow_paste: bool,
    /// Enables the drag-and-drop channel.
    pub allow_drop: bool,
    /// Submit immediately when a channel emits a file. When off, an explicit
    /// submit event dispatches the retained selection.
    pub auto_submit: bool,
    /// Transport timeout applied to both the signing and upload requests.
    pub http_timeout_secs: u64,
}

impl UploaderConfig {
    /// Load configuration from the environment. `PICDROP_API_URL` must be set.
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        Ok(Self {
            api_endpoint: env::var("PICDROP_API_URL")
                .map_err(|_| anyhow::anyhow!("PICDROP_API_URL must be set"))?,
            accept: env::var("PICDROP_ACCEPT").unwrap_or_else(|_| DEFAULT_ACCEPT.to_string()),
            allow_paste: env::var("PICDROP_ALLOW_PASTE")
                .map(|v| parse_bool(&v, false))
                .unwrap_or(false),
            allow_drop: env::var("PICDROP_ALLOW_DROP")
                .map(|v| parse_bool(&v, true))
                .unwrap_or(true),
            auto_submit: env::var("PICDROP_AUTO_SUBMIT")
                .map(|v| parse_bool(&v, true))
                .unwrap_or(true),
            http_timeout_secs: env::var("PICDROP_HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| HTTP_TIMEOUT_SECS.to_string())
                .parse()
                .unwrap_or(HTTP_TIMEOUT_SECS),
        })
    }

    /// Programmatic configuration: defaults for everything but the endpoint.
    pub fn with_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            api_endpoint: endpoint.into(),
            accept: DEFAULT_ACCEPT.to_string(),
            allow_paste: false,
            allow_drop: true,
            auto_submit: true,
            http_timeout_secs: HTTP_TIMEOUT_SECS,
        }
    }
}

fn parse_bool(value: &str, default: bool) -> bool {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => true,
        "0" | "false" | "no" | "off" => false,
        _ => default,
    }
}
