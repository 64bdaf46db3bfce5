//! Input aggregation
//!
//! Collapses the three acquisition channels (file picker, drag-and-drop,
//! clipboard paste) into single `FilePayload` emissions feeding the
//! orchestrator. A channel that cannot produce exactly one acceptable file
//! logs a diagnostic and emits nothing; channel problems are never surfaced
//! as user-facing errors.
//!
//! Channels do not gate on pending state. The orchestrator's single-flight
//! guard serializes submissions; an emission arriving while one is in flight
//! is simply not dispatched there.

use async_trait::async_trait;
use bytes::Bytes;
use picdrop_core::models::FilePayload;
use tokio::sync::watch;
use uuid::Uuid;

/// MIME filter for the drop and paste channels.
///
/// `image/*` by default. A wildcard subtype matches any non-empty subtype;
/// otherwise comparison is exact. Matching is case-insensitive.
#[derive(Clone, Debug)]
pub struct AcceptFilter {
    kind: String,
    subtype: Option<String>,
}

impl AcceptFilter {
    pub fn new(pattern: &str) -> Self {
        let pattern = pattern.trim().to_ascii_lowercase();
        match pattern.split_once('/') {
            Some((kind, "*")) => Self {
                kind: kind.to_string(),
                subtype: None,
            },
            Some((kind, subtype)) => Self {
                kind: kind.to_string(),
                subtype: Some(subtype.to_string()),
            },
            None => Self {
                kind: pattern,
                subtype: None,
            },
        }
    }

    pub fn matches(&self, content_type: &str) -> bool {
        let content_type = content_type.trim().to_ascii_lowercase();
        let Some((kind, subtype)) = content_type.split_once('/') else {
            return false;
        };
        if kind != self.kind {
            return false;
        }
        match &self.subtype {
            None => !subtype.is_empty(),
            Some(expected) => subtype == expected,
        }
    }
}

impl Default for AcceptFilter {
    fn default() -> Self {
        Self::new("image/*")
    }
}

/// One clipboard item as exposed by the platform.
#[derive(Clone, Debug)]
pub struct ClipboardItem {
    pub content_type: String,
    pub bytes: Bytes,
}

/// Platform clipboard access. Implementations wrap whatever the host
/// environment exposes; tests script the contents.
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    async fn read(&self) -> Result<Vec<ClipboardItem>, anyhow::Error>;
}

/// Collapses input channels into single-file emissions.
pub struct InputAggregator {
    filter: AcceptFilter,
    allow_drop: bool,
    allow_paste: bool,
    hovering: watch::Sender<bool>,
}

impl InputAggregator {
    pub fn new(filter: AcceptFilter, allow_drop: bool, allow_paste: bool) -> Self {
        Self {
            filter,
            allow_drop,
            allow_paste,
            hovering: watch::Sender::new(false),
        }
    }

    /// Observable drag-hover flag for the presentation layer.
    pub fn hovering(&self) -> watch::Receiver<bool> {
        self.hovering.subscribe()
    }

    /// Picker channel: emits iff exactly one file was selected. The picker is
    /// always enabled and its input already passed the control's accept
    /// attribute, so no filter is applied here.
    pub fn picker_changed(&self, mut files: Vec<FilePayload>) -> Option<FilePayload> {
        if files.len() == 1 {
            return files.pop();
        }
        tracing::debug!(
            count = files.len(),
            "picker change without exactly one file, ignoring"
        );
        None
    }

    /// Drag entered the target: raise the hover flag.
    pub fn drag_over(&self) {
        if self.allow_drop {
            self.hovering.send_replace(true);
        }
    }

    /// Drag left the target: clear the hover flag.
    pub fn drag_leave(&self) {
        self.hovering.send_replace(false);
    }

    /// Drop: emits iff exactly one item was dropped and its type matches the
    /// accepted filter. Multi-file drops are rejected outright, with no
    /// partial processing.
    pub fn dropped(&self, mut items: Vec<FilePayload>) -> Option<FilePayload> {
        self.hovering.send_replace(false);

        if !self.allow_drop {
            tracing::debug!("drop received while drag-and-drop is disabled, ignoring");
            return None;
        }
        if items.len() != 1 {
            tracing::debug!(
                count = items.len(),
                "drop must contain exactly one file, ignoring"
            );
            return None;
        }
        let item = items.pop()?;
        if !self.filter.matches(&item.content_type) {
            tracing::debug!(
                content_type = %item.content_type,
                "dropped file type not accepted, ignoring"
            );
            return None;
        }
        Some(item)
    }

    /// Paste channel: scans the clipboard for the first item matching the
    /// accepted filter and synthesizes a short uniquely-named file from it.
    /// Clipboard failure or no matching item: logged, nothing emitted.
    pub async fn pasted(&self, clipboard: &dyn ClipboardSource) -> Option<FilePayload> {
        if !self.allow_paste {
            return None;
        }

        let items = match clipboard.read().await {
            Ok(items) => items,
            Err(error) => {
                tracing::debug!(%error, "clipboard read failed, ignoring paste");
                return None;
            }
        };

        let Some(item) = items
            .into_iter()
            .find(|item| self.filter.matches(&item.content_type))
        else {
            tracing::debug!("no clipboard item matches the accepted filter, ignoring paste");
            return None;
        };

        Some(synthesize_pasted_file(item))
    }
}

/// Synthetic payload for a pasted clipboard item: an 8-hex-char name derived
/// from a random identifier, extension taken from the MIME subtype. The name
/// makes no uniqueness promise; the storage key is made unique server-side.
fn synthesize_pasted_file(item: ClipboardItem) -> FilePayload {
    let id = Uuid::new_v4().simple().to_string();
    let name = format!("{}.{}", &id[..8], extension_for(&item.content_type));
    FilePayload::new(name, item.content_type, item.bytes)
}

/// File extension for a MIME type. Subtypes map onto themselves except where
/// convention disagrees.
fn extension_for(content_type: &str) -> String {
    let subtype = content_type
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .unwrap_or("bin");
    match subtype {
        "svg+xml" => "svg".to_string(),
        "x-icon" | "vnd.microsoft.icon" => "ico".to_string(),
        _ => subtype.to_ascii_lowercase(),
    }
}
