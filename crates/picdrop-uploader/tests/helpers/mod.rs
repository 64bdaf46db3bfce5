//! Test helpers: scripted transfer API and clipboard sources.
//!
//! The mocks script results per call and record call counts, so tests can
//! assert which network steps ran without any HTTP in the loop.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use picdrop_core::contract::UploadAuthorization;
use picdrop_core::models::{FilePayload, SubmissionState, UploadReceipt};
use picdrop_core::transfer::TransferApi;
use picdrop_core::UploadError;
use picdrop_uploader::{ClipboardItem, ClipboardSource};
use tokio::sync::{oneshot, watch};

pub fn png_file() -> FilePayload {
    FilePayload::new("shot.png", "image/png", &b"\x89PNG"[..])
}

pub fn text_file() -> FilePayload {
    FilePayload::new("notes.txt", "text/plain", &b"notes"[..])
}

/// The eight-field presigned authorization from the signing contract.
pub fn presigned_auth(file_url: &str) -> UploadAuthorization {
    UploadAuthorization::PresignedPost {
        url: "https://bucket.example/upload".to_string(),
        fields: vec![
            ("Content-Type".to_string(), "image/png".to_string()),
            ("key".to_string(), "uploads/abc.png".to_string()),
            ("x-amz-algorithm".to_string(), "AWS4-HMAC-SHA256".to_string()),
            ("x-amz-credential".to_string(), "cred".to_string()),
            ("x-amz-date".to_string(), "20260807T000000Z".to_string()),
            ("x-amz-security-token".to_string(), "token".to_string()),
            ("policy".to_string(), "cGF5bG9hZA==".to_string()),
            ("x-amz-signature".to_string(), "deadbeef".to_string()),
        ],
        file_url: file_url.to_string(),
    }
}

pub fn receipt(file_url: &str) -> UploadReceipt {
    UploadReceipt {
        file_url: file_url.to_string(),
    }
}

/// Scripted transfer API: canned results, call counters, an optional gate
/// holding the next authorization open, and a probe observing the
/// orchestrator's state from inside the transfer call.
#[derive(Default)]
pub struct MockTransferApi {
    authorizations: Mutex<VecDeque<Result<UploadAuthorization, UploadError>>>,
    uploads: Mutex<VecDeque<Result<UploadReceipt, UploadError>>>,
    pub authorization_calls: AtomicUsize,
    pub upload_calls: AtomicUsize,
    gate: Mutex<Option<oneshot::Receiver<()>>>,
    probe: Mutex<Option<watch::Receiver<SubmissionState>>>,
    saw_pending: AtomicBool,
}

impl MockTransferApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn script_authorization(&self, result: Result<UploadAuthorization, UploadError>) {
        self.authorizations.lock().unwrap().push_back(result);
    }

    pub fn script_upload(&self, result: Result<UploadReceipt, UploadError>) {
        self.uploads.lock().unwrap().push_back(result);
    }

    /// Hold the next authorization open until the returned sender fires.
    pub fn hold_next_authorization(&self) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        *self.gate.lock().unwrap() = Some(rx);
        tx
    }

    /// Observe the orchestrator's state from inside the transfer calls.
    pub fn probe_state(&self, rx: watch::Receiver<SubmissionState>) {
        *self.probe.lock().unwrap() = Some(rx);
    }

    /// Whether the probed state was `Pending` when authorization ran.
    pub fn saw_pending(&self) -> bool {
        self.saw_pending.load(Ordering::SeqCst)
    }

    pub fn authorization_count(&self) -> usize {
        self.authorization_calls.load(Ordering::SeqCst)
    }

    pub fn upload_count(&self) -> usize {
        self.upload_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TransferApi for MockTransferApi {
    async fn request_authorization(
        &self,
        _file: &FilePayload,
    ) -> Result<UploadAuthorization, UploadError> {
        self.authorization_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(probe) = self.probe.lock().unwrap().as_ref() {
            if probe.borrow().is_pending() {
                self.saw_pending.store(true, Ordering::SeqCst);
            }
        }

        let gate = self.gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        self.authorizations
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted authorization result")
    }

    async fn perform_upload(
        &self,
        _file: &FilePayload,
        _auth: UploadAuthorization,
    ) -> Result<UploadReceipt, UploadError> {
        self.upload_calls.fetch_add(1, Ordering::SeqCst);
        self.uploads
            .lock()
            .unwrap()
            .pop_front()
            .expect("no scripted upload result")
    }
}

/// Clipboard with fixed contents, or a fixed failure.
pub struct MockClipboard {
    result: Result<Vec<ClipboardItem>, String>,
}

impl MockClipboard {
    pub fn with_items(items: Vec<ClipboardItem>) -> Self {
        Self { result: Ok(items) }
    }

    pub fn failing(message: &str) -> Self {
        Self {
            result: Err(message.to_string()),
        }
    }
}

#[async_trait]
impl ClipboardSource for MockClipboard {
    async fn read(&self) -> Result<Vec<ClipboardItem>, anyhow::Error> {
        match &self.result {
            Ok(items) => Ok(items.clone()),
            Err(message) => Err(anyhow::anyhow!("{}", message)),
        }
    }
}

pub fn clipboard_item(content_type: &str, bytes: &'static [u8]) -> ClipboardItem {
    ClipboardItem {
        content_type: content_type.to_string(),
        bytes: bytes::Bytes::from_static(bytes),
    }
}

/// Wait until the observed state satisfies the predicate.
pub async fn wait_for_state(
    rx: &mut watch::Receiver<SubmissionState>,
    predicate: impl FnMut(&SubmissionState) -> bool,
) -> SubmissionState {
    tokio::time::timeout(Duration::from_secs(2), rx.wait_for(predicate))
        .await
        .expect("timed out waiting for submission state")
        .expect("state channel closed")
        .clone()
}

/// Let the pump task drain anything already queued.
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(50)).await;
}
