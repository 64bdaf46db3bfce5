//! Upload orchestration
//!
//! The state machine binding input emissions to transfer calls. At most one
//! submission is in flight; the guard is held here rather than delegated to
//! any caller-side primitive. Every transfer failure collapses to a single
//! user-visible message, with the distinguishing error kind kept on the
//! diagnostic channel.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::Utc;
use picdrop_core::models::{
    FilePayload, HistoryEntry, SubmissionState, UploadHistory, UploadReceipt,
    GENERIC_FAILURE_MESSAGE, MISSING_FILE_MESSAGE,
};
use picdrop_core::transfer::TransferApi;
use picdrop_core::UploadError;
use tokio::sync::{watch, Mutex};

/// Drives one submission at a time through authorize-then-upload and exposes
/// the outcome as observable state.
pub struct UploadOrchestrator {
    api: Arc<dyn TransferApi>,
    state: watch::Sender<SubmissionState>,
    in_flight: AtomicBool,
    history: Mutex<UploadHistory>,
}

impl UploadOrchestrator {
    pub fn new(api: Arc<dyn TransferApi>) -> Self {
        Self {
            api,
            state: watch::Sender::new(SubmissionState::Idle),
            in_flight: AtomicBool::new(false),
            history: Mutex::new(UploadHistory::new()),
        }
    }

    /// Current submission state.
    pub fn state(&self) -> SubmissionState {
        self.state.borrow().clone()
    }

    /// Observable submission state for the presentation layer.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.state.subscribe()
    }

    /// Successful uploads, most recent first.
    pub async fn history(&self) -> Vec<HistoryEntry> {
        self.history.lock().await.entries().to_vec()
    }

    /// Submit one file for upload.
    ///
    /// `None` is the no-file validation failure: it transitions straight to
    /// `Failed` and contacts nothing. A call arriving while another
    /// submission is pending is not dispatched; the current state is
    /// returned unchanged.
    #[tracing::instrument(skip(self, file), fields(operation = "submit"))]
    pub async fn submit(&self, file: Option<FilePayload>) -> SubmissionState {
        if self.in_flight.swap(true, Ordering::SeqCst) {
            tracing::debug!("submission already in flight, not dispatched");
            return self.state();
        }

        let state = match file {
            None => {
                tracing::debug!("submission without a file");
                SubmissionState::Failed(MISSING_FILE_MESSAGE.to_string())
            }
            Some(file) => {
                self.state.send_replace(SubmissionState::Pending);
                match self.run_transfer(&file).await {
                    Ok(receipt) => {
                        self.record_success(&file, &receipt).await;
                        SubmissionState::Succeeded(receipt.file_url)
                    }
                    Err(error) => {
                        tracing::error!(kind = error.kind(), %error, "upload failed");
                        SubmissionState::Failed(GENERIC_FAILURE_MESSAGE.to_string())
                    }
                }
            }
        };

        self.state.send_replace(state.clone());
        self.in_flight.store(false, Ordering::SeqCst);
        state
    }

    /// Authorization, then upload, strictly in that order. The upload never
    /// starts unless authorization succeeded.
    async fn run_transfer(&self, file: &FilePayload) -> Result<UploadReceipt, UploadError> {
        let auth = self.api.request_authorization(file).await?;
        self.api.perform_upload(file, auth).await
    }

    async fn record_success(&self, file: &FilePayload, receipt: &UploadReceipt) {
        let entry = HistoryEntry {
            file_url: receipt.file_url.clone(),
            content_type: file.content_type.clone(),
            uploaded_at: Utc::now(),
        };
        self.history.lock().await.record(entry);
        tracing::info!(file_url = %receipt.file_url, name = %file.name, "upload succeeded");
    }
}
