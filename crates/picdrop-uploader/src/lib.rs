//! Picdrop uploader
//!
//! Binds the input aggregator to the upload orchestrator: a pump task
//! consumes `InputEvent`s, extracts single-file emissions, and drives the
//! submission state machine. Consumers observe state through watch channels
//! and stop the pump through its handle, which is the unsubscribe half of
//! the listener lifecycle.

pub mod aggregator;
pub mod orchestrator;

use std::sync::Arc;

use picdrop_client::TransferClient;
use picdrop_core::models::{FilePayload, SubmissionState};
use picdrop_core::transfer::TransferApi;
use picdrop_core::UploaderConfig;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

pub use aggregator::{AcceptFilter, ClipboardItem, ClipboardSource, InputAggregator};
pub use orchestrator::UploadOrchestrator;

/// One user action on an input channel.
#[derive(Clone, Debug)]
pub enum InputEvent {
    /// The file-picker selection changed.
    PickerChanged(Vec<FilePayload>),
    /// A drag entered the drop target.
    DragOver,
    /// A drag left the drop target.
    DragLeave,
    /// Items were dropped on the drop target.
    Dropped(Vec<FilePayload>),
    /// The paste shortcut fired.
    PasteShortcut,
    /// Explicit submission of the retained selection (auto-submit off).
    Submit,
}

/// Clipboard source for deployments without paste support.
pub struct NoClipboard;

#[async_trait::async_trait]
impl ClipboardSource for NoClipboard {
    async fn read(&self) -> Result<Vec<ClipboardItem>, anyhow::Error> {
        Err(anyhow::anyhow!("no clipboard source configured"))
    }
}

/// The assembled widget core: aggregator, orchestrator, and the channel
/// configuration binding them.
pub struct Uploader {
    orchestrator: Arc<UploadOrchestrator>,
    aggregator: InputAggregator,
    clipboard: Arc<dyn ClipboardSource>,
    auto_submit: bool,
    selected: Option<FilePayload>,
}

impl Uploader {
    pub fn new(
        config: &UploaderConfig,
        api: Arc<dyn TransferApi>,
        clipboard: Arc<dyn ClipboardSource>,
    ) -> Self {
        let aggregator = InputAggregator::new(
            AcceptFilter::new(&config.accept),
            config.allow_drop,
            config.allow_paste,
        );
        Self {
            orchestrator: Arc::new(UploadOrchestrator::new(api)),
            aggregator,
            clipboard,
            auto_submit: config.auto_submit,
            selected: None,
        }
    }

    /// Assemble the uploader from the environment: configuration, HTTP
    /// transfer client, and the given clipboard source. A missing
    /// `PICDROP_API_URL` fails here, at startup, not at submission time.
    pub fn from_env(clipboard: Arc<dyn ClipboardSource>) -> Result<Self, anyhow::Error> {
        let config = UploaderConfig::from_env()?;
        let client = TransferClient::from_config(&config)?;
        Ok(Self::new(&config, Arc::new(client), clipboard))
    }

    /// Observable submission state.
    pub fn subscribe(&self) -> watch::Receiver<SubmissionState> {
        self.orchestrator.subscribe()
    }

    /// Observable drag-hover flag.
    pub fn hovering(&self) -> watch::Receiver<bool> {
        self.aggregator.hovering()
    }

    /// Shared handle to the orchestrator (state, history).
    pub fn orchestrator(&self) -> Arc<UploadOrchestrator> {
        self.orchestrator.clone()
    }

    /// Start the pump task over an input event stream. Subscribe-on-start:
    /// the returned handle's `stop` is the matching unsubscribe.
    pub fn spawn(self, events: mpsc::UnboundedReceiver<InputEvent>) -> UploaderHandle {
        let orchestrator = self.orchestrator.clone();
        let shutdown = watch::Sender::new(false);
        let task = tokio::spawn(self.pump(events, shutdown.subscribe()));
        UploaderHandle {
            orchestrator,
            shutdown,
            task: Some(task),
        }
    }

    async fn pump(
        mut self,
        mut events: mpsc::UnboundedReceiver<InputEvent>,
        mut shutdown: watch::Receiver<bool>,
    ) {
        loop {
            tokio::select! {
                _ = shutdown.changed() => break,
                event = events.recv() => match event {
                    Some(event) => self.handle_event(event).await,
                    None => break,
                },
            }
        }
        tracing::debug!("input pump stopped");
    }

    /// Dispatch one input event. The pump calls this; callers driving the
    /// uploader without a task can call it directly.
    pub async fn handle_event(&mut self, event: InputEvent) {
        match event {
            InputEvent::PickerChanged(files) => {
                if let Some(file) = self.aggregator.picker_changed(files) {
                    self.accept(file).await;
                }
            }
            InputEvent::DragOver => self.aggregator.drag_over(),
            InputEvent::DragLeave => self.aggregator.drag_leave(),
            InputEvent::Dropped(items) => {
                if let Some(file) = self.aggregator.dropped(items) {
                    self.accept(file).await;
                }
            }
            InputEvent::PasteShortcut => {
                if let Some(file) = self.aggregator.pasted(self.clipboard.as_ref()).await {
                    self.accept(file).await;
                }
            }
            InputEvent::Submit => {
                let file = self.selected.take();
                self.orchestrator.submit(file).await;
            }
        }
    }

    /// Every channel emission funnels through here: submit immediately, or
    /// retain as the current selection for an explicit `Submit`.
    async fn accept(&mut self, file: FilePayload) {
        if self.auto_submit {
            self.orchestrator.submit(Some(file)).await;
        } else {
            tracing::debug!(name = %file.name, "file retained for explicit submit");
            self.selected = Some(file);
        }
    }
}

/// Running pump handle. Stopping (or dropping) it detaches the uploader from
/// its event source; an in-flight submission still runs to completion.
pub struct UploaderHandle {
    orchestrator: Arc<UploadOrchestrator>,
    shutdown: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl UploaderHandle {
    pub fn orchestrator(&self) -> &UploadOrchestrator {
        &self.orchestrator
    }

    /// Stop consuming input events. The event currently being handled, and
    /// any submission it started, completes first.
    pub fn stop(&self) {
        self.shutdown.send_replace(true);
    }

    /// Stop and wait for the pump task to finish.
    pub async fn join(mut self) {
        self.shutdown.send_replace(true);
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for UploaderHandle {
    fn drop(&mut self) {
        self.shutdown.send_replace(true);
    }
}

/// Install a tracing subscriber honoring `RUST_LOG`. Intended for consumers
/// and tests; repeated calls are no-ops.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .try_init();
}
