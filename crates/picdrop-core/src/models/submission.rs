//! Submission state model

/// Message shown when a submission is dispatched without a file.
pub const MISSING_FILE_MESSAGE: &str = "Please select a file";

/// Generic user-visible failure message. The diagnostic channel carries the
/// distinguishing error kind and detail; the user does not.
pub const GENERIC_FAILURE_MESSAGE: &str = "There was an error. Please try again later";

/// Outcome of one orchestration cycle.
///
/// Exactly one state is live at a time; a new submission overwrites the
/// previous terminal state. There is no final state: the machine is
/// perpetually resettable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionState {
    /// No submission yet.
    Idle,
    /// One submission in flight.
    Pending,
    /// The upload completed; carries the public retrieval URL.
    Succeeded(String),
    /// The upload failed; carries the user-visible message.
    Failed(String),
}

impl SubmissionState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SubmissionState::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SubmissionState::Succeeded(_) | SubmissionState::Failed(_)
        )
    }

    /// Status line for consumers rendering the widget.
    pub fn status_line(&self) -> &str {
        match self {
            SubmissionState::Idle => "Choose a file...",
            SubmissionState::Pending => "Uploading...",
            SubmissionState::Succeeded(_) => "Uploaded.",
            SubmissionState::Failed(message) => message,
        }
    }
}

impl Default for SubmissionState {
    fn default() -> Self {
        SubmissionState::Idle
    }
}
