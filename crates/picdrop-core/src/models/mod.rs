//! Domain models

pub mod history;
pub mod payload;
pub mod receipt;
pub mod submission;

pub use history::{HistoryEntry, UploadHistory};
pub use payload::FilePayload;
pub use receipt::UploadReceipt;
pub use submission::{SubmissionState, GENERIC_FAILURE_MESSAGE, MISSING_FILE_MESSAGE};
