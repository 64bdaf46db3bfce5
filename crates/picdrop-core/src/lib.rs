//! Picdrop Core Library
//!
//! This crate provides the domain models, signing-service contract, error
//! types, and configuration shared across all Picdrop components.

pub mod config;
pub mod contract;
pub mod error;
pub mod models;
pub mod transfer;

// Re-export commonly used types
pub use config::UploaderConfig;
pub use contract::{UploadAuthorization, FILE_FIELD};
pub use error::UploadError;
pub use models::{FilePayload, HistoryEntry, SubmissionState, UploadHistory, UploadReceipt};
pub use transfer::TransferApi;
