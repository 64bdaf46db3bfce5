//! Orchestrator state machine tests.
//!
//! The transfer seam is a scripted mock; no HTTP is involved. Run with:
//! `cargo test -p picdrop-uploader --test orchestrator_test`

mod helpers;

use std::sync::Arc;

use helpers::{png_file, presigned_auth, receipt, MockTransferApi};
use picdrop_core::models::{SubmissionState, GENERIC_FAILURE_MESSAGE, MISSING_FILE_MESSAGE};
use picdrop_core::UploadError;
use picdrop_uploader::UploadOrchestrator;

#[tokio::test]
async fn submit_without_file_fails_validation_and_stays_offline() {
    let api = Arc::new(MockTransferApi::new());
    let orchestrator = UploadOrchestrator::new(api.clone());

    let state = orchestrator.submit(None).await;

    assert_eq!(
        state,
        SubmissionState::Failed(MISSING_FILE_MESSAGE.to_string())
    );
    assert_eq!(api.authorization_count(), 0);
    assert_eq!(api.upload_count(), 0);
    assert!(orchestrator.history().await.is_empty());
}

#[tokio::test]
async fn successful_submission_passes_through_pending() {
    let api = Arc::new(MockTransferApi::new());
    api.script_authorization(Ok(presigned_auth("https://cdn.example/abc.png")));
    api.script_upload(Ok(receipt("https://cdn.example/abc.png")));

    let orchestrator = UploadOrchestrator::new(api.clone());
    assert_eq!(orchestrator.state(), SubmissionState::Idle);
    api.probe_state(orchestrator.subscribe());

    let state = orchestrator.submit(Some(png_file())).await;

    assert_eq!(
        state,
        SubmissionState::Succeeded("https://cdn.example/abc.png".to_string())
    );
    assert!(api.saw_pending(), "authorization must run in Pending state");
}

#[tokio::test]
async fn authorization_failure_skips_upload() {
    let api = Arc::new(MockTransferApi::new());
    api.script_authorization(Err(UploadError::Remote("access denied".to_string())));

    let orchestrator = UploadOrchestrator::new(api.clone());
    let state = orchestrator.submit(Some(png_file())).await;

    assert_eq!(
        state,
        SubmissionState::Failed(GENERIC_FAILURE_MESSAGE.to_string())
    );
    assert_eq!(api.authorization_count(), 1);
    assert_eq!(api.upload_count(), 0, "upload must not run after rejection");
    assert!(orchestrator.history().await.is_empty());
}

#[tokio::test]
async fn upload_failure_reports_generic_message() {
    let api = Arc::new(MockTransferApi::new());
    api.script_authorization(Ok(presigned_auth("https://cdn.example/abc.png")));
    api.script_upload(Err(UploadError::Network(
        "upload failed with status 403".to_string(),
    )));

    let orchestrator = UploadOrchestrator::new(api.clone());
    let state = orchestrator.submit(Some(png_file())).await;

    assert_eq!(
        state,
        SubmissionState::Failed(GENERIC_FAILURE_MESSAGE.to_string())
    );
    assert!(orchestrator.history().await.is_empty());
}

#[tokio::test]
async fn terminal_state_resets_on_next_submission() {
    let api = Arc::new(MockTransferApi::new());
    api.script_authorization(Err(UploadError::Network("timed out".to_string())));
    api.script_authorization(Ok(presigned_auth("https://cdn.example/abc.png")));
    api.script_upload(Ok(receipt("https://cdn.example/abc.png")));

    let orchestrator = UploadOrchestrator::new(api.clone());

    let first = orchestrator.submit(Some(png_file())).await;
    assert!(matches!(first, SubmissionState::Failed(_)));

    let second = orchestrator.submit(Some(png_file())).await;
    assert_eq!(
        second,
        SubmissionState::Succeeded("https://cdn.example/abc.png".to_string())
    );
}

#[tokio::test]
async fn overlapping_submit_is_not_dispatched() {
    let api = Arc::new(MockTransferApi::new());
    let release = api.hold_next_authorization();
    api.script_authorization(Ok(presigned_auth("https://cdn.example/abc.png")));
    api.script_upload(Ok(receipt("https://cdn.example/abc.png")));

    let orchestrator = Arc::new(UploadOrchestrator::new(api.clone()));
    let mut state_rx = orchestrator.subscribe();

    let first = {
        let orchestrator = orchestrator.clone();
        tokio::spawn(async move { orchestrator.submit(Some(png_file())).await })
    };
    helpers::wait_for_state(&mut state_rx, |s| s.is_pending()).await;

    // Second trigger while pending: returned unchanged, nothing dispatched.
    let second = orchestrator.submit(Some(png_file())).await;
    assert_eq!(second, SubmissionState::Pending);
    assert_eq!(api.authorization_count(), 1);

    release.send(()).unwrap();
    let first = first.await.unwrap();
    assert_eq!(
        first,
        SubmissionState::Succeeded("https://cdn.example/abc.png".to_string())
    );
    assert_eq!(api.authorization_count(), 1);
    assert_eq!(api.upload_count(), 1);
}

#[tokio::test]
async fn success_prepends_history_entry() {
    let api = Arc::new(MockTransferApi::new());
    api.script_authorization(Ok(presigned_auth("https://cdn.example/abc.png")));
    api.script_upload(Ok(receipt("https://cdn.example/abc.png")));

    let orchestrator = UploadOrchestrator::new(api.clone());
    let state = orchestrator.submit(Some(png_file())).await;

    assert_eq!(
        state,
        SubmissionState::Succeeded("https://cdn.example/abc.png".to_string())
    );
    let history = orchestrator.history().await;
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].file_url, "https://cdn.example/abc.png");
    assert_eq!(history[0].content_type, "image/png");
}

#[tokio::test]
async fn history_is_most_recent_first() {
    let api = Arc::new(MockTransferApi::new());
    for url in ["https://cdn.example/1.png", "https://cdn.example/2.png"] {
        api.script_authorization(Ok(presigned_auth(url)));
        api.script_upload(Ok(receipt(url)));
    }

    let orchestrator = UploadOrchestrator::new(api.clone());
    orchestrator.submit(Some(png_file())).await;
    orchestrator.submit(Some(png_file())).await;

    let history = orchestrator.history().await;
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].file_url, "https://cdn.example/2.png");
    assert_eq!(history[1].file_url, "https://cdn.example/1.png");
}
