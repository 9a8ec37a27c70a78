//! Integration tests for task submission, workers and task state.

use std::sync::Arc;
use std::time::Duration;

use penflow_analyzer::mock::MockAnalyzerEngine;
use penflow_core::TaskStatus;
use penflow_pipeline::{Error, RecognitionService, Submitted, TaskStore};
use penflow_recognizer::mock::MockRecognizer;

use crate::common::{
    FailingCompletionStore, SlowRecognizer, TestHarness, malformed_stroke, page, stroke,
    submission,
};

#[tokio::test]
async fn test_wait_returns_completed_pages() {
    let harness = TestHarness::new();
    let service = harness.service();

    let submitted = service
        .submit(
            "alice",
            submission(vec![
                page(vec![stroke(2)], false, false),
                page(vec![stroke(3), stroke(3)], false, false),
            ]),
            true,
        )
        .await
        .expect("task should complete");

    let Submitted::Completed { task_id, pages } = submitted else {
        unreachable!("waited submissions complete");
    };
    assert_eq!(pages.len(), 2);

    let task = service.task(&task_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Done);
    assert!(task.processed_at.is_some());
    assert!(task.error.is_none());
    let stored: serde_json::Value = serde_json::from_str(task.result.as_deref().unwrap()).unwrap();
    assert_eq!(stored.as_array().unwrap().len(), 2);
    let request: serde_json::Value = serde_json::from_str(&task.request).unwrap();
    assert_eq!(request[1]["strokes"].as_array().unwrap().len(), 2);

    service.shutdown().await;
}

#[tokio::test]
async fn test_accepted_task_completes_in_background() {
    let harness = TestHarness::new();
    let service = harness.service();

    let submitted = service
        .submit("alice", submission(vec![page(vec![stroke(2)], true, true)]), false)
        .await
        .unwrap();
    let Submitted::Accepted(task_id) = submitted else {
        unreachable!("submissions without wait are accepted");
    };
    service.shutdown().await;

    let task = harness.store.get(&task_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Done);
    assert_eq!(harness.ink.classify_calls().len(), 1);
}

#[tokio::test]
async fn test_decode_error_surfaces_to_waiting_caller() {
    let harness = TestHarness::new();
    let log = harness.engine_log();
    let service = harness.service();

    let err = service
        .submit(
            "alice",
            submission(vec![page(vec![malformed_stroke()], true, true)]),
            true,
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "DecodeError");
    assert_eq!(log.initialize_count(), 0);
    assert!(harness.ink.calls().is_empty());
    service.shutdown().await;
}

#[tokio::test]
async fn test_failed_task_is_marked_failed() {
    let harness = TestHarness::new();
    let service = harness.service();

    let task_id = service
        .submit(
            "alice",
            submission(vec![page(vec![stroke(2), malformed_stroke()], true, true)]),
            false,
        )
        .await
        .unwrap()
        .task_id();
    service.shutdown().await;

    let task = harness.store.get(&task_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Failed);
    assert!(task.result.is_none());
    assert!(task.processed_at.is_some());
    assert!(task.error.as_deref().unwrap().starts_with("DecodeError"));
    assert!(harness.store.documents_for("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_failed_completion_keeps_no_documents() {
    let harness = TestHarness::new();
    let store = FailingCompletionStore {
        inner: harness.store.clone(),
    };
    let service = RecognitionService::start(harness.page_recognizer(), Arc::new(store));

    let task_id = service
        .submit("alice", submission(vec![page(vec![stroke(2)], false, false)]), false)
        .await
        .unwrap()
        .task_id();
    service.shutdown().await;

    assert_eq!(harness.ink.recognize_calls().len(), 1);
    let task = harness.store.get(&task_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Failed);
    assert!(task.result.is_none());
    assert!(task.error.as_deref().unwrap().starts_with("StoreError"));
    assert!(harness.store.documents_for("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_classifier_failure_releases_engine_and_fails_task() {
    let harness = TestHarness::with_mocks(
        MockAnalyzerEngine::new(),
        MockRecognizer::new().failing_classify(503),
    );
    let log = harness.engine_log();
    let service = harness.service();

    let task_id = service
        .submit("alice", submission(vec![page(vec![stroke(2)], true, true)]), false)
        .await
        .unwrap()
        .task_id();
    service.shutdown().await;

    assert_eq!(log.finalize_count(true), 1);
    assert!(harness.ink.recognize_calls().is_empty());
    let task = harness.store.get(&task_id).await.unwrap().unwrap();
    assert_eq!(task.status, TaskStatus::Failed);
    assert!(
        task.error
            .as_deref()
            .unwrap()
            .starts_with("ClassifierUnavailableError")
    );
}

#[tokio::test(start_paused = true)]
async fn test_bounded_wait_times_out() {
    let mut harness = TestHarness::new();
    harness.settings.service.await_timeout_secs = 1;
    let service = harness.service_with(Arc::new(SlowRecognizer {
        delay: Duration::from_secs(600),
    }));

    let err = service
        .submit("alice", submission(vec![page(vec![stroke(2)], false, false)]), true)
        .await
        .unwrap_err();

    assert!(matches!(err, Error::Timeout { seconds: 1 }));
    assert_eq!(err.kind(), "TimeoutError");
    assert_eq!(harness.store.task_count().await, 1);
}

#[tokio::test]
async fn test_unsupported_mime_type_creates_no_task() {
    let harness = TestHarness::new();
    let service = harness.service();
    let mut rejected = submission(vec![page(vec![stroke(2)], false, false)]);
    rejected.mime_type = "text/plain".to_string();

    let err = service.submit("alice", rejected, true).await.unwrap_err();

    assert_eq!(err.kind(), "UnsupportedMimeTypeError");
    assert!(err.is_client_error());
    assert_eq!(harness.store.task_count().await, 0);
    assert!(harness.engine_log().calls().is_empty());
    service.shutdown().await;
}

#[tokio::test]
async fn test_task_visible_only_to_requester() {
    let harness = TestHarness::new();
    let service = harness.service();

    let task_id = service
        .submit("alice", submission(vec![page(vec![stroke(2)], false, false)]), true)
        .await
        .unwrap()
        .task_id();
    let id = task_id.to_string();

    let task = service.task_for(&id, "alice").await.unwrap();
    assert_eq!(task.id, task_id);

    let err = service.task_for(&id, "bob").await.unwrap_err();
    assert_eq!(err.kind(), "TaskNotFoundError");

    let err = service.task_for("not-a-task", "alice").await.unwrap_err();
    assert_eq!(err.kind(), "InvalidTaskIdError");

    service.shutdown().await;
}

#[tokio::test]
async fn test_documents_saved_per_user() {
    let harness = TestHarness::new();
    let service = harness.service();

    let mut korean = page(vec![stroke(2)], false, false);
    korean.recognition.language = Some("ko_KR".to_string());
    korean.page_number = 7;
    service
        .submit(
            "alice",
            submission(vec![page(vec![stroke(2)], false, false), korean]),
            true,
        )
        .await
        .unwrap();
    service
        .submit("bob", submission(vec![page(vec![stroke(4)], false, false)]), true)
        .await
        .unwrap();

    let documents = service.documents_for("alice").await.unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].language, "en_US");
    assert_eq!(documents[1].language, "ko_KR");
    assert_eq!(documents[1].page_number, 7);
    assert_eq!(documents[0].note_uuid.as_deref(), Some("note-1"));
    assert_eq!(documents[0].label.as_deref(), Some("hello"));
    let words = documents[0].words.as_ref().unwrap();
    let candidates = words[0].candidates.as_ref().unwrap();
    assert_eq!(candidates[1].rank, 1);
    assert_eq!(candidates[1].label, "hallo");

    assert_eq!(service.documents_for("bob").await.unwrap().len(), 1);
    service.shutdown().await;
}
