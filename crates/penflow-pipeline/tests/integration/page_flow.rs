//! Integration tests for single-page recognition.

use penflow_analyzer::mock::{EngineCall, MockAnalyzerEngine};
use penflow_pipeline::StrokeSubmission;
use penflow_recognizer::mock::MockRecognizer;

use crate::common::{TestHarness, malformed_stroke, page, stroke};

fn recognized_ids(ink: &MockRecognizer) -> Vec<i32> {
    ink.recognize_calls()[0].strokes().map(|s| s.id).collect()
}

#[tokio::test]
async fn test_two_strokes_without_shape_handling() {
    let harness = TestHarness::new();
    let pages = harness.page_recognizer();

    let response = pages
        .recognize_page(&page(vec![stroke(3), stroke(5)], false, false))
        .await
        .expect("page should be recognized");

    assert!(harness.ink.classify_calls().is_empty(), "classifier must not run");
    let calls = harness.ink.recognize_calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].point_count(), 8);
    assert_eq!(recognized_ids(&harness.ink), vec![0, 1]);

    let section = response.analyzer.expect("analyzer section");
    assert!(section.processed_text.is_none());
    assert_eq!(section.analyzer_blocks.len(), 1);
    assert_eq!(response.iink.label.as_deref(), Some("hello"));
}

#[tokio::test]
async fn test_malformed_payload_never_reaches_collaborators() {
    let harness = TestHarness::new();
    let log = harness.engine_log();
    let pages = harness.page_recognizer();

    let err = pages
        .recognize_page(&page(vec![stroke(2), malformed_stroke()], true, true))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), "DecodeError");
    assert!(err.is_client_error());
    assert_eq!(log.initialize_count(), 0);
    assert!(log.analyze_calls().is_empty());
    assert!(harness.ink.calls().is_empty());
}

#[tokio::test]
async fn test_engine_bracketed_once_per_page() {
    let harness = TestHarness::new();
    let log = harness.engine_log();
    let pages = harness.page_recognizer();

    pages
        .recognize_pages(&[
            page(vec![stroke(2)], false, false),
            page(vec![stroke(4)], false, false),
        ])
        .await
        .unwrap();

    assert_eq!(log.initialize_count(), 2);
    assert_eq!(log.finalize_count(false), 2);
    assert_eq!(log.finalize_count(true), 2);
    // initialize, pass, partial release, pass, full release
    let calls = log.calls();
    assert!(matches!(calls[0], EngineCall::Initialize(_)));
    assert_eq!(calls[4], EngineCall::Finalize { release_all: true });
}

#[tokio::test]
async fn test_page_rotation_threaded_into_second_pass() {
    let harness = TestHarness::with_mocks(
        MockAnalyzerEngine::new().with_page_radian(0.25),
        MockRecognizer::new(),
    );
    let log = harness.engine_log();

    harness
        .page_recognizer()
        .recognize_page(&page(vec![stroke(2), stroke(2)], false, false))
        .await
        .unwrap();

    let passes: Vec<(f64, bool)> = log
        .analyze_calls()
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::Analyze {
                page_radian,
                angle_elimination,
                ..
            } => Some((page_radian, angle_elimination)),
            _ => None,
        })
        .collect();
    assert_eq!(passes, vec![(0.0, true), (0.25, false)]);
}

#[tokio::test]
async fn test_stroke_ids_partition_blocks() {
    let harness = TestHarness::with_mocks(
        MockAnalyzerEngine::new().with_strokes_per_block(2),
        MockRecognizer::new(),
    );
    let strokes: Vec<StrokeSubmission> = (1..=5).map(stroke).collect();

    let response = harness
        .page_recognizer()
        .recognize_page(&page(strokes, false, false))
        .await
        .unwrap();

    let blocks = response.analyzer.unwrap().analyzer_blocks;
    assert_eq!(blocks.len(), 3);
    let total: usize = blocks.iter().map(|b| b.stroke_ids.len()).sum();
    assert_eq!(total, 5);
    assert_eq!(blocks[2].stroke_ids, vec![4]);
}

#[tokio::test]
async fn test_deleted_strokes_keep_their_index() {
    let harness = TestHarness::new();
    let mut deleted = stroke(9);
    deleted.delete_flag = 1;

    harness
        .page_recognizer()
        .recognize_page(&page(vec![stroke(2), deleted, stroke(3)], false, false))
        .await
        .unwrap();

    assert_eq!(recognized_ids(&harness.ink), vec![0, 2]);
    assert_eq!(harness.ink.recognize_calls()[0].point_count(), 5);
}

#[tokio::test]
async fn test_hidden_analyzer_output() {
    let harness = TestHarness::new();
    let mut hidden = page(vec![stroke(2)], false, false);
    if let Some(analyzer) = hidden.recognition.analyzer.as_mut() {
        analyzer.hide = Some(true);
    }

    let response = harness.page_recognizer().recognize_page(&hidden).await.unwrap();

    assert!(response.analyzer.is_none());
    assert_eq!(harness.ink.recognize_calls().len(), 1);
    let json = serde_json::to_value(&response).unwrap();
    assert!(json.get("analyzer").is_none());
}

#[tokio::test]
async fn test_language_reaches_ink_service() {
    let harness = TestHarness::new();
    let mut korean = page(vec![stroke(2)], false, true);
    korean.recognition.language = Some("ko_KR".to_string());
    korean.recognition.scale = Some(2.0);

    harness.page_recognizer().recognize_page(&korean).await.unwrap();

    let classify = &harness.ink.classify_calls()[0];
    assert_eq!(classify.configuration["lang"], "ko_KR");
    let recognize = &harness.ink.recognize_calls()[0];
    assert_eq!(recognize.configuration["lang"], "ko_KR");
    let first = recognize.strokes().next().unwrap();
    assert_eq!(first.x[0], 20.0);
}
