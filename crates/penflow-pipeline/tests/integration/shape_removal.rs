//! Integration tests for shape classification and removal.

use penflow_analyzer::mock::{EngineCall, MockAnalyzerEngine};
use penflow_recognizer::mock::{MockRecognizer, labels};

use crate::common::{TestHarness, page, stroke};

/// Stroke ids each analysis pass received, in pass order.
fn pass_ids(calls: Vec<EngineCall>) -> Vec<Vec<i32>> {
    calls
        .into_iter()
        .filter_map(|c| match c {
            EngineCall::Analyze { stroke_ids, .. } => Some(stroke_ids),
            _ => None,
        })
        .collect()
}

fn second_pass_ids(calls: Vec<EngineCall>) -> Vec<i32> {
    pass_ids(calls).pop().unwrap_or_default()
}

#[tokio::test]
async fn test_non_text_stroke_removed_everywhere() {
    let harness = TestHarness::with_mocks(
        MockAnalyzerEngine::new(),
        MockRecognizer::new().with_labels(&[0, 1, 2, 3, 4, 6], &[5]),
    );
    let log = harness.engine_log();
    let strokes = (0..7).map(|_| stroke(2)).collect();

    let response = harness
        .page_recognizer()
        .recognize_page(&page(strokes, true, true))
        .await
        .unwrap();

    let passes = pass_ids(log.analyze_calls());
    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0].len(), 7);
    assert!(!passes[1].contains(&5));
    assert_eq!(passes[1].len(), 6);

    let recognized: Vec<i32> = harness.ink.recognize_calls()[0]
        .strokes()
        .map(|s| s.id)
        .collect();
    assert!(!recognized.contains(&5));

    let section = response.analyzer.unwrap();
    assert_eq!(section.processed_shape, Some(vec![5]));
    assert_eq!(section.processed_text, Some(vec![0, 1, 2, 3, 4, 6]));
}

#[tokio::test]
async fn test_classification_request_is_raw_content() {
    let harness = TestHarness::new();

    harness
        .page_recognizer()
        .recognize_page(&page(vec![stroke(3), stroke(2)], true, false))
        .await
        .unwrap();

    let classify = harness.ink.classify_calls();
    assert_eq!(classify.len(), 1);
    assert!(classify[0].is_raw_content());
    assert_eq!(
        classify[0].configuration["raw-content"]["recognition"]["shape"],
        true
    );
    // The pressure channel carries the stroke id for the classifier to echo.
    let second = classify[0].strokes().nth(1).unwrap();
    assert!(second.p.iter().all(|p| *p == 1));
}

#[tokio::test]
async fn test_unmentioned_strokes_count_as_text() {
    let harness = TestHarness::with_mocks(
        MockAnalyzerEngine::new(),
        MockRecognizer::new().with_labels(&[0], &[2]),
    );
    let log = harness.engine_log();

    harness
        .page_recognizer()
        .recognize_page(&page(vec![stroke(2), stroke(2), stroke(2)], true, false))
        .await
        .unwrap();

    assert_eq!(second_pass_ids(log.analyze_calls()), vec![0, 1]);
}

#[tokio::test]
async fn test_separation_without_removal_keeps_shapes() {
    let harness = TestHarness::with_mocks(
        MockAnalyzerEngine::new(),
        MockRecognizer::new().with_labels(&[0], &[1]),
    );
    let log = harness.engine_log();

    let response = harness
        .page_recognizer()
        .recognize_page(&page(vec![stroke(2), stroke(2)], false, true))
        .await
        .unwrap();

    assert_eq!(second_pass_ids(log.analyze_calls()), vec![0, 1]);
    let section = response.analyzer.unwrap();
    assert_eq!(section.processed_shape, Some(vec![1]));
    assert_eq!(section.analyzer_blocks[0].stroke_ids, vec![0, 1]);
}

#[test]
fn test_removal_is_idempotent() {
    let classification = labels(&[0, 1, 3], &[2, 4]);
    let ids: Vec<i32> = (0..5).collect();

    let once = classification.retain_text(ids, |id| *id);
    let twice = classification.retain_text(once.clone(), |id| *id);

    assert_eq!(once, vec![0, 1, 3]);
    assert_eq!(once, twice);
}

#[tokio::test]
async fn test_text_only_page_unchanged_by_removal() {
    let harness = TestHarness::with_mocks(
        MockAnalyzerEngine::new(),
        MockRecognizer::new().with_labels(&[0, 1, 2], &[]),
    );
    let log = harness.engine_log();

    harness
        .page_recognizer()
        .recognize_page(&page(vec![stroke(2), stroke(3), stroke(4)], true, true))
        .await
        .unwrap();

    let passes = pass_ids(log.analyze_calls());
    assert_eq!(passes.len(), 2);
    assert_eq!(passes[0], passes[1]);
    assert_eq!(harness.ink.recognize_calls()[0].point_count(), 9);
}
