//! Recording test double for the ink service.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;

use crate::classification::RawContentClassification;
use crate::error::{Error, Result};
use crate::request::RecognitionRequest;
use crate::result::{RecognitionResult, RecognizedWord};
use crate::{Recognizer, ShapeClassifier};

/// Which role a recorded call was made through.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallKind {
    /// [`Recognizer::recognize`]
    Recognize,
    /// [`ShapeClassifier::classify`]
    Classify,
}

/// A request received by [`MockRecognizer`].
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Role the call was made through.
    pub kind: CallKind,
    /// The request as received.
    pub request: RecognitionRequest,
}

/// Scripted [`Recognizer`] and [`ShapeClassifier`] that records every request.
///
/// Clones share the same record, so a clone handed to a pipeline can be
/// inspected through the original.
#[derive(Debug, Clone)]
pub struct MockRecognizer {
    result: RecognitionResult,
    classification: RawContentClassification,
    fail_recognize: Option<u16>,
    fail_classify: Option<u16>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl Default for MockRecognizer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockRecognizer {
    /// Creates a mock that recognizes `hello` and labels every stroke text.
    pub fn new() -> Self {
        Self {
            result: RecognitionResult {
                label: Some("hello".to_string()),
                words: Some(vec![RecognizedWord {
                    label: "hello".to_string(),
                    candidates: Some(vec!["hello".to_string(), "hallo".to_string()]),
                    ..RecognizedWord::default()
                }]),
                ..RecognitionResult::default()
            },
            classification: RawContentClassification::default(),
            fail_recognize: None,
            fail_classify: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Answers recognition calls with `result`.
    pub fn with_result(mut self, result: RecognitionResult) -> Self {
        self.result = result;
        self
    }

    /// Answers classification calls with `classification`.
    pub fn with_classification(mut self, classification: RawContentClassification) -> Self {
        self.classification = classification;
        self
    }

    /// Answers classification calls by labeling the given strokes.
    pub fn with_labels(self, text_ids: &[i32], non_text_ids: &[i32]) -> Self {
        self.with_classification(labels(text_ids, non_text_ids))
    }

    /// Fails recognition calls with the given HTTP status.
    pub fn failing_recognize(mut self, status: u16) -> Self {
        self.fail_recognize = Some(status);
        self
    }

    /// Fails classification calls with the given HTTP status.
    pub fn failing_classify(mut self, status: u16) -> Self {
        self.fail_classify = Some(status);
        self
    }

    /// Every call received so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Requests received through [`Recognizer::recognize`].
    pub fn recognize_calls(&self) -> Vec<RecognitionRequest> {
        self.requests(CallKind::Recognize)
    }

    /// Requests received through [`ShapeClassifier::classify`].
    pub fn classify_calls(&self) -> Vec<RecognitionRequest> {
        self.requests(CallKind::Classify)
    }

    fn requests(&self, kind: CallKind) -> Vec<RecognitionRequest> {
        self.calls()
            .into_iter()
            .filter(|c| c.kind == kind)
            .map(|c| c.request)
            .collect()
    }

    fn record(&self, kind: CallKind, request: RecognitionRequest) {
        self.calls
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(RecordedCall { kind, request });
    }
}

#[async_trait]
impl Recognizer for MockRecognizer {
    async fn recognize(&self, request: RecognitionRequest) -> Result<RecognitionResult> {
        self.record(CallKind::Recognize, request);
        match self.fail_recognize {
            Some(status) => Err(Error::recognizer("scripted recognizer failure", Some(status))),
            None => Ok(self.result.clone()),
        }
    }
}

#[async_trait]
impl ShapeClassifier for MockRecognizer {
    async fn classify(&self, request: RecognitionRequest) -> Result<RawContentClassification> {
        self.record(CallKind::Classify, request);
        match self.fail_classify {
            Some(status) => Err(Error::classifier("scripted classifier failure", Some(status))),
            None => Ok(self.classification.clone()),
        }
    }
}

/// Builds a classification that puts `text_ids` in one text element and
/// each of `non_text_ids` in its own node element.
pub fn labels(text_ids: &[i32], non_text_ids: &[i32]) -> RawContentClassification {
    let text_items: Vec<_> = text_ids.iter().map(|id| json!({ "F": [f64::from(*id)] })).collect();
    let mut elements = vec![json!({
        "type": "Text",
        "words": [{ "label": "text", "items": text_items }]
    })];
    elements.extend(
        non_text_ids
            .iter()
            .map(|id| json!({ "type": "Node", "items": [{ "F": [f64::from(*id)] }] })),
    );

    serde_json::from_value(json!({ "type": "Raw Content", "elements": elements }))
        .unwrap_or_default()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::request::Dimensions;
    use serde_json::Map;

    fn request() -> RecognitionRequest {
        RecognitionRequest::new(vec![], "Text", Dimensions::default(), Map::new())
    }

    #[tokio::test]
    async fn test_records_calls_across_clones() {
        let mock = MockRecognizer::new();
        let shared = mock.clone();

        shared.recognize(request()).await.unwrap();
        shared.classify(request().into_raw_content()).await.unwrap();

        assert_eq!(mock.recognize_calls().len(), 1);
        assert_eq!(mock.classify_calls().len(), 1);
        assert!(mock.classify_calls()[0].is_raw_content());
    }

    #[tokio::test]
    async fn test_labels_helper() {
        let mock = MockRecognizer::new().with_labels(&[0, 1], &[5]);
        let classification = mock.classify(request()).await.unwrap();
        assert_eq!(classification.text_stroke_ids(), vec![0, 1]);
        assert_eq!(classification.non_text_stroke_ids(), vec![5]);
    }

    #[tokio::test]
    async fn test_scripted_failures() {
        let mock = MockRecognizer::new().failing_recognize(503).failing_classify(502);
        let err = mock.recognize(request()).await.unwrap_err();
        assert_eq!(err.status(), Some(503));
        let err = mock.classify(request()).await.unwrap_err();
        assert_eq!(err.kind(), "ClassifierUnavailableError");
    }
}
