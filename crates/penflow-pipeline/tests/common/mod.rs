//! Common test utilities and harness for penflow-pipeline integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use base64::Engine;
use penflow_analyzer::StrokeAnalyzer;
use penflow_analyzer::mock::{EngineCallLog, MockAnalyzerEngine};
use penflow_core::{DotRecord, RecognitionTask, TaskId, encode};
use penflow_pipeline::{
    AnalyzerOptionsInput, InMemoryTaskStore, PageRecognizer, PageSubmission, PenflowConfig,
    RecognitionOptions, RecognitionService, RecognizedDocument, StrokeSubmission, Submission,
    TaskStore,
};
use penflow_recognizer::mock::MockRecognizer;
use penflow_recognizer::{RecognitionRequest, RecognitionResult, Recognizer};

/// Mime type every harness submission uses.
pub const MIME_TYPE: &str = "application/vnd.myscript.jiix";

/// Test harness wiring a mock engine and a mock ink service into the
/// pipeline.
pub struct TestHarness {
    /// Mock analyzer engine, kept for its call log.
    pub engine: MockAnalyzerEngine,
    /// Mock classifier and recognizer.
    pub ink: MockRecognizer,
    /// Task store shared with the service.
    pub store: Arc<InMemoryTaskStore>,
    /// Service settings.
    pub settings: PenflowConfig,
}

impl TestHarness {
    /// Creates a harness with default mocks and settings.
    pub fn new() -> Self {
        Self::with_mocks(MockAnalyzerEngine::new(), MockRecognizer::new())
    }

    /// Creates a harness around the given mocks.
    pub fn with_mocks(engine: MockAnalyzerEngine, ink: MockRecognizer) -> Self {
        let mut settings = PenflowConfig::default();
        settings.service.workers = 2;
        Self {
            engine,
            ink,
            store: Arc::new(InMemoryTaskStore::new()),
            settings,
        }
    }

    /// Engine call log.
    pub fn engine_log(&self) -> EngineCallLog {
        self.engine.log()
    }

    /// Page recognizer backed by the mocks.
    pub fn page_recognizer(&self) -> PageRecognizer {
        self.page_recognizer_with(Arc::new(self.ink.clone()))
    }

    /// Page recognizer with a custom recognizer; classification stays mocked.
    pub fn page_recognizer_with(&self, recognizer: Arc<dyn Recognizer>) -> PageRecognizer {
        PageRecognizer::new(
            StrokeAnalyzer::new(self.engine.clone()),
            Arc::new(self.ink.clone()),
            recognizer,
            Arc::new(self.settings.clone()),
        )
    }

    /// Starts a service backed by the mocks.
    pub fn service(&self) -> RecognitionService {
        RecognitionService::start(self.page_recognizer(), self.store.clone())
    }

    /// Starts a service whose recognizer is `recognizer`.
    pub fn service_with(&self, recognizer: Arc<dyn Recognizer>) -> RecognitionService {
        RecognitionService::start(self.page_recognizer_with(recognizer), self.store.clone())
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}

/// Recognizer that answers only after `delay`.
#[derive(Debug, Clone)]
pub struct SlowRecognizer {
    /// Time to wait before answering.
    pub delay: Duration,
}

#[async_trait]
impl Recognizer for SlowRecognizer {
    async fn recognize(
        &self,
        _request: RecognitionRequest,
    ) -> penflow_recognizer::Result<RecognitionResult> {
        tokio::time::sleep(self.delay).await;
        Ok(RecognitionResult::empty())
    }
}

/// Task store whose completion step always fails; everything else goes to
/// the wrapped store.
#[derive(Debug, Clone)]
pub struct FailingCompletionStore {
    /// Store that receives every other call.
    pub inner: Arc<InMemoryTaskStore>,
}

#[async_trait]
impl TaskStore for FailingCompletionStore {
    async fn insert(&self, task: RecognitionTask) -> penflow_pipeline::Result<()> {
        self.inner.insert(task).await
    }

    async fn get(&self, id: &TaskId) -> penflow_pipeline::Result<Option<RecognitionTask>> {
        self.inner.get(id).await
    }

    async fn update(&self, task: RecognitionTask) -> penflow_pipeline::Result<()> {
        self.inner.update(task).await
    }

    async fn complete(
        &self,
        _task: RecognitionTask,
        _documents: Vec<RecognizedDocument>,
    ) -> penflow_pipeline::Result<()> {
        Err(penflow_pipeline::Error::store("document table unavailable"))
    }

    async fn documents_for(
        &self,
        user_id: &str,
    ) -> penflow_pipeline::Result<Vec<RecognizedDocument>> {
        self.inner.documents_for(user_id).await
    }
}

/// Base64 payload of `n` dots along a horizontal line.
pub fn dots(n: usize) -> String {
    let records: Vec<DotRecord> = (0..n)
        .map(|i| DotRecord {
            delta: 4,
            force: 0.5,
            x: 10.0 + i as f32,
            y: 20.0,
            tilt_x: 0,
            tilt_y: 0,
            rotation: 0,
        })
        .collect();
    base64::engine::general_purpose::STANDARD.encode(encode(&records))
}

/// A live stroke of `n` dots.
pub fn stroke(n: usize) -> StrokeSubmission {
    StrokeSubmission {
        delete_flag: 0,
        start_time: 1_700_000_000_000,
        dot_count: Some(n),
        dots: dots(n),
    }
}

/// A stroke whose payload is not a whole number of dot records.
pub fn malformed_stroke() -> StrokeSubmission {
    StrokeSubmission {
        delete_flag: 0,
        start_time: 0,
        dot_count: Some(1),
        dots: base64::engine::general_purpose::STANDARD.encode([0u8; 20]),
    }
}

/// A page holding `strokes` with the given shape handling.
pub fn page(strokes: Vec<StrokeSubmission>, remove_shape: bool, separate: bool) -> PageSubmission {
    PageSubmission {
        section: 3,
        owner: 27,
        book_code: 603,
        page_number: 1,
        note_uuid: Some("note-1".to_string()),
        recognition: RecognitionOptions {
            analyzer: Some(AnalyzerOptionsInput {
                remove_shape: Some(remove_shape),
                separate_shapes_and_text: Some(separate),
                ..AnalyzerOptionsInput::default()
            }),
            ..RecognitionOptions::default()
        },
        strokes,
    }
}

/// A submission of `pages`.
pub fn submission(pages: Vec<PageSubmission>) -> Submission {
    Submission {
        mime_type: MIME_TYPE.to_string(),
        pages,
    }
}
