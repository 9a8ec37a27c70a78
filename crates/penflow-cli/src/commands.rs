//! `decode` and `dry-run` commands.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use penflow_analyzer::StrokeAnalyzer;
use penflow_analyzer::mock::MockAnalyzerEngine;
use penflow_pipeline::{
    InMemoryTaskStore, PageRecognizer, PenflowConfig, RecognitionService, Submission, Submitted,
};
use penflow_recognizer::mock::MockRecognizer;
use penflow_recognizer::{IinkClient, Recognizer, ShapeClassifier};

/// Decodes a base64 dot payload and renders the dots as pretty JSON.
pub fn decode(payload: &str, start_time: i64, stroke_id: i32) -> Result<String> {
    let dots = penflow_core::decode_base64(payload, start_time, stroke_id)?;
    tracing::debug!(dots = dots.len(), "Payload decoded");
    Ok(serde_json::to_string_pretty(&dots)?)
}

/// Runs the submission in `file` through a local recognition service and
/// renders the page responses as pretty JSON.
///
/// Block analysis always uses the scripted engine, which keeps every stroke
/// in one block. With `live` the classification and recognition calls go
/// to the configured ink service; otherwise a canned recognizer answers.
pub async fn dry_run(settings: PenflowConfig, file: &Path, user: &str, live: bool) -> Result<String> {
    let body = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read submission {}", file.display()))?;
    let submission = Submission::from_json(&body)
        .with_context(|| format!("Failed to parse submission {}", file.display()))?;
    tracing::info!(
        pages = submission.pages.len(),
        mime_type = %submission.mime_type,
        live,
        "Dry run"
    );

    let (classifier, recognizer) = ink_service(&settings, live)?;
    let pages = PageRecognizer::new(
        StrokeAnalyzer::new(MockAnalyzerEngine::new()),
        classifier,
        recognizer,
        Arc::new(settings),
    );
    let service = RecognitionService::start(pages, Arc::new(InMemoryTaskStore::new()));
    let outcome = service.submit(user, submission, true).await;
    service.shutdown().await;

    let Submitted::Completed { task_id, pages } = outcome? else {
        bail!("Task was queued without completing");
    };
    tracing::info!(task_id = %task_id, pages = pages.len(), "Dry run complete");
    Ok(serde_json::to_string_pretty(&pages)?)
}

fn ink_service(
    settings: &PenflowConfig,
    live: bool,
) -> Result<(Arc<dyn ShapeClassifier>, Arc<dyn Recognizer>)> {
    if live {
        let client = Arc::new(IinkClient::new(settings.recognizer.to_iink_config())?);
        let classifier: Arc<dyn ShapeClassifier> = client.clone();
        let recognizer: Arc<dyn Recognizer> = client;
        Ok((classifier, recognizer))
    } else {
        let mock = Arc::new(MockRecognizer::new());
        let classifier: Arc<dyn ShapeClassifier> = mock.clone();
        let recognizer: Arc<dyn Recognizer> = mock;
        Ok((classifier, recognizer))
    }
}
