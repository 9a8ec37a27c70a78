//! Page recognition orchestration.
//!
//! One page runs through decode, angle elimination, optional shape
//! classification and removal, block analysis, recognition and response
//! assembly. The engine session covers the analyzer passes and the
//! classification call between them; it is closed on every path out of
//! that stretch before recognition starts.

use std::sync::Arc;

use penflow_analyzer::{AnalyzerResult, AnalyzerSession, StrokeAnalyzer};
use penflow_core::Stroke;
use penflow_recognizer::{RawContentClassification, RecognitionResult, Recognizer, ShapeClassifier};

use crate::error::Result;
use crate::page_config::RecognitionConfig;
use crate::response::PageResponse;
use crate::settings::PenflowConfig;
use crate::submission::PageSubmission;

/// Outputs of the analyzer stretch of a page.
struct Analysis {
    result: Option<AnalyzerResult>,
    classification: Option<RawContentClassification>,
}

/// Runs pages through the analyzer, classifier and recognizer.
#[derive(Clone)]
pub struct PageRecognizer {
    analyzer: StrokeAnalyzer,
    classifier: Arc<dyn ShapeClassifier>,
    recognizer: Arc<dyn Recognizer>,
    settings: Arc<PenflowConfig>,
}

impl PageRecognizer {
    /// Creates a page recognizer from its collaborators.
    pub fn new(
        analyzer: StrokeAnalyzer,
        classifier: Arc<dyn ShapeClassifier>,
        recognizer: Arc<dyn Recognizer>,
        settings: Arc<PenflowConfig>,
    ) -> Self {
        Self {
            analyzer,
            classifier,
            recognizer,
            settings,
        }
    }

    /// Service settings in use.
    pub fn settings(&self) -> &PenflowConfig {
        &self.settings
    }

    /// Recognizes every page in order, stopping at the first failure.
    pub async fn recognize_pages(&self, pages: &[PageSubmission]) -> Result<Vec<PageResponse>> {
        let mut responses = Vec::with_capacity(pages.len());
        for (index, page) in pages.iter().enumerate() {
            tracing::info!(page = index, "Page begin");
            responses.push(self.recognize_page(page).await?);
            tracing::info!(page = index, "Page done");
        }
        Ok(responses)
    }

    /// Recognizes one page.
    ///
    /// Dot payloads are decoded before the engine is touched, so a malformed
    /// page never reaches the analyzer or the ink service.
    pub async fn recognize_page(&self, page: &PageSubmission) -> Result<PageResponse> {
        let config = RecognitionConfig::resolve(&page.recognition, &self.settings);
        let strokes = page.decode_strokes()?;
        tracing::debug!(
            strokes = strokes.len(),
            submitted = page.strokes.len(),
            "Strokes decoded"
        );

        if strokes.is_empty() {
            tracing::info!("Page has no live strokes, skipping analysis");
            return Ok(PageResponse::assemble(
                None,
                None,
                RecognitionResult::empty(),
                &config,
            ));
        }

        let mut session = self.analyzer.open(config.analyzer.engine).await?;
        let outcome = self.analyze(&mut session, page, &config, strokes).await;
        session.close();
        let analysis = outcome?;

        let payload = analysis
            .result
            .as_ref()
            .map(|r| r.to_recognition_strokes(config.scale))
            .unwrap_or_default();
        let recognition = if payload.is_empty() {
            tracing::info!("No strokes left to recognize");
            RecognitionResult::empty()
        } else {
            let request = config.recognition_request(payload);
            let points = request.point_count();
            let result = self.recognizer.recognize(request).await?;
            tracing::info!(points, label = ?result.label, "Recognized");
            result
        };

        Ok(PageResponse::assemble(
            analysis.result.as_ref(),
            analysis.classification.as_ref(),
            recognition,
            &config,
        ))
    }

    async fn analyze(
        &self,
        session: &mut AnalyzerSession,
        page: &PageSubmission,
        config: &RecognitionConfig,
        strokes: Vec<Stroke>,
    ) -> Result<Analysis> {
        let Some(first) = session.angle_elimination(&strokes)? else {
            return Ok(Analysis {
                result: None,
                classification: None,
            });
        };
        let page_radian = first.page_radian().unwrap_or(0.0);
        let mut to_analyze = first.to_strokes(page.identity())?;
        let for_classification = first.to_recognition_strokes(config.scale);
        session.release_intermediate();
        tracing::info!(
            page_radian,
            blocks = first.blocks.len(),
            "Angle elimination done"
        );

        let classification = if config.needs_classification() {
            let request = config.classification_request(for_classification);
            let classification = self.classifier.classify(request).await?;
            if config.analyzer.remove_shape {
                let before = to_analyze.len();
                to_analyze = classification.retain_text(to_analyze, Stroke::id);
                tracing::info!(
                    removed = before - to_analyze.len(),
                    kept = to_analyze.len(),
                    "Shapes removed"
                );
            }
            Some(classification)
        } else {
            None
        };

        let result = session.analyze(&to_analyze, page_radian)?;
        tracing::info!(
            strokes = to_analyze.len(),
            blocks = result.as_ref().map_or(0, |r| r.blocks.len()),
            "Block analysis done"
        );

        Ok(Analysis {
            result,
            classification,
        })
    }
}

impl std::fmt::Debug for PageRecognizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRecognizer")
            .field("analyzer", &self.analyzer)
            .finish_non_exhaustive()
    }
}
