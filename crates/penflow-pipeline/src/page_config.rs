//! Per-page recognition configuration, resolved against service defaults.

use penflow_analyzer::EngineParams;
use penflow_core::RecognitionStroke;
use penflow_recognizer::{Dimensions, RecognitionRequest};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::settings::PenflowConfig;
use crate::submission::RecognitionOptions;

/// Configuration key the page language is copied into.
const LANG_KEY: &str = "lang";

/// Resolved analyzer options for one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerOptions {
    /// Drop non-text strokes before block analysis.
    pub remove_shape: bool,
    /// Report text and shape stroke ids.
    pub separate_shapes_and_text: bool,
    /// Leave the analyzer section out of the response.
    pub hide: bool,
    /// Engine initialization parameters.
    pub engine: EngineParams,
}

/// Resolved recognition configuration for one page.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionConfig {
    /// Canvas geometry.
    pub dimensions: Dimensions,
    /// Coordinate scale for remote payloads.
    pub scale: f32,
    /// Recognition language.
    pub language: String,
    /// Recognition content type.
    pub content_type: String,
    /// Service configuration, `lang` included.
    pub configuration: Map<String, Value>,
    /// Analyzer options.
    pub analyzer: AnalyzerOptions,
}

impl RecognitionConfig {
    /// Fills the page's options from `settings` where absent.
    ///
    /// The language is written into `configuration.lang`, replacing any
    /// value the page carried there.
    pub fn resolve(options: &RecognitionOptions, settings: &PenflowConfig) -> Self {
        let defaults = &settings.defaults;
        let engine_defaults = EngineParams::from(&settings.analyzer);
        let input = options.analyzer.clone().unwrap_or_default();

        let language = options
            .language
            .clone()
            .unwrap_or_else(|| defaults.language.clone());
        let mut configuration = options.configuration.clone().unwrap_or_default();
        configuration.insert(LANG_KEY.to_string(), Value::String(language.clone()));

        Self {
            dimensions: Dimensions {
                x_dpi: options.x_dpi.unwrap_or(defaults.x_dpi),
                y_dpi: options.y_dpi.unwrap_or(defaults.y_dpi),
                width: options.width.unwrap_or(defaults.width),
                height: options.height.unwrap_or(defaults.height),
            },
            scale: options.scale.unwrap_or(defaults.scale),
            language,
            content_type: options
                .content_type
                .clone()
                .unwrap_or_else(|| defaults.content_type.clone()),
            configuration,
            analyzer: AnalyzerOptions {
                remove_shape: input.remove_shape.unwrap_or(true),
                separate_shapes_and_text: input.separate_shapes_and_text.unwrap_or(true),
                hide: input.hide.unwrap_or(false),
                engine: EngineParams {
                    paper_width: input.paper_width.unwrap_or(engine_defaults.paper_width),
                    paper_height: input.paper_height.unwrap_or(engine_defaults.paper_height),
                    block_size_sampling_steps: input
                        .block_size_sampling_steps
                        .unwrap_or(engine_defaults.block_size_sampling_steps),
                    kind_of_engine: input
                        .kind_of_engine
                        .unwrap_or(engine_defaults.kind_of_engine),
                },
            },
        }
    }

    /// Returns `true` if the page needs a classification call.
    pub fn needs_classification(&self) -> bool {
        self.analyzer.remove_shape || self.analyzer.separate_shapes_and_text
    }

    /// Recognition request for `strokes`.
    pub fn recognition_request(&self, strokes: Vec<RecognitionStroke>) -> RecognitionRequest {
        RecognitionRequest::new(
            strokes,
            self.content_type.clone(),
            self.dimensions,
            self.configuration.clone(),
        )
    }

    /// Raw-content classification request for `strokes`.
    pub fn classification_request(&self, strokes: Vec<RecognitionStroke>) -> RecognitionRequest {
        self.recognition_request(strokes).into_raw_content()
    }
}
