//! Page response assembly.

use penflow_analyzer::{AnalyzerResult, BlockSummary};
use penflow_recognizer::{RawContentClassification, RecognitionResult};
use serde::{Deserialize, Serialize};

use crate::page_config::RecognitionConfig;

/// Analyzer part of a page response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerSection {
    /// Blocks from the block analysis pass with their stroke ids.
    pub analyzer_blocks: Vec<BlockSummary>,
    /// Text stroke ids, when shapes and text are separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_text: Option<Vec<i32>>,
    /// Shape stroke ids, when shapes and text are separated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub processed_shape: Option<Vec<i32>>,
}

/// Result of recognizing one page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageResponse {
    /// Analyzer output, absent when hidden.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<AnalyzerSection>,
    /// Recognition result.
    pub iink: RecognitionResult,
}

impl PageResponse {
    /// Assembles the response from the stage outputs.
    ///
    /// Stroke id lists are attached only when a classification ran and the
    /// page asked for shapes and text to be separated.
    pub fn assemble(
        analysis: Option<&AnalyzerResult>,
        classification: Option<&RawContentClassification>,
        recognition: RecognitionResult,
        config: &RecognitionConfig,
    ) -> Self {
        if config.analyzer.hide {
            return Self {
                analyzer: None,
                iink: recognition,
            };
        }

        let mut section = AnalyzerSection {
            analyzer_blocks: analysis
                .map(AnalyzerResult::blocks_with_stroke_ids)
                .unwrap_or_default(),
            ..AnalyzerSection::default()
        };
        if let Some(classification) = classification
            && config.analyzer.separate_shapes_and_text
        {
            section.processed_text = Some(classification.text_stroke_ids());
            section.processed_shape = Some(classification.non_text_stroke_ids());
        }

        Self {
            analyzer: Some(section),
            iink: recognition,
        }
    }
}
