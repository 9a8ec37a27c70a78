//! Recognition response model.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One recognized word with its alternatives.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognizedWord {
    /// Best guess.
    #[serde(default)]
    pub label: String,
    /// Alternatives, best first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidates: Option<Vec<String>>,
    /// Fields the pipeline passes through untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Result of a recognition call.
///
/// Only `label` and `words` are interpreted; everything else the service
/// returns is kept in `extra` and echoed in the page response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecognitionResult {
    /// Full recognized text.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Word breakdown.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub words: Option<Vec<RecognizedWord>>,
    /// Remaining response fields.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RecognitionResult {
    /// Result for a page that had nothing to recognize.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns `true` if the service recognized nothing.
    pub fn is_empty(&self) -> bool {
        self.label.as_deref().is_none_or(str::is_empty)
            && self.words.as_ref().is_none_or(Vec::is_empty)
    }

    /// Words with a non-blank label.
    pub fn labeled_words(&self) -> impl Iterator<Item = &RecognizedWord> {
        self.words
            .iter()
            .flatten()
            .filter(|w| !w.label.trim().is_empty())
    }
}
