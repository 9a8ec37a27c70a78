//! Inbound submission model.

use penflow_core::{Stroke, StrokeIdentity};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A batch of pages to recognize as one task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    /// Requested response format.
    pub mime_type: String,
    /// Pages, recognized in order.
    pub pages: Vec<PageSubmission>,
}

impl Submission {
    /// Parses a JSON submission body.
    pub fn from_json(body: &str) -> penflow_core::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }
}

/// One page of strokes with its recognition options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSubmission {
    /// Paper section code.
    pub section: i32,
    /// Paper owner code.
    pub owner: i32,
    /// Note code.
    pub book_code: i32,
    /// Page number.
    pub page_number: i32,
    /// Note this page belongs to, when known.
    #[serde(rename = "noteUUID", default, skip_serializing_if = "Option::is_none")]
    pub note_uuid: Option<String>,
    /// Per-page recognition options.
    #[serde(alias = "recognitionConfig", default)]
    pub recognition: RecognitionOptions,
    /// Strokes in drawing order, deleted ones included.
    #[serde(default)]
    pub strokes: Vec<StrokeSubmission>,
}

impl PageSubmission {
    /// Location identity shared by every stroke on the page.
    pub fn identity(&self) -> StrokeIdentity {
        StrokeIdentity::new(self.section, self.owner, self.book_code, self.page_number)
    }

    /// Decodes the page's live strokes.
    ///
    /// A stroke's id is its index in the submitted list; deleted strokes
    /// keep their slot but are skipped.
    pub fn decode_strokes(&self) -> penflow_core::Result<Vec<Stroke>> {
        let identity = self.identity();
        self.strokes
            .iter()
            .enumerate()
            .filter(|(_, s)| !s.is_deleted())
            .map(|(index, s)| {
                let id = index as i32;
                let stroke = Stroke::build_base64(id, identity, s.start_time, &s.dots)?;
                if let Some(expected) = s.dot_count
                    && expected != stroke.dot_count()
                {
                    tracing::warn!(
                        stroke_id = id,
                        expected,
                        decoded = stroke.dot_count(),
                        "Dot count does not match payload"
                    );
                }
                Ok(stroke)
            })
            .collect()
    }

    /// Number of strokes not marked deleted.
    pub fn live_stroke_count(&self) -> usize {
        self.strokes.iter().filter(|s| !s.is_deleted()).count()
    }
}

/// One stroke as submitted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeSubmission {
    /// Non-zero when the stroke was erased.
    #[serde(default)]
    pub delete_flag: i32,
    /// Base time the dot deltas accumulate on.
    pub start_time: i64,
    /// Declared number of dots.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dot_count: Option<usize>,
    /// Base64 packed dot records.
    pub dots: String,
}

impl StrokeSubmission {
    /// Returns `true` if the stroke was erased.
    pub fn is_deleted(&self) -> bool {
        self.delete_flag != 0
    }
}

/// Recognition options as they arrive on a page; absent values fall back
/// to configured defaults.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionOptions {
    /// Horizontal resolution.
    #[serde(rename = "xDPI", default, skip_serializing_if = "Option::is_none")]
    pub x_dpi: Option<u32>,
    /// Vertical resolution.
    #[serde(rename = "yDPI", default, skip_serializing_if = "Option::is_none")]
    pub y_dpi: Option<u32>,
    /// Canvas width.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Canvas height.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    /// Coordinate scale.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scale: Option<f32>,
    /// Recognition language.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Recognition content type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    /// Service configuration passed through to the ink service.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub configuration: Option<Map<String, Value>>,
    /// Analyzer options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analyzer: Option<AnalyzerOptionsInput>,
}

/// Analyzer options as they arrive on a page.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzerOptionsInput {
    /// Drop non-text strokes before block analysis.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remove_shape: Option<bool>,
    /// Report text and shape stroke ids.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub separate_shapes_and_text: Option<bool>,
    /// Leave the analyzer section out of the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hide: Option<bool>,
    /// Paper width in millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_width: Option<f32>,
    /// Paper height in millimetres.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paper_height: Option<f32>,
    /// Block sizing sampling steps.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_size_sampling_steps: Option<i32>,
    /// Engine variant.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind_of_engine: Option<i32>,
}
