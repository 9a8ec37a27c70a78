//! Request envelope sent to the ink service.

use penflow_core::RecognitionStroke;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Content type of a classification request.
pub const RAW_CONTENT: &str = "Raw Content";

/// Configuration key enabling shape and text labeling.
const RAW_CONTENT_KEY: &str = "raw-content";

/// Canvas size and resolution the strokes were captured at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Horizontal resolution.
    #[serde(rename = "xDPI")]
    pub x_dpi: u32,
    /// Vertical resolution.
    #[serde(rename = "yDPI")]
    pub y_dpi: u32,
    /// Canvas width.
    pub width: u32,
    /// Canvas height.
    pub height: u32,
}

impl Default for Dimensions {
    fn default() -> Self {
        Self {
            x_dpi: 96,
            y_dpi: 96,
            width: 2100,
            height: 2970,
        }
    }
}

/// A batch of strokes recognized together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrokeGroup {
    /// Strokes in the group.
    pub strokes: Vec<RecognitionStroke>,
}

/// Body of a recognition or classification call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionRequest {
    /// Canvas geometry.
    #[serde(flatten)]
    pub dimensions: Dimensions,
    /// Content type, e.g. `Text` or `Raw Content`.
    pub content_type: String,
    /// Service configuration object.
    pub configuration: Map<String, Value>,
    /// The strokes, always sent as a single group.
    pub stroke_groups: Vec<StrokeGroup>,
}

impl RecognitionRequest {
    /// Builds a request holding `strokes` as one group.
    pub fn new(
        strokes: Vec<RecognitionStroke>,
        content_type: impl Into<String>,
        dimensions: Dimensions,
        configuration: Map<String, Value>,
    ) -> Self {
        Self {
            dimensions,
            content_type: content_type.into(),
            configuration,
            stroke_groups: vec![StrokeGroup { strokes }],
        }
    }

    /// Turns the request into a raw-content classification request.
    ///
    /// Sets the content type and enables both shape and text labeling.
    /// Applying it twice has no further effect.
    pub fn into_raw_content(mut self) -> Self {
        self.content_type = RAW_CONTENT.to_string();
        self.configuration.insert(
            RAW_CONTENT_KEY.to_string(),
            json!({ "recognition": { "shape": true, "text": true } }),
        );
        self
    }

    /// Returns `true` for a classification request.
    pub fn is_raw_content(&self) -> bool {
        self.content_type == RAW_CONTENT
    }

    /// Iterates over every stroke in every group.
    pub fn strokes(&self) -> impl Iterator<Item = &RecognitionStroke> {
        self.stroke_groups.iter().flat_map(|g| g.strokes.iter())
    }

    /// Total number of points across all strokes.
    pub fn point_count(&self) -> usize {
        self.strokes().map(RecognitionStroke::len).sum()
    }
}
