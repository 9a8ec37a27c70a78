#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Penflow Recognizer Library

pub mod classification;
pub mod client;
pub mod error;
pub mod mock;
pub mod request;
pub mod result;

use async_trait::async_trait;

pub use classification::{ClassifiedItem, ElementKind, RawContentClassification, RawContentElement};
pub use client::{IinkClient, IinkConfig};
pub use error::{Error, Result};
pub use request::{Dimensions, RAW_CONTENT, RecognitionRequest, StrokeGroup};
pub use result::{RecognitionResult, RecognizedWord};

/// Turns strokes into recognized text.
#[async_trait]
pub trait Recognizer: Send + Sync {
    /// Recognizes every stroke group in `request`.
    async fn recognize(&self, request: RecognitionRequest) -> Result<RecognitionResult>;
}

/// Labels strokes as text or shape.
#[async_trait]
pub trait ShapeClassifier: Send + Sync {
    /// Classifies the strokes in `request`.
    ///
    /// The request should be a raw-content request, see
    /// [`RecognitionRequest::into_raw_content`].
    async fn classify(&self, request: RecognitionRequest) -> Result<RawContentClassification>;
}
