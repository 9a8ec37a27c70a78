#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Penflow Pipeline Library

pub mod document;
pub mod error;
pub mod orchestrator;
pub mod page_config;
pub mod response;
pub mod service;
pub mod settings;
pub mod store;
pub mod submission;

pub use document::{Candidate, DocumentWord, RecognizedDocument};
pub use error::{Error, Result};
pub use orchestrator::PageRecognizer;
pub use page_config::{AnalyzerOptions, RecognitionConfig};
pub use response::{AnalyzerSection, PageResponse};
pub use service::{RecognitionService, Submitted};
pub use settings::PenflowConfig;
pub use store::{InMemoryTaskStore, TaskStore};
pub use submission::{
    AnalyzerOptionsInput, PageSubmission, RecognitionOptions, StrokeSubmission, Submission,
};
