#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Penflow Analyzer Library

pub mod engine;
pub mod error;
pub mod mock;
pub mod result;
pub mod session;

pub use engine::{AnalyzerEngine, EngineParams};
pub use error::{Error, Result};
pub use result::{AnalyzerDot, AnalyzerResult, Block, BlockSummary, BoundingBox};
pub use session::{AnalyzerSession, StrokeAnalyzer};
