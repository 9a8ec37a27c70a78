#![doc = include_str!("../README.md")]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Penflow Core Library
//!
//! Dot codec, stroke model and task types shared by every Penflow crate.

pub mod codec;
pub mod error;
pub mod types;

// Re-exports for convenience
pub use codec::{DotRecord, FORCE_SCALE, RECORD_LEN, decode, decode_base64, encode};
pub use error::{Error, Result};
pub use types::{
    Dot, DotType, RecognitionStroke, RecognitionTask, Stroke, StrokeIdentity, TaskId, TaskStatus,
};
