//! Core types for Penflow.

mod dot;
mod ids;
mod proptests;
mod stroke;
mod task;

pub use dot::{Dot, DotType};
pub(crate) use dot::finalize_dots;
pub use ids::TaskId;
pub use stroke::{RecognitionStroke, Stroke, StrokeIdentity, group_by_stroke};
pub use task::{RecognitionTask, TaskStatus};
