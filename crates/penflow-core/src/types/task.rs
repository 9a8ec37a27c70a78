//! Recognition task lifecycle types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::TaskId;

/// The current state of a recognition task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Task accepted, pipeline not finished.
    Pending,

    /// Pipeline finished and results were persisted.
    Done,

    /// Pipeline raised an error.
    Failed,
}

impl TaskStatus {
    /// Returns `true` if the task is in a terminal state (Done or Failed).
    pub fn is_terminal(&self) -> bool {
        matches!(self, TaskStatus::Done | TaskStatus::Failed)
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Pending => write!(f, "PENDING"),
            TaskStatus::Done => write!(f, "DONE"),
            TaskStatus::Failed => write!(f, "FAILED"),
        }
    }
}

/// One asynchronous unit of recognition work covering a batch of pages.
///
/// `result` is present if and only if the status is `Done`; a task leaves
/// `Pending` exactly once.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecognitionTask {
    /// Task id.
    pub id: TaskId,

    /// Lifecycle status.
    pub status: TaskStatus,

    /// Serialized page batch.
    pub request: String,

    /// Serialized page responses, only when `Done`.
    pub result: Option<String>,

    /// Error message, only when `Failed`.
    pub error: Option<String>,

    /// User that submitted the batch.
    pub requested_by: String,

    /// Submission time.
    pub requested_at: DateTime<Utc>,

    /// Time the task left `Pending`.
    pub processed_at: Option<DateTime<Utc>>,
}

impl RecognitionTask {
    /// Creates a pending task.
    pub fn new(requested_by: impl Into<String>, request: impl Into<String>) -> Self {
        Self {
            id: TaskId::new(),
            status: TaskStatus::Pending,
            request: request.into(),
            result: None,
            error: None,
            requested_by: requested_by.into(),
            requested_at: Utc::now(),
            processed_at: None,
        }
    }

    /// Moves the task to `Done` with its serialized result.
    pub fn mark_done(&mut self, result: impl Into<String>) -> Result<()> {
        self.leave_pending(TaskStatus::Done)?;
        self.result = Some(result.into());
        Ok(())
    }

    /// Moves the task to `Failed`, recording why.
    pub fn mark_failed(&mut self, error: impl Into<String>) -> Result<()> {
        self.leave_pending(TaskStatus::Failed)?;
        self.error = Some(error.into());
        Ok(())
    }

    fn leave_pending(&mut self, to: TaskStatus) -> Result<()> {
        if self.status != TaskStatus::Pending {
            return Err(Error::InvalidTransition {
                from: self.status.to_string(),
                to: to.to_string(),
            });
        }
        self.status = to;
        self.processed_at = Some(Utc::now());
        Ok(())
    }
}
