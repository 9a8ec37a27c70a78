//! Task persistence.
//!
//! [`TaskStore`] is the contract the worker pool writes task state and
//! recognized documents through. [`InMemoryTaskStore`] backs tests and the
//! dry-run command.

use std::collections::HashMap;

use async_trait::async_trait;
use penflow_core::{RecognitionTask, TaskId};
use tokio::sync::RwLock;

use crate::document::RecognizedDocument;
use crate::error::{Error, Result};

/// Persistence for recognition tasks and their documents.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Stores a new task. Fails if the id is already taken.
    async fn insert(&self, task: RecognitionTask) -> Result<()>;

    /// Fetches a task by id.
    async fn get(&self, id: &TaskId) -> Result<Option<RecognitionTask>>;

    /// Replaces a stored task.
    async fn update(&self, task: RecognitionTask) -> Result<()>;

    /// Replaces a finished task and stores its documents in one step.
    ///
    /// Either both writes land or neither does.
    async fn complete(&self, task: RecognitionTask, documents: Vec<RecognizedDocument>)
    -> Result<()>;

    /// Documents submitted by `user_id`, oldest first.
    async fn documents_for(&self, user_id: &str) -> Result<Vec<RecognizedDocument>>;
}

/// [`TaskStore`] held in process memory.
#[derive(Debug, Default)]
pub struct InMemoryTaskStore {
    tasks: RwLock<HashMap<TaskId, RecognitionTask>>,
    documents: RwLock<Vec<RecognizedDocument>>,
}

impl InMemoryTaskStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored tasks.
    pub async fn task_count(&self) -> usize {
        self.tasks.read().await.len()
    }
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn insert(&self, task: RecognitionTask) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        if tasks.contains_key(&task.id) {
            return Err(Error::store(format!("task {} already exists", task.id)));
        }
        tasks.insert(task.id, task);
        Ok(())
    }

    async fn get(&self, id: &TaskId) -> Result<Option<RecognitionTask>> {
        Ok(self.tasks.read().await.get(id).cloned())
    }

    async fn update(&self, task: RecognitionTask) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        match tasks.get_mut(&task.id) {
            Some(slot) => {
                *slot = task;
                Ok(())
            }
            None => Err(penflow_core::Error::task_not_found(task.id.to_string()).into()),
        }
    }

    async fn complete(
        &self,
        task: RecognitionTask,
        documents: Vec<RecognizedDocument>,
    ) -> Result<()> {
        let mut tasks = self.tasks.write().await;
        let Some(slot) = tasks.get_mut(&task.id) else {
            return Err(penflow_core::Error::task_not_found(task.id.to_string()).into());
        };
        self.documents.write().await.extend(documents);
        *slot = task;
        Ok(())
    }

    async fn documents_for(&self, user_id: &str) -> Result<Vec<RecognizedDocument>> {
        Ok(self
            .documents
            .read()
            .await
            .iter()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect())
    }
}
