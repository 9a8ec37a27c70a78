//! Recognition task service: submission, bounded worker pool, task queries.
//!
//! Every submission becomes one [`RecognitionTask`]. A fixed number of
//! workers pull tasks from a bounded queue and run each batch end to end on
//! a single worker, pages in order. The worker that owns a task is the only
//! writer of its record, and it moves the task out of `PENDING` exactly once:
//! to `DONE` together with its documents, or to `FAILED` on any error.

use std::sync::Arc;

use penflow_core::{RecognitionTask, TaskId};
use tokio::sync::{Mutex, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::document::RecognizedDocument;
use crate::error::{Error, Result};
use crate::orchestrator::PageRecognizer;
use crate::page_config::RecognitionConfig;
use crate::response::PageResponse;
use crate::settings::ServiceSettings;
use crate::store::TaskStore;
use crate::submission::{PageSubmission, Submission};

type Completion = oneshot::Sender<Result<Vec<PageResponse>>>;

/// Outcome of [`RecognitionService::submit`].
#[derive(Debug, Clone, PartialEq)]
pub enum Submitted {
    /// The task is queued; poll it by id.
    Accepted(TaskId),
    /// The task finished within the bounded wait.
    Completed {
        /// Id of the finished task.
        task_id: TaskId,
        /// One response per submitted page, in order.
        pages: Vec<PageResponse>,
    },
}

impl Submitted {
    /// Id of the submitted task.
    pub fn task_id(&self) -> TaskId {
        match self {
            Submitted::Accepted(id) => *id,
            Submitted::Completed { task_id, .. } => *task_id,
        }
    }
}

struct Job {
    task_id: TaskId,
    requested_by: String,
    pages: Vec<PageSubmission>,
    completion: Option<Completion>,
}

#[derive(Clone)]
struct Worker {
    pages: PageRecognizer,
    store: Arc<dyn TaskStore>,
}

impl Worker {
    async fn run(self, queue: Arc<Mutex<mpsc::Receiver<Job>>>) {
        tracing::debug!("Worker started");
        loop {
            let job = { queue.lock().await.recv().await };
            let Some(job) = job else {
                break;
            };
            let span = tracing::info_span!("task", task_id = %job.task_id);
            self.handle(job).instrument(span).await;
        }
        tracing::debug!("Worker stopped");
    }

    async fn handle(&self, job: Job) {
        tracing::info!(
            pages = job.pages.len(),
            requested_by = %job.requested_by,
            "Task fetched"
        );

        let outcome = match self.pages.recognize_pages(&job.pages).await {
            Ok(pages) => self.mark_done(&job, &pages).await.map(|()| pages),
            Err(err) => Err(err),
        };

        match &outcome {
            Ok(_) => tracing::info!(status = "DONE", "Task finalized"),
            Err(err) => {
                tracing::error!(kind = err.kind(), error = %err, "Task failed");
                if let Err(store_err) = self.mark_failed(&job.task_id, err).await {
                    tracing::error!(error = %store_err, "Could not record task failure");
                }
            }
        }

        if let Some(completion) = job.completion {
            // The caller may have stopped waiting.
            let _ = completion.send(outcome);
        }
    }

    fn documents(&self, job: &Job, responses: &[PageResponse]) -> Vec<RecognizedDocument> {
        job.pages
            .iter()
            .zip(responses)
            .map(|(page, response)| {
                let config = RecognitionConfig::resolve(&page.recognition, self.pages.settings());
                RecognizedDocument::build(&job.requested_by, page, config.language, &response.iink)
            })
            .collect()
    }

    async fn pending_task(&self, id: &TaskId) -> Result<RecognitionTask> {
        self.store
            .get(id)
            .await?
            .ok_or_else(|| penflow_core::Error::task_not_found(id.to_string()).into())
    }

    async fn mark_done(&self, job: &Job, pages: &[PageResponse]) -> Result<()> {
        let result = serde_json::to_string(pages).map_err(penflow_core::Error::from)?;
        let mut task = self.pending_task(&job.task_id).await?;
        task.mark_done(result)?;
        self.store.complete(task, self.documents(job, pages)).await
    }

    async fn mark_failed(&self, id: &TaskId, err: &Error) -> Result<()> {
        let mut task = self.pending_task(id).await?;
        task.mark_failed(format!("{}: {err}", err.kind()))?;
        self.store.update(task).await
    }
}

/// Accepts recognition tasks and runs them on a bounded worker pool.
pub struct RecognitionService {
    settings: ServiceSettings,
    store: Arc<dyn TaskStore>,
    queue: mpsc::Sender<Job>,
    workers: Vec<JoinHandle<()>>,
}

impl RecognitionService {
    /// Starts the worker pool. Must be called within a tokio runtime.
    pub fn start(pages: PageRecognizer, store: Arc<dyn TaskStore>) -> Self {
        let settings = pages.settings().service.clone();
        let (queue, receiver) = mpsc::channel(settings.queue_capacity.max(1));
        let receiver = Arc::new(Mutex::new(receiver));
        let worker = Worker {
            pages,
            store: Arc::clone(&store),
        };

        let count = settings.workers.max(1);
        let workers = (0..count)
            .map(|n| {
                let span = tracing::info_span!("worker", worker = n);
                tokio::spawn(worker.clone().run(Arc::clone(&receiver)).instrument(span))
            })
            .collect();
        tracing::info!(
            workers = count,
            queue_capacity = settings.queue_capacity,
            "Recognition service started"
        );

        Self {
            settings,
            store,
            queue,
            workers,
        }
    }

    /// Submits a batch of pages on behalf of `requested_by`.
    ///
    /// Without `wait` the task id comes back as soon as the task is queued.
    /// With `wait` the call blocks until the task finishes, for at most the
    /// configured await timeout; pipeline errors come back as-is, and an
    /// elapsed wait is [`Error::Timeout`] while the task keeps running.
    pub async fn submit(
        &self,
        requested_by: &str,
        submission: Submission,
        wait: bool,
    ) -> Result<Submitted> {
        if !self.settings.accepts(&submission.mime_type) {
            tracing::warn!(mime_type = %submission.mime_type, "Submission rejected");
            return Err(Error::UnsupportedMimeType {
                mime_type: submission.mime_type,
            });
        }

        let request = serde_json::to_string(&submission.pages).map_err(penflow_core::Error::from)?;
        let task = RecognitionTask::new(requested_by, request);
        let task_id = task.id;
        self.store.insert(task).await?;

        let (completion, done) = if wait {
            let (tx, rx) = oneshot::channel();
            (Some(tx), Some(rx))
        } else {
            (None, None)
        };
        let job = Job {
            task_id,
            requested_by: requested_by.to_string(),
            pages: submission.pages,
            completion,
        };
        if self.queue.send(job).await.is_err() {
            let mut task = self
                .store
                .get(&task_id)
                .await?
                .ok_or_else(|| penflow_core::Error::task_not_found(task_id.to_string()))?;
            task.mark_failed(Error::QueueClosed.to_string())?;
            self.store.update(task).await?;
            return Err(Error::QueueClosed);
        }
        tracing::info!(task_id = %task_id, requested_by, wait, "Task queued");

        let Some(done) = done else {
            return Ok(Submitted::Accepted(task_id));
        };
        match tokio::time::timeout(self.settings.await_timeout(), done).await {
            Ok(Ok(outcome)) => outcome.map(|pages| Submitted::Completed { task_id, pages }),
            Ok(Err(_)) => Err(Error::QueueClosed),
            Err(_) => {
                tracing::warn!(task_id = %task_id, "Bounded wait elapsed");
                Err(Error::Timeout {
                    seconds: self.settings.await_timeout_secs,
                })
            }
        }
    }

    /// Looks a task up by id.
    pub async fn task(&self, id: &TaskId) -> Result<Option<RecognitionTask>> {
        self.store.get(id).await
    }

    /// Looks a task up on behalf of `requester`.
    ///
    /// A task owned by someone else is reported as not found.
    pub async fn task_for(&self, id: &str, requester: &str) -> Result<RecognitionTask> {
        let task_id: TaskId = id.parse()?;
        match self.store.get(&task_id).await? {
            Some(task) if task.requested_by == requester => Ok(task),
            _ => Err(penflow_core::Error::task_not_found(id).into()),
        }
    }

    /// Recognized documents saved for `user_id`.
    pub async fn documents_for(&self, user_id: &str) -> Result<Vec<RecognizedDocument>> {
        self.store.documents_for(user_id).await
    }

    /// Stops accepting tasks, lets the workers drain the queue and waits for
    /// them to exit.
    pub async fn shutdown(self) {
        drop(self.queue);
        for worker in self.workers {
            if let Err(err) = worker.await {
                tracing::error!(error = %err, "Worker exited abnormally");
            }
        }
        tracing::info!("Recognition service stopped");
    }
}

impl std::fmt::Debug for RecognitionService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecognitionService")
            .field("settings", &self.settings)
            .field("workers", &self.workers.len())
            .finish_non_exhaustive()
    }
}
