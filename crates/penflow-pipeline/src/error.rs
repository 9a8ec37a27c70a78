//! Error types for penflow-pipeline

use thiserror::Error;

/// Result type alias for pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while running recognition tasks
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Error from penflow-core
    #[error(transparent)]
    Core(#[from] penflow_core::Error),

    /// Error from the analyzer engine
    #[error(transparent)]
    Analyzer(#[from] penflow_analyzer::Error),

    /// Error from the ink service
    #[error(transparent)]
    Recognizer(#[from] penflow_recognizer::Error),

    /// A bounded wait on a task elapsed.
    #[error("Task did not complete within {seconds}s")]
    Timeout {
        /// Configured wait in seconds
        seconds: u64,
    },

    /// The worker pool is shut down.
    #[error("Task queue is closed")]
    QueueClosed,

    /// Submission mime type is not accepted.
    #[error("Unsupported mime type: {mime_type}")]
    UnsupportedMimeType {
        /// The rejected mime type
        mime_type: String,
    },

    /// Task store failure.
    #[error("Store error: {message}")]
    Store {
        /// What went wrong
        message: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

impl Error {
    /// Creates a store error.
    pub fn store<S: Into<String>>(message: S) -> Self {
        Error::Store {
            message: message.into(),
        }
    }

    /// Creates a configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Returns whether this error was caused by the caller's input.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Core(err) => err.is_client_error(),
            Error::UnsupportedMimeType { .. } => true,
            _ => false,
        }
    }

    /// Name of this error in the pipeline's error taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Core(err) => err.kind(),
            Error::Analyzer(err) => err.kind(),
            Error::Recognizer(err) => err.kind(),
            Error::Timeout { .. } => "TimeoutError",
            Error::QueueClosed => "QueueClosedError",
            Error::UnsupportedMimeType { .. } => "UnsupportedMimeTypeError",
            Error::Store { .. } => "StoreError",
            Error::Config { .. } => "ConfigError",
        }
    }
}
