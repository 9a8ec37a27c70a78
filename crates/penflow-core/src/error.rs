//! Error types for Penflow core library.

/// Errors raised while decoding pen data or manipulating task state.
///
/// All error variants are marked with `#[non_exhaustive]` to allow
/// adding new error types without breaking changes.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// Binary dot payload is not a whole number of records.
    #[error("Decode error: payload is {length} bytes, a dot record is 17 bytes")]
    Decode {
        /// Byte length of the rejected payload
        length: usize,
    },

    /// A decoded record carries an out-of-range field.
    #[error("Validation error: {message}")]
    Validation {
        /// Field that failed validation
        field: Option<String>,
        /// What went wrong
        message: String,
    },

    /// A stroke ended up with no dots.
    #[error("Stroke {stroke_id} has no valid dots")]
    EmptyStroke {
        /// Id of the empty stroke
        stroke_id: i32,
    },

    /// Dot payload was not valid base64.
    #[error("Base64 error: {0}")]
    Base64(#[from] base64::DecodeError),

    /// JSON serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Task id could not be parsed.
    #[error("Invalid task id: {id}")]
    InvalidTaskId {
        /// The rejected id
        id: String,
    },

    /// Task does not exist (or is not visible to the caller).
    #[error("Task not found: {id}")]
    TaskNotFound {
        /// Task id that was not found
        id: String,
    },

    /// Task state change that the lifecycle does not allow.
    #[error("Invalid task transition: {from} -> {to}")]
    InvalidTransition {
        /// Current status
        from: String,
        /// Requested status
        to: String,
    },

    /// Configuration error
    #[error("Configuration error: {message}")]
    Config {
        /// What configuration is problematic
        message: String,
    },
}

/// Convenience `Result` type alias for Penflow core operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns whether this error was caused by the caller's input.
    ///
    /// Client errors are never worth retrying: the same payload fails the
    /// same way every time.
    pub fn is_client_error(&self) -> bool {
        match self {
            Error::Decode { .. } => true,
            Error::Validation { .. } => true,
            Error::EmptyStroke { .. } => true,
            Error::Base64(_) => true,
            Error::InvalidTaskId { .. } => true,
            Error::TaskNotFound { .. } => true,
            Error::Serialization(_) => false,
            Error::InvalidTransition { .. } => false,
            Error::Config { .. } => false,
        }
    }

    /// Name of this error in the pipeline's error taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::Decode { .. } | Error::Base64(_) => "DecodeError",
            Error::Validation { .. } => "ValidationError",
            Error::EmptyStroke { .. } => "EmptyStrokeError",
            Error::InvalidTaskId { .. } => "InvalidTaskIdError",
            Error::TaskNotFound { .. } => "TaskNotFoundError",
            Error::Serialization(_) => "SerializationError",
            Error::InvalidTransition { .. } => "InvalidTransitionError",
            Error::Config { .. } => "ConfigError",
        }
    }

    /// Creates a new validation error.
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Error::Validation {
            field: None,
            message: message.into(),
        }
    }

    /// Creates a new validation error with a field name.
    pub fn validation_field<F, M>(field: F, message: M) -> Self
    where
        F: Into<String>,
        M: Into<String>,
    {
        Error::Validation {
            field: Some(field.into()),
            message: message.into(),
        }
    }

    /// Creates a new configuration error.
    pub fn config<S: Into<String>>(message: S) -> Self {
        Error::Config {
            message: message.into(),
        }
    }

    /// Creates a task-not-found error.
    pub fn task_not_found<S: Into<String>>(id: S) -> Self {
        Error::TaskNotFound { id: id.into() }
    }
}
