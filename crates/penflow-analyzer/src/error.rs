//! Error types for the analyzer contract.

/// Errors raised by the stroke analyzer engine.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The engine refused to initialize for a page.
    #[error("Engine initialization error: {message}")]
    EngineInitialization {
        /// What the engine reported
        message: String,
    },

    /// A call on an initialized engine failed.
    #[error("Engine error: {message}")]
    Engine {
        /// What the engine reported
        message: String,
    },

    /// Error from penflow-core
    #[error("Core error: {0}")]
    Core(#[from] penflow_core::Error),
}

/// Result type alias for analyzer operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Creates an initialization error.
    pub fn initialization<S: Into<String>>(message: S) -> Self {
        Error::EngineInitialization {
            message: message.into(),
        }
    }

    /// Creates an engine call error.
    pub fn engine<S: Into<String>>(message: S) -> Self {
        Error::Engine {
            message: message.into(),
        }
    }

    /// Name of this error in the pipeline's error taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::EngineInitialization { .. } => "EngineInitializationError",
            Error::Engine { .. } => "EngineError",
            Error::Core(err) => err.kind(),
        }
    }
}
