//! Error types for penflow-recognizer

use thiserror::Error;

/// Result type alias for penflow-recognizer operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur talking to the ink service
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The classification call failed or returned an error status.
    #[error("Classifier unavailable: {message}")]
    ClassifierUnavailable {
        /// Failure description
        message: String,
        /// HTTP status, if a response arrived
        status: Option<u16>,
    },

    /// The recognition call failed or returned an error status.
    #[error("Recognizer unavailable: {message}")]
    RecognizerUnavailable {
        /// Failure description
        message: String,
        /// HTTP status, if a response arrived
        status: Option<u16>,
    },

    /// The service answered with a body that could not be read.
    #[error("Invalid response: {message}")]
    InvalidResponse {
        /// What was wrong with the body
        message: String,
    },

    /// HTTP client error
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl Error {
    /// Creates a classifier error.
    pub fn classifier<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        Error::ClassifierUnavailable {
            message: message.into(),
            status,
        }
    }

    /// Creates a recognizer error.
    pub fn recognizer<S: Into<String>>(message: S, status: Option<u16>) -> Self {
        Error::RecognizerUnavailable {
            message: message.into(),
            status,
        }
    }

    /// Creates an invalid response error.
    pub fn invalid_response<S: Into<String>>(message: S) -> Self {
        Error::InvalidResponse {
            message: message.into(),
        }
    }

    /// HTTP status carried by the error, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            Error::ClassifierUnavailable { status, .. }
            | Error::RecognizerUnavailable { status, .. } => *status,
            Error::Http(err) => err.status().map(|s| s.as_u16()),
            Error::InvalidResponse { .. } => None,
        }
    }

    /// Name of this error in the pipeline's error taxonomy.
    pub fn kind(&self) -> &'static str {
        match self {
            Error::ClassifierUnavailable { .. } => "ClassifierUnavailableError",
            Error::RecognizerUnavailable { .. } | Error::Http(_) => "RecognizerUnavailableError",
            Error::InvalidResponse { .. } => "InvalidResponseError",
        }
    }
}
