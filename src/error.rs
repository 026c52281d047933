//! Error types for the wordbook library.
//!
//! All fallible operations return [`Result`], whose error side is the
//! [`WordbookError`] enum. The variants follow the failure taxonomy of the
//! correction pipeline: transient service failures are retried and then
//! absorbed, configuration and backup failures abort a run.
//!
//! # Examples
//!
//! ```
//! use wordbook::error::{Result, WordbookError};
//!
//! fn example_operation() -> Result<()> {
//!     Err(WordbookError::configuration("missing API key"))
//! }
//!
//! match example_operation() {
//!     Ok(_) => println!("Success"),
//!     Err(e) => assert!(e.is_fatal()),
//! }
//! ```

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// The main error type for wordbook operations.
#[derive(Error, Debug)]
pub enum WordbookError {
    /// I/O errors (reading word lists, writing output files)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// HTTP client errors that were not classified by a backend
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Missing or rejected credentials, invalid endpoints, bad config values
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Timeouts, rate limits and 5xx responses from an external service
    #[error("Transient service error: {0}")]
    TransientService(String),

    /// A service answered with something we could not interpret
    #[error("Malformed response: {message}")]
    MalformedResponse { message: String, payload: String },

    /// Extraction or normalization produced no entries
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// The pre-mutation backup could not be written or verified
    #[error("Backup failed for {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Operation cancelled
    #[error("Operation cancelled: {0}")]
    OperationCancelled(String),

    /// Generic error for other cases
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with WordbookError.
pub type Result<T> = std::result::Result<T, WordbookError>;

impl WordbookError {
    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        WordbookError::Configuration(msg.into())
    }

    /// Create a new transient service error.
    pub fn transient<S: Into<String>>(msg: S) -> Self {
        WordbookError::TransientService(msg.into())
    }

    /// Create a new timeout error.
    pub fn timeout<S: Into<String>>(msg: S) -> Self {
        WordbookError::TransientService(format!("Timeout: {}", msg.into()))
    }

    /// Create a new malformed response error, keeping the raw payload for diagnosis.
    pub fn malformed<S: Into<String>, P: Into<String>>(msg: S, payload: P) -> Self {
        WordbookError::MalformedResponse {
            message: msg.into(),
            payload: payload.into(),
        }
    }

    /// Create a new empty input error.
    pub fn empty_input<S: Into<String>>(msg: S) -> Self {
        WordbookError::EmptyInput(msg.into())
    }

    /// Create a new backup error.
    pub fn backup<P: Into<PathBuf>>(path: P, source: io::Error) -> Self {
        WordbookError::Backup {
            path: path.into(),
            source,
        }
    }

    /// Create a new invalid argument error.
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        WordbookError::InvalidArgument(msg.into())
    }

    /// Create a new cancelled error.
    pub fn cancelled<S: Into<String>>(msg: S) -> Self {
        WordbookError::OperationCancelled(msg.into())
    }

    /// Create a new generic error.
    pub fn other<S: Into<String>>(msg: S) -> Self {
        WordbookError::Other(msg.into())
    }

    /// Whether the retry policy may try the failed call again.
    ///
    /// Malformed responses are retried like transient failures.
    pub fn is_transient(&self) -> bool {
        match self {
            WordbookError::TransientService(_) | WordbookError::MalformedResponse { .. } => true,
            WordbookError::Http(e) => {
                e.is_timeout()
                    || e.is_connect()
                    || e.is_request()
                    || e.is_decode()
                    || e.status().is_some_and(|s| s.is_server_error() || s.as_u16() == 429)
            }
            _ => false,
        }
    }

    /// Whether the error must abort a pipeline run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            WordbookError::Configuration(_)
                | WordbookError::Backup { .. }
                | WordbookError::EmptyInput(_)
                | WordbookError::Io(_)
        )
    }
}
