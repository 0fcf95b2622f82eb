//! Error types for postmedia-dl
//!
//! Every failure is scoped to a single post: the batch orchestrator converts
//! per-post errors into report entries and never aborts the run because of one.

use std::path::PathBuf;
use thiserror::Error;
use url::Url;

/// Result type alias for postmedia-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for postmedia-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration error with context about which setting is invalid
    #[error("configuration error: {message}")]
    Config {
        /// Human-readable error message describing the configuration issue
        message: String,
        /// The configuration key that caused the error (e.g., "fetch.retry_limit")
        key: Option<String>,
    },

    /// Rendering collaborator error (navigation or script evaluation)
    #[error("render error: {0}")]
    Render(#[from] RenderError),

    /// The post's content container never appeared within the retry budget
    #[error("content container not found in {url} after {attempts} attempts")]
    RenderTimeout {
        /// The post URL whose page never yielded a content container
        url: Url,
        /// Number of query attempts consumed before giving up
        attempts: u32,
    },

    /// Network error during an image byte transfer
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A target file already exists and the collision policy forbids replacing it
    #[error("file collision at {path}: {reason}")]
    FileCollision {
        /// The path where the collision occurred
        path: PathBuf,
        /// The reason for the collision (e.g., "file already exists")
        reason: String,
    },

    /// Input file with post links does not exist or is not a regular file
    #[error("input file not found: {0}")]
    InputFileNotFound(PathBuf),

    /// The output path exists but is not a directory
    #[error("output path is not a directory: {0}")]
    OutputNotDirectory(PathBuf),

    /// A supplied string could not be parsed as a post link
    #[error("not a valid post link: {0}")]
    InvalidPostUrl(String),

    /// The batch was cancelled before this post was processed
    #[error("batch cancelled before post was processed")]
    Cancelled,
}

/// Errors from the rendering collaborator
///
/// Kept separate from [`Error`] so renderer implementations can be written
/// against a narrow error surface.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Transport-level failure talking to the rendering service
    #[error("network error: {0}")]
    Network(String),

    /// The rendering service rejected the request
    #[error("render service error (status {status}): {message}")]
    Api {
        /// HTTP status code returned by the service
        status: u16,
        /// Response body or status text
        message: String,
    },

    /// Page navigation failed
    #[error("failed to load page: {0}")]
    Navigation(String),

    /// Script evaluation failed or returned an unusable value
    #[error("script evaluation failed: {0}")]
    Evaluation(String),

    /// `evaluate` was called before a page was loaded into the session
    #[error("no page loaded in this session")]
    NoPageLoaded,
}

impl From<reqwest::Error> for RenderError {
    fn from(err: reqwest::Error) -> Self {
        RenderError::Network(err.to_string())
    }
}
