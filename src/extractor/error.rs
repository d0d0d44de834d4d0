//! Typed errors for the extraction pipeline.
//!
//! Only input, fetch, and model-transport problems surface as errors;
//! malformed model output is absorbed by the parser's fallback record.

use reqwest::StatusCode;
use thiserror::Error;

/// Errors that can abort an extraction call.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Blank or missing URL, rejected before any network activity
    #[error("a non-empty URL is required")]
    InvalidUrl,

    /// Could not build the shared HTTP client
    #[error("failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    /// Target page unreachable
    #[error("failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// Target page answered with a non-success status
    #[error("fetch of {url} returned HTTP {status}")]
    FetchStatus { url: String, status: StatusCode },

    /// Completion endpoint unreachable or its envelope undecodable
    #[error("model request failed: {0}")]
    ModelRequest(#[source] reqwest::Error),

    /// Completion endpoint answered with a non-success status
    #[error("model endpoint returned HTTP {status}: {body}")]
    ModelTransport { status: StatusCode, body: String },
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, ExtractError>;
