// Pipeline error taxonomy
use thiserror::Error;

/// Retrieval failed before any payload could be handed to a parser.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {uri} failed: {message}")]
    Request { uri: String, message: String },

    #[error("request to {uri} returned status {status}")]
    Status { uri: String, status: u16 },

    #[error("request to {uri} timed out")]
    Timeout { uri: String },

    #[error("failed to read response body from {uri}: {message}")]
    Body { uri: String, message: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// A whole payload was structurally invalid (JSON / GeoJSON only).
#[derive(Debug, Error)]
#[error("failed to parse {what}: {message}")]
pub struct ParseError {
    pub what: String,
    pub message: String,
}

impl ParseError {
    pub fn new(what: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            what: what.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
