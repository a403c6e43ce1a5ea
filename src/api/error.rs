use reqwest::StatusCode;
use thiserror::Error;

/// Failure of a single remote call.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response (refused, reset, timed out).
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The server answered with a non-success status.
    #[error("{url} returned {status}: {body}")]
    Status {
        url: String,
        status: StatusCode,
        body: String,
    },

    /// The body did not have the expected shape.
    #[error("unexpected response from {url}: {reason}")]
    Parse { url: String, reason: String },
}

/// Coarse classification used by callers that only care where things broke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Parse,
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport { .. } | ApiError::Status { .. } => ErrorKind::Transport,
            ApiError::Parse { .. } => ErrorKind::Parse,
        }
    }

    pub(crate) fn parse(url: &str, reason: impl Into<String>) -> Self {
        ApiError::Parse {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
