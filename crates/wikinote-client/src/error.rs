use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("Invalid API URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Failed to {operation}: {source}")]
    Transport {
        operation: &'static str,
        source: reqwest::Error,
    },

    #[error("Failed to {operation}: HTTP {status}")]
    Status {
        operation: &'static str,
        status: StatusCode,
    },

    /// The backend refused the request and said why.
    #[error("Failed to {operation}: {message}")]
    Rejected {
        operation: &'static str,
        status: StatusCode,
        message: String,
    },

    #[error("Failed to {operation}: invalid response body: {source}")]
    Decode {
        operation: &'static str,
        source: serde_json::Error,
    },
}

impl ClientError {
    /// HTTP status of the failed response, if the backend answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } | Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
