use thiserror::Error;

/// Failure of a single document fetch. Always terminal for that fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request to {location} failed: {source}")]
    Request {
        location: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("{location} answered with status {status}")]
    Status { location: String, status: u16 },
    #[error("failed to read {location}: {source}")]
    Io {
        location: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{location} is not a valid document: {source}")]
    Decode {
        location: String,
        #[source]
        source: serde_json::Error,
    },
    #[error("no document at {location}")]
    NotFound { location: String },
}

impl FetchError {
    pub fn location(&self) -> &str {
        match self {
            FetchError::Request { location, .. }
            | FetchError::Status { location, .. }
            | FetchError::Io { location, .. }
            | FetchError::Decode { location, .. }
            | FetchError::NotFound { location } => location,
        }
    }
}
