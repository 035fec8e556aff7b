use thiserror::Error;

/// Errors raised while talking to the upload endpoint.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UploadError {
    /// Transport-level failure (connection refused, reset, TLS...)
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// The endpoint answered with a non-success status
    #[error("HTTP {status} for URL: {url}")]
    HttpStatus {
        /// Response status code
        status: u16,
        /// Endpoint that was called
        url: String,
        /// Response body, when one could be read
        body: Option<String>,
    },

    /// The response body was not `{ "urls": [...] }`
    #[error("Invalid upload response: {0}")]
    InvalidResponse(String),

    /// A payload could not be turned into a multipart part
    #[error("Invalid part '{name}': {message}")]
    InvalidPart {
        /// Filename of the offending payload
        name: String,
        /// Why the part was rejected
        message: String,
    },
}

impl UploadError {
    /// Creates an HTTP status error
    pub fn http_status(status: u16, url: impl Into<String>, body: Option<String>) -> Self {
        Self::HttpStatus {
            status,
            url: url.into(),
            body,
        }
    }

    /// Creates an HTTP error from a generic string
    pub fn http<S: Into<String>>(msg: S) -> Self {
        Self::Http(msg.into())
    }

    /// Gets the HTTP status code if this is an HTTP status error
    pub fn status_code(&self) -> Option<u16> {
        match self {
            UploadError::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(error: reqwest::Error) -> Self {
        Self::Http(error.to_string())
    }
}

pub type UploadResult<T> = Result<T, UploadError>;
