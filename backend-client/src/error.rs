use thiserror::Error;

/// Errors from transport-client operations.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The request exceeded the fixed per-request deadline.
    #[error("request timed out")]
    Timeout,

    /// Transport-level failure (connection refused, DNS, TLS, ...).
    #[error("network error: {0}")]
    Network(reqwest::Error),

    /// The server answered with a non-success status. `detail` carries the
    /// server-provided message when the body had one, else a generic phrase.
    #[error("server error ({status}): {detail}")]
    Api { status: u16, detail: String },

    /// The response body did not match the expected shape.
    #[error("invalid response: {0}")]
    Decode(String),

    /// The configured backend address could not be parsed.
    #[error("invalid backend address: {0}")]
    BaseUrl(String),
}

impl ClientError {
    /// Server-provided detail message, if this error carries one.
    pub fn server_detail(&self) -> Option<&str> {
        match self {
            ClientError::Api { detail, .. } => Some(detail),
            _ => None,
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ClientError::Timeout
        } else if err.is_decode() {
            ClientError::Decode(err.to_string())
        } else {
            ClientError::Network(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
