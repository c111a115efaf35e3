//! Provider error types.

use std::fmt;

/// Errors from an external provider call.
#[derive(Debug)]
pub enum ProviderError {
    /// HTTP request failed (network error, timeout, etc.)
    Http(reqwest::Error),

    /// Response body could not be parsed or converted
    Json {
        message: String,
        body: Option<String>,
    },

    /// Provider returned an error status code
    Api { status: u16, message: String },

    /// The requested resource does not exist
    NotFound,

    /// Rate limited by the provider
    RateLimited,

    /// Invalid API key or unauthorized
    Unauthorized,

    /// The call did not complete in time
    Timeout,

    /// Mock data could not be loaded or is inconsistent
    MockData(String),
}

impl ProviderError {
    /// Returns true if retrying the same call later could succeed.
    pub fn is_transient(&self) -> bool {
        match self {
            ProviderError::Http(_) | ProviderError::RateLimited | ProviderError::Timeout => true,
            ProviderError::Api { status, .. } => *status >= 500,
            _ => false,
        }
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Http(e) => write!(f, "HTTP error: {e}"),
            ProviderError::Json { message, body } => {
                write!(f, "JSON parse error: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
            ProviderError::Api { status, message } => {
                write!(f, "API error {status}: {message}")
            }
            ProviderError::NotFound => write!(f, "not found"),
            ProviderError::RateLimited => write!(f, "rate limited by provider"),
            ProviderError::Unauthorized => write!(f, "unauthorized (invalid API key)"),
            ProviderError::Timeout => write!(f, "provider call timed out"),
            ProviderError::MockData(msg) => write!(f, "mock data error: {msg}"),
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Http(err)
        }
    }
}
