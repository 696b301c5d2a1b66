//! Transit provider error types.

use std::fmt;

/// Errors from fetching routes or vehicle positions.
#[derive(Debug)]
pub enum ProviderError {
    /// The feed could not be reached or answered with a failure status.
    Unavailable {
        message: String,
        source: Option<reqwest::Error>,
    },

    /// The feed answered but the content could not be used.
    BadResponse {
        message: String,
        body: Option<String>,
    },
}

impl ProviderError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        ProviderError::Unavailable {
            message: message.into(),
            source: None,
        }
    }

    pub fn bad_response(message: impl Into<String>) -> Self {
        ProviderError::BadResponse {
            message: message.into(),
            body: None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, ProviderError::Unavailable { .. })
    }

    pub fn is_bad_response(&self) -> bool {
        matches!(self, ProviderError::BadResponse { .. })
    }
}

impl fmt::Display for ProviderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderError::Unavailable { message, source } => {
                write!(f, "transit feed unavailable: {message}")?;
                if let Some(source) = source {
                    write!(f, " ({source})")?;
                }
                Ok(())
            }
            ProviderError::BadResponse { message, body } => {
                write!(f, "bad transit feed response: {message}")?;
                if let Some(body) = body {
                    write!(f, " (body: {body})")?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ProviderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProviderError::Unavailable {
                source: Some(e), ..
            } => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            return ProviderError::BadResponse {
                message: err.to_string(),
                body: None,
            };
        }
        ProviderError::Unavailable {
            message: "request failed".to_string(),
            source: Some(err),
        }
    }
}
