//! Error types for task extraction.

use std::fmt;

/// Universal error type for the extraction pipeline and the model clients feeding it.
///
/// Model client implementations map their native failures to the client-facing
/// variants (`Authentication` through `Other`). The pipeline itself only ever
/// raises `ModelCallFailed`, `NoModelSucceeded` and `Cancelled`; parsing and
/// cleaning anomalies are absorbed rather than reported.
#[derive(Debug)]
pub enum Error {
    /// API key missing, invalid, or lacking permission for the requested model.
    Authentication(String),

    /// Network connectivity issues, DNS failures, or dropped connections.
    /// These errors are typically transient and are retried by the gateway.
    Network(String),

    /// The provider rejected the request as malformed (HTTP 400), e.g. an
    /// unsupported parameter or a key in the wrong format.
    Configuration(String),

    /// The model provider rejected the request (unknown model, 5xx).
    Provider(String),

    /// The client-side request timeout elapsed before the model answered.
    Timeout(String),

    /// Provider rate limit exceeded.
    RateLimited { retry_after_seconds: u64 },

    /// The provider answered with a body that could not be decoded.
    Deserialization(String),

    /// Every attempt to call `model_id` for one chunk failed.
    /// Holds the last client error observed.
    ModelCallFailed {
        model_id: String,
        attempts: u32,
        last_error: Box<Error>,
    },

    /// No candidate model produced a single usable task draft.
    NoModelSucceeded {
        attempted: Vec<String>,
        last_error: Option<Box<Error>>,
    },

    /// The caller cancelled the extraction between two model calls.
    Cancelled,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Authentication(msg) => write!(f, "Authentication failed: {}", msg),
            Error::Network(msg) => write!(f, "Network error: {}", msg),
            Error::Configuration(msg) => write!(f, "Invalid configuration: {}", msg),
            Error::Provider(msg) => write!(f, "Provider error: {}", msg),
            Error::Timeout(msg) => write!(f, "Timeout: {}", msg),
            Error::RateLimited {
                retry_after_seconds,
            } => {
                write!(f, "Rate limited: retry after {}s", retry_after_seconds)
            }
            Error::Deserialization(msg) => write!(f, "Deserialization error: {}", msg),
            Error::ModelCallFailed {
                model_id,
                attempts,
                last_error,
            } => write!(
                f,
                "Model call to {} failed after {} attempt(s): {}",
                model_id, attempts, last_error
            ),
            Error::NoModelSucceeded {
                attempted,
                last_error,
            } => {
                write!(f, "No candidate model worked (tried: {})", attempted.join(", "))?;
                if let Some(err) = last_error {
                    write!(f, "; last error: {}", err)?;
                }
                Ok(())
            }
            Error::Cancelled => write!(f, "Extraction cancelled"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::ModelCallFailed { last_error, .. } => Some(last_error.as_ref()),
            Error::NoModelSucceeded {
                last_error: Some(err),
                ..
            } => Some(err.as_ref()),
            _ => None,
        }
    }
}
