//! Error types
//!
//! Library-level errors. The binary wraps these in `anyhow` for setup
//! failures but inspects them directly when emitting the result document.

use thiserror::Error;

/// Module parameter validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamsError {
    /// A required parameter was not supplied
    #[error("missing required arguments: {0}")]
    Missing(&'static str),

    /// A required parameter was supplied but blank
    #[error("argument {0} must not be empty")]
    Empty(&'static str),

    /// A parameter was a list or object where a string is expected
    #[error("argument {name} is of type {found}; expected a string")]
    InvalidType { name: &'static str, found: &'static str },

    /// Unknown parameter keys
    #[error("Unsupported parameters for (apigw-resources) module: {0}")]
    Unsupported(String),

    /// The arguments document was not a JSON object
    #[error("module arguments must be a JSON object")]
    NotAnObject,
}

/// Error returned by a single API Gateway call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// The service answered with a modeled or unmodeled error
    #[error("{code}: {message}")]
    Service {
        code: String,
        message: String,
        status: Option<u16>,
    },

    /// The request never produced a service response (DNS, TLS, timeout, ...)
    #[error("transport error: {0}")]
    Transport(String),
}

impl ApiError {
    /// Build a service error with no HTTP status attached
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Service {
            code: code.into(),
            message: message.into(),
            status: None,
        }
    }

    /// Error code reported by the service, if any
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Service { code, .. } => Some(code),
            Self::Transport(_) => None,
        }
    }

    /// Human readable message
    pub fn message(&self) -> &str {
        match self {
            Self::Service { message, .. } => message,
            Self::Transport(message) => message,
        }
    }
}

/// Failure of a whole fetch invocation
#[derive(Debug, Error)]
pub enum FetchError {
    #[error(transparent)]
    InvalidParams(#[from] ParamsError),

    /// Retryable errors persisted through the whole retry budget
    #[error("gave up after {attempts} attempts: {source}")]
    Throttled {
        attempts: u32,
        #[source]
        source: ApiError,
    },

    /// A non-retryable API error
    #[error("Couldn't get resources: {0}")]
    Api(#[source] ApiError),
}

impl FetchError {
    /// The underlying API error, when the failure came from the service
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::InvalidParams(_) => None,
            Self::Throttled { source, .. } => Some(source),
            Self::Api(err) => Some(err),
        }
    }

    /// Whether the failure is a throttling-class exhaustion
    pub fn is_throttled(&self) -> bool {
        matches!(self, Self::Throttled { .. })
    }
}
