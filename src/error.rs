//! Error types for qualibrate
//!
//! This module defines the error hierarchy for the whole crate.
//! All public APIs return `Result<T, Error>` where Error is defined here.

use thiserror::Error;

/// The main error type for qualibrate
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration / setup errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required field: {field}")]
    MissingField { field: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // API collaborator errors (by HTTP status class)
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Authentication failed (HTTP {status}): {body}")]
    Auth { status: u16, body: String },

    #[error("Not found (HTTP 404): {body}")]
    NotFound { body: String },

    #[error("Conflict (HTTP 409): {body}")]
    Conflict { body: String },

    #[error("Server error (HTTP {status}): {body}")]
    Server { status: u16, body: String },

    #[error("HTTP {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    // ============================================================================
    // Portable representation errors
    // ============================================================================
    #[error("Unresolved environment variable(s): {variables}. Set them in your environment before importing.")]
    UnresolvedVariables { variables: String },

    #[error("Referenced {kind} '{name}' not found")]
    ReferenceNotFound { kind: String, name: String },

    // ============================================================================
    // I/O errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // ============================================================================
    // Generic errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    /// Create a reference-not-found error
    pub fn reference_not_found(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self::ReferenceNotFound {
            kind: kind.into(),
            name: name.into(),
        }
    }

    /// Create an unresolved-variables error from a list of variable names
    pub fn unresolved_variables(variables: &[String]) -> Self {
        Self::UnresolvedVariables {
            variables: variables.join(", "),
        }
    }

    /// Create a generic error
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other(message.into())
    }

    /// Map an HTTP status code and response body to the typed error hierarchy
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::Auth { status, body },
            404 => Self::NotFound { body },
            409 => Self::Conflict { body },
            500..=599 => Self::Server { status, body },
            _ => Self::HttpStatus { status, body },
        }
    }

    /// Check if this error is retryable
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Http(e) => e.is_timeout() || e.is_connect(),
            Error::Server { .. } => true,
            Error::HttpStatus { status, .. } => *status == 429,
            _ => false,
        }
    }
}

/// Result type alias for qualibrate
pub type Result<T> = std::result::Result<T, Error>;

/// Extension trait for adding context to errors
pub trait ResultExt<T> {
    /// Add context to an error
    fn context(self, message: impl Into<String>) -> Result<T>;

    /// Add context with a closure (lazy evaluation)
    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T>;
}

impl<T, E: Into<Error>> ResultExt<T> for std::result::Result<T, E> {
    fn context(self, message: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", message.into(), inner))
        })
    }

    fn with_context<F: FnOnce() -> String>(self, f: F) -> Result<T> {
        self.map_err(|e| {
            let inner = e.into();
            Error::Other(format!("{}: {}", f(), inner))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("name");
        assert_eq!(err.to_string(), "Missing required field: name");

        let err = Error::reference_not_found("container", "orders");
        assert_eq!(err.to_string(), "Referenced container 'orders' not found");
    }

    #[test]
    fn test_from_status() {
        assert!(matches!(
            Error::from_status(401, String::new()),
            Error::Auth { status: 401, .. }
        ));
        assert!(matches!(
            Error::from_status(404, String::new()),
            Error::NotFound { .. }
        ));
        assert!(matches!(
            Error::from_status(409, String::new()),
            Error::Conflict { .. }
        ));
        assert!(matches!(
            Error::from_status(503, String::new()),
            Error::Server { status: 503, .. }
        ));
        assert!(matches!(
            Error::from_status(422, String::new()),
            Error::HttpStatus { status: 422, .. }
        ));
    }

    #[test]
    fn test_is_retryable() {
        assert!(Error::from_status(500, String::new()).is_retryable());
        assert!(Error::from_status(429, String::new()).is_retryable());
        assert!(!Error::from_status(400, String::new()).is_retryable());
        assert!(!Error::from_status(404, String::new()).is_retryable());
        assert!(!Error::config("test").is_retryable());
    }

    #[test]
    fn test_unresolved_variables_message() {
        let err = Error::unresolved_variables(&["DB_PASSWORD".to_string(), "DB_USER".to_string()]);
        let msg = err.to_string();
        assert!(msg.contains("Unresolved environment variable(s): DB_PASSWORD, DB_USER"));
    }

    #[test]
    fn test_result_context() {
        let result: Result<()> = Err(Error::config("inner"));
        let with_context = result.context("outer");
        assert!(with_context
            .unwrap_err()
            .to_string()
            .contains("outer: Configuration error: inner"));
    }
}
