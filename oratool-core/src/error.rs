//! Error types with credential sanitization.
//!
//! Errors raised while building tool invocations or resolving connections
//! never carry the password portion of a logon string. Native connection
//! diagnostics are passed through verbatim.

use thiserror::Error;

/// Main error type for oratool operations.
#[derive(Debug, Error)]
pub enum OratoolError {
    /// Invalid or contradictory configuration, detected before any native call
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The native connect primitive reported a failure
    #[error("Connection failed: {diagnostic}")]
    ConnectionFailed { diagnostic: String },

    /// Raw option text could not be interpreted as the declared type
    #[error(transparent)]
    Coercion(#[from] CoercionError),

    /// I/O operation failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    /// External tool exited unsuccessfully
    #[error("{program} exited with {}", exit_description(.code))]
    ProcessFailed { program: String, code: Option<i32> },

    /// Serialization or deserialization failed
    #[error("Serialization failed: {context}")]
    Serialization {
        context: String,
        #[source]
        source: serde_json::Error,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}"))
}

/// Convenience type alias for Results with `OratoolError`
pub type Result<T> = std::result::Result<T, OratoolError>;

/// Failure to interpret raw option text as the declared value type.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid value '{raw}' for option '{option}': expected {expected}")]
pub struct CoercionError {
    /// Option name as registered with the CLI
    pub option: String,
    /// Raw text supplied by the user
    pub raw: String,
    /// Human readable description of the expected type
    pub expected: &'static str,
}

impl OratoolError {
    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a connection failure carrying the native diagnostic text
    pub fn connection_failed(diagnostic: impl Into<String>) -> Self {
        Self::ConnectionFailed {
            diagnostic: diagnostic.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }
}
