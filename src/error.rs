//! This module defines all error types used throughout the application.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the application
#[derive(Error, Debug)]
pub enum Error {
    /// IO errors (file not found, permission denied, etc.)
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Source tree discovery errors
    #[error("Discovery error: {0}")]
    Discovery(String),

    /// Include path that is not a dot-separated identifier chain
    #[error("Invalid include path {path:?} for entity {entity}: {reason}")]
    InvalidPath {
        entity: String,
        path: String,
        reason: String,
    },

    /// Two distinct include paths derived the same state name
    #[error("State name {name} is derived from both {first:?} and {second:?}")]
    StateNameCollision {
        name: String,
        first: String,
        second: String,
    },

    /// Malformed transition data while compiling the state machine
    #[error("State machine error: {0}")]
    StateMachine(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Configuration file that failed to parse
    #[error("Config parsing error in {file:?}: {message}")]
    ConfigParse { file: PathBuf, message: String },

    /// Interactive prompt failures
    #[error("Prompt error: {0}")]
    Prompt(String),

    /// Generic error with custom message
    #[error("{0}")]
    Custom(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a custom error with a message
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }

    /// Create a discovery error
    pub fn discovery(msg: impl Into<String>) -> Self {
        Self::Discovery(msg.into())
    }

    /// Create a state machine error
    pub fn state_machine(msg: impl Into<String>) -> Self {
        Self::StateMachine(msg.into())
    }

    /// Create an invalid path error
    pub fn invalid_path(
        entity: impl Into<String>,
        path: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidPath {
            entity: entity.into(),
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Errors that only concern the entity being compiled; the run may go on
    /// with the next entity.
    pub fn is_entity_scoped(&self) -> bool {
        matches!(
            self,
            Error::InvalidPath { .. } | Error::StateNameCollision { .. } | Error::StateMachine(_)
        )
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Custom(format!("JSON error: {}", err))
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        Error::Prompt(err.to_string())
    }
}

// Helper macros for creating errors

/// Create a custom error with formatting
#[macro_export]
macro_rules! custom_error {
    ($($arg:tt)*) => {
        $crate::error::Error::Custom(format!($($arg)*))
    };
}

/// Bail with a custom error message
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::custom_error!($($arg)*))
    };
}

/// Ensure a condition is true or return error
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !($cond) {
            $crate::bail!($($arg)*);
        }
    };
}
