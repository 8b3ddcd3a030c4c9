//! Error types for the `WateringScale` engine
//!
//! The scale computation itself never fails: missing inputs degrade into
//! absent outputs. These errors only come from the edges of the crate
//! (configuration loading, request decoding, I/O in the CLI).

use thiserror::Error;

/// Main error type for the `WateringScale` crate
#[derive(Error, Debug)]
pub enum WateringError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Request decoding errors
    #[error("Parse error: {message}")]
    Parse { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl WateringError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new parse error
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            WateringError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            WateringError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            WateringError::Parse { message } => {
                format!("Could not read request: {message}")
            }
            WateringError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

impl From<serde_json::Error> for WateringError {
    fn from(err: serde_json::Error) -> Self {
        WateringError::parse(err.to_string())
    }
}
