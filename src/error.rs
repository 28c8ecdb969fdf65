//! # Registry Error Types
//!
//! Structured error handling for registry operations using thiserror
//! instead of `Box<dyn Error>` patterns.

use thiserror::Error;

/// Errors surfaced by registry operations and construction.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Registry key '{key}' is already registered")]
    AlreadyRegistered { key: String },

    #[error("Registry key '{key}' is not registered")]
    NotRegistered { key: String },

    #[error("Invalid registry key '{key}': {reason}")]
    InvalidKey { key: String, reason: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Parse error: {message}")]
    Parse { message: String },
}

impl RegistryError {
    /// Create an already-registered error for a key
    pub fn already_registered(key: impl Into<String>) -> Self {
        Self::AlreadyRegistered { key: key.into() }
    }

    /// Create a not-registered error for a key
    pub fn not_registered(key: impl Into<String>) -> Self {
        Self::NotRegistered { key: key.into() }
    }

    /// Create an invalid-key error
    pub fn invalid_key(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidKey {
            key: key.into(),
            reason: reason.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a parse error
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
        }
    }
}

/// Convenient result alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;
