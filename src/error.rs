//! Error types for the simdex library.
//!
//! All fallible operations return [`Result`], whose error type is the
//! [`SimdexError`] enum. The variants follow the failure taxonomy of the
//! index contract: `NotFound` for unknown document names or ids,
//! `Configuration` for missing scorers or invalid options, and `Input` for
//! malformed document batches. Ambient variants cover I/O, storage, and
//! serialization failures.
//!
//! # Examples
//!
//! ```
//! use simdex::error::{Result, SimdexError};
//!
//! fn lookup(name: &str) -> Result<u64> {
//!     Err(SimdexError::not_found(format!("unknown document: {name}")))
//! }
//!
//! assert!(lookup("missing.txt").is_err());
//! ```

use std::io;

use thiserror::Error;

/// The main error type for simdex operations.
#[derive(Error, Debug)]
pub enum SimdexError {
    /// I/O errors (file operations, etc.)
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Unknown document name or document id.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Missing scorer, unknown scorer name, or invalid option.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Malformed caller input (bad document batch, bad df file line, etc.)
    #[error("Input error: {0}")]
    Input(String),

    /// Storage backend errors.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Snapshot encode/decode errors.
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// JSON serialization/deserialization errors.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Generic error for other cases.
    #[error("Error: {0}")]
    Other(String),

    /// Generic anyhow error.
    #[error("Anyhow error: {0}")]
    Anyhow(#[from] anyhow::Error),
}

/// Result type alias for operations that may fail with [`SimdexError`].
pub type Result<T> = std::result::Result<T, SimdexError>;

impl SimdexError {
    /// Create a new not found error.
    pub fn not_found<S: Into<String>>(msg: S) -> Self {
        SimdexError::NotFound(msg.into())
    }

    /// Create a new configuration error.
    pub fn configuration<S: Into<String>>(msg: S) -> Self {
        SimdexError::Configuration(msg.into())
    }

    /// Create a new input error.
    pub fn input<S: Into<String>>(msg: S) -> Self {
        SimdexError::Input(msg.into())
    }

    /// Create a new storage error.
    pub fn storage<S: Into<String>>(msg: S) -> Self {
        SimdexError::Storage(msg.into())
    }

    /// Create a new serialization error.
    pub fn serialization<S: Into<String>>(msg: S) -> Self {
        SimdexError::Serialization(msg.into())
    }

    /// Create a new internal error.
    pub fn internal<S: Into<String>>(msg: S) -> Self {
        SimdexError::Other(format!("Internal error: {}", msg.into()))
    }
}
