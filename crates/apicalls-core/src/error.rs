//! Error handling for the API call report pipeline.
//!
//! This module defines the main error type `Error` used throughout the library,
//! along with a convenient `Result` type alias. It uses `thiserror` for easy
//! error handling and implements conversions from common error types.
//!
//! # Examples
//!
//! ```
//! use apicalls_core::error::{Error, Result};
//!
//! fn might_fail(captured: bool) -> Result<()> {
//!     if !captured {
//!         return Err(Error::NoCatalog);
//!     }
//!     Ok(())
//! }
//!
//! assert!(might_fail(false).is_err());
//! ```

use thiserror::Error;

/// Result type for report pipeline operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for report pipeline operations
#[derive(Debug, Error)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML parsing error
    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// A scrubbing or matching pattern failed to compile
    #[error("Pattern error: {0}")]
    Regex(#[from] regex::Error),

    /// The input ended without a usable service catalog
    #[error("no catalog with endpoints found")]
    NoCatalog,

    /// A catalog-bearing response line carried an unusable payload
    #[error("Malformed catalog payload: {0}")]
    MalformedCatalog(String),

    /// A logged query object could not be rendered
    #[error("Malformed query: {0}")]
    MalformedQuery(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Self::Config(msg.into())
    }

    /// Create a new malformed query error
    pub fn malformed_query<S: Into<String>>(msg: S) -> Self {
        Self::MalformedQuery(msg.into())
    }

    /// Create a new malformed catalog error
    pub fn malformed_catalog<S: Into<String>>(msg: S) -> Self {
        Self::MalformedCatalog(msg.into())
    }
}
