//! Error types for llmcost
//!
//! This module defines the error types used throughout the llmcost crates.
//! All errors are derived from `thiserror` for convenient error handling
//! and automatic `From` implementations.
//!
//! Fetch failures get their own [`FetchError`] type because the pricing
//! gateway remembers the outcome of an in-flight load and hands clones of it
//! to every caller that was waiting on that load.
//!
//! # Example
//!
//! ```
//! use llmcost_core::error::{LlmCostError, Result};
//!
//! fn example_function() -> Result<()> {
//!     // This will automatically convert io::Error to LlmCostError
//!     let _file = std::fs::read_to_string("nonexistent.txt")?;
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// Failure to obtain the remote pricing catalog or a currency rate
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure reaching the remote source
    #[error("Network error: {0}")]
    Network(String),

    /// A response arrived but its shape is not what we expect
    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            FetchError::MalformedResponse(err.to_string())
        } else {
            FetchError::Network(err.to_string())
        }
    }
}

/// Main error type for llmcost operations
#[derive(Error, Debug)]
pub enum LlmCostError {
    /// IO error occurred
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    /// Pricing data could not be fetched and no cached copy exists
    #[error("Failed to fetch pricing: {0}")]
    Fetch(#[from] FetchError),

    /// Locally stored cache could not be parsed
    #[error("Cache corruption: {0}")]
    CacheCorruption(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid argument
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

/// Convenience type alias for Results in llmcost
///
/// # Example
///
/// ```
/// use llmcost_core::Result;
///
/// fn process_data() -> Result<String> {
///     Ok("Processed successfully".to_string())
/// }
/// ```
pub type Result<T> = std::result::Result<T, LlmCostError>;
