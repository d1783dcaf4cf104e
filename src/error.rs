//! Error types for broadsheet.
//!
//! This module defines the error types returned by the extraction pipeline.

/// Error type for extraction operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Raw HTML could not be parsed into any document tree.
    #[error("HTML parsing failed: {0}")]
    Parse(String),

    /// The document exceeded the configured candidate limit during scoring.
    #[error("document too large: more than {0} scoring candidates")]
    DocumentTooLarge(usize),

    /// A parsed-only accessor was called before `parse()` completed.
    #[error("article has not been parsed yet - call parse() first")]
    NotParsed,

    /// Configuration validation failed at construction time.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Result type alias for extraction operations.
pub type Result<T> = std::result::Result<T, Error>;
