//! Error types for rs-anchorlink.
//!
//! Only configuration and input-shape problems are errors. A paragraph with
//! no usable anchor, or an anchor that cannot be placed, is reported through
//! `Option`/`InjectionResult` instead.

/// Error type for linking operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Engine or pipeline configuration is inconsistent (e.g. min words > max words).
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// The base URL used to build link targets could not be parsed.
    #[error("Invalid base URL: {0}")]
    InvalidBaseUrl(String),

    /// A page record did not contain any recognized title or slug field.
    #[error("Unrecognized page schema: {0}")]
    UnrecognizedSchema(String),

    /// JSON input could not be parsed.
    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading input or writing output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for linking operations.
pub type Result<T> = std::result::Result<T, Error>;
