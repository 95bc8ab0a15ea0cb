//! Error types for histogram container reading.

use thiserror::Error;

/// Errors that can occur opening and reading histogram containers.
#[derive(Error, Debug)]
pub enum SourceError {
    /// I/O error reading the container file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Container parse error.
    #[error("container parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// Named histogram absent from the container.
    #[error("histogram not found: {0}")]
    NotFound(String),

    /// Histogram present but with the wrong dimensionality.
    #[error("histogram '{name}' has {actual} axes, requested {requested}")]
    WrongDimension {
        /// Requested histogram name.
        name: String,
        /// Dimensionality asked for.
        requested: usize,
        /// Dimensionality stored.
        actual: usize,
    },

    /// Stored arrays disagree with the declared binning.
    #[error("malformed histogram '{name}': {source}")]
    Malformed {
        /// Offending histogram name.
        name: String,
        /// Underlying shape error.
        source: hd_core::HdError,
    },
}

/// Result alias for source operations.
pub type Result<T> = std::result::Result<T, SourceError>;
