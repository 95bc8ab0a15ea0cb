//! Error types for histogram flattening and submission assembly.

use thiserror::Error;

/// Errors raised while flattening binned data and assembling tables.
#[derive(Error, Debug)]
pub enum HdError {
    /// Bin index outside the valid range of an axis.
    #[error("bin index {index} out of range on axis {axis} ({bins} bins)")]
    OutOfRange {
        /// Axis the index was applied to.
        axis: usize,
        /// Offending index.
        index: usize,
        /// Number of bins on that axis.
        bins: usize,
    },

    /// A structure's dimensions disagree with the expected binning.
    #[error("dimension mismatch: {0}")]
    DimensionMismatch(String),

    /// A bin with zero or negative width cannot be volume-normalized.
    #[error("degenerate bin: flat bin {bin}, axis {axis} has width {width} (must be > 0)")]
    DegenerateBin {
        /// Position in the flat bin sequence.
        bin: usize,
        /// Axis with the bad width.
        axis: usize,
        /// The offending width.
        width: f64,
    },

    /// A value or error sequence does not match the owning row count.
    #[error("length mismatch in '{name}': expected {expected} entries, got {actual}")]
    LengthMismatch {
        /// Series or variable the bad sequence belongs to.
        name: String,
        /// Expected entry count.
        expected: usize,
        /// Actual entry count.
        actual: usize,
    },

    /// Axis edges are not strictly increasing or not contiguous.
    #[error("invalid axis binning: {0}")]
    InvalidAxis(String),

    /// Qualifier key not in the allowed set for this variable kind.
    #[error("unknown qualifier '{key}' on variable '{variable}'")]
    UnknownQualifier {
        /// The rejected key.
        key: String,
        /// Variable it was attached to.
        variable: String,
    },

    /// Submission finalized without an abstract.
    #[error("submission has no abstract text")]
    MissingAbstract,
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, HdError>;
