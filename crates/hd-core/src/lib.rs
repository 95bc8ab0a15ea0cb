//! # hd-core
//!
//! Binned-data extraction and flattening engine for HepData submissions.
//!
//! Converts N-dimensional (1D/2D/3D) histogram-like structures into flat,
//! volume-normalized bin sequences with aligned uncertainty series and
//! covariance/smearing matrix triples, and assembles them into an immutable
//! tabular submission graph ready for export.
//!
//! Reading histogram containers from disk and writing the archival package
//! are handled by the companion `hd-source` and `hd-export` crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod flatten;
pub mod histogram;
pub mod matrix;
pub mod submission;
pub mod table;
pub mod variable;

pub use error::{HdError, Result};
pub use flatten::{flatten_bins, normalize_by_volume, normalize_series_by_volume, FlatBin};
pub use histogram::{Axis, DenseHistogram, HistogramView};
pub use matrix::{flatten_matrix, flatten_matrix_view, MatrixEntry};
pub use submission::{Link, Resource, Submission, SubmissionAssembler};
pub use table::{build_matrix_table, build_measurement_table, ColumnSpec, Table, TableConfig};
pub use variable::{
    assemble_uncertainties, ErrorValue, UncertaintySeries, Variable, VariableValues,
};
