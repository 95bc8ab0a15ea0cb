//! Flattening of square covariance/smearing matrices into index triples.
//!
//! Published matrices are row-oriented: each entry carries its (row, col)
//! pair so it can be re-associated with the `bin_i`/`bin_j` variables of the
//! companion table. The iteration order is column-outer/row-inner, so entry
//! `k` corresponds to `(row = k mod n, col = k div n)`; rows and columns both
//! follow the canonical 1D flat bin order of the projected binning.

use crate::error::{HdError, Result};
use crate::histogram::HistogramView;

/// One matrix element with its flat indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatrixEntry {
    /// Row index in `[0, n)`.
    pub row: usize,
    /// Column index in `[0, n)`.
    pub col: usize,
    /// Element value.
    pub value: f64,
}

/// Flatten an `n x n` matrix given as `rows[row][col]`.
pub fn flatten_matrix(rows: &[Vec<f64>], n: usize) -> Result<Vec<MatrixEntry>> {
    if rows.len() != n {
        return Err(HdError::DimensionMismatch(format!(
            "matrix has {} rows, projected binning has {n} bins",
            rows.len()
        )));
    }
    for (i, r) in rows.iter().enumerate() {
        if r.len() != n {
            return Err(HdError::DimensionMismatch(format!(
                "matrix row {i} has {} columns, expected {n}",
                r.len()
            )));
        }
    }
    let mut out = Vec::with_capacity(n * n);
    for col in 0..n {
        for row in 0..n {
            out.push(MatrixEntry { row, col, value: rows[row][col] });
        }
    }
    Ok(out)
}

/// Flatten a matrix stored as a 2D histogram view (axis 0 = row, axis 1 = col).
///
/// `n` is the flat bin count of the projected 1D binning the matrix is
/// aligned to; both axes must carry exactly `n` bins.
pub fn flatten_matrix_view(view: &dyn HistogramView, n: usize) -> Result<Vec<MatrixEntry>> {
    if view.dim() != 2 {
        return Err(HdError::DimensionMismatch(format!(
            "matrix source must be 2-dimensional, got {} axes",
            view.dim()
        )));
    }
    for ax in 0..2 {
        let bins = view.axis(ax)?.bin_count();
        if bins != n {
            return Err(HdError::DimensionMismatch(format!(
                "matrix axis {ax} has {bins} bins, projected binning has {n}"
            )));
        }
    }
    let mut out = Vec::with_capacity(n * n);
    for col in 0..n {
        for row in 0..n {
            out.push(MatrixEntry { row, col, value: view.content(&[row, col])? });
        }
    }
    Ok(out)
}
