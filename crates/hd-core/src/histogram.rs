//! Axis binning and read-only histogram views.

use serde::{Deserialize, Serialize};

use crate::error::{HdError, Result};

/// One binned axis: an ordered sequence of contiguous (lower, upper) bin edges.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Axis {
    edges: Vec<(f64, f64)>,
}

impl Axis {
    /// Build an axis from `n + 1` monotonic edge positions.
    pub fn from_edges(edges: &[f64]) -> Result<Self> {
        if edges.len() < 2 {
            return Err(HdError::InvalidAxis(format!(
                "need at least 2 edge positions, got {}",
                edges.len()
            )));
        }
        let pairs: Vec<(f64, f64)> = edges.windows(2).map(|w| (w[0], w[1])).collect();
        Self::from_pairs(pairs)
    }

    /// Build an axis from explicit (lower, upper) pairs.
    ///
    /// Pairs must be strictly increasing and contiguous: `upper[i] == lower[i+1]`.
    pub fn from_pairs(pairs: Vec<(f64, f64)>) -> Result<Self> {
        if pairs.is_empty() {
            return Err(HdError::InvalidAxis("axis has no bins".into()));
        }
        for (i, &(lo, hi)) in pairs.iter().enumerate() {
            if !(hi > lo) {
                return Err(HdError::InvalidAxis(format!(
                    "bin {i} edges ({lo}, {hi}) are not strictly increasing"
                )));
            }
            if i > 0 && pairs[i - 1].1 != lo {
                return Err(HdError::InvalidAxis(format!(
                    "bin {i} lower edge {lo} does not meet previous upper edge {}",
                    pairs[i - 1].1
                )));
            }
        }
        Ok(Self { edges: pairs })
    }

    /// Number of bins on this axis.
    pub fn bin_count(&self) -> usize {
        self.edges.len()
    }

    /// (lower, upper) edges of bin `i`.
    pub fn bin(&self, i: usize) -> Option<(f64, f64)> {
        self.edges.get(i).copied()
    }

    /// All (lower, upper) pairs in order.
    pub fn bins(&self) -> &[(f64, f64)] {
        &self.edges
    }
}

/// Read-only view over an N-dimensional (N ∈ 1..=3) binned structure.
///
/// Contents and errors are addressed by one bin index per axis. Implementors
/// hold externally supplied data; populating them is the source reader's job.
pub trait HistogramView {
    /// Number of axes (1–3).
    fn dim(&self) -> usize;

    /// Binning of axis `i`; fails with `DimensionMismatch` if `i >= dim()`.
    fn axis(&self, i: usize) -> Result<&Axis>;

    /// Bin content at the given per-axis indices.
    fn content(&self, idx: &[usize]) -> Result<f64>;

    /// Bin error at the given per-axis indices.
    fn error(&self, idx: &[usize]) -> Result<f64>;
}

/// Owned dense histogram: one axis per dimension plus content/error arrays.
///
/// Storage order matches the canonical flattening order: axis-0 index varies
/// fastest, the last axis slowest.
#[derive(Debug, Clone)]
pub struct DenseHistogram {
    axes: Vec<Axis>,
    contents: Vec<f64>,
    errors: Vec<f64>,
}

impl DenseHistogram {
    /// Build a dense histogram, validating dimensionality and array lengths.
    pub fn new(axes: Vec<Axis>, contents: Vec<f64>, errors: Vec<f64>) -> Result<Self> {
        if axes.is_empty() || axes.len() > 3 {
            return Err(HdError::DimensionMismatch(format!(
                "histogram must have 1-3 axes, got {}",
                axes.len()
            )));
        }
        let total: usize = axes.iter().map(Axis::bin_count).product();
        if contents.len() != total {
            return Err(HdError::LengthMismatch {
                name: "contents".into(),
                expected: total,
                actual: contents.len(),
            });
        }
        if errors.len() != total {
            return Err(HdError::LengthMismatch {
                name: "errors".into(),
                expected: total,
                actual: errors.len(),
            });
        }
        Ok(Self { axes, contents, errors })
    }

    /// Flat storage offset for a per-axis index tuple (axis 0 fastest).
    fn offset(&self, idx: &[usize]) -> Result<usize> {
        if idx.len() != self.axes.len() {
            return Err(HdError::DimensionMismatch(format!(
                "index tuple has {} entries for a {}-dimensional histogram",
                idx.len(),
                self.axes.len()
            )));
        }
        let mut flat = 0usize;
        let mut stride = 1usize;
        for (axis, (&i, ax)) in idx.iter().zip(&self.axes).enumerate() {
            if i >= ax.bin_count() {
                return Err(HdError::OutOfRange { axis, index: i, bins: ax.bin_count() });
            }
            flat += i * stride;
            stride *= ax.bin_count();
        }
        Ok(flat)
    }
}

impl HistogramView for DenseHistogram {
    fn dim(&self) -> usize {
        self.axes.len()
    }

    fn axis(&self, i: usize) -> Result<&Axis> {
        self.axes.get(i).ok_or_else(|| {
            HdError::DimensionMismatch(format!(
                "axis {i} requested from a {}-dimensional histogram",
                self.axes.len()
            ))
        })
    }

    fn content(&self, idx: &[usize]) -> Result<f64> {
        Ok(self.contents[self.offset(idx)?])
    }

    fn error(&self, idx: &[usize]) -> Result<f64> {
        Ok(self.errors[self.offset(idx)?])
    }
}
