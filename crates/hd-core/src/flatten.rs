//! Flattening of N-dimensional histograms into ordered flat bin sequences,
//! and bin-volume normalization of contents and error series.
//!
//! The canonical order linearizes with the axis-0 index varying fastest and
//! the last axis slowest. Every downstream consumer (matrix flattening,
//! uncertainty alignment, table assembly) relies on positions in this order,
//! never on labels, so the order must not change.

use crate::error::{HdError, Result};
use crate::histogram::HistogramView;

/// One flattened bin: per-axis (lower, upper) edges plus content and error.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatBin {
    /// One (lower, upper) pair per axis, axis 0 first.
    pub edges: Vec<(f64, f64)>,
    /// Bin content (raw or volume-normalized, depending on pipeline stage).
    pub value: f64,
    /// Bin error, same normalization state as `value`.
    pub error: f64,
}

impl FlatBin {
    /// Hyper-volume: product of per-axis widths.
    ///
    /// Fails with [`HdError::DegenerateBin`] if any width is not positive;
    /// `bin` is the caller-supplied flat position used in the error message.
    pub fn volume(&self, bin: usize) -> Result<f64> {
        let mut v = 1.0;
        for (axis, &(lo, hi)) in self.edges.iter().enumerate() {
            let width = hi - lo;
            if !(width > 0.0) {
                return Err(HdError::DegenerateBin { bin, axis, width });
            }
            v *= width;
        }
        Ok(v)
    }
}

/// Flatten a histogram view into the canonical bin order.
///
/// Output length is the product of all axis bin counts; each flat bin keeps
/// the edge tuple of its index combination.
pub fn flatten_bins(view: &dyn HistogramView) -> Result<Vec<FlatBin>> {
    let d = view.dim();
    if d == 0 || d > 3 {
        return Err(HdError::DimensionMismatch(format!(
            "cannot flatten a {d}-dimensional histogram (supported: 1-3)"
        )));
    }
    let mut counts = Vec::with_capacity(d);
    for i in 0..d {
        counts.push(view.axis(i)?.bin_count());
    }
    let total: usize = counts.iter().product();

    let mut bins = Vec::with_capacity(total);
    let mut idx = vec![0usize; d];
    for flat in 0..total {
        // Decompose: axis 0 fastest.
        let mut rem = flat;
        for (i, &n) in counts.iter().enumerate() {
            idx[i] = rem % n;
            rem /= n;
        }
        let edges: Vec<(f64, f64)> = (0..d)
            .map(|i| {
                view.axis(i)?.bin(idx[i]).ok_or(HdError::OutOfRange {
                    axis: i,
                    index: idx[i],
                    bins: counts[i],
                })
            })
            .collect::<Result<_>>()?;
        bins.push(FlatBin { edges, value: view.content(&idx)?, error: view.error(&idx)? });
    }
    Ok(bins)
}

/// Divide each bin's content and error by its hyper-volume.
///
/// Converts integrated bin contents into densities (the differential
/// cross-section convention). Propagates [`HdError::DegenerateBin`] for any
/// non-positive width; malformed binning must never be skipped.
pub fn normalize_by_volume(bins: &[FlatBin]) -> Result<Vec<FlatBin>> {
    bins.iter()
        .enumerate()
        .map(|(k, b)| {
            let v = b.volume(k)?;
            Ok(FlatBin { edges: b.edges.clone(), value: b.value / v, error: b.error / v })
        })
        .collect()
}

/// Divide an auxiliary per-bin series (e.g. an error sequence taken from a
/// second histogram) by the volume of the corresponding flat bin.
pub fn normalize_series_by_volume(bins: &[FlatBin], series: &[f64]) -> Result<Vec<f64>> {
    if series.len() != bins.len() {
        return Err(HdError::LengthMismatch {
            name: "series".into(),
            expected: bins.len(),
            actual: series.len(),
        });
    }
    bins.iter()
        .zip(series)
        .enumerate()
        .map(|(k, (b, &x))| Ok(x / b.volume(k)?))
        .collect()
}
