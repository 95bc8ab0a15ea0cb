//! # hd-source
//!
//! Histogram container readers feeding the `hd-core` flattening engine.
//!
//! The [`HistogramSource`] trait is the consumed interface: open a container,
//! read named 1D/2D/3D histograms out of it as [`DenseHistogram`] views.
//! [`JsonSource`] is the reference backend for the JSON `DataRelease`
//! bundle format; other container formats (e.g. ROOT files) can provide
//! their own implementation without touching the core.
//!
//! ## Example
//!
//! ```no_run
//! use hd_source::{HistogramSource, JsonSource};
//!
//! let src = JsonSource::open("DataRelease.json").unwrap();
//! let h = src.read_1d("TotalUnc_DeltaPn").unwrap();
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use hd_core::{Axis, DenseHistogram};

pub mod error;

pub use error::{Result, SourceError};

/// Read-only access to named histograms in an opened container.
///
/// A named histogram that is absent must surface as
/// [`SourceError::NotFound`] carrying the requested key, never as a generic
/// failure.
pub trait HistogramSource {
    /// Read a named 1D histogram.
    fn read_1d(&self, name: &str) -> Result<DenseHistogram>;

    /// Read a named 2D histogram.
    fn read_2d(&self, name: &str) -> Result<DenseHistogram>;

    /// Read a named 3D histogram.
    fn read_3d(&self, name: &str) -> Result<DenseHistogram>;
}

/// On-disk schema: one axis as monotonic edge positions.
#[derive(Debug, Deserialize)]
struct JsonAxis {
    edges: Vec<f64>,
}

/// On-disk schema: one histogram record.
///
/// `contents`/`errors` are dense, axis-0 index fastest, length = product of
/// per-axis bin counts.
///
/// For 2D records that hold a covariance/smearing matrix, axis 0 is the
/// published row index (`bin_i`) and axis 1 the column index (`bin_j`).
/// Containers whose matrix convention pairs the x-axis with the column
/// index must be transposed when producing this format.
#[derive(Debug, Deserialize)]
struct JsonHistogram {
    axes: Vec<JsonAxis>,
    contents: Vec<f64>,
    #[serde(default)]
    errors: Option<Vec<f64>>,
}

#[derive(Debug, Deserialize)]
struct JsonBundle {
    histograms: BTreeMap<String, JsonHistogram>,
}

/// A JSON histogram bundle loaded fully into memory.
///
/// The file handle is released as soon as [`JsonSource::open`] returns, on
/// success and failure alike; subsequent reads touch only memory.
#[derive(Debug)]
pub struct JsonSource {
    histograms: BTreeMap<String, JsonHistogram>,
}

impl JsonSource {
    /// Open and parse a bundle file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        tracing::debug!(path = %path.display(), "opening histogram bundle");
        let bytes = std::fs::read(path)?;
        Self::from_slice(&bytes)
    }

    /// Parse a bundle from raw bytes.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        let bundle: JsonBundle = serde_json::from_slice(bytes)?;
        tracing::debug!(histograms = bundle.histograms.len(), "bundle parsed");
        Ok(Self { histograms: bundle.histograms })
    }

    /// Names of all histograms in the bundle, sorted.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.histograms.keys().map(String::as_str)
    }

    fn read_dim(&self, name: &str, dim: usize) -> Result<DenseHistogram> {
        let rec = self
            .histograms
            .get(name)
            .ok_or_else(|| SourceError::NotFound(name.to_string()))?;
        if rec.axes.len() != dim {
            return Err(SourceError::WrongDimension {
                name: name.to_string(),
                requested: dim,
                actual: rec.axes.len(),
            });
        }
        let axes: Vec<Axis> = rec
            .axes
            .iter()
            .map(|a| Axis::from_edges(&a.edges))
            .collect::<hd_core::Result<_>>()
            .map_err(|source| SourceError::Malformed { name: name.to_string(), source })?;
        let errors = rec
            .errors
            .clone()
            .unwrap_or_else(|| vec![0.0; rec.contents.len()]);
        DenseHistogram::new(axes, rec.contents.clone(), errors)
            .map_err(|source| SourceError::Malformed { name: name.to_string(), source })
    }
}

impl HistogramSource for JsonSource {
    fn read_1d(&self, name: &str) -> Result<DenseHistogram> {
        self.read_dim(name, 1)
    }

    fn read_2d(&self, name: &str) -> Result<DenseHistogram> {
        self.read_dim(name, 2)
    }

    fn read_3d(&self, name: &str) -> Result<DenseHistogram> {
        self.read_dim(name, 3)
    }
}
