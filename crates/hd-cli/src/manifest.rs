//! Measurement manifest (YAML) parsing.
//!
//! The manifest replaces per-measurement conversion scripts: one
//! `measurements.yaml` per data release lists the histograms to extract,
//! their axis/value columns, optional covariance/smearing matrices, and the
//! submission-level resources and links.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

/// Top-level manifest.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Differential cross-section measurements from the main release file.
    #[serde(default)]
    pub measurements: Vec<MeasurementEntry>,
    /// Flux spectra, each read from its own container file.
    #[serde(default)]
    pub fluxes: Vec<FluxEntry>,
    /// Auxiliary files to reference or copy into the package.
    #[serde(default)]
    pub resources: Vec<ResourceEntry>,
    /// External hyperlinks.
    #[serde(default)]
    pub links: Vec<LinkEntry>,
}

/// One axis or value column: name plus units.
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnEntry {
    pub name: String,
    #[serde(default)]
    pub units: String,
}

/// One measurement: a histogram (1D-3D) with optional matrices.
#[derive(Debug, Clone, Deserialize)]
pub struct MeasurementEntry {
    /// Projection name; table names derive from it (`cross_section-<name>`).
    pub name: String,
    /// Histogram key in the release container (contents + total errors).
    pub histogram: String,
    /// One column per histogram axis, innermost first.
    pub axes: Vec<ColumnEntry>,
    /// Units of the normalized cross-section values.
    #[serde(default)]
    pub value_units: String,
    /// Histogram key carrying statistical errors, if published separately.
    #[serde(default)]
    pub stat_histogram: Option<String>,
    /// Covariance matrix key (2D, aligned to the flattened binning).
    #[serde(default)]
    pub covariance: Option<String>,
    /// Units of the covariance elements.
    #[serde(default)]
    pub matrix_units: String,
    /// Smearing matrix key (2D, aligned to the flattened binning).
    #[serde(default)]
    pub smearing: Option<String>,
    /// Variable name/type for the smearing matrix elements.
    #[serde(default = "default_smearing_type")]
    pub smearing_type: String,
    /// Display-label override for the first axis.
    #[serde(default)]
    pub x_pretty_name: Option<String>,
    /// Display-label override for the cross-section value.
    #[serde(default)]
    pub pretty_name: Option<String>,
    /// "observables" keyword list.
    #[serde(default)]
    pub observables: Vec<String>,
    /// "reactions" keyword list.
    #[serde(default)]
    pub reactions: Vec<String>,
    /// "phrases" keyword list.
    #[serde(default)]
    pub phrases: Vec<String>,
    /// Qualifiers attached to the cross-section variable.
    #[serde(default)]
    pub qualifiers: Vec<QualifierEntry>,
}

fn default_smearing_type() -> String {
    "wiener_svd-smearing-matrix".to_string()
}

/// One flux spectrum table, read as counts (no volume normalization).
#[derive(Debug, Clone, Deserialize)]
pub struct FluxEntry {
    /// Table name.
    pub table: String,
    /// Container file holding the flux histogram, relative to the release dir.
    pub file: String,
    /// Histogram key within that file.
    pub histogram: String,
    /// Energy axis column.
    pub axis: ColumnEntry,
    /// Flux value column.
    pub value: ColumnEntry,
    /// Qualifiers attached to the flux variable.
    #[serde(default)]
    pub qualifiers: Vec<QualifierEntry>,
}

/// One (name, value) qualifier pair.
#[derive(Debug, Clone, Deserialize)]
pub struct QualifierEntry {
    pub name: String,
    pub value: String,
}

/// One auxiliary resource entry.
#[derive(Debug, Clone, Deserialize)]
pub struct ResourceEntry {
    pub description: String,
    /// Path relative to the release directory, or a URL.
    pub location: String,
    /// Copy the file into the output package.
    #[serde(default)]
    pub copy: bool,
    /// Optional resource type tag.
    #[serde(default, rename = "type")]
    pub file_type: Option<String>,
}

/// One hyperlink entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LinkEntry {
    pub description: String,
    pub location: String,
}

/// Read and parse a manifest file.
pub fn read_manifest(path: &Path) -> Result<Manifest> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("reading manifest {}", path.display()))?;
    let manifest: Manifest = serde_yaml_ng::from_slice(&bytes)
        .with_context(|| format!("parsing manifest {}", path.display()))?;
    Ok(manifest)
}
