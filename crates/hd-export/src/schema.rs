//! Serde schema for the HepData on-disk YAML layout.
//!
//! `submission.yaml` is a multi-document stream: one header document with
//! the abstract and additional resources, then one document per table
//! pointing at its data file. Each data file carries the independent and
//! dependent variable columns.

use serde::{Deserialize, Serialize};

/// First document of `submission.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionHeader {
    /// Abstract text.
    pub comment: String,
    /// Resource files and external links.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub additional_resources: Vec<ResourceEntry>,
}

/// One additional resource or link entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceEntry {
    /// Human-readable description.
    pub description: String,
    /// File name (copied resources) or URL.
    pub location: String,
    /// Optional resource type tag.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub file_type: Option<String>,
}

/// Per-table document of `submission.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableEntry {
    /// Table name.
    pub name: String,
    /// Table description.
    pub description: String,
    /// Location in the publication.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub location: String,
    /// Keyword lists.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub keywords: Vec<KeywordEntry>,
    /// Name of the table's data YAML file.
    pub data_file: String,
}

/// One keyword list ("observables", "reactions", "phrases").
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordEntry {
    /// Keyword category name.
    pub name: String,
    /// Keyword values.
    pub values: Vec<String>,
}

/// A per-table data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFile {
    /// Binning columns.
    pub independent_variables: Vec<IndependentColumn>,
    /// Value columns.
    pub dependent_variables: Vec<DependentColumn>,
}

/// Column name and units.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Header {
    /// Column name.
    pub name: String,
    /// Units string.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub units: String,
}

/// An independent (binning or index) column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndependentColumn {
    /// Column header.
    pub header: Header,
    /// Per-row qualifier annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<QualifierEntry>,
    /// Row values.
    pub values: Vec<IndependentValue>,
}

/// One independent row value: a bin interval or a point.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndependentValue {
    /// A binned (low, high) interval.
    Bin {
        /// Lower edge.
        low: f64,
        /// Upper edge.
        high: f64,
    },
    /// A point value (flat matrix indices are exported this way).
    Point {
        /// The value.
        value: f64,
    },
}

/// A dependent (measured) column.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentColumn {
    /// Column header.
    pub header: Header,
    /// Qualifier annotations.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub qualifiers: Vec<QualifierEntry>,
    /// Row values with attached errors.
    pub values: Vec<DependentValue>,
}

/// One (name, value) qualifier pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualifierEntry {
    /// Qualifier key.
    pub name: String,
    /// Qualifier value.
    pub value: String,
}

/// One dependent row value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DependentValue {
    /// The measured value.
    pub value: f64,
    /// Attached errors, one entry per uncertainty series.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<ErrorEntry>,
}

/// One error attached to a row value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEntry {
    /// Symmetric error magnitude.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symerror: Option<f64>,
    /// Asymmetric error as "+plus-minus" excursions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asymerror: Option<AsymError>,
    /// Series label.
    pub label: String,
}

/// Asymmetric error excursions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsymError {
    /// Downward excursion.
    pub minus: f64,
    /// Upward excursion.
    pub plus: f64,
}
