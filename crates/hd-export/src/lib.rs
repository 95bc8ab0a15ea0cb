//! # hd-export
//!
//! Writes an assembled [`hd_core::Submission`] graph to the HepData
//! archival package layout: a multi-document `submission.yaml`, one data
//! YAML file per table, and copies of any `copy_file` resources.
//!
//! Export only ever runs on a fully built graph; every document is
//! serialized and copied resource paths are checked before anything is
//! written or removed, so a failed run leaves the filesystem untouched.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::fs;
use std::path::Path;

use thiserror::Error;

use hd_core::{ErrorValue, Submission, Table, Variable, VariableValues};

pub mod schema;

use schema::{
    AsymError, DataFile, DependentColumn, DependentValue, ErrorEntry, Header, IndependentColumn,
    IndependentValue, KeywordEntry, QualifierEntry, ResourceEntry, SubmissionHeader, TableEntry,
};

/// Errors that can occur writing the submission package.
#[derive(Error, Debug)]
pub enum ExportError {
    /// I/O error writing the package.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML serialization error.
    #[error("YAML serialization error: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    /// A `copy_file` resource could not be copied.
    #[error("copying resource '{location}': {source}")]
    ResourceCopy {
        /// Resource path that failed.
        location: String,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// A dependent variable carried a non-scalar value payload.
    #[error("dependent variable '{variable}' in table '{table}' is not point-valued")]
    InvalidDependentColumn {
        /// Owning table name.
        table: String,
        /// Offending variable name.
        variable: String,
    },
}

/// Result alias for export operations.
pub type Result<T> = std::result::Result<T, ExportError>;

/// Data-file name for a table: sanitized table name plus `.yaml`.
fn data_file_name(table_name: &str) -> String {
    let sanitized: String = table_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    format!("{}.yaml", sanitized.to_ascii_lowercase())
}

fn independent_column(var: &Variable) -> IndependentColumn {
    let values = match var.values() {
        VariableValues::Binned(bins) => {
            bins.iter().map(|&(low, high)| IndependentValue::Bin { low, high }).collect()
        }
        VariableValues::Point(points) => {
            points.iter().map(|&value| IndependentValue::Point { value }).collect()
        }
        VariableValues::Index(idx) => {
            idx.iter().map(|&i| IndependentValue::Point { value: i as f64 }).collect()
        }
    };
    IndependentColumn {
        header: Header { name: var.name.clone(), units: var.units.clone() },
        qualifiers: qualifier_entries(var),
        values,
    }
}

fn dependent_column(table_name: &str, var: &Variable) -> Result<DependentColumn> {
    // The core constructors only build point-valued dependents; anything
    // else (e.g. a hand-deserialized variable) must fail loudly rather
    // than export an empty column.
    let points: &[f64] = match var.values() {
        VariableValues::Point(points) => points.as_slice(),
        VariableValues::Binned(_) | VariableValues::Index(_) => {
            return Err(ExportError::InvalidDependentColumn {
                table: table_name.to_string(),
                variable: var.name.clone(),
            });
        }
    };
    let values = points
        .iter()
        .enumerate()
        .map(|(row, &value)| DependentValue {
            value,
            errors: var
                .uncertainties()
                .iter()
                .map(|series| match series.values[row] {
                    ErrorValue::Symmetric(e) => ErrorEntry {
                        symerror: Some(e),
                        asymerror: None,
                        label: series.label.clone(),
                    },
                    ErrorValue::Asymmetric { minus, plus } => ErrorEntry {
                        symerror: None,
                        asymerror: Some(AsymError { minus, plus }),
                        label: series.label.clone(),
                    },
                })
                .collect(),
        })
        .collect();
    Ok(DependentColumn {
        header: Header { name: var.name.clone(), units: var.units.clone() },
        qualifiers: qualifier_entries(var),
        values,
    })
}

fn qualifier_entries(var: &Variable) -> Vec<QualifierEntry> {
    var.qualifiers()
        .iter()
        .map(|(name, value)| QualifierEntry { name: name.clone(), value: value.clone() })
        .collect()
}

fn table_data_file(table: &Table) -> Result<DataFile> {
    let (independent, dependent): (Vec<&Variable>, Vec<&Variable>) =
        table.variables().iter().partition(|v| v.is_independent);
    Ok(DataFile {
        independent_variables: independent.iter().map(|&v| independent_column(v)).collect(),
        dependent_variables: dependent
            .iter()
            .map(|&v| dependent_column(&table.name, v))
            .collect::<Result<_>>()?,
    })
}

/// Write the submission package under `out_dir`.
///
/// With `remove_old`, a pre-existing output directory is deleted first.
/// Resources flagged `copy_file` are copied into the package and referenced
/// by file name; others keep their location string verbatim.
pub fn export(submission: &Submission, out_dir: &Path, remove_old: bool) -> Result<()> {
    // Serialize everything before touching the filesystem.
    let mut resource_entries = Vec::new();
    for res in submission.resources() {
        let location = if res.copy_file {
            Path::new(&res.location)
                .file_name()
                .map(|f| f.to_string_lossy().into_owned())
                .unwrap_or_else(|| res.location.clone())
        } else {
            res.location.clone()
        };
        resource_entries.push(ResourceEntry {
            description: res.description.clone(),
            location,
            file_type: res.file_type.clone(),
        });
    }
    for link in submission.links() {
        resource_entries.push(ResourceEntry {
            description: link.description.clone(),
            location: link.location.clone(),
            file_type: None,
        });
    }

    let header = SubmissionHeader {
        comment: submission.abstract_text().to_string(),
        additional_resources: resource_entries,
    };

    let mut submission_yaml = serde_yaml_ng::to_string(&header)?;
    let mut data_files: Vec<(String, String)> = Vec::new();
    for table in submission.tables() {
        let data_file = data_file_name(&table.name);
        let entry = TableEntry {
            name: table.name.clone(),
            description: table.description.clone(),
            location: table.location.clone(),
            keywords: table
                .keywords
                .iter()
                .map(|(name, values)| KeywordEntry { name: name.clone(), values: values.clone() })
                .collect(),
            data_file: data_file.clone(),
        };
        submission_yaml.push_str("---\n");
        submission_yaml.push_str(&serde_yaml_ng::to_string(&entry)?);
        data_files.push((data_file, serde_yaml_ng::to_string(&table_data_file(table)?)?));
    }

    // Pre-flight copied resources so a missing file aborts the run before
    // the previous output is removed or anything is written.
    for res in submission.resources() {
        if !res.copy_file {
            continue;
        }
        fs::metadata(&res.location).map_err(|source| ExportError::ResourceCopy {
            location: res.location.clone(),
            source,
        })?;
    }

    if remove_old && out_dir.exists() {
        tracing::info!(dir = %out_dir.display(), "removing previous output");
        fs::remove_dir_all(out_dir)?;
    }
    fs::create_dir_all(out_dir)?;

    fs::write(out_dir.join("submission.yaml"), submission_yaml)?;
    for (name, contents) in &data_files {
        fs::write(out_dir.join(name), contents)?;
    }

    for res in submission.resources() {
        if !res.copy_file {
            continue;
        }
        let src = Path::new(&res.location);
        let dest = out_dir.join(src.file_name().unwrap_or(src.as_os_str()));
        fs::copy(src, &dest).map_err(|source| ExportError::ResourceCopy {
            location: res.location.clone(),
            source,
        })?;
    }

    tracing::info!(
        dir = %out_dir.display(),
        tables = submission.tables().len(),
        "submission package written"
    );
    Ok(())
}
