//! Table variables, qualifiers, and per-bin uncertainty series.

use serde::{Deserialize, Serialize};

use crate::error::{HdError, Result};

/// Qualifier keys accepted on independent variables.
const INDEPENDENT_QUALIFIERS: &[&str] = &["pretty_name"];

/// Qualifier keys accepted on dependent variables, plus the `project:` prefix.
const DEPENDENT_QUALIFIERS: &[&str] = &[
    "bin_content_type",
    "covariance",
    "pretty_name",
    "probe_species",
    "probe_spectrum",
    "select",
    "smearing",
    "target",
    "variable_type",
];

/// A named symmetric or asymmetric per-bin error sequence, aligned 1:1 with
/// the owning variable's value sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UncertaintySeries {
    /// Series label ("statistical", "total", ...).
    pub label: String,
    /// One error per bin position.
    pub values: Vec<ErrorValue>,
}

/// A single bin's error, symmetric or asymmetric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ErrorValue {
    /// Symmetric +/- error.
    Symmetric(f64),
    /// Asymmetric (minus, plus) error.
    Asymmetric {
        /// Downward excursion.
        minus: f64,
        /// Upward excursion.
        plus: f64,
    },
}

impl UncertaintySeries {
    /// A symmetric series from plain per-bin magnitudes.
    pub fn symmetric(label: impl Into<String>, values: Vec<f64>) -> Self {
        Self {
            label: label.into(),
            values: values.into_iter().map(ErrorValue::Symmetric).collect(),
        }
    }
}

/// Combine named, already volume-normalized error sequences into uncertainty
/// series aligned to a flat bin sequence of length `bin_count`.
///
/// Any length disagreement is a binning mismatch between content and error
/// sources and is fatal; sequences are never truncated or padded.
pub fn assemble_uncertainties(
    bin_count: usize,
    named: Vec<(String, Vec<f64>)>,
) -> Result<Vec<UncertaintySeries>> {
    named
        .into_iter()
        .map(|(label, values)| {
            if values.len() != bin_count {
                return Err(HdError::LengthMismatch {
                    name: label,
                    expected: bin_count,
                    actual: values.len(),
                });
            }
            Ok(UncertaintySeries::symmetric(label, values))
        })
        .collect()
}

/// Value payload of a variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum VariableValues {
    /// Binned values: one (lower, upper) interval per row.
    Binned(Vec<(f64, f64)>),
    /// Point values: one scalar per row.
    Point(Vec<f64>),
    /// Integer index values (flattened matrix row/column indices).
    Index(Vec<usize>),
}

impl VariableValues {
    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Binned(v) => v.len(),
            Self::Point(v) => v.len(),
            Self::Index(v) => v.len(),
        }
    }

    /// True if there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One column of a table: an independent (binning) or dependent (measured)
/// quantity with optional qualifiers and uncertainty series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Column name.
    pub name: String,
    /// Units string, opaque to this layer ("" if dimensionless).
    pub units: String,
    /// Independent variables describe the binning; dependent ones the values.
    pub is_independent: bool,
    /// Row values. Kept private so the payload shape fixed by the
    /// constructors (dependent variables are always point-valued) cannot be
    /// changed after construction.
    values: VariableValues,
    /// Ordered (key, value) annotation pairs.
    qualifiers: Vec<(String, String)>,
    /// Attached uncertainty series (dependent variables only).
    uncertainties: Vec<UncertaintySeries>,
}

impl Variable {
    /// An independent binned variable (one axis of the flattened binning).
    pub fn independent_binned(
        name: impl Into<String>,
        units: impl Into<String>,
        values: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            is_independent: true,
            values: VariableValues::Binned(values),
            qualifiers: Vec::new(),
            uncertainties: Vec::new(),
        }
    }

    /// An independent index variable (`bin_i` / `bin_j` companions).
    pub fn independent_index(name: impl Into<String>, values: Vec<usize>) -> Self {
        Self {
            name: name.into(),
            units: String::new(),
            is_independent: true,
            values: VariableValues::Index(values),
            qualifiers: Vec::new(),
            uncertainties: Vec::new(),
        }
    }

    /// A dependent point-value variable.
    pub fn dependent(
        name: impl Into<String>,
        units: impl Into<String>,
        values: Vec<f64>,
    ) -> Self {
        Self {
            name: name.into(),
            units: units.into(),
            is_independent: false,
            values: VariableValues::Point(values),
            qualifiers: Vec::new(),
            uncertainties: Vec::new(),
        }
    }

    /// Number of rows this variable contributes.
    pub fn row_count(&self) -> usize {
        self.values.len()
    }

    /// Row values.
    pub fn values(&self) -> &VariableValues {
        &self.values
    }

    /// Attach a qualifier, validating the key against the allowed set for
    /// this variable kind. Dependent variables also accept `project:<name>`.
    pub fn add_qualifier(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let key = key.into();
        let allowed = if self.is_independent {
            INDEPENDENT_QUALIFIERS.contains(&key.as_str())
        } else {
            DEPENDENT_QUALIFIERS.contains(&key.as_str()) || key.starts_with("project:")
        };
        if !allowed {
            return Err(HdError::UnknownQualifier { key, variable: self.name.clone() });
        }
        self.qualifiers.push((key, value.into()));
        Ok(())
    }

    /// Ordered qualifier pairs.
    pub fn qualifiers(&self) -> &[(String, String)] {
        &self.qualifiers
    }

    /// Attach an uncertainty series; its length must equal the row count.
    pub fn add_uncertainty(&mut self, series: UncertaintySeries) -> Result<()> {
        if series.values.len() != self.row_count() {
            return Err(HdError::LengthMismatch {
                name: series.label,
                expected: self.row_count(),
                actual: series.values.len(),
            });
        }
        self.uncertainties.push(series);
        Ok(())
    }

    /// Attached uncertainty series, in attachment order.
    pub fn uncertainties(&self) -> &[UncertaintySeries] {
        &self.uncertainties
    }

    /// Retrieve one series by label.
    pub fn uncertainty(&self, label: &str) -> Option<&UncertaintySeries> {
        self.uncertainties.iter().find(|u| u.label == label)
    }
}
