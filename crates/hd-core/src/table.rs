//! Tables and the generic table builders.
//!
//! One configurable builder replaces per-measurement table-building code:
//! every optional annotation (axis label overrides, keyword lists,
//! cross-table matrix references) is an explicit [`TableConfig`] field.

use serde::{Deserialize, Serialize};

use crate::error::{HdError, Result};
use crate::flatten::FlatBin;
use crate::matrix::MatrixEntry;
use crate::variable::{UncertaintySeries, Variable};

/// A named tabular unit: ordered variables (independent first) sharing one
/// row count, plus free-form keyword metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Table name (unique within a submission).
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Location string (figure/table reference in the publication).
    pub location: String,
    /// Keyword lists: ("observables" | "reactions" | "phrases", values).
    pub keywords: Vec<(String, Vec<String>)>,
    variables: Vec<Variable>,
}

impl Table {
    /// An empty table with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            location: String::new(),
            keywords: Vec::new(),
            variables: Vec::new(),
        }
    }

    /// Append a variable.
    ///
    /// The row count must match the table's existing variables, and
    /// independent variables must precede dependent ones.
    pub fn add_variable(&mut self, v: Variable) -> Result<()> {
        if let Some(rows) = self.row_count() {
            let actual = v.row_count();
            if actual != rows {
                return Err(HdError::LengthMismatch { name: v.name, expected: rows, actual });
            }
        }
        if v.is_independent && self.variables.iter().any(|x| !x.is_independent) {
            return Err(HdError::DimensionMismatch(format!(
                "independent variable '{}' added after dependent variables in table '{}'",
                v.name, self.name
            )));
        }
        self.variables.push(v);
        Ok(())
    }

    /// Shared row count, or `None` for an empty table.
    pub fn row_count(&self) -> Option<usize> {
        self.variables.first().map(Variable::row_count)
    }

    /// Variables in order (independent first).
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }
}

/// Name and units of one table column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name.
    pub name: String,
    /// Units string ("" if dimensionless).
    pub units: String,
}

impl ColumnSpec {
    /// Convenience constructor.
    pub fn new(name: impl Into<String>, units: impl Into<String>) -> Self {
        Self { name: name.into(), units: units.into() }
    }
}

/// Optional annotations recognized by the measurement table builder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableConfig {
    /// Display-label override for the first (x) axis.
    pub x_pretty_name: Option<String>,
    /// Display-label override for the dependent value.
    pub pretty_name: Option<String>,
    /// "observables" keyword list.
    pub observables: Vec<String>,
    /// "reactions" keyword list.
    pub reactions: Vec<String>,
    /// "phrases" keyword list.
    pub phrases: Vec<String>,
    /// Name of the companion covariance table, if one is published.
    pub covariance_ref: Option<String>,
    /// Name of the companion smearing table, if one is published.
    pub smearing_ref: Option<String>,
}

/// Build a measurement table from a flattened (and normalized) bin sequence.
///
/// One independent binned variable per axis (values = that axis's edge pair
/// across all flat bins), plus one dependent variable holding the bin values
/// with the supplied uncertainty series and qualifiers attached.
pub fn build_measurement_table(
    name: &str,
    axes: &[ColumnSpec],
    bins: &[FlatBin],
    value: &ColumnSpec,
    uncertainties: Vec<UncertaintySeries>,
    qualifiers: &[(String, String)],
    cfg: &TableConfig,
) -> Result<Table> {
    for (k, b) in bins.iter().enumerate() {
        if b.edges.len() != axes.len() {
            return Err(HdError::DimensionMismatch(format!(
                "flat bin {k} has {} axes, table '{name}' declares {}",
                b.edges.len(),
                axes.len()
            )));
        }
    }

    let mut table = Table::new(name);

    for (d, axis) in axes.iter().enumerate() {
        let mut var = Variable::independent_binned(
            &axis.name,
            &axis.units,
            bins.iter().map(|b| b.edges[d]).collect(),
        );
        if d == 0 {
            if let Some(label) = &cfg.x_pretty_name {
                var.add_qualifier("pretty_name", label)?;
            }
        }
        table.add_variable(var)?;
    }

    let mut dep =
        Variable::dependent(&value.name, &value.units, bins.iter().map(|b| b.value).collect());
    for (key, val) in qualifiers {
        dep.add_qualifier(key, val)?;
    }
    if let Some(cov) = &cfg.covariance_ref {
        dep.add_qualifier("covariance", cov)?;
    }
    if let Some(smear) = &cfg.smearing_ref {
        dep.add_qualifier("smearing", smear)?;
    }
    if let Some(label) = &cfg.pretty_name {
        dep.add_qualifier("pretty_name", label)?;
    }
    for series in uncertainties {
        dep.add_uncertainty(series)?;
    }
    table.add_variable(dep)?;

    for (kw, values) in [
        ("observables", &cfg.observables),
        ("reactions", &cfg.reactions),
        ("phrases", &cfg.phrases),
    ] {
        if !values.is_empty() {
            table.keywords.push((kw.to_string(), values.clone()));
        }
    }

    Ok(table)
}

/// Build a matrix table from flattened entries aligned to an `n`-bin
/// projected binning: `bin_i`/`bin_j` index variables plus one dependent
/// variable holding the element values.
pub fn build_matrix_table(
    name: &str,
    entries: &[MatrixEntry],
    n: usize,
    value: &ColumnSpec,
    variable_type: &str,
) -> Result<Table> {
    if entries.len() != n * n {
        return Err(HdError::DimensionMismatch(format!(
            "matrix table '{name}' has {} entries, expected {n}x{n}",
            entries.len()
        )));
    }

    let mut table = Table::new(name);
    table.add_variable(Variable::independent_index(
        "bin_i",
        entries.iter().map(|e| e.row).collect(),
    ))?;
    table.add_variable(Variable::independent_index(
        "bin_j",
        entries.iter().map(|e| e.col).collect(),
    ))?;

    let mut dep =
        Variable::dependent(&value.name, &value.units, entries.iter().map(|e| e.value).collect());
    dep.add_qualifier("variable_type", variable_type)?;
    table.add_variable(dep)?;

    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flatten::{flatten_bins, normalize_by_volume};
    use crate::histogram::{Axis, DenseHistogram};
    use crate::matrix::flatten_matrix;
    use crate::variable::{assemble_uncertainties, VariableValues};

    fn bins_1d() -> Vec<FlatBin> {
        let ax = Axis::from_pairs(vec![(0.0, 1.0), (1.0, 2.0), (2.0, 4.0)]).unwrap();
        let h =
            DenseHistogram::new(vec![ax], vec![2.0, 4.0, 8.0], vec![0.2, 0.4, 1.6]).unwrap();
        normalize_by_volume(&flatten_bins(&h).unwrap()).unwrap()
    }

    #[test]
    fn measurement_table_has_shared_row_count() {
        let bins = bins_1d();
        let uncs = assemble_uncertainties(3, vec![("total".into(), vec![0.2, 0.4, 0.8])]).unwrap();
        let cfg = TableConfig {
            x_pretty_name: Some("p_n".into()),
            covariance_ref: Some("covariance-pn".into()),
            ..Default::default()
        };
        let table = build_measurement_table(
            "cross_section-pn",
            &[ColumnSpec::new("pn", "GeV/c")],
            &bins,
            &ColumnSpec::new("cross_section", "cm^2/GeV"),
            uncs,
            &[("target".into(), "Ar".into())],
            &cfg,
        )
        .unwrap();

        assert_eq!(table.row_count(), Some(3));
        assert_eq!(table.variables().len(), 2);
        let dep = &table.variables()[1];
        assert!(!dep.is_independent);
        assert!(dep.qualifiers().contains(&("covariance".into(), "covariance-pn".into())));
        assert!(dep.uncertainty("total").is_some());
        let indep = &table.variables()[0];
        assert_eq!(indep.qualifiers(), &[("pretty_name".into(), "p_n".into())]);
    }

    #[test]
    fn keywords_are_emitted_only_when_set() {
        let bins = bins_1d();
        let cfg = TableConfig { observables: vec!["DSIG/DP".into()], ..Default::default() };
        let table = build_measurement_table(
            "t",
            &[ColumnSpec::new("pn", "")],
            &bins,
            &ColumnSpec::new("cross_section", ""),
            vec![],
            &[],
            &cfg,
        )
        .unwrap();
        assert_eq!(table.keywords, vec![("observables".into(), vec!["DSIG/DP".into()])]);
    }

    #[test]
    fn matrix_table_rows_are_n_squared() {
        let m = vec![vec![1.0, 0.5], vec![0.5, 2.0]];
        let entries = flatten_matrix(&m, 2).unwrap();
        let table = build_matrix_table(
            "covariance-pn",
            &entries,
            2,
            &ColumnSpec::new("covariance", "cm^4"),
            "covariance",
        )
        .unwrap();
        assert_eq!(table.row_count(), Some(4));
        let bin_i = &table.variables()[0];
        let bin_j = &table.variables()[1];
        match (bin_i.values(), bin_j.values()) {
            (VariableValues::Index(i), VariableValues::Index(j)) => {
                assert_eq!(i, &vec![0, 1, 0, 1]);
                assert_eq!(j, &vec![0, 0, 1, 1]);
            }
            other => panic!("unexpected index variables: {other:?}"),
        }
    }

    #[test]
    fn table_rejects_mismatched_row_counts() {
        let mut t = Table::new("t");
        t.add_variable(Variable::dependent("a", "", vec![1.0, 2.0])).unwrap();
        let err = t.add_variable(Variable::dependent("b", "", vec![1.0])).unwrap_err();
        assert!(matches!(err, HdError::LengthMismatch { expected: 2, actual: 1, .. }));
    }

    #[test]
    fn table_rejects_independent_after_dependent() {
        let mut t = Table::new("t");
        t.add_variable(Variable::dependent("y", "", vec![1.0])).unwrap();
        let err = t
            .add_variable(Variable::independent_binned("x", "", vec![(0.0, 1.0)]))
            .unwrap_err();
        assert!(matches!(err, HdError::DimensionMismatch(_)));
    }

    #[test]
    fn flat_bin_dimension_must_match_axis_specs() {
        let bins = bins_1d();
        let err = build_measurement_table(
            "t",
            &[ColumnSpec::new("x", ""), ColumnSpec::new("y", "")],
            &bins,
            &ColumnSpec::new("v", ""),
            vec![],
            &[],
            &TableConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, HdError::DimensionMismatch(_)));
    }
}
