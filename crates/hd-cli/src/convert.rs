//! Conversion driver: release directory + manifest → exported package.

use anyhow::{bail, Context, Result};
use std::path::Path;

use hd_core::{
    assemble_uncertainties, build_matrix_table, build_measurement_table, flatten_bins,
    flatten_matrix_view, normalize_by_volume, normalize_series_by_volume, ColumnSpec,
    DenseHistogram, SubmissionAssembler, Table, TableConfig, Variable,
};
use hd_export::export;
use hd_source::{HistogramSource, JsonSource};

use crate::manifest::{FluxEntry, MeasurementEntry};

/// Fixed file names inside a release directory.
const RELEASE_FILE: &str = "DataRelease.json";
const ABSTRACT_FILE: &str = "abstract.txt";
const MANIFEST_FILE: &str = "measurements.yaml";

/// Convert one release directory into a submission package at `out_dir`.
pub fn cmd_convert(release_dir: &Path, out_dir: &Path, remove_old: bool) -> Result<()> {
    let abstract_path = release_dir.join(ABSTRACT_FILE);
    let abstract_text = std::fs::read_to_string(&abstract_path)
        .with_context(|| format!("reading abstract {}", abstract_path.display()))?;

    let manifest = crate::manifest::read_manifest(&release_dir.join(MANIFEST_FILE))?;
    if manifest.measurements.is_empty() && manifest.fluxes.is_empty() {
        bail!("manifest lists no measurements or fluxes");
    }

    let mut asm = SubmissionAssembler::new();
    asm.abstract_text(abstract_text);

    // One source handle for all measurements; dropped at the end of scope
    // (also on any error path) once everything has been extracted.
    if !manifest.measurements.is_empty() {
        let release_path = release_dir.join(RELEASE_FILE);
        let source = JsonSource::open(&release_path)
            .with_context(|| format!("opening release container {}", release_path.display()))?;
        for meas in &manifest.measurements {
            for table in measurement_tables(&source, meas)
                .with_context(|| format!("building tables for measurement '{}'", meas.name))?
            {
                asm.add_table(table);
            }
        }
    }

    for flux in &manifest.fluxes {
        let flux_path = release_dir.join(&flux.file);
        // Per-file handle, released as soon as the table is built.
        let source = JsonSource::open(&flux_path)
            .with_context(|| format!("opening flux container {}", flux_path.display()))?;
        asm.add_table(
            flux_table(&source, flux)
                .with_context(|| format!("building flux table '{}'", flux.table))?,
        );
    }

    for res in &manifest.resources {
        let location = if res.copy {
            release_dir.join(&res.location).to_string_lossy().into_owned()
        } else {
            res.location.clone()
        };
        asm.add_resource(&res.description, location, res.copy, res.file_type.clone());
    }
    for link in &manifest.links {
        asm.add_link(&link.description, &link.location);
    }

    let submission = asm.finalize()?;
    export(&submission, out_dir, remove_old)
        .with_context(|| format!("writing package to {}", out_dir.display()))?;
    Ok(())
}

fn read_histogram(
    source: &dyn HistogramSource,
    name: &str,
    dim: usize,
) -> Result<DenseHistogram> {
    let hist = match dim {
        1 => source.read_1d(name),
        2 => source.read_2d(name),
        3 => source.read_3d(name),
        n => bail!("measurement declares {n} axes (supported: 1-3)"),
    };
    Ok(hist?)
}

/// Build the cross-section table and any companion matrix tables for one
/// measurement entry.
fn measurement_tables(source: &dyn HistogramSource, meas: &MeasurementEntry) -> Result<Vec<Table>> {
    tracing::info!(measurement = %meas.name, histogram = %meas.histogram, "extracting");

    let hist = read_histogram(source, &meas.histogram, meas.axes.len())?;
    let raw = flatten_bins(&hist)?;
    let bins = normalize_by_volume(&raw)?;
    let n = bins.len();

    let mut named: Vec<(String, Vec<f64>)> = Vec::new();
    if let Some(stat_key) = &meas.stat_histogram {
        let stat_hist = read_histogram(source, stat_key, meas.axes.len())?;
        let stat_raw: Vec<f64> =
            flatten_bins(&stat_hist)?.iter().map(|b| b.error).collect();
        named.push(("statistical".into(), normalize_series_by_volume(&raw, &stat_raw)?));
    }
    named.push(("total".into(), bins.iter().map(|b| b.error).collect()));
    let uncertainties = assemble_uncertainties(n, named)?;

    let xs_name = format!("cross_section-{}", meas.name);
    let cov_name = format!("covariance-{}", meas.name);
    let smear_name = format!("smearing-{}", meas.name);

    let cfg = TableConfig {
        x_pretty_name: meas.x_pretty_name.clone(),
        pretty_name: meas.pretty_name.clone(),
        observables: meas.observables.clone(),
        reactions: meas.reactions.clone(),
        phrases: meas.phrases.clone(),
        covariance_ref: meas.covariance.as_ref().map(|_| cov_name.clone()),
        smearing_ref: meas.smearing.as_ref().map(|_| smear_name.clone()),
    };

    let axes: Vec<ColumnSpec> =
        meas.axes.iter().map(|a| ColumnSpec::new(&a.name, &a.units)).collect();
    let qualifiers: Vec<(String, String)> =
        meas.qualifiers.iter().map(|q| (q.name.clone(), q.value.clone())).collect();

    let mut tables = vec![build_measurement_table(
        &xs_name,
        &axes,
        &bins,
        &ColumnSpec::new("cross_section", &meas.value_units),
        uncertainties,
        &qualifiers,
        &cfg,
    )?];

    if let Some(cov_key) = &meas.covariance {
        let cov = source.read_2d(cov_key)?;
        let entries = flatten_matrix_view(&cov, n)?;
        tables.push(build_matrix_table(
            &cov_name,
            &entries,
            n,
            &ColumnSpec::new("covariance", &meas.matrix_units),
            "covariance",
        )?);
    }

    if let Some(smear_key) = &meas.smearing {
        let smear = source.read_2d(smear_key)?;
        let entries = flatten_matrix_view(&smear, n)?;
        tables.push(build_matrix_table(
            &smear_name,
            &entries,
            n,
            &ColumnSpec::new(&meas.smearing_type, ""),
            &meas.smearing_type,
        )?);
    }

    Ok(tables)
}

/// Build a flux spectrum table: raw bin counts, no volume normalization.
fn flux_table(source: &dyn HistogramSource, flux: &FluxEntry) -> Result<Table> {
    tracing::info!(table = %flux.table, histogram = %flux.histogram, "extracting flux");

    let hist = read_histogram(source, &flux.histogram, 1)?;
    let bins = flatten_bins(&hist)?;

    let mut table = Table::new(&flux.table);
    table.add_variable(Variable::independent_binned(
        &flux.axis.name,
        &flux.axis.units,
        bins.iter().map(|b| b.edges[0]).collect(),
    ))?;

    let mut dep = Variable::dependent(
        &flux.value.name,
        &flux.value.units,
        bins.iter().map(|b| b.value).collect(),
    );
    for q in &flux.qualifiers {
        dep.add_qualifier(&q.name, &q.value)?;
    }
    table.add_variable(dep)?;
    Ok(table)
}
