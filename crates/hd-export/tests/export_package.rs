//! End-to-end: assemble a small submission and check the written package.

use serde::Deserialize;
use serde_yaml_ng::Value;
use std::fs;

use hd_core::{
    assemble_uncertainties, build_matrix_table, build_measurement_table, flatten_bins,
    flatten_matrix, normalize_by_volume, Axis, ColumnSpec, DenseHistogram, SubmissionAssembler,
    TableConfig,
};
use hd_export::{export, ExportError};

fn sample_submission(resource_path: Option<&str>) -> hd_core::Submission {
    let ax = Axis::from_pairs(vec![(0.0, 1.0), (1.0, 2.0), (2.0, 4.0)]).unwrap();
    let h = DenseHistogram::new(vec![ax], vec![2.0, 4.0, 8.0], vec![0.2, 0.4, 1.6]).unwrap();
    let bins = normalize_by_volume(&flatten_bins(&h).unwrap()).unwrap();

    let uncs = assemble_uncertainties(
        3,
        vec![("total".into(), bins.iter().map(|b| b.error).collect())],
    )
    .unwrap();
    let cfg = TableConfig {
        covariance_ref: Some("covariance-pn".into()),
        observables: vec!["DSIG/DP".into()],
        ..Default::default()
    };
    let xs_table = build_measurement_table(
        "cross_section-pn",
        &[ColumnSpec::new("pn", "GeV/c")],
        &bins,
        &ColumnSpec::new("cross_section", "cm^2/GeV"),
        uncs,
        &[("target".into(), "Ar".into())],
        &cfg,
    )
    .unwrap();

    let matrix = vec![
        vec![1.0, 0.5, 0.1],
        vec![0.5, 2.0, 0.2],
        vec![0.1, 0.2, 3.0],
    ];
    let entries = flatten_matrix(&matrix, 3).unwrap();
    let cov_table = build_matrix_table(
        "covariance-pn",
        &entries,
        3,
        &ColumnSpec::new("covariance", "cm^4"),
        "covariance",
    )
    .unwrap();

    let mut asm = SubmissionAssembler::new();
    asm.abstract_text("A cross-section measurement.")
        .add_table(xs_table)
        .add_table(cov_table)
        .add_link("pre-print", "https://example.org/preprint");
    if let Some(path) = resource_path {
        asm.add_resource("binning scheme", path, true, Some("text".into()));
    }
    asm.finalize().unwrap()
}

fn read_documents(path: &std::path::Path) -> Vec<Value> {
    let text = fs::read_to_string(path).unwrap();
    serde_yaml_ng::Deserializer::from_str(&text)
        .map(|doc| Value::deserialize(doc).unwrap())
        .collect()
}

#[test]
fn package_layout_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("testout");
    let sub = sample_submission(None);
    export(&sub, &out, true).unwrap();

    let docs = read_documents(&out.join("submission.yaml"));
    assert_eq!(docs.len(), 3, "header plus one document per table");

    assert_eq!(
        docs[0].get("comment").and_then(Value::as_str),
        Some("A cross-section measurement.")
    );
    assert_eq!(docs[1].get("name").and_then(Value::as_str), Some("cross_section-pn"));
    assert_eq!(
        docs[1].get("data_file").and_then(Value::as_str),
        Some("cross_section-pn.yaml")
    );
    let keywords = docs[1].get("keywords").and_then(Value::as_sequence).unwrap();
    assert_eq!(keywords[0].get("name").and_then(Value::as_str), Some("observables"));

    let xs_docs = read_documents(&out.join("cross_section-pn.yaml"));
    assert_eq!(xs_docs.len(), 1);
    let indep = xs_docs[0].get("independent_variables").and_then(Value::as_sequence).unwrap();
    let dep = xs_docs[0].get("dependent_variables").and_then(Value::as_sequence).unwrap();
    assert_eq!(indep.len(), 1);
    assert_eq!(dep.len(), 1);

    let rows = indep[0].get("values").and_then(Value::as_sequence).unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2].get("low").and_then(Value::as_f64), Some(2.0));
    assert_eq!(rows[2].get("high").and_then(Value::as_f64), Some(4.0));

    let values = dep[0].get("values").and_then(Value::as_sequence).unwrap();
    // Third bin: content 8 over width 2.
    assert_eq!(values[2].get("value").and_then(Value::as_f64), Some(4.0));
    let errors = values[2].get("errors").and_then(Value::as_sequence).unwrap();
    assert_eq!(errors[0].get("symerror").and_then(Value::as_f64), Some(0.8));
    assert_eq!(errors[0].get("label").and_then(Value::as_str), Some("total"));

    let cov_docs = read_documents(&out.join("covariance-pn.yaml"));
    let cov_indep =
        cov_docs[0].get("independent_variables").and_then(Value::as_sequence).unwrap();
    assert_eq!(cov_indep.len(), 2, "bin_i and bin_j");
    let bin_i_rows = cov_indep[0].get("values").and_then(Value::as_sequence).unwrap();
    assert_eq!(bin_i_rows.len(), 9);
    // Entry k corresponds to (row = k mod n, col = k div n).
    assert_eq!(bin_i_rows[4].get("value").and_then(Value::as_f64), Some(1.0));
}

#[test]
fn copy_file_resources_land_in_package() {
    let dir = tempfile::tempdir().unwrap();
    let res_path = dir.path().join("BinScheme.txt");
    fs::write(&res_path, "2D binning scheme\n").unwrap();

    let out = dir.path().join("testout");
    let sub = sample_submission(Some(res_path.to_str().unwrap()));
    export(&sub, &out, true).unwrap();

    assert!(out.join("BinScheme.txt").exists());
    let docs = read_documents(&out.join("submission.yaml"));
    let resources = docs[0].get("additional_resources").and_then(Value::as_sequence).unwrap();
    // Copied resource is referenced by file name only; the link keeps its URL.
    assert_eq!(resources[0].get("location").and_then(Value::as_str), Some("BinScheme.txt"));
    assert_eq!(
        resources[1].get("location").and_then(Value::as_str),
        Some("https://example.org/preprint")
    );
}

#[test]
fn missing_copy_file_resource_leaves_filesystem_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("testout");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("previous.yaml"), "kept").unwrap();

    let sub = sample_submission(Some(dir.path().join("NoSuchFile.txt").to_str().unwrap()));
    let err = export(&sub, &out, true).unwrap_err();
    assert!(matches!(err, ExportError::ResourceCopy { .. }));

    // The previous output survives: nothing is removed or written before the
    // copied resources are checked.
    assert!(out.join("previous.yaml").exists());
    assert!(!out.join("submission.yaml").exists());
}

#[test]
fn non_point_dependent_variable_is_rejected() {
    // Serde bypasses the constructors, which only ever build point-valued
    // dependents; the exporter must refuse such a column instead of writing
    // an empty value list.
    let yaml = r#"
name: cross_section
units: "cm^2/GeV"
is_independent: false
values: !Binned
  - [0.0, 1.0]
  - [1.0, 2.0]
qualifiers: []
uncertainties: []
"#;
    let bad: hd_core::Variable = serde_yaml_ng::from_str(yaml).unwrap();
    let mut table = hd_core::Table::new("cross_section-pn");
    table.add_variable(bad).unwrap();

    let mut asm = SubmissionAssembler::new();
    asm.abstract_text("A cross-section measurement.").add_table(table);
    let sub = asm.finalize().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("testout");
    let err = export(&sub, &out, true).unwrap_err();
    match err {
        ExportError::InvalidDependentColumn { table, variable } => {
            assert_eq!(table, "cross_section-pn");
            assert_eq!(variable, "cross_section");
        }
        other => panic!("expected InvalidDependentColumn, got {other}"),
    }
    assert!(!out.exists());
}

#[test]
fn remove_old_clears_previous_output() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("testout");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("stale.yaml"), "old").unwrap();

    let sub = sample_submission(None);
    export(&sub, &out, true).unwrap();
    assert!(!out.join("stale.yaml").exists());
    assert!(out.join("submission.yaml").exists());
}
