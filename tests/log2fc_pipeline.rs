//! Integration tests for fold-change runs over gene-family and pathway tables.

use abundance_log2fc::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const SAMPLES: [&str; 6] = ["AA", "B1", "C1", "D1", "E1", "F1"];

/// Gene-family table in RPK units with a `#`-prefixed identifier header.
fn gene_family_table(suffix: &str, n_rows: usize) -> String {
    let mut out = String::from("# Gene Family");
    for code in SAMPLES {
        out.push_str(&format!("\t{}_combined_Abundance{}", code, suffix));
    }
    out.push('\n');
    for row in 0..n_rows {
        out.push_str(&format!("K{:05}", row + 1));
        for (i, _) in SAMPLES.iter().enumerate() {
            // Some zeros so the pseudocount matters.
            let value = if (row + i) % 4 == 0 {
                0.0
            } else {
                (row * 7 + i * 3) as f64 + 0.5
            };
            out.push_str(&format!("\t{}", value));
        }
        out.push('\n');
    }
    out
}

fn write(dir: &Path, name: &str, contents: &str) {
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_worked_example() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "in.tsv",
        "Gene Family\tAA_combined_Abundance-RPKs\tB1_combined_Abundance-RPKs\nK00001\t10.0\t2.0\n",
    );

    Pipeline::new()
        .pseudocount(1e-6)
        .compare("AA", "B1")
        .table(dir.path().join("in.tsv"), dir.path().join("out.tsv"))
        .run()
        .unwrap();

    let out = fs::read_to_string(dir.path().join("out.tsv")).unwrap();
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(
        lines[0],
        "Gene Family\tAA_combined_Abundance-RPKs\tB1_combined_Abundance-RPKs\tlog2FC_AA_vs_B1"
    );
    let fields: Vec<&str> = lines[1].split('\t').collect();
    assert_eq!(&fields[..3], &["K00001", "10.0", "2.0"]);
    let fc: f64 = fields[3].parse().unwrap();
    assert!((fc - 2.321925).abs() < 1e-6, "got {}", fc);
}

#[test]
fn test_rows_preserved_and_values_match() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "gf.tsv", &gene_family_table("-RPKs", 50));

    let comparisons = RunConfig::pairwise().comparisons;
    let mut pipeline = Pipeline::new().pseudocount(1e-9);
    for c in &comparisons {
        pipeline = pipeline.compare(&c.numerator, &c.denominator);
    }
    pipeline
        .table(dir.path().join("gf.tsv"), dir.path().join("gf_out.tsv"))
        .run()
        .unwrap();

    let input = AbundanceTable::from_tsv(dir.path().join("gf.tsv")).unwrap();
    let output = AbundanceTable::from_tsv(dir.path().join("gf_out.tsv")).unwrap();

    assert_eq!(output.n_rows(), input.n_rows());
    assert_eq!(output.n_columns(), input.n_columns() + comparisons.len());
    assert_eq!(output.column("Gene Family"), input.column("Gene Family"));

    for c in &comparisons {
        let a = input
            .numeric_column(&format!("{}_combined_Abundance-RPKs", c.numerator))
            .unwrap();
        let b = input
            .numeric_column(&format!("{}_combined_Abundance-RPKs", c.denominator))
            .unwrap();
        let fc = output.numeric_column(&c.column_name()).unwrap();
        for row in 0..input.n_rows() {
            let expected = ((a[row] + 1e-9) / (b[row] + 1e-9)).log2();
            assert!(
                (fc[row] - expected).abs() < 1e-9,
                "{} row {}: {} vs {}",
                c.column_name(),
                row,
                fc[row],
                expected
            );
        }
    }
}

#[test]
fn test_repeated_runs_are_byte_identical() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pw.tsv", &gene_family_table("", 30));

    let mut config = RunConfig::named();
    config.tables = vec![
        TableJob::new(dir.path().join("pw.tsv"), dir.path().join("first.tsv")),
        TableJob::new(dir.path().join("pw.tsv"), dir.path().join("second.tsv")),
    ];
    run_config(&config).unwrap();

    let first = fs::read(dir.path().join("first.tsv")).unwrap();
    let second = fs::read(dir.path().join("second.tsv")).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_missing_sample_code_aborts_that_table() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "gf.tsv", &gene_family_table("-RPKs", 5));

    let err = Pipeline::new()
        .compare("X1", "AA")
        .table(dir.path().join("gf.tsv"), dir.path().join("gf_out.tsv"))
        .run()
        .unwrap_err();

    assert!(err.to_string().contains("X1"));
    assert!(!dir.path().join("gf_out.tsv").exists());
}

#[test]
fn test_missing_sample_lists_candidates() {
    let dir = TempDir::new().unwrap();
    write(
        dir.path(),
        "pw.tsv",
        "# Pathway\tAA_combined_Abundance\tB1_combined_Abundance\nPWY-1\t1\t2\n",
    );

    let err = Pipeline::new()
        .missing_columns(MissingColumnPolicy::ListCandidates)
        .compare("AA", "X1")
        .table(dir.path().join("pw.tsv"), dir.path().join("pw_out.tsv"))
        .run()
        .unwrap_err();

    let message = err.to_string();
    assert!(message.contains("X1"));
    assert!(message.contains("AA_combined_Abundance, B1_combined_Abundance"));
}

#[test]
fn test_pairwise_preset_on_fixture_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "ko_hits.tsv", &gene_family_table("-RPKs", 12));
    write(dir.path(), "curated_pathway_hits.tsv", &gene_family_table("", 8));

    let config = Preset::Pairwise.config().with_base_dir(dir.path());
    let summary = run_config(&config).unwrap();

    assert_eq!(summary.tables.len(), 2);
    assert_eq!(summary.tables[0].n_rows, 12);
    assert_eq!(summary.tables[1].n_rows, 8);
    assert_eq!(
        summary.tables[0].derived_columns,
        vec![
            "log2FC_AA_vs_B1",
            "log2FC_AA_vs_D1",
            "log2FC_B1_vs_F1",
            "log2FC_D1_vs_C1",
            "log2FC_D1_vs_E1",
            "log2FC_E1_vs_F1",
        ]
    );

    let ko = AbundanceTable::from_tsv(dir.path().join("ko_hits_log2FC_multi.tsv")).unwrap();
    assert_eq!(ko.id_column(), "Gene Family");
    assert!(dir
        .path()
        .join("curated_pathway_hits_log2FC_multi.tsv")
        .exists());
}

#[test]
fn test_named_preset_on_fixture_directory() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "gf_ko_cpm.tsv", &gene_family_table("", 10));
    write(dir.path(), "pathways_cpm_clean.tsv", &gene_family_table("", 4));

    let summary = run_config(&Preset::Named.config().with_base_dir(dir.path())).unwrap();
    assert_eq!(summary.tables.len(), 2);

    let gf = AbundanceTable::from_tsv(dir.path().join("gf_ko_cpm_log2fc.tsv")).unwrap();
    assert_eq!(gf.id_column(), "Gene Family");
    assert_eq!(
        &gf.column_names()[7..],
        &[
            "log2FC_E1_vs_AA",
            "log2FC_F1_vs_B1",
            "log2FC_D1_vs_AA",
            "log2FC_C1_vs_D1"
        ]
    );
    assert!(dir.path().join("pathways_cpm_clean_log2fc.tsv").exists());
}

#[test]
fn test_named_preset_stops_at_first_missing_table() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pathways_cpm_clean.tsv", &gene_family_table("", 4));

    let result = run_config(&Preset::Named.config().with_base_dir(dir.path()));
    assert!(matches!(result, Err(Log2fcError::Pipeline(_))));
    assert!(!dir.path().join("pathways_cpm_clean_log2fc.tsv").exists());
}

#[test]
fn test_yaml_config_with_relative_tables() {
    let dir = TempDir::new().unwrap();
    write(dir.path(), "pw.tsv", &gene_family_table("", 6));
    write(
        dir.path(),
        "run.yaml",
        "\
name: kvass
pseudocount: 1.0e-6
id_first: true
comparisons:
  - name: lsf_vs_sdx
    numerator: E1
    denominator: AA
tables:
  - input: pw.tsv
    output: pw_log2fc.tsv
",
    );

    let config = RunConfig::from_file(dir.path().join("run.yaml")).unwrap();
    let summary = run_config(&config).unwrap();
    assert_eq!(summary.tables[0].derived_columns, vec!["log2FC_lsf_vs_sdx"]);
    assert!(dir.path().join("pw_log2fc.tsv").exists());
}
