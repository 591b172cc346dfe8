//! Pipeline runner: load each table, add fold-change columns, write it out.

use super::config::{RunConfig, TableJob};
use crate::columns::{MissingColumnPolicy, SampleColumnConvention};
use crate::data::{AbundanceTable, Comparison};
use crate::error::{Log2fcError, Result};
use crate::fold_change::{add_log2fc_columns, Log2fcOptions};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Outcome for one processed table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Data rows, identical in input and output.
    pub n_rows: usize,
    /// Columns in the written table.
    pub n_columns: usize,
    /// Derived `log2FC_*` columns, in order.
    pub derived_columns: Vec<String>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub name: String,
    pub tables: Vec<TableSummary>,
}

impl RunSummary {
    /// Serialize as pretty JSON.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).map_err(Log2fcError::from)
    }
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Run '{}': {} table(s)", self.name, self.tables.len())?;
        for table in &self.tables {
            writeln!(
                f,
                "  {} -> {} ({} rows, {} columns)",
                table.input.display(),
                table.output.display(),
                table.n_rows,
                table.n_columns
            )?;
            for column in &table.derived_columns {
                writeln!(f, "    {}", column)?;
            }
        }
        Ok(())
    }
}

/// Builder for constructing and running fold-change pipelines.
#[derive(Debug, Clone)]
pub struct Pipeline {
    name: String,
    options: Log2fcOptions,
    comparisons: Vec<Comparison>,
    id_first: bool,
    announce_writes: bool,
    tables: Vec<TableJob>,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new()
    }
}

impl Pipeline {
    /// Create a new pipeline with no comparisons or tables.
    pub fn new() -> Self {
        Self {
            name: "unnamed".to_string(),
            options: Log2fcOptions::default(),
            comparisons: Vec::new(),
            id_first: false,
            announce_writes: false,
            tables: Vec::new(),
        }
    }

    /// Create from a config.
    pub fn from_config(config: &RunConfig) -> Self {
        Self {
            name: config.name.clone(),
            options: Log2fcOptions {
                pseudocount: config.pseudocount,
                missing_columns: config.missing_columns,
                convention: config.convention.clone(),
            },
            comparisons: config.comparisons.clone(),
            id_first: config.id_first,
            announce_writes: config.announce_writes,
            tables: config.tables.clone(),
        }
    }

    /// Export to a serializable config.
    pub fn to_config(&self, description: Option<&str>) -> RunConfig {
        RunConfig {
            name: self.name.clone(),
            description: description.map(|s| s.to_string()),
            pseudocount: self.options.pseudocount,
            comparisons: self.comparisons.clone(),
            missing_columns: self.options.missing_columns,
            id_first: self.id_first,
            announce_writes: self.announce_writes,
            convention: self.options.convention.clone(),
            tables: self.tables.clone(),
        }
    }

    /// Set the pipeline name.
    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    /// Set the pseudocount.
    pub fn pseudocount(mut self, value: f64) -> Self {
        self.options.pseudocount = value;
        self
    }

    /// Add a comparison labelled `<numerator>_vs_<denominator>`.
    pub fn compare(mut self, numerator: &str, denominator: &str) -> Self {
        self.comparisons.push(Comparison::new(numerator, denominator));
        self
    }

    /// Add a comparison with an explicit label.
    pub fn compare_named(mut self, name: &str, numerator: &str, denominator: &str) -> Self {
        self.comparisons
            .push(Comparison::named(name, numerator, denominator));
        self
    }

    /// Set the failure policy for unresolved sample codes.
    pub fn missing_columns(mut self, policy: MissingColumnPolicy) -> Self {
        self.options.missing_columns = policy;
        self
    }

    /// Set the sample column naming convention.
    pub fn convention(mut self, convention: SampleColumnConvention) -> Self {
        self.options.convention = convention;
        self
    }

    /// Move the identifier column to the front before writing.
    pub fn id_first(mut self, enabled: bool) -> Self {
        self.id_first = enabled;
        self
    }

    /// Print `Wrote <path>` after each output file.
    pub fn announce_writes(mut self, enabled: bool) -> Self {
        self.announce_writes = enabled;
        self
    }

    /// Add an input/output table pair.
    pub fn table<P: Into<PathBuf>, Q: Into<PathBuf>>(mut self, input: P, output: Q) -> Self {
        self.tables.push(TableJob::new(input, output));
        self
    }

    /// Comparisons in output column order.
    pub fn comparisons(&self) -> &[Comparison] {
        &self.comparisons
    }

    /// Table jobs in run order.
    pub fn tables(&self) -> &[TableJob] {
        &self.tables
    }

    /// Add the fold-change columns to a loaded table.
    ///
    /// Returns the derived column names.
    pub fn apply(&self, table: &mut AbundanceTable) -> Result<Vec<String>> {
        let id_column = table.id_column().to_string();
        let derived = add_log2fc_columns(table, &self.comparisons, &self.options)?;
        if self.id_first {
            table.move_to_front(&id_column)?;
        }
        Ok(derived)
    }

    /// Process one table. The output file is only created once every
    /// comparison has been computed.
    pub fn run_table(&self, input: &Path, output: &Path) -> Result<TableSummary> {
        let mut table = AbundanceTable::from_tsv(input)?;
        info!(
            "Loaded {:?}: {} rows x {} columns",
            input,
            table.n_rows(),
            table.n_columns()
        );

        let derived_columns = self.apply(&mut table)?;
        table.to_tsv(output)?;
        info!("Wrote {:?} with {} derived columns", output, derived_columns.len());
        if self.announce_writes {
            println!("Wrote {}", output.display());
        }

        Ok(TableSummary {
            input: input.to_path_buf(),
            output: output.to_path_buf(),
            n_rows: table.n_rows(),
            n_columns: table.n_columns(),
            derived_columns,
        })
    }

    /// Run every table job in order.
    ///
    /// Stops at the first failing table; outputs already written stay.
    pub fn run(&self) -> Result<RunSummary> {
        self.to_config(None).validate()?;
        if self.tables.is_empty() {
            return Err(Log2fcError::InvalidParameter(format!(
                "Pipeline '{}' has no tables",
                self.name
            )));
        }

        let mut tables = Vec::with_capacity(self.tables.len());
        for job in &self.tables {
            let summary = self.run_table(&job.input, &job.output).map_err(|e| {
                Log2fcError::Pipeline(format!("Table {:?} failed: {}", job.input, e))
            })?;
            tables.push(summary);
        }

        Ok(RunSummary {
            name: self.name.clone(),
            tables,
        })
    }
}

/// Run a built-in or loaded configuration.
pub fn run_config(config: &RunConfig) -> Result<RunSummary> {
    Pipeline::from_config(config).run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    const KO_TABLE: &str = "# Gene Family\tAA_combined_Abundance-RPKs\tB1_combined_Abundance-RPKs\n\
                            K00001\t10.0\t2.0\n\
                            K00002\t0\t5\n";

    fn write_input(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_run_single_table() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ko.tsv", KO_TABLE);
        let output = dir.path().join("ko_log2fc.tsv");

        let summary = Pipeline::new()
            .name("single")
            .pseudocount(1e-6)
            .compare("AA", "B1")
            .table(&input, &output)
            .run()
            .unwrap();

        assert_eq!(summary.tables.len(), 1);
        assert_eq!(summary.tables[0].n_rows, 2);
        assert_eq!(summary.tables[0].derived_columns, vec!["log2FC_AA_vs_B1"]);

        let written = AbundanceTable::from_tsv(&output).unwrap();
        assert_eq!(
            written.column_names(),
            &[
                "Gene Family",
                "AA_combined_Abundance-RPKs",
                "B1_combined_Abundance-RPKs",
                "log2FC_AA_vs_B1"
            ]
        );
        assert_eq!(&written.row(0)[..3], &["K00001", "10.0", "2.0"]);
        let fc = written.numeric_column("log2FC_AA_vs_B1").unwrap();
        assert!((fc[0] - 2.321925).abs() < 1e-6);
    }

    #[test]
    fn test_missing_sample_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let input = write_input(&dir, "ko.tsv", KO_TABLE);
        let output = dir.path().join("ko_log2fc.tsv");

        let err = Pipeline::new()
            .compare("X1", "AA")
            .table(&input, &output)
            .run()
            .unwrap_err();

        assert!(err.to_string().contains("X1"));
        assert!(!output.exists());
    }

    #[test]
    fn test_earlier_outputs_survive_later_failure() {
        let dir = TempDir::new().unwrap();
        let good = write_input(&dir, "good.tsv", KO_TABLE);
        let bad = write_input(
            &dir,
            "bad.tsv",
            "Pathway\tAA_combined_Abundance\nPWY-1\t1.0\n",
        );
        let good_out = dir.path().join("good_out.tsv");
        let bad_out = dir.path().join("bad_out.tsv");

        let result = Pipeline::new()
            .compare("AA", "B1")
            .table(&good, &good_out)
            .table(&bad, &bad_out)
            .run();

        assert!(matches!(result, Err(Log2fcError::Pipeline(_))));
        assert!(good_out.exists());
        assert!(!bad_out.exists());
    }

    #[test]
    fn test_run_requires_tables_and_comparisons() {
        assert!(Pipeline::new().compare("AA", "B1").run().is_err());
        assert!(Pipeline::new().table("in.tsv", "out.tsv").run().is_err());
    }

    #[test]
    fn test_config_roundtrip() {
        let pipeline = Pipeline::from_config(&RunConfig::named());
        let config = pipeline.to_config(RunConfig::named().description.as_deref());
        assert_eq!(config, RunConfig::named());
    }

    #[test]
    fn test_summary_display_and_json() {
        let summary = RunSummary {
            name: "demo".to_string(),
            tables: vec![TableSummary {
                input: PathBuf::from("in.tsv"),
                output: PathBuf::from("out.tsv"),
                n_rows: 3,
                n_columns: 4,
                derived_columns: vec!["log2FC_AA_vs_B1".to_string()],
            }],
        };
        let text = summary.to_string();
        assert!(text.contains("in.tsv -> out.tsv (3 rows, 4 columns)"));
        assert!(text.contains("log2FC_AA_vs_B1"));

        let json: serde_json::Value = serde_json::from_str(&summary.to_json().unwrap()).unwrap();
        assert_eq!(json["tables"][0]["n_rows"], 3);
    }
}
