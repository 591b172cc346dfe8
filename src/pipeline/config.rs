//! Run configuration and built-in presets.

use crate::columns::{MissingColumnPolicy, SampleColumnConvention};
use crate::data::Comparison;
use crate::error::{Log2fcError, Result};
use crate::zero::{check_pseudocount, NAMED_PSEUDOCOUNT, PAIRWISE_PSEUDOCOUNT};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// One input table and where its augmented copy is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

impl TableJob {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(input: P, output: Q) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
        }
    }

    /// Resolve relative paths against `dir`; absolute paths are kept.
    pub fn rebased(&self, dir: &Path) -> Self {
        Self {
            input: dir.join(&self.input),
            output: dir.join(&self.output),
        }
    }
}

/// Built-in analysis configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Preset {
    /// Six unnamed `A_vs_B` comparisons over KO and curated pathway hit tables.
    Pairwise,
    /// Four named comparisons over CPM gene-family and pathway tables.
    Named,
}

impl Preset {
    /// The full run configuration for this preset.
    pub fn config(self) -> RunConfig {
        match self {
            Preset::Pairwise => RunConfig::pairwise(),
            Preset::Named => RunConfig::named(),
        }
    }

    /// Get the descriptive name.
    pub fn name(&self) -> &'static str {
        match self {
            Preset::Pairwise => "pairwise",
            Preset::Named => "named",
        }
    }
}

/// Run configuration for serialization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Name of the run.
    pub name: String,
    /// Description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Pseudocount added to both samples of every ratio.
    pub pseudocount: f64,
    /// Comparisons, in output column order.
    pub comparisons: Vec<Comparison>,
    /// Failure policy for unresolved sample codes.
    #[serde(default)]
    pub missing_columns: MissingColumnPolicy,
    /// Move the identifier column to the front before writing.
    #[serde(default)]
    pub id_first: bool,
    /// Print `Wrote <path>` after each output file.
    #[serde(default)]
    pub announce_writes: bool,
    /// Sample column naming convention.
    #[serde(default)]
    pub convention: SampleColumnConvention,
    /// Tables to process, in order.
    #[serde(default)]
    pub tables: Vec<TableJob>,
}

impl RunConfig {
    /// Load from YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(Log2fcError::from)
    }

    /// Save to YAML string.
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(Log2fcError::from)
    }

    /// Load from a YAML file.
    ///
    /// Relative table paths are resolved against the file's directory.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let yaml = std::fs::read_to_string(path)?;
        let config = Self::from_yaml(&yaml)?;
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => Ok(config.with_base_dir(dir)),
            _ => Ok(config),
        }
    }

    /// Resolve every relative table path against `dir`.
    pub fn with_base_dir(mut self, dir: &Path) -> Self {
        self.tables = self.tables.iter().map(|job| job.rebased(dir)).collect();
        self
    }

    /// Check parameters before any table is read.
    pub fn validate(&self) -> Result<()> {
        check_pseudocount(self.pseudocount)?;
        if self.comparisons.is_empty() {
            return Err(Log2fcError::InvalidParameter(format!(
                "Run '{}' has no comparisons",
                self.name
            )));
        }
        for comparison in &self.comparisons {
            comparison.validate()?;
        }
        if self.convention.stem.is_empty() {
            return Err(Log2fcError::InvalidParameter(
                "Sample column stem must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// KO and curated pathway hit tables, six `A_vs_B` comparisons.
    pub fn pairwise() -> Self {
        Self {
            name: "pairwise".to_string(),
            description: Some(
                "log2 fold changes between sample pairs for KO and curated pathway hits"
                    .to_string(),
            ),
            pseudocount: PAIRWISE_PSEUDOCOUNT,
            comparisons: vec![
                Comparison::new("AA", "B1"),
                Comparison::new("AA", "D1"),
                Comparison::new("B1", "F1"),
                Comparison::new("D1", "C1"),
                Comparison::new("D1", "E1"),
                Comparison::new("E1", "F1"),
            ],
            missing_columns: MissingColumnPolicy::ListCandidates,
            id_first: false,
            announce_writes: true,
            convention: SampleColumnConvention::default(),
            tables: vec![
                TableJob::new("ko_hits.tsv", "ko_hits_log2FC_multi.tsv"),
                TableJob::new(
                    "curated_pathway_hits.tsv",
                    "curated_pathway_hits_log2FC_multi.tsv",
                ),
            ],
        }
    }

    /// CPM gene-family (KO) and pathway tables, four named comparisons.
    ///
    /// Sample codes: AA=SDX, B1=SDY, C1=LSGF-Kvass-X, D1=STD-Kvass-X,
    /// E1=LSF-Kvass-X, F1=LSF-Kvass-Y.
    pub fn named() -> Self {
        Self {
            name: "named".to_string(),
            description: Some(
                "Named log2 fold changes for CPM gene-family and pathway tables".to_string(),
            ),
            pseudocount: NAMED_PSEUDOCOUNT,
            comparisons: vec![
                Comparison::named("E1_vs_AA", "E1", "AA"),
                Comparison::named("F1_vs_B1", "F1", "B1"),
                Comparison::named("D1_vs_AA", "D1", "AA"),
                Comparison::named("C1_vs_D1", "C1", "D1"),
            ],
            missing_columns: MissingColumnPolicy::Immediate,
            id_first: true,
            announce_writes: false,
            convention: SampleColumnConvention::default(),
            tables: vec![
                TableJob::new("gf_ko_cpm.tsv", "gf_ko_cpm_log2fc.tsv"),
                TableJob::new("pathways_cpm_clean.tsv", "pathways_cpm_clean_log2fc.tsv"),
            ],
        }
    }
}
