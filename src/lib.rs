//! Pairwise log2 fold changes for functional-profiling abundance tables
//!
//! This library adds `log2FC_<label>` columns to tab-separated gene-family
//! (KO) and pathway abundance tables, one column per configured pair of
//! samples.
//!
//! # Overview
//!
//! The library is organized into composable modules:
//!
//! - **data**: Core data structures (AbundanceTable, Comparison)
//! - **columns**: Sample column lookup by naming convention
//! - **zero**: Pseudocount handling
//! - **fold_change**: Row-wise log2 ratios
//! - **pipeline**: Run configuration, presets and execution
//!
//! # Example
//!
//! ```no_run
//! use abundance_log2fc::prelude::*;
//!
//! let summary = Pipeline::new()
//!     .name("kvass")
//!     .pseudocount(1e-6)
//!     .compare_named("E1_vs_AA", "E1", "AA")
//!     .compare("C1", "D1")
//!     .id_first(true)
//!     .table("gf_ko_cpm.tsv", "gf_ko_cpm_log2fc.tsv")
//!     .run()
//!     .unwrap();
//! ```

pub mod columns;
pub mod data;
pub mod error;
pub mod fold_change;
pub mod pipeline;
pub mod zero;

/// Convenient re-exports for common usage.
pub mod prelude {
    pub use crate::columns::{
        candidate_columns, find_sample_column, resolve_comparison, resolve_sample_column,
        MissingColumnPolicy, SampleColumnConvention,
    };
    pub use crate::data::{normalize_id_header, AbundanceTable, Comparison, LOG2FC_PREFIX};
    pub use crate::error::{Log2fcError, Result};
    pub use crate::fold_change::{add_log2fc_columns, format_log2fc, log2_fold_change, Log2fcOptions};
    pub use crate::pipeline::{run_config, Pipeline, Preset, RunConfig, RunSummary, TableJob, TableSummary};
    pub use crate::zero::{add_pseudocount, check_pseudocount, NAMED_PSEUDOCOUNT, PAIRWISE_PSEUDOCOUNT};
}
