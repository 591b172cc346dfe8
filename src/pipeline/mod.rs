//! Pipeline composition and execution for fold-change runs.

mod config;
mod runner;

pub use config::{Preset, RunConfig, TableJob};
pub use runner::{run_config, Pipeline, RunSummary, TableSummary};
