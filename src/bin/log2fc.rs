//! log2fc - pairwise log2 fold-change CLI
//!
//! Command-line interface for adding log2 fold-change columns to abundance tables.

use abundance_log2fc::columns::MissingColumnPolicy;
use abundance_log2fc::data::Comparison;
use abundance_log2fc::error::Result;
use abundance_log2fc::pipeline::{run_config, Pipeline, Preset, RunConfig, RunSummary};
use abundance_log2fc::zero::NAMED_PSEUDOCOUNT;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// CLI-friendly preset enum
#[derive(Debug, Clone, Copy, ValueEnum)]
enum CliPreset {
    /// Six A_vs_B comparisons on KO and curated pathway hits (eps 1e-9)
    Pairwise,
    /// Four named comparisons on CPM gene-family and pathway tables (eps 1e-6)
    Named,
}

impl From<CliPreset> for Preset {
    fn from(preset: CliPreset) -> Self {
        match preset {
            CliPreset::Pairwise => Preset::Pairwise,
            CliPreset::Named => Preset::Named,
        }
    }
}

/// Summary output format
#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

/// Pairwise log2 fold changes for abundance tables
#[derive(Parser)]
#[command(name = "log2fc")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a built-in preset on its fixed input files
    Preset {
        /// Which preset to run
        #[arg(value_enum)]
        preset: CliPreset,

        /// Directory holding the input tables (default: current directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Summary format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Run from a YAML configuration file
    Run {
        /// Path to run configuration YAML
        #[arg(short, long)]
        config: PathBuf,

        /// Summary format
        #[arg(long, value_enum, default_value = "text")]
        format: OutputFormat,
    },

    /// Add fold-change columns to a single table
    Table {
        /// Input abundance TSV
        #[arg(short, long)]
        input: PathBuf,

        /// Output TSV
        #[arg(short, long)]
        output: PathBuf,

        /// Comparison as A:B or A:B:NAME (repeatable)
        #[arg(long = "compare", required = true)]
        comparisons: Vec<String>,

        /// Pseudocount added to both samples (default: 1e-6)
        #[arg(long, default_value_t = NAMED_PSEUDOCOUNT)]
        pseudocount: f64,

        /// Move the identifier column to the front
        #[arg(long)]
        id_first: bool,

        /// List available sample columns when a code is not found
        #[arg(long)]
        list_candidates: bool,
    },

    /// Write a preset as an editable YAML configuration
    Example {
        /// Output path for the YAML
        #[arg(short, long, default_value = "log2fc.yaml")]
        output: PathBuf,

        /// Preset to export
        #[arg(long, value_enum, default_value = "named")]
        preset: CliPreset,
    },
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Preset {
            preset,
            dir,
            format,
        } => cmd_preset(preset, dir.as_ref(), format),

        Commands::Run { config, format } => cmd_run(&config, format),

        Commands::Table {
            input,
            output,
            comparisons,
            pseudocount,
            id_first,
            list_candidates,
        } => cmd_table(
            &input,
            &output,
            &comparisons,
            pseudocount,
            id_first,
            list_candidates,
        ),

        Commands::Example { output, preset } => cmd_example(&output, preset),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Run a built-in preset
fn cmd_preset(preset: CliPreset, dir: Option<&PathBuf>, format: OutputFormat) -> Result<()> {
    let preset: Preset = preset.into();
    let mut config = preset.config();
    if let Some(dir) = dir {
        config = config.with_base_dir(dir);
    }

    eprintln!("Running preset '{}'...", preset.name());
    let summary = run_config(&config)?;
    print_summary(&summary, format)
}

/// Run from configuration
fn cmd_run(config_path: &PathBuf, format: OutputFormat) -> Result<()> {
    eprintln!("Loading run configuration from {:?}...", config_path);
    let config = RunConfig::from_file(config_path)?;

    eprintln!(
        "Running '{}': {} comparisons over {} tables...",
        config.name,
        config.comparisons.len(),
        config.tables.len()
    );
    let summary = run_config(&config)?;
    print_summary(&summary, format)
}

/// Process one table from command-line comparisons
fn cmd_table(
    input: &PathBuf,
    output: &PathBuf,
    comparisons: &[String],
    pseudocount: f64,
    id_first: bool,
    list_candidates: bool,
) -> Result<()> {
    let policy = if list_candidates {
        MissingColumnPolicy::ListCandidates
    } else {
        MissingColumnPolicy::Immediate
    };

    let mut pipeline = Pipeline::new()
        .name("table")
        .pseudocount(pseudocount)
        .missing_columns(policy)
        .id_first(id_first)
        .table(input, output);
    for spec in comparisons {
        let comparison: Comparison = spec.parse()?;
        pipeline = match &comparison.name {
            Some(name) => pipeline.compare_named(name, &comparison.numerator, &comparison.denominator),
            None => pipeline.compare(&comparison.numerator, &comparison.denominator),
        };
    }

    eprintln!("Computing {} comparisons for {:?}...", comparisons.len(), input);
    let summary = pipeline.run()?;
    eprintln!("Wrote {:?} ({} rows)", output, summary.tables[0].n_rows);

    Ok(())
}

/// Generate an example configuration
fn cmd_example(output_path: &PathBuf, preset: CliPreset) -> Result<()> {
    let preset: Preset = preset.into();
    let yaml = preset.config().to_yaml()?;

    std::fs::write(output_path, &yaml)?;
    eprintln!("Wrote '{}' preset to {:?}", preset.name(), output_path);
    eprintln!();
    eprintln!("Contents:");
    println!("{}", yaml);

    Ok(())
}

fn print_summary(summary: &RunSummary, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => println!("{}", summary.to_json()?),
        OutputFormat::Text => eprint!("{}", summary),
    }
    Ok(())
}
