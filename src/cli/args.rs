//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::cli::commands::{
    batch::BatchCommands, completions::CompletionsArgs, config::ConfigCommands, plan::PlanArgs,
    review::ReviewArgs, table::TableArgs,
};

#[derive(Parser)]
#[command(name = "iqs")]
#[command(author, version, about = "Image Quality Sampler")]
#[command(long_about = "Acceptance sampling (ANSI Z1.4 / ISO 2859-1, normal inspection) for the manual quality control of scanned image batches.")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[command(flatten)]
    pub global: GlobalOpts,
}

#[derive(clap::Args, Clone, Debug)]
pub struct GlobalOpts {
    /// Output format
    #[arg(long, short = 'f', global = true, default_value = "auto")]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(long, short = 'v', global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true, value_name = "FILE")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Resolve the sampling plan for a lot size
    Plan(PlanArgs),

    /// Print the sampling tables or check their consistency
    Table(TableArgs),

    /// Discover batches and plan their inspection
    #[command(subcommand)]
    Batch(BatchCommands),

    /// Review a random sample of a batch and write the report
    Review(ReviewArgs),

    /// View and modify configuration
    #[command(subcommand)]
    Config(ConfigCommands),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (markdown tables for table data)
    #[default]
    Auto,
    /// YAML format (full fidelity)
    Yaml,
    /// JSON format (for programming)
    Json,
    /// Tab-separated values (for piping)
    Tsv,
}
