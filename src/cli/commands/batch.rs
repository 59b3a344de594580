//! `iqs batch` command - batch discovery and planning

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use serde::Serialize;
use std::path::PathBuf;

use crate::cli::commands::plan::{print_plan, tsv_row};
use crate::cli::helpers::{effective_format, require_plan, sampling_params};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{discover_batches, inspect_batch, Config};
use crate::entities::Batch;
use crate::sampling::{resolve, SamplingPlan};

#[derive(Subcommand, Debug)]
pub enum BatchCommands {
    /// List the BATCH* folders under a scan root
    List(ListArgs),

    /// Count a batch's images and resolve its sampling plan
    Plan(BatchPlanArgs),
}

#[derive(clap::Args, Debug)]
pub struct ListArgs {
    /// Folder holding the batches (default: batch_root from config)
    pub root: Option<PathBuf>,
}

#[derive(clap::Args, Debug)]
pub struct BatchPlanArgs {
    /// Batch folder
    pub folder: PathBuf,

    /// Inspection level (I, II, III, S1-S4)
    #[arg(long, short = 'l')]
    pub level: Option<String>,

    /// Acceptable quality limit (e.g. 0.10, 1.5)
    #[arg(long, short = 'a')]
    pub aql: Option<String>,
}

#[derive(Serialize)]
struct BatchPlan<'a> {
    batch: &'a Batch,
    plan: &'a SamplingPlan,
}

pub fn run(cmd: BatchCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        BatchCommands::List(args) => run_list(args, global),
        BatchCommands::Plan(args) => run_plan(args, global),
    }
}

fn run_list(args: ListArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let root = args
        .root
        .or_else(|| config.batch_root.clone())
        .ok_or_else(|| {
            miette::miette!(
                help = "pass the folder or set it with `iqs config set batch_root <path>`",
                "no batch root given"
            )
        })?;

    let batches = discover_batches(&root).map_err(|e| miette::miette!("{}", e))?;

    match effective_format(global, &config) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&batches).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&batches).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            println!("name\tfolders\timages");
            for batch in &batches {
                println!("{}\t{}\t{}", batch.name, batch.folder_count, batch.image_count);
            }
        }
        OutputFormat::Auto => {
            println!(
                "{:<24} {:>8} {:>8}",
                style("BATCH").bold(),
                style("FOLDERS").bold(),
                style("IMAGES").bold()
            );
            println!("{}", style("-".repeat(42)).dim());
            for batch in &batches {
                println!(
                    "{:<24} {:>8} {:>8}",
                    style(&batch.name).cyan(),
                    batch.folder_count,
                    batch.image_count
                );
            }
            if !global.quiet {
                println!();
                println!(
                    "{} batch(es) found in {}",
                    style(batches.len()).cyan(),
                    root.display()
                );
            }
        }
    }
    Ok(())
}

fn run_plan(args: BatchPlanArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let (level, aql) = sampling_params(args.level.as_deref(), args.aql.as_deref(), &config)?;
    let batch = inspect_batch(&args.folder).map_err(|e| miette::miette!("{}", e))?;
    let lot_size = batch.lot_size();
    let plan = require_plan(resolve(lot_size, level, aql)?, lot_size, level, aql)?;

    match effective_format(global, &config) {
        OutputFormat::Json => {
            let out = BatchPlan {
                batch: &batch,
                plan: &plan,
            };
            println!("{}", serde_json::to_string_pretty(&out).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            let out = BatchPlan {
                batch: &batch,
                plan: &plan,
            };
            print!("{}", serde_yml::to_string(&out).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            println!("batch\tfolders\tlot_size\tlevel\taql\tcode_letter\tsample_size\taccept\treject");
            println!("{}\t{}\t{}", batch.name, batch.folder_count, tsv_row(&plan));
        }
        OutputFormat::Auto => {
            println!(
                "{}: {} ({} folder(s))",
                style("Batch").bold(),
                style(&batch.name).cyan(),
                batch.folder_count
            );
            print_plan(&plan);
        }
    }
    Ok(())
}
