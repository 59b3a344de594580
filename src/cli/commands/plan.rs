//! `iqs plan` command - resolve a sampling plan

use console::style;
use miette::{IntoDiagnostic, Result};

use crate::cli::helpers::{effective_format, format_number, require_plan, sampling_params};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::sampling::{resolve, SamplingPlan};

#[derive(clap::Args, Debug)]
pub struct PlanArgs {
    /// Number of items in the lot
    #[arg(long, short = 'n')]
    pub lot_size: u32,

    /// Inspection level (I, II, III, S1-S4)
    #[arg(long, short = 'l')]
    pub level: Option<String>,

    /// Acceptable quality limit, as printed in the table (e.g. 0.10, 1.5)
    #[arg(long, short = 'a')]
    pub aql: Option<String>,
}

pub fn run(args: PlanArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let (level, aql) = sampling_params(args.level.as_deref(), args.aql.as_deref(), &config)?;
    let plan = require_plan(resolve(args.lot_size, level, aql)?, args.lot_size, level, aql)?;

    match effective_format(global, &config) {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&plan).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&plan).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            println!("lot_size\tlevel\taql\tcode_letter\tsample_size\taccept\treject");
            println!("{}", tsv_row(&plan));
        }
        OutputFormat::Auto => print_plan(&plan),
    }
    Ok(())
}

pub(crate) fn tsv_row(plan: &SamplingPlan) -> String {
    format!(
        "{}\t{}\t{}\t{}\t{}\t{}\t{}",
        plan.lot_size,
        plan.level,
        plan.aql,
        plan.code_letter,
        plan.sample_size,
        format_number(plan.accept),
        format_number(plan.reject)
    )
}

/// Human-readable plan, shared with `iqs batch plan`
pub(crate) fn print_plan(plan: &SamplingPlan) {
    println!(
        "{}: {}  {}: {}  {}: {}",
        style("Lot size").bold(),
        plan.lot_size,
        style("Level").bold(),
        plan.level,
        style("AQL").bold(),
        plan.aql
    );
    println!(
        "{}: {} (n={})",
        style("Code letter").bold(),
        style(plan.code_letter).cyan(),
        plan.default_sample_size
    );
    println!(
        "{}: {}",
        style("Sample size").bold(),
        style(plan.sample_size).yellow()
    );
    println!(
        "{}: {}  {}: {}",
        style("Accept").bold(),
        style(format_number(plan.accept)).green(),
        style("Reject").bold(),
        style(format_number(plan.reject)).red()
    );
    if plan.arrow {
        println!(
            "{}",
            style(format!(
                "Arrow followed from sample size {}",
                plan.default_sample_size
            ))
            .dim()
        );
    }
    if plan.clamped {
        println!(
            "{}",
            style("Sample size reduced to the whole lot").dim()
        );
    }
    if plan.reject.is_none() {
        println!("{}", style("This plan never rejects the lot").dim());
    }
}
