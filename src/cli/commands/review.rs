//! `iqs review` command - accept/reject loop over a random sample
//!
//! Draws the plan's sample from the batch folder, asks for a verdict on
//! every image until the plan decides, then writes the signed report.
//! The plan comes from the tables (`--level`/`--aql`) or is given by hand
//! (`--sample-size`/`--reject-at`).

use console::style;
use dialoguer::{theme::ColorfulTheme, Select};
use miette::{IntoDiagnostic, Result};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::cli::helpers::{effective_format, require_plan, sampling_params, write_output};
use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::{inspect_batch, list_images, sampling_rng, select_sample, subfolders, Config};
use crate::entities::{
    RejectionReason, ReviewOutcome, ReviewSession, Reviewers, SamplingReport,
};
use crate::sampling::{resolve, ManualPlan, ReviewPlan};

#[derive(clap::Args, Debug)]
pub struct ReviewArgs {
    /// Batch folder
    pub folder: PathBuf,

    /// Inspection level (I, II, III, S1-S4)
    #[arg(long, short = 'l')]
    pub level: Option<String>,

    /// Acceptable quality limit (e.g. 0.10, 1.5)
    #[arg(long, short = 'a')]
    pub aql: Option<String>,

    /// Inspect this many images instead of the tabulated sample size
    #[arg(
        long,
        requires = "reject_at",
        conflicts_with_all = ["level", "aql"]
    )]
    pub sample_size: Option<u32>,

    /// Fail the batch at this many rejections (with --sample-size)
    #[arg(
        long,
        requires = "sample_size",
        conflicts_with_all = ["level", "aql"]
    )]
    pub reject_at: Option<u32>,

    /// Reviewer signing for the authority
    #[arg(long)]
    pub authority: Option<String>,

    /// Reviewer signing for the contractor
    #[arg(long)]
    pub contractor: Option<String>,

    /// Samplings this batch already went through
    #[arg(long, default_value_t = 0)]
    pub attempts: u32,

    /// Seed for a reproducible draw
    #[arg(long)]
    pub seed: Option<u64>,

    /// Verdicts in review order instead of prompting, comma-separated:
    /// `ok`, `abort`, or a rejection reason (e.g. `out_of_focus`)
    #[arg(long, value_delimiter = ',')]
    pub verdicts: Option<Vec<String>>,

    /// Write the report to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Accept,
    Reject(RejectionReason),
    Abort,
}

impl std::str::FromStr for Verdict {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ok" | "accept" | "a" => Ok(Verdict::Accept),
            "abort" | "q" => Ok(Verdict::Abort),
            other => other.parse().map(Verdict::Reject),
        }
    }
}

pub fn run(args: ReviewArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();
    let reviewers = Reviewers::new(
        args.authority
            .clone()
            .or_else(|| config.authority.clone())
            .unwrap_or_default(),
        args.contractor
            .clone()
            .or_else(|| config.contractor.clone())
            .unwrap_or_default(),
    )
    .map_err(|e| {
        miette::miette!(
            help = "pass --authority and --contractor or set them in the configuration",
            "{}",
            e
        )
    })?;

    // Parse scripted verdicts up front so typos fail before the draw
    let mut scripted = match &args.verdicts {
        Some(list) => Some(
            list.iter()
                .map(|v| v.parse::<Verdict>())
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|e| miette::miette!("{}", e))?
                .into_iter(),
        ),
        None => None,
    };

    let mut batch = inspect_batch(&args.folder)
        .map_err(|e| miette::miette!("{}", e))?
        .with_attempts(args.attempts);
    let lot_size = batch.lot_size();
    let plan: ReviewPlan = match (args.sample_size, args.reject_at) {
        (Some(sample_size), Some(reject)) => ManualPlan::new(lot_size, sample_size, reject)?.into(),
        _ => {
            let (level, aql) =
                sampling_params(args.level.as_deref(), args.aql.as_deref(), &config)?;
            require_plan(resolve(lot_size, level, aql)?, lot_size, level, aql)?.into()
        }
    };
    debug!(batch = %batch.name, mode = %plan.mode(), "plan chosen");

    let images = list_images(&args.folder).map_err(|e| miette::miette!("{}", e))?;
    let mut rng = sampling_rng(args.seed);
    let sample = select_sample(&images, plan.sample_size() as usize, &mut rng)
        .map_err(|e| miette::miette!("{}", e))?;
    debug!(batch = %batch.name, sample = sample.len(), "sample drawn");

    let mut session =
        ReviewSession::new(&batch.name, plan, sample).map_err(|e| miette::miette!("{}", e))?;

    if !global.quiet {
        eprintln!(
            "{} {}: inspect {} of {} image(s), reject at {} ({} plan)",
            style("◆").cyan(),
            style(&batch.name).bold(),
            style(plan.sample_size()).yellow(),
            lot_size,
            plan.reject()
                .map(|r| r.max(1).to_string())
                .unwrap_or_else(|| "never".to_string()),
            plan.mode()
        );
    }

    let theme = ColorfulTheme::default();
    while let Some(item) = session.current().map(str::to_string) {
        let verdict = match scripted.as_mut() {
            Some(verdicts) => verdicts.next().ok_or_else(|| {
                miette::miette!(
                    "ran out of verdicts at item {} of {}",
                    session.progress().0,
                    session.progress().1
                )
            })?,
            None => prompt(&theme, &session, &args.folder, &item)?,
        };

        match verdict {
            Verdict::Accept => {
                session.accept().map_err(|e| miette::miette!("{}", e))?;
            }
            Verdict::Reject(reason) => {
                session.reject(reason).map_err(|e| miette::miette!("{}", e))?;
            }
            Verdict::Abort => session.abort(),
        }
    }

    if let Some(rest) = scripted {
        let unused = rest.count();
        if unused > 0 {
            return Err(miette::miette!(
                help = "the drawn sample decided the batch earlier; check the verdict list",
                "{} verdict(s) left over after the review of {} finished ({})",
                unused,
                batch.name,
                session.outcome()
            ));
        }
    }

    let outcome = session.outcome();
    if outcome == ReviewOutcome::Aborted {
        if !global.quiet {
            eprintln!(
                "{} Review aborted, {} left unchanged",
                style("!").yellow(),
                batch.name
            );
        }
        return Ok(());
    }

    let status = batch.record_outcome(outcome);
    let report = SamplingReport::from_session(&session, &batch, reviewers)
        .map_err(|e| miette::miette!("{}", e))?
        .with_project(config.project_name.clone())
        .with_location(config.location.clone())
        .with_subfolders(subfolders(&args.folder).map_err(|e| miette::miette!("{}", e))?);

    let content = match effective_format(global, &config) {
        OutputFormat::Json => format!("{}\n", report.to_json().into_diagnostic()?),
        _ => report.to_yaml().into_diagnostic()?,
    };

    if !global.quiet {
        let verdict = match outcome {
            ReviewOutcome::Accepted => style(outcome.to_string()).green(),
            ReviewOutcome::Rejected => style(outcome.to_string()).red(),
            _ => style(outcome.to_string()).yellow(),
        };
        eprintln!(
            "{} {} after {} image(s), {} rejection(s): status {}",
            style(&batch.name).bold(),
            verdict,
            session.inspected().len(),
            session.rejections(),
            style(status).cyan()
        );
    }

    write_output(&content, args.output, global.quiet)
}

fn prompt(
    theme: &ColorfulTheme,
    session: &ReviewSession,
    folder: &Path,
    item: &str,
) -> Result<Verdict> {
    let (position, total) = session.progress();
    eprintln!();
    eprintln!(
        "{} [{}/{}] {}",
        style("◆").cyan(),
        position,
        total,
        style(folder.join(item).display()).bold()
    );

    let mut choices = vec!["Accept".to_string()];
    choices.extend(
        RejectionReason::ALL
            .iter()
            .map(|r| format!("Reject: {}", r.label())),
    );
    choices.push("Abort review".to_string());

    let selection = Select::with_theme(theme)
        .with_prompt(format!("Verdict ({} rejection(s) so far)", session.rejections()))
        .items(&choices)
        .default(0)
        .interact()
        .into_diagnostic()?;

    Ok(match selection {
        0 => Verdict::Accept,
        i if i <= RejectionReason::ALL.len() => Verdict::Reject(RejectionReason::ALL[i - 1]),
        _ => Verdict::Abort,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verdict_parsing() {
        assert_eq!("ok".parse::<Verdict>().unwrap(), Verdict::Accept);
        assert_eq!(" Accept ".parse::<Verdict>().unwrap(), Verdict::Accept);
        assert_eq!("abort".parse::<Verdict>().unwrap(), Verdict::Abort);
        assert_eq!(
            "out_of_focus".parse::<Verdict>().unwrap(),
            Verdict::Reject(RejectionReason::OutOfFocus)
        );
        assert_eq!(
            "concession".parse::<Verdict>().unwrap(),
            Verdict::Reject(RejectionReason::Concession)
        );
        assert!("maybe".parse::<Verdict>().is_err());
    }
}
