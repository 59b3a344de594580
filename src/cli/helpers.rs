//! Shared helper functions for CLI commands

use clap::ValueEnum;
use console::style;
use miette::{Diagnostic, IntoDiagnostic, Result};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use thiserror::Error;

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::Config;
use crate::sampling::{Aql, InspectionLevel, SamplingPlan};

/// Failures that only exist at the command line
#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error("no sampling plan is defined for a lot of {lot_size} at level {level}, AQL {aql}")]
    #[diagnostic(
        code(iqs::sampling::no_plan),
        help("choose a different AQL or inspection level")
    )]
    NoPlanDefined {
        lot_size: u32,
        level: InspectionLevel,
        aql: Aql,
    },

    #[error("no {what} given")]
    #[diagnostic(
        code(iqs::cli::missing_parameter),
        help("pass {flag} or set it with `iqs config set {key} <value>`")
    )]
    MissingParameter {
        what: &'static str,
        flag: &'static str,
        key: &'static str,
    },
}

/// Inspection level and AQL from flags, falling back to configuration
pub fn sampling_params(
    level: Option<&str>,
    aql: Option<&str>,
    config: &Config,
) -> Result<(InspectionLevel, Aql)> {
    let level = match level {
        Some(level) => level.parse::<InspectionLevel>()?,
        None => config.default_level.ok_or(CliError::MissingParameter {
            what: "inspection level",
            flag: "--level",
            key: "default_level",
        })?,
    };
    let aql = match aql {
        Some(aql) => aql.parse::<Aql>()?,
        None => config.default_aql.ok_or(CliError::MissingParameter {
            what: "AQL",
            flag: "--aql",
            key: "default_aql",
        })?,
    };
    Ok((level, aql))
}

/// Turn an undefined table cell into a diagnostic
pub fn require_plan(
    plan: Option<SamplingPlan>,
    lot_size: u32,
    level: InspectionLevel,
    aql: Aql,
) -> Result<SamplingPlan> {
    plan.ok_or_else(|| {
        CliError::NoPlanDefined {
            lot_size,
            level,
            aql,
        }
        .into()
    })
}

/// `--format`, or the configured default when left on auto
pub fn effective_format(global: &GlobalOpts, config: &Config) -> OutputFormat {
    if global.format != OutputFormat::Auto {
        return global.format;
    }
    config
        .default_format
        .as_deref()
        .and_then(|f| OutputFormat::from_str(f, true).ok())
        .unwrap_or(OutputFormat::Auto)
}

/// Display an optional acceptance/rejection number
pub fn format_number(n: Option<u32>) -> String {
    n.map(|n| n.to_string()).unwrap_or_else(|| "-".to_string())
}

/// Write to a file, or to stdout when no path is given
pub fn write_output(content: &str, output_path: Option<PathBuf>, quiet: bool) -> Result<()> {
    match output_path {
        Some(path) => {
            let file = File::create(&path).into_diagnostic()?;
            let mut writer = BufWriter::new(file);
            writer.write_all(content.as_bytes()).into_diagnostic()?;
            writer.flush().into_diagnostic()?;
            if !quiet {
                eprintln!(
                    "{} Report written to {}",
                    style("✓").green(),
                    style(path.display()).cyan()
                );
            }
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn global(format: OutputFormat) -> GlobalOpts {
        GlobalOpts {
            format,
            quiet: false,
            verbose: 0,
            log_file: None,
        }
    }

    #[test]
    fn test_flags_win_over_config() {
        let config = Config {
            default_level: Some(InspectionLevel::I),
            default_aql: Some(Aql::Aql40),
            ..Default::default()
        };
        let (level, aql) = sampling_params(Some("III"), None, &config).unwrap();
        assert_eq!(level, InspectionLevel::III);
        assert_eq!(aql, Aql::Aql40);
    }

    #[test]
    fn test_missing_parameter() {
        let config = Config::default();
        assert!(sampling_params(Some("II"), None, &config).is_err());
        assert!(sampling_params(None, Some("1.0"), &config).is_err());
        assert!(sampling_params(Some("II"), Some("0.1"), &config).is_err());
    }

    #[test]
    fn test_effective_format() {
        let config = Config {
            default_format: Some("json".to_string()),
            ..Default::default()
        };
        assert_eq!(
            effective_format(&global(OutputFormat::Auto), &config),
            OutputFormat::Json
        );
        assert_eq!(
            effective_format(&global(OutputFormat::Tsv), &config),
            OutputFormat::Tsv
        );
        assert_eq!(
            effective_format(&global(OutputFormat::Auto), &Config::default()),
            OutputFormat::Auto
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(Some(0)), "0");
        assert_eq!(format_number(None), "-");
    }
}
