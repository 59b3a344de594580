//! `iqs config` command - Configuration management

use clap::Subcommand;
use console::style;
use miette::{IntoDiagnostic, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::{GlobalOpts, OutputFormat};
use crate::core::config::{ENV_OVERRIDES, KEYS, LOCAL_CONFIG_FILE};
use crate::core::Config;
use crate::sampling::{Aql, InspectionLevel};

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show(ShowArgs),

    /// Set a configuration value
    Set(SetArgs),

    /// Remove a configuration value
    Unset(UnsetArgs),

    /// Show paths to configuration files
    Path,

    /// List all available configuration keys
    Keys,
}

#[derive(clap::Args, Debug)]
pub struct ShowArgs {
    /// Show only this key's value
    pub key: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct SetArgs {
    /// Configuration key (e.g. project_name, default_aql)
    pub key: String,

    /// Value to set
    pub value: String,

    /// Set in global (user) config instead of ./.iqs.yaml
    #[arg(long, short = 'g')]
    pub global: bool,
}

#[derive(clap::Args, Debug)]
pub struct UnsetArgs {
    /// Configuration key to remove
    pub key: String,

    /// Remove from global (user) config instead of ./.iqs.yaml
    #[arg(long, short = 'g')]
    pub global: bool,
}

/// Run a config subcommand
pub fn run(cmd: ConfigCommands, global: &GlobalOpts) -> Result<()> {
    match cmd {
        ConfigCommands::Show(args) => run_show(args, global),
        ConfigCommands::Set(args) => run_set(args, global),
        ConfigCommands::Unset(args) => run_unset(args, global),
        ConfigCommands::Path => run_path(),
        ConfigCommands::Keys => run_keys(),
    }
}

fn run_show(args: ShowArgs, global: &GlobalOpts) -> Result<()> {
    let config = Config::load();

    if let Some(key) = &args.key {
        ensure_valid_key(key)?;
        return match config.get(key) {
            Some(v) => {
                println!("{}", v);
                Ok(())
            }
            None => Err(miette::miette!("Key '{}' is not set", key)),
        };
    }

    match global.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config).into_diagnostic()?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yml::to_string(&config).into_diagnostic()?);
        }
        OutputFormat::Tsv => {
            for (key, _) in KEYS {
                println!("{}\t{}", key, config.get(key).unwrap_or_default());
            }
        }
        OutputFormat::Auto => {
            println!("{}", style("Effective Configuration").bold().underlined());
            println!();
            for (key, _) in KEYS {
                match config.get(key) {
                    Some(v) => println!("  {}: {}", style(key).cyan(), style(v).yellow()),
                    None => println!("  {}: {}", style(key).cyan(), style("(not set)").dim()),
                }
            }
            if !global.quiet {
                println!();
                println!("{}", style("Config Sources (in priority order):").dim());
                let vars: Vec<&str> = ENV_OVERRIDES.iter().map(|(var, _)| *var).collect();
                println!("  1. Environment variables ({})", vars.join(", "));
                println!("  2. Local config (./{})", LOCAL_CONFIG_FILE);
                println!("  3. Global config (~/.config/iqs/config.yaml)");
            }
        }
    }
    Ok(())
}

fn run_set(args: SetArgs, global: &GlobalOpts) -> Result<()> {
    ensure_valid_key(&args.key)?;
    validate_value(&args.key, &args.value)?;

    let config_path = config_path(args.global)?;
    let mut config_map = read_mapping(&config_path)?;
    config_map.insert(
        serde_yml::Value::String(args.key.clone()),
        serde_yml::Value::String(args.value.clone()),
    );

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).into_diagnostic()?;
    }
    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Set {} {} {} in {}",
            style("✓").green(),
            style(&args.key).cyan(),
            style("→").dim(),
            style(&args.value).yellow(),
            config_path.display()
        );
    }
    Ok(())
}

fn run_unset(args: UnsetArgs, global: &GlobalOpts) -> Result<()> {
    let config_path = config_path(args.global)?;
    if !config_path.exists() {
        return Err(miette::miette!(
            "Config file does not exist: {}",
            config_path.display()
        ));
    }

    let mut config_map = read_mapping(&config_path)?;
    let key = serde_yml::Value::String(args.key.clone());
    if config_map.remove(&key).is_none() {
        return Err(miette::miette!("Key '{}' not found in config", args.key));
    }

    let yaml = serde_yml::to_string(&config_map).into_diagnostic()?;
    fs::write(&config_path, yaml).into_diagnostic()?;

    if !global.quiet {
        println!(
            "{} Removed {} from {}",
            style("✓").green(),
            style(&args.key).cyan(),
            config_path.display()
        );
    }
    Ok(())
}

fn run_path() -> Result<()> {
    let global_path = config_path(true)?;
    let local_path = config_path(false)?;

    println!("{}", style("Configuration file paths:").bold());
    println!();
    for (label, path) in [("Global:", &global_path), ("Local: ", &local_path)] {
        println!("  {} {}", style(label).cyan(), path.display());
        if path.exists() {
            println!("          {}", style("(exists)").green());
        } else {
            println!("          {}", style("(not created)").dim());
        }
    }
    Ok(())
}

fn run_keys() -> Result<()> {
    println!("{}", style("Available configuration keys:").bold());
    println!();

    for (key, description) in KEYS {
        println!("  {:<16} {}", style(key).cyan(), style(description).dim());
    }

    println!();
    println!(
        "{}",
        style("Use 'iqs config set <key> <value>' to set a value.").dim()
    );
    Ok(())
}

// Helper functions

fn config_path(global: bool) -> Result<PathBuf> {
    if global {
        Config::global_config_path()
            .ok_or_else(|| miette::miette!("Could not determine global config directory"))
    } else {
        Ok(std::env::current_dir()
            .into_diagnostic()?
            .join(LOCAL_CONFIG_FILE))
    }
}

fn ensure_valid_key(key: &str) -> Result<()> {
    if Config::is_valid_key(key) {
        Ok(())
    } else {
        Err(miette::miette!(
            help = "run `iqs config keys` for the list of keys",
            "Unknown configuration key '{}'",
            key
        ))
    }
}

/// Reject values the loader would not be able to read back
fn validate_value(key: &str, value: &str) -> Result<()> {
    match key {
        "default_level" => {
            value.parse::<InspectionLevel>()?;
        }
        "default_aql" => {
            value.parse::<Aql>()?;
        }
        "default_format" => {
            <OutputFormat as clap::ValueEnum>::from_str(value, true)
                .map_err(|e| miette::miette!("{}", e))?;
        }
        _ => {}
    }
    Ok(())
}

fn read_mapping(path: &Path) -> Result<serde_yml::Mapping> {
    if !path.exists() {
        return Ok(serde_yml::Mapping::new());
    }
    let content = fs::read_to_string(path).into_diagnostic()?;
    match serde_yml::from_str::<serde_yml::Value>(&content).into_diagnostic()? {
        serde_yml::Value::Mapping(map) => Ok(map),
        serde_yml::Value::Null => Ok(serde_yml::Mapping::new()),
        _ => Err(miette::miette!(
            "{} does not contain a YAML mapping",
            path.display()
        )),
    }
}
