//! `iqs completions` - shell completion scripts
//!
//! ```bash
//! source <(iqs completions bash)
//! iqs completions fish -o ~/.config/fish/completions/iqs.fish
//! ```

use clap::CommandFactory;
use clap_complete::{generate, Shell};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use crate::cli::{Cli, GlobalOpts};

#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,

    /// Write the script to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub fn run(args: CompletionsArgs, global: &GlobalOpts) -> Result<()> {
    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    match args.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(&path).into_diagnostic()?);
            generate(args.shell, &mut cmd, bin_name, &mut writer);
            writer.flush().into_diagnostic()?;
            if !global.quiet {
                eprintln!("{} completions written to {}", args.shell, path.display());
            }
        }
        None => generate(args.shell, &mut cmd, bin_name, &mut io::stdout()),
    }
    Ok(())
}
