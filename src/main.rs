use clap::Parser;
use miette::Result;
use iqs::cli::{Cli, Commands};
use iqs::logging::{init_logging, LogConfig};

fn main() -> Result<()> {
    // Reset SIGPIPE to default behavior (terminate silently) for proper Unix piping.
    #[cfg(unix)]
    {
        unsafe {
            libc::signal(libc::SIGPIPE, libc::SIG_DFL);
        }
    }
    miette::set_hook(Box::new(|_| {
        Box::new(
            miette::MietteHandlerOpts::new()
                .terminal_links(true)
                .unicode(true)
                .context_lines(2)
                .build(),
        )
    }))?;

    let cli = Cli::parse();
    let global = cli.global;

    let log_config =
        LogConfig::from_verbosity(global.verbose, global.quiet).with_log_file(global.log_file.clone());
    init_logging(&log_config).map_err(|e| miette::miette!("{}", e))?;

    match cli.command {
        Commands::Plan(args) => iqs::cli::commands::plan::run(args, &global),
        Commands::Table(args) => iqs::cli::commands::table::run(args, &global),
        Commands::Batch(cmd) => iqs::cli::commands::batch::run(cmd, &global),
        Commands::Review(args) => iqs::cli::commands::review::run(args, &global),
        Commands::Config(cmd) => iqs::cli::commands::config::run(cmd, &global),
        Commands::Completions(args) => iqs::cli::commands::completions::run(args, &global),
    }
}
