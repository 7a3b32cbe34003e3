//! Main entry point for the oppguard CLI.
//!
//! Evaluates the storage-boundary and content gates for a single reference:
//! - `check-path`: Is the reference inside a trusted storage root?
//! - `check-content`: Is the reference served by a forbidden provider?
//! - `validate`: Is a configuration file well-formed?
//! - `show-config`: What configuration is in effect?

use clap::Parser;
use oppguard_cli::cli::{Cli, Command};
use oppguard_cli::utils::GlobalOptions;

fn main() {
    let cli = Cli::parse();

    let _logger = oppguard::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        config: cli.config,
        no_env: cli.no_env,
    };

    let result = match cli.command {
        Command::CheckPath(cmd) => cmd.execute(&global),
        Command::CheckContent(cmd) => cmd.execute(&global),
        Command::Validate(cmd) => cmd.execute(&global),
        Command::ShowConfig(cmd) => cmd.execute(&global),
    };

    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            if !global.quiet {
                eprintln!("Error: {e}");
            }
            std::process::exit(e.exit_code());
        }
    }
}
