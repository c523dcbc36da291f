mod adapters;
mod cli;
mod config;
mod core;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::context::Context;
use cli::{Cli, Commands};

/// Overrides the log filter, e.g. `SEALMAIL_LOG=sealmail=trace`.
const LOG_ENV: &str = "SEALMAIL_LOG";

fn init_logging(verbose: bool, quiet: bool) {
    let default_level = if verbose {
        "debug"
    } else if quiet {
        "error"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(args: &Cli) -> core::errors::Result<()> {
    let ctx = Context::from_cli(args)?;

    match &args.command {
        Commands::Keys { action } => cli::commands::keys::execute(&ctx, action),
        Commands::Encrypt { crypto, file } => {
            cli::commands::encrypt::execute(&ctx, crypto, file.as_deref())
        }
        Commands::Send { mail, crypto, file } => {
            cli::commands::send::execute(&ctx, mail, crypto, file.as_deref())
        }
        Commands::SendKey { key_id, mail } => cli::commands::send::execute_key(&ctx, key_id, mail),
        Commands::Check => cli::commands::check::execute(&ctx),
    }
}

fn main() {
    let args = Cli::parse();
    init_logging(args.verbose, args.quiet);

    if let Err(e) = run(&args) {
        cli::output::error(&format!("Error: {e}"));
        std::process::exit(1);
    }
}
