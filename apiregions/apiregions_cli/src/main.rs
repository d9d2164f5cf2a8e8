use clap::{Parser, Subcommand};
use std::process::ExitCode;

use apiregions_core::LogLevel;

mod commands;
mod integration;

use commands::check::CheckArgs;
use integration::EngineArgs;

/// API regions command line interface
///
/// Inspects region configurations and evaluates package wirings against them.
#[derive(Parser)]
#[clap(name = "apiregions", author, version, about)]
struct Cli {
    #[clap(flatten)]
    engine: EngineArgs,

    /// Log level written to stderr
    #[clap(long, global = true, default_value = "warn")]
    log_level: LogLevel,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the loaded tables and the joined region package map as JSON
    Dump,

    /// Check whether a bundle may import a package from another bundle
    Check(CheckArgs),
}

fn init_logging(level: LogLevel) -> anyhow::Result<()> {
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::from(level))
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.log_level) {
        eprintln!("Error: {:#}", e);
        return ExitCode::from(2);
    }

    let result = match &cli.command {
        Commands::Dump => commands::dump::run(&cli.engine).map(|()| true),
        Commands::Check(args) => commands::check::run(&cli.engine, args),
    };

    match result {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::from(2)
        }
    }
}
