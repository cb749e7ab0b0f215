//! infomodels CLI - ETL tooling for versioned healthcare data models.

mod cli;
mod commands;
mod config;
mod logging;

use std::process::ExitCode;

use clap::Parser;
use cli::{Cli, Commands};
use config::Config;

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(&cli.loglvl, cli.logfmt) {
        eprintln!("Error: {}", e);
        return ExitCode::from(1);
    }

    let config = Config::from(&cli);
    tracing::debug!(models = %config.models.display(), warehouse = %config.warehouse.display(), "starting");

    // Ok(true) means validation errors were found.
    let result = match cli.command {
        Commands::Annotate {
            dir,
            site,
            data_version,
            etl,
            json,
        } => commands::annotate::run(&config, dir, site, data_version, etl, json).map(|_| false),

        Commands::Compress { dirs, output } => commands::compress::run(dirs, output).map(|_| false),

        Commands::Expand { archives, output } => {
            commands::expand::run(archives, output).map(|_| false)
        }

        Commands::Load {
            dir,
            schema,
            replace,
        } => commands::load::run(&config, dir, schema, replace).map(|_| false),

        Commands::Constrain { schema, undo } => {
            commands::constrain::run(&config, schema, undo).map(|_| false)
        }

        Commands::Validate {
            dirs,
            sampling,
            seed,
            format,
        } => commands::validate::run(&config, dirs, sampling, seed, format),
    };

    ExitCode::from(exit_status(result))
}

/// Exit status for a command result: 1 on failure or when validation found errors.
fn exit_status(result: Result<bool, Box<dyn std::error::Error>>) -> u8 {
    match result {
        Ok(false) => 0,
        Ok(true) => 1,
        Err(e) => {
            eprintln!("Error: {}", e);
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_status() {
        assert_eq!(exit_status(Ok(false)), 0);
        assert_eq!(exit_status(Ok(true)), 1);
        assert_eq!(exit_status(Err("no metadata.csv".into())), 1);
    }
}
