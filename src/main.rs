//! agent-bench CLI entry point.

use clap::Parser;
use std::process::ExitCode;

use agent_bench::cli::commands::run::HistoryNotSaved;
use agent_bench::cli::{commands, handle_error, Cli, Commands};
use agent_bench::infrastructure::logging::LoggerImpl;
use agent_bench::ConfigLoader;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let config = match ConfigLoader::load_with(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            handle_error(&err, cli.json);
            return ExitCode::FAILURE;
        }
    };

    // Guard flushes file logs on drop
    let _logger = match LoggerImpl::init(&config.logging, cli.verbose) {
        Ok(logger) => Some(logger),
        Err(err) => {
            eprintln!("warning: logging disabled: {err:#}");
            None
        }
    };

    let result = match cli.command.unwrap_or_default() {
        Commands::Run(args) => commands::run::execute(args, config, cli.json).await,
        Commands::History(args) => commands::history::execute(args, config, cli.json).await,
        Commands::Agents(args) => commands::agents::execute(args, config, cli.json).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        // Report already carries the failure
        Err(err) if err.is::<HistoryNotSaved>() => ExitCode::FAILURE,
        Err(err) => {
            handle_error(&err, cli.json);
            ExitCode::FAILURE
        }
    }
}
