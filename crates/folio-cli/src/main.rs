mod cli;
mod commands;
mod completions;
mod config;
mod error;
mod output;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use config::CliConfig;
use folio_store::{AppStore, HttpPortfolioApi};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    if let Err(err) = run(cli).await {
        error::handle_error(err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        completions::generate_completions(shell);
        return Ok(());
    }

    let _guard = init_logging(cli.verbose);
    let config = CliConfig::load(cli.config.as_deref());

    match cli.command {
        Commands::Chat(args) => {
            let backend = config.agent_backend(cli.backend_url.as_deref());
            let chat_config = config.chat_config(backend, !args.no_greeting);
            commands::chat::run(args, chat_config, cli.format).await
        }
        Commands::Profile => {
            let api = HttpPortfolioApi::new(config.main_server(cli.server_url.as_deref()));
            commands::profile::run(&AppStore::new(), &api, cli.format).await
        }
        Commands::Projects(args) => {
            let api = HttpPortfolioApi::new(config.main_server(cli.server_url.as_deref()));
            commands::projects::run(&AppStore::new(), &api, args, cli.format).await
        }
        Commands::Completions { .. } => Ok(()),
    }
}

/// Log to a daily file so terminal output stays clean.
fn init_logging(verbose: bool) -> Option<WorkerGuard> {
    let log_dir = dirs::data_dir()?.join("folio").join("logs");
    std::fs::create_dir_all(&log_dir).ok()?;

    let file_appender = tracing_appender::rolling::daily(log_dir, "folio.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking)
        .with_ansi(false)
        .with_target(false)
        .with_level(true)
        .init();

    Some(guard)
}
