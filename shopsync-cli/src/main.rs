mod api;
mod cli;
mod config;
mod publish;
mod sync;

#[cfg(test)]
mod testing;

use anyhow::Result;
use clap::Parser;
use log::{LevelFilter, debug};

use cli::commands::publications::handle_publications_command;
use cli::commands::publish::handle_publish_command;
use cli::commands::sync::handle_sync_command;
use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is fine, the environment may already be set
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(log_level(cli.verbose))
        .parse_default_env()
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    debug!("shopsync {}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Commands::Publications(args) => handle_publications_command(&cli.connection, args).await,
        Commands::Publish(args) => handle_publish_command(&cli.connection, args).await,
        Commands::Sync(args) => handle_sync_command(&cli.connection, args).await,
    }
}

fn log_level(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    }
}
