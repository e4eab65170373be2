//! Command-line interface

pub mod commands;

use clap::{Args, Parser, Subcommand};

use crate::api::resilience::config::DEFAULT_MIN_INTERVAL_MS;
use crate::config::DEFAULT_API_VERSION;
use commands::publications::PublicationsCommand;
use commands::publish::PublishCommand;
use commands::sync::SyncCommand;

#[derive(Parser)]
#[command(name = "shopsync")]
#[command(about = "Sync a product spreadsheet into a Shopify store")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub connection: ConnectionArgs,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the sales channels products can be published to
    Publications(PublicationsCommand),
    /// Publish existing products to a sales channel
    Publish(PublishCommand),
    /// Create or update products and variants from a CSV file
    Sync(SyncCommand),
}

/// Shop connection settings shared by every command
#[derive(Args, Debug, Clone)]
pub struct ConnectionArgs {
    /// Shop domain, e.g. my-store.myshopify.com
    #[arg(long, env = "SHOP", global = true)]
    pub shop: Option<String>,

    /// Admin API access token
    #[arg(long, env = "ADMIN_API_ACCESS_TOKEN", hide_env_values = true, global = true)]
    pub access_token: Option<String>,

    /// Admin API version
    #[arg(long, env = "API_VERSION", default_value = DEFAULT_API_VERSION, global = true)]
    pub api_version: String,

    /// Minimum milliseconds between API calls (0 disables pacing)
    #[arg(long, env = "SHOPSYNC_MIN_INTERVAL_MS", default_value_t = DEFAULT_MIN_INTERVAL_MS, global = true)]
    pub min_interval_ms: u64,

    /// Slow down further when the shop reports its call bucket is nearly full
    #[arg(long, global = true)]
    pub adaptive_throttle: bool,
}
