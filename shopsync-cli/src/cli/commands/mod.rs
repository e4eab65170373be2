pub mod output;
pub mod publications;
pub mod publish;
pub mod sync;

use anyhow::{Context, Result};
use log::debug;

use crate::api::ShopifyClient;
use crate::cli::ConnectionArgs;
use crate::config::Config;

/// Resolve the connection settings and build a client for them
pub(crate) fn connect(args: &ConnectionArgs) -> Result<ShopifyClient> {
    let config = Config::from_args(args)?;
    debug!(
        "Connecting to {} (API {}, min interval {:?}, adaptive {})",
        config.shop, config.api_version, config.throttle.min_interval, config.throttle.adaptive
    );
    ShopifyClient::from_config(&config).context("Failed to build HTTP client")
}
