//! Runtime configuration
//!
//! Values come from the process environment (after `.env` is loaded) or the
//! matching command-line flags, which take precedence. See [`ConnectionArgs`].

use anyhow::{Result, bail};

use crate::api::ThrottleConfig;
use crate::cli::ConnectionArgs;

/// Admin API version used when `API_VERSION` is not set
pub const DEFAULT_API_VERSION: &str = "2024-10";

/// Spreadsheet read by `sync` when `INPUT_FILE` is not set
pub const DEFAULT_INPUT_FILE: &str = "products.csv";

/// Resolved connection settings for one run
#[derive(Debug, Clone)]
pub struct Config {
    /// Shop domain, e.g. `my-store.myshopify.com`
    pub shop: String,
    pub access_token: String,
    pub api_version: String,
    pub throttle: ThrottleConfig,
}

impl Config {
    pub fn from_args(args: &ConnectionArgs) -> Result<Self> {
        let shop = match args.shop.as_deref().map(normalize_shop_domain) {
            Some(shop) if !shop.is_empty() => shop,
            _ => bail!("SHOP is not set. Pass --shop or set SHOP in the environment or .env"),
        };

        let access_token = match args.access_token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => token.to_string(),
            _ => bail!(
                "ADMIN_API_ACCESS_TOKEN is not set. Pass --access-token or set ADMIN_API_ACCESS_TOKEN in the environment or .env"
            ),
        };

        let api_version = match args.api_version.trim() {
            "" => DEFAULT_API_VERSION.to_string(),
            version => version.to_string(),
        };

        let throttle = ThrottleConfig::builder()
            .min_interval_ms(args.min_interval_ms)
            .adaptive(args.adaptive_throttle)
            .build();

        Ok(Self {
            shop,
            access_token,
            api_version,
            throttle,
        })
    }
}

/// Reduce a shop setting to a bare domain
///
/// Accepts `my-store.myshopify.com`, `https://my-store.myshopify.com/` or
/// `https://my-store.myshopify.com/admin`.
pub fn normalize_shop_domain(raw: &str) -> String {
    let trimmed = raw.trim();
    let without_scheme = trimmed
        .strip_prefix("https://")
        .or_else(|| trimmed.strip_prefix("http://"))
        .unwrap_or(trimmed);
    without_scheme
        .split('/')
        .next()
        .unwrap_or_default()
        .to_lowercase()
}
