//! Shopify Admin API access
//!
//! A thin client over the Admin GraphQL and REST endpoints, the models it
//! exchanges, and the request pacing every call goes through.

pub mod catalog;
pub mod client;
pub mod error;
pub mod graphql;
pub mod models;
pub mod resilience;

pub use catalog::CatalogApi;
pub use client::ShopifyClient;
pub use resilience::ThrottleConfig;
