//! Shopify Admin API client
//!
//! One client talks to both Admin endpoints of a shop:
//! - GraphQL: `POST https://<shop>/admin/api/<version>/graphql.json`
//! - REST: `https://<shop>/admin/api/<version>/<path>`
//!
//! Requests are sent one at a time through the configured [`RequestGate`].
//! There are no retries; a failed exchange is returned to the caller.

use log::{debug, trace};
use reqwest::header::ACCEPT;
use reqwest::{Method, RequestBuilder};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Instant;

use super::error::ApiError;
use super::resilience::{GateStats, RequestGate, ThrottleConfig};
use crate::config::Config;

/// Header carrying the Admin API access token
pub const ACCESS_TOKEN_HEADER: &str = "X-Shopify-Access-Token";

#[derive(Debug, Clone)]
pub struct ShopifyClient {
    http: reqwest::Client,
    base_url: String,
    access_token: String,
    gate: Arc<dyn RequestGate>,
}

impl ShopifyClient {
    /// Build a client for the shop described by `config`
    pub fn from_config(config: &Config) -> Result<Self, ApiError> {
        Self::new(
            &config.shop,
            &config.api_version,
            &config.access_token,
            &config.throttle,
        )
    }

    pub fn new(
        shop: &str,
        api_version: &str,
        access_token: &str,
        throttle: &ThrottleConfig,
    ) -> Result<Self, ApiError> {
        Self::with_gate(
            admin_base_url(shop, api_version),
            access_token,
            throttle.build_gate(),
        )
    }

    /// Client for an explicit Admin API base URL, paced by `gate`
    pub fn with_gate(
        base_url: String,
        access_token: &str,
        gate: Arc<dyn RequestGate>,
    ) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("shopsync/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self::with_http(http, base_url, access_token, gate))
    }

    fn with_http(
        http: reqwest::Client,
        base_url: String,
        access_token: &str,
        gate: Arc<dyn RequestGate>,
    ) -> Self {
        Self {
            http,
            base_url,
            access_token: access_token.to_string(),
            gate,
        }
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql.json", self.base_url)
    }

    /// REST URL for a path such as `products.json` or `/variants/1.json`
    pub fn rest_url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn gate_stats(&self) -> GateStats {
        self.gate.stats()
    }

    /// Send a GraphQL document and return the decoded body as-is
    ///
    /// Top-level `errors` and mutation `userErrors` are left in the body for
    /// the caller to inspect; only transport and HTTP failures are errors.
    pub async fn query(&self, document: &str, variables: Value) -> Result<Value, ApiError> {
        let url = self.graphql_url();
        let body = json!({ "query": document, "variables": variables });
        let builder = self.http.post(&url).json(&body);
        self.send(Method::POST, &url, builder).await
    }

    /// Send a REST request and return the decoded body
    ///
    /// Non-success statuses fail with [`ApiError::Status`] carrying the body
    /// Shopify returned, which usually names the offending field.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Value, ApiError> {
        let url = self.rest_url(path);
        let mut builder = self.http.request(method.clone(), &url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        self.send(method, &url, builder).await
    }

    async fn send(
        &self,
        method: Method,
        url: &str,
        builder: RequestBuilder,
    ) -> Result<Value, ApiError> {
        self.gate.wait().await;

        let start = Instant::now();
        debug!("{} {}", method, url);

        let response = builder
            .header(ACCESS_TOKEN_HEADER, &self.access_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        self.gate.observe(response.headers());

        let status = response.status();
        let text = response.text().await?;
        debug!(
            "{} {} -> {} in {:.2}ms",
            method,
            url,
            status.as_u16(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        trace!("Response body: {}", text);

        if !status.is_success() {
            return Err(ApiError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        decode_body(&text)
    }
}

/// Build `https://<shop>/admin/api/<version>` from a shop domain
pub fn admin_base_url(shop: &str, api_version: &str) -> String {
    format!("https://{}/admin/api/{}", shop, api_version)
}

/// Decode a response body; an empty body (e.g. 204) is `null`
fn decode_body(text: &str) -> Result<Value, ApiError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    Ok(serde_json::from_str(text)?)
}
