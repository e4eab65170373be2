//! Errors raised by the Admin API client

use thiserror::Error;

/// Failure of a single Admin API exchange
///
/// GraphQL `errors`/`userErrors` are not represented here: the GraphQL
/// endpoint reports them as data and callers inspect the decoded body.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection, TLS or body streaming failure
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success HTTP status, with the response body as returned by Shopify
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    /// The response body was not valid JSON
    #[error("failed to decode response body: {0}")]
    Decode(#[from] serde_json::Error),

    /// The body decoded but did not have the expected shape
    #[error("unexpected response: {0}")]
    UnexpectedResponse(String),
}

impl ApiError {
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::UnexpectedResponse(message.into())
    }
}
