//! Shopify Admin API models
//!
//! REST payloads use snake_case field names, GraphQL nodes use camelCase.

use serde::{Deserialize, Serialize};
use std::fmt;

/// GID prefix for products in the GraphQL Admin API
pub const PRODUCT_GID_PREFIX: &str = "gid://shopify/Product/";

/// GID prefix for publications (sales channels)
pub const PUBLICATION_GID_PREFIX: &str = "gid://shopify/Publication/";

/// Numeric product id as used by the REST API
///
/// The GraphQL API addresses the same product as `gid://shopify/Product/<id>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(pub u64);

impl ProductId {
    /// Strip the product GID prefix, e.g. `gid://shopify/Product/42` -> `42`
    pub fn from_gid(gid: &str) -> Option<Self> {
        gid.trim()
            .strip_prefix(PRODUCT_GID_PREFIX)?
            .parse()
            .ok()
            .map(Self)
    }

    /// Accept either a product GID or a bare numeric id
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.starts_with("gid://") {
            Self::from_gid(trimmed)
        } else {
            trimmed.parse().ok().map(Self)
        }
    }

    pub fn gid(&self) -> String {
        format!("{}{}", PRODUCT_GID_PREFIX, self.0)
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Product node returned by the title search
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRef {
    /// Product GID
    #[serde(rename = "id")]
    pub gid: String,
    pub title: String,
}

impl ProductRef {
    pub fn product_id(&self) -> Option<ProductId> {
        ProductId::from_gid(&self.gid)
    }
}

/// Product as returned by the REST create/update endpoints
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    /// GID of the same product, for GraphQL calls
    pub admin_graphql_api_id: String,
    #[serde(default)]
    pub title: Option<String>,
}

/// Image reference sent with a product
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePayload {
    pub src: String,
}

/// Writable product fields for REST create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductPayload {
    /// Only set on updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub title: String,
    pub body_html: String,
    pub product_type: String,
    pub vendor: String,
    /// Comma-separated tag list
    pub tags: String,
    /// Empty when the row has no image, which leaves the product without images
    pub images: Vec<ImagePayload>,
}

/// Product variant as returned by `products/<id>/variants.json`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Variant {
    pub id: u64,
    #[serde(default)]
    pub product_id: Option<ProductId>,
    /// Shopify returns `null` for variants without a SKU
    #[serde(default)]
    pub sku: Option<String>,
    #[serde(default)]
    pub price: Option<String>,
    #[serde(default)]
    pub inventory_quantity: Option<i64>,
}

/// Writable variant fields for REST create/update
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariantPayload {
    /// Only set on updates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    /// Only set on creates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<ProductId>,
    pub price: String,
    pub sku: String,
    pub inventory_quantity: u64,
}

/// Sales channel a product can be published to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: String,
    pub name: String,
}

/// Validation error reported inside a GraphQL mutation payload
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UserError {
    #[serde(default)]
    pub field: Option<Vec<String>>,
    pub message: String,
}

impl fmt::Display for UserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.field {
            Some(path) if !path.is_empty() => write!(f, "{}: {}", path.join("."), self.message),
            _ => write!(f, "{}", self.message),
        }
    }
}

/// Result of a `publishablePublish` mutation
///
/// `problems` collects both top-level GraphQL errors and mutation user errors;
/// the publish went through only when it is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOutcome {
    pub product_gid: Option<String>,
    pub title: Option<String>,
    pub published_at: Option<String>,
    pub problems: Vec<String>,
}

impl PublishOutcome {
    pub fn is_published(&self) -> bool {
        self.problems.is_empty()
    }
}

/// Normalize a publication id: bare numbers get the publication GID prefix
pub fn publication_gid(input: &str) -> String {
    let trimmed = input.trim();
    if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
        format!("{}{}", PUBLICATION_GID_PREFIX, trimmed)
    } else {
        trimmed.to_string()
    }
}
