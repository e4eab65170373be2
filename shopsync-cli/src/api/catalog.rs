//! Catalog operations used by the sync and publish commands
//!
//! [`CatalogApi`] is the seam between the reconciliation logic and Shopify.
//! [`ShopifyClient`] implements it over the Admin REST and GraphQL endpoints.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Value, json};

use super::client::ShopifyClient;
use super::error::ApiError;
use super::graphql::{
    FIND_PRODUCT_QUERY, PUBLISH_PRODUCT_MUTATION, parse_product_search, parse_publish_outcome,
    title_filter,
};
use super::models::{
    ProductId, ProductPayload, ProductRecord, ProductRef, PublishOutcome, Variant, VariantPayload,
};

#[async_trait]
pub trait CatalogApi: Send + Sync {
    /// First product the remote search returns for `title:<title>`
    async fn find_product_by_title(&self, title: &str) -> Result<Option<ProductRef>>;

    /// `POST products.json`
    async fn create_product(&self, product: &ProductPayload) -> Result<ProductRecord>;

    /// `PUT products/<id>.json`
    async fn update_product(&self, id: ProductId, product: &ProductPayload) -> Result<()>;

    /// `publishablePublish` mutation; server-reported problems are data, not errors
    async fn publish_product(
        &self,
        product_gid: &str,
        publication_id: &str,
    ) -> Result<PublishOutcome>;

    /// `GET products/<id>/variants.json`
    async fn list_variants(&self, product: ProductId) -> Result<Vec<Variant>>;

    /// `POST variants.json`
    async fn create_variant(&self, variant: &VariantPayload) -> Result<()>;

    /// `PUT variants/<id>.json`
    async fn update_variant(&self, variant_id: u64, variant: &VariantPayload) -> Result<()>;
}

/// Deserialize `body[key]` into `T`
fn field<T: serde::de::DeserializeOwned>(body: Value, key: &str) -> Result<T, ApiError> {
    match body {
        Value::Object(mut map) => match map.remove(key) {
            Some(value) => Ok(serde_json::from_value(value)?),
            None => Err(ApiError::unexpected(format!("response has no '{}' field", key))),
        },
        other => Err(ApiError::unexpected(format!(
            "expected an object with '{}', got {}",
            key, other
        ))),
    }
}

#[async_trait]
impl CatalogApi for ShopifyClient {
    async fn find_product_by_title(&self, title: &str) -> Result<Option<ProductRef>> {
        let body = self
            .query(FIND_PRODUCT_QUERY, json!({ "query": title_filter(title) }))
            .await
            .with_context(|| format!("Failed to search for product '{}'", title))?;

        Ok(parse_product_search(&body)
            .with_context(|| format!("Failed to read search result for '{}'", title))?)
    }

    async fn create_product(&self, product: &ProductPayload) -> Result<ProductRecord> {
        let body = self
            .request(Method::POST, "products.json", Some(&json!({ "product": product })))
            .await
            .with_context(|| format!("Failed to create product '{}'", product.title))?;

        Ok(field(body, "product").context("Failed to read created product")?)
    }

    async fn update_product(&self, id: ProductId, product: &ProductPayload) -> Result<()> {
        let payload = ProductPayload {
            id: Some(id),
            ..product.clone()
        };
        self.request(
            Method::PUT,
            &format!("products/{}.json", id),
            Some(&json!({ "product": payload })),
        )
        .await
        .with_context(|| format!("Failed to update product {} ('{}')", id, product.title))?;

        Ok(())
    }

    async fn publish_product(
        &self,
        product_gid: &str,
        publication_id: &str,
    ) -> Result<PublishOutcome> {
        let body = self
            .query(
                PUBLISH_PRODUCT_MUTATION,
                json!({ "id": product_gid, "pub": publication_id }),
            )
            .await
            .with_context(|| format!("Failed to publish {}", product_gid))?;

        Ok(parse_publish_outcome(&body))
    }

    async fn list_variants(&self, product: ProductId) -> Result<Vec<Variant>> {
        let body = self
            .request(
                Method::GET,
                &format!("products/{}/variants.json", product),
                None,
            )
            .await
            .with_context(|| format!("Failed to list variants of product {}", product))?;

        Ok(field(body, "variants").context("Failed to read variant list")?)
    }

    async fn create_variant(&self, variant: &VariantPayload) -> Result<()> {
        self.request(
            Method::POST,
            "variants.json",
            Some(&json!({ "variant": variant })),
        )
        .await
        .with_context(|| format!("Failed to create variant '{}'", variant.sku))?;

        Ok(())
    }

    async fn update_variant(&self, variant_id: u64, variant: &VariantPayload) -> Result<()> {
        self.request(
            Method::PUT,
            &format!("variants/{}.json", variant_id),
            Some(&json!({ "variant": variant })),
        )
        .await
        .with_context(|| format!("Failed to update variant {} ('{}')", variant_id, variant.sku))?;

        Ok(())
    }
}
