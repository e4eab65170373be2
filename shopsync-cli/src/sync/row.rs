//! Spreadsheet row model

use log::debug;
use serde::Deserialize;

use crate::api::models::{ImagePayload, ProductPayload, VariantPayload};

/// One spreadsheet row, keyed by the CSV header names
///
/// No schema is enforced: missing columns are empty strings and values are
/// passed through to Shopify as-is, except for the inventory quantity.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductRow {
    pub title: String,
    pub description_html: String,
    pub product_type: String,
    pub vendor: String,
    pub tags: String,
    pub image: String,
    pub sku: String,
    pub variant_price: String,
    pub inventory_quantity: String,
}

impl ProductRow {
    /// On-hand quantity; blank, negative or non-numeric values become 0
    pub fn quantity(&self) -> u64 {
        let raw = self.inventory_quantity.trim();
        match raw.parse::<u64>() {
            Ok(quantity) => quantity,
            Err(_) => {
                if !raw.is_empty() {
                    debug!(
                        "Row '{}': inventoryQuantity '{}' is not a whole number, using 0",
                        self.title, raw
                    );
                }
                0
            }
        }
    }

    /// Product fields for the REST create/update call
    pub fn product_payload(&self) -> ProductPayload {
        let image = self.image.trim();
        let images = if image.is_empty() {
            Vec::new()
        } else {
            vec![ImagePayload {
                src: image.to_string(),
            }]
        };

        ProductPayload {
            id: None,
            title: self.title.clone(),
            body_html: self.description_html.clone(),
            product_type: self.product_type.clone(),
            vendor: self.vendor.clone(),
            tags: self.tags.clone(),
            images,
        }
    }

    /// Variant fields without `id`/`product_id`; the reconciler fills in one of them
    pub fn variant_payload(&self) -> VariantPayload {
        VariantPayload {
            id: None,
            product_id: None,
            price: self.variant_price.clone(),
            sku: self.sku.clone(),
            inventory_quantity: self.quantity(),
        }
    }
}
