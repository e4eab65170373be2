//! In-memory catalog for tests
//!
//! Records every call in order and keeps enough state (products by title,
//! variants by SKU) for repeated runs to behave like the real shop.

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::api::CatalogApi;
use crate::api::models::{
    ProductId, ProductPayload, ProductRecord, ProductRef, PublishOutcome, Variant, VariantPayload,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    FindProduct(String),
    CreateProduct(String),
    UpdateProduct(ProductId, String),
    Publish {
        gid: String,
        publication: String,
    },
    ListVariants(ProductId),
    CreateVariant {
        product_id: ProductId,
        sku: String,
        price: String,
        quantity: u64,
    },
    UpdateVariant {
        variant_id: u64,
        sku: String,
        price: String,
        quantity: u64,
    },
}

/// Calls that should fail with a transport-style error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Failure {
    Lookup(String),
    ListVariants(ProductId),
    CreateVariant(String),
    Publish(String),
}

#[derive(Debug)]
struct FakeProduct {
    id: ProductId,
    title: String,
    variants: Vec<Variant>,
}

#[derive(Debug, Default)]
struct State {
    products: Vec<FakeProduct>,
    calls: Vec<Call>,
    failures: Vec<Failure>,
    publish_rejection: Option<Vec<String>>,
    next_product_id: u64,
    next_variant_id: u64,
}

#[derive(Debug)]
pub struct FakeCatalog {
    state: Mutex<State>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_product_id: 1000,
                next_variant_id: 5000,
                ..State::default()
            }),
        }
    }

    fn state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Seed a product with `(variant_id, sku)` pairs
    pub fn add_product(&self, title: &str, variants: &[(u64, Option<&str>)]) -> ProductId {
        let mut state = self.state();
        let id = ProductId(state.next_product_id);
        state.next_product_id += 1;
        let variants = variants
            .iter()
            .map(|(variant_id, sku)| Variant {
                id: *variant_id,
                product_id: Some(id),
                sku: sku.map(str::to_string),
                price: Some("0.00".to_string()),
                inventory_quantity: Some(0),
            })
            .collect();
        state.products.push(FakeProduct {
            id,
            title: title.to_string(),
            variants,
        });
        id
    }

    pub fn fail(&self, failure: Failure) {
        self.state().failures.push(failure);
    }

    /// Make every publish come back with these user errors
    pub fn reject_publish(&self, problems: Vec<String>) {
        self.state().publish_rejection = Some(problems);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state().calls.clear();
    }

    pub fn count(&self, predicate: impl Fn(&Call) -> bool) -> usize {
        self.state().calls.iter().filter(|c| predicate(*c)).count()
    }

    pub fn product_count(&self) -> usize {
        self.state().products.len()
    }

    pub fn variants_of(&self, id: ProductId) -> Vec<Variant> {
        self.state()
            .products
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.variants.clone())
            .unwrap_or_default()
    }
}

fn check(state: &State, failure: Failure) -> Result<()> {
    if state.failures.contains(&failure) {
        Err(anyhow!("connection reset by peer ({:?})", failure))
    } else {
        Ok(())
    }
}

#[async_trait]
impl CatalogApi for FakeCatalog {
    async fn find_product_by_title(&self, title: &str) -> Result<Option<ProductRef>> {
        let mut state = self.state();
        state.calls.push(Call::FindProduct(title.to_string()));
        check(&state, Failure::Lookup(title.to_string()))?;

        Ok(state
            .products
            .iter()
            .find(|p| p.title == title)
            .map(|p| ProductRef {
                gid: p.id.gid(),
                title: p.title.clone(),
            }))
    }

    async fn create_product(&self, product: &ProductPayload) -> Result<ProductRecord> {
        let mut state = self.state();
        state.calls.push(Call::CreateProduct(product.title.clone()));

        let id = ProductId(state.next_product_id);
        state.next_product_id += 1;
        state.products.push(FakeProduct {
            id,
            title: product.title.clone(),
            variants: Vec::new(),
        });

        Ok(ProductRecord {
            id,
            admin_graphql_api_id: id.gid(),
            title: Some(product.title.clone()),
        })
    }

    async fn update_product(&self, id: ProductId, product: &ProductPayload) -> Result<()> {
        let mut state = self.state();
        state
            .calls
            .push(Call::UpdateProduct(id, product.title.clone()));

        match state.products.iter_mut().find(|p| p.id == id) {
            Some(existing) => {
                existing.title = product.title.clone();
                Ok(())
            }
            None => Err(anyhow!("HTTP 404: Not Found")),
        }
    }

    async fn publish_product(
        &self,
        product_gid: &str,
        publication_id: &str,
    ) -> Result<PublishOutcome> {
        let mut state = self.state();
        state.calls.push(Call::Publish {
            gid: product_gid.to_string(),
            publication: publication_id.to_string(),
        });
        check(&state, Failure::Publish(product_gid.to_string()))?;

        Ok(PublishOutcome {
            product_gid: Some(product_gid.to_string()),
            title: None,
            published_at: None,
            problems: state.publish_rejection.clone().unwrap_or_default(),
        })
    }

    async fn list_variants(&self, product: ProductId) -> Result<Vec<Variant>> {
        let mut state = self.state();
        state.calls.push(Call::ListVariants(product));
        check(&state, Failure::ListVariants(product))?;

        Ok(state
            .products
            .iter()
            .find(|p| p.id == product)
            .map(|p| p.variants.clone())
            .unwrap_or_default())
    }

    async fn create_variant(&self, variant: &VariantPayload) -> Result<()> {
        let mut state = self.state();
        let product_id = variant
            .product_id
            .ok_or_else(|| anyhow!("HTTP 422: product_id is required"))?;
        state.calls.push(Call::CreateVariant {
            product_id,
            sku: variant.sku.clone(),
            price: variant.price.clone(),
            quantity: variant.inventory_quantity,
        });
        check(&state, Failure::CreateVariant(variant.sku.clone()))?;

        let variant_id = state.next_variant_id;
        state.next_variant_id += 1;
        let product = state
            .products
            .iter_mut()
            .find(|p| p.id == product_id)
            .ok_or_else(|| anyhow!("HTTP 404: Not Found"))?;
        product.variants.push(Variant {
            id: variant_id,
            product_id: Some(product_id),
            sku: Some(variant.sku.clone()),
            price: Some(variant.price.clone()),
            inventory_quantity: Some(variant.inventory_quantity as i64),
        });

        Ok(())
    }

    async fn update_variant(&self, variant_id: u64, variant: &VariantPayload) -> Result<()> {
        let mut state = self.state();
        state.calls.push(Call::UpdateVariant {
            variant_id,
            sku: variant.sku.clone(),
            price: variant.price.clone(),
            quantity: variant.inventory_quantity,
        });

        let existing = state
            .products
            .iter_mut()
            .flat_map(|p| p.variants.iter_mut())
            .find(|v| v.id == variant_id)
            .ok_or_else(|| anyhow!("HTTP 404: Not Found"))?;
        existing.price = Some(variant.price.clone());
        existing.inventory_quantity = Some(variant.inventory_quantity as i64);

        Ok(())
    }
}
