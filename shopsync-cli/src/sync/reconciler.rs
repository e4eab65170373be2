//! Create-or-update reconciliation for a single spreadsheet row
//!
//! Product identity is the title as matched by the remote search; variant
//! identity within a product is the SKU, compared by exact string equality.

use anyhow::anyhow;
use log::{info, warn};
use std::fmt;

use super::row::ProductRow;
use crate::api::CatalogApi;
use crate::api::models::{ProductId, Variant};

/// Step of a row's reconciliation, used to report where it failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyncStage {
    Lookup,
    CreateProduct,
    UpdateProduct,
    Publish,
    ListVariants,
    CreateVariant,
    UpdateVariant,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SyncStage::Lookup => "product lookup",
            SyncStage::CreateProduct => "product create",
            SyncStage::UpdateProduct => "product update",
            SyncStage::Publish => "publish",
            SyncStage::ListVariants => "variant listing",
            SyncStage::CreateVariant => "variant create",
            SyncStage::UpdateVariant => "variant update",
        };
        write!(f, "{}", label)
    }
}

/// Error of one reconciliation step
#[derive(Debug)]
pub struct StageError {
    pub stage: SyncStage,
    pub error: anyhow::Error,
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} failed: {:#}", self.stage, self.error)
    }
}

trait AtStage<T> {
    fn at_stage(self, stage: SyncStage) -> Result<T, StageError>;
}

impl<T> AtStage<T> for anyhow::Result<T> {
    fn at_stage(self, stage: SyncStage) -> Result<T, StageError> {
        self.map_err(|error| StageError { stage, error })
    }
}

/// What happened to the publication of a newly created product
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PublishStatus {
    Published,
    /// The server answered with errors; the product exists but is not published
    Rejected(Vec<String>),
    /// No publication configured
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProductAction {
    Created { publish: PublishStatus },
    Updated,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariantAction {
    Created,
    Updated { variant_id: u64 },
}

/// Result of a fully reconciled row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowOutcome {
    pub product_id: ProductId,
    pub product: ProductAction,
    pub variant: VariantAction,
}

/// Make the remote catalog match one row: product first, then its variant
///
/// An existing product (found by title) is updated in place; otherwise the
/// product is created and published to `publication_id`.
pub async fn reconcile_row<A>(
    api: &A,
    row: &ProductRow,
    publication_id: Option<&str>,
) -> Result<RowOutcome, StageError>
where
    A: CatalogApi + ?Sized,
{
    let existing = api
        .find_product_by_title(&row.title)
        .await
        .at_stage(SyncStage::Lookup)?;

    let payload = row.product_payload();

    let (product_id, product) = match existing {
        Some(found) => {
            let id = found
                .product_id()
                .ok_or_else(|| anyhow!("search returned a non-product id '{}'", found.gid))
                .at_stage(SyncStage::Lookup)?;

            info!("Found '{}' as product {}, updating", row.title, id);
            api.update_product(id, &payload)
                .await
                .at_stage(SyncStage::UpdateProduct)?;

            (id, ProductAction::Updated)
        }
        None => {
            info!("No product titled '{}', creating", row.title);
            let record = api
                .create_product(&payload)
                .await
                .at_stage(SyncStage::CreateProduct)?;

            let publish = publish_created(api, &record.admin_graphql_api_id, publication_id)
                .await
                .at_stage(SyncStage::Publish)?;

            (record.id, ProductAction::Created { publish })
        }
    };

    let variant = sync_variant(api, product_id, row).await?;

    Ok(RowOutcome {
        product_id,
        product,
        variant,
    })
}

async fn publish_created<A>(
    api: &A,
    product_gid: &str,
    publication_id: Option<&str>,
) -> anyhow::Result<PublishStatus>
where
    A: CatalogApi + ?Sized,
{
    let Some(publication_id) = publication_id else {
        warn!(
            "No publication configured, {} stays unpublished",
            product_gid
        );
        return Ok(PublishStatus::Skipped);
    };

    let outcome = api.publish_product(product_gid, publication_id).await?;
    if outcome.is_published() {
        info!("Published {} to {}", product_gid, publication_id);
        Ok(PublishStatus::Published)
    } else {
        warn!(
            "Publishing {} was rejected: {}",
            product_gid,
            outcome.problems.join("; ")
        );
        Ok(PublishStatus::Rejected(outcome.problems))
    }
}

/// Make sure the product has a variant with the row's SKU, price and quantity
///
/// One listing call, then exactly one write: an update of the variant whose
/// SKU equals the row's, or the creation of a new one.
pub async fn sync_variant<A>(
    api: &A,
    product_id: ProductId,
    row: &ProductRow,
) -> Result<VariantAction, StageError>
where
    A: CatalogApi + ?Sized,
{
    let variants = api
        .list_variants(product_id)
        .await
        .at_stage(SyncStage::ListVariants)?;

    let mut payload = row.variant_payload();

    match find_variant_by_sku(&variants, &row.sku) {
        Some(existing) => {
            payload.id = Some(existing.id);
            api.update_variant(existing.id, &payload)
                .await
                .at_stage(SyncStage::UpdateVariant)?;
            info!("Updated variant {} ('{}')", existing.id, row.sku);
            Ok(VariantAction::Updated {
                variant_id: existing.id,
            })
        }
        None => {
            payload.product_id = Some(product_id);
            api.create_variant(&payload)
                .await
                .at_stage(SyncStage::CreateVariant)?;
            info!("Created variant '{}' on product {}", row.sku, product_id);
            Ok(VariantAction::Created)
        }
    }
}

/// First variant whose SKU is exactly `sku`
///
/// Variants without a SKU (`null`) never match, not even a blank `sku`.
pub fn find_variant_by_sku<'a>(variants: &'a [Variant], sku: &str) -> Option<&'a Variant> {
    variants.iter().find(|v| v.sku.as_deref() == Some(sku))
}
