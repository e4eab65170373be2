//! Sequential sync over all spreadsheet rows
//!
//! Each row is reconciled to completion before the next starts. A failing row
//! is recorded with the stage it failed in and the run moves on, so one bad
//! row never aborts the batch.

use log::{error, info};

use super::reconciler::{
    ProductAction, PublishStatus, RowOutcome, StageError, SyncStage, VariantAction, reconcile_row,
};
use super::row::ProductRow;
use crate::api::CatalogApi;

/// Progress hooks called around each row
pub trait SyncObserver {
    fn row_started(&mut self, _row_number: usize, _row: &ProductRow) {}

    fn row_finished(
        &mut self,
        _row_number: usize,
        _row: &ProductRow,
        _result: &Result<RowOutcome, StageError>,
    ) {
    }
}

impl SyncObserver for () {}

/// A row that could not be fully reconciled
#[derive(Debug)]
pub struct RowFailure {
    /// 1-based position among the data rows
    pub row_number: usize,
    pub title: String,
    pub stage: SyncStage,
    pub error: anyhow::Error,
}

/// A created product whose publish the server rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishWarning {
    pub row_number: usize,
    pub title: String,
    pub problems: Vec<String>,
}

/// End-of-run counters and the rows that need attention
#[derive(Debug, Default)]
pub struct SyncSummary {
    pub total_rows: usize,
    pub products_created: usize,
    pub products_updated: usize,
    pub variants_created: usize,
    pub variants_updated: usize,
    /// Created products left unpublished because no publication was configured
    pub publish_skipped: usize,
    pub publish_warnings: Vec<PublishWarning>,
    pub failures: Vec<RowFailure>,
}

impl SyncSummary {
    pub fn succeeded(&self) -> usize {
        self.total_rows - self.failures.len()
    }

    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn record(&mut self, row_number: usize, row: &ProductRow, outcome: &RowOutcome) {
        match &outcome.product {
            ProductAction::Updated => self.products_updated += 1,
            ProductAction::Created { publish } => {
                self.products_created += 1;
                match publish {
                    PublishStatus::Published => {}
                    PublishStatus::Skipped => self.publish_skipped += 1,
                    PublishStatus::Rejected(problems) => {
                        self.publish_warnings.push(PublishWarning {
                            row_number,
                            title: row.title.clone(),
                            problems: problems.clone(),
                        })
                    }
                }
            }
        }

        match outcome.variant {
            VariantAction::Created => self.variants_created += 1,
            VariantAction::Updated { .. } => self.variants_updated += 1,
        }
    }
}

/// Reconcile every row in order, containing failures per row
pub async fn run_sync<A, O>(
    api: &A,
    rows: &[ProductRow],
    publication_id: Option<&str>,
    observer: &mut O,
) -> SyncSummary
where
    A: CatalogApi + ?Sized,
    O: SyncObserver + ?Sized,
{
    let mut summary = SyncSummary {
        total_rows: rows.len(),
        ..SyncSummary::default()
    };

    info!("Syncing {} rows", rows.len());

    for (index, row) in rows.iter().enumerate() {
        let row_number = index + 1;
        observer.row_started(row_number, row);

        let result = reconcile_row(api, row, publication_id).await;
        observer.row_finished(row_number, row, &result);

        match result {
            Ok(outcome) => summary.record(row_number, row, &outcome),
            Err(StageError { stage, error }) => {
                error!("Row {} ('{}'): {} failed: {:#}", row_number, row.title, stage, error);
                summary.failures.push(RowFailure {
                    row_number,
                    title: row.title.clone(),
                    stage,
                    error,
                });
            }
        }
    }

    info!(
        "Sync finished: {} ok, {} failed",
        summary.succeeded(),
        summary.failures.len()
    );

    summary
}
