//! Sync command handler

use anyhow::{Result, bail};
use colored::*;
use std::time::Instant;

use super::SyncCommand;
use crate::api::models::publication_gid;
use crate::cli::ConnectionArgs;
use crate::cli::commands::connect;
use crate::sync::{
    ProductAction, ProductRow, PublishStatus, RowOutcome, StageError, SyncObserver, SyncSummary,
    VariantAction, read_rows, run_sync,
};

pub async fn handle_sync_command(connection: &ConnectionArgs, args: SyncCommand) -> Result<()> {
    let rows = read_rows(&args.input)?;

    let publication = args
        .publication
        .as_deref()
        .map(publication_gid)
        .filter(|p| !p.is_empty());
    if publication.is_none() {
        println!(
            "{}",
            "No PUBLICATION_ID set: new products will not be published".yellow()
        );
    }

    let client = connect(connection)?;

    println!(
        "Syncing {} rows from {}",
        rows.len().to_string().bold(),
        args.input.display().to_string().cyan()
    );

    let start = Instant::now();
    let mut printer = ProgressPrinter { total: rows.len() };
    let summary = run_sync(&client, &rows, publication.as_deref(), &mut printer).await;

    print_summary(&summary);
    let stats = client.gate_stats();
    println!(
        "{}",
        format!(
            "{} API calls, {} paced ({:.0}%), {:.1}s",
            stats.calls,
            stats.throttled,
            stats.throttle_rate() * 100.0,
            start.elapsed().as_secs_f64()
        )
        .dimmed()
    );

    if summary.has_failures() {
        bail!(
            "{} of {} rows failed",
            summary.failures.len(),
            summary.total_rows
        );
    }

    Ok(())
}

struct ProgressPrinter {
    total: usize,
}

impl SyncObserver for ProgressPrinter {
    fn row_finished(
        &mut self,
        row_number: usize,
        row: &ProductRow,
        result: &Result<RowOutcome, StageError>,
    ) {
        let position = format!("[{}/{}]", row_number, self.total).dimmed();
        match result {
            Ok(outcome) => println!(
                "{} {} {} ({})",
                position,
                "✓".green(),
                row.title,
                describe(outcome)
            ),
            Err(e) => println!(
                "{} {} {} {}",
                position,
                "✗".red(),
                row.title,
                e.to_string().red()
            ),
        }
    }
}

fn describe(outcome: &RowOutcome) -> String {
    let product = match &outcome.product {
        ProductAction::Updated => format!("updated product {}", outcome.product_id),
        ProductAction::Created { publish } => {
            let publish = match publish {
                PublishStatus::Published => "published",
                PublishStatus::Rejected(_) => "publish rejected",
                PublishStatus::Skipped => "not published",
            };
            format!("created product {}, {}", outcome.product_id, publish)
        }
    };
    let variant = match outcome.variant {
        VariantAction::Created => "created variant".to_string(),
        VariantAction::Updated { variant_id } => format!("updated variant {}", variant_id),
    };
    format!("{}, {}", product, variant)
}

fn print_summary(summary: &SyncSummary) {
    println!();
    println!(
        "Products: {} created, {} updated",
        summary.products_created.to_string().green(),
        summary.products_updated.to_string().green()
    );
    println!(
        "Variants: {} created, {} updated",
        summary.variants_created.to_string().green(),
        summary.variants_updated.to_string().green()
    );
    if summary.publish_skipped > 0 {
        println!(
            "{}",
            format!("{} new products left unpublished", summary.publish_skipped).yellow()
        );
    }

    for warning in &summary.publish_warnings {
        println!(
            "{} row {} '{}': {}",
            "publish rejected".yellow(),
            warning.row_number,
            warning.title,
            warning.problems.join("; ")
        );
    }

    if summary.has_failures() {
        println!();
        println!("{}", format!("Failed rows ({}):", summary.failures.len()).red().bold());
        for failure in &summary.failures {
            println!(
                "  row {} '{}': {} failed: {:#}",
                failure.row_number, failure.title, failure.stage, failure.error
            );
        }
    }
}
