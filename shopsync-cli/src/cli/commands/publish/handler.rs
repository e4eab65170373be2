//! Publish command handler

use anyhow::{Result, bail};
use colored::*;

use super::PublishCommand;
use crate::api::models::{ProductId, PublishOutcome, publication_gid};
use crate::cli::ConnectionArgs;
use crate::cli::commands::connect;
use crate::publish::{PublishResult, PublishSummary, parse_identifiers, read_identifiers_file, run_publish};

pub async fn handle_publish_command(connection: &ConnectionArgs, args: PublishCommand) -> Result<()> {
    let ids = collect_identifiers(&args)?;
    if ids.is_empty() {
        bail!("No product ids given. Pass ids as arguments or use --ids-file");
    }

    let publication = publication_gid(&args.publication);
    if publication.is_empty() {
        bail!("PUBLICATION_ID is empty. Pass --publication or set PUBLICATION_ID");
    }

    let client = connect(connection)?;

    println!(
        "Publishing {} products to {}",
        ids.len().to_string().bold(),
        publication.cyan()
    );

    let summary = run_publish(&client, &ids, &publication, |id, result| {
        print_result(id, result)
    })
    .await;

    print_summary(&summary);

    if summary.has_problems() {
        bail!(
            "{} of {} products were not published",
            summary.rejected.len() + summary.failed.len(),
            summary.total()
        );
    }

    Ok(())
}

/// Positional ids first, then the ids file, keeping order
fn collect_identifiers(args: &PublishCommand) -> Result<Vec<ProductId>> {
    let mut ids = parse_identifiers(&args.ids.join("\n"))?;
    if let Some(path) = &args.ids_file {
        ids.extend(read_identifiers_file(path)?);
    }
    Ok(ids)
}

fn print_result(id: ProductId, result: &PublishResult) {
    match result {
        PublishResult::Published(outcome) => println!("{}", published_line(id, outcome)),
        PublishResult::Rejected(outcome) => {
            println!("{} {} {}", "!".yellow(), id, outcome.problems.join("; ").yellow());
        }
        PublishResult::Failed(e) => {
            println!("{} {} {}", "✗".red(), id, format!("{:#}", e).red());
        }
    }
}

fn published_line(id: ProductId, outcome: &PublishOutcome) -> String {
    let mut line = format!("{} {}", "✓".green(), id);
    if let Some(title) = outcome.title.as_deref().filter(|t| !t.is_empty()) {
        line.push_str(&format!(" {}", title));
    }
    if let Some(published_at) = &outcome.published_at {
        line.push_str(&format!(" {}", format!("published at {}", published_at).dimmed()));
    }
    line
}

fn print_summary(summary: &PublishSummary) {
    println!();
    println!(
        "Published: {}  Rejected: {}  Failed: {}",
        summary.published.to_string().green(),
        summary.rejected.len().to_string().yellow(),
        summary.failed.len().to_string().red()
    );
}
