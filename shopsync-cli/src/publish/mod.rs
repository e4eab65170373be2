//! Bulk publishing of existing products to one publication

use anyhow::{Context, Result, bail};
use log::{error, info, warn};
use std::fs;
use std::path::Path;

use crate::api::CatalogApi;
use crate::api::models::{ProductId, PublishOutcome};

/// Parse product identifiers, one per line
///
/// Lines may hold a product GID or a bare numeric id. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_identifiers(text: &str) -> Result<Vec<ProductId>> {
    let mut ids = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        match ProductId::parse(line) {
            Some(id) => ids.push(id),
            None => bail!("Line {}: '{}' is not a product id", index + 1, line),
        }
    }
    Ok(ids)
}

pub fn read_identifiers_file(path: &Path) -> Result<Vec<ProductId>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read ids file: {}", path.display()))?;
    parse_identifiers(&content).with_context(|| format!("Invalid ids file: {}", path.display()))
}

/// Result of publishing one identifier
#[derive(Debug)]
pub enum PublishResult {
    Published(PublishOutcome),
    Rejected(PublishOutcome),
    Failed(anyhow::Error),
}

#[derive(Debug, Default)]
pub struct PublishSummary {
    pub published: usize,
    pub rejected: Vec<(ProductId, Vec<String>)>,
    pub failed: Vec<(ProductId, anyhow::Error)>,
}

impl PublishSummary {
    pub fn total(&self) -> usize {
        self.published + self.rejected.len() + self.failed.len()
    }

    /// Whether any identifier was not published
    pub fn has_problems(&self) -> bool {
        !self.rejected.is_empty() || !self.failed.is_empty()
    }
}

/// Publish each product in order; a failure on one id does not stop the rest
///
/// `on_result` is called after every identifier, before the next one starts.
pub async fn run_publish<A, F>(
    api: &A,
    ids: &[ProductId],
    publication_id: &str,
    mut on_result: F,
) -> PublishSummary
where
    A: CatalogApi + ?Sized,
    F: FnMut(ProductId, &PublishResult),
{
    let mut summary = PublishSummary::default();

    for &id in ids {
        let result = match api.publish_product(&id.gid(), publication_id).await {
            Ok(outcome) if outcome.is_published() => {
                info!("Published {} to {}", id, publication_id);
                PublishResult::Published(outcome)
            }
            Ok(outcome) => {
                warn!("Publishing {} rejected: {}", id, outcome.problems.join("; "));
                PublishResult::Rejected(outcome)
            }
            Err(e) => {
                error!("Publishing {} failed: {:#}", id, e);
                PublishResult::Failed(e)
            }
        };

        on_result(id, &result);

        match result {
            PublishResult::Published(_) => summary.published += 1,
            PublishResult::Rejected(outcome) => summary.rejected.push((id, outcome.problems)),
            PublishResult::Failed(e) => summary.failed.push((id, e)),
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Call, Failure, FakeCatalog};

    const PUBLICATION: &str = "gid://shopify/Publication/7";

    #[test]
    fn test_parse_identifiers() {
        let text = "# launch batch\n9041531207918\n\ngid://shopify/Product/42\n  7  \n";

        let ids = parse_identifiers(text).unwrap();

        assert_eq!(ids, vec![ProductId(9041531207918), ProductId(42), ProductId(7)]);
    }

    #[test]
    fn test_parse_identifiers_rejects_garbage() {
        let err = parse_identifiers("42\nnot-an-id\n").unwrap_err();

        assert_eq!(err.to_string(), "Line 2: 'not-an-id' is not a product id");
    }

    #[test]
    fn test_parse_identifiers_empty() {
        assert!(parse_identifiers("\n# nothing\n").unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_publishes_in_order() {
        let api = FakeCatalog::new();
        let ids = vec![ProductId(3), ProductId(1), ProductId(2)];
        let mut seen = Vec::new();

        let summary = run_publish(&api, &ids, PUBLICATION, |id, _| seen.push(id)).await;

        assert_eq!(seen, ids);
        assert_eq!(summary.published, 3);
        assert!(!summary.has_problems());
        assert_eq!(
            api.calls()[0],
            Call::Publish {
                gid: "gid://shopify/Product/3".to_string(),
                publication: PUBLICATION.to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_remaining_ids() {
        let api = FakeCatalog::new();
        api.fail(Failure::Publish("gid://shopify/Product/1".to_string()));
        let ids = vec![ProductId(1), ProductId(2)];

        let summary = run_publish(&api, &ids, PUBLICATION, |_, _| {}).await;

        assert_eq!(summary.published, 1);
        assert_eq!(summary.failed.len(), 1);
        assert_eq!(summary.failed[0].0, ProductId(1));
        assert_eq!(summary.total(), 2);
        assert_eq!(api.count(|c| matches!(c, Call::Publish { .. })), 2);
    }

    #[tokio::test]
    async fn test_user_errors_are_recorded() {
        let api = FakeCatalog::new();
        api.reject_publish(vec!["id: Product does not exist".to_string()]);

        let summary = run_publish(&api, &[ProductId(5)], PUBLICATION, |_, result| {
            assert!(matches!(result, PublishResult::Rejected(_)));
        })
        .await;

        assert_eq!(
            summary.rejected,
            vec![(ProductId(5), vec!["id: Product does not exist".to_string()])]
        );
        assert!(summary.has_problems());
    }
}
