//! GraphQL documents and response extraction
//!
//! The GraphQL endpoint answers HTTP 200 even when the query fails, so errors
//! come back inside the body (`errors` at the top level, `userErrors` inside
//! mutation payloads). The helpers here pull typed values out of those bodies.

use serde_json::Value;

use super::error::ApiError;
use super::models::{ProductRef, Publication, PublishOutcome, UserError};

/// Sales channels available to the app
pub const PUBLICATIONS_QUERY: &str = r#"
query publications {
  publications(first: 10) {
    edges {
      node {
        id
        name
      }
    }
  }
}
"#;

/// First product matching a search filter
pub const FIND_PRODUCT_QUERY: &str = r#"
query findProduct($query: String!) {
  products(first: 1, query: $query) {
    edges {
      node {
        id
        title
      }
    }
  }
}
"#;

/// Publish a product to one publication
pub const PUBLISH_PRODUCT_MUTATION: &str = r#"
mutation publishProduct($id: ID!, $pub: ID!) {
  publishablePublish(id: $id, input: { publicationId: $pub }) {
    publishable {
      ... on Product {
        id
        title
        publishedAt
      }
    }
    userErrors {
      field
      message
    }
  }
}
"#;

/// Search filter used to find a product by title
pub fn title_filter(title: &str) -> String {
    format!("title:{}", title)
}

/// Messages of the top-level `errors` array, if any
pub fn top_level_errors(body: &Value) -> Vec<String> {
    body.get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .map(str::to_string)
                        .unwrap_or_else(|| e.to_string())
                })
                .collect()
        })
        .unwrap_or_default()
}

/// `data` of a response, failing with the reported errors when it is absent
fn data(body: &Value) -> Result<&Value, ApiError> {
    match body.get("data") {
        Some(data) if !data.is_null() => Ok(data),
        _ => {
            let errors = top_level_errors(body);
            if errors.is_empty() {
                Err(ApiError::unexpected("GraphQL response has no data"))
            } else {
                Err(ApiError::unexpected(format!(
                    "GraphQL errors: {}",
                    errors.join("; ")
                )))
            }
        }
    }
}

/// Nodes of a `{ edges: [ { node } ] }` connection
fn connection_nodes<'a>(connection: Option<&'a Value>) -> Vec<&'a Value> {
    connection
        .and_then(|c| c.get("edges"))
        .and_then(Value::as_array)
        .map(|edges| edges.iter().filter_map(|e| e.get("node")).collect())
        .unwrap_or_default()
}

/// Extract the publication list from a [`PUBLICATIONS_QUERY`] response
pub fn parse_publications(body: &Value) -> Result<Vec<Publication>, ApiError> {
    let data = data(body)?;
    connection_nodes(data.get("publications"))
        .into_iter()
        .map(|node| serde_json::from_value::<Publication>(node.clone()).map_err(ApiError::from))
        .collect()
}

/// Extract the first product node from a [`FIND_PRODUCT_QUERY`] response
///
/// A response without `data` is an error rather than "not found", otherwise a
/// failed search would make the caller create a duplicate product.
pub fn parse_product_search(body: &Value) -> Result<Option<ProductRef>, ApiError> {
    let data = data(body)?;
    match connection_nodes(data.get("products")).first() {
        Some(node) => serde_json::from_value((*node).clone())
            .map(Some)
            .map_err(ApiError::from),
        None => Ok(None),
    }
}

/// Interpret a [`PUBLISH_PRODUCT_MUTATION`] response
///
/// Never fails: every problem the server reports ends up in `problems`.
pub fn parse_publish_outcome(body: &Value) -> PublishOutcome {
    let mut outcome = PublishOutcome {
        problems: top_level_errors(body),
        ..PublishOutcome::default()
    };

    let payload = body
        .get("data")
        .and_then(|d| d.get("publishablePublish"))
        .filter(|p| !p.is_null());

    let Some(payload) = payload else {
        if outcome.problems.is_empty() {
            outcome
                .problems
                .push("publishablePublish returned no payload".to_string());
        }
        return outcome;
    };

    if let Some(publishable) = payload.get("publishable").filter(|p| !p.is_null()) {
        let text = |key: &str| {
            publishable
                .get(key)
                .and_then(Value::as_str)
                .map(str::to_string)
        };
        outcome.product_gid = text("id");
        outcome.title = text("title");
        outcome.published_at = text("publishedAt");
    }

    if let Some(user_errors) = payload.get("userErrors").and_then(Value::as_array) {
        for raw in user_errors {
            match serde_json::from_value::<UserError>(raw.clone()) {
                Ok(user_error) => outcome.problems.push(user_error.to_string()),
                Err(_) => outcome.problems.push(raw.to_string()),
            }
        }
    }

    outcome
}
