//! Publications command handler

use anyhow::{Context, Result, bail};
use colored::*;
use serde_json::json;

use super::PublicationsCommand;
use crate::api::graphql::{PUBLICATIONS_QUERY, parse_publications, top_level_errors};
use crate::api::models::Publication;
use crate::cli::ConnectionArgs;
use crate::cli::commands::connect;
use crate::cli::commands::output::{format_json, pad};

pub async fn handle_publications_command(
    connection: &ConnectionArgs,
    args: PublicationsCommand,
) -> Result<()> {
    let client = connect(connection)?;

    let body = client
        .query(PUBLICATIONS_QUERY, json!({}))
        .await
        .context("Failed to list publications")?;

    if let Some(rendered) = format_json(&body, args.format)? {
        println!("{}", rendered);
        return Ok(());
    }

    let errors = top_level_errors(&body);
    if !errors.is_empty() {
        bail!("Publication lookup returned errors: {}", errors.join("; "));
    }

    let publications = parse_publications(&body).context("Failed to read publication list")?;
    println!("{}", render_table(&publications));

    Ok(())
}

fn render_table(publications: &[Publication]) -> String {
    if publications.is_empty() {
        return "No publications found".yellow().to_string();
    }

    let width = publications
        .iter()
        .map(|p| p.id.len())
        .max()
        .unwrap_or(0)
        .max("ID".len());

    let mut lines = vec![format!("{}  {}", pad("ID", width).bold(), "NAME".bold())];
    for publication in publications {
        lines.push(format!(
            "{}  {}",
            pad(&publication.id, width).cyan(),
            publication.name
        ));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_table() {
        colored::control::set_override(false);
        let publications = vec![
            Publication {
                id: "gid://shopify/Publication/1".to_string(),
                name: "Online Store".to_string(),
            },
            Publication {
                id: "gid://shopify/Publication/22".to_string(),
                name: "Point of Sale".to_string(),
            },
        ];

        let table = render_table(&publications);

        let lines: Vec<&str> = table.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID "));
        assert_eq!(lines[1], "gid://shopify/Publication/1   Online Store");
        assert_eq!(lines[2], "gid://shopify/Publication/22  Point of Sale");
    }

    #[test]
    fn test_render_empty_table() {
        colored::control::set_override(false);

        assert_eq!(render_table(&[]), "No publications found");
    }
}
