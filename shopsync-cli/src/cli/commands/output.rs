//! Output formatting shared by the commands

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable lines
    #[default]
    Table,
    /// Pretty-printed JSON
    Json,
    /// Single-line JSON
    JsonCompact,
}

/// Render `data` as JSON; `None` for [`OutputFormat::Table`]
pub fn format_json<T: Serialize + ?Sized>(data: &T, format: OutputFormat) -> Result<Option<String>> {
    match format {
        OutputFormat::Table => Ok(None),
        OutputFormat::Json => serde_json::to_string_pretty(data)
            .map(Some)
            .context("Failed to format JSON output"),
        OutputFormat::JsonCompact => serde_json::to_string(data)
            .map(Some)
            .context("Failed to format JSON output"),
    }
}

/// Left-align `text` in a column of `width` characters
pub fn pad(text: &str, width: usize) -> String {
    format!("{:<width$}", text, width = width)
}
