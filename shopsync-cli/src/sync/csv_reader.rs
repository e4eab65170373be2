//! Read the product spreadsheet
//!
//! The whole file is loaded before any row is processed.

use anyhow::{Context, Result};
use csv::{ByteRecord, StringRecord};
use log::warn;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::row::ProductRow;

/// Read all rows of a CSV file, in file order
pub fn read_rows(path: &Path) -> Result<Vec<ProductRow>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open input file: {}", path.display()))?;

    read_rows_from_reader(file)
        .with_context(|| format!("Failed to read input file: {}", path.display()))
}

/// Read all rows from any CSV source, in order
///
/// The first record is the header. Unknown columns are ignored, missing
/// columns (or short records) leave the field empty. Invalid UTF-8 is
/// replaced with U+FFFD and a repeated column name keeps its first column.
pub fn read_rows_from_reader<R: Read>(reader: R) -> Result<Vec<ProductRow>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(reader);

    let headers = unique_headers(&decode_lossy(
        csv_reader
            .byte_headers()
            .context("Failed to read CSV header")?,
    ));

    let mut rows = Vec::new();
    let mut raw = ByteRecord::new();
    while csv_reader
        .read_byte_record(&mut raw)
        .context("Failed to read CSV record")?
    {
        let line = raw.position().map(|p| p.line()).unwrap_or_default();
        let mut record = decode_lossy(&raw);

        // Short records are padded so every header maps to a field
        while record.len() < headers.len() {
            record.push_field("");
        }

        let row: ProductRow = record
            .deserialize(Some(&headers))
            .with_context(|| format!("Invalid CSV record on line {}", line))?;
        rows.push(row);
    }

    Ok(rows)
}

fn decode_lossy(record: &ByteRecord) -> StringRecord {
    record
        .iter()
        .map(|field| String::from_utf8_lossy(field))
        .collect()
}

/// Rename repeated header names so only their first column is read
fn unique_headers(headers: &StringRecord) -> StringRecord {
    let mut seen = HashSet::new();
    headers
        .iter()
        .enumerate()
        .map(|(index, name)| {
            if seen.insert(name) {
                name.to_string()
            } else {
                warn!(
                    "CSV column {} repeats header '{}', ignoring it",
                    index + 1,
                    name
                );
                format!("#duplicate-{}", index)
            }
        })
        .collect()
}
