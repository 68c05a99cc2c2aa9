//! File adapters: tabular rows in, joined export out.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use clap::ValueEnum;
use feedtune_core::{ExportBatch, RawRow};
use serde_json::{Map, Value};

/// Input layout, chosen from the file extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Tsv,
    Json,
    JsonLines,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("tsv") | Some("tab") => Self::Tsv,
            Some("json") => Self::Json,
            Some("jsonl") | Some("ndjson") => Self::JsonLines,
            _ => Self::Csv,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Csv,
    Json,
}

impl OutputFormat {
    /// `.json` writes JSON; anything else writes CSV.
    pub fn from_path(path: &Path) -> Self {
        match extension(path).as_deref() {
            Some("json") => Self::Json,
            _ => Self::Csv,
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase)
}

/// Reads every row of a CSV, TSV, JSON array or JSON-lines file as ordered
/// `(column, value)` cells.
pub fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    match InputFormat::from_path(path) {
        InputFormat::Csv => read_delimited(path, b','),
        InputFormat::Tsv => read_delimited(path, b'\t'),
        InputFormat::Json => {
            let raw = read_text(path)?;
            let document: Value = serde_json::from_str(&raw)
                .with_context(|| format!("`{}` is not valid JSON", path.display()))?;
            let Value::Array(items) = document else {
                bail!("`{}` must contain a JSON array of objects", path.display());
            };
            items
                .into_iter()
                .enumerate()
                .map(|(index, item)| object_row(item, path, index + 1))
                .collect()
        }
        InputFormat::JsonLines => {
            let raw = read_text(path)?;
            raw.lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(index, line)| {
                    let item: Value = serde_json::from_str(line).with_context(|| {
                        format!("line {} of `{}` is not valid JSON", index + 1, path.display())
                    })?;
                    object_row(item, path, index + 1)
                })
                .collect()
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("could not read `{}`", path.display()))
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Vec<RawRow>> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .with_context(|| format!("could not open `{}`", path.display()))?;

    let headers = reader
        .headers()
        .with_context(|| format!("could not read the header row of `{}`", path.display()))?
        .iter()
        .map(|header| header.trim_start_matches('\u{feff}').to_owned())
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record
            .with_context(|| format!("malformed record {} in `{}`", index + 1, path.display()))?;
        let row = headers
            .iter()
            .zip(record.iter())
            .map(|(column, value)| (column.clone(), value.to_owned()))
            .collect::<RawRow>();
        rows.push(row);
    }
    Ok(rows)
}

fn object_row(item: Value, path: &Path, position: usize) -> Result<RawRow> {
    let Value::Object(object) = item else {
        bail!("entry {position} of `{}` is not a JSON object", path.display());
    };
    Ok(object.into_iter().map(|(column, value)| (column, cell_text(value))).collect())
}

fn cell_text(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

/// Writes the export with a header row (CSV) or as an array of objects (JSON).
/// Rows lacking a column get an empty value so every record has the same shape.
pub fn write_export(path: &Path, batch: &ExportBatch, format: OutputFormat) -> Result<()> {
    let headers = batch.headers();
    match format {
        OutputFormat::Csv => {
            let mut writer = csv::Writer::from_path(path)
                .with_context(|| format!("could not create `{}`", path.display()))?;
            if !headers.is_empty() {
                writer.write_record(&headers)?;
            }
            for row in &batch.rows {
                writer.write_record(headers.iter().map(|column| row.get(column).unwrap_or("")))?;
            }
            writer.flush().with_context(|| format!("could not flush `{}`", path.display()))?;
        }
        OutputFormat::Json => {
            let records = batch
                .rows
                .iter()
                .map(|row| {
                    let object = headers
                        .iter()
                        .map(|column| {
                            let value = row.get(column).unwrap_or("");
                            (column.clone(), Value::String(value.to_owned()))
                        })
                        .collect::<Map<String, Value>>();
                    Value::Object(object)
                })
                .collect::<Vec<_>>();
            let rendered = serde_json::to_string_pretty(&records)?;
            fs::write(path, rendered)
                .with_context(|| format!("could not write `{}`", path.display()))?;
        }
    }
    Ok(())
}
