//! Output formatting and persistence for computed metrics.
//!
//! Supports pretty-printing, JSON logging, and fixed-layout CSV and text files.

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{debug, info};

use csv::WriterBuilder;
use std::fmt::Debug;
use std::path::Path;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Logs a value as pretty-printed JSON under `label`.
pub fn print_json<T: Serialize>(label: &str, value: &T) -> Result<()> {
    info!(metrics = label, "{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Formats a numeric cell. Missing values become empty cells and whole
/// numbers keep one decimal so every numeric column reads as a float.
pub fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() && v.fract() == 0.0 => format!("{v:.1}"),
        Some(v) => v.to_string(),
        None => String::new(),
    }
}

/// Writes a CSV file with a header row, replacing any previous file.
pub fn write_table<P, R>(path: P, headers: &[&str], rows: R) -> Result<()>
where
    P: AsRef<Path>,
    R: IntoIterator<Item = Vec<String>>,
{
    let path = path.as_ref();
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .with_context(|| format!("failed to create {}", path.display()))?;

    writer.write_record(headers)?;
    let mut count = 0usize;
    for row in rows {
        writer.write_record(&row)?;
        count += 1;
    }
    writer.flush()?;

    debug!(path = %path.display(), rows = count, "CSV table written");
    Ok(())
}

/// Writes a two-column `Metric,Value` table.
pub fn write_key_values<P, K, I>(path: P, pairs: I) -> Result<()>
where
    P: AsRef<Path>,
    K: ToString,
    I: IntoIterator<Item = (K, String)>,
{
    let rows = pairs.into_iter().map(|(k, v)| vec![k.to_string(), v]);
    write_table(path, &["Metric", "Value"], rows)
}

/// Writes a text file, replacing any previous file.
pub fn write_text<P: AsRef<Path>>(path: P, text: &str) -> Result<()> {
    let path = path.as_ref();
    std::fs::write(path, text).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(())
}
