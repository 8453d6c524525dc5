//! Loader for the pre-aggregated metadata tables the report pages are built from.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::{error, info};

/// Metadata tables the generator looks for, keyed by the name pages refer to.
pub const METADATA_FILES: [(&str, &str); 5] = [
    ("core_metrics", "1_standardized-core-metrics-populated.csv"),
    ("groupcode_metrics", "2_standardized-groupcode-metrics-populated.csv"),
    ("course_rankings", "3_standardized-course-rankings-populated.csv"),
    ("size_distribution", "4_standardized-size-distribution-populated.csv"),
    ("detailed_stats", "5_standardized-detailed-stats-populated.csv"),
];

/// Returns `true` if `key` names one of the expected metadata tables.
pub fn is_known_source(key: &str) -> bool {
    METADATA_FILES.iter().any(|(k, _)| *k == key)
}

/// A single CSV cell with its type inferred from the text.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Int(i64),
    Float(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            CellValue::Missing
        } else if let Ok(i) = trimmed.parse::<i64>() {
            CellValue::Int(i)
        } else if let Ok(f) = trimmed.parse::<f64>() {
            if f.is_nan() {
                CellValue::Missing
            } else {
                CellValue::Float(f)
            }
        } else {
            CellValue::Text(raw.to_string())
        }
    }
}

/// One row of a metadata table: column name to value, in column order.
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    fields: Vec<(String, CellValue)>,
}

impl Record {
    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.fields.iter().find(|(k, _)| k == column).map(|(_, v)| v)
    }

    pub fn fields(&self) -> &[(String, CellValue)] {
        &self.fields
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (k, v) in &self.fields {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct MetadataTable {
    pub headers: Vec<String>,
    pub records: Vec<Record>,
}

impl MetadataTable {
    /// Reads a CSV with a header line into typed records.
    pub fn load(path: &Path) -> Result<Self> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(path)
            .with_context(|| format!("failed to open {}", path.display()))?;

        let headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for result in rdr.records() {
            let row = result?;
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, h)| (h.clone(), CellValue::parse(row.get(i).unwrap_or(""))))
                .collect();
            records.push(Record { fields });
        }

        Ok(Self { headers, records })
    }
}

/// Outcome of loading the full metadata set.
#[derive(Debug, Default)]
pub struct MetadataSet {
    pub tables: BTreeMap<String, MetadataTable>,
    /// Key and error message of every table that failed to load.
    pub failures: Vec<(String, String)>,
}

impl MetadataSet {
    pub fn get(&self, key: &str) -> Option<&MetadataTable> {
        self.tables.get(key)
    }
}

pub fn metadata_path(dir: &Path, key: &str) -> Option<PathBuf> {
    METADATA_FILES
        .iter()
        .find(|(k, _)| *k == key)
        .map(|(_, file)| dir.join(file))
}

/// Attempts every expected table. A table that fails is logged and recorded;
/// the others still load.
#[tracing::instrument(skip_all, fields(dir = %dir.display()))]
pub fn load_all(dir: &Path) -> MetadataSet {
    let mut set = MetadataSet::default();

    for (key, file) in METADATA_FILES {
        let path = dir.join(file);
        match MetadataTable::load(&path) {
            Ok(table) => {
                info!(key, rows = table.records.len(), "Loaded metadata table");
                set.tables.insert(key.to_string(), table);
            }
            Err(e) => {
                error!(key, path = %path.display(), error = %e, "Error loading metadata table");
                set.failures.push((key.to_string(), format!("{e:#}")));
            }
        }
    }

    set
}
