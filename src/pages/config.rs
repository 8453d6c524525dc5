use anyhow::Result;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pages::metadata::is_known_source;

#[derive(Debug, Error)]
#[error("page {page:?} refers to unknown metadata table {source_key:?}")]
pub struct PageConfigError {
    pub page: String,
    pub source_key: String,
}

/// Binds one metadata table to one template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageSpec {
    pub name: String,
    /// Key of the metadata table, e.g. `core_metrics`.
    pub source: String,
    pub title: String,
    /// Name the table's records are exposed under in the template.
    pub context_key: String,
    pub template: String,
    pub output: String,
}

impl PageSpec {
    fn new(
        name: &str,
        source: &str,
        title: &str,
        context_key: &str,
        template: &str,
        output: &str,
    ) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
            title: title.into(),
            context_key: context_key.into(),
            template: template.into(),
            output: output.into(),
        }
    }
}

/// The set of pages to render.
///
/// Stored on disk as a JSON array:
/// ```json
/// [
///   {
///     "name": "performance",
///     "source": "groupcode_metrics",
///     "title": "Performance Analysis",
///     "context_key": "performance_data",
///     "template": "performance_template.html",
///     "output": "performance.html"
///   }
/// ]
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PageConfig {
    pages: Vec<PageSpec>,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            pages: vec![
                PageSpec::new(
                    "demographics",
                    "core_metrics",
                    "Demographics Analysis",
                    "college_distribution",
                    "demographics_template.html",
                    "demographics.html",
                ),
                PageSpec::new(
                    "evaluation",
                    "detailed_stats",
                    "Evaluation Analysis",
                    "evaluation_data",
                    "evaluation_template.html",
                    "evaluation.html",
                ),
            ],
        }
    }
}

impl PageConfig {
    /// Validates that every page draws from a known metadata table.
    pub fn new(pages: Vec<PageSpec>) -> Result<Self, PageConfigError> {
        if let Some(bad) = pages.iter().find(|p| !is_known_source(&p.source)) {
            return Err(PageConfigError {
                page: bad.name.clone(),
                source_key: bad.source.clone(),
            });
        }
        Ok(Self { pages })
    }

    /// Loads the page list from a JSON file at `path`.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let pages: Vec<PageSpec> = serde_json::from_str(&content)?;
        Ok(Self::new(pages)?)
    }

    pub fn pages(&self) -> &[PageSpec] {
        &self.pages
    }
}
