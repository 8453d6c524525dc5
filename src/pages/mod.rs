//! Static HTML report pages.
//!
//! [`metadata`] loads the pre-aggregated tables, [`config`] decides which
//! table feeds which template, and [`render`] turns a table into HTML.
//! A missing table or template only skips the pages that need it.

pub mod config;
pub mod metadata;
pub mod render;

pub use config::{PageConfig, PageSpec};
pub use metadata::{MetadataSet, MetadataTable, load_all};
pub use render::{PageContext, PageRenderer};

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{info, warn};

/// What happened during one generation run.
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub loaded: Vec<String>,
    pub failed: Vec<String>,
    pub written: Vec<PathBuf>,
    /// Page name and the reason it was not generated.
    pub skipped: Vec<(String, String)>,
}

pub struct PageGenerator {
    metadata_dir: PathBuf,
    templates_dir: PathBuf,
    output_dir: PathBuf,
    config: PageConfig,
    renderer: PageRenderer,
}

impl PageGenerator {
    pub fn new(
        metadata_dir: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
        output_dir: impl Into<PathBuf>,
        config: PageConfig,
    ) -> Self {
        Self {
            metadata_dir: metadata_dir.into(),
            templates_dir: templates_dir.into(),
            output_dir: output_dir.into(),
            config,
            renderer: PageRenderer::new(),
        }
    }

    /// Loads all metadata and renders every configured page it can.
    ///
    /// Only failing to create the output directory aborts the run.
    #[tracing::instrument(skip(self), fields(output_dir = %self.output_dir.display()))]
    pub fn run(&self) -> Result<GenerationReport> {
        std::fs::create_dir_all(&self.output_dir)
            .with_context(|| format!("failed to create {}", self.output_dir.display()))?;

        let tables = load_all(&self.metadata_dir);
        let mut report = GenerationReport {
            loaded: tables.tables.keys().cloned().collect(),
            failed: tables.failures.iter().map(|(k, _)| k.clone()).collect(),
            ..Default::default()
        };

        for page in self.config.pages() {
            match self.generate(page, &tables) {
                Ok(path) => {
                    info!(page = %page.name, path = %path.display(), "Page generated");
                    report.written.push(path);
                }
                Err(e) => {
                    warn!(page = %page.name, reason = %format!("{e:#}"), "Page skipped");
                    report.skipped.push((page.name.clone(), format!("{e:#}")));
                }
            }
        }

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            "HTML page generation completed"
        );
        Ok(report)
    }

    fn generate(&self, page: &PageSpec, tables: &MetadataSet) -> Result<PathBuf> {
        let table = tables.get(&page.source).with_context(|| {
            let expected = metadata::metadata_path(&self.metadata_dir, &page.source)
                .unwrap_or_default();
            format!("metadata {} not loaded", expected.display())
        })?;

        let ctx = PageContext {
            title: &page.title,
            generated_at: Utc::now(),
            context_key: &page.context_key,
            records: &table.records,
        };
        let html = self
            .renderer
            .render_file(&self.templates_dir.join(&page.template), &ctx)?;

        let path = self.output_dir.join(&page.output);
        std::fs::write(&path, html).with_context(|| format!("failed to write {}", path.display()))?;
        Ok(path)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }
}
