//! Template rendering for report pages.

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use minijinja::Environment;
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::pages::metadata::Record;

/// Values handed to a page template: `title`, `generated_at`, and the table
/// records under the page's own key.
pub struct PageContext<'a> {
    pub title: &'a str,
    pub generated_at: DateTime<Utc>,
    pub context_key: &'a str,
    pub records: &'a [Record],
}

impl Serialize for PageContext<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(3))?;
        map.serialize_entry("title", self.title)?;
        map.serialize_entry("generated_at", &self.generated_at.to_rfc3339())?;
        map.serialize_entry(self.context_key, self.records)?;
        map.end()
    }
}

/// Renders Jinja templates. Templates whose name ends in `.html` are
/// HTML-escaped automatically.
pub struct PageRenderer {
    env: Environment<'static>,
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PageRenderer {
    pub fn new() -> Self {
        Self {
            env: Environment::new(),
        }
    }

    /// Renders `source` as the template called `name`.
    pub fn render(&self, name: &str, source: &str, context: &PageContext<'_>) -> Result<String> {
        let html = self
            .env
            .render_named_str(name, source, context)
            .with_context(|| format!("failed to render template {name}"))?;
        Ok(html)
    }

    /// Reads the template at `path` and renders it.
    pub fn render_file(&self, path: &Path, context: &PageContext<'_>) -> Result<String> {
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("template {} not readable", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.render(&name, &source, context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::metadata::MetadataTable;
    use std::fs;
    use tempfile::tempdir;

    fn records() -> Vec<Record> {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        fs::write(&path, "College,Sections\nArts & Crafts,3\nScience,5\n").unwrap();
        MetadataTable::load(&path).unwrap().records
    }

    #[test]
    fn test_render_records_under_context_key() {
        let records = records();
        let ctx = PageContext {
            title: "Demographics Analysis",
            generated_at: Utc::now(),
            context_key: "college_distribution",
            records: &records,
        };
        let source = "<h1>{{ title }}</h1>{% for row in college_distribution %}<li>{{ row.College }}={{ row.Sections }}</li>{% endfor %}";

        let html = PageRenderer::new()
            .render("demographics_template.html", source, &ctx)
            .unwrap();

        assert_eq!(
            html,
            "<h1>Demographics Analysis</h1><li>Arts &amp; Crafts=3</li><li>Science=5</li>"
        );
    }

    #[test]
    fn test_render_error_is_reported() {
        let records = records();
        let ctx = PageContext {
            title: "t",
            generated_at: Utc::now(),
            context_key: "rows",
            records: &records,
        };

        let result = PageRenderer::new().render("broken.html", "{% for %}", &ctx);
        assert!(result.is_err());
    }

    #[test]
    fn test_render_missing_file() {
        let records = records();
        let ctx = PageContext {
            title: "t",
            generated_at: Utc::now(),
            context_key: "rows",
            records: &records,
        };

        let result = PageRenderer::new().render_file(Path::new("no/such/template.html"), &ctx);
        assert!(result.is_err());
    }
}
