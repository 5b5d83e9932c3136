// Report generation from crawl results

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use webmirror_scanner::{CrawlOutcome, CrawlResult, CrawlStats, PageSource};

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportFormat {
    Text,
    Json,
}

impl ReportFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Some(ReportFormat::Text),
            "json" => Some(ReportFormat::Json),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MirrorReport {
    pub seed: String,
    pub mirror_root: String,
    pub stats: CrawlStats,
    pub pages: Vec<CrawlResult>,
}

impl MirrorReport {
    /// Build a report with pages sorted by path.
    pub fn new(seed: impl Into<String>, mirror_root: &Path, outcome: CrawlOutcome) -> Self {
        let CrawlOutcome { mut results, stats } = outcome;
        results.sort_by(|a, b| a.path.cmp(&b.path));

        Self {
            seed: seed.into(),
            mirror_root: mirror_root.display().to_string(),
            stats,
            pages: results,
        }
    }

    pub fn total_links(&self) -> usize {
        self.pages.iter().map(|p| p.links_found.len()).sum()
    }

    pub fn failed(&self) -> impl Iterator<Item = &CrawlResult> {
        self.pages.iter().filter(|p| !p.is_ok())
    }
}

/// `/` for the site root, the path itself otherwise.
pub fn display_path(path: &str) -> &str {
    if path.is_empty() { "/" } else { path }
}

pub fn render_report(report: &MirrorReport, format: ReportFormat) -> Result<String> {
    match format {
        ReportFormat::Text => Ok(generate_mirror_report(report)),
        ReportFormat::Json => {
            serde_json::to_string_pretty(report).context("Failed to serialize report")
        }
    }
}

/// Generate a human-readable mirror report
pub fn generate_mirror_report(report: &MirrorReport) -> String {
    let stats = &report.stats;

    let mut out = String::new();
    out.push_str(RULE);
    out.push_str("\n\n# Summary:\n");
    out.push_str(&format!("  Seed: {}\n", report.seed));
    out.push_str(&format!("  Mirror: {}\n", report.mirror_root));
    out.push_str(&format!("  Pages mirrored: {}\n", report.pages.len()));
    out.push_str(&format!("  Downloaded: {}\n", stats.fetched));
    out.push_str(&format!("  Loaded from mirror: {}\n", stats.cache_hits));
    out.push_str(&format!("  Failed downloads: {}\n", stats.fetch_failures));
    if stats.store_failures > 0 {
        out.push_str(&format!("  Failed saves: {}\n", stats.store_failures));
    }
    out.push_str(&format!("  Total links found: {}\n", report.total_links()));
    out.push('\n');
    out.push_str(RULE);
    out.push_str("\n\n");

    let sections = [
        (PageSource::Network, "Downloaded"),
        (PageSource::Cache, "Loaded from mirror"),
        (PageSource::Unavailable, "Failed"),
    ];

    for (source, title) in sections {
        let pages: Vec<&CrawlResult> = report
            .pages
            .iter()
            .filter(|p| p.source == source)
            .collect();
        if pages.is_empty() {
            continue;
        }

        out.push_str(&format!("## {} ({})\n", title, pages.len()));
        for page in pages {
            let path = display_path(&page.path);
            let line = match (&page.source, &page.error) {
                (PageSource::Unavailable, Some(error)) => format!("  ✗ {}  {}", path, error),
                (_, Some(error)) => format!(
                    "  ⚠ {}  {} bytes, not saved: {}",
                    path, page.content_length, error
                ),
                (_, None) => format!(
                    "  ✓ {}  {} bytes, {} links",
                    path,
                    page.content_length,
                    page.links_found.len()
                ),
            };
            out.push_str(&line);
            out.push('\n');
        }
        out.push('\n');
    }

    out
}

pub fn write_report(content: &str, path: &Path) -> Result<()> {
    let mut file = File::create(path)
        .with_context(|| format!("Failed to create report file {}", path.display()))?;
    file.write_all(content.as_bytes())
        .with_context(|| format!("Failed to write report file {}", path.display()))?;
    Ok(())
}
