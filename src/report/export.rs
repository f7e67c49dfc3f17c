//! JSON export.
//!
//! Writes the analysis result to a pretty-printed JSON file alongside a
//! readable route description. A file written here can be loaded back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info};

use crate::airports;
use crate::links::Trip;
use crate::types::AnalysisResult;

/// Default export file path.
pub const DEFAULT_EXPORT_FILE: &str = "analysis_results.json";

/// On-disk shape of an exported analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDocument {
    /// e.g. `Frankfurt (FRA) → New York (JFK)`
    pub route: String,
    /// Search links for the requested itinerary, keyed by site.
    #[serde(default)]
    pub booking_links: BTreeMap<String, String>,
    #[serde(flatten)]
    pub result: AnalysisResult,
}

impl ExportDocument {
    pub fn new(result: &AnalysisResult) -> Self {
        let query = &result.query;
        let trip = Trip::new(
            query.origin(),
            query.destination(),
            query.departure(),
            query.return_date(),
        );
        Self {
            route: airports::format_route(query.origin(), query.destination()),
            booking_links: trip
                .links()
                .into_iter()
                .map(|(site, url)| (site.key().to_string(), url))
                .collect(),
            result: result.clone(),
        }
    }
}

/// Turn a user-supplied export name into a file path: `.json` is appended
/// when missing, and no name means the default file.
pub fn export_path(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        None => DEFAULT_EXPORT_FILE.to_string(),
        Some(n) if n.ends_with(".json") => n.to_string(),
        Some(n) => format!("{n}.json"),
    }
}

/// Save an analysis result to a JSON file.
pub fn save_report(result: &AnalysisResult, path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_EXPORT_FILE);
    let json = serde_json::to_string_pretty(&ExportDocument::new(result))
        .context("Failed to serialise analysis result")?;

    std::fs::write(path, &json)
        .with_context(|| format!("Failed to write report to {path}"))?;

    info!(path, quotes = result.quotes.len(), "Report exported");
    Ok(())
}

/// Load a previously exported report.
/// Returns None if the file doesn't exist.
pub fn load_report(path: Option<&str>) -> Result<Option<ExportDocument>> {
    let path = path.unwrap_or(DEFAULT_EXPORT_FILE);

    if !Path::new(path).exists() {
        debug!(path, "No exported report found");
        return Ok(None);
    }

    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report from {path}"))?;
    let doc: ExportDocument = serde_json::from_str(&json)
        .with_context(|| format!("Failed to parse report from {path}"))?;

    debug!(path, route = %doc.route, "Report loaded");
    Ok(Some(doc))
}

/// Delete an exported report if present.
pub fn delete_report(path: Option<&str>) -> Result<()> {
    let path = path.unwrap_or(DEFAULT_EXPORT_FILE);
    if Path::new(path).exists() {
        std::fs::remove_file(path)
            .with_context(|| format!("Failed to delete report {path}"))?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
