//! Report rendering.
//!
//! Turns an [`AnalysisResult`] into the multi-section text summary printed
//! by the CLI. JSON export lives in [`export`].

pub mod export;

use std::fmt;

use crate::airports;
use crate::links::{SearchSite, Trip};
use crate::types::AnalysisResult;

const WIDTH: usize = 80;

/// Ranked options shown in the text summary.
const TOP_OPTIONS: usize = 10;

/// Render the text summary: route header, key recommendations, ranked
/// options, price summary, booking links and any warnings.
pub fn render_summary(result: &AnalysisResult) -> String {
    Summary(result).to_string()
}

/// Text view over a finished analysis.
pub struct Summary<'a>(pub &'a AnalysisResult);

impl Summary<'_> {
    fn section(f: &mut fmt::Formatter<'_>, title: &str) -> fmt::Result {
        let light = "-".repeat(WIDTH);
        writeln!(f, "\n{light}\n{title}:\n{light}")
    }
}

impl fmt::Display for Summary<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let result = self.0;
        let heavy = "=".repeat(WIDTH);
        let cur = &result.base_currency;
        let query = &result.query;

        writeln!(f, "\n{heavy}")?;
        writeln!(f, "FLIGHT PRICE ANALYSIS SUMMARY")?;
        writeln!(f, "{heavy}")?;

        writeln!(
            f,
            "\nRoute: {}",
            airports::format_route(query.origin(), query.destination())
        )?;
        writeln!(f, "Departure: {}", query.departure())?;
        if let Some(ret) = query.return_date() {
            writeln!(f, "Return: {ret}")?;
        }
        if let Some(target) = query.target_price() {
            writeln!(f, "Target: {target:.2} {cur}")?;
        }

        Self::section(f, "KEY RECOMMENDATIONS")?;
        for (i, line) in result.recommendations.iter().enumerate() {
            writeln!(f, "{}. {line}", i + 1)?;
        }

        Self::section(f, "RANKED OPTIONS")?;
        for ranked in result.quotes.iter().take(TOP_OPTIONS) {
            let q = &ranked.quote;
            let marker = match ranked.meets_target {
                Some(true) => " *",
                _ => "",
            };
            writeln!(
                f,
                "{:>3}. {:<40} {:>10.2} {cur}  [{}, risk {}]{marker}",
                ranked.rank,
                q.label,
                q.comparable_amount(),
                q.strategy,
                q.risk,
            )?;
        }
        if result.quotes.len() > TOP_OPTIONS {
            writeln!(f, "     … {} more", result.quotes.len() - TOP_OPTIONS)?;
        }

        Self::section(f, "PRICE SUMMARY")?;
        writeln!(
            f,
            "Direct Flight: {:.2} {cur}",
            result.baseline.comparable_amount()
        )?;
        writeln!(
            f,
            "Cheapest Option: {:.2} {cur} ({})",
            result.cheapest.comparable_amount(),
            result.cheapest.strategy
        )?;
        writeln!(
            f,
            "Potential Savings: {:.2} {cur} ({:.2}%)",
            result.savings.absolute, result.savings.percentage
        )?;

        Self::section(f, "BOOKING LINKS")?;
        let trip = Trip::new(
            query.origin(),
            query.destination(),
            query.departure(),
            query.return_date(),
        );
        for site in SearchSite::ALL {
            writeln!(f, "{:<15} {}", site.display_name(), site.url(&trip))?;
        }

        let warnings: Vec<_> = result.warnings().collect();
        if !warnings.is_empty() {
            Self::section(f, "WARNINGS")?;
            for w in warnings {
                writeln!(f, "- [{}] {}", w.category, w.message)?;
            }
        }

        writeln!(f, "\n{heavy}")
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
