//! Final textual recommendations.
//!
//! Derived purely from an assembled [`AnalysisResult`], so the same result
//! always yields the same lines in the same order.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::types::{AdvisoryCategory, AnalysisResult, RiskLevel, Strategy};

/// A foreign market is only worth mentioning past this saving (base currency).
const GEO_SAVINGS_THRESHOLD: Decimal = dec!(30);

pub fn build(result: &AnalysisResult) -> Vec<String> {
    let cur = &result.base_currency;
    let baseline = result.baseline.comparable_amount();
    let mut lines = Vec::new();

    // Cheapest option
    let cheapest = &result.cheapest;
    if result.savings.absolute > Decimal::ZERO {
        let mut line = format!(
            "Best option: {} ({}) at {:.2} {cur}, saving {:.2} {cur} ({:.2}%) against the direct fare",
            cheapest.label,
            cheapest.strategy,
            cheapest.comparable_amount(),
            result.savings.absolute,
            result.savings.percentage,
        );
        if cheapest.risk >= RiskLevel::Medium {
            line.push_str(&format!(" (risk: {})", cheapest.risk));
        }
        lines.push(line);
    } else {
        lines.push(format!(
            "Book the direct flight: at {baseline:.2} {cur} no alternative beats it"
        ));
    }

    // Geo-pricing
    if let Some(geo) = result.quotes_for(Strategy::GeoPricing).next() {
        let quote = &geo.quote;
        let saving = baseline - quote.comparable_amount();
        if saving > GEO_SAVINGS_THRESHOLD {
            let market = quote
                .metadata
                .get("country_name")
                .map(String::as_str)
                .unwrap_or(quote.label.as_str());
            lines.push(format!(
                "Geo-pricing: buying from {market} costs {:.2} {} (about {:.2} {cur}), {saving:.2} {cur} below the direct fare",
                quote.amount,
                quote.currency,
                quote.comparable_amount(),
            ));
        }
    }

    // Timing
    if let Some(timing) = result.advisory(AdvisoryCategory::Timing) {
        lines.push(format!("Timing: {}", timing.message));
    }

    // Anti-inflation
    if let Some(freq) = result.advisory(AdvisoryCategory::SearchFrequency) {
        let max = freq
            .metadata
            .get("max_searches_per_day")
            .map(String::as_str)
            .unwrap_or("2");
        let incognito = result
            .advisory(AdvisoryCategory::BrowserPrivacy)
            .and_then(|a| a.metadata.get("incognito_required"))
            .is_some_and(|v| v == "true");
        let prefix = if incognito { "search in incognito mode and " } else { "" };
        lines.push(format!(
            "Avoid price inflation: {prefix}limit yourself to {max} search(es) per day for this route"
        ));
    }

    // Platform
    if let Some(platform) = result.quotes_for(Strategy::Platform).next() {
        let quote = &platform.quote;
        let name = quote
            .metadata
            .get("platform_name")
            .map(String::as_str)
            .unwrap_or(quote.label.as_str());
        let reliability = quote
            .metadata
            .get("reliability")
            .map(|r| format!(", reliability {r}/10"))
            .unwrap_or_default();
        lines.push(format!(
            "Platform: book via {name} for {:.2} {cur}{reliability}",
            quote.comparable_amount()
        ));
    }

    // Price alerts
    match result.query.target_price() {
        Some(target) => {
            let meeting = result
                .quotes
                .iter()
                .filter(|q| q.meets_target == Some(true))
                .count();
            if meeting > 0 {
                lines.push(format!(
                    "Target {target:.2} {cur}: {meeting} option(s) already meet it, book now"
                ));
            } else {
                lines.push(format!(
                    "Target {target:.2} {cur}: not reached yet, set a price alert and wait"
                ));
            }
        }
        None => lines.push("Set up price alerts to catch fare drops without searching".to_string()),
    }

    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
