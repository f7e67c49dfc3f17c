//! Geo-pricing estimator.
//!
//! Airlines price the same itinerary differently depending on the market it
//! is bought from. This estimator simulates the local price in each
//! requested country, quoted in that country's currency.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::fares::{FareRequest, FareSource};
use super::{Estimator, Findings};
use crate::engine::normalizer::RateTable;
use crate::types::{Advisory, AnalyzerError, PriceQuote, Query, RiskLevel, Strategy};

/// A point of sale: ISO code, name, price level relative to Germany, and
/// the currency fares are sold in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Market {
    pub code: &'static str,
    pub name: &'static str,
    pub multiplier: Decimal,
    pub currency: &'static str,
}

const MARKETS: &[Market] = &[
    Market { code: "DE", name: "Germany", multiplier: dec!(1.00), currency: "EUR" },
    Market { code: "FR", name: "France", multiplier: dec!(1.02), currency: "EUR" },
    Market { code: "GB", name: "United Kingdom", multiplier: dec!(1.15), currency: "GBP" },
    Market { code: "US", name: "United States", multiplier: dec!(1.12), currency: "USD" },
    Market { code: "CH", name: "Switzerland", multiplier: dec!(1.25), currency: "CHF" },
    Market { code: "ES", name: "Spain", multiplier: dec!(0.92), currency: "EUR" },
    Market { code: "IT", name: "Italy", multiplier: dec!(0.95), currency: "EUR" },
    Market { code: "NL", name: "Netherlands", multiplier: dec!(1.05), currency: "EUR" },
    Market { code: "PL", name: "Poland", multiplier: dec!(0.85), currency: "PLN" },
    Market { code: "TR", name: "Turkey", multiplier: dec!(0.80), currency: "TRY" },
    Market { code: "IN", name: "India", multiplier: dec!(0.75), currency: "INR" },
    Market { code: "TH", name: "Thailand", multiplier: dec!(0.82), currency: "THB" },
    Market { code: "AE", name: "UAE", multiplier: dec!(1.10), currency: "AED" },
    Market { code: "SG", name: "Singapore", multiplier: dec!(1.08), currency: "USD" },
    Market { code: "AU", name: "Australia", multiplier: dec!(1.18), currency: "AUD" },
    Market { code: "BR", name: "Brazil", multiplier: dec!(0.88), currency: "USD" },
    Market { code: "MX", name: "Mexico", multiplier: dec!(0.83), currency: "USD" },
    Market { code: "AR", name: "Argentina", multiplier: dec!(0.79), currency: "USD" },
];

/// Look up a simulated market by ISO country code.
pub fn market(code: &str) -> Result<&'static Market, AnalyzerError> {
    let code = code.trim().to_ascii_uppercase();
    MARKETS
        .iter()
        .find(|m| m.code == code)
        .ok_or(AnalyzerError::UnsupportedCountry(code))
}

pub struct GeoPricingEstimator {
    fares: Arc<dyn FareSource>,
    rates: Arc<RateTable>,
    default_countries: Vec<String>,
}

impl GeoPricingEstimator {
    pub fn new(fares: Arc<dyn FareSource>, rates: Arc<RateTable>, default_countries: Vec<String>) -> Self {
        Self {
            fares,
            rates,
            default_countries,
        }
    }

    /// Local price for one market, given the reference fare in base currency.
    fn local_quote(&self, market: &Market, base_fare: Decimal) -> Result<PriceQuote, AnalyzerError> {
        let units = self
            .rates
            .units_per_base(market.currency)
            .ok_or_else(|| AnalyzerError::UnknownCurrency(market.currency.to_string()))?;
        let local = (base_fare * market.multiplier * units).round_dp(2);

        Ok(
            PriceQuote::new(
                Strategy::GeoPricing,
                format!("Book from {}", market.name),
                local,
                market.currency,
            )
            .with_risk(RiskLevel::Low)
            .with_meta("country", market.code)
            .with_meta("country_name", market.name)
            .with_meta("exchange_rate", units)
            .with_meta("multiplier", market.multiplier),
        )
    }
}

#[async_trait]
impl Estimator for GeoPricingEstimator {
    fn name(&self) -> &'static str {
        "geo_pricing"
    }

    async fn estimate(&self, query: &Query) -> Result<Findings> {
        let countries: &[String] = query.countries().unwrap_or(&self.default_countries);
        if countries.is_empty() {
            debug!("No countries to compare");
            return Ok(Findings::default());
        }

        let request = FareRequest::with_query_dates(query, query.origin(), query.destination());
        let fare = self
            .fares
            .fare(&request)
            .await
            .context("Failed to price reference fare")?;
        let base_fare = self.rates.to_base(fare, self.fares.currency())?;

        let mut findings = Findings::default();
        for country in countries {
            match market(country).and_then(|m| self.local_quote(m, base_fare)) {
                Ok(quote) => findings.quotes.push(quote),
                Err(e) => {
                    warn!(country = %country, error = %e, "Skipping market");
                    findings
                        .advisories
                        .push(Advisory::from_error(&e).with_meta("country", country));
                }
            }
        }

        info!(
            markets = findings.quotes.len(),
            skipped = findings.advisories.len(),
            "Geo-pricing estimate complete"
        );
        Ok(findings)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::normalizer::normalize;
    use crate::estimators::fares::FareTable;
    use crate::types::AdvisoryCategory;
    use chrono::NaiveDate;

    fn query() -> Query {
        Query::new(
            "FRA",
            "JFK",
            NaiveDate::from_ymd_opt(2024, 6, 15).unwrap(),
            None,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .unwrap()
    }

    fn estimator(defaults: &[&str]) -> GeoPricingEstimator {
        GeoPricingEstimator::new(
            Arc::new(FareTable::new("EUR").with_fare("FRA", "JFK", dec!(500))),
            Arc::new(RateTable::builtin("EUR").unwrap()),
            defaults.iter().map(|c| c.to_string()).collect(),
        )
    }

    #[test]
    fn test_market_lookup() {
        assert_eq!(market("pl").unwrap().currency, "PLN");
        assert_eq!(MARKETS.len(), 18);
        assert_eq!(
            market("XX").unwrap_err(),
            AnalyzerError::UnsupportedCountry("XX".into())
        );
    }

    #[tokio::test]
    async fn test_poland_cheaper_than_germany() {
        let rates = RateTable::builtin("EUR").unwrap();
        let findings = estimator(&["DE", "PL"]).estimate(&query()).await.unwrap();
        assert_eq!(findings.quotes.len(), 2);

        let de = &findings.quotes[0];
        assert_eq!(de.currency, "EUR");
        assert_eq!(de.amount, dec!(500.00));

        let pl = &findings.quotes[1];
        assert_eq!(pl.currency, "PLN");
        assert_eq!(pl.metadata["country"], "PL");
        assert_eq!(pl.metadata["exchange_rate"], "4.32");
        assert_eq!(
            normalize(pl, &rates).unwrap().normalized_amount,
            Some(dec!(425.00))
        );
    }

    #[tokio::test]
    async fn test_query_countries_override_defaults() {
        let q = query().with_countries(["TR"]);
        let findings = estimator(&["DE", "PL"]).estimate(&q).await.unwrap();
        assert_eq!(findings.quotes.len(), 1);
        assert_eq!(findings.quotes[0].metadata["country"], "TR");
    }

    #[tokio::test]
    async fn test_unknown_country_becomes_warning() {
        let q = query().with_countries(["DE", "XX"]);
        let findings = estimator(&[]).estimate(&q).await.unwrap();
        assert_eq!(findings.quotes.len(), 1);
        assert_eq!(findings.advisories.len(), 1);
        let adv = &findings.advisories[0];
        assert_eq!(adv.category, AdvisoryCategory::UnsupportedCountry);
        assert!(adv.is_warning());
        assert_eq!(adv.metadata["country"], "XX");
    }

    #[tokio::test]
    async fn test_no_countries_yields_nothing() {
        let findings = estimator(&[]).estimate(&query()).await.unwrap();
        assert!(findings.is_empty());
    }

    #[tokio::test]
    async fn test_deterministic() {
        let est = estimator(&["DE", "FR", "GB", "PL", "IN"]);
        let a = est.estimate(&query()).await.unwrap();
        let b = est.estimate(&query()).await.unwrap();
        assert_eq!(a, b);
    }
}
