//! Anti-price-inflation search advice.
//!
//! Booking sites may raise the shown price for a route the visitor keeps
//! searching. This advisor turns the configured search policy into one
//! advisory per behavioural rule.

use anyhow::Result;
use async_trait::async_trait;

use super::{Estimator, Findings};
use crate::config::InflationConfig;
use crate::types::{Advisory, AdvisoryCategory, Query};

/// Monitoring cadence by distance to departure: (more than N days, cadence,
/// minimum hours between searches).
const CADENCE: &[(i64, &str, u32)] = &[
    (90, "once per week", 168),
    (30, "twice per week", 72),
    (14, "every other day", 48),
    (7, "daily", 24),
];
const FINAL_WEEK_CADENCE: (&str, u32) = ("every 12 hours", 12);

fn cadence(days_until_departure: i64) -> (&'static str, u32) {
    CADENCE
        .iter()
        .find(|(over, _, _)| days_until_departure > *over)
        .map(|(_, cadence, hours)| (*cadence, *hours))
        .unwrap_or(FINAL_WEEK_CADENCE)
}

pub struct TrackingAdvisor {
    max_searches_per_day: i64,
    require_incognito_mode: bool,
}

impl TrackingAdvisor {
    pub fn new(config: &InflationConfig) -> Self {
        Self {
            max_searches_per_day: config.max_searches_per_day,
            require_incognito_mode: config.require_incognito_mode,
        }
    }

    pub fn rules(&self, query: &Query) -> Vec<Advisory> {
        let days = query.days_until_departure();
        let (cadence, min_hours) = cadence(days);

        let privacy = if self.require_incognito_mode {
            Advisory::info(
                AdvisoryCategory::BrowserPrivacy,
                "Always search in incognito/private mode, never in a regular browser window",
            )
            .with_meta("incognito_required", true)
        } else {
            Advisory::info(
                AdvisoryCategory::BrowserPrivacy,
                "Prefer private browsing when re-checking the same route",
            )
            .with_meta("incognito_required", false)
        };

        vec![
            Advisory::info(
                AdvisoryCategory::SearchFrequency,
                format!(
                    "Search this route at most {} time(s) per day; with {days} days to go, checking {cadence} is enough",
                    self.max_searches_per_day
                ),
            )
            .with_meta("max_searches_per_day", self.max_searches_per_day)
            .with_meta("cadence", cadence)
            .with_meta("min_hours_between", min_hours),
            privacy,
            Advisory::info(
                AdvisoryCategory::PriceAlerts,
                "Set up price alerts and wait for them instead of searching actively",
            ),
            Advisory::info(
                AdvisoryCategory::SessionHygiene,
                "Run one search per session, then clear cookies, cache and local storage",
            ),
            Advisory::info(
                AdvisoryCategory::BookingDiscipline,
                match query.target_price() {
                    Some(target) => format!(
                        "Book within the hour once the fare reaches {target:.2}; do not enter passenger details unless committing"
                    ),
                    None => "Book promptly once a fare meets your target; do not enter passenger details unless committing".to_string(),
                },
            ),
            Advisory::info(
                AdvisoryCategory::PlatformRotation,
                "Do not search the same platform twice in a row; vary devices and search times",
            ),
        ]
    }
}

#[async_trait]
impl Estimator for TrackingAdvisor {
    fn name(&self) -> &'static str {
        "tracking"
    }

    async fn estimate(&self, query: &Query) -> Result<Findings> {
        Ok(Findings::advisories(self.rules(query)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use std::collections::HashSet;

    fn query(departure: (i32, u32, u32)) -> Query {
        Query::new(
            "FRA",
            "JFK",
            NaiveDate::from_ymd_opt(departure.0, departure.1, departure.2).unwrap(),
            None,
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
        )
        .unwrap()
    }

    #[test]
    fn test_cadence_table() {
        assert_eq!(cadence(120), ("once per week", 168));
        assert_eq!(cadence(45), ("twice per week", 72));
        assert_eq!(cadence(20), ("every other day", 48));
        assert_eq!(cadence(10), ("daily", 24));
        assert_eq!(cadence(7), ("every 12 hours", 12));
    }

    #[test]
    fn test_one_advisory_per_category() {
        let rules = TrackingAdvisor::new(&InflationConfig::default()).rules(&query((2024, 6, 15)));
        let categories: HashSet<_> = rules.iter().map(|a| a.category).collect();
        assert_eq!(categories.len(), rules.len());
        assert_eq!(rules.len(), 6);
        assert!(rules.iter().all(|a| !a.is_warning()));
    }

    #[test]
    fn test_frequency_reflects_config() {
        let config = InflationConfig {
            max_searches_per_day: 3,
            ..InflationConfig::default()
        };
        let rules = TrackingAdvisor::new(&config).rules(&query((2024, 6, 15)));
        let freq = rules
            .iter()
            .find(|a| a.category == AdvisoryCategory::SearchFrequency)
            .unwrap();
        assert_eq!(freq.metadata["max_searches_per_day"], "3");
        assert!(freq.message.contains("at most 3 time(s)"));
    }

    #[test]
    fn test_incognito_switch() {
        let config = InflationConfig {
            require_incognito_mode: false,
            ..InflationConfig::default()
        };
        let rules = TrackingAdvisor::new(&config).rules(&query((2024, 6, 15)));
        let privacy = rules
            .iter()
            .find(|a| a.category == AdvisoryCategory::BrowserPrivacy)
            .unwrap();
        assert_eq!(privacy.metadata["incognito_required"], "false");
    }

    #[test]
    fn test_target_price_in_booking_rule() {
        let q = query((2024, 6, 15)).with_target_price(dec!(450)).unwrap();
        let rules = TrackingAdvisor::new(&InflationConfig::default()).rules(&q);
        let booking = rules
            .iter()
            .find(|a| a.category == AdvisoryCategory::BookingDiscipline)
            .unwrap();
        assert!(booking.message.contains("450.00"));
    }

    #[test]
    fn test_deterministic() {
        let advisor = TrackingAdvisor::new(&InflationConfig::default());
        let q = query((2024, 6, 15));
        let a = tokio_test::block_on(advisor.estimate(&q)).unwrap();
        let b = tokio_test::block_on(advisor.estimate(&q)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.quotes.len(), 0);
    }
}
