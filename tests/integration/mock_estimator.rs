//! Mock estimator for integration testing.
//!
//! Provides a deterministic `Estimator` implementation that returns fixed
//! quotes and advisories, counts its calls and can be forced to fail, all
//! in-memory with no external dependencies.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::sync::{Arc, Mutex};

use farecast::estimators::{Estimator, Findings};
use farecast::types::*;

/// A mock estimator for deterministic testing.
pub struct MockEstimator {
    name: &'static str,
    findings: Findings,
    calls: Arc<Mutex<usize>>,
    /// If set, every run returns this error.
    force_error: Arc<Mutex<Option<String>>>,
}

impl MockEstimator {
    pub fn new(name: &'static str, findings: Findings) -> Self {
        Self {
            name,
            findings,
            calls: Arc::new(Mutex::new(0)),
            force_error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_quotes(name: &'static str, quotes: Vec<PriceQuote>) -> Self {
        Self::new(name, Findings::quotes(quotes))
    }

    /// Force all subsequent runs to return an error.
    pub fn set_error(&self, msg: &str) {
        *self.force_error.lock().unwrap() = Some(msg.to_string());
    }

    /// Shared call counter, readable after the mock is boxed.
    pub fn calls(&self) -> Arc<Mutex<usize>> {
        self.calls.clone()
    }

    /// FRA → JFK routing fixture: direct 520.00, split ticket 420.50, nearby 480.00.
    pub fn fra_jfk_routing() -> Self {
        Self::with_quotes(
            "routing",
            vec![
                quote(Strategy::Direct, "Direct FRA → JFK", "520.00", "EUR"),
                quote(Strategy::MultiLegSplit, "Separate tickets via IST", "420.50", "EUR")
                    .with_risk(RiskLevel::Medium)
                    .with_meta("hub", "IST"),
                quote(Strategy::NearbyAirport, "Fly FRA → EWR", "480.00", "EUR")
                    .with_risk(RiskLevel::Low),
            ],
        )
    }
}

#[async_trait]
impl Estimator for MockEstimator {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn estimate(&self, _query: &Query) -> Result<Findings> {
        *self.calls.lock().unwrap() += 1;
        if let Some(msg) = self.force_error.lock().unwrap().as_ref() {
            return Err(anyhow!("{msg}"));
        }
        Ok(self.findings.clone())
    }
}

/// Build a raw quote from a decimal string.
pub fn quote(strategy: Strategy, label: &str, amount: &str, currency: &str) -> PriceQuote {
    let amount: Decimal = amount.parse().unwrap();
    PriceQuote::new(strategy, label, amount, currency)
}
