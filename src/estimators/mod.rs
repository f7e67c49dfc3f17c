//! Strategy estimators.
//!
//! Each estimator looks at a [`Query`] and produces price quotes and/or
//! advisories. Estimators are stateless apart from their configuration and
//! share nothing with each other, so the aggregator runs them concurrently:
//! - Routing — direct, hidden-city, nearby-airport and split-ticket fares
//! - Geo-pricing — the same itinerary bought from different markets
//! - Timing — booking-window and weekday judgment (advisory only)
//! - Tracking — anti-price-inflation search behaviour (advisory only)
//!
//! Platform pricing depends on the cheapest routing fare, so it runs as a
//! second phase inside the aggregator rather than through this trait.

pub mod fares;
pub mod geo;
pub mod platform;
pub mod routing;
pub mod timing;
pub mod tracking;

use anyhow::Result;
use async_trait::async_trait;

use crate::types::{Advisory, PriceQuote, Query};

/// Output of one estimator run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Findings {
    pub quotes: Vec<PriceQuote>,
    pub advisories: Vec<Advisory>,
}

impl Findings {
    pub fn quotes(quotes: Vec<PriceQuote>) -> Self {
        Self {
            quotes,
            advisories: Vec::new(),
        }
    }

    pub fn advisories(advisories: Vec<Advisory>) -> Self {
        Self {
            quotes: Vec::new(),
            advisories,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.quotes.is_empty() && self.advisories.is_empty()
    }
}

/// Abstraction over pricing strategies.
///
/// Any error returned here is recovered by the aggregator: the estimator
/// contributes nothing and a warning advisory is recorded.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Estimator: Send + Sync {
    /// Estimator name for logging and advisories.
    fn name(&self) -> &'static str;

    /// Produce quotes and advisories for the query.
    async fn estimate(&self, query: &Query) -> Result<Findings>;
}
