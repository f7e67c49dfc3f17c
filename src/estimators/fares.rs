//! Fare sources.
//!
//! The routing and geo-pricing estimators never compute fares themselves;
//! they ask a [`FareSource`]. [`SimulatedFares`] is the deterministic
//! heuristic used by default. [`FareTable`] serves fixed prices and is handy
//! for offline runs and tests.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

use crate::airports;
use crate::types::{AirportCode, Query};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Base one-way fare for a domestic hop.
const BASE_FARE: Decimal = dec!(150.00);

const INTERNATIONAL_MULTIPLIER: Decimal = dec!(2.5);

/// Departures at most this many days out pay the steep surcharge.
const VERY_LATE_DAYS: i64 = 7;
const VERY_LATE_MULTIPLIER: Decimal = dec!(1.5);

/// Departures at most this many days out pay the mild surcharge.
const LATE_DAYS: i64 = 21;
const LATE_MULTIPLIER: Decimal = dec!(1.2);

const ROUND_TRIP_MULTIPLIER: Decimal = dec!(1.8);

/// One fare lookup: a single ticket between two airports.
#[derive(Debug, Clone, PartialEq)]
pub struct FareRequest {
    pub origin: AirportCode,
    pub destination: AirportCode,
    pub departure: NaiveDate,
    pub return_date: Option<NaiveDate>,
    pub searched_on: NaiveDate,
}

impl FareRequest {
    /// One-way ticket between any two airports, dated like the query.
    pub fn one_way(query: &Query, origin: &AirportCode, destination: &AirportCode) -> Self {
        Self {
            origin: origin.clone(),
            destination: destination.clone(),
            departure: query.departure(),
            return_date: None,
            searched_on: query.searched_on(),
        }
    }

    /// Ticket between two airports carrying the query's return date.
    pub fn with_query_dates(query: &Query, origin: &AirportCode, destination: &AirportCode) -> Self {
        Self {
            return_date: query.return_date(),
            ..Self::one_way(query, origin, destination)
        }
    }

    /// Single leg flown on a given day.
    pub fn leg(query: &Query, origin: &AirportCode, destination: &AirportCode, on: NaiveDate) -> Self {
        Self {
            departure: on,
            ..Self::one_way(query, origin, destination)
        }
    }

    pub fn days_ahead(&self) -> i64 {
        (self.departure - self.searched_on).num_days()
    }
}

/// Source of ticket prices.
#[async_trait]
pub trait FareSource: Send + Sync {
    /// Currency every fare from this source is quoted in.
    fn currency(&self) -> &str;

    /// Price of one ticket.
    async fn fare(&self, request: &FareRequest) -> Result<Decimal>;
}

// ---------------------------------------------------------------------------
// Simulated fares
// ---------------------------------------------------------------------------

/// Deterministic fare heuristic.
///
/// Distance is approximated by "crosses a border or not"; a route factor in
/// `[0.80, 1.30)` derived from the airport codes stands in for market noise,
/// so the same request always costs the same.
#[derive(Debug, Clone, Default)]
pub struct SimulatedFares;

impl SimulatedFares {
    pub fn new() -> Self {
        Self
    }

    fn route_factor(origin: &AirportCode, destination: &AirportCode) -> Decimal {
        let sum: u32 = origin
            .as_str()
            .bytes()
            .chain(destination.as_str().bytes())
            .map(u32::from)
            .sum();
        dec!(0.80) + Decimal::from(sum % 50) / dec!(100)
    }

    fn price(request: &FareRequest) -> Decimal {
        let mut price = BASE_FARE;

        if airports::is_international(&request.origin, &request.destination) {
            price *= INTERNATIONAL_MULTIPLIER;
        }

        price *= Self::route_factor(&request.origin, &request.destination);

        let days = request.days_ahead();
        if days <= VERY_LATE_DAYS {
            price *= VERY_LATE_MULTIPLIER;
        } else if days <= LATE_DAYS {
            price *= LATE_MULTIPLIER;
        }

        if request.return_date.is_some() {
            price *= ROUND_TRIP_MULTIPLIER;
        }

        price.round_dp(2)
    }
}

#[async_trait]
impl FareSource for SimulatedFares {
    fn currency(&self) -> &str {
        "EUR"
    }

    async fn fare(&self, request: &FareRequest) -> Result<Decimal> {
        Ok(Self::price(request))
    }
}

// ---------------------------------------------------------------------------
// Fixed fare table
// ---------------------------------------------------------------------------

/// Fixed prices per airport pair, ignoring dates. Pairs not in the table
/// use the fallback fare, or fail when there is none.
#[derive(Debug, Clone)]
pub struct FareTable {
    currency: String,
    fares: HashMap<(String, String), Decimal>,
    fallback: Option<Decimal>,
}

impl FareTable {
    pub fn new(currency: &str) -> Self {
        Self {
            currency: currency.to_ascii_uppercase(),
            fares: HashMap::new(),
            fallback: None,
        }
    }

    pub fn with_fare(mut self, origin: &str, destination: &str, fare: Decimal) -> Self {
        self.fares.insert(
            (origin.to_ascii_uppercase(), destination.to_ascii_uppercase()),
            fare,
        );
        self
    }

    pub fn with_fallback(mut self, fare: Decimal) -> Self {
        self.fallback = Some(fare);
        self
    }
}

#[async_trait]
impl FareSource for FareTable {
    fn currency(&self) -> &str {
        &self.currency
    }

    async fn fare(&self, request: &FareRequest) -> Result<Decimal> {
        let key = (
            request.origin.as_str().to_string(),
            request.destination.as_str().to_string(),
        );
        self.fares
            .get(&key)
            .copied()
            .or(self.fallback)
            .ok_or_else(|| anyhow!("No fare for {} → {}", request.origin, request.destination))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
