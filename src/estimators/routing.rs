//! Routing estimator.
//!
//! Prices the requested itinerary directly and looks for cheaper ways to
//! fly the same trip:
//! - hidden city: ticket to a city beyond the destination, leave at the layover
//! - nearby airports: swap origin and/or destination for a neighbouring airport
//! - split tickets: two separately booked legs through a connecting hub
//!
//! Exactly one `direct` quote is produced per run; it is the baseline every
//! saving is measured against. If the direct fare cannot be priced the whole
//! run fails, while a failing alternative is skipped.

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use tracing::{debug, info};

use super::fares::{FareRequest, FareSource};
use super::{Estimator, Findings};
use crate::airports;
use crate::config::SearchConfig;
use crate::links::Trip;
use crate::types::{AirportCode, AnalyzerError, PriceQuote, Query, RiskLevel, Strategy};

/// Ticketing past the destination is usually discounted against the
/// through fare.
const HIDDEN_CITY_FACTOR: Decimal = dec!(0.85);

pub struct RoutingEstimator {
    fares: Arc<dyn FareSource>,
    include_hidden_city: bool,
    include_nearby_airports: bool,
    max_alternatives: usize,
}

impl RoutingEstimator {
    pub fn new(fares: Arc<dyn FareSource>, config: &SearchConfig) -> Result<Self, AnalyzerError> {
        let max_alternatives = usize::try_from(config.max_alternatives)
            .ok()
            .filter(|n| *n > 0)
            .ok_or_else(|| {
                AnalyzerError::InvalidConfiguration(format!(
                    "max_alternatives must be positive, got {}",
                    config.max_alternatives
                ))
            })?;

        Ok(Self {
            fares,
            include_hidden_city: config.include_hidden_city,
            include_nearby_airports: config.include_nearby_airports,
            max_alternatives,
        })
    }

    fn quote(&self, strategy: Strategy, label: String, amount: Decimal) -> PriceQuote {
        PriceQuote::new(strategy, label, amount, self.fares.currency())
    }

    /// Fare lookup for an alternative; failures only cost that candidate.
    async fn try_fare(&self, request: &FareRequest) -> Option<Decimal> {
        match self.fares.fare(request).await {
            Ok(fare) => Some(fare),
            Err(e) => {
                debug!(
                    origin = %request.origin,
                    destination = %request.destination,
                    error = %e,
                    "Fare unavailable, skipping candidate"
                );
                None
            }
        }
    }

    async fn hidden_city(&self, query: &Query) -> Vec<PriceQuote> {
        // Disembarking early forfeits every later segment, return included.
        if query.is_round_trip() {
            debug!("Round trip, hidden-city search skipped");
            return Vec::new();
        }

        let (origin, destination) = (query.origin(), query.destination());
        let Some(through_fare) = self
            .try_fare(&FareRequest::one_way(query, origin, destination))
            .await
        else {
            return Vec::new();
        };

        let mut quotes = Vec::new();
        for beyond in airports::beyond(destination) {
            if &beyond == origin {
                continue;
            }
            let Some(fare) = self
                .try_fare(&FareRequest::one_way(query, origin, &beyond))
                .await
            else {
                continue;
            };

            let price = (fare * HIDDEN_CITY_FACTOR).round_dp(2);
            if price >= through_fare {
                continue;
            }
            quotes.push(
                self.quote(
                    Strategy::HiddenCity,
                    format!("Ticket to {beyond}, leave at {destination}"),
                    price,
                )
                .with_risk(RiskLevel::High)
                .with_meta("ticketed_destination", &beyond)
                .with_meta("disembark_at", destination)
                .with_meta(
                    "booking_link",
                    Trip::new(origin, &beyond, query.departure(), None).primary_link(),
                ),
            );
        }
        quotes
    }

    async fn nearby_airports(&self, query: &Query) -> Vec<PriceQuote> {
        let (origin, destination) = (query.origin(), query.destination());
        let origins: Vec<AirportCode> = std::iter::once(origin.clone())
            .chain(airports::nearby(origin))
            .collect();
        let destinations: Vec<AirportCode> = std::iter::once(destination.clone())
            .chain(airports::nearby(destination))
            .collect();

        let mut quotes = Vec::new();
        for from in &origins {
            for to in &destinations {
                if (from == origin && to == destination) || from == to {
                    continue;
                }
                let Some(fare) = self
                    .try_fare(&FareRequest::with_query_dates(query, from, to))
                    .await
                else {
                    continue;
                };
                quotes.push(
                    self.quote(
                        Strategy::NearbyAirport,
                        format!("Fly {from} → {to}"),
                        fare,
                    )
                    .with_risk(RiskLevel::Low)
                    .with_meta("origin", from)
                    .with_meta("destination", to)
                    .with_meta(
                        "booking_link",
                        Trip::new(from, to, query.departure(), query.return_date()).primary_link(),
                    ),
                );
            }
        }
        self.cheapest(quotes)
    }

    async fn split_tickets(&self, query: &Query) -> Vec<PriceQuote> {
        let (origin, destination) = (query.origin(), query.destination());

        let mut quotes = Vec::new();
        for hub in airports::hubs_between(origin, destination) {
            let mut legs = vec![
                FareRequest::leg(query, origin, &hub, query.departure()),
                FareRequest::leg(query, &hub, destination, query.departure()),
            ];
            if let Some(ret) = query.return_date() {
                legs.push(FareRequest::leg(query, destination, &hub, ret));
                legs.push(FareRequest::leg(query, &hub, origin, ret));
            }

            let mut total = Decimal::ZERO;
            let mut complete = true;
            for leg in &legs {
                match self.try_fare(leg).await {
                    Some(fare) => total += fare,
                    None => {
                        complete = false;
                        break;
                    }
                }
            }
            if !complete {
                continue;
            }

            quotes.push(
                self.quote(
                    Strategy::MultiLegSplit,
                    format!("Separate tickets via {hub}"),
                    total.round_dp(2),
                )
                .with_risk(RiskLevel::Medium)
                .with_meta("hub", &hub)
                .with_meta("legs", legs.len()),
            );
        }
        self.cheapest(quotes)
    }

    /// Keep the `max_alternatives` cheapest, preserving order among equals.
    fn cheapest(&self, mut quotes: Vec<PriceQuote>) -> Vec<PriceQuote> {
        quotes.sort_by(|a, b| a.amount.cmp(&b.amount));
        quotes.truncate(self.max_alternatives);
        quotes
    }
}

#[async_trait]
impl Estimator for RoutingEstimator {
    fn name(&self) -> &'static str {
        "routing"
    }

    async fn estimate(&self, query: &Query) -> Result<Findings> {
        let (origin, destination) = (query.origin(), query.destination());

        let direct_fare = self
            .fares
            .fare(&FareRequest::with_query_dates(query, origin, destination))
            .await
            .with_context(|| format!("Failed to price direct fare {origin} → {destination}"))?;

        let mut quotes = vec![self
            .quote(
                Strategy::Direct,
                format!("Direct {}", airports::format_route(origin, destination)),
                direct_fare,
            )
            .with_meta("origin", origin)
            .with_meta("destination", destination)
            .with_meta(
                "booking_link",
                Trip::new(origin, destination, query.departure(), query.return_date()).primary_link(),
            )];

        if self.include_hidden_city {
            quotes.extend(self.hidden_city(query).await);
        }
        if self.include_nearby_airports {
            quotes.extend(self.nearby_airports(query).await);
        }
        quotes.extend(self.split_tickets(query).await);

        info!(
            route = %query,
            direct = %direct_fare,
            alternatives = quotes.len() - 1,
            "Routing estimate complete"
        );

        Ok(Findings::quotes(quotes))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
