//! Booking links for the common flight search sites.
//!
//! Links are built from the route and dates alone, so the same itinerary
//! always yields the same URLs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::types::AirportCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchSite {
    GoogleFlights,
    Skyscanner,
    Kayak,
    Momondo,
    Kiwi,
    Expedia,
}

impl SearchSite {
    pub const ALL: [SearchSite; 6] = [
        SearchSite::GoogleFlights,
        SearchSite::Skyscanner,
        SearchSite::Kayak,
        SearchSite::Momondo,
        SearchSite::Kiwi,
        SearchSite::Expedia,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            SearchSite::GoogleFlights => "google_flights",
            SearchSite::Skyscanner => "skyscanner",
            SearchSite::Kayak => "kayak",
            SearchSite::Momondo => "momondo",
            SearchSite::Kiwi => "kiwi",
            SearchSite::Expedia => "expedia",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SearchSite::GoogleFlights => "Google Flights",
            SearchSite::Skyscanner => "Skyscanner",
            SearchSite::Kayak => "Kayak",
            SearchSite::Momondo => "Momondo",
            SearchSite::Kiwi => "Kiwi.com",
            SearchSite::Expedia => "Expedia",
        }
    }

    /// Search URL for this site.
    pub fn url(&self, trip: &Trip<'_>) -> String {
        let (o, d) = (trip.origin, trip.destination);
        let dep = trip.departure;
        match self {
            SearchSite::GoogleFlights => {
                let q = match trip.return_date {
                    Some(ret) => format!("Flights from {o} to {d} on {} return {}", iso(dep), iso(ret)),
                    None => format!("Flights from {o} to {d} on {}", iso(dep)),
                };
                format!("https://www.google.com/travel/flights?q={}", urlencoding::encode(&q))
            }
            SearchSite::Skyscanner => {
                let base = format!("https://www.skyscanner.com/transport/flights/{o}/{d}/{}", short(dep));
                match trip.return_date {
                    Some(ret) => format!("{base}/{}", short(ret)),
                    None => base,
                }
            }
            SearchSite::Kayak => match trip.return_date {
                Some(ret) => format!(
                    "https://www.kayak.com/flights/{o}-{d}/{}/{}/1adults",
                    iso(dep),
                    iso(ret)
                ),
                None => format!("https://www.kayak.com/flights/{o}-{d}/{}/1adults", iso(dep)),
            },
            SearchSite::Momondo => {
                let base = format!("https://www.momondo.com/flight-search/{o}-{d}/{}", iso(dep));
                match trip.return_date {
                    Some(ret) => format!("{base}/{}", iso(ret)),
                    None => base,
                }
            }
            SearchSite::Kiwi => {
                let mut params = vec![
                    ("sort", "price".to_string()),
                    ("aTime", "00:00".to_string()),
                    ("dTime", "00:00".to_string()),
                    ("origin", o.to_string()),
                    ("destination", d.to_string()),
                    ("departure", compact(dep)),
                ];
                if let Some(ret) = trip.return_date {
                    params.push(("return", compact(ret)));
                }
                format!("https://www.kiwi.com/en/search?{}", query_string(&params))
            }
            SearchSite::Expedia => {
                let mut params = vec![
                    (
                        "trip",
                        if trip.return_date.is_some() { "roundtrip" } else { "oneway" }.to_string(),
                    ),
                    ("leg1", format!("from:{o},to:{d},departure:{}", compact(dep))),
                ];
                if let Some(ret) = trip.return_date {
                    params.push(("leg2", format!("from:{d},to:{o},departure:{}", compact(ret))));
                }
                format!("https://www.expedia.com/Flights-Search?{}", query_string(&params))
            }
        }
    }
}

impl fmt::Display for SearchSite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The itinerary a link searches for.
#[derive(Debug, Clone, Copy)]
pub struct Trip<'a> {
    pub origin: &'a AirportCode,
    pub destination: &'a AirportCode,
    pub departure: NaiveDate,
    pub return_date: Option<NaiveDate>,
}

impl<'a> Trip<'a> {
    pub fn new(
        origin: &'a AirportCode,
        destination: &'a AirportCode,
        departure: NaiveDate,
        return_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            origin,
            destination,
            departure,
            return_date,
        }
    }

    /// Link used when only one is shown.
    pub fn primary_link(&self) -> String {
        SearchSite::GoogleFlights.url(self)
    }

    /// One link per supported site, keyed by site.
    pub fn links(&self) -> BTreeMap<SearchSite, String> {
        SearchSite::ALL
            .iter()
            .map(|site| (*site, site.url(self)))
            .collect()
    }
}

fn iso(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn compact(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// `yymmdd`, as Skyscanner paths expect.
fn short(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

fn query_string(params: &[(&str, String)]) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{k}={}", urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
