//! Booking platform comparison.
//!
//! The same fare costs different amounts depending on where it is booked:
//! airlines sell at face value, OTAs add service fees and/or a percentage
//! markup, meta-search engines hand off at the fare they found.
//!
//! Platform pricing needs a base fare, so this runs after the routing
//! results are normalized, priced off the cheapest routing quote.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::Findings;
use crate::config::PlatformCompareConfig;
use crate::types::{Advisory, AdvisoryCategory, AnalyzerError, PriceQuote, RiskLevel, Strategy};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlatformKind {
    Airline,
    MajorOta,
    MetaSearch,
    Regional,
}

impl fmt::Display for PlatformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlatformKind::Airline => write!(f, "airline"),
            PlatformKind::MajorOta => write!(f, "major_ota"),
            PlatformKind::MetaSearch => write!(f, "meta_search"),
            PlatformKind::Regional => write!(f, "regional"),
        }
    }
}

/// How a platform turns a base fare into the price the traveller pays.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeeModel {
    /// Face value.
    AirlineDirect,
    FixedFee(Decimal),
    /// Percent on top of the fare.
    Markup(Decimal),
    FeeAndMarkup { fee: Decimal, markup_pct: Decimal },
}

impl FeeModel {
    /// Total price, rounded to cents. The markup applies before the fee.
    pub fn total(&self, base: Decimal) -> Decimal {
        let marked_up = |pct: Decimal| base * (Decimal::ONE + pct / dec!(100));
        let total = match *self {
            FeeModel::AirlineDirect => base,
            FeeModel::FixedFee(fee) => base + fee,
            FeeModel::Markup(pct) => marked_up(pct),
            FeeModel::FeeAndMarkup { fee, markup_pct } => marked_up(markup_pct) + fee,
        };
        total.round_dp(2)
    }
}

impl fmt::Display for FeeModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FeeModel::AirlineDirect => write!(f, "airline_direct"),
            FeeModel::FixedFee(fee) => write!(f, "fixed_fee({fee})"),
            FeeModel::Markup(pct) => write!(f, "markup({pct}%)"),
            FeeModel::FeeAndMarkup { fee, markup_pct } => {
                write!(f, "fee_and_markup({fee} + {markup_pct}%)")
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Platform {
    pub key: &'static str,
    pub name: &'static str,
    pub kind: PlatformKind,
    pub fee_model: FeeModel,
    /// 1–10.
    pub reliability: u8,
}

impl Platform {
    pub fn risk(&self) -> RiskLevel {
        match self.reliability {
            9..=u8::MAX => RiskLevel::None,
            7..=8 => RiskLevel::Low,
            _ => RiskLevel::Medium,
        }
    }
}

/// Candidate added when the selection holds no airline.
const AIRLINE_DIRECT: Platform = Platform {
    key: "airline_direct",
    name: "Airline Direct",
    kind: PlatformKind::Airline,
    fee_model: FeeModel::AirlineDirect,
    reliability: 10,
};

pub const CATALOGUE: &[Platform] = &[
    Platform { key: "lufthansa_direct", name: "Lufthansa Direct", kind: PlatformKind::Airline, fee_model: FeeModel::AirlineDirect, reliability: 10 },
    Platform { key: "ryanair_direct", name: "Ryanair Direct", kind: PlatformKind::Airline, fee_model: FeeModel::AirlineDirect, reliability: 9 },
    Platform { key: "expedia", name: "Expedia", kind: PlatformKind::MajorOta, fee_model: FeeModel::FeeAndMarkup { fee: dec!(12.99), markup_pct: dec!(2.5) }, reliability: 9 },
    Platform { key: "booking_com", name: "Booking.com", kind: PlatformKind::MajorOta, fee_model: FeeModel::Markup(dec!(3.0)), reliability: 8 },
    Platform { key: "kayak", name: "Kayak", kind: PlatformKind::MetaSearch, fee_model: FeeModel::Markup(dec!(0)), reliability: 9 },
    Platform { key: "skyscanner", name: "Skyscanner", kind: PlatformKind::MetaSearch, fee_model: FeeModel::Markup(dec!(0)), reliability: 8 },
    Platform { key: "google_flights", name: "Google Flights", kind: PlatformKind::MetaSearch, fee_model: FeeModel::Markup(dec!(0)), reliability: 10 },
    Platform { key: "momondo", name: "Momondo", kind: PlatformKind::MetaSearch, fee_model: FeeModel::Markup(dec!(0)), reliability: 7 },
    Platform { key: "opodo", name: "Opodo", kind: PlatformKind::Regional, fee_model: FeeModel::FeeAndMarkup { fee: dec!(8.99), markup_pct: dec!(1.5) }, reliability: 6 },
    Platform { key: "edreams", name: "eDreams", kind: PlatformKind::Regional, fee_model: FeeModel::FeeAndMarkup { fee: dec!(9.99), markup_pct: dec!(2.0) }, reliability: 5 },
    Platform { key: "kiwi_com", name: "Kiwi.com", kind: PlatformKind::Regional, fee_model: FeeModel::Markup(dec!(1.0)), reliability: 6 },
    Platform { key: "lastminute_com", name: "Lastminute.com", kind: PlatformKind::Regional, fee_model: FeeModel::FeeAndMarkup { fee: dec!(6.99), markup_pct: dec!(1.5) }, reliability: 7 },
];

pub struct PlatformEstimator {
    platforms: Vec<Platform>,
}

impl PlatformEstimator {
    /// Select platforms by key (empty = whole catalogue). Unknown keys are a
    /// configuration error.
    pub fn new(config: &PlatformCompareConfig) -> Result<Self, AnalyzerError> {
        let mut platforms = if config.platforms.is_empty() {
            CATALOGUE.to_vec()
        } else {
            config
                .platforms
                .iter()
                .map(|key| {
                    let key = key.trim().to_ascii_lowercase();
                    CATALOGUE
                        .iter()
                        .chain(std::iter::once(&AIRLINE_DIRECT))
                        .find(|p| p.key == key)
                        .copied()
                        .ok_or_else(|| {
                            AnalyzerError::InvalidConfiguration(format!("unknown platform: {key}"))
                        })
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        if !platforms
            .iter()
            .any(|p| p.fee_model == FeeModel::AirlineDirect)
        {
            platforms.insert(0, AIRLINE_DIRECT);
        }

        Ok(Self { platforms })
    }

    pub fn platforms(&self) -> &[Platform] {
        &self.platforms
    }

    /// One quote per platform, priced from `base` in the base currency, plus
    /// a trust advisory for the cheapest platform. A platform quote is never
    /// less risky than the itinerary it resells.
    pub fn price(&self, base: &PriceQuote, base_currency: &str) -> Findings {
        let base_amount = base.comparable_amount();
        let mut findings = Findings::default();
        let mut cheapest: Option<(&Platform, Decimal)> = None;

        for platform in &self.platforms {
            let total = platform.fee_model.total(base_amount);
            findings.quotes.push(
                PriceQuote::new(
                    Strategy::Platform,
                    format!("Book on {}", platform.name),
                    total,
                    base_currency,
                )
                .with_risk(platform.risk().max(base.risk))
                .with_meta("platform", platform.key)
                .with_meta("platform_name", platform.name)
                .with_meta("kind", platform.kind)
                .with_meta("fee_model", platform.fee_model)
                .with_meta("reliability", platform.reliability)
                .with_meta("based_on", base.strategy),
            );

            let better = match cheapest {
                None => true,
                Some((best, best_total)) => {
                    total < best_total
                        || (total == best_total && platform.reliability > best.reliability)
                }
            };
            if better {
                cheapest = Some((platform, total));
            }
        }

        if let Some((platform, total)) = cheapest {
            debug!(platform = platform.key, total = %total, "Cheapest platform");
            findings.advisories.push(
                Advisory::info(
                    AdvisoryCategory::PlatformTrust,
                    format!(
                        "{} offers the lowest price ({total:.2} {base_currency}) with reliability {}/10",
                        platform.name, platform.reliability
                    ),
                )
                .with_meta("platform", platform.key)
                .with_meta("reliability", platform.reliability),
            );
        }

        findings
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
