//! Shared types for the FARECAST engine.
//!
//! These types form the data model used across all modules. Estimators
//! produce `PriceQuote`s and `Advisory`s, the engine normalizes and ranks
//! them, and the terminal `AnalysisResult` is handed to the report layer.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ---------------------------------------------------------------------------
// Airport codes
// ---------------------------------------------------------------------------

/// A validated, upper-cased three-letter IATA airport code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AirportCode(String);

impl AirportCode {
    /// Parse an airport code, upper-casing it. Anything that is not exactly
    /// three ASCII letters is rejected.
    pub fn parse(raw: &str) -> Result<Self, AnalyzerError> {
        let code = raw.trim();
        if code.len() != 3 || !code.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(AnalyzerError::InvalidQuery(format!(
                "airport code must be three letters, got {raw:?}"
            )));
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AirportCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Parse a date in any of the accepted input formats
/// (`YYYY-MM-DD`, `DD.MM.YYYY`, `DD/MM/YYYY`).
pub fn parse_date(raw: &str) -> Result<NaiveDate, AnalyzerError> {
    const FORMATS: [&str; 3] = ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y"];
    let raw = raw.trim();
    FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        .ok_or_else(|| AnalyzerError::InvalidQuery(format!("unable to parse date: {raw}")))
}

// ---------------------------------------------------------------------------
// Query
// ---------------------------------------------------------------------------

/// A route/date search request.
///
/// Built once per invocation through [`Query::new`] and the `with_*`
/// builders, which enforce the route and date invariants. Fields are only
/// readable afterwards. Deserialization goes through the same checks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawQuery")]
pub struct Query {
    origin: AirportCode,
    destination: AirportCode,
    departure: NaiveDate,
    return_date: Option<NaiveDate>,
    /// The day the search is made. Every date-relative heuristic is computed
    /// against this, never against the wall clock.
    searched_on: NaiveDate,
    target_price: Option<Decimal>,
    countries: Option<Vec<String>>,
}

impl Query {
    pub fn new(
        origin: &str,
        destination: &str,
        departure: NaiveDate,
        return_date: Option<NaiveDate>,
        searched_on: NaiveDate,
    ) -> Result<Self, AnalyzerError> {
        let origin = AirportCode::parse(origin)?;
        let destination = AirportCode::parse(destination)?;

        if origin == destination {
            return Err(AnalyzerError::InvalidQuery(format!(
                "origin and destination are both {origin}"
            )));
        }
        if let Some(ret) = return_date {
            if ret < departure {
                return Err(AnalyzerError::InvalidQuery(format!(
                    "return date {ret} is before departure {departure}"
                )));
            }
        }

        Ok(Self {
            origin,
            destination,
            departure,
            return_date,
            searched_on,
            target_price: None,
            countries: None,
        })
    }

    /// Attach a target price in base currency. Must be positive.
    pub fn with_target_price(mut self, target: Decimal) -> Result<Self, AnalyzerError> {
        if target <= Decimal::ZERO {
            return Err(AnalyzerError::InvalidQuery(format!(
                "target price must be positive, got {target}"
            )));
        }
        self.target_price = Some(target);
        Ok(self)
    }

    /// Restrict geo-pricing to these country codes (upper-cased, de-duplicated).
    pub fn with_countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list: Vec<String> = Vec::new();
        for c in countries {
            let code = c.as_ref().trim().to_ascii_uppercase();
            if !code.is_empty() && !list.contains(&code) {
                list.push(code);
            }
        }
        self.countries = if list.is_empty() { None } else { Some(list) };
        self
    }

    pub fn origin(&self) -> &AirportCode {
        &self.origin
    }

    pub fn destination(&self) -> &AirportCode {
        &self.destination
    }

    pub fn departure(&self) -> NaiveDate {
        self.departure
    }

    pub fn return_date(&self) -> Option<NaiveDate> {
        self.return_date
    }

    pub fn searched_on(&self) -> NaiveDate {
        self.searched_on
    }

    pub fn target_price(&self) -> Option<Decimal> {
        self.target_price
    }

    pub fn countries(&self) -> Option<&[String]> {
        self.countries.as_deref()
    }

    pub fn is_round_trip(&self) -> bool {
        self.return_date.is_some()
    }

    /// Whole days between the search and departure (negative if departure
    /// already passed).
    pub fn days_until_departure(&self) -> i64 {
        (self.departure - self.searched_on).num_days()
    }
}

/// Unchecked wire form of [`Query`].
#[derive(Deserialize)]
struct RawQuery {
    origin: String,
    destination: String,
    departure: NaiveDate,
    return_date: Option<NaiveDate>,
    searched_on: NaiveDate,
    #[serde(default)]
    target_price: Option<Decimal>,
    #[serde(default)]
    countries: Option<Vec<String>>,
}

impl TryFrom<RawQuery> for Query {
    type Error = AnalyzerError;

    fn try_from(raw: RawQuery) -> Result<Self, Self::Error> {
        let mut query = Query::new(
            &raw.origin,
            &raw.destination,
            raw.departure,
            raw.return_date,
            raw.searched_on,
        )?;
        if let Some(target) = raw.target_price {
            query = query.with_target_price(target)?;
        }
        if let Some(countries) = raw.countries {
            query = query.with_countries(countries);
        }
        Ok(query)
    }
}

impl fmt::Display for Query {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} → {} on {}", self.origin, self.destination, self.departure)?;
        if let Some(ret) = self.return_date {
            write!(f, " (return {ret})")?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Enums
// ---------------------------------------------------------------------------

/// Pricing strategy that produced a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    Direct,
    HiddenCity,
    NearbyAirport,
    MultiLegSplit,
    GeoPricing,
    Platform,
}

impl Strategy {
    /// Tie-break priority: lower wins when two quotes cost the same.
    pub fn priority(&self) -> u8 {
        match self {
            Strategy::Direct => 0,
            Strategy::NearbyAirport => 1,
            Strategy::MultiLegSplit => 2,
            Strategy::HiddenCity => 3,
            Strategy::GeoPricing => 4,
            Strategy::Platform => 5,
        }
    }

    /// Strategies produced by the routing estimator.
    pub fn is_routing(&self) -> bool {
        matches!(
            self,
            Strategy::Direct
                | Strategy::HiddenCity
                | Strategy::NearbyAirport
                | Strategy::MultiLegSplit
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Direct => "direct",
            Strategy::HiddenCity => "hidden_city",
            Strategy::NearbyAirport => "nearby_airport",
            Strategy::MultiLegSplit => "multi_leg_split",
            Strategy::GeoPricing => "geo_pricing",
            Strategy::Platform => "platform",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Strategy {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "direct" => Ok(Strategy::Direct),
            "hidden_city" => Ok(Strategy::HiddenCity),
            "nearby_airport" | "nearby" => Ok(Strategy::NearbyAirport),
            "multi_leg_split" | "multi_leg" => Ok(Strategy::MultiLegSplit),
            "geo_pricing" | "geo" => Ok(Strategy::GeoPricing),
            "platform" => Ok(Strategy::Platform),
            _ => Err(anyhow::anyhow!("Unknown strategy: {s}")),
        }
    }
}

/// Risk attached to booking a quote. Ordered from safest to riskiest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    None,
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::None => write!(f, "none"),
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

// ---------------------------------------------------------------------------
// Price quotes
// ---------------------------------------------------------------------------

/// One estimated price for the query, as produced by an estimator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub strategy: Strategy,
    /// Short human description, e.g. "Split ticket via IST".
    pub label: String,
    /// Amount in `currency`.
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency: String,
    /// Amount in the base currency; `None` until normalized.
    pub normalized_amount: Option<Decimal>,
    pub risk: RiskLevel,
    pub metadata: BTreeMap<String, String>,
}

impl PriceQuote {
    pub fn new(
        strategy: Strategy,
        label: impl Into<String>,
        amount: Decimal,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            strategy,
            label: label.into(),
            amount,
            currency: currency.into().to_ascii_uppercase(),
            normalized_amount: None,
            risk: RiskLevel::None,
            metadata: BTreeMap::new(),
        }
    }

    pub fn with_risk(mut self, risk: RiskLevel) -> Self {
        self.risk = risk;
        self
    }

    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_normalized(&self) -> bool {
        self.normalized_amount.is_some()
    }

    /// Amount used for ranking. Falls back to the raw amount for quotes that
    /// were never normalized.
    pub fn comparable_amount(&self) -> Decimal {
        self.normalized_amount.unwrap_or(self.amount)
    }
}

impl fmt::Display for PriceQuote {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {} {:.2} {}",
            self.strategy, self.label, self.amount, self.currency
        )?;
        if let Some(n) = self.normalized_amount {
            write!(f, " (= {n:.2} base)")?;
        }
        write!(f, " risk={}", self.risk)
    }
}

// ---------------------------------------------------------------------------
// Advisories
// ---------------------------------------------------------------------------

/// Topic of an advisory. The aggregator keeps one informational advisory
/// per category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdvisoryCategory {
    Timing,
    PlatformTrust,
    SearchFrequency,
    BrowserPrivacy,
    PriceAlerts,
    SessionHygiene,
    BookingDiscipline,
    PlatformRotation,
    UnsupportedCountry,
    UnknownCurrency,
    EstimatorFailure,
    Baseline,
    DiscardedQuote,
}

impl fmt::Display for AdvisoryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AdvisoryCategory::Timing => "timing",
            AdvisoryCategory::PlatformTrust => "platform_trust",
            AdvisoryCategory::SearchFrequency => "search_frequency",
            AdvisoryCategory::BrowserPrivacy => "browser_privacy",
            AdvisoryCategory::PriceAlerts => "price_alerts",
            AdvisoryCategory::SessionHygiene => "session_hygiene",
            AdvisoryCategory::BookingDiscipline => "booking_discipline",
            AdvisoryCategory::PlatformRotation => "platform_rotation",
            AdvisoryCategory::UnsupportedCountry => "unsupported_country",
            AdvisoryCategory::UnknownCurrency => "unknown_currency",
            AdvisoryCategory::EstimatorFailure => "estimator_failure",
            AdvisoryCategory::Baseline => "baseline",
            AdvisoryCategory::DiscardedQuote => "discarded_quote",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Info,
    Warning,
}

/// Non-price guidance or a recorded, recovered failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Advisory {
    pub category: AdvisoryCategory,
    pub severity: Severity,
    pub message: String,
    pub metadata: BTreeMap<String, String>,
}

impl Advisory {
    pub fn info(category: AdvisoryCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Info,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    pub fn warning(category: AdvisoryCategory, message: impl Into<String>) -> Self {
        Self {
            category,
            severity: Severity::Warning,
            message: message.into(),
            metadata: BTreeMap::new(),
        }
    }

    /// Warning advisory recording a recovered error.
    pub fn from_error(err: &AnalyzerError) -> Self {
        let category = match err {
            AnalyzerError::UnsupportedCountry(_) => AdvisoryCategory::UnsupportedCountry,
            AnalyzerError::UnknownCurrency(_) => AdvisoryCategory::UnknownCurrency,
            AnalyzerError::InvalidBaseline(_) => AdvisoryCategory::Baseline,
            _ => AdvisoryCategory::EstimatorFailure,
        };
        Self::warning(category, err.to_string())
    }

    pub fn with_meta(mut self, key: &str, value: impl ToString) -> Self {
        self.metadata.insert(key.to_string(), value.to_string());
        self
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self.severity {
            Severity::Info => "",
            Severity::Warning => "WARNING ",
        };
        write!(f, "{tag}[{}] {}", self.category, self.message)
    }
}

// ---------------------------------------------------------------------------
// Analysis result
// ---------------------------------------------------------------------------

/// A quote in its final ranked position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedQuote {
    /// 1 = cheapest.
    pub rank: usize,
    pub quote: PriceQuote,
    /// `Some(..)` only when the query carried a target price.
    pub meets_target: Option<bool>,
}

/// Savings of the cheapest option relative to the direct baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Savings {
    /// Base currency, never negative.
    pub absolute: Decimal,
    /// Percent of the baseline, two decimals.
    pub percentage: Decimal,
}

/// The terminal artifact of one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub query: Query,
    pub base_currency: String,
    /// Ascending by normalized amount, tie-broken by strategy then risk.
    pub quotes: Vec<RankedQuote>,
    pub advisories: Vec<Advisory>,
    pub baseline: PriceQuote,
    pub cheapest: PriceQuote,
    pub savings: Savings,
    pub recommendations: Vec<String>,
}

impl AnalysisResult {
    /// Quotes produced by a given strategy, in ranking order.
    pub fn quotes_for(&self, strategy: Strategy) -> impl Iterator<Item = &RankedQuote> {
        self.quotes.iter().filter(move |q| q.quote.strategy == strategy)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Advisory> {
        self.advisories.iter().filter(|a| a.is_warning())
    }

    pub fn advisory(&self, category: AdvisoryCategory) -> Option<&Advisory> {
        self.advisories.iter().find(|a| a.category == category)
    }
}

impl fmt::Display for AnalysisResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} quotes | cheapest={} {:.2} {} | saves {:.2} ({:.2}%)",
            self.query,
            self.quotes.len(),
            self.cheapest.strategy,
            self.cheapest.comparable_amount(),
            self.base_currency,
            self.savings.absolute,
            self.savings.percentage,
        )
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Domain-specific error types for FARECAST.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AnalyzerError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Invalid query: {0}")]
    InvalidQuery(String),

    #[error("Unsupported country: {0}")]
    UnsupportedCountry(String),

    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),

    #[error("Estimator '{estimator}' failed: {message}")]
    EstimatorFailure { estimator: String, message: String },

    #[error("Invalid baseline: direct fare must be positive, got {0}")]
    InvalidBaseline(Decimal),

    #[error("Analysis cancelled")]
    Cancelled,
}

impl AnalyzerError {
    /// Fatal errors stop the run; the others are recovered into warnings.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            AnalyzerError::InvalidConfiguration(_)
                | AnalyzerError::InvalidQuery(_)
                | AnalyzerError::InvalidBaseline(_)
                | AnalyzerError::Cancelled
        )
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_airport_code_uppercases() {
        let code = AirportCode::parse(" fra ").unwrap();
        assert_eq!(code.as_str(), "FRA");
    }

    #[test]
    fn test_airport_code_rejects_bad_input() {
        assert!(AirportCode::parse("FR").is_err());
        assert!(AirportCode::parse("FRAN").is_err());
        assert!(AirportCode::parse("F1A").is_err());
    }

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2024-06-15").unwrap(), date(2024, 6, 15));
        assert_eq!(parse_date("15.06.2024").unwrap(), date(2024, 6, 15));
        assert_eq!(parse_date("15/06/2024").unwrap(), date(2024, 6, 15));
        assert!(matches!(
            parse_date("June 15"),
            Err(AnalyzerError::InvalidQuery(_))
        ));
    }

    #[test]
    fn test_query_rejects_same_airports() {
        let err = Query::new("FRA", "fra", date(2024, 6, 15), None, date(2024, 5, 1)).unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidQuery(_)));
    }

    #[test]
    fn test_query_deserialize_validates() {
        let query = Query::new("FRA", "JFK", date(2024, 6, 15), Some(date(2024, 6, 22)), date(2024, 5, 1))
            .unwrap()
            .with_target_price(dec!(450))
            .unwrap()
            .with_countries(["de", "pl"]);
        let json = serde_json::to_string(&query).unwrap();
        assert_eq!(serde_json::from_str::<Query>(&json).unwrap(), query);

        let same_airports = r#"{"origin":"FRA","destination":"fra","departure":"2024-06-15",
            "return_date":null,"searched_on":"2024-05-01","target_price":null,"countries":null}"#;
        assert!(serde_json::from_str::<Query>(same_airports).is_err());

        let backwards = r#"{"origin":"FRA","destination":"JFK","departure":"2024-06-15",
            "return_date":"2024-06-01","searched_on":"2024-05-01"}"#;
        assert!(serde_json::from_str::<Query>(backwards).is_err());

        let bad_target = r#"{"origin":"FRA","destination":"JFK","departure":"2024-06-15",
            "return_date":null,"searched_on":"2024-05-01","target_price":-5.0}"#;
        assert!(serde_json::from_str::<Query>(bad_target).is_err());
    }

    #[test]
    fn test_query_rejects_return_before_departure() {
        let err = Query::new(
            "FRA",
            "JFK",
            date(2024, 6, 15),
            Some(date(2024, 6, 14)),
            date(2024, 5, 1),
        )
        .unwrap_err();
        assert!(matches!(err, AnalyzerError::InvalidQuery(_)));
    }

    #[test]
    fn test_query_same_day_return_is_valid() {
        let q = Query::new(
            "FRA",
            "JFK",
            date(2024, 6, 15),
            Some(date(2024, 6, 15)),
            date(2024, 5, 1),
        )
        .unwrap();
        assert!(q.is_round_trip());
        assert_eq!(q.days_until_departure(), 45);
    }

    #[test]
    fn test_query_target_must_be_positive() {
        let q = Query::new("FRA", "JFK", date(2024, 6, 15), None, date(2024, 5, 1)).unwrap();
        assert!(q.clone().with_target_price(dec!(0)).is_err());
        let q = q.with_target_price(dec!(450)).unwrap();
        assert_eq!(q.target_price(), Some(dec!(450)));
    }

    #[test]
    fn test_query_countries_normalized() {
        let q = Query::new("FRA", "JFK", date(2024, 6, 15), None, date(2024, 5, 1))
            .unwrap()
            .with_countries(["de", "PL", "de", " "]);
        assert_eq!(q.countries().unwrap(), &["DE".to_string(), "PL".to_string()]);
    }

    #[test]
    fn test_strategy_priority_order() {
        let order = [
            Strategy::Direct,
            Strategy::NearbyAirport,
            Strategy::MultiLegSplit,
            Strategy::HiddenCity,
            Strategy::GeoPricing,
            Strategy::Platform,
        ];
        for pair in order.windows(2) {
            assert!(pair[0].priority() < pair[1].priority());
        }
    }

    #[test]
    fn test_strategy_from_str() {
        assert_eq!("hidden-city".parse::<Strategy>().unwrap(), Strategy::HiddenCity);
        assert_eq!("GEO".parse::<Strategy>().unwrap(), Strategy::GeoPricing);
        assert!("teleport".parse::<Strategy>().is_err());
    }

    #[test]
    fn test_strategy_serde_snake_case() {
        let json = serde_json::to_string(&Strategy::MultiLegSplit).unwrap();
        assert_eq!(json, "\"multi_leg_split\"");
    }

    #[test]
    fn test_risk_ordering() {
        assert!(RiskLevel::None < RiskLevel::Low);
        assert!(RiskLevel::Medium < RiskLevel::High);
    }

    #[test]
    fn test_quote_builder() {
        let q = PriceQuote::new(Strategy::HiddenCity, "via BOS", dec!(300), "eur")
            .with_risk(RiskLevel::High)
            .with_meta("ticketed_destination", "BOS");
        assert_eq!(q.currency, "EUR");
        assert_eq!(q.risk, RiskLevel::High);
        assert_eq!(q.metadata["ticketed_destination"], "BOS");
        assert!(!q.is_normalized());
        assert_eq!(q.comparable_amount(), dec!(300));
    }

    #[test]
    fn test_advisory_from_error_category() {
        let adv = Advisory::from_error(&AnalyzerError::UnknownCurrency("XYZ".into()));
        assert_eq!(adv.category, AdvisoryCategory::UnknownCurrency);
        assert!(adv.is_warning());
    }

    #[test]
    fn test_error_fatality() {
        assert!(AnalyzerError::InvalidConfiguration("x".into()).is_fatal());
        assert!(AnalyzerError::InvalidBaseline(dec!(0)).is_fatal());
        assert!(!AnalyzerError::UnsupportedCountry("XX".into()).is_fatal());
        assert!(!AnalyzerError::EstimatorFailure {
            estimator: "geo".into(),
            message: "boom".into()
        }
        .is_fatal());
    }
}
