//! End-to-end pipeline tests: estimators → normalizer → aggregator → report.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;
use std::time::Duration;

use farecast::config::{AppConfig, PlatformCompareConfig};
use farecast::engine::normalizer::RateTable;
use farecast::engine::Analyzer;
use farecast::estimators::fares::{FareTable, SimulatedFares};
use farecast::estimators::geo::GeoPricingEstimator;
use farecast::estimators::platform::PlatformEstimator;
use farecast::estimators::Findings;
use farecast::report::{self, export};
use farecast::types::*;

use crate::mock_estimator::{quote, MockEstimator};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn fra_jfk() -> Query {
    Query::new(
        "FRA",
        "JFK",
        date(2024, 6, 15),
        Some(date(2024, 6, 22)),
        date(2024, 5, 1),
    )
    .unwrap()
}

fn rates() -> Arc<RateTable> {
    Arc::new(RateTable::builtin("EUR").unwrap())
}

fn analyzer() -> Analyzer {
    Analyzer::new(rates(), Duration::from_secs(1), dec!(450))
}

fn strategies_in_order(result: &AnalysisResult, keep: impl Fn(Strategy) -> bool) -> Vec<String> {
    result
        .quotes
        .iter()
        .filter(|q| keep(q.quote.strategy))
        .map(|q| q.quote.label.clone())
        .collect()
}

// ---------------------------------------------------------------------------
// Worked examples
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_split_ticket_beats_direct() {
    let result = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .analyze(&fra_jfk())
        .await
        .unwrap();

    assert_eq!(result.cheapest.strategy, Strategy::MultiLegSplit);
    assert_eq!(result.cheapest.comparable_amount(), dec!(420.50));
    assert_eq!(result.baseline.comparable_amount(), dec!(520.00));
    assert_eq!(result.savings.absolute, dec!(99.50));
    assert_eq!(result.savings.percentage, dec!(19.13));

    let ranks: Vec<usize> = result.quotes.iter().map(|q| q.rank).collect();
    assert_eq!(ranks, vec![1, 2, 3]);
}

#[tokio::test]
async fn test_geo_pricing_poland_cheapest() {
    let fares = Arc::new(FareTable::new("EUR").with_fare("FRA", "JFK", dec!(500)));
    let geo = GeoPricingEstimator::new(fares, rates(), Vec::new());
    let routing = MockEstimator::with_quotes(
        "routing",
        vec![quote(Strategy::Direct, "Direct", "500.00", "EUR")],
    );

    let query = fra_jfk().with_countries(["DE", "PL"]);
    let result = analyzer()
        .with_estimator(Box::new(routing))
        .with_estimator(Box::new(geo))
        .analyze(&query)
        .await
        .unwrap();

    assert_eq!(result.cheapest.strategy, Strategy::GeoPricing);
    assert_eq!(result.cheapest.metadata["country"], "PL");
    assert_eq!(result.cheapest.currency, "PLN");
    assert_eq!(result.cheapest.comparable_amount(), dec!(425.00));
    assert_eq!(result.savings.absolute, dec!(75.00));

    // DE ties the direct fare; direct ranks first on priority.
    assert_eq!(result.quotes[1].quote.strategy, Strategy::Direct);
    assert_eq!(result.quotes[2].quote.metadata["country"], "DE");

    assert!(result
        .recommendations
        .iter()
        .any(|l| l.contains("buying from Poland")));
}

#[tokio::test]
async fn test_target_price_flags_without_filtering() {
    let query = fra_jfk().with_target_price(dec!(450)).unwrap();
    let result = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .analyze(&query)
        .await
        .unwrap();

    assert_eq!(result.quotes.len(), 3);
    for ranked in &result.quotes {
        let expected = ranked.quote.comparable_amount() <= dec!(450);
        assert_eq!(ranked.meets_target, Some(expected));
    }
    assert_eq!(
        result
            .quotes
            .iter()
            .filter(|q| q.meets_target == Some(true))
            .count(),
        1
    );
}

#[tokio::test]
async fn test_unknown_currency_excluded_with_warning() {
    let geo = MockEstimator::with_quotes(
        "geo_pricing",
        vec![
            quote(Strategy::GeoPricing, "Book from Germany", "500.00", "EUR"),
            quote(Strategy::GeoPricing, "Book from Poland", "1836.00", "PLN"),
            quote(Strategy::GeoPricing, "Book from Nowhere", "99.00", "XYZ"),
        ],
    );
    let result = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .with_estimator(Box::new(geo))
        .analyze(&fra_jfk())
        .await
        .unwrap();

    assert!(result.quotes.iter().all(|q| q.quote.currency != "XYZ"));
    assert_eq!(result.quotes.len(), 5);

    let warning = result.advisory(AdvisoryCategory::UnknownCurrency).unwrap();
    assert!(warning.is_warning());
    assert!(warning.message.contains("XYZ"));

    let amounts: Vec<Decimal> = result
        .quotes
        .iter()
        .map(|q| q.quote.comparable_amount())
        .collect();
    assert_eq!(
        amounts,
        vec![dec!(420.50), dec!(425.00), dec!(480.00), dec!(500.00), dec!(520.00)]
    );
}

#[tokio::test]
async fn test_platforms_never_hide_hidden_city_risk() {
    let routing = MockEstimator::with_quotes(
        "routing",
        vec![
            quote(Strategy::Direct, "Direct FRA → JFK", "520.00", "EUR"),
            quote(Strategy::HiddenCity, "Ticket to BOS, leave at JFK", "425.00", "EUR")
                .with_risk(RiskLevel::High),
        ],
    );
    let platforms = PlatformEstimator::new(&PlatformCompareConfig::default()).unwrap();
    let result = analyzer()
        .with_estimator(Box::new(routing))
        .with_platforms(platforms)
        .analyze(&fra_jfk())
        .await
        .unwrap();

    let safe: Vec<&RankedQuote> = result
        .quotes
        .iter()
        .filter(|q| q.quote.risk < RiskLevel::Medium)
        .collect();
    assert_eq!(safe.len(), 1);
    assert_eq!(safe[0].quote.strategy, Strategy::Direct);
    assert!(result
        .quotes_for(Strategy::Platform)
        .all(|q| q.quote.risk == RiskLevel::High));
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_invariants_hold_across_routes() {
    let analyzer = Analyzer::from_config(&AppConfig::default(), Arc::new(SimulatedFares::new()))
        .unwrap();

    let routes = [
        ("FRA", "JFK", None),
        ("LHR", "DXB", Some(date(2024, 7, 1))),
        ("CDG", "NRT", None),
        ("MUC", "BCN", Some(date(2024, 6, 20))),
        ("QQQ", "ZZZ", None),
    ];

    for (origin, destination, ret) in routes {
        let query = Query::new(origin, destination, date(2024, 6, 15), ret, date(2024, 5, 1)).unwrap();
        let result = analyzer.analyze(&query).await.unwrap();

        assert_eq!(
            result.quotes_for(Strategy::Direct).count(),
            1,
            "{origin}-{destination}"
        );

        let cheapest = result.cheapest.comparable_amount();
        assert!(result
            .quotes
            .iter()
            .all(|q| cheapest <= q.quote.comparable_amount()));
        assert!(result.quotes.iter().all(|q| q.quote.amount > Decimal::ZERO));
        assert!(result.quotes.iter().all(|q| q.quote.is_normalized()));

        let expected = (result.baseline.comparable_amount() - cheapest).max(Decimal::ZERO);
        assert_eq!(result.savings.absolute, expected);
        assert!(result.savings.percentage >= Decimal::ZERO);

        assert!(result.advisory(AdvisoryCategory::Timing).is_some());
        assert!(result.advisory(AdvisoryCategory::PlatformTrust).is_some());
        assert!(!result.recommendations.is_empty());
    }
}

#[tokio::test]
async fn test_identical_input_identical_result() {
    let config = AppConfig::default();
    let a = Analyzer::from_config(&config, Arc::new(SimulatedFares::new()))
        .unwrap()
        .analyze(&fra_jfk())
        .await
        .unwrap();
    let b = Analyzer::from_config(&config, Arc::new(SimulatedFares::new()))
        .unwrap()
        .analyze(&fra_jfk())
        .await
        .unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_dropping_estimator_keeps_relative_ranking() {
    let geo = MockEstimator::with_quotes(
        "geo_pricing",
        vec![
            quote(Strategy::GeoPricing, "Book from Poland", "1836.00", "PLN"),
            quote(Strategy::GeoPricing, "Book from Spain", "460.00", "EUR"),
        ],
    );

    let with_geo = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .with_estimator(Box::new(geo))
        .analyze(&fra_jfk())
        .await
        .unwrap();
    let without_geo = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .analyze(&fra_jfk())
        .await
        .unwrap();

    let routing = |s: Strategy| s.is_routing();
    assert_eq!(
        strategies_in_order(&with_geo, routing),
        strategies_in_order(&without_geo, routing)
    );
    assert_eq!(with_geo.baseline, without_geo.baseline);
}

// ---------------------------------------------------------------------------
// Fault isolation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_failing_estimator_is_isolated() {
    let broken = MockEstimator::new("geo_pricing", Findings::default());
    broken.set_error("market feed down");
    let calls = broken.calls();

    let result = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .with_estimator(Box::new(broken))
        .analyze(&fra_jfk())
        .await
        .unwrap();

    assert_eq!(*calls.lock().unwrap(), 1);
    assert_eq!(result.quotes.len(), 3);
    assert_eq!(result.cheapest.strategy, Strategy::MultiLegSplit);

    let warning = result.advisory(AdvisoryCategory::EstimatorFailure).unwrap();
    assert_eq!(warning.metadata["estimator"], "geo_pricing");
    assert!(warning.message.contains("market feed down"));
}

#[tokio::test]
async fn test_routing_failure_falls_back_to_default_baseline() {
    let broken = MockEstimator::new("routing", Findings::default());
    broken.set_error("no fares");
    let geo = MockEstimator::with_quotes(
        "geo_pricing",
        vec![quote(Strategy::GeoPricing, "Book from Spain", "400.00", "EUR")],
    );

    let result = analyzer()
        .with_estimator(Box::new(broken))
        .with_estimator(Box::new(geo))
        .analyze(&fra_jfk())
        .await
        .unwrap();

    assert_eq!(result.baseline.comparable_amount(), dec!(450));
    assert_eq!(result.savings.absolute, dec!(50));
    assert_eq!(result.warnings().count(), 2);
}

#[tokio::test]
async fn test_invalid_configuration_is_fatal() {
    let mut config = AppConfig::default();
    config.modules.search.max_alternatives = -1;
    let err = Analyzer::from_config(&config, Arc::new(SimulatedFares::new()))
        .err()
        .unwrap();
    assert!(err.is_fatal());
    assert!(matches!(err, AnalyzerError::InvalidConfiguration(_)));
}

#[tokio::test]
async fn test_cancellation_returns_no_result() {
    let err = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .analyze_until(&fra_jfk(), std::future::ready(()))
        .await
        .unwrap_err();
    assert_eq!(err, AnalyzerError::Cancelled);
}

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_summary_and_export() {
    let result = analyzer()
        .with_estimator(Box::new(MockEstimator::fra_jfk_routing()))
        .analyze(&fra_jfk())
        .await
        .unwrap();

    let text = report::render_summary(&result);
    assert!(text.contains("Route: Frankfurt (FRA) → New York (JFK)"));
    assert!(text.contains("Potential Savings: 99.50 EUR (19.13%)"));

    let mut path = std::env::temp_dir();
    path.push(format!("farecast_it_{}.json", uuid::Uuid::new_v4()));
    let path = path.to_string_lossy().to_string();

    export::save_report(&result, Some(&path)).unwrap();
    let doc = export::load_report(Some(&path)).unwrap().unwrap();
    assert_eq!(doc.result.cheapest.strategy, Strategy::MultiLegSplit);
    assert_eq!(doc.result.savings.absolute, dec!(99.50));
    assert_eq!(doc.result.recommendations, result.recommendations);
    export::delete_report(Some(&path)).unwrap();
}
