//! Aggregator — runs every estimator and merges the results.
//!
//! Pipeline for one query:
//! 1. Run all estimators concurrently, each fault-isolated and time-boxed
//! 2. Normalize quotes into the base currency, dropping unconvertible ones
//! 3. Fix the direct-fare baseline (synthesized if missing)
//! 4. Price booking platforms off the cheapest routing quote
//! 5. Rank, compute savings, flag target hits and build recommendations
//!
//! Recovered problems never abort the run; they surface as warning
//! advisories on the result. Only fatal errors are returned.

use futures::future::join_all;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::AppConfig;
use crate::engine::normalizer::{normalize, RateTable};
use crate::engine::recommend;
use crate::estimators::fares::FareSource;
use crate::estimators::geo::GeoPricingEstimator;
use crate::estimators::platform::PlatformEstimator;
use crate::estimators::routing::RoutingEstimator;
use crate::estimators::timing::TimingEstimator;
use crate::estimators::tracking::TrackingAdvisor;
use crate::estimators::{Estimator, Findings};
use crate::types::{
    Advisory, AdvisoryCategory, AnalysisResult, AnalyzerError, PriceQuote, Query, RankedQuote,
    Savings, Strategy,
};

/// Multi-strategy analysis engine.
pub struct Analyzer {
    estimators: Vec<Box<dyn Estimator>>,
    platforms: Option<PlatformEstimator>,
    rates: Arc<RateTable>,
    timeout: Duration,
    default_baseline_fare: Decimal,
}

impl Analyzer {
    /// Empty analyzer; add estimators with [`Analyzer::with_estimator`].
    pub fn new(rates: Arc<RateTable>, timeout: Duration, default_baseline_fare: Decimal) -> Self {
        Self {
            estimators: Vec::new(),
            platforms: None,
            rates,
            timeout,
            default_baseline_fare,
        }
    }

    /// Validate the configuration and wire up every enabled module.
    pub fn from_config(config: &AppConfig, fares: Arc<dyn FareSource>) -> Result<Self, AnalyzerError> {
        config.validate()?;

        let rates = Arc::new(RateTable::builtin(&config.analysis.base_currency)?.merge(&config.rates)?);
        let modules = &config.modules;

        let mut analyzer = Self::new(
            rates.clone(),
            Duration::from_millis(config.analysis.estimator_timeout_ms),
            config.analysis.default_baseline_fare,
        );

        if modules.search.enabled {
            analyzer = analyzer.with_estimator(Box::new(RoutingEstimator::new(
                fares.clone(),
                &modules.search,
            )?));
        }
        if modules.geo_pricing.enabled {
            analyzer = analyzer.with_estimator(Box::new(GeoPricingEstimator::new(
                fares.clone(),
                rates,
                modules.geo_pricing.default_countries.clone(),
            )));
        }
        if modules.timing.enabled {
            analyzer = analyzer.with_estimator(Box::new(TimingEstimator::new(&modules.timing)));
        }
        if modules.inflation.enabled {
            analyzer = analyzer.with_estimator(Box::new(TrackingAdvisor::new(&modules.inflation)));
        }
        if modules.platform_compare.enabled {
            analyzer = analyzer.with_platforms(PlatformEstimator::new(&modules.platform_compare)?);
        }

        info!(
            estimators = ?analyzer.estimator_names(),
            platforms = analyzer.platforms.is_some(),
            base_currency = analyzer.rates.base(),
            "Analyzer ready"
        );
        Ok(analyzer)
    }

    pub fn with_estimator(mut self, estimator: Box<dyn Estimator>) -> Self {
        self.estimators.push(estimator);
        self
    }

    pub fn with_platforms(mut self, platforms: PlatformEstimator) -> Self {
        self.platforms = Some(platforms);
        self
    }

    pub fn estimator_names(&self) -> Vec<&'static str> {
        self.estimators.iter().map(|e| e.name()).collect()
    }

    pub fn base_currency(&self) -> &str {
        self.rates.base()
    }

    /// Run the analysis unless `cancel` completes first. A cancel future
    /// that is already complete always wins.
    pub async fn analyze_until<F>(&self, query: &Query, cancel: F) -> Result<AnalysisResult, AnalyzerError>
    where
        F: Future,
    {
        tokio::select! {
            biased;
            _ = cancel => {
                warn!(route = %query, "Analysis cancelled");
                Err(AnalyzerError::Cancelled)
            }
            result = self.analyze(query) => result,
        }
    }

    /// Run the full pipeline for one query.
    pub async fn analyze(&self, query: &Query) -> Result<AnalysisResult, AnalyzerError> {
        info!(route = %query, estimators = self.estimators.len(), "Starting analysis");

        let mut advisories: Vec<Advisory> = Vec::new();
        let mut raw_quotes: Vec<PriceQuote> = Vec::new();

        // -- 1. Estimators ---------------------------------------------------

        for (name, outcome) in self.run_estimators(query).await {
            match outcome {
                Ok(findings) => {
                    debug!(
                        estimator = name,
                        quotes = findings.quotes.len(),
                        advisories = findings.advisories.len(),
                        "Estimator finished"
                    );
                    raw_quotes.extend(findings.quotes);
                    advisories.extend(findings.advisories);
                }
                Err(err) => {
                    warn!(estimator = name, error = %err, "Estimator failed, continuing without");
                    advisories.push(Advisory::from_error(&err).with_meta("estimator", name));
                }
            }
        }

        // -- 2. Normalization --------------------------------------------------

        let mut quotes = self.normalize_all(raw_quotes, &mut advisories);

        // -- 3. Baseline -------------------------------------------------------

        let baseline = self.take_baseline(&mut quotes, &mut advisories)?;
        quotes.push(baseline.clone());

        // -- 4. Platforms --------------------------------------------------------

        if let Some(platforms) = &self.platforms {
            let cheapest_routing = quotes
                .iter()
                .filter(|q| q.strategy.is_routing())
                .min_by(|a, b| rank_order(a, b))
                .unwrap_or(&baseline);
            let findings = platforms.price(cheapest_routing, self.rates.base());
            let Findings {
                quotes: platform_quotes,
                advisories: platform_advisories,
            } = findings;
            quotes.extend(self.normalize_all(platform_quotes, &mut advisories));
            advisories.extend(platform_advisories);
        }

        // -- 5. Ranking ----------------------------------------------------------

        quotes.sort_by(rank_order);
        let cheapest = quotes.first().cloned().unwrap_or_else(|| baseline.clone());
        let savings = compute_savings(
            baseline.comparable_amount(),
            cheapest.comparable_amount(),
        )?;

        let target = query.target_price();
        let ranked: Vec<RankedQuote> = quotes
            .into_iter()
            .enumerate()
            .map(|(i, quote)| RankedQuote {
                rank: i + 1,
                meets_target: target.map(|t| quote.comparable_amount() <= t),
                quote,
            })
            .collect();

        let mut result = AnalysisResult {
            query: query.clone(),
            base_currency: self.rates.base().to_string(),
            quotes: ranked,
            advisories: dedup_advisories(advisories),
            baseline,
            cheapest,
            savings,
            recommendations: Vec::new(),
        };
        result.recommendations = recommend::build(&result);

        info!(
            quotes = result.quotes.len(),
            cheapest = %result.cheapest.strategy,
            amount = %result.cheapest.comparable_amount(),
            savings = %result.savings.absolute,
            savings_pct = %result.savings.percentage,
            warnings = result.warnings().count(),
            "Analysis complete"
        );

        Ok(result)
    }

    /// Run every estimator concurrently. Failures and timeouts come back as
    /// `EstimatorFailure`; order matches registration order.
    async fn run_estimators(&self, query: &Query) -> Vec<(&'static str, Result<Findings, AnalyzerError>)> {
        let timeout = self.timeout;
        let runs = self.estimators.iter().map(|estimator| async move {
            let name = estimator.name();
            let outcome = match tokio::time::timeout(timeout, estimator.estimate(query)).await {
                Ok(Ok(findings)) => Ok(findings),
                Ok(Err(e)) => Err(AnalyzerError::EstimatorFailure {
                    estimator: name.to_string(),
                    message: format!("{e:#}"),
                }),
                Err(_) => Err(AnalyzerError::EstimatorFailure {
                    estimator: name.to_string(),
                    message: format!("timed out after {}ms", timeout.as_millis()),
                }),
            };
            (name, outcome)
        });
        join_all(runs).await
    }

    /// Normalize quotes, recording a warning for each one that cannot be
    /// converted or carries a non-positive amount. Direct quotes are kept
    /// regardless of amount so the baseline check can reject them.
    fn normalize_all(&self, raw: Vec<PriceQuote>, advisories: &mut Vec<Advisory>) -> Vec<PriceQuote> {
        let mut kept = Vec::with_capacity(raw.len());
        for quote in raw {
            match normalize(&quote, &self.rates) {
                Ok(normalized) => {
                    if normalized.strategy != Strategy::Direct
                        && normalized.comparable_amount() <= Decimal::ZERO
                    {
                        warn!(label = %normalized.label, amount = %normalized.amount, "Dropping non-positive quote");
                        advisories.push(
                            Advisory::warning(
                                AdvisoryCategory::DiscardedQuote,
                                format!("Dropped {} quote with non-positive amount {}", normalized.strategy, normalized.amount),
                            )
                            .with_meta("strategy", normalized.strategy)
                            .with_meta("label", &normalized.label),
                        );
                        continue;
                    }
                    kept.push(normalized);
                }
                Err(err) => {
                    warn!(label = %quote.label, error = %err, "Dropping quote");
                    advisories.push(
                        Advisory::from_error(&err)
                            .with_meta("strategy", quote.strategy)
                            .with_meta("label", &quote.label),
                    );
                }
            }
        }
        kept
    }

    /// Remove the direct quotes from `quotes` and pick the baseline: the first
    /// one, or a synthesized default. Extra direct quotes are dropped.
    fn take_baseline(
        &self,
        quotes: &mut Vec<PriceQuote>,
        advisories: &mut Vec<Advisory>,
    ) -> Result<PriceQuote, AnalyzerError> {
        let (directs, others): (Vec<PriceQuote>, Vec<PriceQuote>) = std::mem::take(quotes)
            .into_iter()
            .partition(|q| q.strategy == Strategy::Direct);
        *quotes = others;

        let mut directs = directs.into_iter();
        let baseline = match directs.next() {
            Some(direct) => direct,
            None => {
                warn!(
                    fare = %self.default_baseline_fare,
                    "No direct quote produced, using default baseline fare"
                );
                advisories.push(
                    Advisory::warning(
                        AdvisoryCategory::Baseline,
                        format!(
                            "No direct fare available; savings are measured against the default fare of {:.2} {}",
                            self.default_baseline_fare,
                            self.rates.base()
                        ),
                    )
                    .with_meta("synthesized", true),
                );
                let mut synthesized = PriceQuote::new(
                    Strategy::Direct,
                    "Direct (default fare)",
                    self.default_baseline_fare,
                    self.rates.base(),
                )
                .with_meta("synthesized", true);
                synthesized.normalized_amount = Some(self.default_baseline_fare);
                synthesized
            }
        };

        for extra in directs {
            warn!(label = %extra.label, "Dropping extra direct quote");
            advisories.push(
                Advisory::warning(
                    AdvisoryCategory::Baseline,
                    format!("Ignored additional direct quote '{}'", extra.label),
                )
                .with_meta("amount", extra.comparable_amount()),
            );
        }

        if baseline.comparable_amount() <= Decimal::ZERO {
            return Err(AnalyzerError::InvalidBaseline(baseline.comparable_amount()));
        }
        Ok(baseline)
    }
}

/// Ascending price, then strategy priority, then risk.
fn rank_order(a: &PriceQuote, b: &PriceQuote) -> std::cmp::Ordering {
    a.comparable_amount()
        .cmp(&b.comparable_amount())
        .then_with(|| a.strategy.priority().cmp(&b.strategy.priority()))
        .then_with(|| a.risk.cmp(&b.risk))
}

/// Savings of `cheapest` against `baseline`, never negative.
pub fn compute_savings(baseline: Decimal, cheapest: Decimal) -> Result<Savings, AnalyzerError> {
    if baseline <= Decimal::ZERO {
        return Err(AnalyzerError::InvalidBaseline(baseline));
    }
    let absolute = (baseline - cheapest).max(Decimal::ZERO).round_dp(2);
    let percentage = (absolute / baseline * dec!(100)).round_dp(2);
    Ok(Savings {
        absolute,
        percentage,
    })
}

/// One informational advisory per category; warnings per category and
/// message. First occurrence wins.
fn dedup_advisories(advisories: Vec<Advisory>) -> Vec<Advisory> {
    let mut seen: HashSet<(AdvisoryCategory, Option<String>)> = HashSet::new();
    advisories
        .into_iter()
        .filter(|a| {
            let key = if a.is_warning() {
                (a.category, Some(a.message.clone()))
            } else {
                (a.category, None)
            };
            seen.insert(key)
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
