//! Configuration loading from TOML.
//!
//! Reads `config.toml` and deserializes into strongly-typed structs. Every
//! section carries serde defaults, so a partial file is valid; the binary
//! falls back to [`AppConfig::default`] when the file is missing. Range
//! checks live in [`AppConfig::validate`] and fail with
//! `InvalidConfiguration` before any estimator runs.

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;

use crate::types::AnalyzerError;

/// Top-level application configuration.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub analysis: AnalysisConfig,
    pub modules: ModulesConfig,
    /// Currency → units per base currency, merged over the built-in table.
    pub rates: BTreeMap<String, Decimal>,
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct AnalysisConfig {
    pub base_currency: String,
    pub estimator_timeout_ms: u64,
    /// Direct fare used when no estimator supplies a baseline.
    pub default_baseline_fare: Decimal,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            base_currency: "EUR".to_string(),
            estimator_timeout_ms: 5_000,
            default_baseline_fare: dec!(450.0),
        }
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct ModulesConfig {
    pub search: SearchConfig,
    pub geo_pricing: GeoPricingConfig,
    pub inflation: InflationConfig,
    pub timing: TimingConfig,
    pub platform_compare: PlatformCompareConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SearchConfig {
    pub enabled: bool,
    pub include_hidden_city: bool,
    pub include_nearby_airports: bool,
    /// Signed so that zero and negative values can be reported.
    pub max_alternatives: i64,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            include_hidden_city: true,
            include_nearby_airports: true,
            max_alternatives: 5,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct GeoPricingConfig {
    pub enabled: bool,
    pub default_countries: Vec<String>,
}

impl Default for GeoPricingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            default_countries: ["DE", "FR", "GB", "US", "ES", "PL", "TR", "IN"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct InflationConfig {
    pub enabled: bool,
    pub max_searches_per_day: i64,
    pub require_incognito_mode: bool,
}

impl Default for InflationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_searches_per_day: 2,
            require_incognito_mode: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct TimingConfig {
    pub enabled: bool,
    pub min_days_ahead: i64,
    pub max_days_ahead: i64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            min_days_ahead: 21,
            max_days_ahead: 90,
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PlatformCompareConfig {
    pub enabled: bool,
    /// Platform keys to compare; empty means every known platform.
    pub platforms: Vec<String>,
}

impl Default for PlatformCompareConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            platforms: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "farecast=info".to_string(),
            json: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {path}"))?;
        let config: AppConfig = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {path}"))?;
        Ok(config)
    }

    /// Reject out-of-range values.
    pub fn validate(&self) -> Result<(), AnalyzerError> {
        let invalid = |msg: String| Err(AnalyzerError::InvalidConfiguration(msg));

        let search = &self.modules.search;
        if search.max_alternatives <= 0 {
            return invalid(format!(
                "modules.search.max_alternatives must be positive, got {}",
                search.max_alternatives
            ));
        }

        let inflation = &self.modules.inflation;
        if inflation.max_searches_per_day <= 0 {
            return invalid(format!(
                "modules.inflation.max_searches_per_day must be positive, got {}",
                inflation.max_searches_per_day
            ));
        }

        let timing = &self.modules.timing;
        if timing.min_days_ahead < 0 || timing.min_days_ahead > timing.max_days_ahead {
            return invalid(format!(
                "modules.timing window {}..{} days is not a valid range",
                timing.min_days_ahead, timing.max_days_ahead
            ));
        }

        if self.analysis.base_currency.trim().len() != 3 {
            return invalid(format!(
                "analysis.base_currency must be a 3-letter code, got {:?}",
                self.analysis.base_currency
            ));
        }
        if self.analysis.estimator_timeout_ms == 0 {
            return invalid("analysis.estimator_timeout_ms must be positive".to_string());
        }
        if self.analysis.default_baseline_fare <= Decimal::ZERO {
            return invalid(format!(
                "analysis.default_baseline_fare must be positive, got {}",
                self.analysis.default_baseline_fare
            ));
        }

        if let Some((currency, rate)) = self.rates.iter().find(|(_, r)| **r <= Decimal::ZERO) {
            return invalid(format!("rates.{currency} must be positive, got {rate}"));
        }
        let base = self.analysis.base_currency.trim().to_ascii_uppercase();
        if let Some((currency, rate)) = self
            .rates
            .iter()
            .find(|(c, r)| c.trim().eq_ignore_ascii_case(&base) && **r != Decimal::ONE)
        {
            return invalid(format!(
                "rates.{currency} overrides the base currency and must be 1, got {rate}"
            ));
        }

        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
