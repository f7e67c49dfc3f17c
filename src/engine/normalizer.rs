//! Currency normalization.
//!
//! Every quote is converted to the base currency before ranking. Rates are
//! kept as "units of currency per one unit of base", the way exchange rates
//! are usually quoted against the euro.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::BTreeMap;

use crate::types::{AnalyzerError, PriceQuote};

/// Built-in rates, units per EUR.
const EUR_RATES: &[(&str, Decimal)] = &[
    ("EUR", dec!(1.00)),
    ("USD", dec!(1.08)),
    ("GBP", dec!(0.86)),
    ("CHF", dec!(0.94)),
    ("CAD", dec!(1.46)),
    ("AUD", dec!(1.66)),
    ("JPY", dec!(158.50)),
    ("CNY", dec!(7.82)),
    ("INR", dec!(89.75)),
    ("AED", dec!(3.97)),
    ("THB", dec!(36.50)),
    ("PLN", dec!(4.32)),
    ("TRY", dec!(34.90)),
];

/// Exchange rates relative to a base currency.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    base: String,
    units_per_base: BTreeMap<String, Decimal>,
}

impl RateTable {
    /// Built-in table re-expressed against `base`.
    pub fn builtin(base: &str) -> Result<Self, AnalyzerError> {
        let base = base.trim().to_ascii_uppercase();
        let eur_table: BTreeMap<String, Decimal> = EUR_RATES
            .iter()
            .map(|(code, rate)| (code.to_string(), *rate))
            .collect();

        let base_per_eur = eur_table
            .get(&base)
            .copied()
            .ok_or_else(|| AnalyzerError::InvalidConfiguration(format!(
                "base currency {base} has no built-in rate"
            )))?;

        let units_per_base = eur_table
            .into_iter()
            .map(|(code, per_eur)| {
                let rate = if code == base {
                    Decimal::ONE
                } else {
                    per_eur / base_per_eur
                };
                (code, rate)
            })
            .collect();

        Ok(Self {
            base,
            units_per_base,
        })
    }

    /// Empty table that only knows the base currency.
    pub fn new(base: &str) -> Self {
        let base = base.trim().to_ascii_uppercase();
        let mut units_per_base = BTreeMap::new();
        units_per_base.insert(base.clone(), Decimal::ONE);
        Self {
            base,
            units_per_base,
        }
    }

    /// Set or replace one rate. Non-positive rates are rejected, and the base
    /// currency is pinned at 1.
    pub fn with_rate(mut self, currency: &str, units_per_base: Decimal) -> Result<Self, AnalyzerError> {
        let currency = currency.trim().to_ascii_uppercase();
        if units_per_base <= Decimal::ZERO {
            return Err(AnalyzerError::InvalidConfiguration(format!(
                "rate for {currency} must be positive, got {units_per_base}"
            )));
        }
        if currency == self.base && units_per_base != Decimal::ONE {
            return Err(AnalyzerError::InvalidConfiguration(format!(
                "rate for base currency {currency} must be 1, got {units_per_base}"
            )));
        }
        self.units_per_base.insert(currency, units_per_base);
        Ok(self)
    }

    /// Apply configured overrides on top of this table.
    pub fn merge(
        self,
        overrides: &BTreeMap<String, Decimal>,
    ) -> Result<Self, AnalyzerError> {
        overrides
            .iter()
            .try_fold(self, |table, (code, rate)| table.with_rate(code, *rate))
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    pub fn units_per_base(&self, currency: &str) -> Option<Decimal> {
        self.units_per_base
            .get(&currency.trim().to_ascii_uppercase())
            .copied()
    }

    /// Convert an amount into the base currency, rounded to cents.
    pub fn to_base(&self, amount: Decimal, currency: &str) -> Result<Decimal, AnalyzerError> {
        let units = self
            .units_per_base(currency)
            .ok_or_else(|| AnalyzerError::UnknownCurrency(currency.to_string()))?;
        Ok((amount / units).round_dp(2))
    }

    /// Convert a base-currency amount into `currency`, rounded to cents.
    pub fn from_base(&self, amount: Decimal, currency: &str) -> Result<Decimal, AnalyzerError> {
        let units = self
            .units_per_base(currency)
            .ok_or_else(|| AnalyzerError::UnknownCurrency(currency.to_string()))?;
        Ok((amount * units).round_dp(2))
    }
}

/// Return a copy of `quote` with its base-currency amount filled in.
pub fn normalize(quote: &PriceQuote, rates: &RateTable) -> Result<PriceQuote, AnalyzerError> {
    let normalized = rates.to_base(quote.amount, &quote.currency)?;
    Ok(PriceQuote {
        normalized_amount: Some(normalized),
        ..quote.clone()
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
