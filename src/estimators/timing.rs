//! Booking-window and weekday judgment.
//!
//! Produces a single `timing` advisory; never a price. The window is counted
//! from the query's `searched_on` date so the result does not depend on the
//! wall clock.

use anyhow::Result;
use async_trait::async_trait;
use chrono::{Datelike, Duration, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use super::{Estimator, Findings};
use crate::config::TimingConfig;
use crate::types::{Advisory, AdvisoryCategory, Query};

/// Minimum weekday score for a travel day to count as cheap.
const GOOD_DAY_THRESHOLD: f64 = 0.8;

/// How far a suggested travel day may move from the requested one.
const MAX_SHIFT_DAYS: i64 = 3;

/// Relative cheapness of flying on a given weekday (1.0 = cheapest).
pub fn weekday_score(day: Weekday) -> f64 {
    match day {
        Weekday::Mon => 0.6,
        Weekday::Tue => 1.0,
        Weekday::Wed => 1.0,
        Weekday::Thu => 0.8,
        Weekday::Fri => 0.3,
        Weekday::Sat => 0.9,
        Weekday::Sun => 0.3,
    }
}

fn is_good_day(date: NaiveDate) -> bool {
    weekday_score(date.weekday()) >= GOOD_DAY_THRESHOLD
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimingClass {
    Optimal,
    NearOptimal,
    TooEarly,
    TooLate,
}

impl fmt::Display for TimingClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimingClass::Optimal => write!(f, "optimal"),
            TimingClass::NearOptimal => write!(f, "near_optimal"),
            TimingClass::TooEarly => write!(f, "too_early"),
            TimingClass::TooLate => write!(f, "too_late"),
        }
    }
}

/// Outcome of the timing check.
#[derive(Debug, Clone, PartialEq)]
pub struct TimingJudgment {
    pub class: TimingClass,
    pub days_until_departure: i64,
    /// Set for `too_early`: the day the booking window opens.
    pub suggested_booking_date: Option<NaiveDate>,
    /// Set for `near_optimal` when the outbound day scores poorly.
    pub suggested_departure: Option<NaiveDate>,
    /// Set for `near_optimal` when the return day scores poorly.
    pub suggested_return: Option<NaiveDate>,
}

pub struct TimingEstimator {
    min_days_ahead: i64,
    max_days_ahead: i64,
}

impl TimingEstimator {
    pub fn new(config: &TimingConfig) -> Self {
        Self {
            min_days_ahead: config.min_days_ahead,
            max_days_ahead: config.max_days_ahead,
        }
    }

    /// Closest well-scored day within the allowed shift, later days first
    /// on ties. `valid` filters out days that would break the itinerary.
    fn nearest_good_day(date: NaiveDate, valid: impl Fn(NaiveDate) -> bool) -> Option<NaiveDate> {
        (1..=MAX_SHIFT_DAYS)
            .flat_map(|n| [date + Duration::days(n), date - Duration::days(n)])
            .find(|d| is_good_day(*d) && valid(*d))
    }

    pub fn judge(&self, query: &Query) -> TimingJudgment {
        let days = query.days_until_departure();
        let mut judgment = TimingJudgment {
            class: TimingClass::Optimal,
            days_until_departure: days,
            suggested_booking_date: None,
            suggested_departure: None,
            suggested_return: None,
        };

        if days > self.max_days_ahead {
            judgment.class = TimingClass::TooEarly;
            judgment.suggested_booking_date =
                Some(query.departure() - Duration::days(self.max_days_ahead));
            return judgment;
        }
        if days < self.min_days_ahead {
            judgment.class = TimingClass::TooLate;
            return judgment;
        }

        let departure = query.departure();
        let return_date = query.return_date();

        if !is_good_day(departure) {
            judgment.suggested_departure = Self::nearest_good_day(departure, |d| {
                d > query.searched_on() && return_date.map_or(true, |r| d <= r)
            });
        }
        if let Some(ret) = return_date.filter(|r| !is_good_day(*r)) {
            judgment.suggested_return = Self::nearest_good_day(ret, |d| d >= departure);
        }

        let travel_score = std::iter::once(departure)
            .chain(return_date)
            .map(|d| weekday_score(d.weekday()))
            .fold(f64::INFINITY, f64::min);
        if travel_score < GOOD_DAY_THRESHOLD {
            judgment.class = TimingClass::NearOptimal;
        }
        judgment
    }

    fn advisory(&self, query: &Query, judgment: &TimingJudgment) -> Advisory {
        let days = judgment.days_until_departure;
        let window = format!("{}-{} day", self.min_days_ahead, self.max_days_ahead);

        let message = match judgment.class {
            TimingClass::Optimal => format!(
                "Booking {days} days ahead is inside the {window} window and {} is a cheap day to fly",
                query.departure().weekday()
            ),
            TimingClass::NearOptimal => {
                let mut msg = format!("Booking {days} days ahead is inside the {window} window");
                if let Some(d) = judgment.suggested_departure {
                    msg.push_str(&format!(
                        ", departing {} ({}) is usually cheaper",
                        d,
                        d.weekday()
                    ));
                }
                if let Some(r) = judgment.suggested_return {
                    msg.push_str(&format!(", returning {} ({}) is usually cheaper", r, r.weekday()));
                }
                msg
            }
            TimingClass::TooEarly => match judgment.suggested_booking_date {
                Some(open) => format!(
                    "Departure is {days} days away; fares usually drop once the {window} window opens on {open}"
                ),
                None => format!("Departure is {days} days away, outside the {window} window"),
            },
            TimingClass::TooLate => format!(
                "Only {days} days until departure; fares rise closer to the date, book now"
            ),
        };

        let mut advisory = Advisory::info(AdvisoryCategory::Timing, message)
            .with_meta("classification", judgment.class)
            .with_meta("days_until_departure", days);
        if let Some(d) = judgment.suggested_booking_date {
            advisory = advisory.with_meta("suggested_booking_date", d);
        }
        if let Some(d) = judgment.suggested_departure {
            advisory = advisory.with_meta("suggested_departure", d);
        }
        if let Some(d) = judgment.suggested_return {
            advisory = advisory.with_meta("suggested_return", d);
        }
        advisory
    }
}

#[async_trait]
impl Estimator for TimingEstimator {
    fn name(&self) -> &'static str {
        "timing"
    }

    async fn estimate(&self, query: &Query) -> Result<Findings> {
        let judgment = self.judge(query);
        debug!(
            class = %judgment.class,
            days = judgment.days_until_departure,
            "Timing judged"
        );
        Ok(Findings::advisories(vec![self.advisory(query, &judgment)]))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
