//! Reporting period classification.
//!
//! This module defines [`PeriodClass`] and the pure [`classify`] function that
//! separates discrete quarters from year-to-date cumulative ranges. The fiscal
//! year is assumed to follow the calendar year.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Longest span, in days, still treated as a single quarter.
pub const DISCRETE_MAX_DAYS: i64 = 100;

/// Classification of a duration period.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodClass {
    /// Roughly one quarter that does not start on January 1.
    Discrete,
    /// Cumulative range starting January 1 of the end date's year.
    YearToDate,
    /// Half-year, nine-month or irregular spans that match neither rule.
    Other,
}

impl PeriodClass {
    /// Returns true for [`PeriodClass::YearToDate`].
    #[must_use]
    pub const fn is_year_to_date(&self) -> bool {
        matches!(self, Self::YearToDate)
    }

    /// Returns true for [`PeriodClass::Discrete`].
    #[must_use]
    pub const fn is_discrete(&self) -> bool {
        matches!(self, Self::Discrete)
    }
}

/// Classifies the range `start..=end`.
///
/// The year-to-date rule is checked first, so a first quarter reported from
/// January 1 is [`PeriodClass::YearToDate`] even though it is short enough to
/// be discrete.
#[must_use]
pub fn classify(start: NaiveDate, end: NaiveDate) -> PeriodClass {
    if start.month() == 1 && start.day() == 1 && start.year() == end.year() {
        PeriodClass::YearToDate
    } else if span_days(start, end) <= DISCRETE_MAX_DAYS {
        PeriodClass::Discrete
    } else {
        PeriodClass::Other
    }
}

/// Number of days between `start` and `end`.
#[must_use]
pub fn span_days(start: NaiveDate, end: NaiveDate) -> i64 {
    end.signed_duration_since(start).num_days()
}

/// Fiscal year a period ending on `end` belongs to.
#[must_use]
pub fn fiscal_year(end: NaiveDate) -> i32 {
    end.year()
}

/// Calendar quarter label (`Q1`..`Q4`) for a period end date.
#[must_use]
pub fn quarter_label(date: NaiveDate) -> &'static str {
    match date.month() {
        1..=3 => "Q1",
        4..=6 => "Q2",
        7..=9 => "Q3",
        _ => "Q4",
    }
}
