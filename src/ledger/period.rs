//! Calendar buckets used to index installment commitments.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A (year, month) pair. Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl YearMonth {
    /// Returns `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn of(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Months elapsed since year zero; consecutive buckets differ by one.
    pub fn ordinal(self) -> i64 {
        self.year as i64 * 12 + self.month as i64
    }

    /// Inverse of [`ordinal`](Self::ordinal); `None` when the year leaves `i32`.
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        let zero_based = ordinal.checked_sub(1)?;
        let year = i32::try_from(zero_based.div_euclid(12)).ok()?;
        Self::new(year, zero_based.rem_euclid(12) as u32 + 1)
    }

    /// The bucket `months` away from this one.
    pub fn offset(self, months: i64) -> Option<Self> {
        Self::from_ordinal(self.ordinal().checked_add(months)?)
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn month_name(self) -> &'static str {
        month_name(self.month)
    }

    /// Parses `YYYY-MM` (also accepts `YYYY/MM` and `MM/YYYY`).
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        let (left, right) = raw.split_once('-').or_else(|| raw.split_once('/'))?;
        let left = left.trim();
        let right = right.trim();
        if left.len() == 4 {
            Self::new(left.parse().ok()?, right.parse().ok()?)
        } else {
            Self::new(right.parse().ok()?, left.parse().ok()?)
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

/// English month name for `1..=12`; `"?"` otherwise.
pub fn month_name(month: u32) -> &'static str {
    month
        .checked_sub(1)
        .and_then(|idx| MONTH_NAMES.get(idx as usize))
        .copied()
        .unwrap_or("?")
}
