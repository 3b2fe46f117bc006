//! Billing periods - inclusive calendar-date ranges.

use crate::errors::{Error, Result};
use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// An inclusive `[start, end]` range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Period {
    start: NaiveDate,
    end: NaiveDate,
}

impl Period {
    /// Creates a period, rejecting `start > end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            return Err(Error::validation(format!(
                "Period start {start} is after period end {end}"
            )));
        }
        Ok(Self { start, end })
    }

    /// The Monday to Sunday week containing `date`.
    #[must_use]
    pub fn week_of(date: NaiveDate) -> Self {
        let offset = u64::from(date.weekday().num_days_from_monday());
        // Only overflows at the very edges of NaiveDate's range.
        let start = date.checked_sub_days(Days::new(offset)).unwrap_or(date);
        let end = start.checked_add_days(Days::new(6)).unwrap_or(date);
        Self { start, end }
    }

    /// First day of the period
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the period
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Whether `date` falls inside the period, both ends included.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_rejects_inverted_range() {
        let result = Period::new(date(2025, 1, 26), date(2025, 1, 20));
        assert!(matches!(result, Err(Error::Validation { .. })));
    }

    #[test]
    fn test_single_day_period() {
        let period = Period::new(date(2025, 1, 20), date(2025, 1, 20)).unwrap();
        assert!(period.contains(date(2025, 1, 20)));
        assert!(!period.contains(date(2025, 1, 21)));
    }

    #[test]
    fn test_bounds_are_inclusive() {
        let period = Period::new(date(2025, 1, 20), date(2025, 1, 26)).unwrap();
        assert!(period.contains(date(2025, 1, 20)));
        assert!(period.contains(date(2025, 1, 26)));
        assert!(!period.contains(date(2025, 1, 19)));
        assert!(!period.contains(date(2025, 1, 27)));
    }

    #[test]
    fn test_week_of_starts_monday() {
        // 2025-01-22 is a Wednesday
        let week = Period::week_of(date(2025, 1, 22));
        assert_eq!(week.start(), date(2025, 1, 20));
        assert_eq!(week.end(), date(2025, 1, 26));

        // Sunday belongs to the week that started the previous Monday
        let week = Period::week_of(date(2025, 1, 26));
        assert_eq!(week.start(), date(2025, 1, 20));

        // Monday starts its own week
        let week = Period::week_of(date(2025, 1, 27));
        assert_eq!(week.start(), date(2025, 1, 27));
    }
}
