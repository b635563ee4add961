//! Reporting period
//!
//! A (year, month) bucket of the ledger.

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::DomainError;

/// A calendar month of a year.
///
/// Ordering is chronological.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Period {
    pub year: i32,
    pub month: u32,
}

impl Period {
    /// # Errors
    /// - `DomainError::Validation` unless `1 <= month <= 12` and `1 <= year <= 9999`
    pub fn new(month: u32, year: i32) -> Result<Self, DomainError> {
        if !(1..=12).contains(&month) {
            return Err(DomainError::validation(format!(
                "month must be between 1 and 12 (got {})",
                month
            )));
        }
        if !(1..=9999).contains(&year) {
            return Err(DomainError::validation(format!(
                "year must be between 1 and 9999 (got {})",
                year
            )));
        }
        Ok(Self { year, month })
    }

    /// Parse the `month` and `year` form values.
    pub fn parse(month: &str, year: &str) -> Result<Self, DomainError> {
        let month: u32 = month
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid month: {:?}", month)))?;
        let year: i32 = year
            .trim()
            .parse()
            .map_err(|_| DomainError::validation(format!("invalid year: {:?}", year)))?;
        Self::new(month, year)
    }

    /// Period containing the given instant (UTC).
    pub fn of(timestamp: &DateTime<Utc>) -> Self {
        Self {
            year: timestamp.year(),
            month: timestamp.month(),
        }
    }

    /// Midnight UTC of the first day of the month.
    pub fn start(&self) -> DateTime<Utc> {
        first_instant(self.year, self.month)
    }

    /// Midnight UTC of the first day of the following month.
    pub fn end_exclusive(&self) -> DateTime<Utc> {
        if self.month == 12 {
            first_instant(self.year + 1, 1)
        } else {
            first_instant(self.year, self.month + 1)
        }
    }

    /// Last representable instant of the month at storage (microsecond) precision.
    ///
    /// Inclusive range queries use this bound so that midnight of the next
    /// month is never part of the period.
    pub fn end_inclusive(&self) -> DateTime<Utc> {
        self.end_exclusive() - Duration::microseconds(1)
    }

    pub fn contains(&self, timestamp: &DateTime<Utc>) -> bool {
        *timestamp >= self.start() && *timestamp < self.end_exclusive()
    }

    /// File name of the monthly CSV extract, `relatorio_MM_YYYY.csv`.
    pub fn report_file_name(&self) -> String {
        format!("relatorio_{:02}_{}.csv", self.month, self.year)
    }
}

fn first_instant(year: i32, month: u32) -> DateTime<Utc> {
    let date = NaiveDate::from_ymd_opt(year, month, 1).unwrap_or(NaiveDate::MIN);
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{}", self.month, self.year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, min, s).unwrap()
    }

    #[test]
    fn test_rejects_bad_month() {
        assert!(Period::new(0, 2023).is_err());
        assert!(Period::new(13, 2023).is_err());
        assert!(Period::parse("march", "2023").is_err());
    }

    #[test]
    fn test_bounds() {
        let period = Period::new(3, 2023).unwrap();

        assert_eq!(period.start(), at(2023, 3, 1, 0, 0, 0));
        assert_eq!(period.end_exclusive(), at(2023, 4, 1, 0, 0, 0));
        assert!(period.end_inclusive() < at(2023, 4, 1, 0, 0, 0));
        assert!(period.end_inclusive() > at(2023, 3, 31, 23, 59, 59));
    }

    #[test]
    fn test_december_rolls_over() {
        let period = Period::new(12, 2023).unwrap();
        assert_eq!(period.end_exclusive(), at(2024, 1, 1, 0, 0, 0));
    }

    #[test]
    fn test_contains_excludes_next_month_midnight() {
        let period = Period::new(3, 2023).unwrap();

        assert!(period.contains(&at(2023, 3, 1, 0, 0, 0)));
        assert!(period.contains(&at(2023, 3, 31, 23, 59, 59)));
        assert!(!period.contains(&at(2023, 4, 1, 0, 0, 0)));
    }

    #[test]
    fn test_report_file_name() {
        let period = Period::parse("3", "2023").unwrap();
        assert_eq!(period.report_file_name(), "relatorio_03_2023.csv");
    }

    #[test]
    fn test_ordering_is_chronological() {
        let mut periods = vec![
            Period::new(1, 2024).unwrap(),
            Period::new(12, 2023).unwrap(),
            Period::new(2, 2023).unwrap(),
        ];
        periods.sort();
        assert_eq!(periods[0], Period::new(2, 2023).unwrap());
        assert_eq!(periods[2], Period::new(1, 2024).unwrap());
    }
}
