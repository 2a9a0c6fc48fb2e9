//! Data module - CSV loading and date-range filtering

mod loader;
mod processor;

pub use loader::{DataLoader, Dataset, LoaderError};
pub use processor::{DataProcessor, ProcessorError};

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

/// Column names of the cleaned rental dataset.
pub const DTEDAY: &str = "dteday";
pub const SEASON: &str = "season";
pub const MNTH: &str = "mnth";
pub const REGISTERED: &str = "registered";
pub const CNT: &str = "cnt";
pub const INSTANT: &str = "instant";
pub const NO: &str = "no";

/// Columns parsed as dates on load.
pub const DATE_COLUMNS: &[&str] = &[DTEDAY];

/// Columns every dataset must carry.
pub const REQUIRED_COLUMNS: &[&str] = &[DTEDAY, SEASON, MNTH, REGISTERED, CNT];

/// Earliest and latest date found in the date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateBounds {
    pub min: NaiveDate,
    pub max: NaiveDate,
}

impl DateBounds {
    /// Scan the date column of a frame. Returns `None` when it holds no dates.
    pub fn from_frame(df: &DataFrame) -> PolarsResult<Option<Self>> {
        let dates = df.column(DTEDAY)?.date()?;
        let mut iter = dates.as_date_iter().flatten();

        let Some(first) = iter.next() else {
            return Ok(None);
        };

        let (min, max) = iter.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
        Ok(Some(Self { min, max }))
    }

    /// Number of days between `min` and `max`.
    pub fn span_days(&self) -> i64 {
        (self.max - self.min).num_days()
    }
}

/// Inclusive `[start, end]` date range supplied by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// Range covering the whole dataset.
    pub fn full(bounds: DateBounds) -> Self {
        Self::new(bounds.min, bounds.max)
    }

    /// An inverted range selects nothing.
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    /// Pull both ends inside the dataset bounds.
    pub fn clamp_to(&self, bounds: DateBounds) -> Self {
        Self::new(
            self.start.clamp(bounds.min, bounds.max),
            self.end.clamp(bounds.min, bounds.max),
        )
    }
}

/// Days since 1970-01-01, the physical representation of polars `Date`.
pub fn epoch_days(date: NaiveDate) -> i32 {
    // NaiveDate::default() is the Unix epoch
    (date - NaiveDate::default()).num_days() as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_inverted_range_is_empty() {
        let range = DateRange::new(date(2012, 1, 1), date(2011, 1, 1));
        assert!(range.is_empty());
        assert!(!DateRange::new(date(2011, 1, 1), date(2011, 1, 1)).is_empty());
    }

    #[test]
    fn test_clamp_to_bounds() {
        let bounds = DateBounds {
            min: date(2011, 1, 1),
            max: date(2012, 12, 31),
        };
        let range = DateRange::new(date(2010, 5, 1), date(2013, 1, 1)).clamp_to(bounds);
        assert_eq!(range, DateRange::full(bounds));
        assert_eq!(bounds.span_days(), 730);
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(epoch_days(date(1970, 1, 1)), 0);
        assert_eq!(epoch_days(date(1970, 1, 11)), 10);
        assert_eq!(epoch_days(date(1969, 12, 31)), -1);
    }
}
