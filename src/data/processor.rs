//! Data Processor Module
//! Restricts the rental table to a caller-supplied date range.

use super::{DateRange, DTEDAY};
use polars::prelude::*;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Handles filtering operations on the loaded table.
pub struct DataProcessor;

impl DataProcessor {
    /// Rows whose date lies within `[range.start, range.end]`.
    ///
    /// The input frame is left untouched. An inverted range yields an empty
    /// frame with the same schema.
    pub fn filter_by_date_range(
        df: &DataFrame,
        range: DateRange,
    ) -> Result<DataFrame, ProcessorError> {
        if range.is_empty() {
            debug!(start = %range.start, end = %range.end, "inverted date range");
            return Ok(df.clear());
        }

        let filtered = df
            .clone()
            .lazy()
            .filter(
                col(DTEDAY)
                    .gt_eq(lit(range.start))
                    .and(col(DTEDAY).lt_eq(lit(range.end))),
            )
            .collect()?;

        debug!(
            start = %range.start,
            end = %range.end,
            rows = filtered.height(),
            "filtered by date range"
        );
        Ok(filtered)
    }
}
