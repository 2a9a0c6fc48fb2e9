//! Dashboard snapshot: filter once, aggregate everything a render shows.

use crate::charts::{RenderError, StaticChartRenderer};
use crate::data::{DataProcessor, DateRange, ProcessorError};
use crate::stats::{RentalAggregator, RfmAverages, RfmSummary, StatsError};
use polars::prelude::DataFrame;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// File name of the JSON report inside an export folder.
pub const REPORT_FILE: &str = "report.json";

#[derive(Error, Debug)]
pub enum ReportError {
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Every figure of one dashboard render, computed for one date range.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub range: DateRange,
    pub row_count: usize,
    /// Season highlighted as the best one.
    pub best_season: i64,
    pub best_season_rentals: i64,
    pub season_total: BTreeMap<i64, i64>,
    pub season_share: BTreeMap<i64, f64>,
    pub season_rfm: RfmSummary,
    pub season_averages: Option<RfmAverages>,
    pub month_registered: BTreeMap<i64, i64>,
    pub month_share: BTreeMap<i64, f64>,
    pub peak_month: Option<(i64, i64)>,
    pub month_rfm: RfmSummary,
    pub month_averages: Option<RfmAverages>,
}

impl DashboardSnapshot {
    /// Run the filter and all aggregates from scratch on the full table.
    pub fn compute(
        df: &DataFrame,
        range: DateRange,
        best_season: i64,
    ) -> Result<Self, ReportError> {
        let main_df = DataProcessor::filter_by_date_range(df, range)?;

        let season_total = RentalAggregator::season_total(&main_df)?;
        let season_rfm = RentalAggregator::season_rfm(&main_df)?;
        let month_registered = RentalAggregator::month_registered(&main_df)?;
        let month_rfm = RentalAggregator::month_rfm(&main_df)?;

        Ok(Self {
            range,
            row_count: main_df.height(),
            best_season,
            best_season_rentals: RentalAggregator::season_rentals(&main_df, best_season)?,
            season_share: RentalAggregator::shares(&season_total),
            season_averages: season_rfm.averages(),
            month_share: RentalAggregator::shares(&month_registered),
            peak_month: RentalAggregator::peak(&month_registered),
            month_averages: month_rfm.averages(),
            season_total,
            season_rfm,
            month_registered,
            month_rfm,
        })
    }

    /// Nothing fell inside the range.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the snapshot as pretty JSON.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), "wrote dashboard report");
        Ok(())
    }

    /// Render the chart images into `dir`, then write the JSON report
    /// beside them. A chart failure leaves no report behind.
    pub fn export(
        &self,
        dir: &Path,
        season_label: impl Fn(i64) -> String,
        month_label: impl Fn(i64) -> String,
    ) -> Result<Vec<PathBuf>, ReportError> {
        let mut files = StaticChartRenderer::export_snapshot(self, dir, season_label, month_label)?;

        let report = dir.join(REPORT_FILE);
        self.write_json(&report)?;
        files.push(report);
        Ok(files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;
    use chrono::NaiveDate;
    use polars::prelude::*;

    fn dataset_frame() -> DataFrame {
        let raw = df!(
            "instant" => &[1i64, 2, 3, 4],
            "dteday" => &["2011-06-01", "2011-07-01", "2011-08-01", "2011-08-02"],
            "season" => &[2i64, 3, 3, 3],
            "mnth" => &[6i64, 7, 8, 8],
            "registered" => &[80i64, 90, 100, 110],
            "cnt" => &[100i64, 120, 130, 140]
        )
        .unwrap();
        DataLoader::from_frame(raw).unwrap().get_dataframe().clone()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_snapshot_over_sub_range() {
        let df = dataset_frame();
        let range = DateRange::new(date(2011, 7, 1), date(2011, 8, 1));
        let snapshot = DashboardSnapshot::compute(&df, range, 3).unwrap();

        assert_eq!(snapshot.row_count, 2);
        assert_eq!(snapshot.best_season_rentals, 250);
        assert_eq!(snapshot.season_total, BTreeMap::from([(3, 250)]));
        assert_eq!(snapshot.peak_month, Some((8, 100)));
        // recency is measured against the end of the filtered range
        assert_eq!(snapshot.month_rfm.get(7).map(|s| s.recency), Some(31));
        assert_eq!(snapshot.month_rfm.get(8).map(|s| s.recency), Some(0));
    }

    #[test]
    fn test_empty_snapshot() {
        let df = dataset_frame();
        let range = DateRange::new(date(2012, 1, 1), date(2012, 2, 1));
        let snapshot = DashboardSnapshot::compute(&df, range, 3).unwrap();

        assert!(snapshot.is_empty());
        assert!(snapshot.season_total.is_empty());
        assert!(snapshot.month_registered.is_empty());
        assert!(snapshot.season_rfm.is_empty());
        assert!(snapshot.month_rfm.is_empty());
        assert_eq!(snapshot.season_averages, None);
        assert_eq!(snapshot.peak_month, None);
    }

    #[test]
    fn test_failed_chart_leaves_no_report() {
        let df = dataset_frame();
        let range = DateRange::new(date(2011, 6, 1), date(2011, 8, 2));
        let snapshot = DashboardSnapshot::compute(&df, range, 3).unwrap();

        let dir = tempfile::tempdir().unwrap();
        // a directory where the first image should go makes rendering fail
        std::fs::create_dir(dir.path().join("season_total_bar.png")).unwrap();

        let result = snapshot.export(dir.path(), |k| k.to_string(), |k| k.to_string());
        assert!(matches!(result, Err(ReportError::Render(_))));
        assert!(!dir.path().join(REPORT_FILE).exists());
    }

    #[test]
    fn test_json_report() {
        let df = dataset_frame();
        let range = DateRange::new(date(2011, 6, 1), date(2011, 8, 2));
        let snapshot = DashboardSnapshot::compute(&df, range, 3).unwrap();

        let value: serde_json::Value = serde_json::from_str(&snapshot.to_json().unwrap()).unwrap();
        assert_eq!(value["row_count"], 4);
        assert_eq!(value["season_total"]["3"], 390);
        assert_eq!(value["range"]["start"], "2011-06-01");
        assert_eq!(value["month_rfm"]["group"], "Month");
    }
}
