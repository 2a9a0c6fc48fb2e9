//! Statistics Calculator Module
//! Group-by aggregates over the filtered rental table: season totals,
//! registered users per month and recency/frequency/monetary summaries.

use crate::data::{epoch_days, DateBounds, CNT, DTEDAY, MNTH, REGISTERED, SEASON};
use polars::prelude::*;
use serde::Serialize;
use statrs::statistics::Statistics;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::debug;

const LAST_DATE: &str = "max_order_date";
const RECENCY: &str = "recency";
const FREQUENCY: &str = "frequency";
const MONETARY: &str = "monetary";

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Grouping of an RFM summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum RfmGroup {
    /// Frequency is the number of rows in the season.
    Season,
    /// Frequency is the number of registered users in the month.
    Month,
}

impl RfmGroup {
    pub fn key_column(self) -> &'static str {
        match self {
            RfmGroup::Season => SEASON,
            RfmGroup::Month => MNTH,
        }
    }

    fn frequency_expr(self) -> Expr {
        match self {
            RfmGroup::Season => len(),
            RfmGroup::Month => col(REGISTERED).cast(DataType::Int64).sum(),
        }
    }
}

/// One of the three RFM measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RfmMetric {
    Recency,
    Frequency,
    Monetary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RfmScore {
    pub recency: i64,
    pub frequency: i64,
    pub monetary: i64,
}

impl RfmScore {
    pub fn value(&self, metric: RfmMetric) -> i64 {
        match metric {
            RfmMetric::Recency => self.recency,
            RfmMetric::Frequency => self.frequency,
            RfmMetric::Monetary => self.monetary,
        }
    }
}

/// Mean of each measure across the groups of a summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RfmAverages {
    /// Rounded to one decimal.
    pub recency: f64,
    /// Rounded to two decimals.
    pub frequency: f64,
    pub monetary: f64,
}

/// RFM scores keyed by season or month, in ascending key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RfmSummary {
    pub group: RfmGroup,
    pub rows: BTreeMap<i64, RfmScore>,
}

impl RfmSummary {
    pub fn empty(group: RfmGroup) -> Self {
        Self {
            group,
            rows: BTreeMap::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: i64) -> Option<&RfmScore> {
        self.rows.get(&key)
    }

    /// Values of one measure in key order.
    pub fn series(&self, metric: RfmMetric) -> Vec<(i64, i64)> {
        self.rows
            .iter()
            .map(|(&key, score)| (key, score.value(metric)))
            .collect()
    }

    /// Averages across groups. `None` for an empty summary, where a mean
    /// is undefined.
    pub fn averages(&self) -> Option<RfmAverages> {
        if self.rows.is_empty() {
            return None;
        }

        let mean = |metric: RfmMetric| -> f64 {
            self.rows
                .values()
                .map(|s| s.value(metric) as f64)
                .collect::<Vec<f64>>()
                .mean()
        };

        Some(RfmAverages {
            recency: round_to(mean(RfmMetric::Recency), 1),
            frequency: round_to(mean(RfmMetric::Frequency), 2),
            monetary: mean(RfmMetric::Monetary),
        })
    }

    /// The best `n` groups for a measure: lowest recency first, highest
    /// frequency or monetary first. Ties keep ascending key order.
    pub fn top(&self, metric: RfmMetric, n: usize) -> Vec<(i64, i64)> {
        let mut ranked = self.series(metric);
        match metric {
            RfmMetric::Recency => ranked.sort_by_key(|&(_, v)| v),
            RfmMetric::Frequency | RfmMetric::Monetary => {
                ranked.sort_by_key(|&(_, v)| std::cmp::Reverse(v))
            }
        }
        ranked.truncate(n);
        ranked
    }
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

/// Stateless aggregates over a (filtered) rental table.
pub struct RentalAggregator;

impl RentalAggregator {
    /// Total rentals (`cnt`) per season.
    pub fn season_total(df: &DataFrame) -> Result<BTreeMap<i64, i64>, StatsError> {
        Self::sum_by(df, SEASON, CNT)
    }

    /// Registered users per month.
    pub fn month_registered(df: &DataFrame) -> Result<BTreeMap<i64, i64>, StatsError> {
        Self::sum_by(df, MNTH, REGISTERED)
    }

    pub fn season_rfm(df: &DataFrame) -> Result<RfmSummary, StatsError> {
        Self::rfm(df, RfmGroup::Season)
    }

    pub fn month_rfm(df: &DataFrame) -> Result<RfmSummary, StatsError> {
        Self::rfm(df, RfmGroup::Month)
    }

    /// Total rentals of a single season, 0 when it has no rows.
    pub fn season_rentals(df: &DataFrame, season: i64) -> Result<i64, StatsError> {
        let total = df
            .clone()
            .lazy()
            .filter(col(SEASON).cast(DataType::Int64).eq(lit(season)))
            .select([col(CNT).cast(DataType::Int64).sum()])
            .collect()?;

        Ok(total.column(CNT)?.i64()?.get(0).unwrap_or(0))
    }

    /// Percentage share of each key in the total.
    pub fn shares(totals: &BTreeMap<i64, i64>) -> BTreeMap<i64, f64> {
        let sum: i64 = totals.values().sum();
        if sum == 0 {
            return totals.keys().map(|&k| (k, 0.0)).collect();
        }
        totals
            .iter()
            .map(|(&k, &v)| (k, v as f64 * 100.0 / sum as f64))
            .collect()
    }

    /// Key holding the largest value; the lowest key wins a tie.
    pub fn peak(totals: &BTreeMap<i64, i64>) -> Option<(i64, i64)> {
        totals
            .iter()
            .fold(None, |best: Option<(i64, i64)>, (&k, &v)| match best {
                Some((_, bv)) if bv >= v => best,
                _ => Some((k, v)),
            })
    }

    /// RFM summary for either grouping.
    ///
    /// Recency is measured against the latest date of `df` itself, so a
    /// filtered table is scored against the end of its own range.
    pub fn rfm(df: &DataFrame, group: RfmGroup) -> Result<RfmSummary, StatsError> {
        let Some(frame) = Self::rfm_frame(df, group)? else {
            return Ok(RfmSummary::empty(group));
        };

        let key = group.key_column();
        let keys = i64_values(&frame, key)?;
        let recency = i64_values(&frame, RECENCY)?;
        let frequency = i64_values(&frame, FREQUENCY)?;
        let monetary = i64_values(&frame, MONETARY)?;

        let rows = keys
            .into_iter()
            .zip(recency)
            .zip(frequency)
            .zip(monetary)
            .filter_map(|(((k, recency), frequency), monetary)| {
                Some((
                    k?,
                    RfmScore {
                        recency: recency?,
                        frequency: frequency?,
                        monetary: monetary?,
                    },
                ))
            })
            .collect::<BTreeMap<_, _>>();

        debug!(?group, groups = rows.len(), "computed rfm summary");
        Ok(RfmSummary { group, rows })
    }

    /// Group by the key taking the latest date, frequency and monetary,
    /// then derive recency. Keeps the intermediate latest-date column.
    fn rfm_with_last_date(
        df: &DataFrame,
        group: RfmGroup,
    ) -> Result<Option<LazyFrame>, StatsError> {
        let Some(bounds) = DateBounds::from_frame(df)? else {
            return Ok(None);
        };
        let recent_day = epoch_days(bounds.max);

        let lf = df
            .clone()
            .lazy()
            .group_by([col(group.key_column())])
            .agg([
                col(DTEDAY).max().alias(LAST_DATE),
                group.frequency_expr().cast(DataType::Int64).alias(FREQUENCY),
                col(CNT).cast(DataType::Int64).sum().alias(MONETARY),
            ])
            .with_column(
                (lit(recent_day) - col(LAST_DATE).cast(DataType::Int32))
                    .cast(DataType::Int64)
                    .alias(RECENCY),
            );

        Ok(Some(lf))
    }

    /// The RFM frame with the latest-date column dropped.
    fn rfm_frame(df: &DataFrame, group: RfmGroup) -> Result<Option<DataFrame>, StatsError> {
        let Some(lf) = Self::rfm_with_last_date(df, group)? else {
            return Ok(None);
        };

        let frame = lf
            .select([
                col(group.key_column()).cast(DataType::Int64),
                col(RECENCY),
                col(FREQUENCY),
                col(MONETARY),
            ])
            .collect()?;
        Ok(Some(frame))
    }

    fn sum_by(df: &DataFrame, key: &str, value: &str) -> Result<BTreeMap<i64, i64>, StatsError> {
        let grouped = df
            .clone()
            .lazy()
            .group_by([col(key)])
            .agg([col(value).cast(DataType::Int64).sum().alias(value)])
            .select([col(key).cast(DataType::Int64), col(value)])
            .collect()?;

        let totals: BTreeMap<i64, i64> = i64_values(&grouped, key)?
            .into_iter()
            .zip(i64_values(&grouped, value)?)
            .filter_map(|(k, v)| Some((k?, v?)))
            .collect();

        debug!(key, value, groups = totals.len(), "computed group sums");
        Ok(totals)
    }
}

/// Column values as options; rows with a null key or measure are skipped
/// by the callers.
fn i64_values(df: &DataFrame, name: &str) -> Result<Vec<Option<i64>>, StatsError> {
    Ok(df.column(name)?.i64()?.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::DataLoader;

    fn frame(
        dates: &[&str],
        season: &[i64],
        mnth: &[i64],
        registered: &[i64],
        cnt: &[i64],
    ) -> DataFrame {
        let raw = df!(
            "dteday" => dates,
            "season" => season,
            "mnth" => mnth,
            "registered" => registered,
            "cnt" => cnt
        )
        .unwrap();
        DataLoader::from_frame(raw).unwrap().get_dataframe().clone()
    }

    fn sample() -> DataFrame {
        frame(
            &["2011-01-01", "2011-01-20", "2011-04-10", "2011-07-01", "2011-08-15", "2011-08-31"],
            &[1, 1, 2, 3, 3, 3],
            &[1, 1, 4, 7, 8, 8],
            &[10, 20, 30, 40, 50, 60],
            &[15, 25, 35, 45, 55, 65],
        )
    }

    fn empty() -> DataFrame {
        sample().head(Some(0))
    }

    #[test]
    fn test_missing_column_is_polars_error() {
        let df = df!("season" => &[1i64, 2]).unwrap();
        let err = RentalAggregator::season_total(&df).unwrap_err();
        assert!(matches!(err, StatsError::Polars(_)));
    }

    #[test]
    fn test_null_keys_do_not_form_a_group() {
        let raw = df!(
            "dteday" => &["2011-07-01", "2011-07-02", "2011-08-01"],
            "season" => &[Some(3i64), None, Some(3)],
            "mnth" => &[Some(7i64), None, Some(8)],
            "registered" => &[10i64, 20, 30],
            "cnt" => &[15i64, 25, 35]
        )
        .unwrap();
        let df = DataLoader::from_frame(raw).unwrap().get_dataframe().clone();

        let totals = RentalAggregator::season_total(&df).unwrap();
        assert_eq!(totals, BTreeMap::from([(3, 50)]));
        assert_eq!(
            RentalAggregator::month_registered(&df).unwrap(),
            BTreeMap::from([(7, 10), (8, 30)])
        );

        let season = RentalAggregator::season_rfm(&df).unwrap();
        assert_eq!(season.rows.keys().copied().collect::<Vec<_>>(), vec![3]);
        let month = RentalAggregator::month_rfm(&df).unwrap();
        assert_eq!(month.rows.keys().copied().collect::<Vec<_>>(), vec![7, 8]);
        assert!(month.get(0).is_none());
    }

    #[test]
    fn test_season_total_single_season() {
        let dates: Vec<String> = (1..=10).map(|d| format!("2011-09-{:02}", d)).collect();
        let dates: Vec<&str> = dates.iter().map(|s| s.as_str()).collect();
        let cnt: Vec<i64> = (1..=10).collect();
        let df = frame(&dates, &[3; 10], &[9; 10], &[0; 10], &cnt);

        let totals = RentalAggregator::season_total(&df).unwrap();
        assert_eq!(totals, BTreeMap::from([(3, 55)]));
    }

    #[test]
    fn test_season_total_conserves_cnt() {
        let df = sample();
        let totals = RentalAggregator::season_total(&df).unwrap();
        assert_eq!(totals.values().sum::<i64>(), 15 + 25 + 35 + 45 + 55 + 65);
        assert_eq!(totals, BTreeMap::from([(1, 40), (2, 35), (3, 165)]));
    }

    #[test]
    fn test_season_rfm() {
        let rfm = RentalAggregator::season_rfm(&sample()).unwrap();
        assert_eq!(rfm.group, RfmGroup::Season);
        assert_eq!(rfm.rows.len(), 3);

        // latest date is 2011-08-31
        assert_eq!(
            rfm.get(1),
            Some(&RfmScore {
                recency: 223,
                frequency: 2,
                monetary: 40
            })
        );
        assert_eq!(rfm.get(2).map(|s| s.recency), Some(143));
        assert_eq!(rfm.get(3).map(|s| (s.recency, s.frequency)), Some((0, 3)));
    }

    #[test]
    fn test_month_rfm_uses_registered_as_frequency() {
        let rfm = RentalAggregator::month_rfm(&sample()).unwrap();
        assert_eq!(rfm.group, RfmGroup::Month);
        assert_eq!(rfm.rows.keys().copied().collect::<Vec<_>>(), vec![1, 4, 7, 8]);
        assert_eq!(
            rfm.get(8),
            Some(&RfmScore {
                recency: 0,
                frequency: 110,
                monetary: 120
            })
        );
        assert_eq!(rfm.get(1).map(|s| (s.recency, s.frequency)), Some((223, 30)));
        assert_eq!(rfm.get(7).map(|s| s.recency), Some(61));
    }

    #[test]
    fn test_dropping_last_date_keeps_values() {
        let df = sample();
        let with_last = RentalAggregator::rfm_with_last_date(&df, RfmGroup::Month)
            .unwrap()
            .unwrap()
            .sort([MNTH], SortMultipleOptions::default())
            .collect()
            .unwrap();
        let dropped = RentalAggregator::rfm_frame(&df, RfmGroup::Month)
            .unwrap()
            .unwrap()
            .sort([MNTH], SortMultipleOptions::default())
            .unwrap();

        assert!(with_last.column(LAST_DATE).is_ok());
        assert!(dropped.column(LAST_DATE).is_err());
        for name in [RECENCY, FREQUENCY, MONETARY] {
            assert_eq!(
                i64_values(&with_last, name).unwrap(),
                i64_values(&dropped, name).unwrap()
            );
        }
    }

    #[test]
    fn test_month_registered_peak() {
        let df = frame(
            &["2011-07-01", "2011-07-02", "2011-08-01", "2011-08-02"],
            &[3, 3, 3, 3],
            &[7, 7, 8, 8],
            &[100, 120, 300, 310],
            &[150, 160, 400, 420],
        );
        let registered = RentalAggregator::month_registered(&df).unwrap();
        assert_eq!(registered, BTreeMap::from([(7, 220), (8, 610)]));
        assert_eq!(RentalAggregator::peak(&registered), Some((8, 610)));
    }

    #[test]
    fn test_empty_table_gives_empty_results() {
        let df = empty();
        assert!(RentalAggregator::season_total(&df).unwrap().is_empty());
        assert!(RentalAggregator::month_registered(&df).unwrap().is_empty());

        let season = RentalAggregator::season_rfm(&df).unwrap();
        let month = RentalAggregator::month_rfm(&df).unwrap();
        assert!(season.is_empty());
        assert!(month.is_empty());
        assert_eq!(season.averages(), None);
        assert_eq!(month.averages(), None);
        assert_eq!(RentalAggregator::season_rentals(&df, 3).unwrap(), 0);
    }

    #[test]
    fn test_season_rentals() {
        assert_eq!(RentalAggregator::season_rentals(&sample(), 3).unwrap(), 165);
        assert_eq!(RentalAggregator::season_rentals(&sample(), 4).unwrap(), 0);
    }

    #[test]
    fn test_averages_are_rounded() {
        let mut rows = BTreeMap::new();
        rows.insert(1, RfmScore { recency: 1, frequency: 1, monetary: 10 });
        rows.insert(2, RfmScore { recency: 2, frequency: 1, monetary: 20 });
        rows.insert(3, RfmScore { recency: 2, frequency: 2, monetary: 31 });
        let summary = RfmSummary { group: RfmGroup::Month, rows };

        let avg = summary.averages().unwrap();
        assert_eq!(avg.recency, 1.7);
        assert_eq!(avg.frequency, 1.33);
        assert!((avg.monetary - 61.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_orders_by_metric() {
        let rfm = RentalAggregator::month_rfm(&sample()).unwrap();
        assert_eq!(rfm.top(RfmMetric::Recency, 2), vec![(8, 0), (7, 61)]);
        assert_eq!(rfm.top(RfmMetric::Frequency, 1), vec![(8, 110)]);
        assert_eq!(rfm.top(RfmMetric::Monetary, 10).len(), 4);
    }

    #[test]
    fn test_shares_sum_to_hundred() {
        let totals = BTreeMap::from([(1, 25), (2, 25), (3, 50)]);
        let shares = RentalAggregator::shares(&totals);
        assert_eq!(shares[&3], 50.0);
        assert!((shares.values().sum::<f64>() - 100.0).abs() < 1e-9);
        assert!(RentalAggregator::shares(&BTreeMap::new()).is_empty());
    }
}
