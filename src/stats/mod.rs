//! Stats module - rental aggregates and RFM summaries

mod calculator;

pub use calculator::{
    RentalAggregator, RfmAverages, RfmGroup, RfmMetric, RfmScore, RfmSummary, StatsError,
};
