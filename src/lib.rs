//! Bike Sharing Dashboard
//!
//! Loads a cleaned bike-rental dataset, filters it by date range and derives
//! season and month aggregates, including recency/frequency/monetary (RFM)
//! summaries, for an interactive egui dashboard.

pub mod charts;
pub mod config;
pub mod data;
pub mod gui;
pub mod logging;
pub mod report;
pub mod stats;
