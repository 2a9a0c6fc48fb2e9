//! Dashboard settings.

use clap::Parser;
use std::path::PathBuf;

/// Dataset read when no path is given on the command line.
pub const DEFAULT_DATASET: &str = "data/merged_df.csv";

#[derive(Parser, Debug)]
#[command(name = "bike_dashboard")]
#[command(about = "Bike rental data exploration dashboard")]
#[command(version)]
struct Cli {
    /// Path to the rental CSV
    #[arg(default_value = DEFAULT_DATASET)]
    dataset: PathBuf,
}

/// Settings for one dashboard session.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub dataset_path: PathBuf,
    pub window_size: [f32; 2],
    /// ISO 4217 code shown in front of monetary figures.
    pub currency: String,
    /// Season whose rentals are shown as the headline metric (3 is fall).
    pub best_season: i64,
    /// Bars shown in the "best months" charts.
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            dataset_path: PathBuf::from(DEFAULT_DATASET),
            window_size: [1400.0, 900.0],
            currency: "AUD".to_string(),
            best_season: 3,
            top_n: 5,
        }
    }
}

impl DashboardConfig {
    /// Build from the full argument list, program name first. The only
    /// argument accepted is an optional dataset path.
    pub fn from_args<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<std::ffi::OsString> + Clone,
    {
        let cli = Cli::try_parse_from(args)?;
        Ok(Self {
            dataset_path: cli.dataset,
            ..Self::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path() {
        let config = DashboardConfig::from_args(["bike_dashboard"]).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from(DEFAULT_DATASET));
        assert_eq!(config.best_season, 3);
        assert_eq!(config.top_n, 5);
    }

    #[test]
    fn test_path_argument() {
        let config = DashboardConfig::from_args(["bike_dashboard", "day.csv"]).unwrap();
        assert_eq!(config.dataset_path, PathBuf::from("day.csv"));
    }

    #[test]
    fn test_rejects_extra_arguments() {
        assert!(DashboardConfig::from_args(["bike_dashboard", "a.csv", "b.csv"]).is_err());
    }
}
