//! CSV Data Loader Module
//! Reads the cleaned rental dataset with Polars and parses its date columns.

use super::{DateBounds, DATE_COLUMNS, INSTANT, NO, REQUIRED_COLUMNS};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Date format accepted in date columns.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// ISO date-time forms tried when a column is not plain dates. The time of
/// day is discarded.
pub const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("Failed to load CSV: {0}")]
    Csv(#[from] PolarsError),
    #[error("Missing required column: {0}")]
    MissingColumn(String),
    #[error("Invalid date in column '{column}': {detail}")]
    InvalidDate { column: String, detail: String },
    #[error("No data loaded")]
    NoData,
}

/// A loaded rental table together with its date bounds.
///
/// Loaded once per session and handed explicitly to the filter and the
/// aggregator; nothing here is global.
#[derive(Debug, Clone)]
pub struct Dataset {
    df: DataFrame,
    bounds: DateBounds,
    file_path: Option<PathBuf>,
}

impl Dataset {
    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> &DataFrame {
        &self.df
    }

    pub fn bounds(&self) -> DateBounds {
        self.bounds
    }

    /// Get list of column names.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect()
    }

    pub fn get_row_count(&self) -> usize {
        self.df.height()
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }
}

/// Handles CSV file loading with Polars.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file. Any unparseable date aborts the whole load.
    pub fn load_csv(file_path: impl AsRef<Path>) -> Result<Dataset, LoaderError> {
        let path = file_path.as_ref();
        if !path.is_file() {
            return Err(LoaderError::NotFound(path.display().to_string()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(10000))
            .finish()?
            .collect()?;

        info!(path = %path.display(), rows = df.height(), "loaded rental dataset");

        let mut dataset = Self::from_frame(df)?;
        dataset.file_path = Some(path.to_path_buf());
        Ok(dataset)
    }

    /// Prepare an already-read frame: check columns, rename `instant` to
    /// `no`, parse dates and compute the date bounds.
    pub fn from_frame(mut df: DataFrame) -> Result<Dataset, LoaderError> {
        for &name in REQUIRED_COLUMNS {
            if df.get_column_index(name).is_none() {
                return Err(LoaderError::MissingColumn(name.to_string()));
            }
        }

        if df.get_column_index(INSTANT).is_some() {
            df.rename(INSTANT, NO.into())?;
        }

        let df = Self::parse_date_columns(df)?;
        let bounds = DateBounds::from_frame(&df)?.ok_or(LoaderError::NoData)?;
        debug!(min = %bounds.min, max = %bounds.max, "date bounds");

        Ok(Dataset {
            df,
            bounds,
            file_path: None,
        })
    }

    /// Convert every column in `DATE_COLUMNS` to a polars `Date`.
    fn parse_date_columns(mut df: DataFrame) -> Result<DataFrame, LoaderError> {
        for &name in DATE_COLUMNS {
            let invalid = |detail: String| LoaderError::InvalidDate {
                column: name.to_string(),
                detail,
            };

            let dtype = df.column(name)?.dtype().clone();
            df = match dtype {
                DataType::Date => df,
                DataType::String => {
                    Self::parse_date_strings(df, name).map_err(|e| invalid(e.to_string()))?
                }
                other => return Err(invalid(format!("expected date strings, found {other}"))),
            };

            // Empty cells come through as nulls rather than parse failures
            let nulls = df.column(name)?.null_count();
            if nulls > 0 {
                return Err(invalid(format!("{nulls} empty value(s)")));
            }
        }

        Ok(df)
    }

    /// Parse a string column as plain dates, falling back to ISO
    /// date-time forms. Every attempt is strict; the error of the plain
    /// date attempt is returned when none matches.
    fn parse_date_strings(df: DataFrame, name: &str) -> PolarsResult<DataFrame> {
        let date_error = match df
            .clone()
            .lazy()
            .with_column(col(name).str().to_date(strptime(DATE_FORMAT)))
            .collect()
        {
            Ok(parsed) => return Ok(parsed),
            Err(e) => e,
        };

        for &format in DATETIME_FORMATS {
            let parsed = df
                .clone()
                .lazy()
                .with_column(
                    col(name)
                        .str()
                        .to_datetime(
                            Some(TimeUnit::Microseconds),
                            None,
                            strptime(format),
                            lit("raise"),
                        )
                        .dt()
                        .date(),
                )
                .collect();
            if let Ok(parsed) = parsed {
                debug!(column = name, format, "parsed date-time values as dates");
                return Ok(parsed);
            }
        }

        Err(date_error)
    }
}

fn strptime(format: &str) -> StrptimeOptions {
    StrptimeOptions {
        format: Some(format.into()),
        strict: true,
        exact: true,
        ..Default::default()
    }
}
