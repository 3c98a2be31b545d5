//! CSV Data Loader Module
//! Loads email timestamp tables from CSV files using Polars.

use crate::data::table::{EmailTable, DAY_OF_WEEK, TIME_OF_DAY, YEAR};
use log::{debug, info};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Column '{column}' not found in {path}")]
    MissingColumn { column: String, path: PathBuf },
    #[error("No email rows in {0}")]
    NoData(PathBuf),
}

/// Source column names mapped onto the canonical email table columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnNames {
    pub year: String,
    pub time_of_day: String,
    pub day_of_week: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            year: YEAR.to_string(),
            time_of_day: TIME_OF_DAY.to_string(),
            day_of_week: DAY_OF_WEEK.to_string(),
        }
    }
}

/// Handles CSV file loading with Polars.
pub struct EmailLoader {
    columns: ColumnNames,
}

impl Default for EmailLoader {
    fn default() -> Self {
        Self::new(ColumnNames::default())
    }
}

impl EmailLoader {
    pub fn new(columns: ColumnNames) -> Self {
        Self { columns }
    }

    /// Load a CSV file, keeping only the three email columns.
    ///
    /// Columns are renamed to their canonical names, cast to their working
    /// types and rows with any null among them are dropped.
    pub fn load_csv(&self, path: &Path) -> Result<EmailTable, LoaderError> {
        let mut lazy = LazyCsvReader::new(path)
            .with_infer_schema_length(Some(10000))
            .with_has_header(true)
            .finish()?;

        let schema = lazy.collect_schema()?;
        for column in [
            &self.columns.year,
            &self.columns.time_of_day,
            &self.columns.day_of_week,
        ] {
            if !schema.contains(column.as_str()) {
                return Err(LoaderError::MissingColumn {
                    column: column.clone(),
                    path: path.to_path_buf(),
                });
            }
        }

        let df = lazy
            .select([
                col(self.columns.year.as_str())
                    .cast(DataType::Float64)
                    .alias(YEAR),
                col(self.columns.time_of_day.as_str())
                    .cast(DataType::Float64)
                    .alias(TIME_OF_DAY),
                col(self.columns.day_of_week.as_str())
                    .cast(DataType::String)
                    .alias(DAY_OF_WEEK),
            ])
            .drop_nulls(None)
            .collect()?;

        if df.height() == 0 {
            return Err(LoaderError::NoData(path.to_path_buf()));
        }

        debug!("schema of {}: {:?}", path.display(), df.schema());
        info!("loaded {} emails from {}", df.height(), path.display());

        Ok(EmailTable::from_dataframe(df))
    }
}
