//! Email Table Module
//! Read-only view over the canonical email columns.

use polars::prelude::*;
use std::collections::HashSet;

pub const YEAR: &str = "year";
pub const TIME_OF_DAY: &str = "time_of_day";
pub const DAY_OF_WEEK: &str = "day_of_week";

/// Email records with `year`, `time_of_day` and `day_of_week` columns.
#[derive(Debug, Clone)]
pub struct EmailTable {
    df: DataFrame,
}

impl EmailTable {
    /// Wrap a DataFrame that already carries the canonical columns.
    pub(crate) fn from_dataframe(df: DataFrame) -> Self {
        Self { df }
    }

    /// Build a table from column vectors. All three must have the same length.
    pub fn from_columns(
        year: Vec<f64>,
        time_of_day: Vec<f64>,
        day_of_week: Vec<String>,
    ) -> PolarsResult<Self> {
        let df = DataFrame::new(vec![
            Column::new(YEAR.into(), year),
            Column::new(TIME_OF_DAY.into(), time_of_day),
            Column::new(DAY_OF_WEEK.into(), day_of_week),
        ])?;
        Ok(Self { df })
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn years(&self) -> PolarsResult<Vec<f64>> {
        self.f64_values(YEAR)
    }

    pub fn times_of_day(&self) -> PolarsResult<Vec<f64>> {
        self.f64_values(TIME_OF_DAY)
    }

    pub fn weekdays(&self) -> PolarsResult<Vec<String>> {
        let series = self.df.column(DAY_OF_WEEK)?.as_materialized_series();
        Ok(series
            .str()?
            .into_iter()
            .flatten()
            .map(str::to_string)
            .collect())
    }

    /// `(year, time_of_day)` pairs, one per row.
    pub fn points(&self) -> PolarsResult<Vec<(f64, f64)>> {
        let years = self.years()?;
        let times = self.times_of_day()?;
        Ok(years.into_iter().zip(times).collect())
    }

    /// Distinct weekday labels in order of first appearance.
    pub fn unique_weekdays(&self) -> PolarsResult<Vec<String>> {
        let mut seen = HashSet::new();
        Ok(self
            .weekdays()?
            .into_iter()
            .filter(|day| seen.insert(day.clone()))
            .collect())
    }

    /// Rows sent on the given weekday.
    pub fn filter_weekday(&self, weekday: &str) -> PolarsResult<Self> {
        let df = self
            .df
            .clone()
            .lazy()
            .filter(col(DAY_OF_WEEK).eq(lit(weekday)))
            .collect()?;
        Ok(Self { df })
    }

    /// Rows of `self` followed by rows of `other`.
    pub fn concat(&self, other: &EmailTable) -> PolarsResult<Self> {
        Ok(Self {
            df: self.df.vstack(&other.df)?,
        })
    }

    fn f64_values(&self, name: &str) -> PolarsResult<Vec<f64>> {
        let column = self.df.column(name)?;
        Ok(column.f64()?.into_iter().flatten().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EmailTable {
        EmailTable::from_columns(
            vec![2001.1, 2001.2, 2001.3, 2001.4],
            vec![8.0, 13.5, 22.0, 9.0],
            ["Tuesday", "Monday", "Tuesday", "Sunday"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn unique_weekdays_keep_first_appearance_order() {
        assert_eq!(
            sample().unique_weekdays().unwrap(),
            vec!["Tuesday", "Monday", "Sunday"]
        );
    }

    #[test]
    fn filter_weekday_keeps_matching_rows() {
        let tuesdays = sample().filter_weekday("Tuesday").unwrap();
        assert_eq!(tuesdays.height(), 2);
        assert_eq!(tuesdays.times_of_day().unwrap(), vec![8.0, 22.0]);

        let none = sample().filter_weekday("Saturday").unwrap();
        assert!(none.is_empty());
    }

    #[test]
    fn concat_appends_rows() {
        let table = sample();
        let doubled = table.concat(&table).unwrap();
        assert_eq!(doubled.height(), 8);
        assert_eq!(doubled.points().unwrap()[4], (2001.1, 8.0));
    }

    #[test]
    fn mismatched_column_lengths_are_rejected() {
        let result = EmailTable::from_columns(vec![2001.0], vec![], vec!["Monday".into()]);
        assert!(result.is_err());
    }
}
