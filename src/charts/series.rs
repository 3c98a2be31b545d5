//! Chart Series Module
//! Computes the data behind every chart, independent of any drawing backend.

use crate::data::EmailTable;
use crate::stats::{
    bin_count, gaussian_filter1d, histogram, linspace, CubicSpline, Histogram, StatsError,
    DEFAULT_TRUNCATE,
};
use log::{debug, warn};
use polars::prelude::PolarsError;
use rayon::prelude::*;
use serde::Serialize;
use thiserror::Error;

pub const DAYS_PER_YEAR: f64 = 365.25;

#[derive(Error, Debug)]
pub enum SeriesError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error(transparent)]
    Stats(#[from] StatsError),
    #[error("{category} emails on {weekday}: {source}")]
    Weekday {
        weekday: String,
        category: &'static str,
        source: StatsError,
    },
}

/// How each email is weighted in the per-hour histogram.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum HourWeights {
    /// Average emails per hour of day per calendar day.
    #[default]
    Average,
    /// Every email counts `1 / total`.
    FractionOf(usize),
    /// One weight per row.
    Custom(Vec<f64>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    #[default]
    Vertical,
    Horizontal,
}

/// Gaussian smoothing and resampling applied to smoothed hour curves.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Smoothing {
    pub sigma: f64,
    pub truncate: f64,
    pub samples: usize,
}

impl Default for Smoothing {
    fn default() -> Self {
        Self {
            sigma: 0.75,
            truncate: DEFAULT_TRUNCATE,
            samples: 10_000,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HourOptions {
    pub dt: f64,
    pub smooth: Option<Smoothing>,
    pub weights: HourWeights,
    pub orientation: Orientation,
}

impl Default for HourOptions {
    fn default() -> Self {
        Self {
            dt: 1.0,
            smooth: None,
            weights: HourWeights::Average,
            orientation: Orientation::Vertical,
        }
    }
}

/// Sampled smooth curve.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Curve {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

impl Curve {
    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x.iter().copied().zip(self.y.iter().copied())
    }

    /// Trapezoidal area under the curve.
    pub fn area(&self) -> f64 {
        self.x
            .windows(2)
            .zip(self.y.windows(2))
            .map(|(x, y)| 0.5 * (x[1] - x[0]) * (y[0] + y[1]))
            .sum()
    }

    pub fn max_y(&self) -> f64 {
        self.y.iter().copied().fold(0.0, f64::max)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum HourSeries {
    Bars(Histogram),
    Curve(Curve),
}

impl HourSeries {
    pub fn max_value(&self) -> f64 {
        match self {
            HourSeries::Bars(hist) => hist.max_count(),
            HourSeries::Curve(curve) => curve.max_y(),
        }
    }
}

/// Scatter of emails by year (x) and time of day (y).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterSeries {
    pub points: Vec<(f64, f64)>,
    pub year_range: (f64, f64),
}

/// Smoothed per-hour curves of the three email categories for one weekday.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeekdayCurves {
    pub weekday: String,
    pub starters: Option<Curve>,
    pub replies: Option<Curve>,
    pub forwards: Option<Curve>,
}

fn span(values: &[f64]) -> (f64, f64) {
    let lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    (lo, hi)
}

pub fn time_vs_year(table: &EmailTable) -> Result<ScatterSeries, SeriesError> {
    let points = table.points()?;
    if points.is_empty() {
        return Err(StatsError::EmptyInput.into());
    }
    let years: Vec<f64> = points.iter().map(|p| p.0).collect();
    Ok(ScatterSeries {
        year_range: span(&years),
        points,
    })
}

/// Average number of emails per day, binned by fractional year.
pub fn avg_per_day(table: &EmailTable, dt: f64) -> Result<Histogram, SeriesError> {
    let years = table.years()?;
    if years.is_empty() {
        return Err(StatsError::EmptyInput.into());
    }
    let (lo, hi) = span(&years);
    let bins = bin_count(hi - lo, dt)?;
    let weights = vec![1.0 / (dt * DAYS_PER_YEAR); years.len()];

    debug!("avg_per_day: {} emails, {} bins of {} years", years.len(), bins, dt);
    Ok(histogram(&years, bins, Some(&weights))?)
}

/// Emails per hour of day, as bars or as a smoothed curve.
pub fn avg_per_hour(table: &EmailTable, options: &HourOptions) -> Result<HourSeries, SeriesError> {
    let times = table.times_of_day()?;
    if times.is_empty() {
        return Err(StatsError::EmptyInput.into());
    }

    let (t_lo, t_hi) = span(&times);
    let bins = bin_count(t_hi - t_lo, options.dt)?;

    let weights = match &options.weights {
        HourWeights::Average => {
            let (y_lo, y_hi) = span(&table.years()?);
            let years = y_hi - y_lo;
            if years <= 0.0 {
                return Err(StatsError::ZeroYearSpan.into());
            }
            vec![options.dt / (years * DAYS_PER_YEAR); times.len()]
        }
        HourWeights::FractionOf(0) => return Err(StatsError::ZeroTotal.into()),
        HourWeights::FractionOf(total) => vec![1.0 / *total as f64; times.len()],
        HourWeights::Custom(weights) => weights.clone(),
    };
    let hist = histogram(&times, bins, Some(&weights))?;

    match options.smooth {
        None => Ok(HourSeries::Bars(hist)),
        Some(smoothing) => Ok(HourSeries::Curve(smooth_histogram(&hist, &smoothing)?)),
    }
}

/// Gaussian-smooth the bin heights, then resample them through a cubic
/// spline over the bin centres.
pub fn smooth_histogram(hist: &Histogram, smoothing: &Smoothing) -> Result<Curve, StatsError> {
    let centers = hist.centers();
    let smoothed = gaussian_filter1d(hist.counts(), smoothing.sigma, smoothing.truncate)?;
    let spline = CubicSpline::new(&centers, &smoothed)?;

    let (lo, hi) = spline.domain();
    let x = linspace(lo, hi, smoothing.samples);
    let y = spline.eval_many(&x)?;
    Ok(Curve { x, y })
}

/// Per-weekday smoothed hour curves for starters, replies and forwards.
///
/// Weekdays come from `all` in order of first appearance, or from the three
/// categories concatenated when `all` is `None`. Each category is weighted by
/// its own total, so summing a category's curves over weekdays gives its
/// weekly profile.
pub fn time_of_day(
    all: Option<&EmailTable>,
    starters: &EmailTable,
    replies: &EmailTable,
    forwards: &EmailTable,
    dt: f64,
    smoothing: Smoothing,
) -> Result<Vec<WeekdayCurves>, SeriesError> {
    let weekdays = match all {
        Some(table) => table.unique_weekdays()?,
        None => starters
            .concat(replies)?
            .concat(forwards)?
            .unique_weekdays()?,
    };

    let categories = [
        ("starter", starters),
        ("reply", replies),
        ("forward", forwards),
    ];

    weekdays
        .par_iter()
        .map(|weekday| -> Result<WeekdayCurves, SeriesError> {
            let mut curves = categories.iter().map(|&(category, table)| {
                weekday_curve(table, weekday, category, dt, smoothing)
            });
            // three categories, three curves
            let starters = curves.next().transpose()?.flatten();
            let replies = curves.next().transpose()?.flatten();
            let forwards = curves.next().transpose()?.flatten();
            Ok(WeekdayCurves {
                weekday: weekday.clone(),
                starters,
                replies,
                forwards,
            })
        })
        .collect()
}

fn weekday_curve(
    table: &EmailTable,
    weekday: &str,
    category: &'static str,
    dt: f64,
    smoothing: Smoothing,
) -> Result<Option<Curve>, SeriesError> {
    let subset = table.filter_weekday(weekday)?;
    if subset.is_empty() {
        warn!("no {category} emails on {weekday}, skipping curve");
        return Ok(None);
    }

    let options = HourOptions {
        dt,
        smooth: Some(smoothing),
        weights: HourWeights::FractionOf(table.height()),
        orientation: Orientation::Vertical,
    };
    match avg_per_hour(&subset, &options) {
        Ok(HourSeries::Curve(curve)) => Ok(Some(curve)),
        Ok(HourSeries::Bars(_)) => Ok(None),
        Err(SeriesError::Stats(source)) => Err(SeriesError::Weekday {
            weekday: weekday.to_string(),
            category,
            source,
        }),
        Err(other) => Err(other),
    }
}
