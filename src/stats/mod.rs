//! Statistics module - weighted binning, smoothing and interpolation

mod histogram;
mod smoothing;
mod spline;

pub use histogram::{bin_count, histogram, Histogram};
pub use smoothing::{gaussian_filter1d, gaussian_kernel, DEFAULT_TRUNCATE};
pub use spline::{linspace, CubicSpline};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StatsError {
    #[error("Cannot bin an empty sample")]
    EmptyInput,
    #[error("Histogram needs at least one bin")]
    ZeroBins,
    #[error("Expected {expected} values, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("Sample contains a non-finite value: {0}")]
    NonFinite(f64),
    #[error("Invalid smoothing sigma: {0}")]
    InvalidSigma(f64),
    #[error("Cubic interpolation needs at least 4 points, got {0}")]
    TooFewPoints(usize),
    #[error("Interpolation knots must be strictly increasing")]
    UnsortedKnots,
    #[error("{0} is outside the interpolation range [{1}, {2}]")]
    OutOfRange(f64, f64, f64),
    #[error("Year span is zero, cannot average per day")]
    ZeroYearSpan,
    #[error("Bin width must be positive and finite, got {0}")]
    InvalidBinWidth(f64),
    #[error("Cannot take fractions of a zero total")]
    ZeroTotal,
}
