//! Weighted Histogram Module
//! Equal-width binning over the sample range, NumPy compatible.

use super::StatsError;
use serde::Serialize;

/// Bin edges and (weighted) bin heights. Always holds at least one bin, with
/// `edges.len() == counts.len() + 1`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<f64>,
}

impl Histogram {
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    pub fn counts(&self) -> &[f64] {
        &self.counts
    }

    /// `(first edge, last edge)`.
    pub fn range(&self) -> (f64, f64) {
        (self.edges[0], self.edges[self.edges.len() - 1])
    }

    pub fn bins(&self) -> usize {
        self.counts.len()
    }

    pub fn bin_width(&self) -> f64 {
        self.edges[1] - self.edges[0]
    }

    /// Bin centres: left edges shifted by half the first bin width.
    pub fn centers(&self) -> Vec<f64> {
        let half = 0.5 * self.bin_width();
        self.edges[..self.edges.len() - 1]
            .iter()
            .map(|e| e + half)
            .collect()
    }

    pub fn total(&self) -> f64 {
        self.counts.iter().sum()
    }

    pub fn max_count(&self) -> f64 {
        self.counts.iter().copied().fold(0.0, f64::max)
    }

    /// `(left, right, height)` for every bin.
    pub fn bars(&self) -> impl Iterator<Item = (f64, f64, f64)> + '_ {
        self.edges
            .windows(2)
            .zip(self.counts.iter())
            .map(|(edge, &count)| (edge[0], edge[1], count))
    }
}

/// Number of bins of width `dt` that fit in `span`, never less than one.
pub fn bin_count(span: f64, dt: f64) -> Result<usize, StatsError> {
    if !(dt > 0.0 && dt.is_finite()) {
        return Err(StatsError::InvalidBinWidth(dt));
    }
    let bins = (span / dt) as usize;
    Ok(bins.max(1))
}

/// Bin `values` into `bins` equal-width bins spanning their range.
///
/// The last bin is closed on both sides, so the maximum is counted. When the
/// sample is constant the range is widened to `[v - 0.5, v + 0.5]`.
pub fn histogram(
    values: &[f64],
    bins: usize,
    weights: Option<&[f64]>,
) -> Result<Histogram, StatsError> {
    if values.is_empty() {
        return Err(StatsError::EmptyInput);
    }
    if bins == 0 {
        return Err(StatsError::ZeroBins);
    }
    if let Some(w) = weights {
        if w.len() != values.len() {
            return Err(StatsError::LengthMismatch {
                expected: values.len(),
                actual: w.len(),
            });
        }
    }
    if let Some(&bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(StatsError::NonFinite(bad));
    }

    let mut lo = values.iter().copied().fold(f64::INFINITY, f64::min);
    let mut hi = values.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if lo == hi {
        lo -= 0.5;
        hi += 0.5;
    }

    let span = hi - lo;
    let edges: Vec<f64> = (0..=bins)
        .map(|i| lo + span * i as f64 / bins as f64)
        .collect();

    let mut counts = vec![0.0; bins];
    for (i, &v) in values.iter().enumerate() {
        let mut idx = ((((v - lo) / span) * bins as f64) as usize).min(bins - 1);
        // rounding can put values sitting on an edge one bin off
        if v < edges[idx] {
            idx -= 1;
        } else if idx + 1 < bins && v >= edges[idx + 1] {
            idx += 1;
        }
        counts[idx] += weights.map_or(1.0, |w| w[i]);
    }

    Ok(Histogram { edges, counts })
}
