//! Axis tick selection and hour-of-day labels.

use chrono::NaiveTime;

const NICE_STEPS: [f64; 5] = [1.0, 2.0, 2.5, 5.0, 10.0];

/// Pick at most `nbins` intervals of a "nice" step covering `[lo, hi]` and
/// return the ticks that fall inside the range.
pub fn max_n_ticks(lo: f64, hi: f64, nbins: usize) -> Vec<f64> {
    if !(hi > lo) || nbins == 0 {
        return vec![lo];
    }

    let raw_step = (hi - lo) / nbins as f64;
    let scale = 10f64.powf(raw_step.log10().floor());
    let step = NICE_STEPS
        .iter()
        .map(|s| s * scale)
        .find(|&s| s >= raw_step * (1.0 - 1e-10))
        .unwrap_or(10.0 * scale);

    let eps = step * 1e-10;
    let first = (lo / step - 1e-10).ceil() * step;
    (0..)
        .map(|i| first + step * i as f64)
        .take_while(|&t| t <= hi + eps)
        .map(|t| if t.abs() < eps { 0.0 } else { t })
        .collect()
}

/// Hour of day as a 12-hour clock label. Values wrap modulo 24.
pub fn hour_label(hours: f64) -> String {
    let hour = hours.rem_euclid(24.0) as u32;
    NaiveTime::from_hms_opt(hour, 0, 0)
        .map(|t| t.format("%I %p").to_string())
        .unwrap_or_default()
}

/// Ticks for a `[0, 24]` hour axis.
pub fn hour_ticks() -> Vec<f64> {
    max_n_ticks(0.0, 24.0, 8)
}
