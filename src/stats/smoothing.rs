//! Gaussian Smoothing Module
//! One-dimensional Gaussian filter with half-sample symmetric boundaries.

use super::StatsError;
use statrs::distribution::{Continuous, Normal};

/// Kernel radius in standard deviations.
pub const DEFAULT_TRUNCATE: f64 = 4.0;

/// Normalized Gaussian weights for offsets `-radius..=radius`.
pub fn gaussian_kernel(sigma: f64, truncate: f64) -> Result<Vec<f64>, StatsError> {
    if !sigma.is_finite() || sigma <= 0.0 {
        return Err(StatsError::InvalidSigma(sigma));
    }
    let normal = Normal::new(0.0, sigma).map_err(|_| StatsError::InvalidSigma(sigma))?;
    let radius = (truncate * sigma + 0.5) as i64;

    let mut kernel: Vec<f64> = (-radius..=radius).map(|x| normal.pdf(x as f64)).collect();
    let sum: f64 = kernel.iter().sum();
    kernel.iter_mut().for_each(|w| *w /= sum);
    Ok(kernel)
}

/// Map an out-of-range index onto `0..len` by reflecting about the edges
/// (`d c b a | a b c d | d c b a`).
fn reflect_index(i: i64, len: usize) -> usize {
    let n = len as i64;
    let period = 2 * n;
    let mut k = i.rem_euclid(period);
    if k >= n {
        k = period - 1 - k;
    }
    k as usize
}

/// Smooth `input` with a Gaussian of standard deviation `sigma`.
///
/// A zero sigma returns the input unchanged.
pub fn gaussian_filter1d(input: &[f64], sigma: f64, truncate: f64) -> Result<Vec<f64>, StatsError> {
    if sigma == 0.0 || input.is_empty() {
        return Ok(input.to_vec());
    }
    let kernel = gaussian_kernel(sigma, truncate)?;
    let radius = (kernel.len() / 2) as i64;

    let output = (0..input.len() as i64)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * input[reflect_index(i + k as i64 - radius, input.len())])
                .sum()
        })
        .collect();
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn kernel_is_normalized_and_symmetric() {
        let kernel = gaussian_kernel(0.75, DEFAULT_TRUNCATE).unwrap();
        // radius = int(4 * 0.75 + 0.5) = 3
        assert_eq!(kernel.len(), 7);
        assert!(close(kernel.iter().sum::<f64>(), 1.0));
        for k in 0..3 {
            assert!(close(kernel[k], kernel[6 - k]));
        }
        assert!(kernel[3] > kernel[2] && kernel[2] > kernel[1]);
    }

    #[test]
    fn constant_signal_is_unchanged() {
        let smoothed = gaussian_filter1d(&[2.5; 6], 0.75, DEFAULT_TRUNCATE).unwrap();
        assert!(smoothed.iter().all(|&v| close(v, 2.5)));
    }

    #[test]
    fn impulse_spreads_symmetrically() {
        let input = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0];
        let smoothed = gaussian_filter1d(&input, 0.75, DEFAULT_TRUNCATE).unwrap();
        let kernel = gaussian_kernel(0.75, DEFAULT_TRUNCATE).unwrap();
        // far enough from both edges to see the bare kernel
        for (out, w) in smoothed.iter().zip(kernel.iter()) {
            assert!(close(*out, *w));
        }
        assert!(smoothed[3] < 1.0);
    }

    #[test]
    fn edges_reflect() {
        let input = [1.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0];
        let smoothed = gaussian_filter1d(&input, 0.75, DEFAULT_TRUNCATE).unwrap();
        let kernel = gaussian_kernel(0.75, DEFAULT_TRUNCATE).unwrap();
        // offset -1 reflects back onto index 0
        assert!(close(smoothed[0], kernel[3] + kernel[2]));
        assert!(close(smoothed.iter().sum::<f64>(), 1.0));
    }

    #[test]
    fn short_inputs_reflect_repeatedly() {
        let smoothed = gaussian_filter1d(&[3.0, 3.0], 2.0, DEFAULT_TRUNCATE).unwrap();
        assert!(smoothed.iter().all(|&v| close(v, 3.0)));
    }

    #[test]
    fn zero_sigma_is_identity() {
        let input = [1.0, 4.0, 2.0];
        assert_eq!(gaussian_filter1d(&input, 0.0, DEFAULT_TRUNCATE).unwrap(), input);
    }

    #[test]
    fn negative_sigma_is_rejected() {
        assert_eq!(
            gaussian_filter1d(&[1.0], -1.0, DEFAULT_TRUNCATE),
            Err(StatsError::InvalidSigma(-1.0))
        );
    }

    #[test]
    fn reflect_index_wraps() {
        assert_eq!(reflect_index(-1, 4), 0);
        assert_eq!(reflect_index(-2, 4), 1);
        assert_eq!(reflect_index(4, 4), 3);
        assert_eq!(reflect_index(5, 4), 2);
        assert_eq!(reflect_index(9, 4), 1);
    }
}
