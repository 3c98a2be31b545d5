//! Cubic Spline Module
//! Not-a-knot cubic spline interpolation through sampled points.

use super::StatsError;

/// `n` evenly spaced samples from `start` to `end`, both included.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            let mut xs: Vec<f64> = (0..n).map(|i| start + step * i as f64).collect();
            xs[n - 1] = end;
            xs
        }
    }
}

/// Interpolating cubic spline with not-a-knot end conditions.
///
/// The third derivative is continuous across the second and the penultimate
/// knot, so a cubic polynomial is reproduced exactly.
#[derive(Debug, Clone)]
pub struct CubicSpline {
    x: Vec<f64>,
    y: Vec<f64>,
    /// Second derivative at each knot.
    m: Vec<f64>,
}

impl CubicSpline {
    pub fn new(x: &[f64], y: &[f64]) -> Result<Self, StatsError> {
        let n = x.len();
        if y.len() != n {
            return Err(StatsError::LengthMismatch {
                expected: n,
                actual: y.len(),
            });
        }
        if n < 4 {
            return Err(StatsError::TooFewPoints(n));
        }
        if x.windows(2).any(|w| !(w[1] > w[0])) {
            return Err(StatsError::UnsortedKnots);
        }

        let h: Vec<f64> = x.windows(2).map(|w| w[1] - w[0]).collect();
        let slope: Vec<f64> = (0..n - 1).map(|i| (y[i + 1] - y[i]) / h[i]).collect();

        // Unknowns are M[1..=n-2]; M[0] and M[n-1] follow from the
        // not-a-knot rows and are substituted into the first and last rows.
        let size = n - 2;
        let mut sub = vec![0.0; size];
        let mut diag = vec![0.0; size];
        let mut sup = vec![0.0; size];
        let mut rhs = vec![0.0; size];

        for row in 0..size {
            let i = row + 1;
            sub[row] = h[i - 1];
            diag[row] = 2.0 * (h[i - 1] + h[i]);
            sup[row] = h[i];
            rhs[row] = 6.0 * (slope[i] - slope[i - 1]);
        }

        // M0 = ((h0 + h1) M1 - h0 M2) / h1
        diag[0] += h[0] * (h[0] + h[1]) / h[1];
        sup[0] -= h[0] * h[0] / h[1];

        // M[n-1] = ((h[n-3] + h[n-2]) M[n-2] - h[n-2] M[n-3]) / h[n-3]
        let (a, b) = (h[n - 3], h[n - 2]);
        diag[size - 1] += b * (a + b) / a;
        sub[size - 1] -= b * b / a;

        let inner = solve_tridiagonal(&sub, &diag, &sup, &rhs);

        let mut m = Vec::with_capacity(n);
        m.push(((h[0] + h[1]) * inner[0] - h[0] * inner[1]) / h[1]);
        m.extend_from_slice(&inner);
        m.push(((a + b) * inner[size - 1] - b * inner[size - 2]) / a);

        Ok(Self {
            x: x.to_vec(),
            y: y.to_vec(),
            m,
        })
    }

    pub fn domain(&self) -> (f64, f64) {
        (self.x[0], self.x[self.x.len() - 1])
    }

    /// Spline value at `t`. Points outside the knot range are an error.
    pub fn eval(&self, t: f64) -> Result<f64, StatsError> {
        let (lo, hi) = self.domain();
        if !(t >= lo && t <= hi) {
            return Err(StatsError::OutOfRange(t, lo, hi));
        }

        let seg = match self.x.partition_point(|&k| k <= t) {
            0 => 0,
            p => (p - 1).min(self.x.len() - 2),
        };
        let (x0, x1) = (self.x[seg], self.x[seg + 1]);
        let (y0, y1) = (self.y[seg], self.y[seg + 1]);
        let (m0, m1) = (self.m[seg], self.m[seg + 1]);
        let h = x1 - x0;
        let left = x1 - t;
        let right = t - x0;

        Ok(m0 * left.powi(3) / (6.0 * h)
            + m1 * right.powi(3) / (6.0 * h)
            + (y0 / h - m0 * h / 6.0) * left
            + (y1 / h - m1 * h / 6.0) * right)
    }

    pub fn eval_many(&self, ts: &[f64]) -> Result<Vec<f64>, StatsError> {
        ts.iter().map(|&t| self.eval(t)).collect()
    }
}

/// Thomas algorithm. `sub[0]` and `sup[n-1]` are ignored.
fn solve_tridiagonal(sub: &[f64], diag: &[f64], sup: &[f64], rhs: &[f64]) -> Vec<f64> {
    let n = diag.len();
    let mut c = vec![0.0; n];
    let mut d = vec![0.0; n];

    c[0] = sup[0] / diag[0];
    d[0] = rhs[0] / diag[0];
    for i in 1..n {
        let denom = diag[i] - sub[i] * c[i - 1];
        c[i] = if i + 1 < n { sup[i] / denom } else { 0.0 };
        d[i] = (rhs[i] - sub[i] * d[i - 1]) / denom;
    }

    let mut out = vec![0.0; n];
    out[n - 1] = d[n - 1];
    for i in (0..n - 1).rev() {
        out[i] = d[i] - c[i] * out[i + 1];
    }
    out
}
