//! Numeric helpers shared by the tandem forecasting crates.

/// Arithmetic mean of a slice. Returns 0.0 if empty.
pub fn mean(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    let sum: f64 = data.iter().sum();
    sum / data.len() as f64
}

/// Sample variance with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn variance(data: &[f64]) -> f64 {
    let n = data.len();
    if n < 2 {
        return 0.0;
    }
    let nf = n as f64;
    let mean = data.iter().sum::<f64>() / nf;
    data.iter().map(|&x| (x - mean) * (x - mean)).sum::<f64>() / (nf - 1.0)
}

/// Sample standard deviation with N-1 denominator.
/// Returns 0.0 if fewer than 2 elements.
pub fn sd(data: &[f64]) -> f64 {
    variance(data).sqrt()
}

/// Largest absolute value. Returns 0.0 if empty.
pub fn max_abs(data: &[f64]) -> f64 {
    data.iter().fold(0.0_f64, |acc, &x| acc.max(x.abs()))
}

/// Mean of absolute values. Returns 0.0 if empty.
pub fn mean_abs(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    data.iter().map(|x| x.abs()).sum::<f64>() / data.len() as f64
}

/// Root mean square. Returns 0.0 if empty.
pub fn root_mean_square(data: &[f64]) -> f64 {
    if data.is_empty() {
        return 0.0;
    }
    (data.iter().map(|x| x * x).sum::<f64>() / data.len() as f64).sqrt()
}

/// Location and scale used to standardise a column.
///
/// A column with zero spread gets scale 1 so that it maps to zeros
/// instead of NaN.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Standardizer {
    /// Subtracted location.
    pub location: f64,
    /// Divisor.
    pub scale: f64,
}

impl Standardizer {
    /// Estimates location (mean) and scale (sample sd) from `data`.
    pub fn fit(data: &[f64]) -> Self {
        let scale = sd(data);
        Self {
            location: mean(data),
            scale: if scale > 1e-12 { scale } else { 1.0 },
        }
    }

    /// Identity transform, used for binary columns.
    pub fn identity() -> Self {
        Self {
            location: 0.0,
            scale: 1.0,
        }
    }

    /// Standardises a single value.
    pub fn apply(&self, x: f64) -> f64 {
        (x - self.location) / self.scale
    }
}
