//! Series standardization.
//!
//! `standardize` centers on the mean and scales by the population standard
//! deviation. `l_standardize` uses the first two sample L-moments instead,
//! which are far less sensitive to the occasional flood peak than ordinary
//! moments.

use serde::Serialize;

use crate::model::StatsError;

/// First two sample L-moments.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LMoments {
    /// λ1, equal to the sample mean.
    pub location: f64,
    /// λ2, half the mean absolute difference between pairs of observations.
    pub scale: f64,
}

/// `(x - mean) / std` with the population standard deviation.
pub fn standardize(values: &[f64]) -> Result<Vec<f64>, StatsError> {
    check_finite(values)?;
    if values.is_empty() {
        return Err(StatsError::Empty);
    }

    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    let std = variance.sqrt();

    scale_series(values, mean, std)
}

/// Unbiased sample L-moments λ1 and λ2 from probability-weighted moments.
///
/// Needs at least two values.
pub fn l_moments(values: &[f64]) -> Result<LMoments, StatsError> {
    check_finite(values)?;
    match values.len() {
        0 => return Err(StatsError::Empty),
        1 => return Err(StatsError::TooFewValues { needed: 2, got: 1 }),
        _ => {}
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let b0 = sorted.iter().sum::<f64>() / n;
    let b1 = sorted
        .iter()
        .enumerate()
        .map(|(j, x)| j as f64 / (n - 1.0) * x)
        .sum::<f64>()
        / n;

    Ok(LMoments {
        location: b0,
        scale: 2.0 * b1 - b0,
    })
}

/// `(x - λ1) / λ2`.
pub fn l_standardize(values: &[f64]) -> Result<Vec<f64>, StatsError> {
    let moments = l_moments(values)?;
    scale_series(values, moments.location, moments.scale)
}

fn check_finite(values: &[f64]) -> Result<(), StatsError> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(StatsError::NonFinite(i)),
        None => Ok(()),
    }
}

/// A flat series is rejected outright: rounding in the mean can leave a
/// tiny nonzero spread that would otherwise scale noise up to ±1.
fn scale_series(values: &[f64], center: f64, spread: f64) -> Result<Vec<f64>, StatsError> {
    let is_flat = values.iter().all(|v| *v == values[0]);
    if is_flat || spread <= 0.0 {
        return Err(StatsError::ZeroSpread);
    }
    Ok(values.iter().map(|v| (v - center) / spread).collect())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_standardize_uses_population_std() {
        // mean 5, population std 2
        let z = standardize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert_relative_eq!(z[0], -1.5);
        assert_relative_eq!(z[4], 0.0);
        assert_relative_eq!(z[7], 2.0);
    }

    #[test]
    fn test_standardized_series_has_zero_mean() {
        let z = standardize(&[120.0, 340.0, 95.0, 2100.0, 410.0]).unwrap();
        let mean = z.iter().sum::<f64>() / z.len() as f64;
        assert_relative_eq!(mean, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_l_moments_of_small_sample() {
        // λ2 is half the mean pairwise difference: (1+2+3+1+2+1)/6/2 = 5/6.
        let m = l_moments(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_relative_eq!(m.location, 2.5);
        assert_relative_eq!(m.scale, 5.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn test_l_standardize_centers_on_mean() {
        let z = l_standardize(&[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_relative_eq!(z[0], -1.8, epsilon = 1e-12);
        assert_relative_eq!(z[3], 1.8, epsilon = 1e-12);
    }

    #[test]
    fn test_l_scale_is_less_sensitive_to_outliers() {
        let base = [10.0, 11.0, 12.0, 13.0, 14.0];
        let flood = [10.0, 11.0, 12.0, 13.0, 140.0];
        let std = |v: &[f64]| {
            let n = v.len() as f64;
            let m = v.iter().sum::<f64>() / n;
            (v.iter().map(|x| (x - m).powi(2)).sum::<f64>() / n).sqrt()
        };
        let l_ratio = l_moments(&flood).unwrap().scale / l_moments(&base).unwrap().scale;
        let std_ratio = std(&flood) / std(&base);
        assert!(l_ratio < std_ratio, "L-scale ratio {l_ratio} should be below std ratio {std_ratio}");
    }

    #[test]
    fn test_empty_series_is_an_error() {
        assert_eq!(standardize(&[]), Err(StatsError::Empty));
        assert_eq!(l_standardize(&[]).unwrap_err(), StatsError::Empty);
    }

    #[test]
    fn test_single_value_is_too_few_for_l_moments() {
        assert_eq!(
            l_moments(&[3.0]).unwrap_err(),
            StatsError::TooFewValues { needed: 2, got: 1 }
        );
    }

    #[test]
    fn test_constant_series_has_zero_spread() {
        assert_eq!(standardize(&[5.0, 5.0, 5.0]), Err(StatsError::ZeroSpread));
        assert_eq!(l_standardize(&[5.0, 5.0]), Err(StatsError::ZeroSpread));
    }

    #[test]
    fn test_inexact_constant_series_has_zero_spread_at_any_length() {
        // 0.1 and 123.456 have no exact binary form, so the computed mean
        // drifts from the values and the raw spread comes out near 1e-17.
        for len in 2..=12 {
            for value in [0.1, 2.7, 123.456] {
                let series = vec![value; len];
                assert_eq!(
                    standardize(&series),
                    Err(StatsError::ZeroSpread),
                    "standardize of {len} x {value}"
                );
                assert_eq!(
                    l_standardize(&series),
                    Err(StatsError::ZeroSpread),
                    "l_standardize of {len} x {value}"
                );
            }
        }
    }

    #[test]
    fn test_nearly_flat_series_still_standardizes() {
        let z = standardize(&[0.1, 0.1, 0.1, 0.1 + 1e-9]).unwrap();
        assert!(z[3] > 0.0 && z[0] < 0.0);
    }

    #[test]
    fn test_nan_is_reported_by_index() {
        assert_eq!(
            standardize(&[1.0, f64::NAN, 3.0]),
            Err(StatsError::NonFinite(1))
        );
    }
}
