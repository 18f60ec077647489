//! Stage 1 + Stage 2 combination.

use tandem_series::DatedValues;

use crate::error::HybridError;

/// What to do with negative hybrid forecasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ClipPolicy {
    /// Leave forecasts as computed.
    #[default]
    None,
    /// Replace negative forecasts with 0.
    AtZero,
}

impl ClipPolicy {
    /// Applies the policy to one value.
    pub fn apply(self, value: f64) -> f64 {
        match self {
            ClipPolicy::None => value,
            ClipPolicy::AtZero => value.max(0.0),
        }
    }
}

/// Hybrid forecast for one date.
#[inline]
pub fn combine(stage1: f64, stage2: f64) -> f64 {
    stage1 + stage2
}

/// Combines two date-aligned forecasts pointwise and applies `clip`.
///
/// # Errors
///
/// Returns [`HybridError::Alignment`] if the dates differ.
pub fn combine_series(
    stage1: &DatedValues,
    stage2: &DatedValues,
    clip: ClipPolicy,
) -> Result<DatedValues, HybridError> {
    stage2
        .check_aligned(stage1.dates())
        .map_err(HybridError::Alignment)?;
    let values = stage1
        .values()
        .iter()
        .zip(stage2.values())
        .map(|(&a, &b)| clip.apply(combine(a, b)))
        .collect();
    Ok(DatedValues::new(stage1.dates().to_vec(), values)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn dv(days: &[u32], values: &[f64]) -> DatedValues {
        let dates = days
            .iter()
            .map(|&d| NaiveDate::from_ymd_opt(2024, 6, d).unwrap())
            .collect();
        DatedValues::new(dates, values.to_vec()).unwrap()
    }

    #[test]
    fn test_combine_commutes() {
        for (a, b) in [(1.5, -0.25), (0.0, 3.0), (-7.0, -2.0), (1e6, 1e-6)] {
            assert_eq!(combine(a, b), combine(b, a));
            assert_eq!(combine(a, b), a + b);
        }
    }

    #[test]
    fn test_combine_series_no_clip() {
        let s1 = dv(&[1, 2, 3], &[10.0, 1.0, 5.0]);
        let s2 = dv(&[1, 2, 3], &[-2.0, -3.0, 0.5]);
        let out = combine_series(&s1, &s2, ClipPolicy::None).unwrap();
        assert_eq!(out.values(), &[8.0, -2.0, 5.5]);
        assert_eq!(out.dates(), s1.dates());
    }

    #[test]
    fn test_combine_series_clip_at_zero() {
        let s1 = dv(&[1, 2], &[1.0, 4.0]);
        let s2 = dv(&[1, 2], &[-3.0, 1.0]);
        let out = combine_series(&s1, &s2, ClipPolicy::AtZero).unwrap();
        assert_eq!(out.values(), &[0.0, 5.0]);
    }

    #[test]
    fn test_combine_series_misaligned() {
        let s1 = dv(&[1, 2], &[1.0, 4.0]);
        let s2 = dv(&[1, 3], &[1.0, 4.0]);
        assert!(matches!(
            combine_series(&s1, &s2, ClipPolicy::None),
            Err(HybridError::Alignment(_))
        ));
    }

    #[test]
    fn test_default_policy() {
        assert_eq!(ClipPolicy::default(), ClipPolicy::None);
        assert_eq!(ClipPolicy::None.apply(-1.0), -1.0);
    }
}
