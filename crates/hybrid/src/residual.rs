//! Residual extraction.

use tandem_series::{DatedValues, Series};

use crate::error::HybridError;

/// Returns `target - prediction` for every date of `series`.
///
/// # Errors
///
/// Returns [`HybridError::Alignment`] if `predictions` does not have exactly
/// the dates of `series`.
pub fn extract_residuals(
    series: &Series,
    predictions: &DatedValues,
) -> Result<DatedValues, HybridError> {
    predictions
        .check_aligned(series.dates())
        .map_err(HybridError::Alignment)?;
    let residuals = series
        .targets()
        .iter()
        .zip(predictions.values())
        .map(|(y, p)| y - p)
        .collect();
    Ok(DatedValues::new(series.dates().to_vec(), residuals)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tandem_series::{FeatureSchema, Observation};

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn series() -> Series {
        let obs = vec![
            Observation::new(date(1), 10.0, vec![]),
            Observation::new(date(2), 12.0, vec![]),
            Observation::new(date(3), 9.0, vec![]),
        ];
        Series::new(FeatureSchema::empty(), obs).unwrap()
    }

    #[test]
    fn test_residuals() {
        let pred =
            DatedValues::new(vec![date(1), date(2), date(3)], vec![11.0, 12.0, 7.5]).unwrap();
        let r = extract_residuals(&series(), &pred).unwrap();
        assert_eq!(r.values(), &[-1.0, 0.0, 1.5]);
        assert_eq!(r.dates(), series().dates());
    }

    #[test]
    fn test_misaligned() {
        let pred = DatedValues::new(vec![date(1), date(2), date(4)], vec![1.0, 2.0, 3.0]).unwrap();
        assert!(matches!(
            extract_residuals(&series(), &pred),
            Err(HybridError::Alignment(_))
        ));
        let short = DatedValues::new(vec![date(1), date(2)], vec![1.0, 2.0]).unwrap();
        assert!(matches!(
            extract_residuals(&series(), &short),
            Err(HybridError::Alignment(_))
        ));
    }
}
