//! Chronological train/evaluation boundary.

use chrono::NaiveDate;

use crate::error::CalendarError;

/// A single cutoff date: everything strictly before it is training data,
/// everything at or after it is evaluation data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplitBoundary {
    cutoff: NaiveDate,
}

impl SplitBoundary {
    /// Creates a boundary at `cutoff`.
    pub fn new(cutoff: NaiveDate) -> Self {
        Self { cutoff }
    }

    /// Returns the cutoff date.
    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    /// Returns `true` if `date` belongs to the training side.
    pub fn is_training(&self, date: NaiveDate) -> bool {
        date < self.cutoff
    }

    /// Returns the index of the first evaluation date in sorted `dates`.
    ///
    /// `dates[..idx]` is the training side and `dates[idx..]` the evaluation
    /// side.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`CalendarError::EmptyDates`] | `dates` is empty |
    /// | [`CalendarError::InvalidSplit`] | either side would be empty |
    pub fn partition(&self, dates: &[NaiveDate]) -> Result<usize, CalendarError> {
        let (Some(&first), Some(&last)) = (dates.first(), dates.last()) else {
            return Err(CalendarError::EmptyDates);
        };
        let idx = dates.partition_point(|d| *d < self.cutoff);
        if idx == 0 || idx == dates.len() {
            return Err(CalendarError::InvalidSplit {
                cutoff: self.cutoff,
                first,
                last,
            });
        }
        Ok(idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn january() -> Vec<NaiveDate> {
        (1..=31).map(|d| date(2024, 1, d)).collect()
    }

    #[test]
    fn partition_mid_month() {
        let split = SplitBoundary::new(date(2024, 1, 11));
        assert_eq!(split.partition(&january()).unwrap(), 10);
        assert!(split.is_training(date(2024, 1, 10)));
        assert!(!split.is_training(date(2024, 1, 11)));
    }

    #[test]
    fn cutoff_on_last_date_keeps_one_eval_day() {
        let split = SplitBoundary::new(date(2024, 1, 31));
        assert_eq!(split.partition(&january()).unwrap(), 30);
    }

    #[test]
    fn cutoff_on_first_date_rejected() {
        let split = SplitBoundary::new(date(2024, 1, 1));
        let err = split.partition(&january()).unwrap_err();
        assert!(matches!(err, CalendarError::InvalidSplit { .. }));
    }

    #[test]
    fn cutoff_after_last_date_rejected() {
        let split = SplitBoundary::new(date(2024, 2, 1));
        assert!(matches!(
            split.partition(&january()),
            Err(CalendarError::InvalidSplit { .. })
        ));
    }

    #[test]
    fn cutoff_in_gap_between_dates() {
        let dates = vec![date(2024, 1, 1), date(2024, 1, 5), date(2024, 1, 9)];
        let split = SplitBoundary::new(date(2024, 1, 3));
        assert_eq!(split.partition(&dates).unwrap(), 1);
    }

    #[test]
    fn empty_dates_rejected() {
        let split = SplitBoundary::new(date(2024, 1, 1));
        assert_eq!(split.partition(&[]).unwrap_err(), CalendarError::EmptyDates);
    }
}
