//! Error types for the tandem-calendar crate.

use chrono::NaiveDate;

/// Error type for all fallible operations in the tandem-calendar crate.
///
/// Covers malformed holiday entries and split boundaries that would leave
/// either the training or the evaluation side empty.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CalendarError {
    /// Returned when a holiday has an empty name.
    #[error("holiday on {date} has an empty name")]
    EmptyHolidayName {
        /// Date of the unnamed holiday.
        date: NaiveDate,
    },

    /// Returned when a holiday window does not bracket the holiday date.
    #[error("invalid window for holiday '{name}': lower {lower} must be <= 0 and upper {upper} must be >= 0")]
    InvalidWindow {
        /// Holiday name.
        name: String,
        /// Lower offset in days.
        lower: i32,
        /// Upper offset in days.
        upper: i32,
    },

    /// Returned when shifting a date by an offset leaves the supported range.
    #[error("date {date} shifted by {offset} days is out of range")]
    DateOutOfRange {
        /// Base date.
        date: NaiveDate,
        /// Offset in days.
        offset: i64,
    },

    /// Returned when a split is requested over an empty date sequence.
    #[error("cannot split an empty date sequence")]
    EmptyDates,

    /// Returned when the cutoff leaves the training or evaluation side empty.
    #[error("cutoff {cutoff} must lie after {first} and no later than {last}")]
    InvalidSplit {
        /// Requested cutoff.
        cutoff: NaiveDate,
        /// First date of the sequence.
        first: NaiveDate,
        /// Last date of the sequence.
        last: NaiveDate,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn error_empty_holiday_name() {
        let err = CalendarError::EmptyHolidayName {
            date: date(2024, 1, 1),
        };
        assert_eq!(err.to_string(), "holiday on 2024-01-01 has an empty name");
    }

    #[test]
    fn error_invalid_window() {
        let err = CalendarError::InvalidWindow {
            name: "xmas".to_string(),
            lower: 1,
            upper: 0,
        };
        assert_eq!(
            err.to_string(),
            "invalid window for holiday 'xmas': lower 1 must be <= 0 and upper 0 must be >= 0"
        );
    }

    #[test]
    fn error_invalid_split() {
        let err = CalendarError::InvalidSplit {
            cutoff: date(2020, 1, 1),
            first: date(2021, 1, 1),
            last: date(2021, 12, 31),
        };
        assert_eq!(
            err.to_string(),
            "cutoff 2020-01-01 must lie after 2021-01-01 and no later than 2021-12-31"
        );
    }

    #[test]
    fn error_is_std_error() {
        fn assert_impl<T: std::error::Error>() {}
        assert_impl::<CalendarError>();
    }

    #[test]
    fn error_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<CalendarError>();
    }
}
