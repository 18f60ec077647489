//! Day arithmetic helpers.

use chrono::{Datelike, NaiveDate, TimeDelta};

use crate::error::CalendarError;

/// `num_days_from_ce()` of 1970-01-01.
const UNIX_EPOCH_CE_DAYS: i64 = 719_163;

/// Days elapsed since 1970-01-01 (negative before the epoch).
///
/// Seasonal Fourier terms are evaluated on this absolute axis so that in-sample
/// and out-of-sample dates share the same phase.
pub fn epoch_days(date: NaiveDate) -> f64 {
    (i64::from(date.num_days_from_ce()) - UNIX_EPOCH_CE_DAYS) as f64
}

/// Signed number of days from `from` to `to`.
pub fn days_between(from: NaiveDate, to: NaiveDate) -> i64 {
    to.signed_duration_since(from).num_days()
}

/// Day of week with Monday = 0 through Sunday = 6.
pub fn day_of_week(date: NaiveDate) -> u32 {
    date.weekday().num_days_from_monday()
}

/// Month of year (1..=12).
pub fn month_of_year(date: NaiveDate) -> u32 {
    date.month()
}

/// Position within the calendar year in `[0, 1)`.
///
/// Day 1 maps to 0; leap years divide by 366.
pub fn day_of_year_fraction(date: NaiveDate) -> f64 {
    let days_in_year = NaiveDate::from_ymd_opt(date.year(), 12, 31).map_or(365, |d| d.ordinal());
    f64::from(date.ordinal0()) / f64::from(days_in_year)
}

/// Shifts `date` by `offset` days.
///
/// # Errors
///
/// Returns [`CalendarError::DateOutOfRange`] if the result is not representable.
pub fn shift_days(date: NaiveDate, offset: i64) -> Result<NaiveDate, CalendarError> {
    TimeDelta::try_days(offset)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or(CalendarError::DateOutOfRange { date, offset })
}
