//! Holiday entries and the validated holiday calendar.

use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use crate::day::shift_days;
use crate::error::CalendarError;

/// A single named holiday with an optional window of influence.
///
/// The window is expressed as day offsets around `date`: `lower_window <= 0`
/// extends the effect to earlier days, `upper_window >= 0` to later days.
/// The default window `0/0` affects the holiday date only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Holiday {
    name: String,
    date: NaiveDate,
    lower_window: i32,
    upper_window: i32,
}

impl Holiday {
    /// Creates an exact-day holiday.
    pub fn new(name: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            name: name.into(),
            date,
            lower_window: 0,
            upper_window: 0,
        }
    }

    /// Sets the window of influence in days.
    pub fn with_window(mut self, lower: i32, upper: i32) -> Self {
        self.lower_window = lower;
        self.upper_window = upper;
        self
    }

    /// Returns the holiday name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the holiday date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the lower window offset.
    pub fn lower_window(&self) -> i32 {
        self.lower_window
    }

    /// Returns the upper window offset.
    pub fn upper_window(&self) -> i32 {
        self.upper_window
    }
}

/// One holiday effect: a holiday name and the signed offset from the holiday
/// date. Stage 1 estimates one coefficient per distinct column.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HolidayColumn {
    /// Holiday name.
    pub name: String,
    /// Offset in days from the holiday date (0 = the holiday itself).
    pub offset: i32,
}

impl std::fmt::Display for HolidayColumn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.offset {
            0 => write!(f, "{}", self.name),
            o if o > 0 => write!(f, "{}_+{o}", self.name),
            o => write!(f, "{}_{o}", self.name),
        }
    }
}

/// Immutable mapping from date to the holiday effects active on that date.
#[derive(Debug, Clone, Default)]
pub struct HolidayCalendar {
    holidays: Vec<Holiday>,
    by_date: BTreeMap<NaiveDate, Vec<HolidayColumn>>,
}

impl HolidayCalendar {
    /// Builds a calendar from holiday entries.
    ///
    /// Identical entries are collapsed. Each active `(name, offset)` pair is
    /// recorded once per affected date.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`CalendarError::EmptyHolidayName`] | a holiday name is empty or whitespace |
    /// | [`CalendarError::InvalidWindow`] | `lower_window > 0` or `upper_window < 0` |
    /// | [`CalendarError::DateOutOfRange`] | a window extends past the representable dates |
    pub fn new(holidays: Vec<Holiday>) -> Result<Self, CalendarError> {
        let mut unique: Vec<Holiday> = Vec::with_capacity(holidays.len());
        for h in holidays {
            if h.name.trim().is_empty() {
                return Err(CalendarError::EmptyHolidayName { date: h.date });
            }
            if h.lower_window > 0 || h.upper_window < 0 {
                return Err(CalendarError::InvalidWindow {
                    name: h.name,
                    lower: h.lower_window,
                    upper: h.upper_window,
                });
            }
            if !unique.contains(&h) {
                unique.push(h);
            }
        }

        let mut by_date: BTreeMap<NaiveDate, Vec<HolidayColumn>> = BTreeMap::new();
        for h in &unique {
            for offset in h.lower_window..=h.upper_window {
                let day = shift_days(h.date, i64::from(offset))?;
                let column = HolidayColumn {
                    name: h.name.clone(),
                    offset,
                };
                let entry = by_date.entry(day).or_default();
                if !entry.contains(&column) {
                    entry.push(column);
                }
            }
        }
        for columns in by_date.values_mut() {
            columns.sort();
        }

        Ok(Self {
            holidays: unique,
            by_date,
        })
    }

    /// Returns an empty calendar.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the deduplicated holiday entries.
    pub fn holidays(&self) -> &[Holiday] {
        &self.holidays
    }

    /// Returns the number of holiday entries.
    pub fn len(&self) -> usize {
        self.holidays.len()
    }

    /// Returns `true` if the calendar has no holidays.
    pub fn is_empty(&self) -> bool {
        self.holidays.is_empty()
    }

    /// Returns the holiday effects active on `date` (empty when none).
    pub fn effects_on(&self, date: NaiveDate) -> &[HolidayColumn] {
        self.by_date.get(&date).map_or(&[], Vec::as_slice)
    }

    /// Returns `true` if any holiday window covers `date`.
    pub fn is_holiday(&self, date: NaiveDate) -> bool {
        self.by_date.contains_key(&date)
    }

    /// Returns every distinct `(name, offset)` column, sorted.
    pub fn columns(&self) -> Vec<HolidayColumn> {
        let set: BTreeSet<&HolidayColumn> = self.by_date.values().flatten().collect();
        set.into_iter().cloned().collect()
    }
}
