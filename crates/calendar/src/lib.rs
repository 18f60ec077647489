//! # tandem-calendar
//!
//! Date arithmetic shared by both forecasting stages: the holiday calendar,
//! day helpers for seasonal features, and the chronological split boundary.
//!
//! ## Architecture
//!
//! ```mermaid
//! graph LR
//!     A["Holiday (name, date, window)"] -->|"HolidayCalendar::new()"| B["HolidayCalendar"]
//!     B -->|".effects_on(date)"| C["HolidayColumn list"]
//!     B -->|".columns()"| D["design columns"]
//!     E["cutoff date"] -->|"SplitBoundary::new()"| F["SplitBoundary"]
//!     F -->|".partition(&dates)?"| G["first evaluation index"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use chrono::NaiveDate;
//! use tandem_calendar::{Holiday, HolidayCalendar, SplitBoundary};
//!
//! let xmas = NaiveDate::from_ymd_opt(2023, 12, 25).unwrap();
//! let calendar = HolidayCalendar::new(vec![Holiday::new("christmas", xmas)])?;
//! assert!(calendar.is_holiday(xmas));
//!
//! let split = SplitBoundary::new(NaiveDate::from_ymd_opt(2024, 1, 1).unwrap());
//! let first_eval = split.partition(&dates)?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `day` | Epoch offsets, weekday and month helpers |
//! | `holiday` | Holiday entries and the validated calendar |
//! | `split` | Chronological train/evaluation boundary |
//! | `error` | Error types |

mod day;
mod error;
mod holiday;
mod split;

pub use day::{
    day_of_week, day_of_year_fraction, days_between, epoch_days, month_of_year, shift_days,
};
pub use error::CalendarError;
pub use holiday::{Holiday, HolidayCalendar, HolidayColumn};
pub use split::SplitBoundary;
