//! # tandem-series
//!
//! Validated containers for a single daily demand series: the feature
//! schema, the observation series, the target-free feature frame used for
//! out-of-sample prediction, and date-aligned value sequences.
//!
//! ```mermaid
//! graph LR
//!     A["Vec&lt;Observation&gt;"] -->|"Series::new(schema, obs)?"| B["Series"]
//!     B -->|".split(&boundary)?"| C["(train, eval)"]
//!     B -->|".frame()"| D["FeatureFrame"]
//!     D -->|".column(name)?"| E["&[f64]"]
//!     F["predictions"] -->|"DatedValues::new()?"| G["DatedValues"]
//!     G -->|".check_aligned(dates)?"| H["()"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tandem_series::{FeatureField, FeatureSchema, Observation, Series};
//!
//! let schema = FeatureSchema::new(vec![FeatureField::continuous("temp")])?;
//! let series = Series::new(schema, observations)?;
//! let (train, eval) = series.split(&boundary)?;
//! let temp = eval.frame().column("temp")?;
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `schema` | Feature fields, schema and single observations |
//! | `frame` | Column-wise feature storage |
//! | `series` | Targets plus frame, chronological split |
//! | `dated` | Date-aligned values and alignment checks |
//! | `error` | Error types |

mod dated;
mod error;
mod frame;
mod schema;
mod series;

pub use dated::{DatedValues, check_dates_aligned};
pub use error::SeriesError;
pub use frame::FeatureFrame;
pub use schema::{FeatureField, FeatureKind, FeatureSchema, Observation};
pub use series::Series;
