//! # tandem-evaluate
//!
//! Accuracy of a baseline and a candidate point forecast against the same
//! actuals: MAE, RMSE and the relative improvement of the candidate.
//!
//! ```mermaid
//! graph LR
//!     A["actual: DatedValues"] --> E["evaluate(&actual, &a, &b)?"]
//!     B["forecast A (stage 1)"] --> E
//!     C["forecast B (hybrid)"] --> E
//!     E --> S["EvaluationSummary"]
//!     S -->|"to_json(&summary)?"| J["String"]
//! ```
//!
//! | Function | Result |
//! |----------|--------|
//! | [`mae`] | mean absolute error |
//! | [`rmse`] | root mean squared error |
//! | [`relative_improvement`] | `(baseline - candidate) / baseline` |

mod error;
mod metrics;
mod summary;

pub use error::EvaluateError;
pub use metrics::{mae, relative_improvement, rmse};
pub use summary::{EvaluationSummary, evaluate, to_json};
