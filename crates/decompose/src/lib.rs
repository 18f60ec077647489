//! # tandem-decompose
//!
//! Stage 1 of the hybrid forecaster: an additive decomposition of a daily
//! series into a piecewise-linear trend, yearly and weekly Fourier cycles,
//! holiday effects and linear regressor terms, estimated by maximum a
//! posteriori.
//!
//! ## Typestate Workflow
//!
//! ```mermaid
//! graph LR
//!     A["DecompositionSpec::new()"] -->|".fit(&train, &calendar)?"| B["DecompositionFit"]
//!     B --> C[".predict_in_sample(&train)? : in-sample fit"]
//!     B --> D[".predict(&frame)? : out-of-sample"]
//!     B --> E[".components(&frame)? : additive breakdown"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tandem_decompose::DecompositionSpec;
//!
//! let fit = DecompositionSpec::new()
//!     .with_regressors(["temperature"])
//!     .fit(&train, &calendar)?;
//! let in_sample = fit.predict_in_sample(&train)?;
//! let future = fit.predict(eval.frame())?;
//! ```
//!
//! ## Model
//!
//! | Term | Columns | Prior |
//! |------|---------|-------|
//! | intercept, growth rate | 2 | Gaussian, scale 5 |
//! | changepoint adjustments | up to `n_changepoints` | Laplace, `changepoint_prior_scale` |
//! | yearly cycle (period 365.25, order 10) | 20 | Gaussian, `seasonality_prior_scale` |
//! | weekly cycle (period 7, order 3) | 6 | Gaussian, `seasonality_prior_scale` |
//! | holiday `(name, offset)` seen in training | 1 each | Gaussian, `holiday_prior_scale` |
//! | regressors (continuous standardised, binary as 0/1) | 1 each | Gaussian, `regressor_prior_scale` |
//!
//! The target is divided by its largest absolute training value before
//! fitting; predictions are returned in target units.

mod error;
mod fit;
mod spec;

pub(crate) mod design;
pub(crate) mod linalg;
pub(crate) mod optimizer;

pub use error::DecomposeError;
pub use fit::{Components, DecompositionFit};
pub use spec::DecompositionSpec;
