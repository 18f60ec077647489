//! # tandem-boost
//!
//! Stage 2 of the hybrid forecaster: gradient-boosted regression trees on
//! squared error, trained on a seeded random fit/holdout split with early
//! stopping on holdout RMSE.
//!
//! ```mermaid
//! graph LR
//!     A["FeatureMatrix::new(names, data)?"] --> B["fit(&matrix, &target, &early, &config)?"]
//!     C["BoostConfig / EarlyStopping"] --> B
//!     B --> D["BoostFit"]
//!     D -->|".predict(&matrix)?"| E["Vec&lt;f64&gt;"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tandem_boost::{BoostConfig, EarlyStopping, FeatureMatrix, fit};
//!
//! let matrix = FeatureMatrix::from_rows(names, &rows)?;
//! let model = fit(&matrix, &residuals, &EarlyStopping::default(), &BoostConfig::new())?;
//! assert!(model.rounds_used() <= 500);
//! let correction = model.predict(&future_matrix)?;
//! ```
//!
//! ## Determinism
//!
//! The holdout split, row and column subsamples all come from one
//! `StdRng` seeded with [`BoostConfig::seed`]. Split search runs over
//! features in parallel (rayon) and reduces in feature order, so a fixed
//! seed reproduces the same ensemble.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `config` | Hyperparameters and early-stopping settings |
//! | `matrix` | Named, validated feature matrix |
//! | `trainer` | Boosting loop |
//! | `model` | Fitted ensemble |
//! | `error` | Error types |

mod config;
mod error;
mod matrix;
mod model;
mod trainer;

pub(crate) mod tree;

pub use config::{BoostConfig, EarlyStopping};
pub use error::BoostError;
pub use matrix::FeatureMatrix;
pub use model::BoostFit;
pub use trainer::fit;
