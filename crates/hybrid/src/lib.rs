//! # tandem-hybrid
//!
//! Two-stage daily demand forecaster. Stage 1 is an additive decomposition
//! model (trend, yearly and weekly cycles, holidays, linear regressors).
//! Stage 2 is a boosted tree ensemble trained on the Stage 1 in-sample
//! residuals. The hybrid forecast is their sum.
//!
//! ```mermaid
//! graph TD
//!     A["Series (train)"] --> B["DecompositionSpec::fit"]
//!     B --> C["predict_in_sample"]
//!     C --> D["extract_residuals"]
//!     A --> E["Stage2Features::build_matrix"]
//!     D --> F["tandem_boost::fit"]
//!     E --> F
//!     B --> G["HybridFit"]
//!     F --> G
//!     G -->|".forecast(&frame)?"| H["Vec&lt;ForecastRecord&gt;"]
//! ```
//!
//! ## Quick Start
//!
//! ```ignore
//! use tandem_hybrid::{HybridConfig, HybridForecaster, backtest};
//!
//! let fit = HybridForecaster::new(HybridConfig::new()).fit(&train, &calendar)?;
//! let records = fit.forecast(&future)?;
//!
//! let result = backtest(&series, &calendar, &boundary, &HybridConfig::new())?;
//! println!("{}", tandem_evaluate::to_json(&result.summary)?);
//! ```
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `residual` | Target minus Stage 1 prediction |
//! | `features` | Stage 2 feature matrix from regressors and dates |
//! | `combine` | Pointwise sum and clip policy |
//! | `forecaster` | Fit both stages, forecast |
//! | `backtest` | Chronological split and evaluation |

mod backtest;
mod combine;
mod config;
mod error;
mod features;
mod forecaster;
mod record;
mod residual;

pub use backtest::{Backtest, Stage2Diagnostics, backtest};
pub use combine::{ClipPolicy, combine, combine_series};
pub use config::HybridConfig;
pub use error::HybridError;
pub use features::{DAY_OF_WEEK, HOLIDAY_FLAG, MONTH, Stage2Features};
pub use forecaster::{HybridFit, HybridForecaster};
pub use record::ForecastRecord;
pub use residual::extract_residuals;
