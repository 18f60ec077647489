//! # tandem-io
//!
//! Read observation series and future feature frames from Parquet and write
//! forecast records back to Parquet. Bridges files into the validated
//! [`Series`](tandem_series::Series) and
//! [`FeatureFrame`](tandem_series::FeatureFrame) types.
//!
//! | File | Columns |
//! |------|---------|
//! | observations | `date` Date32, `target` Float64, features Float64 / Boolean |
//! | future frame | `date` Date32, features |
//! | forecast | `date` Date32, `stage1`, `stage2`, `hybrid` Float64, `actual` Float64 (nullable) |

mod error;
mod parquet_read;
mod parquet_write;
mod reader;
mod writer;

pub use error::IoError;
pub use reader::{ReaderConfig, read_frame, read_series};
pub use writer::{Compression, WriterConfig, write_forecast, write_series};
