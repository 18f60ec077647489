//! Forecast command: fit on the full history and forecast a future frame.

use anyhow::{Context, Result, anyhow};
use tracing::{info, info_span};

use tandem_hybrid::HybridForecaster;
use tandem_io::{read_frame, read_series, write_forecast};

use crate::cli::ForecastArgs;
use crate::config::TandemConfig;
use crate::convert;

/// Run the forecasting pipeline.
pub fn run(args: ForecastArgs) -> Result<()> {
    let _cmd = info_span!("forecast").entered();
    let config = TandemConfig::load(&args.config)?;

    let input = args
        .input
        .or(config.io.input.clone())
        .ok_or_else(|| anyhow!("no input path: set [io].input in config or use --input"))?;
    let future = args
        .future
        .or(config.io.future.clone())
        .ok_or_else(|| anyhow!("no future frame: set [io].future in config or use --future"))?;
    let output = args
        .output
        .or(config.io.output.clone())
        .ok_or_else(|| anyhow!("no output path: set [io].output in config or use --output"))?;

    let reader_cfg = convert::build_reader_config(&config.io);
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let calendar = convert::build_holiday_calendar(&config.holidays)?;
    let hybrid_cfg = convert::build_hybrid_config(&config, args.seed)?;

    info!(path = %input.display(), "reading observations");
    let history = read_series(&input, &reader_cfg)
        .with_context(|| format!("failed to read Parquet: {}", input.display()))?;
    info!(path = %future.display(), "reading future frame");
    let frame = read_frame(&future, &reader_cfg)
        .with_context(|| format!("failed to read Parquet: {}", future.display()))?;

    let fit = HybridForecaster::new(hybrid_cfg)
        .fit(&history, &calendar)
        .context("fitting failed")?;
    let records = fit.forecast(&frame).context("forecasting failed")?;
    info!(n = records.len(), "forecast complete");

    write_forecast(&output, &records, &writer_cfg)
        .with_context(|| format!("failed to write forecast: {}", output.display()))?;
    Ok(())
}
