//! Backtest command: fit before the cutoff, score Stage 1 vs hybrid after it.

use anyhow::{Context, Result, anyhow};
use serde::Serialize;
use tracing::{info, info_span};

use tandem_evaluate::EvaluationSummary;
use tandem_hybrid::{Stage2Diagnostics, backtest};
use tandem_io::{read_series, write_forecast};

use crate::cli::BacktestArgs;
use crate::config::TandemConfig;
use crate::convert;

/// JSON report written next to the forecast file.
#[derive(Serialize)]
struct Report<'a> {
    evaluation: &'a EvaluationSummary,
    stage2: &'a Stage2Diagnostics,
}

/// Run the backtest pipeline.
pub fn run(args: BacktestArgs) -> Result<()> {
    let _cmd = info_span!("backtest").entered();
    let config = TandemConfig::load(&args.config)?;

    let input = args
        .input
        .or(config.io.input.clone())
        .ok_or_else(|| anyhow!("no input path: set [io].input in config or use --input"))?;
    let output = args
        .output
        .or(config.io.output.clone())
        .ok_or_else(|| anyhow!("no output path: set [io].output in config or use --output"))?;
    let summary_path = args
        .summary
        .or(config.io.summary.clone())
        .unwrap_or_else(|| output.with_extension("summary.json"));

    let reader_cfg = convert::build_reader_config(&config.io);
    let writer_cfg = convert::build_writer_config(&config.io)?;
    let boundary = convert::build_split_boundary(&config.split, args.cutoff)?;
    let calendar = convert::build_holiday_calendar(&config.holidays)?;
    let hybrid_cfg = convert::build_hybrid_config(&config, args.seed)?;

    info!(path = %input.display(), "reading observations");
    let series = read_series(&input, &reader_cfg)
        .with_context(|| format!("failed to read Parquet: {}", input.display()))?;

    let result = backtest(&series, &calendar, &boundary, &hybrid_cfg).context("backtest failed")?;
    info!(
        mae_stage1 = result.summary.mae_a,
        mae_hybrid = result.summary.mae_b,
        rmse_stage1 = result.summary.rmse_a,
        rmse_hybrid = result.summary.rmse_b,
        "backtest complete"
    );
    if result.summary.relative_improvement_rmse.is_none() {
        tracing::warn!("stage 1 RMSE is 0; relative improvement is undefined");
    }

    write_forecast(&output, &result.records, &writer_cfg)
        .with_context(|| format!("failed to write forecast: {}", output.display()))?;

    let report = Report {
        evaluation: &result.summary,
        stage2: &result.stage2,
    };
    let json = serde_json::to_string_pretty(&report).context("failed to serialize summary")?;
    std::fs::write(&summary_path, json)
        .with_context(|| format!("failed to write summary: {}", summary_path.display()))?;
    info!(path = %summary_path.display(), "summary written");

    Ok(())
}
