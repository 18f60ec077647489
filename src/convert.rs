//! Pure conversion functions: TOML config structs -> crate API config types.

use anyhow::{Context, Result, bail};
use chrono::NaiveDate;

use crate::config::*;

use tandem_boost::{BoostConfig, EarlyStopping};
use tandem_calendar::{Holiday, HolidayCalendar, SplitBoundary};
use tandem_decompose::DecompositionSpec;
use tandem_hybrid::{ClipPolicy, HybridConfig, Stage2Features};
use tandem_io::{Compression, ReaderConfig, WriterConfig};

/// Parses a compression algorithm name string into the corresponding enum variant.
pub fn parse_compression(s: &str) -> Result<Compression> {
    match s.to_lowercase().as_str() {
        "none" => Ok(Compression::None),
        "snappy" => Ok(Compression::Snappy),
        "zstd" => Ok(Compression::Zstd),
        other => bail!("unknown compression: {other:?}"),
    }
}

/// Parses a clip policy name string into the corresponding enum variant.
pub fn parse_clip(s: &str) -> Result<ClipPolicy> {
    match s.to_lowercase().as_str() {
        "none" => Ok(ClipPolicy::None),
        "zero" | "at_zero" => Ok(ClipPolicy::AtZero),
        other => bail!("unknown clip policy: {other:?}"),
    }
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").with_context(|| format!("invalid date: {s:?}"))
}

/// Builds a [`ReaderConfig`] from the TOML I/O configuration.
pub fn build_reader_config(io: &IoConfig) -> ReaderConfig {
    let cfg = ReaderConfig::default()
        .with_date_column(&io.date_column)
        .with_target_column(&io.target_column);
    match &io.features {
        Some(names) => cfg.with_features(names),
        None => cfg,
    }
}

/// Builds a [`WriterConfig`] from the TOML I/O configuration.
pub fn build_writer_config(io: &IoConfig) -> Result<WriterConfig> {
    let compression = parse_compression(&io.compression)?;
    Ok(WriterConfig::default()
        .with_compression(compression)
        .with_row_group_size(io.row_group_size))
}

/// Builds the backtest [`SplitBoundary`]. `cutoff` overrides `[split].cutoff`.
pub fn build_split_boundary(split: &SplitToml, cutoff: Option<NaiveDate>) -> Result<SplitBoundary> {
    let cutoff = match (cutoff, &split.cutoff) {
        (Some(date), _) => date,
        (None, Some(s)) => parse_date(s)?,
        (None, None) => bail!("no cutoff: set [split].cutoff in config or use --cutoff"),
    };
    Ok(SplitBoundary::new(cutoff))
}

/// Builds the [`HolidayCalendar`] from `[[holidays]]` entries.
pub fn build_holiday_calendar(holidays: &[HolidayToml]) -> Result<HolidayCalendar> {
    let entries = holidays
        .iter()
        .map(|h| {
            let date = parse_date(&h.date).with_context(|| format!("holiday '{}'", h.name))?;
            Ok(Holiday::new(&h.name, date).with_window(h.lower_window, h.upper_window))
        })
        .collect::<Result<Vec<_>>>()?;
    HolidayCalendar::new(entries).context("invalid holiday calendar")
}

/// Builds a [`DecompositionSpec`] from the TOML decomposition configuration.
pub fn build_decomposition_spec(d: &DecompositionToml) -> DecompositionSpec {
    DecompositionSpec::new()
        .with_yearly(d.yearly)
        .with_weekly(d.weekly)
        .with_regressors(&d.regressors)
        .with_changepoints(d.n_changepoints)
        .with_changepoint_range(d.changepoint_range)
        .with_changepoint_prior_scale(d.changepoint_prior_scale)
        .with_seasonality_prior_scale(d.seasonality_prior_scale)
        .with_holiday_prior_scale(d.holiday_prior_scale)
        .with_regressor_prior_scale(d.regressor_prior_scale)
        .with_max_iters(d.max_iters)
}

/// Builds a [`BoostConfig`] from the TOML boost configuration.
///
/// An optional global seed is forwarded to the boosting RNG.
pub fn build_boost_config(boost: &BoostToml, seed: Option<u64>) -> BoostConfig {
    let cfg = BoostConfig::new()
        .with_n_trees(boost.n_trees)
        .with_learning_rate(boost.learning_rate)
        .with_max_depth(boost.max_depth)
        .with_row_subsample(boost.row_subsample)
        .with_col_subsample(boost.col_subsample)
        .with_min_samples_leaf(boost.min_samples_leaf)
        .with_l2_regularization(boost.l2_regularization);
    match seed {
        Some(s) => cfg.with_seed(s),
        None => cfg,
    }
}

/// Builds the Stage 2 feature selection.
pub fn build_stage2_features(stage2: &Stage2Toml) -> Stage2Features {
    Stage2Features::new()
        .with_regressors(&stage2.regressors)
        .with_day_of_week(stage2.day_of_week)
        .with_month(stage2.month)
        .with_holiday_flag(stage2.holiday_flag)
}

/// Builds the full [`HybridConfig`]. `seed` overrides the config seed.
pub fn build_hybrid_config(config: &TandemConfig, seed: Option<u64>) -> Result<HybridConfig> {
    let early = &config.early_stopping;
    let hybrid = HybridConfig::new()
        .with_decomposition(build_decomposition_spec(&config.decomposition))
        .with_boost(build_boost_config(&config.boost, seed.or(config.seed)))
        .with_early_stopping(EarlyStopping::new(early.validation_fraction, early.rounds))
        .with_stage2_features(build_stage2_features(&config.stage2))
        .with_clip(parse_clip(&config.clip)?);
    hybrid.validate().context("invalid model configuration")?;
    Ok(hybrid)
}
