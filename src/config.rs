use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Top-level Tandem configuration.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TandemConfig {
    /// Global RNG seed for Stage 2.
    #[serde(default)]
    pub seed: Option<u64>,

    /// Clip policy for hybrid forecasts: "none" or "zero".
    #[serde(default = "default_clip")]
    pub clip: String,

    /// I/O settings.
    #[serde(default)]
    pub io: IoConfig,

    /// Backtest split.
    #[serde(default)]
    pub split: SplitToml,

    /// Stage 1 settings.
    #[serde(default)]
    pub decomposition: DecompositionToml,

    /// Stage 2 settings.
    #[serde(default)]
    pub boost: BoostToml,

    /// Stage 2 early stopping.
    #[serde(default)]
    pub early_stopping: EarlyStoppingToml,

    /// Stage 2 features.
    #[serde(default)]
    pub stage2: Stage2Toml,

    /// Holiday calendar entries.
    #[serde(default)]
    pub holidays: Vec<HolidayToml>,
}

impl TandemConfig {
    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        let toml_str = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        toml::from_str(&toml_str).context("failed to parse TOML config")
    }
}

impl Default for TandemConfig {
    fn default() -> Self {
        Self {
            seed: None,
            clip: default_clip(),
            io: IoConfig::default(),
            split: SplitToml::default(),
            decomposition: DecompositionToml::default(),
            boost: BoostToml::default(),
            early_stopping: EarlyStoppingToml::default(),
            stage2: Stage2Toml::default(),
            holidays: Vec::new(),
        }
    }
}

fn default_clip() -> String {
    "none".to_string()
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IoConfig {
    pub input: Option<PathBuf>,
    pub future: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub summary: Option<PathBuf>,
    #[serde(default = "default_date_column")]
    pub date_column: String,
    #[serde(default = "default_target_column")]
    pub target_column: String,
    /// Feature columns to read; all remaining columns when absent.
    #[serde(default)]
    pub features: Option<Vec<String>>,
    #[serde(default = "default_compression")]
    pub compression: String,
    #[serde(default = "default_row_group_size")]
    pub row_group_size: usize,
}

impl Default for IoConfig {
    fn default() -> Self {
        Self {
            input: None,
            future: None,
            output: None,
            summary: None,
            date_column: default_date_column(),
            target_column: default_target_column(),
            features: None,
            compression: default_compression(),
            row_group_size: default_row_group_size(),
        }
    }
}

fn default_date_column() -> String {
    "date".to_string()
}
fn default_target_column() -> String {
    "target".to_string()
}
fn default_compression() -> String {
    "snappy".to_string()
}
fn default_row_group_size() -> usize {
    1_000_000
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct SplitToml {
    /// First evaluation date, "YYYY-MM-DD".
    pub cutoff: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DecompositionToml {
    #[serde(default = "default_true")]
    pub yearly: bool,
    #[serde(default = "default_true")]
    pub weekly: bool,
    #[serde(default)]
    pub regressors: Vec<String>,
    #[serde(default = "default_n_changepoints")]
    pub n_changepoints: usize,
    #[serde(default = "default_changepoint_range")]
    pub changepoint_range: f64,
    #[serde(default = "default_changepoint_prior_scale")]
    pub changepoint_prior_scale: f64,
    #[serde(default = "default_prior_scale")]
    pub seasonality_prior_scale: f64,
    #[serde(default = "default_prior_scale")]
    pub holiday_prior_scale: f64,
    #[serde(default = "default_prior_scale")]
    pub regressor_prior_scale: f64,
    #[serde(default = "default_max_iters")]
    pub max_iters: u64,
}

impl Default for DecompositionToml {
    fn default() -> Self {
        Self {
            yearly: true,
            weekly: true,
            regressors: Vec::new(),
            n_changepoints: default_n_changepoints(),
            changepoint_range: default_changepoint_range(),
            changepoint_prior_scale: default_changepoint_prior_scale(),
            seasonality_prior_scale: default_prior_scale(),
            holiday_prior_scale: default_prior_scale(),
            regressor_prior_scale: default_prior_scale(),
            max_iters: default_max_iters(),
        }
    }
}

fn default_true() -> bool {
    true
}
fn default_n_changepoints() -> usize {
    25
}
fn default_changepoint_range() -> f64 {
    0.8
}
fn default_changepoint_prior_scale() -> f64 {
    0.05
}
fn default_prior_scale() -> f64 {
    10.0
}
fn default_max_iters() -> u64 {
    200
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoostToml {
    #[serde(default = "default_n_trees")]
    pub n_trees: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_subsample")]
    pub row_subsample: f64,
    #[serde(default = "default_subsample")]
    pub col_subsample: f64,
    #[serde(default = "default_min_samples_leaf")]
    pub min_samples_leaf: usize,
    #[serde(default = "default_l2")]
    pub l2_regularization: f64,
}

impl Default for BoostToml {
    fn default() -> Self {
        Self {
            n_trees: default_n_trees(),
            learning_rate: default_learning_rate(),
            max_depth: default_max_depth(),
            row_subsample: default_subsample(),
            col_subsample: default_subsample(),
            min_samples_leaf: default_min_samples_leaf(),
            l2_regularization: default_l2(),
        }
    }
}

fn default_n_trees() -> usize {
    500
}
fn default_learning_rate() -> f64 {
    0.05
}
fn default_max_depth() -> usize {
    4
}
fn default_subsample() -> f64 {
    0.8
}
fn default_min_samples_leaf() -> usize {
    5
}
fn default_l2() -> f64 {
    1.0
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EarlyStoppingToml {
    #[serde(default = "default_validation_fraction")]
    pub validation_fraction: f64,
    #[serde(default = "default_rounds")]
    pub rounds: usize,
}

impl Default for EarlyStoppingToml {
    fn default() -> Self {
        Self {
            validation_fraction: default_validation_fraction(),
            rounds: default_rounds(),
        }
    }
}

fn default_validation_fraction() -> f64 {
    0.2
}
fn default_rounds() -> usize {
    20
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Stage2Toml {
    #[serde(default)]
    pub regressors: Vec<String>,
    #[serde(default = "default_true")]
    pub day_of_week: bool,
    #[serde(default = "default_true")]
    pub month: bool,
    #[serde(default = "default_true")]
    pub holiday_flag: bool,
}

impl Default for Stage2Toml {
    fn default() -> Self {
        Self {
            regressors: Vec::new(),
            day_of_week: true,
            month: true,
            holiday_flag: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HolidayToml {
    pub name: String,
    /// "YYYY-MM-DD".
    pub date: String,
    #[serde(default)]
    pub lower_window: i32,
    #[serde(default)]
    pub upper_window: i32,
}
