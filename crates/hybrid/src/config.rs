//! Pipeline configuration.

use tandem_boost::{BoostConfig, EarlyStopping};
use tandem_decompose::DecompositionSpec;

use crate::combine::ClipPolicy;
use crate::error::HybridError;
use crate::features::Stage2Features;

/// Configuration for both stages and the combiner.
///
/// # Example
///
/// ```
/// use tandem_hybrid::{ClipPolicy, HybridConfig, Stage2Features};
/// use tandem_decompose::DecompositionSpec;
///
/// let config = HybridConfig::new()
///     .with_decomposition(DecompositionSpec::new().with_regressors(["temp"]))
///     .with_stage2_features(Stage2Features::new().with_regressors(["temp"]))
///     .with_clip(ClipPolicy::AtZero);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct HybridConfig {
    decomposition: DecompositionSpec,
    boost: BoostConfig,
    early_stopping: EarlyStopping,
    stage2_features: Stage2Features,
    clip: ClipPolicy,
}

impl HybridConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_decomposition(mut self, spec: DecompositionSpec) -> Self {
        self.decomposition = spec;
        self
    }

    pub fn with_boost(mut self, config: BoostConfig) -> Self {
        self.boost = config;
        self
    }

    pub fn with_early_stopping(mut self, early_stopping: EarlyStopping) -> Self {
        self.early_stopping = early_stopping;
        self
    }

    pub fn with_stage2_features(mut self, features: Stage2Features) -> Self {
        self.stage2_features = features;
        self
    }

    pub fn with_clip(mut self, clip: ClipPolicy) -> Self {
        self.clip = clip;
        self
    }

    pub fn decomposition(&self) -> &DecompositionSpec {
        &self.decomposition
    }

    pub fn boost(&self) -> &BoostConfig {
        &self.boost
    }

    pub fn early_stopping(&self) -> &EarlyStopping {
        &self.early_stopping
    }

    pub fn stage2_features(&self) -> &Stage2Features {
        &self.stage2_features
    }

    pub fn clip(&self) -> ClipPolicy {
        self.clip
    }

    /// Validates every part of the configuration.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`HybridError::Stage1`] | decomposition settings are invalid |
    /// | [`HybridError::Stage2`] | boosting or early-stopping settings are invalid |
    /// | [`HybridError::InvalidConfig`] | no Stage 2 features, or duplicate names |
    pub fn validate(&self) -> Result<(), HybridError> {
        self.decomposition.validate()?;
        self.boost.validate()?;
        self.early_stopping.validate()?;
        self.stage2_features.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let config = HybridConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.clip(), ClipPolicy::None);
    }

    #[test]
    fn test_invalid_boost_is_stage2() {
        let config = HybridConfig::new().with_boost(BoostConfig::new().with_learning_rate(0.0));
        assert!(matches!(config.validate(), Err(HybridError::Stage2(_))));
    }

    #[test]
    fn test_invalid_early_stopping_is_stage2() {
        let config = HybridConfig::new().with_early_stopping(EarlyStopping::new(1.0, 20));
        assert!(matches!(config.validate(), Err(HybridError::Stage2(_))));
    }

    #[test]
    fn test_invalid_decomposition_is_stage1() {
        let config = HybridConfig::new()
            .with_decomposition(DecompositionSpec::new().with_changepoint_range(1.5));
        assert!(matches!(config.validate(), Err(HybridError::Stage1(_))));
    }
}
