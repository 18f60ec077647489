//! Feature schema and single observations.

use chrono::NaiveDate;

use crate::error::SeriesError;

/// How a feature column is interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureKind {
    /// Real-valued covariate.
    Continuous,
    /// Indicator taking only the values 0 and 1.
    Binary,
}

/// A named feature column.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FeatureField {
    name: String,
    kind: FeatureKind,
}

impl FeatureField {
    /// Creates a field.
    pub fn new(name: impl Into<String>, kind: FeatureKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }

    /// Shorthand for a continuous field.
    pub fn continuous(name: impl Into<String>) -> Self {
        Self::new(name, FeatureKind::Continuous)
    }

    /// Shorthand for a binary field.
    pub fn binary(name: impl Into<String>) -> Self {
        Self::new(name, FeatureKind::Binary)
    }

    /// Returns the field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the field kind.
    pub fn kind(&self) -> FeatureKind {
        self.kind
    }
}

/// Ordered list of feature fields with unique, non-empty names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeatureSchema {
    fields: Vec<FeatureField>,
}

impl FeatureSchema {
    /// Creates a schema.
    ///
    /// # Errors
    ///
    /// | Variant | Trigger |
    /// |---------|---------|
    /// | [`SeriesError::EmptyFeatureName`] | a name is empty or whitespace |
    /// | [`SeriesError::DuplicateFeature`] | a name appears twice |
    pub fn new(fields: Vec<FeatureField>) -> Result<Self, SeriesError> {
        for (index, field) in fields.iter().enumerate() {
            if field.name.trim().is_empty() {
                return Err(SeriesError::EmptyFeatureName { index });
            }
            if fields[..index].iter().any(|f| f.name == field.name) {
                return Err(SeriesError::DuplicateFeature {
                    name: field.name.clone(),
                });
            }
        }
        Ok(Self { fields })
    }

    /// Schema without any features.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns the fields in column order.
    pub fn fields(&self) -> &[FeatureField] {
        &self.fields
    }

    /// Returns the field names in column order.
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }

    /// Returns the column position of `name`.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// Returns the field called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`SeriesError::MissingFeature`] if no such field exists.
    pub fn field(&self, name: &str) -> Result<&FeatureField, SeriesError> {
        self.fields
            .iter()
            .find(|f| f.name == name)
            .ok_or_else(|| SeriesError::MissingFeature {
                name: name.to_string(),
            })
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the schema has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One dated row: target plus one value per schema field.
///
/// Binary features are carried as `0.0` / `1.0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    date: NaiveDate,
    target: f64,
    features: Vec<f64>,
}

impl Observation {
    /// Creates an observation.
    pub fn new(date: NaiveDate, target: f64, features: Vec<f64>) -> Self {
        Self {
            date,
            target,
            features,
        }
    }

    /// Returns the date.
    pub fn date(&self) -> NaiveDate {
        self.date
    }

    /// Returns the target value.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Returns the feature values in schema order.
    pub fn features(&self) -> &[f64] {
        &self.features
    }
}
