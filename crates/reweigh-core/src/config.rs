//! Engine configuration and the optional TOML config file.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::registry::{AttributeRegistry, AttributeSpec};

/// Reference proportion substituted for categories missing from the reference table.
///
/// It bounds the weight such a category can receive: `floor / observed`, which
/// never exceeds `floor * non_missing_rows`.
pub const DEFAULT_FLOOR_PROPORTION: f64 = 0.0001;

/// Fraction of sampled values that must match a value shape for a column to bind.
pub const DEFAULT_SHAPE_MATCH_THRESHOLD: f64 = 0.5;

/// Options controlling detection and weighting.
///
/// Passed explicitly to every evaluation; there is no ambient state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Reference proportion used for categories absent from the reference table.
    pub floor_proportion: f64,
    /// A column binds by value shape when its match ratio strictly exceeds this.
    pub shape_match_threshold: f64,
    /// Only inspect the first N non-missing values per column for value shapes.
    /// `None` scans the whole column.
    pub shape_sample_rows: Option<usize>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            floor_proportion: DEFAULT_FLOOR_PROPORTION,
            shape_match_threshold: DEFAULT_SHAPE_MATCH_THRESHOLD,
            shape_sample_rows: None,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_floor_proportion(mut self, floor: f64) -> Self {
        self.floor_proportion = floor;
        self
    }

    #[must_use]
    pub fn with_shape_match_threshold(mut self, threshold: f64) -> Self {
        self.shape_match_threshold = threshold;
        self
    }

    #[must_use]
    pub fn with_shape_sample_rows(mut self, rows: Option<usize>) -> Self {
        self.shape_sample_rows = rows;
        self
    }

    /// Check that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !self.floor_proportion.is_finite()
            || self.floor_proportion <= 0.0
            || self.floor_proportion >= 1.0
        {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "floor_proportion must be in (0, 1), got {}",
                    self.floor_proportion
                ),
            });
        }
        if !(0.0..1.0).contains(&self.shape_match_threshold) {
            return Err(EngineError::InvalidConfig {
                message: format!(
                    "shape_match_threshold must be in [0, 1), got {}",
                    self.shape_match_threshold
                ),
            });
        }
        if self.shape_sample_rows == Some(0) {
            return Err(EngineError::InvalidConfig {
                message: "shape_sample_rows must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// `[engine]` table of the config file; every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineOverrides {
    pub floor_proportion: Option<f64>,
    pub shape_match_threshold: Option<f64>,
    pub shape_sample_rows: Option<usize>,
}

/// Parsed TOML config file.
///
/// ```toml
/// [engine]
/// floor_proportion = 0.0001
///
/// [[attribute]]
/// name = "age_band"
/// label = "Age Band"
/// keywords = ["age"]
/// ```
///
/// When any `[[attribute]]` entry is present the entries replace the default
/// registry.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    #[serde(default)]
    pub engine: EngineOverrides,
    #[serde(default, rename = "attribute")]
    pub attributes: Vec<AttributeSpec>,
}

impl ConfigFile {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| EngineError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())
    }

    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self> {
        toml::from_str(content).map_err(|source| EngineError::ConfigParse {
            origin: origin.to_string(),
            source,
        })
    }

    /// Apply the `[engine]` overrides on top of `config`.
    pub fn apply(&self, config: EngineConfig) -> EngineConfig {
        let mut config = config;
        if let Some(floor) = self.engine.floor_proportion {
            config.floor_proportion = floor;
        }
        if let Some(threshold) = self.engine.shape_match_threshold {
            config.shape_match_threshold = threshold;
        }
        if let Some(rows) = self.engine.shape_sample_rows {
            config.shape_sample_rows = Some(rows);
        }
        config
    }

    /// Registry built from the file's attribute entries, if it declares any.
    pub fn registry(&self) -> Option<AttributeRegistry> {
        if self.attributes.is_empty() {
            None
        } else {
            Some(AttributeRegistry::new(self.attributes.clone()))
        }
    }
}
