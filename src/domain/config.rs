// ============================================================
// Layer 3 - Pipeline Configuration
// ============================================================
// Every tunable of a run in one struct, passed explicitly into
// the preprocessor and trainer. Serialisable so a run can be
// reproduced from its saved run_config.json, and so a JSON file
// can supply a custom schema.

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

use crate::domain::error::{PipelineError, Result};
use crate::domain::schema::Schema;

/// Seed used for the train/test permutation unless overridden
pub const DEFAULT_SEED: u64 = 42;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Seed for the train/test permutation
    pub seed: u64,

    /// Share of rows held out for evaluation, in (0, 1)
    pub test_fraction: f64,

    /// Above this condition number of XᵀX the trainer switches
    /// from the exact inverse to the pseudo-inverse
    pub condition_limit: f64,

    /// Field delimiter of the input file
    pub delimiter: char,

    /// Sample prediction rows shown and saved in the report
    pub show_predictions: usize,

    pub schema: Schema,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            seed:             DEFAULT_SEED,
            test_fraction:    0.2,
            condition_limit:  1e12,
            delimiter:        ',',
            show_predictions: 10,
            schema:           Schema::restaurant(),
        }
    }
}

impl PipelineConfig {
    pub fn train_fraction(&self) -> f64 {
        1.0 - self.test_fraction
    }

    /// Delimiter as the single byte the CSV reader expects
    pub fn delimiter_byte(&self) -> Result<u8> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                PipelineError::InvalidConfig(format!(
                    "delimiter '{}' is not a single ASCII character",
                    self.delimiter
                ))
            })
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "test_fraction must be in (0, 1), got {}",
                self.test_fraction
            )));
        }
        if !(self.condition_limit.is_finite() && self.condition_limit > 0.0) {
            return Err(PipelineError::InvalidConfig(format!(
                "condition_limit must be positive and finite, got {}",
                self.condition_limit
            )));
        }
        self.delimiter_byte()?;
        self.schema.validate()
    }

    /// Read a config from JSON; absent fields take their defaults
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(PipelineError::FileNotFound(path.to_path_buf()));
        }
        let json = fs::read_to_string(path)?;
        let cfg: Self = serde_json::from_str(&json)?;
        cfg.validate()?;
        Ok(cfg)
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_valid() {
        let cfg = PipelineConfig::default();
        cfg.validate().unwrap();
        assert_eq!(cfg.seed, 42);
        assert!((cfg.train_fraction() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn test_rejects_bad_fraction() {
        let cfg = PipelineConfig { test_fraction: 1.0, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(PipelineError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_non_ascii_delimiter() {
        let cfg = PipelineConfig { delimiter: 'é', ..Default::default() };
        assert!(cfg.delimiter_byte().is_err());
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let cfg: PipelineConfig = serde_json::from_str(r#"{ "seed": 7 }"#).unwrap();
        assert_eq!(cfg.seed, 7);
        assert_eq!(cfg.schema, Schema::restaurant());
        assert_eq!(cfg.delimiter, ',');
    }

    #[test]
    fn test_missing_config_file() {
        let err = PipelineConfig::from_json_file(Path::new("/no/such/config.json")).unwrap_err();
        assert!(matches!(err, PipelineError::FileNotFound(_)));
    }
}
