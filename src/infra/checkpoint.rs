// ============================================================
// Layer 6 - Checkpoint Manager
// ============================================================
// Saves and restores a trained run so `predict` and `impact`
// can reuse it without retraining.
//
// What gets saved per run:
//   1. model.json      - weights, bias, feature names, solver
//   2. run_config.json - the PipelineConfig (seed, schema, ...)
//   3. fills.json      - training medians of numeric columns
//
// The config and fills are needed at prediction time: new data
// must be decoded with the schema the model was trained on and
// its missing cells filled with the training medians.
//
// File layout:
//   results/
//     model.json
//     run_config.json
//     fills.json

use std::{fs, path::PathBuf};

use crate::data::preprocessor::FillValues;
use crate::domain::config::PipelineConfig;
use crate::domain::error::{PipelineError, Result};
use crate::ml::model::LinearModel;

const MODEL_FILE:  &str = "model.json";
const CONFIG_FILE: &str = "run_config.json";
const FILLS_FILE:  &str = "fills.json";

/// Manages the model and config files of one output directory.
pub struct CheckpointManager {
    dir: PathBuf,
}

impl CheckpointManager {
    /// Does not touch the filesystem; directories are created on save.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn save_model(&self, model: &LinearModel) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(MODEL_FILE);
        fs::write(&path, serde_json::to_string_pretty(model)?)?;
        tracing::debug!("Saved model to '{}'", path.display());
        Ok(path)
    }

    pub fn load_model(&self) -> Result<LinearModel> {
        let path = self.dir.join(MODEL_FILE);
        if !path.is_file() {
            return Err(PipelineError::FileNotFound(path));
        }
        let model: LinearModel = serde_json::from_str(&fs::read_to_string(&path)?)?;
        model.check_shape()?;
        tracing::info!("Loaded model from '{}'", path.display());
        Ok(model)
    }

    pub fn save_config(&self, cfg: &PipelineConfig) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(CONFIG_FILE);
        fs::write(&path, serde_json::to_string_pretty(cfg)?)?;
        tracing::debug!("Saved run config to '{}'", path.display());
        Ok(path)
    }

    pub fn load_config(&self) -> Result<PipelineConfig> {
        PipelineConfig::from_json_file(&self.dir.join(CONFIG_FILE))
    }

    pub fn save_fills(&self, fills: &FillValues) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(FILLS_FILE);
        fs::write(&path, serde_json::to_string_pretty(fills)?)?;
        tracing::debug!("Saved {} fill medians to '{}'", fills.medians.len(), path.display());
        Ok(path)
    }

    pub fn load_fills(&self) -> Result<FillValues> {
        let path = self.dir.join(FILLS_FILE);
        if !path.is_file() {
            return Err(PipelineError::FileNotFound(path));
        }
        Ok(serde_json::from_str(&fs::read_to_string(&path)?)?)
    }
}
