// ============================================================
// Layer 2 - Predict Use Case
// ============================================================
// Reuses a finished run from its output directory:
//   1. Load run_config.json, model.json and fills.json
//   2. Read new rows with the same schema, minus the target
//   3. Fill missing values with the saved training medians
//   4. Predict one rating per row
//
// The same loaded model also answers `impact` queries.

use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

use crate::data::dataset::feature_rows;
use crate::data::loader::CsvLoader;
use crate::data::preprocessor::{FillValues, Preprocessor};
use crate::domain::config::PipelineConfig;
use crate::domain::traits::{DatasetSource, Predictor};
use crate::infra::checkpoint::CheckpointManager;
use crate::ml::model::LinearModel;

pub struct PredictUseCase {
    model_dir: PathBuf,
    config:    PipelineConfig,
    model:     LinearModel,
    fills:     FillValues,
}

impl PredictUseCase {
    /// Load the model and run config saved by `train`
    pub fn new(model_dir: impl Into<PathBuf>) -> Result<Self> {
        let model_dir = model_dir.into();
        let ckpt      = CheckpointManager::new(&model_dir);
        let config    = ckpt.load_config().context("Failed to load run config")?;
        let model     = ckpt.load_model().context("Failed to load model")?;
        let fills     = ckpt.load_fills().context("Failed to load fill values")?;

        let expected = config.schema.feature_names();
        if model.feature_names() != expected.as_slice() {
            bail!(
                "Model features {:?} do not match the saved schema {:?}",
                model.feature_names(),
                expected
            );
        }
        Ok(Self { model_dir, config, model, fills })
    }

    /// Predict the target for every row of a CSV file
    pub fn predict_file(&self, data: &Path) -> Result<Vec<f64>> {
        let loader = CsvLoader::new(data, self.config.schema.without_target())
            .with_delimiter(self.config.delimiter_byte()?);
        self.predict_with(&loader)
            .with_context(|| format!("Failed to predict rows of '{}'", data.display()))
    }

    pub fn predict_with(&self, source: &dyn DatasetSource) -> Result<Vec<f64>> {
        let raw = source.load()?;
        let (clean, _) = Preprocessor::new().apply_fills(raw, &self.fills)?;
        let rows = feature_rows(&clean)?;
        let predictions = self.model.predict_rows(&rows)?;
        tracing::info!(
            "Predicted {} rows with the model in '{}'",
            predictions.len(),
            self.model_dir.display()
        );
        Ok(predictions)
    }

    /// Expected change in the target when `feature` moves by `change`
    pub fn impact(&self, feature: &str, change: f64) -> Result<f64> {
        self.model
            .impact(feature, change)
            .with_context(|| format!("No impact for feature '{feature}'"))
    }
}
