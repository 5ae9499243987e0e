// ============================================================
// Layer 5 - Trainer
// ============================================================
// Fits a LinearModel on the train partition in closed form:
//
//   1. prepend a bias column of ones to X
//   2. solve w = (XᵀX)⁻¹ Xᵀy (pseudo-inverse when ill-conditioned)
//   3. split w into bias (w₀) and feature weights (w₁..)
//
// No iterations, no learning rate: the same train partition
// always yields the same model.

use nalgebra::DVector;

use crate::data::dataset::FeatureMatrix;
use crate::domain::config::PipelineConfig;
use crate::domain::error::{PipelineError, Result};
use crate::ml::linalg::{design_matrix, solve_normal_equation};
use crate::ml::model::LinearModel;

pub struct Trainer {
    condition_limit: f64,
}

impl Trainer {
    pub fn new(config: &PipelineConfig) -> Self {
        Self { condition_limit: config.condition_limit }
    }

    pub fn fit(&self, train: &FeatureMatrix) -> Result<LinearModel> {
        if train.sample_count() == 0 {
            return Err(PipelineError::EmptyPartition("train"));
        }
        for row in &train.rows {
            if row.len() != train.feature_count() {
                return Err(PipelineError::ShapeMismatch {
                    expected: train.feature_count(),
                    actual:   row.len(),
                });
            }
        }

        let x = design_matrix(&train.rows, train.feature_count());
        let y = DVector::from_column_slice(&train.targets);

        let solution = solve_normal_equation(&x, &y, self.condition_limit)?;
        let bias     = solution.coefficients[0];
        let weights  = solution.coefficients[1..].to_vec();

        tracing::info!(
            "Model trained on {} samples × {} features ({:?}, cond = {:.3e})",
            train.sample_count(),
            train.feature_count(),
            solution.method,
            solution.condition,
        );
        tracing::debug!("Bias term: {:.4}", bias);

        LinearModel::new(
            train.feature_names.clone(),
            weights,
            bias,
            solution.method,
            solution.condition.is_finite().then_some(solution.condition),
        )
    }
}
