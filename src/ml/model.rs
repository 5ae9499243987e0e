// ============================================================
// Layer 5 - Linear Model
// ============================================================
// A fitted linear regression:
//
//   ŷ = bias + Σ wᵢ · xᵢ
//
// One weight per feature (in feature order) plus the bias. The
// fields are private: a model is built once by the trainer (or
// read back from model.json) and is read-only afterwards.
//
// The solver path and the condition number of XᵀX ride along
// so the report can say how the weights were obtained.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::Predictor;
use crate::ml::linalg::SolveMethod;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearModel {
    feature_names: Vec<String>,
    weights:       Vec<f64>,
    bias:          f64,
    method:        SolveMethod,
    /// Condition number of XᵀX; None when it was singular
    condition:     Option<f64>,
}

impl LinearModel {
    pub fn new(
        feature_names: Vec<String>,
        weights:       Vec<f64>,
        bias:          f64,
        method:        SolveMethod,
        condition:     Option<f64>,
    ) -> Result<Self> {
        let model = Self { feature_names, weights, bias, method, condition };
        model.check_shape()?;
        Ok(model)
    }

    /// Names and weights must line up one to one
    pub fn check_shape(&self) -> Result<()> {
        if self.weights.len() != self.feature_names.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: self.feature_names.len(),
                actual:   self.weights.len(),
            });
        }
        Ok(())
    }

    pub fn feature_names(&self) -> &[String] {
        &self.feature_names
    }

    /// Feature weights, excluding the bias
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    pub fn bias(&self) -> f64 {
        self.bias
    }

    pub fn method(&self) -> SolveMethod {
        self.method
    }

    pub fn condition(&self) -> Option<f64> {
        self.condition
    }

    /// Weight of a named feature
    pub fn weight_of(&self, feature: &str) -> Result<f64> {
        self.feature_names
            .iter()
            .position(|n| n == feature)
            .map(|i| self.weights[i])
            .ok_or_else(|| PipelineError::UnknownFeature(feature.to_string()))
    }

    /// Expected change in the prediction when `feature` moves by
    /// `change` units with everything else held fixed.
    pub fn impact(&self, feature: &str, change: f64) -> Result<f64> {
        Ok(self.weight_of(feature)? * change)
    }
}

impl Predictor for LinearModel {
    fn feature_count(&self) -> usize {
        self.weights.len()
    }

    fn predict_row(&self, row: &[f64]) -> Result<f64> {
        if row.len() != self.feature_count() {
            return Err(PipelineError::ShapeMismatch {
                expected: self.feature_count(),
                actual:   row.len(),
            });
        }
        Ok(self.bias + row.iter().zip(&self.weights).map(|(x, w)| x * w).sum::<f64>())
    }
}
