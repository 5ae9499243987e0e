// ============================================================
// Layer 5 - Evaluator
// ============================================================
// Scores a fitted model on the test partition.
//
//   predictions = X·w + bias
//   MSE  = mean(residual²)
//   RMSE = √MSE
//   MAE  = mean(|residual|)
//   R²   = 1 − SS_res / SS_tot
//
// R² is undefined when the test targets are constant
// (SS_tot = 0) and every metric is undefined on an empty test
// set; both are reported as UndefinedMetric, never as NaN.
//
// Feature importance is the plain magnitude of each weight:
// sorted by |w| descending, ties kept in feature order.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::data::dataset::FeatureMatrix;
use crate::domain::error::{PipelineError, Result};
use crate::domain::traits::Predictor;
use crate::ml::model::LinearModel;

// ─── Metrics ──────────────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Metrics {
    pub mse:  f64,
    pub rmse: f64,
    pub mae:  f64,
    pub r2:   f64,
}

impl Metrics {
    /// Compare actual targets with predictions.
    pub fn compute(actual: &[f64], predicted: &[f64]) -> Result<Self> {
        if actual.len() != predicted.len() {
            return Err(PipelineError::ShapeMismatch {
                expected: actual.len(),
                actual:   predicted.len(),
            });
        }
        if actual.is_empty() {
            return Err(PipelineError::UndefinedMetric {
                metric: "MSE",
                reason: "test partition is empty".into(),
            });
        }

        let n      = actual.len() as f64;
        let mean   = actual.iter().sum::<f64>() / n;
        let ss_res = actual.iter().zip(predicted).map(|(a, p)| (a - p).powi(2)).sum::<f64>();
        let ss_tot = actual.iter().map(|a| (a - mean).powi(2)).sum::<f64>();
        let abs    = actual.iter().zip(predicted).map(|(a, p)| (a - p).abs()).sum::<f64>();

        // A constant target leaves ss_tot at rounding noise, not 0
        if actual.iter().all(|a| *a == actual[0]) {
            return Err(PipelineError::UndefinedMetric {
                metric: "R²",
                reason: format!("test target is constant ({})", actual[0]),
            });
        }

        let mse = ss_res / n;
        Ok(Self { mse, rmse: mse.sqrt(), mae: abs / n, r2: 1.0 - ss_res / ss_tot })
    }

    pub fn band(&self) -> PerformanceBand {
        PerformanceBand::from_r2(self.r2)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceBand {
    Excellent,
    Good,
    Moderate,
    NeedsImprovement,
}

impl PerformanceBand {
    pub fn from_r2(r2: f64) -> Self {
        if r2 >= 0.7 {
            Self::Excellent
        } else if r2 >= 0.5 {
            Self::Good
        } else if r2 >= 0.3 {
            Self::Moderate
        } else {
            Self::NeedsImprovement
        }
    }
}

impl fmt::Display for PerformanceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Excellent        => "EXCELLENT",
            Self::Good             => "GOOD",
            Self::Moderate         => "MODERATE",
            Self::NeedsImprovement => "NEEDS IMPROVEMENT",
        })
    }
}

// ─── Feature ranking ──────────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Increases,
    Decreases,
    Neutral,
}

impl Direction {
    fn of(weight: f64) -> Self {
        if weight > 0.0 {
            Self::Increases
        } else if weight < 0.0 {
            Self::Decreases
        } else {
            Self::Neutral
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Increases => "increases",
            Self::Decreases => "decreases",
            Self::Neutral   => "neutral",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedFeature {
    /// 1-based rank
    pub rank:      usize,
    pub feature:   String,
    pub weight:    f64,
    pub direction: Direction,
}

impl RankedFeature {
    pub fn abs_weight(&self) -> f64 {
        self.weight.abs()
    }
}

/// Rank features by |weight|, largest first. The sort is stable,
/// so equal magnitudes keep their feature order.
pub fn rank_features(model: &LinearModel) -> Vec<RankedFeature> {
    let mut order: Vec<usize> = (0..model.weights().len()).collect();
    order.sort_by(|&a, &b| model.weights()[b].abs().total_cmp(&model.weights()[a].abs()));

    order
        .into_iter()
        .enumerate()
        .map(|(pos, i)| {
            let weight = model.weights()[i];
            RankedFeature {
                rank: pos + 1,
                feature: model.feature_names()[i].clone(),
                weight,
                direction: Direction::of(weight),
            }
        })
        .collect()
}

// ─── Prediction comparison ────────────────────────────────────────────────────
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredictionStatus {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl PredictionStatus {
    pub fn from_error(error: f64) -> Self {
        if error < 0.5 {
            Self::Excellent
        } else if error < 1.0 {
            Self::Good
        } else if error < 1.5 {
            Self::Fair
        } else {
            Self::Poor
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRow {
    pub actual:    f64,
    pub predicted: f64,
    pub error:     f64,
    pub status:    PredictionStatus,
}

/// The first `limit` actual/predicted pairs with their error
pub fn compare_predictions(actual: &[f64], predicted: &[f64], limit: usize) -> Vec<PredictionRow> {
    actual
        .iter()
        .zip(predicted)
        .take(limit)
        .map(|(&a, &p)| {
            let error = (a - p).abs();
            PredictionRow { actual: a, predicted: p, error, status: PredictionStatus::from_error(error) }
        })
        .collect()
}

// ─── Evaluation ───────────────────────────────────────────────────────────────
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub metrics:     Metrics,
    pub ranking:     Vec<RankedFeature>,
    pub samples:     Vec<PredictionRow>,
}

/// Predict the test partition, score it and rank the weights.
pub fn evaluate(model: &LinearModel, test: &FeatureMatrix, show: usize) -> Result<Evaluation> {
    let predictions = model.predict_rows(&test.rows)?;
    let metrics     = Metrics::compute(&test.targets, &predictions)?;
    let ranking     = rank_features(model);
    let samples     = compare_predictions(&test.targets, &predictions, show);

    tracing::info!(
        "Evaluated {} test samples: RMSE={:.4}, MAE={:.4}, R²={:.4}",
        test.sample_count(),
        metrics.rmse,
        metrics.mae,
        metrics.r2,
    );

    Ok(Evaluation { metrics, ranking, samples })
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::linalg::SolveMethod;
    use approx::assert_relative_eq;

    fn model(weights: Vec<f64>) -> LinearModel {
        let names = (0..weights.len()).map(|i| format!("f{i}")).collect();
        LinearModel::new(names, weights, 0.0, SolveMethod::Inverse, Some(1.0)).unwrap()
    }

    #[test]
    fn test_metrics_known_values() {
        let m = Metrics::compute(&[1.0, 2.0, 3.0, 4.0], &[1.5, 2.0, 2.0, 4.0]).unwrap();
        // residuals: -0.5, 0, 1, 0
        assert_relative_eq!(m.mse, 1.25 / 4.0);
        assert_relative_eq!(m.rmse, (1.25f64 / 4.0).sqrt());
        assert_relative_eq!(m.mae, 1.5 / 4.0);
        // SS_tot = 5
        assert_relative_eq!(m.r2, 1.0 - 1.25 / 5.0);
    }

    #[test]
    fn test_perfect_predictions() {
        let m = Metrics::compute(&[1.0, 2.0], &[1.0, 2.0]).unwrap();
        assert_eq!(m.mae, 0.0);
        assert_eq!(m.r2, 1.0);
        assert_eq!(m.band(), PerformanceBand::Excellent);
    }

    #[test]
    fn test_constant_target_is_undefined() {
        let err = Metrics::compute(&[3.0, 3.0, 3.0], &[3.0, 2.9, 3.1]).unwrap_err();
        assert!(matches!(err, PipelineError::UndefinedMetric { metric: "R²", .. }));
    }

    #[test]
    fn test_inexact_constant_target_is_undefined() {
        for value in [3.3, 2.7, 0.1] {
            let err = Metrics::compute(&[value; 3], &[value - 0.1, value, value + 0.1]).unwrap_err();
            assert!(
                matches!(err, PipelineError::UndefinedMetric { metric: "R²", .. }),
                "constant {value} should not produce an R²"
            );
        }
    }

    #[test]
    fn test_nearly_constant_target_still_scores() {
        let m = Metrics::compute(&[3.3, 3.3, 3.4], &[3.3, 3.3, 3.4]).unwrap();
        assert_relative_eq!(m.r2, 1.0);
    }

    #[test]
    fn test_empty_test_set_is_undefined() {
        assert!(matches!(
            Metrics::compute(&[], &[]),
            Err(PipelineError::UndefinedMetric { .. })
        ));
    }

    #[test]
    fn test_ranking_by_magnitude_with_stable_ties() {
        let ranking = rank_features(&model(vec![0.5, -3.0, 0.5, 1.0, -0.5]));
        let order: Vec<&str> = ranking.iter().map(|r| r.feature.as_str()).collect();
        assert_eq!(order, vec!["f1", "f3", "f0", "f2", "f4"]);
        assert_eq!(ranking[0].rank, 1);
        assert_eq!(ranking[0].direction, Direction::Decreases);
        assert_eq!(ranking[0].abs_weight(), 3.0);
    }

    #[test]
    fn test_bands_and_statuses() {
        assert_eq!(PerformanceBand::from_r2(0.55), PerformanceBand::Good);
        assert_eq!(PerformanceBand::from_r2(0.3), PerformanceBand::Moderate);
        assert_eq!(PerformanceBand::from_r2(-1.0), PerformanceBand::NeedsImprovement);
        assert_eq!(PredictionStatus::from_error(0.49), PredictionStatus::Excellent);
        assert_eq!(PredictionStatus::from_error(1.2), PredictionStatus::Fair);
        assert_eq!(PredictionStatus::from_error(2.0), PredictionStatus::Poor);
    }

    #[test]
    fn test_compare_predictions_limits_rows() {
        let rows = compare_predictions(&[1.0, 2.0, 3.0], &[1.0, 3.0, 3.0], 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].error, 1.0);
        assert_eq!(rows[1].status, PredictionStatus::Fair);
    }

    #[test]
    fn test_evaluate_runs_predictions() {
        let m = model(vec![2.0]);
        let test = FeatureMatrix {
            feature_names: vec!["f0".into()],
            rows:          vec![vec![1.0], vec![2.0]],
            targets:       vec![2.0, 4.0],
        };
        let eval = evaluate(&m, &test, 10).unwrap();
        let predicted: Vec<f64> = eval.samples.iter().map(|s| s.predicted).collect();
        assert_eq!(predicted, vec![2.0, 4.0]);
        assert_eq!(eval.metrics.r2, 1.0);
        assert_eq!(eval.samples.len(), 2);
    }
}
