// ============================================================
// Layer 5 - ML / Model Layer
// ============================================================
// All linear algebra lives here; no other layer imports
// nalgebra.
//
//   linalg.rs    - normal equation solver with pseudo-inverse
//                  fallback for ill-conditioned XᵀX
//
//   model.rs     - the fitted LinearModel (weights + bias),
//                  implements the Predictor trait
//
//   trainer.rs   - builds the design matrix from the train
//                  partition and fits a LinearModel
//
//   evaluator.rs - MSE / RMSE / MAE / R², feature ranking and
//                  per-row prediction comparison

/// Closed-form least squares via nalgebra
pub mod linalg;

/// Fitted linear regression model
pub mod model;

/// Fits a model on the train partition
pub mod trainer;

/// Metrics and feature importance on the test partition
pub mod evaluator;
