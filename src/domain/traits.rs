// ============================================================
// Layer 3 - Core Traits
// ============================================================
// The seams between layers:
//
//   DatasetSource - anything that can produce a raw Dataset
//                   (CsvLoader reads a delimited file)
//   Predictor     - anything that maps a feature row to a value
//                   (LinearModel)
//
// The application layer only talks to these traits, so tests
// can hand it an in-memory source instead of a file.

use crate::domain::error::Result;
use crate::domain::record::Dataset;

// ─── DatasetSource ────────────────────────────────────────────────────────────
/// Any component that can load a raw (unimputed) Dataset.
pub trait DatasetSource {
    fn load(&self) -> Result<Dataset>;
}

// ─── Predictor ────────────────────────────────────────────────────────────────
/// Any fitted model that predicts one value per feature row.
pub trait Predictor {
    /// Number of features a row must have
    fn feature_count(&self) -> usize;

    /// Predict a single row. Errors on a row of the wrong width.
    fn predict_row(&self, row: &[f64]) -> Result<f64>;

    /// Predict every row in order
    fn predict_rows(&self, rows: &[Vec<f64>]) -> Result<Vec<f64>> {
        rows.iter().map(|r| self.predict_row(r)).collect()
    }
}
