// ============================================================
// Layer 4 - Feature Matrix
// ============================================================
// Numeric view of a cleaned Dataset. Binary flags become 1/0;
// passthrough columns are dropped. Row i of `rows` and
// `targets[i]` always come from the same record.

use serde::{Deserialize, Serialize};

use crate::domain::error::{PipelineError, Result};
use crate::domain::record::Dataset;

/// Numeric view of a cleaned Dataset: one row of feature values
/// per record (schema feature order) and the matching target.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrix {
    pub feature_names: Vec<String>,
    pub rows:          Vec<Vec<f64>>,
    pub targets:       Vec<f64>,
}

impl FeatureMatrix {
    /// Extract features and target from a dataset with no missing
    /// values in those columns.
    pub fn from_dataset(dataset: &Dataset) -> Result<Self> {
        let target_idx = dataset.schema.target_index()?;
        let rows       = feature_rows(dataset)?;
        let targets    = (0..dataset.len())
            .map(|r| numeric_at(dataset, r, target_idx))
            .collect::<Result<Vec<f64>>>()?;

        Ok(Self { feature_names: dataset.schema.feature_names(), rows, targets })
    }

    pub fn sample_count(&self) -> usize {
        self.rows.len()
    }

    pub fn feature_count(&self) -> usize {
        self.feature_names.len()
    }

    /// Sub-matrix holding only the given row indices, in that order
    pub fn select(&self, indices: &[usize]) -> Self {
        Self {
            feature_names: self.feature_names.clone(),
            rows:          indices.iter().map(|&i| self.rows[i].clone()).collect(),
            targets:       indices.iter().map(|&i| self.targets[i]).collect(),
        }
    }
}

/// Feature values of every record, in schema feature order.
/// Needs no target column, so it also serves prediction input.
pub fn feature_rows(dataset: &Dataset) -> Result<Vec<Vec<f64>>> {
    let feature_idx = dataset.schema.feature_indices();
    (0..dataset.len())
        .map(|r| feature_idx.iter().map(|&c| numeric_at(dataset, r, c)).collect())
        .collect()
}

fn numeric_at(dataset: &Dataset, row: usize, col: usize) -> Result<f64> {
    dataset.records[row].cells[col].as_f64().ok_or_else(|| PipelineError::InvalidColumn {
        column: dataset.schema.columns[col].name.clone(),
        reason: format!("row {row} has no numeric value"),
    })
}
