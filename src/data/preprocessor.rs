// ============================================================
// Layer 4 - Preprocessor
// ============================================================
// Turns a raw Dataset into a complete one and splits it.
//
// Cleaning rules (per column kind, applied in schema order):
//   1. numeric / code → missing cells get the column median,
//                       computed over non-missing cells only
//   2. binary         → missing cells become "No" (0)
//   3. text           → missing cells become "Unknown"
//
// A numeric or code column with no values at all has no median
// and fails with InvalidColumn. Row count never changes.
//
// The medians are kept as FillValues so new rows can later be
// filled with the training data's values instead of their own.
//
// After cleaning, the feature matrix is built and the rows are
// partitioned with the seeded splitter.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::data::dataset::FeatureMatrix;
use crate::data::splitter::Partition;
use crate::data::stats;
use crate::domain::config::PipelineConfig;
use crate::domain::error::{PipelineError, Result};
use crate::domain::record::{Cell, Dataset};
use crate::domain::schema::ColumnKind;

/// Fill value for missing text cells
pub const UNKNOWN: &str = "Unknown";

/// One column's imputation: how many cells and with what
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Imputation {
    pub column: String,
    pub filled: usize,
    pub value:  String,
}

/// Column medians learned from the training data, saved with
/// the model so prediction rows are filled the same way.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FillValues {
    pub medians: BTreeMap<String, f64>,
}

impl FillValues {
    pub fn median(&self, column: &str) -> Option<f64> {
        self.medians.get(column).copied()
    }
}

/// Everything the later stages need from preprocessing
#[derive(Debug, Clone)]
pub struct Preprocessed {
    pub dataset:    Dataset,
    pub fills:      FillValues,
    pub imputed:    Vec<Imputation>,
    pub partition:  Partition,
    pub train:      FeatureMatrix,
    pub test:       FeatureMatrix,
}

pub struct Preprocessor;

impl Preprocessor {
    pub fn new() -> Self {
        Self
    }

    /// Clean, build the feature matrix and partition in one pass.
    pub fn run(&self, raw: Dataset, config: &PipelineConfig) -> Result<Preprocessed> {
        let fills              = self.fit_fills(&raw)?;
        let (dataset, imputed) = self.apply_fills(raw, &fills)?;
        let matrix    = FeatureMatrix::from_dataset(&dataset)?;
        let partition = Partition::new(dataset.len(), config.train_fraction(), config.seed);

        let train = matrix.select(&partition.train);
        let test  = matrix.select(&partition.test);

        tracing::info!(
            "Preprocessed {} rows: {} train / {} test, {} features",
            dataset.len(),
            train.sample_count(),
            test.sample_count(),
            matrix.feature_count(),
        );

        Ok(Preprocessed { dataset, fills, imputed, partition, train, test })
    }

    /// Median of every numeric and code column, over its
    /// non-missing cells.
    pub fn fit_fills(&self, dataset: &Dataset) -> Result<FillValues> {
        let mut fills = FillValues::default();
        for (idx, col) in dataset.schema.columns.iter().enumerate() {
            if !matches!(col.kind, ColumnKind::Numeric | ColumnKind::Code) {
                continue;
            }
            let values = numeric_values(dataset, idx, &col.name)?;
            let median = stats::median(&values).ok_or_else(|| PipelineError::InvalidColumn {
                column: col.name.clone(),
                reason: "no non-missing values to take a median of".into(),
            })?;
            fills.medians.insert(col.name.clone(), median);
        }
        Ok(fills)
    }

    /// Fill missing cells with precomputed medians, "No" and
    /// "Unknown". A numeric column with missing cells but no
    /// median in `fills` is an InvalidColumn.
    pub fn apply_fills(
        &self,
        mut dataset: Dataset,
        fills: &FillValues,
    ) -> Result<(Dataset, Vec<Imputation>)> {
        let mut imputed = Vec::new();

        for (idx, col) in dataset.schema.columns.clone().iter().enumerate() {
            let missing = dataset.column(idx).filter(|c| c.is_missing()).count();
            if missing == 0 {
                continue;
            }

            let (fill, value) = match col.kind {
                ColumnKind::Numeric | ColumnKind::Code => {
                    let median = fills.median(&col.name).ok_or_else(|| {
                        PipelineError::InvalidColumn {
                            column: col.name.clone(),
                            reason: "no median available to fill missing cells".into(),
                        }
                    })?;
                    (Cell::Number(median), median.to_string())
                }
                ColumnKind::Binary => (Cell::Flag(false), "No".to_string()),
                ColumnKind::Text => (Cell::Text(UNKNOWN.to_string()), UNKNOWN.to_string()),
            };

            for record in &mut dataset.records {
                if record.cells[idx].is_missing() {
                    record.cells[idx] = fill.clone();
                }
            }

            tracing::info!("Filled {} missing '{}' with {}", missing, col.name, value);
            imputed.push(Imputation { column: col.name.clone(), filled: missing, value });
        }

        Ok((dataset, imputed))
    }
}

impl Default for Preprocessor {
    fn default() -> Self {
        Self::new()
    }
}

/// Non-missing numbers of a numeric column; a text or flag cell
/// in such a column is a data-quality error.
fn numeric_values(dataset: &Dataset, idx: usize, name: &str) -> Result<Vec<f64>> {
    let mut values = Vec::new();
    for (row, cell) in dataset.column(idx).enumerate() {
        match cell {
            Cell::Number(v) => values.push(*v),
            Cell::Missing => {}
            other => {
                return Err(PipelineError::InvalidColumn {
                    column: name.to_string(),
                    reason: format!("row {row} holds non-numeric {other:?}"),
                })
            }
        }
    }
    Ok(values)
}
