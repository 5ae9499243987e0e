// ============================================================
// Layer 2 - Describe Use Case
// ============================================================
// Summary statistics of every modelled column (features, then
// the target) over the raw, non-missing values of a CSV file.
// Nothing is imputed or written; this only reads.

use anyhow::{Context, Result};
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::data::{loader::CsvLoader, stats::{self, FeatureSummary}};
use crate::domain::config::PipelineConfig;
use crate::domain::record::Dataset;
use crate::domain::traits::DatasetSource;

/// One column's summary plus how many cells were empty
#[derive(Debug, Clone)]
pub struct ColumnStats {
    pub name:    String,
    pub missing: usize,
    /// None when every cell of the column is missing
    pub summary: Option<FeatureSummary>,
}

pub struct DescribeUseCase {
    config:    PipelineConfig,
    data_path: PathBuf,
}

impl DescribeUseCase {
    pub fn new(config: PipelineConfig, data_path: impl Into<PathBuf>) -> Self {
        Self { config, data_path: data_path.into() }
    }

    pub fn execute(&self) -> Result<Vec<ColumnStats>> {
        self.config.validate().context("Invalid run configuration")?;
        let loader = CsvLoader::new(&self.data_path, self.config.schema.clone())
            .with_delimiter(self.config.delimiter_byte()?);
        let dataset = loader
            .load()
            .with_context(|| format!("Failed to load '{}'", self.data_path.display()))?;
        summarise(&dataset)
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }
}

fn summarise(dataset: &Dataset) -> Result<Vec<ColumnStats>> {
    let schema = &dataset.schema;
    let mut columns = schema.feature_indices();
    columns.push(schema.target_index()?);

    Ok(columns
        .into_iter()
        .map(|idx| {
            let name = &schema.columns[idx].name;
            let values: Vec<f64> = dataset.column(idx).filter_map(|c| c.as_f64()).collect();
            ColumnStats {
                name:    name.clone(),
                missing: dataset.column(idx).filter(|c| c.is_missing()).count(),
                summary: stats::describe(name, &values),
            }
        })
        .collect())
}

/// Fixed-width table, one row per column
pub fn render(columns: &[ColumnStats]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<24} {:>6} {:>7} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10} {:>10}",
        "Column", "Count", "Missing", "Mean", "Std", "Min", "25%", "50%", "75%", "Max"
    );
    for c in columns {
        let _ = match &c.summary {
            Some(s) => writeln!(
                out,
                "{:<24} {:>6} {:>7} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3} {:>10.3}",
                c.name, s.count, c.missing, s.mean, s.std, s.min, s.q25, s.q50, s.q75, s.max
            ),
            None => writeln!(out, "{:<24} {:>6} {:>7}  (no values)", c.name, 0, c.missing),
        };
    }
    out
}
