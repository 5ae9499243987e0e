// ============================================================
// Layer 6 - Report Writer
// ============================================================
// Renders the outcome of a run as text and writes the run
// artifacts next to the saved model.
//
// Files written per run:
//   results.txt            - metrics, band, ranking, insights, samples
//   feature_importance.csv - rank,feature,weight,abs_weight,direction
//
// Example CSV output:
//   rank,feature,weight,abs_weight,direction
//   1,Has Online delivery,-0.412300,0.412300,decreases
//   2,Price range,0.398100,0.398100,increases
//   ...

use std::fmt::Write as _;
use std::{fs, path::{Path, PathBuf}};

use crate::data::preprocessor::Imputation;
use crate::domain::error::Result;
use crate::ml::evaluator::{Direction, Metrics, PredictionRow, RankedFeature};
use crate::ml::linalg::SolveMethod;
use crate::ml::model::LinearModel;

const RULE: &str = "----------------------------------------------------------------------";

/// Everything a finished run reports
#[derive(Debug, Clone)]
pub struct RunReport {
    pub rows:      usize,
    pub train:     usize,
    pub test:      usize,
    pub imputed:   Vec<Imputation>,
    pub model:     LinearModel,
    pub metrics:   Metrics,
    pub ranking:   Vec<RankedFeature>,
    pub samples:   Vec<PredictionRow>,
}

impl RunReport {
    /// Plain-text report shared by stdout and results.txt
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail
        let _ = self.write_into(&mut out);
        out
    }

    fn write_into(&self, out: &mut String) -> std::fmt::Result {
        writeln!(out, "RESTAURANT RATING PREDICTION - RESULTS")?;
        writeln!(out, "{}", RULE.replace('-', "="))?;
        writeln!(
            out,
            "Rows: {} ({} train / {} test), features: {}",
            self.rows,
            self.train,
            self.test,
            self.model.feature_names().len()
        )?;
        for imp in &self.imputed {
            writeln!(out, "  filled {} missing '{}' with {}", imp.filled, imp.column, imp.value)?;
        }

        let solver = match self.model.method() {
            SolveMethod::Inverse       => "exact inverse",
            SolveMethod::PseudoInverse => "pseudo-inverse",
        };
        let cond = self
            .model
            .condition()
            .map_or_else(|| "singular".to_string(), |c| format!("{c:.3e}"));
        writeln!(out, "Solver: {solver} (cond(XᵀX) = {cond}), bias = {:.4}", self.model.bias())?;

        writeln!(out, "\nPERFORMANCE METRICS")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "Mean Squared Error (MSE):        {:.4}", self.metrics.mse)?;
        writeln!(out, "Root Mean Squared Error (RMSE):  {:.4}", self.metrics.rmse)?;
        writeln!(out, "Mean Absolute Error (MAE):       {:.4}", self.metrics.mae)?;
        writeln!(out, "R-squared (R²):                  {:.4}", self.metrics.r2)?;
        writeln!(out, "Performance:                     {}", self.metrics.band())?;

        writeln!(out, "\nFEATURE IMPORTANCE (by |weight|)")?;
        writeln!(out, "{RULE}")?;
        writeln!(out, "{:<6} {:<30} {:>12}  {}", "Rank", "Feature", "Weight", "Effect")?;
        for r in &self.ranking {
            writeln!(
                out,
                "{:<6} {:<30} {:>12.4}  {}",
                r.rank, r.feature, r.weight, r.direction
            )?;
        }

        self.write_insights(out)?;

        if !self.samples.is_empty() {
            writeln!(out, "\nSAMPLE PREDICTIONS")?;
            writeln!(out, "{RULE}")?;
            writeln!(out, "{:<12} {:<12} {:<12} {}", "Actual", "Predicted", "Error", "Status")?;
            for s in &self.samples {
                writeln!(
                    out,
                    "{:<12.2} {:<12.2} {:<12.2} {:?}",
                    s.actual, s.predicted, s.error, s.status
                )?;
            }
        }
        Ok(())
    }

    /// Top feature, top three, and which features push the
    /// rating up or down.
    fn write_insights(&self, out: &mut String) -> std::fmt::Result {
        let Some(top) = self.ranking.first() else {
            return Ok(());
        };
        writeln!(out, "\nKEY INSIGHTS")?;
        writeln!(out, "{RULE}")?;
        writeln!(
            out,
            "Most influential feature: {} (weight {:.4}, {} the rating)",
            top.feature, top.weight, top.direction
        )?;

        let top3: Vec<&str> = self.ranking.iter().take(3).map(|r| r.feature.as_str()).collect();
        writeln!(out, "Top {} features: {}", top3.len(), top3.join(", "))?;

        for (direction, label) in [
            (Direction::Increases, "Raise the rating"),
            (Direction::Decreases, "Lower the rating"),
        ] {
            let names: Vec<&str> = self
                .ranking
                .iter()
                .filter(|r| r.direction == direction)
                .map(|r| r.feature.as_str())
                .collect();
            if !names.is_empty() {
                writeln!(out, "{label}: {}", names.join(", "))?;
            }
        }
        Ok(())
    }
}

/// Writes report files into one output directory.
pub struct ReportWriter {
    dir: PathBuf,
}

impl ReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write results.txt and feature_importance.csv; returns their paths.
    pub fn write(&self, report: &RunReport) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(&self.dir)?;

        let results = self.dir.join("results.txt");
        fs::write(&results, report.render())?;

        let importance = self.dir.join("feature_importance.csv");
        write_importance_csv(&importance, &report.ranking)?;

        tracing::info!("Wrote report files to '{}'", self.dir.display());
        Ok(vec![results, importance])
    }
}

fn write_importance_csv(path: &Path, ranking: &[RankedFeature]) -> Result<()> {
    let mut w = csv::Writer::from_path(path)?;
    w.write_record(["rank", "feature", "weight", "abs_weight", "direction"])?;
    for r in ranking {
        w.write_record([
            r.rank.to_string(),
            r.feature.clone(),
            format!("{:.6}", r.weight),
            format!("{:.6}", r.abs_weight()),
            r.direction.to_string(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
