// ============================================================
// Layer 2 - TrainUseCase
// ============================================================
// Orchestrates the full rating pipeline in order:
//
//   Step 1: Load the CSV               (Layer 4 - data)
//   Step 2: Impute and split           (Layer 4 - data)
//   Step 3: Fit the normal equation    (Layer 5 - ml)
//   Step 4: Evaluate on the test rows  (Layer 5 - ml)
//   Step 5: Save model, config, fills  (Layer 6 - infra)
//   Step 6: Write the report files     (Layer 6 - infra)
//
// The run configuration is resolved before the use case is
// built: an optional JSON file gives the base, and any flag the
// user passed overrides the matching field.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

use crate::data::{loader::CsvLoader, preprocessor::Preprocessor};
use crate::domain::config::PipelineConfig;
use crate::domain::traits::DatasetSource;
use crate::infra::{
    checkpoint::CheckpointManager,
    report::{ReportWriter, RunReport},
};
use crate::ml::{evaluator::evaluate, trainer::Trainer};

// ─── Config Resolution ───────────────────────────────────────────────────────
/// Fields the command line may override on top of the base config.
/// `None` keeps whatever the base config says.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub seed:             Option<u64>,
    pub test_fraction:    Option<f64>,
    pub condition_limit:  Option<f64>,
    pub delimiter:        Option<char>,
    pub show_predictions: Option<usize>,
}

impl ConfigOverrides {
    pub fn apply(&self, mut base: PipelineConfig) -> PipelineConfig {
        if let Some(seed) = self.seed {
            base.seed = seed;
        }
        if let Some(fraction) = self.test_fraction {
            base.test_fraction = fraction;
        }
        if let Some(limit) = self.condition_limit {
            base.condition_limit = limit;
        }
        if let Some(delimiter) = self.delimiter {
            base.delimiter = delimiter;
        }
        if let Some(show) = self.show_predictions {
            base.show_predictions = show;
        }
        base
    }
}

/// Load the base config from `path`, or fall back to the defaults
/// (restaurant schema, seed 42, 80/20 split).
pub fn base_config(path: Option<&Path>) -> Result<PipelineConfig> {
    match path {
        Some(p) => PipelineConfig::from_json_file(p)
            .with_context(|| format!("Failed to read config '{}'", p.display())),
        None => Ok(PipelineConfig::default()),
    }
}

/// Everything the `train` command asks for, before the config
/// file has been read.
#[derive(Debug, Clone)]
pub struct TrainRequest {
    pub data_path:   PathBuf,
    pub output_dir:  PathBuf,
    pub config_file: Option<PathBuf>,
    pub overrides:   ConfigOverrides,
}

impl TrainRequest {
    pub fn into_use_case(self) -> Result<TrainUseCase> {
        let base   = base_config(self.config_file.as_deref())?;
        let config = self.overrides.apply(base);
        Ok(TrainUseCase::new(config, self.data_path, self.output_dir))
    }
}

// ─── TrainUseCase ─────────────────────────────────────────────────────────────
/// What a finished run hands back to the CLI
#[derive(Debug)]
pub struct TrainOutcome {
    pub report:    RunReport,
    pub artifacts: Vec<PathBuf>,
}

pub struct TrainUseCase {
    config:     PipelineConfig,
    data_path:  PathBuf,
    output_dir: PathBuf,
}

impl TrainUseCase {
    pub fn new(config: PipelineConfig, data_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self { config, data_path: data_path.into(), output_dir: output_dir.into() }
    }

    /// Execute the full pipeline against the configured CSV file
    pub fn execute(&self) -> Result<TrainOutcome> {
        let loader = CsvLoader::new(&self.data_path, self.config.schema.clone())
            .with_delimiter(self.config.delimiter_byte()?);
        self.execute_with(&loader)
    }

    /// Execute the pipeline against any dataset source
    pub fn execute_with(&self, source: &dyn DatasetSource) -> Result<TrainOutcome> {
        let cfg = &self.config;
        cfg.validate().context("Invalid run configuration")?;

        // ── Step 1: Load the raw table ──────────────────────────────────────
        tracing::info!("Loading data from '{}'", self.data_path.display());
        let raw = source
            .load()
            .with_context(|| format!("Failed to load '{}'", self.data_path.display()))?;
        tracing::info!("Loaded {} rows ({} missing cells)", raw.len(), raw.missing_count());

        // ── Step 2: Impute missing values, build X / y, split ───────────────
        let prepared = Preprocessor::new()
            .run(raw, cfg)
            .context("Preprocessing failed")?;
        tracing::debug!(
            "Held-out row indices ({} of {}): {:?}",
            prepared.partition.test.len(),
            prepared.partition.len(),
            prepared.partition.test
        );

        // ── Step 3: Solve the normal equation on the train rows ─────────────
        let model = Trainer::new(cfg)
            .fit(&prepared.train)
            .context("Training failed")?;

        // ── Step 4: Score the held-out rows ─────────────────────────────────
        let evaluation = evaluate(&model, &prepared.test, cfg.show_predictions)
            .context("Evaluation failed")?;

        // ── Step 5: Persist the model, its config and the fill medians ─────
        let ckpt = CheckpointManager::new(&self.output_dir);
        let mut artifacts = vec![
            ckpt.save_model(&model).context("Failed to save model")?,
            ckpt.save_config(cfg).context("Failed to save run config")?,
            ckpt.save_fills(&prepared.fills).context("Failed to save fill values")?,
        ];

        // ── Step 6: Write results.txt and feature_importance.csv ────────────
        let report = RunReport {
            rows:    prepared.dataset.len(),
            train:   prepared.train.sample_count(),
            test:    prepared.test.sample_count(),
            imputed: prepared.imputed,
            model,
            metrics: evaluation.metrics,
            ranking: evaluation.ranking,
            samples: evaluation.samples,
        };
        artifacts.extend(
            ReportWriter::new(&self.output_dir)
                .write(&report)
                .context("Failed to write report")?,
        );

        tracing::info!("Run complete, artifacts in '{}'", self.output_dir.display());
        Ok(TrainOutcome { report, artifacts })
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::PipelineError;
    use crate::domain::schema::{Column, ColumnKind, Schema};
    use approx::assert_abs_diff_eq;
    use std::fs;

    fn line_config() -> PipelineConfig {
        PipelineConfig {
            schema: Schema {
                columns: vec![
                    Column::feature("x", ColumnKind::Numeric),
                    Column::target("y"),
                ],
            },
            ..PipelineConfig::default()
        }
    }

    fn write_table(dir: &Path, rows: impl Iterator<Item = String>) -> PathBuf {
        let path = dir.join("data.csv");
        let mut body = String::from("x,y\n");
        for r in rows {
            body.push_str(&r);
            body.push('\n');
        }
        fs::write(&path, body).unwrap();
        path
    }

    fn pipeline_error(err: &anyhow::Error) -> &PipelineError {
        err.downcast_ref::<PipelineError>()
            .expect("error should wrap a PipelineError")
    }

    #[test]
    fn test_end_to_end_perfect_line() {
        let dir  = tempfile::tempdir().unwrap();
        let data = write_table(dir.path(), (1..=10).map(|x| format!("{x},{}", 2 * x + 3)));
        let out  = dir.path().join("results");

        let outcome = TrainUseCase::new(line_config(), &data, &out).execute().unwrap();
        let report  = &outcome.report;

        assert_eq!((report.rows, report.train, report.test), (10, 8, 2));
        assert_abs_diff_eq!(report.metrics.mae, 0.0, epsilon = 1e-6);
        assert_abs_diff_eq!(report.metrics.r2, 1.0, epsilon = 1e-6);
        assert_abs_diff_eq!(report.model.weights()[0], 2.0, epsilon = 1e-6);
        assert_abs_diff_eq!(report.model.bias(), 3.0, epsilon = 1e-6);

        for name in [
            "model.json",
            "run_config.json",
            "fills.json",
            "results.txt",
            "feature_importance.csv",
        ] {
            assert!(out.join(name).is_file(), "{name} should be written");
        }
        assert_eq!(outcome.artifacts.len(), 5);
    }

    #[test]
    fn test_same_seed_gives_same_model() {
        let dir  = tempfile::tempdir().unwrap();
        let data = write_table(
            dir.path(),
            (1..=20).map(|x| format!("{x},{}", x + x % 3)),
        );
        let a = TrainUseCase::new(line_config(), &data, dir.path().join("a")).execute().unwrap();
        let b = TrainUseCase::new(line_config(), &data, dir.path().join("b")).execute().unwrap();
        assert_eq!(a.report.model, b.report.model);
    }

    #[test]
    fn test_constant_target_is_undefined_metric() {
        let dir  = tempfile::tempdir().unwrap();
        let data = write_table(dir.path(), (1..=10).map(|x| format!("{x},5")));

        let err = TrainUseCase::new(line_config(), &data, dir.path().join("out"))
            .execute()
            .unwrap_err();
        assert!(matches!(pipeline_error(&err), PipelineError::UndefinedMetric { .. }));
    }

    #[test]
    fn test_inexact_constant_target_is_undefined_metric() {
        let dir  = tempfile::tempdir().unwrap();
        let data = write_table(dir.path(), (1..=10).map(|x| format!("{x},3.3")));

        let err = TrainUseCase::new(line_config(), &data, dir.path().join("out"))
            .execute()
            .unwrap_err();
        assert!(matches!(
            pipeline_error(&err),
            PipelineError::UndefinedMetric { metric: "R²", .. }
        ));
    }

    #[test]
    fn test_all_missing_feature_is_invalid_column() {
        let dir  = tempfile::tempdir().unwrap();
        let data = write_table(dir.path(), (1..=10).map(|x| format!(",{x}")));

        let err = TrainUseCase::new(line_config(), &data, dir.path().join("out"))
            .execute()
            .unwrap_err();
        assert!(matches!(
            pipeline_error(&err),
            PipelineError::InvalidColumn { column, .. } if column == "x"
        ));
    }

    #[test]
    fn test_missing_file_is_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = TrainUseCase::new(line_config(), dir.path().join("nope.csv"), dir.path())
            .execute()
            .unwrap_err();
        assert!(matches!(pipeline_error(&err), PipelineError::FileNotFound(_)));
    }

    #[test]
    fn test_invalid_fraction_is_rejected_before_loading() {
        let cfg = PipelineConfig { test_fraction: 1.5, ..line_config() };
        let err = TrainUseCase::new(cfg, "unused.csv", "unused").execute().unwrap_err();
        assert!(matches!(pipeline_error(&err), PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir  = tempfile::tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        let file = PipelineConfig { seed: 7, test_fraction: 0.3, ..line_config() };
        fs::write(&path, serde_json::to_string(&file).unwrap()).unwrap();

        let request = TrainRequest {
            data_path:   "data.csv".into(),
            output_dir:  "out".into(),
            config_file: Some(path),
            overrides:   ConfigOverrides { seed: Some(99), ..ConfigOverrides::default() },
        };
        let use_case = request.into_use_case().unwrap();
        assert_eq!(use_case.config.seed, 99);
        assert_eq!(use_case.config.test_fraction, 0.3);
        assert_eq!(use_case.config.schema, line_config().schema);
    }

    struct InMemory(crate::domain::record::Dataset);

    impl DatasetSource for InMemory {
        fn load(&self) -> crate::domain::error::Result<crate::domain::record::Dataset> {
            Ok(self.0.clone())
        }
    }

    #[test]
    fn test_runs_against_in_memory_source() {
        use crate::domain::record::{Cell, Dataset, Record};

        let records = (0..10)
            .map(|i| {
                let x = i as f64;
                let xc = if i == 3 { Cell::Missing } else { Cell::Number(x) };
                Record::new(vec![xc, Cell::Number(0.5 * x - 1.0)])
            })
            .collect();
        let source = InMemory(Dataset::new(line_config().schema, records));

        let dir     = tempfile::tempdir().unwrap();
        let outcome = TrainUseCase::new(line_config(), "memory", dir.path())
            .execute_with(&source)
            .unwrap();
        assert_eq!(outcome.report.imputed.len(), 1);
        assert_eq!(outcome.report.imputed[0].column, "x");
        assert_eq!(outcome.report.rows, 10);
    }

    #[test]
    fn test_no_config_file_uses_restaurant_defaults() {
        let cfg = base_config(None).unwrap();
        assert_eq!(cfg, PipelineConfig::default());
    }
}
