// ============================================================
// Layer 1 - CLI Commands and Arguments
// ============================================================
// Defines the four subcommands and their flags.
//
// Run-config flags of `train` are optional: when one is absent
// the value from --config (or the built-in default) is used.

use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::application::train_use_case::{ConfigOverrides, TrainRequest};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the rating model on a CSV file and write the report
    Train(TrainArgs),

    /// Predict ratings for new rows with a saved model
    Predict(PredictArgs),

    /// Expected rating change when one feature changes
    Impact(ImpactArgs),

    /// Print summary statistics of the modelled columns
    Describe(DescribeArgs),
}

#[derive(Args, Debug)]
pub struct TrainArgs {
    /// Input CSV with the restaurant columns (or the --config schema)
    #[arg(long)]
    pub data: PathBuf,

    /// Where model.json, run_config.json and the report are written
    #[arg(long, default_value = "results")]
    pub output_dir: PathBuf,

    /// JSON run config used as the base; flags below override it
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed of the train/test shuffle [default: 42]
    #[arg(long)]
    pub seed: Option<u64>,

    /// Share of rows held out for testing [default: 0.2]
    #[arg(long)]
    pub test_fraction: Option<f64>,

    /// Condition number of XᵀX above which the pseudo-inverse
    /// is used [default: 1e12]
    #[arg(long)]
    pub condition_limit: Option<f64>,

    /// Field delimiter [default: ,]
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Number of sample predictions to show [default: 10]
    #[arg(long)]
    pub show: Option<usize>,
}

/// The application layer never sees clap types.
impl From<TrainArgs> for TrainRequest {
    fn from(a: TrainArgs) -> Self {
        TrainRequest {
            data_path:   a.data,
            output_dir:  a.output_dir,
            config_file: a.config,
            overrides:   ConfigOverrides {
                seed:             a.seed,
                test_fraction:    a.test_fraction,
                condition_limit:  a.condition_limit,
                delimiter:        a.delimiter,
                show_predictions: a.show,
            },
        }
    }
}

#[derive(Args, Debug)]
pub struct PredictArgs {
    /// CSV of rows to predict; the target column may be absent
    #[arg(long)]
    pub data: PathBuf,

    /// Output directory of a previous `train` run
    #[arg(long, default_value = "results")]
    pub model_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct ImpactArgs {
    /// Feature name exactly as in the schema, e.g. "Price range"
    #[arg(long)]
    pub feature: String,

    /// Change applied to the feature
    #[arg(long, default_value_t = 1.0, allow_negative_numbers = true)]
    pub change: f64,

    #[arg(long, default_value = "results")]
    pub model_dir: PathBuf,
}

#[derive(Args, Debug)]
pub struct DescribeArgs {
    #[arg(long)]
    pub data: PathBuf,

    /// JSON run config supplying the schema and delimiter
    #[arg(long)]
    pub config: Option<PathBuf>,
}
