// ============================================================
// Layer 1 - CLI / Presentation Layer
// ============================================================
// Entry point for all user interaction. Parses arguments with
// clap, hands off to a Layer 2 use case and prints the result.
//
// Commands:
//   1. `train`    - fit the model, print and save the report
//   2. `predict`  - rate new rows with a saved model
//   3. `impact`   - weight × change for one feature
//   4. `describe` - column statistics of a CSV file

pub mod commands;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, DescribeArgs, ImpactArgs, PredictArgs, TrainArgs};

#[derive(Parser, Debug)]
#[command(
    name = "rating-predictor",
    version,
    about = "Predict restaurant aggregate ratings with closed-form linear regression."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Route to the matching use case; no computation happens here.
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Train(args)    => run_train(args),
            Commands::Predict(args)  => run_predict(args),
            Commands::Impact(args)   => run_impact(args),
            Commands::Describe(args) => run_describe(args),
        }
    }
}

fn run_train(args: TrainArgs) -> Result<()> {
    use crate::application::train_use_case::TrainRequest;

    tracing::info!("Starting training on: {}", args.data.display());
    let use_case = TrainRequest::from(args).into_use_case()?;
    let outcome  = use_case.execute()?;

    println!("{}", outcome.report.render());
    for path in &outcome.artifacts {
        println!("Saved {}", path.display());
    }
    Ok(())
}

fn run_predict(args: PredictArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case    = PredictUseCase::new(&args.model_dir)?;
    let predictions = use_case.predict_file(&args.data)?;

    println!("row,predicted");
    for (i, p) in predictions.iter().enumerate() {
        println!("{},{:.4}", i + 1, p);
    }
    Ok(())
}

fn run_impact(args: ImpactArgs) -> Result<()> {
    use crate::application::predict_use_case::PredictUseCase;

    let use_case = PredictUseCase::new(&args.model_dir)?;
    let delta    = use_case.impact(&args.feature, args.change)?;

    println!(
        "Changing '{}' by {} changes the predicted rating by {:+.4}",
        args.feature, args.change, delta
    );
    Ok(())
}

fn run_describe(args: DescribeArgs) -> Result<()> {
    use crate::application::describe_use_case::{render, DescribeUseCase};
    use crate::application::train_use_case::base_config;

    let config   = base_config(args.config.as_deref())?;
    let use_case = DescribeUseCase::new(config, &args.data);
    let columns  = use_case.execute()?;

    println!("Statistics for '{}'", use_case.data_path().display());
    print!("{}", render(&columns));
    Ok(())
}
