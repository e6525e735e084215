use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use fruit_nn::config::RunConfig;
use fruit_nn::data::synthetic::synthetic_fruits;
use fruit_nn::logging::init_logging;
use fruit_nn::pipeline::{self, RunOutcome};

#[derive(Parser)]
#[command(version, about = "Train a small fruit colour classifier and plot its decision regions")]
struct Cli {
    /// Log at debug level (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Train on the tab-delimited files listed in a JSON run config
    Train {
        #[arg(short, long, value_name = "PATH")]
        config: PathBuf,
        /// Override the configured number of epochs
        #[arg(short, long, value_name = "INT")]
        epochs: Option<usize>,
        /// Override the configured plot destination
        #[arg(short, long, value_name = "PATH")]
        plot: Option<PathBuf>,
    },
    /// Train on built-in synthetic apples, bananas and grapes
    Demo {
        #[arg(short, long, value_name = "INT", default_value_t = 300)]
        epochs: usize,
        #[arg(long, value_name = "INT", default_value_t = 20)]
        per_class: usize,
        #[arg(short, long, value_name = "INT")]
        seed: Option<u64>,
        #[arg(short, long, value_name = "PATH")]
        plot: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose).context("installing the log subscriber")?;

    let outcome = match cli.command {
        Command::Train { config, epochs, plot } => {
            let mut run = RunConfig::load_json(&config)
                .with_context(|| format!("loading run config {}", config.display()))?;
            if let Some(epochs) = epochs {
                run.train.config.epochs = epochs;
            }
            if plot.is_some() {
                run.plot.output = plot;
            }
            pipeline::run(&run).context("training run failed")?
        }
        Command::Demo { epochs, per_class, seed, plot } => {
            let mut run = RunConfig::default_fruits();
            run.train.config.epochs = epochs;
            run.train.config.seed = seed;
            run.plot.output = plot;
            let categories = synthetic_fruits(per_class, run.data.features);
            pipeline::run_on(categories, &run).context("demo run failed")?
        }
    };

    report(&outcome)
}

fn report(outcome: &RunOutcome) -> Result<()> {
    if let Some(last) = outcome.history.last() {
        println!("epochs: {}  final loss: {:.6}", last.epoch, last.eval_loss);
    }
    println!("training accuracy: {:.1}%", outcome.accuracy * 100.0);
    for class in 1..=outcome.dataset.num_classes() {
        let name = outcome.dataset.class_name(class).unwrap_or("?");
        let mut correct = 0;
        let mut total = 0;
        for sample in outcome.dataset.category(class) {
            total += 1;
            if outcome.network.predict(&sample.features)? == class {
                correct += 1;
            }
        }
        println!("  {:<10} {}/{}", name, correct, total);
    }
    Ok(())
}
