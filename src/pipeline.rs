use tracing::info;

use crate::config::RunConfig;
use crate::data::dataset::Dataset;
use crate::data::loader::{load_categories, Category};
use crate::error::Result;
use crate::network::network::Network;
use crate::plot::render::save_decision_plot;
use crate::train::epoch_stats::EpochStats;
use crate::train::loop_fn::{accuracy, train_loop};

/// What a finished run hands back.
pub struct RunOutcome {
    pub network: Network,
    pub dataset: Dataset,
    pub history: Vec<EpochStats>,
    pub accuracy: f64,
}

/// load → encode → build → train → plot, with the files named in `config`.
pub fn run(config: &RunConfig) -> Result<RunOutcome> {
    config.validate()?;
    let categories = load_categories(&config.data.categories, config.data.features)?;
    run_on(categories, config)
}

/// Same as [`run`] but with samples that are already in memory.
pub fn run_on(categories: Vec<Category>, config: &RunConfig) -> Result<RunOutcome> {
    let mut dataset = Dataset::from_categories(categories)?;
    info!(
        samples = dataset.len(),
        classes = dataset.num_classes(),
        features = dataset.feature_dim(),
        "dataset ready"
    );

    let mut network = match config.train.config.seed {
        Some(seed) => Network::seeded(config.network.clone(), seed)?,
        None => Network::new(config.network.clone())?,
    };
    let mut optimizer = config.train.optimizer.build();

    let history = train_loop(&mut network, &mut dataset, optimizer.as_mut(), &config.train.config)?;
    let accuracy = accuracy(&network, &dataset)?;
    info!(accuracy, "training finished");

    if let Some(path) = &config.plot.output {
        save_decision_plot(&network, &dataset, &config.plot.config, path)?;
    }

    Ok(RunOutcome { network, dataset, history, accuracy })
}
