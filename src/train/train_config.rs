use serde::{Serialize, Deserialize};

use crate::loss::loss_type::LossType;

/// Configuration for a `train_loop` run.
///
/// # Fields
/// - `epochs`: number of full passes over the dataset; there is no
///   convergence check, the loop always runs them all
/// - `loss_type`: loss minimized by the update rule
/// - `shuffle`: reshuffle the dataset before every epoch
/// - `seed`: seeds the shuffling RNG; `None` seeds it from OS entropy
/// - `log_every`: emit an `info!` line every this many epochs (0 = never)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainConfig {
    pub epochs: usize,
    pub loss_type: LossType,
    pub shuffle: bool,
    pub seed: Option<u64>,
    pub log_every: usize,
}

impl TrainConfig {
    pub fn new(epochs: usize, loss_type: LossType) -> Self {
        TrainConfig {
            epochs,
            loss_type,
            ..TrainConfig::default()
        }
    }

    pub fn seeded(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn without_shuffle(mut self) -> Self {
        self.shuffle = false;
        self
    }
}

impl Default for TrainConfig {
    fn default() -> Self {
        TrainConfig {
            epochs: 500,
            loss_type: LossType::Mse,
            shuffle: true,
            seed: None,
            log_every: 100,
        }
    }
}
