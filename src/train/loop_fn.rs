use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug, info, warn};

use crate::data::dataset::Dataset;
use crate::data::encoder::argmax;
use crate::error::{check_dim, NnError, Result};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::optim::optimizer::Optimizer;
use crate::train::epoch_stats::EpochStats;
use crate::train::train_config::TrainConfig;
use crate::train::trainer::{train_epoch, train_epoch_ordered};

// ---------------------------------------------------------------------------
// Public entry point
// ---------------------------------------------------------------------------

/// Trains `network` for `config.epochs` epochs and returns one `EpochStats`
/// per epoch.
///
/// The network is modified in place. Non-finite losses are reported with a
/// warning and training carries on; choosing a stable step size is up to the
/// caller.
pub fn train_loop(
    network: &mut Network,
    dataset: &mut Dataset,
    optimizer: &mut dyn Optimizer,
    config: &TrainConfig,
) -> Result<Vec<EpochStats>> {
    if dataset.is_empty() {
        return Err(NnError::EmptyDataset);
    }
    check_dim(network.input_dim(), dataset.feature_dim())?;
    check_dim(network.output_dim(), dataset.num_classes())?;

    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    info!(
        epochs = config.epochs,
        samples = dataset.len(),
        parameters = network.parameter_count(),
        learning_rate = optimizer.learning_rate(),
        loss = ?config.loss_type,
        "training started"
    );

    let mut history = Vec::with_capacity(config.epochs);
    let mut warned = false;

    for epoch in 1..=config.epochs {
        let t_start = Instant::now();

        let train_loss = if config.shuffle {
            train_epoch(network, dataset, optimizer, config.loss_type, &mut rng)?
        } else {
            train_epoch_ordered(network, dataset, optimizer, config.loss_type)?
        };

        let eval_loss = evaluate(network, dataset, config.loss_type)?;
        let acc = accuracy(network, dataset)?;
        let elapsed_ms = t_start.elapsed().as_millis() as u64;

        if !eval_loss.is_finite() && !warned {
            warn!(epoch, "loss is no longer finite; the step size is probably too large");
            warned = true;
        }

        if config.log_every > 0 && (epoch % config.log_every == 0 || epoch == config.epochs) {
            info!(epoch, train_loss, eval_loss, accuracy = acc, "epoch finished");
        } else {
            debug!(epoch, train_loss, eval_loss, accuracy = acc, "epoch finished");
        }

        history.push(EpochStats {
            epoch,
            total_epochs: config.epochs,
            train_loss,
            eval_loss,
            accuracy: acc,
            elapsed_ms,
        });
    }

    Ok(history)
}

/// Mean loss over the full dataset, without updating anything.
pub fn evaluate(network: &Network, dataset: &Dataset, loss: LossType) -> Result<f64> {
    if dataset.is_empty() {
        return Err(NnError::EmptyDataset);
    }
    let mut total = 0.0;
    for sample in dataset.samples() {
        let output = network.forward(&sample.features)?;
        total += loss.loss(&output, &sample.target);
    }
    Ok(total / dataset.len() as f64)
}

/// Fraction of samples whose arg-max output is their true class.
pub fn accuracy(network: &Network, dataset: &Dataset) -> Result<f64> {
    if dataset.is_empty() {
        return Err(NnError::EmptyDataset);
    }
    let mut correct = 0usize;
    for sample in dataset.samples() {
        let output = network.forward(&sample.features)?;
        if argmax(&output) + 1 == sample.class {
            correct += 1;
        }
    }
    Ok(correct as f64 / dataset.len() as f64)
}
