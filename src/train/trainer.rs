use rand::Rng;

use crate::data::dataset::{Dataset, Sample};
use crate::error::{check_dim, NnError, Result};
use crate::loss::loss_type::LossType;
use crate::network::network::Network;
use crate::optim::optimizer::Optimizer;

/// One update from a single sample: backprop, then one optimizer step per
/// layer. Returns the sample's loss before the update.
pub fn train_sample(
    network: &mut Network,
    sample: &Sample,
    optimizer: &mut dyn Optimizer,
    loss: LossType,
) -> Result<f64> {
    let (value, grads) = network.backprop(&sample.features, &sample.target, loss)?;

    optimizer.begin_step();
    for (i, (layer, layer_grads)) in network.layers_mut().iter_mut().zip(&grads).enumerate() {
        optimizer.step(i, layer, layer_grads)?;
    }

    Ok(value)
}

/// Shuffles `dataset` into a new order, then makes one per-sample pass.
/// Returns the mean loss seen during the pass.
pub fn train_epoch<R: Rng + ?Sized>(
    network: &mut Network,
    dataset: &mut Dataset,
    optimizer: &mut dyn Optimizer,
    loss: LossType,
    rng: &mut R,
) -> Result<f64> {
    dataset.shuffle(rng);
    train_epoch_ordered(network, dataset, optimizer, loss)
}

/// Same pass as `train_epoch` but in the dataset's current order.
pub fn train_epoch_ordered(
    network: &mut Network,
    dataset: &Dataset,
    optimizer: &mut dyn Optimizer,
    loss: LossType,
) -> Result<f64> {
    if dataset.is_empty() {
        return Err(NnError::EmptyDataset);
    }
    check_dim(network.input_dim(), dataset.feature_dim())?;

    let mut total_loss = 0.0;
    for sample in dataset.samples() {
        total_loss += train_sample(network, sample, optimizer, loss)?;
    }

    Ok(total_loss / dataset.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::Category;
    use crate::network::spec::NetworkSpec;
    use crate::optim::sgd::Sgd;

    fn dataset() -> Dataset {
        Dataset::from_categories(vec![
            Category { name: "a".into(), features: vec![vec![0.9, 0.1]] },
            Category { name: "b".into(), features: vec![vec![0.9, 0.9]] },
            Category { name: "c".into(), features: vec![vec![0.1, 0.5]] },
        ]).unwrap()
    }

    #[test]
    fn a_sample_step_mutates_every_layer() {
        let mut net = Network::seeded(NetworkSpec::fruit_classifier(2), 2).unwrap();
        let before = net.clone();
        let ds = dataset();
        train_sample(&mut net, &ds.samples()[0], &mut Sgd::new(0.5), LossType::Mse).unwrap();
        for (a, b) in before.layers().iter().zip(net.layers()) {
            assert_ne!(a.weights, b.weights);
            assert_ne!(a.biases, b.biases);
        }
    }

    #[test]
    fn ordered_epochs_are_reproducible() {
        let ds = dataset();
        let mut a = Network::seeded(NetworkSpec::fruit_classifier(2), 8).unwrap();
        let mut b = a.clone();
        let la = train_epoch_ordered(&mut a, &ds, &mut Sgd::new(0.1), LossType::Mse).unwrap();
        let lb = train_epoch_ordered(&mut b, &ds, &mut Sgd::new(0.1), LossType::Mse).unwrap();
        assert_eq!(la, lb);
        assert_eq!(a, b);
    }

    #[test]
    fn feature_width_must_match_network() {
        let ds = dataset();
        let mut net = Network::seeded(NetworkSpec::fruit_classifier(3), 1).unwrap();
        let err = train_epoch_ordered(&mut net, &ds, &mut Sgd::new(0.1), LossType::Mse).unwrap_err();
        assert!(matches!(err, NnError::DimensionMismatch { expected: 3, got: 2 }));
    }
}
