use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::activation::activation::Normalization;
use crate::error::{check_dim, NnError, Result};
use crate::layers::dense::{Layer, LayerGradients};
use crate::loss::loss_type::LossType;
use crate::math::matrix::Matrix;
use crate::network::spec::NetworkSpec;

/// An ordered chain of dense layers, optionally followed by a normalization.
///
/// Construction guarantees that every layer's `input_size` equals the
/// previous layer's `size`, so the only shape check left at call time is the
/// input length.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    normalization: Option<Normalization>,
}

impl Network {
    /// Builds a network with weights drawn from the thread RNG.
    pub fn new(spec: NetworkSpec) -> Result<Network> {
        Network::with_rng(spec, &mut rand::thread_rng())
    }

    /// Builds a network whose initial weights depend only on `seed`.
    pub fn seeded(spec: NetworkSpec, seed: u64) -> Result<Network> {
        Network::with_rng(spec, &mut StdRng::seed_from_u64(seed))
    }

    pub fn with_rng<R: Rng + ?Sized>(spec: NetworkSpec, rng: &mut R) -> Result<Network> {
        let layers = spec.layers.iter()
            .map(|l| Layer::with_rng(l.input_size, l.size, l.activation, rng))
            .collect();
        Network::from_layers(layers, spec.normalization)
    }

    /// Chains pre-built layers, rejecting empty or inconsistent chains.
    pub fn from_layers(layers: Vec<Layer>, normalization: Option<Normalization>) -> Result<Network> {
        if layers.is_empty() {
            return Err(NnError::Config("a network needs at least one layer".into()));
        }
        if let Some(index) = layers.iter().position(|l| l.input_size == 0 || l.size == 0) {
            return Err(NnError::Config(format!("layer {} has zero width", index)));
        }
        for (index, pair) in layers.windows(2).enumerate() {
            if pair[0].size != pair[1].input_size {
                return Err(NnError::LayerMismatch {
                    index: index + 1,
                    expected: pair[0].size,
                    got: pair[1].input_size,
                });
            }
        }
        Ok(Network { layers, normalization })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn input_dim(&self) -> usize {
        self.layers[0].input_size
    }

    pub fn output_dim(&self) -> usize {
        self.layers[self.layers.len() - 1].size
    }

    pub fn parameter_count(&self) -> usize {
        self.layers.iter().map(Layer::parameter_count).sum()
    }

    /// Pure forward pass: each layer in turn, then the normalization if any.
    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_dim(self.input_dim(), input.len())?;
        let mut current = input.to_vec();
        for layer in &self.layers {
            current = layer.forward(&current)?;
        }
        Ok(match self.normalization {
            Some(norm) => norm.apply(&current),
            None => current,
        })
    }

    /// Forward pass over a batch whose rows are samples.
    pub fn forward_batch(&self, inputs: &Matrix) -> Result<Matrix> {
        check_dim(self.input_dim(), inputs.cols)?;
        let mut current = inputs.clone();
        for layer in &self.layers {
            current = layer.forward_batch(&current)?;
        }
        if let Some(norm) = self.normalization {
            current.data = current.data.iter().map(|row| norm.apply(row)).collect();
        }
        Ok(current)
    }

    /// 1-based class of the largest output.
    pub fn predict(&self, input: &[f64]) -> Result<usize> {
        let output = self.forward(input)?;
        Ok(crate::data::encoder::decode(&output))
    }

    /// Loss and per-layer gradients for a single `(input, target)` pair,
    /// by reverse-mode differentiation through the chain.
    pub fn backprop(
        &self,
        input: &[f64],
        target: &[f64],
        loss: LossType,
    ) -> Result<(f64, Vec<LayerGradients>)> {
        check_dim(self.input_dim(), input.len())?;
        check_dim(self.output_dim(), target.len())?;

        let mut caches = Vec::with_capacity(self.layers.len());
        let mut current = input.to_vec();
        for layer in &self.layers {
            let cache = layer.forward_cached(&current)?;
            current = cache.output.clone();
            caches.push(cache);
        }

        let output = match self.normalization {
            Some(norm) => norm.apply(&current),
            None => current,
        };

        let value = loss.loss(&output, target);
        let mut grad = loss.derivative(&output, target);
        if let Some(norm) = self.normalization {
            grad = norm.backward(&output, &grad);
        }

        let mut grads = Vec::with_capacity(self.layers.len());
        for (layer, cache) in self.layers.iter().zip(&caches).rev() {
            let (layer_grads, input_grad) = layer.backward(cache, &grad)?;
            grads.push(layer_grads);
            grad = input_grad;
        }
        grads.reverse();

        Ok((value, grads))
    }
}
