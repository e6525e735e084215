use rand::Rng;

use crate::activation::activation::ActivationFunction;
use crate::error::{check_dim, NnError, Result};
use crate::math::matrix::Matrix;

/// Fully connected layer computing `activation(W·x + b)`.
///
/// `weights` is `size × input_size`, `biases` has length `size`. The shape is
/// fixed at construction; training only changes the values.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer{
    pub input_size: usize,
    pub size: usize,
    pub weights: Matrix,
    pub biases: Vec<f64>,
    pub activator: ActivationFunction
}

/// Values recorded by a forward pass that backprop needs.
#[derive(Debug, Clone)]
pub struct LayerCache {
    pub input: Vec<f64>,
    /// Pre-activation `z = W·x + b`.
    pub pre_activation: Vec<f64>,
    pub output: Vec<f64>,
}

/// ∂L/∂W and ∂L/∂b for one layer, shaped like the layer's parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerGradients {
    pub weights: Matrix,
    pub biases: Vec<f64>,
}

impl LayerGradients {
    pub fn zeros_like(layer: &Layer) -> LayerGradients {
        LayerGradients {
            weights: Matrix::zeros(layer.size, layer.input_size),
            biases: vec![0.0; layer.size],
        }
    }

    /// Errors unless these gradients have exactly the shape of `layer`'s
    /// parameters.
    pub fn check_shape(&self, layer: &Layer) -> Result<()> {
        check_dim(layer.size, self.biases.len())?;
        check_dim(layer.size, self.weights.data.len())?;
        for row in &self.weights.data {
            check_dim(layer.input_size, row.len())?;
        }
        Ok(())
    }
}

impl Layer {
    pub fn new(input_size: usize, size: usize, activation: ActivationFunction) -> Layer {
        Layer::with_rng(input_size, size, activation, &mut rand::thread_rng())
    }

    /// Builds a layer drawing its initial weights from `rng`; biases start at zero.
    pub fn with_rng<R: Rng + ?Sized>(
        input_size: usize,
        size: usize,
        activation: ActivationFunction,
        rng: &mut R,
    ) -> Layer {
        let weights = if activation.prefers_he_init() {
            Matrix::he_with(size, input_size, rng)
        } else {
            Matrix::xavier_with(size, input_size, rng)
        };

        Layer {
            input_size,
            size,
            weights,
            biases: vec![0.0; size],
            activator: activation
        }
    }

    /// Builds a layer from explicit parameters, checking that they agree.
    pub fn from_parts(weights: Matrix, biases: Vec<f64>, activation: ActivationFunction) -> Result<Layer> {
        check_dim(weights.rows, biases.len())?;
        if weights.rows == 0 || weights.cols == 0 {
            return Err(NnError::DimensionMismatch { expected: 1, got: 0 });
        }
        Ok(Layer {
            input_size: weights.cols,
            size: weights.rows,
            weights,
            biases,
            activator: activation,
        })
    }

    fn affine(&self, input: &[f64]) -> Result<Vec<f64>> {
        check_dim(self.input_size, input.len())?;
        let mut z = self.weights.mul_vec(input)?;
        for (v, b) in z.iter_mut().zip(&self.biases) {
            *v += b;
        }
        Ok(z)
    }

    pub fn forward(&self, input: &[f64]) -> Result<Vec<f64>> {
        let z = self.affine(input)?;
        Ok(z.into_iter().map(|x| self.activator.function(x)).collect())
    }

    /// Forward pass that keeps the intermediates for `backward`.
    pub fn forward_cached(&self, input: &[f64]) -> Result<LayerCache> {
        let z = self.affine(input)?;
        let a = z.iter().map(|&x| self.activator.function(x)).collect();
        Ok(LayerCache {
            input: input.to_vec(),
            pre_activation: z,
            output: a,
        })
    }

    /// Evaluates a batch whose rows are samples: `n × input_size` → `n × size`.
    pub fn forward_batch(&self, inputs: &Matrix) -> Result<Matrix> {
        check_dim(self.input_size, inputs.cols)?;
        let mut z = inputs.matmul(&self.weights.transpose())?;
        z.add_row_vector(&self.biases)?;
        Ok(z.map(|x| self.activator.function(x)))
    }

    /// Given ∂L/∂a for this layer's output, returns the parameter gradients
    /// and ∂L/∂x for its input.
    pub fn backward(&self, cache: &LayerCache, output_grad: &[f64]) -> Result<(LayerGradients, Vec<f64>)> {
        check_dim(self.size, output_grad.len())?;
        // δ = ∂L/∂a ⊙ σ'(z)
        let delta: Vec<f64> = output_grad.iter()
            .zip(&cache.pre_activation)
            .map(|(g, &z)| g * self.activator.derivative(z))
            .collect();

        let input_grad = self.weights.transpose_mul_vec(&delta)?;
        let grads = LayerGradients {
            weights: Matrix::outer(&delta, &cache.input),
            biases: delta,
        };

        Ok((grads, input_grad))
    }

    /// Plain gradient step: `θ ← θ - lr · ∂L/∂θ`.
    pub fn apply_gradients(&mut self, grads: &LayerGradients, lr: f64) -> Result<()> {
        grads.check_shape(self)?;
        self.weights.scaled_add(&grads.weights, -lr)?;
        for (b, g) in self.biases.iter_mut().zip(&grads.biases) {
            *b -= lr * g;
        }
        Ok(())
    }

    pub fn parameter_count(&self) -> usize {
        self.weights.len() + self.biases.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn fixed_layer() -> Layer {
        let w = Matrix::from_rows(vec![vec![1.0, -1.0], vec![0.5, 2.0], vec![0.0, 1.0]]).unwrap();
        Layer::from_parts(w, vec![0.1, 0.0, -0.5], ActivationFunction::Identity).unwrap()
    }

    #[test]
    fn forward_is_affine_then_activation() {
        let layer = fixed_layer();
        let out = layer.forward(&[2.0, 1.0]).unwrap();
        assert_eq!(out, vec![1.1, 3.0, 0.5]);
    }

    #[test]
    fn forward_rejects_wrong_input_length() {
        let layer = Layer::with_rng(2, 4, ActivationFunction::Sigmoid, &mut StdRng::seed_from_u64(1));
        assert_eq!(layer.forward(&[0.1, 0.2]).unwrap().len(), 4);
        for bad in [vec![], vec![0.1], vec![0.1, 0.2, 0.3]] {
            assert!(matches!(
                layer.forward(&bad),
                Err(NnError::DimensionMismatch { expected: 2, .. })
            ));
        }
    }

    #[test]
    fn new_layers_start_with_zero_bias() {
        let layer = Layer::new(3, 5, ActivationFunction::ReLU);
        assert_eq!((layer.weights.rows, layer.weights.cols), (5, 3));
        assert!(layer.biases.iter().all(|&b| b == 0.0));
        assert_eq!(layer.parameter_count(), 20);
    }

    #[test]
    fn from_parts_rejects_mismatched_bias() {
        let w = Matrix::zeros(3, 2);
        assert!(Layer::from_parts(w, vec![0.0; 2], ActivationFunction::Identity).is_err());
    }

    #[test]
    fn batch_rows_match_single_forward() {
        let layer = Layer::with_rng(2, 3, ActivationFunction::Tanh, &mut StdRng::seed_from_u64(3));
        let batch = Matrix::from_rows(vec![vec![0.1, 0.9], vec![0.5, 0.5], vec![1.0, 0.0]]).unwrap();
        let out = layer.forward_batch(&batch).unwrap();
        assert_eq!((out.rows, out.cols), (3, 3));
        for i in 0..batch.rows {
            let single = layer.forward(batch.row(i)).unwrap();
            for (a, b) in single.iter().zip(out.row(i)) {
                assert!((a - b).abs() < 1e-12);
            }
        }
    }

    #[test]
    fn backward_shapes_and_bias_gradient() {
        let layer = fixed_layer();
        let cache = layer.forward_cached(&[2.0, 1.0]).unwrap();
        let (grads, input_grad) = layer.backward(&cache, &[1.0, 0.0, 2.0]).unwrap();
        assert_eq!(grads.biases, vec![1.0, 0.0, 2.0]);
        assert_eq!(grads.weights.data[2], vec![4.0, 2.0]);
        // Wᵀ·δ
        assert_eq!(input_grad, vec![1.0, 1.0]);
    }

    #[test]
    fn gradients_must_match_layer_shape() {
        let mut layer = fixed_layer();
        let before = layer.clone();
        let narrow = LayerGradients { weights: Matrix::zeros(3, 1), biases: vec![0.0; 3] };
        assert!(narrow.check_shape(&layer).is_err());
        assert!(layer.apply_gradients(&narrow, 0.1).is_err());
        assert_eq!(layer, before);
        assert!(LayerGradients::zeros_like(&layer).check_shape(&layer).is_ok());
    }
}
