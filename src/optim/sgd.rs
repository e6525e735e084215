use crate::error::Result;
use crate::layers::dense::{Layer, LayerGradients};
use crate::optim::optimizer::Optimizer;

/// Gradient descent, optionally with classical momentum.
///
/// With `momentum == 0.0` each step is `θ ← θ - lr · g`. Otherwise a
/// velocity `v ← μ·v + g` is kept per parameter and `θ ← θ - lr · v`.
pub struct Sgd {
    pub learning_rate: f64,
    pub momentum: f64,
    velocities: Vec<Option<LayerGradients>>,
}

impl Sgd {
    pub fn new(learning_rate: f64) -> Sgd {
        Sgd::with_momentum(learning_rate, 0.0)
    }

    pub fn with_momentum(learning_rate: f64, momentum: f64) -> Sgd {
        Sgd { learning_rate, momentum, velocities: Vec::new() }
    }
}

impl Optimizer for Sgd {
    fn step(&mut self, layer_index: usize, layer: &mut Layer, grads: &LayerGradients) -> Result<()> {
        grads.check_shape(layer)?;
        if self.momentum == 0.0 {
            return layer.apply_gradients(grads, self.learning_rate);
        }

        let (lr, momentum) = (self.learning_rate, self.momentum);
        if self.velocities.len() <= layer_index {
            self.velocities.resize(layer_index + 1, None);
        }
        let slot = &mut self.velocities[layer_index];
        // a layer of a different shape starts from rest
        if slot.as_ref().is_some_and(|v| v.check_shape(layer).is_err()) {
            *slot = None;
        }
        let velocity = slot.get_or_insert_with(|| LayerGradients::zeros_like(layer));

        velocity.weights = velocity.weights.map(|v| v * momentum);
        velocity.weights.scaled_add(&grads.weights, 1.0)?;
        for (v, g) in velocity.biases.iter_mut().zip(&grads.biases) {
            *v = momentum * *v + g;
        }

        layer.apply_gradients(velocity, lr)
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::math::matrix::Matrix;

    fn layer() -> Layer {
        Layer::from_parts(Matrix::zeros(1, 2), vec![0.0], ActivationFunction::Identity).unwrap()
    }

    fn grads() -> LayerGradients {
        LayerGradients {
            weights: Matrix::from_rows(vec![vec![1.0, -2.0]]).unwrap(),
            biases: vec![0.5],
        }
    }

    #[test]
    fn plain_step_moves_against_gradient() {
        let mut l = layer();
        let mut opt = Sgd::new(0.1);
        opt.step(0, &mut l, &grads()).unwrap();
        assert_eq!(l.weights.data[0], vec![-0.1, 0.2]);
        assert_eq!(l.biases, vec![-0.05]);
    }

    #[test]
    fn momentum_accumulates_velocity() {
        let mut l = layer();
        let mut opt = Sgd::with_momentum(1.0, 0.5);
        opt.step(0, &mut l, &grads()).unwrap();
        opt.step(0, &mut l, &grads()).unwrap();
        // v1 = g, v2 = 1.5 g; total displacement 2.5 g
        assert!((l.biases[0] + 1.25).abs() < 1e-12);
        assert!((l.weights.data[0][1] - 5.0).abs() < 1e-12);
    }

    #[test]
    fn mismatched_gradients_are_rejected() {
        let mut l = layer();
        let narrow = LayerGradients { weights: Matrix::zeros(1, 1), biases: vec![0.0] };
        assert!(Sgd::new(0.1).step(0, &mut l, &narrow).is_err());
        assert!(Sgd::with_momentum(0.1, 0.9).step(0, &mut l, &narrow).is_err());
    }

    #[test]
    fn velocity_resets_when_layer_shape_changes() {
        let mut opt = Sgd::with_momentum(1.0, 0.5);
        let mut small = layer();
        opt.step(0, &mut small, &grads()).unwrap();

        let mut wide = Layer::from_parts(Matrix::zeros(2, 3), vec![0.0; 2], ActivationFunction::Identity).unwrap();
        let wide_grads = LayerGradients { weights: Matrix::zeros(2, 3), biases: vec![1.0, -1.0] };
        opt.step(0, &mut wide, &wide_grads).unwrap();
        assert_eq!(wide.biases, vec![-1.0, 1.0]);
    }
}
