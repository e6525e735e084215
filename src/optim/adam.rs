use tracing::debug;

use crate::error::Result;
use crate::layers::dense::{Layer, LayerGradients};
use crate::optim::optimizer::Optimizer;

/// Per-layer first and second moment estimates.
#[derive(Debug, Clone)]
struct Moments {
    m: LayerGradients,
    v: LayerGradients,
}

/// Adam with bias-corrected moment estimates.
pub struct Adam {
    pub learning_rate: f64,
    pub beta1: f64,
    pub beta2: f64,
    pub epsilon: f64,
    t: i32,
    moments: Vec<Option<Moments>>,
}

impl Adam {
    pub fn new(learning_rate: f64) -> Adam {
        Adam::with_params(learning_rate, 0.9, 0.999, 1e-8)
    }

    pub fn with_params(learning_rate: f64, beta1: f64, beta2: f64, epsilon: f64) -> Adam {
        Adam { learning_rate, beta1, beta2, epsilon, t: 0, moments: Vec::new() }
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn step(&mut self, layer_index: usize, layer: &mut Layer, grads: &LayerGradients) -> Result<()> {
        grads.check_shape(layer)?;
        if self.moments.len() <= layer_index {
            self.moments.resize(layer_index + 1, None);
        }
        let slot = &mut self.moments[layer_index];
        if slot.as_ref().is_some_and(|m| m.m.check_shape(layer).is_err()) {
            debug!(layer = layer_index, "layer shape changed, moment estimates reset");
            *slot = None;
        }
        let moments = slot.get_or_insert_with(|| Moments {
            m: LayerGradients::zeros_like(layer),
            v: LayerGradients::zeros_like(layer),
        });

        let t = self.t.max(1);
        let (b1, b2, lr, eps) = (self.beta1, self.beta2, self.learning_rate, self.epsilon);
        let c1 = 1.0 - b1.powi(t);
        let c2 = 1.0 - b2.powi(t);

        let update = |param: &mut f64, m: &mut f64, v: &mut f64, g: f64| {
            *m = b1 * *m + (1.0 - b1) * g;
            *v = b2 * *v + (1.0 - b2) * g * g;
            let m_hat = *m / c1;
            let v_hat = *v / c2;
            *param -= lr * m_hat / (v_hat.sqrt() + eps);
        };

        let weight_rows = layer.weights.data.iter_mut()
            .zip(&grads.weights.data)
            .zip(moments.m.weights.data.iter_mut().zip(moments.v.weights.data.iter_mut()));
        for ((w_row, g_row), (m_row, v_row)) in weight_rows {
            for ((w, &g), (m, v)) in w_row.iter_mut().zip(g_row).zip(m_row.iter_mut().zip(v_row.iter_mut())) {
                update(w, m, v, g);
            }
        }
        let biases = layer.biases.iter_mut()
            .zip(&grads.biases)
            .zip(moments.m.biases.iter_mut().zip(moments.v.biases.iter_mut()));
        for ((b, &g), (m, v)) in biases {
            update(b, m, v, g);
        }
        Ok(())
    }

    fn learning_rate(&self) -> f64 {
        self.learning_rate
    }
}
