use serde::{Serialize, Deserialize};

use crate::error::Result;
use crate::layers::dense::{Layer, LayerGradients};
use crate::optim::adam::Adam;
use crate::optim::sgd::Sgd;

/// An update rule that moves a layer's parameters against its gradients.
///
/// The trainer calls `begin_step` once per sample, then `step` once for every
/// layer with that layer's index, so stateful rules can keep per-layer
/// statistics.
pub trait Optimizer {
    fn begin_step(&mut self) {}

    fn step(&mut self, layer_index: usize, layer: &mut Layer, grads: &LayerGradients) -> Result<()>;

    fn learning_rate(&self) -> f64;
}

/// Serializable choice of update rule, as written in a run config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OptimizerConfig {
    Sgd {
        learning_rate: f64,
        #[serde(default)]
        momentum: f64,
    },
    Adam {
        learning_rate: f64,
        #[serde(default = "default_beta1")]
        beta1: f64,
        #[serde(default = "default_beta2")]
        beta2: f64,
        #[serde(default = "default_epsilon")]
        epsilon: f64,
    },
}

fn default_beta1() -> f64 { 0.9 }
fn default_beta2() -> f64 { 0.999 }
fn default_epsilon() -> f64 { 1e-8 }

impl OptimizerConfig {
    pub fn adam(learning_rate: f64) -> OptimizerConfig {
        OptimizerConfig::Adam {
            learning_rate,
            beta1: default_beta1(),
            beta2: default_beta2(),
            epsilon: default_epsilon(),
        }
    }

    pub fn build(&self) -> Box<dyn Optimizer> {
        match *self {
            OptimizerConfig::Sgd { learning_rate, momentum } => {
                Box::new(Sgd::with_momentum(learning_rate, momentum))
            }
            OptimizerConfig::Adam { learning_rate, beta1, beta2, epsilon } => {
                Box::new(Adam::with_params(learning_rate, beta1, beta2, epsilon))
            }
        }
    }
}

impl Default for OptimizerConfig {
    fn default() -> Self {
        OptimizerConfig::adam(0.01)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn configs_read_from_json_with_defaults() {
        let sgd: OptimizerConfig = serde_json::from_str(r#"{ "kind": "sgd", "learning_rate": 0.1 }"#).unwrap();
        assert_eq!(sgd, OptimizerConfig::Sgd { learning_rate: 0.1, momentum: 0.0 });

        let adam: OptimizerConfig = serde_json::from_str(r#"{ "kind": "adam", "learning_rate": 0.01 }"#).unwrap();
        assert_eq!(adam, OptimizerConfig::adam(0.01));
        assert_eq!(adam.build().learning_rate(), 0.01);
    }
}
