use serde::{Serialize, Deserialize};
use std::f64::consts::E;

/// Element-wise nonlinearity applied after a layer's affine transform.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ActivationFunction {
    Sigmoid,
    ReLU,
    Identity,
    Tanh,
    LeakyReLU { alpha: f64 },
}

impl ActivationFunction {
    pub fn function(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => 1.0 / (1.0 + E.powf(-x)),
            ActivationFunction::ReLU => if x > 0.0 { x } else { 0.0 },
            ActivationFunction::Identity => x,
            ActivationFunction::Tanh => x.tanh(),
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { x } else { alpha * x },
        }
    }

    /// Derivative with respect to the pre-activation value `x`.
    pub fn derivative(&self, x: f64) -> f64 {
        match self {
            ActivationFunction::Sigmoid => {
                let fx = self.function(x);
                fx * (1.0 - fx)
            },
            ActivationFunction::ReLU => if x > 0.0 { 1.0 } else { 0.0 },
            ActivationFunction::Identity => 1.0,
            ActivationFunction::Tanh => {
                let t = x.tanh();
                1.0 - t * t
            }
            ActivationFunction::LeakyReLU { alpha } => if x > 0.0 { 1.0 } else { *alpha },
        }
    }

    /// ReLU-family layers get He initialization, everything else Xavier.
    pub fn prefers_he_init(&self) -> bool {
        matches!(self, ActivationFunction::ReLU | ActivationFunction::LeakyReLU { .. })
    }
}

/// Vector-valued step applied to the final layer's output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Normalization {
    Softmax,
}

impl Normalization {
    pub fn apply(&self, z: &[f64]) -> Vec<f64> {
        match self {
            Normalization::Softmax => softmax(z),
        }
    }

    /// Pulls `grad` (∂L/∂output) back through the normalization, given the
    /// normalized output it produced.
    pub fn backward(&self, output: &[f64], grad: &[f64]) -> Vec<f64> {
        match self {
            Normalization::Softmax => softmax_backward(output, grad),
        }
    }
}

/// Numerically stable softmax: shifts by the maximum before exponentiating.
///
/// The result is non-negative and sums to 1. An empty input yields an empty
/// output.
pub fn softmax(z: &[f64]) -> Vec<f64> {
    let max = z.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = z.iter().map(|&v| (v - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}

/// Jacobian-vector product of softmax: `s ⊙ (g - (g · s))`.
pub fn softmax_backward(s: &[f64], grad: &[f64]) -> Vec<f64> {
    let dot: f64 = s.iter().zip(grad).map(|(a, b)| a * b).sum();
    s.iter().zip(grad).map(|(si, gi)| si * (gi - dot)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn derivatives_match_finite_differences() {
        let h = 1e-6;
        for act in [
            ActivationFunction::Sigmoid,
            ActivationFunction::Tanh,
            ActivationFunction::Identity,
            ActivationFunction::LeakyReLU { alpha: 0.1 },
        ] {
            for &x in &[-2.0, -0.3, 0.4, 1.7] {
                let numeric = (act.function(x + h) - act.function(x - h)) / (2.0 * h);
                assert!((numeric - act.derivative(x)).abs() < 1e-6, "{:?} at {}", act, x);
            }
        }
    }

    #[test]
    fn softmax_handles_large_logits() {
        let s = softmax(&[1000.0, 1000.0, -1000.0]);
        assert!((s[0] - 0.5).abs() < 1e-12);
        assert!((s[1] - 0.5).abs() < 1e-12);
        assert!(s[2] >= 0.0 && s[2] < 1e-12);
    }

    #[test]
    fn softmax_backward_matches_finite_differences() {
        let z = [0.3, -1.2, 2.0];
        let g = [0.5, -0.25, 1.0];
        let s = softmax(&z);
        let analytic = softmax_backward(&s, &g);
        let h = 1e-6;
        for i in 0..z.len() {
            let mut zp = z;
            let mut zm = z;
            zp[i] += h;
            zm[i] -= h;
            let fp: f64 = softmax(&zp).iter().zip(&g).map(|(a, b)| a * b).sum();
            let fm: f64 = softmax(&zm).iter().zip(&g).map(|(a, b)| a * b).sum();
            assert!(((fp - fm) / (2.0 * h) - analytic[i]).abs() < 1e-6);
        }
    }

    proptest! {
        #[test]
        fn softmax_is_a_distribution(z in prop::collection::vec(-50.0f64..50.0, 1..8)) {
            let s = softmax(&z);
            prop_assert_eq!(s.len(), z.len());
            prop_assert!(s.iter().all(|&p| p >= 0.0));
            prop_assert!((s.iter().sum::<f64>() - 1.0).abs() < 1e-6);
        }
    }
}
