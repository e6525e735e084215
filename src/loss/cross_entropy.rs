/// Categorical cross-entropy, meant for a softmax-normalized output.
pub struct CrossEntropyLoss;

/// Keeps log() finite when a probability underflows to zero.
const EPS: f64 = 1e-12;

impl CrossEntropyLoss {
    /// L = -sum(expected[i] * log(predicted[i] + eps))
    pub fn loss(predicted: &[f64], expected: &[f64]) -> f64 {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| -e * (p + EPS).ln())
            .sum()
    }

    /// ∂L/∂p_i = -expected[i] / (predicted[i] + eps)
    ///
    /// This is the gradient with respect to the probabilities; the softmax
    /// Jacobian is applied afterwards by the network's backward pass.
    pub fn derivative(predicted: &[f64], expected: &[f64]) -> Vec<f64> {
        predicted.iter().zip(expected.iter())
            .map(|(p, e)| -e / (p + EPS))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn confident_correct_prediction_has_low_loss() {
        let good = CrossEntropyLoss::loss(&[0.98, 0.01, 0.01], &[1.0, 0.0, 0.0]);
        let bad = CrossEntropyLoss::loss(&[0.01, 0.98, 0.01], &[1.0, 0.0, 0.0]);
        assert!(good < 0.05);
        assert!(bad > 4.0);
    }
}
