use serde::{Serialize, Deserialize};
use crate::activation::activation::{ActivationFunction, Normalization};

/// Describes one layer in a network specification.
///
/// Fields:
/// - `input_size`: number of values feeding into this layer (the previous
///   layer's `size`, or the feature count for the first layer)
/// - `size`: number of neurons, i.e. the layer's output dimension
/// - `activation`: activation function applied after the affine transform
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSpec {
    pub input_size: usize,
    pub size: usize,
    pub activation: ActivationFunction,
}

/// A serializable network architecture: the dense layers in order plus an
/// optional normalization of the final output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSpec {
    /// Ordered list of layer descriptions (input → output).
    pub layers: Vec<LayerSpec>,
    #[serde(default)]
    pub normalization: Option<Normalization>,
}

impl NetworkSpec {
    /// Builds a spec from `(input_size, size, activation)` triples.
    pub fn dense(layers: Vec<(usize, usize, ActivationFunction)>) -> NetworkSpec {
        NetworkSpec {
            layers: layers.into_iter()
                .map(|(input_size, size, activation)| LayerSpec { input_size, size, activation })
                .collect(),
            normalization: None,
        }
    }

    pub fn with_softmax(mut self) -> NetworkSpec {
        self.normalization = Some(Normalization::Softmax);
        self
    }

    /// The 2 → 4 → 3 fruit classifier: sigmoid hidden layer, softmax output.
    pub fn fruit_classifier(features: usize) -> NetworkSpec {
        NetworkSpec::dense(vec![
            (features, 4, ActivationFunction::Sigmoid),
            (4, 3, ActivationFunction::Identity),
        ])
        .with_softmax()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_reads_from_json() {
        let json = r#"{
            "layers": [
                { "input_size": 2, "size": 4, "activation": "Sigmoid" },
                { "input_size": 4, "size": 3, "activation": { "LeakyReLU": { "alpha": 0.01 } } }
            ],
            "normalization": "softmax"
        }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.layers.len(), 2);
        assert_eq!(spec.layers[1].activation, ActivationFunction::LeakyReLU { alpha: 0.01 });
        assert_eq!(spec.normalization, Some(Normalization::Softmax));
    }

    #[test]
    fn normalization_defaults_to_none() {
        let json = r#"{ "layers": [ { "input_size": 2, "size": 3, "activation": "Identity" } ] }"#;
        let spec: NetworkSpec = serde_json::from_str(json).unwrap();
        assert_eq!(spec.normalization, None);
    }
}
