use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::{Serialize, Deserialize};

use crate::data::loader::{CategorySource, FeatureSet};
use crate::error::{NnError, Result};
use crate::network::spec::NetworkSpec;
use crate::optim::optimizer::OptimizerConfig;
use crate::plot::render::PlotConfig;
use crate::train::train_config::TrainConfig;

/// Where the samples come from and which columns become features.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DataConfig {
    /// Fruits in class order; the first becomes class 1.
    #[serde(default)]
    pub categories: Vec<CategorySource>,
    #[serde(default)]
    pub features: FeatureSet,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrainSection {
    #[serde(flatten)]
    pub config: TrainConfig,
    #[serde(default)]
    pub optimizer: OptimizerConfig,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlotSection {
    /// PNG destination; no plot is written when absent.
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(flatten)]
    pub config: PlotConfig,
}

/// Everything one run of the pipeline needs, as read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub data: DataConfig,
    pub network: NetworkSpec,
    #[serde(default)]
    pub train: TrainSection,
    #[serde(default)]
    pub plot: PlotSection,
}

impl RunConfig {
    /// The 2-4-3 fruit classifier with Adam and no data files.
    pub fn default_fruits() -> RunConfig {
        let data = DataConfig::default();
        RunConfig {
            network: NetworkSpec::fruit_classifier(data.features.len()),
            data,
            train: TrainSection::default(),
            plot: PlotSection::default(),
        }
    }

    /// Reads a config file. Relative data and plot paths are resolved
    /// against the file's directory.
    pub fn load_json<P: AsRef<Path>>(path: P) -> Result<RunConfig> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| NnError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: RunConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| NnError::Config(format!("{}: {}", path.display(), e)))?;

        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        config.validate()?;
        Ok(config)
    }

    fn resolve_paths(&mut self, base: &Path) {
        let resolve = |p: &mut PathBuf| {
            if p.is_relative() {
                *p = base.join(&*p);
            }
        };
        for source in &mut self.data.categories {
            source.files.iter_mut().for_each(resolve);
        }
        if let Some(out) = self.plot.output.as_mut() {
            resolve(out);
        }
    }

    /// Checks that the network fits the configured features and fruits.
    pub fn validate(&self) -> Result<()> {
        let (first, last) = match (self.network.layers.first(), self.network.layers.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(NnError::Config("network has no layers".into())),
        };
        if first.input_size != self.data.features.len() {
            return Err(NnError::Config(format!(
                "network takes {} inputs but the feature set has {} columns",
                first.input_size,
                self.data.features.len()
            )));
        }
        let classes = self.data.categories.len();
        if classes > 0 && last.size != classes {
            return Err(NnError::Config(format!(
                "network produces {} outputs for {} categories",
                last.size, classes
            )));
        }
        if self.data.categories.iter().any(|c| c.files.is_empty()) {
            return Err(NnError::Config("every category needs at least one file".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loss::loss_type::LossType;

    const JSON: &str = r#"{
        "data": {
            "categories": [
                { "name": "apple", "files": ["apples/golden.tsv", "/abs/red.tsv"] },
                { "name": "banana", "files": ["bananas.tsv"] },
                { "name": "grape", "files": ["grapes.tsv"] }
            ],
            "features": "red_blue"
        },
        "network": {
            "layers": [
                { "input_size": 2, "size": 4, "activation": "Sigmoid" },
                { "input_size": 4, "size": 3, "activation": "Identity" }
            ],
            "normalization": "softmax"
        },
        "train": { "epochs": 50, "loss_type": "cross_entropy", "seed": 7,
                   "optimizer": { "kind": "sgd", "learning_rate": 0.1 } },
        "plot": { "output": "plot.png", "size": 300 }
    }"#;

    #[test]
    fn full_config_parses_with_defaults() {
        let mut config: RunConfig = serde_json::from_str(JSON).unwrap();
        assert_eq!(config.train.config.epochs, 50);
        assert_eq!(config.train.config.loss_type, LossType::CrossEntropy);
        assert_eq!(config.train.config.seed, Some(7));
        assert!(config.train.config.shuffle);
        assert_eq!(config.train.optimizer, OptimizerConfig::Sgd { learning_rate: 0.1, momentum: 0.0 });
        assert_eq!(config.plot.config.size, 300);
        assert_eq!(config.plot.config.resolution, PlotConfig::default().resolution);
        config.validate().unwrap();

        config.resolve_paths(Path::new("/data"));
        assert_eq!(config.data.categories[0].files[0], PathBuf::from("/data/apples/golden.tsv"));
        assert_eq!(config.data.categories[0].files[1], PathBuf::from("/abs/red.tsv"));
        assert_eq!(config.plot.output, Some(PathBuf::from("/data/plot.png")));
    }

    #[test]
    fn mismatched_network_is_rejected() {
        let mut config: RunConfig = serde_json::from_str(JSON).unwrap();
        config.data.features = FeatureSet::RedGreenBlue;
        assert!(matches!(config.validate(), Err(NnError::Config(_))));

        let mut config: RunConfig = serde_json::from_str(JSON).unwrap();
        config.data.categories.pop();
        assert!(config.validate().is_err());
    }

    #[test]
    fn default_fruits_is_valid() {
        let config = RunConfig::default_fruits();
        config.validate().unwrap();
        assert_eq!(config.network.layers[0].input_size, 2);
        assert_eq!(config.network.layers[1].size, 3);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        assert!(matches!(
            RunConfig::load_json("/definitely/not/here.json"),
            Err(NnError::Io { .. })
        ));
    }
}
