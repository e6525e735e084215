pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod layers;
pub mod logging;
pub mod loss;
pub mod math;
pub mod network;
pub mod optim;
pub mod pipeline;
pub mod plot;
pub mod train;

// Convenience re-exports
pub use activation::activation::{ActivationFunction, Normalization};
pub use config::RunConfig;
pub use data::{Category, Dataset, FeatureSet, Sample};
pub use error::{NnError, Result};
pub use layers::dense::Layer;
pub use loss::loss_type::LossType;
pub use math::matrix::Matrix;
pub use network::{Network, NetworkSpec};
pub use optim::{Adam, Optimizer, OptimizerConfig, Sgd};
pub use plot::{DecisionGrid, PlotConfig};
pub use train::{train_loop, TrainConfig};
