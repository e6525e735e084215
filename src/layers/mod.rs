pub mod dense;

pub use dense::{Layer, LayerCache, LayerGradients};
