pub mod dataset;
pub mod encoder;
pub mod loader;
pub mod synthetic;

pub use dataset::{Dataset, Sample};
pub use encoder::{argmax, class_indices, decode, one_hot};
pub use loader::{load_categories, load_category, load_table, normalize_column_name, Category, CategorySource, FeatureSet};
pub use synthetic::synthetic_fruits;
