use rand::seq::SliceRandom;
use rand::Rng;

use crate::data::encoder::{class_indices, one_hot};
use crate::data::loader::Category;
use crate::error::{check_dim, NnError, Result};

/// One labelled sample.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    pub features: Vec<f64>,
    /// 1-based class index.
    pub class: usize,
    /// One-hot encoding of `class`.
    pub target: Vec<f64>,
}

/// The full labelled dataset.
///
/// Samples are never modified after construction; `shuffle` only reorders
/// them.
#[derive(Debug, Clone)]
pub struct Dataset {
    samples: Vec<Sample>,
    class_names: Vec<String>,
    feature_dim: usize,
}

impl Dataset {
    /// Concatenates categories in order, labelling the i-th category as class
    /// `i + 1`.
    pub fn from_categories(categories: Vec<Category>) -> Result<Dataset> {
        let counts: Vec<usize> = categories.iter().map(|c| c.features.len()).collect();
        let classes = class_indices(&counts);
        let num_classes = categories.len();

        let class_names = categories.iter().map(|c| c.name.clone()).collect();
        let features: Vec<Vec<f64>> = categories.into_iter().flat_map(|c| c.features).collect();

        let feature_dim = match features.first() {
            Some(first) => first.len(),
            None => return Err(NnError::EmptyDataset),
        };

        let samples = features.into_iter()
            .zip(classes)
            .map(|(features, class)| {
                check_dim(feature_dim, features.len())?;
                Ok(Sample {
                    target: one_hot(class, num_classes)?,
                    features,
                    class,
                })
            })
            .collect::<Result<Vec<Sample>>>()?;

        Ok(Dataset { samples, class_names, feature_dim })
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn num_classes(&self) -> usize {
        self.class_names.len()
    }

    pub fn feature_dim(&self) -> usize {
        self.feature_dim
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    /// Name of a 1-based class, if it exists.
    pub fn class_name(&self, class: usize) -> Option<&str> {
        class.checked_sub(1)
            .and_then(|i| self.class_names.get(i))
            .map(String::as_str)
    }

    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Samples whose true class is `class` (1-based), in current order.
    pub fn category(&self, class: usize) -> impl Iterator<Item = &Sample> {
        self.samples.iter().filter(move |s| s.class == class)
    }

    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        self.samples.shuffle(rng);
    }
}
