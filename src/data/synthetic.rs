use crate::data::loader::{Category, FeatureSet};

/// Cluster centres as (red, green, blue) averages.
const FRUITS: [(&str, [f64; 3]); 3] = [
    ("apple", [0.9, 0.2, 0.1]),
    ("banana", [0.9, 0.8, 0.9]),
    ("grape", [0.1, 0.3, 0.5]),
];

/// Generates `per_class` samples around each fruit's colour centre.
///
/// The spread is a deterministic function of the sample index so the data is
/// identical on every run. Values are clamped to [0, 1].
pub fn synthetic_fruits(per_class: usize, features: FeatureSet) -> Vec<Category> {
    FRUITS.iter()
        .map(|(name, centre)| {
            let samples = (0..per_class)
                .map(|i| {
                    // irrational-ish step keeps points from lining up
                    let angle = i as f64 * 2.399;
                    let r = 0.08 * (i as f64 * 0.31).sin().abs();
                    let offsets = [r * angle.cos(), r * (angle * 0.5).sin(), r * angle.sin()];
                    let rgb: Vec<f64> = centre.iter()
                        .zip(offsets)
                        .map(|(c, o)| (c + o).clamp(0.0, 1.0))
                        .collect();
                    match features {
                        FeatureSet::RedBlue => vec![rgb[0], rgb[2]],
                        FeatureSet::RedGreenBlue => rgb,
                    }
                })
                .collect();
            Category { name: name.to_string(), features: samples }
        })
        .collect()
}
