use crate::data::encoder::argmax;
use crate::error::{NnError, Result};
use crate::math::matrix::Matrix;
use crate::network::network::Network;

/// Model outputs sampled on a regular grid over the unit square.
///
/// Cell `(ix, iy)` holds the output at `(x, y) = (ix, iy) / (resolution - 1)`,
/// with `x` the first feature and `y` the second. Networks with a third
/// feature are sliced at a fixed value of that feature.
#[derive(Debug, Clone)]
pub struct DecisionGrid {
    resolution: usize,
    classes: usize,
    /// Row-major by `iy`, then `ix`.
    outputs: Vec<Vec<f64>>,
}

impl DecisionGrid {
    /// Evaluates `network` at `resolution × resolution` points; `fixed` fills
    /// every feature beyond the first two.
    pub fn evaluate(network: &Network, resolution: usize, fixed: f64) -> Result<DecisionGrid> {
        if resolution < 2 {
            return Err(NnError::Config(format!("grid resolution must be at least 2, got {}", resolution)));
        }
        if network.input_dim() < 2 {
            return Err(NnError::DimensionMismatch { expected: 2, got: network.input_dim() });
        }

        let step = 1.0 / (resolution - 1) as f64;
        let extra = network.input_dim() - 2;
        let points = (0..resolution)
            .flat_map(|iy| (0..resolution).map(move |ix| (ix, iy)))
            .map(|(ix, iy)| {
                let mut p = vec![ix as f64 * step, iy as f64 * step];
                p.extend(std::iter::repeat(fixed).take(extra));
                p
            })
            .collect();

        let outputs = network.forward_batch(&Matrix::from_rows(points)?)?.data;

        Ok(DecisionGrid {
            resolution,
            classes: network.output_dim(),
            outputs,
        })
    }

    pub fn resolution(&self) -> usize {
        self.resolution
    }

    pub fn classes(&self) -> usize {
        self.classes
    }

    /// Feature-space coordinate of grid index `i`.
    pub fn coordinate(&self, i: usize) -> f64 {
        i as f64 / (self.resolution - 1) as f64
    }

    pub fn output(&self, ix: usize, iy: usize) -> &[f64] {
        &self.outputs[iy * self.resolution + ix]
    }

    /// Output for the 1-based `class` at a cell.
    pub fn probability(&self, ix: usize, iy: usize, class: usize) -> f64 {
        self.output(ix, iy)[class - 1]
    }

    /// 1-based arg-max class at a cell.
    pub fn class_at(&self, ix: usize, iy: usize) -> usize {
        argmax(self.output(ix, iy)) + 1
    }

    /// Whether the `class` output crosses 0.5 between this cell and its right
    /// or upper neighbour, i.e. the cell lies on that class's 0.5 contour.
    pub fn on_boundary(&self, ix: usize, iy: usize, class: usize) -> bool {
        let above = |x: usize, y: usize| self.probability(x, y, class) >= 0.5;
        let here = above(ix, iy);
        (ix + 1 < self.resolution && above(ix + 1, iy) != here)
            || (iy + 1 < self.resolution && above(ix, iy + 1) != here)
    }

    /// All cells on the 0.5 contour of `class`.
    pub fn boundary(&self, class: usize) -> Vec<(usize, usize)> {
        (0..self.resolution)
            .flat_map(|iy| (0..self.resolution).map(move |ix| (ix, iy)))
            .filter(|&(ix, iy)| self.on_boundary(ix, iy, class))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::activation::activation::ActivationFunction;
    use crate::layers::dense::Layer;

    /// Two classes split at x = 0.5: logits (x - 0.5) and (0.5 - x).
    fn split_network(extra_inputs: usize) -> Network {
        let cols = 2 + extra_inputs;
        let mut w = Matrix::zeros(2, cols);
        w.data[0][0] = 10.0;
        w.data[1][0] = -10.0;
        let layer = Layer::from_parts(w, vec![-5.0, 5.0], ActivationFunction::Identity).unwrap();
        Network::from_layers(vec![layer], Some(crate::activation::activation::Normalization::Softmax)).unwrap()
    }

    #[test]
    fn grid_classes_follow_the_split() {
        let grid = DecisionGrid::evaluate(&split_network(0), 11, 0.5).unwrap();
        assert_eq!(grid.resolution(), 11);
        assert_eq!(grid.classes(), 2);
        assert_eq!(grid.class_at(10, 3), 1);
        assert_eq!(grid.class_at(0, 7), 2);
        assert!((grid.coordinate(5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn boundary_is_the_vertical_line() {
        let grid = DecisionGrid::evaluate(&split_network(0), 11, 0.5).unwrap();
        let cells = grid.boundary(1);
        assert_eq!(cells.len(), 11);
        assert!(cells.iter().all(|&(ix, _)| ix == 4));
    }

    #[test]
    fn third_feature_is_held_fixed() {
        let grid = DecisionGrid::evaluate(&split_network(1), 5, 0.3).unwrap();
        assert_eq!(grid.class_at(4, 0), 1);
    }

    #[test]
    fn tiny_resolution_is_rejected() {
        assert!(DecisionGrid::evaluate(&split_network(0), 1, 0.0).is_err());
    }
}
