//! PNG rendering of decision regions.
//!
//! The picture has three layers, painted in order:
//! 1. every pixel tinted with the colour of the arg-max class at that point
//! 2. each class's 0.5-probability contour in the full class colour
//! 3. the samples as discs in their true class colour with a dark rim
//!
//! The first feature runs left to right and the second bottom to top.

use std::path::Path;

use image::{Rgb, RgbImage};
use serde::{Serialize, Deserialize};
use tracing::info;

use crate::data::dataset::Dataset;
use crate::error::{NnError, Result};
use crate::network::network::Network;
use crate::plot::grid::DecisionGrid;

const PALETTE: [[u8; 3]; 6] = [
    [200, 30, 40],   // apple red
    [225, 185, 20],  // banana yellow
    [110, 40, 150],  // grape purple
    [30, 120, 200],
    [40, 160, 70],
    [230, 110, 20],
];

const RIM: Rgb<u8> = Rgb([20, 20, 20]);

/// Rendering options; also the `plot` section of a run config.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    /// Side length of the square image in pixels.
    pub size: u32,
    /// Grid points per axis at which the model is evaluated.
    pub resolution: usize,
    /// Value used for every feature beyond the first two.
    pub fixed_feature: f64,
    pub point_radius: u32,
}

impl Default for PlotConfig {
    fn default() -> Self {
        PlotConfig {
            size: 400,
            resolution: 200,
            fixed_feature: 0.5,
            point_radius: 5,
        }
    }
}

pub fn class_color(class: usize) -> Rgb<u8> {
    Rgb(PALETTE[(class.max(1) - 1) % PALETTE.len()])
}

fn tint(c: Rgb<u8>) -> Rgb<u8> {
    Rgb(c.0.map(|v| ((v as u16 + 3 * 255) / 4) as u8))
}

/// Pixel → nearest grid index along one axis.
fn to_cell(pixel: u32, size: u32, resolution: usize) -> usize {
    let t = pixel as f64 / (size - 1).max(1) as f64;
    ((t * (resolution - 1) as f64).round() as usize).min(resolution - 1)
}

/// Feature coordinate in [0, 1] → pixel along one axis.
fn to_pixel(v: f64, size: u32) -> i64 {
    (v.clamp(0.0, 1.0) * (size - 1) as f64).round() as i64
}

/// Draws `grid` and the samples of `dataset` into a new image.
pub fn render_decision_plot(grid: &DecisionGrid, dataset: &Dataset, config: &PlotConfig) -> RgbImage {
    let size = config.size.max(2);
    let res = grid.resolution();
    let mut img = RgbImage::new(size, size);

    for py in 0..size {
        // image rows grow downwards, the second feature grows upwards
        let iy = to_cell(size - 1 - py, size, res);
        for px in 0..size {
            let ix = to_cell(px, size, res);
            let class = grid.class_at(ix, iy);
            let on_contour = (1..=grid.classes()).find(|&c| grid.on_boundary(ix, iy, c));
            let color = match on_contour {
                Some(c) => class_color(c),
                None => tint(class_color(class)),
            };
            img.put_pixel(px, py, color);
        }
    }

    let r = config.point_radius as i64;
    for sample in dataset.samples() {
        let cx = to_pixel(sample.features[0], size);
        let cy = size as i64 - 1 - to_pixel(sample.features.get(1).copied().unwrap_or(0.0), size);
        for dy in -r..=r {
            for dx in -r..=r {
                let d2 = dx * dx + dy * dy;
                if d2 > r * r {
                    continue;
                }
                let (x, y) = (cx + dx, cy + dy);
                if x < 0 || y < 0 || x >= size as i64 || y >= size as i64 {
                    continue;
                }
                let color = if d2 > (r - 1).max(0).pow(2) { RIM } else { class_color(sample.class) };
                img.put_pixel(x as u32, y as u32, color);
            }
        }
    }

    img
}

/// Evaluates `network`, renders the plot, and writes it as a PNG to `path`.
pub fn save_decision_plot<P: AsRef<Path>>(
    network: &Network,
    dataset: &Dataset,
    config: &PlotConfig,
    path: P,
) -> Result<()> {
    let path = path.as_ref();
    let grid = DecisionGrid::evaluate(network, config.resolution, config.fixed_feature)?;
    let img = render_decision_plot(&grid, dataset, config);
    img.save(path).map_err(|e| NnError::Image(format!("{}: {}", path.display(), e)))?;
    info!(path = %path.display(), size = config.size, "decision plot written");
    Ok(())
}
