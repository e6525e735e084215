pub mod grid;
pub mod render;

pub use grid::DecisionGrid;
pub use render::{class_color, render_decision_plot, save_decision_plot, PlotConfig};
