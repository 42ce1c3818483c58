//! Utility modules for grid_navigation

pub mod grid_map;
pub mod visualization;

pub use grid_map::*;
pub use visualization::{plot_plan, PathStyle, Visualizer, colors};
