//! grid_navigation - global path planning on occupancy grids
//!
//! Plans a path for a mobile robot with A* over an occupancy grid and
//! reduces it to the few waypoints a local motion controller needs:
//! collinear waypoints are merged first, then any waypoint that a
//! collision-free straight segment can bypass is dropped.

// Core modules
pub mod common;
pub mod config;
pub mod utils;

// Planning modules
pub mod path_planning;
pub mod navigation;

// Re-export common types for convenience
pub use common::{CellIndex, GridCell, Pose, Position, Waypoints};
pub use common::{GlobalPlanner, GridAdapter, LocalPlannerClient, PathStore, PoseSource};
pub use common::{NavigationError, NavigationResult};
pub use config::NavigationConfig;
