//! Common traits defining the seams between the planner and its collaborators

use std::sync::Arc;

use crate::common::error::NavigationResult;
use crate::common::types::*;

/// Read access to an occupancy grid
pub trait GridAdapter {
    /// Cell containing a world position, `None` when outside the grid
    fn cell_at(&self, position: &Position) -> Option<GridCell>;

    /// Cell at grid indices, `None` when out of bounds
    fn cell_at_index(&self, index: CellIndex) -> Option<GridCell>;

    /// Adjacent cells of `cell`, walkable or not
    fn neighbors_of(&self, cell: &GridCell) -> Vec<GridCell>;

    /// Total number of cells in the grid
    fn cell_count(&self) -> usize;

    /// Whether a world position lies on a walkable cell; off-grid is not walkable
    fn is_walkable_at(&self, position: &Position) -> bool {
        self.cell_at(position).map_or(false, |cell| cell.walkable)
    }
}

/// Source of the robot's latest known position
pub trait PoseSource: Send + Sync {
    fn latest_position(&self) -> Option<Position>;
}

/// Downstream consumer of a simplified path (local motion planner)
pub trait LocalPlannerClient: Send + Sync {
    fn send_path(&self, poses: &[Pose]) -> NavigationResult<()>;
}

impl<T: LocalPlannerClient + ?Sized> LocalPlannerClient for Arc<T> {
    fn send_path(&self, poses: &[Pose]) -> NavigationResult<()> {
        (**self).send_path(poses)
    }
}

/// Durable storage for planned paths, used for diagnostics
pub trait PathStore: Send + Sync {
    fn save_path(&self, waypoints: &[Position]) -> NavigationResult<()>;
}

/// Trait for global path planners
pub trait GlobalPlanner {
    /// Plan a simplified waypoint path from start to goal
    fn plan(&self, start: Position, goal: Position) -> NavigationResult<Waypoints>;
}
