//! Global planning service: pose snapshot in, simplified path out
//!
//! A request runs search, reconstruction and simplification synchronously
//! and forwards the result to the local planner and the path store. Both
//! downstream steps are best effort; their failures are logged and never
//! change the planning outcome reported to the caller.

use std::sync::Arc;
use std::time::Instant;

use log::{error, info, warn};

use crate::common::{
    path_cost, poses_from_waypoints, GlobalPlanner, GridAdapter, LocalPlannerClient,
    NavigationError, NavigationResult, PathStore, PoseSource, Position, Waypoints,
};
use crate::config::NavigationConfig;
use crate::path_planning::{reconstruct_path, AStarPlanner, PathSimplifier};

/// Output of one successful planning run
#[derive(Debug, Clone)]
pub struct PlannedPath {
    /// Cell-by-cell path from the search, start and goal included
    pub raw: Waypoints,
    /// Simplified waypoints handed to the local planner
    pub waypoints: Waypoints,
    /// Cost of the raw path
    pub cost: f64,
    /// Cells expanded by the search
    pub expanded: usize,
}

/// Plan request: the start is the robot's latest known position
#[derive(Debug, Clone, Copy)]
pub struct PlanRequest {
    pub target: Position,
}

/// Plan response; `waypoints` is empty whenever `success` is false
#[derive(Debug)]
pub struct PlanResponse {
    pub success: bool,
    pub waypoints: Waypoints,
    pub failure: Option<NavigationError>,
}

impl PlanResponse {
    fn succeeded(waypoints: Waypoints) -> Self {
        Self {
            success: true,
            waypoints,
            failure: None,
        }
    }

    fn failed(error: NavigationError) -> Self {
        Self {
            success: false,
            waypoints: Vec::new(),
            failure: Some(error),
        }
    }
}

pub struct PlanningService<G: GridAdapter> {
    grid: Arc<G>,
    pose_source: Arc<dyn PoseSource>,
    local_planner: Option<Box<dyn LocalPlannerClient>>,
    path_store: Option<Box<dyn PathStore>>,
    config: NavigationConfig,
}

impl<G: GridAdapter> PlanningService<G> {
    pub fn new(
        grid: Arc<G>,
        pose_source: Arc<dyn PoseSource>,
        config: NavigationConfig,
    ) -> NavigationResult<Self> {
        config.validate()?;
        Ok(Self {
            grid,
            pose_source,
            local_planner: None,
            path_store: None,
            config,
        })
    }

    pub fn with_local_planner(mut self, local_planner: Box<dyn LocalPlannerClient>) -> Self {
        self.local_planner = Some(local_planner);
        self
    }

    pub fn with_path_store(mut self, path_store: Box<dyn PathStore>) -> Self {
        self.path_store = Some(path_store);
        self
    }

    pub fn grid(&self) -> &G {
        &self.grid
    }

    /// Plan from an explicit start position
    pub fn find_path(&self, start: Position, target: Position) -> NavigationResult<PlannedPath> {
        let timer = Instant::now();
        let grid = self.grid.as_ref();

        let outcome = AStarPlanner::new(grid, self.config.search.clone()).find_path(start, target)?;
        let raw = reconstruct_path(grid, &outcome)?;
        info!("preliminary path => {} waypoints", raw.len());

        let waypoints = PathSimplifier::new(grid, self.config.simplify.clone())?.simplify(&raw)?;
        info!(
            "simplified path => {} waypoints, planning took {:.6} s",
            waypoints.len(),
            timer.elapsed().as_secs_f64()
        );

        Ok(PlannedPath {
            cost: path_cost(&raw),
            raw,
            waypoints,
            expanded: outcome.expanded,
        })
    }

    /// Plan from the latest known robot position
    pub fn plan_to(&self, target: Position) -> NavigationResult<PlannedPath> {
        let start = self
            .pose_source
            .latest_position()
            .ok_or(NavigationError::NoPoseAvailable)?;
        self.find_path(start, target)
    }

    /// Plan for a request and forward a successful result downstream.
    ///
    /// Returns the full plan, raw path included, for callers that need
    /// more than the boundary response.
    pub fn execute(&self, request: PlanRequest) -> NavigationResult<PlannedPath> {
        match self.plan_to(request.target) {
            Ok(plan) => {
                self.dispatch(&plan.waypoints);
                Ok(plan)
            }
            Err(e) => {
                if e.is_planning_failure() {
                    warn!("planning to {} failed: {}", request.target, e);
                } else {
                    error!("planning to {} failed: {}", request.target, e);
                }
                Err(e)
            }
        }
    }

    /// Serve a plan request in its boundary form
    pub fn handle_request(&self, request: PlanRequest) -> PlanResponse {
        match self.execute(request) {
            Ok(plan) => PlanResponse::succeeded(plan.waypoints),
            Err(e) => PlanResponse::failed(e),
        }
    }

    fn dispatch(&self, waypoints: &[Position]) {
        if let Some(local_planner) = &self.local_planner {
            info!("sending path to local planner");
            if let Err(e) = local_planner.send_path(&poses_from_waypoints(waypoints)) {
                warn!("local planner hand-off failed: {}", e);
            }
        }
        if let Some(path_store) = &self.path_store {
            if let Err(e) = path_store.save_path(waypoints) {
                warn!("could not persist path: {}", e);
            }
        }
    }
}

impl<G: GridAdapter> GlobalPlanner for PlanningService<G> {
    fn plan(&self, start: Position, goal: Position) -> NavigationResult<Waypoints> {
        self.find_path(start, goal).map(|plan| plan.waypoints)
    }
}
