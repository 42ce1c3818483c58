// Global planner demo
// Plans across a walled test map and prints the simplified waypoints.
//
// usage: plan_demo [config.toml]

use std::process;
use std::sync::Arc;

use log::{error, info};

use grid_navigation::config::NavigationConfig;
use grid_navigation::navigation::{PathFileStore, PlanRequest, PlanningService, PoseTracker, RecordingLocalPlanner};
use grid_navigation::utils::{plot_plan, OccupancyGrid};
use grid_navigation::{NavigationResult, Position};

const MAP_SIZE: usize = 20;

fn load_config() -> NavigationResult<NavigationConfig> {
    match std::env::args().nth(1) {
        Some(path) => NavigationConfig::from_file(path),
        None => Ok(NavigationConfig::default()),
    }
}

// Boundary walls plus two inner walls, each with a single gap
fn demo_map() -> Vec<Vec<i32>> {
    let mut rows = vec![vec![0; MAP_SIZE]; MAP_SIZE];
    for i in 0..MAP_SIZE {
        rows[0][i] = 100;
        rows[MAP_SIZE - 1][i] = 100;
        rows[i][0] = 100;
        rows[i][MAP_SIZE - 1] = 100;
    }
    for row in 1..MAP_SIZE - 1 {
        if row != 15 {
            rows[row][7] = 100;
        }
        if row != 4 {
            rows[row][13] = 100;
        }
    }
    rows
}

fn run(config: NavigationConfig) -> NavigationResult<()> {
    let grid = OccupancyGrid::from_rows(&demo_map(), config.grid.cell_size, config.grid.origin)?
        .with_occupied_threshold(config.grid.occupied_threshold);
    let cell = config.grid.cell_size;
    let origin = config.grid.origin;
    let start = origin + Position::planar(2.5 * cell, 2.5 * cell);
    let target = origin + Position::planar(17.5 * cell, 17.5 * cell);

    let tracker = Arc::new(PoseTracker::new());
    let local_planner = Arc::new(RecordingLocalPlanner::new());
    let mut service = PlanningService::new(Arc::new(grid), tracker.clone(), config.clone())?
        .with_local_planner(Box::new(Arc::clone(&local_planner)));
    if let Some(path_file) = &config.output.path_file {
        service = service.with_path_store(Box::new(PathFileStore::new(path_file)));
    }

    tracker.update(start);
    let plan = service.execute(PlanRequest { target })?;

    for (i, waypoint) in plan.waypoints.iter().enumerate() {
        info!("waypoint {:>2}: {}", i, waypoint);
    }
    info!(
        "path cost {:.3} m over {} expanded cells, local planner received {} path(s)",
        plan.cost,
        plan.expanded,
        local_planner.received_count()
    );

    if let Some(plot_file) = &config.output.plot_file {
        let mut vis = plot_plan(service.grid(), &plan.raw, &plan.waypoints, "Global plan");
        vis.save_png(plot_file, 800, 800)?;
        info!("plot saved to {}", plot_file);
    }
    Ok(())
}

fn main() {
    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("failed to load configuration: {}", e);
            process::exit(1);
        }
    };

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(config.logging.level.as_str()))
        .init();

    info!("global planner demo start!!");
    if let Err(e) = run(config) {
        error!("planning failed: {}", e);
        process::exit(1);
    }
    info!("global planner demo finish!!");
}
