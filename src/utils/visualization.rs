//! Visualization utilities for grid_navigation
//!
//! Renders occupancy grids and planned paths with gnuplot.

use gnuplot::{AutoOption, AxesCommon, Caption, Color, Figure, LineWidth, PointSize, PointSymbol};

use crate::common::{NavigationError, NavigationResult, Position};
use crate::utils::grid_map::OccupancyGrid;

/// Color palette for consistent styling
pub mod colors {
    pub const BLACK: &str = "#000000";
    pub const RED: &str = "#FF0000";
    pub const GREEN: &str = "#00FF00";
    pub const BLUE: &str = "#0000FF";
    pub const GRAY: &str = "#808080";

    // Semantic colors
    pub const OBSTACLE: &str = BLACK;
    pub const START: &str = GREEN;
    pub const GOAL: &str = BLUE;
    pub const RAW_PATH: &str = GRAY;
    pub const PATH: &str = RED;
}

/// Style for path rendering
#[derive(Debug, Clone)]
pub struct PathStyle {
    pub color: String,
    pub line_width: f64,
    pub caption: String,
}

impl PathStyle {
    pub fn new(color: &str, caption: &str) -> Self {
        Self {
            color: color.to_string(),
            line_width: 2.0,
            caption: caption.to_string(),
        }
    }

    pub fn with_line_width(mut self, width: f64) -> Self {
        self.line_width = width;
        self
    }
}

impl Default for PathStyle {
    fn default() -> Self {
        Self {
            color: colors::PATH.to_string(),
            line_width: 2.0,
            caption: "Path".to_string(),
        }
    }
}

/// Main visualizer struct
pub struct Visualizer {
    figure: Figure,
    title: String,
    x_range: Option<(f64, f64)>,
    y_range: Option<(f64, f64)>,
}

impl Visualizer {
    pub fn new() -> Self {
        Self {
            figure: Figure::new(),
            title: String::new(),
            x_range: None,
            y_range: None,
        }
    }

    pub fn set_title(&mut self, title: &str) -> &mut Self {
        self.title = title.to_string();
        self
    }

    /// Fit both axes to the grid extent
    pub fn fit_grid(&mut self, grid: &OccupancyGrid) -> &mut Self {
        let origin = grid.origin();
        let (width, height) = grid.world_size();
        self.x_range = Some((origin.x, origin.x + width));
        self.y_range = Some((origin.y, origin.y + height));
        self
    }

    /// Plot blocked cells as squares
    pub fn plot_grid(&mut self, grid: &OccupancyGrid) -> &mut Self {
        let obstacles = grid.obstacle_positions();
        let x: Vec<f64> = obstacles.iter().map(|p| p.x).collect();
        let y: Vec<f64> = obstacles.iter().map(|p| p.y).collect();

        self.figure.axes2d().points(
            &x,
            &y,
            &[
                Caption("Obstacles"),
                Color(colors::OBSTACLE),
                PointSymbol('S'),
                PointSize(1.0),
            ],
        );
        self
    }

    /// Plot a waypoint path as a polyline with markers
    pub fn plot_path(&mut self, path: &[Position], style: &PathStyle) -> &mut Self {
        let x: Vec<f64> = path.iter().map(|p| p.x).collect();
        let y: Vec<f64> = path.iter().map(|p| p.y).collect();

        self.figure.axes2d().lines_points(
            &x,
            &y,
            &[
                Caption(&style.caption),
                Color(&style.color),
                LineWidth(style.line_width),
                PointSymbol('O'),
            ],
        );
        self
    }

    fn plot_marker(&mut self, point: Position, color: &str, caption: &str) -> &mut Self {
        self.figure.axes2d().points(
            &[point.x],
            &[point.y],
            &[Caption(caption), Color(color), PointSymbol('O'), PointSize(1.5)],
        );
        self
    }

    pub fn plot_start(&mut self, point: Position) -> &mut Self {
        self.plot_marker(point, colors::START, "Start")
    }

    pub fn plot_goal(&mut self, point: Position) -> &mut Self {
        self.plot_marker(point, colors::GOAL, "Goal")
    }

    /// Save plot to PNG file
    pub fn save_png(&mut self, path: &str, width: u32, height: u32) -> NavigationResult<()> {
        self.apply_settings();
        self.figure.save_to_png(path, width, height).map_err(plot_error)
    }

    fn apply_settings(&mut self) {
        let axes = self.figure.axes2d();

        if !self.title.is_empty() {
            axes.set_title(&self.title, &[]);
        }
        axes.set_x_label("X [m]", &[]);
        axes.set_y_label("Y [m]", &[]);
        if let Some((min, max)) = self.x_range {
            axes.set_x_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        if let Some((min, max)) = self.y_range {
            axes.set_y_range(AutoOption::Fix(min), AutoOption::Fix(max));
        }
        axes.set_aspect_ratio(AutoOption::Fix(1.0));
    }
}

impl Default for Visualizer {
    fn default() -> Self {
        Self::new()
    }
}

fn plot_error<E: std::fmt::Display>(e: E) -> NavigationError {
    NavigationError::Visualization(e.to_string())
}

/// Plot the grid with the raw search path and its simplified waypoints
pub fn plot_plan(grid: &OccupancyGrid, raw: &[Position], simplified: &[Position], title: &str) -> Visualizer {
    let mut vis = Visualizer::new();
    vis.set_title(title).fit_grid(grid).plot_grid(grid);

    vis.plot_path(raw, &PathStyle::new(colors::RAW_PATH, "Search path").with_line_width(1.0));
    vis.plot_path(simplified, &PathStyle::default());
    if let (Some(start), Some(goal)) = (simplified.first(), simplified.last()) {
        vis.plot_start(*start);
        vis.plot_goal(*goal);
    }
    vis
}
