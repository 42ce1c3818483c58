//! Configuration for the grid navigation planner
//!
//! Loads planner parameters from a TOML file. Every section and field
//! is optional; missing values fall back to the defaults below.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::{NavigationError, NavigationResult, Position};
use crate::utils::grid_map::DEFAULT_OCCUPIED_THRESHOLD;

/// Top-level planner configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    pub grid: GridSettings,
    pub search: SearchSettings,
    pub simplify: SimplifySettings,
    pub output: OutputSettings,
    pub logging: LoggingSettings,
}

/// Occupancy grid geometry
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GridSettings {
    /// Cell edge length in meters (twice the node radius)
    pub cell_size: f64,
    /// Occupancy value at or above which a cell is blocked
    pub occupied_threshold: i32,
    /// World position of the bottom-left grid corner
    pub origin: Position,
}

impl Default for GridSettings {
    fn default() -> Self {
        Self {
            cell_size: 0.5,
            occupied_threshold: DEFAULT_OCCUPIED_THRESHOLD,
            origin: Position::origin(),
        }
    }
}

/// A* search settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Stop after expanding this many cells (unbounded when absent)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_expansions: Option<usize>,
}

/// Path simplification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SimplifySettings {
    /// Drop waypoints whose incoming and outgoing bearings match
    pub collinear: bool,
    /// Drop waypoints that can be bypassed by a collision-free segment
    pub line_of_sight: bool,
    /// Ray-marching step for line-of-sight checks (meters)
    pub los_step: f64,
    /// Largest bearing difference (radians) still treated as collinear.
    /// `0.0` compares bearings exactly. The default of `1e-9` also merges
    /// points whose bearings differ only by float rounding, e.g.
    /// `(0, 0), (1, 0), (2, 1e-10)` reduces to its two endpoints, while
    /// exact comparison keeps all three.
    pub bearing_tolerance: f64,
}

impl Default for SimplifySettings {
    fn default() -> Self {
        Self {
            collinear: true,
            line_of_sight: true,
            los_step: 0.02,
            bearing_tolerance: 1e-9,
        }
    }
}

/// Diagnostic outputs
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct OutputSettings {
    /// File the simplified path is written to after each successful plan
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path_file: Option<String>,
    /// PNG the demo binary renders the plan into
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_file: Option<String>,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Default log filter (trace, debug, info, warn, error); RUST_LOG overrides it
    pub level: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl NavigationConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> NavigationResult<Self> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse and validate configuration from TOML text
    pub fn from_toml_str(contents: &str) -> NavigationResult<Self> {
        let config: NavigationConfig = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> NavigationResult<()> {
        let contents = toml::to_string_pretty(self)?;
        fs::write(path, contents)?;
        Ok(())
    }

    pub fn validate(&self) -> NavigationResult<()> {
        if !(self.grid.cell_size.is_finite() && self.grid.cell_size > 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "grid.cell_size must be positive, got {}",
                self.grid.cell_size
            )));
        }
        self.simplify.validate()
    }
}

impl SimplifySettings {
    pub fn validate(&self) -> NavigationResult<()> {
        if !(self.los_step.is_finite() && self.los_step > 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "simplify.los_step must be positive, got {}",
                self.los_step
            )));
        }
        if !(self.bearing_tolerance >= 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "simplify.bearing_tolerance must be non-negative, got {}",
                self.bearing_tolerance
            )));
        }
        Ok(())
    }
}
