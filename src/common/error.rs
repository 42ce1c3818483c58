//! Error types for grid_navigation

use std::fmt;

use thiserror::Error;

use crate::common::types::Position;

/// Which end of a planning request failed to resolve
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Start,
    Goal,
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Endpoint::Start => write!(f, "start"),
            Endpoint::Goal => write!(f, "goal"),
        }
    }
}

/// Main error type for navigation planning
#[derive(Error, Debug)]
pub enum NavigationError {
    /// Start or goal does not resolve to a grid cell
    #[error("Unreachable endpoint: {endpoint} {position} is outside the grid")]
    UnreachableEndpoint { endpoint: Endpoint, position: Position },

    /// Open set exhausted without reaching the goal
    #[error("No path found after expanding {expanded} cells")]
    NoPathFound { expanded: usize },

    /// Parent chain does not lead back to the start cell
    #[error("Broken parent chain after {steps} steps")]
    BrokenParentChain { steps: usize },

    /// Simplification needs at least two waypoints
    #[error("Path too short to simplify: {len} point(s)")]
    PathTooShortToSimplify { len: usize },

    /// No pose has been received yet
    #[error("No robot pose available")]
    NoPoseAvailable,

    /// Local planner rejected or did not receive the path
    #[error("Hand-off error: {0}")]
    Handoff(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Plot could not be rendered
    #[error("Visualization error: {0}")]
    Visualization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl NavigationError {
    /// True for the outcomes of the search/simplify pipeline itself, as
    /// opposed to infrastructure failures.
    pub fn is_planning_failure(&self) -> bool {
        matches!(
            self,
            NavigationError::UnreachableEndpoint { .. }
                | NavigationError::NoPathFound { .. }
                | NavigationError::BrokenParentChain { .. }
                | NavigationError::PathTooShortToSimplify { .. }
        )
    }
}

impl From<toml::de::Error> for NavigationError {
    fn from(e: toml::de::Error) -> Self {
        NavigationError::Config(e.to_string())
    }
}

impl From<toml::ser::Error> for NavigationError {
    fn from(e: toml::ser::Error) -> Self {
        NavigationError::Config(e.to_string())
    }
}

/// Result type alias for navigation operations
pub type NavigationResult<T> = Result<T, NavigationError>;
