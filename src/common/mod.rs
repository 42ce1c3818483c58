//! Common types, traits, and error definitions for grid_navigation
//!
//! This module provides the geometry primitives and the interfaces
//! through which the planner talks to the grid, the pose source and
//! the downstream consumers of a path.

pub mod types;
pub mod traits;
pub mod error;

pub use types::*;
pub use traits::*;
pub use error::*;
