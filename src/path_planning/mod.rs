//! Global path planning: search, reconstruction and waypoint reduction

pub mod a_star;
pub mod reconstruct;
pub mod simplify;

pub use a_star::*;
pub use reconstruct::*;
pub use simplify::*;
