//! Planning service and its collaborators

pub mod pose;
pub mod service;
pub mod store;

pub use pose::PoseTracker;
pub use service::{PlanRequest, PlanResponse, PlannedPath, PlanningService};
pub use store::{PathFileStore, RecordingLocalPlanner};
