//! Latest-pose bookkeeping fed by odometry

use std::sync::RwLock;

use log::trace;

use crate::common::{Position, PoseSource};

/// Holds the most recent robot position; later updates overwrite earlier ones
#[derive(Debug, Default)]
pub struct PoseTracker {
    latest: RwLock<Option<Position>>,
}

impl PoseTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_position(position: Position) -> Self {
        Self {
            latest: RwLock::new(Some(position)),
        }
    }

    /// Record a new odometry position
    pub fn update(&self, position: Position) {
        trace!("pose update {}", position);
        // a poisoned lock still holds a plain value; keep accepting updates
        let mut latest = self.latest.write().unwrap_or_else(|e| e.into_inner());
        *latest = Some(position);
    }
}

impl PoseSource for PoseTracker {
    fn latest_position(&self) -> Option<Position> {
        *self.latest.read().unwrap_or_else(|e| e.into_inner())
    }
}
