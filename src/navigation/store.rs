//! Path persistence and an in-memory local planner endpoint

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::common::{LocalPlannerClient, NavigationResult, PathStore, Pose, Position};

#[derive(Debug, Serialize, Deserialize)]
struct PathFile {
    waypoints: Vec<Position>,
}

/// Writes each planned path to a TOML file as `[[waypoints]]` entries
#[derive(Debug, Clone)]
pub struct PathFileStore {
    path: PathBuf,
}

impl PathFileStore {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read back the last saved path
    pub fn load_path(&self) -> NavigationResult<Vec<Position>> {
        let contents = fs::read_to_string(&self.path)?;
        let file: PathFile = toml::from_str(&contents)?;
        Ok(file.waypoints)
    }
}

impl PathStore for PathFileStore {
    fn save_path(&self, waypoints: &[Position]) -> NavigationResult<()> {
        let file = PathFile {
            waypoints: waypoints.to_vec(),
        };
        let contents = toml::to_string_pretty(&file)?;
        fs::write(&self.path, contents)?;
        info!("saved {} waypoints to {}", waypoints.len(), self.path.display());
        Ok(())
    }
}

/// Local planner endpoint that keeps every path it receives
#[derive(Debug, Default)]
pub struct RecordingLocalPlanner {
    received: Mutex<Vec<Vec<Pose>>>,
}

impl RecordingLocalPlanner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_path(&self) -> Option<Vec<Pose>> {
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .last()
            .cloned()
    }

    pub fn received_count(&self) -> usize {
        self.received.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl LocalPlannerClient for RecordingLocalPlanner {
    fn send_path(&self, poses: &[Pose]) -> NavigationResult<()> {
        debug!("local planner received {} poses", poses.len());
        self.received
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(poses.to_vec());
        Ok(())
    }
}
