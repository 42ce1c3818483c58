//! Common types used throughout grid_navigation

use std::fmt;
use std::ops::{Add, Mul, Sub};

use itertools::Itertools;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// 3D world position
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
    #[serde(default)]
    pub z: f64,
}

impl Position {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Position on the ground plane (z = 0)
    pub fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    pub fn origin() -> Self {
        Self { x: 0.0, y: 0.0, z: 0.0 }
    }

    /// Euclidean distance in 3D
    pub fn distance(&self, other: &Position) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2) + (self.z - other.z).powi(2)).sqrt()
    }

    /// Euclidean distance in the XY plane
    pub fn planar_distance(&self, other: &Position) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Heading from `self` towards `other` in the XY plane, in (-pi, pi]
    pub fn bearing_to(&self, other: &Position) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Point reached by travelling `length` along `heading` in the XY plane
    pub fn offset(&self, heading: f64, length: f64) -> Position {
        Position::new(
            self.x + length * heading.cos(),
            self.y + length * heading.sin(),
            self.z,
        )
    }

    pub fn to_vector(&self) -> Vector3<f64> {
        Vector3::new(self.x, self.y, self.z)
    }
}

impl From<Vector3<f64>> for Position {
    fn from(v: Vector3<f64>) -> Self {
        Self { x: v[0], y: v[1], z: v[2] }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        Position::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Position {
    type Output = Position;

    fn mul(self, rhs: f64) -> Position {
        Position::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x, self.y, self.z)
    }
}

/// Oriented waypoint handed to the local planner
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Position,
    /// Heading in radians, measured in the XY plane
    pub heading: f64,
}

impl Pose {
    pub fn new(position: Position, heading: f64) -> Self {
        Self { position, heading }
    }

    /// Pose at `position` facing away from `previous`
    pub fn arriving_from(previous: &Position, position: Position) -> Self {
        Self {
            position,
            heading: previous.bearing_to(&position),
        }
    }
}

/// Convert a waypoint list into poses; each heading points along the
/// incoming segment, the first pose takes the heading of the first segment.
pub fn poses_from_waypoints(waypoints: &[Position]) -> Vec<Pose> {
    match waypoints {
        [] => Vec::new(),
        [only] => vec![Pose::new(*only, 0.0)],
        [first, second, ..] => std::iter::once(Pose::new(*first, first.bearing_to(second)))
            .chain(
                waypoints
                    .iter()
                    .tuple_windows()
                    .map(|(prev, curr)| Pose::arriving_from(prev, *curr)),
            )
            .collect(),
    }
}

/// Sum of consecutive 3D distances along a waypoint list
pub fn path_cost(waypoints: &[Position]) -> f64 {
    waypoints
        .iter()
        .tuple_windows()
        .map(|(a, b)| a.distance(b))
        .sum()
}

/// Ordered waypoint list owned by a single planning request
pub type Waypoints = Vec<Position>;

/// Grid indices of a cell: `row` grows with world y, `col` with world x
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CellIndex {
    pub row: usize,
    pub col: usize,
}

impl CellIndex {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

impl fmt::Display for CellIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.row, self.col)
    }
}

/// Snapshot of one occupancy grid cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridCell {
    pub index: CellIndex,
    /// World-space center of the cell
    pub world_position: Position,
    pub walkable: bool,
}

impl GridCell {
    pub fn new(index: CellIndex, world_position: Position, walkable: bool) -> Self {
        Self {
            index,
            world_position,
            walkable,
        }
    }

    pub fn distance(&self, other: &GridCell) -> f64 {
        self.world_position.distance(&other.world_position)
    }
}

impl fmt::Display for GridCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cell {} at {} walkable={}",
            self.index, self.world_position, self.walkable
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

    #[test]
    fn test_position_distance() {
        let p1 = Position::new(0.0, 0.0, 0.0);
        let p2 = Position::new(2.0, 3.0, 6.0);
        assert_relative_eq!(p1.distance(&p2), 7.0);
        assert_relative_eq!(p1.planar_distance(&p2), 13.0_f64.sqrt());
    }

    #[test]
    fn test_position_arithmetic() {
        let a = Position::new(1.0, 2.0, 3.0);
        let b = Position::new(0.5, 0.5, 0.5);
        assert_eq!(a + b, Position::new(1.5, 2.5, 3.5));
        assert_eq!(a - b, Position::new(0.5, 1.5, 2.5));
        assert_eq!(b * 4.0, Position::new(2.0, 2.0, 2.0));
        assert_eq!(Position::from(a.to_vector()), a);
    }

    #[test]
    fn test_bearing_and_offset() {
        let a = Position::planar(0.0, 0.0);
        assert_relative_eq!(a.bearing_to(&Position::planar(1.0, 1.0)), FRAC_PI_4);
        assert_relative_eq!(a.bearing_to(&Position::planar(0.0, 2.0)), FRAC_PI_2);

        let p = a.offset(FRAC_PI_2, 2.0);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-12);
        assert_relative_eq!(p.y, 2.0);
    }

    #[test]
    fn test_poses_from_waypoints() {
        let waypoints = vec![
            Position::planar(0.0, 0.0),
            Position::planar(1.0, 0.0),
            Position::planar(1.0, 1.0),
        ];
        let poses = poses_from_waypoints(&waypoints);
        assert_eq!(poses.len(), 3);
        assert_relative_eq!(poses[0].heading, 0.0);
        assert_relative_eq!(poses[1].heading, 0.0);
        assert_relative_eq!(poses[2].heading, FRAC_PI_2);
        assert!(poses_from_waypoints(&[]).is_empty());
    }

    #[test]
    fn test_path_cost() {
        let waypoints = vec![
            Position::planar(0.0, 0.0),
            Position::planar(3.0, 4.0),
            Position::planar(3.0, 5.0),
        ];
        assert_relative_eq!(path_cost(&waypoints), 6.0);
        assert_eq!(path_cost(&waypoints[..1]), 0.0);
    }
}
