//! Waypoint reduction for grid paths
//!
//! Two passes run in order:
//! 1. collinearity reduction drops a waypoint when the bearing into it
//!    matches the bearing out of it,
//! 2. line-of-sight reduction drops a waypoint when the straight segment
//!    bypassing it stays on walkable cells, probed by ray marching.
//!
//! Both passes keep the first and last waypoint.

use std::f64::consts::TAU;
use std::time::Instant;

use log::debug;

use crate::common::{GridAdapter, NavigationError, NavigationResult, Position, Waypoints};
use crate::config::SimplifySettings;

/// Path simplifier bound to the grid used for collision probing
pub struct PathSimplifier<'a, G: GridAdapter + ?Sized> {
    grid: &'a G,
    settings: SimplifySettings,
}

impl<'a, G: GridAdapter + ?Sized> PathSimplifier<'a, G> {
    pub fn new(grid: &'a G, settings: SimplifySettings) -> NavigationResult<Self> {
        settings.validate()?;
        Ok(Self { grid, settings })
    }

    pub fn with_defaults(grid: &'a G) -> Self {
        Self {
            grid,
            settings: SimplifySettings::default(),
        }
    }

    /// Run the enabled reduction passes on a reconstructed path
    pub fn simplify(&self, path: &[Position]) -> NavigationResult<Waypoints> {
        if path.len() < 2 {
            return Err(NavigationError::PathTooShortToSimplify { len: path.len() });
        }

        let timer = Instant::now();
        let reduced = if self.settings.collinear {
            reduce_collinear(path, self.settings.bearing_tolerance)
        } else {
            path.to_vec()
        };
        debug!(
            "collinearity reduction: {} -> {} waypoints in {:.6} s",
            path.len(),
            reduced.len(),
            timer.elapsed().as_secs_f64()
        );

        let timer = Instant::now();
        let simplified = if self.settings.line_of_sight {
            self.reduce_line_of_sight(&reduced)
        } else {
            reduced
        };
        debug!(
            "line-of-sight reduction: {} waypoints in {:.6} s",
            simplified.len(),
            timer.elapsed().as_secs_f64()
        );

        Ok(simplified)
    }

    /// Drop every waypoint whose two retained neighbors see each other
    pub fn reduce_line_of_sight(&self, path: &[Position]) -> Waypoints {
        if path.len() <= 2 {
            return path.to_vec();
        }

        let mut retained: Waypoints = path[..2].to_vec();
        for curr in &path[2..] {
            let prev2 = retained[retained.len() - 2];
            if self.segment_is_clear(&prev2, curr) {
                retained.pop();
            }
            retained.push(*curr);
        }
        retained
    }

    /// March from `from` towards `to` in `los_step` increments and report
    /// whether every probe lands on a walkable cell
    pub fn segment_is_clear(&self, from: &Position, to: &Position) -> bool {
        let theta = from.bearing_to(to);
        let l_max = from.planar_distance(to);
        let step = self.settings.los_step;

        (0u64..)
            .map(|k| k as f64 * step)
            .take_while(|&l| l < l_max)
            .all(|l| self.grid.is_walkable_at(&from.offset(theta, l)))
    }
}

/// Drop every waypoint that continues the bearing of the segment before it.
///
/// Bearings within `tolerance` radians of each other count as equal;
/// `0.0` demands exact equality.
pub fn reduce_collinear(path: &[Position], tolerance: f64) -> Waypoints {
    if path.len() <= 2 {
        return path.to_vec();
    }

    let mut retained: Waypoints = path[..2].to_vec();
    for curr in &path[2..] {
        let prev2 = retained[retained.len() - 2];
        let prev1 = retained[retained.len() - 1];
        if bearings_match(prev2.bearing_to(&prev1), prev1.bearing_to(curr), tolerance) {
            retained.pop();
        }
        retained.push(*curr);
    }
    retained
}

fn bearings_match(a: f64, b: f64, tolerance: f64) -> bool {
    let diff = (a - b).rem_euclid(TAU);
    diff.min(TAU - diff) <= tolerance
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::OccupancyGrid;
    use std::f64::consts::PI;

    fn p(x: f64, y: f64) -> Position {
        Position::planar(x, y)
    }

    #[test]
    fn test_bearings_match_wraps() {
        assert!(bearings_match(PI, -PI, 0.0));
        assert!(bearings_match(0.25, 0.25, 0.0));
        assert!(!bearings_match(0.25, 0.2500001, 0.0));
        assert!(bearings_match(0.25, 0.2500001, 1e-6));
        assert!(!bearings_match(0.0, PI, 1e-6));
    }

    #[test]
    fn test_collinear_straight_line() {
        let path: Vec<Position> = (0..6).map(|i| p(0.25 + 0.5 * i as f64, 0.25)).collect();
        assert_eq!(reduce_collinear(&path, 0.0), vec![p(0.25, 0.25), p(2.75, 0.25)]);
    }

    #[test]
    fn test_collinear_keeps_turns() {
        let path = vec![
            p(0.5, 0.5),
            p(1.5, 0.5),
            p(2.5, 0.5),
            p(3.5, 1.5),
            p(4.5, 2.5),
            p(4.5, 3.5),
        ];
        let reduced = reduce_collinear(&path, 0.0);
        assert_eq!(
            reduced,
            vec![p(0.5, 0.5), p(2.5, 0.5), p(4.5, 2.5), p(4.5, 3.5)]
        );
    }

    #[test]
    fn test_collinear_reversal_is_kept() {
        let path = vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)];
        assert_eq!(reduce_collinear(&path, 1e-9), path);
    }

    #[test]
    fn test_collinear_idempotent() {
        let path = vec![
            p(0.5, 0.5),
            p(1.5, 1.5),
            p(2.5, 2.5),
            p(3.5, 2.5),
            p(4.5, 2.5),
            p(4.5, 1.5),
            p(5.5, 0.5),
            p(6.5, -0.5),
        ];
        let once = reduce_collinear(&path, 1e-9);
        let twice = reduce_collinear(&once, 1e-9);
        assert_eq!(once, twice);
        assert_eq!(once.first(), path.first());
        assert_eq!(once.last(), path.last());
    }

    #[test]
    fn test_tolerance_absorbs_rounding() {
        // 0.1 steps are not exact in binary, so bearings drift in the last bits
        let path: Vec<Position> = (0..10).map(|i| p(0.05 + 0.1 * i as f64, 0.05 + 0.3 * i as f64)).collect();
        let tolerant = reduce_collinear(&path, 1e-9);
        assert_eq!(tolerant, vec![path[0], path[9]]);
    }

    #[test]
    fn test_simplify_requires_two_points() {
        let grid = OccupancyGrid::open(3, 3, 1.0, Position::origin()).unwrap();
        let simplifier = PathSimplifier::with_defaults(&grid);

        assert!(matches!(
            simplifier.simplify(&[]),
            Err(NavigationError::PathTooShortToSimplify { len: 0 })
        ));
        assert!(matches!(
            simplifier.simplify(&[p(0.5, 0.5)]),
            Err(NavigationError::PathTooShortToSimplify { len: 1 })
        ));

        let pair = vec![p(0.5, 0.5), p(2.5, 1.5)];
        assert_eq!(simplifier.simplify(&pair).unwrap(), pair);
    }

    #[test]
    fn test_line_of_sight_open_grid() {
        let grid = OccupancyGrid::open(3, 3, 1.0, Position::origin()).unwrap();
        let simplifier = PathSimplifier::with_defaults(&grid);

        let path = vec![p(0.5, 0.5), p(0.5, 2.5), p(2.5, 2.5)];
        assert_eq!(
            simplifier.reduce_line_of_sight(&path),
            vec![p(0.5, 0.5), p(2.5, 2.5)]
        );
    }

    #[test]
    fn test_line_of_sight_keeps_corner_around_obstacle() {
        let rows = vec![vec![0, 0, 0], vec![0, 100, 0], vec![0, 0, 0]];
        let grid = OccupancyGrid::from_rows(&rows, 1.0, Position::origin()).unwrap();
        let simplifier = PathSimplifier::with_defaults(&grid);

        assert!(!simplifier.segment_is_clear(&p(0.5, 0.5), &p(2.5, 2.5)));
        assert!(simplifier.segment_is_clear(&p(0.5, 0.5), &p(0.5, 2.5)));

        let path = vec![p(0.5, 0.5), p(0.5, 2.5), p(2.5, 2.5)];
        assert_eq!(simplifier.reduce_line_of_sight(&path), path);
    }

    #[test]
    fn test_line_of_sight_checks_from_retained_points() {
        // 3 rows x 5 cols, only the cell right of the start is blocked
        let rows = vec![vec![0, 100, 0, 0, 0], vec![0; 5], vec![0; 5]];
        let grid = OccupancyGrid::from_rows(&rows, 1.0, Position::origin()).unwrap();
        let simplifier = PathSimplifier::with_defaults(&grid);

        let (a, b, c, d) = (p(0.5, 0.5), p(0.5, 1.5), p(1.5, 2.5), p(4.5, 0.5));
        // b itself would see d, but b is dropped before d is considered
        assert!(simplifier.segment_is_clear(&b, &d));
        assert!(!simplifier.segment_is_clear(&a, &d));

        let reduced = simplifier.reduce_line_of_sight(&[a, b, c, d]);
        assert_eq!(reduced, vec![a, c, d]);
        for pair in reduced.windows(2) {
            assert!(simplifier.segment_is_clear(&pair[0], &pair[1]));
        }
    }

    #[test]
    fn test_default_tolerance_merges_rounding_noise() {
        let path = vec![p(0.0, 0.0), p(1.0, 0.0), p(2.0, 1e-10)];
        let tolerance = SimplifySettings::default().bearing_tolerance;

        assert_eq!(reduce_collinear(&path, tolerance), vec![path[0], path[2]]);
        assert_eq!(reduce_collinear(&path, 0.0), path);
    }

    #[test]
    fn test_line_of_sight_leaving_grid_is_blocked() {
        let grid = OccupancyGrid::open(2, 2, 1.0, Position::origin()).unwrap();
        let simplifier = PathSimplifier::with_defaults(&grid);
        assert!(!simplifier.segment_is_clear(&p(0.5, 0.5), &p(3.5, 0.5)));
    }

    #[test]
    fn test_passes_can_be_disabled() {
        let grid = OccupancyGrid::open(4, 4, 1.0, Position::origin()).unwrap();
        let settings = SimplifySettings {
            collinear: false,
            line_of_sight: false,
            ..SimplifySettings::default()
        };
        let simplifier = PathSimplifier::new(&grid, settings).unwrap();

        let path = vec![p(0.5, 0.5), p(1.5, 0.5), p(2.5, 0.5)];
        assert_eq!(simplifier.simplify(&path).unwrap(), path);
    }

    #[test]
    fn test_invalid_step_rejected() {
        let grid = OccupancyGrid::open(2, 2, 1.0, Position::origin()).unwrap();
        let settings = SimplifySettings {
            los_step: -0.02,
            ..SimplifySettings::default()
        };
        assert!(matches!(
            PathSimplifier::new(&grid, settings),
            Err(NavigationError::InvalidParameter(_))
        ));
    }
}
