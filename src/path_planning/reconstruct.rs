//! Turn the parent chain left by a search into an ordered waypoint list

use log::{debug, error};

use crate::common::{GridAdapter, NavigationError, NavigationResult, Waypoints};
use crate::path_planning::a_star::SearchOutcome;

/// Walk parent links from the goal back to the start and return the cell
/// centers in start-to-goal order, both endpoints included.
///
/// The walk is bounded by the number of grid cells; a longer chain can only
/// come from a cycle and is reported as [`NavigationError::BrokenParentChain`].
pub fn reconstruct_path<G: GridAdapter + ?Sized>(
    grid: &G,
    outcome: &SearchOutcome,
) -> NavigationResult<Waypoints> {
    let limit = grid.cell_count();
    let mut path = vec![outcome.goal.world_position];
    let mut current = outcome.goal.index;
    let mut steps = 0;

    while current != outcome.start.index {
        let parent = if steps < limit {
            outcome
                .parent_of(current)
                .and_then(|index| grid.cell_at_index(index))
        } else {
            None
        };
        let parent = match parent {
            Some(cell) => cell,
            None => {
                error!("parent chain broken at cell {} after {} steps", current, steps);
                return Err(NavigationError::BrokenParentChain { steps });
            }
        };

        path.push(parent.world_position);
        current = parent.index;
        steps += 1;
    }

    path.reverse();
    debug!("reconstructed path with {} waypoints", path.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{CellIndex, Position};
    use crate::path_planning::a_star::{AStarPlanner, SearchNode};
    use crate::utils::OccupancyGrid;
    use std::collections::HashMap;

    fn grid() -> OccupancyGrid {
        OccupancyGrid::open(4, 4, 1.0, Position::origin()).unwrap()
    }

    fn outcome_with_chain(grid: &OccupancyGrid, chain: &[(CellIndex, Option<CellIndex>)], start: CellIndex, goal: CellIndex) -> SearchOutcome {
        let nodes: HashMap<CellIndex, SearchNode> = chain
            .iter()
            .map(|&(index, parent)| (index, SearchNode::new(0.0, 0.0, parent)))
            .collect();
        SearchOutcome {
            start: grid.cell_at_index(start).unwrap(),
            goal: grid.cell_at_index(goal).unwrap(),
            nodes,
            expanded: chain.len(),
        }
    }

    #[test]
    fn test_reconstruct_from_search() {
        let grid = grid();
        let outcome = AStarPlanner::with_defaults(&grid)
            .find_path(Position::planar(0.5, 0.5), Position::planar(3.5, 0.5))
            .unwrap();

        let path = reconstruct_path(&grid, &outcome).unwrap();
        assert_eq!(
            path,
            vec![
                Position::planar(0.5, 0.5),
                Position::planar(1.5, 0.5),
                Position::planar(2.5, 0.5),
                Position::planar(3.5, 0.5),
            ]
        );
    }

    #[test]
    fn test_single_cell_path() {
        let grid = grid();
        let index = CellIndex::new(2, 2);
        let outcome = outcome_with_chain(&grid, &[(index, None)], index, index);

        let path = reconstruct_path(&grid, &outcome).unwrap();
        assert_eq!(path, vec![Position::planar(2.5, 2.5)]);
    }

    #[test]
    fn test_missing_parent() {
        let grid = grid();
        let start = CellIndex::new(0, 0);
        let goal = CellIndex::new(0, 2);
        let chain = [(goal, Some(CellIndex::new(0, 1))), (CellIndex::new(0, 1), None)];
        let outcome = outcome_with_chain(&grid, &chain, start, goal);

        let err = reconstruct_path(&grid, &outcome).unwrap_err();
        assert!(matches!(err, NavigationError::BrokenParentChain { steps: 1 }));
    }

    #[test]
    fn test_cyclic_chain_is_bounded() {
        let grid = grid();
        let a = CellIndex::new(1, 1);
        let b = CellIndex::new(1, 2);
        let chain = [(a, Some(b)), (b, Some(a))];
        let outcome = outcome_with_chain(&grid, &chain, CellIndex::new(0, 0), a);

        let err = reconstruct_path(&grid, &outcome).unwrap_err();
        assert!(matches!(err, NavigationError::BrokenParentChain { steps: 16 }));
    }

    #[test]
    fn test_parent_outside_grid() {
        let grid = grid();
        let goal = CellIndex::new(0, 1);
        let chain = [(goal, Some(CellIndex::new(9, 9)))];
        let outcome = outcome_with_chain(&grid, &chain, CellIndex::new(0, 0), goal);

        assert!(matches!(
            reconstruct_path(&grid, &outcome),
            Err(NavigationError::BrokenParentChain { steps: 0 })
        ));
    }
}
