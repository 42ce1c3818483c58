//! A* path search over an occupancy grid
//!
//! Edge cost and heuristic are both the 3D Euclidean distance between
//! cell centers, so the heuristic is admissible and consistent and the
//! first time the goal cell is expanded its cost is optimal.
//!
//! The open set is a binary heap ordered by `(f_cost, h_cost, insertion
//! order)`: among cells with equal total cost the one closer to the goal
//! is expanded first. Improved cells are pushed again and superseded heap
//! entries are discarded when popped, so a cell is logically in the open
//! set at most once.
//!
//! All per-search bookkeeping (costs, parents, closed set) lives in maps
//! owned by the call, never on the grid, so several searches may run over
//! the same grid at the same time.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, HashSet};
use std::time::Instant;

use log::{debug, info, trace, warn};
use ordered_float::OrderedFloat;

use crate::common::{CellIndex, Endpoint, GridAdapter, GridCell, NavigationError, NavigationResult, Position};
use crate::config::SearchSettings;

/// Search bookkeeping for one discovered cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SearchNode {
    /// Cost from the start cell
    pub g_cost: f64,
    /// Heuristic estimate to the goal cell
    pub h_cost: f64,
    /// Cell this one was reached from (`None` for the start cell)
    pub parent: Option<CellIndex>,
    /// Sequence number of the heap entry that currently represents the cell
    seq: u64,
}

impl SearchNode {
    pub fn new(g_cost: f64, h_cost: f64, parent: Option<CellIndex>) -> Self {
        Self {
            g_cost,
            h_cost,
            parent,
            seq: 0,
        }
    }

    pub fn f_cost(&self) -> f64 {
        self.g_cost + self.h_cost
    }
}

/// Result of a successful search: the resolved endpoints plus the parent
/// chain that encodes the optimal path
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub start: GridCell,
    pub goal: GridCell,
    pub nodes: HashMap<CellIndex, SearchNode>,
    /// Number of cells moved to the closed set
    pub expanded: usize,
}

impl SearchOutcome {
    pub fn parent_of(&self, index: CellIndex) -> Option<CellIndex> {
        self.nodes.get(&index).and_then(|node| node.parent)
    }

    /// Path cost from start to goal
    pub fn cost(&self) -> f64 {
        self.nodes
            .get(&self.goal.index)
            .map_or(f64::INFINITY, |node| node.g_cost)
    }
}

/// Heap entry for the open set (min-heap on f, then h, then insertion order)
#[derive(Debug)]
struct OpenEntry {
    f_cost: OrderedFloat<f64>,
    h_cost: OrderedFloat<f64>,
    seq: u64,
    cell: GridCell,
}

impl OpenEntry {
    fn new(cell: GridCell, node: &SearchNode) -> Self {
        Self {
            f_cost: OrderedFloat(node.f_cost()),
            h_cost: OrderedFloat(node.h_cost),
            seq: node.seq,
            cell,
        }
    }
}

impl Eq for OpenEntry {}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering for min-heap behavior
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.h_cost.cmp(&self.h_cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// A* planner over any [`GridAdapter`]
pub struct AStarPlanner<'a, G: GridAdapter + ?Sized> {
    grid: &'a G,
    settings: SearchSettings,
}

impl<'a, G: GridAdapter + ?Sized> AStarPlanner<'a, G> {
    pub fn new(grid: &'a G, settings: SearchSettings) -> Self {
        Self { grid, settings }
    }

    pub fn with_defaults(grid: &'a G) -> Self {
        Self::new(grid, SearchSettings::default())
    }

    /// Search for the cheapest walkable path between the cells containing
    /// `start` and `goal`
    pub fn find_path(&self, start: Position, goal: Position) -> NavigationResult<SearchOutcome> {
        let start_cell = self
            .grid
            .cell_at(&start)
            .ok_or(NavigationError::UnreachableEndpoint {
                endpoint: Endpoint::Start,
                position: start,
            })?;
        let goal_cell = self
            .grid
            .cell_at(&goal)
            .ok_or(NavigationError::UnreachableEndpoint {
                endpoint: Endpoint::Goal,
                position: goal,
            })?;

        info!("start => {}", start_cell);
        info!("goal  => {}", goal_cell);

        self.search(start_cell, goal_cell)
    }

    fn search(&self, start: GridCell, goal: GridCell) -> NavigationResult<SearchOutcome> {
        let timer = Instant::now();

        let mut nodes: HashMap<CellIndex, SearchNode> = HashMap::new();
        let mut closed_set: HashSet<CellIndex> = HashSet::new();
        let mut open_set = BinaryHeap::new();
        let mut next_seq: u64 = 0;

        let start_node = SearchNode::new(0.0, start.distance(&goal), None);
        open_set.push(OpenEntry::new(start, &start_node));
        nodes.insert(start.index, start_node);

        let mut expanded = 0;
        while let Some(entry) = open_set.pop() {
            let current = entry.cell;

            // superseded by a cheaper entry for the same cell
            if closed_set.contains(&current.index) {
                continue;
            }
            let current_g = match nodes.get(&current.index) {
                Some(node) if node.seq == entry.seq => node.g_cost,
                _ => continue,
            };

            closed_set.insert(current.index);
            expanded += 1;

            if current.index == goal.index {
                debug!(
                    "reached goal after {} expansions in {:.6} s, cost {:.3}",
                    expanded,
                    timer.elapsed().as_secs_f64(),
                    current_g
                );
                return Ok(SearchOutcome {
                    start,
                    goal,
                    nodes,
                    expanded,
                });
            }

            if let Some(limit) = self.settings.max_expansions {
                if expanded >= limit {
                    warn!("search stopped after {} expansions without reaching the goal", expanded);
                    return Err(NavigationError::NoPathFound { expanded });
                }
            }

            if expanded % 1000 == 0 {
                trace!(
                    "expansions: {}, open set: {}, closed set: {}",
                    expanded,
                    open_set.len(),
                    closed_set.len()
                );
            }

            for neighbor in self.grid.neighbors_of(&current) {
                if !neighbor.walkable || closed_set.contains(&neighbor.index) {
                    continue;
                }

                let tentative_g = current_g + current.distance(&neighbor);
                // keep the existing open entry unless this route is strictly cheaper
                if let Some(existing) = nodes.get(&neighbor.index) {
                    if tentative_g >= existing.g_cost {
                        continue;
                    }
                }

                next_seq += 1;
                let node = SearchNode {
                    g_cost: tentative_g,
                    h_cost: neighbor.distance(&goal),
                    parent: Some(current.index),
                    seq: next_seq,
                };
                open_set.push(OpenEntry::new(neighbor, &node));
                nodes.insert(neighbor.index, node);
            }
        }

        debug!(
            "open set exhausted after {} expansions in {:.6} s",
            expanded,
            timer.elapsed().as_secs_f64()
        );
        Err(NavigationError::NoPathFound { expanded })
    }
}
