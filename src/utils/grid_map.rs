// Occupancy grid map used as the reference grid adapter
// Cells are addressed by (row, col): rows follow +y, columns follow +x,
// row 0 / col 0 is the cell touching the bottom-left world corner.

use itertools::iproduct;
use log::debug;
extern crate nalgebra as na;

use crate::common::{CellIndex, GridAdapter, GridCell, NavigationError, NavigationResult, Position};

/// Occupancy value at or above which a cell is treated as an obstacle
pub const DEFAULT_OCCUPIED_THRESHOLD: i32 = 50;

pub struct OccupancyGrid {
    occupancy: na::DMatrix<i32>,
    cell_size: f64,
    origin: Position,
    occupied_threshold: i32,
}

impl OccupancyGrid {
    /// Build a grid from an occupancy matrix (`nrows` along y, `ncols` along x).
    ///
    /// Values follow the usual map convention: `0` free, `100` occupied,
    /// `-1` unknown. Unknown cells are not walkable.
    pub fn new(occupancy: na::DMatrix<i32>, cell_size: f64, origin: Position) -> NavigationResult<Self> {
        if !(cell_size.is_finite() && cell_size > 0.0) {
            return Err(NavigationError::InvalidParameter(format!(
                "cell size must be positive, got {}",
                cell_size
            )));
        }
        if occupancy.is_empty() {
            return Err(NavigationError::InvalidParameter("occupancy grid is empty".to_string()));
        }

        debug!(
            "occupancy grid {}x{} cells of {:.3} m at {}",
            occupancy.nrows(),
            occupancy.ncols(),
            cell_size,
            origin
        );

        Ok(Self {
            occupancy,
            cell_size,
            origin,
            occupied_threshold: DEFAULT_OCCUPIED_THRESHOLD,
        })
    }

    /// Build a grid from row vectors, `rows[0]` being the bottom row
    pub fn from_rows(rows: &[Vec<i32>], cell_size: f64, origin: Position) -> NavigationResult<Self> {
        let ncols = rows.first().map_or(0, |r| r.len());
        if rows.iter().any(|r| r.len() != ncols) {
            return Err(NavigationError::InvalidParameter(
                "occupancy rows must all have the same length".to_string(),
            ));
        }
        let occupancy = na::DMatrix::from_fn(rows.len(), ncols, |r, c| rows[r][c]);
        Self::new(occupancy, cell_size, origin)
    }

    /// Grid of `rows` x `cols` free cells
    pub fn open(rows: usize, cols: usize, cell_size: f64, origin: Position) -> NavigationResult<Self> {
        Self::new(na::DMatrix::zeros(rows, cols), cell_size, origin)
    }

    pub fn with_occupied_threshold(mut self, threshold: i32) -> Self {
        self.occupied_threshold = threshold;
        self
    }

    /// Split every cell into `scale` x `scale` cells covering the same area
    pub fn upsample(&self, scale: usize) -> NavigationResult<Self> {
        if scale < 1 {
            return Err(NavigationError::InvalidParameter("scale must be >= 1".to_string()));
        }
        let occupancy = self
            .occupancy
            .kronecker(&na::DMatrix::<i32>::repeat(scale, scale, 1));
        Ok(Self {
            occupancy,
            cell_size: self.cell_size / scale as f64,
            origin: self.origin,
            occupied_threshold: self.occupied_threshold,
        })
    }

    pub fn rows(&self) -> usize {
        self.occupancy.nrows()
    }

    pub fn cols(&self) -> usize {
        self.occupancy.ncols()
    }

    pub fn cell_size(&self) -> f64 {
        self.cell_size
    }

    pub fn origin(&self) -> Position {
        self.origin
    }

    /// World extent as (width along x, height along y)
    pub fn world_size(&self) -> (f64, f64) {
        (
            self.cols() as f64 * self.cell_size,
            self.rows() as f64 * self.cell_size,
        )
    }

    pub fn occupancy(&self, index: CellIndex) -> Option<i32> {
        self.occupancy.get((index.row, index.col)).copied()
    }

    fn is_free_value(&self, value: i32) -> bool {
        (0..self.occupied_threshold).contains(&value)
    }

    /// Grid indices of the cell containing `position`
    pub fn world_to_index(&self, position: &Position) -> Option<CellIndex> {
        let col = Self::axis_index((position.x - self.origin.x) / self.cell_size, self.cols())?;
        let row = Self::axis_index((position.y - self.origin.y) / self.cell_size, self.rows())?;
        Some(CellIndex::new(row, col))
    }

    fn axis_index(scaled: f64, len: usize) -> Option<usize> {
        // also rejects NaN
        if !(scaled >= 0.0) {
            return None;
        }
        let index = scaled.floor();
        if index < len as f64 {
            Some(index as usize)
        } else {
            None
        }
    }

    /// World position of a cell center
    pub fn cell_center(&self, index: CellIndex) -> Position {
        Position::new(
            self.origin.x + (index.col as f64 + 0.5) * self.cell_size,
            self.origin.y + (index.row as f64 + 0.5) * self.cell_size,
            self.origin.z,
        )
    }

    /// Centers of all non-walkable cells
    pub fn obstacle_positions(&self) -> Vec<Position> {
        iproduct!(0..self.rows(), 0..self.cols())
            .map(|(row, col)| CellIndex::new(row, col))
            .filter(|&index| !self.occupancy(index).map_or(false, |v| self.is_free_value(v)))
            .map(|index| self.cell_center(index))
            .collect()
    }
}

impl GridAdapter for OccupancyGrid {
    fn cell_at(&self, position: &Position) -> Option<GridCell> {
        self.world_to_index(position)
            .and_then(|index| self.cell_at_index(index))
    }

    fn cell_at_index(&self, index: CellIndex) -> Option<GridCell> {
        let value = self.occupancy(index)?;
        Some(GridCell::new(index, self.cell_center(index), self.is_free_value(value)))
    }

    fn neighbors_of(&self, cell: &GridCell) -> Vec<GridCell> {
        let (row, col) = (cell.index.row as i64, cell.index.col as i64);
        iproduct!(-1i64..=1, -1i64..=1)
            .filter(|&(dr, dc)| (dr, dc) != (0, 0))
            .filter_map(|(dr, dc)| {
                let (nr, nc) = (row + dr, col + dc);
                if nr < 0 || nc < 0 {
                    return None;
                }
                self.cell_at_index(CellIndex::new(nr as usize, nc as usize))
            })
            .collect()
    }

    fn cell_count(&self) -> usize {
        self.occupancy.len()
    }
}
