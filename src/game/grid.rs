use serde::{Deserialize, Serialize};

use super::action::Direction;
use super::state::Cell;

/// Fixed board topology. Cheap to copy and never mutated after creation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Grid {
    pub rows: usize,
    pub cols: usize,
}

impl Grid {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self { rows, cols }
    }

    /// Check if a cell is within the grid bounds
    pub fn in_bounds(&self, cell: Cell) -> bool {
        cell.row >= 0
            && cell.row < self.rows as i32
            && cell.col >= 0
            && cell.col < self.cols as i32
    }

    /// In-bounds neighbours of `cell`, in [`Direction::ALL`] order
    pub fn neighbors(&self, cell: Cell) -> impl Iterator<Item = Cell> + '_ {
        Direction::ALL
            .into_iter()
            .map(move |direction| cell.moved_in_direction(direction))
            .filter(move |next| self.in_bounds(*next))
    }

    pub fn cell_count(&self) -> usize {
        self.rows * self.cols
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        (0..self.rows as i32)
            .flat_map(move |row| (0..self.cols as i32).map(move |col| Cell::new(row, col)))
    }

    pub fn center(&self) -> Cell {
        Cell::new((self.rows / 2) as i32, (self.cols / 2) as i32)
    }
}
