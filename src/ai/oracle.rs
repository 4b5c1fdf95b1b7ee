//! Lookahead safety checks on a throwaway copy of the snake
//!
//! A [`VirtualSnake`] owns a deep copy of the body, heading, turn map and food,
//! replays candidate moves with the same movement code as the real game and
//! then asks whether its head can still reach its own tail. Nothing done to
//! the copy is visible to the state it was cloned from.

use std::collections::HashSet;

use super::bfs::shortest_path;
use crate::game::{Cell, GameState, Grid, Snake};

/// Shortest route from the head to the tail of `snake`.
///
/// The tail cell counts as open since it moves away on the next tick.
pub fn path_to_tail(grid: &Grid, snake: &Snake) -> Vec<Cell> {
    let body: HashSet<Cell> = snake.cells().take(snake.len() - 1).collect();
    shortest_path(grid, snake.head(), snake.tail(), |cell| !body.contains(&cell))
}

/// A hypothetical snake used only to look ahead
#[derive(Debug, Clone)]
pub struct VirtualSnake {
    grid: Grid,
    snake: Snake,
    food: Cell,
    ate: bool,
    alive: bool,
}

impl VirtualSnake {
    pub fn from_state(state: &GameState) -> Self {
        Self {
            grid: state.grid,
            snake: state.snake.clone(),
            food: state.food,
            ate: false,
            alive: state.is_alive,
        }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether the copy has eaten the food during the replay
    pub fn ate(&self) -> bool {
        self.ate
    }

    /// Move the head onto an adjacent cell.
    ///
    /// Returns false, and marks the copy dead, if the snake would not end up
    /// on `cell` alive: a reversal the snake refuses, a wall, or its own body.
    pub fn step_to(&mut self, cell: Cell) -> bool {
        if !self.alive {
            return false;
        }

        self.snake.go_to(cell);
        let vacated = self.snake.advance();
        let head = self.snake.head();

        if head != cell || !self.grid.in_bounds(head) || self.snake.collides_with_body(head) {
            self.alive = false;
            return false;
        }

        // The copy never respawns food, so it can grow at most once
        if !self.ate && head == self.food {
            self.snake.grow(vacated);
            self.ate = true;
        }

        true
    }

    /// Replay a whole path, stopping at the first fatal step
    pub fn follow(&mut self, path: &[Cell]) -> bool {
        path.iter().all(|&cell| self.step_to(cell))
    }

    pub fn path_to_tail(&self) -> Vec<Cell> {
        path_to_tail(&self.grid, &self.snake)
    }

    /// The survivability test: can the head still reach the tail?
    pub fn has_path_to_tail(&self) -> bool {
        if !self.alive {
            return false;
        }
        self.snake.len() < 2 || !self.path_to_tail().is_empty()
    }
}

/// Certify that following `path` from `state` keeps a route to the tail open
pub fn is_safe_after(state: &GameState, path: &[Cell]) -> bool {
    let mut lookahead = VirtualSnake::from_state(state);
    lookahead.follow(path) && lookahead.has_path_to_tail()
}
