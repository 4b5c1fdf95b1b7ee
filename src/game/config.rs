use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::grid::Grid;
use crate::ai::PilotKind;
use crate::error::SnakeError;

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Number of rows in the grid
    pub rows: usize,
    /// Number of columns in the grid
    pub cols: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// The game is abandoned after this many moves without eating.
    /// `None` scales the cap with the board size.
    pub max_moves_without_eating: Option<u32>,
    /// Seed for food placement and pilot tie-breaks; `None` draws from entropy
    pub seed: Option<u64>,
    /// Which pilot drives the snake
    pub pilot: PilotKind,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(17, 17)
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            initial_snake_length: 3,
            max_moves_without_eating: None,
            seed: None,
            pilot: PilotKind::default(),
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self::new(10, 10)
    }

    /// Create a large grid
    pub fn large() -> Self {
        Self::new(30, 30)
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn with_pilot(mut self, pilot: PilotKind) -> Self {
        self.pilot = pilot;
        self
    }

    /// Moves without eating after which a game counts as stalled
    pub fn stall_cap(&self) -> u32 {
        self.max_moves_without_eating
            .unwrap_or_else(|| default_stall_cap(self.rows, self.cols))
    }

    pub fn grid(&self) -> Grid {
        Grid::new(self.rows, self.cols)
    }

    /// Validate configuration parameters
    ///
    /// The snake spawns at the centre heading right with its body trailing to
    /// the left, so it must fit between the centre column and the left wall.
    pub fn validate(&self) -> Result<(), SnakeError> {
        if self.rows == 0 || self.cols == 0 {
            return Err(SnakeError::InvalidConfig(format!(
                "grid must be non-empty, got {}x{}",
                self.rows, self.cols
            )));
        }

        if self.initial_snake_length == 0 {
            return Err(SnakeError::InvalidConfig(
                "initial_snake_length must be at least 1".to_string(),
            ));
        }

        let room = self.cols / 2 + 1;
        if self.initial_snake_length > room {
            return Err(SnakeError::InvalidConfig(format!(
                "initial_snake_length ({}) does not fit a grid {} columns wide (max {})",
                self.initial_snake_length, self.cols, room
            )));
        }

        if self.initial_snake_length >= self.rows * self.cols {
            return Err(SnakeError::InvalidConfig(format!(
                "initial_snake_length ({}) leaves no room for food on a {}x{} grid",
                self.initial_snake_length, self.rows, self.cols
            )));
        }

        if self.max_moves_without_eating == Some(0) {
            return Err(SnakeError::InvalidConfig(
                "max_moves_without_eating must be at least 1".to_string(),
            ));
        }

        Ok(())
    }

    /// Load and validate a JSON configuration file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config from {:?}", path))?;
        let config: GameConfig = serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config {:?}", path))?;
        config
            .validate()
            .with_context(|| format!("Invalid config in {:?}", path))?;
        Ok(config)
    }
}

/// Generous enough that a careful pilot never hits it on a healthy board
fn default_stall_cap(rows: usize, cols: usize) -> u32 {
    (rows * cols * rows.max(cols) * 2) as u32
}
