//! Core game logic module for Snake
//!
//! This module contains all the game logic without any I/O or rendering dependencies.
//! The pilots in [`crate::ai`] read its state; the engine applies their moves.

pub mod action;
pub mod config;
pub mod engine;
pub mod grid;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{spawn_food, GameEngine, GameOver, StepInfo, StepResult};
pub use grid::Grid;
pub use state::{Cell, CollisionType, GameState, Segment, Snake};
