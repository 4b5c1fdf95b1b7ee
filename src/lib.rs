//! Snake Autopilot - A Snake game that plays itself
//!
//! This library provides:
//! - Core game logic: grid, snake movement with a turn map, food and growth (game module)
//! - Path search and lookahead safety checks (ai module)
//! - Per-game and per-run statistics (metrics module)
//! - A headless runner that plays games back to back (modes module)

pub mod ai;
pub mod error;
pub mod game;
pub mod metrics;
pub mod modes;
