//! The cascading decision policy
//!
//! Strategies are tried in a fixed order and the first one that produces a
//! move wins:
//!
//! 1. win-imminent shortcut onto adjacent food
//! 2. shortest path to the food, if a virtual snake that follows it and eats
//!    can still reach its tail
//! 3. on even scores, while not stalling for too long: the certified-safe
//!    neighbour farthest from the tail
//! 4. a random certified-safe neighbour
//! 5. the shortest path to the tail
//! 6. nothing: keep the heading and report it

use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, warn};

use super::bfs::shortest_path;
use super::oracle::{is_safe_after, path_to_tail, VirtualSnake};
use super::pilot::{Decision, Diagnostic, Pilot, Strategy};
use crate::error::Result;
use crate::game::{Cell, GameState};

pub struct CascadePilot {
    rng: ChaCha8Rng,
    stall_cap: u32,
}

/// Safety verdicts for single steps, valid for one snapshot only
#[derive(Default)]
struct StepVerdicts(HashMap<Cell, bool>);

impl StepVerdicts {
    fn is_safe(&mut self, state: &GameState, cell: Cell) -> bool {
        *self
            .0
            .entry(cell)
            .or_insert_with(|| is_safe_after(state, &[cell]))
    }
}

impl CascadePilot {
    pub fn new(stall_cap: u32, rng: ChaCha8Rng) -> Self {
        Self { rng, stall_cap }
    }

    fn win_imminent(&self, state: &GameState) -> Option<Decision> {
        let head = state.snake.head();
        if state.score + 1 != state.max_score() || head.manhattan(state.food) != 1 {
            return None;
        }
        info!(score = state.score, "snake is about to win");
        Decision::along(head, vec![state.food], Strategy::WinImminent)
            .map(|decision| decision.with_diagnostic(Diagnostic::WinImminent))
    }

    fn direct_path(&self, state: &GameState) -> Option<Decision> {
        let head = state.snake.head();
        let path = shortest_path(&state.grid, head, state.food, |cell| state.is_free(cell));
        if path.is_empty() {
            return None;
        }

        // The copy grows when it reaches the food at the end of the path
        let mut lookahead = VirtualSnake::from_state(state);
        if !(lookahead.follow(&path) && lookahead.has_path_to_tail()) {
            debug!(length = path.len(), "path to food would trap the snake");
            return None;
        }

        Decision::along(head, path, Strategy::DirectPath)
    }

    fn longest_to_tail(&self, state: &GameState, verdicts: &mut StepVerdicts) -> Option<Decision> {
        if state.score % 2 != 0 || state.moves_without_eating >= self.stall_cap / 2 {
            return None;
        }

        let tail = state.snake.tail();
        let mut best = i32::MIN;
        let mut chosen = None;
        for cell in available_neighbors(state) {
            let distance = cell.manhattan(tail);
            if distance > best && verdicts.is_safe(state, cell) {
                best = distance;
                chosen = Some(cell);
            }
        }

        Decision::along(state.snake.head(), vec![chosen?], Strategy::LongestToTail)
    }

    fn any_safe_move(&mut self, state: &GameState, verdicts: &mut StepVerdicts) -> Option<Decision> {
        let candidates = available_neighbors(state);
        let &cell = candidates.choose(&mut self.rng)?;
        if !verdicts.is_safe(state, cell) {
            return None;
        }
        Decision::along(state.snake.head(), vec![cell], Strategy::AnySafeMove)
    }

    fn chase_tail(&self, state: &GameState) -> Option<Decision> {
        let path = path_to_tail(&state.grid, &state.snake);
        Decision::along(state.snake.head(), path, Strategy::ChaseTail)
    }
}

/// Free neighbours of the head, excluding the food cell
fn available_neighbors(state: &GameState) -> Vec<Cell> {
    state
        .grid
        .neighbors(state.snake.head())
        .filter(|&cell| state.is_free(cell) && cell != state.food)
        .collect()
}

impl Pilot for CascadePilot {
    fn name(&self) -> &'static str {
        "cascade"
    }

    fn plan(&mut self, state: &GameState) -> Result<Decision> {
        state.validate()?;
        let mut verdicts = StepVerdicts::default();

        let decision = self
            .win_imminent(state)
            .or_else(|| self.direct_path(state))
            .or_else(|| self.longest_to_tail(state, &mut verdicts))
            .or_else(|| self.any_safe_move(state, &mut verdicts))
            .or_else(|| self.chase_tail(state));

        let decision = match decision {
            Some(decision) => decision,
            None => {
                warn!(head = %state.snake.head(), score = state.score, "no available path, snake in danger");
                Decision {
                    direction: state.snake.direction(),
                    strategy: Strategy::NoOption,
                    path: Vec::new(),
                    diagnostic: Some(Diagnostic::NoSafeMove),
                }
            }
        };

        debug!(
            strategy = decision.strategy.as_str(),
            direction = decision.direction.as_str(),
            "cascade decision"
        );
        Ok(decision)
    }
}
