//! Goal-directed best-first search from the head toward the food
//!
//! Only the first step of the plan is returned. When the food cannot be
//! reached the search heads for the last cell it explored instead, and when
//! the head is boxed in it falls back to a greedy wiggle.

use std::collections::{BTreeSet, HashMap, HashSet};

use rand::seq::SliceRandom;
use rand::Rng;

use crate::game::{Cell, Direction, GameState};

/// What the returned direction is heading for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget {
    /// The food was reached
    Goal,
    /// Food unreachable; heading for the last explored cell
    Farthest(Cell),
    /// Nothing explored; greedy step toward the food
    Wiggle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchOutcome {
    pub direction: Direction,
    pub target: SearchTarget,
    /// Frontier nodes popped and expanded
    pub expanded: usize,
}

/// Heuristic search state that survives between ticks.
///
/// Only the wiggle alternation persists; frontier, explored set and parent
/// map are rebuilt on every call.
#[derive(Debug, Clone, Default)]
pub struct HeuristicSearch {
    reversed: bool,
}

/// Squared straight-line distance. Orders cells exactly like the Euclidean
/// distance while staying an integer key.
fn heuristic(cell: Cell, goal: Cell) -> i32 {
    let d_row = goal.row - cell.row;
    let d_col = goal.col - cell.col;
    d_row * d_row + d_col * d_col
}

impl HeuristicSearch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plan from `start` toward the food of `state`
    pub fn plan<R: Rng + ?Sized>(
        &mut self,
        state: &GameState,
        start: Cell,
        rng: &mut R,
    ) -> SearchOutcome {
        let goal = state.food;
        let grid = state.grid;
        let safe = |cell: Cell| state.is_free(cell);

        let mut parents: HashMap<Cell, Cell> = HashMap::new();
        let mut frontier: BTreeSet<(i32, Cell)> = BTreeSet::new();

        for next in grid.neighbors(start).filter(|cell| safe(*cell)) {
            parents.entry(next).or_insert(start);
            if next == goal {
                if let Some(direction) = start.direction_to(next) {
                    return SearchOutcome {
                        direction,
                        target: SearchTarget::Goal,
                        expanded: 0,
                    };
                }
            }
            frontier.insert((heuristic(next, goal), next));
        }

        let mut explored: Vec<Cell> = Vec::new();
        let mut explored_set: HashSet<Cell> = HashSet::from([start]);
        let mut found = false;

        while let Some((_, node)) = frontier.pop_first() {
            explored.push(node);
            explored_set.insert(node);

            for next in grid.neighbors(node).filter(|cell| safe(*cell)) {
                parents.entry(next).or_insert(node);
                if explored_set.contains(&next) {
                    continue;
                }
                if next == goal {
                    found = true;
                    break;
                }
                frontier.insert((heuristic(next, goal), next));
            }

            if found {
                break;
            }
        }

        let expanded = explored.len();
        let target = if found {
            Some((goal, SearchTarget::Goal))
        } else {
            explored
                .last()
                .map(|&cell| (cell, SearchTarget::Farthest(cell)))
        };

        if let Some((cell, target)) = target {
            if let Some(direction) = first_step(&parents, start, cell) {
                return SearchOutcome {
                    direction,
                    target,
                    expanded,
                };
            }
        }

        SearchOutcome {
            direction: self.wiggle(state, start, rng),
            target: SearchTarget::Wiggle,
            expanded,
        }
    }

    /// Greedy step toward the food among safe moves.
    ///
    /// The scan order flips on every call so a snake wedged in a pocket does
    /// not keep choosing the same side.
    pub fn wiggle<R: Rng + ?Sized>(&mut self, state: &GameState, start: Cell, rng: &mut R) -> Direction {
        let goal = state.food;
        let mut toward_goal = Vec::with_capacity(2);
        if goal.row < start.row {
            toward_goal.push(Direction::Up);
        } else if goal.row > start.row {
            toward_goal.push(Direction::Down);
        }
        if goal.col < start.col {
            toward_goal.push(Direction::Left);
        } else if goal.col > start.col {
            toward_goal.push(Direction::Right);
        }

        let mut safe_moves: Vec<Direction> = Direction::ALL
            .into_iter()
            .filter(|direction| state.is_free(start.moved_in_direction(*direction)))
            .collect();

        self.reversed = !self.reversed;
        if self.reversed {
            safe_moves.reverse();
        }

        if let Some(&direction) = safe_moves.iter().find(|d| toward_goal.contains(d)) {
            return direction;
        }

        // No safe move at all means the snake is already lost
        safe_moves
            .choose(rng)
            .copied()
            .unwrap_or(state.snake.direction())
    }
}

/// Follow parents from `target` back to the child of `start`
fn first_step(parents: &HashMap<Cell, Cell>, start: Cell, target: Cell) -> Option<Direction> {
    let mut cell = target;
    loop {
        let parent = *parents.get(&cell)?;
        if parent == start {
            return start.direction_to(cell);
        }
        cell = parent;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::{Grid, Snake};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn state_with(cells: &[(i32, i32)], direction: Direction, food: (i32, i32), size: usize) -> GameState {
        let cells: Vec<Cell> = cells.iter().map(|&(r, c)| Cell::new(r, c)).collect();
        let snake = Snake::from_cells(&cells, direction).unwrap();
        GameState::new(snake, Cell::new(food.0, food.1), Grid::new(size, size))
    }

    #[test]
    fn test_adjacent_food_needs_no_expansion() {
        let state = state_with(&[(5, 5), (5, 4), (5, 3)], Direction::Right, (4, 5), 10);
        let mut search = HeuristicSearch::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = search.plan(&state, state.snake.head(), &mut rng);
        assert_eq!(outcome.direction, Direction::Up);
        assert_eq!(outcome.target, SearchTarget::Goal);
        assert_eq!(outcome.expanded, 0);
    }

    #[test]
    fn test_heads_for_distant_food() {
        let state = state_with(&[(5, 5), (5, 4), (5, 3)], Direction::Right, (5, 9), 10);
        let mut search = HeuristicSearch::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = search.plan(&state, state.snake.head(), &mut rng);
        assert_eq!(outcome.direction, Direction::Right);
        assert_eq!(outcome.target, SearchTarget::Goal);
        assert!(outcome.expanded > 0);
    }

    #[test]
    fn test_goes_around_own_body() {
        // Body wall across column 6 from row 3 to row 7; food behind it
        let state = state_with(
            &[(5, 5), (4, 5), (3, 5), (3, 6), (4, 6), (5, 6), (6, 6), (7, 6)],
            Direction::Down,
            (5, 8),
            10,
        );
        let mut search = HeuristicSearch::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = search.plan(&state, state.snake.head(), &mut rng);
        assert_eq!(outcome.target, SearchTarget::Goal);
        // Only down and left are open from the head
        assert!(matches!(outcome.direction, Direction::Down | Direction::Left));
    }

    #[test]
    fn test_unreachable_food_falls_back_to_farthest_explored() {
        // Food in the top-right corner sealed by the body at (0,3) and (1,4)
        let state = state_with(
            &[(2, 4), (1, 4), (1, 3), (0, 3)],
            Direction::Down,
            (0, 4),
            5,
        );
        let mut search = HeuristicSearch::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = search.plan(&state, state.snake.head(), &mut rng);
        assert!(matches!(outcome.target, SearchTarget::Farthest(_)));
        // Every free cell except the sealed food gets expanded once
        assert_eq!(outcome.expanded, 25 - 4 - 1);
        assert!(matches!(outcome.direction, Direction::Down | Direction::Left));
    }

    #[test]
    fn test_boxed_in_head_wiggles() {
        // Corner head with both exits taken by its own body
        let state = state_with(
            &[(0, 0), (1, 0), (1, 1), (0, 1), (0, 2)],
            Direction::Up,
            (2, 2),
            3,
        );
        let mut search = HeuristicSearch::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        let outcome = search.plan(&state, state.snake.head(), &mut rng);
        assert_eq!(outcome.target, SearchTarget::Wiggle);
        assert_eq!(outcome.expanded, 0);
        // No safe move: keeps its heading
        assert_eq!(outcome.direction, Direction::Up);
    }

    #[test]
    fn test_wiggle_prefers_food_and_alternates() {
        let state = state_with(&[(2, 2), (2, 1), (2, 0)], Direction::Right, (0, 4), 5);
        let mut search = HeuristicSearch::new();
        let mut rng = ChaCha8Rng::seed_from_u64(1);

        // Safe: Up, Down, Right. Toward food: Up, Right.
        let first = search.wiggle(&state, state.snake.head(), &mut rng);
        let second = search.wiggle(&state, state.snake.head(), &mut rng);
        assert_eq!(first, Direction::Right);
        assert_eq!(second, Direction::Up);
    }
}
