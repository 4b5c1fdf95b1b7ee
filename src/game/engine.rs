use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use super::{
    action::{Action, Direction},
    config::GameConfig,
    grid::Grid,
    state::{Cell, CollisionType, GameState, Snake},
};

/// Why a game ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameOver {
    Collision(CollisionType),
    /// Too many moves without eating
    Stalled,
    /// The snake filled the board
    Won,
}

impl GameOver {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameOver::Collision(CollisionType::Wall) => "wall",
            GameOver::Collision(CollisionType::SelfCollision) => "self_collision",
            GameOver::Stalled => "stalled",
            GameOver::Won => "won",
        }
    }
}

/// Information about a step
#[derive(Debug, Clone, PartialEq)]
pub struct StepInfo {
    /// Whether the snake ate food this step
    pub ate_food: bool,
    /// How the game ended, if it ended this step
    pub game_over: Option<GameOver>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the game has terminated
    pub terminated: bool,
    /// Additional information about the step
    pub info: StepInfo,
}

impl StepResult {
    fn ongoing(ate_food: bool) -> Self {
        Self {
            terminated: false,
            info: StepInfo {
                ate_food,
                game_over: None,
            },
        }
    }

    fn ended(ate_food: bool, game_over: GameOver) -> Self {
        Self {
            terminated: true,
            info: StepInfo {
                ate_food,
                game_over: Some(game_over),
            },
        }
    }
}

/// The game engine that handles all game logic
pub struct GameEngine {
    config: GameConfig,
    rng: ChaCha8Rng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self { config, rng }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Reset the game to initial state
    pub fn reset(&mut self) -> GameState {
        let grid = self.config.grid();
        let snake = Snake::new(
            grid.center(),
            Direction::Right,
            self.config.initial_snake_length,
        );

        // A validated config leaves at least one free cell, so the fallback is
        // only reached for configs that never went through `validate`
        let food = spawn_food(&grid, &snake, &mut self.rng).unwrap_or(grid.center());

        GameState::new(snake, food, grid)
    }

    /// Execute one step of the game
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        if !state.is_alive {
            return StepResult {
                terminated: true,
                info: StepInfo {
                    ate_food: false,
                    game_over: None,
                },
            };
        }

        // Reversals are ignored by the snake itself
        if let Action::Move(direction) = action {
            state.snake.set_direction(direction);
        }

        let vacated = state.snake.advance();
        state.steps += 1;
        state.moves_without_eating += 1;

        if let Some(collision_type) = self.check_collision(state) {
            state.is_alive = false;
            return StepResult::ended(false, GameOver::Collision(collision_type));
        }

        let ate_food = state.snake.head() == state.food;
        if ate_food {
            state.snake.grow(vacated);
            state.score += 1;
            state.moves_without_eating = 0;

            match spawn_food(&state.grid, &state.snake, &mut self.rng) {
                Some(food) if state.score < state.max_score() => state.food = food,
                _ => {
                    state.is_alive = false;
                    return StepResult::ended(true, GameOver::Won);
                }
            }
        }

        if state.moves_without_eating >= self.config.stall_cap() {
            state.is_alive = false;
            return StepResult::ended(ate_food, GameOver::Stalled);
        }

        StepResult::ongoing(ate_food)
    }

    /// Check if the head's new cell causes a collision
    fn check_collision(&self, state: &GameState) -> Option<CollisionType> {
        let head = state.snake.head();

        if !state.is_in_bounds(head) {
            return Some(CollisionType::Wall);
        }

        if state.snake.collides_with_body(head) {
            return Some(CollisionType::SelfCollision);
        }

        None
    }
}

/// Pick a uniformly random cell not covered by the snake
pub fn spawn_food(grid: &Grid, snake: &Snake, rng: &mut ChaCha8Rng) -> Option<Cell> {
    let free: Vec<Cell> = grid.cells().filter(|cell| !snake.occupies(*cell)).collect();
    free.choose(rng).copied()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(config: GameConfig) -> GameEngine {
        GameEngine::new(config.with_seed(42))
    }

    #[test]
    fn test_reset() {
        let mut engine = seeded(GameConfig::default());
        let state = engine.reset();

        assert!(state.is_alive);
        assert_eq!(state.score, 0);
        assert_eq!(state.steps, 0);
        assert_eq!(state.snake.len(), 3);
        assert_eq!(state.snake.head(), Cell::new(8, 8));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_seed_reproduces_food() {
        let first = seeded(GameConfig::small()).reset();
        let second = seeded(GameConfig::small()).reset();
        assert_eq!(first.food, second.food);
    }

    #[test]
    fn test_basic_movement() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.food = Cell::new(0, 0);
        let initial_head = state.snake.head();

        let result = engine.step(&mut state, Action::Continue);

        assert!(!result.terminated);
        assert!(!result.info.ate_food);
        assert_eq!(state.steps, 1);
        assert_eq!(state.moves_without_eating, 1);
        assert_eq!(state.snake.head(), initial_head.moved_in_direction(Direction::Right));
    }

    #[test]
    fn test_food_consumption() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();

        // Place food directly in front of snake
        let head = state.snake.head();
        state.food = head.moved_in_direction(state.snake.direction());
        let old_tail = state.snake.tail();
        let initial_length = state.snake.len();

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.info.ate_food);
        assert_eq!(state.score, 1);
        assert_eq!(state.moves_without_eating, 0);
        assert_eq!(state.snake.len(), initial_length + 1);
        // New segment fills the cell the tail just left
        assert_eq!(state.snake.tail(), old_tail);
        assert!(!state.snake.occupies(state.food));
        assert!(state.validate().is_ok());
    }

    #[test]
    fn test_growth_follows_a_turning_tail() {
        let mut engine = seeded(GameConfig::small());
        let snake =
            Snake::from_cells(&[Cell::new(5, 5), Cell::new(5, 4), Cell::new(6, 4)], Direction::Right)
                .unwrap();
        let mut state = GameState::new(snake, Cell::new(5, 6), Grid::new(10, 10));

        let result = engine.step(&mut state, Action::Continue);
        assert!(result.info.ate_food);
        assert_eq!(state.snake.tail(), Cell::new(6, 4));

        // The new tail turns up at (6,4) like the old one did and stays attached
        state.food = Cell::new(0, 0);
        for _ in 0..3 {
            engine.step(&mut state, Action::Continue);
            assert!(state.validate().is_ok(), "{state}");
        }
    }

    #[test]
    fn test_wall_collision() {
        let mut engine = seeded(GameConfig::small());
        let mut state = GameState::new(
            Snake::new(Cell::new(5, 0), Direction::Left, 3),
            Cell::new(5, 5),
            Grid::new(10, 10),
        );
        // Body trails to the right of a left-facing head
        assert_eq!(state.snake.tail(), Cell::new(5, 2));

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(!state.is_alive);
        assert_eq!(
            result.info.game_over,
            Some(GameOver::Collision(CollisionType::Wall))
        );
    }

    #[test]
    fn test_self_collision() {
        let mut engine = seeded(GameConfig::small());

        // Snake at (5, 5) going Right with length 5
        let snake = Snake::new(Cell::new(5, 5), Direction::Right, 5);
        let mut state = GameState::new(snake, Cell::new(8, 8), Grid::new(10, 10));

        engine.step(&mut state, Action::Move(Direction::Down));
        engine.step(&mut state, Action::Move(Direction::Left));
        // Up lands on (5,5), still occupied by the body
        let result = engine.step(&mut state, Action::Move(Direction::Up));

        assert!(result.terminated);
        assert_eq!(
            result.info.game_over,
            Some(GameOver::Collision(CollisionType::SelfCollision))
        );
    }

    #[test]
    fn test_prevent_180_degree_turn() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        assert_eq!(state.snake.direction(), Direction::Right);
        let head = state.snake.head();

        // Try to turn 180 degrees (should be ignored)
        let result = engine.step(&mut state, Action::Move(Direction::Left));

        assert!(!result.terminated);
        assert_eq!(state.snake.direction(), Direction::Right);
        assert_eq!(state.snake.head(), head.moved_in_direction(Direction::Right));
    }

    #[test]
    fn test_stall_ends_game() {
        let mut config = GameConfig::small();
        config.max_moves_without_eating = Some(2);
        let mut engine = seeded(config);
        let mut state = engine.reset();
        state.food = Cell::new(0, 0);

        assert!(!engine.step(&mut state, Action::Move(Direction::Down)).terminated);
        let result = engine.step(&mut state, Action::Move(Direction::Left));
        assert!(result.terminated);
        assert_eq!(result.info.game_over, Some(GameOver::Stalled));
        assert!(!state.is_alive);
    }

    #[test]
    fn test_filling_the_board_wins() {
        let mut engine = seeded(GameConfig::new(1, 4));
        let snake = Snake::new(Cell::new(0, 2), Direction::Right, 3);
        let mut state = GameState::new(snake, Cell::new(0, 3), Grid::new(1, 4));

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert!(result.info.ate_food);
        assert_eq!(result.info.game_over, Some(GameOver::Won));
        assert_eq!(state.snake.len(), 4);
    }

    #[test]
    fn test_terminated_game_no_update() {
        let mut engine = seeded(GameConfig::small());
        let mut state = engine.reset();
        state.is_alive = false;
        let steps_before = state.steps;

        let result = engine.step(&mut state, Action::Continue);

        assert!(result.terminated);
        assert_eq!(state.steps, steps_before); // Should not increment
    }

    #[test]
    fn test_outcomes_are_distinct_keys() {
        let outcomes: std::collections::HashSet<GameOver> = [
            GameOver::Collision(CollisionType::Wall),
            GameOver::Collision(CollisionType::SelfCollision),
            GameOver::Stalled,
            GameOver::Won,
            GameOver::Collision(CollisionType::Wall),
        ]
        .into_iter()
        .collect();
        assert_eq!(outcomes.len(), 4);
    }

    #[test]
    fn test_spawn_food_avoids_snake() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let grid = Grid::new(1, 4);
        let snake = Snake::new(Cell::new(0, 2), Direction::Right, 3);
        for _ in 0..20 {
            assert_eq!(spawn_food(&grid, &snake, &mut rng), Some(Cell::new(0, 3)));
        }

        let full = Snake::new(Cell::new(0, 3), Direction::Right, 4);
        assert_eq!(spawn_food(&grid, &full, &mut rng), None);
    }
}
