use anyhow::{Context, Result};
use tracing::{info, trace};

use crate::ai::Pilot;
use crate::game::{GameConfig, GameEngine, GameOver, GameState};
use crate::metrics::{GameMetrics, RunStats, RunSummary};

/// Games kept in the rolling averages
const STATS_WINDOW: usize = 100;

/// Plays games back to back with a pilot at the controls
pub struct AutopilotMode {
    engine: GameEngine,
    state: GameState,
    pilot: Box<dyn Pilot>,
    metrics: GameMetrics,
    stats: RunStats,
}

impl AutopilotMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate().context("Refusing to start with an invalid config")?;

        let pilot = config.pilot.build(&config);
        let mut engine = GameEngine::new(config);
        let state = engine.reset();

        Ok(Self {
            engine,
            state,
            pilot,
            metrics: GameMetrics::new(),
            stats: RunStats::new(STATS_WINDOW),
        })
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn stats(&self) -> &RunStats {
        &self.stats
    }

    /// Play `games` complete games and summarize them
    pub fn run(&mut self, games: usize) -> Result<RunSummary> {
        info!(
            games,
            pilot = self.pilot.name(),
            rows = self.engine.config().rows,
            cols = self.engine.config().cols,
            "starting autopilot run"
        );

        while self.stats.total_games() < games {
            if let Some(outcome) = self.update_game()? {
                self.finish_game(outcome);
                self.reset_game();
            }
        }

        self.metrics.update();
        info!(elapsed = %self.metrics.format_time(), "{}", self.stats.format_summary());
        Ok(self.stats.summary())
    }

    /// Advance the current game by one tick
    fn update_game(&mut self) -> Result<Option<GameOver>> {
        let decision = self
            .pilot
            .plan(&self.state)
            .with_context(|| format!("Pilot failed on board:\n{}", self.state))?;
        self.stats.record_decision(decision.strategy);

        let result = self.engine.step(&mut self.state, decision.direction.into());
        trace!("\n{}", self.state);

        Ok(result.info.game_over)
    }

    fn finish_game(&mut self, outcome: GameOver) {
        let game = self.stats.total_games() + 1;
        info!(
            game,
            outcome = outcome.as_str(),
            score = self.state.score,
            length = self.state.snake.len(),
            steps = self.state.steps,
            "game over"
        );

        self.stats.record_game(
            self.state.score,
            self.state.snake.len(),
            self.state.steps,
            outcome,
        );
    }

    fn reset_game(&mut self) {
        self.state = self.engine.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::{PilotKind, Strategy};

    #[test]
    fn test_game_initialization() {
        let mode = AutopilotMode::new(GameConfig::small().with_seed(1)).unwrap();
        assert!(mode.state().is_alive);
        assert_eq!(mode.state().score, 0);
        assert_eq!(mode.stats().total_games(), 0);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let mut config = GameConfig::small();
        config.rows = 0;
        assert!(AutopilotMode::new(config).is_err());
    }

    #[test]
    fn test_board_filling_snake_is_rejected() {
        let mut config = GameConfig::new(1, 2).with_seed(6);
        config.initial_snake_length = 2;
        assert!(AutopilotMode::new(config).is_err());
    }

    #[test]
    fn test_smallest_playable_board_is_won() {
        // One free cell, right in front of the head
        let mut config = GameConfig::new(1, 3).with_seed(6);
        config.initial_snake_length = 2;
        let mut mode = AutopilotMode::new(config).unwrap();

        let summary = mode.run(1).unwrap();
        assert_eq!(summary.games, 1);
        assert_eq!(summary.wins, 1);
        assert_eq!(summary.strategy_usage.get(&Strategy::WinImminent), Some(&1));
    }

    #[test]
    fn test_game_reset() {
        let mut mode = AutopilotMode::new(GameConfig::small().with_seed(2)).unwrap();
        mode.state.score = 10;
        mode.state.is_alive = false;
        mode.reset_game();
        assert_eq!(mode.state().score, 0);
        assert!(mode.state().is_alive);
    }

    #[test]
    fn test_cascade_run_summary() {
        let config = GameConfig::new(6, 6).with_seed(3);
        let mut mode = AutopilotMode::new(config).unwrap();

        let summary = mode.run(3).unwrap();
        assert_eq!(summary.games, 3);
        assert_eq!(summary.outcomes.values().sum::<u32>(), 3);
        assert!(summary.high_score > 0);
        assert!(summary.strategy_usage.contains_key(&Strategy::DirectPath));
        assert!(!summary.strategy_usage.contains_key(&Strategy::Heuristic));
        let decisions: u64 = summary.strategy_usage.values().sum();
        assert_eq!(decisions, summary.total_steps);
    }

    #[test]
    fn test_astar_run_summary() {
        let config = GameConfig::new(6, 6).with_seed(4).with_pilot(PilotKind::AStar);
        let mut mode = AutopilotMode::new(config).unwrap();

        let summary = mode.run(2).unwrap();
        assert_eq!(summary.games, 2);
        assert_eq!(summary.strategy_usage.len(), 1);
        assert!(summary.strategy_usage.contains_key(&Strategy::Heuristic));
    }

    #[test]
    fn test_seeded_runs_repeat() {
        let config = GameConfig::new(7, 7).with_seed(5);
        let first = AutopilotMode::new(config.clone()).unwrap().run(2).unwrap();
        let second = AutopilotMode::new(config).unwrap().run(2).unwrap();
        assert_eq!(first, second);
    }
}
