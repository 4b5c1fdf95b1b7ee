//! Statistics for a run of autopilot games
//!
//! Tracks per-game scores, snake lengths and tick counts in rolling windows,
//! plus whole-run counters for how games ended and which strategies the
//! pilot used.

use std::collections::{BTreeMap, VecDeque};
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::ai::Strategy;
use crate::game::GameOver;

/// Run statistics tracker with rolling averages
///
/// # Example
///
/// ```rust
/// use snake_autopilot::ai::Strategy;
/// use snake_autopilot::game::GameOver;
/// use snake_autopilot::metrics::RunStats;
///
/// let mut stats = RunStats::new(100);
/// stats.record_decision(Strategy::DirectPath);
/// stats.record_game(12, 15, 240, GameOver::Stalled);
///
/// assert_eq!(stats.total_games(), 1);
/// println!("{}", stats.format_summary());
/// ```
#[derive(Debug, Clone)]
pub struct RunStats {
    /// Final scores (rolling window)
    scores: VecDeque<u32>,

    /// Final snake lengths (rolling window)
    lengths: VecDeque<usize>,

    /// Ticks per game (rolling window)
    steps: VecDeque<u32>,

    /// How every game ended, keyed by [`GameOver::as_str`]
    outcomes: BTreeMap<String, u32>,

    /// Decisions per strategy over the whole run
    strategies: BTreeMap<Strategy, u64>,

    total_games: usize,
    total_steps: u64,
    high_score: u32,
    wins: u32,

    /// Window size for rolling averages
    window_size: usize,
}

/// Serializable snapshot of a finished run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub games: usize,
    pub wins: u32,
    pub total_steps: u64,
    pub high_score: u32,
    pub mean_score: f32,
    pub mean_length: f32,
    pub mean_steps: f32,
    pub outcomes: BTreeMap<String, u32>,
    pub strategy_usage: BTreeMap<Strategy, u64>,
}

impl RunSummary {
    /// Write the summary as pretty-printed JSON
    pub fn write_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize run summary")?;
        fs::write(path, json)
            .with_context(|| format!("failed to write run summary to {}", path.display()))?;
        Ok(())
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read run summary from {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("failed to parse run summary in {}", path.display()))
    }
}

impl RunStats {
    /// Create a tracker keeping the last `window_size` games for averages
    pub fn new(window_size: usize) -> Self {
        Self {
            scores: VecDeque::with_capacity(window_size),
            lengths: VecDeque::with_capacity(window_size),
            steps: VecDeque::with_capacity(window_size),
            outcomes: BTreeMap::new(),
            strategies: BTreeMap::new(),
            total_games: 0,
            total_steps: 0,
            high_score: 0,
            wins: 0,
            window_size,
        }
    }

    /// Count one pilot decision
    pub fn record_decision(&mut self, strategy: Strategy) {
        *self.strategies.entry(strategy).or_insert(0) += 1;
    }

    /// Record the end of a game
    pub fn record_game(&mut self, score: u32, length: usize, steps: u32, outcome: GameOver) {
        Self::push_deque(&mut self.scores, score, self.window_size);
        Self::push_deque(&mut self.lengths, length, self.window_size);
        Self::push_deque(&mut self.steps, steps, self.window_size);
        *self.outcomes.entry(outcome.as_str().to_string()).or_insert(0) += 1;

        self.total_games += 1;
        self.total_steps += u64::from(steps);
        self.high_score = self.high_score.max(score);
        if outcome == GameOver::Won {
            self.wins += 1;
        }
    }

    pub fn mean_score(&self) -> f32 {
        Self::mean(self.scores.iter().map(|&score| score as f32), self.scores.len())
    }

    pub fn mean_length(&self) -> f32 {
        Self::mean(self.lengths.iter().map(|&length| length as f32), self.lengths.len())
    }

    pub fn mean_steps(&self) -> f32 {
        Self::mean(self.steps.iter().map(|&steps| steps as f32), self.steps.len())
    }

    pub fn total_games(&self) -> usize {
        self.total_games
    }

    pub fn total_steps(&self) -> u64 {
        self.total_steps
    }

    pub fn high_score(&self) -> u32 {
        self.high_score
    }

    pub fn wins(&self) -> u32 {
        self.wins
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn outcome_count(&self, outcome: GameOver) -> u32 {
        self.outcomes.get(outcome.as_str()).copied().unwrap_or(0)
    }

    pub fn strategy_count(&self, strategy: Strategy) -> u64 {
        self.strategies.get(&strategy).copied().unwrap_or(0)
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            games: self.total_games,
            wins: self.wins,
            total_steps: self.total_steps,
            high_score: self.high_score,
            mean_score: self.mean_score(),
            mean_length: self.mean_length(),
            mean_steps: self.mean_steps(),
            outcomes: self.outcomes.clone(),
            strategy_usage: self.strategies.clone(),
        }
    }

    /// One-line summary for logs
    pub fn format_summary(&self) -> String {
        format!(
            "Games: {} | Wins: {} | High: {} | Score: {:.2} | Len: {:.1} | Steps: {:.1}",
            self.total_games,
            self.wins,
            self.high_score,
            self.mean_score(),
            self.mean_length(),
            self.mean_steps(),
        )
    }

    fn mean(values: impl Iterator<Item = f32>, count: usize) -> f32 {
        if count == 0 {
            0.0
        } else {
            values.sum::<f32>() / count as f32
        }
    }

    /// Helper function to push to a deque with size limit
    fn push_deque<T>(deque: &mut VecDeque<T>, value: T, window_size: usize) {
        if deque.len() >= window_size {
            deque.pop_front();
        }
        deque.push_back(value);
    }
}
