use clap::ValueEnum;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::warn;

use super::astar::{HeuristicSearch, SearchTarget};
use super::policy::CascadePilot;
use crate::error::Result;
use crate::game::{Cell, Direction, GameConfig, GameState};

/// Which rule produced a move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One bite from a full board and the food is next to the head
    WinImminent,
    /// Shortest path to the food, certified to leave the tail reachable
    DirectPath,
    /// Stall by moving as far from the tail as is certified safe
    LongestToTail,
    /// A random certified-safe neighbour
    AnySafeMove,
    /// Follow the tail, which is always about to vacate its cell
    ChaseTail,
    /// Nothing worked; keep the heading and hope
    NoOption,
    /// First step of the heuristic search plan
    Heuristic,
}

impl Strategy {
    pub const ALL: [Strategy; 7] = [
        Strategy::WinImminent,
        Strategy::DirectPath,
        Strategy::LongestToTail,
        Strategy::AnySafeMove,
        Strategy::ChaseTail,
        Strategy::NoOption,
        Strategy::Heuristic,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::WinImminent => "win_imminent",
            Strategy::DirectPath => "direct_path",
            Strategy::LongestToTail => "longest_to_tail",
            Strategy::AnySafeMove => "any_safe_move",
            Strategy::ChaseTail => "chase_tail",
            Strategy::NoOption => "no_option",
            Strategy::Heuristic => "heuristic",
        }
    }
}

/// Side-channel signals for whoever presents the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagnostic {
    WinImminent,
    NoSafeMove,
}

/// One tick's move and how it was chosen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub direction: Direction,
    pub strategy: Strategy,
    /// Cells the pilot intends to visit, next cell first; may be empty
    pub path: Vec<Cell>,
    pub diagnostic: Option<Diagnostic>,
}

impl Decision {
    /// Decision to walk `path`, or None if its first cell is not next to `head`
    pub fn along(head: Cell, path: Vec<Cell>, strategy: Strategy) -> Option<Self> {
        let direction = head.direction_to(*path.first()?)?;
        Some(Self {
            direction,
            strategy,
            path,
            diagnostic: None,
        })
    }

    pub fn with_diagnostic(mut self, diagnostic: Diagnostic) -> Self {
        self.diagnostic = Some(diagnostic);
        self
    }
}

/// Chooses the snake's direction once per tick
pub trait Pilot {
    fn name(&self) -> &'static str;

    /// Full decision for the snapshot, including how it was reached.
    ///
    /// Fails only when the snapshot itself is malformed.
    fn plan(&mut self, state: &GameState) -> Result<Decision>;

    fn decide_move(&mut self, state: &GameState) -> Result<Direction> {
        Ok(self.plan(state)?.direction)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum PilotKind {
    /// BFS to the food with virtual-snake safety checks and tail-chasing fallbacks
    #[default]
    Cascade,
    /// Heuristic best-first search only
    #[value(name = "astar")]
    AStar,
}

impl PilotKind {
    pub fn build(self, config: &GameConfig) -> Box<dyn Pilot> {
        let rng = seeded_rng(pilot_seed(config.seed));
        match self {
            PilotKind::Cascade => Box::new(CascadePilot::new(config.stall_cap(), rng)),
            PilotKind::AStar => Box::new(AStarPilot::new(rng)),
        }
    }
}

/// The engine seeds its food generator with the config seed itself; the pilot
/// draws from a different stream
fn pilot_seed(seed: Option<u64>) -> Option<u64> {
    seed.map(|seed| seed.wrapping_add(1))
}

pub(crate) fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    }
}

/// Plays the first move of a fresh heuristic search every tick
pub struct AStarPilot {
    search: HeuristicSearch,
    rng: ChaCha8Rng,
}

impl AStarPilot {
    pub fn new(rng: ChaCha8Rng) -> Self {
        Self {
            search: HeuristicSearch::new(),
            rng,
        }
    }
}

impl Pilot for AStarPilot {
    fn name(&self) -> &'static str {
        "astar"
    }

    fn plan(&mut self, state: &GameState) -> Result<Decision> {
        state.validate()?;
        let head = state.snake.head();
        let outcome = self.search.plan(state, head, &mut self.rng);

        let mut decision = Decision {
            direction: outcome.direction,
            strategy: Strategy::Heuristic,
            path: Vec::new(),
            diagnostic: None,
        };

        if outcome.target == SearchTarget::Wiggle
            && !state.grid.neighbors(head).any(|cell| state.is_free(cell))
        {
            warn!(head = %head, "no safe move, snake in danger");
            decision.diagnostic = Some(Diagnostic::NoSafeMove);
        }

        Ok(decision)
    }
}
