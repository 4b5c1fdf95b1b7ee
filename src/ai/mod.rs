//! Path search, lookahead safety and the pilots built on them

pub mod astar;
pub mod bfs;
pub mod oracle;
pub mod pilot;
pub mod policy;

pub use astar::{HeuristicSearch, SearchOutcome, SearchTarget};
pub use bfs::shortest_path;
pub use oracle::{is_safe_after, path_to_tail, VirtualSnake};
pub use pilot::{AStarPilot, Decision, Diagnostic, Pilot, PilotKind, Strategy};
pub use policy::CascadePilot;
