use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnakeError {
    #[error("invalid game config: {0}")]
    InvalidConfig(String),
    /// Caller handed the engine a state that no game could produce
    #[error("malformed game state: {0}")]
    MalformedState(String),
}

pub type Result<T> = std::result::Result<T, SnakeError>;
