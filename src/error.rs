use thiserror::Error;

/// Failures raised while building a game. Moves and ticks never fail;
/// illegal actions are no-ops.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Map generation failed: {0}")]
    Generation(String),

    #[error("Entity placement failed: {0}")]
    Placement(String),
}
