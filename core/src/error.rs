//! Top-level error type for the bracket engine.
use crate::ids::MatchId;
use thiserror::Error;

/// Errors the engine can surface from its operations.
///
/// Resolver/Scheduler convergence is not fallible: bounded sweeps complete
/// regardless of input, so no variant here represents "the algorithm didn't
/// converge".
#[derive(Error, Debug, Clone)]
pub enum EngineError {
    #[error("no tournament with id {0}")]
    NotFound(String),

    #[error("operation requires admin privileges")]
    Unauthorized,

    #[error("report code does not match")]
    InvalidCode,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("match tied")]
    Tied,

    #[error("no match with id {0}")]
    MatchNotFound(MatchId),
}
