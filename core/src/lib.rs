#![forbid(unsafe_code)]
#![warn(
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications
)]

pub mod error;
pub mod generator;
pub mod ids;
pub mod input;
pub mod model;
pub mod ops;
pub mod resolver;
pub mod scheduler;

pub use error::EngineError;
pub use ids::{MatchId, TournamentId};
pub use model::{Bracket, Format, Match, SetScore, Source, SourceType, Status, Tournament, BYE};
