//! Errors the storage layer can surface.
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Missing 'DATABASE_URL'")]
    DbUrlMissing,

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("stored blob for tournament {0} is not valid JSON: {1}")]
    Corrupt(String, serde_json::Error),

    #[error("no tournament with id {0}")]
    NotFound(String),
}
