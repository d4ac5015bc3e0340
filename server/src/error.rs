use axum::{http::StatusCode, response::IntoResponse, Json};
use bracketeer_core::EngineError;
use bracketeer_db::StoreError;
use serde::Serialize;
use thiserror::Error;

/// Error handling for the HTTP layer: wraps every failure an operation
/// handler can surface and maps it to a status code once, here, instead of
/// scattering `StatusCode::...` through every handler.
#[derive(Error, Debug)]
pub(crate) enum ApiError {
    #[error("{0}")]
    Engine(#[from] EngineError),
    #[error("storage error: {0}")]
    Store(#[from] StoreError),
    #[error("invalid credentials")]
    InvalidCredentials,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        #[derive(Serialize)]
        struct ErrorResponse {
            error: String,
        }

        let status = match &self {
            ApiError::Engine(EngineError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Engine(EngineError::MatchNotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Engine(EngineError::Unauthorized) => StatusCode::FORBIDDEN,
            ApiError::Engine(EngineError::InvalidCode) => StatusCode::FORBIDDEN,
            ApiError::Engine(EngineError::InvalidInput(_)) => StatusCode::BAD_REQUEST,
            ApiError::Engine(EngineError::Tied) => StatusCode::BAD_REQUEST,
            ApiError::Store(StoreError::NotFound(_)) => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
        };

        let body = ErrorResponse {
            error: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}
