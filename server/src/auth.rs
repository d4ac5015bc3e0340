//! Single-admin JWT auth. There is one shared admin account (configured via
//! `ADMIN_USERNAME`/`ADMIN_PASSWORD_HASH`); everything else either needs no
//! auth (read endpoints) or a per-tournament report code (score reporting).
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::Response,
    Json,
};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::state::AppState;

const TOKEN_TTL_SECONDS: i64 = 60 * 60 * 12;

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

/// Marker inserted into request extensions once `admin_auth_middleware`
/// has validated the bearer token.
#[derive(Clone, Copy)]
pub struct IsAdmin;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
}

pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    if req.username != state.config.admin_username {
        return Err(ApiError::InvalidCredentials);
    }
    let valid = bcrypt::verify(&req.password, &state.config.admin_password_hash)
        .map_err(|_| ApiError::InvalidCredentials)?;
    if !valid {
        return Err(ApiError::InvalidCredentials);
    }

    let exp = (chrono::Utc::now().timestamp() + TOKEN_TTL_SECONDS) as usize;
    let claims = Claims {
        sub: state.config.admin_username.clone(),
        exp,
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(state.config.jwt_secret.as_bytes()),
    )
    .map_err(|_| ApiError::InvalidCredentials)?;

    Ok(Json(LoginResponse { token }))
}

/// Best-effort admin check for endpoints where admin is one of two valid
/// credentials (the other being a per-tournament report code), so an
/// invalid or absent token should fall through rather than reject.
pub fn is_admin_token(headers: &axum::http::HeaderMap, jwt_secret: &str) -> bool {
    let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    else {
        return false;
    };
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .is_ok()
}

/// Validate the bearer JWT and mark the request as admin-authenticated.
/// Unlike the teacher's middleware (a shared static secret compared
/// directly), this checks a real signed token so it can carry an
/// expiration.
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, StatusCode> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "));

    let Some(token) = token else {
        return Err(StatusCode::UNAUTHORIZED);
    };

    decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.config.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| StatusCode::UNAUTHORIZED)?;

    req.extensions_mut().insert(IsAdmin);
    Ok(next.run(req).await)
}
