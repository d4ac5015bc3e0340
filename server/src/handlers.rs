//! HTTP handlers. Each one reads the wall clock exactly once (at entry),
//! loads the tournament under its lock, calls into the engine, persists,
//! and notifies websocket subscribers — mirroring the host-serialization
//! rule: load -> engine -> persist happens while holding that tournament's
//! lock, never interleaved with another request against the same id.
use std::collections::HashMap;

use axum::extract::{Extension, Path, State};
use axum::http::HeaderMap;
use axum::Json;
use bracketeer_core::ids::MatchId;
use bracketeer_core::input::TournamentCreate;
use bracketeer_core::model::{Match, SetScore, Tournament};
use bracketeer_core::ops;
use bracketeer_db::store;
use chrono::Local;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::IsAdmin;
use crate::error::ApiError;
use crate::state::{AppState, TournamentUpdated};

/// A `list_tournaments` row: enough to render a dashboard card without
/// shipping every tournament's full match list.
#[derive(Debug, Clone, Serialize)]
pub struct TournamentSummary {
    pub id: String,
    pub name: String,
    pub date: String,
    pub start_time: String,
    pub format: bracketeer_core::model::Format,
    pub team_count: usize,
    pub court_count: usize,
}

impl From<&Tournament> for TournamentSummary {
    fn from(t: &Tournament) -> Self {
        Self {
            id: t.id.as_str().to_string(),
            name: t.name.clone(),
            date: t.date.clone(),
            start_time: t.start_time.clone(),
            format: t.format,
            team_count: t.teams.len(),
            court_count: t.courts.len(),
        }
    }
}

/// `GET /tournaments`'s body: every tournament grouped by its `date`
/// against today, plus the full unfiltered set under `all`.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub live: HashMap<String, TournamentSummary>,
    pub future: HashMap<String, TournamentSummary>,
    pub past: HashMap<String, TournamentSummary>,
    pub all: HashMap<String, TournamentSummary>,
}

/// What `GET /tournaments/:id` returns: the tournament as stored, plus its
/// non-ghost matches sorted into the order a schedule view displays them in.
#[derive(Debug, Serialize)]
pub struct TournamentView {
    #[serde(flatten)]
    pub tournament: Tournament,
    pub schedule: Vec<Match>,
}

pub async fn list_tournaments(
    State(state): State<AppState>,
) -> Result<Json<Dashboard>, ApiError> {
    let tournaments = store::list(&state.pool).await?;
    let today = Local::now().date_naive().format("%Y-%m-%d").to_string();

    let mut dashboard = Dashboard {
        live: HashMap::new(),
        future: HashMap::new(),
        past: HashMap::new(),
        all: HashMap::new(),
    };
    for t in &tournaments {
        let summary = TournamentSummary::from(t);
        let id = summary.id.clone();
        match t.date.cmp(&today) {
            std::cmp::Ordering::Equal => {
                dashboard.live.insert(id.clone(), summary.clone());
            }
            std::cmp::Ordering::Greater => {
                dashboard.future.insert(id.clone(), summary.clone());
            }
            std::cmp::Ordering::Less => {
                dashboard.past.insert(id.clone(), summary.clone());
            }
        }
        dashboard.all.insert(id, summary);
    }
    Ok(Json(dashboard))
}

pub async fn create_tournament(
    State(state): State<AppState>,
    Json(request): Json<TournamentCreate>,
) -> Result<Json<Tournament>, ApiError> {
    let now = Local::now().naive_local();
    let tournament = ops::create(request, now)?;
    store::put(&state.pool, &tournament).await?;
    let _ = state.notify.send(TournamentUpdated(tournament.id.clone()));
    info!(id = tournament.id.as_str(), "created tournament");
    Ok(Json(tournament))
}

pub async fn get_tournament(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TournamentView>, ApiError> {
    let id = bracketeer_core::ids::TournamentId::from(id);
    let tournament = store::get(&state.pool, &id).await?;
    let schedule = tournament.schedule();
    Ok(Json(TournamentView {
        tournament,
        schedule,
    }))
}

pub async fn update_tournament(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(_admin): Extension<IsAdmin>,
    Json(request): Json<TournamentCreate>,
) -> Result<Json<Tournament>, ApiError> {
    let id = bracketeer_core::ids::TournamentId::from(id);
    let _guard = state.locks.lock(&id).await;

    let mut tournament = store::get(&state.pool, &id).await?;
    let now = Local::now().naive_local();
    ops::update_settings(&mut tournament, request, now)?;
    store::put(&state.pool, &tournament).await?;
    let _ = state.notify.send(TournamentUpdated(tournament.id.clone()));
    Ok(Json(tournament))
}

pub async fn delete_tournament(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Extension(_admin): Extension<IsAdmin>,
) -> Result<(), ApiError> {
    let id = bracketeer_core::ids::TournamentId::from(id);
    let _guard = state.locks.lock(&id).await;
    store::delete(&state.pool, &id).await?;
    let _ = state.notify.send(TournamentUpdated(id));
    Ok(())
}

#[derive(Debug, Deserialize)]
pub struct ReportScoreRequest {
    pub match_id: u32,
    #[serde(default)]
    pub sets: Vec<SetScore>,
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub clear: bool,
}

pub async fn report_score(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
    Json(request): Json<ReportScoreRequest>,
) -> Result<Json<Tournament>, ApiError> {
    let id = bracketeer_core::ids::TournamentId::from(id);
    let _guard = state.locks.lock(&id).await;

    let is_admin = crate::auth::is_admin_token(&headers, &state.config.jwt_secret);
    let mut tournament = store::get(&state.pool, &id).await?;
    let now = Local::now().naive_local();
    ops::report_score(
        &mut tournament,
        MatchId::new(request.match_id),
        request.sets,
        is_admin,
        &request.code,
        request.clear,
        now,
    )?;
    store::put(&state.pool, &tournament).await?;
    let _ = state.notify.send(TournamentUpdated(tournament.id.clone()));
    Ok(Json(tournament))
}
