mod auth;
mod error;
mod handlers;
mod state;
mod ws;

use axum::middleware;
use axum::routing::{get, post, put};
use axum::Router;
use std::env;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use state::{AppState, Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let pool = bracketeer_db::pool::create_pool().await?;
    let config = Config {
        jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| "dev-only-secret".to_string()),
        admin_username: env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".to_string()),
        admin_password_hash: env::var("ADMIN_PASSWORD_HASH")
            .expect("ADMIN_PASSWORD_HASH must be set"),
    };
    let state = AppState::new(pool, config);

    let admin_routes = Router::new()
        .route("/tournaments", post(handlers::create_tournament))
        .route("/tournaments/:id", put(handlers::update_tournament))
        .route("/tournaments/:id", axum::routing::delete(handlers::delete_tournament))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::admin_auth_middleware,
        ));

    let app = Router::new()
        .route("/tournaments", get(handlers::list_tournaments))
        .route("/tournaments/:id", get(handlers::get_tournament))
        .route("/tournaments/:id/report", post(handlers::report_score))
        .route("/auth/login", post(auth::login))
        .route("/ws", get(ws::ws_handler))
        .merge(admin_routes)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8000".to_string());
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(%bind_addr, "listening");
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
