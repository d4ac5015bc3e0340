use bracketeer_core::TournamentId;
use bracketeer_db::LockRegistry;
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::broadcast;

/// Fan-out notice sent to every websocket subscriber once a tournament has
/// been re-settled. Clients re-fetch `/tournaments/{id}` on receipt rather
/// than carrying the payload over the socket.
#[derive(Debug, Clone)]
pub struct TournamentUpdated(pub TournamentId);

#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub locks: LockRegistry,
    pub notify: broadcast::Sender<TournamentUpdated>,
    pub config: Arc<Config>,
}

pub struct Config {
    pub jwt_secret: String,
    pub admin_username: String,
    pub admin_password_hash: String,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: Config) -> Self {
        let (notify, _rx) = broadcast::channel(128);
        Self {
            pool,
            locks: LockRegistry::new(),
            notify,
            config: Arc::new(config),
        }
    }
}
