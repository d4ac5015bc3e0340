//! Blob store: one row per tournament, the whole aggregate serialized as a
//! JSON blob. There is no relational schema to migrate when the shape of
//! [`bracketeer_core::Tournament`] changes.
use bracketeer_core::{Tournament, TournamentId};
use sqlx::SqlitePool;

use crate::StoreError;

/// A row summary returned by [`list`] without deserializing every blob.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct TournamentRow {
    pub id: String,
    pub data: String,
}

pub async fn get(pool: &SqlitePool, id: &TournamentId) -> Result<Tournament, StoreError> {
    let row: Option<TournamentRow> =
        sqlx::query_as("SELECT id, data FROM tournaments WHERE id = ?")
            .bind(id.as_str())
            .fetch_optional(pool)
            .await?;

    let row = row.ok_or_else(|| StoreError::NotFound(id.as_str().to_string()))?;
    serde_json::from_str(&row.data).map_err(|e| StoreError::Corrupt(row.id, e))
}

pub async fn put(pool: &SqlitePool, tournament: &Tournament) -> Result<(), StoreError> {
    let data = serde_json::to_string(tournament).expect("Tournament always serializes");
    sqlx::query("INSERT INTO tournaments (id, data) VALUES (?, ?) ON CONFLICT(id) DO UPDATE SET data = excluded.data")
        .bind(tournament.id.as_str())
        .bind(data)
        .execute(pool)
        .await?;
    Ok(())
}

pub async fn delete(pool: &SqlitePool, id: &TournamentId) -> Result<(), StoreError> {
    let result = sqlx::query("DELETE FROM tournaments WHERE id = ?")
        .bind(id.as_str())
        .execute(pool)
        .await?;
    if result.rows_affected() == 0 {
        return Err(StoreError::NotFound(id.as_str().to_string()));
    }
    Ok(())
}

/// All tournaments, newest id last (sqlite's natural rowid order).
pub async fn list(pool: &SqlitePool) -> Result<Vec<Tournament>, StoreError> {
    let rows: Vec<TournamentRow> = sqlx::query_as("SELECT id, data FROM tournaments")
        .fetch_all(pool)
        .await?;

    rows.into_iter()
        .map(|row| {
            serde_json::from_str(&row.data).map_err(|e| StoreError::Corrupt(row.id.clone(), e))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bracketeer_core::input::TournamentCreate;
    use bracketeer_core::ops;
    use bracketeer_core::Format;
    use chrono::NaiveDate;

    async fn memory_pool() -> SqlitePool {
        let pool = SqlitePool::connect("sqlite::memory:").await.unwrap();
        sqlx::query(include_str!("../sqlx_migrations/001_create_tournaments.sql"))
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    fn sample() -> Tournament {
        let now = NaiveDate::from_ymd_opt(2026, 7, 30)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap();
        ops::create(
            TournamentCreate {
                name: "Test Cup".to_string(),
                date: "2026-07-30".to_string(),
                code: "secret".to_string(),
                format: Format::Single,
                courts: "C1".to_string(),
                duration: 20,
                start_time: "09:00".to_string(),
                teams: "A\nB".to_string(),
            },
            now,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn put_then_get_round_trips() {
        let pool = memory_pool().await;
        let t = sample();
        put(&pool, &t).await.unwrap();
        let fetched = get(&pool, &t.id).await.unwrap();
        assert_eq!(fetched.name, t.name);
        assert_eq!(fetched.matches.len(), t.matches.len());
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let pool = memory_pool().await;
        let id = bracketeer_core::TournamentId::generate();
        let err = get(&pool, &id).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound(_)));
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let pool = memory_pool().await;
        let t = sample();
        put(&pool, &t).await.unwrap();
        delete(&pool, &t.id).await.unwrap();
        assert!(matches!(
            get(&pool, &t.id).await.unwrap_err(),
            StoreError::NotFound(_)
        ));
    }

    #[tokio::test]
    async fn list_returns_every_put_tournament() {
        let pool = memory_pool().await;
        let a = sample();
        let mut b = sample();
        b.id = bracketeer_core::TournamentId::generate();
        b.name = "Other Cup".to_string();
        put(&pool, &a).await.unwrap();
        put(&pool, &b).await.unwrap();
        let all = list(&pool).await.unwrap();
        assert_eq!(all.len(), 2);
    }
}
