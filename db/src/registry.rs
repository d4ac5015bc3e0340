//! Per-tournament mutex registry.
//!
//! The blob store has no row-level locking, so two concurrent requests
//! against the same tournament could load-mutate-store past each other.
//! A single process-wide lock would serialize unrelated tournaments for no
//! reason. This registry hands out one [`tokio::sync::Mutex`] per
//! [`TournamentId`], created lazily on first use, so callers only block on
//! requests touching the same aggregate.
use std::sync::Arc;

use bracketeer_core::TournamentId;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Default)]
pub struct LockRegistry {
    locks: Arc<DashMap<TournamentId, Arc<Mutex<()>>>>,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for `id`, creating its entry on first use.
    pub async fn lock(&self, id: &TournamentId) -> OwnedMutexGuard<()> {
        let entry = self
            .locks
            .entry(id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        entry.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn same_id_serializes_concurrent_acquires() {
        let registry = LockRegistry::new();
        let id = TournamentId::generate();

        let first = registry.lock(&id).await;
        let registry2 = registry.clone();
        let id2 = id.clone();
        let handle = tokio::spawn(async move {
            let _second = registry2.lock(&id2).await;
        });

        tokio::time::sleep(std::time::Duration::from_millis(20)).await;
        assert!(!handle.is_finished());
        drop(first);
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn distinct_ids_do_not_block_each_other() {
        let registry = LockRegistry::new();
        let a = registry.lock(&TournamentId::generate()).await;
        let b = registry.lock(&TournamentId::generate()).await;
        drop(a);
        drop(b);
    }
}
