//! In-memory snapshot store

use crate::{error::FetchError, types::MarketSnapshot};
use std::sync::Arc;
use tokio::sync::RwLock;

/// What the UI needs to know about the fetcher at any moment
#[derive(Debug, Clone, Default)]
pub struct FetchState {
    /// Latest successful snapshot
    pub snapshot: Option<Arc<MarketSnapshot>>,

    /// Failure of the most recently completed fetch, if it failed
    pub error: Option<FetchError>,

    /// True while a fetch is outstanding
    pub loading: bool,
}

/// In-memory store for the current market snapshot
///
/// Every write replaces state wholesale. Overlapping fetches are not
/// sequenced: whichever completes last wins.
pub struct SnapshotStore {
    state: Arc<RwLock<FetchState>>,
}

impl SnapshotStore {
    /// Creates an empty store, initially loading
    pub fn new() -> Self {
        Self {
            state: Arc::new(RwLock::new(FetchState {
                loading: true,
                ..FetchState::default()
            })),
        }
    }

    /// Marks a fetch as outstanding and clears the previous error
    pub async fn begin_fetch(&self) {
        let mut state = self.state.write().await;
        state.loading = true;
        state.error = None;
    }

    /// Replaces the snapshot after a successful fetch
    pub async fn replace(&self, snapshot: MarketSnapshot) {
        let mut state = self.state.write().await;
        tracing::debug!(
            coins = snapshot.coins.len(),
            source = %snapshot.source,
            "Replacing market snapshot"
        );
        state.snapshot = Some(Arc::new(snapshot));
        state.error = None;
        state.loading = false;
    }

    /// Records a failed fetch; the previous snapshot is kept but the error
    /// takes precedence when rendering
    pub async fn record_failure(&self, error: FetchError) {
        let mut state = self.state.write().await;
        state.error = Some(error);
        state.loading = false;
    }

    /// Gets a copy of the current state
    pub async fn current(&self) -> FetchState {
        self.state.read().await.clone()
    }

    /// Gets the latest snapshot, if any fetch has succeeded
    pub async fn snapshot(&self) -> Option<Arc<MarketSnapshot>> {
        self.state.read().await.snapshot.clone()
    }
}

impl Default for SnapshotStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::mock::coin;

    #[tokio::test]
    async fn test_store_lifecycle() {
        let store = SnapshotStore::new();
        let state = store.current().await;
        assert!(state.loading);
        assert!(state.snapshot.is_none());

        store
            .replace(MarketSnapshot::new(vec![coin("btc", 1, 10.0, 1.0)], "mock".into()))
            .await;
        let state = store.current().await;
        assert!(!state.loading);
        assert_eq!(state.snapshot.as_ref().map(|s| s.coins.len()), Some(1));

        store.record_failure(FetchError::RateLimited).await;
        let state = store.current().await;
        assert_eq!(state.error, Some(FetchError::RateLimited));
        assert!(state.snapshot.is_some());

        store.begin_fetch().await;
        let state = store.current().await;
        assert!(state.loading);
        assert!(state.error.is_none());
    }

    #[tokio::test]
    async fn test_replace_is_wholesale() {
        let store = SnapshotStore::new();
        store
            .replace(MarketSnapshot::new(
                vec![coin("btc", 1, 10.0, 1.0), coin("eth", 2, 5.0, 1.0)],
                "mock".into(),
            ))
            .await;
        store
            .replace(MarketSnapshot::new(vec![coin("sol", 3, 1.0, 1.0)], "mock".into()))
            .await;

        let snapshot = store.snapshot().await.unwrap();
        assert_eq!(snapshot.coins.len(), 1);
        assert_eq!(snapshot.coins[0].id, "sol");
    }
}
