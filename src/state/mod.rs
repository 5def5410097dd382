pub mod deck;
pub mod session;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::ResultStore, error::ServiceError};

pub use self::session::{Completion, MatchSession, Phase, Settled, TapOutcome};

/// Shared handle to the application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the card set and the result store handle.
pub struct AppState {
    config: AppConfig,
    result_store: RwLock<Option<Arc<dyn ResultStore>>>,
    degraded: watch::Sender<bool>,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a result store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            config,
            result_store: RwLock::new(None),
            degraded: degraded_tx,
        })
    }

    /// Runtime configuration, including the card definition pool.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current result store, if one is installed.
    pub async fn result_store(&self) -> Option<Arc<dyn ResultStore>> {
        let guard = self.result_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the current result store or fail with the degraded-mode error.
    pub async fn require_result_store(&self) -> Result<Arc<dyn ResultStore>, ServiceError> {
        self.result_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new result store implementation and leave degraded mode.
    pub async fn install_result_store(&self, store: Arc<dyn ResultStore>) {
        {
            let mut guard = self.result_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false);
    }

    /// Remove the current result store and enter degraded mode.
    pub async fn clear_result_store(&self) {
        {
            let mut guard = self.result_store.write().await;
            guard.take();
        }
        self.update_degraded(true);
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        let guard = self.result_store.read().await;
        guard.is_none()
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast the degraded flag when the value changes.
    fn update_degraded(&self, value: bool) {
        if *self.degraded.borrow() == value {
            return;
        }

        let _ = self.degraded.send(value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::memory::MemoryResultStore;

    #[tokio::test]
    async fn starts_degraded_until_a_store_is_installed() {
        let state = AppState::new(AppConfig::default());
        assert!(state.is_degraded().await);
        assert!(state.require_result_store().await.is_err());

        state
            .install_result_store(Arc::new(MemoryResultStore::new()))
            .await;

        assert!(!state.is_degraded().await);
        assert!(state.require_result_store().await.is_ok());
        assert!(!*state.degraded_watcher().borrow());
    }

    #[tokio::test]
    async fn clearing_the_store_reenters_degraded_mode() {
        let state = AppState::new(AppConfig::default());
        state
            .install_result_store(Arc::new(MemoryResultStore::new()))
            .await;

        state.clear_result_store().await;

        assert!(state.is_degraded().await);
        assert!(*state.degraded_watcher().borrow());
    }
}
