//! Holder of the current session.
//!
//! Exactly one session is current at a time. It is loaded from the store at
//! startup, replaced by every new analysis, and published to observers
//! through a watch channel.

use std::sync::Arc;
use tokio::sync::watch;

use dhraviq_core::analysis::AnalysisResult;
use dhraviq_core::clock::{Clock, local_id};
use dhraviq_core::config::ClearSessionMode;
use dhraviq_core::error::Result;
use dhraviq_core::session::{SESSION_ID_PREFIX, Session};
use dhraviq_core::store::LocalStore;

/// What observers see.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// The initial load has not finished.
    Loading,
    Ready(Option<Arc<Session>>),
}

impl SessionState {
    pub fn session(&self) -> Option<&Arc<Session>> {
        match self {
            SessionState::Ready(Some(session)) => Some(session),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, SessionState::Loading)
    }
}

pub struct SessionManager {
    store: Arc<dyn LocalStore>,
    clock: Arc<dyn Clock>,
    clear_mode: ClearSessionMode,
    state: watch::Sender<SessionState>,
}

impl SessionManager {
    pub fn new(
        store: Arc<dyn LocalStore>,
        clock: Arc<dyn Clock>,
        clear_mode: ClearSessionMode,
    ) -> Self {
        let (state, _) = watch::channel(SessionState::Loading);
        Self {
            store,
            clock,
            clear_mode,
            state,
        }
    }

    /// Loads the most recent stored session and publishes it.
    ///
    /// A storage failure publishes "no session".
    pub async fn init(&self) {
        let loaded = match self.store.get_last_session().await {
            Ok(session) => session.map(Arc::new),
            Err(e) => {
                tracing::warn!("Failed to load last session: {}", e);
                None
            }
        };
        match &loaded {
            Some(session) => tracing::info!(session_id = %session.id, "Session restored"),
            None => tracing::debug!("No stored session"),
        }
        self.state.send_replace(SessionState::Ready(loaded));
    }

    pub async fn reload(&self) {
        self.init().await;
    }

    /// Persists a new session and makes it current.
    ///
    /// Nothing is published when the write fails.
    pub async fn create_session(
        &self,
        resume_text: &str,
        analysis: AnalysisResult,
    ) -> Result<Arc<Session>> {
        let id = local_id(SESSION_ID_PREFIX, self.clock.as_ref());
        let session = Arc::new(self.store.save_session(&id, resume_text, &analysis).await?);
        self.state
            .send_replace(SessionState::Ready(Some(session.clone())));
        tracing::info!(session_id = %session.id, "Session created");
        Ok(session)
    }

    /// Clears the current session.
    ///
    /// With [`ClearSessionMode::PurgePersisted`] the stored record is deleted too.
    pub async fn clear_session(&self) -> Result<()> {
        let previous = self.current();
        self.state.send_replace(SessionState::Ready(None));

        if let (ClearSessionMode::PurgePersisted, Some(session)) = (self.clear_mode, previous) {
            self.store.delete_session(&session.id).await?;
            tracing::info!(session_id = %session.id, "Session purged");
        }
        Ok(())
    }

    pub fn clear_mode(&self) -> ClearSessionMode {
        self.clear_mode
    }

    pub fn current(&self) -> Option<Arc<Session>> {
        self.state.borrow().session().cloned()
    }

    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockStore, sample_analysis};
    use dhraviq_core::clock::ManualClock;
    use std::sync::atomic::Ordering;

    fn manager(store: Arc<MockStore>, mode: ClearSessionMode) -> SessionManager {
        SessionManager::new(store, Arc::new(ManualClock::new(5_000)), mode)
    }

    #[tokio::test]
    async fn test_starts_loading_then_ready() {
        let store = Arc::new(MockStore::new());
        let manager = manager(store, ClearSessionMode::KeepPersisted);
        assert!(manager.state().is_loading());

        manager.init().await;
        assert_eq!(manager.state(), SessionState::Ready(None));
    }

    #[tokio::test]
    async fn test_init_restores_latest_session() {
        let store = Arc::new(MockStore::new());
        store.save_session("old", "r", &sample_analysis(1)).await.unwrap();
        store.save_session("new", "r", &sample_analysis(2)).await.unwrap();

        let manager = manager(store, ClearSessionMode::KeepPersisted);
        manager.init().await;
        assert_eq!(manager.current().unwrap().id, "new");
    }

    #[tokio::test]
    async fn test_init_storage_failure_publishes_no_session() {
        let store = Arc::new(MockStore::new());
        store.fail_all.store(true, Ordering::SeqCst);
        let manager = manager(store, ClearSessionMode::KeepPersisted);
        manager.init().await;
        assert_eq!(manager.state(), SessionState::Ready(None));
    }

    #[tokio::test]
    async fn test_create_session_publishes_to_subscribers() {
        let store = Arc::new(MockStore::new());
        let manager = manager(store.clone(), ClearSessionMode::KeepPersisted);
        manager.init().await;
        let mut rx = manager.subscribe();

        let session = manager.create_session("resume", sample_analysis(3)).await.unwrap();
        assert!(session.id.starts_with("session_5000_"));
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().session().unwrap().id, session.id);
        assert_eq!(store.session_count(), 1);
    }

    #[tokio::test]
    async fn test_create_session_failure_publishes_nothing() {
        let store = Arc::new(MockStore::new());
        let manager = manager(store.clone(), ClearSessionMode::KeepPersisted);
        manager.init().await;
        store.fail_all.store(true, Ordering::SeqCst);

        assert!(manager.create_session("resume", sample_analysis(1)).await.is_err());
        assert!(manager.current().is_none());
    }

    #[tokio::test]
    async fn test_new_session_supersedes_previous() {
        let store = Arc::new(MockStore::new());
        let manager = manager(store, ClearSessionMode::KeepPersisted);
        let first = manager.create_session("a", sample_analysis(1)).await.unwrap();
        let second = manager.create_session("b", sample_analysis(2)).await.unwrap();
        assert_ne!(first.id, second.id);
        assert_eq!(manager.current().unwrap().id, second.id);
    }

    #[tokio::test]
    async fn test_clear_keeps_record_by_default() {
        let store = Arc::new(MockStore::new());
        let manager = manager(store.clone(), ClearSessionMode::KeepPersisted);
        manager.create_session("a", sample_analysis(1)).await.unwrap();

        manager.clear_session().await.unwrap();
        assert!(manager.current().is_none());
        assert_eq!(store.session_count(), 1);

        manager.reload().await;
        assert!(manager.current().is_some());
    }

    #[tokio::test]
    async fn test_clear_with_purge_deletes_record() {
        let store = Arc::new(MockStore::new());
        let manager = manager(store.clone(), ClearSessionMode::PurgePersisted);
        manager.create_session("a", sample_analysis(1)).await.unwrap();

        manager.clear_session().await.unwrap();
        assert!(manager.current().is_none());
        assert_eq!(store.session_count(), 0);
    }
}
