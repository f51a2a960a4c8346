//! Composition root.
//!
//! Builds the concrete store, clients and services from an [`AppConfig`]
//! and hands them out as one context.

use std::sync::Arc;

use crate::catalog::QuestionCatalog;
use crate::coaching::CoachingWorkflow;
use crate::gate::GateManager;
use crate::session::SessionManager;
use dhraviq_core::clock::{Clock, SystemClock};
use dhraviq_core::coach::CoachingApi;
use dhraviq_core::config::AppConfig;
use dhraviq_core::error::Result;
use dhraviq_core::identity::{ContactDirectory, IdentityProvider};
use dhraviq_core::store::LocalStore;
use dhraviq_infrastructure::{AsyncDirLocalStore, LocalContactDirectory, LocalIdentityProvider};
use dhraviq_interaction::{FirebaseIdentityProvider, FirestoreContactDirectory, HttpCoachingClient};

pub struct AppContext {
    pub config: AppConfig,
    pub store: Arc<dyn LocalStore>,
    pub coach: Arc<dyn CoachingApi>,
    pub gate: Arc<GateManager>,
    pub sessions: Arc<SessionManager>,
    pub catalog: Arc<QuestionCatalog>,
    pub workflow: CoachingWorkflow,
}

impl AppContext {
    /// Wires the production services and restores the last session.
    ///
    /// Sessions older than the configured maximum age are pruned first;
    /// a failed prune is logged and startup continues.
    pub async fn bootstrap(config: AppConfig) -> Result<Self> {
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let data_dir = config.data_dir.as_deref();

        let store: Arc<dyn LocalStore> =
            Arc::new(AsyncDirLocalStore::with_clock(data_dir, clock.clone()));
        let coach: Arc<dyn CoachingApi> = Arc::new(HttpCoachingClient::from_config(&config)?);

        let (provider, directory): (Arc<dyn IdentityProvider>, Arc<dyn ContactDirectory>) =
            match &config.firebase {
                Some(firebase) => {
                    tracing::info!(project_id = %firebase.project_id, "Using Firebase identity");
                    (
                        Arc::new(FirebaseIdentityProvider::new(firebase, config.request_timeout)?),
                        Arc::new(FirestoreContactDirectory::new(firebase, config.request_timeout)?),
                    )
                }
                None => {
                    tracing::debug!("Firebase not configured, using local identity");
                    (
                        Arc::new(LocalIdentityProvider::with_clock(data_dir, clock.clone())),
                        Arc::new(LocalContactDirectory::new(data_dir)),
                    )
                }
            };

        if let Err(e) = store.clear_old_sessions(config.session_max_age).await {
            tracing::warn!("Failed to prune old sessions: {}", e);
        }

        let context = Self::from_parts(config, store, coach, provider, directory, clock);
        context.sessions.init().await;
        Ok(context)
    }

    /// Wires the services around already-built adapters. Does not load a session.
    pub fn from_parts(
        config: AppConfig,
        store: Arc<dyn LocalStore>,
        coach: Arc<dyn CoachingApi>,
        provider: Arc<dyn IdentityProvider>,
        directory: Arc<dyn ContactDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let gate = Arc::new(GateManager::new(provider, directory, clock.clone()));
        let sessions = Arc::new(SessionManager::new(
            store.clone(),
            clock,
            config.clear_session_mode,
        ));
        let catalog = Arc::new(QuestionCatalog::new(store.clone()));
        let workflow = CoachingWorkflow::new(
            store.clone(),
            coach.clone(),
            gate.clone(),
            sessions.clone(),
            catalog.clone(),
        );

        Self {
            config,
            store,
            coach,
            gate,
            sessions,
            catalog,
            workflow,
        }
    }
}
