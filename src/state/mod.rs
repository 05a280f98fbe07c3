use std::sync::Arc;

use tokio::sync::RwLock;

use crate::{config::AppConfig, dao::quiz_store::QuizStore, error::ServiceError};

/// Reference-counted handle to [`AppState`] shared by every handler.
pub type SharedState = Arc<AppState>;

/// Central application state holding the configuration and the store handle.
pub struct AppState {
    quiz_store: RwLock<Option<Arc<dyn QuizStore>>>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a store is installed.
    pub fn new(config: AppConfig) -> SharedState {
        Arc::new(Self {
            quiz_store: RwLock::new(None),
            config,
        })
    }

    /// Runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Obtain a handle to the current store, if one is installed.
    pub async fn quiz_store(&self) -> Option<Arc<dyn QuizStore>> {
        let guard = self.quiz_store.read().await;
        guard.as_ref().cloned()
    }

    /// Install a store implementation and leave degraded mode.
    pub async fn install_quiz_store(&self, store: Arc<dyn QuizStore>) {
        let mut guard = self.quiz_store.write().await;
        *guard = Some(store);
    }

    /// The installed store, or [`ServiceError::Degraded`].
    pub async fn require_quiz_store(&self) -> Result<Arc<dyn QuizStore>, ServiceError> {
        self.quiz_store().await.ok_or(ServiceError::Degraded)
    }
}
