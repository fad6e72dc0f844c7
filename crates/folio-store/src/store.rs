//! Shared, injectable application state container

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;

use crate::api::PortfolioApi;
use crate::error::Result;
use crate::state::{Action, AppState};

struct StoreInner {
    state: RwLock<AppState>,
    revision: watch::Sender<u64>,
}

/// Cloneable handle; every clone sees the same state.
#[derive(Clone)]
pub struct AppStore {
    inner: Arc<StoreInner>,
}

impl Default for AppStore {
    fn default() -> Self {
        Self::new()
    }
}

impl AppStore {
    pub fn new() -> Self {
        Self::with_state(AppState::default())
    }

    pub fn with_state(state: AppState) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(StoreInner {
                state: RwLock::new(state),
                revision,
            }),
        }
    }

    pub fn dispatch(&self, action: Action) {
        tracing::trace!(action = ?action, "Dispatching store action");
        self.inner.state.write().reduce(action);
        self.inner.revision.send_modify(|rev| *rev += 1);
    }

    pub fn snapshot(&self) -> AppState {
        self.inner.state.read().clone()
    }

    pub fn select<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.inner.state.read())
    }

    pub fn is_loading(&self) -> bool {
        self.select(|s| s.loading.is_loading)
    }

    /// Revision counter, bumped on every dispatch.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    /// Fetch the profile into the store. The error is also recorded in state.
    pub async fn load_profile(&self, api: &dyn PortfolioApi) -> Result<()> {
        self.dispatch(Action::ProfileRequested);
        match api.fetch_profile().await {
            Ok(profile) => {
                self.dispatch(Action::ProfileLoaded(profile));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load profile");
                self.dispatch(Action::ProfileFailed(e.rejection_message()));
                Err(e)
            }
        }
    }

    /// Fetch one page of projects. `None` and `0` both mean the first page.
    pub async fn load_projects(&self, api: &dyn PortfolioApi, page: Option<u32>) -> Result<()> {
        let page = page.filter(|p| *p > 0).unwrap_or(1);
        self.dispatch(Action::ProjectsRequested);
        match api.fetch_projects(page).await {
            Ok(projects) => {
                self.dispatch(Action::ProjectsLoaded(projects));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, page, "Failed to load projects");
                self.dispatch(Action::ProjectsFailed(e.rejection_message()));
                Err(e)
            }
        }
    }
}
