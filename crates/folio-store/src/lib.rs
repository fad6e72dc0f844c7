//! Folio Store - shared application state
//!
//! A single source of truth for the page-wide loading flag and the cached
//! profile and project records, plus the HTTP client that fills it.

pub mod api;
pub mod error;
pub mod models;
pub mod state;
pub mod store;

pub use api::{HttpPortfolioApi, MAIN_SERVER_ENV, PortfolioApi};
pub use error::{Result, StoreError};
pub use models::{AboutMe, ImageAsset, Profile, Project, ProjectsPage, Role, StackItem};
pub use state::{Action, AppState, LoadingState, ProfileState, ProjectsState};
pub use store::AppStore;
