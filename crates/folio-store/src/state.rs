//! Application state slices and the actions that update them

use serde::Serialize;

use crate::models::{Profile, Project, ProjectsPage};

pub const PROFILE_ERROR_FALLBACK: &str = "Failed to load profile.";
pub const PROJECTS_ERROR_FALLBACK: &str = "Something went wrong.";

/// Page-wide loading overlay flag
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadingState {
    pub is_loading: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProfileState {
    pub profile: Option<Profile>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectsState {
    pub projects: Vec<Project>,
    pub total_projects: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub is_loading: bool,
    pub error: Option<String>,
}

impl Default for ProjectsState {
    fn default() -> Self {
        Self {
            projects: Vec::new(),
            total_projects: 0,
            total_pages: 0,
            current_page: 1,
            is_loading: false,
            error: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AppState {
    pub loading: LoadingState,
    pub profile: ProfileState,
    pub projects: ProjectsState,
}

#[derive(Debug, Clone)]
pub enum Action {
    ShowLoader,
    HideLoader,
    ProfileRequested,
    ProfileLoaded(Profile),
    ProfileFailed(String),
    ClearProfile,
    ProjectsRequested,
    ProjectsLoaded(ProjectsPage),
    ProjectsFailed(String),
}

impl AppState {
    pub fn reduce(&mut self, action: Action) {
        match action {
            Action::ShowLoader => self.loading.is_loading = true,
            Action::HideLoader => self.loading.is_loading = false,
            Action::ProfileRequested => {
                self.profile.is_loading = true;
                self.profile.error = None;
            }
            Action::ProfileLoaded(profile) => {
                self.profile.is_loading = false;
                self.profile.profile = Some(profile);
            }
            Action::ProfileFailed(message) => {
                self.profile.is_loading = false;
                self.profile.profile = None;
                self.profile.error = Some(or_fallback(message, PROFILE_ERROR_FALLBACK));
            }
            Action::ClearProfile => self.profile = ProfileState::default(),
            Action::ProjectsRequested => {
                self.projects.is_loading = true;
                self.projects.error = None;
            }
            Action::ProjectsLoaded(page) => {
                self.projects.is_loading = false;
                self.projects.projects = page.projects;
                self.projects.total_projects = page.total_projects;
                self.projects.total_pages = page.total_pages;
                self.projects.current_page = page.current_page;
            }
            Action::ProjectsFailed(message) => {
                self.projects.is_loading = false;
                self.projects.error = Some(or_fallback(message, PROJECTS_ERROR_FALLBACK));
            }
        }
    }
}

fn or_fallback(message: String, fallback: &str) -> String {
    if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    }
}
