//! Portfolio records as served by the main API

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hosted image reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAsset {
    pub public_id: String,
    pub url: String,
}

/// One technology in the owner's stack
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StackItem {
    pub image: ImageAsset,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AboutMe {
    pub heading: String,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

/// Site owner profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub stack: Vec<StackItem>,
    pub about_me: AboutMe,
    pub github_link: String,
    pub linked_in_link: String,
    pub copyright: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(default)]
    pub key_features: Vec<String>,
    #[serde(default)]
    pub stack: Vec<String>,
    pub thumbnail: ImageAsset,
    #[serde(default)]
    pub snapshots: Vec<ImageAsset>,
    pub github_link: String,
    pub live: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `GET /api/v1/me`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileResponse {
    pub success: bool,
    pub user: Profile,
}

/// Body of `GET /api/v1/projects?page=N`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectsPage {
    pub success: bool,
    pub total_projects: u32,
    pub total_pages: u32,
    pub current_page: u32,
    pub projects: Vec<Project>,
}

/// Error body the API returns on failure
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
}
