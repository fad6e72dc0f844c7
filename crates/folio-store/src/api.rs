//! Client for the portfolio main server

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{Result, SERVER_ERROR_FALLBACK, StoreError};
use crate::models::{ApiErrorBody, Profile, ProfileResponse, ProjectsPage};

/// Environment variable naming the main server base URL
pub const MAIN_SERVER_ENV: &str = "FOLIO_MAIN_SERVER";

/// Read access to the profile and project records
#[async_trait]
pub trait PortfolioApi: Send + Sync {
    async fn fetch_profile(&self) -> Result<Profile>;

    async fn fetch_projects(&self, page: u32) -> Result<ProjectsPage>;
}

#[derive(Debug, Clone)]
pub struct HttpPortfolioApi {
    client: Client,
    base_url: Option<String>,
}

impl HttpPortfolioApi {
    pub fn new(base_url: Option<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    pub fn with_client(client: Client, base_url: Option<String>) -> Self {
        Self { client, base_url }
    }

    /// Read the base URL from [`MAIN_SERVER_ENV`]; blank counts as unset.
    pub fn from_env() -> Self {
        let base_url = std::env::var(MAIN_SERVER_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self::new(base_url)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        let base = self.base_url.as_deref().ok_or(StoreError::MissingServer)?;
        Ok(Url::parse(&format!("{}{}", base.trim_end_matches('/'), path))?)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T> {
        tracing::debug!(url = %url, "Fetching from main server");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|b| b.message)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| SERVER_ERROR_FALLBACK.to_string());
        Err(StoreError::Api {
            status: status.as_u16(),
            message,
        })
    }
}

#[async_trait]
impl PortfolioApi for HttpPortfolioApi {
    async fn fetch_profile(&self) -> Result<Profile> {
        let url = self.endpoint("/api/v1/me")?;
        let response: ProfileResponse = self.get_json(url).await?;
        Ok(response.user)
    }

    async fn fetch_projects(&self, page: u32) -> Result<ProjectsPage> {
        let mut url = self.endpoint("/api/v1/projects")?;
        url.query_pairs_mut().append_pair("page", &page.to_string());
        self.get_json(url).await
    }
}
