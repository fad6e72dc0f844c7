//! Chat session configuration

use serde::{Deserialize, Serialize};

/// Environment variable naming the chat backend base URL
pub const AGENT_BACKEND_ENV: &str = "FOLIO_AGENT_BACKEND";

pub const DEFAULT_GREETING: &str = "Hello! How can I help you today?";
pub const DEFAULT_APOLOGY: &str = "Sorry, I couldn't connect to the server. Please try again.";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL of the chat backend. When unset every connection fails.
    #[serde(default)]
    pub backend_url: Option<String>,
    /// Assistant message placed in the transcript when the session starts
    #[serde(default)]
    pub greeting: Option<String>,
    /// Assistant message appended when the transport fails
    #[serde(default = "default_apology")]
    pub apology: String,
}

fn default_apology() -> String {
    DEFAULT_APOLOGY.to_string()
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            backend_url: None,
            greeting: None,
            apology: default_apology(),
        }
    }
}

impl ChatConfig {
    /// Read the backend URL from [`AGENT_BACKEND_ENV`]; blank counts as unset.
    pub fn from_env() -> Self {
        let backend_url = std::env::var(AGENT_BACKEND_ENV)
            .ok()
            .filter(|value| !value.trim().is_empty());
        Self {
            backend_url,
            ..Self::default()
        }
    }

    pub fn with_backend_url(mut self, url: impl Into<String>) -> Self {
        self.backend_url = Some(url.into());
        self
    }

    pub fn with_greeting(mut self, greeting: impl Into<String>) -> Self {
        self.greeting = Some(greeting.into());
        self
    }

    /// Use the stock greeting.
    pub fn with_default_greeting(self) -> Self {
        self.with_greeting(DEFAULT_GREETING)
    }
}
