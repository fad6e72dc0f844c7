//! CLI configuration file support
//!
//! Loads configuration from ~/.config/folio/config.toml

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use folio_chat::ChatConfig;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(default)]
    pub endpoints: EndpointsConfig,
    #[serde(default)]
    pub chat: ChatSection,
}

/// Backend locations
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Chat backend base URL
    pub agent_backend: Option<String>,
    /// Profile/projects API base URL
    pub main_server: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSection {
    /// Override for the opening assistant message
    pub greeting: Option<String>,
    #[serde(default = "default_true")]
    pub show_greeting: bool,
}

impl Default for ChatSection {
    fn default() -> Self {
        Self {
            greeting: None,
            show_greeting: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

impl CliConfig {
    pub fn load(path: Option<&str>) -> Self {
        Self::load_from_path(path.map(PathBuf::from).or_else(Self::default_path))
    }

    pub fn load_from_path(path: Option<PathBuf>) -> Self {
        let Some(path) = path else {
            return Self::default();
        };

        if !path.exists() {
            return Self::default();
        }

        match std::fs::read_to_string(&path) {
            Ok(content) => toml::from_str(&content).unwrap_or_else(|e| {
                tracing::warn!(path = %path.display(), error = %e, "Ignoring invalid config file");
                Self::default()
            }),
            Err(_) => Self::default(),
        }
    }

    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("folio").join("config.toml"))
    }

    /// Flag/env value wins over the file.
    pub fn agent_backend(&self, flag: Option<&str>) -> Option<String> {
        pick(flag, self.endpoints.agent_backend.as_deref())
    }

    pub fn main_server(&self, flag: Option<&str>) -> Option<String> {
        pick(flag, self.endpoints.main_server.as_deref())
    }

    pub fn chat_config(&self, backend_url: Option<String>, greeting: bool) -> ChatConfig {
        let mut config = ChatConfig {
            backend_url,
            ..ChatConfig::default()
        };
        if greeting && self.chat.show_greeting {
            config = match &self.chat.greeting {
                Some(text) => config.with_greeting(text.clone()),
                None => config.with_default_greeting(),
            };
        }
        config
    }
}

fn pick(primary: Option<&str>, fallback: Option<&str>) -> Option<String> {
    let usable = |value: Option<&str>| {
        value
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
    };
    usable(primary).or_else(|| usable(fallback))
}
