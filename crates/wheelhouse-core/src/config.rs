//! Application configuration.
//!
//! Stored at `<config_dir>/wheelhouse/config.json`. The environment
//! variables `WHEELHOUSE_BACKEND_URL` and `WHEELHOUSE_USER_ID` override the
//! file (the CLI loads `.env` before reading them).

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::career::CredentialRules;
use crate::ships::DEFAULT_SHIP_LIMIT;

/// Application name used for config/cache directory paths
const APP_NAME: &str = "wheelhouse";

const CONFIG_FILE: &str = "config.json";

pub const BACKEND_URL_ENV: &str = "WHEELHOUSE_BACKEND_URL";
pub const USER_ID_ENV: &str = "WHEELHOUSE_USER_ID";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub backend_url: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    /// Credential rule table to use instead of the built-in one.
    #[serde(default)]
    pub rules_path: Option<PathBuf>,
    #[serde(default)]
    pub ship_limit: Option<usize>,
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let contents = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&contents)
                .with_context(|| format!("Failed to parse {}", path.display()))?
        } else {
            Self::default()
        };
        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Override file values with non-blank values from `lookup`.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_blank = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(url) = non_blank(BACKEND_URL_ENV) {
            debug!(var = BACKEND_URL_ENV, "Backend URL from environment");
            self.backend_url = Some(url);
        }
        if let Some(id) = non_blank(USER_ID_ENV) {
            debug!(var = USER_ID_ENV, "User id from environment");
            self.user_id = Some(id);
        }
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Directory for logs and other regenerable files.
    pub fn cache_dir() -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }

    pub fn backend_url(&self) -> Result<&str> {
        self.backend_url
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No backend URL configured. Set {} or add backend_url to the config file.",
                    BACKEND_URL_ENV
                )
            })
    }

    pub fn user_id(&self) -> Result<&str> {
        self.user_id
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "No user id configured. Set {} or add user_id to the config file.",
                    USER_ID_ENV
                )
            })
    }

    pub fn ship_limit(&self) -> usize {
        self.ship_limit.unwrap_or(DEFAULT_SHIP_LIMIT)
    }

    /// The configured rule table, or the built-in one.
    pub fn credential_rules(&self) -> Result<CredentialRules> {
        match self.rules_path {
            Some(ref path) => CredentialRules::load(path),
            None => Ok(CredentialRules::standard()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.backend_url().is_err());
        assert!(config.user_id().is_err());
        assert_eq!(config.ship_limit(), 12);
        assert!(config.credential_rules().is_ok());
    }

    #[test]
    fn test_env_overrides_file() {
        let mut config: Config =
            serde_json::from_str(r#"{"backend_url": "https://file.test", "user_id": "from-file", "ship_limit": 5}"#)
                .unwrap();
        config.apply_env(env(&[(BACKEND_URL_ENV, "https://env.test"), (USER_ID_ENV, "  ")]));
        assert_eq!(config.backend_url().unwrap(), "https://env.test");
        assert_eq!(config.user_id().unwrap(), "from-file");
        assert_eq!(config.ship_limit(), 5);
    }

    #[test]
    fn test_missing_rules_file_is_error() {
        let config = Config {
            rules_path: Some(PathBuf::from("/definitely/not/here/rules.json")),
            ..Default::default()
        };
        assert!(config.credential_rules().is_err());
    }
}
