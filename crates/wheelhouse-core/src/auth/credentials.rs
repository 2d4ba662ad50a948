use anyhow::{Context, Result};
use keyring::Entry;
use tracing::debug;

const SERVICE_NAME: &str = "wheelhouse";

/// Environment variable that overrides the stored API key.
pub const API_KEY_ENV: &str = "WHEELHOUSE_API_KEY";

/// Backend API keys in the OS keychain, one entry per backend URL.
pub struct CredentialStore;

impl CredentialStore {
    pub fn store(backend_url: &str, api_key: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, backend_url)
            .context("Failed to create keyring entry")?;
        entry
            .set_password(api_key)
            .context("Failed to store API key in keychain")?;
        Ok(())
    }

    pub fn get_api_key(backend_url: &str) -> Result<String> {
        let entry = Entry::new(SERVICE_NAME, backend_url)
            .context("Failed to create keyring entry")?;
        entry
            .get_password()
            .context("Failed to retrieve API key from keychain")
    }

    pub fn delete(backend_url: &str) -> Result<()> {
        let entry = Entry::new(SERVICE_NAME, backend_url)
            .context("Failed to create keyring entry")?;
        entry
            .delete_credential()
            .context("Failed to delete API key from keychain")?;
        Ok(())
    }

    pub fn has_api_key(backend_url: &str) -> bool {
        if let Ok(entry) = Entry::new(SERVICE_NAME, backend_url) {
            entry.get_password().is_ok()
        } else {
            false
        }
    }

    /// The key to use for `backend_url`: the environment first, then the
    /// keychain. None when neither has one.
    pub fn resolve_api_key(backend_url: &str) -> Option<String> {
        if let Some(key) = env_api_key(std::env::var(API_KEY_ENV).ok()) {
            debug!("Using API key from environment");
            return Some(key);
        }
        match Self::get_api_key(backend_url) {
            Ok(key) => Some(key),
            Err(e) => {
                debug!(error = %e, "No API key in keychain");
                None
            }
        }
    }
}

fn env_api_key(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
