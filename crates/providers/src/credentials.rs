//! Plaintext credential storage for hosted providers.
//!
//! Keys live in a small JSON map in the user's config dir. There is no
//! expiry and no encryption; the point of the abstraction is that the
//! request layer receives a `CredentialStore` instead of reaching into
//! global state, so tests can substitute an in-memory store.

use anyhow::{Context, Result};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

pub trait CredentialStore: Send + Sync {
    /// Read the key for a provider. Called at every outbound request.
    fn get(&self, provider: &str) -> Option<String>;
    fn store(&self, provider: &str, key: &str) -> Result<()>;
    /// Remove a provider's key, e.g. after the provider rejected it.
    fn clear(&self, provider: &str) -> Result<()>;
}

pub struct FileCredentialStore {
    path: PathBuf,
    cache: RwLock<HashMap<String, String>>,
}

impl FileCredentialStore {
    pub fn open_default() -> Result<Self> {
        let proj = directories::ProjectDirs::from("com.local", "Quill", "Quill")
            .context("could not determine a config directory")?;
        fs::create_dir_all(proj.config_dir())?;
        Self::open(proj.config_dir().join("credentials.json"))
    }

    pub fn open(path: PathBuf) -> Result<Self> {
        let cache = if path.exists() {
            let bytes = fs::read(&path)
                .with_context(|| format!("reading {}", path.display()))?;
            // A corrupt file means starting over, not a startup failure.
            serde_json::from_slice(&bytes).unwrap_or_default()
        } else {
            HashMap::new()
        };
        Ok(Self {
            path,
            cache: RwLock::new(cache),
        })
    }

    fn persist(&self, cache: &HashMap<String, String>) -> Result<()> {
        let bytes = serde_json::to_vec_pretty(cache)?;
        fs::write(&self.path, bytes).with_context(|| format!("writing {}", self.path.display()))
    }
}

impl CredentialStore for FileCredentialStore {
    fn get(&self, provider: &str) -> Option<String> {
        self.cache.read().get(provider).cloned()
    }

    fn store(&self, provider: &str, key: &str) -> Result<()> {
        let mut cache = self.cache.write();
        cache.insert(provider.to_string(), key.trim().to_string());
        self.persist(&cache)
    }

    fn clear(&self, provider: &str) -> Result<()> {
        let mut cache = self.cache.write();
        if cache.remove(provider).is_some() {
            tracing::info!(provider, "cleared stored credential");
            self.persist(&cache)?;
        }
        Ok(())
    }
}

/// In-memory store for tests.
#[derive(Default)]
pub struct MemoryCredentialStore {
    keys: RwLock<HashMap<String, String>>,
}

impl MemoryCredentialStore {
    pub fn with_key(provider: &str, key: &str) -> Self {
        let store = Self::default();
        store.keys.write().insert(provider.into(), key.into());
        store
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self, provider: &str) -> Option<String> {
        self.keys.read().get(provider).cloned()
    }

    fn store(&self, provider: &str, key: &str) -> Result<()> {
        self.keys
            .write()
            .insert(provider.to_string(), key.trim().to_string());
        Ok(())
    }

    fn clear(&self, provider: &str) -> Result<()> {
        self.keys.write().remove(provider);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileCredentialStore::open(path.clone()).unwrap();
        assert_eq!(store.get("gemini"), None);

        store.store("gemini", "  AIza-test-key  ").unwrap();
        assert_eq!(store.get("gemini"), Some("AIza-test-key".to_string()));

        // A fresh store reads what the first one persisted.
        let reopened = FileCredentialStore::open(path).unwrap();
        assert_eq!(reopened.get("gemini"), Some("AIza-test-key".to_string()));
    }

    #[test]
    fn test_clear_removes_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");

        let store = FileCredentialStore::open(path.clone()).unwrap();
        store.store("gemini", "key-a").unwrap();
        store.store("tavily", "key-b").unwrap();
        store.clear("gemini").unwrap();

        let reopened = FileCredentialStore::open(path).unwrap();
        assert_eq!(reopened.get("gemini"), None);
        assert_eq!(reopened.get("tavily"), Some("key-b".to_string()));
    }

    #[test]
    fn test_corrupt_file_starts_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("credentials.json");
        fs::write(&path, b"not json at all").unwrap();

        let store = FileCredentialStore::open(path).unwrap();
        assert_eq!(store.get("gemini"), None);
    }
}
