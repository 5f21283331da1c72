//! API key storage
//!
//! The key lives as the `cloud_key` entry of a YAML mapping in the user
//! config file. Other entries in that file belong to other tools and are
//! preserved on write.

use serde_yaml::{Mapping, Value};
use skylog_core::domain::key::ApiKey;
use std::path::{Path, PathBuf};

use crate::error::{ClientError, Result};

/// Name of the user config file inside the config directory
pub const DEFAULT_USER_CONF: &str = "config.yaml";

const CLOUD_KEY: &str = "cloud_key";

/// Storage for the user's API key
pub trait KeyStore: Send + Sync {
    /// Returns the stored key, or `None` if none was ever stored
    ///
    /// The value is returned as stored; it is not validated.
    fn get_key(&self) -> Result<Option<String>>;

    /// Persists `key` as the user's API key
    fn store_key(&self, key: &ApiKey) -> Result<()>;
}

/// Key store backed by the YAML user config file
#[derive(Debug, Clone)]
pub struct FileKeyStore {
    path: PathBuf,
}

impl FileKeyStore {
    /// Creates a store for `<config_dir>/config.yaml`
    pub fn new(config_dir: impl AsRef<Path>) -> Self {
        Self {
            path: config_dir.as_ref().join(DEFAULT_USER_CONF),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_conf(&self) -> Result<Mapping> {
        if !self.path.exists() {
            return Ok(Mapping::new());
        }

        let content = std::fs::read_to_string(&self.path).map_err(|e| {
            ClientError::ConfigError(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        if content.trim().is_empty() {
            return Ok(Mapping::new());
        }

        let value: Value = serde_yaml::from_str(&content).map_err(|e| {
            ClientError::ConfigError(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        match value {
            Value::Mapping(map) => Ok(map),
            Value::Null => Ok(Mapping::new()),
            _ => Err(ClientError::ConfigError(format!(
                "{} does not contain a key-value mapping",
                self.path.display()
            ))),
        }
    }

    fn update_conf(&self, key: &str, value: Value) -> Result<()> {
        let mut conf = self.read_conf()?;
        conf.insert(Value::String(key.to_string()), value);

        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir).map_err(|e| {
                ClientError::ConfigError(format!("Failed to create {}: {}", dir.display(), e))
            })?;
        }

        let content = serde_yaml::to_string(&conf).map_err(|e| {
            ClientError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        std::fs::write(&self.path, content).map_err(|e| {
            ClientError::ConfigError(format!("Failed to write {}: {}", self.path.display(), e))
        })
    }
}

impl KeyStore for FileKeyStore {
    fn get_key(&self) -> Result<Option<String>> {
        let conf = self.read_conf()?;
        Ok(conf
            .get(CLOUD_KEY)
            .and_then(Value::as_str)
            .map(str::to_string))
    }

    fn store_key(&self, key: &ApiKey) -> Result<()> {
        self.update_conf(CLOUD_KEY, Value::String(key.as_str().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const KEY: &str = "abcdefghijklmnopqrstuv";

    #[test]
    fn test_get_key_without_file() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyStore::new(dir.path());
        assert_eq!(store.get_key().unwrap(), None);
    }

    #[test]
    fn test_store_then_get_key() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyStore::new(dir.path().join("nested"));

        store.store_key(&ApiKey::parse(KEY).unwrap()).unwrap();

        assert_eq!(store.get_key().unwrap().as_deref(), Some(KEY));
        let content = std::fs::read_to_string(store.path()).unwrap();
        assert_eq!(content.trim(), format!("cloud_key: {}", KEY));
    }

    #[test]
    fn test_store_preserves_other_entries() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyStore::new(dir.path());
        std::fs::write(store.path(), "user_id: 1234\nstats_enabled: false\n").unwrap();

        store.store_key(&ApiKey::parse(KEY).unwrap()).unwrap();

        let conf: Mapping =
            serde_yaml::from_str(&std::fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(conf.get("user_id"), Some(&Value::from(1234)));
        assert_eq!(conf.get("stats_enabled"), Some(&Value::Bool(false)));
        assert_eq!(conf.get("cloud_key").and_then(Value::as_str), Some(KEY));
    }

    #[test]
    fn test_get_key_is_not_validated() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyStore::new(dir.path());
        std::fs::write(store.path(), "cloud_key: short\n").unwrap();

        assert_eq!(store.get_key().unwrap().as_deref(), Some("short"));
    }

    #[test]
    fn test_non_mapping_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let store = FileKeyStore::new(dir.path());
        std::fs::write(store.path(), "- a\n- b\n").unwrap();

        assert!(matches!(store.get_key(), Err(ClientError::ConfigError(_))));
    }
}
