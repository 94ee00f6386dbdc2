use std::{fs, path::{Path, PathBuf}};
use directories::BaseDirs;
use log::{debug, info, warn};
use crate::common::{AppError, CREDENTIAL_DIR, CREDENTIAL_FILE};

// on-disk shape of the credential file: {"api_key": "..."}
#[derive(serde::Deserialize, serde::Serialize)]
struct ApiKeyRecord {
    api_key: String,
}

/// One secret string kept in a per-user JSON file.
#[derive(Debug, Clone)]
pub struct CredentialStore {
    path: PathBuf,
}

impl CredentialStore {
    /// `~/.openai/api_key.json` for the current user.
    pub fn default_location() -> Result<Self, AppError> {
        let base_dirs = BaseDirs::new().ok_or(AppError::HomeDir)?;
        let path = base_dirs.home_dir().join(CREDENTIAL_DIR).join(CREDENTIAL_FILE);
        Ok(Self { path })
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Overwrites the stored value, creating the parent directory if needed.
    pub fn store(&self, secret: &str) -> Result<(), AppError> {
        if let Some(dir) = self.path.parent() {
            if !dir.is_dir() {
                info!("Directory {} does not exist. Trying to create it...",
                    dir.display());
                fs::create_dir_all(dir)?;
            }
        }
        let record = ApiKeyRecord { api_key: secret.to_string() };
        fs::write(&self.path, serde_json::to_string(&record)?)?;
        debug!("credential written to {}", self.path.display());
        Ok(())
    }

    /// Returns the stored value, or an empty string when nothing usable is
    /// stored.
    pub fn load(&self) -> String {
        if !self.path.exists() {
            debug!("no credential at {}", self.path.display());
            return String::new();
        }
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(error) => {
                warn!("Could not read {}: {}", self.path.display(), error);
                return String::new();
            }
        };
        match serde_json::from_str::<ApiKeyRecord>(&content) {
            Ok(record) => record.api_key,
            Err(error) => {
                warn!("Ignoring malformed credential file {}: {}",
                    self.path.display(), error);
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper: store pointing into a fresh temp dir, in a subdirectory that
    // does not exist yet
    fn setup_store() -> (tempfile::TempDir, CredentialStore) {
        let dir = tempfile::tempdir().expect("failed to create temp dir");
        let store = CredentialStore::at(
            dir.path().join(CREDENTIAL_DIR).join(CREDENTIAL_FILE));
        (dir, store)
    }

    #[test]
    fn test_load_without_store_is_empty() {
        let (_dir, store) = setup_store();
        assert!(!store.path().parent().unwrap().exists());
        assert_eq!(store.load(), "");
    }

    #[test]
    fn test_store_overwrites() {
        let (_dir, store) = setup_store();

        store.store("secret-A").unwrap();
        assert_eq!(store.load(), "secret-A");

        store.store("secret-B").unwrap();
        assert_eq!(store.load(), "secret-B");

        store.store("").unwrap();
        assert_eq!(store.load(), "");
    }

    #[test]
    fn test_file_format() {
        let (_dir, store) = setup_store();
        store.store("sk-123").unwrap();

        let raw = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["api_key"], "sk-123");
    }

    #[test]
    fn test_malformed_file_is_empty() {
        let (_dir, store) = setup_store();
        fs::create_dir_all(store.path().parent().unwrap()).unwrap();

        fs::write(store.path(), "not json").unwrap();
        assert_eq!(store.load(), "");

        fs::write(store.path(), "{\"other\": 1}").unwrap();
        assert_eq!(store.load(), "");
    }

    #[test]
    fn test_default_location() {
        if let Ok(store) = CredentialStore::default_location() {
            assert!(store.path().ends_with(".openai/api_key.json"));
        }
    }
}
