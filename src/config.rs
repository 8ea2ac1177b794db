//! Application configuration stored as a flat JSON object.
//!
//! A [`Config`] is constructed once (usually by [`Config::load`]) and passed
//! by reference to whatever needs it. There is no process-wide instance.

use fs2::FileExt;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::fs::{File, OpenOptions};
use std::io::{Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result, Step};
use crate::fs_utils::{create_directory, read_file};
use crate::paths::dir_name;

/// Key/value configuration backed by a JSON file
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Config {
    values: Map<String, Value>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a JSON file
    ///
    /// # Errors
    /// - `NotFound` if the file does not exist
    /// - `Validation` if it is not a JSON object
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        Self::parse(&content, path)
    }

    /// Load configuration, treating a missing file as empty
    pub fn load_or_default(path: &Path) -> Result<Self> {
        match Self::load(path) {
            Err(e) if e.is_not_found() => Ok(Self::default()),
            other => other,
        }
    }

    fn parse(content: &str, path: &Path) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        let value: Value = serde_json::from_str(content).map_err(|source| Error::InvalidJson {
            path: path.to_path_buf(),
            source,
        })?;
        match value {
            Value::Object(values) => Ok(Self { values }),
            _ => Err(Error::Validation(format!(
                "Config file is not a JSON object: {}",
                path.display()
            ))),
        }
    }

    fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.values)
            .map_err(|e| Error::Validation(format!("Failed to serialize config: {e}")))
    }

    /// Save configuration to `path` atomically
    ///
    /// The parent directory is created if missing. Content goes to a temp
    /// file first and is renamed into place, so a crash never leaves a
    /// half-written config behind.
    pub fn save(&self, path: &Path) -> Result<()> {
        create_directory(dir_name(path))?;

        let content = self.to_json()?;

        let temp_path = path.with_extension("json.tmp");
        std::fs::write(&temp_path, &content)
            .map_err(|e| Error::internal(Step::Write, &temp_path, e))?;

        std::fs::rename(&temp_path, path).map_err(|e| Error::internal(Step::Rename, path, e))
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }

    /// Get a value deserialized as `T`
    ///
    /// Returns `Ok(None)` when the key is absent and `Validation` when the
    /// stored value has the wrong shape.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        self.values
            .get(key)
            .map(|v| {
                T::deserialize(v).map_err(|e| {
                    Error::Validation(format!("Config value '{key}' has the wrong type: {e}"))
                })
            })
            .transpose()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Serialize) -> Result<()> {
        let key = key.into();
        let value = serde_json::to_value(value)
            .map_err(|e| Error::Validation(format!("Config value '{key}' is not serializable: {e}")))?;
        self.values.insert(key, value);
        Ok(())
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.values.remove(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A locked config file handle for safe read-modify-write across processes
pub struct LockedConfig {
    file: File,
    config: Config,
    path: PathBuf,
}

impl LockedConfig {
    /// Open and lock the config file for exclusive access
    pub fn lock(path: &Path) -> Result<Self> {
        create_directory(dir_name(path))?;

        let mut file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(path)
            .map_err(|e| Error::internal(Step::Read, path, e))?;

        // blocks until available
        file.lock_exclusive()
            .map_err(|e| Error::internal(Step::Lock, path, e))?;

        let mut content = String::new();
        file.read_to_string(&mut content)
            .map_err(|e| Error::internal(Step::Read, path, e))?;
        let config = Config::parse(&content, path)?;

        Ok(Self {
            file,
            config,
            path: path.to_path_buf(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Apply `f` and write the result back while still holding the lock
    pub fn update<F>(&mut self, f: F) -> Result<()>
    where
        F: FnOnce(&mut Config) -> Result<()>,
    {
        f(&mut self.config)?;
        self.save()
    }

    fn save(&mut self) -> Result<()> {
        let content = self.config.to_json()?;
        let write_err = |e| Error::internal(Step::Write, &self.path, e);

        self.file.set_len(0).map_err(write_err)?;
        self.file.seek(SeekFrom::Start(0)).map_err(write_err)?;
        self.file.write_all(content.as_bytes()).map_err(write_err)?;
        self.file.sync_all().map_err(write_err)?;

        Ok(())
    }
}

impl Drop for LockedConfig {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let err = Config::load(&temp_dir.path().join("config.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);

        let cfg = Config::load_or_default(&temp_dir.path().join("config.json")).unwrap();
        assert!(cfg.is_empty());
    }

    #[test]
    fn test_load_invalid_json_is_validation() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");
        std::fs::write(&path, "invalid json").unwrap();
        assert_eq!(Config::load(&path).unwrap_err().kind(), ErrorKind::Validation);

        std::fs::write(&path, "[1, 2]").unwrap();
        assert_eq!(Config::load(&path).unwrap_err().kind(), ErrorKind::Validation);
    }

    #[test]
    fn test_save_creates_parent_and_roundtrips() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested/dir/config.json");

        let mut cfg = Config::new();
        cfg.set("key1", "value1").unwrap();
        cfg.set("key2", "value2").unwrap();
        cfg.save(&path).unwrap();

        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            serde_json::to_string_pretty(&json!({"key1": "value1", "key2": "value2"})).unwrap()
        );
        assert!(!path.with_extension("json.tmp").exists());

        let loaded = Config::load(&path).unwrap();
        assert_eq!(loaded, cfg);
        assert_eq!(loaded.get("key1"), Some(&json!("value1")));
    }

    #[test]
    fn test_save_into_file_parent_is_internal() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        std::fs::write(&blocker, "not a dir").unwrap();

        let err = Config::new().save(&blocker.join("config.json")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn test_get_as_and_remove() {
        let mut cfg = Config::new();
        cfg.set("retries", 3).unwrap();
        cfg.set("name", "jem").unwrap();

        assert_eq!(cfg.get_as::<u32>("retries").unwrap(), Some(3));
        assert_eq!(cfg.get_as::<u32>("missing").unwrap(), None);
        assert_eq!(
            cfg.get_as::<u32>("name").unwrap_err().kind(),
            ErrorKind::Validation
        );

        assert_eq!(cfg.remove("name"), Some(json!("jem")));
        assert_eq!(cfg.keys().collect::<Vec<_>>(), vec!["retries"]);
    }

    #[test]
    fn test_locked_config_update() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.json");

        {
            let mut locked = LockedConfig::lock(&path).unwrap();
            assert!(locked.config().is_empty());
            locked.update(|cfg| cfg.set("theme", "dark")).unwrap();
        }

        {
            let mut locked = LockedConfig::lock(&path).unwrap();
            locked.update(|cfg| cfg.set("size", 12)).unwrap();
        }

        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.get("theme"), Some(&json!("dark")));
        assert_eq!(cfg.get("size"), Some(&json!(12)));
    }
}
