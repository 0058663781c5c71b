//! Configuration Store: the JSON document of prompts, models and export settings.
//!
//! Values are addressed by dotted paths (`llm.use`, `prompts.resume.model`).
//! Overrides from a `.env`-style file are injected by the same dotted paths at
//! load time; after `load` returns the store is read-only.

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use tracing::{debug, info};

use crate::errors::AppError;

#[derive(Debug, Clone)]
pub struct ConfigStore {
    root: Value,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }
}

impl ConfigStore {
    pub fn from_value(root: Value) -> Self {
        Self { root }
    }

    /// Reads the JSON document at `config_path` and applies overrides from
    /// `env_path` if that file exists.
    pub fn load(config_path: &Path, env_path: &Path) -> Result<Self, AppError> {
        let raw = std::fs::read_to_string(config_path)
            .map_err(|e| AppError::file_access(config_path, e))?;
        let root: Value = serde_json::from_str(&raw).map_err(|e| AppError::ConfigParse {
            path: config_path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut store = Self::from_value(root);
        info!("Loaded configuration from {}", config_path.display());

        if env_path.exists() {
            let applied = store.apply_env_file(env_path)?;
            info!(
                "Applied {applied} override(s) from {}",
                env_path.display()
            );
        } else {
            debug!("No override file at {}", env_path.display());
        }

        Ok(store)
    }

    fn apply_env_file(&mut self, env_path: &Path) -> Result<usize, AppError> {
        let iter = dotenvy::from_path_iter(env_path).map_err(|e| AppError::ConfigParse {
            path: env_path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut applied = 0;
        for item in iter {
            let (key, value) = item.map_err(|e| AppError::ConfigParse {
                path: env_path.to_path_buf(),
                message: e.to_string(),
            })?;
            // undotted keys are process settings (PORT, RUST_LOG, ...), not document paths
            if !key.contains('.') {
                continue;
            }
            debug!("Override {key}");
            self.set(&key, Value::String(value));
            applied += 1;
        }
        Ok(applied)
    }

    /// Sets `value` at the dotted `path`, creating intermediate objects.
    /// An intermediate that is not an object is replaced.
    pub fn set(&mut self, path: &str, value: Value) {
        let segments: Vec<&str> = path.split('.').collect();
        let (last, parents) = match segments.split_last() {
            Some(split) => split,
            None => return,
        };

        let mut current = &mut self.root;
        for segment in parents {
            current = object_mut(current)
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        object_mut(current).insert(last.to_string(), value);
    }

    pub fn get(&self, path: &str) -> Result<&Value, AppError> {
        let mut current = &self.root;
        for segment in path.split('.') {
            current = current
                .as_object()
                .and_then(|map| map.get(segment))
                .ok_or_else(|| AppError::ConfigKeyMissing(path.to_string()))?;
        }
        Ok(current)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.get(path).is_ok()
    }

    pub fn get_str(&self, path: &str) -> Result<&str, AppError> {
        self.get(path)?.as_str().ok_or(AppError::ConfigType {
            path: path.to_string(),
            expected: "a string",
        })
    }

    /// Like `get_str`, but an absent key is `None` rather than an error.
    pub fn get_optional_str(&self, path: &str) -> Result<Option<&str>, AppError> {
        match self.get(path) {
            Ok(_) => self.get_str(path).map(Some),
            Err(AppError::ConfigKeyMissing(_)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// A view of the subtree at `prefix`. The subtree must exist.
    pub fn section(&self, prefix: &str) -> Result<ConfigSection<'_>, AppError> {
        self.get(prefix)?;
        Ok(ConfigSection {
            store: self,
            prefix: prefix.to_string(),
        })
    }

    /// Deserializes the subtree at `path` into `T`.
    pub fn get_section<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let value = self.get(path)?.clone();
        serde_json::from_value(value).map_err(|e| {
            debug!("Section {path} failed to deserialize: {e}");
            AppError::ConfigType {
                path: path.to_string(),
                expected: "a valid section",
            }
        })
    }
}

/// Keys relative to a section prefix; errors still report the full dotted path.
#[derive(Debug, Clone)]
pub struct ConfigSection<'a> {
    store: &'a ConfigStore,
    prefix: String,
}

impl<'a> ConfigSection<'a> {
    pub fn path(&self, key: &str) -> String {
        format!("{}.{key}", self.prefix)
    }

    pub fn get_str(&self, key: &str) -> Result<&'a str, AppError> {
        self.store.get_str(&self.path(key))
    }

    pub fn get_optional_str(&self, key: &str) -> Result<Option<&'a str>, AppError> {
        self.store.get_optional_str(&self.path(key))
    }
}

/// Coerces `value` into an object in place and returns its map.
fn object_mut(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with an object"),
    }
}
