//! JSON snapshots of store state under fixed keys.
//!
//! Reading is forgiving: a missing key, a storage failure or a blob that does
//! not parse all mean "no prior state". Both a bare object and the
//! `{"state": {...}, "version": n}` envelope written by older app builds are
//! accepted. Writes always use the bare object.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};

use super::KvStore;
use crate::error::StorageError;

pub const FOCUS_STORAGE_KEY: &str = "focus-storage";
pub const SETTINGS_STORAGE_KEY: &str = "settings-storage";

/// One key of a [`KvStore`] holding a JSON document.
pub struct PersistSlot<S> {
    storage: S,
    key: &'static str,
}

impl<S: KvStore> PersistSlot<S> {
    pub fn new(storage: S, key: &'static str) -> Self {
        Self { storage, key }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// Stored fields over `defaults`. Any field that does not decode
    /// discards the whole document.
    pub fn load_or<T>(&self, defaults: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let Some((stored, mut merged)) = self.read_fields(&defaults) else {
            return defaults;
        };
        for (field, value) in stored {
            merged.insert(field, value);
        }
        match serde_json::from_value(Value::Object(merged)) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "corrupt snapshot, using defaults");
                defaults
            }
        }
    }

    /// Stored fields over `defaults`, keeping each field that decodes on
    /// its own and dropping the rest.
    pub fn load_per_field<T>(&self, defaults: T) -> T
    where
        T: Serialize + DeserializeOwned,
    {
        let Some((stored, mut merged)) = self.read_fields(&defaults) else {
            return defaults;
        };
        for (field, value) in stored {
            let previous = merged.insert(field.clone(), value);
            if serde_json::from_value::<T>(Value::Object(merged.clone())).is_err() {
                tracing::warn!(key = self.key, field = %field, "invalid stored value, using default");
                if let Some(previous) = previous {
                    merged.insert(field, previous);
                }
            }
        }
        serde_json::from_value(Value::Object(merged)).unwrap_or(defaults)
    }

    pub fn save<T: Serialize>(&self, value: &T) -> Result<(), StorageError> {
        let json = serde_json::to_string(value).map_err(|source| StorageError::Encode {
            key: self.key.to_string(),
            source,
        })?;
        self.storage.set(self.key, &json)
    }

    /// Known stored fields and the defaults as a JSON object, or `None`
    /// when there is nothing usable under the key.
    fn read_fields<T: Serialize>(
        &self,
        defaults: &T,
    ) -> Option<(Map<String, Value>, Map<String, Value>)> {
        let raw = match self.storage.get_string(self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "failed to read snapshot, using defaults");
                return None;
            }
        };
        let Ok(Value::Object(defaults)) = serde_json::to_value(defaults) else {
            return None;
        };

        let document = match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(mut doc)) => match doc.remove("state") {
                Some(Value::Object(state)) => state,
                Some(_) => {
                    tracing::warn!(key = self.key, "snapshot envelope without object state, using defaults");
                    return None;
                }
                None => doc,
            },
            Ok(_) => {
                tracing::warn!(key = self.key, "snapshot is not an object, using defaults");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "corrupt snapshot, using defaults");
                return None;
            }
        };

        let known: Map<String, Value> = document
            .into_iter()
            .filter(|(field, _)| defaults.contains_key(field))
            .collect();
        if known.is_empty() {
            tracing::warn!(key = self.key, "snapshot has no known fields, using defaults");
            return None;
        }
        Some((known, defaults))
    }
}
