mod config;
pub mod database;
pub mod memory;
pub mod persist;

pub use config::{Config, PresetConfig, StorageConfig, TimerConfig};
pub use database::Database;
pub use memory::MemoryStore;
pub use persist::{PersistSlot, FOCUS_STORAGE_KEY, SETTINGS_STORAGE_KEY};

use std::path::PathBuf;
use std::sync::Arc;

use crate::error::StorageError;

/// Opaque durable string-keyed store.
///
/// Implementations take `&self`; backends that need mutation use interior
/// locking (SQLite does this itself).
pub trait KvStore {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;
    fn delete(&self, key: &str) -> Result<(), StorageError>;
    fn clear_all(&self) -> Result<(), StorageError>;
}

impl<T: KvStore + ?Sized> KvStore for Arc<T> {
    fn get_string(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get_string(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn delete(&self, key: &str) -> Result<(), StorageError> {
        (**self).delete(key)
    }

    fn clear_all(&self) -> Result<(), StorageError> {
        (**self).clear_all()
    }
}

/// Returns `~/.config/ergon[-dev]/` based on ERGON_ENV.
///
/// Set ERGON_ENV=dev to use development data directory.
///
/// # Errors
/// Returns an error if creating the data directory fails.
pub fn data_dir() -> Result<PathBuf, StorageError> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("ERGON_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("ergon-dev")
    } else {
        base_dir.join("ergon")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
