pub mod config;
pub mod history;
pub mod preset;
pub mod settings;
pub mod stats;
pub mod timer;

use ergon_core::{Config, Database, FocusStore, SettingsStore};

pub type CliResult<T = ()> = Result<T, Box<dyn std::error::Error>>;

/// Focus store backed by the configured database.
pub fn open_focus_store(config: &Config) -> CliResult<FocusStore<Database>> {
    let db = Database::open_at(&config.database_path()?)?;
    Ok(FocusStore::open_with_default(db, config.default_preset()))
}

/// Settings store on its own connection to the same database.
pub fn open_settings_store(config: &Config) -> CliResult<SettingsStore<Database>> {
    let db = Database::open_at(&config.database_path()?)?;
    Ok(SettingsStore::open(db))
}

/// Surface a write failure that the store only logged.
pub fn flush_focus(store: &mut FocusStore<Database>) -> CliResult {
    store.flush()?;
    Ok(())
}
