//! # Ergon Core Library
//!
//! This library provides the business logic for the Ergon focus timer: a
//! Pomodoro-style work/break cycle, the history of completed work sessions
//! and the user's settings. Front ends (the `ergon` CLI, mobile shells) are
//! thin layers that read state and call actions.
//!
//! ## Architecture
//!
//! - **Focus Engine**: a pure, tick-driven state machine. The caller invokes
//!   `tick()` once per second while it runs
//! - **Focus Store**: the engine plus persistence to a key/value store and a
//!   subscriber list notified on every change
//! - **Tick Driver**: tokio task feeding `tick()` to a shared store
//! - **Storage**: SQLite or in-memory key/value stores, TOML configuration
//! - **Settings**: independent preference flags with their own store
//!
//! ## Key Components
//!
//! - [`FocusEngine`]: Core timer state machine
//! - [`FocusStore`]: Persisted, observable wrapper around the engine
//! - [`TickDriver`]: Periodic caller of `tick()`
//! - [`SettingsStore`]: Preference flags and theme
//! - [`FocusStats`]: Aggregates derived from the session history

pub mod error;
pub mod events;
pub mod settings;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;

pub use error::{ConfigError, StorageError, ValidationError};
pub use events::Event;
pub use settings::{Settings, SettingsStore, ThemeMode, Toggle};
pub use stats::FocusStats;
pub use storage::{Config, Database, KvStore, MemoryStore};
pub use store::{FocusStore, SubscriptionId};
pub use timer::{
    FocusEngine, FocusPreset, FocusSession, PersistedFocus, SessionKind, SessionType, TickDriver,
    TimerState,
};
