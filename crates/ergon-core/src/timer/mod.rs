mod driver;
mod engine;
mod preset;
mod session;

pub use driver::{TickDriver, DEFAULT_TICK_PERIOD};
pub use engine::{FocusEngine, PersistedFocus, TimerState};
pub use preset::{builtin_presets, FocusPreset, SessionType, DEFAULT_PRESET_ID};
pub use session::{FocusSession, SessionKind};
