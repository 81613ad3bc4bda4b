//! User preferences and the store that persists them.
//!
//! Every flag is an independent boolean flipped by its own action. The whole
//! settings object is written under `settings-storage` after each change.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::error::{StorageError, ValidationError};
use crate::storage::{KvStore, PersistSlot, SETTINGS_STORAGE_KEY};
use crate::timer::SessionType;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    Dark,
    #[default]
    System,
}

impl FromStr for ThemeMode {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            "system" => Ok(ThemeMode::System),
            other => Err(ValidationError::InvalidValue {
                field: "themeMode".into(),
                message: format!("'{other}' is not one of light, dark, system"),
            }),
        }
    }
}

impl fmt::Display for ThemeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        })
    }
}

/// The boolean preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    HapticFeedback,
    SoundEnabled,
    FocusReminders,
    BreakReminders,
    DailySummary,
    AutoStartBreaks,
    AutoStartWork,
}

impl Toggle {
    pub const ALL: [Toggle; 7] = [
        Toggle::HapticFeedback,
        Toggle::SoundEnabled,
        Toggle::FocusReminders,
        Toggle::BreakReminders,
        Toggle::DailySummary,
        Toggle::AutoStartBreaks,
        Toggle::AutoStartWork,
    ];

    /// Field name in the persisted settings object.
    pub fn key(self) -> &'static str {
        match self {
            Toggle::HapticFeedback => "hapticFeedback",
            Toggle::SoundEnabled => "soundEnabled",
            Toggle::FocusReminders => "focusReminders",
            Toggle::BreakReminders => "breakReminders",
            Toggle::DailySummary => "dailySummary",
            Toggle::AutoStartBreaks => "autoStartBreaks",
            Toggle::AutoStartWork => "autoStartWork",
        }
    }
}

impl FromStr for Toggle {
    type Err = ValidationError;

    /// Accepts `hapticFeedback`, `haptic-feedback` and `haptic_feedback`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted: String = s
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .collect::<String>()
            .to_ascii_lowercase();
        Toggle::ALL
            .into_iter()
            .find(|t| t.key().to_ascii_lowercase() == wanted)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "toggle".into(),
                message: format!("unknown setting '{s}'"),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub theme_mode: ThemeMode,
    pub haptic_feedback: bool,
    pub sound_enabled: bool,
    pub focus_reminders: bool,
    pub break_reminders: bool,
    pub daily_summary: bool,
    /// 24h `HH:mm`.
    pub daily_summary_time: String,
    pub auto_start_breaks: bool,
    pub auto_start_work: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            theme_mode: ThemeMode::System,
            haptic_feedback: true,
            sound_enabled: true,
            focus_reminders: true,
            break_reminders: true,
            daily_summary: false,
            daily_summary_time: "20:00".into(),
            auto_start_breaks: false,
            auto_start_work: false,
        }
    }
}

impl Settings {
    pub fn get(&self, toggle: Toggle) -> bool {
        match toggle {
            Toggle::HapticFeedback => self.haptic_feedback,
            Toggle::SoundEnabled => self.sound_enabled,
            Toggle::FocusReminders => self.focus_reminders,
            Toggle::BreakReminders => self.break_reminders,
            Toggle::DailySummary => self.daily_summary,
            Toggle::AutoStartBreaks => self.auto_start_breaks,
            Toggle::AutoStartWork => self.auto_start_work,
        }
    }

    fn flag_mut(&mut self, toggle: Toggle) -> &mut bool {
        match toggle {
            Toggle::HapticFeedback => &mut self.haptic_feedback,
            Toggle::SoundEnabled => &mut self.sound_enabled,
            Toggle::FocusReminders => &mut self.focus_reminders,
            Toggle::BreakReminders => &mut self.break_reminders,
            Toggle::DailySummary => &mut self.daily_summary,
            Toggle::AutoStartBreaks => &mut self.auto_start_breaks,
            Toggle::AutoStartWork => &mut self.auto_start_work,
        }
    }

    /// Whether the front end should start `next` without waiting for the user.
    pub fn should_auto_start(&self, next: SessionType) -> bool {
        if next.is_break() {
            self.auto_start_breaks
        } else {
            self.auto_start_work
        }
    }

    /// Parsed `daily_summary_time`, if well-formed.
    pub fn daily_summary_at(&self) -> Option<NaiveTime> {
        parse_time_of_day(&self.daily_summary_time).ok()
    }
}

/// Strict 24h `HH:mm`.
pub fn parse_time_of_day(value: &str) -> Result<NaiveTime, ValidationError> {
    let bytes = value.as_bytes();
    let digits_at = |idx: &[usize]| idx.iter().all(|&i| bytes[i].is_ascii_digit());
    if bytes.len() != 5 || bytes[2] != b':' || !digits_at(&[0, 1, 3, 4]) {
        return Err(ValidationError::InvalidTimeOfDay(value.to_string()));
    }
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ValidationError::InvalidTimeOfDay(value.to_string()))
}

pub struct SettingsStore<S> {
    settings: Settings,
    slot: PersistSlot<S>,
    last_persist_error: Option<String>,
}

impl<S: KvStore> SettingsStore<S> {
    /// Restore from `storage`; missing or invalid fields take their defaults.
    pub fn open(storage: S) -> Self {
        let slot = PersistSlot::new(storage, SETTINGS_STORAGE_KEY);
        let mut settings = slot.load_per_field(Settings::default());
        if settings.daily_summary_at().is_none() {
            tracing::warn!(value = %settings.daily_summary_time, "invalid stored daily summary time, using default");
            settings.daily_summary_time = Settings::default().daily_summary_time;
        }
        Self {
            settings,
            slot,
            last_persist_error: None,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn last_persist_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    pub fn set_theme_mode(&mut self, mode: ThemeMode) {
        self.update(|s| s.theme_mode = mode);
    }

    /// Flip one flag; returns its new value.
    pub fn toggle(&mut self, toggle: Toggle) -> bool {
        self.update(|s| {
            let flag = s.flag_mut(toggle);
            *flag = !*flag;
        });
        self.settings.get(toggle)
    }

    pub fn toggle_haptic_feedback(&mut self) -> bool {
        self.toggle(Toggle::HapticFeedback)
    }

    pub fn toggle_sound_enabled(&mut self) -> bool {
        self.toggle(Toggle::SoundEnabled)
    }

    pub fn toggle_focus_reminders(&mut self) -> bool {
        self.toggle(Toggle::FocusReminders)
    }

    pub fn toggle_break_reminders(&mut self) -> bool {
        self.toggle(Toggle::BreakReminders)
    }

    pub fn toggle_daily_summary(&mut self) -> bool {
        self.toggle(Toggle::DailySummary)
    }

    pub fn toggle_auto_start_breaks(&mut self) -> bool {
        self.toggle(Toggle::AutoStartBreaks)
    }

    pub fn toggle_auto_start_work(&mut self) -> bool {
        self.toggle(Toggle::AutoStartWork)
    }

    /// Set the daily summary time. Rejects anything but `HH:mm`.
    pub fn set_daily_summary_time(&mut self, time: &str) -> Result<(), ValidationError> {
        parse_time_of_day(time)?;
        self.update(|s| s.daily_summary_time = time.to_string());
        Ok(())
    }

    /// Restore every default in one write.
    pub fn reset_settings(&mut self) {
        self.update(|s| *s = Settings::default());
    }

    pub fn flush(&mut self) -> Result<(), StorageError> {
        let result = self.slot.save(&self.settings);
        self.last_persist_error = result.as_ref().err().map(ToString::to_string);
        result
    }

    fn update(&mut self, change: impl FnOnce(&mut Settings)) {
        change(&mut self.settings);
        if let Err(e) = self.flush() {
            tracing::warn!(error = %e, "failed to persist settings");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use std::sync::Arc;

    #[test]
    fn defaults() {
        let s = Settings::default();
        assert_eq!(s.theme_mode, ThemeMode::System);
        assert!(s.haptic_feedback && s.sound_enabled);
        assert!(s.focus_reminders && s.break_reminders);
        assert!(!s.daily_summary);
        assert_eq!(s.daily_summary_time, "20:00");
        assert!(!s.auto_start_breaks && !s.auto_start_work);
    }

    #[test]
    fn toggles_are_independent() {
        let mut store = SettingsStore::open(MemoryStore::new());
        assert!(!store.toggle_haptic_feedback());
        assert!(store.toggle_auto_start_breaks());
        let s = store.settings();
        assert!(!s.haptic_feedback);
        assert!(s.auto_start_breaks);
        assert!(s.sound_enabled);
        assert!(!s.auto_start_work);
        assert!(store.toggle_haptic_feedback());
    }

    #[test]
    fn persists_and_restores() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = SettingsStore::open(kv.clone());
        store.set_theme_mode(ThemeMode::Dark);
        store.toggle_daily_summary();
        store.set_daily_summary_time("07:30").unwrap();

        let restored = SettingsStore::open(kv);
        assert_eq!(restored.settings().theme_mode, ThemeMode::Dark);
        assert!(restored.settings().daily_summary);
        assert_eq!(restored.settings().daily_summary_time, "07:30");
    }

    #[test]
    fn rejects_malformed_time() {
        let mut store = SettingsStore::open(MemoryStore::new());
        for bad in ["7:30", "24:00", "12:60", "noon", "12:301", " 9:00", "09: 5", "+9:00", "09:+5"] {
            assert_eq!(
                store.set_daily_summary_time(bad),
                Err(ValidationError::InvalidTimeOfDay(bad.to_string()))
            );
        }
        assert_eq!(store.settings().daily_summary_time, "20:00");
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = SettingsStore::open(MemoryStore::new());
        store.set_theme_mode(ThemeMode::Light);
        store.toggle_sound_enabled();
        store.toggle_auto_start_work();
        store.reset_settings();
        assert_eq!(store.settings(), &Settings::default());
    }

    #[test]
    fn partial_blob_keeps_other_defaults() {
        let kv = MemoryStore::new();
        kv.set(SETTINGS_STORAGE_KEY, r#"{"themeMode":"light","soundEnabled":false}"#)
            .unwrap();
        let store = SettingsStore::open(kv);
        assert_eq!(store.settings().theme_mode, ThemeMode::Light);
        assert!(!store.settings().sound_enabled);
        assert!(store.settings().haptic_feedback);
    }

    #[test]
    fn toggle_names_parse() {
        assert_eq!("hapticFeedback".parse::<Toggle>(), Ok(Toggle::HapticFeedback));
        assert_eq!("auto-start-breaks".parse::<Toggle>(), Ok(Toggle::AutoStartBreaks));
        assert_eq!("daily_summary".parse::<Toggle>(), Ok(Toggle::DailySummary));
        assert!("volume".parse::<Toggle>().is_err());
        assert_eq!("DARK".parse::<ThemeMode>(), Ok(ThemeMode::Dark));
    }

    #[test]
    fn auto_start_follows_next_type() {
        let mut s = Settings::default();
        s.auto_start_breaks = true;
        assert!(s.should_auto_start(SessionType::Break));
        assert!(s.should_auto_start(SessionType::LongBreak));
        assert!(!s.should_auto_start(SessionType::Work));
    }

    #[test]
    fn invalid_stored_fields_fall_back_one_by_one() {
        let kv = MemoryStore::new();
        kv.set(
            SETTINGS_STORAGE_KEY,
            r#"{"themeMode":"purple","soundEnabled":false,"dailySummary":true,"dailySummaryTime":" 9:00"}"#,
        )
        .unwrap();
        let store = SettingsStore::open(kv);
        let s = store.settings();
        assert_eq!(s.theme_mode, ThemeMode::System);
        assert!(!s.sound_enabled);
        assert!(s.daily_summary);
        assert_eq!(s.daily_summary_time, "20:00");
        assert!(s.haptic_feedback);
    }
}
