use serde::{Deserialize, Serialize};

/// Which interval of the work/break cycle the timer is counting down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionType {
    Work,
    Break,
    LongBreak,
}

impl SessionType {
    /// Display label used by timer faces.
    pub fn label(self) -> &'static str {
        match self {
            SessionType::Work => "FOCUS",
            SessionType::Break => "SHORT BREAK",
            SessionType::LongBreak => "LONG BREAK",
        }
    }

    pub fn is_break(self) -> bool {
        !matches!(self, SessionType::Work)
    }
}

/// Named bundle of the three durations plus the long-break cadence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusPreset {
    pub id: String,
    pub name: String,
    /// Minutes.
    pub work_duration: u32,
    /// Minutes.
    pub break_duration: u32,
    /// Minutes.
    pub long_break_duration: u32,
    /// Every Nth completed work session is followed by a long break.
    pub sessions_before_long_break: u32,
}

pub const DEFAULT_PRESET_ID: &str = "pomodoro";

impl FocusPreset {
    /// The classic 25/5/15 Pomodoro with a long break every fourth session.
    pub fn pomodoro() -> Self {
        Self {
            id: DEFAULT_PRESET_ID.into(),
            name: "Pomodoro".into(),
            work_duration: 25,
            break_duration: 5,
            long_break_duration: 15,
            sessions_before_long_break: 4,
        }
    }

    /// Minutes for the given session type.
    pub fn duration_min(&self, session_type: SessionType) -> u32 {
        match session_type {
            SessionType::Work => self.work_duration,
            SessionType::Break => self.break_duration,
            SessionType::LongBreak => self.long_break_duration,
        }
    }

    /// Seconds for the given session type.
    ///
    /// Uses saturating arithmetic so oversized presets cannot overflow.
    pub fn duration_secs(&self, session_type: SessionType) -> u64 {
        u64::from(self.duration_min(session_type)).saturating_mul(60)
    }

    /// Whether the `completed`-th work session lands on a long-break boundary.
    ///
    /// A zero threshold never selects a long break.
    pub fn is_long_break_after(&self, completed: u64) -> bool {
        completed.checked_rem(u64::from(self.sessions_before_long_break)) == Some(0)
    }

    /// Break type that follows the `completed`-th work session.
    pub fn break_after(&self, completed: u64) -> SessionType {
        if self.is_long_break_after(completed) {
            SessionType::LongBreak
        } else {
            SessionType::Break
        }
    }

    /// Copy of this preset with a different work duration.
    pub fn with_work_duration(&self, minutes: u32) -> Self {
        Self {
            work_duration: minutes,
            ..self.clone()
        }
    }

    /// One-line summary, e.g. `25m focus · 5m break · 15m long break`.
    pub fn summary(&self) -> String {
        format!(
            "{}m focus · {}m break · {}m long break",
            self.work_duration, self.break_duration, self.long_break_duration
        )
    }
}

impl Default for FocusPreset {
    fn default() -> Self {
        Self::pomodoro()
    }
}

/// Presets shipped with the app. Custom presets are appended after these.
pub fn builtin_presets() -> Vec<FocusPreset> {
    vec![FocusPreset::pomodoro()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_preset_is_pomodoro() {
        let p = FocusPreset::default();
        assert_eq!(p.id, "pomodoro");
        assert_eq!(p.duration_secs(SessionType::Work), 1500);
        assert_eq!(p.duration_secs(SessionType::Break), 300);
        assert_eq!(p.duration_secs(SessionType::LongBreak), 900);
    }

    #[test]
    fn cadence_every_fourth() {
        let p = FocusPreset::pomodoro();
        let kinds: Vec<_> = (1..=8).map(|k| p.break_after(k)).collect();
        assert_eq!(kinds[3], SessionType::LongBreak);
        assert_eq!(kinds[7], SessionType::LongBreak);
        assert_eq!(kinds[0], SessionType::Break);
        assert_eq!(kinds[4], SessionType::Break);
    }

    #[test]
    fn zero_threshold_never_long_break() {
        let mut p = FocusPreset::pomodoro();
        p.sessions_before_long_break = 0;
        assert!(!p.is_long_break_after(0));
        assert!(!p.is_long_break_after(4));
    }

    #[test]
    fn serializes_camel_case() {
        let json = serde_json::to_value(FocusPreset::pomodoro()).unwrap();
        assert_eq!(json["workDuration"], 25);
        assert_eq!(json["sessionsBeforeLongBreak"], 4);
        assert_eq!(
            serde_json::to_value(SessionType::LongBreak).unwrap(),
            serde_json::json!("longBreak")
        );
    }
}
