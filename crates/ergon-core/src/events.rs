use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{FocusSession, SessionType, TimerState};

/// Every state change of the focus engine produces an Event.
/// Subscribers of a [`FocusStore`](crate::FocusStore) receive them in order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    TimerStarted {
        session_type: SessionType,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerReset {
        at: DateTime<Utc>,
    },
    /// Manual jump to another session type; never counts as a completion.
    Skipped {
        from: SessionType,
        to: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// One-second countdown step.
    Ticked {
        session_type: SessionType,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reached zero. `session` is set only for work sessions.
    SessionCompleted {
        finished: SessionType,
        next: SessionType,
        session: Option<FocusSession>,
        completed_sessions: u64,
        at: DateTime<Utc>,
    },
    PresetChanged {
        preset_id: String,
        at: DateTime<Utc>,
    },
    PresetAdded {
        preset_id: String,
        at: DateTime<Utc>,
    },
    HistoryCleared {
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        session_type: SessionType,
        remaining_secs: u64,
        total_secs: u64,
        progress: f64,
        completed_sessions: u64,
        todays_total_focus_time: u64,
        preset_id: String,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Whether this change may have altered the persisted subset
    /// (preset, custom presets, history, focus total, cadence counter).
    pub fn touches_persisted(&self) -> bool {
        match self {
            Event::Ticked { session_type, .. } => *session_type == SessionType::Work,
            Event::SessionCompleted { session, .. } => session.is_some(),
            Event::PresetChanged { .. } | Event::PresetAdded { .. } | Event::HistoryCleared { .. } => {
                true
            }
            _ => false,
        }
    }

    pub fn at(&self) -> DateTime<Utc> {
        match self {
            Event::TimerStarted { at, .. }
            | Event::TimerPaused { at, .. }
            | Event::TimerResumed { at, .. }
            | Event::TimerReset { at }
            | Event::Skipped { at, .. }
            | Event::Ticked { at, .. }
            | Event::SessionCompleted { at, .. }
            | Event::PresetChanged { at, .. }
            | Event::PresetAdded { at, .. }
            | Event::HistoryCleared { at }
            | Event::StateSnapshot { at, .. } => *at,
        }
    }
}
