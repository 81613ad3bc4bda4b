//! Focus engine implementation.
//!
//! The engine is a tick-driven state machine. It does not use internal
//! threads or read the clock on its own schedule - the caller invokes
//! `tick()` once per second while the timer is running (see
//! [`TickDriver`](super::TickDriver)).
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running <-> Paused
//! Running -> Completed            (countdown reached zero)
//! Completed -> Running            (start the next session)
//! any -> Idle                     (reset, skip, preset change)
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FocusEngine::default();
//! engine.start_timer();
//! // Once per second:
//! engine.tick(); // Some(Event::SessionCompleted { .. }) when the countdown ends
//! ```
//!
//! Every command returns `None` when it did not change anything, and
//! `Some(Event)` describing the change otherwise.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::preset::{builtin_presets, FocusPreset, SessionType};
use super::session::FocusSession;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
    /// Countdown finished; waits for `start_timer()` to begin the next session.
    Completed,
}

/// The part of the engine that survives a restart.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedFocus {
    pub active_preset: FocusPreset,
    pub custom_presets: Vec<FocusPreset>,
    pub sessions: Vec<FocusSession>,
    pub todays_total_focus_time: u64,
    pub completed_sessions: u64,
}

/// Core focus timer engine.
#[derive(Debug, Clone, PartialEq)]
pub struct FocusEngine {
    timer_state: TimerState,
    /// Seconds left in the current session.
    time_remaining: u64,
    current_session_type: SessionType,
    /// Completed work sessions; drives the long-break cadence.
    completed_sessions: u64,
    active_preset: FocusPreset,
    custom_presets: Vec<FocusPreset>,
    sessions: Vec<FocusSession>,
    /// Seconds ticked through work sessions. Not derived from `sessions`.
    todays_total_focus_time: u64,
}

impl FocusEngine {
    /// Create an idle engine ready to run a work session of `preset`.
    pub fn new(preset: FocusPreset) -> Self {
        Self::from_persisted(PersistedFocus {
            active_preset: preset,
            ..PersistedFocus::default()
        })
    }

    /// Rebuild an engine from a persisted snapshot.
    ///
    /// Transient state starts fresh: idle, work session, full work duration.
    pub fn from_persisted(persisted: PersistedFocus) -> Self {
        let time_remaining = persisted.active_preset.duration_secs(SessionType::Work);
        Self {
            timer_state: TimerState::Idle,
            time_remaining,
            current_session_type: SessionType::Work,
            completed_sessions: persisted.completed_sessions,
            active_preset: persisted.active_preset,
            custom_presets: persisted.custom_presets,
            sessions: persisted.sessions,
            todays_total_focus_time: persisted.todays_total_focus_time,
        }
    }

    /// Snapshot of the fields that survive a restart.
    pub fn persisted(&self) -> PersistedFocus {
        PersistedFocus {
            active_preset: self.active_preset.clone(),
            custom_presets: self.custom_presets.clone(),
            sessions: self.sessions.clone(),
            todays_total_focus_time: self.todays_total_focus_time,
            completed_sessions: self.completed_sessions,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn timer_state(&self) -> TimerState {
        self.timer_state
    }

    pub fn is_running(&self) -> bool {
        self.timer_state == TimerState::Running
    }

    pub fn time_remaining(&self) -> u64 {
        self.time_remaining
    }

    pub fn current_session_type(&self) -> SessionType {
        self.current_session_type
    }

    pub fn completed_sessions(&self) -> u64 {
        self.completed_sessions
    }

    pub fn active_preset(&self) -> &FocusPreset {
        &self.active_preset
    }

    pub fn custom_presets(&self) -> &[FocusPreset] {
        &self.custom_presets
    }

    pub fn sessions(&self) -> &[FocusSession] {
        &self.sessions
    }

    pub fn todays_total_focus_time(&self) -> u64 {
        self.todays_total_focus_time
    }

    /// Nominal length in seconds of the current session type.
    pub fn total_secs(&self) -> u64 {
        self.active_preset.duration_secs(self.current_session_type)
    }

    /// 0.0 .. 1.0 progress within the current session.
    pub fn progress(&self) -> f64 {
        let total = self.total_secs();
        if total == 0 {
            return 0.0;
        }
        (1.0 - (self.time_remaining as f64 / total as f64)).clamp(0.0, 1.0)
    }

    /// Built-in presets followed by custom ones, in insertion order.
    pub fn all_presets(&self) -> Vec<FocusPreset> {
        let mut all = builtin_presets();
        all.extend(self.custom_presets.iter().cloned());
        all
    }

    /// First preset with the given id, built-ins first.
    pub fn find_preset(&self, id: &str) -> Option<FocusPreset> {
        self.all_presets().into_iter().find(|p| p.id == id)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.timer_state,
            session_type: self.current_session_type,
            remaining_secs: self.time_remaining,
            total_secs: self.total_secs(),
            progress: self.progress(),
            completed_sessions: self.completed_sessions,
            todays_total_focus_time: self.todays_total_focus_time,
            preset_id: self.active_preset.id.clone(),
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Begin the current session. Only acts from `Idle` or `Completed`.
    pub fn start_timer(&mut self) -> Option<Event> {
        match self.timer_state {
            TimerState::Idle | TimerState::Completed => {
                self.time_remaining = self.total_secs();
                self.timer_state = TimerState::Running;
                tracing::debug!(
                    session_type = ?self.current_session_type,
                    duration_secs = self.time_remaining,
                    "timer started"
                );
                Some(Event::TimerStarted {
                    session_type: self.current_session_type,
                    duration_secs: self.time_remaining,
                    at: Utc::now(),
                })
            }
            TimerState::Running | TimerState::Paused => None,
        }
    }

    pub fn pause_timer(&mut self) -> Option<Event> {
        if self.timer_state != TimerState::Running {
            return None;
        }
        self.timer_state = TimerState::Paused;
        Some(Event::TimerPaused {
            remaining_secs: self.time_remaining,
            at: Utc::now(),
        })
    }

    pub fn resume_timer(&mut self) -> Option<Event> {
        if self.timer_state != TimerState::Paused {
            return None;
        }
        self.timer_state = TimerState::Running;
        Some(Event::TimerResumed {
            remaining_secs: self.time_remaining,
            at: Utc::now(),
        })
    }

    /// Back to an idle work session from any state.
    pub fn reset_timer(&mut self) -> Option<Event> {
        self.enter_idle(SessionType::Work);
        Some(Event::TimerReset { at: Utc::now() })
    }

    /// Jump to the break that the next completion would earn.
    ///
    /// Peeks at `completed_sessions + 1` without incrementing it, so a skip
    /// never consumes a cadence slot.
    pub fn skip_to_break(&mut self) -> Option<Event> {
        let to = self
            .active_preset
            .break_after(self.completed_sessions.saturating_add(1));
        Some(self.skip_to(to))
    }

    pub fn skip_to_work(&mut self) -> Option<Event> {
        Some(self.skip_to(SessionType::Work))
    }

    /// Call once per second. No-op unless running.
    pub fn tick(&mut self) -> Option<Event> {
        self.tick_at(Utc::now())
    }

    /// `tick()` with an explicit wall-clock time for the completion record.
    pub fn tick_at(&mut self, now: DateTime<Utc>) -> Option<Event> {
        if self.timer_state != TimerState::Running {
            return None;
        }
        if self.time_remaining <= 1 {
            return Some(self.complete_session(now));
        }
        self.time_remaining -= 1;
        if self.current_session_type == SessionType::Work {
            self.todays_total_focus_time = self.todays_total_focus_time.saturating_add(1);
        }
        Some(Event::Ticked {
            session_type: self.current_session_type,
            remaining_secs: self.time_remaining,
            at: now,
        })
    }

    pub fn set_active_preset(&mut self, preset: FocusPreset) -> Option<Event> {
        let preset_id = preset.id.clone();
        self.active_preset = preset;
        self.enter_idle(SessionType::Work);
        Some(Event::PresetChanged {
            preset_id,
            at: Utc::now(),
        })
    }

    /// Append a user-defined preset. Ids are not checked for uniqueness.
    pub fn add_custom_preset(&mut self, preset: FocusPreset) -> Option<Event> {
        let preset_id = preset.id.clone();
        self.custom_presets.push(preset);
        Some(Event::PresetAdded {
            preset_id,
            at: Utc::now(),
        })
    }

    /// Drop the history and the focus total.
    ///
    /// The cadence counter and the timer state are left as they are.
    pub fn clear_history(&mut self) -> Option<Event> {
        self.sessions.clear();
        self.todays_total_focus_time = 0;
        Some(Event::HistoryCleared { at: Utc::now() })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn enter_idle(&mut self, session_type: SessionType) {
        self.timer_state = TimerState::Idle;
        self.current_session_type = session_type;
        self.time_remaining = self.active_preset.duration_secs(session_type);
    }

    fn skip_to(&mut self, to: SessionType) -> Event {
        let from = self.current_session_type;
        self.enter_idle(to);
        tracing::debug!(?from, ?to, "skipped");
        Event::Skipped {
            from,
            to,
            remaining_secs: self.time_remaining,
            at: Utc::now(),
        }
    }

    fn complete_session(&mut self, now: DateTime<Utc>) -> Event {
        let finished = self.current_session_type;
        let (session, next) = match finished {
            SessionType::Work => {
                let duration = self.active_preset.duration_secs(SessionType::Work);
                let record = FocusSession::completed_pomodoro(duration, now.timestamp_millis());
                self.sessions.push(record.clone());
                self.completed_sessions = self.completed_sessions.saturating_add(1);
                (
                    Some(record),
                    self.active_preset.break_after(self.completed_sessions),
                )
            }
            SessionType::Break | SessionType::LongBreak => (None, SessionType::Work),
        };

        self.current_session_type = next;
        self.time_remaining = self.active_preset.duration_secs(next);
        self.timer_state = TimerState::Completed;
        tracing::debug!(
            ?finished,
            ?next,
            completed_sessions = self.completed_sessions,
            "session completed"
        );

        Event::SessionCompleted {
            finished,
            next,
            session,
            completed_sessions: self.completed_sessions,
            at: now,
        }
    }
}

impl Default for FocusEngine {
    fn default() -> Self {
        Self::new(FocusPreset::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn short_preset() -> FocusPreset {
        FocusPreset {
            id: "short".into(),
            name: "Short".into(),
            work_duration: 1,
            break_duration: 1,
            long_break_duration: 2,
            sessions_before_long_break: 2,
        }
    }

    /// Tick until the running session ends; returns the number of ticks.
    fn run_out(engine: &mut FocusEngine) -> u64 {
        let mut ticks = 0;
        while engine.is_running() {
            engine.tick();
            ticks += 1;
        }
        ticks
    }

    #[test]
    fn start_pause_resume() {
        let mut engine = FocusEngine::default();
        assert_eq!(engine.timer_state(), TimerState::Idle);

        assert!(engine.start_timer().is_some());
        assert_eq!(engine.timer_state(), TimerState::Running);

        assert!(engine.pause_timer().is_some());
        assert_eq!(engine.timer_state(), TimerState::Paused);

        assert!(engine.resume_timer().is_some());
        assert_eq!(engine.timer_state(), TimerState::Running);
    }

    #[test]
    fn start_is_guarded() {
        let mut engine = FocusEngine::default();
        assert!(engine.start_timer().is_some());
        engine.tick();
        let before = engine.clone();
        assert!(engine.start_timer().is_none());
        assert_eq!(engine, before);

        engine.pause_timer();
        assert!(engine.start_timer().is_none());
        assert_eq!(engine.timer_state(), TimerState::Paused);
    }

    #[test]
    fn stray_pause_and_resume_are_ignored() {
        let mut engine = FocusEngine::default();
        assert!(engine.pause_timer().is_none());
        assert!(engine.resume_timer().is_none());
        assert_eq!(engine.timer_state(), TimerState::Idle);
    }

    #[test]
    fn tick_counts_down_and_accumulates_focus() {
        let mut engine = FocusEngine::default();
        engine.start_timer();
        for _ in 0..10 {
            engine.tick();
        }
        assert_eq!(engine.time_remaining(), 1490);
        assert_eq!(engine.todays_total_focus_time(), 10);
    }

    #[test]
    fn tick_ignored_unless_running() {
        let mut engine = FocusEngine::default();
        assert!(engine.tick().is_none());
        engine.start_timer();
        engine.tick();
        engine.pause_timer();
        assert!(engine.tick().is_none());
        assert_eq!(engine.time_remaining(), 1499);
        assert_eq!(engine.todays_total_focus_time(), 1);
    }

    #[test]
    fn default_pomodoro_completes_after_1500_ticks() {
        let mut engine = FocusEngine::default();
        engine.start_timer();
        assert_eq!(engine.time_remaining(), 1500);

        for _ in 0..1499 {
            assert!(matches!(engine.tick(), Some(Event::Ticked { .. })));
        }
        assert!(engine.sessions().is_empty());

        let ev = engine.tick();
        assert!(matches!(ev, Some(Event::SessionCompleted { .. })));
        assert_eq!(engine.sessions().len(), 1);
        assert_eq!(engine.sessions()[0].duration, 1500);
        assert_eq!(engine.completed_sessions(), 1);
        assert_eq!(engine.current_session_type(), SessionType::Break);
        assert_eq!(engine.time_remaining(), 300);
        assert_eq!(engine.timer_state(), TimerState::Completed);
        // The completing tick does not count as a focus second.
        assert_eq!(engine.todays_total_focus_time(), 1499);
    }

    #[test]
    fn completion_record_spans_work_duration() {
        let mut engine = FocusEngine::new(short_preset());
        engine.start_timer();
        let now = Utc::now();
        for _ in 0..59 {
            engine.tick_at(now);
        }
        engine.tick_at(now);
        let s = &engine.sessions()[0];
        assert_eq!(s.end_time, Some(now.timestamp_millis()));
        assert_eq!(s.start_time, now.timestamp_millis() - 60_000);
        assert!(s.completed);
    }

    #[test]
    fn clear_history_keeps_counter_and_state() {
        let mut engine = FocusEngine::default();
        engine.start_timer();
        run_out(&mut engine);

        engine.clear_history();
        assert!(engine.sessions().is_empty());
        assert_eq!(engine.todays_total_focus_time(), 0);
        assert_eq!(engine.completed_sessions(), 1);
        assert_eq!(engine.timer_state(), TimerState::Completed);
    }

    #[test]
    fn break_completion_returns_to_work_without_record() {
        let mut engine = FocusEngine::new(short_preset());
        engine.start_timer();
        run_out(&mut engine);
        assert_eq!(engine.current_session_type(), SessionType::Break);

        assert!(engine.start_timer().is_some());
        assert_eq!(engine.time_remaining(), 60);
        let ticks = run_out(&mut engine);
        assert_eq!(ticks, 60);
        assert_eq!(engine.sessions().len(), 1);
        assert_eq!(engine.current_session_type(), SessionType::Work);
        assert_eq!(engine.time_remaining(), 60);
        assert_eq!(engine.timer_state(), TimerState::Completed);
        // Break ticks never count toward focus time.
        assert_eq!(engine.todays_total_focus_time(), 59);
    }

    #[test]
    fn long_break_every_nth_completion() {
        let mut engine = FocusEngine::new(short_preset());
        let mut breaks = Vec::new();
        for _ in 0..4 {
            engine.start_timer();
            run_out(&mut engine);
            breaks.push(engine.current_session_type());
            engine.skip_to_work();
        }
        assert_eq!(
            breaks,
            vec![
                SessionType::Break,
                SessionType::LongBreak,
                SessionType::Break,
                SessionType::LongBreak
            ]
        );
        assert_eq!(engine.time_remaining(), 60);
    }

    #[test]
    fn skip_to_break_peeks_without_counting() {
        let mut engine = FocusEngine::new(short_preset());
        engine.skip_to_break();
        assert_eq!(engine.current_session_type(), SessionType::Break);
        assert_eq!(engine.completed_sessions(), 0);

        engine.start_timer();
        engine.skip_to_work();
        engine.start_timer();
        run_out(&mut engine);
        assert_eq!(engine.completed_sessions(), 1);

        engine.skip_to_work();
        engine.skip_to_break();
        assert_eq!(engine.current_session_type(), SessionType::LongBreak);
        assert_eq!(engine.time_remaining(), 120);
        assert_eq!(engine.timer_state(), TimerState::Idle);
        assert_eq!(engine.completed_sessions(), 1);
        assert_eq!(engine.sessions().len(), 1);
    }

    #[test]
    fn reset_goes_back_to_idle_work() {
        let mut engine = FocusEngine::default();
        engine.skip_to_break();
        engine.start_timer();
        engine.tick();
        engine.reset_timer();
        assert_eq!(engine.timer_state(), TimerState::Idle);
        assert_eq!(engine.current_session_type(), SessionType::Work);
        assert_eq!(engine.time_remaining(), 1500);
        assert!(engine.sessions().is_empty());
    }

    #[test]
    fn set_active_preset_forces_idle_work() {
        let mut engine = FocusEngine::default();
        engine.start_timer();
        engine.tick();
        engine.set_active_preset(short_preset());
        assert_eq!(engine.active_preset().id, "short");
        assert_eq!(engine.timer_state(), TimerState::Idle);
        assert_eq!(engine.current_session_type(), SessionType::Work);
        assert_eq!(engine.time_remaining(), 60);
    }

    #[test]
    fn custom_presets_allow_duplicate_ids() {
        let mut engine = FocusEngine::default();
        engine.add_custom_preset(short_preset());
        engine.add_custom_preset(short_preset());
        assert_eq!(engine.custom_presets().len(), 2);
        assert_eq!(engine.all_presets().len(), 3);
        assert_eq!(engine.find_preset("short"), Some(short_preset()));
        assert!(engine.find_preset("missing").is_none());
    }

    #[test]
    fn zero_duration_completes_on_first_tick() {
        let mut preset = short_preset();
        preset.work_duration = 0;
        let mut engine = FocusEngine::new(preset);
        engine.start_timer();
        assert_eq!(engine.time_remaining(), 0);
        assert!(matches!(engine.tick(), Some(Event::SessionCompleted { .. })));
        assert_eq!(engine.sessions()[0].duration, 0);
    }

    #[test]
    fn from_persisted_resets_transient_state() {
        let mut engine = FocusEngine::new(short_preset());
        engine.start_timer();
        run_out(&mut engine);
        engine.start_timer();
        engine.tick();

        let restored = FocusEngine::from_persisted(engine.persisted());
        assert_eq!(restored.persisted(), engine.persisted());
        assert_eq!(restored.timer_state(), TimerState::Idle);
        assert_eq!(restored.current_session_type(), SessionType::Work);
        assert_eq!(restored.time_remaining(), 60);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = FocusEngine::default();
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_secs,
                total_secs,
                progress,
                ..
            } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(remaining_secs, 1500);
                assert_eq!(total_secs, 1500);
                assert_eq!(progress, 0.0);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
