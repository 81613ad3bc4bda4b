//! Statistics derived from the session history.
//!
//! Everything here is computed from `sessions`; the engine's running
//! `todays_total_focus_time` counter is reported alongside but never used
//! as an input, since it has no daily rollover.

use chrono::{DateTime, Duration, NaiveTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::timer::{FocusEngine, FocusSession};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FocusStats {
    pub today_sessions: usize,
    /// Seconds, summed from today's sessions.
    pub today_focus_secs: u64,
    pub week_sessions: usize,
    pub week_focus_secs: u64,
    /// Week total spread over seven days, rounded.
    pub daily_average_secs: u64,
    pub total_sessions: usize,
    pub total_focus_secs: u64,
    /// The engine's accumulated focus counter.
    pub todays_total_focus_time: u64,
}

impl FocusStats {
    /// Aggregate `sessions` relative to `now` in its own time zone.
    ///
    /// "Today" starts at local midnight; "this week" is the trailing
    /// seven days.
    pub fn compute<Tz: TimeZone>(sessions: &[FocusSession], now: &DateTime<Tz>) -> Self {
        let today_start = start_of_day_ms(now);
        let week_start = (now.clone() - Duration::days(7)).timestamp_millis();

        let mut stats = FocusStats {
            total_sessions: sessions.len(),
            ..FocusStats::default()
        };
        for session in sessions {
            stats.total_focus_secs = stats.total_focus_secs.saturating_add(session.duration);
            if session.start_time >= today_start {
                stats.today_sessions += 1;
                stats.today_focus_secs = stats.today_focus_secs.saturating_add(session.duration);
            }
            if session.start_time >= week_start {
                stats.week_sessions += 1;
                stats.week_focus_secs = stats.week_focus_secs.saturating_add(session.duration);
            }
        }
        if stats.week_sessions > 0 {
            stats.daily_average_secs = (stats.week_focus_secs as f64 / 7.0).round() as u64;
        }
        stats
    }

    pub fn from_engine<Tz: TimeZone>(engine: &FocusEngine, now: &DateTime<Tz>) -> Self {
        Self {
            todays_total_focus_time: engine.todays_total_focus_time(),
            ..Self::compute(engine.sessions(), now)
        }
    }
}

/// Local midnight of `now`'s day, in epoch milliseconds.
pub fn start_of_day_ms<Tz: TimeZone>(now: &DateTime<Tz>) -> i64 {
    let midnight = now.date_naive().and_time(NaiveTime::from_hms_opt(0, 0, 0).unwrap_or_default());
    now.timezone()
        .from_local_datetime(&midnight)
        .earliest()
        .map(|dt| dt.timestamp_millis())
        .unwrap_or_else(|| midnight.and_utc().timestamp_millis())
}

/// Sessions that started today, in chronological order.
pub fn todays_sessions<'a, Tz: TimeZone>(
    sessions: &'a [FocusSession],
    now: &DateTime<Tz>,
) -> Vec<&'a FocusSession> {
    let today_start = start_of_day_ms(now);
    sessions
        .iter()
        .filter(|s| s.start_time >= today_start)
        .collect()
}

/// Up to `max` most recent sessions, newest first.
pub fn recent(sessions: &[FocusSession], max: usize) -> Vec<&FocusSession> {
    sessions.iter().rev().take(max).collect()
}

/// `1h 5m` above an hour, `25m` below.
pub fn format_duration(secs: u64) -> String {
    let hours = secs / 3600;
    let mins = (secs % 3600) / 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}

/// `MM:SS` countdown face.
pub fn format_clock(secs: u64) -> String {
    format!("{:02}:{:02}", secs / 60, secs % 60)
}
