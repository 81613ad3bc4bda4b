//! Session history records.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionKind {
    Pomodoro,
    Custom,
}

impl SessionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SessionKind::Pomodoro => "pomodoro",
            SessionKind::Custom => "custom",
        }
    }
}

/// A completed work interval.
///
/// Only work sessions are recorded; breaks never appear in history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FocusSession {
    pub id: String,
    /// Milliseconds since the Unix epoch.
    pub start_time: i64,
    /// Milliseconds since the Unix epoch; `None` while still open.
    pub end_time: Option<i64>,
    /// Seconds.
    pub duration: u64,
    #[serde(rename = "type")]
    pub kind: SessionKind,
    pub completed: bool,
}

impl FocusSession {
    /// Record a pomodoro that ended at `end_ms` after running `duration_secs`.
    pub fn completed_pomodoro(duration_secs: u64, end_ms: i64) -> Self {
        let span_ms = i64::try_from(duration_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
        Self {
            id: Uuid::new_v4().to_string(),
            start_time: end_ms.saturating_sub(span_ms),
            end_time: Some(end_ms),
            duration: duration_secs,
            kind: SessionKind::Pomodoro,
            completed: true,
        }
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.start_time).single()
    }

    pub fn ended_at(&self) -> Option<DateTime<Utc>> {
        self.end_time
            .and_then(|ms| Utc.timestamp_millis_opt(ms).single())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_pomodoro_spans_its_duration() {
        let s = FocusSession::completed_pomodoro(1500, 10_000_000);
        assert_eq!(s.end_time, Some(10_000_000));
        assert_eq!(s.start_time, 10_000_000 - 1_500_000);
        assert_eq!(s.kind, SessionKind::Pomodoro);
        assert!(s.completed);
    }

    #[test]
    fn ids_are_unique() {
        let a = FocusSession::completed_pomodoro(60, 0);
        let b = FocusSession::completed_pomodoro(60, 0);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn json_shape_matches_history_blob() {
        let s = FocusSession::completed_pomodoro(60, 120_000);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "pomodoro");
        assert_eq!(json["startTime"], 60_000);
        assert_eq!(json["endTime"], 120_000);
        assert_eq!(json["duration"], 60);

        let open: FocusSession = serde_json::from_str(
            r#"{"id":"1","startTime":0,"endTime":null,"duration":0,"type":"custom","completed":false}"#,
        )
        .unwrap();
        assert_eq!(open.end_time, None);
        assert_eq!(open.kind, SessionKind::Custom);
    }

    #[test]
    fn timestamps_convert_to_datetimes() {
        let s = FocusSession::completed_pomodoro(60, 1_700_000_060_000);
        assert_eq!(s.started_at().map(|t| t.timestamp()), Some(1_700_000_000));
        assert_eq!(s.ended_at().map(|t| t.timestamp()), Some(1_700_000_060));

        let open = FocusSession { end_time: None, ..s };
        assert!(open.ended_at().is_none());
    }
}
