//! Session state tracking

use serde::{Deserialize, Serialize, Serializer};
use std::time::Duration;

/// Caller-supplied monotonic timestamp (milliseconds)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms)
    }

    pub const fn as_millis(self) -> u64 {
        self.0
    }

    /// Time since `earlier`, zero if `earlier` is later
    pub fn saturating_since(self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

/// Point-in-time copy of the session counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CounterSnapshot {
    pub consecutive_closed_frames: u32,
    pub blink_count: u32,
    pub yawn_count: u32,
    pub micro_sleep_count: u32,
    pub alert_count: u32,
}

/// Session totals for persistence or display
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    #[serde(rename = "started_at_ms")]
    pub started_at: Option<Timestamp>,
    #[serde(rename = "duration_seconds", serialize_with = "rounded_secs")]
    pub duration: Duration,
    #[serde(rename = "total_blinks")]
    pub blink_count: u32,
    #[serde(rename = "total_yawns")]
    pub yawn_count: u32,
    #[serde(rename = "total_microsleeps")]
    pub micro_sleep_count: u32,
    #[serde(rename = "total_alerts")]
    pub alert_count: u32,
    /// Mean of `100 - score` over assessed frames (100 with none)
    pub avg_alertness: f64,
    pub assessed_frames: u64,
}

fn rounded_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(duration.as_secs_f64().round() as u64)
}

/// Mutable per-session state, owned by one monitor
#[derive(Debug, Clone, Default)]
pub(crate) struct SessionState {
    pub session_start: Option<Timestamp>,
    pub last_seen: Option<Timestamp>,
    pub consecutive_closed_frames: u32,
    pub was_eyes_closed: bool,
    pub was_yawning: bool,
    pub blink_count: u32,
    pub yawn_count: u32,
    pub micro_sleep_count: u32,
    pub alert_count: u32,
    pub alarm_active: bool,
    pub assessed_frames: u64,
    pub alertness_total: u64,
}

impl SessionState {
    pub fn starting_at(start: Timestamp) -> Self {
        Self {
            session_start: Some(start),
            last_seen: Some(start),
            ..Default::default()
        }
    }

    /// Advance the session clock, anchoring the start on first use.
    /// Returns the elapsed session time at `now`.
    pub fn observe(&mut self, now: Timestamp) -> Duration {
        let start = *self.session_start.get_or_insert(now);
        self.last_seen = Some(self.last_seen.map_or(now, |seen| seen.max(now)));
        now.saturating_since(start)
    }

    /// Elapsed session time at `now` without touching state
    pub fn elapsed_at(&self, now: Timestamp) -> Duration {
        self.session_start
            .map_or(Duration::ZERO, |start| now.saturating_since(start))
    }

    pub fn blink_rate_per_min(&self, elapsed: Duration) -> f64 {
        let minutes = elapsed.as_secs_f64() / 60.0;
        if minutes > 0.0 {
            f64::from(self.blink_count) / minutes
        } else {
            0.0
        }
    }

    pub fn record_alertness(&mut self, alertness: u8) {
        self.assessed_frames += 1;
        self.alertness_total += u64::from(alertness);
    }

    pub fn snapshot(&self) -> CounterSnapshot {
        CounterSnapshot {
            consecutive_closed_frames: self.consecutive_closed_frames,
            blink_count: self.blink_count,
            yawn_count: self.yawn_count,
            micro_sleep_count: self.micro_sleep_count,
            alert_count: self.alert_count,
        }
    }

    pub fn summary(&self) -> SessionSummary {
        let duration = self
            .last_seen
            .map_or(Duration::ZERO, |seen| self.elapsed_at(seen));
        let avg_alertness = if self.assessed_frames == 0 {
            100.0
        } else {
            self.alertness_total as f64 / self.assessed_frames as f64
        };

        SessionSummary {
            started_at: self.session_start,
            duration,
            blink_count: self.blink_count,
            yawn_count: self.yawn_count,
            micro_sleep_count: self.micro_sleep_count,
            alert_count: self.alert_count,
            avg_alertness,
            assessed_frames: self.assessed_frames,
        }
    }
}
