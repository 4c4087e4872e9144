//! Per-frame verdicts and events

use crate::config::StatusThresholds;
use crate::state::CounterSnapshot;
use serde::{Deserialize, Serialize};

/// Driver status category
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverStatus {
    #[default]
    Alert,
    Warning,
    Drowsy,
}

impl DriverStatus {
    /// Categorize a composite score
    pub fn from_score(score: u8, thresholds: &StatusThresholds) -> Self {
        if score > thresholds.drowsy {
            DriverStatus::Drowsy
        } else if score > thresholds.warning {
            DriverStatus::Warning
        } else {
            DriverStatus::Alert
        }
    }
}

/// Discrete events, at most one of each kind per frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrowsinessEvent {
    /// Eyes reopened after at least one closed frame
    Blink,

    /// Mouth crossed the yawn threshold
    YawnStarted,

    /// Closed-eye run just exceeded the drowsy frame count
    MicroSleepStarted,
}

/// Full assessment of a frame with a face
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    pub ear: f64,
    pub mar: f64,
    pub head_pose_score: f64,
    pub eyes_closed: bool,
    pub yawning: bool,
    pub micro_sleep: bool,
    /// Composite score, 0-100
    pub drowsiness_score: u8,
    pub status: DriverStatus,
    pub alarm: bool,
    pub blink_rate_per_min: f64,
    pub session_elapsed_secs: f64,
    pub counters: CounterSnapshot,
}

impl Assessment {
    /// Inverse of the drowsiness score
    pub fn alertness(&self) -> u8 {
        100 - self.drowsiness_score.min(100)
    }
}

/// Frame without a face: nothing is measured, state is carried over
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataVerdict {
    pub alarm: bool,
    pub blink_rate_per_min: f64,
    pub session_elapsed_secs: f64,
    pub counters: CounterSnapshot,
}

/// Per-frame output of the monitor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Verdict {
    Assessed(Assessment),
    NoData(NoDataVerdict),
}

impl Verdict {
    pub fn assessment(&self) -> Option<&Assessment> {
        match self {
            Verdict::Assessed(a) => Some(a),
            Verdict::NoData(_) => None,
        }
    }

    pub fn is_assessed(&self) -> bool {
        matches!(self, Verdict::Assessed(_))
    }

    pub fn alarm(&self) -> bool {
        match self {
            Verdict::Assessed(a) => a.alarm,
            Verdict::NoData(n) => n.alarm,
        }
    }

    /// Status, if the frame was assessed
    pub fn status(&self) -> Option<DriverStatus> {
        self.assessment().map(|a| a.status)
    }

    pub fn drowsiness_score(&self) -> Option<u8> {
        self.assessment().map(|a| a.drowsiness_score)
    }

    pub fn counters(&self) -> &CounterSnapshot {
        match self {
            Verdict::Assessed(a) => &a.counters,
            Verdict::NoData(n) => &n.counters,
        }
    }

    pub fn blink_rate_per_min(&self) -> f64 {
        match self {
            Verdict::Assessed(a) => a.blink_rate_per_min,
            Verdict::NoData(n) => n.blink_rate_per_min,
        }
    }
}
