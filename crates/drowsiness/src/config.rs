//! Monitor configuration

use crate::DrowsinessError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Prefix for environment overrides, e.g. `DROWSY_EAR_THRESHOLD=0.22`
pub const ENV_PREFIX: &str = "DROWSY";

/// Drowsiness monitor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// EAR below this counts as eyes closed
    pub ear_threshold: f64,

    /// MAR above this counts as yawning
    pub mar_threshold: f64,

    /// Closed-eye frames tolerated before a run becomes a micro-sleep
    pub drowsy_frame_count: u32,

    /// Composite score weights
    pub score_weights: ScoreWeights,

    /// Score boundaries between Alert / Warning / Drowsy
    pub status_thresholds: StatusThresholds,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            ear_threshold: 0.25,
            mar_threshold: 0.6,
            drowsy_frame_count: 15,
            score_weights: ScoreWeights::default(),
            status_thresholds: StatusThresholds::default(),
        }
    }
}

impl MonitorConfig {
    /// Create strict config (reacts earlier)
    pub fn strict() -> Self {
        Self {
            ear_threshold: 0.27,
            mar_threshold: 0.5,
            drowsy_frame_count: 10,
            ..Default::default()
        }
    }

    /// Create lenient config (fewer false alarms)
    pub fn lenient() -> Self {
        Self {
            ear_threshold: 0.22,
            mar_threshold: 0.7,
            drowsy_frame_count: 25,
            ..Default::default()
        }
    }

    /// Load defaults, then an optional TOML/JSON/YAML file, then
    /// `DROWSY_*` environment overrides (`__` separates nested keys).
    pub fn load(path: Option<&Path>) -> Result<Self, DrowsinessError> {
        let defaults = config::Config::try_from(&Self::default()).map_err(config_error)?;

        let mut builder = config::Config::builder().add_source(defaults);
        if let Some(path) = path {
            builder = builder.add_source(config::File::from(path));
        }

        let loaded: Self = builder
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(config_error)?
            .try_deserialize()
            .map_err(config_error)?;

        loaded.validate()?;
        Ok(loaded)
    }

    /// Check thresholds and weights for consistency
    pub fn validate(&self) -> Result<(), DrowsinessError> {
        if !(self.ear_threshold.is_finite() && self.ear_threshold > 0.0) {
            return Err(DrowsinessError::Config(format!(
                "ear_threshold must be positive, got {}",
                self.ear_threshold
            )));
        }
        if !(self.mar_threshold.is_finite() && self.mar_threshold > 0.0) {
            return Err(DrowsinessError::Config(format!(
                "mar_threshold must be positive, got {}",
                self.mar_threshold
            )));
        }
        if self.drowsy_frame_count == 0 {
            return Err(DrowsinessError::Config(
                "drowsy_frame_count must be at least 1".into(),
            ));
        }

        self.status_thresholds.validate()?;
        self.score_weights.validate()?;

        // A micro-sleep frame is always a closed-eye frame
        let floor = self.score_weights.eyes_closed + self.score_weights.micro_sleep;
        if floor <= f64::from(self.status_thresholds.drowsy) {
            return Err(DrowsinessError::Config(format!(
                "eyes_closed + micro_sleep weights ({}) must exceed the drowsy threshold ({})",
                floor, self.status_thresholds.drowsy
            )));
        }

        Ok(())
    }
}

fn config_error(e: config::ConfigError) -> DrowsinessError {
    DrowsinessError::Config(e.to_string())
}

/// Weights of the composite drowsiness score.
///
/// The score is the sum of the active terms, rounded and clamped to
/// `[0, 100]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoreWeights {
    /// Baseline while eyes are open
    pub eyes_open: f64,
    /// Eyes closed this frame (replaces the open baseline)
    pub eyes_closed: f64,
    pub yawning: f64,
    pub micro_sleep: f64,
    /// Multiplier on `100 - head_pose_score`
    pub head_pose_factor: f64,
    /// Session fatigue accrued per elapsed minute (0 disables)
    pub fatigue_per_minute: f64,
    /// Upper bound of the session fatigue term
    pub fatigue_cap: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            eyes_open: 5.0,
            eyes_closed: 25.0,
            yawning: 20.0,
            micro_sleep: 40.0,
            head_pose_factor: 0.2,
            fatigue_per_minute: 0.0,
            fatigue_cap: 20.0,
        }
    }
}

impl ScoreWeights {
    fn validate(&self) -> Result<(), DrowsinessError> {
        let named = [
            ("eyes_open", self.eyes_open),
            ("eyes_closed", self.eyes_closed),
            ("yawning", self.yawning),
            ("micro_sleep", self.micro_sleep),
            ("head_pose_factor", self.head_pose_factor),
            ("fatigue_per_minute", self.fatigue_per_minute),
            ("fatigue_cap", self.fatigue_cap),
        ];
        for (name, value) in named {
            if !(value.is_finite() && value >= 0.0) {
                return Err(DrowsinessError::Config(format!(
                    "score weight {} must be finite and non-negative, got {}",
                    name, value
                )));
            }
        }

        // Closing the eyes must never lower the score
        if self.eyes_closed < self.eyes_open {
            return Err(DrowsinessError::Config(format!(
                "eyes_closed weight ({}) must not be below eyes_open ({})",
                self.eyes_closed, self.eyes_open
            )));
        }
        Ok(())
    }

    /// Composite score for one frame's classified inputs
    pub fn score(
        &self,
        eyes_closed: bool,
        yawning: bool,
        micro_sleep: bool,
        head_pose_score: f64,
        elapsed_minutes: f64,
    ) -> u8 {
        let mut total = if eyes_closed {
            self.eyes_closed
        } else {
            self.eyes_open
        };
        if yawning {
            total += self.yawning;
        }
        if micro_sleep {
            total += self.micro_sleep;
        }
        total += (100.0 - head_pose_score.clamp(0.0, 100.0)) * self.head_pose_factor;
        total += (elapsed_minutes.max(0.0) * self.fatigue_per_minute).min(self.fatigue_cap);

        total.round().clamp(0.0, 100.0) as u8
    }
}

/// Status boundaries: `score > drowsy` is Drowsy, `score > warning` is
/// Warning, anything else is Alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusThresholds {
    pub warning: u8,
    pub drowsy: u8,
}

impl Default for StatusThresholds {
    fn default() -> Self {
        Self {
            warning: 35,
            drowsy: 60,
        }
    }
}

impl From<(u8, u8)> for StatusThresholds {
    fn from((warning, drowsy): (u8, u8)) -> Self {
        Self { warning, drowsy }
    }
}

impl StatusThresholds {
    /// Scores never exceed 100, so `drowsy` must stay below it
    fn validate(&self) -> Result<(), DrowsinessError> {
        if self.warning >= self.drowsy || self.drowsy >= 100 {
            return Err(DrowsinessError::Config(format!(
                "status thresholds must satisfy warning < drowsy < 100, got ({}, {})",
                self.warning, self.drowsy
            )));
        }
        Ok(())
    }
}
