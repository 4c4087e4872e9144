//! Drowsiness Detection Core
//!
//! Turns a per-frame stream of 68-point facial landmarks into a driver
//! drowsiness assessment:
//! - Eye aspect ratio (EAR), mouth aspect ratio (MAR), head pose score
//! - Blink, yawn, and micro-sleep event detection (edge-triggered)
//! - Composite drowsiness score and status category
//! - Alarm decision with hysteresis
//!
//! Landmark detection itself happens upstream; this crate only consumes
//! its output. All session state lives in a [`DrowsinessMonitor`], one per
//! driver session.

pub mod analysis;
pub mod config;
pub mod features;
pub mod landmarks;
pub mod monitor;
pub mod state;

pub use analysis::{Assessment, DriverStatus, DrowsinessEvent, NoDataVerdict, Verdict};
pub use config::{MonitorConfig, ScoreWeights, StatusThresholds};
pub use features::{FeatureExtractor, FeatureTriple, LandmarkLayout};
pub use landmarks::{Frame, LandmarkSet, Point, LANDMARK_COUNT};
pub use monitor::DrowsinessMonitor;
pub use state::{CounterSnapshot, SessionSummary, Timestamp};

use thiserror::Error;

/// Drowsiness core error types
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DrowsinessError {
    /// A reference distance used as a ratio denominator was zero, too
    /// small, or not finite. Recoverable per frame.
    #[error("Degenerate geometry: {measure} reference distance {reference} is unusable")]
    DegenerateGeometry {
        measure: &'static str,
        reference: f64,
    },

    /// A caller-supplied feature value outside its valid range
    #[error("Invalid feature: {feature} = {value} is out of range")]
    InvalidFeature { feature: &'static str, value: f64 },

    #[error("Expected 68 landmarks, got {0}")]
    InvalidLandmarkCount(usize),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl DrowsinessError {
    /// True for errors that only invalidate the current frame.
    pub fn is_frame_local(&self) -> bool {
        matches!(
            self,
            DrowsinessError::DegenerateGeometry { .. } | DrowsinessError::InvalidFeature { .. }
        )
    }
}
