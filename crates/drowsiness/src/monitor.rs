//! Drowsiness state machine

use crate::analysis::{Assessment, DriverStatus, DrowsinessEvent, NoDataVerdict, Verdict};
use crate::config::MonitorConfig;
use crate::features::{FeatureExtractor, FeatureTriple};
use crate::landmarks::Frame;
use crate::state::{CounterSnapshot, SessionState, SessionSummary, Timestamp};
use crate::DrowsinessError;
use tracing::{debug, info, warn};

/// Drowsiness monitor for a single driver session.
///
/// Frames must be fed sequentially in arrival order. Independent sessions
/// each get their own monitor; nothing is shared between instances.
#[derive(Debug, Clone)]
pub struct DrowsinessMonitor {
    config: MonitorConfig,
    extractor: FeatureExtractor,
    state: SessionState,
}

impl DrowsinessMonitor {
    /// Create a monitor; the session starts at the first processed frame
    pub fn new(config: MonitorConfig) -> Result<Self, DrowsinessError> {
        config.validate()?;
        info!("Creating drowsiness monitor with config: {:?}", config);
        Ok(Self {
            config,
            extractor: FeatureExtractor::default(),
            state: SessionState::default(),
        })
    }

    /// Create a monitor whose session starts at `start`
    pub fn starting_at(config: MonitorConfig, start: Timestamp) -> Result<Self, DrowsinessError> {
        let mut monitor = Self::new(config)?;
        monitor.state = SessionState::starting_at(start);
        Ok(monitor)
    }

    /// Use a non-default landmark layout
    pub fn with_extractor(mut self, extractor: FeatureExtractor) -> Self {
        self.extractor = extractor;
        self
    }

    pub fn alarm_active(&self) -> bool {
        self.state.alarm_active
    }

    pub fn counters(&self) -> CounterSnapshot {
        self.state.snapshot()
    }

    /// Session totals so far
    pub fn summary(&self) -> SessionSummary {
        self.state.summary()
    }

    /// Discard the session (detection stopped); the next frame starts a new one
    pub fn reset(&mut self) {
        info!("Resetting drowsiness session");
        self.state = SessionState::default();
    }

    /// Discard the session and start a new one at `start`
    pub fn reset_at(&mut self, start: Timestamp) {
        info!("Resetting drowsiness session at {} ms", start.as_millis());
        self.state = SessionState::starting_at(start);
    }

    /// Process one landmark frame.
    ///
    /// Degenerate geometry is returned as an error and leaves the session
    /// untouched.
    pub fn process_frame(
        &mut self,
        frame: impl Into<Frame>,
        now: Timestamp,
    ) -> Result<(Verdict, Vec<DrowsinessEvent>), DrowsinessError> {
        let features = match frame.into() {
            Frame::Detected(landmarks) => {
                Some(self.extractor.extract(&landmarks).map_err(|e| {
                    warn!("Skipping frame at {} ms: {}", now.as_millis(), e);
                    e
                })?)
            }
            Frame::NoFace => None,
        };
        self.process_features(features, now)
    }

    /// Process precomputed features (`None` = no face).
    ///
    /// An out-of-range triple is rejected and leaves the session untouched.
    pub fn process_features(
        &mut self,
        features: Option<FeatureTriple>,
        now: Timestamp,
    ) -> Result<(Verdict, Vec<DrowsinessEvent>), DrowsinessError> {
        match features {
            Some(f) => {
                f.validate().map_err(|e| {
                    warn!("Skipping frame at {} ms: {}", now.as_millis(), e);
                    e
                })?;
                Ok(self.assess(f, now))
            }
            None => Ok((self.no_data(now), Vec::new())),
        }
    }

    fn no_data(&mut self, now: Timestamp) -> Verdict {
        let elapsed = self.state.observe(now);
        debug!("No face at {} ms", now.as_millis());

        Verdict::NoData(NoDataVerdict {
            alarm: self.state.alarm_active,
            blink_rate_per_min: self.state.blink_rate_per_min(elapsed),
            session_elapsed_secs: elapsed.as_secs_f64(),
            counters: self.state.snapshot(),
        })
    }

    fn assess(
        &mut self,
        features: FeatureTriple,
        now: Timestamp,
    ) -> (Verdict, Vec<DrowsinessEvent>) {
        let elapsed = self.state.observe(now);
        let mut events = Vec::new();
        let state = &mut self.state;

        debug!(
            "Features at {} ms: ear={:.3} mar={:.3} head_pose={:.1}",
            now.as_millis(),
            features.ear,
            features.mar,
            features.head_pose_score
        );

        // Eyes
        let eyes_closed = features.ear < self.config.ear_threshold;
        if eyes_closed {
            state.consecutive_closed_frames = state.consecutive_closed_frames.saturating_add(1);
        } else {
            if state.was_eyes_closed {
                state.blink_count += 1;
                events.push(DrowsinessEvent::Blink);
                debug!("Blink detected (count: {})", state.blink_count);
            }
            state.consecutive_closed_frames = 0;
        }
        state.was_eyes_closed = eyes_closed;

        // Mouth
        let yawning = features.mar > self.config.mar_threshold;
        if yawning && !state.was_yawning {
            state.yawn_count += 1;
            events.push(DrowsinessEvent::YawnStarted);
            debug!("Yawn detected (count: {})", state.yawn_count);
        }
        state.was_yawning = yawning;

        // Micro-sleep, counted once per closed-eye run
        let drowsy_frames = self.config.drowsy_frame_count;
        let micro_sleep = state.consecutive_closed_frames > drowsy_frames;
        if micro_sleep && state.consecutive_closed_frames == drowsy_frames + 1 {
            state.micro_sleep_count += 1;
            state.alert_count += 1;
            events.push(DrowsinessEvent::MicroSleepStarted);
            warn!(
                "Micro-sleep detected after {} closed frames (count: {})",
                state.consecutive_closed_frames, state.micro_sleep_count
            );
        }

        let drowsiness_score = self.config.score_weights.score(
            eyes_closed,
            yawning,
            micro_sleep,
            features.head_pose_score,
            elapsed.as_secs_f64() / 60.0,
        );
        let status = DriverStatus::from_score(drowsiness_score, &self.config.status_thresholds);

        // Alarm hysteresis: on for the whole micro-sleep run, off only once
        // the driver is back to Alert
        if micro_sleep {
            if !state.alarm_active {
                warn!("Drowsiness alarm ON");
            }
            state.alarm_active = true;
        } else if status == DriverStatus::Alert && state.alarm_active {
            info!("Drowsiness alarm OFF");
            state.alarm_active = false;
        }

        let assessment = Assessment {
            ear: features.ear,
            mar: features.mar,
            head_pose_score: features.head_pose_score,
            eyes_closed,
            yawning,
            micro_sleep,
            drowsiness_score,
            status,
            alarm: state.alarm_active,
            blink_rate_per_min: state.blink_rate_per_min(elapsed),
            session_elapsed_secs: elapsed.as_secs_f64(),
            counters: state.snapshot(),
        };
        state.record_alertness(assessment.alertness());

        (Verdict::Assessed(assessment), events)
    }
}
