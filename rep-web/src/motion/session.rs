//! Rep counting session - one recording, one state machine
//!
//! Composes the per-frame pipeline:
//! frame → limb aggregation (gated angles) → optional smoothing → state machine.
//! The host decides when frames arrive; `process_frame` never blocks.

use log::{debug, info};
use serde::Serialize;

use super::config::{ConfigError, RepConfig};
use super::history::AngleHistory;
use super::landmarks::PoseFrame;
use super::limbs::{LimbAggregator, LimbReading};
use super::one_euro::OneEuroFilter;
use super::phase::RepPhase;
use super::rep_machine::{FrameOutcome, RepStateMachine};

/// Angles measured on the most recent frame
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct LastAngles {
    pub left: Option<f32>,
    pub right: Option<f32>,
    /// Value fed to the state machine (smoothed when smoothing is on)
    pub aggregate: Option<f32>,
}

/// Serializable view of the session for the host UI
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct SessionSnapshot {
    pub active: bool,
    pub phase: RepPhase,
    pub phase_label: &'static str,
    pub rep_count: u32,
    pub rejected_cycles: u32,
    pub last_rep_duration_ms: Option<f64>,
    pub angles: LastAngles,
}

pub struct RepSession {
    config: RepConfig,
    limbs: LimbAggregator,
    smoother: Option<OneEuroFilter>,
    machine: RepStateMachine,
    history: AngleHistory,
    last_angles: LastAngles,
    active: bool,
}

impl RepSession {
    /// Build an idle session; call `start` before feeding frames
    pub fn new(config: RepConfig) -> Result<Self, ConfigError> {
        let machine = RepStateMachine::new(&config)?;
        Ok(Self {
            limbs: LimbAggregator::new(&config),
            smoother: config.smoothing.as_ref().map(OneEuroFilter::from_config),
            history: AngleHistory::new(config.history_len),
            machine,
            last_angles: LastAngles::default(),
            active: false,
            config,
        })
    }

    /// Reset to the initial state and begin accepting frames
    pub fn start(&mut self) {
        self.machine.reset();
        if let Some(smoother) = self.smoother.as_mut() {
            smoother.reset();
        }
        self.history.clear();
        self.last_angles = LastAngles::default();
        self.active = true;
        info!(
            "rep session started ({:?}, {:?}, up {}° / down {}°)",
            self.config.joint,
            self.config.phase_model,
            self.config.up_angle_threshold,
            self.config.down_angle_threshold
        );
    }

    /// Stop accepting frames; counters stay readable
    pub fn stop(&mut self) {
        if self.active {
            info!("rep session stopped at {} reps", self.machine.rep_count());
        }
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Run one frame through the pipeline
    pub fn process_frame(&mut self, frame: &PoseFrame) -> FrameOutcome {
        if !self.active {
            return FrameOutcome::Skipped;
        }

        let LimbReading { left, right, aggregate } = self.limbs.measure(frame);
        let aggregate = match (aggregate, self.smoother.as_mut()) {
            (Some(a), Some(smoother)) => Some(smoother.filter(frame.timestamp_ms, a)),
            (a, _) => a,
        };

        self.last_angles = LastAngles {
            left: left.angle,
            right: right.angle,
            aggregate,
        };

        match aggregate {
            Some(a) => self.history.push(a),
            None => debug!("frame at {:.0}ms skipped: joint not visible", frame.timestamp_ms),
        }

        self.machine.process(aggregate, frame.timestamp_ms)
    }

    pub fn rep_count(&self) -> u32 {
        self.machine.rep_count()
    }

    pub fn phase(&self) -> RepPhase {
        self.machine.phase()
    }

    pub fn phase_label(&self) -> &'static str {
        self.machine.phase_label()
    }

    pub fn rejected_cycles(&self) -> u32 {
        self.machine.rejected_cycles()
    }

    pub fn last_angles(&self) -> LastAngles {
        self.last_angles
    }

    /// Aggregated angles, oldest first
    pub fn angle_history(&self) -> Vec<f32> {
        self.history.to_vec()
    }

    pub fn config(&self) -> &RepConfig {
        &self.config
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            active: self.active,
            phase: self.phase(),
            phase_label: self.phase_label(),
            rep_count: self.rep_count(),
            rejected_cycles: self.rejected_cycles(),
            last_rep_duration_ms: self.machine.last_rep_duration_ms(),
            angles: self.last_angles,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::motion::config::SmoothingConfig;
    use crate::motion::landmarks::*;

    /// Both knees at `angle` degrees, all landmarks at `confidence`
    fn knees(angle: f32, confidence: f32, t: f64) -> PoseFrame {
        let rad = angle.to_radians();
        let mut frame = PoseFrame::new(t);
        for (hip, knee, ankle, x) in [
            (LEFT_HIP, LEFT_KNEE, LEFT_ANKLE, 0.4),
            (RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE, 0.6),
        ] {
            // thigh points straight up from the knee, shin rotated by the angle
            frame.set(hip, Landmark::new(x, 0.5, confidence));
            frame.set(knee, Landmark::new(x, 0.7, confidence));
            frame.set(
                ankle,
                Landmark::new(x + 0.2 * rad.sin(), 0.7 - 0.2 * rad.cos(), confidence),
            );
        }
        frame
    }

    fn started(config: RepConfig) -> RepSession {
        let mut session = RepSession::new(config).unwrap();
        session.start();
        session
    }

    #[test]
    fn test_counts_squat_from_landmarks() {
        let mut session = started(RepConfig::default());
        for (i, a) in [170.0, 150.0, 120.0, 95.0, 85.0, 95.0, 130.0, 165.0].iter().enumerate() {
            session.process_frame(&knees(*a, 0.9, i as f64 * 200.0));
        }
        assert_eq!(session.rep_count(), 1);
        assert_eq!(session.phase(), RepPhase::Ready);

        let angles = session.last_angles();
        assert!((angles.left.unwrap() - 165.0).abs() < 0.01);
        assert!((angles.aggregate.unwrap() - 165.0).abs() < 0.01);
        assert_eq!(session.angle_history().len(), 8);
    }

    #[test]
    fn test_low_confidence_frame_leaves_state() {
        let mut session = started(RepConfig::default());
        session.process_frame(&knees(90.0, 0.9, 0.0));
        assert_eq!(session.phase(), RepPhase::Bottom);

        let outcome = session.process_frame(&knees(170.0, 0.3, 100.0));
        assert_eq!(outcome, FrameOutcome::Skipped);
        assert_eq!(session.phase(), RepPhase::Bottom);
        assert_eq!(session.rep_count(), 0);
        assert_eq!(session.last_angles(), LastAngles::default());
    }

    #[test]
    fn test_inactive_session_ignores_frames() {
        let mut session = RepSession::new(RepConfig::default()).unwrap();
        assert_eq!(session.process_frame(&knees(90.0, 0.9, 0.0)), FrameOutcome::Skipped);
        assert_eq!(session.phase(), RepPhase::Ready);

        session.start();
        session.process_frame(&knees(90.0, 0.9, 10.0));
        session.stop();
        session.process_frame(&knees(170.0, 0.9, 20.0));
        assert_eq!(session.phase(), RepPhase::Bottom);
        assert!(!session.is_active());
    }

    #[test]
    fn test_start_resets() {
        let mut session = started(RepConfig::default());
        session.process_frame(&knees(90.0, 0.9, 0.0));
        session.process_frame(&knees(170.0, 0.9, 1000.0));
        assert_eq!(session.rep_count(), 1);

        session.start();
        assert_eq!(session.rep_count(), 0);
        assert_eq!(session.phase(), RepPhase::Ready);
        assert!(session.angle_history().is_empty());
    }

    #[test]
    fn test_smoothing_lags_single_spike() {
        let config = RepConfig {
            smoothing: Some(SmoothingConfig::default()),
            ..Default::default()
        };
        let mut session = started(config);
        session.process_frame(&knees(170.0, 0.9, 0.0));
        // One-frame dropout to 90° is damped above the descend entry
        session.process_frame(&knees(90.0, 0.9, 33.0));
        assert_eq!(session.phase(), RepPhase::Ready);
        assert!(session.last_angles().aggregate.unwrap() > 110.0);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = started(RepConfig::default());
        session.process_frame(&knees(90.0, 0.9, 0.0));
        let json = serde_json::to_value(session.snapshot()).unwrap();
        assert_eq!(json["phase"], "bottom");
        assert_eq!(json["phase_label"], "BOTTOM");
        assert_eq!(json["rep_count"], 0);
        assert_eq!(json["active"], true);
    }

    #[test]
    fn test_invalid_config() {
        let config = RepConfig {
            min_rep_duration_ms: -5.0,
            ..Default::default()
        };
        assert!(RepSession::new(config).is_err());
    }
}
