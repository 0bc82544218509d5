//! Rep counter configuration
//!
//! Deserialized from the JSON object the host passes to `start_session`.
//! Every field has a default, so `{}` is a valid config. `validate` rejects
//! combinations that would leave the phase cycle unreachable.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::angles::JointTriple;
use super::confidence_gate::DEFAULT_MIN_CONFIDENCE;
use super::landmarks::{
    LEFT_ANKLE, LEFT_ELBOW, LEFT_HIP, LEFT_KNEE, LEFT_SHOULDER, LEFT_WRIST, RIGHT_ANKLE,
    RIGHT_ELBOW, RIGHT_HIP, RIGHT_KNEE, RIGHT_SHOULDER, RIGHT_WRIST,
};

/// Rejected configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("{field} must be finite, got {value}")]
    NotFinite { field: &'static str, value: f64 },
    #[error("down_angle_threshold ({down}) must be below up_angle_threshold ({up})")]
    ThresholdOrder { down: f32, up: f32 },
    #[error("thresholds must lie within 0..=180 degrees (down {down}, up {up})")]
    ThresholdRange { down: f32, up: f32 },
    #[error("hysteresis band overlaps: down + margin ({entry}) must be below up - margin ({exit})")]
    HysteresisOverlap { entry: f32, exit: f32 },
    #[error("{field} must not be negative, got {value}")]
    Negative { field: &'static str, value: f64 },
    #[error("min_confidence must lie within 0..=1, got {0}")]
    Confidence(f32),
    #[error("history_len must be at least 1")]
    EmptyHistory,
}

/// Which state machine drives the count
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseModel {
    /// Ready → Descending → Bottom → Ascending → Ready
    #[default]
    FourPhase,
    /// Up → Down → Up
    TwoPhase,
}

/// Joint whose angle is tracked
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrackedJoint {
    /// hip - knee - ankle (squats, lunges)
    #[default]
    Knee,
    /// shoulder - hip - knee (hip hinge)
    Hip,
    /// shoulder - elbow - wrist (push-ups, curls)
    Elbow,
}

impl TrackedJoint {
    /// (left, right) landmark triples
    pub fn triples(&self) -> (JointTriple, JointTriple) {
        match self {
            TrackedJoint::Knee => (
                JointTriple::new(LEFT_HIP, LEFT_KNEE, LEFT_ANKLE),
                JointTriple::new(RIGHT_HIP, RIGHT_KNEE, RIGHT_ANKLE),
            ),
            TrackedJoint::Hip => (
                JointTriple::new(LEFT_SHOULDER, LEFT_HIP, LEFT_KNEE),
                JointTriple::new(RIGHT_SHOULDER, RIGHT_HIP, RIGHT_KNEE),
            ),
            TrackedJoint::Elbow => (
                JointTriple::new(LEFT_SHOULDER, LEFT_ELBOW, LEFT_WRIST),
                JointTriple::new(RIGHT_SHOULDER, RIGHT_ELBOW, RIGHT_WRIST),
            ),
        }
    }
}

/// How left and right measurements are combined
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LimbMode {
    /// Average both sides; fall back to the one valid side
    #[default]
    AverageAllowSingle,
    /// Skip the frame unless both sides are valid
    RequireBoth,
}

/// One Euro filter parameters for the aggregated angle
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Hz - lower = smoother at rest
    pub min_cutoff: f32,
    /// Speed coefficient - higher = less lag during fast motion
    pub beta: f32,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            min_cutoff: 1.5,
            beta: 0.02,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepConfig {
    /// Degrees above which the limb counts as extended
    pub up_angle_threshold: f32,
    /// Degrees below which the limb counts as flexed
    pub down_angle_threshold: f32,
    /// Gap between "entering a phase" and "fully in it"
    pub hysteresis_margin: f32,
    /// Debounce window between counted reps
    pub min_rep_duration_ms: f64,
    pub min_confidence: f32,
    pub phase_model: PhaseModel,
    pub joint: TrackedJoint,
    pub limb_mode: LimbMode,
    /// None disables smoothing so raw thresholds apply exactly
    pub smoothing: Option<SmoothingConfig>,
    /// Length of the diagnostic angle trail
    pub history_len: usize,
}

impl Default for RepConfig {
    fn default() -> Self {
        Self {
            up_angle_threshold: 160.0,
            down_angle_threshold: 100.0,
            hysteresis_margin: 10.0,
            min_rep_duration_ms: 800.0,
            min_confidence: DEFAULT_MIN_CONFIDENCE,
            phase_model: PhaseModel::FourPhase,
            joint: TrackedJoint::Knee,
            limb_mode: LimbMode::AverageAllowSingle,
            smoothing: None,
            history_len: 90,
        }
    }
}

impl RepConfig {
    /// Parse and validate a JSON config object
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: RepConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Threshold the angle must drop below to leave Ready
    pub fn descend_entry(&self) -> f32 {
        self.down_angle_threshold + self.hysteresis_margin
    }

    /// Threshold the angle must rise above to leave Bottom
    pub fn ascend_entry(&self) -> f32 {
        self.up_angle_threshold - self.hysteresis_margin
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let finite = [
            ("up_angle_threshold", self.up_angle_threshold as f64),
            ("down_angle_threshold", self.down_angle_threshold as f64),
            ("hysteresis_margin", self.hysteresis_margin as f64),
            ("min_rep_duration_ms", self.min_rep_duration_ms),
            ("min_confidence", self.min_confidence as f64),
        ];
        for (field, value) in finite {
            if !value.is_finite() {
                return Err(ConfigError::NotFinite { field, value });
            }
        }

        let (down, up) = (self.down_angle_threshold, self.up_angle_threshold);
        if !(0.0..=180.0).contains(&down) || !(0.0..=180.0).contains(&up) {
            return Err(ConfigError::ThresholdRange { down, up });
        }
        if down >= up {
            return Err(ConfigError::ThresholdOrder { down, up });
        }
        if self.hysteresis_margin < 0.0 {
            return Err(ConfigError::Negative {
                field: "hysteresis_margin",
                value: self.hysteresis_margin as f64,
            });
        }
        if self.descend_entry() >= self.ascend_entry() {
            return Err(ConfigError::HysteresisOverlap {
                entry: self.descend_entry(),
                exit: self.ascend_entry(),
            });
        }
        if self.min_rep_duration_ms < 0.0 {
            return Err(ConfigError::Negative {
                field: "min_rep_duration_ms",
                value: self.min_rep_duration_ms,
            });
        }
        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::Confidence(self.min_confidence));
        }
        if let Some(smoothing) = self.smoothing {
            for (field, value) in [
                ("smoothing.min_cutoff", smoothing.min_cutoff as f64),
                ("smoothing.beta", smoothing.beta as f64),
            ] {
                if !value.is_finite() {
                    return Err(ConfigError::NotFinite { field, value });
                }
                if value < 0.0 {
                    return Err(ConfigError::Negative { field, value });
                }
            }
        }
        if self.history_len == 0 {
            return Err(ConfigError::EmptyHistory);
        }
        Ok(())
    }
}
