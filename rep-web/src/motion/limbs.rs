//! Left/right limb aggregation
//!
//! Measures the tracked joint on both sides and combines them into the one
//! angle the state machine sees. Averaging both sides damps per-side jitter
//! and keeps counting while one side is briefly occluded.

use super::angles::{sample_joint, JointAngleSample, JointTriple};
use super::config::{LimbMode, RepConfig};
use super::confidence_gate::ConfidenceGate;
use super::landmarks::PoseFrame;

/// Both sides of one frame, plus the combined angle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LimbReading {
    pub left: JointAngleSample,
    pub right: JointAngleSample,
    /// None when the frame must be skipped
    pub aggregate: Option<f32>,
}

pub struct LimbAggregator {
    left: JointTriple,
    right: JointTriple,
    gate: ConfidenceGate,
    mode: LimbMode,
}

impl LimbAggregator {
    pub fn new(config: &RepConfig) -> Self {
        let (left, right) = config.joint.triples();
        Self {
            left,
            right,
            gate: ConfidenceGate::new(config.min_confidence),
            mode: config.limb_mode,
        }
    }

    pub fn measure(&self, frame: &PoseFrame) -> LimbReading {
        let left = sample_joint(frame, self.left, &self.gate);
        let right = sample_joint(frame, self.right, &self.gate);

        let aggregate = match (left.angle, right.angle, self.mode) {
            (Some(l), Some(r), _) => Some((l + r) / 2.0),
            (Some(a), None, LimbMode::AverageAllowSingle)
            | (None, Some(a), LimbMode::AverageAllowSingle) => Some(a),
            _ => None,
        };

        LimbReading { left, right, aggregate }
    }
}
