//! Joint angle calculation using ray headings
//!
//! Angle at the vertex between rays vertex→proximal and vertex→distal.
//! The difference of the two `atan2` headings is folded into [0, 180] so the
//! result does not depend on landmark winding order, which the pose engine
//! does not keep stable from frame to frame.

use nalgebra::Vector2;

use super::confidence_gate::ConfidenceGate;
use super::landmarks::PoseFrame;

/// Rays shorter than this have no usable direction
const MIN_SEGMENT_LENGTH: f32 = 1e-6;

/// Landmark indices forming one joint: (proximal, vertex, distal)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct JointTriple {
    pub proximal: usize,
    pub vertex: usize,
    pub distal: usize,
}

impl JointTriple {
    pub const fn new(proximal: usize, vertex: usize, distal: usize) -> Self {
        Self { proximal, vertex, distal }
    }
}

/// One frame's measurement of one joint
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JointAngleSample {
    pub joint: JointTriple,
    /// Degrees in [0, 180]; None when the gate rejected the landmarks
    pub angle: Option<f32>,
}

impl JointAngleSample {
    pub fn is_valid(&self) -> bool {
        self.angle.is_some()
    }
}

/// Calculate the joint angle in degrees
///
/// Returns None when a segment is degenerate (vertex coincides with one of
/// the other points) or a coordinate is not finite.
/// - 0° = proximal and distal on the same ray (fully folded)
/// - 180° = all three collinear with the vertex between (fully straight)
pub fn calculate_joint_angle(
    proximal: (f32, f32),
    vertex: (f32, f32),
    distal: (f32, f32),
) -> Option<f32> {
    // vertex→proximal and vertex→distal
    let v1 = Vector2::new(proximal.0 - vertex.0, proximal.1 - vertex.1);
    let v2 = Vector2::new(distal.0 - vertex.0, distal.1 - vertex.1);

    if !(v1.norm() >= MIN_SEGMENT_LENGTH && v2.norm() >= MIN_SEGMENT_LENGTH) {
        return None;
    }

    let theta = v2.y.atan2(v2.x) - v1.y.atan2(v1.x);
    let mut angle = theta.to_degrees().abs();
    if angle > 180.0 {
        angle = 360.0 - angle;
    }
    Some(angle.clamp(0.0, 180.0))
}

/// Gate then measure one joint in a frame
pub fn sample_joint(frame: &PoseFrame, joint: JointTriple, gate: &ConfidenceGate) -> JointAngleSample {
    let angle = gate
        .apply(
            frame.get(joint.proximal),
            frame.get(joint.vertex),
            frame.get(joint.distal),
        )
        .and_then(|[p1, p2, p3]| calculate_joint_angle(p1, p2, p3));

    JointAngleSample { joint, angle }
}
