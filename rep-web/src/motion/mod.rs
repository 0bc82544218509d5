//! Motion module - joint angles and repetition counting
//!
//! Re-exports only. All logic in submodules. Nothing here touches JS, so the
//! whole pipeline runs and tests natively.

mod landmarks;
mod angles;
mod confidence_gate;
mod config;
mod phase;
mod rep_machine;
mod one_euro;
mod limbs;
mod history;
mod session;

pub use landmarks::{
    Landmark, PoseFrame, FrameError,
    POSE_LANDMARK_COUNT, FLOATS_PER_LANDMARK,
    NOSE, LEFT_SHOULDER, RIGHT_SHOULDER, LEFT_ELBOW, RIGHT_ELBOW,
    LEFT_WRIST, RIGHT_WRIST, LEFT_HIP, RIGHT_HIP,
    LEFT_KNEE, RIGHT_KNEE, LEFT_ANKLE, RIGHT_ANKLE,
};
pub use angles::{calculate_joint_angle, sample_joint, JointAngleSample, JointTriple};
pub use confidence_gate::{ConfidenceGate, DEFAULT_MIN_CONFIDENCE};
pub use config::{ConfigError, LimbMode, PhaseModel, RepConfig, SmoothingConfig, TrackedJoint};
pub use phase::RepPhase;
pub use rep_machine::{FrameOutcome, RepEvent, RepStateMachine};
pub use one_euro::OneEuroFilter;
pub use limbs::{LimbAggregator, LimbReading};
pub use history::AngleHistory;
pub use session::{LastAngles, RepSession, SessionSnapshot};
