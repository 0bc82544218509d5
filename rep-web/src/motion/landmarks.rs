//! Landmark data for one pose frame
//!
//! Holds the MediaPipe Pose topology (33 points) as delivered by the external
//! pose engine. Frames are transient: built, processed, dropped.

use thiserror::Error;

// ============================================================================
// LANDMARK INDICES (MediaPipe Pose - 33 total)
// ============================================================================

pub const POSE_LANDMARK_COUNT: usize = 33;

/// Floats per landmark in the flat JS buffer: x, y, z, visibility
pub const FLOATS_PER_LANDMARK: usize = 4;

pub const NOSE: usize = 0;
pub const LEFT_SHOULDER: usize = 11;
pub const RIGHT_SHOULDER: usize = 12;
pub const LEFT_ELBOW: usize = 13;
pub const RIGHT_ELBOW: usize = 14;
pub const LEFT_WRIST: usize = 15;
pub const RIGHT_WRIST: usize = 16;
pub const LEFT_HIP: usize = 23;
pub const RIGHT_HIP: usize = 24;
pub const LEFT_KNEE: usize = 25;
pub const RIGHT_KNEE: usize = 26;
pub const LEFT_ANKLE: usize = 27;
pub const RIGHT_ANKLE: usize = 28;

// ============================================================================
// LANDMARK DATA STRUCTURE
// ============================================================================

/// A single landmark point (normalized image coordinates)
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Landmark {
    pub x: f32,  // 0-1 normalized
    pub y: f32,  // 0-1 normalized
    pub z: f32,  // Relative depth, unused by the angle math
    /// Detection confidence in [0, 1] (MediaPipe "visibility")
    pub confidence: f32,
}

impl Landmark {
    pub fn new(x: f32, y: f32, confidence: f32) -> Self {
        Self { x, y, z: 0.0, confidence }
    }

    /// Position in the image plane
    pub fn position(&self) -> (f32, f32) {
        (self.x, self.y)
    }
}

/// Malformed landmark buffer from the host
#[derive(Debug, Error, PartialEq)]
pub enum FrameError {
    #[error("invalid landmark data length: {0} (expected {expected})", expected = POSE_LANDMARK_COUNT * FLOATS_PER_LANDMARK)]
    BadLength(usize),
    #[error("timestamp is not finite: {0}")]
    BadTimestamp(f64),
}

/// All landmarks seen in one frame, plus its monotonic timestamp
#[derive(Clone, Debug)]
pub struct PoseFrame {
    landmarks: [Option<Landmark>; POSE_LANDMARK_COUNT],
    /// Milliseconds from a monotonic clock (e.g. `performance.now()`)
    pub timestamp_ms: f64,
}

impl PoseFrame {
    /// Empty frame: every landmark missing
    pub fn new(timestamp_ms: f64) -> Self {
        Self {
            landmarks: [None; POSE_LANDMARK_COUNT],
            timestamp_ms,
        }
    }

    /// Builder-style insert, ignores out-of-range indices
    pub fn with(mut self, index: usize, landmark: Landmark) -> Self {
        self.set(index, landmark);
        self
    }

    pub fn set(&mut self, index: usize, landmark: Landmark) {
        if let Some(slot) = self.landmarks.get_mut(index) {
            *slot = Some(landmark);
        }
    }

    pub fn get(&self, index: usize) -> Option<Landmark> {
        self.landmarks.get(index).copied().flatten()
    }

    /// Decode the flat `Float32Array` layout used by the JS side:
    /// 33 landmarks × (x, y, z, visibility). A NaN `x` marks a landmark the
    /// pose engine did not report.
    pub fn from_flat(data: &[f32], timestamp_ms: f64) -> Result<Self, FrameError> {
        if data.len() != POSE_LANDMARK_COUNT * FLOATS_PER_LANDMARK {
            return Err(FrameError::BadLength(data.len()));
        }
        if !timestamp_ms.is_finite() {
            return Err(FrameError::BadTimestamp(timestamp_ms));
        }

        let mut frame = Self::new(timestamp_ms);
        for (i, chunk) in data.chunks_exact(FLOATS_PER_LANDMARK).enumerate() {
            if chunk[0].is_nan() {
                continue;
            }
            frame.landmarks[i] = Some(Landmark {
                x: chunk[0],
                y: chunk[1],
                z: chunk[2],
                confidence: chunk[3],
            });
        }
        Ok(frame)
    }
}
