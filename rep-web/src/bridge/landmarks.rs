//! Landmark intake from JavaScript
//!
//! Receives MediaPipe Pose landmarks once per inference callback, decodes
//! them and pushes the frame through the active rep session.

use wasm_bindgen::prelude::*;
use crate::motion::{PoseFrame, FLOATS_PER_LANDMARK, POSE_LANDMARK_COUNT};
use super::session::{get_rep_count, process_frame};

/// Called from JavaScript with a flat Float32Array of 132 values
/// (33 landmarks × x, y, z, visibility) and the frame's `performance.now()`.
/// Use NaN for `x` when a landmark is missing.
///
/// Returns the rep count after this frame.
#[wasm_bindgen]
pub fn update_landmarks(data: &[f32], timestamp_ms: f64) -> Result<u32, JsValue> {
    let frame = PoseFrame::from_flat(data, timestamp_ms)?;
    if process_frame(&frame).is_none() {
        log::warn!("landmarks received without a session; call start_session first");
    }
    Ok(get_rep_count())
}

/// Expected length of the `update_landmarks` buffer
#[wasm_bindgen]
pub fn landmark_buffer_len() -> usize {
    POSE_LANDMARK_COUNT * FLOATS_PER_LANDMARK
}
