//! Session storage and JS bridge
//!
//! Holds the single active rep session. The page calls `start_session` when
//! the camera stream starts and `stop_session` when it ends.

use wasm_bindgen::prelude::*;
use std::cell::RefCell;
use crate::motion::{ConfigError, FrameError, FrameOutcome, PoseFrame, RepConfig, RepSession};

impl From<ConfigError> for JsValue {
    fn from(err: ConfigError) -> Self {
        JsValue::from_str(&format!("Invalid rep config: {}", err))
    }
}

impl From<FrameError> for JsValue {
    fn from(err: FrameError) -> Self {
        JsValue::from_str(&format!("Invalid pose frame: {}", err))
    }
}

// Thread-local storage (WASM is single-threaded)
thread_local! {
    static SESSION: RefCell<Option<RepSession>> = const { RefCell::new(None) };
}

// ============================================================================
// WASM-BINDGEN ENTRY POINTS
// ============================================================================

/// Start (or restart) counting. `config_json` is an optional JSON object of
/// `RepConfig` fields; missing fields take their defaults.
#[wasm_bindgen]
pub fn start_session(config_json: Option<String>) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => RepConfig::from_json(json)?,
        None => RepConfig::default(),
    };
    let mut session = RepSession::new(config)?;
    session.start();

    SESSION.with(|cell| *cell.borrow_mut() = Some(session));
    Ok(())
}

/// Stop counting. The final count stays readable until the next start.
#[wasm_bindgen]
pub fn stop_session() {
    with_session_mut(|session| session.stop());
}

#[wasm_bindgen]
pub fn is_session_active() -> bool {
    with_session(|session| session.is_active()).unwrap_or(false)
}

#[wasm_bindgen]
pub fn get_rep_count() -> u32 {
    with_session(|session| session.rep_count()).unwrap_or(0)
}

/// Phase label for the overlay ("IDLE" before the first session)
#[wasm_bindgen]
pub fn get_phase() -> String {
    with_session(|session| session.phase_label().to_string())
        .unwrap_or_else(|| "IDLE".to_string())
}

/// `[left, right, aggregate]` in degrees, NaN where not measured
#[wasm_bindgen]
pub fn get_last_angles() -> Vec<f32> {
    with_session(|session| {
        let angles = session.last_angles();
        [angles.left, angles.right, angles.aggregate]
            .iter()
            .map(|a| a.unwrap_or(f32::NAN))
            .collect()
    })
    .unwrap_or_else(|| vec![f32::NAN; 3])
}

/// Aggregated angle trail, oldest first
#[wasm_bindgen]
pub fn get_angle_history() -> Vec<f32> {
    with_session(|session| session.angle_history()).unwrap_or_default()
}

#[wasm_bindgen]
pub fn get_rejected_cycles() -> u32 {
    with_session(|session| session.rejected_cycles()).unwrap_or(0)
}

/// Full session snapshot as JSON (null before the first session)
#[wasm_bindgen]
pub fn get_status_json() -> String {
    with_session(|session| serde_json::to_string(&session.snapshot()).ok())
        .flatten()
        .unwrap_or_else(|| "null".to_string())
}

/// Formatted overlay text (called from JS to update HTML)
#[wasm_bindgen]
pub fn get_debug_overlay_text() -> String {
    with_session(|session| {
        let angles = session.last_angles();
        let fmt = |a: Option<f32>| a.map_or("--".to_string(), |v| format!("{:.0}°", v));
        format!(
            "Reps: {} | Phase: {}\n\
             L: {} | R: {} | Avg: {}\n\
             Dropped: {}",
            session.rep_count(),
            session.phase_label(),
            fmt(angles.left),
            fmt(angles.right),
            fmt(angles.aggregate),
            session.rejected_cycles(),
        )
    })
    .unwrap_or_else(|| "No session".to_string())
}

// ============================================================================
// INTERNAL API (no wasm_bindgen)
// ============================================================================

/// Run a decoded frame through the active session
pub fn process_frame(frame: &PoseFrame) -> Option<FrameOutcome> {
    with_session_mut(|session| session.process_frame(frame))
}

fn with_session<T>(f: impl FnOnce(&RepSession) -> T) -> Option<T> {
    SESSION.with(|cell| cell.borrow().as_ref().map(f))
}

fn with_session_mut<T>(f: impl FnOnce(&mut RepSession) -> T) -> Option<T> {
    SESSION.with(|cell| cell.borrow_mut().as_mut().map(f))
}
