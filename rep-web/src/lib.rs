//! Rep Web - real-time repetition counter over pose landmarks
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The counting pipeline lives in `motion` and has no JS dependency; the
//! `bridge` module adapts it to the browser.

pub mod motion;
mod bridge;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen functions for JS access
pub use bridge::{
    update_landmarks, landmark_buffer_len,
    start_session, stop_session, is_session_active,
    get_rep_count, get_phase, get_last_angles, get_angle_history,
    get_rejected_cycles, get_status_json, get_debug_overlay_text,
    set_log_level,
};

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
    bridge::init_console_logging(log::LevelFilter::Info);
    log::info!("rep counter module loaded");
}
