//! Bridge module - JS ↔ Rust communication
//!
//! All #[wasm_bindgen] entry points live here.
//! Re-exports only in mod.rs, logic in submodules.

mod console_logger;
mod landmarks;
mod session;

pub use console_logger::{init_console_logging, set_log_level};

pub use landmarks::{update_landmarks, landmark_buffer_len};

pub use session::{
    start_session,
    stop_session,
    is_session_active,
    get_rep_count,
    get_phase,
    get_last_angles,
    get_angle_history,
    get_rejected_cycles,
    get_status_json,
    get_debug_overlay_text,
};
