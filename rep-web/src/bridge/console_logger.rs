//! `log` backend that writes to the browser console
//!
//! The motion core logs through the `log` facade; in the browser those
//! records land in DevTools at the matching console level.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", record.target(), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger once; later calls only adjust the level
pub fn init_console_logging(level: LevelFilter) {
    // set_logger fails if already installed, which is fine on module re-init
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

/// Change verbosity from JS: "off", "error", "warn", "info", "debug", "trace"
#[wasm_bindgen]
pub fn set_log_level(level: &str) {
    match level.parse::<LevelFilter>() {
        Ok(filter) => log::set_max_level(filter),
        Err(_) => console::warn_1(&format!("Unknown log level: {}", level).into()),
    }
}
