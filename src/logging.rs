// src/logging.rs
//! Logger setup.
//!
//! Natively this is `env_logger` with micro-second timestamps; `RUST_LOG`
//! overrides the configured filter. In the browser, records go to the
//! developer console and panics are routed there as well.

#[cfg(not(target_arch = "wasm32"))]
pub fn init_logging(filter: &str) {
    let result = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter))
        .format_timestamp_micros()
        .try_init();
    if result.is_err() {
        log::debug!("init_logging: a logger is already installed");
    }
}

#[cfg(target_arch = "wasm32")]
pub fn init_logging(filter: &str) {
    console_error_panic_hook::set_once();
    let level = filter.parse().unwrap_or(log::LevelFilter::Info);
    if log::set_logger(&console::LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

#[cfg(target_arch = "wasm32")]
mod console {
    use log::{Level, Log, Metadata, Record};
    use wasm_bindgen::JsValue;

    pub(super) static LOGGER: ConsoleLogger = ConsoleLogger;

    pub(super) struct ConsoleLogger;

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
                Level::Error => web_sys::console::error_1(&line),
                Level::Warn => web_sys::console::warn_1(&line),
                Level::Info => web_sys::console::info_1(&line),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
            }
        }

        fn flush(&self) {}
    }
}
