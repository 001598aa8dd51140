//! `log` backend for the browser console.
//!
//! Game code logs through the `log` macros. In the browser build those
//! records go to `console.warn` / `console.log`; elsewhere the host installs
//! whatever logger it likes (or none, in which case records are dropped).

#[cfg(target_arch = "wasm32")]
struct ConsoleLogger;

#[cfg(target_arch = "wasm32")]
static LOGGER: ConsoleLogger = ConsoleLogger;

#[cfg(target_arch = "wasm32")]
impl log::Log for ConsoleLogger {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &log::Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), record.args());
        match record.level() {
            log::Level::Error => web_sys::console::error_1(&line.into()),
            log::Level::Warn => web_sys::console::warn_1(&line.into()),
            _ => web_sys::console::log_1(&line.into()),
        }
    }

    fn flush(&self) {}
}

/// Install the console logger. Calling it again is harmless.
#[cfg(target_arch = "wasm32")]
pub fn init(level: log::LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// `Collidle [LEVEL] message`
#[cfg(any(target_arch = "wasm32", test))]
fn format_record(level: log::Level, args: &std::fmt::Arguments) -> String {
    format!("Collidle [{}] {}", level, args)
}
