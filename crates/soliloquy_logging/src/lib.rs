#![deny(missing_docs)]
//! Shared logging utilities for the soliloquy workspace.
//!
//! The user only ever sees one generic failure text, so the log is the sole
//! place a failed recommendation request is diagnosable. The `sq_*` macros
//! carry that trail across the crates:
//!
//! - the app's effect runner logs the technical error (status, timeout,
//!   oversized or malformed body) at `warn`, once per failed request;
//! - the core logs the failure class and request id at `debug`, and records
//!   stale resolutions dropped by request-id fencing at `debug`;
//! - submissions are logged at `info` with the request id and query length,
//!   never the query text;
//! - the engine logs cancellations and response sizes at `debug`.
//!
//! The binary routes the `log` facade to a file, the terminal or both.
//! [`initialize_for_tests`] installs a terminal logger for test runs.

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! sq_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! sq_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! sq_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! sq_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! sq_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Initializes a simple terminal logger for use in unit tests.
///
/// This safely no-ops if another logger has already been initialized.
pub fn initialize_for_tests() {
    use simplelog::{ColorChoice, CombinedLogger, Config, TermLogger, TerminalMode};

    let level = if cfg!(debug_assertions) {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };

    // A logger may already be set by another test in the same binary.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}
