#![deny(missing_docs)]
//! Shared logging utilities for the studio workspace.
//!
//! This crate provides the `studio_*` logging macros used across the codebase
//! and a minimal test initializer for the global logger. When a virtual clock
//! is driving the current thread, every line is stamped with its virtual time
//! so timer-driven test runs read as a timeline.

use std::cell::Cell;

#[doc(hidden)]
pub use log;

thread_local! {
    /// Virtual time in milliseconds for the current thread, if any.
    static VIRTUAL_MILLIS: Cell<Option<u64>> = const { Cell::new(None) };
}

/// Sets (or clears) the virtual time reported by the logging macros on this thread.
/// Called by virtual-time schedulers whenever their clock moves.
pub fn set_virtual_millis(millis: Option<u64>) {
    VIRTUAL_MILLIS.with(|v| v.set(millis));
}

/// Returns the virtual time for the current thread, or `None` on a real clock.
pub fn virtual_millis() -> Option<u64> {
    VIRTUAL_MILLIS.with(|v| v.get())
}

#[doc(hidden)]
#[macro_export]
macro_rules! __studio_log {
    ($level:ident, $($arg:tt)*) => {{
        match $crate::virtual_millis() {
            Some(millis) => $crate::log::$level!("[t+{}ms] {}", millis, format_args!($($arg)*)),
            None => $crate::log::$level!($($arg)*),
        }
    }};
}

/// Logs a trace-level message using the global logging facade.
#[macro_export]
macro_rules! studio_trace {
    ($($arg:tt)*) => {
        $crate::__studio_log!(trace, $($arg)*)
    };
}

/// Logs an info-level message using the global logging facade.
#[macro_export]
macro_rules! studio_info {
    ($($arg:tt)*) => {
        $crate::__studio_log!(info, $($arg)*)
    };
}

/// Logs a debug-level message using the global logging facade.
#[macro_export]
macro_rules! studio_debug {
    ($($arg:tt)*) => {
        $crate::__studio_log!(debug, $($arg)*)
    };
}

/// Logs a warn-level message using the global logging facade.
#[macro_export]
macro_rules! studio_warn {
    ($($arg:tt)*) => {
        $crate::__studio_log!(warn, $($arg)*)
    };
}

/// Logs an error-level message using the global logging facade.
#[macro_export]
macro_rules! studio_error {
    ($($arg:tt)*) => {
        $crate::__studio_log!(error, $($arg)*)
    };
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

    // Another test may already own the global logger.
    let _ = CombinedLogger::init(vec![TermLogger::new(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    )]);
}

#[cfg(test)]
mod tests {
    use super::{set_virtual_millis, virtual_millis};

    #[test]
    fn virtual_clock_is_per_thread_and_clearable() {
        assert_eq!(virtual_millis(), None);
        set_virtual_millis(Some(2_500));
        assert_eq!(virtual_millis(), Some(2_500));

        let other = std::thread::spawn(virtual_millis).join().unwrap();
        assert_eq!(other, None);

        set_virtual_millis(None);
        assert_eq!(virtual_millis(), None);
    }

    #[test]
    fn macros_accept_format_arguments() {
        super::initialize_for_tests();
        set_virtual_millis(Some(10));
        crate::studio_info!("settled upload {} after {}ms", 7, 2_000);
        set_virtual_millis(None);
        crate::studio_debug!("plain line {}", "ok");
    }
}
