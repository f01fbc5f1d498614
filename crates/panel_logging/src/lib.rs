#![deny(missing_docs)]
//! Logging for the scrape panel workspace.
//!
//! Crates log through the `panel_*` macros, which forward to the `log` facade.
//! The binary installs the real sink with [`initialize`]; tests call
//! [`initialize_for_tests`].

use std::fs::File;
use std::path::Path;

#[doc(hidden)]
pub use log as __log;
pub use log::LevelFilter;
use simplelog::{
    ColorChoice, CombinedLogger, Config, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

/// Trace-level message.
#[macro_export]
macro_rules! panel_trace {
    ($($arg:tt)*) => { $crate::__log::trace!($($arg)*) };
}

/// Debug-level message.
#[macro_export]
macro_rules! panel_debug {
    ($($arg:tt)*) => { $crate::__log::debug!($($arg)*) };
}

/// Info-level message.
#[macro_export]
macro_rules! panel_info {
    ($($arg:tt)*) => { $crate::__log::info!($($arg)*) };
}

/// Warn-level message. Used for conditions the panel recovers from, such as a
/// failed status poll.
#[macro_export]
macro_rules! panel_warn {
    ($($arg:tt)*) => { $crate::__log::warn!($($arg)*) };
}

/// Error-level message.
#[macro_export]
macro_rules! panel_error {
    ($($arg:tt)*) => { $crate::__log::error!($($arg)*) };
}

/// Where [`initialize`] sends log records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogDestination {
    /// The log file only.
    File,
    /// The terminal only; warnings and errors go to stderr.
    #[default]
    Terminal,
    /// Both the log file and the terminal.
    Both,
}

/// Installs the global logger.
///
/// `log_path` is only opened for [`LogDestination::File`] and
/// [`LogDestination::Both`]. If it cannot be created a warning goes to stderr
/// and the terminal sink (when requested) is still installed. Calling this
/// twice keeps the first logger.
pub fn initialize(destination: LogDestination, level: LevelFilter, log_path: &Path) {
    let config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .set_target_level(LevelFilter::Error)
        .build();

    let mut sinks: Vec<Box<dyn SharedLogger>> = Vec::with_capacity(2);
    if destination != LogDestination::File {
        sinks.push(TermLogger::new(
            level,
            config.clone(),
            TerminalMode::Mixed,
            ColorChoice::Auto,
        ));
    }
    if destination != LogDestination::Terminal {
        match File::create(log_path) {
            Ok(file) => sinks.push(WriteLogger::new(level, config, file)),
            Err(err) => eprintln!("warning: cannot create log file {}: {err}", log_path.display()),
        }
    }

    if !sinks.is_empty() {
        let _ = CombinedLogger::init(sinks);
    }
}

/// Terminal logger at debug level for tests. Safe to call from every test;
/// only the first call in a process installs it.
pub fn initialize_for_tests() {
    let _ = TermLogger::init(
        LevelFilter::Debug,
        Config::default(),
        TerminalMode::Stderr,
        ColorChoice::Never,
    );
}
