//! Logger initialisation
//!
//! Log lines go to stdout and to the session log file with the format
//! `[elapsed_s LVL] message`. Debug and trace lines also carry the target, so
//! the control or decoder that produced them can be found.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use colored::{ColoredString, Colorize};
use log::{info, Level};
use thiserror::Error;

// Internal imports
use crate::session::{self, Session};

// Re-exports
pub use log::LevelFilter;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Image codec crates which are capped at `Info` whatever the chosen level.
const QUIET_TARGETS: [&str; 3] = ["png", "jpeg_decoder", "tiff"];

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Errors associated with initialising the logger.
#[derive(Debug, Error)]
pub enum LoggerInitError {
    #[error("The minimum log level must be at least as verbose as INFO, found {0}")]
    InvalidMinLogLevel(LevelFilter),

    #[error("Cannot open the log file: {0}")]
    LogFileInitError(std::io::Error),

    #[error("A logger is already installed: {0}")]
    FernInitError(log::SetLoggerError),
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Install the logger for this execution.
///
/// `min_level` must be at least as verbose as `Info`. Only the first call in
/// a process can succeed.
pub fn logger_init(min_level: LevelFilter, session: &Session) -> Result<(), LoggerInitError> {
    if min_level < Level::Info {
        return Err(LoggerInitError::InvalidMinLogLevel(min_level));
    }

    let log_file =
        fern::log_file(&session.log_file_path).map_err(LoggerInitError::LogFileInitError)?;

    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "{}",
                format_line(
                    session::get_elapsed_seconds(),
                    record.level(),
                    record.target(),
                    message
                )
            ))
        })
        .level(min_level);

    for target in QUIET_TARGETS.iter() {
        dispatch = dispatch.level_for(*target, LevelFilter::Info);
    }

    dispatch
        .chain(std::io::stdout())
        .chain(log_file)
        .apply()
        .map_err(LoggerInitError::FernInitError)?;

    info!("Logging initialised");
    if let Some(epoch) = session::get_epoch() {
        info!("    Session epoch: {}", epoch);
    }
    info!("    Log level: {}", min_level);
    info!("    Log file path: {:?}", session.log_file_path);

    Ok(())
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn format_line(elapsed_s: f64, level: Level, target: &str, message: &std::fmt::Arguments) -> String {
    if level > Level::Info {
        format!("[{:10.6} {}] {}: {}", elapsed_s, level_tag(level), target, message)
    } else {
        format!("[{:10.6} {}] {}", elapsed_s, level_tag(level), message)
    }
}

fn level_tag(level: Level) -> ColoredString {
    match level {
        Level::Trace => "TRC".dimmed().italic(),
        Level::Debug => "DBG".dimmed(),
        Level::Info => "INF".normal(),
        Level::Warn => "WRN".yellow(),
        Level::Error => "ERR".red().bold(),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_format_line() {
        colored::control::set_override(false);

        assert_eq!(
            format_line(1.5, Level::Warn, "viewer_lib::bus", &format_args!("{} left", 3)),
            "[  1.500000 WRN] 3 left"
        );
        assert_eq!(
            format_line(0.25, Level::Debug, "viewer_lib::bus", &format_args!("routed")),
            "[  0.250000 DBG] viewer_lib::bus: routed"
        );

        colored::control::unset_override();
    }
}
