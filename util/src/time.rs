//! General time utility functions

use chrono::{DateTime, Utc};

/// Number of nanoseconds in a second
pub const NANOS_PER_SECOND: i64 = 1_000_000_000;

/// Format used to display log and message timestamps, with milliseconds.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S:%3f";

/// Convert a duration into a number of seconds, or `None` if overflow
pub fn duration_to_seconds(duration: chrono::Duration) -> Option<f64> {
    duration
        .num_nanoseconds()
        .map(|ns| ns as f64 / NANOS_PER_SECOND as f64)
}

/// Format a timestamp as `yyyy-mm-dd hh:mm:ss:mmm`.
pub fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.format(DISPLAY_FORMAT).to_string()
}
