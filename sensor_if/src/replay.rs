//! # Recorded Log Replay
//!
//! A recorded log is a JSON-lines file, one [`SensorMessage`] per line, in
//! acquisition order. The reader loads the whole log on open and then plays it
//! back one message at a time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal
use crate::msg::SensorMessage;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Playback cursor over a recorded log.
#[derive(Debug)]
pub struct LogReader {
    path: Option<PathBuf>,
    messages: Vec<SensorMessage>,

    /// Index of the next message to be delivered
    position: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum LogReadError {
    #[error("Could not find the log at {0}")]
    LogNotFound(String),

    #[error("Could not load the log: {0}")]
    LogLoadError(std::io::Error),

    #[error("The log contains no messages")]
    LogEmpty,

    #[error("Log line {0} is not a valid sensor message: {1}")]
    InvalidMessage(usize, serde_json::Error),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LogReader {
    /// Open the log at the given path.
    pub fn open<P: AsRef<Path>>(log_path: P) -> Result<Self, LogReadError> {
        let path = PathBuf::from(log_path.as_ref());

        if !path.exists() {
            return Err(LogReadError::LogNotFound(
                path.to_string_lossy().to_string(),
            ));
        }

        let log = match fs::read_to_string(&path) {
            Ok(s) => s,
            Err(e) => return Err(LogReadError::LogLoadError(e)),
        };

        let mut reader = Self::parse(&log)?;
        reader.path = Some(path);

        Ok(reader)
    }

    /// Parse a log held in memory.
    pub fn parse(log: &str) -> Result<Self, LogReadError> {
        let mut messages = Vec::new();

        for (i, line) in log.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }

            match serde_json::from_str(line) {
                Ok(m) => messages.push(m),
                Err(e) => return Err(LogReadError::InvalidMessage(i + 1, e)),
            }
        }

        if messages.is_empty() {
            return Err(LogReadError::LogEmpty);
        }

        debug!("Parsed {} messages from log", messages.len());

        Ok(Self::from_messages(messages))
    }

    /// Build a reader over an in-memory sequence of messages.
    pub fn from_messages(messages: Vec<SensorMessage>) -> Self {
        Self {
            path: None,
            messages,
            position: 0,
        }
    }

    /// Serialise messages into the JSON-lines log format.
    pub fn to_log_string(messages: &[SensorMessage]) -> Result<String, serde_json::Error> {
        let mut log = String::new();
        for m in messages {
            log.push_str(&serde_json::to_string(m)?);
            log.push('\n');
        }
        Ok(log)
    }

    /// Path of the log file, `None` if the log was built in memory.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Deliver the next message, or `None` at the end of the log.
    pub fn next_message(&mut self) -> Option<&SensorMessage> {
        let msg = self.messages.get(self.position)?;
        self.position += 1;
        Some(msg)
    }

    /// Skip the next message without delivering it.
    pub fn forward(&mut self) {
        if self.position < self.messages.len() {
            self.position += 1;
        }
    }

    /// Go back to the start of the log.
    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Number of messages in the log.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of messages already delivered or skipped.
    pub fn position(&self) -> usize {
        self.position
    }

    pub fn is_finished(&self) -> bool {
        self.position >= self.messages.len()
    }

    /// Fraction of the log already played, in [0, 1].
    pub fn progress(&self) -> f64 {
        if self.messages.is_empty() {
            return 1.0;
        }
        self.position as f64 / self.messages.len() as f64
    }

    /// Timestamp of the first message.
    pub fn begin_time(&self) -> Option<DateTime<Utc>> {
        self.messages.first().map(|m| m.timestamp)
    }

    /// Timestamp of the last message.
    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        self.messages.last().map(|m| m.timestamp)
    }

    /// Timestamp of the next message to be delivered.
    pub fn current_time(&self) -> Option<DateTime<Utc>> {
        self.messages.get(self.position).map(|m| m.timestamp)
    }

    /// Duration of the log in seconds.
    pub fn duration_s(&self) -> f64 {
        match (self.begin_time(), self.end_time()) {
            (Some(b), Some(e)) => util::time::duration_to_seconds(e - b).unwrap_or(0.0),
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
