//! Session management
//!
//! Every execution of a viewer binary runs inside a session: a directory
//! named after the executable and the start time, holding the log file and
//! anything else the execution wants to keep. The start time is the session
//! epoch, against which log lines are timestamped.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External imports
use chrono::{DateTime, Utc};
use conquer_once::OnceCell;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

// Internal imports
use crate::time;

// ---------------------------------------------------------------------------
// STATICS
// ---------------------------------------------------------------------------

static SESSION_EPOCH: OnceCell<DateTime<Utc>> = OnceCell::uninit();

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Format of the start time in a session directory name, see
/// https://docs.rs/chrono/0.4/chrono/format/strftime/index.html.
const DIR_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The directory and log file of the running execution.
#[derive(Clone, Debug)]
pub struct Session {
    /// Name of the executable owning the session
    pub exec_name: String,

    /// The root directory for this session
    pub session_root: PathBuf,

    /// The path to the session's log file
    pub log_file_path: PathBuf,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Possible errors associated with the session module.
#[derive(Error, Debug)]
pub enum SessionError {
    #[error("The software root environment variable (VIEWER_SW_ROOT) is not set")]
    SwRootNotSet,

    #[error("Cannot create the session directory: {0}")]
    CannotCreateDir(std::io::Error),

    #[error("A session has already been started in this process")]
    AlreadyStarted,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Session {
    /// Start the session of `exec_name` inside `$VIEWER_SW_ROOT/{sessions_dir}`.
    pub fn new(exec_name: &str, sessions_dir: &str) -> Result<Self, SessionError> {
        let root = crate::host::get_sw_root().map_err(|_| SessionError::SwRootNotSet)?;

        Self::new_in(exec_name, root.join(sessions_dir))
    }

    /// Start the session of `exec_name` inside an explicit sessions directory.
    ///
    /// Only one session may be started per process, as the epoch is global.
    pub fn new_in<P: AsRef<Path>>(exec_name: &str, sessions_dir: P) -> Result<Self, SessionError> {
        SESSION_EPOCH
            .try_init_once(Utc::now)
            .map_err(|_| SessionError::AlreadyStarted)?;
        let epoch = get_epoch().ok_or(SessionError::AlreadyStarted)?;

        let session_root = sessions_dir.as_ref().join(dir_name(exec_name, epoch));
        fs::create_dir_all(&session_root).map_err(SessionError::CannotCreateDir)?;

        Ok(Session {
            exec_name: exec_name.to_string(),
            log_file_path: session_root.join(format!("{}.log", exec_name)),
            session_root,
        })
    }

    /// Path of a file stored in the session directory.
    pub fn file_path(&self, file_name: &str) -> PathBuf {
        self.session_root.join(file_name)
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Number of seconds elapsed since the session started, `NAN` before any
/// session has been started.
pub fn get_elapsed_seconds() -> f64 {
    get_epoch()
        .and_then(|e| time::duration_to_seconds(Utc::now() - *e))
        .unwrap_or(std::f64::NAN)
}

/// The start time of the session, if one was started.
pub fn get_epoch() -> Option<&'static DateTime<Utc>> {
    SESSION_EPOCH.get()
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn dir_name(exec_name: &str, epoch: &DateTime<Utc>) -> String {
    format!("{}_{}", exec_name, epoch.format(DIR_TIMESTAMP_FORMAT))
}

#[cfg(test)]
mod test {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_dir_name() {
        let epoch = Utc.ymd(2021, 6, 3).and_hms(14, 5, 9);
        assert_eq!(dir_name("viewer_exec", &epoch), "viewer_exec_20210603_140509");
    }

    #[test]
    fn test_single_session() {
        let dir = std::env::temp_dir().join(format!("viewer_sessions_{}", std::process::id()));

        let session = Session::new_in("test_exec", &dir).unwrap();
        assert!(session.session_root.is_dir());
        assert_eq!(session.log_file_path, session.file_path("test_exec.log"));
        assert!(get_elapsed_seconds() >= 0.0);

        match Session::new_in("test_exec", &dir) {
            Err(SessionError::AlreadyStarted) => (),
            r => panic!("Expected a second session to fail, got {:?}", r),
        }

        fs::remove_dir_all(&dir).unwrap();
    }
}
