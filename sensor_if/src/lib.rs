//! # Sensor interface crate.
//!
//! Provides the typed sensor messages delivered to the viewer, and the
//! recorded log source that replays them.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Payload definitions for each sensor (navigation, scanner, cameras)
pub mod eqpt;

/// Recorded log replay
pub mod replay;

/// Timestamped sensor message envelope
pub mod msg;

mod b64;

// ------------------------------------------------------------------------------------------------
// REEXPORTS
// ------------------------------------------------------------------------------------------------

pub use msg::{MessageKind, SensorData, SensorMessage};
