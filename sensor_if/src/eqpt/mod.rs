//! Sensor payload definitions.

/// Camera images
pub mod cam;

/// GPS/INS navigation solution
pub mod nav;

/// Rotating range scanner data packets
pub mod scan;
