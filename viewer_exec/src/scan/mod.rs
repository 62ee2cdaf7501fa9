//! # Scan module
//!
//! Turns raw packets from the rotating range scanner into posed point
//! batches, grouped by scanner revolution.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod aggregator;
mod calibration;
mod decoder;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use aggregator::*;
pub use calibration::*;
pub use decoder::*;
pub use params::*;
