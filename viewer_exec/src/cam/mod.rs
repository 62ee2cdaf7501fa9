//! # Camera module
//!
//! Keeps the latest decoded frame of every camera and lays the frames out
//! on a display surface.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod frame_buffer;
mod layout;
mod params;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use frame_buffer::*;
pub use layout::*;
pub use params::*;
