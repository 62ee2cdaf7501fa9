//! # Viewer library.
//!
//! This library holds the core of the sensor log viewer: it turns navigation
//! solutions, scanner packets and camera images into a scene in a common
//! world frame and hands that scene to any rendering backend.

// ------------------------------------------------------------------------------------------------
// MODULES
// ------------------------------------------------------------------------------------------------

/// Control registry - routes messages and pose updates between the controls
pub mod bus;

/// Camera module - per camera frame buffering and tile layout
pub mod cam;

/// Controls - per sensor state and drawing
pub mod control;

/// Geodetic module - WGS84, ECEF and local ENU conversions
pub mod geodetic;

/// Parameters of the viewer executable
pub mod params;

/// Plot module - projection and clipping of the scene into a 2D vector plot
pub mod plot;

/// Pose module - tracks the vehicle pose from the navigation solutions
pub mod pose;

/// Render module - the primitives a control can ask a view to draw
pub mod render;

/// Scan module - scanner decoding and revolution aggregation
pub mod scan;

/// Rigid transforms between the sensor, vehicle and world frames
pub mod transform;

/// The viewer - owns the controls and is the entry point of the library
pub mod viewer;
