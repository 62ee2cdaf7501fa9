//! # Navigation Equipment Module
//!
//! The navigation solution is produced by a GPS-aided inertial system at a
//! fixed rate. All attitude and rate values are in the instrument's own
//! convention (NED, heading clockwise from north), conversion into the
//! viewer's world frame happens in the pose tracker.

// ------------------------------------------------------------------------------------------------
// IMPORTS
// ------------------------------------------------------------------------------------------------

use serde::{Deserialize, Serialize};

// ------------------------------------------------------------------------------------------------
// STRUCTS
// ------------------------------------------------------------------------------------------------

/// A single navigation solution.
#[derive(Debug, Default, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct NavSolution {
    /// Geodetic latitude.
    ///
    /// Units: degrees
    pub latitude_deg: f64,

    /// Geodetic longitude.
    ///
    /// Units: degrees
    pub longitude_deg: f64,

    /// Altitude above the WGS84 ellipsoid.
    ///
    /// Units: meters
    pub altitude_m: f64,

    /// Velocity towards north.
    ///
    /// Units: meters/second
    pub north_velocity_ms: f64,

    /// Velocity towards east.
    ///
    /// Units: meters/second
    pub east_velocity_ms: f64,

    /// Velocity towards the centre of the earth.
    ///
    /// Units: meters/second
    pub down_velocity_ms: f64,

    /// Units: degrees
    pub roll_deg: f64,

    /// Units: degrees
    pub pitch_deg: f64,

    /// Heading, clockwise from north.
    ///
    /// Units: degrees
    pub heading_deg: f64,

    /// Units: degrees
    pub wander_angle_deg: f64,

    /// Units: degrees
    pub track_angle_deg: f64,

    /// Ground speed.
    ///
    /// Units: meters/second
    pub speed_ms: f64,

    /// Angular rate about the longitudinal axis.
    ///
    /// Units: degrees/second
    pub angular_rate_long_degs: f64,

    /// Angular rate about the transverse axis.
    ///
    /// Units: degrees/second
    pub angular_rate_trans_degs: f64,

    /// Angular rate about the down axis.
    ///
    /// Units: degrees/second
    pub angular_rate_down_degs: f64,

    /// Units: meters/second^2
    pub accel_long_mss: f64,

    /// Units: meters/second^2
    pub accel_trans_mss: f64,

    /// Units: meters/second^2
    pub accel_down_mss: f64,

    /// Status code of the inertial alignment reported by the instrument.
    #[serde(default)]
    pub alignment_status: u8,
}
