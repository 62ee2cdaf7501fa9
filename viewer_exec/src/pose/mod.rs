//! # Pose module
//!
//! Tracks the pose of the vehicle (IMU frame) in the world frame from the
//! navigation solutions delivered by the GPS/INS.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod params;
mod tracker;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use nalgebra::{Matrix3, Point3, Vector3};

// Internal
pub use params::*;
pub use tracker::*;
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Rotation taking NED vectors into ENU.
#[rustfmt::skip]
pub fn c_enu_ned() -> Matrix3<f64> {
    Matrix3::new(
        0.0, 1.0,  0.0,
        1.0, 0.0,  0.0,
        0.0, 0.0, -1.0,
    )
}

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The vehicle state derived from one navigation solution.
///
/// All quantities are in the world (ENU) frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PoseSample {
    /// Acquisition time of the navigation solution
    pub timestamp: DateTime<Utc>,

    /// Transform from the IMU frame into the world frame
    pub t_w_i: RigidTransform,

    /// Units: radians
    pub yaw_rad: f64,

    /// Units: radians
    pub pitch_rad: f64,

    /// Units: radians
    pub roll_rad: f64,

    /// Units: meters/second
    pub linear_velocity_ms: Vector3<f64>,

    /// Units: radians/second
    pub angular_velocity_rads: Vector3<f64>,

    /// Units: meters/second^2
    pub linear_accel_mss: Vector3<f64>,
}

/// Pose published as six discrete scalars.
#[deprecated(
    since = "0.2",
    note = "Consumers should use the full transform carried by PoseSample::t_w_i"
)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarPose {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub yaw: f64,
    pub pitch: f64,
    pub roll: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseSample {
    /// Position of the IMU in the world frame.
    ///
    /// Units: meters
    pub fn position_m(&self) -> Point3<f64> {
        Point3::from(self.t_w_i.translation())
    }

    #[allow(deprecated)]
    pub fn to_scalars(&self) -> ScalarPose {
        let p = self.t_w_i.translation();
        ScalarPose {
            x: p.x,
            y: p.y,
            z: p.z,
            yaw: self.yaw_rad,
            pitch: self.pitch_rad,
            roll: self.roll_rad,
        }
    }
}

#[allow(deprecated)]
impl ScalarPose {
    /// Rebuild the full transform from the scalars.
    pub fn to_transform(&self) -> RigidTransform {
        RigidTransform::from_translation_ypr(
            Vector3::new(self.x, self.y, self.z),
            self.yaw,
            self.pitch,
            self.roll,
        )
    }
}
