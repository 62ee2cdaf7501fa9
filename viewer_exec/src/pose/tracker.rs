//! Navigation pose tracker

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use chrono::{DateTime, Utc};
use log::{info, trace};
use nalgebra::{Point3, Vector3};
use std::f64::consts::FRAC_PI_2;

// Internal
use super::{c_enu_ned, PoseSample, TrackerParams};
use crate::geodetic::GeodeticReference;
use crate::transform::RigidTransform;
use sensor_if::eqpt::nav::NavSolution;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Derives the vehicle pose and path from navigation solutions.
#[derive(Debug, Clone)]
pub struct PoseTracker {
    params: TrackerParams,

    /// Origin of the world frame, captured from the first solution
    reference: Option<GeodeticReference>,

    current: Option<PoseSample>,

    /// Decimated history of IMU positions in the world frame
    path: Vec<Point3<f64>>,

    /// Speed at each point of the path
    ///
    /// Units: meters/second
    path_speeds: Vec<f64>,

    /// Number of solutions received since the last clear, used for path
    /// decimation
    num_samples: usize,

    /// Number of solutions received since the last view update request
    num_since_view_update: usize,
}

/// Result of feeding one navigation solution to the tracker.
#[derive(Debug, Clone, Copy)]
pub struct TrackerOutput {
    /// The new pose, to be published to consumers
    pub pose: PoseSample,

    /// True if the views should be redrawn
    pub update_views: bool,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No solution received yet, the world frame is not defined
    Uninitialised,

    /// The world frame reference has been captured
    Tracking,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseTracker {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            params,
            reference: None,
            current: None,
            path: Vec::new(),
            path_speeds: Vec::new(),
            num_samples: 0,
            num_since_view_update: 0,
        }
    }

    pub fn params(&self) -> &TrackerParams {
        &self.params
    }

    pub fn state(&self) -> TrackerState {
        match self.reference {
            Some(_) => TrackerState::Tracking,
            None => TrackerState::Uninitialised,
        }
    }

    pub fn reference(&self) -> Option<&GeodeticReference> {
        self.reference.as_ref()
    }

    /// Process one navigation solution.
    pub fn update(&mut self, timestamp: DateTime<Utc>, nav: &NavSolution) -> TrackerOutput {
        // The first solution defines the world frame
        let reference = match self.reference {
            Some(r) => r,
            None => {
                let r = GeodeticReference::new(nav.latitude_deg, nav.longitude_deg, nav.altitude_m);
                info!(
                    "World frame reference captured at {:.7} deg, {:.7} deg, {:.3} m",
                    r.latitude_deg, r.longitude_deg, r.altitude_m
                );
                self.reference = Some(r);
                r
            }
        };

        let position_m = reference.wgs84_to_enu(nav.latitude_deg, nav.longitude_deg, nav.altitude_m);

        // The instrument reports heading clockwise from north with pitch and
        // roll in its own sense, the world frame measures yaw from east.
        let yaw_rad = FRAC_PI_2 - nav.heading_deg.to_radians();
        let pitch_rad = -nav.pitch_deg.to_radians();
        let roll_rad = -nav.roll_deg.to_radians();

        let c_enu_ned = c_enu_ned();

        let linear_velocity_ms = c_enu_ned
            * Vector3::new(nav.north_velocity_ms, nav.east_velocity_ms, nav.down_velocity_ms);

        let angular_velocity_rads = c_enu_ned
            * Vector3::new(
                -nav.angular_rate_long_degs.to_radians(),
                -nav.angular_rate_trans_degs.to_radians(),
                -nav.angular_rate_down_degs.to_radians(),
            );

        let linear_accel_mss = c_enu_ned
            * Vector3::new(-nav.accel_long_mss, -nav.accel_trans_mss, -nav.accel_down_mss);

        let pose = PoseSample {
            timestamp,
            t_w_i: RigidTransform::from_translation_ypr(position_m, yaw_rad, pitch_rad, roll_rad),
            yaw_rad,
            pitch_rad,
            roll_rad,
            linear_velocity_ms,
            angular_velocity_rads,
            linear_accel_mss,
        };
        self.current = Some(pose);

        // Decimate the path
        if self.num_samples % self.params.rendering_rate.max(1) == 0 {
            self.path.push(Point3::from(position_m));
            self.path_speeds.push(linear_velocity_ms.norm());
        }
        self.num_samples += 1;

        self.num_since_view_update += 1;
        let update_views = self.num_since_view_update >= self.params.view_update_interval.max(1);
        if update_views {
            self.num_since_view_update = 0;
        }

        trace!(
            "Pose: pos = [{:.3}, {:.3}, {:.3}] m, ypr = [{:.4}, {:.4}, {:.4}] rad",
            position_m.x, position_m.y, position_m.z, yaw_rad, pitch_rad, roll_rad
        );

        TrackerOutput { pose, update_views }
    }

    /// The most recent pose, `None` before the first solution or after a
    /// clear.
    pub fn current(&self) -> Option<&PoseSample> {
        self.current.as_ref()
    }

    /// Current IMU to world transform, identity if there is no current pose.
    pub fn t_w_i(&self) -> RigidTransform {
        self.current.map(|p| p.t_w_i).unwrap_or_default()
    }

    pub fn linear_velocity_ms(&self) -> Vector3<f64> {
        self.current.map(|p| p.linear_velocity_ms).unwrap_or_else(Vector3::zeros)
    }

    pub fn angular_velocity_rads(&self) -> Vector3<f64> {
        self.current.map(|p| p.angular_velocity_rads).unwrap_or_else(Vector3::zeros)
    }

    pub fn linear_accel_mss(&self) -> Vector3<f64> {
        self.current.map(|p| p.linear_accel_mss).unwrap_or_else(Vector3::zeros)
    }

    pub fn path(&self) -> &[Point3<f64>] {
        &self.path
    }

    pub fn path_speeds(&self) -> &[f64] {
        &self.path_speeds
    }

    /// Clear the path and the current pose.
    ///
    /// The world frame reference is kept, later solutions stay continuous
    /// with the positions already published.
    pub fn clear(&mut self) {
        self.path.clear();
        self.path_speeds.clear();
        self.current = None;
        self.num_samples = 0;
        self.num_since_view_update = 0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
