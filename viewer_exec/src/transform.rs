//! # Rigid Transform Algebra
//!
//! Transforms are named `t_a_b`, mapping coordinates expressed in frame `b`
//! into frame `a`, so that `t_w_s = t_w_i * t_i_s`. The frames used in the
//! viewer are:
//!
//! - `w`: the world frame, a local ENU frame anchored at the first fix
//! - `i`: the vehicle/IMU frame
//! - `s`, `c`: a sensor or camera frame

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Isometry3, Matrix4, Point3, Translation3, Unit, UnitQuaternion, Vector3};
use serde::{Deserialize, Serialize};
use std::ops::Mul;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A rigid (rotation + translation) transformation between two frames.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidTransform {
    iso: Isometry3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RigidTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl RigidTransform {
    pub fn identity() -> Self {
        Self {
            iso: Isometry3::identity(),
        }
    }

    /// Pure translation.
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            iso: Isometry3::from_parts(
                Translation3::from(translation),
                UnitQuaternion::identity(),
            ),
        }
    }

    /// Pure rotation from yaw, pitch and roll.
    ///
    /// The rotation is `Rz(yaw) * Ry(pitch) * Rx(roll)`: yaw is applied
    /// first about Z, then pitch about the new Y, then roll about the new X.
    ///
    /// Units: radians
    pub fn from_ypr(yaw: f64, pitch: f64, roll: f64) -> Self {
        Self {
            iso: Isometry3::from_parts(
                Translation3::identity(),
                UnitQuaternion::from_euler_angles(roll, pitch, yaw),
            ),
        }
    }

    /// Pure rotation of `angle` radians about `axis`.
    ///
    /// A zero length axis gives the identity.
    pub fn from_axis_angle(axis: &Vector3<f64>, angle: f64) -> Self {
        let rotation = match Unit::try_new(*axis, f64::EPSILON) {
            Some(a) => UnitQuaternion::from_axis_angle(&a, angle),
            None => UnitQuaternion::identity(),
        };

        Self {
            iso: Isometry3::from_parts(Translation3::identity(), rotation),
        }
    }

    /// `Translation(translation) * Rotation(yaw, pitch, roll)`.
    pub fn from_translation_ypr(translation: Vector3<f64>, yaw: f64, pitch: f64, roll: f64) -> Self {
        Self::from_translation(translation) * Self::from_ypr(yaw, pitch, roll)
    }

    /// Build from a `[tx, ty, tz, rz, ry, rx]` parameter array.
    ///
    /// Units: meters, radians
    pub fn from_params(params: &[f64; 6]) -> Self {
        Self::from_translation_ypr(
            Vector3::new(params[0], params[1], params[2]),
            params[3],
            params[4],
            params[5],
        )
    }

    /// `self * other`, applying `other` first.
    pub fn compose(&self, other: &RigidTransform) -> Self {
        Self {
            iso: self.iso * other.iso,
        }
    }

    pub fn inverse(&self) -> Self {
        Self {
            iso: self.iso.inverse(),
        }
    }

    /// Transform a point.
    pub fn apply(&self, point: &Point3<f64>) -> Point3<f64> {
        self.iso.transform_point(point)
    }

    /// Rotate a free vector, ignoring the translation.
    pub fn apply_vector(&self, vector: &Vector3<f64>) -> Vector3<f64> {
        self.iso.transform_vector(vector)
    }

    pub fn translation(&self) -> Vector3<f64> {
        self.iso.translation.vector
    }

    pub fn rotation(&self) -> UnitQuaternion<f64> {
        self.iso.rotation
    }

    /// The rotation as `(yaw, pitch, roll)`, the inverse of
    /// [`RigidTransform::from_ypr`].
    pub fn ypr(&self) -> (f64, f64, f64) {
        let (roll, pitch, yaw) = self.iso.rotation.euler_angles();
        (yaw, pitch, roll)
    }

    /// The 4x4 homogeneous matrix of this transform.
    pub fn to_homogeneous(&self) -> Matrix4<f64> {
        self.iso.to_homogeneous()
    }

    pub fn isometry(&self) -> &Isometry3<f64> {
        &self.iso
    }
}

impl From<Isometry3<f64>> for RigidTransform {
    fn from(iso: Isometry3<f64>) -> Self {
        Self { iso }
    }
}

impl Mul for RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: RigidTransform) -> Self::Output {
        self.compose(&rhs)
    }
}

impl<'a> Mul<&'a RigidTransform> for &'a RigidTransform {
    type Output = RigidTransform;

    fn mul(self, rhs: &'a RigidTransform) -> Self::Output {
        self.compose(rhs)
    }
}

impl Mul<Point3<f64>> for RigidTransform {
    type Output = Point3<f64>;

    fn mul(self, rhs: Point3<f64>) -> Self::Output {
        self.apply(&rhs)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
