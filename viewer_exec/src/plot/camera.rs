//! View camera producing the projection and view transformation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix4, Point3, Vector3};
use serde::Deserialize;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Vertical field of view of the perspective projection.
///
/// Units: radians
pub const FIELD_OF_VIEW_RAD: f64 = 45.0 * std::f64::consts::PI / 180.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A camera looking from `position` towards `viewpoint` with Z up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ViewCamera {
    pub mode: ProjectionMode,

    /// Units: meters
    pub position: Point3<f64>,

    /// Units: meters
    pub viewpoint: Point3<f64>,

    /// Near and far clipping distances.
    ///
    /// Units: meters
    pub range: [f64; 2],
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ProjectionMode {
    Perspective,
    Orthographic,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for ViewCamera {
    fn default() -> Self {
        Self {
            mode: ProjectionMode::Perspective,
            position: Point3::origin(),
            viewpoint: Point3::origin(),
            range: [0.1, 1.0],
        }
    }
}

impl ViewCamera {
    pub fn new(mode: ProjectionMode, position: Point3<f64>, viewpoint: Point3<f64>) -> Self {
        Self {
            mode,
            position,
            viewpoint,
            ..Default::default()
        }
    }

    pub fn with_range(mut self, near: f64, far: f64) -> Self {
        self.range = [near, far];
        self
    }

    /// Projection matrix for a viewport of the given width/height ratio.
    pub fn projection(&self, aspect_ratio: f64) -> Matrix4<f64> {
        let [near, far] = self.range;

        let top = (FIELD_OF_VIEW_RAD * 0.5).tan() * near;
        let bottom = -top;
        let left = aspect_ratio * bottom;
        let right = aspect_ratio * top;

        let mut p = Matrix4::identity();

        match self.mode {
            ProjectionMode::Perspective => {
                p[(0, 0)] = 2.0 * near / (right - left);
                p[(1, 1)] = 2.0 * near / (top - bottom);
                p[(2, 2)] = -(far + near) / (far - near);
                p[(2, 3)] = -2.0 * far * near / (far - near);
                p[(3, 2)] = -1.0;
                p[(3, 3)] = 0.0;
            }
            ProjectionMode::Orthographic => {
                p[(0, 0)] = 2.0 / (right - left);
                p[(1, 1)] = 2.0 / (top - bottom);
                p[(2, 2)] = -2.0 / (far - near);
                p[(0, 3)] = -(right + left) / (right - left);
                p[(1, 3)] = -(top + bottom) / (top - bottom);
                p[(2, 3)] = -(far + near) / (far - near);
            }
        }

        p
    }

    /// World to eye transformation. The eye looks down its -Z axis with Y
    /// up.
    ///
    /// A camera whose position and viewpoint coincide looks along +X, and
    /// one looking straight up or down keeps the world Y axis as its up.
    pub fn transformation(&self) -> Matrix4<f64> {
        let up = Vector3::z();

        let look = (self.viewpoint - self.position)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);
        let s = look
            .cross(&up)
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(Vector3::x);
        let u = s.cross(&look);

        #[rustfmt::skip]
        let rotation = Matrix4::new(
             s.x,     s.y,     s.z,    0.0,
             u.x,     u.y,     u.z,    0.0,
            -look.x, -look.y, -look.z, 0.0,
             0.0,     0.0,     0.0,    1.0,
        );

        rotation * Matrix4::new_translation(&(-self.position.coords))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
