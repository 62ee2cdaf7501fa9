//! Parameters structure for the camera module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::f64::consts::{FRAC_PI_2, PI};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CamParams {
    /// Only every `rendering_rate`th frame of each camera is decoded.
    pub rendering_rate: usize,

    /// Size of the surface the camera tiles are laid out on.
    ///
    /// Units: pixels
    pub display_size: [f64; 2],

    /// Length of the rendered camera axes.
    ///
    /// Units: meters
    pub axes_length_m: f64,

    pub show_images: bool,
    pub show_axes: bool,

    /// Known cameras and their mounting.
    pub cameras: Vec<CameraMount>,
}

/// Mounting of a single camera on the vehicle.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct CameraMount {
    pub serial: String,

    /// Camera to IMU transform as `[tx, ty, tz, rz, ry, rx]`.
    ///
    /// Units: meters, radians
    pub t_i_c: [f64; 6],
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for CamParams {
    fn default() -> Self {
        let mount = |serial: &str, t_i_c: [f64; 6]| CameraMount {
            serial: serial.to_string(),
            t_i_c,
        };

        let front = [1.635, 0.0, 0.967, -FRAC_PI_2, 0.0, -FRAC_PI_2];
        let right = [0.462, -0.59, 0.967, 0.0, PI, FRAC_PI_2];
        let rear = [0.332, 0.0, 0.967, -FRAC_PI_2, PI, FRAC_PI_2];
        let left = [0.462, 0.59, 0.967, 0.0, 0.0, -FRAC_PI_2];

        Self {
            rendering_rate: 1,
            display_size: [1920.0, 1080.0],
            axes_length_m: 0.5,
            show_images: true,
            show_axes: true,
            cameras: vec![
                mount("GX002408", front),
                mount("GX002538", front),
                mount("GX002537", right),
                mount("GX002541", right),
                mount("GX002409", rear),
                mount("GX002540", rear),
                mount("GX002536", left),
                mount("GX002539", left),
            ],
        }
    }
}

impl CamParams {
    /// Mounting of the camera with the given serial, if known.
    pub fn mount(&self, serial: &str) -> Option<&CameraMount> {
        self.cameras.iter().find(|c| c.serial == serial)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
