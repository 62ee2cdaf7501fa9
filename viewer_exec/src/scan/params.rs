//! Parameters structure for the scan module

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::path::{Path, PathBuf};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    /// Only every `revolution_rate`th revolution boundary replaces the
    /// displayed points.
    pub revolution_rate: usize,

    /// Points closer than this are dropped.
    ///
    /// Units: meters
    pub min_range_m: f64,

    /// Points further than this are dropped.
    ///
    /// Units: meters
    pub max_range_m: f64,

    /// Path to the per-laser calibration file. Relative paths are resolved
    /// against the software root.
    pub calibration_path: PathBuf,

    /// Scanner to IMU transform as `[tx, ty, tz, rz, ry, rx]`.
    ///
    /// Units: meters, radians
    pub t_i_s: [f64; 6],

    /// Length of the rendered scanner axes.
    ///
    /// Units: meters
    pub axes_length_m: f64,

    /// Rendered point size.
    ///
    /// Units: pixels
    pub point_size: f64,

    /// Color the points between the `low_intensity` and `high_intensity`
    /// palette colors by their return intensity, instead of the plain
    /// `points` color.
    pub color_by_intensity: bool,

    pub show_points: bool,
    pub show_axes: bool,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            revolution_rate: 1,
            min_range_m: 0.9,
            max_range_m: 120.0,
            calibration_path: PathBuf::from("params/calib_hdl64.toml"),
            t_i_s: [0.0; 6],
            axes_length_m: 0.5,
            point_size: 1.0,
            color_by_intensity: false,
            show_points: true,
            show_axes: true,
        }
    }
}

impl ScanParams {
    /// The calibration path, resolved against `root` if it is relative.
    pub fn resolved_calibration_path(&self, root: Option<&Path>) -> PathBuf {
        match root {
            Some(root) if self.calibration_path.is_relative() => root.join(&self.calibration_path),
            _ => self.calibration_path.clone(),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_calibration_path() {
        let mut params = ScanParams::default();
        assert_eq!(
            params.resolved_calibration_path(Some(Path::new("/opt/viewer"))),
            PathBuf::from("/opt/viewer/params/calib_hdl64.toml")
        );
        assert_eq!(
            params.resolved_calibration_path(None),
            PathBuf::from("params/calib_hdl64.toml")
        );

        params.calibration_path = PathBuf::from("/etc/calib.toml");
        assert_eq!(
            params.resolved_calibration_path(Some(Path::new("/opt/viewer"))),
            PathBuf::from("/etc/calib.toml")
        );
    }
}
