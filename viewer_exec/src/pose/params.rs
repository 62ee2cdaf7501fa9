//! Parameters structure for the pose tracker

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters for the pose tracker and its rendering.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerParams {
    /// Only every `rendering_rate`th navigation solution is added to the
    /// path history.
    pub rendering_rate: usize,

    /// A view update is requested every `view_update_interval` navigation
    /// solutions.
    pub view_update_interval: usize,

    /// Length of the rendered pose axes.
    ///
    /// Units: meters
    pub axes_length_m: f64,

    /// Length of the rendered velocity label reference.
    ///
    /// Units: meters
    pub velocity_label_length_m: f64,

    /// Color the path between the `slow_path` and `fast_path` palette
    /// colors by the speed at each point, instead of the plain `path` color.
    pub speed_colored_path: bool,

    /// Speed drawn with the `fast_path` color.
    ///
    /// Units: meters/second
    pub max_speed_ms: f64,

    pub show_path: bool,
    pub show_axes: bool,
    pub show_velocity: bool,
}

impl Default for TrackerParams {
    fn default() -> Self {
        Self {
            rendering_rate: 1,
            view_update_interval: 10,
            axes_length_m: 2.5,
            velocity_label_length_m: 2.5,
            speed_colored_path: false,
            max_speed_ms: 30.0,
            show_path: true,
            show_axes: true,
            show_velocity: true,
        }
    }
}
