//! # Viewer Executable Parameters

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use serde::Deserialize;
use std::collections::BTreeMap;

// Internal
use crate::cam::CamParams;
use crate::control::SceneParams;
use crate::plot::PlotFont;
use crate::pose::TrackerParams;
use crate::render::Color;
use crate::scan::ScanParams;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Parameters of the whole viewer, loaded from `viewer_exec.toml`.
///
/// Every section is optional, missing values take their defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ViewerExecParams {
    pub pose: TrackerParams,

    pub scan: ScanParams,

    pub cam: CamParams,

    pub scene: SceneParams,

    pub plot: PlotParams,

    /// Color overrides, keyed by control name then by role.
    pub palettes: BTreeMap<String, BTreeMap<String, Color>>,
}

/// Parameters of the 2D plot export.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlotParams {
    /// Size of the plot terminal as `[width, height]`.
    ///
    /// Units: centimeters
    pub terminal_size: [f64; 2],

    pub font: PlotFont,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PlotParams {
    fn default() -> Self {
        Self {
            terminal_size: [20.0, 14.0],
            font: PlotFont::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
