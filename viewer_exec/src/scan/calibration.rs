//! Per-laser scanner calibration

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use serde::Deserialize;
use std::path::Path;

use sensor_if::eqpt::scan::NUM_LASERS;
use util::params::{self, LoadError};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Correction parameters of a single laser.
#[derive(Debug, Default, Clone, Copy, PartialEq, Deserialize)]
pub struct LaserCorrection {
    /// Azimuth offset of the laser relative to the rotational reading.
    ///
    /// Units: degrees
    pub rot_correction_deg: f64,

    /// Elevation of the laser beam.
    ///
    /// Units: degrees
    pub vert_correction_deg: f64,

    /// Units: meters
    pub dist_correction_m: f64,

    /// Units: meters
    pub vert_offset_m: f64,

    /// Units: meters
    pub horiz_offset_m: f64,
}

/// Calibration of the full scanner, one entry per laser.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Calibration {
    pub lasers: Vec<LaserCorrection>,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CalibrationError {
    #[error("Could not load the calibration: {0}")]
    LoadError(LoadError),

    #[error("Expected a calibration for {} lasers, found {0}", NUM_LASERS)]
    WrongLaserCount(usize),
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Calibration {
    /// Load a calibration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CalibrationError> {
        let calib: Self = params::load_path(path).map_err(CalibrationError::LoadError)?;
        calib.validate()
    }

    /// Parse a calibration held in a string.
    pub fn parse(calib_str: &str) -> Result<Self, CalibrationError> {
        let calib: Self = params::from_str(calib_str).map_err(CalibrationError::LoadError)?;
        calib.validate()
    }

    /// A calibration with every laser uncorrected.
    pub fn uncorrected() -> Self {
        Self {
            lasers: vec![LaserCorrection::default(); NUM_LASERS],
        }
    }

    /// Check there is exactly one correction per laser.
    pub fn validate(self) -> Result<Self, CalibrationError> {
        if self.lasers.len() != NUM_LASERS {
            return Err(CalibrationError::WrongLaserCount(self.lasers.len()));
        }
        Ok(self)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
