//! Scanner packet decoder

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use nalgebra::Point3;
use std::convert::TryFrom;
use std::path::Path;

// Internal
use super::{Calibration, ScanParams};
use sensor_if::eqpt::scan::{PacketError, RawPacket, ScanPacket, DISTANCE_RESOLUTION_M};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Converts raw packets into cartesian points in the scanner frame.
#[derive(Debug, Clone)]
pub struct ScanDecoder {
    /// `None` if no valid calibration could be loaded, in which case nothing
    /// is decoded.
    calibration: Option<Calibration>,

    min_range_m: f64,
    max_range_m: f64,
}

/// The points of one packet and the angular span it covers.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedPacket {
    /// Points in the scanner frame
    ///
    /// Units: meters
    pub points: Vec<Point3<f64>>,

    pub intensities: Vec<u8>,

    /// Rotation of the first data chunk.
    ///
    /// Units: radians
    pub start_angle_rad: f64,

    /// Rotation of the last data chunk.
    ///
    /// Units: radians
    pub end_angle_rad: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScanDecoder {
    /// A calibration without one correction per laser is reported and leaves
    /// the decoder inert.
    pub fn new(calibration: Option<Calibration>, min_range_m: f64, max_range_m: f64) -> Self {
        let calibration = match calibration.map(Calibration::validate) {
            Some(Ok(c)) => Some(c),
            Some(Err(e)) => {
                warn!("Invalid scanner calibration, no points will be decoded: {}", e);
                None
            }
            None => None,
        };

        Self {
            calibration,
            min_range_m,
            max_range_m,
        }
    }

    /// Build a decoder loading the calibration from the given path.
    ///
    /// A calibration which cannot be loaded is reported and leaves the
    /// decoder inert.
    pub fn from_params<P: AsRef<Path>>(params: &ScanParams, calibration_path: P) -> Self {
        let calibration = match Calibration::load(calibration_path.as_ref()) {
            Ok(c) => Some(c),
            Err(e) => {
                warn!(
                    "Scanner calibration {:?} unavailable, no points will be decoded: {}",
                    calibration_path.as_ref(),
                    e
                );
                None
            }
        };

        Self::new(calibration, params.min_range_m, params.max_range_m)
    }

    pub fn has_calibration(&self) -> bool {
        self.calibration.is_some()
    }

    pub fn set_range_support(&mut self, min_range_m: f64, max_range_m: f64) {
        self.min_range_m = min_range_m;
        self.max_range_m = max_range_m;
    }

    pub fn range_support(&self) -> (f64, f64) {
        (self.min_range_m, self.max_range_m)
    }

    /// Decode one packet.
    ///
    /// Returns `Ok(None)` if the decoder has no calibration.
    pub fn decode(&self, packet: &ScanPacket) -> Result<Option<DecodedPacket>, PacketError> {
        let calibration = match self.calibration {
            Some(ref c) => c,
            None => return Ok(None),
        };

        let raw = RawPacket::try_from(packet)?;

        let mut points = Vec::new();
        let mut intensities = Vec::new();

        for chunk in raw.chunks.iter() {
            let rotation_rad = chunk.rotation_rad();
            let offset = chunk.block.laser_offset();

            for (j, ret) in chunk.returns.iter().enumerate() {
                // No return
                if ret.distance == 0 {
                    continue;
                }

                let corr = &calibration.lasers[offset + j];

                let distance_m = ret.distance as f64 * DISTANCE_RESOLUTION_M + corr.dist_correction_m;
                if distance_m < self.min_range_m || distance_m > self.max_range_m {
                    continue;
                }

                let (sin_vert, cos_vert) = corr.vert_correction_deg.to_radians().sin_cos();
                let (sin_rot, cos_rot) =
                    (rotation_rad - corr.rot_correction_deg.to_radians()).sin_cos();

                let xy_distance_m = distance_m * cos_vert - corr.vert_offset_m * sin_vert;

                points.push(Point3::new(
                    xy_distance_m * sin_rot - corr.horiz_offset_m * cos_rot,
                    xy_distance_m * cos_rot + corr.horiz_offset_m * sin_rot,
                    distance_m * sin_vert + corr.vert_offset_m * cos_vert,
                ));
                intensities.push(ret.intensity);
            }
        }

        Ok(Some(DecodedPacket {
            points,
            intensities,
            start_angle_rad: raw.start_angle_rad(),
            end_angle_rad: raw.end_angle_rad(),
        }))
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::scan::LaserCorrection;
    use approx::assert_abs_diff_eq;
    use sensor_if::eqpt::scan::{
        DataChunk, LaserBlock, LaserReturn, LASERS_PER_CHUNK, NUM_DATA_CHUNKS, STATUS_SIZE,
    };

    /// A packet where only the first laser of each chunk has a return.
    fn packet(rotation: u16, block: LaserBlock, distance: u16) -> ScanPacket {
        let mut returns = [LaserReturn::default(); LASERS_PER_CHUNK];
        returns[0] = LaserReturn {
            distance,
            intensity: 100,
        };

        let raw = RawPacket {
            chunks: vec![
                DataChunk {
                    block,
                    rotation,
                    returns,
                };
                NUM_DATA_CHUNKS
            ],
            status: [0; STATUS_SIZE],
        };

        ScanPacket::from(&raw)
    }

    #[test]
    fn test_uncorrected_geometry() {
        let decoder = ScanDecoder::new(Some(Calibration::uncorrected()), 0.5, 120.0);

        // 10 m return at a rotation of 90 deg lies along +X
        let decoded = decoder.decode(&packet(9000, LaserBlock::Upper, 5000)).unwrap().unwrap();
        assert_eq!(decoded.points.len(), NUM_DATA_CHUNKS);
        assert_eq!(decoded.intensities[0], 100);
        assert_abs_diff_eq!(decoded.points[0], Point3::new(10.0, 0.0, 0.0), epsilon = 1e-9);
        assert_abs_diff_eq!(decoded.start_angle_rad, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);
        assert_abs_diff_eq!(decoded.end_angle_rad, std::f64::consts::FRAC_PI_2, epsilon = 1e-12);

        // At zero rotation along +Y
        let decoded = decoder.decode(&packet(0, LaserBlock::Upper, 5000)).unwrap().unwrap();
        assert_abs_diff_eq!(decoded.points[0], Point3::new(0.0, 10.0, 0.0), epsilon = 1e-9);
    }

    #[test]
    fn test_corrections_per_block() {
        let mut calibration = Calibration::uncorrected();
        calibration.lasers[32] = LaserCorrection {
            rot_correction_deg: 0.0,
            vert_correction_deg: 30.0,
            dist_correction_m: 0.0,
            vert_offset_m: 0.0,
            horiz_offset_m: 0.0,
        };
        let decoder = ScanDecoder::new(Some(calibration), 0.5, 120.0);

        // Lower block uses laser 32, pointing 30 deg up
        let decoded = decoder.decode(&packet(0, LaserBlock::Lower, 1000)).unwrap().unwrap();
        let p = decoded.points[0];
        assert_abs_diff_eq!(p.z, 2.0 * 0.5, epsilon = 1e-9);
        assert_abs_diff_eq!(p.y, 2.0 * 30f64.to_radians().cos(), epsilon = 1e-9);

        // Upper block is uncorrected
        let decoded = decoder.decode(&packet(0, LaserBlock::Upper, 1000)).unwrap().unwrap();
        assert_abs_diff_eq!(decoded.points[0].z, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_range_filter() {
        let mut decoder = ScanDecoder::new(Some(Calibration::uncorrected()), 0.9, 120.0);

        // 0.5 m is too close
        let decoded = decoder.decode(&packet(0, LaserBlock::Upper, 250)).unwrap().unwrap();
        assert!(decoded.points.is_empty());

        decoder.set_range_support(0.2, 0.4);
        let decoded = decoder.decode(&packet(0, LaserBlock::Upper, 250)).unwrap().unwrap();
        assert!(decoded.points.is_empty());

        decoder.set_range_support(0.2, 1.0);
        let decoded = decoder.decode(&packet(0, LaserBlock::Upper, 250)).unwrap().unwrap();
        assert_eq!(decoded.points.len(), NUM_DATA_CHUNKS);
    }

    #[test]
    fn test_no_calibration_is_inert() {
        let decoder = ScanDecoder::from_params(&ScanParams::default(), "/no/such/calib.toml");
        assert!(!decoder.has_calibration());
        assert_eq!(decoder.decode(&packet(0, LaserBlock::Upper, 5000)).unwrap(), None);
    }

    #[test]
    fn test_short_calibration_is_inert() {
        let calibration = Calibration {
            lasers: vec![LaserCorrection::default(); 32],
        };
        let decoder = ScanDecoder::new(Some(calibration), 0.5, 120.0);

        assert!(!decoder.has_calibration());
        assert_eq!(decoder.decode(&packet(0, LaserBlock::Lower, 5000)).unwrap(), None);
    }

    #[test]
    fn test_malformed_packet() {
        let decoder = ScanDecoder::new(Some(Calibration::uncorrected()), 0.5, 120.0);
        assert_eq!(
            decoder.decode(&ScanPacket { data: vec![0; 10] }),
            Err(PacketError::WrongSize(10))
        );
    }
}
