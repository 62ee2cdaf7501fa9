//! # Geodetic Conversions
//!
//! WGS84 geodetic coordinates to Earth-Centred-Earth-Fixed and from there to
//! a local East-North-Up tangent plane.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix3, Vector3};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// WGS84 semi-major axis.
///
/// Units: meters
pub const WGS84_A_M: f64 = 6_378_137.0;

/// WGS84 flattening.
pub const WGS84_F: f64 = 1.0 / 298.257_223_563;

/// WGS84 first eccentricity squared.
pub const WGS84_E2: f64 = WGS84_F * (2.0 - WGS84_F);

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The origin of a local ENU frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeodeticReference {
    /// Units: degrees
    pub latitude_deg: f64,

    /// Units: degrees
    pub longitude_deg: f64,

    /// Units: meters
    pub altitude_m: f64,

    ecef_m: Vector3<f64>,
    c_enu_ecef: Matrix3<f64>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl GeodeticReference {
    pub fn new(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Self {
        Self {
            latitude_deg,
            longitude_deg,
            altitude_m,
            ecef_m: wgs84_to_ecef(latitude_deg, longitude_deg, altitude_m),
            c_enu_ecef: enu_rotation(latitude_deg, longitude_deg),
        }
    }

    /// Convert an ECEF position into this reference's ENU frame.
    pub fn ecef_to_enu(&self, ecef_m: &Vector3<f64>) -> Vector3<f64> {
        self.c_enu_ecef * (ecef_m - self.ecef_m)
    }

    /// Convert a geodetic position into this reference's ENU frame.
    pub fn wgs84_to_enu(&self, latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Vector3<f64> {
        self.ecef_to_enu(&wgs84_to_ecef(latitude_deg, longitude_deg, altitude_m))
    }
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Convert WGS84 latitude, longitude and altitude to ECEF.
///
/// Inputs are not range checked.
pub fn wgs84_to_ecef(latitude_deg: f64, longitude_deg: f64, altitude_m: f64) -> Vector3<f64> {
    let lat = latitude_deg.to_radians();
    let lon = longitude_deg.to_radians();

    // Prime vertical radius of curvature
    let n = WGS84_A_M / (1.0 - WGS84_E2 * lat.sin().powi(2)).sqrt();

    Vector3::new(
        (n + altitude_m) * lat.cos() * lon.cos(),
        (n + altitude_m) * lat.cos() * lon.sin(),
        (n * (1.0 - WGS84_E2) + altitude_m) * lat.sin(),
    )
}

/// Convert an ECEF position to ENU relative to the given reference.
pub fn ecef_to_enu(
    ecef_m: &Vector3<f64>,
    ref_latitude_deg: f64,
    ref_longitude_deg: f64,
    ref_altitude_m: f64,
) -> Vector3<f64> {
    let ref_ecef = wgs84_to_ecef(ref_latitude_deg, ref_longitude_deg, ref_altitude_m);

    enu_rotation(ref_latitude_deg, ref_longitude_deg) * (ecef_m - ref_ecef)
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

/// Rotation from ECEF into the ENU frame at the given latitude/longitude.
fn enu_rotation(latitude_deg: f64, longitude_deg: f64) -> Matrix3<f64> {
    let (sin_lat, cos_lat) = latitude_deg.to_radians().sin_cos();
    let (sin_lon, cos_lon) = longitude_deg.to_radians().sin_cos();

    Matrix3::new(
        -sin_lon, cos_lon, 0.0,
        -sin_lat * cos_lon, -sin_lat * sin_lon, cos_lat,
        cos_lat * cos_lon, cos_lat * sin_lon, sin_lat,
    )
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_wgs84_to_ecef_known_points() {
        assert_abs_diff_eq!(
            wgs84_to_ecef(0.0, 0.0, 0.0),
            Vector3::new(WGS84_A_M, 0.0, 0.0),
            epsilon = 1e-6
        );

        // Polar radius
        let b = WGS84_A_M * (1.0 - WGS84_F);
        assert_abs_diff_eq!(
            wgs84_to_ecef(90.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, b),
            epsilon = 1e-6
        );

        assert_abs_diff_eq!(
            wgs84_to_ecef(0.0, 90.0, 100.0),
            Vector3::new(0.0, WGS84_A_M + 100.0, 0.0),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_reference_maps_to_origin() {
        for &(lat, lon, alt) in [
            (37.0, -122.0, 10.0),
            (47.3769, 8.5417, 408.0),
            (-33.9, 151.2, 0.0),
            (0.0, 0.0, -50.0),
            (89.0, 179.0, 2000.0),
        ]
        .iter()
        {
            let ecef = wgs84_to_ecef(lat, lon, alt);
            assert_abs_diff_eq!(ecef_to_enu(&ecef, lat, lon, alt), Vector3::zeros(), epsilon = 1e-6);
        }
    }

    #[test]
    fn test_enu_axes() {
        let reference = GeodeticReference::new(37.0, -122.0, 10.0);

        // Moving north increases the north component only
        let north = reference.wgs84_to_enu(37.0001, -122.0, 10.0);
        assert!(north.y > 11.0 && north.y < 11.2);
        assert_abs_diff_eq!(north.x, 0.0, epsilon = 1e-6);

        // Moving east increases the east component only
        let east = reference.wgs84_to_enu(37.0, -121.9999, 10.0);
        assert!(east.x > 8.8 && east.x < 9.0);
        assert_abs_diff_eq!(east.y, 0.0, epsilon = 1e-4);

        // Altitude is up
        let up = reference.wgs84_to_enu(37.0, -122.0, 15.0);
        assert_abs_diff_eq!(up, Vector3::new(0.0, 0.0, 5.0), epsilon = 1e-6);
    }
}
