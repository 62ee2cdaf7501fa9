//! Projection of points and homogeneous clipping of line segments
//!
//! Coordinates go through three spaces: clip space (after the projection
//! and view transformation, with a homogeneous W), normalised device
//! coordinates (after division by W, visible inside the unit cube), and
//! terminal coordinates (x in [0, width], y in [0, height], depth in
//! (0, 1)).

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::{Matrix4, Point3, Vector3};

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// W an endpoint behind the eye is clipped to.
pub const CLIP_W_MIN: f64 = 1e-6;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A line segment after clipping, in terminal coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClippedSegment {
    pub points: [Point3<f64>; 2],

    /// Whether each endpoint was moved by clipping
    pub clipped: [bool; 2],
}

// ---------------------------------------------------------------------------
// PUBLIC FUNCTIONS
// ---------------------------------------------------------------------------

/// Project a point into terminal coordinates.
///
/// Returns `None` if the homogeneous W is zero or the point falls outside
/// the terminal or the depth range.
pub fn project(
    point: &Point3<f64>,
    transform: &Matrix4<f64>,
    size: [f64; 2],
) -> Option<Point3<f64>> {
    to_terminal(point, transform, size).filter(|p| is_visible(p, size))
}

/// Transform a point into terminal coordinates without any visibility
/// check. Returns `None` only if the homogeneous W is zero.
pub fn to_terminal(
    point: &Point3<f64>,
    transform: &Matrix4<f64>,
    size: [f64; 2],
) -> Option<Point3<f64>> {
    let v = transform * point.to_homogeneous();

    if v.w == 0.0 {
        None
    } else {
        Some(map_to_terminal(
            &Point3::new(v.x / v.w, v.y / v.w, v.z / v.w),
            size,
        ))
    }
}

/// Whether a point in terminal coordinates lies on the terminal and inside
/// the depth range.
pub fn is_visible(point: &Point3<f64>, size: [f64; 2]) -> bool {
    point.x >= 0.0
        && point.x <= size[0]
        && point.y >= 0.0
        && point.y <= size[1]
        && point.z > 0.0
        && point.z < 1.0
}

/// Clip the segment `p0`-`p1` against the eye plane and the unit cube.
///
/// Returns `None` if no part of the segment is visible.
pub fn clip_line(
    p0: &Point3<f64>,
    p1: &Point3<f64>,
    transform: &Matrix4<f64>,
    size: [f64; 2],
) -> Option<ClippedSegment> {
    let v0 = transform * p0.to_homogeneous();
    let v1 = transform * p1.to_homogeneous();

    let mut line = [v0.xyz(), v1.xyz()];
    let mut w = [v0.w, v1.w];
    let mut clipped = [false; 2];

    // Eye plane
    if w[0] <= 0.0 && w[1] <= 0.0 {
        return None;
    } else if (w[0] > 0.0) != (w[1] > 0.0) {
        let (i, j) = if w[0] <= 0.0 { (0, 1) } else { (1, 0) };

        line[i] = interpolate(&line[j], &line[i], (w[j] - CLIP_W_MIN) / (w[j] - w[i]));
        w[i] = CLIP_W_MIN;
        clipped[i] = true;
    }

    for i in 0..2 {
        line[i] /= w[i];
    }

    // Unit cube, one axis at a time
    for k in 0..3 {
        for &bound in [-1.0, 1.0].iter() {
            let outside = |p: &Vector3<f64>| {
                if bound < 0.0 {
                    p[k] < bound
                } else {
                    p[k] > bound
                }
            };

            let out = [outside(&line[0]), outside(&line[1])];

            if out[0] && out[1] {
                return None;
            } else if out[0] != out[1] {
                let (i, j) = if out[0] { (0, 1) } else { (1, 0) };

                line[i] = interpolate(
                    &line[j],
                    &line[i],
                    (bound - line[j][k]) / (line[i][k] - line[j][k]),
                );
                line[i][k] = bound;
                clipped[i] = true;
            }
        }
    }

    Some(ClippedSegment {
        points: [
            map_to_terminal(&Point3::from(line[0]), size),
            map_to_terminal(&Point3::from(line[1]), size),
        ],
        clipped,
    })
}

/// Clip a polyline segment by segment.
///
/// The polyline is split into separate strips wherever an interior vertex
/// was moved by clipping. Strips with fewer than two vertices are dropped.
pub fn clip_polyline(
    points: &[Point3<f64>],
    transform: &Matrix4<f64>,
    size: [f64; 2],
) -> Vec<Vec<Point3<f64>>> {
    let mut strips = Vec::new();
    let mut strip = Vec::new();

    for (j, pair) in points.windows(2).enumerate() {
        let last = j + 2 == points.len();

        if let Some(segment) = clip_line(&pair[0], &pair[1], transform, size) {
            strip.push(segment.points[0]);

            if last {
                strip.push(segment.points[1]);
            } else if segment.clipped[1] {
                strip.push(segment.points[1]);
                strips.push(std::mem::take(&mut strip));
            }
        }
    }
    strips.push(strip);

    strips.retain(|s| s.len() >= 2);
    strips
}

/// Map normalised device coordinates into terminal coordinates.
pub fn map_to_terminal(ndc: &Point3<f64>, size: [f64; 2]) -> Point3<f64> {
    Point3::new(
        0.5 * size[0] * (ndc.x + 1.0),
        0.5 * size[1] * (ndc.y + 1.0),
        0.5 * (ndc.z + 1.0),
    )
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn interpolate(fixed: &Vector3<f64>, variable: &Vector3<f64>, ratio: f64) -> Vector3<f64> {
    fixed + (variable - fixed) * ratio
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
