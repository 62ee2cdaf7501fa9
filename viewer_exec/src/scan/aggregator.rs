//! Revolution aggregator
//!
//! Packets are accumulated into an in-progress set of batches until the
//! scanner angle wraps. At a wrap the in-progress batches are moved to a
//! pending set, and every `revolution_rate` wraps the pending set replaces
//! the displayed set as a whole.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use nalgebra::Point3;
use std::sync::Arc;

// Internal
use super::DecodedPacket;
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// The points of one packet with the vehicle pose at acquisition.
#[derive(Debug, Clone, PartialEq)]
pub struct PointBatch {
    /// Points in the scanner frame
    pub points: Arc<Vec<Point3<f64>>>,

    /// Return intensity of each point
    pub intensities: Arc<Vec<u8>>,

    /// IMU to world transform when the packet was received
    pub t_w_i: RigidTransform,
}

#[derive(Debug, Clone)]
pub struct RevolutionAggregator {
    revolution_rate: usize,

    last_start_angle_rad: f64,

    /// Packets received since the last revolution boundary
    revolution_packet_counter: usize,

    /// Boundaries detected since the displayed set was last replaced
    revolutions_since_swap: usize,

    in_progress: Vec<PointBatch>,
    pending: Vec<PointBatch>,

    /// Never mutated, only replaced
    displayed: Arc<Vec<PointBatch>>,

    num_revolutions: u64,
}

/// What happened when a packet was pushed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PushOutcome {
    /// The packet started a new revolution
    pub boundary: bool,

    /// The displayed set was replaced, views should be updated
    pub swapped: bool,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for RevolutionAggregator {
    fn default() -> Self {
        Self::new(1)
    }
}

impl RevolutionAggregator {
    pub fn new(revolution_rate: usize) -> Self {
        Self {
            revolution_rate,
            last_start_angle_rad: 0.0,
            revolution_packet_counter: 0,
            revolutions_since_swap: 0,
            in_progress: Vec::new(),
            pending: Vec::new(),
            displayed: Arc::new(Vec::new()),
            num_revolutions: 0,
        }
    }

    pub fn set_revolution_rate(&mut self, revolution_rate: usize) {
        self.revolution_rate = revolution_rate;
    }

    pub fn revolution_rate(&self) -> usize {
        self.revolution_rate
    }

    /// Add a decoded packet acquired while the IMU was at `t_w_i`.
    pub fn push(&mut self, packet: &DecodedPacket, t_w_i: RigidTransform) -> PushOutcome {
        let mut outcome = PushOutcome::default();

        let wrapped = self.last_start_angle_rad > packet.end_angle_rad
            || packet.start_angle_rad > packet.end_angle_rad;

        if wrapped && self.revolution_packet_counter > 0 {
            outcome.boundary = true;
            self.revolution_packet_counter = 0;
            self.revolutions_since_swap += 1;
            self.num_revolutions += 1;

            self.pending.append(&mut self.in_progress);

            if self.revolutions_since_swap >= self.revolution_rate.max(1) {
                self.revolutions_since_swap = 0;
                self.displayed = Arc::new(std::mem::take(&mut self.pending));
                outcome.swapped = true;

                debug!(
                    "Revolution {}: displaying {} batches",
                    self.num_revolutions,
                    self.displayed.len()
                );
            }
        } else {
            self.revolution_packet_counter += 1;
        }

        self.last_start_angle_rad = packet.start_angle_rad;

        self.in_progress.push(PointBatch {
            points: Arc::new(packet.points.clone()),
            intensities: Arc::new(packet.intensities.clone()),
            t_w_i,
        });

        trace!(
            "Scan packet [{:.3}, {:.3}] rad, {} points",
            packet.start_angle_rad,
            packet.end_angle_rad,
            packet.points.len()
        );

        outcome
    }

    /// The displayed batches. The returned set is never modified, later
    /// revolutions replace it.
    pub fn displayed(&self) -> Arc<Vec<PointBatch>> {
        self.displayed.clone()
    }

    /// Batches of the revolution currently being acquired.
    pub fn in_progress(&self) -> &[PointBatch] {
        &self.in_progress
    }

    pub fn num_displayed_points(&self) -> usize {
        self.displayed.iter().map(|b| b.points.len()).sum()
    }

    /// Number of revolution boundaries detected since creation.
    pub fn num_revolutions(&self) -> u64 {
        self.num_revolutions
    }

    /// Drop all acquired and displayed points.
    pub fn clear(&mut self) {
        self.in_progress.clear();
        self.pending.clear();
        self.displayed = Arc::new(Vec::new());
        self.revolution_packet_counter = 0;
        self.revolutions_since_swap = 0;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
