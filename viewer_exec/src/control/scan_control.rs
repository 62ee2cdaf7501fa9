//! Rotating range scanner control

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::warn;
use sensor_if::{MessageKind, SensorData, SensorMessage};
use std::any::Any;

// Internal
use super::{Control, Event};
use crate::pose::PoseSample;
use crate::render::{AxesStyle, Color, Palette, Primitive, RenderRequest, View};
use crate::scan::{RevolutionAggregator, ScanDecoder, ScanParams};
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

pub const SCAN_CONTROL_NAME: &str = "velodyne";

/// Units: meters
const NAME_OFFSET_M: f64 = 0.1;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Decodes scanner packets, groups them by revolution and draws the points
/// in the world frame.
pub struct ScanControl {
    params: ScanParams,

    decoder: ScanDecoder,
    aggregator: RevolutionAggregator,

    /// Scanner to IMU
    t_i_s: RigidTransform,

    /// Latest IMU to world, snapshotted into every packet
    t_w_i: RigidTransform,

    palette: Palette,

    num_malformed_packets: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl ScanControl {
    pub fn new(params: ScanParams, decoder: ScanDecoder) -> Self {
        Self {
            aggregator: RevolutionAggregator::new(params.revolution_rate),
            t_i_s: RigidTransform::from_params(&params.t_i_s),
            t_w_i: RigidTransform::identity(),
            decoder,
            params,
            palette: Palette::default()
                .with("points", Color::GRAY)
                .with("low_intensity", Color::BLUE)
                .with("high_intensity", Color::YELLOW)
                .with("axes", Color::YELLOW),
            num_malformed_packets: 0,
        }
    }

    pub fn aggregator(&self) -> &RevolutionAggregator {
        &self.aggregator
    }

    pub fn decoder_mut(&mut self) -> &mut ScanDecoder {
        &mut self.decoder
    }

    pub fn set_revolution_rate(&mut self, revolution_rate: usize) {
        self.params.revolution_rate = revolution_rate;
        self.aggregator.set_revolution_rate(revolution_rate);
    }

    pub fn num_malformed_packets(&self) -> u64 {
        self.num_malformed_packets
    }

    fn render_points(&self, view: &mut dyn View) {
        let color = self.palette.color("points");
        let from = self.palette.color("low_intensity");
        let to = self.palette.color("high_intensity");

        for batch in self.aggregator.displayed().iter() {
            let primitive = if self.params.color_by_intensity {
                Primitive::GradientPoints {
                    points: batch.points.clone(),
                    weights: batch
                        .intensities
                        .iter()
                        .map(|i| *i as f64 / u8::MAX as f64)
                        .collect(),
                    from,
                    to,
                    size: self.params.point_size,
                }
            } else {
                Primitive::Points {
                    points: batch.points.clone(),
                    color,
                    size: self.params.point_size,
                }
            };

            view.render(RenderRequest::new(primitive, batch.t_w_i * self.t_i_s));
        }
    }
}

impl Control for ScanControl {
    fn name(&self) -> &str {
        SCAN_CONTROL_NAME
    }

    fn consumes(&self) -> &[MessageKind] {
        &[MessageKind::ScanPacket]
    }

    fn listens_to_pose(&self) -> bool {
        true
    }

    fn message_read(&mut self, message: &SensorMessage, events: &mut Vec<Event>) {
        let packet = match message.data {
            SensorData::ScanPacket(ref p) => p,
            _ => return,
        };

        match self.decoder.decode(packet) {
            Ok(Some(decoded)) => {
                if self.aggregator.push(&decoded, self.t_w_i).swapped {
                    events.push(Event::UpdateViews);
                }
            }
            Ok(None) => (),
            Err(e) => {
                self.num_malformed_packets += 1;
                warn!("Malformed scanner packet at {}: {}", message.timestamp, e);
            }
        }
    }

    fn pose_update(&mut self, pose: &PoseSample) {
        self.t_w_i = pose.t_w_i;
    }

    fn render(&self, view: &mut dyn View) {
        if self.params.show_points {
            self.render_points(view);
        }

        if self.params.show_axes {
            AxesStyle::new(self.params.axes_length_m, self.palette.color("axes"))
                .named(SCAN_CONTROL_NAME, NAME_OFFSET_M)
                .render(view, &(self.t_w_i * self.t_i_s));
        }
    }

    fn clear(&mut self) {
        self.aggregator.clear();
    }

    fn palette(&self) -> Option<&Palette> {
        Some(&self.palette)
    }

    fn palette_mut(&mut self) -> Option<&mut Palette> {
        Some(&mut self.palette)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------
