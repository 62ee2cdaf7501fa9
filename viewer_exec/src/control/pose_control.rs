//! Navigation solution control

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::Point3;
use sensor_if::{MessageKind, SensorData, SensorMessage};
use std::any::Any;

// Internal
use super::{Control, Event};
use crate::pose::{PoseTracker, TrackerParams};
use crate::render::{AxesStyle, Color, Palette, Primitive, RenderRequest, View, AXES_LABEL_RATIO};
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

pub const POSE_CONTROL_NAME: &str = "poslv";

/// Gap between the tip of the pose Z axis and the name label.
///
/// Units: meters
const NAME_OFFSET_M: f64 = 0.5;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Tracks the vehicle pose and draws its path, axes and velocities.
pub struct PoseControl {
    tracker: PoseTracker,
    palette: Palette,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl PoseControl {
    pub fn new(params: TrackerParams) -> Self {
        Self {
            tracker: PoseTracker::new(params),
            palette: Palette::default()
                .with("path", Color::RED)
                .with("slow_path", Color::GREEN)
                .with("fast_path", Color::RED)
                .with("axes", Color::GREEN)
                .with("velocity", Color::CYAN),
        }
    }

    pub fn tracker(&self) -> &PoseTracker {
        &self.tracker
    }

    fn render_path(&self, view: &mut dyn View) {
        let path = self.tracker.path();
        if path.len() < 2 {
            return;
        }

        if self.tracker.params().speed_colored_path {
            self.render_speed_colored_path(view);
            return;
        }

        view.render(RenderRequest::new(
            Primitive::Line {
                points: path.to_vec(),
                color: self.palette.color("path"),
                closed: false,
            },
            RigidTransform::identity(),
        ));
    }

    /// One segment per path step, weighted by the speed at its end.
    fn render_speed_colored_path(&self, view: &mut dyn View) {
        let max_speed_ms = self.tracker.params().max_speed_ms;
        let from = self.palette.color("slow_path");
        let to = self.palette.color("fast_path");

        let segments = self.tracker.path().windows(2);
        for (segment, speed_ms) in segments.zip(self.tracker.path_speeds().iter().skip(1)) {
            let weight = if max_speed_ms > 0.0 {
                (speed_ms / max_speed_ms).min(1.0).max(0.0)
            } else {
                1.0
            };

            view.render(RenderRequest::new(
                Primitive::GradientLine {
                    points: segment.to_vec(),
                    weight,
                    from,
                    to,
                },
                RigidTransform::identity(),
            ));
        }
    }

    fn render_velocity(&self, view: &mut dyn View) {
        let color = self.palette.color("velocity");
        let at_position = RigidTransform::from_translation(self.tracker.t_w_i().translation());
        let label_size = AXES_LABEL_RATIO * self.tracker.params().velocity_label_length_m;

        let vectors = [
            ("v", self.tracker.linear_velocity_ms()),
            ("om", self.tracker.angular_velocity_rads()),
        ];

        for (label, vector) in vectors.iter() {
            let tip = Point3::from(*vector);

            view.render(RenderRequest::new(
                Primitive::Line {
                    points: vec![Point3::origin(), tip],
                    color,
                    closed: false,
                },
                at_position,
            ));
            view.render(RenderRequest::new(
                Primitive::Text {
                    text: label.to_string(),
                    position: tip,
                    size: label_size,
                    color,
                },
                at_position,
            ));
        }
    }
}

impl Control for PoseControl {
    fn name(&self) -> &str {
        POSE_CONTROL_NAME
    }

    fn consumes(&self) -> &[MessageKind] {
        &[MessageKind::NavSolution]
    }

    fn message_read(&mut self, message: &SensorMessage, events: &mut Vec<Event>) {
        if let SensorData::NavSolution(ref nav) = message.data {
            let output = self.tracker.update(message.timestamp, nav);

            events.push(Event::PoseUpdate(output.pose));
            if output.update_views {
                events.push(Event::UpdateViews);
            }
        }
    }

    fn render(&self, view: &mut dyn View) {
        let params = self.tracker.params();

        if params.show_path {
            self.render_path(view);
        }

        if params.show_axes {
            AxesStyle::new(params.axes_length_m, self.palette.color("axes"))
                .named(POSE_CONTROL_NAME, NAME_OFFSET_M)
                .render(view, &self.tracker.t_w_i());
        }

        if params.show_velocity {
            self.render_velocity(view);
        }
    }

    fn clear(&mut self) {
        self.tracker.clear();
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
