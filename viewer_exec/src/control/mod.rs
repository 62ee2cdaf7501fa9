//! # Controls
//!
//! A control owns the state built from one kind of sensor data and knows
//! how to draw it. Controls never talk to each other directly: they emit
//! [`Event`]s while handling a message and the
//! [`ControlRegistry`](crate::bus::ControlRegistry) routes them.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod cam_control;
mod pose_control;
mod scan_control;
mod scene_control;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use sensor_if::{MessageKind, SensorMessage};
use std::any::Any;

// Internal
pub use cam_control::*;
pub use pose_control::*;
pub use scan_control::*;
pub use scene_control::*;
use crate::pose::PoseSample;
use crate::render::{Palette, View};

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

/// Notifications a control can raise while handling a message.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A new vehicle pose is available for the pose listeners
    PoseUpdate(PoseSample),

    /// The displayed state changed, views should be redrawn
    UpdateViews,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// A component consuming sensor messages and rendering its state.
pub trait Control: Any {
    /// Unique name of the control.
    fn name(&self) -> &str;

    /// The kinds of message this control handles. Only these are ever
    /// passed to [`Control::message_read`].
    fn consumes(&self) -> &[MessageKind] {
        &[]
    }

    /// Whether the control wants [`Control::pose_update`] calls.
    fn listens_to_pose(&self) -> bool {
        false
    }

    /// Handle one message, pushing any resulting events.
    fn message_read(&mut self, _message: &SensorMessage, _events: &mut Vec<Event>) {}

    /// Handle a new vehicle pose.
    fn pose_update(&mut self, _pose: &PoseSample) {}

    /// Draw the current state. Must not change the state, rendering twice
    /// gives the same requests.
    fn render(&self, view: &mut dyn View);

    /// Drop all accumulated data.
    fn clear(&mut self);

    fn palette(&self) -> Option<&Palette> {
        None
    }

    fn palette_mut(&mut self) -> Option<&mut Palette> {
        None
    }

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
