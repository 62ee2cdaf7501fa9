//! # Control registry
//!
//! Routes sensor messages to the controls consuming them and pose updates
//! to the controls listening for them. The routing tables are built when a
//! control is registered, nothing is looked up by type at dispatch time.

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, trace};
use sensor_if::{MessageKind, SensorMessage};
use std::collections::HashMap;
use std::fmt;
use std::marker::PhantomData;
use util::raise_error;

// Internal
use crate::control::{Control, Event};
use crate::render::{Palette, View};

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Owns all controls and passes messages and events between them.
#[derive(Default)]
pub struct ControlRegistry {
    /// In registration order, which is also the render order
    controls: Vec<Box<dyn Control>>,

    names: HashMap<String, usize>,

    /// Indices of the consumers of each message kind
    routes: HashMap<MessageKind, Vec<usize>>,

    pose_listeners: Vec<usize>,

    /// Set when any control asked for the views to be redrawn
    update_views: bool,

    num_dispatched: u64,
}

/// Typed reference to a registered control.
pub struct ControlHandle<T> {
    index: usize,
    _marker: PhantomData<fn() -> T>,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl<T> Clone for ControlHandle<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ControlHandle<T> {}

impl<T> fmt::Debug for ControlHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlHandle({})", self.index)
    }
}

impl ControlRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a control.
    ///
    /// # Panics
    /// If a control with the same name is already registered.
    pub fn register<T: Control>(&mut self, control: T) -> ControlHandle<T> {
        let name = control.name().to_string();
        if self.names.contains_key(&name) {
            raise_error!("A control named \"{}\" is already registered", name);
        }

        let index = self.controls.len();

        for kind in control.consumes() {
            self.routes.entry(*kind).or_default().push(index);
        }
        if control.listens_to_pose() {
            self.pose_listeners.push(index);
        }

        debug!(
            "Registered control \"{}\" (consumes {:?}, pose listener: {})",
            name,
            control.consumes(),
            control.listens_to_pose()
        );

        self.names.insert(name, index);
        self.controls.push(Box::new(control));

        ControlHandle {
            index,
            _marker: PhantomData,
        }
    }

    /// # Panics
    /// If the handle was issued by another registry for a different control
    /// type.
    pub fn get<T: Control>(&self, handle: ControlHandle<T>) -> &T {
        match self
            .controls
            .get(handle.index)
            .and_then(|c| c.as_any().downcast_ref::<T>())
        {
            Some(c) => c,
            None => raise_error!("Control handle {} does not match its control", handle.index),
        }
    }

    /// # Panics
    /// If the handle was issued by another registry for a different control
    /// type.
    pub fn get_mut<T: Control>(&mut self, handle: ControlHandle<T>) -> &mut T {
        match self
            .controls
            .get_mut(handle.index)
            .and_then(|c| c.as_any_mut().downcast_mut::<T>())
        {
            Some(c) => c,
            None => raise_error!("Control handle {} does not match its control", handle.index),
        }
    }

    pub fn find(&self, name: &str) -> Option<&dyn Control> {
        let index = *self.names.get(name)?;
        Some(self.controls[index].as_ref())
    }

    /// Palette of the named control, if it has one.
    pub fn palette_mut(&mut self, name: &str) -> Option<&mut Palette> {
        let index = *self.names.get(name)?;
        self.controls[index].palette_mut()
    }

    /// Names of the registered controls, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.controls.iter().map(|c| c.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.controls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.controls.is_empty()
    }

    /// Deliver a message to its consumers and route the events they raise.
    ///
    /// Returns the number of controls the message was delivered to.
    pub fn dispatch(&mut self, message: &SensorMessage) -> usize {
        let kind = message.kind();
        let consumers = match self.routes.get(&kind) {
            Some(c) => c.clone(),
            None => {
                trace!("No control consumes {:?} messages", kind);
                return 0;
            }
        };

        let mut events = Vec::new();
        for &index in consumers.iter() {
            self.controls[index].message_read(message, &mut events);
        }

        for event in events {
            match event {
                Event::PoseUpdate(pose) => {
                    for &index in self.pose_listeners.iter() {
                        self.controls[index].pose_update(&pose);
                    }
                }
                Event::UpdateViews => self.update_views = true,
            }
        }

        self.num_dispatched += 1;
        consumers.len()
    }

    /// Whether any control asked for a redraw since the last call.
    pub fn take_update_views(&mut self) -> bool {
        std::mem::replace(&mut self.update_views, false)
    }

    /// Number of messages delivered to at least one control.
    pub fn num_dispatched(&self) -> u64 {
        self.num_dispatched
    }

    /// Render every control into the view, in registration order.
    pub fn render(&self, view: &mut dyn View) {
        for control in self.controls.iter() {
            control.render(view);
        }
    }

    pub fn clear_all(&mut self) {
        for control in self.controls.iter_mut() {
            control.clear();
        }
        self.update_views = true;
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::pose::PoseSample;
    use crate::render::RecordingView;
    use crate::transform::RigidTransform;
    use chrono::Utc;
    use nalgebra::Vector3;
    use sensor_if::eqpt::nav::NavSolution;
    use sensor_if::SensorData;
    use std::any::Any;

    /// Emits a pose for every navigation message it receives.
    struct Source {
        received: usize,
    }

    /// Records the poses it is told about.
    struct Listener {
        name: String,
        poses: Vec<RigidTransform>,
    }

    impl Control for Source {
        fn name(&self) -> &str {
            "source"
        }

        fn consumes(&self) -> &[MessageKind] {
            &[MessageKind::NavSolution]
        }

        fn message_read(&mut self, message: &SensorMessage, events: &mut Vec<Event>) {
            self.received += 1;
            events.push(Event::PoseUpdate(PoseSample {
                timestamp: message.timestamp,
                t_w_i: RigidTransform::from_translation(Vector3::new(
                    self.received as f64,
                    0.0,
                    0.0,
                )),
                yaw_rad: 0.0,
                pitch_rad: 0.0,
                roll_rad: 0.0,
                linear_velocity_ms: Vector3::zeros(),
                angular_velocity_rads: Vector3::zeros(),
                linear_accel_mss: Vector3::zeros(),
            }));
            events.push(Event::UpdateViews);
        }

        fn render(&self, _view: &mut dyn View) {}

        fn clear(&mut self) {
            self.received = 0;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    impl Control for Listener {
        fn name(&self) -> &str {
            &self.name
        }

        fn listens_to_pose(&self) -> bool {
            true
        }

        fn pose_update(&mut self, pose: &PoseSample) {
            self.poses.push(pose.t_w_i);
        }

        fn render(&self, _view: &mut dyn View) {}

        fn clear(&mut self) {
            self.poses.clear();
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    fn listener(name: &str) -> Listener {
        Listener {
            name: name.to_string(),
            poses: Vec::new(),
        }
    }

    fn nav() -> SensorMessage {
        SensorMessage::new(Utc::now(), SensorData::NavSolution(NavSolution::default()))
    }

    fn scan() -> SensorMessage {
        SensorMessage::new(
            Utc::now(),
            SensorData::ScanPacket(sensor_if::eqpt::scan::ScanPacket { data: vec![] }),
        )
    }

    #[test]
    fn test_routing() {
        let mut registry = ControlRegistry::new();
        let source = registry.register(Source { received: 0 });
        let a = registry.register(listener("a"));
        let b = registry.register(listener("b"));

        assert_eq!(registry.dispatch(&nav()), 1);
        assert_eq!(registry.dispatch(&nav()), 1);

        // Nobody consumes scanner packets
        assert_eq!(registry.dispatch(&scan()), 0);
        assert_eq!(registry.num_dispatched(), 2);

        assert_eq!(registry.get(source).received, 2);
        assert_eq!(registry.get(a).poses.len(), 2);
        assert_eq!(registry.get(b).poses[1].translation().x, 2.0);

        assert!(registry.take_update_views());
        assert!(!registry.take_update_views());
    }

    #[test]
    fn test_lookup_and_clear() {
        let mut registry = ControlRegistry::new();
        registry.register(Source { received: 0 });
        let a = registry.register(listener("a"));

        registry.dispatch(&nav());
        assert_eq!(registry.names(), vec!["source", "a"]);
        assert!(registry.find("a").is_some());
        assert!(registry.find("missing").is_none());

        registry.get_mut(a).poses.push(RigidTransform::identity());
        registry.clear_all();
        assert!(registry.get(a).poses.is_empty());
        assert!(registry.take_update_views());

        let mut view = RecordingView::new();
        registry.render(&mut view);
        assert!(view.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_duplicate_name_panics() {
        let mut registry = ControlRegistry::new();
        registry.register(listener("a"));
        registry.register(listener("a"));
    }
}
