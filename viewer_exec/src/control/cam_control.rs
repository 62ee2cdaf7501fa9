//! Camera control

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::debug;
use nalgebra::{Point3, Vector3};
use sensor_if::eqpt::cam::{ImageDecoder, StdImageDecoder};
use sensor_if::{MessageKind, SensorData, SensorMessage};
use std::any::Any;
use std::collections::BTreeMap;

// Internal
use super::{Control, Event};
use crate::cam::{grid_layout, CamParams, FrameBuffer, FrameUpdate};
use crate::pose::PoseSample;
use crate::render::{AxesStyle, Color, Palette, Primitive, RenderRequest, View};
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

pub const CAM_CONTROL_NAME: &str = "cameras";

/// Pixels per meter of a camera image drawn in the world.
pub const IMAGE_PIXELS_PER_M: f64 = 1000.0;

/// Units: meters
const NAME_OFFSET_M: f64 = 0.1;

/// Height of the serial labels on the tile display.
///
/// Units: pixels
const TILE_LABEL_SIZE: f64 = 16.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Keeps the latest frame of every camera and draws them in the world or
/// as a grid of tiles.
pub struct CameraControl {
    params: CamParams,

    buffer: FrameBuffer,
    decoder: Box<dyn ImageDecoder>,

    /// Camera to IMU, by serial
    mounts: BTreeMap<String, RigidTransform>,

    t_w_i: RigidTransform,

    palette: Palette,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl CameraControl {
    pub fn new(params: CamParams) -> Self {
        Self::with_decoder(params, Box::new(StdImageDecoder))
    }

    pub fn with_decoder(params: CamParams, decoder: Box<dyn ImageDecoder>) -> Self {
        let mounts = params
            .cameras
            .iter()
            .map(|c| (c.serial.clone(), RigidTransform::from_params(&c.t_i_c)))
            .collect();

        Self {
            buffer: FrameBuffer::new(params.rendering_rate),
            decoder,
            mounts,
            params,
            t_w_i: RigidTransform::identity(),
            palette: Palette::default().with("axes", Color::RED),
        }
    }

    pub fn frame_buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    pub fn set_rendering_rate(&mut self, rendering_rate: usize) {
        self.params.rendering_rate = rendering_rate;
        self.buffer.set_rendering_rate(rendering_rate);
    }

    /// Camera to IMU transform of a camera, identity for unknown cameras.
    pub fn t_i_c(&self, serial: &str) -> RigidTransform {
        self.mounts.get(serial).copied().unwrap_or_default()
    }

    /// Draw the stored frames as a grid of tiles on a 2D display, in pixels
    /// centred on the display.
    pub fn render_tiles(&self, view: &mut dyn View) {
        let tiles = grid_layout(self.buffer.serials(), self.params.display_size);

        for tile in tiles.iter() {
            let frame = match self.buffer.get(&tile.serial) {
                Some(f) => f,
                None => continue,
            };

            view.render(RenderRequest::new(
                Primitive::Image {
                    pixels: frame.pixels.clone(),
                    width: tile.size[0],
                    height: tile.size[1],
                },
                RigidTransform::from_translation(Vector3::new(tile.origin[0], tile.origin[1], 0.0)),
            ));
            view.render(RenderRequest::new(
                Primitive::Text {
                    text: tile.serial.clone(),
                    position: Point3::new(tile.label[0], tile.label[1], 0.0),
                    size: TILE_LABEL_SIZE,
                    color: Color::WHITE,
                },
                RigidTransform::identity(),
            ));
        }
    }
}

impl Control for CameraControl {
    fn name(&self) -> &str {
        CAM_CONTROL_NAME
    }

    fn consumes(&self) -> &[MessageKind] {
        &[MessageKind::CamImage]
    }

    fn listens_to_pose(&self) -> bool {
        true
    }

    fn message_read(&mut self, message: &SensorMessage, events: &mut Vec<Event>) {
        let image = match message.data {
            SensorData::CamImage(ref i) => i,
            _ => return,
        };

        if !self.mounts.contains_key(&image.serial) {
            debug!("Frame from unmounted camera {}", image.serial);
        }

        if let FrameUpdate::Replaced = self.buffer.offer(image, self.decoder.as_ref()) {
            events.push(Event::UpdateViews);
        }
    }

    fn pose_update(&mut self, pose: &PoseSample) {
        self.t_w_i = pose.t_w_i;
    }

    fn render(&self, view: &mut dyn View) {
        let axes = AxesStyle::new(self.params.axes_length_m, self.palette.color("axes"));

        // Mounted cameras are always drawn, frames from unknown cameras at the IMU
        let unmounted = self.buffer.serials().filter(|s| !self.mounts.contains_key(*s));
        for serial in self.mounts.keys().map(|s| s.as_str()).chain(unmounted) {
            let t_w_c = self.t_w_i * self.t_i_c(serial);

            match self.buffer.get(serial) {
                Some(frame) if self.params.show_images => view.render(RenderRequest::new(
                    Primitive::Image {
                        pixels: frame.pixels.clone(),
                        width: frame.width as f64 / IMAGE_PIXELS_PER_M,
                        height: frame.height as f64 / IMAGE_PIXELS_PER_M,
                    },
                    t_w_c,
                )),
                _ => (),
            }

            if self.params.show_axes {
                axes.clone()
                    .named(serial, NAME_OFFSET_M)
                    .render(view, &t_w_c);
            }
        }
    }

    fn clear(&mut self) {
        self.buffer.clear();
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

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::RecordingView;
    use chrono::Utc;
    use image::{DynamicImage, GrayImage, Luma};
    use sensor_if::eqpt::cam::{CamImage, ImageFormat};

    fn message(serial: &str, frame_id: u64) -> SensorMessage {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(640, 480, Luma([50])));
        SensorMessage::new(
            Utc::now(),
            SensorData::CamImage(CamImage::from_image(serial, frame_id, &img, ImageFormat::Mono8).unwrap()),
        )
    }

    fn images(view: &RecordingView) -> Vec<&RenderRequest> {
        view.requests()
            .iter()
            .filter(|r| matches!(r.primitive, Primitive::Image { .. }))
            .collect()
    }

    #[test]
    fn test_duplicate_frame_no_update() {
        let mut control = CameraControl::new(CamParams::default());
        let mut events = Vec::new();

        control.message_read(&message("GX002408", 1), &mut events);
        assert_eq!(events, vec![Event::UpdateViews]);

        let mut before = RecordingView::new();
        control.render(&mut before);

        control.message_read(&message("GX002408", 1), &mut events);
        assert_eq!(events.len(), 1);

        let mut after = RecordingView::new();
        control.render(&mut after);
        assert_eq!(before.len(), after.len());
    }

    #[test]
    fn test_image_in_world() {
        let mut control = CameraControl::new(CamParams::default());
        let mut events = Vec::new();

        control.pose_update(&PoseSample {
            timestamp: Utc::now(),
            t_w_i: RigidTransform::from_translation(Vector3::new(10.0, 0.0, 0.0)),
            yaw_rad: 0.0,
            pitch_rad: 0.0,
            roll_rad: 0.0,
            linear_velocity_ms: Vector3::zeros(),
            angular_velocity_rads: Vector3::zeros(),
            linear_accel_mss: Vector3::zeros(),
        });
        control.message_read(&message("GX002409", 3), &mut events);

        let mut view = RecordingView::new();
        control.render(&mut view);

        let images = images(&view);
        assert_eq!(images.len(), 1);
        match images[0].primitive {
            Primitive::Image { width, height, .. } => {
                assert_eq!((width, height), (0.64, 0.48));
            }
            _ => unreachable!(),
        }

        // Camera mounted 0.332 m forward of the IMU
        approx::assert_relative_eq!(images[0].transform.translation().x, 10.332);
        assert!(view.texts().contains(&"GX002409"));
    }

    #[test]
    fn test_axes_without_frames() {
        let mut control = CameraControl::new(CamParams::default());

        let mut view = RecordingView::new();
        control.render(&mut view);

        let names = |view: &RecordingView| -> Vec<String> {
            view.texts()
                .into_iter()
                .filter(|t| !["x", "y", "z"].contains(t))
                .map(String::from)
                .collect()
        };
        assert!(images(&view).is_empty());
        assert_eq!(
            names(&view),
            vec![
                "GX002408", "GX002409", "GX002536", "GX002537", "GX002538", "GX002539",
                "GX002540", "GX002541"
            ]
        );

        // Unmounted cameras come after the mounted ones
        let mut events = Vec::new();
        control.message_read(&message("A", 1), &mut events);
        let mut view = RecordingView::new();
        control.render(&mut view);
        assert_eq!(images(&view).len(), 1);
        assert_eq!(images(&view)[0].transform, RigidTransform::identity());
        assert_eq!(names(&view).last().map(|s| s.as_str()), Some("A"));
        assert_eq!(names(&view).len(), 9);

        let mut hidden = CameraControl::new(CamParams {
            show_axes: false,
            ..Default::default()
        });
        let mut view = RecordingView::new();
        hidden.render(&mut view);
        assert!(view.is_empty());
        hidden.message_read(&message("GX002408", 1), &mut events);
        hidden.render(&mut view);
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn test_tiles() {
        let mut control = CameraControl::new(CamParams {
            display_size: [800.0, 400.0],
            ..Default::default()
        });
        let mut events = Vec::new();
        control.message_read(&message("B", 1), &mut events);
        control.message_read(&message("A", 1), &mut events);

        let mut view = RecordingView::new();
        control.render_tiles(&mut view);

        assert_eq!(view.texts(), vec!["A", "B"]);
        let images = images(&view);
        assert_eq!(images[1].transform.translation().x, -200.0);
        assert_eq!(control.t_i_c("A"), RigidTransform::identity());
    }

    #[test]
    fn test_clear() {
        let mut control = CameraControl::new(CamParams::default());
        let mut events = Vec::new();
        control.message_read(&message("A", 1), &mut events);
        control.clear();

        let mut view = RecordingView::new();
        control.render(&mut view);
        assert!(images(&view).is_empty());
        assert!(control.frame_buffer().is_empty());
    }
}
