//! # Viewer
//!
//! The viewer owns every control and is the single entry point for the
//! outside world: the log or stream source pushes messages in with
//! [`Viewer::deliver`], a rendering backend pulls the scene out with
//! [`Viewer::render`] or [`Viewer::export_plot`].

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::{debug, info, warn};
use sensor_if::{replay::LogReader, SensorMessage};
use std::path::Path;

// Internal
use crate::bus::{ControlHandle, ControlRegistry};
use crate::control::{CameraControl, PoseControl, ScanControl, SceneControl};
use crate::params::ViewerExecParams;
use crate::plot::{PlotFrame, PlotView};
use crate::render::View;
use crate::scan::ScanDecoder;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

pub struct Viewer {
    registry: ControlRegistry,

    scene: ControlHandle<SceneControl>,
    pose: ControlHandle<PoseControl>,
    scan: ControlHandle<ScanControl>,
    cam: ControlHandle<CameraControl>,

    plot: PlotView,
}

/// Counters reported at the end of a replay.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplaySummary {
    pub num_messages: u64,
    pub num_view_updates: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Viewer {
    /// Build the viewer, loading the scanner calibration relative to
    /// `sw_root` when its path is relative.
    pub fn new(params: &ViewerExecParams, sw_root: Option<&Path>) -> Self {
        let calib_path = params.scan.resolved_calibration_path(sw_root);
        let decoder = ScanDecoder::from_params(&params.scan, &calib_path);

        Self::with_decoder(params, decoder)
    }

    /// Build the viewer around an already configured scanner decoder.
    pub fn with_decoder(params: &ViewerExecParams, decoder: ScanDecoder) -> Self {
        let mut registry = ControlRegistry::new();

        // Registration order is drawing order, the scene is the background
        let scene = registry.register(SceneControl::new(params.scene.clone()));
        let pose = registry.register(PoseControl::new(params.pose.clone()));
        let scan = registry.register(ScanControl::new(params.scan.clone(), decoder));
        let cam = registry.register(CameraControl::new(params.cam.clone()));

        for (control, colors) in &params.palettes {
            let palette = match registry.palette_mut(control) {
                Some(p) => p,
                None => {
                    warn!("Palette given for unknown control \"{}\"", control);
                    continue;
                }
            };

            for (role, color) in colors {
                match palette.set(role, *color) {
                    Ok(()) => debug!("{}.{} set to {}", control, role, color),
                    Err(e) => warn!("Cannot override the {} palette: {}", control, e),
                }
            }
        }

        let mut plot = PlotView::new(params.plot.terminal_size[0], params.plot.terminal_size[1]);
        plot.set_font(params.plot.font.clone());

        info!("Viewer ready with controls {:?}", registry.names());

        Self {
            registry,
            scene,
            pose,
            scan,
            cam,
            plot,
        }
    }

    /// Handle one sensor message. Returns true if the views should be
    /// redrawn.
    pub fn deliver(&mut self, message: &SensorMessage) -> bool {
        self.registry.dispatch(message);
        self.registry.take_update_views()
    }

    /// Play every remaining message of the reader through the viewer.
    pub fn replay(&mut self, reader: &mut LogReader) -> ReplaySummary {
        let mut summary = ReplaySummary::default();
        let mut last_decile = 0;

        while let Some(message) = reader.next_message() {
            summary.num_messages += 1;
            if self.deliver(message) {
                summary.num_view_updates += 1;
            }

            let decile = (reader.progress() * 10.0) as u32;
            if decile > last_decile {
                last_decile = decile;
                info!("Replay {:3}% ({} messages)", decile * 10, summary.num_messages);
            }
        }

        summary
    }

    /// Consume a pending view update request.
    pub fn take_update_views(&mut self) -> bool {
        self.registry.take_update_views()
    }

    /// Draw the whole scene in registration order.
    pub fn render(&self, view: &mut dyn View) {
        self.registry.render(view);
    }

    /// Project the scene through the scene camera into a 2D plot frame.
    pub fn export_plot(&mut self) -> PlotFrame {
        let scene = self.registry.get(self.scene);

        self.plot.set_camera(scene.camera());
        self.plot.transform(&scene.scene_transformation());
        self.registry.render(&mut self.plot);

        let num_skipped = self.plot.num_skipped_images();
        if num_skipped > 0 {
            debug!("{} images are not part of the plot", num_skipped);
        }

        self.plot.take_frame()
    }

    /// Drop the path, points and frames of every control.
    pub fn clear(&mut self) {
        info!("Clearing the viewer");
        self.registry.clear_all();
    }

    pub fn registry(&self) -> &ControlRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut ControlRegistry {
        &mut self.registry
    }

    pub fn scene_control(&self) -> &SceneControl {
        self.registry.get(self.scene)
    }

    pub fn pose_control(&self) -> &PoseControl {
        self.registry.get(self.pose)
    }

    pub fn scan_control(&self) -> &ScanControl {
        self.registry.get(self.scan)
    }

    pub fn scan_control_mut(&mut self) -> &mut ScanControl {
        self.registry.get_mut(self.scan)
    }

    pub fn cam_control(&self) -> &CameraControl {
        self.registry.get(self.cam)
    }

    pub fn cam_control_mut(&mut self) -> &mut CameraControl {
        self.registry.get_mut(self.cam)
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::control::{Control, POSE_CONTROL_NAME, SCENE_CONTROL_NAME};
    use crate::render::{Color, RecordingView};
    use approx::assert_abs_diff_eq;
    use chrono::{TimeZone, Utc};
    use image::{DynamicImage, GrayImage, Luma};
    use sensor_if::eqpt::cam::{CamImage, ImageFormat};
    use sensor_if::eqpt::nav::NavSolution;
    use sensor_if::SensorData;
    use std::collections::BTreeMap;

    fn viewer(params: &ViewerExecParams) -> Viewer {
        Viewer::with_decoder(params, ScanDecoder::new(None, 0.9, 120.0))
    }

    fn nav_message(i: i64, latitude_deg: f64) -> SensorMessage {
        SensorMessage::new(
            Utc.timestamp_millis(1_600_000_000_000 + 100 * i),
            SensorData::NavSolution(NavSolution {
                latitude_deg,
                longitude_deg: -122.0,
                altitude_m: 10.0,
                ..Default::default()
            }),
        )
    }

    fn cam_message(serial: &str, frame_id: u64) -> SensorMessage {
        let img = DynamicImage::ImageLuma8(GrayImage::from_pixel(64, 48, Luma([90])));
        SensorMessage::new(
            Utc.timestamp_millis(1_600_000_000_050),
            SensorData::CamImage(
                CamImage::from_image(serial, frame_id, &img, ImageFormat::Mono8).unwrap(),
            ),
        )
    }

    #[test]
    fn test_three_fixes_end_to_end() {
        let mut viewer = viewer(&ViewerExecParams::default());

        for (i, lat) in [37.0, 37.0001, 37.0002].iter().enumerate() {
            viewer.deliver(&nav_message(i as i64, *lat));
        }

        let path = viewer.pose_control().tracker().path();
        assert_eq!(path.len(), 3);
        assert_abs_diff_eq!(path[0].coords.norm(), 0.0, epsilon = 1e-6);

        // One ten-thousandth of a degree of latitude is about 11 m north
        assert!(path[1].y > 10.0 && path[1].y < 12.0);
        assert!(path[2].y > path[1].y);
        assert_abs_diff_eq!(path[2].x, 0.0, epsilon = 1e-3);
    }

    #[test]
    fn test_pose_reaches_listeners() {
        let mut viewer = viewer(&ViewerExecParams::default());
        viewer.deliver(&nav_message(0, 37.0));
        viewer.deliver(&nav_message(1, 37.0001));
        viewer.deliver(&cam_message("GX002408", 1));

        let mut view = RecordingView::new();
        viewer.cam_control().render(&mut view);

        // The camera frame follows the vehicle north
        let image = view
            .requests()
            .iter()
            .find(|r| matches!(r.primitive, crate::render::Primitive::Image { .. }))
            .unwrap();
        assert!(image.transform.translation().y > 10.0);
    }

    #[test]
    fn test_view_updates() {
        let mut viewer = viewer(&ViewerExecParams::default());

        assert!(viewer.deliver(&cam_message("GX002408", 1)));
        assert!(!viewer.deliver(&cam_message("GX002408", 1)));
        assert!(viewer.deliver(&cam_message("GX002408", 2)));
        assert!(!viewer.take_update_views());
    }

    #[test]
    fn test_replay() {
        let mut viewer = viewer(&ViewerExecParams::default());
        let mut reader = LogReader::from_messages(vec![
            nav_message(0, 37.0),
            cam_message("GX002537", 4),
            nav_message(1, 37.0001),
        ]);

        let summary = viewer.replay(&mut reader);

        assert_eq!(summary.num_messages, 3);
        assert!(summary.num_view_updates >= 1);
        assert!(reader.is_finished());
        assert_eq!(viewer.pose_control().tracker().path().len(), 2);
        assert_eq!(viewer.cam_control().frame_buffer().len(), 1);
    }

    #[test]
    fn test_palette_overrides() {
        let mut params = ViewerExecParams::default();
        let mut pose_colors = BTreeMap::new();
        pose_colors.insert(String::from("path"), Color::BLUE);
        pose_colors.insert(String::from("no_such_role"), Color::WHITE);
        params.palettes.insert(String::from(POSE_CONTROL_NAME), pose_colors);
        params.palettes.insert(String::from("no_such_control"), BTreeMap::new());

        let mut viewer = viewer(&params);
        viewer.deliver(&nav_message(0, 37.0));
        viewer.deliver(&nav_message(1, 37.0001));

        let mut view = RecordingView::new();
        viewer.pose_control().render(&mut view);
        assert_eq!(view.vertices_with_color(Color::BLUE), 2);
        assert_eq!(view.vertices_with_color(Color::RED), 0);
    }

    #[test]
    fn test_render_order() {
        let viewer = viewer(&ViewerExecParams::default());
        assert_eq!(viewer.registry().names()[0], SCENE_CONTROL_NAME);

        let mut view = RecordingView::new();
        viewer.render(&mut view);
        assert_eq!(view.texts()[3], "world");
    }

    #[test]
    fn test_export_plot() {
        let mut viewer = viewer(&ViewerExecParams::default());
        viewer.deliver(&nav_message(0, 37.0));
        viewer.deliver(&nav_message(1, 37.0001));
        viewer.deliver(&cam_message("GX002408", 1));

        let frame = viewer.export_plot();
        assert!(!frame.is_empty());
        assert!(frame.num_labels() > 0);

        // The plot view hands over each frame once
        let next = viewer.export_plot();
        assert_eq!(next.num_data_blocks(), frame.num_data_blocks());
    }

    #[test]
    fn test_clear() {
        let mut viewer = viewer(&ViewerExecParams::default());
        viewer.deliver(&nav_message(0, 37.0));
        viewer.deliver(&cam_message("GX002408", 1));

        viewer.clear();

        assert!(viewer.pose_control().tracker().path().is_empty());
        assert!(viewer.cam_control().frame_buffer().is_empty());
        assert!(viewer.take_update_views());
    }
}
