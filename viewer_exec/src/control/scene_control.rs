//! Scene control: world axes, ground grid and the viewing camera

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use nalgebra::{Matrix4, Point3, Vector3};
use serde::Deserialize;
use std::any::Any;
use std::f64::consts::PI;

// Internal
use super::Control;
use crate::plot::{ProjectionMode, ViewCamera};
use crate::pose::PoseSample;
use crate::render::{AxesStyle, Color, Palette, Primitive, RenderRequest, View};
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

pub const SCENE_CONTROL_NAME: &str = "scene";

/// Units: meters
const NAME_OFFSET_M: f64 = 0.5;

const GRID_EPSILON: f64 = 1e-9;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SceneParams {
    pub show_ground: bool,
    pub show_axes: bool,

    /// Units: meters
    pub ground_radius_m: f64,

    /// Units: meters
    pub ground_elevation_m: f64,

    /// Angle between the radial lines of the ground grid.
    ///
    /// Units: degrees
    pub ground_angle_step_deg: f64,

    /// Distance between the rings of the ground grid.
    ///
    /// Units: meters
    pub ground_range_step_m: f64,

    /// Units: meters
    pub axes_length_m: f64,

    /// Rotation of the whole scene as `[yaw, pitch, roll]`.
    ///
    /// Units: degrees
    pub scene_rotation_deg: [f64; 3],

    pub scene_scale: f64,

    /// Keep the vehicle at the centre of the scene.
    pub camera_follow: bool,

    pub camera: ViewCamera,
}

/// Draws the fixed world references and owns the viewing camera.
pub struct SceneControl {
    params: SceneParams,

    /// Translation applied to the scene, moved with the vehicle when the
    /// camera follows it
    scene_translation: Vector3<f64>,

    palette: Palette,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for SceneParams {
    fn default() -> Self {
        Self {
            show_ground: true,
            show_axes: true,
            ground_radius_m: 30.0,
            ground_elevation_m: 0.0,
            ground_angle_step_deg: 30.0,
            ground_range_step_m: 5.0,
            axes_length_m: 2.5,
            scene_rotation_deg: [-10.0, -5.0, 0.0],
            scene_scale: 1.0,
            camera_follow: false,
            camera: ViewCamera::new(
                ProjectionMode::Perspective,
                Point3::new(-20.0, 0.0, 0.0),
                Point3::origin(),
            )
            .with_range(0.1, 1000.0),
        }
    }
}

impl SceneControl {
    pub fn new(params: SceneParams) -> Self {
        Self {
            params,
            scene_translation: Vector3::zeros(),
            palette: Palette::default()
                .with("ground", Color::LIGHT_GRAY)
                .with("axes", Color::BLACK),
        }
    }

    pub fn camera(&self) -> &ViewCamera {
        &self.params.camera
    }

    pub fn camera_mut(&mut self) -> &mut ViewCamera {
        &mut self.params.camera
    }

    /// World to scene transformation: translation, then rotation by yaw,
    /// pitch and roll, then scale.
    pub fn scene_transformation(&self) -> Matrix4<f64> {
        let [yaw, pitch, roll] = self.params.scene_rotation_deg;

        let rotation = Matrix4::from_axis_angle(&Vector3::x_axis(), roll.to_radians())
            * Matrix4::from_axis_angle(&Vector3::y_axis(), pitch.to_radians())
            * Matrix4::from_axis_angle(&Vector3::z_axis(), yaw.to_radians());

        Matrix4::new_scaling(self.params.scene_scale)
            * rotation
            * Matrix4::new_translation(&self.scene_translation)
    }

    /// The ground grid: radial lines and one loop per range step.
    pub fn ground_lines(&self) -> Vec<Primitive> {
        let p = &self.params;
        let color = self.palette.color("ground");
        let angle_step = p.ground_angle_step_deg.to_radians();
        let mut lines = Vec::new();

        if angle_step <= 0.0 || p.ground_range_step_m <= 0.0 || p.ground_radius_m <= 0.0 {
            return lines;
        }

        let at = |range: f64, theta: f64| {
            Point3::new(range * theta.sin(), range * theta.cos(), p.ground_elevation_m)
        };

        // Whole divisions of the circle are tolerated up to rounding
        let num_radial = (2.0 * PI / angle_step - GRID_EPSILON).ceil() as usize;
        for i in 0..num_radial {
            let theta = -PI + i as f64 * angle_step;
            lines.push(Primitive::Line {
                points: vec![at(p.ground_range_step_m, theta), at(p.ground_radius_m, theta)],
                color,
                closed: false,
            });
        }

        let mut range = p.ground_range_step_m;
        loop {
            if range > p.ground_radius_m {
                range = p.ground_radius_m;
            }

            let theta_step = angle_step / range;
            let num_points = (2.0 * PI / theta_step + GRID_EPSILON).floor() as usize;
            lines.push(Primitive::Line {
                points: (0..num_points)
                    .map(|i| at(range, i as f64 * theta_step))
                    .collect(),
                color,
                closed: true,
            });

            if range >= p.ground_radius_m {
                break;
            }
            range += p.ground_range_step_m;
        }

        lines
    }
}

impl Control for SceneControl {
    fn name(&self) -> &str {
        SCENE_CONTROL_NAME
    }

    fn listens_to_pose(&self) -> bool {
        true
    }

    fn pose_update(&mut self, pose: &PoseSample) {
        if self.params.camera_follow {
            self.scene_translation = -pose.t_w_i.translation();
        }
    }

    fn render(&self, view: &mut dyn View) {
        if self.params.show_ground {
            for line in self.ground_lines() {
                view.render(RenderRequest::new(line, RigidTransform::identity()));
            }
        }

        if self.params.show_axes {
            AxesStyle::new(self.params.axes_length_m, self.palette.color("axes"))
                .named("world", NAME_OFFSET_M)
                .render(view, &RigidTransform::identity());
        }
    }

    fn clear(&mut self) {
        self.scene_translation = Vector3::zeros();
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
