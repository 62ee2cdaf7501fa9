//! View rendering primitives into projected, clipped 2D plot data

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

// External
use log::trace;
use nalgebra::{Matrix4, Point3, Vector3};
use serde::Deserialize;
use std::collections::BTreeMap;

// Internal
use super::{clip_polyline, is_visible, project, to_terminal, ViewCamera};
use crate::render::{Color, Primitive, RenderRequest, View};
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Points per unit of projected label height.
pub const LABEL_FONT_SCALE: f64 = 48.0;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// Font the plot labels are set in.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct PlotFont {
    pub family: String,

    /// Units: points
    pub size: f64,
}

/// A projected text label.
#[derive(Debug, Clone, PartialEq)]
pub struct PlotLabel {
    pub text: String,

    /// Terminal coordinates of the label origin
    pub position: Point3<f64>,

    /// Units: points
    pub font_size: f64,
}

/// Projected points with their gradient weights.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WeightedPoints {
    pub points: Vec<Point3<f64>>,
    pub weights: Vec<f64>,
}

/// A projected line strip with its gradient weight.
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedLine {
    pub points: Vec<Point3<f64>>,
    pub weight: f64,
}

/// Everything rendered into a [`PlotView`] since the last frame was taken.
///
/// Plain primitives are grouped by color name (`#rrggbb`), gradient
/// primitives by their palette, written `0 '#from', 1 '#to'`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PlotFrame {
    pub font: PlotFont,
    pub points: BTreeMap<String, Vec<Vec<Point3<f64>>>>,
    pub gradient_points: BTreeMap<String, Vec<WeightedPoints>>,
    pub lines: BTreeMap<String, Vec<Vec<Point3<f64>>>>,
    pub gradient_lines: BTreeMap<String, Vec<WeightedLine>>,
    pub labels: BTreeMap<String, Vec<PlotLabel>>,
}

/// A view projecting primitives onto a plot terminal.
///
/// Every request is drawn under `projection * transformation * request`,
/// where `transformation` is the view's own current transformation, kept
/// on a save/restore stack.
#[derive(Debug, Clone)]
pub struct PlotView {
    /// Units: terminal units (centimeters for the usual terminals)
    size: [f64; 2],

    font: PlotFont,

    projection: Matrix4<f64>,
    transformation: Matrix4<f64>,
    stack: Vec<Matrix4<f64>>,

    frame: PlotFrame,

    num_skipped_images: usize,
}

// ---------------------------------------------------------------------------
// ENUMERATIONS
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error, Clone, Copy, PartialEq)]
pub enum PlotError {
    #[error("Cannot restore a transformation, the transformation stack is empty")]
    EmptyTransformationStack,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl Default for PlotFont {
    fn default() -> Self {
        Self {
            family: String::from("Arial"),
            size: 10.0,
        }
    }
}

impl PlotFrame {
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
            && self.gradient_points.is_empty()
            && self.lines.is_empty()
            && self.gradient_lines.is_empty()
            && self.labels.is_empty()
    }

    /// Number of separate point sets and line strips.
    pub fn num_data_blocks(&self) -> usize {
        self.points.values().map(Vec::len).sum::<usize>()
            + self.gradient_points.values().map(Vec::len).sum::<usize>()
            + self.lines.values().map(Vec::len).sum::<usize>()
            + self.gradient_lines.values().map(Vec::len).sum::<usize>()
    }

    pub fn num_labels(&self) -> usize {
        self.labels.values().map(Vec::len).sum()
    }
}

impl PlotView {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: [width, height],
            font: PlotFont::default(),
            projection: Matrix4::identity(),
            transformation: Matrix4::identity(),
            stack: Vec::new(),
            frame: PlotFrame::default(),
            num_skipped_images: 0,
        }
    }

    pub fn size(&self) -> [f64; 2] {
        self.size
    }

    pub fn set_size(&mut self, width: f64, height: f64) {
        self.size = [width, height];
    }

    pub fn font(&self) -> &PlotFont {
        &self.font
    }

    pub fn set_font(&mut self, font: PlotFont) {
        self.font = font;
    }

    pub fn projection(&self) -> &Matrix4<f64> {
        &self.projection
    }

    pub fn set_projection(&mut self, projection: Matrix4<f64>) {
        self.projection = projection;
    }

    pub fn transformation(&self) -> &Matrix4<f64> {
        &self.transformation
    }

    pub fn set_transformation(&mut self, transformation: Matrix4<f64>) {
        self.transformation = transformation;
    }

    /// Look through the given camera, resetting the transformation stack.
    pub fn set_camera(&mut self, camera: &ViewCamera) {
        self.projection = camera.projection(self.size[0] / self.size[1]);
        self.transformation = camera.transformation();
        self.stack.clear();
    }

    pub fn save_transformation(&mut self) {
        self.stack.push(self.transformation);
    }

    pub fn restore_transformation(&mut self) -> Result<(), PlotError> {
        self.transformation = self
            .stack
            .pop()
            .ok_or(PlotError::EmptyTransformationStack)?;
        Ok(())
    }

    /// Post-multiply the current transformation.
    pub fn transform(&mut self, transformation: &Matrix4<f64>) {
        self.transformation *= transformation;
    }

    pub fn translate(&mut self, translation: &Vector3<f64>) {
        self.transform(&Matrix4::new_translation(translation));
    }

    /// Units: radians
    pub fn rotate(&mut self, yaw: f64, pitch: f64, roll: f64) {
        self.transform(&RigidTransform::from_ypr(yaw, pitch, roll).to_homogeneous());
    }

    pub fn scale(&mut self, scale: &Vector3<f64>) {
        self.transform(&Matrix4::new_nonuniform_scaling(scale));
    }

    /// Number of image primitives ignored since creation.
    pub fn num_skipped_images(&self) -> usize {
        self.num_skipped_images
    }

    /// Hand over everything rendered so far and start a new frame.
    pub fn take_frame(&mut self) -> PlotFrame {
        let mut frame = std::mem::take(&mut self.frame);
        frame.font = self.font.clone();
        frame
    }

    fn full_transform(&self) -> Matrix4<f64> {
        self.projection * self.transformation
    }

    fn render_points(&mut self, points: &[Point3<f64>], color: Color) {
        let t = self.full_transform();
        let projected: Vec<_> = points
            .iter()
            .filter_map(|p| project(p, &t, self.size))
            .collect();

        if !projected.is_empty() {
            self.frame
                .points
                .entry(color.name())
                .or_default()
                .push(projected);
        }
    }

    fn render_gradient_points(
        &mut self,
        points: &[Point3<f64>],
        weights: &[f64],
        from: Color,
        to: Color,
    ) {
        let t = self.full_transform();
        let mut set = WeightedPoints::default();

        for (p, w) in points.iter().zip(weights.iter()) {
            if let Some(p) = project(p, &t, self.size) {
                set.points.push(p);
                set.weights.push(*w);
            }
        }

        if !set.points.is_empty() {
            self.frame
                .gradient_points
                .entry(palette_key(from, to))
                .or_default()
                .push(set);
        }
    }

    fn render_line(&mut self, points: &[Point3<f64>], color: Color, closed: bool) {
        let t = self.full_transform();
        let strips = if closed && points.len() > 2 {
            let mut looped = points.to_vec();
            looped.push(points[0]);
            clip_polyline(&looped, &t, self.size)
        } else {
            clip_polyline(points, &t, self.size)
        };

        if !strips.is_empty() {
            self.frame
                .lines
                .entry(color.name())
                .or_default()
                .extend(strips);
        }
    }

    fn render_gradient_line(&mut self, points: &[Point3<f64>], weight: f64, from: Color, to: Color) {
        let t = self.full_transform();
        let strips = clip_polyline(points, &t, self.size);

        if !strips.is_empty() {
            self.frame
                .gradient_lines
                .entry(palette_key(from, to))
                .or_default()
                .extend(strips.into_iter().map(|points| WeightedLine { points, weight }));
        }
    }

    /// Labels always face the terminal: the rotation of the current
    /// transformation is replaced by its scale.
    fn render_text(&mut self, text: &str, position: &Point3<f64>, size: f64, color: Color) {
        if text.is_empty() {
            return;
        }

        let mut model = self.transformation
            * Matrix4::new_translation(&position.coords)
            * Matrix4::new_scaling(size);
        let scale = Vector3::new(model[(0, 0)], model[(1, 0)], model[(2, 0)]).norm();
        for i in 0..3 {
            for j in 0..3 {
                model[(i, j)] = if i == j { scale } else { 0.0 };
            }
        }

        let t = self.projection * model;
        let (p1, p2) = match (
            to_terminal(&Point3::origin(), &t, self.size),
            to_terminal(&Point3::new(0.0, 1.0, 0.0), &t, self.size),
        ) {
            (Some(p1), Some(p2)) => (p1, p2),
            _ => return,
        };

        if is_visible(&p1, self.size) | is_visible(&p2, self.size) {
            self.frame
                .labels
                .entry(color.name())
                .or_default()
                .push(PlotLabel {
                    text: text.to_string(),
                    position: p1,
                    font_size: (p2.y - p1.y) * LABEL_FONT_SCALE,
                });
        }
    }
}

impl View for PlotView {
    fn render(&mut self, request: RenderRequest) {
        let saved = self.transformation;
        self.transform(&request.transform.to_homogeneous());

        match &request.primitive {
            Primitive::Points { points, color, .. } => self.render_points(points, *color),
            Primitive::GradientPoints {
                points,
                weights,
                from,
                to,
                ..
            } => self.render_gradient_points(points, weights, *from, *to),
            Primitive::Line {
                points,
                color,
                closed,
            } => self.render_line(points, *color, *closed),
            Primitive::GradientLine {
                points,
                weight,
                from,
                to,
            } => self.render_gradient_line(points, *weight, *from, *to),
            Primitive::Text {
                text,
                position,
                size,
                color,
            } => self.render_text(text, position, *size, *color),
            Primitive::Image { .. } => {
                trace!("Image primitive skipped in plot output");
                self.num_skipped_images += 1;
            }
        }

        self.transformation = saved;
    }
}

// ---------------------------------------------------------------------------
// PRIVATE FUNCTIONS
// ---------------------------------------------------------------------------

fn palette_key(from: Color, to: Color) -> String {
    format!("0 '{}', 1 '{}'", from.name(), to.name())
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::plot::ProjectionMode;
    use crate::render::RecordingView;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    fn view() -> PlotView {
        PlotView::new(20.0, 10.0)
    }

    fn line(points: Vec<Point3<f64>>, color: Color) -> RenderRequest {
        RenderRequest::new(
            Primitive::Line {
                points,
                color,
                closed: false,
            },
            RigidTransform::identity(),
        )
    }

    #[test]
    fn test_points_grouped_by_color() {
        let mut v = view();
        let points = Arc::new(vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(5.0, 0.0, 0.0),
            Point3::new(0.5, 0.5, 0.5),
        ]);

        for color in [Color::RED, Color::RED, Color::GREEN].iter() {
            v.render(RenderRequest::new(
                Primitive::Points {
                    points: points.clone(),
                    color: *color,
                    size: 1.0,
                },
                RigidTransform::identity(),
            ));
        }

        let frame = v.take_frame();
        assert_eq!(frame.points["#ff0000"].len(), 2);
        assert_eq!(frame.points["#00ff00"].len(), 1);

        // The point outside the cube is dropped
        assert_eq!(frame.points["#ff0000"][0].len(), 2);

        // Taking the frame starts a new one
        assert!(v.take_frame().points.is_empty());
    }

    #[test]
    fn test_fully_hidden_primitives_leave_no_block() {
        let mut v = view();
        v.render(line(
            vec![Point3::new(2.0, 0.0, 0.0), Point3::new(3.0, 0.0, 0.0)],
            Color::RED,
        ));
        v.render(RenderRequest::new(
            Primitive::Points {
                points: Arc::new(vec![Point3::new(2.0, 0.0, 0.0)]),
                color: Color::RED,
                size: 1.0,
            },
            RigidTransform::identity(),
        ));

        assert!(v.take_frame().is_empty());
    }

    #[test]
    fn test_request_transform_applied() {
        let mut v = view();
        let shift = RigidTransform::from_translation(Vector3::new(0.5, 0.0, 0.0));

        v.render(RenderRequest::new(
            Primitive::Line {
                points: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(1.0, 0.0, 0.0)],
                color: Color::BLACK,
                closed: false,
            },
            shift,
        ));

        let frame = v.take_frame();
        let strip = &frame.lines["#000000"][0];
        assert_relative_eq!(strip[0].x, 15.0);
        assert_relative_eq!(strip[1].x, 20.0);

        // The request transform does not leak into the view
        assert_eq!(*v.transformation(), Matrix4::identity());
    }

    #[test]
    fn test_closed_loop() {
        let mut v = view();
        v.render(RenderRequest::new(
            Primitive::Line {
                points: vec![
                    Point3::new(0.0, 0.0, 0.0),
                    Point3::new(0.5, 0.0, 0.0),
                    Point3::new(0.5, 0.5, 0.0),
                ],
                color: Color::BLACK,
                closed: true,
            },
            RigidTransform::identity(),
        ));

        let frame = v.take_frame();
        let strip = &frame.lines["#000000"][0];
        assert_eq!(strip.len(), 4);
        assert_eq!(strip[0], strip[3]);
    }

    #[test]
    fn test_gradient_keys() {
        let mut v = view();
        v.render(RenderRequest::new(
            Primitive::GradientLine {
                points: vec![Point3::new(0.0, 0.0, 0.0), Point3::new(0.5, 0.0, 0.0)],
                weight: 0.3,
                from: Color::BLACK,
                to: Color::WHITE,
            },
            RigidTransform::identity(),
        ));
        v.render(RenderRequest::new(
            Primitive::GradientPoints {
                points: Arc::new(vec![Point3::new(0.0, 0.0, 0.0), Point3::new(9.0, 0.0, 0.0)]),
                weights: vec![0.1, 0.9],
                from: Color::BLACK,
                to: Color::WHITE,
                size: 1.0,
            },
            RigidTransform::identity(),
        ));

        let frame = v.take_frame();
        let key = "0 '#000000', 1 '#ffffff'";
        assert_eq!(frame.gradient_lines[key][0].weight, 0.3);
        assert_eq!(frame.gradient_points[key][0].weights, vec![0.1]);
    }

    #[test]
    fn test_text_font_size() {
        let mut v = view();
        v.set_font(PlotFont {
            family: String::from("Helvetica"),
            size: 12.0,
        });

        // A rotated frame does not rotate the label
        let transform = RigidTransform::from_ypr(1.0, 0.0, 0.0);
        v.render(RenderRequest::new(
            Primitive::Text {
                text: String::from("world"),
                position: Point3::new(0.0, 0.0, 0.0),
                size: 0.1,
                color: Color::BLACK,
            },
            transform,
        ));
        v.render(RenderRequest::new(
            Primitive::Text {
                text: String::new(),
                position: Point3::new(0.0, 0.0, 0.0),
                size: 0.1,
                color: Color::BLACK,
            },
            transform,
        ));

        let frame = v.take_frame();
        assert_eq!(frame.font.family, "Helvetica");

        let labels = &frame.labels["#000000"];
        assert_eq!(labels.len(), 1);
        assert_relative_eq!(labels[0].position, Point3::new(10.0, 5.0, 0.5));

        // 0.1 units high maps to 0.5 terminal units
        assert_relative_eq!(labels[0].font_size, 0.5 * LABEL_FONT_SCALE, epsilon = 1e-9);
    }

    #[test]
    fn test_transformation_stack() {
        let mut v = view();
        assert_eq!(
            v.restore_transformation(),
            Err(PlotError::EmptyTransformationStack)
        );

        v.save_transformation();
        v.translate(&Vector3::new(1.0, 2.0, 3.0));
        v.scale(&Vector3::new(2.0, 2.0, 2.0));
        assert_ne!(*v.transformation(), Matrix4::identity());

        v.restore_transformation().unwrap();
        assert_eq!(*v.transformation(), Matrix4::identity());
    }

    #[test]
    fn test_images_skipped() {
        let mut v = view();
        let mut recording = RecordingView::new();
        let request = RenderRequest::new(
            Primitive::Image {
                pixels: Arc::new(image::RgbaImage::new(2, 2)),
                width: 1.0,
                height: 1.0,
            },
            RigidTransform::identity(),
        );

        recording.render(request.clone());
        v.render(request);

        assert_eq!(recording.len(), 1);
        assert_eq!(v.num_skipped_images(), 1);
        assert!(v.take_frame().is_empty());
    }

    #[test]
    fn test_camera() {
        let mut v = view();
        let camera = ViewCamera::new(
            ProjectionMode::Perspective,
            Point3::new(-5.0, 0.0, 0.0),
            Point3::origin(),
        )
        .with_range(0.1, 100.0);
        v.set_camera(&camera);

        v.render(RenderRequest::new(
            Primitive::Points {
                points: Arc::new(vec![Point3::origin(), Point3::new(-10.0, 0.0, 0.0)]),
                color: Color::RED,
                size: 1.0,
            },
            RigidTransform::identity(),
        ));

        // The point behind the camera is dropped, the viewpoint is centred
        let frame = v.take_frame();
        let points = &frame.points["#ff0000"][0];
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0].x, 10.0, epsilon = 1e-9);
        assert_relative_eq!(points[0].y, 5.0, epsilon = 1e-9);
    }
}
