//! Labelled coordinate axes

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use nalgebra::Point3;

use super::{Color, Primitive, RenderRequest, View};
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// CONSTANTS
// ---------------------------------------------------------------------------

/// Ratio of the label size to the axes length.
pub const AXES_LABEL_RATIO: f64 = 0.2;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// How a frame's axes are drawn.
#[derive(Debug, Clone, PartialEq)]
pub struct AxesStyle {
    /// Units: meters
    pub length: f64,

    pub color: Color,

    /// Name of the frame, drawn above the tip of the Z axis
    pub name: Option<String>,

    /// Gap between the tip of the Z axis and the name.
    ///
    /// Units: meters
    pub name_offset: f64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl AxesStyle {
    pub fn new(length: f64, color: Color) -> Self {
        Self {
            length,
            color,
            name: None,
            name_offset: 0.0,
        }
    }

    pub fn named(mut self, name: &str, offset: f64) -> Self {
        self.name = Some(name.to_string());
        self.name_offset = offset;
        self
    }

    /// Emit the three axes with `x`, `y`, `z` at their tips, and the name
    /// if there is one.
    pub fn render(&self, view: &mut dyn View, transform: &RigidTransform) {
        let origin = Point3::origin();
        let label_size = AXES_LABEL_RATIO * self.length;

        let tips = [
            ("x", Point3::new(self.length, 0.0, 0.0)),
            ("y", Point3::new(0.0, self.length, 0.0)),
            ("z", Point3::new(0.0, 0.0, self.length)),
        ];

        for (label, tip) in tips.iter() {
            view.render(RenderRequest::new(
                Primitive::Line {
                    points: vec![origin, *tip],
                    color: self.color,
                    closed: false,
                },
                *transform,
            ));
            view.render(RenderRequest::new(
                Primitive::Text {
                    text: label.to_string(),
                    position: *tip,
                    size: label_size,
                    color: self.color,
                },
                *transform,
            ));
        }

        if let Some(ref name) = self.name {
            view.render(RenderRequest::new(
                Primitive::Text {
                    text: name.clone(),
                    position: Point3::new(0.0, 0.0, self.length + self.name_offset),
                    size: label_size,
                    color: self.color,
                },
                *transform,
            ));
        }
    }
}

// ---------------------------------------------------------------------------
// TESTS
// ---------------------------------------------------------------------------

#[cfg(test)]
mod test {
    use super::*;
    use crate::render::RecordingView;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    #[test]
    fn test_axes() {
        let mut view = RecordingView::new();
        let transform = RigidTransform::from_translation(Vector3::new(1.0, 2.0, 3.0));

        AxesStyle::new(2.5, Color::GREEN)
            .named("poslv", 0.5)
            .render(&mut view, &transform);

        assert_eq!(view.len(), 7);
        assert_eq!(view.texts(), vec!["x", "y", "z", "poslv"]);
        assert!(view.requests().iter().all(|r| r.transform == transform));

        match &view.requests()[6].primitive {
            Primitive::Text { position, size, .. } => {
                assert_relative_eq!(position.z, 3.0);
                assert_relative_eq!(*size, 0.5);
            }
            p => panic!("Expected a text primitive, got {:?}", p),
        }
    }

    #[test]
    fn test_render_is_repeatable() {
        let style = AxesStyle::new(0.5, Color::BLACK);
        let mut a = RecordingView::new();
        let mut b = RecordingView::new();
        style.render(&mut a, &RigidTransform::identity());
        style.render(&mut b, &RigidTransform::identity());

        assert_eq!(a.len(), 6);
        assert_eq!(a.len(), b.len());
    }
}
