//! The view capability and a recording implementation

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use super::{Color, Primitive};
use crate::transform::RigidTransform;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A primitive to draw and the transform from its local frame into the
/// frame of the view.
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub primitive: Primitive,
    pub transform: RigidTransform,
}

/// A view which keeps every request it receives, in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    requests: Vec<RenderRequest>,
}

// ---------------------------------------------------------------------------
// TRAITS
// ---------------------------------------------------------------------------

/// Anything primitives can be drawn into.
pub trait View {
    fn render(&mut self, request: RenderRequest);
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl RenderRequest {
    pub fn new(primitive: Primitive, transform: RigidTransform) -> Self {
        Self {
            primitive,
            transform,
        }
    }
}

impl View for RecordingView {
    fn render(&mut self, request: RenderRequest) {
        self.requests.push(request);
    }
}

impl RecordingView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn requests(&self) -> &[RenderRequest] {
        &self.requests
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Drop everything recorded so far, ready for the next frame.
    pub fn clear(&mut self) {
        self.requests.clear();
    }

    /// All text labels recorded, in order.
    pub fn texts(&self) -> Vec<&str> {
        self.requests
            .iter()
            .filter_map(|r| match &r.primitive {
                Primitive::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Total number of vertices of all requests drawn in `color`.
    pub fn vertices_with_color(&self, color: Color) -> usize {
        self.requests
            .iter()
            .filter(|r| match &r.primitive {
                Primitive::Points { color: c, .. }
                | Primitive::Line { color: c, .. }
                | Primitive::Text { color: c, .. } => *c == color,
                _ => false,
            })
            .map(|r| r.primitive.len())
            .sum()
    }
}
