//! # Render module
//!
//! The contract between the controls and any rendering backend. Controls
//! turn their current state into [`RenderRequest`]s, each a [`Primitive`]
//! and the transform to draw it under, and hand them to a [`View`].
//! Rendering never mutates the control.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod axes;
mod palette;
mod primitive;
mod view;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use axes::*;
pub use palette::*;
pub use primitive::*;
pub use view::*;
