//! # Plot module
//!
//! The vector-plot export path: a view which projects and clips primitives
//! into 2D terminal coordinates, grouped by color for a plot file writer.

// ---------------------------------------------------------------------------
// MODULES
// ---------------------------------------------------------------------------

mod camera;
mod plot_view;
mod projection;

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

pub use camera::*;
pub use plot_view::*;
pub use projection::*;
