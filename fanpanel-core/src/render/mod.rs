//! Curve chart rendering
//!
//! - [`surface`] - the [`Surface`] drawing trait and the recording [`DisplayList`]
//! - [`geometry`] - data-space to pixel-space mapping
//! - [`chart`] - the curve chart itself
//! - [`svg`] - SVG export of a recorded frame

pub mod chart;
pub mod geometry;
pub mod surface;
mod svg;

pub use chart::render;
pub use geometry::{ChartGeometry, DEFAULT_HEIGHT, DEFAULT_WIDTH, MARGIN};
pub use surface::{Color, DisplayList, DrawCommand, Point, Stroke, Surface, TextAlign, TextStyle};
