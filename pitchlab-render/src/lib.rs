//! PitchLab Render: draws the four pitch charts to PNG.
//!
//! Rendering is a pure function of chart data and an immutable [`RenderStyle`]:
//! - [`Chart`] carries the prepared data for one chart kind
//! - [`ChartSink`] turns a [`ChartRequest`] into a file, one fixed path per kind
//! - [`PngSink`] is the bitmap implementation
//!
//! The drawing functions are generic over the plotters backend so the same code
//! serves PNG output and in-memory backends.

pub mod chart;
pub mod error;
pub mod pie;
pub mod scatter;
pub mod sink;
pub mod style;
pub mod violin;

pub use chart::{Chart, ChartKind, ChartRequest};
pub use error::RenderError;
pub use sink::{draw_chart, ChartSink, PngSink};
pub use style::RenderStyle;
