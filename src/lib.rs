//! chart-map-rs: series geometry and incremental redraw core for charts.
//!
//! Map series join sparse values onto shape geometry, track their bounding
//! boxes and translate paths into pixel space, falling back to a group-level
//! transform when only pan or zoom changed. Column pyramids and compared
//! line series share the same axis model and render contract.

pub mod api;
pub mod core;
pub mod error;
pub mod extensions;
pub mod render;
pub mod series;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
