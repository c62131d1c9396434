//! Optional feature modules live here.
//!
//! Keep extensions decoupled from core paths; they only observe the engine.

pub mod plugins;

pub use plugins::{ChartPlugin, PluginContext, PluginEvent};
