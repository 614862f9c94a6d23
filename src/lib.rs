//! Festive world maps of Santa Claus traditions.
//!
//! Each bundled location gets an ornament marker and a geodesic influence
//! circle, over a snow-covered land map dotted with snowflakes sampled
//! from the land outline. The classic map also gets an animated snowfall
//! GIF when the `animation` feature is enabled.

pub mod config;
pub mod error;
pub mod geo;
pub mod locations;
pub mod pipeline;
pub mod render;

pub use config::MapConfig;
pub use error::{AnimationError, MapError, Result};
pub use locations::{Location, LocationTable, MapVariant};
pub use pipeline::{run, MapPipeline, RunReport};
