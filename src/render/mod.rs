//! Map rasterization and output.
//!
//! The static scene is drawn once onto a [`Canvas`]; the snowfall animation
//! reuses it as the base of every frame.

mod canvas;
pub mod colors;
pub mod export;
pub mod scene;
pub mod snowfall;

pub use canvas::Canvas;
pub use export::{save_png, save_snowfall_gif, write_png, AnimationSummary};
pub use scene::{draw_santa_hat, MapScene, Marker};
pub use snowfall::{SnowParticle, SnowfallAnimator};
