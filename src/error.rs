//! Error types for map generation.
//!
//! Static-output failures are `MapError`s and propagate to the caller.
//! Animation failures have their own type so callers can tell a missing
//! encoder apart from one that broke mid-stream.

use std::io;
use std::path::PathBuf;

/// Result type for map generation.
pub type Result<T> = std::result::Result<T, MapError>;

/// Errors raised while building geometry or writing the static map.
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    /// Geodesic radius was negative, NaN or infinite.
    #[error("invalid geodesic radius: {0} km")]
    InvalidRadius(f64),

    /// Bundled or user-provided GeoJSON could not be parsed.
    #[error("failed to parse GeoJSON land data: {0}")]
    GeoJson(#[from] geojson::Error),

    /// A shapefile could not be read.
    #[error("failed to read shapefile {path}: {source}")]
    Shapefile {
        path: PathBuf,
        #[source]
        source: shapefile::Error,
    },

    /// Land data loaded but contained no polygons.
    #[error("land layer contains no polygons")]
    EmptyLand,

    /// Canvas dimensions that the rasterizer rejects.
    #[error("invalid canvas size {width}x{height}")]
    InvalidCanvas { width: u32, height: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}

/// Why the snowfall animation could not be written.
#[derive(Debug, thiserror::Error)]
pub enum AnimationError {
    /// The crate was built without the `animation` feature.
    #[error("GIF encoder unavailable (built without the `animation` feature)")]
    EncoderUnavailable,

    /// The encoder started but failed while writing frames.
    #[error("GIF encoding failed: {0}")]
    Encode(#[from] image::ImageError),

    #[error("I/O error while writing animation: {0}")]
    Io(#[from] io::Error),

    /// The base frame could not be prepared.
    #[error("could not prepare animation frames: {0}")]
    Frame(#[from] MapError),
}

impl AnimationError {
    /// Returns true when the failure is a missing encoder rather than a crash.
    pub fn is_encoder_missing(&self) -> bool {
        matches!(self, AnimationError::EncoderUnavailable)
    }
}
