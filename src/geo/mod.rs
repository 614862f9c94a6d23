//! Geographic computation for the map.
//!
//! This module loads land and border layers, builds the land union used for
//! containment tests, generates geodesic circles, samples points on land,
//! and projects lon/lat coordinates onto the canvas.

pub mod geodesic;
pub mod land;
mod layer;
mod projection;
pub mod sampler;

pub use geodesic::{geodesic_circle, great_circle_distance_km, normalize_longitude};
pub use land::{LandMask, Region};
pub use layer::{GeoFeature, GeoLayer, GeoLayerSet, GeoLayerType};
pub use projection::{MapProjection, ProjectionKind};
pub use sampler::{sample_points_in_region, LandSample, SamplerConfig};
