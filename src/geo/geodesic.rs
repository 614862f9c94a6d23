//! Great-circle geometry on a spherical Earth.
//!
//! Influence circles are generated with the direct geodesic problem on a
//! sphere of mean Earth radius. Longitudes are left continuous (they may run
//! past ±180°) so a ring crossing the antimeridian stays a single polygon;
//! use [`normalize_longitude`] when wrapped values are needed.

use crate::error::{MapError, Result};
use geo_types::Coord;

/// Mean Earth radius in kilometers (IUGG).
pub const EARTH_RADIUS_KM: f64 = 6371.0088;

/// Wraps a longitude into `[-180, 180)`.
pub fn normalize_longitude(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Great-circle distance between two (lon, lat) coordinates in kilometers.
///
/// Uses the haversine formula, which stays well-conditioned for both small
/// and antipodal separations.
pub fn great_circle_distance_km(a: Coord<f64>, b: Coord<f64>) -> f64 {
    let lat1 = a.y.to_radians();
    let lat2 = b.y.to_radians();
    let dlat = lat2 - lat1;
    let dlon = (b.x - a.x).to_radians();

    let h = (dlat / 2.0).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().min(1.0).asin()
}

/// Point reached by travelling `distance_km` from `start` along `bearing_deg`
/// (clockwise from north).
///
/// The returned longitude is `start.x` plus the signed longitude change, so
/// it is not wrapped.
pub fn destination_point(start: Coord<f64>, bearing_deg: f64, distance_km: f64) -> Coord<f64> {
    let lat1 = start.y.to_radians();
    let bearing = bearing_deg.to_radians();
    let delta = distance_km / EARTH_RADIUS_KM;

    let sin_lat2 = lat1.sin() * delta.cos() + lat1.cos() * delta.sin() * bearing.cos();
    let lat2 = sin_lat2.clamp(-1.0, 1.0).asin();

    let dlon = (bearing.sin() * delta.sin() * lat1.cos()).atan2(delta.cos() - lat1.sin() * sin_lat2);

    Coord {
        x: start.x + dlon.to_degrees(),
        y: lat2.to_degrees().clamp(-90.0, 90.0),
    }
}

/// Ring of `n_samples` points at `radius_km` around `center`.
///
/// Azimuths step from 360° down to 0° inclusive, so the first and last
/// points coincide and the ring is closed. Centers at or near the poles are
/// accepted; the projected shape is distorted there but still valid.
pub fn geodesic_circle(
    center: Coord<f64>,
    radius_km: f64,
    n_samples: usize,
) -> Result<Vec<Coord<f64>>> {
    if !radius_km.is_finite() || radius_km < 0.0 {
        return Err(MapError::InvalidRadius(radius_km));
    }

    let step = if n_samples > 1 {
        360.0 / (n_samples - 1) as f64
    } else {
        0.0
    };

    Ok((0..n_samples)
        .map(|i| destination_point(center, 360.0 - step * i as f64, radius_km))
        .collect())
}
