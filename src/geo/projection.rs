//! Map projection and coordinate transformation.
//!
//! Handles converting geographic coordinates (lon/lat) to pixel positions
//! on the canvas. The whole globe is fitted and centered inside the canvas.

use geo_types::Coord;
use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Robinson table: (X, Y) at 5° latitude steps from 0° to 90°.
const ROBINSON_TABLE: [(f64, f64); 19] = [
    (1.0000, 0.0000),
    (0.9986, 0.0620),
    (0.9954, 0.1240),
    (0.9900, 0.1860),
    (0.9822, 0.2480),
    (0.9730, 0.3100),
    (0.9600, 0.3720),
    (0.9427, 0.4340),
    (0.9216, 0.4958),
    (0.8962, 0.5571),
    (0.8679, 0.6176),
    (0.8350, 0.6769),
    (0.7986, 0.7346),
    (0.7597, 0.7903),
    (0.7186, 0.8435),
    (0.6732, 0.8936),
    (0.6213, 0.9394),
    (0.5722, 0.9761),
    (0.5322, 1.0000),
];

const ROBINSON_X_SCALE: f64 = 0.8487;
const ROBINSON_Y_SCALE: f64 = 1.3523;

/// Supported projections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectionKind {
    /// Compromise world projection used for the finished map.
    #[default]
    Robinson,
    /// Plain lon/lat grid.
    PlateCarree,
}

impl ProjectionKind {
    /// Projects (lon, lat) in degrees to unscaled map units.
    ///
    /// Longitudes outside ±180° are projected as-is; callers wanting a
    /// wrapped position normalize first.
    pub fn forward(&self, coord: Coord<f64>) -> (f64, f64) {
        match self {
            ProjectionKind::Robinson => {
                let lat = coord.y.clamp(-90.0, 90.0);
                let abs_lat = lat.abs();
                let idx = ((abs_lat / 5.0).floor() as usize).min(ROBINSON_TABLE.len() - 2);
                let t = (abs_lat - idx as f64 * 5.0) / 5.0;
                let (x0, y0) = ROBINSON_TABLE[idx];
                let (x1, y1) = ROBINSON_TABLE[idx + 1];
                let px = x0 + (x1 - x0) * t;
                let py = y0 + (y1 - y0) * t;

                (
                    ROBINSON_X_SCALE * px * coord.x.to_radians(),
                    ROBINSON_Y_SCALE * py * lat.signum(),
                )
            }
            ProjectionKind::PlateCarree => (coord.x, coord.y.clamp(-90.0, 90.0)),
        }
    }

    /// Half-extents of the projected globe in map units.
    pub fn half_extent(&self) -> (f64, f64) {
        match self {
            ProjectionKind::Robinson => (ROBINSON_X_SCALE * std::f64::consts::PI, ROBINSON_Y_SCALE),
            ProjectionKind::PlateCarree => (180.0, 90.0),
        }
    }
}

/// Map projection for converting geographic to screen coordinates.
#[derive(Debug, Clone)]
pub struct MapProjection {
    /// Projection used for geographic coordinates
    pub kind: ProjectionKind,
    /// Canvas size in pixels
    pub screen_size: Vec2,
    /// Pixels per projected map unit
    pub scale: f64,
    /// Pixel position of (0°, 0°)
    pub center: Vec2,
}

impl MapProjection {
    /// Fits the whole globe inside a `width` x `height` canvas, leaving
    /// `margin_px` on the tighter axis.
    pub fn fit(kind: ProjectionKind, width: u32, height: u32, margin_px: f32) -> Self {
        let (half_x, half_y) = kind.half_extent();
        let usable_w = (width as f64 - 2.0 * margin_px as f64).max(1.0);
        let usable_h = (height as f64 - 2.0 * margin_px as f64).max(1.0);
        let scale = (usable_w / (2.0 * half_x)).min(usable_h / (2.0 * half_y));

        Self {
            kind,
            screen_size: Vec2::new(width as f32, height as f32),
            scale,
            center: Vec2::new(width as f32 / 2.0, height as f32 / 2.0),
        }
    }

    /// Converts geographic coordinates (lon, lat) to screen position.
    pub fn geo_to_screen(&self, coord: Coord<f64>) -> Vec2 {
        let (x, y) = self.kind.forward(coord);
        // Screen Y increases downward
        Vec2::new(
            self.center.x + (x * self.scale) as f32,
            self.center.y - (y * self.scale) as f32,
        )
    }

    /// Pixel rectangle enclosing the projected globe as (min, max).
    pub fn globe_bounds(&self) -> (Vec2, Vec2) {
        let (half_x, half_y) = self.kind.half_extent();
        let half = Vec2::new((half_x * self.scale) as f32, (half_y * self.scale) as f32);
        (self.center - half, self.center + half)
    }

    /// Converts axes-relative coordinates (0..1, origin bottom-left of the
    /// globe bounds) to a screen position.
    pub fn axes_to_screen(&self, ax: f32, ay: f32) -> Vec2 {
        let (min, max) = self.globe_bounds();
        Vec2::new(min.x + ax * (max.x - min.x), max.y - ay * (max.y - min.y))
    }

    /// Pixels per degree of latitude at the equator, for sizing glyphs given
    /// in degrees.
    pub fn px_per_degree(&self) -> f32 {
        let a = self.geo_to_screen(Coord { x: 0.0, y: 0.0 });
        let b = self.geo_to_screen(Coord { x: 0.0, y: 1.0 });
        (a - b).length()
    }

    /// Outline of the projected globe, as a closed ring of geographic
    /// coordinates tracing the ±180° meridians.
    pub fn globe_outline(&self, steps: usize) -> Vec<Coord<f64>> {
        let steps = steps.max(2);
        let lat_at = |i: usize| -90.0 + 180.0 * i as f64 / steps as f64;

        let east = (0..=steps).map(|i| Coord { x: 180.0, y: lat_at(i) });
        let west = (0..=steps).rev().map(|i| Coord { x: -180.0, y: lat_at(i) });
        let mut ring: Vec<Coord<f64>> = east.chain(west).collect();
        if let Some(first) = ring.first().copied() {
            ring.push(first);
        }
        ring
    }

    /// Checks if a pixel-space bounding box intersects the canvas.
    pub fn bbox_visible(&self, min: Vec2, max: Vec2) -> bool {
        let margin = 1.0;
        !(max.x < -margin
            || min.x > self.screen_size.x + margin
            || max.y < -margin
            || min.y > self.screen_size.y + margin)
    }
}
