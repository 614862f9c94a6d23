//! Raster canvas backed by tiny-skia.
//!
//! Geometry arrives in lon/lat and is projected through a [`MapProjection`].
//! Marker sizes are given in points (1/72 inch) and scaled by the canvas
//! resolution.

use crate::error::{MapError, Result};
use crate::geo::MapProjection;
use geo_types::{Coord, LineString, Polygon};
use glam::Vec2;
use image::{Rgba, RgbaImage};
use tiny_skia::{
    Color, FillRule, LineCap, LineJoin, Mask, Paint, Path, PathBuilder, Pixmap, Stroke, Transform,
};

/// Latitude steps used to trace the globe outline.
const OUTLINE_STEPS: usize = 90;

/// Bezier handle length for a quarter circle.
const BEZIER_K: f32 = 0.552_284_8;

/// A pixmap paired with the projection used to place geometry on it.
#[derive(Clone)]
pub struct Canvas {
    pixmap: Pixmap,
    projection: MapProjection,
    px_per_pt: f32,
    /// Clip to the projected globe, set once the ocean is painted.
    globe_clip: Option<Mask>,
}

impl Canvas {
    /// Creates a transparent canvas.
    pub fn new(width: u32, height: u32, projection: MapProjection, px_per_pt: f32) -> Result<Self> {
        let pixmap = Pixmap::new(width, height).ok_or(MapError::InvalidCanvas { width, height })?;
        Ok(Self {
            pixmap,
            projection,
            px_per_pt,
            globe_clip: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    pub fn projection(&self) -> &MapProjection {
        &self.projection
    }

    /// Converts points to pixels.
    pub fn pt_to_px(&self, pt: f32) -> f32 {
        pt * self.px_per_pt
    }

    /// Radius in pixels of a round marker whose area is given in pt².
    pub fn marker_radius(&self, area_pt2: f32) -> f32 {
        area_pt2.max(0.0).sqrt() / 2.0 * self.px_per_pt
    }

    /// Screen position of a lon/lat coordinate.
    pub fn to_screen(&self, coord: Coord<f64>) -> Vec2 {
        self.projection.geo_to_screen(coord)
    }

    /// Paints the whole canvas.
    pub fn fill_background(&mut self, color: Color) {
        self.pixmap.fill(color);
    }

    /// Fills the projected globe and clips later geographic drawing to it.
    pub fn fill_globe(&mut self, color: Color) {
        let outline = self.projection.globe_outline(OUTLINE_STEPS);
        let Some(path) = self.ring_path(&outline, 0.0) else {
            return;
        };

        self.pixmap.fill_path(
            &path,
            &paint(color),
            FillRule::Winding,
            Transform::identity(),
            None,
        );

        if let Some(mut mask) = Mask::new(self.width(), self.height()) {
            mask.fill_path(&path, FillRule::Winding, true, Transform::identity());
            self.globe_clip = Some(mask);
        }
    }

    /// Fills a polygon, leaving its holes empty.
    pub fn fill_polygon(&mut self, polygon: &Polygon<f64>, color: Color) {
        let mut pb = PathBuilder::new();
        self.push_ring(&mut pb, &polygon.exterior().0, 0.0);
        for interior in polygon.interiors() {
            self.push_ring(&mut pb, &interior.0, 0.0);
        }
        if let Some(path) = pb.finish() {
            self.pixmap.fill_path(
                &path,
                &paint(color),
                FillRule::EvenOdd,
                Transform::identity(),
                self.globe_clip.as_ref(),
            );
        }
    }

    /// Strokes every ring of a polygon.
    pub fn stroke_polygon(&mut self, polygon: &Polygon<f64>, color: Color, width_pt: f32) {
        let mut pb = PathBuilder::new();
        self.push_ring(&mut pb, &polygon.exterior().0, 0.0);
        for interior in polygon.interiors() {
            self.push_ring(&mut pb, &interior.0, 0.0);
        }
        if let Some(path) = pb.finish() {
            self.stroke(&path, color, width_pt);
        }
    }

    /// Strokes an open line.
    pub fn stroke_line_string(&mut self, line: &LineString<f64>, color: Color, width_pt: f32) {
        if line.0.len() < 2 {
            return;
        }

        let points: Vec<Vec2> = line.0.iter().map(|c| self.to_screen(*c)).collect();
        if !self.screen_visible(&points) {
            return;
        }

        let mut pb = PathBuilder::new();
        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                pb.move_to(p.x, p.y);
            } else {
                pb.line_to(p.x, p.y);
            }
        }
        if let Some(path) = pb.finish() {
            self.stroke(&path, color, width_pt);
        }
    }

    /// Fills a closed lon/lat ring whose longitudes may run past ±180°.
    ///
    /// The parts past the antimeridian are drawn again shifted by 360° so
    /// they reappear on the opposite edge of the globe.
    pub fn fill_geo_ring(&mut self, ring: &[Coord<f64>], color: Color) {
        if ring.len() < 3 {
            return;
        }

        let (min_lon, max_lon) = ring.iter().fold((f64::MAX, f64::MIN), |(lo, hi), c| {
            (lo.min(c.x), hi.max(c.x))
        });

        let mut shifts = vec![0.0];
        if max_lon > 180.0 {
            shifts.push(-360.0);
        }
        if min_lon < -180.0 {
            shifts.push(360.0);
        }

        let paint = paint(color);
        for shift in shifts {
            if let Some(path) = self.ring_path(ring, shift) {
                self.pixmap.fill_path(
                    &path,
                    &paint,
                    FillRule::Winding,
                    Transform::identity(),
                    self.globe_clip.as_ref(),
                );
            }
        }
    }

    /// Fills a polygon given in screen pixels.
    pub fn fill_screen_polygon(&mut self, points: &[Vec2], color: Color) {
        if let Some(path) = screen_polygon_path(points) {
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Strokes the outline of a polygon given in screen pixels.
    pub fn stroke_screen_polygon(&mut self, points: &[Vec2], color: Color, width_pt: f32) {
        if let Some(path) = screen_polygon_path(points) {
            self.stroke(&path, color, width_pt);
        }
    }

    /// Fills a rounded rectangle given by its screen corners.
    pub fn fill_rounded_rect(&mut self, min: Vec2, max: Vec2, radius: f32, color: Color) {
        if let Some(path) = rounded_rect_path(min, max, radius) {
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Fills a circle in screen pixels.
    pub fn fill_circle(&mut self, center: Vec2, radius: f32, color: Color) {
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) {
            self.pixmap
                .fill_path(&path, &paint(color), FillRule::Winding, Transform::identity(), None);
        }
    }

    /// Strokes a circle in screen pixels.
    pub fn stroke_circle(&mut self, center: Vec2, radius: f32, color: Color, width_pt: f32) {
        if let Some(path) = PathBuilder::from_circle(center.x, center.y, radius) {
            self.stroke(&path, color, width_pt);
        }
    }

    /// Draws a six-armed snowflake of the given radius, clipped to the globe
    /// once it has been filled.
    pub fn draw_snowflake(&mut self, center: Vec2, radius: f32, color: Color) {
        if radius <= 0.0 {
            return;
        }

        let mut pb = PathBuilder::new();
        for arm in 0..3 {
            let angle = arm as f32 * std::f32::consts::FRAC_PI_3 + std::f32::consts::FRAC_PI_2;
            let d = Vec2::new(angle.cos(), angle.sin()) * radius;
            pb.move_to(center.x - d.x, center.y - d.y);
            pb.line_to(center.x + d.x, center.y + d.y);
        }

        if let Some(path) = pb.finish() {
            let stroke = Stroke {
                width: (radius * 0.35).max(0.5),
                line_cap: LineCap::Round,
                line_join: LineJoin::Round,
                ..Default::default()
            };
            self.pixmap.stroke_path(
                &path,
                &paint(color),
                &stroke,
                Transform::identity(),
                self.globe_clip.as_ref(),
            );
        }
    }

    /// Copies the canvas into an unpremultiplied RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut image = RgbaImage::new(self.width(), self.height());
        for (dst, src) in image.pixels_mut().zip(self.pixmap.pixels()) {
            let c = src.demultiply();
            *dst = Rgba([c.red(), c.green(), c.blue(), c.alpha()]);
        }
        image
    }

    fn stroke(&mut self, path: &Path, color: Color, width_pt: f32) {
        let stroke = Stroke {
            width: self.pt_to_px(width_pt),
            line_cap: LineCap::Round,
            line_join: LineJoin::Round,
            ..Default::default()
        };
        self.pixmap.stroke_path(
            path,
            &paint(color),
            &stroke,
            Transform::identity(),
            self.globe_clip.as_ref(),
        );
    }

    /// Quick bounding box check before building a path.
    fn screen_visible(&self, points: &[Vec2]) -> bool {
        let (min, max) = points.iter().fold(
            (Vec2::splat(f32::MAX), Vec2::splat(f32::MIN)),
            |(min, max), p| (min.min(*p), max.max(*p)),
        );
        self.projection.bbox_visible(min, max)
    }

    fn ring_path(&self, ring: &[Coord<f64>], lon_shift: f64) -> Option<Path> {
        let mut pb = PathBuilder::new();
        self.push_ring(&mut pb, ring, lon_shift);
        pb.finish()
    }

    fn push_ring(&self, pb: &mut PathBuilder, ring: &[Coord<f64>], lon_shift: f64) {
        if ring.len() < 3 {
            return;
        }

        let points: Vec<Vec2> = ring
            .iter()
            .map(|c| {
                self.to_screen(Coord {
                    x: c.x + lon_shift,
                    y: c.y,
                })
            })
            .collect();
        if !self.screen_visible(&points) {
            return;
        }

        for (i, p) in points.iter().enumerate() {
            if i == 0 {
                pb.move_to(p.x, p.y);
            } else {
                pb.line_to(p.x, p.y);
            }
        }
        pb.close();
    }
}

fn paint(color: Color) -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color(color);
    paint.anti_alias = true;
    paint
}

fn screen_polygon_path(points: &[Vec2]) -> Option<Path> {
    let (first, rest) = points.split_first()?;
    let mut pb = PathBuilder::new();
    pb.move_to(first.x, first.y);
    for p in rest {
        pb.line_to(p.x, p.y);
    }
    pb.close();
    pb.finish()
}

/// Build a rounded rectangle path using cubic bezier corners
fn rounded_rect_path(min: Vec2, max: Vec2, radius: f32) -> Option<Path> {
    let (x0, x1) = (min.x.min(max.x), min.x.max(max.x));
    let (y0, y1) = (min.y.min(max.y), min.y.max(max.y));
    let r = radius.clamp(0.0, ((x1 - x0) / 2.0).min((y1 - y0) / 2.0));
    let k = r * BEZIER_K;

    let mut pb = PathBuilder::new();
    pb.move_to(x0 + r, y0);
    pb.line_to(x1 - r, y0);
    pb.cubic_to(x1 - r + k, y0, x1, y0 + r - k, x1, y0 + r);
    pb.line_to(x1, y1 - r);
    pb.cubic_to(x1, y1 - r + k, x1 - r + k, y1, x1 - r, y1);
    pb.line_to(x0 + r, y1);
    pb.cubic_to(x0 + r - k, y1, x0, y1 - r + k, x0, y1 - r);
    pb.line_to(x0, y0 + r);
    pb.cubic_to(x0, y0 + r - k, x0 + r - k, y0, x0 + r, y0);
    pb.close();
    pb.finish()
}
