//! Static map scene.
//!
//! Draw order, back to front: night sky, ocean, land and coastlines,
//! borders, land snowflakes, influence circles, ornaments, Santa hats.

use super::canvas::Canvas;
use super::colors::{self, Rgb};
use crate::error::Result;
use crate::geo::{geodesic_circle, GeoFeature, GeoLayer, GeoLayerSet, GeoLayerType};
use crate::locations::{Location, LocationTable};
use geo_types::Coord;
use glam::Vec2;

/// Marker sizes in pt².
const GLOW_SIZE: f32 = 260.0;
const BODY_SIZE: f32 = 95.0;
const SHINE_SIZE: f32 = 18.0;
const SNOWFLAKE_SIZE: f32 = 18.0;
const DOT_SIZE: f32 = 6.0;

const OCEAN_ALPHA: f32 = 0.95;
const LAND_ALPHA: f32 = 0.98;
const BORDER_ALPHA: f32 = 0.8;
const CIRCLE_ALPHA: f32 = 0.12;
const GLOW_ALPHA: f32 = 0.20;
const BODY_ALPHA: f32 = 0.98;
const SHINE_ALPHA: f32 = 0.65;
const DOT_ALPHA: f32 = 0.08;

/// White rim around each bauble, in points.
const BODY_RIM_PT: f32 = 1.4;
/// Shine highlight offset from the location, in degrees (lon, lat).
const SHINE_OFFSET: (f64, f64) = (-1.0, 0.6);
/// Hat size in degrees.
pub const HAT_SCALE_DEG: f64 = 1.6;

/// One location ready to draw.
#[derive(Debug, Clone)]
pub struct Marker {
    pub location: Location,
    pub color: Rgb,
    /// Geodesic influence circle around the location.
    pub circle: Vec<Coord<f64>>,
}

/// Everything the static map draws.
#[derive(Debug, Clone)]
pub struct MapScene {
    pub layers: GeoLayerSet,
    /// Sampled land points, drawn as faint snowflakes.
    pub snowflakes: Vec<Coord<f64>>,
    pub snowflake_alpha: f32,
    /// Markers grouped by tradition, traditions in sorted order.
    pub markers: Vec<Marker>,
}

impl MapScene {
    /// Assigns tradition colors and builds an influence circle per location.
    pub fn new(
        table: &LocationTable,
        layers: GeoLayerSet,
        snowflakes: Vec<Coord<f64>>,
        buffer_km: f64,
        circle_samples: usize,
    ) -> Result<Self> {
        let traditions = table.traditions();
        let color_map = colors::tradition_color_map(&traditions);

        let mut markers = Vec::with_capacity(table.len());
        for tradition in &traditions {
            let color = color_map
                .get(tradition)
                .copied()
                .unwrap_or(colors::FESTIVE_PALETTE[0]);
            for location in table.by_tradition(tradition) {
                markers.push(Marker {
                    location: *location,
                    color,
                    circle: geodesic_circle(location.coord(), buffer_km, circle_samples)?,
                });
            }
        }

        log::debug!(
            "Scene has {} markers across {} traditions",
            markers.len(),
            traditions.len()
        );

        Ok(Self {
            layers,
            snowflakes,
            snowflake_alpha: 0.12,
            markers,
        })
    }

    /// Sets the opacity of the land snowflakes.
    pub fn with_snowflake_alpha(mut self, alpha: f32) -> Self {
        self.snowflake_alpha = alpha;
        self
    }

    /// Draws the full static map.
    pub fn draw(&self, canvas: &mut Canvas) {
        draw_base(canvas);
        for layer in self.layers.iter() {
            if layer.visible {
                draw_layer(canvas, layer);
            }
        }
        self.draw_land_snowflakes(canvas);
        self.draw_influence_circles(canvas);
        self.draw_ornaments(canvas);
        self.draw_santa_hats(canvas);
    }

    fn draw_land_snowflakes(&self, canvas: &mut Canvas) {
        let flake_radius = canvas.marker_radius(SNOWFLAKE_SIZE);
        let dot_radius = canvas.marker_radius(DOT_SIZE);
        let flake = colors::map::SNOWFLAKE.with_alpha(self.snowflake_alpha);
        let dot = Rgb::WHITE.with_alpha(DOT_ALPHA);

        for (i, coord) in self.snowflakes.iter().enumerate() {
            let p = canvas.to_screen(*coord);
            canvas.draw_snowflake(p, flake_radius, flake);
            if i % 2 == 0 {
                canvas.fill_circle(p, dot_radius, dot);
            }
        }
    }

    fn draw_influence_circles(&self, canvas: &mut Canvas) {
        for marker in &self.markers {
            canvas.fill_geo_ring(&marker.circle, marker.color.with_alpha(CIRCLE_ALPHA));
        }
    }

    /// Glows, bodies and shines go down in separate passes so no marker's
    /// glow covers a neighbouring bauble.
    fn draw_ornaments(&self, canvas: &mut Canvas) {
        let glow_radius = canvas.marker_radius(GLOW_SIZE);
        let body_radius = canvas.marker_radius(BODY_SIZE);
        let shine_radius = canvas.marker_radius(SHINE_SIZE);

        for marker in &self.markers {
            let p = canvas.to_screen(marker.location.coord());
            canvas.fill_circle(p, glow_radius, marker.color.with_alpha(GLOW_ALPHA));
        }

        for marker in &self.markers {
            let p = canvas.to_screen(marker.location.coord());
            canvas.fill_circle(p, body_radius, marker.color.with_alpha(BODY_ALPHA));
            canvas.stroke_circle(p, body_radius, Rgb::WHITE.with_alpha(BODY_ALPHA), BODY_RIM_PT);
        }

        for marker in &self.markers {
            let coord = marker.location.coord();
            let shine = canvas.to_screen(Coord {
                x: coord.x + SHINE_OFFSET.0,
                y: coord.y + SHINE_OFFSET.1,
            });
            canvas.fill_circle(shine, shine_radius, Rgb::WHITE.with_alpha(SHINE_ALPHA));
        }
    }

    fn draw_santa_hats(&self, canvas: &mut Canvas) {
        for marker in self.markers.iter().filter(|m| m.location.special_icon) {
            draw_santa_hat(canvas, marker.location.coord(), HAT_SCALE_DEG);
        }
    }
}

fn draw_base(canvas: &mut Canvas) {
    canvas.fill_background(colors::map::BACKGROUND.opaque());
    canvas.fill_globe(colors::map::OCEAN.with_alpha(OCEAN_ALPHA));
}

fn draw_layer(canvas: &mut Canvas, layer: &GeoLayer) {
    let stroke_color = match layer.layer_type {
        GeoLayerType::Land => layer.effective_color().opaque(),
        GeoLayerType::Borders => layer.effective_color().with_alpha(BORDER_ALPHA),
    };
    let width = layer.effective_line_width();

    if layer.layer_type == GeoLayerType::Land {
        let fill = colors::map::LAND.with_alpha(LAND_ALPHA);
        for polygon in layer.polygons() {
            canvas.fill_polygon(polygon, fill);
        }
    }

    for feature in &layer.features {
        match feature {
            GeoFeature::Polygon(polygon, _) => canvas.stroke_polygon(polygon, stroke_color, width),
            GeoFeature::LineString(line) => canvas.stroke_line_string(line, stroke_color, width),
            GeoFeature::Point(..) => {}
        }
    }
}

/// Draws a Santa hat just above `coord`: red cone, white brim, pom-pom.
///
/// `scale_deg` sets the hat size in degrees.
pub fn draw_santa_hat(canvas: &mut Canvas, coord: Coord<f64>, scale_deg: f64) {
    let x0 = coord.x;
    let y0 = coord.y + 0.9;
    let at = |dx: f64, dy: f64| {
        Coord {
            x: x0 + dx * scale_deg,
            y: y0 + dy * scale_deg,
        }
    };

    let cone: Vec<Vec2> = [at(-0.55, -0.10), at(0.55, -0.10), at(0.10, 0.95)]
        .into_iter()
        .map(|c| canvas.to_screen(c))
        .collect();
    canvas.fill_screen_polygon(&cone, colors::markers::HAT_RED.opaque());
    canvas.stroke_screen_polygon(&cone, colors::markers::TRIM.opaque(), 0.9);

    let px_per_deg = canvas.projection().px_per_degree();
    let brim_min = canvas.to_screen(at(-0.62, -0.08));
    let brim_max = canvas.to_screen(at(0.62, -0.30));
    canvas.fill_rounded_rect(
        brim_min,
        brim_max,
        0.12 * scale_deg as f32 * px_per_deg,
        colors::markers::TRIM.opaque(),
    );

    let pom = canvas.to_screen(at(0.15, 0.93));
    canvas.fill_circle(
        pom,
        0.16 * scale_deg as f32 * px_per_deg,
        colors::markers::TRIM.opaque(),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{LandMask, MapProjection, ProjectionKind};
    use crate::locations::MapVariant;
    use image::Rgba;

    fn scene(variant: MapVariant) -> MapScene {
        let (_, land) = LandMask::bundled().unwrap();
        MapScene::new(
            &variant.locations(),
            GeoLayerSet::new(land),
            Vec::new(),
            350.0,
            60,
        )
        .unwrap()
    }

    fn canvas() -> Canvas {
        let projection = MapProjection::fit(ProjectionKind::Robinson, 620, 380, 8.0);
        Canvas::new(620, 380, projection, 40.0 / 72.0).unwrap()
    }

    #[test]
    fn test_markers_grouped_by_tradition() {
        let scene = scene(MapVariant::Extended);
        assert_eq!(scene.markers.len(), 15);

        let traditions: Vec<&str> = scene.markers.iter().map(|m| m.location.tradition).collect();
        let mut sorted = traditions.clone();
        sorted.sort();
        assert_eq!(traditions, sorted);

        for marker in &scene.markers {
            assert_eq!(marker.circle.len(), 60);
        }
    }

    #[test]
    fn test_southern_marker_is_teal() {
        let scene = scene(MapVariant::Classic);
        let surfing = scene
            .markers
            .iter()
            .find(|m| m.location.name == "Surfing Santa")
            .unwrap();
        assert_eq!(surfing.color, colors::SUMMER_TEAL);
    }

    #[test]
    fn test_draw_paints_layers() {
        let scene = scene(MapVariant::Classic);
        let mut canvas = canvas();
        scene.draw(&mut canvas);
        let image = canvas.to_rgba_image();

        // Corner is night sky
        let bg = colors::map::BACKGROUND;
        assert_eq!(*image.get_pixel(0, 0), Rgba([bg.0, bg.1, bg.2, 255]));

        // Every pixel is opaque once the background is down
        assert!(image.pixels().all(|p| p[3] == 255));

        // Central Sahara is land-colored
        let sahara = canvas.to_screen(Coord { x: 15.0, y: 22.0 });
        let px = image.get_pixel(sahara.x as u32, sahara.y as u32);
        assert!(px[0] > 200 && px[1] > 200 && px[2] > 200, "{px:?}");
    }

    fn marker_at(name: &'static str, lon: f64, color: Rgb) -> Marker {
        Marker {
            location: Location {
                name,
                tradition: name,
                place: "",
                lat: 0.0,
                lon,
                note: "",
                special_icon: false,
            },
            color,
            circle: Vec::new(),
        }
    }

    #[test]
    fn test_glow_stays_under_neighbouring_body() {
        let red = Rgb(204, 38, 51);
        let blue = Rgb(89, 179, 219);
        let scene = MapScene {
            layers: GeoLayerSet::new(GeoLayer::new(GeoLayerType::Land)),
            snowflakes: Vec::new(),
            snowflake_alpha: 0.0,
            markers: vec![marker_at("Red", 0.0, red), marker_at("Blue", 10.0, blue)],
        };

        // One pixel per degree and per point, (0°, 0°) at pixel (180, 90)
        let projection = MapProjection::fit(ProjectionKind::PlateCarree, 360, 180, 0.0);
        let mut canvas = Canvas::new(360, 180, projection, 1.0).unwrap();
        canvas.fill_background(Rgb(0, 0, 0).opaque());
        scene.draw_ornaments(&mut canvas);
        let image = canvas.to_rgba_image();

        // Inside the red body and inside the blue glow
        let px = image.get_pixel(182, 90);
        assert!(px[0] > 190, "{px:?}");
        assert!(px[2] < 60, "{px:?}");
    }

    #[test]
    fn test_hat_is_drawn_above_location() {
        let mut canvas = canvas();
        canvas.fill_background(Rgb(0, 0, 0).opaque());
        let coord = Coord { x: 0.0, y: 0.0 };
        draw_santa_hat(&mut canvas, coord, 8.0);
        let image = canvas.to_rgba_image();

        // Inside the cone, above the brim
        let inside = canvas.to_screen(Coord { x: 0.0, y: 0.9 + 8.0 * 0.3 });
        let px = image.get_pixel(inside.x as u32, inside.y as u32);
        assert_eq!(
            (px[0], px[1], px[2]),
            (colors::markers::HAT_RED.0, colors::markers::HAT_RED.1, colors::markers::HAT_RED.2)
        );
    }
}
