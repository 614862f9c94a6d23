//! Geographic layer data structures.

use crate::error::{MapError, Result};
use crate::render::colors::{self, Rgb};
use geo::Contains;
use geo_types::{Coord, LineString, Point, Polygon};
use geojson::{Feature, FeatureCollection, GeoJson, Geometry, Value};
use shapefile::dbase::FieldValue;
use std::io::Cursor;
use std::path::Path;

/// Type of geographic layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeoLayerType {
    Land,
    Borders,
}

impl GeoLayerType {
    /// Returns the default stroke color for this layer type.
    pub fn default_color(&self) -> Rgb {
        match self {
            GeoLayerType::Land => colors::map::COAST,
            GeoLayerType::Borders => colors::map::BORDER,
        }
    }

    /// Returns the default line width (points) for this layer type.
    pub fn default_line_width(&self) -> f32 {
        match self {
            GeoLayerType::Land => 0.8,
            GeoLayerType::Borders => 0.6,
        }
    }
}

/// A geographic feature that can be rendered.
#[derive(Debug, Clone)]
pub enum GeoFeature {
    /// A series of connected line segments (for boundaries)
    LineString(LineString<f64>),
    /// A polygon with optional label
    Polygon(Polygon<f64>, Option<String>),
    /// A single point with optional label
    Point(Point<f64>, Option<String>),
}

/// A geographic layer containing multiple features.
#[derive(Debug, Clone)]
pub struct GeoLayer {
    /// Type of this layer
    pub layer_type: GeoLayerType,
    /// Features in this layer
    pub features: Vec<GeoFeature>,
    /// Override color (None = use default)
    pub color: Option<Rgb>,
    /// Override line width (None = use default)
    pub line_width: Option<f32>,
    /// Whether this layer is drawn
    pub visible: bool,
}

impl GeoLayer {
    /// Creates a new empty layer of the specified type.
    pub fn new(layer_type: GeoLayerType) -> Self {
        Self {
            layer_type,
            features: Vec::new(),
            color: None,
            line_width: None,
            visible: true,
        }
    }

    /// Returns the effective color for this layer.
    pub fn effective_color(&self) -> Rgb {
        self.color.unwrap_or_else(|| self.layer_type.default_color())
    }

    /// Returns the effective line width for this layer.
    pub fn effective_line_width(&self) -> f32 {
        self.line_width
            .unwrap_or_else(|| self.layer_type.default_line_width())
    }

    /// All polygons in this layer.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        self.features.iter().filter_map(|f| match f {
            GeoFeature::Polygon(poly, _) => Some(poly),
            _ => None,
        })
    }

    /// Reads a `.shp` file and its sibling `.dbf` (if present) from disk.
    pub fn load_from_shapefile_path(&mut self, shp_path: &Path) -> Result<()> {
        let shp_bytes = std::fs::read(shp_path)?;
        let dbf_bytes = std::fs::read(shp_path.with_extension("dbf")).ok();
        if dbf_bytes.is_none() {
            log::debug!("No .dbf next to {}, loading without labels", shp_path.display());
        }

        self.load_from_shapefile(&shp_bytes, dbf_bytes.as_deref())
            .map_err(|source| MapError::Shapefile {
                path: shp_path.to_path_buf(),
                source,
            })
    }

    /// Loads features from shapefile contents (.shp and optional .dbf bytes).
    pub fn load_from_shapefile(
        &mut self,
        shp_bytes: &[u8],
        dbf_bytes: Option<&[u8]>,
    ) -> std::result::Result<(), shapefile::Error> {
        let mut shape_reader = shapefile::ShapeReader::new(Cursor::new(shp_bytes))?;

        // Attribute records are only used for labels
        let dbf_records: Option<Vec<shapefile::dbase::Record>> = dbf_bytes.and_then(|bytes| {
            shapefile::dbase::Reader::new(Cursor::new(bytes))
                .ok()
                .and_then(|mut r: shapefile::dbase::Reader<Cursor<&[u8]>>| r.read().ok())
        });

        for (idx, result) in shape_reader.iter_shapes().enumerate() {
            let shape: shapefile::Shape = result?;

            let label = dbf_records
                .as_ref()
                .and_then(|records| records.get(idx))
                .and_then(record_label);

            self.features.extend(convert_shapefile_shape(&shape, label));
        }

        Ok(())
    }

    /// Loads features from GeoJSON text.
    pub fn load_from_geojson(&mut self, geojson_str: &str) -> Result<()> {
        let geojson: GeoJson = geojson_str.parse()?;

        match geojson {
            GeoJson::FeatureCollection(fc) => self.load_feature_collection(fc),
            GeoJson::Feature(f) => self.features.extend(convert_feature(&f)),
            GeoJson::Geometry(g) => self.features.extend(convert_geometry(&g, None)),
        }

        Ok(())
    }

    fn load_feature_collection(&mut self, fc: FeatureCollection) {
        for feature in fc.features {
            self.features.extend(convert_feature(&feature));
        }
    }
}

fn record_label(record: &shapefile::dbase::Record) -> Option<String> {
    for field_name in ["NAME", "name", "Name", "ADMIN", "featurecla"] {
        if let Some(FieldValue::Character(Some(s))) = record.get(field_name) {
            return Some(s.trim().to_string());
        }
    }
    None
}

fn ring_from_points(points: &[shapefile::Point]) -> LineString<f64> {
    points.iter().map(|p| Coord { x: p.x, y: p.y }).collect()
}

fn convert_shapefile_shape(shape: &shapefile::Shape, label: Option<String>) -> Vec<GeoFeature> {
    match shape {
        shapefile::Shape::Point(p) => {
            vec![GeoFeature::Point(Point::new(p.x, p.y), label)]
        }
        shapefile::Shape::Polyline(pl) => pl
            .parts()
            .iter()
            .map(|part| GeoFeature::LineString(ring_from_points(part)))
            .collect(),
        shapefile::Shape::Polygon(poly) => {
            use shapefile::PolygonRing;

            let mut outers: Vec<(LineString<f64>, Vec<LineString<f64>>)> = Vec::new();
            let mut holes: Vec<LineString<f64>> = Vec::new();

            for ring in poly.rings() {
                let coords = ring_from_points(ring.points());
                match ring {
                    PolygonRing::Outer(_) => outers.push((coords, Vec::new())),
                    PolygonRing::Inner(_) => holes.push(coords),
                }
            }

            // Each hole belongs to the outer ring that contains its first vertex
            for hole in holes {
                let Some(first) = hole.0.first().copied() else {
                    continue;
                };
                let owner = outers.iter_mut().find(|(exterior, _)| {
                    Polygon::new(exterior.clone(), Vec::new()).contains(&Point::from(first))
                });
                match owner {
                    Some((_, interiors)) => interiors.push(hole),
                    None => log::debug!("Dropping orphan hole with {} vertices", hole.0.len()),
                }
            }

            outers
                .into_iter()
                .map(|(exterior, interiors)| {
                    GeoFeature::Polygon(Polygon::new(exterior, interiors), label.clone())
                })
                .collect()
        }
        _ => Vec::new(),
    }
}

fn convert_feature(feature: &Feature) -> Vec<GeoFeature> {
    let label = feature
        .properties
        .as_ref()
        .and_then(|p| p.get("name").or_else(|| p.get("NAME")))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string());

    feature
        .geometry
        .as_ref()
        .map(|g| convert_geometry(g, label))
        .unwrap_or_default()
}

fn line_from_positions(positions: &[Vec<f64>]) -> LineString<f64> {
    positions
        .iter()
        .filter(|c| c.len() >= 2)
        .map(|c| Coord { x: c[0], y: c[1] })
        .collect()
}

fn polygon_from_rings(rings: &[Vec<Vec<f64>>]) -> Option<Polygon<f64>> {
    let (exterior, interiors) = rings.split_first()?;
    Some(Polygon::new(
        line_from_positions(exterior),
        interiors.iter().map(|r| line_from_positions(r)).collect(),
    ))
}

fn convert_geometry(geometry: &Geometry, label: Option<String>) -> Vec<GeoFeature> {
    match &geometry.value {
        Value::Point(c) if c.len() >= 2 => {
            vec![GeoFeature::Point(Point::new(c[0], c[1]), label)]
        }
        Value::Point(_) => Vec::new(),
        Value::MultiPoint(points) => points
            .iter()
            .filter(|c| c.len() >= 2)
            .map(|c| GeoFeature::Point(Point::new(c[0], c[1]), label.clone()))
            .collect(),
        Value::LineString(coords) => vec![GeoFeature::LineString(line_from_positions(coords))],
        Value::MultiLineString(lines) => lines
            .iter()
            .map(|line| GeoFeature::LineString(line_from_positions(line)))
            .collect(),
        Value::Polygon(rings) => polygon_from_rings(rings)
            .map(|p| GeoFeature::Polygon(p, label))
            .into_iter()
            .collect(),
        Value::MultiPolygon(polygons) => polygons
            .iter()
            .filter_map(|rings| polygon_from_rings(rings))
            .map(|p| GeoFeature::Polygon(p, label.clone()))
            .collect(),
        Value::GeometryCollection(geometries) => geometries
            .iter()
            .flat_map(|g| convert_geometry(g, label.clone()))
            .collect(),
    }
}

/// Collection of all geographic layers.
#[derive(Debug, Clone)]
pub struct GeoLayerSet {
    pub land: GeoLayer,
    pub borders: Option<GeoLayer>,
}

impl GeoLayerSet {
    /// Creates a layer set around an already loaded land layer.
    pub fn new(land: GeoLayer) -> Self {
        Self {
            land,
            borders: None,
        }
    }

    /// Returns an iterator over all loaded layers, back to front.
    pub fn iter(&self) -> impl Iterator<Item = &GeoLayer> {
        [Some(&self.land), self.borders.as_ref()].into_iter().flatten()
    }

    /// Loads the borders layer from a shapefile on disk.
    pub fn load_borders_from_shapefile(&mut self, shp_path: &Path) -> Result<()> {
        let mut layer = GeoLayer::new(GeoLayerType::Borders);
        layer.load_from_shapefile_path(shp_path)?;
        log::info!(
            "Loaded {} border features from {}",
            layer.features.len(),
            shp_path.display()
        );
        self.borders = Some(layer);
        Ok(())
    }
}
