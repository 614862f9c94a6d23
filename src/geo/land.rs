//! Land union used for containment tests.

use super::layer::{GeoLayer, GeoLayerType};
use crate::error::{MapError, Result};
use geo::{BoundingRect, Contains};
use geo_types::{Coord, MultiPolygon, Point, Polygon, Rect};
use std::path::Path;

/// Coarse world land outline shipped with the crate.
const BUNDLED_LAND_GEOJSON: &str = include_str!("../../assets/land_coarse.geojson");

/// A region that can answer "is this coordinate on land?".
pub trait Region {
    fn contains_coord(&self, coord: Coord<f64>) -> bool;
}

impl Region for Polygon<f64> {
    fn contains_coord(&self, coord: Coord<f64>) -> bool {
        self.contains(&Point::from(coord))
    }
}

impl Region for MultiPolygon<f64> {
    fn contains_coord(&self, coord: Coord<f64>) -> bool {
        self.contains(&Point::from(coord))
    }
}

impl Region for Rect<f64> {
    fn contains_coord(&self, coord: Coord<f64>) -> bool {
        let (min, max) = (self.min(), self.max());
        coord.x >= min.x && coord.x <= max.x && coord.y >= min.y && coord.y <= max.y
    }
}

/// Union of all land polygons, with a bounding box for cheap rejection.
#[derive(Debug, Clone)]
pub struct LandMask {
    polygons: Vec<(Rect<f64>, Polygon<f64>)>,
    bounds: Option<Rect<f64>>,
}

impl LandMask {
    /// Builds a mask from a land layer. Fails if the layer has no polygons.
    pub fn from_layer(layer: &GeoLayer) -> Result<Self> {
        Self::from_polygons(layer.polygons().cloned())
    }

    /// Builds a mask from polygons. Degenerate polygons are skipped.
    pub fn from_polygons(polygons: impl IntoIterator<Item = Polygon<f64>>) -> Result<Self> {
        let polygons: Vec<(Rect<f64>, Polygon<f64>)> = polygons
            .into_iter()
            .filter_map(|poly| poly.bounding_rect().map(|rect| (rect, poly)))
            .collect();

        if polygons.is_empty() {
            return Err(MapError::EmptyLand);
        }

        let bounds = polygons
            .iter()
            .map(|(rect, _)| *rect)
            .reduce(|a, b| {
                Rect::new(
                    Coord {
                        x: a.min().x.min(b.min().x),
                        y: a.min().y.min(b.min().y),
                    },
                    Coord {
                        x: a.max().x.max(b.max().x),
                        y: a.max().y.max(b.max().y),
                    },
                )
            });

        Ok(Self { polygons, bounds })
    }

    /// Loads the coarse outline bundled with the crate.
    pub fn bundled() -> Result<(Self, GeoLayer)> {
        let mut layer = GeoLayer::new(GeoLayerType::Land);
        layer.load_from_geojson(BUNDLED_LAND_GEOJSON)?;
        let mask = Self::from_layer(&layer)?;
        Ok((mask, layer))
    }

    /// Loads land polygons from a Natural Earth style shapefile.
    pub fn from_shapefile(shp_path: &Path) -> Result<(Self, GeoLayer)> {
        let mut layer = GeoLayer::new(GeoLayerType::Land);
        layer.load_from_shapefile_path(shp_path)?;
        let mask = Self::from_layer(&layer)?;
        Ok((mask, layer))
    }

    /// Number of member polygons.
    pub fn len(&self) -> usize {
        self.polygons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.polygons.is_empty()
    }

    /// Bounding box of the whole union.
    pub fn bounds(&self) -> Option<Rect<f64>> {
        self.bounds
    }

    /// Member polygons.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon<f64>> {
        self.polygons.iter().map(|(_, poly)| poly)
    }
}

impl Region for LandMask {
    fn contains_coord(&self, coord: Coord<f64>) -> bool {
        if let Some(bounds) = self.bounds {
            if !bounds.contains_coord(coord) {
                return false;
            }
        }

        let point = Point::from(coord);
        self.polygons
            .iter()
            .any(|(rect, poly)| rect.contains_coord(coord) && poly.contains(&point))
    }
}
