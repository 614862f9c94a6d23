//! Santa tradition locations.
//!
//! The tables are fixed at compile time. Two variants are bundled: the
//! classic seven-stop map that also gets the snowfall animation, and an
//! extended fifteen-stop map rendered as a still image.

mod table;

use geo_types::Coord;
use serde::{Deserialize, Serialize};

pub use table::{CLASSIC_LOCATIONS, EXTENDED_LOCATIONS};

/// A single Santa tradition location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    /// Name of the gift-bringer
    pub name: &'static str,
    /// Tradition group, used for color grouping
    pub tradition: &'static str,
    /// Human-readable place
    pub place: &'static str,
    /// Latitude in degrees
    pub lat: f64,
    /// Longitude in degrees
    pub lon: f64,
    /// Free-text note
    pub note: &'static str,
    /// Draw a Santa hat above the marker
    pub special_icon: bool,
}

impl Location {
    /// Position as a (lon, lat) coordinate.
    pub fn coord(&self) -> Coord<f64> {
        Coord {
            x: self.lon,
            y: self.lat,
        }
    }

    /// Two-line label text: name, then place.
    pub fn label(&self) -> String {
        format!("{}\n{}", self.name, self.place)
    }
}

/// Which bundled map to render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MapVariant {
    /// Seven stops, with snowfall animation.
    Classic,
    /// Fifteen stops, still image only.
    Extended,
}

impl MapVariant {
    /// Location table for this variant.
    pub fn locations(&self) -> LocationTable {
        match self {
            MapVariant::Classic => LocationTable::new(CLASSIC_LOCATIONS),
            MapVariant::Extended => LocationTable::new(EXTENDED_LOCATIONS),
        }
    }

    /// Whether this variant produces the snowfall GIF.
    pub fn animated(&self) -> bool {
        matches!(self, MapVariant::Classic)
    }

    pub fn png_file_name(&self) -> &'static str {
        match self {
            MapVariant::Classic => "santa_traditions_map_christmas.png",
            MapVariant::Extended => "santa_traditions_map_extended.png",
        }
    }

    pub fn gif_file_name(&self) -> &'static str {
        match self {
            MapVariant::Classic => "santa_traditions_map_snowfall.gif",
            MapVariant::Extended => "santa_traditions_map_extended_snowfall.gif",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapVariant::Classic => "classic",
            MapVariant::Extended => "extended",
        }
    }
}

/// An ordered table of locations.
#[derive(Debug, Clone)]
pub struct LocationTable {
    locations: Vec<Location>,
}

impl LocationTable {
    pub fn new(locations: &[Location]) -> Self {
        Self {
            locations: locations.to_vec(),
        }
    }

    pub fn len(&self) -> usize {
        self.locations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.locations.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Location> {
        self.locations.iter()
    }

    /// Unique tradition names, sorted.
    pub fn traditions(&self) -> Vec<&'static str> {
        let mut traditions: Vec<&'static str> =
            self.locations.iter().map(|l| l.tradition).collect();
        traditions.sort_unstable();
        traditions.dedup();
        traditions
    }

    /// Locations belonging to one tradition, in table order.
    pub fn by_tradition<'a>(&'a self, tradition: &'a str) -> impl Iterator<Item = &'a Location> {
        self.locations
            .iter()
            .filter(move |l| l.tradition == tradition)
    }
}
