//! Centralized color constants for the map.
//!
//! This module provides consistent colors across all map layers.

use std::collections::BTreeMap;
use tiny_skia::Color;

/// An opaque 8-bit RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const WHITE: Rgb = Rgb(255, 255, 255);

    /// Converts to a tiny-skia color with the given opacity.
    pub fn with_alpha(self, alpha: f32) -> Color {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Color::from_rgba8(self.0, self.1, self.2, a)
    }

    /// Converts to an opaque tiny-skia color.
    pub fn opaque(self) -> Color {
        Color::from_rgba8(self.0, self.1, self.2, 255)
    }
}

/// Colors for the base map.
pub mod map {
    use super::Rgb;

    /// Night sky behind the globe.
    pub const BACKGROUND: Rgb = Rgb(15, 20, 36);
    /// Ocean inside the globe outline.
    pub const OCEAN: Rgb = Rgb(36, 87, 122);
    /// Snow-covered land.
    pub const LAND: Rgb = Rgb(250, 250, 247);
    /// Coastline stroke.
    pub const COAST: Rgb = Rgb(153, 173, 184);
    /// Country border stroke.
    pub const BORDER: Rgb = Rgb(184, 189, 194);
    /// Land snowflakes and falling snow.
    pub const SNOWFLAKE: Rgb = Rgb(204, 235, 255);
}

/// Colors for location markers.
pub mod markers {
    use super::Rgb;

    /// Santa hat body.
    pub const HAT_RED: Rgb = Rgb(219, 31, 41);
    /// Hat brim, pom-pom and bauble rim.
    pub const TRIM: Rgb = Rgb::WHITE;
}

/// Palette cycled across traditions, in sorted tradition order.
pub const FESTIVE_PALETTE: [Rgb; 8] = [
    Rgb(204, 38, 51),   // cranberry
    Rgb(26, 128, 71),   // pine
    Rgb(245, 189, 51),  // gold
    Rgb(89, 179, 219),  // icy blue
    Rgb(140, 89, 199),  // winter purple
    Rgb(242, 122, 46),  // warm orange
    Rgb(51, 51, 64),    // charcoal
    Rgb(230, 77, 140),  // berry pink
];

/// Reserved for southern-hemisphere traditions, where Christmas falls in summer.
pub const SUMMER_TEAL: Rgb = Rgb(13, 191, 166);

const SOUTHERN_PREFIX: &str = "Southern Hemisphere";

/// Assigns a color to each tradition.
///
/// Traditions are sorted and deduplicated, then given palette colors in
/// order, wrapping after eight. Any tradition starting with
/// "Southern Hemisphere" keeps its slot but is drawn in [`SUMMER_TEAL`].
pub fn tradition_color_map<'a>(traditions: &[&'a str]) -> BTreeMap<&'a str, Rgb> {
    let mut sorted: Vec<&'a str> = traditions.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    sorted
        .into_iter()
        .enumerate()
        .map(|(i, tradition)| {
            let color = if tradition.starts_with(SOUTHERN_PREFIX) {
                SUMMER_TEAL
            } else {
                FESTIVE_PALETTE[i % FESTIVE_PALETTE.len()]
            };
            (tradition, color)
        })
        .collect()
}
