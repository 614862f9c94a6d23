//! Run configuration.
//!
//! Every tunable lives here with the defaults the map was designed around.
//! An optional JSON file can override any subset of fields; missing fields
//! keep their defaults.

use crate::geo::ProjectionKind;
use crate::locations::MapVariant;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable naming a JSON config file.
pub const CONFIG_ENV_VAR: &str = "SANTA_MAP_CONFIG";

/// Config file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "santa_map.json";

/// Canvas size and resolution.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CanvasConfig {
    /// Figure width in inches.
    pub width_in: f32,
    /// Figure height in inches.
    pub height_in: f32,
    /// Pixels per inch.
    pub dpi: f32,
}

impl Default for CanvasConfig {
    fn default() -> Self {
        Self {
            width_in: 15.5,
            height_in: 9.5,
            dpi: 140.0,
        }
    }
}

impl CanvasConfig {
    /// Pixel width of the canvas.
    pub fn width_px(&self) -> u32 {
        (self.width_in * self.dpi).round().max(1.0) as u32
    }

    /// Pixel height of the canvas.
    pub fn height_px(&self) -> u32 {
        (self.height_in * self.dpi).round().max(1.0) as u32
    }

    /// Pixels per typographic point (1/72 inch).
    pub fn px_per_pt(&self) -> f32 {
        self.dpi / 72.0
    }
}

/// Land snowflake sampling.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SamplingConfig {
    /// Target number of land snowflakes.
    pub land_snowflakes: usize,
    /// Seed for the land sampler.
    pub seed: u64,
    /// Attempt budget per requested point.
    pub attempts_per_point: usize,
    /// Fraction of the target below which a shortfall is logged as a warning.
    pub acceptable_fill: f64,
    /// Opacity of the snowflake glyphs.
    pub snowflake_alpha: f32,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            land_snowflakes: 1400,
            seed: 11,
            attempts_per_point: 60,
            acceptable_fill: 1.0,
            snowflake_alpha: 0.12,
        }
    }
}

/// Animated snowfall.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct SnowfallConfig {
    pub enabled: bool,
    pub particles: usize,
    pub frames: usize,
    /// Playback rate written into the GIF; also sets the frame delay.
    pub fps: u32,
    pub alpha: f32,
    pub seed: u64,
    /// GIF quantizer speed, 1 (best) to 30 (fastest).
    pub encoder_speed: i32,
}

impl Default for SnowfallConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            particles: 450,
            frames: 120,
            fps: 18,
            alpha: 0.45,
            seed: 123,
            encoder_speed: 10,
        }
    }
}

/// Output paths for one variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputPaths {
    pub png: PathBuf,
    pub gif: PathBuf,
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct MapConfig {
    /// Variants rendered by the binary, in order.
    pub variants: Vec<MapVariant>,
    /// Directory the output files are written into.
    pub output_dir: PathBuf,
    /// Radius of the influence circles in kilometers.
    pub buffer_km: f64,
    /// Vertices per influence circle.
    pub circle_samples: usize,
    /// Natural Earth land shapefile (`.shp`); the bundled outline is used when unset.
    pub land_shapefile: Option<PathBuf>,
    /// Optional country borders shapefile (`.shp`).
    pub borders_shapefile: Option<PathBuf>,
    /// Map projection.
    pub projection: ProjectionKind,
    pub canvas: CanvasConfig,
    pub sampling: SamplingConfig,
    pub snowfall: SnowfallConfig,
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            variants: vec![MapVariant::Classic, MapVariant::Extended],
            output_dir: PathBuf::from("."),
            buffer_km: 350.0,
            circle_samples: 120,
            land_shapefile: None,
            borders_shapefile: None,
            projection: ProjectionKind::Robinson,
            canvas: CanvasConfig::default(),
            sampling: SamplingConfig::default(),
            snowfall: SnowfallConfig::default(),
        }
    }
}

impl MapConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the file named by `SANTA_MAP_CONFIG`, or
    /// `santa_map.json` in the working directory, falling back to defaults.
    pub fn load() -> Self {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load_from(Path::new(&path)),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::load_from(path)
                } else {
                    log::debug!("No config file found, using defaults");
                    Self::default()
                }
            }
        }
    }

    /// Loads configuration from a JSON file. Unreadable or malformed files
    /// are logged and replaced by the defaults.
    pub fn load_from(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(e) => {
                log::warn!("Failed to read config {}: {}", path.display(), e);
                return Self::default();
            }
        };

        match serde_json::from_str(&json) {
            Ok(config) => {
                log::info!("Loaded config from {}", path.display());
                config
            }
            Err(e) => {
                log::warn!("Failed to parse config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Output file paths for a variant.
    pub fn output_paths(&self, variant: MapVariant) -> OutputPaths {
        OutputPaths {
            png: self.output_dir.join(variant.png_file_name()),
            gif: self.output_dir.join(variant.gif_file_name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_design_constants() {
        let config = MapConfig::default();
        assert_eq!(config.buffer_km, 350.0);
        assert_eq!(config.sampling.land_snowflakes, 1400);
        assert_eq!(config.sampling.attempts_per_point, 60);
        assert_eq!(config.snowfall.particles, 450);
        assert_eq!(config.snowfall.frames, 120);
        assert_eq!(config.snowfall.fps, 18);
        assert_eq!(config.canvas.width_px(), 2170);
        assert_eq!(config.canvas.height_px(), 1330);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{ "buffer_km": 500.0, "projection": "plate_carree", "snowfall": {{ "frames": 12 }}, "variants": ["extended"] }}"#
        )
        .unwrap();

        let config = MapConfig::load_from(file.path());
        assert_eq!(config.buffer_km, 500.0);
        assert_eq!(config.snowfall.frames, 12);
        assert_eq!(config.snowfall.particles, 450);
        assert_eq!(config.variants, vec![MapVariant::Extended]);
        assert_eq!(config.projection, ProjectionKind::PlateCarree);
        assert_eq!(config.sampling, SamplingConfig::default());
    }

    #[test]
    fn test_malformed_json_falls_back() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();

        assert_eq!(MapConfig::load_from(file.path()), MapConfig::default());
    }

    #[test]
    fn test_output_paths_use_output_dir() {
        let config = MapConfig {
            output_dir: PathBuf::from("out"),
            ..Default::default()
        };
        let paths = config.output_paths(MapVariant::Classic);
        assert_eq!(paths.png, Path::new("out").join(MapVariant::Classic.png_file_name()));
        assert_eq!(paths.gif.extension().unwrap(), "gif");
    }
}
