//! End-to-end map generation.
//!
//! Land data is loaded once per [`MapPipeline`]; each variant then samples
//! its land snowflakes, draws the static scene, writes the PNG and, for
//! animated variants, streams the snowfall GIF. A failed animation is
//! reported in the [`RunReport`] and never fails the run.

use crate::config::MapConfig;
use crate::error::{AnimationError, Result};
use crate::geo::sampler::default_bounds;
use crate::geo::{
    sample_points_in_region, GeoLayerSet, LandMask, LandSample, MapProjection, SamplerConfig,
};
use crate::locations::MapVariant;
use crate::render::{save_png, save_snowfall_gif, AnimationSummary, Canvas, MapScene};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// Margin around the globe as a fraction of the canvas width.
const GLOBE_MARGIN: f32 = 0.015;

/// Result of rendering one variant.
#[derive(Debug)]
pub struct RunReport {
    pub variant: MapVariant,
    /// Where the static map was written.
    pub png: PathBuf,
    pub land_sample: LandSample,
    /// Animation outcome; `None` when the variant is not animated or
    /// snowfall is disabled.
    pub animation: Option<std::result::Result<AnimationSummary, AnimationError>>,
}

impl RunReport {
    /// True when an animation was attempted and written.
    pub fn animation_saved(&self) -> bool {
        matches!(self.animation, Some(Ok(_)))
    }
}

/// Loaded land data plus the configuration to render with.
pub struct MapPipeline {
    config: MapConfig,
    land: LandMask,
    layers: GeoLayerSet,
}

impl MapPipeline {
    /// Loads land (and optional borders) for `config`.
    ///
    /// A configured land shapefile that cannot be read is an error. A
    /// borders shapefile that cannot be read is logged and skipped.
    pub fn new(config: MapConfig) -> Result<Self> {
        let (land, land_layer) = match &config.land_shapefile {
            Some(path) => LandMask::from_shapefile(path)?,
            None => LandMask::bundled()?,
        };
        log::info!("Loaded {} land polygons", land.len());

        let mut layers = GeoLayerSet::new(land_layer);
        if let Some(path) = &config.borders_shapefile {
            if let Err(e) = layers.load_borders_from_shapefile(path) {
                log::warn!("Skipping borders from {}: {}", path.display(), e);
            }
        }

        Ok(Self {
            config,
            land,
            layers,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    pub fn land(&self) -> &LandMask {
        &self.land
    }

    /// Samples the land snowflakes from the configured seed.
    pub fn sample_land(&self) -> LandSample {
        let sampling = &self.config.sampling;
        let sampler = SamplerConfig {
            bounds: default_bounds(),
            attempts_per_point: sampling.attempts_per_point,
            acceptable_fill: sampling.acceptable_fill,
        };
        let mut rng = StdRng::seed_from_u64(sampling.seed);
        sample_points_in_region(&self.land, sampling.land_snowflakes, &sampler, &mut rng)
    }

    /// Builds the static map for `variant` on a fresh canvas.
    pub fn render_static(&self, variant: MapVariant, land_sample: &LandSample) -> Result<Canvas> {
        let canvas_config = &self.config.canvas;
        let (width, height) = (canvas_config.width_px(), canvas_config.height_px());
        let margin = width as f32 * GLOBE_MARGIN;
        let projection = MapProjection::fit(self.config.projection, width, height, margin);
        let mut canvas = Canvas::new(width, height, projection, canvas_config.px_per_pt())?;

        let scene = MapScene::new(
            &variant.locations(),
            self.layers.clone(),
            land_sample.points.clone(),
            self.config.buffer_km,
            self.config.circle_samples,
        )?
        .with_snowflake_alpha(self.config.sampling.snowflake_alpha);

        scene.draw(&mut canvas);
        Ok(canvas)
    }

    /// Renders one variant and writes its outputs.
    pub fn run(&self, variant: MapVariant) -> Result<RunReport> {
        let paths = self.config.output_paths(variant);
        std::fs::create_dir_all(&self.config.output_dir)?;

        let land_sample = self.sample_land();
        log::debug!(
            "Sampled {}/{} land snowflakes in {} attempts",
            land_sample.len(),
            land_sample.target,
            land_sample.attempts
        );

        let canvas = self.render_static(variant, &land_sample)?;
        save_png(&canvas, &paths.png)?;
        log::info!("Saved PNG: {}", paths.png.display());

        let animation = if variant.animated() && self.config.snowfall.enabled {
            let result = save_snowfall_gif(&canvas, &self.config.snowfall, &paths.gif);
            match &result {
                Ok(summary) => log::info!(
                    "Saved GIF: {} ({} frames)",
                    summary.path.display(),
                    summary.frames
                ),
                Err(e) => log::warn!("Failed to save GIF {}: {}", paths.gif.display(), e),
            }
            Some(result)
        } else {
            None
        };

        Ok(RunReport {
            variant,
            png: paths.png,
            land_sample,
            animation,
        })
    }

    /// Renders every configured variant in order, stopping at the first
    /// static-output failure.
    pub fn run_all(&self) -> Result<Vec<RunReport>> {
        self.config
            .variants
            .iter()
            .map(|variant| self.run(*variant))
            .collect()
    }
}

/// Loads land for `config` and renders a single variant.
pub fn run(variant: MapVariant, config: &MapConfig) -> Result<RunReport> {
    MapPipeline::new(config.clone())?.run(variant)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CanvasConfig, SamplingConfig, SnowfallConfig};
    use crate::error::MapError;
    use crate::geo::Region;
    use crate::locations::{CLASSIC_LOCATIONS, EXTENDED_LOCATIONS};
    use std::fs::File;
    use std::path::Path;

    fn small_config(dir: &Path) -> MapConfig {
        MapConfig {
            output_dir: dir.to_path_buf(),
            canvas: CanvasConfig {
                width_in: 4.0,
                height_in: 2.5,
                dpi: 40.0,
            },
            sampling: SamplingConfig {
                land_snowflakes: 200,
                ..Default::default()
            },
            snowfall: SnowfallConfig {
                particles: 25,
                frames: 4,
                encoder_speed: 30,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn png_size(path: &Path) -> (u32, u32) {
        let reader = png::Decoder::new(File::open(path).unwrap())
            .read_info()
            .unwrap();
        (reader.info().width, reader.info().height)
    }

    #[test]
    fn test_every_location_is_on_land() {
        let (land, _) = LandMask::bundled().unwrap();
        for location in CLASSIC_LOCATIONS.iter().chain(EXTENDED_LOCATIONS) {
            assert!(land.contains_coord(location.coord()), "{}", location.name);
        }
    }

    #[test]
    fn test_classic_writes_png_and_gif() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let report = run(MapVariant::Classic, &config).unwrap();

        assert_eq!(report.png, dir.path().join(MapVariant::Classic.png_file_name()));
        assert!(std::fs::metadata(&report.png).unwrap().len() > 0);
        assert_eq!(png_size(&report.png), (160, 100));
        assert_eq!(report.land_sample.len(), 200);

        #[cfg(feature = "animation")]
        {
            use image::codecs::gif::GifDecoder;
            use image::AnimationDecoder;
            use std::io::BufReader;

            assert!(report.animation_saved());
            let gif = dir.path().join(MapVariant::Classic.gif_file_name());
            let decoder = GifDecoder::new(BufReader::new(File::open(gif).unwrap())).unwrap();
            assert_eq!(decoder.into_frames().collect_frames().unwrap().len(), 4);
        }

        #[cfg(not(feature = "animation"))]
        {
            let err = report.animation.unwrap().unwrap_err();
            assert!(err.is_encoder_missing());
        }
    }

    #[test]
    fn test_extended_is_static_only() {
        let dir = tempfile::tempdir().unwrap();
        let config = small_config(dir.path());
        let report = run(MapVariant::Extended, &config).unwrap();

        assert!(report.animation.is_none());
        assert!(report.png.exists());
        assert!(!dir.path().join(MapVariant::Extended.gif_file_name()).exists());
    }

    #[test]
    fn test_snowfall_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.snowfall.enabled = false;

        let report = run(MapVariant::Classic, &config).unwrap();
        assert!(report.animation.is_none());
        assert!(!report.animation_saved());
    }

    #[test]
    fn test_run_all_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.snowfall.enabled = false;

        let pipeline = MapPipeline::new(config).unwrap();
        let reports = pipeline.run_all().unwrap();
        let variants: Vec<MapVariant> = reports.iter().map(|r| r.variant).collect();
        assert_eq!(variants, vec![MapVariant::Classic, MapVariant::Extended]);
    }

    #[test]
    fn test_land_sample_is_reproducible() {
        let pipeline = MapPipeline::new(MapConfig::default()).unwrap();
        let a = pipeline.sample_land();
        let b = pipeline.sample_land();

        assert_eq!(a, b);
        assert_eq!(a.len(), 1400);
        assert!(!a.is_short());
    }

    #[test]
    fn test_negative_buffer_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.buffer_km = -1.0;

        let err = run(MapVariant::Classic, &config).unwrap_err();
        assert!(matches!(err, MapError::InvalidRadius(_)));
        assert!(!dir.path().join(MapVariant::Classic.png_file_name()).exists());
    }

    #[test]
    fn test_missing_land_shapefile_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.land_shapefile = Some(dir.path().join("nope.shp"));

        assert!(matches!(MapPipeline::new(config), Err(MapError::Io(_))));
    }

    #[test]
    fn test_missing_borders_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = small_config(dir.path());
        config.borders_shapefile = Some(dir.path().join("nope.shp"));
        config.snowfall.enabled = false;

        let pipeline = MapPipeline::new(config).unwrap();
        assert!(pipeline.run(MapVariant::Extended).is_ok());
    }

    #[test]
    fn test_output_dir_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("out").join("maps");
        let mut config = small_config(&nested);
        config.snowfall.enabled = false;

        let report = run(MapVariant::Extended, &config).unwrap();
        assert!(report.png.starts_with(&nested));
        assert!(report.png.exists());
    }
}
