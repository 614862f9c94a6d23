#![warn(clippy::all)]

//! Santa Map - renders the festive Santa traditions maps.
//!
//! Writes a PNG for every configured variant and a snowfall GIF for the
//! animated one. A failed GIF is logged and does not change the exit code.

use anyhow::Context;
use santa_map::{MapConfig, MapPipeline};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = MapConfig::load();
    let pipeline = MapPipeline::new(config).context("failed to load land data")?;

    let mut gif_failures = 0;
    for variant in pipeline.config().variants.clone() {
        let report = pipeline
            .run(variant)
            .with_context(|| format!("failed to render the {} map", variant.name()))?;

        if matches!(report.animation, Some(Err(_))) {
            gif_failures += 1;
        }
    }

    if gif_failures > 0 {
        log::warn!("Static maps saved; {} animation(s) could not be written", gif_failures);
    }

    Ok(())
}
