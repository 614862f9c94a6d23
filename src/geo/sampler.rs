//! Rejection sampling of points inside a region.
//!
//! Candidates are drawn uniformly from a lon/lat rectangle and kept when the
//! region contains them. The caller supplies the random source, so a fixed
//! seed always reproduces the same points in the same order.

use super::land::Region;
use geo_types::{Coord, Rect};
use rand::Rng;

/// Default sampling window: all longitudes, latitudes from 60°S to 85°N.
pub fn default_bounds() -> Rect<f64> {
    Rect::new(Coord { x: -180.0, y: -60.0 }, Coord { x: 180.0, y: 85.0 })
}

/// Sampler parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct SamplerConfig {
    /// Candidate rectangle.
    pub bounds: Rect<f64>,
    /// Attempt budget per requested point.
    pub attempts_per_point: usize,
    /// Fraction of the target below which the shortfall is logged as a
    /// warning. `1.0` warns on any shortfall; `0.0` never warns.
    pub acceptable_fill: f64,
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            bounds: default_bounds(),
            attempts_per_point: 60,
            acceptable_fill: 1.0,
        }
    }
}

/// Outcome of a sampling run.
#[derive(Debug, Clone, PartialEq)]
pub struct LandSample {
    /// Accepted points, in draw order.
    pub points: Vec<Coord<f64>>,
    /// Number of points requested.
    pub target: usize,
    /// Candidates drawn.
    pub attempts: usize,
}

impl LandSample {
    /// True when fewer points than requested were accepted.
    pub fn is_short(&self) -> bool {
        self.points.len() < self.target
    }

    /// Accepted points as a fraction of the target (1.0 for an empty target).
    pub fn fill_ratio(&self) -> f64 {
        if self.target == 0 {
            1.0
        } else {
            self.points.len() as f64 / self.target as f64
        }
    }

    /// Log level for a shortfall: `Warn` below `acceptable_fill`, `Debug`
    /// otherwise, `None` when the target was reached.
    pub fn shortfall_level(&self, acceptable_fill: f64) -> Option<log::Level> {
        if !self.is_short() {
            None
        } else if self.fill_ratio() < acceptable_fill {
            Some(log::Level::Warn)
        } else {
            Some(log::Level::Debug)
        }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Draws up to `target` points inside `region`.
///
/// Never fails. When the attempt budget runs out first, the partial set is
/// returned with [`LandSample::is_short`] set, and a warning is logged if the
/// fill ratio is below `config.acceptable_fill`.
pub fn sample_points_in_region<R, G>(
    region: &R,
    target: usize,
    config: &SamplerConfig,
    rng: &mut G,
) -> LandSample
where
    R: Region + ?Sized,
    G: Rng + ?Sized,
{
    let (min, max) = (config.bounds.min(), config.bounds.max());
    let max_attempts = target.saturating_mul(config.attempts_per_point);

    let mut points = Vec::with_capacity(target);
    let mut attempts = 0;

    while points.len() < target && attempts < max_attempts {
        attempts += 1;
        let candidate = Coord {
            x: draw(rng, min.x, max.x),
            y: draw(rng, min.y, max.y),
        };
        if region.contains_coord(candidate) {
            points.push(candidate);
        }
    }

    let sample = LandSample {
        points,
        target,
        attempts,
    };

    if let Some(level) = sample.shortfall_level(config.acceptable_fill) {
        log::log!(
            level,
            "Only sampled {}/{} land points after {} attempts (raise attempts_per_point if needed)",
            sample.len(),
            target,
            attempts
        );
    }

    sample
}

/// Uniform draw in `[lo, hi)`, or `lo` for an empty interval.
fn draw<G: Rng + ?Sized>(rng: &mut G, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        rng.gen_range(lo..hi)
    } else {
        lo
    }
}
