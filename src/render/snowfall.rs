//! Snowfall animation controller.
//!
//! Particles live in axes-relative coordinates (0..1 across the globe
//! bounds, y up) and drift down a little every frame. All randomness comes
//! from one seeded generator, so a given seed replays the same snowfall.

use super::canvas::Canvas;
use super::colors::Rgb;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

/// Particles falling below this height re-enter at the top.
const RESET_BELOW: f64 = -0.05;
/// Re-entry height, just above the top edge.
const RESET_TO: f64 = 1.05;
/// Standard deviation of the per-frame horizontal jitter.
const JITTER_SD: f64 = 0.0015;
/// Horizontal positions are clipped to this range.
const X_RANGE: (f64, f64) = (-0.02, 1.02);
const SPEED_RANGE: (f64, f64) = (0.002, 0.010);
/// Marker area range in pt².
const SIZE_RANGE: (f64, f64) = (8.0, 16.0);

/// A single falling snowflake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SnowParticle {
    /// Horizontal position, 0 = left edge of the globe bounds.
    pub x: f64,
    /// Vertical position, 0 = bottom edge.
    pub y: f64,
    /// Fall distance per frame.
    pub speed: f64,
    /// Marker area in pt².
    pub size: f64,
}

/// Steps a field of snow particles frame by frame.
pub struct SnowfallAnimator {
    particles: Vec<SnowParticle>,
    rng: StdRng,
    /// Frames advanced so far.
    frame: usize,
}

impl SnowfallAnimator {
    /// Creates `count` particles from `seed`.
    ///
    /// Positions, speeds and sizes are drawn attribute by attribute (all x,
    /// then all y, then speeds, then sizes).
    pub fn new(count: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);

        let xs: Vec<f64> = (0..count).map(|_| rng.gen_range(0.0..1.0)).collect();
        let ys: Vec<f64> = (0..count).map(|_| rng.gen_range(0.0..1.0)).collect();
        let speeds: Vec<f64> = (0..count)
            .map(|_| rng.gen_range(SPEED_RANGE.0..SPEED_RANGE.1))
            .collect();
        let sizes: Vec<f64> = (0..count)
            .map(|_| rng.gen_range(SIZE_RANGE.0..SIZE_RANGE.1))
            .collect();

        let particles = xs
            .into_iter()
            .zip(ys)
            .zip(speeds.into_iter().zip(sizes))
            .map(|((x, y), (speed, size))| SnowParticle { x, y, speed, size })
            .collect();

        Self {
            particles,
            rng,
            frame: 0,
        }
    }

    pub fn particles(&self) -> &[SnowParticle] {
        &self.particles
    }

    /// Number of frames advanced so far.
    pub fn frame(&self) -> usize {
        self.frame
    }

    /// Advances one frame.
    ///
    /// Every particle falls by its speed; those below the bottom re-enter at
    /// the top at a fresh random x. Then every x drifts by Gaussian jitter
    /// and is clipped to the visible band.
    pub fn advance(&mut self) {
        for p in &mut self.particles {
            p.y -= p.speed;
        }

        for p in &mut self.particles {
            if p.y < RESET_BELOW {
                p.y = RESET_TO;
                p.x = self.rng.gen_range(0.0..1.0);
            }
        }

        for p in &mut self.particles {
            let jitter: f64 = self.rng.sample(StandardNormal);
            p.x = (p.x + jitter * JITTER_SD).clamp(X_RANGE.0, X_RANGE.1);
        }

        self.frame += 1;
    }

    /// Draws the current particles over `canvas`. Once the globe is filled,
    /// flakes outside its outline are clipped away.
    pub fn draw(&self, canvas: &mut Canvas, alpha: f32) {
        let color = Rgb::WHITE.with_alpha(alpha);
        for p in &self.particles {
            let pos = canvas
                .projection()
                .axes_to_screen(p.x as f32, p.y as f32);
            let radius = canvas.marker_radius(p.size as f32);
            canvas.draw_snowflake(pos, radius, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_particles_in_range() {
        let animator = SnowfallAnimator::new(450, 123);
        assert_eq!(animator.particles().len(), 450);
        assert_eq!(animator.frame(), 0);

        for p in animator.particles() {
            assert!((0.0..1.0).contains(&p.x));
            assert!((0.0..1.0).contains(&p.y));
            assert!((0.002..0.010).contains(&p.speed));
            assert!((8.0..16.0).contains(&p.size));
        }
    }

    #[test]
    fn test_same_seed_same_snowfall() {
        let mut a = SnowfallAnimator::new(100, 123);
        let mut b = SnowfallAnimator::new(100, 123);
        for _ in 0..50 {
            a.advance();
            b.advance();
        }
        assert_eq!(a.particles(), b.particles());

        let c = SnowfallAnimator::new(100, 124);
        assert_ne!(SnowfallAnimator::new(100, 123).particles(), c.particles());
    }

    #[test]
    fn test_particles_fall_by_speed() {
        let mut animator = SnowfallAnimator::new(50, 1);
        let before: Vec<SnowParticle> = animator.particles().to_vec();
        animator.advance();

        assert_eq!(animator.frame(), 1);
        for (old, new) in before.iter().zip(animator.particles()) {
            if old.y - old.speed >= RESET_BELOW {
                assert!((new.y - (old.y - old.speed)).abs() < 1e-12);
            }
            assert_eq!(old.speed, new.speed);
            assert_eq!(old.size, new.size);
        }
    }

    #[test]
    fn test_particles_wrap_to_top() {
        let mut animator = SnowfallAnimator::new(200, 5);
        // Slowest particle needs (1.0 + 0.05) / 0.002 frames to leave
        for _ in 0..600 {
            animator.advance();
            for p in animator.particles() {
                assert!(p.y >= RESET_BELOW && p.y <= RESET_TO);
                assert!(p.x >= X_RANGE.0 && p.x <= X_RANGE.1);
            }
        }
        assert!(animator.particles().iter().any(|p| p.y > 0.9));
    }

    #[test]
    fn test_snow_outside_globe_is_clipped() {
        use crate::geo::{MapProjection, ProjectionKind};

        let projection = MapProjection::fit(ProjectionKind::Robinson, 360, 180, 0.0);
        let mut canvas = Canvas::new(360, 180, projection, 1.0).unwrap();
        canvas.fill_background(Rgb(10, 20, 30).opaque());
        canvas.fill_globe(Rgb(0, 0, 200).opaque());
        let before = canvas.to_rgba_image();

        let mut animator = SnowfallAnimator::new(0, 123);
        animator.particles.push(SnowParticle {
            x: 0.01,
            y: 0.99,
            speed: 0.005,
            size: 16.0,
        });
        animator.draw(&mut canvas, 1.0);

        // Top-left corner of the globe bounds is outside the outline
        assert_eq!(canvas.to_rgba_image(), before);
    }

    #[test]
    fn test_empty_field() {
        let mut animator = SnowfallAnimator::new(0, 123);
        animator.advance();
        assert!(animator.particles().is_empty());
        assert_eq!(animator.frame(), 1);
    }
}
