//! Twinkling two-layer starfield
//!
//! Bright primaries over dim secondaries, both drifting slowly rightward
//! and wrapping to a fresh vertical position. Star state lives in
//! normalized [0, 1] coordinates so the field survives viewport resizes.
//! Seeded RNG keeps the field reproducible.

use glam::Vec2;
use rand::Rng;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::shapes::circle;
use super::vertex::{colors, Vertex};

#[derive(Debug, Clone, Copy)]
struct Star {
    x: f32,
    y: f32,
    radius: f32,
    drift: f32,
    phase: f32,
    twinkle_rate: f32,
    base_alpha: f32,
}

#[derive(Debug, Clone)]
pub struct Starfield {
    bright: Vec<Star>,
    dim: Vec<Star>,
    rng: Pcg32,
}

impl Starfield {
    pub fn new(seed: u64, bright_count: usize, dim_count: usize) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let bright = (0..bright_count)
            .map(|_| Star {
                x: rng.random::<f32>(),
                y: rng.random::<f32>(),
                radius: rng.random::<f32>() * 1.5 + 0.2,
                drift: rng.random::<f32>() * 0.00022 + 0.00008,
                phase: rng.random::<f32>() * std::f32::consts::TAU,
                twinkle_rate: rng.random::<f32>() * 0.010 + 0.002,
                base_alpha: rng.random::<f32>() * 0.07 + 0.93,
            })
            .collect();
        let dim = (0..dim_count)
            .map(|_| Star {
                x: rng.random::<f32>(),
                y: rng.random::<f32>(),
                radius: rng.random::<f32>() * 0.9 + 0.1,
                drift: rng.random::<f32>() * 0.00012 + 0.00003,
                phase: rng.random::<f32>() * std::f32::consts::TAU,
                twinkle_rate: rng.random::<f32>() * 0.008 + 0.001,
                base_alpha: rng.random::<f32>() * 0.35 + 0.30,
            })
            .collect();
        Self { bright, dim, rng }
    }

    /// Advance drift and twinkle one frame
    pub fn advance(&mut self) {
        for star in self.bright.iter_mut().chain(self.dim.iter_mut()) {
            star.phase += star.twinkle_rate;
            star.x += star.drift;
            if star.x > 1.0 {
                star.x = 0.0;
                star.y = self.rng.random::<f32>();
            }
        }
    }

    /// Tessellate both layers at the given visibility factor
    pub fn vertices(&self, out: &mut Vec<Vertex>, star_vis: f32, width: f32, height: f32) {
        let vis_factor = 0.55 + 0.45 * star_vis;

        for star in &self.bright {
            let alpha =
                (star.base_alpha * (0.90 + 0.10 * star.phase.sin()) * vis_factor).min(1.0);
            if alpha < 0.01 {
                continue;
            }
            let c = colors::STAR_BRIGHT;
            circle(
                out,
                Vec2::new(star.x * width, star.y * height),
                star.radius,
                [c[0], c[1], c[2], alpha],
                6,
            );
        }
        for star in &self.dim {
            let alpha =
                (star.base_alpha * (0.85 + 0.15 * star.phase.sin()) * vis_factor).min(1.0);
            if alpha < 0.01 {
                continue;
            }
            let c = colors::STAR_DIM;
            circle(
                out,
                Vec2::new(star.x * width, star.y * height),
                star.radius,
                [c[0], c[1], c[2], alpha],
                6,
            );
        }
    }
}
