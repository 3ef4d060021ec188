//! Scent particles released by the dissolving bait
//!
//! Particles drift by Brownian motion, sink slowly and never rise above the
//! surface. The set is capped by count, oldest first, not by age.

use glam::Vec2;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::config::BaitConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScentCloud {
    /// Live particles, oldest first
    particles: Vec<Vec2>,
    max_particles: usize,
    diffusion: f32,
    sink_speed: f32,
}

impl ScentCloud {
    pub fn new(config: &BaitConfig) -> Self {
        Self {
            particles: Vec::with_capacity(config.max_particles + 1),
            max_particles: config.max_particles,
            diffusion: config.particle_diffusion,
            sink_speed: config.particle_sink_speed,
        }
    }

    pub fn particles(&self) -> &[Vec2] {
        &self.particles
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn clear(&mut self) {
        self.particles.clear();
    }

    /// Add a particle, evicting the oldest beyond the cap
    pub fn emit(&mut self, position: Vec2) {
        self.particles.push(position);
        if self.particles.len() > self.max_particles {
            let excess = self.particles.len() - self.max_particles;
            self.particles.drain(..excess);
        }
    }

    /// Brownian step, sinking drift, surface clamp
    pub fn update(&mut self, dt: f32, rng: &mut impl Rng) {
        let step = self.diffusion * dt.sqrt();
        for p in &mut self.particles {
            let noise = Vec2::new(rng.sample(StandardNormal), rng.sample(StandardNormal));
            *p += noise * step;
            p.y = p.y.min(0.0) - self.sink_speed * dt;
        }
    }

    /// Sum of `increment` over particles within `range` of `point`
    pub fn density(&self, point: Vec2, range: f32, increment: f32) -> f32 {
        let range_sq = range * range;
        let count = self
            .particles
            .iter()
            .filter(|p| p.distance_squared(point) < range_sq)
            .count();
        count as f32 * increment
    }
}
