//! Bait: a dissolving point mass on a tippet below the float
//!
//! The tippet acts twice. As a one-sided spring it pulls the bait toward the
//! float whenever it is stretched; as an inextensible cord the bait is
//! projected back onto the tippet sphere after every position update, with
//! any outward velocity removed. It can go slack but never over-stretch.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::guards::{MIN_DISTANCE, clamp_magnitude, finite_or_zero};
use super::integrator::{PositionPhase, begin_step, end_step};
use super::scent::ScentCloud;
use crate::config::PhysicsConfig;
use crate::consts::GRAVITY;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bait {
    pub position: Vec2,
    pub velocity: Vec2,
    /// Current mass (kg), never increases, never below `min_mass`
    pub mass: f32,
    pub initial_mass: f32,
    pub min_mass: f32,
    pub dissolution_rate: f32,
    pub velocity_wear: f32,
    /// Expected particle emissions per second
    pub diffusion_rate: f32,
    pub drag_coefficient: f32,
    pub tippet_length: f32,
    pub tippet_stiffness: f32,
    pub scent: ScentCloud,
    max_acceleration: f32,
    max_speed: f32,
}

impl Bait {
    pub fn new(config: &PhysicsConfig) -> Self {
        let b = &config.bait;
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            mass: b.initial_mass,
            initial_mass: b.initial_mass,
            min_mass: b.min_mass,
            dissolution_rate: b.dissolution_rate,
            velocity_wear: b.velocity_wear,
            diffusion_rate: b.diffusion_rate,
            drag_coefficient: b.drag_coefficient,
            tippet_length: b.tippet_length,
            tippet_stiffness: b.tippet_stiffness,
            scent: ScentCloud::new(b),
            max_acceleration: config.caps.max_acceleration,
            max_speed: config.caps.max_speed,
        }
    }

    /// Fresh bait at `position`: full mass, at rest, no scent
    pub fn reset(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
        self.mass = self.initial_mass;
        self.scent.clear();
    }

    /// Remaining fraction of the initial mass
    pub fn mass_ratio(&self) -> f32 {
        self.mass / self.initial_mass
    }

    pub fn is_depleted(&self) -> bool {
        self.mass <= self.min_mass
    }

    /// Dissolve, emit and diffuse scent.
    ///
    /// Faster bait wears faster. Once only the hook is left it stops moving
    /// and stops emitting, but existing particles keep drifting.
    pub fn apply_mass_loss(&mut self, dt: f32, rng: &mut impl Rng) {
        if self.is_depleted() {
            self.mass = self.min_mass;
            self.velocity = Vec2::ZERO;
        } else {
            let loss = (self.dissolution_rate + self.velocity_wear * self.velocity.length_squared()) * dt;
            self.mass = (self.mass - loss.max(0.0)).max(self.min_mass);

            if rng.random::<f32>() < self.diffusion_rate * dt {
                self.scent.emit(self.position);
            }
        }
        self.scent.update(dt, rng);
    }

    /// One-sided spring toward the float; zero while slack
    pub fn tippet_force(&self, float_position: Vec2) -> Vec2 {
        let to_float = float_position - self.position;
        let distance = to_float.length();
        if distance <= self.tippet_length || distance < MIN_DISTANCE {
            return Vec2::ZERO;
        }
        let extension = distance - self.tippet_length;
        finite_or_zero(to_float / distance * self.tippet_stiffness * extension)
    }

    pub fn acceleration(&self, float_position: Vec2, external_force: Vec2) -> Vec2 {
        let gravity = Vec2::new(0.0, -GRAVITY);
        let force = self.tippet_force(float_position) + external_force;
        clamp_magnitude(gravity + force / self.mass, self.max_acceleration)
    }

    /// Project onto the tippet sphere and drop outward velocity
    pub fn constrain_to_tippet(&mut self, float_position: Vec2) {
        let offset = self.position - float_position;
        let distance = offset.length();
        if distance <= self.tippet_length || distance < MIN_DISTANCE {
            return;
        }
        let direction = offset / distance;
        self.position = float_position + direction * self.tippet_length;

        let outward = self.velocity.dot(direction);
        if outward > 0.0 {
            self.velocity -= outward * direction;
        }
    }

    /// Tippet tension on the bait (points toward the float). The float
    /// receives the negation.
    ///
    /// Magnitude is `m·(g - a_fish,y)` plus any spring extension. Coincident
    /// bait and float fall back to a vertical `m·g`.
    pub fn tension_vector(&self, float_position: Vec2, fish_acceleration: Vec2) -> Vec2 {
        let to_float = float_position - self.position;
        let distance = to_float.length();
        if distance < MIN_DISTANCE {
            return Vec2::new(0.0, self.mass * GRAVITY);
        }

        let extension = (distance - self.tippet_length).max(0.0);
        let magnitude = self.mass * (GRAVITY - fish_acceleration.y) + self.tippet_stiffness * extension;
        finite_or_zero(to_float / distance * magnitude)
    }

    /// Phase 1: dissolve, advance position with the old force, then enforce
    /// the tippet length
    pub fn update_position(
        &mut self,
        dt: f32,
        float_position: Vec2,
        external_force: Vec2,
        rng: &mut impl Rng,
    ) -> PositionPhase<Bait> {
        self.apply_mass_loss(dt, rng);

        let accel_old = self.acceleration(float_position, external_force);
        let (position, phase) = begin_step(self.position, self.velocity, accel_old, dt);
        self.position = position;
        self.constrain_to_tippet(float_position);
        phase
    }

    /// Phase 2: advance velocity with the force at the new position, damp,
    /// re-enforce the tippet, and return the tension for the float
    pub fn update_velocity(
        &mut self,
        phase: PositionPhase<Bait>,
        dt: f32,
        float_position: Vec2,
        external_force: Vec2,
        fish_acceleration: Vec2,
    ) -> Vec2 {
        let accel_new = self.acceleration(float_position, external_force);
        self.velocity = end_step(phase, self.velocity, accel_new, dt);

        let drag = if self.position.y < 0.0 {
            self.drag_coefficient
        } else {
            self.drag_coefficient * 0.1
        };
        self.velocity /= 1.0 + drag * dt / self.mass;
        self.velocity = clamp_magnitude(self.velocity, self.max_speed);

        self.constrain_to_tippet(float_position);
        self.tension_vector(float_position, fish_acceleration)
    }
}
