//! Rod tip: a point mass on a spring-damper to the hand
//!
//! `m·a = -k·(x_tip - x_hand) - c·v + F_ext`

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::guards::clamp_magnitude;
use super::integrator::{PositionPhase, begin_step, end_step};
use crate::config::{PhysicsConfig, RodConfig};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Rod {
    /// Hand anchor (external input)
    pub hand_position: Vec2,
    /// Hand velocity derived from successive inputs
    pub hand_velocity: Vec2,
    pub tip_position: Vec2,
    pub tip_velocity: Vec2,
    pub mass: f32,
    pub stiffness: f32,
    pub damping: f32,
    max_acceleration: f32,
    max_speed: f32,
}

impl Rod {
    pub fn new(config: &PhysicsConfig) -> Self {
        let RodConfig {
            mass,
            stiffness,
            damping,
        } = config.rod;
        Self {
            hand_position: Vec2::ZERO,
            hand_velocity: Vec2::ZERO,
            tip_position: Vec2::ZERO,
            tip_velocity: Vec2::ZERO,
            mass,
            stiffness,
            damping,
            max_acceleration: config.caps.max_acceleration,
            max_speed: config.caps.max_speed,
        }
    }

    /// Put hand and tip at rest at `anchor`
    pub fn reset(&mut self, anchor: Vec2) {
        self.hand_position = anchor;
        self.hand_velocity = Vec2::ZERO;
        self.tip_position = anchor;
        self.tip_velocity = Vec2::ZERO;
    }

    /// Move the hand anchor, deriving its velocity over `dt`
    pub fn set_hand(&mut self, position: Vec2, dt: f32) {
        if dt > 0.0 {
            self.hand_velocity = (position - self.hand_position) / dt;
        }
        self.hand_position = position;
    }

    pub fn acceleration(&self, external_force: Vec2) -> Vec2 {
        let spring = -self.stiffness * (self.tip_position - self.hand_position);
        let damper = -self.damping * self.tip_velocity;
        clamp_magnitude((spring + damper + external_force) / self.mass, self.max_acceleration)
    }

    /// Phase 1: advance the tip with the force acting at the old position
    pub fn update_position(&mut self, dt: f32, external_force: Vec2) -> PositionPhase<Rod> {
        let accel_old = self.acceleration(external_force);
        let (position, phase) = begin_step(self.tip_position, self.tip_velocity, accel_old, dt);
        self.tip_position = position;
        phase
    }

    /// Phase 2: advance tip velocity with the force at the new position,
    /// capped at the safety speed
    pub fn update_velocity(&mut self, phase: PositionPhase<Rod>, dt: f32, external_force: Vec2) {
        let accel_new = self.acceleration(external_force);
        let velocity = end_step(phase, self.tip_velocity, accel_new, dt);
        self.tip_velocity = clamp_magnitude(velocity, self.max_speed);
    }
}
