//! Float: two coaxial cylinders (slender top over a thicker body)
//!
//! `position` is the top tip where the line ties on. The top hangs below it,
//! then the body, whose lower end carries the tippet.
//!
//! ```text
//!   tip            y
//!    |  top        y - top_length
//!   [ ] body       y - top_length - body_length
//! ```
//!
//! Drag is not part of the acceleration; it is applied as implicit velocity
//! damping after the velocity phase.

use std::f32::consts::PI;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::guards::{MIN_DISTANCE, clamp_magnitude, clamp_scalar};
use super::integrator::{PositionPhase, begin_step, end_step};
use crate::config::PhysicsConfig;
use crate::consts::{GRAVITY, WATER_DENSITY};
use crate::wrap_angle;

/// Length of the span `[bottom, top]` lying below the water plane `y = 0`
#[inline]
pub fn submerged_length(bottom: f32, top: f32) -> f32 {
    if top <= 0.0 {
        top - bottom
    } else if bottom >= 0.0 {
        0.0
    } else {
        -bottom
    }
}

/// Position phase of the float: linear token plus the old angular acceleration
#[must_use = "the velocity phase must consume this token"]
#[derive(Debug)]
pub struct FloatPhase {
    linear: PositionPhase<FloatBody>,
    alpha_old: f32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FloatBody {
    /// Top tip (line attachment)
    pub position: Vec2,
    pub velocity: Vec2,
    /// Tilt from upright (rad), 0 = upright, ±π/2 = lying flat
    pub angle: f32,
    pub angular_velocity: f32,
    pub mass: f32,
    pub top_radius: f32,
    pub top_length: f32,
    pub body_radius: f32,
    pub body_length: f32,
    pub metacentric_height: f32,
    pub rotational_drag: f32,
    pub rotational_viscosity: f32,
    drag_coefficient: f32,
    lateral_damping: f32,
    vertical_damping: f32,
    meniscus_damping: f32,
    meniscus_zone: f32,
    max_acceleration: f32,
    max_speed: f32,
    max_angular_velocity: f32,
    max_angular_acceleration: f32,
}

impl FloatBody {
    pub fn new(config: &PhysicsConfig) -> Self {
        let f = &config.float;
        Self {
            position: Vec2::ZERO,
            velocity: Vec2::ZERO,
            angle: 0.0,
            angular_velocity: 0.0,
            mass: f.mass,
            top_radius: f.top_radius,
            top_length: f.top_length,
            body_radius: f.body_radius,
            body_length: f.body_length,
            metacentric_height: f.metacentric_height,
            rotational_drag: f.rotational_drag,
            rotational_viscosity: f.rotational_viscosity,
            drag_coefficient: f.drag_coefficient,
            lateral_damping: f.lateral_damping,
            vertical_damping: f.vertical_damping,
            meniscus_damping: f.meniscus_damping,
            meniscus_zone: f.meniscus_zone,
            max_acceleration: config.caps.max_acceleration,
            max_speed: config.caps.max_speed,
            max_angular_velocity: config.caps.max_angular_velocity,
            max_angular_acceleration: config.caps.max_angular_acceleration,
        }
    }

    pub fn reset(&mut self, position: Vec2, velocity: Vec2, angle: f32) {
        self.position = position;
        self.velocity = velocity;
        self.angle = wrap_angle(angle);
        self.angular_velocity = 0.0;
    }

    pub fn total_length(&self) -> f32 {
        self.top_length + self.body_length
    }

    /// y of the top/body joint
    pub fn joint_y(&self) -> f32 {
        self.position.y - self.top_length
    }

    /// y of the body's lower end
    pub fn bottom_y(&self) -> f32 {
        self.joint_y() - self.body_length
    }

    /// Submerged volume (m³)
    pub fn submerged_volume(&self) -> f32 {
        let tip = self.position.y;
        let joint = self.joint_y();
        let bottom = self.bottom_y();
        let top = PI * self.top_radius * self.top_radius * submerged_length(joint, tip);
        let body = PI * self.body_radius * self.body_radius * submerged_length(bottom, joint);
        top + body
    }

    /// Upward buoyant force magnitude (N)
    pub fn buoyancy(&self) -> f32 {
        WATER_DENSITY * GRAVITY * self.submerged_volume()
    }

    pub fn weight(&self) -> f32 {
        self.mass * GRAVITY
    }

    /// Gravity, buoyancy and external force only; drag is applied afterwards
    pub fn acceleration(&self, external_force: Vec2) -> Vec2 {
        let gravity = Vec2::new(0.0, -self.weight());
        let buoyancy = Vec2::new(0.0, self.buoyancy());
        clamp_magnitude((gravity + buoyancy + external_force) / self.mass, self.max_acceleration)
    }

    /// Thin-rod moment of inertia about the centre
    pub fn moment_of_inertia(&self) -> f32 {
        let length = self.total_length();
        self.mass * length * length / 12.0
    }

    /// Righting (or capsizing) torque from buoyancy and the hanging tippet load
    pub fn restoring_torque(&self, tippet_tension: f32) -> f32 {
        let sin = self.angle.sin();
        let metacentric = -(self.buoyancy() - self.weight()) * sin * self.metacentric_height;
        let arm = self.total_length() / 2.0;
        let tippet = -tippet_tension * sin * arm;
        metacentric + tippet
    }

    pub fn damping_torque(&self) -> f32 {
        let omega = self.angular_velocity;
        -(self.rotational_drag * omega.abs() * omega + self.rotational_viscosity * omega)
    }

    pub fn angular_acceleration(&self, tippet_tension: f32) -> f32 {
        let torque = self.restoring_torque(tippet_tension) + self.damping_torque();
        clamp_scalar(torque / self.moment_of_inertia(), self.max_angular_acceleration)
    }

    /// Phase 1: position and angle from the old accelerations
    pub fn update_position(&mut self, dt: f32, external_force: Vec2, tippet_tension: f32) -> FloatPhase {
        let accel_old = self.acceleration(external_force);
        let alpha_old = self.angular_acceleration(tippet_tension);

        let (position, linear) = begin_step(self.position, self.velocity, accel_old, dt);
        self.position = position;
        self.angle = wrap_angle(self.angle + self.angular_velocity * dt + 0.5 * alpha_old * dt * dt);

        FloatPhase { linear, alpha_old }
    }

    /// Phase 2: velocity from averaged acceleration, then implicit damping,
    /// then angular velocity from the torque at the new angle
    pub fn update_velocity(&mut self, phase: FloatPhase, dt: f32, external_force: Vec2, tippet_tension: f32) {
        let accel_new = self.acceleration(external_force);
        self.velocity = end_step(phase.linear, self.velocity, accel_new, dt);
        self.apply_damping(dt);

        let alpha_new = self.angular_acceleration(tippet_tension);
        self.angular_velocity += 0.5 * (phase.alpha_old + alpha_new) * dt;
        self.clamp_angular_state();
    }

    fn apply_damping(&mut self, dt: f32) {
        self.velocity = clamp_magnitude(self.velocity, self.max_speed);

        // Quadratic drag, weaker in air
        let speed = self.velocity.length();
        if speed > MIN_DISTANCE {
            let coefficient = if self.position.y < 0.0 {
                self.drag_coefficient
            } else {
                self.drag_coefficient * 0.1
            };
            self.velocity /= 1.0 + coefficient * speed * dt / self.mass;
        }

        // Slender body: resists sway, barely resists heave
        if self.bottom_y() < 0.0 {
            self.velocity.x /= 1.0 + self.lateral_damping * dt / self.mass;
            self.velocity.y /= 1.0 + self.vertical_damping * dt / self.mass;
        }

        // Meniscus drag near the waterline
        let height = self.position.y.abs();
        if height < self.meniscus_zone {
            let strength = 1.0 - height / self.meniscus_zone;
            self.velocity.y /= 1.0 + self.meniscus_damping * strength * dt / self.mass;
        }
    }

    fn clamp_angular_state(&mut self) {
        self.angular_velocity = clamp_scalar(self.angular_velocity, self.max_angular_velocity);
        self.angle = wrap_angle(self.angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::SIM_DT;
    use proptest::prelude::*;

    fn float_at(y: f32) -> FloatBody {
        let mut body = FloatBody::new(&PhysicsConfig::default());
        body.reset(Vec2::new(0.0, y), Vec2::ZERO, 0.0);
        body
    }

    fn full_volume(body: &FloatBody) -> f32 {
        PI * (body.top_radius.powi(2) * body.top_length + body.body_radius.powi(2) * body.body_length)
    }

    #[test]
    fn test_submerged_length_cases() {
        assert_eq!(submerged_length(-0.3, -0.1), 0.2);
        assert_eq!(submerged_length(0.1, 0.3), 0.0);
        assert_eq!(submerged_length(-0.05, 0.1), 0.05);
    }

    #[test]
    fn test_buoyancy_extremes() {
        let dry = float_at(1.0);
        assert_eq!(dry.buoyancy(), 0.0);

        let sunk = float_at(-1.0);
        let expected = WATER_DENSITY * GRAVITY * full_volume(&sunk);
        assert!((sunk.buoyancy() - expected).abs() / expected < 1e-5);
    }

    #[test]
    fn test_buoyancy_continuous_at_joint() {
        let base = float_at(0.10);
        let eps = 1e-5;
        let above = float_at(base.top_length + eps).buoyancy();
        let at = float_at(base.top_length).buoyancy();
        let below = float_at(base.top_length - eps).buoyancy();
        // Largest slope is the body's cross-section
        let max_jump = WATER_DENSITY * GRAVITY * PI * base.body_radius.powi(2) * eps * 2.0;
        assert!((at - above).abs() <= max_jump);
        assert!((below - at).abs() <= max_jump);
    }

    proptest! {
        #[test]
        fn prop_buoyancy_continuous_and_monotone(y in -0.3f32..0.3, dy in 1e-4f32..1e-3) {
            let upper = float_at(y + dy).buoyancy();
            let lower = float_at(y).buoyancy();
            prop_assert!(upper >= 0.0);
            // Deeper never floats less
            prop_assert!(lower >= upper - 1e-7);
            // Lipschitz in depth with the body's cross-section as bound
            let slope = WATER_DENSITY * GRAVITY * PI * 0.005f32.powi(2);
            prop_assert!(lower - upper <= slope * dy * 1.01 + 1e-6);
        }
    }

    #[test]
    fn test_horizontal_damping_dominates_vertical() {
        let mut body = float_at(0.02);
        body.velocity = Vec2::new(0.1, 0.1);
        body.apply_damping(SIM_DT);
        assert!(body.velocity.x < 0.001);
        assert!(body.velocity.y > 0.05);
    }

    #[test]
    fn test_air_drag_weaker_than_water() {
        let mut air = float_at(0.5);
        air.velocity = Vec2::new(0.0, -1.0);
        air.apply_damping(SIM_DT);

        let mut wet = float_at(-0.05);
        wet.velocity = Vec2::new(0.0, -1.0);
        wet.apply_damping(SIM_DT);

        assert!(air.velocity.y.abs() > wet.velocity.y.abs());
    }

    #[test]
    fn test_meniscus_only_near_surface() {
        let mut near = float_at(0.0);
        near.meniscus_zone = 0.01;
        let mut far = float_at(0.02);
        near.velocity = Vec2::new(0.0, 0.01);
        far.velocity = Vec2::new(0.0, 0.01);
        near.apply_damping(SIM_DT);
        far.apply_damping(SIM_DT);
        assert!(near.velocity.y < far.velocity.y);
    }

    #[test]
    fn test_free_fall_in_air() {
        let mut body = float_at(0.5);
        let phase = body.update_position(SIM_DT, Vec2::ZERO, 0.0);
        body.update_velocity(phase, SIM_DT, Vec2::ZERO, 0.0);
        // Gravity only, minus a little air drag
        assert!(body.velocity.y < -0.1);
        assert!(body.velocity.y > -GRAVITY * SIM_DT - 1e-6);
        assert!(body.position.y < 0.5);
    }

    #[test]
    fn test_tippet_load_rights_a_tilted_float() {
        let mut body = float_at(0.05);
        body.angle = 0.5;
        // Hold the float at its height so only rotation evolves
        let hold = Vec2::new(0.0, body.weight() - body.buoyancy());
        let tippet = 0.0006 * GRAVITY;
        for _ in 0..600 {
            body.position = Vec2::new(0.0, 0.05);
            body.velocity = Vec2::ZERO;
            let phase = body.update_position(SIM_DT, hold, tippet);
            body.update_velocity(phase, SIM_DT, hold, tippet);
        }
        assert!(body.angle.abs() < 0.05, "angle {}", body.angle);
    }

    #[test]
    fn test_negative_reserve_capsizes() {
        // Out of the water the weight exceeds buoyancy and nothing hangs below
        let body = float_at(1.0);
        let mut tilted = body.clone();
        tilted.angle = 0.2;
        assert!(tilted.restoring_torque(0.0) > 0.0);
    }

    #[test]
    fn test_angular_state_guarded() {
        let mut body = float_at(0.05);
        body.angular_velocity = 1e6;
        body.angle = 7.0;
        body.clamp_angular_state();
        assert_eq!(body.angular_velocity, body.max_angular_velocity);
        assert!(body.angle > -PI && body.angle <= PI);

        body.angle = f32::NAN;
        body.clamp_angular_state();
        assert_eq!(body.angle, 0.0);
    }
}
