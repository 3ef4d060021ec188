//! Two-phase velocity-Verlet stepping
//!
//! Phase 1 advances position with the old acceleration and hands back a
//! [`PositionPhase`] token that caches it. Phase 2 consumes the token, so a
//! velocity update without a preceding position update does not compile.
//!
//! ```text
//! x' = x + v·dt + ½·a_old·dt²
//! v' = v + ½·(a_old + a_new)·dt
//! ```

use std::marker::PhantomData;

use glam::Vec2;

/// Result of a body's position phase, required by its velocity phase.
///
/// Tagged with the body type so a rod token cannot complete a float step.
/// Not `Clone`: each position phase completes exactly one velocity phase.
#[must_use = "the velocity phase must consume this token"]
#[derive(Debug)]
pub struct PositionPhase<B> {
    accel_old: Vec2,
    _body: PhantomData<fn() -> B>,
}

impl<B> PositionPhase<B> {
    /// Acceleration used for the position update
    pub fn accel_old(&self) -> Vec2 {
        self.accel_old
    }
}

/// Phase 1: new position from the old acceleration
#[inline]
pub fn begin_step<B>(position: Vec2, velocity: Vec2, accel_old: Vec2, dt: f32) -> (Vec2, PositionPhase<B>) {
    let new_position = position + velocity * dt + 0.5 * accel_old * dt * dt;
    let phase = PositionPhase {
        accel_old,
        _body: PhantomData,
    };
    (new_position, phase)
}

/// Phase 2: new velocity from the averaged acceleration
///
/// ```
/// use awase::sim::integrator::{begin_step, end_step};
/// use glam::Vec2;
///
/// struct Tip;
/// let gravity = Vec2::new(0.0, -9.81);
/// let (x, phase) = begin_step::<Tip>(Vec2::ZERO, Vec2::ZERO, gravity, 0.1);
/// let v = end_step(phase, Vec2::ZERO, gravity, 0.1);
/// assert!(x.y < 0.0 && v.y < 0.0);
/// ```
///
/// A velocity phase needs a position phase first:
///
/// ```compile_fail
/// use awase::sim::integrator::end_step;
/// use glam::Vec2;
///
/// struct Tip;
/// let v = end_step::<Tip>(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, 1.0 / 60.0);
/// ```
///
/// Each token completes exactly one velocity phase:
///
/// ```compile_fail
/// use awase::sim::integrator::{begin_step, end_step};
/// use glam::Vec2;
///
/// struct Tip;
/// let dt = 1.0 / 60.0;
/// let (_, phase) = begin_step::<Tip>(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, dt);
/// let v = end_step(phase, Vec2::ZERO, Vec2::ZERO, dt);
/// let v = end_step(phase, v, Vec2::ZERO, dt);
/// ```
///
/// And belongs to the body that produced it:
///
/// ```compile_fail
/// use awase::sim::integrator::{PositionPhase, begin_step, end_step};
/// use awase::sim::{Bait, Rod};
/// use glam::Vec2;
///
/// let dt = 1.0 / 60.0;
/// let (_, phase): (Vec2, PositionPhase<Rod>) = begin_step(Vec2::ZERO, Vec2::ZERO, Vec2::ZERO, dt);
/// let v = end_step::<Bait>(phase, Vec2::ZERO, Vec2::ZERO, dt);
/// ```
#[inline]
pub fn end_step<B>(phase: PositionPhase<B>, velocity: Vec2, accel_new: Vec2, dt: f32) -> Vec2 {
    velocity + 0.5 * (phase.accel_old + accel_new) * dt
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Tip;

    /// Single-pass explicit Euler, kept only to compare energy drift.
    fn euler_reference(position: Vec2, velocity: Vec2, accel: Vec2, dt: f32) -> (Vec2, Vec2) {
        (position + velocity * dt + 0.5 * accel * dt * dt, velocity + accel * dt)
    }

    fn oscillator_energy(x: Vec2, v: Vec2, k: f32, m: f32) -> f32 {
        0.5 * k * x.length_squared() + 0.5 * m * v.length_squared()
    }

    #[test]
    fn test_constant_acceleration_is_exact() {
        let a = Vec2::new(0.0, -9.81);
        let dt = 0.1;
        let (x, phase) = begin_step::<Tip>(Vec2::ZERO, Vec2::new(1.0, 0.0), a, dt);
        let v = end_step(phase, Vec2::new(1.0, 0.0), a, dt);

        assert!((x - Vec2::new(0.1, -0.5 * 9.81 * 0.01)).length() < 1e-6);
        assert!((v - Vec2::new(1.0, -0.981)).length() < 1e-6);
    }

    #[test]
    fn test_velocity_uses_averaged_acceleration() {
        let (_, phase) = begin_step::<Tip>(Vec2::ZERO, Vec2::ZERO, Vec2::new(2.0, 0.0), 1.0);
        assert_eq!(phase.accel_old(), Vec2::new(2.0, 0.0));
        let v = end_step(phase, Vec2::ZERO, Vec2::new(4.0, 0.0), 1.0);
        assert_eq!(v, Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_verlet_holds_oscillator_energy_better_than_euler() {
        let (k, m, dt) = (20.0_f32, 0.1_f32, 1.0 / 60.0);
        let x0 = Vec2::new(0.05, 0.0);
        let e0 = oscillator_energy(x0, Vec2::ZERO, k, m);

        let (mut xv, mut vv) = (x0, Vec2::ZERO);
        let (mut xe, mut ve) = (x0, Vec2::ZERO);
        for _ in 0..600 {
            let a_old = -k / m * xv;
            let (x_new, phase) = begin_step::<Tip>(xv, vv, a_old, dt);
            let a_new = -k / m * x_new;
            vv = end_step(phase, vv, a_new, dt);
            xv = x_new;

            let (x_e, v_e) = euler_reference(xe, ve, -k / m * xe, dt);
            xe = x_e;
            ve = v_e;
        }

        let drift_verlet = (oscillator_energy(xv, vv, k, m) - e0).abs() / e0;
        let drift_euler = (oscillator_energy(xe, ve, k, m) - e0).abs() / e0;
        assert!(drift_verlet < 0.05, "verlet drift {drift_verlet}");
        assert!(drift_euler > drift_verlet * 10.0, "euler drift {drift_euler}");
    }
}
