//! Numeric guards shared by every body
//!
//! All of these are silent: a bad frame is clamped or zeroed and the step
//! carries on.

use glam::Vec2;

/// Distances below this are treated as coincident points
pub const MIN_DISTANCE: f32 = 1e-6;

/// Replace a vector with a non-finite component by zero
#[inline]
pub fn finite_or_zero(v: Vec2) -> Vec2 {
    if v.is_finite() { v } else { Vec2::ZERO }
}

/// Scale a vector down to `max` length, zeroing non-finite input
#[inline]
pub fn clamp_magnitude(v: Vec2, max: f32) -> Vec2 {
    finite_or_zero(v).clamp_length_max(max)
}

/// Clamp a scalar to `[-max, max]`, zeroing non-finite input
#[inline]
pub fn clamp_scalar(x: f32, max: f32) -> f32 {
    if x.is_finite() { x.clamp(-max, max) } else { 0.0 }
}

/// Smoothed vertical damping for a body crossing into the water.
///
/// Only downward motion inside `±zone` is damped. Above the surface the
/// effect ramps linearly from none at `y = zone` to full strength at `y = 0`
/// and stays full underwater, keeping `damping_factor` of the vertical
/// velocity.
pub fn water_entry_damping(position: Vec2, velocity: Vec2, damping_factor: f32, zone: f32) -> Vec2 {
    let y = position.y;
    if !(y > -zone && y < zone && velocity.y < 0.0) {
        return velocity;
    }

    let depth_factor = if y >= 0.0 { (zone - y) / zone } else { 1.0 };
    let damping = 1.0 - (1.0 - damping_factor) * depth_factor;
    Vec2::new(velocity.x, velocity.y * damping)
}
