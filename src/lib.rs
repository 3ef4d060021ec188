//! Awase - physics and fish agent core for a float-fishing timing game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (rod, line, float, bait, fish agents)
//! - `config`: Flat physics constants and difficulty presets
//! - `error`: Configuration errors
//!
//! Coordinates are metres with `y = 0` at the water surface, `y < 0` underwater.

pub mod config;
pub mod error;
pub mod sim;

pub use config::{Difficulty, DifficultyPreset, PhysicsConfig};
pub use error::ConfigError;
pub use sim::{FrameInput, Rig, Snapshot};

/// Physical constants and fixed timestep
pub mod consts {
    /// Fixed simulation timestep (60 Hz)
    pub const SIM_DT: f32 = 1.0 / 60.0;

    /// Gravitational acceleration (m/s²)
    pub const GRAVITY: f32 = 9.81;
    /// Water density (kg/m³)
    pub const WATER_DENSITY: f32 = 1000.0;
}

/// Wrap an angle to (-π, π]. Non-finite input maps to 0.
#[inline]
pub fn wrap_angle(mut angle: f32) -> f32 {
    use std::f32::consts::{PI, TAU};
    if !angle.is_finite() {
        return 0.0;
    }
    if angle.abs() > 4.0 * TAU {
        angle %= TAU;
    }
    while angle > PI {
        angle -= TAU;
    }
    while angle <= -PI {
        angle += TAU;
    }
    angle
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::f32::consts::PI;

    #[test]
    fn test_wrap_angle_boundaries() {
        assert_eq!(wrap_angle(PI), PI);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI / 2.0) + PI / 2.0).abs() < 1e-5);
        assert_eq!(wrap_angle(f32::NAN), 0.0);
        assert_eq!(wrap_angle(f32::INFINITY), 0.0);
    }

    proptest! {
        #[test]
        fn prop_wrap_angle_in_range(angle in -1000.0f32..1000.0) {
            let wrapped = wrap_angle(angle);
            prop_assert!(wrapped > -PI && wrapped <= PI);
            // Same direction on the unit circle
            prop_assert!((wrapped.sin() - angle.sin()).abs() < 1e-2);
            prop_assert!((wrapped.cos() - angle.cos()).abs() < 1e-2);
        }
    }
}
