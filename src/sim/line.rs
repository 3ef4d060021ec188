//! Main line: a tension-only spring from rod tip to float
//!
//! Until the water-cut the line slides through the surface film and only a
//! fraction of its tension reaches the float. The cut is a one-way latch.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::guards::{MIN_DISTANCE, finite_or_zero};
use crate::config::PhysicsConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Line {
    pub rest_length: f32,
    pub stiffness: f32,
    pub max_stretch: f32,
    pub max_tension: f32,
    max_length: f32,
    surface_tension_factor: f32,
    water_cut: bool,
}

impl Line {
    pub fn new(config: &PhysicsConfig) -> Self {
        let line = &config.line;
        Self {
            rest_length: line.rest_length,
            stiffness: line.stiffness,
            max_stretch: line.max_stretch,
            max_tension: line.max_tension,
            max_length: line.max_length,
            surface_tension_factor: line.surface_tension_factor,
            water_cut: false,
        }
    }

    pub fn reset(&mut self) {
        self.water_cut = false;
    }

    /// Engage full transmission. Repeated cuts are no-ops.
    pub fn water_cut(&mut self) {
        if !self.water_cut {
            log::debug!("Water-cut: line transmission now full");
        }
        self.water_cut = true;
    }

    pub fn is_water_cut(&self) -> bool {
        self.water_cut
    }

    pub fn transmission(&self) -> f32 {
        if self.water_cut { 1.0 } else { self.surface_tension_factor }
    }

    /// Hard limit on tip-to-float distance
    pub fn max_extent(&self) -> f32 {
        self.rest_length + self.max_stretch
    }

    /// Tension acting on the float, pointing from float toward tip.
    ///
    /// Zero while slack; `k·extension·transmission` otherwise, capped.
    pub fn tension(&self, tip: Vec2, float: Vec2) -> Vec2 {
        let separation = float - tip;
        let length = separation.length();
        if length < MIN_DISTANCE {
            return Vec2::ZERO;
        }
        let direction = separation / length;
        let length = length.min(self.max_length);

        let extension = length - self.rest_length;
        if extension <= 0.0 {
            return Vec2::ZERO;
        }

        let magnitude = (self.stiffness * extension * self.transmission()).min(self.max_tension);
        finite_or_zero(-magnitude * direction)
    }
}
