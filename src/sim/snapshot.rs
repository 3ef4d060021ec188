//! Read-only per-frame view for renderers and loggers

use glam::Vec2;
use serde::Serialize;

use super::fish::{BiteType, FishAgent};
use super::rig::Rig;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FishView {
    pub id: u32,
    pub state: &'static str,
    pub position: Vec2,
    pub suck_strength: f32,
    pub bite: Option<BiteType>,
    /// Time since the strike began, while attacking
    pub attack_elapsed: Option<f32>,
}

impl From<&FishAgent> for FishView {
    fn from(fish: &FishAgent) -> Self {
        Self {
            id: fish.id,
            state: fish.state.name(),
            position: fish.position,
            suck_strength: fish.suck_strength(),
            bite: fish.bite_type(),
            attack_elapsed: fish.attack_elapsed(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub frame: u64,
    pub float_position: Vec2,
    pub float_angle: f32,
    pub bait_position: Vec2,
    pub bait_mass_ratio: f32,
    pub fishes: Vec<FishView>,
    pub particles: Vec<Vec2>,
    pub rod_tip: Vec2,
    pub hand: Vec2,
    /// Derived from successive hand inputs
    pub hand_velocity: Vec2,
    pub line_tension: Vec2,
    pub water_cut: bool,
}

impl Snapshot {
    pub fn capture(rig: &Rig) -> Self {
        Self {
            frame: rig.frame(),
            float_position: rig.float.position,
            float_angle: rig.float.angle,
            bait_position: rig.bait.position,
            bait_mass_ratio: rig.bait.mass_ratio(),
            fishes: rig.fishes.iter().map(FishView::from).collect(),
            particles: rig.bait.scent.particles().to_vec(),
            rod_tip: rig.rod.tip_position,
            hand: rig.rod.hand_position,
            hand_velocity: rig.rod.hand_velocity,
            line_tension: rig.line_tension(),
            water_cut: rig.line.is_water_cut(),
        }
    }
}
