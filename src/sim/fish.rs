//! Fish agent state machine
//!
//! ```text
//! Idle ──scent or hunger──▶ Approach ──strike roll──▶ Attack ──300ms──▶ Cooldown ──1s──▶ Idle
//! ```
//!
//! While approaching within the sawari radius the fish stirs the water with an
//! Ornstein-Uhlenbeck disturbance. An attack produces a time-shaped suction
//! (tsun) felt through a dipole-like field around the mouth. Suck strength is
//! derived from the `Attack` variant, so it is zero in every other state.

use glam::Vec2;
use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::guards::{MIN_DISTANCE, clamp_magnitude, finite_or_zero};
use crate::config::{FishConfig, PhysicsConfig};

/// Length of the suction event (s)
pub const ATTACK_DURATION: f32 = 0.3;
/// Length of the retreat (s)
pub const COOLDOWN_DURATION: f32 = 1.0;

const RAMP_END: f32 = 0.05;
const RAMP_PEAK: f32 = 0.5;
const BURST_CENTER: f32 = 0.10;
const BURST_END: f32 = 0.15;
const BURST_SIGMA: f32 = 0.025;
const BURST_AMPLITUDE: f32 = 5.0;
const DECAY_TAU: f32 = 0.10;

/// Suction below this strength is treated as off
const SUCK_EPSILON: f32 = 0.01;
/// OU variable decay per frame while out of sawari range
const OU_OUT_OF_RANGE_DECAY: f32 = 0.9;
const IDLE_WANDER: f32 = 0.01;
const IDLE_DRAG: f32 = 0.95;
const APPROACH_SPEED: f32 = 0.1;
/// Below this distance the fish stops steering
const APPROACH_STOP: f32 = 0.01;
const BITE_MOVE_SPEED: f32 = 0.2;
const KESHIKOMI_BOOST: f32 = 1.5;
const NORMAL_JITTER: f32 = 0.05;
const RETREAT_SPEED: f32 = 0.05;
/// Bait below this mass ratio doubles the strike rate
const DEPLETED_BAIT_RATIO: f32 = 0.3;

/// How the fish moves while holding the bait
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiteType {
    /// Stays put, small jitter
    Normal,
    /// Rises: lifts the bait weight off the float
    Kuiage,
    /// Plunges: drags the float under
    Keshikomi,
}

impl BiteType {
    /// 60% normal, 20% kuiage, 20% keshikomi
    pub fn sample(rng: &mut impl Rng) -> Self {
        let roll: f32 = rng.random();
        if roll < 0.6 {
            BiteType::Normal
        } else if roll < 0.8 {
            BiteType::Kuiage
        } else {
            BiteType::Keshikomi
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FishState {
    /// Random wandering
    Idle,
    /// Steering toward the bait, stirring sawari when close
    Approach,
    /// Sucking in the bait
    Attack {
        /// Time since the strike began (s)
        elapsed: f32,
        bite: BiteType,
        /// Unit vector from fish to bait at the moment of the strike
        strike_dir: Vec2,
    },
    /// Backing away after a strike
    Cooldown { elapsed: f32, strike_dir: Vec2 },
}

impl FishState {
    pub fn name(&self) -> &'static str {
        match self {
            FishState::Idle => "IDLE",
            FishState::Approach => "APPROACH",
            FishState::Attack { .. } => "ATTACK",
            FishState::Cooldown { .. } => "COOLDOWN",
        }
    }
}

/// Three-stage tsun profile over time since the strike began.
///
/// Linear ramp to 0.5 over 50ms, Gaussian burst peaking at 5.0 at 100ms,
/// then exponential decay (τ = 100ms) from the end of the burst at 150ms.
pub fn suck_profile(t: f32) -> f32 {
    if t < 0.0 {
        0.0
    } else if t < RAMP_END {
        RAMP_PEAK * (t / RAMP_END)
    } else if t < BURST_END {
        burst(t)
    } else {
        burst(BURST_END) * (-(t - BURST_END) / DECAY_TAU).exp()
    }
}

#[inline]
fn burst(t: f32) -> f32 {
    let d = t - BURST_CENTER;
    BURST_AMPLITUDE * (-(d * d) / (2.0 * BURST_SIGMA * BURST_SIGMA)).exp()
}

/// Dipole falloff `(r/r0)²·exp(-r/r0)`: zero at the mouth, peak at `2·r0`
#[inline]
pub fn dipole_profile(r: f32, r0: f32) -> f32 {
    let x = r / r0;
    x * x * (-x).exp()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FishAgent {
    pub id: u32,
    pub position: Vec2,
    pub velocity: Vec2,
    /// 0..=1
    pub hunger: f32,
    /// 0..=1
    pub caution: f32,
    /// Strike attempts per second at full hunger and no caution
    pub attack_rate: f32,
    pub state: FishState,
    /// Mean-reverting internal variable behind the sawari
    ou: Vec2,
    disturbance: Vec2,
    config: FishConfig,
    max_speed: f32,
}

impl FishAgent {
    pub fn new(
        id: u32,
        position: Vec2,
        hunger: f32,
        caution: f32,
        attack_rate: f32,
        config: &PhysicsConfig,
    ) -> Self {
        Self {
            id,
            position,
            velocity: Vec2::ZERO,
            hunger: hunger.clamp(0.0, 1.0),
            caution: caution.clamp(0.0, 1.0),
            attack_rate,
            state: FishState::Idle,
            ou: Vec2::ZERO,
            disturbance: Vec2::ZERO,
            config: config.fish.clone(),
            max_speed: config.caps.max_speed,
        }
    }

    /// Current suction strength; non-zero only while attacking
    pub fn suck_strength(&self) -> f32 {
        match self.state {
            FishState::Attack { elapsed, .. } => suck_profile(elapsed),
            _ => 0.0,
        }
    }

    pub fn bite_type(&self) -> Option<BiteType> {
        match self.state {
            FishState::Attack { bite, .. } => Some(bite),
            _ => None,
        }
    }

    /// Time since the strike began, while attacking
    pub fn attack_elapsed(&self) -> Option<f32> {
        match self.state {
            FishState::Attack { elapsed, .. } => Some(elapsed),
            _ => None,
        }
    }

    pub fn is_attacking(&self) -> bool {
        matches!(self.state, FishState::Attack { .. })
    }

    /// Sawari force produced this frame
    pub fn disturbance_force(&self) -> Vec2 {
        self.disturbance
    }

    /// Internal OU variable (for diagnostics)
    pub fn ou_state(&self) -> Vec2 {
        self.ou
    }

    /// Suction pulling `target` toward the mouth.
    ///
    /// Exactly zero when the fish is not sucking, the target is beyond the
    /// cutoff, or the target sits on the mouth.
    pub fn suction_force(&self, target: Vec2) -> Vec2 {
        let strength = self.suck_strength();
        if strength < SUCK_EPSILON {
            return Vec2::ZERO;
        }
        let to_mouth = self.position - target;
        let r = to_mouth.length();
        if r < MIN_DISTANCE || r > self.config.suck_cutoff {
            return Vec2::ZERO;
        }
        let magnitude = strength * dipole_profile(r, self.config.suck_range);
        finite_or_zero(to_mouth / r * magnitude)
    }

    /// Suction force per fish mass, capped; used to unload the tippet
    pub fn suction_acceleration(&self, target: Vec2) -> Vec2 {
        clamp_magnitude(self.suction_force(target) / self.config.mass, self.config.max_accel)
    }

    /// Advance the state machine one frame and move the fish
    pub fn update(
        &mut self,
        dt: f32,
        bait_position: Vec2,
        scent_density: f32,
        bait_mass_ratio: f32,
        rng: &mut impl Rng,
    ) {
        self.disturbance = Vec2::ZERO;

        match self.state {
            FishState::Idle => self.idle(scent_density, rng),
            FishState::Approach => self.approach(dt, bait_position, bait_mass_ratio, rng),
            FishState::Attack {
                elapsed,
                bite,
                strike_dir,
            } => self.attack(dt, elapsed + dt, bite, strike_dir, rng),
            FishState::Cooldown {
                elapsed,
                strike_dir,
            } => self.cooldown(elapsed + dt, strike_dir),
        }

        self.velocity = clamp_magnitude(self.velocity, self.max_speed);
        self.position += self.velocity * dt;

        // Fish cannot leave the water; bounce softly off the surface
        if self.position.y > 0.0 {
            self.position.y = 0.0;
            if self.velocity.y > 0.0 {
                self.velocity.y *= -0.5;
            }
        }
    }

    fn idle(&mut self, scent_density: f32, rng: &mut impl Rng) {
        self.velocity += gaussian2(rng) * IDLE_WANDER;
        self.velocity *= IDLE_DRAG;

        if scent_density > self.config.scent_threshold || self.hunger > self.config.hunger_threshold {
            log::debug!("Fish {} IDLE -> APPROACH (scent {scent_density:.2})", self.id);
            self.state = FishState::Approach;
        }
    }

    fn approach(&mut self, dt: f32, bait_position: Vec2, bait_mass_ratio: f32, rng: &mut impl Rng) {
        let to_bait = bait_position - self.position;
        let distance = to_bait.length();

        if distance > APPROACH_STOP {
            self.velocity = to_bait / distance * APPROACH_SPEED * self.hunger;
        }

        let sawari_distance = self.config.sawari_distance;
        if distance < sawari_distance {
            let theta = self.config.ou_theta;
            let sigma = self.config.ou_sigma;
            self.ou += -theta * self.ou * dt + sigma * dt.sqrt() * gaussian2(rng);
            let strength = (sawari_distance - distance) * 2.0;
            self.disturbance = self.ou * strength;
        } else {
            self.ou *= OU_OUT_OF_RANGE_DECAY;
        }

        if distance < self.config.strike_distance {
            let mut probability = self.hunger * (1.0 - self.caution) * self.attack_rate * dt;
            if bait_mass_ratio < DEPLETED_BAIT_RATIO {
                probability *= 2.0;
            }
            if rng.random::<f32>() < probability {
                let bite = BiteType::sample(rng);
                let strike_dir = to_bait.normalize_or(Vec2::Y);
                log::debug!("Fish {} APPROACH -> ATTACK ({bite:?})", self.id);
                self.state = FishState::Attack {
                    elapsed: 0.0,
                    bite,
                    strike_dir,
                };
            }
        }
    }

    fn attack(&mut self, dt: f32, elapsed: f32, bite: BiteType, strike_dir: Vec2, rng: &mut impl Rng) {
        match bite {
            BiteType::Kuiage => {
                self.velocity += Vec2::Y * BITE_MOVE_SPEED * dt;
            }
            BiteType::Keshikomi => {
                let mut dive = -strike_dir;
                if dive.y >= 0.0 {
                    dive.y = -1.0;
                }
                self.velocity += dive * BITE_MOVE_SPEED * KESHIKOMI_BOOST * dt;
            }
            BiteType::Normal => {
                self.velocity += gaussian2(rng) * NORMAL_JITTER * dt;
            }
        }

        self.state = if elapsed > ATTACK_DURATION {
            log::debug!("Fish {} ATTACK -> COOLDOWN", self.id);
            FishState::Cooldown {
                elapsed: 0.0,
                strike_dir,
            }
        } else {
            FishState::Attack {
                elapsed,
                bite,
                strike_dir,
            }
        };
    }

    fn cooldown(&mut self, elapsed: f32, strike_dir: Vec2) {
        self.velocity = -strike_dir * RETREAT_SPEED;

        if elapsed > COOLDOWN_DURATION {
            log::debug!("Fish {} COOLDOWN -> IDLE", self.id);
            self.state = FishState::Idle;
            self.ou = Vec2::ZERO;
        } else {
            self.state = FishState::Cooldown {
                elapsed,
                strike_dir,
            };
        }
    }
}

#[inline]
fn gaussian2(rng: &mut impl Rng) -> Vec2 {
    Vec2::new(rng.sample(StandardNormal), rng.sample(StandardNormal))
}
