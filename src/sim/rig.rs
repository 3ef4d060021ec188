//! Per-frame orchestration of the hand → rod → line → float → tippet → bait
//! chain and the fish school
//!
//! Frame order (fixed, symplectic):
//! 1. rod position phase with the previous line tension
//! 2. fish state machines
//! 3. bait position phase with the fish suction
//! 4. float position phase with previous line tension, tippet reaction and
//!    the fish coupling fractions
//! 5. forces recomputed at the new positions
//! 6. rod, bait, float velocity phases
//! 7. water-entry damping and the line length limit

use std::f32::consts::FRAC_PI_2;

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::bait::Bait;
use super::fish::FishAgent;
use super::float::FloatBody;
use super::guards::{MIN_DISTANCE, water_entry_damping};
use super::line::Line;
use super::rod::Rod;
use super::school::create_school;
use super::snapshot::Snapshot;
use crate::config::{Difficulty, PhysicsConfig};
use crate::consts::GRAVITY;

/// Bait starts this far below the float, tippet slack (m)
const BAIT_DROP: f32 = 0.10;
/// The line limit starts pushing back slightly before it is reached (m)
const CONSTRAINT_MARGIN: f32 = 0.001;
/// Odd 64-bit constant spreading round numbers across the seed space
const ROUND_SEED_MIX: u64 = 0x9E37_79B9_7F4A_7C15;

/// RNG seed for one round of a run
fn round_seed(seed: u64, round: u64) -> u64 {
    seed ^ round.wrapping_mul(ROUND_SEED_MIX)
}

/// External input for a single frame
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameInput {
    /// Hand position from the pointer mapping, before the height offset
    pub hand: Vec2,
    /// Break the surface film: full line transmission from now on
    pub water_cut: bool,
}

/// The whole simulated rig: bodies, fish school and the seeded RNG
///
/// The configuration is fixed at construction; the bodies copy their
/// constants from it.
///
/// ```compile_fail
/// use awase::{Difficulty, PhysicsConfig, Rig};
///
/// let mut rig = Rig::new(PhysicsConfig::default(), Difficulty::Normal, 1);
/// rig.config.line.stiffness = 1.0;
/// ```
#[derive(Debug, Clone)]
pub struct Rig {
    config: PhysicsConfig,
    pub difficulty: Difficulty,
    pub rod: Rod,
    pub line: Line,
    pub float: FloatBody,
    pub bait: Bait,
    pub fishes: Vec<FishAgent>,
    rng: Pcg32,
    seed: u64,
    /// Rounds started since construction or the last reseed
    round: u64,
    frame: u64,
    /// Line force on the float from the last completed frame
    line_tension: Vec2,
    /// Tippet force on the bait from the last completed frame
    tippet_tension: Vec2,
}

impl Rig {
    /// Build every body once and start a round
    pub fn new(config: PhysicsConfig, difficulty: Difficulty, seed: u64) -> Self {
        let mut rig = Self {
            rod: Rod::new(&config),
            line: Line::new(&config),
            float: FloatBody::new(&config),
            bait: Bait::new(&config),
            fishes: Vec::new(),
            config,
            difficulty,
            rng: Pcg32::seed_from_u64(seed),
            seed,
            round: 0,
            frame: 0,
            line_tension: Vec2::ZERO,
            tippet_tension: Vec2::ZERO,
        };
        rig.reset();
        rig
    }

    /// Restart the current round in place.
    ///
    /// Bodies are overwritten, not rebuilt. The RNG restarts from the
    /// round's seed, so resetting twice is the same as resetting once.
    pub fn reset(&mut self) {
        self.rng = Pcg32::seed_from_u64(round_seed(self.seed, self.round));

        self.rod.reset(Vec2::new(0.0, self.config.hand_y_offset));
        self.line.reset();

        let float_y = self.config.float.initial_y;
        // Lying flat in the air
        self.float.reset(
            Vec2::new(0.0, float_y),
            Vec2::new(0.0, self.config.float.initial_velocity_y),
            FRAC_PI_2,
        );
        self.bait.reset(Vec2::new(0.0, float_y - BAIT_DROP));

        self.fishes = create_school(&self.config, self.difficulty, &mut self.rng);

        self.frame = 0;
        self.line_tension = Vec2::ZERO;
        self.tippet_tension = Vec2::new(0.0, self.bait.mass * GRAVITY);

        log::info!(
            "Round {} reset (seed {}, {})",
            self.round,
            self.seed,
            self.difficulty.as_str()
        );
    }

    /// Start the next round with a freshly randomized school
    pub fn next_round(&mut self) {
        self.round = self.round.wrapping_add(1);
        self.reset();
    }

    /// Switch to a new seed and restart from its first round
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.round = 0;
        self.reset();
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn round(&self) -> u64 {
        self.round
    }

    /// Constants the bodies were built from
    pub fn config(&self) -> &PhysicsConfig {
        &self.config
    }

    /// Frames since the last reset
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Line force on the float at the end of the last frame
    pub fn line_tension(&self) -> Vec2 {
        self.line_tension
    }

    /// Tippet force on the bait at the end of the last frame
    pub fn tippet_tension(&self) -> Vec2 {
        self.tippet_tension
    }

    /// True while the float top is still mostly out of the water
    pub fn is_casting(&self) -> bool {
        self.float.position.y > self.float.top_length * 0.5
    }

    /// Line force on the float at the current positions (zero while casting)
    pub fn line_force(&self) -> Vec2 {
        if self.is_casting() {
            Vec2::ZERO
        } else {
            self.line.tension(self.rod.tip_position, self.float.position)
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(self)
    }

    /// Advance one fixed timestep
    pub fn step(&mut self, input: &FrameInput) {
        let dt = self.config.dt;

        if input.water_cut {
            self.line.water_cut();
        }
        let hand = input.hand + Vec2::new(0.0, self.config.hand_y_offset);
        self.rod.set_hand(hand, dt);

        // 1. Rod
        let tension_old = self.line_force();
        let rod_phase = self.rod.update_position(dt, -tension_old);

        // 2. Fish
        let bait_position = self.bait.position;
        let mass_ratio = self.bait.mass_ratio();
        let range = self.config.bait.density_range;
        let increment = self.config.bait.density_increment;
        for fish in &mut self.fishes {
            let density = self.bait.scent.density(fish.position, range, increment);
            fish.update(dt, bait_position, density, mass_ratio, &mut self.rng);
        }
        let sawari: Vec2 = self.fishes.iter().map(FishAgent::disturbance_force).sum();

        // 3. Bait
        let suction_old = self.total_suction(self.bait.position);
        let float_old = self.float.position;
        let bait_phase = self.bait.update_position(dt, float_old, suction_old, &mut self.rng);

        // 4. Float
        let tippet_old = self.tippet_tension;
        let float_force_old = tension_old + self.fish_coupling(suction_old, sawari) - tippet_old
            + self.line_constraint_force(tippet_old);
        let float_phase = self.float.update_position(dt, float_force_old, tippet_old.y.abs());

        // 5. Forces at the new positions
        let tension_new = self.line_force();
        let suction_new = self.total_suction(self.bait.position);
        let fish_accel = self
            .fishes
            .iter()
            .find(|f| f.is_attacking())
            .map_or(Vec2::ZERO, |f| f.suction_acceleration(self.bait.position));

        // 6. Velocities
        self.rod.update_velocity(rod_phase, dt, -tension_new);

        let float_position = self.float.position;
        let tippet_new = self
            .bait
            .update_velocity(bait_phase, dt, float_position, suction_new, fish_accel);

        let float_force_new = tension_new + self.fish_coupling(suction_new, sawari) - tippet_new
            + self.line_constraint_force(tippet_new);
        self.float
            .update_velocity(float_phase, dt, float_force_new, tippet_new.y.abs());

        // 7. Post-processing
        let factor = self.config.water_entry_damping;
        let zone = self.config.water_entry_zone;
        self.float.velocity = water_entry_damping(self.float.position, self.float.velocity, factor, zone);
        self.bait.velocity = water_entry_damping(self.bait.position, self.bait.velocity, factor, zone);

        if !self.is_casting() {
            self.enforce_line_length();
        }

        self.line_tension = checked("line tension", tension_new, self.frame);
        self.tippet_tension = checked("tippet tension", tippet_new, self.frame);
        self.frame += 1;

        log::trace!(
            "frame {}: float ({:.4}, {:.4}) angle {:.3}, bait ({:.4}, {:.4}), tension {:.3}",
            self.frame,
            self.float.position.x,
            self.float.position.y,
            self.float.angle,
            self.bait.position.x,
            self.bait.position.y,
            self.line_tension.length()
        );
    }

    /// Suction from every fish on a point
    fn total_suction(&self, target: Vec2) -> Vec2 {
        self.fishes.iter().map(|f| f.suction_force(target)).sum()
    }

    /// Fractions of suction and sawari that reach the float
    fn fish_coupling(&self, suction: Vec2, sawari: Vec2) -> Vec2 {
        suction * self.config.fish.suck_to_float + sawari * self.config.fish.sawari_to_float
    }

    /// Reaction holding the float at the line's length limit.
    ///
    /// Once the float is at `rest + max_stretch` from the tip, the part of its
    /// net load (buoyancy, weight, tippet) pulling it further away is
    /// cancelled along the line.
    fn line_constraint_force(&self, tippet_tension: Vec2) -> Vec2 {
        let offset = self.float.position - self.rod.tip_position;
        let distance = offset.length();
        if distance < MIN_DISTANCE || distance <= self.line.max_extent() - CONSTRAINT_MARGIN {
            return Vec2::ZERO;
        }
        let outward = offset / distance;
        let load = Vec2::new(0.0, self.float.buoyancy() - self.float.weight()) - tippet_tension;
        let pull = load.dot(outward);
        if pull > 0.0 { -outward * pull } else { Vec2::ZERO }
    }

    /// Pull the float back inside the line's length limit, dropping outward
    /// velocity, and keep the bait on its tippet
    fn enforce_line_length(&mut self) {
        let tip = self.rod.tip_position;
        let offset = self.float.position - tip;
        let distance = offset.length();
        let limit = self.line.max_extent();
        if distance <= limit || distance < MIN_DISTANCE {
            return;
        }

        let outward = offset / distance;
        self.float.position = tip + outward * limit;
        let along = self.float.velocity.dot(outward);
        if along > 0.0 {
            self.float.velocity -= along * outward;
        }
        self.bait.constrain_to_tippet(self.float.position);
    }
}

/// Zero a non-finite force and report it
fn checked(label: &str, force: Vec2, frame: u64) -> Vec2 {
    if force.is_finite() {
        force
    } else {
        log::warn!("Non-finite {label} at frame {frame}, replaced with zero");
        Vec2::ZERO
    }
}
