//! Physics configuration and difficulty presets
//!
//! A flat set of named constants, loaded once and treated as immutable by the
//! simulation. Partial JSON documents override only the fields they name.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Difficulty levels (fish activity)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Difficulty {
    Easy,
    #[default]
    Normal,
    Hard,
}

/// Fish activity parameters for one difficulty level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyPreset {
    /// Strike attempts per second at full hunger and zero caution
    pub attack_rate: f32,
    /// Uniform sampling range for hunger
    pub hunger_range: (f32, f32),
    /// Uniform sampling range for caution
    pub caution_range: (f32, f32),
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Normal, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Easy",
            Difficulty::Normal => "Normal",
            Difficulty::Hard => "Hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "easy" => Some(Difficulty::Easy),
            "normal" | "norm" => Some(Difficulty::Normal),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Fish activity for this difficulty
    pub fn preset(&self) -> DifficultyPreset {
        match self {
            Difficulty::Easy => DifficultyPreset {
                attack_rate: 4.0,
                hunger_range: (0.55, 0.75),
                caution_range: (0.1, 0.4),
            },
            Difficulty::Normal => DifficultyPreset {
                attack_rate: 2.0,
                hunger_range: (0.3, 0.5),
                caution_range: (0.2, 0.6),
            },
            Difficulty::Hard => DifficultyPreset {
                attack_rate: 1.0,
                hunger_range: (0.15, 0.3),
                caution_range: (0.4, 0.8),
            },
        }
    }
}

/// Rod tip spring-damper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RodConfig {
    /// Tip mass (kg)
    pub mass: f32,
    /// Hand-to-tip spring (N/m)
    pub stiffness: f32,
    /// Tip damper (Ns/m)
    pub damping: f32,
}

impl Default for RodConfig {
    fn default() -> Self {
        Self {
            mass: 0.1,
            stiffness: 200.0,
            damping: 3.0,
        }
    }
}

/// Main line (rod tip to float)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LineConfig {
    /// N/m
    pub stiffness: f32,
    /// Length below which the line is slack (m)
    pub rest_length: f32,
    /// Extra length allowed beyond rest before the hard limit (m)
    pub max_stretch: f32,
    /// Tension cap (N)
    pub max_tension: f32,
    /// Sanity cap on measured line length (m)
    pub max_length: f32,
    /// Fraction of tension transmitted before the water-cut
    pub surface_tension_factor: f32,
}

impl Default for LineConfig {
    fn default() -> Self {
        Self {
            stiffness: 100.0,
            rest_length: 0.6,
            max_stretch: 0.3,
            max_tension: 5.0,
            max_length: 10.0,
            surface_tension_factor: 0.3,
        }
    }
}

/// Float geometry and hydrodynamics
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FloatConfig {
    pub mass: f32,
    pub top_radius: f32,
    pub top_length: f32,
    pub body_radius: f32,
    pub body_length: f32,
    /// Distance between centre of buoyancy and centre of mass (m)
    pub metacentric_height: f32,
    /// Form-drag torque coefficient (N·m·s²)
    pub rotational_drag: f32,
    /// Viscous torque coefficient (N·m·s)
    pub rotational_viscosity: f32,
    /// Quadratic drag coefficient underwater (air uses a tenth)
    pub drag_coefficient: f32,
    /// Horizontal linear damping while the body is wet (Ns/m)
    pub lateral_damping: f32,
    /// Vertical linear damping while the body is wet (Ns/m)
    pub vertical_damping: f32,
    /// Surface-tension drag near the waterline (Ns/m)
    pub meniscus_damping: f32,
    /// Half-width of the meniscus band (m)
    pub meniscus_zone: f32,
    /// Initial top-tip height at round start (m)
    pub initial_y: f32,
    /// Initial vertical velocity at round start (m/s)
    pub initial_velocity_y: f32,
}

impl Default for FloatConfig {
    fn default() -> Self {
        Self {
            mass: 0.0027,
            top_radius: 0.0004,
            top_length: 0.10,
            body_radius: 0.0050,
            body_length: 0.05,
            metacentric_height: 0.008,
            rotational_drag: 0.0001,
            rotational_viscosity: 0.0005,
            drag_coefficient: 1.0,
            lateral_damping: 200.0,
            vertical_damping: 0.001,
            meniscus_damping: 1.0,
            meniscus_zone: 0.01,
            initial_y: 0.30,
            initial_velocity_y: 0.0,
        }
    }
}

/// Bait mass loss, scent emission and tippet
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BaitConfig {
    pub initial_mass: f32,
    /// Residual hook weight (kg), strictly positive
    pub min_mass: f32,
    /// Passive mass loss (kg/s)
    pub dissolution_rate: f32,
    /// Extra mass loss per (m/s)² of speed (kg·s/m²)
    pub velocity_wear: f32,
    /// Expected scent particles emitted per second
    pub diffusion_rate: f32,
    /// Underwater linear drag (Ns/m)
    pub drag_coefficient: f32,
    pub tippet_length: f32,
    /// N/m
    pub tippet_stiffness: f32,
    /// Live particle cap (oldest evicted)
    pub max_particles: usize,
    /// Brownian step scale (m/√s)
    pub particle_diffusion: f32,
    /// Constant particle sinking speed (m/s)
    pub particle_sink_speed: f32,
    /// Radius for scent density sampling (m)
    pub density_range: f32,
    /// Density contributed by each particle in range
    pub density_increment: f32,
}

impl Default for BaitConfig {
    fn default() -> Self {
        Self {
            initial_mass: 0.0006,
            min_mass: 0.0001,
            dissolution_rate: 0.000004,
            velocity_wear: 0.002,
            diffusion_rate: 2.0,
            drag_coefficient: 0.1,
            tippet_length: 0.45,
            tippet_stiffness: 20.0,
            max_particles: 100,
            particle_diffusion: 0.01,
            particle_sink_speed: 0.005,
            density_range: 0.1,
            density_increment: 0.1,
        }
    }
}

/// Fish agent thresholds and force fields
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FishConfig {
    pub count: usize,
    pub mass: f32,
    /// Cap on suction-induced acceleration (m/s²)
    pub max_accel: f32,
    /// Distance inside which sawari is generated (m)
    pub sawari_distance: f32,
    /// Distance inside which a strike may start (m)
    pub strike_distance: f32,
    /// Scent density that wakes an idle fish
    pub scent_threshold: f32,
    /// Hunger that wakes an idle fish regardless of scent
    pub hunger_threshold: f32,
    /// OU mean-reversion rate (1/s)
    pub ou_theta: f32,
    /// OU noise intensity
    pub ou_sigma: f32,
    /// Dipole range constant r0 (m); peak force at 2·r0
    pub suck_range: f32,
    /// Suction is exactly zero beyond this distance (m)
    pub suck_cutoff: f32,
    /// Fraction of total suction felt by the float
    pub suck_to_float: f32,
    /// Fraction of total sawari felt by the float
    pub sawari_to_float: f32,
}

impl Default for FishConfig {
    fn default() -> Self {
        Self {
            count: 4,
            mass: 0.2,
            max_accel: 50.0,
            sawari_distance: 0.15,
            strike_distance: 0.05,
            scent_threshold: 0.1,
            hunger_threshold: 0.7,
            ou_theta: 1.0,
            ou_sigma: 0.01,
            suck_range: 0.015,
            suck_cutoff: 0.05,
            suck_to_float: 0.015,
            sawari_to_float: 0.05,
        }
    }
}

/// Divergence guards shared by every body
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SafetyCaps {
    pub max_acceleration: f32,
    pub max_speed: f32,
    pub max_angular_velocity: f32,
    pub max_angular_acceleration: f32,
}

impl Default for SafetyCaps {
    fn default() -> Self {
        Self {
            max_acceleration: 1000.0,
            max_speed: 100.0,
            max_angular_velocity: 10.0,
            max_angular_acceleration: 50.0,
        }
    }
}

/// Complete physics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsConfig {
    /// Fixed timestep (s)
    pub dt: f32,
    /// Hand height offset above the input origin (m)
    pub hand_y_offset: f32,
    /// Velocity factor kept at full water entry (0.3 = 70% loss)
    pub water_entry_damping: f32,
    /// Half-width of the water-entry band (m)
    pub water_entry_zone: f32,
    pub rod: RodConfig,
    pub line: LineConfig,
    pub float: FloatConfig,
    pub bait: BaitConfig,
    pub fish: FishConfig,
    pub caps: SafetyCaps,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            dt: crate::consts::SIM_DT,
            hand_y_offset: 0.50,
            water_entry_damping: 0.3,
            water_entry_zone: 0.01,
            rod: RodConfig::default(),
            line: LineConfig::default(),
            float: FloatConfig::default(),
            bait: BaitConfig::default(),
            fish: FishConfig::default(),
            caps: SafetyCaps::default(),
        }
    }
}

impl PhysicsConfig {
    /// Parse a (possibly partial) JSON document and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        log::info!("Loaded physics config (dt = {:.5}s)", config.dt);
        Ok(config)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the integrator cannot survive
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = [
            ("dt", self.dt),
            ("rod.mass", self.rod.mass),
            ("rod.stiffness", self.rod.stiffness),
            ("line.stiffness", self.line.stiffness),
            ("line.rest_length", self.line.rest_length),
            ("line.max_length", self.line.max_length),
            ("line.max_tension", self.line.max_tension),
            ("float.mass", self.float.mass),
            ("float.top_radius", self.float.top_radius),
            ("float.top_length", self.float.top_length),
            ("float.body_radius", self.float.body_radius),
            ("float.body_length", self.float.body_length),
            ("bait.initial_mass", self.bait.initial_mass),
            ("bait.min_mass", self.bait.min_mass),
            ("bait.tippet_length", self.bait.tippet_length),
            ("bait.tippet_stiffness", self.bait.tippet_stiffness),
            ("fish.mass", self.fish.mass),
            ("fish.sawari_distance", self.fish.sawari_distance),
            ("fish.strike_distance", self.fish.strike_distance),
            ("fish.ou_theta", self.fish.ou_theta),
            ("fish.suck_range", self.fish.suck_range),
            ("fish.suck_cutoff", self.fish.suck_cutoff),
            ("caps.max_acceleration", self.caps.max_acceleration),
            ("caps.max_speed", self.caps.max_speed),
            ("caps.max_angular_velocity", self.caps.max_angular_velocity),
            ("caps.max_angular_acceleration", self.caps.max_angular_acceleration),
        ];
        for (field, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and > 0, got {value}"),
                });
            }
        }

        let non_negative = [
            ("rod.damping", self.rod.damping),
            ("line.max_stretch", self.line.max_stretch),
            ("fish.ou_sigma", self.fish.ou_sigma),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be finite and >= 0, got {value}"),
                });
            }
        }

        let fractions = [
            ("water_entry_damping", self.water_entry_damping),
            ("line.surface_tension_factor", self.line.surface_tension_factor),
            ("fish.suck_to_float", self.fish.suck_to_float),
            ("fish.sawari_to_float", self.fish.sawari_to_float),
        ];
        for (field, value) in fractions {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be within [0, 1], got {value}"),
                });
            }
        }

        if self.bait.min_mass >= self.bait.initial_mass {
            return Err(ConfigError::Invalid {
                field: "bait.min_mass",
                reason: "must be below bait.initial_mass".to_string(),
            });
        }
        if self.fish.strike_distance > self.fish.sawari_distance {
            return Err(ConfigError::Invalid {
                field: "fish.strike_distance",
                reason: "must not exceed fish.sawari_distance".to_string(),
            });
        }
        if self.bait.max_particles == 0 {
            return Err(ConfigError::Invalid {
                field: "bait.max_particles",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}
