//! Per-round fish pool

use glam::Vec2;
use rand::Rng;

use super::fish::FishAgent;
use crate::config::{Difficulty, PhysicsConfig};

/// Resting depths the school spreads around (m)
pub const BASE_POSITIONS: [Vec2; 4] = [
    Vec2::new(0.15, -0.40),
    Vec2::new(-0.12, -0.45),
    Vec2::new(0.05, -0.50),
    Vec2::new(-0.20, -0.55),
];

/// Uniform jitter applied to each base position (m)
pub const POSITION_JITTER: f32 = 0.03;

/// Build a fresh school with re-randomized hunger, caution and jitter.
///
/// `config.fish.count` fish are placed on the base positions in order,
/// cycling when there are more fish than positions.
pub fn create_school(config: &PhysicsConfig, difficulty: Difficulty, rng: &mut impl Rng) -> Vec<FishAgent> {
    let preset = difficulty.preset();
    let (hunger_lo, hunger_hi) = preset.hunger_range;
    let (caution_lo, caution_hi) = preset.caution_range;

    let school: Vec<FishAgent> = (0..config.fish.count)
        .map(|i| {
            let base = BASE_POSITIONS[i % BASE_POSITIONS.len()];
            let jitter = Vec2::new(
                rng.random_range(-POSITION_JITTER..=POSITION_JITTER),
                rng.random_range(-POSITION_JITTER..=POSITION_JITTER),
            );
            let hunger = rng.random_range(hunger_lo..=hunger_hi);
            let caution = rng.random_range(caution_lo..=caution_hi);
            FishAgent::new(i as u32, base + jitter, hunger, caution, preset.attack_rate, config)
        })
        .collect();

    log::info!(
        "Created school of {} fish ({} difficulty)",
        school.len(),
        difficulty.as_str()
    );
    school
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::fish::FishState;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_school_matches_difficulty() {
        let mut rng = Pcg32::seed_from_u64(42);
        let config = PhysicsConfig::default();
        for difficulty in Difficulty::ALL {
            let preset = difficulty.preset();
            let school = create_school(&config, difficulty, &mut rng);
            assert_eq!(school.len(), 4);
            for (i, fish) in school.iter().enumerate() {
                assert_eq!(fish.id, i as u32);
                assert_eq!(fish.state, FishState::Idle);
                assert_eq!(fish.attack_rate, preset.attack_rate);
                assert!(fish.hunger >= preset.hunger_range.0 && fish.hunger <= preset.hunger_range.1);
                assert!(fish.caution >= preset.caution_range.0 && fish.caution <= preset.caution_range.1);
                let offset = fish.position - BASE_POSITIONS[i];
                assert!(offset.x.abs() <= POSITION_JITTER + 1e-6);
                assert!(offset.y.abs() <= POSITION_JITTER + 1e-6);
            }
        }
    }

    #[test]
    fn test_school_is_reproducible() {
        let config = PhysicsConfig::default();
        let a = create_school(&config, Difficulty::Normal, &mut Pcg32::seed_from_u64(7));
        let b = create_school(&config, Difficulty::Normal, &mut Pcg32::seed_from_u64(7));
        for (fa, fb) in a.iter().zip(&b) {
            assert_eq!(fa.position, fb.position);
            assert_eq!(fa.hunger, fb.hunger);
            assert_eq!(fa.caution, fb.caution);
        }
    }

    #[test]
    fn test_larger_school_cycles_positions() {
        let mut config = PhysicsConfig::default();
        config.fish.count = 6;
        let school = create_school(&config, Difficulty::Hard, &mut Pcg32::seed_from_u64(3));
        assert_eq!(school.len(), 6);
        assert!((school[5].position - BASE_POSITIONS[1]).length() < 0.05);
    }
}
