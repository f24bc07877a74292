use crate::elite::CreatureInstance;
use crate::rng::GameRng;
use schema::Rarity;

pub const MIN_CAPTURE_CHANCE: f64 = 0.05;
pub const MAX_CAPTURE_CHANCE: f64 = 0.95;
const BASE_HP_CHANCE: f64 = 0.1;
const MISSING_HP_WEIGHT: f64 = 0.7;

/// Rarity scaling for capture chance: common 1.0 down to legendary 0.2.
pub fn rarity_capture_factor(rarity: Rarity) -> f64 {
    match rarity {
        Rarity::Common => 1.0,
        Rarity::Uncommon => 0.8,
        Rarity::Rare => 0.6,
        Rarity::Epic => 0.4,
        Rarity::Legendary => 0.2,
    }
}

/// Probability that a throw succeeds.
/// Formula: clamp((0.1 + 0.7 × missing_hp_fraction) × (1 - level/100) × rarity × ball, 0.05, 0.95)
pub fn calculate_capture_chance(target: &CreatureInstance, ball_multiplier: f32) -> f64 {
    let max_hp = target.max_hp().max(1) as f64;
    let hp_fraction = target.current_hp() as f64 / max_hp;
    let hp_term = BASE_HP_CHANCE + MISSING_HP_WEIGHT * (1.0 - hp_fraction);
    let level_term = (1.0 - target.level as f64 / 100.0).max(0.0);

    let chance =
        hp_term * level_term * rarity_capture_factor(target.rarity()) * ball_multiplier as f64;
    chance.clamp(MIN_CAPTURE_CHANCE, MAX_CAPTURE_CHANCE)
}

/// Roll for capture success using the calculated chance
pub fn roll_capture_success(chance: f64, rng: &mut GameRng) -> bool {
    rng.chance(chance, "capture roll")
}

/// Get a descriptive capture chance category for display purposes
pub fn get_capture_chance_description(chance: f64) -> &'static str {
    match chance {
        c if c >= 0.75 => "Excellent",
        c if c >= 0.5 => "Good",
        c if c >= 0.25 => "Fair",
        c if c >= 0.1 => "Poor",
        _ => "Very Poor",
    }
}
