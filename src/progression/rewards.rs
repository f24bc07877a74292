use crate::elite::CreatureInstance;
use schema::Rarity;

// Constants for reward calculations
const BASE_EXPERIENCE: f64 = 50.0;
const LEVEL_EXPERIENCE_FACTOR: f64 = 0.5;

/// Calculator for experience rewards based on the defeated creature
pub struct RewardCalculator;

impl RewardCalculator {
    /// Rarity scaling for experience awards: common 1.0 up to legendary 3.0.
    pub fn rarity_multiplier(rarity: Rarity) -> f64 {
        match rarity {
            Rarity::Common => 1.0,
            Rarity::Uncommon => 1.2,
            Rarity::Rare => 1.5,
            Rarity::Epic => 2.0,
            Rarity::Legendary => 3.0,
        }
    }

    /// Experience for defeating a creature of the given level and rarity
    /// Formula: floor(50 + level × 0.5 × rarity_multiplier)
    pub fn experience_for(&self, level: u8, rarity: Rarity) -> u32 {
        let bonus = level as f64 * LEVEL_EXPERIENCE_FACTOR * Self::rarity_multiplier(rarity);
        (BASE_EXPERIENCE + bonus).floor() as u32
    }

    pub fn experience_for_defeat(&self, defeated: &CreatureInstance) -> u32 {
        self.experience_for(defeated.level, defeated.rarity())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::get_elite_data;
    use rstest::rstest;

    #[rstest]
    #[case(5, Rarity::Common, 52)]
    #[case(10, Rarity::Common, 55)]
    #[case(10, Rarity::Uncommon, 56)]
    #[case(7, Rarity::Rare, 55)]
    #[case(10, Rarity::Epic, 60)]
    #[case(10, Rarity::Legendary, 65)]
    #[case(1, Rarity::Legendary, 51)]
    fn test_experience_formula(#[case] level: u8, #[case] rarity: Rarity, #[case] expected: u32) {
        assert_eq!(RewardCalculator.experience_for(level, rarity), expected);
    }

    #[test]
    fn test_experience_for_defeated_instance() {
        let void = CreatureInstance::new_owned(get_elite_data("void").unwrap(), 8);
        // Epic: 50 + 8 * 0.5 * 2.0
        assert_eq!(RewardCalculator.experience_for_defeat(&void), 58);
    }
}
