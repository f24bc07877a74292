use crate::config::LevelingPolicy;
use serde::{Deserialize, Serialize};

const STARTING_MAX_EXPERIENCE: u32 = 100;
const STARTING_MAX_HEALTH: u32 = 100;
const MAX_EXPERIENCE_GROWTH: u32 = 50;
const MAX_HEALTH_GROWTH: u32 = 10;

/// A level gained from an experience award.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUp {
    pub new_level: u32,
    pub max_health: u32,
}

/// The player's level, experience and health.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub level: u32,
    pub experience: u32,
    pub max_experience: u32,
    pub health: u32,
    pub max_health: u32,
}

impl Default for Progression {
    fn default() -> Self {
        Self {
            level: 1,
            experience: 0,
            max_experience: STARTING_MAX_EXPERIENCE,
            health: STARTING_MAX_HEALTH,
            max_health: STARTING_MAX_HEALTH,
        }
    }
}

impl Progression {
    /// Adds experience and applies level-ups according to `policy`.
    ///
    /// Each level-up subtracts the threshold, raises the next threshold by 50,
    /// raises max health by 10 and restores health to full.
    pub fn gain_experience(&mut self, amount: u32, policy: LevelingPolicy) -> Vec<LevelUp> {
        self.experience = self.experience.saturating_add(amount);

        let mut level_ups = Vec::new();
        while self.experience >= self.max_experience {
            self.experience -= self.max_experience;
            self.level += 1;
            self.max_experience += MAX_EXPERIENCE_GROWTH;
            self.max_health += MAX_HEALTH_GROWTH;
            self.health = self.max_health;
            level_ups.push(LevelUp {
                new_level: self.level,
                max_health: self.max_health,
            });

            if policy == LevelingPolicy::SingleStep {
                break;
            }
        }
        level_ups
    }

    pub fn take_damage(&mut self, amount: u32) {
        self.health = self.health.saturating_sub(amount);
    }

    pub fn heal(&mut self, amount: u32) {
        self.health = self.health.saturating_add(amount).min(self.max_health);
    }

    /// Fraction of the way to the next level, for progress bars.
    pub fn experience_fraction(&self) -> f32 {
        self.experience as f32 / self.max_experience as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_below_threshold_only_accumulates() {
        let mut progression = Progression::default();
        assert!(progression.gain_experience(99, LevelingPolicy::SingleStep).is_empty());
        assert_eq!(progression.level, 1);
        assert_eq!(progression.experience, 99);
    }

    #[test]
    fn test_single_step_levels_exactly_once_per_award() {
        let mut progression = Progression::default();
        progression.take_damage(40);

        let level_ups = progression.gain_experience(260, LevelingPolicy::SingleStep);

        // One level per call even though 160 leftover exceeds the new 150 threshold.
        assert_eq!(level_ups, vec![LevelUp { new_level: 2, max_health: 110 }]);
        assert_eq!(progression.level, 2);
        assert_eq!(progression.experience, 260 - 100);
        assert_eq!(progression.max_experience, 150);
        assert_eq!(progression.health, 110);
        assert_eq!(progression.max_health, 110);

        // The overflow is picked up by the next award.
        let level_ups = progression.gain_experience(0, LevelingPolicy::SingleStep);
        assert_eq!(level_ups.len(), 1);
        assert_eq!(progression.level, 3);
        assert_eq!(progression.experience, 10);
    }

    #[test]
    fn test_cascade_crosses_every_threshold() {
        let mut progression = Progression::default();
        let level_ups = progression.gain_experience(260, LevelingPolicy::Cascade);

        assert_eq!(
            level_ups,
            vec![
                LevelUp { new_level: 2, max_health: 110 },
                LevelUp { new_level: 3, max_health: 120 },
            ]
        );
        assert_eq!(progression.experience, 10);
        assert_eq!(progression.max_experience, 200);
    }

    #[test]
    fn test_health_is_clamped() {
        let mut progression = Progression::default();
        progression.take_damage(500);
        assert_eq!(progression.health, 0);
        progression.heal(30);
        assert_eq!(progression.health, 30);
        progression.heal(1000);
        assert_eq!(progression.health, 100);
    }
}
