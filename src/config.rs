use serde::{Deserialize, Serialize};
use std::fs;
use std::ops::RangeInclusive;
use std::path::Path;
use std::time::Duration;

/// How an experience award that crosses a level threshold is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelingPolicy {
    /// At most one level per award; leftover experience may exceed the next threshold.
    #[default]
    SingleStep,
    /// Keep levelling while experience covers the threshold.
    Cascade,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BattleConfig {
    /// Delay between a player attack and its damage landing.
    pub attack_delay_ms: u64,
    /// Delay between throwing a ball and learning the outcome.
    pub capture_delay_ms: u64,
    /// Delay before the wild elite replies.
    pub enemy_delay_ms: u64,
}

impl Default for BattleConfig {
    fn default() -> Self {
        Self {
            attack_delay_ms: 1000,
            capture_delay_ms: 1500,
            enemy_delay_ms: 1000,
        }
    }
}

impl BattleConfig {
    pub fn attack_delay(&self) -> Duration {
        Duration::from_millis(self.attack_delay_ms)
    }

    pub fn capture_delay(&self) -> Duration {
        Duration::from_millis(self.capture_delay_ms)
    }

    pub fn enemy_delay(&self) -> Duration {
        Duration::from_millis(self.enemy_delay_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Planar distance under which a wild elite may notice the player.
    pub radius: f32,
    /// Chance that a nearby elite starts a battle.
    pub chance: f64,
    pub min_spawns: u32,
    pub max_spawns: u32,
    pub min_level: u8,
    pub max_level: u8,
    /// Wild elites spawn with x and z in `[-half_extent, half_extent)`.
    pub spawn_half_extent: f32,
    pub spawn_height: f32,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            radius: 3.0,
            chance: 0.3,
            min_spawns: 3,
            max_spawns: 5,
            min_level: 1,
            max_level: 10,
            spawn_half_extent: 15.0,
            spawn_height: 1.0,
        }
    }
}

impl EncounterConfig {
    pub fn spawn_count_range(&self) -> RangeInclusive<u32> {
        self.min_spawns..=self.max_spawns.max(self.min_spawns)
    }

    pub fn level_range(&self) -> RangeInclusive<u8> {
        self.min_level.max(1)..=self.max_level.max(self.min_level.max(1))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InventoryConfig {
    pub starting_money: u64,
    pub max_slots: usize,
    pub starting_items: Vec<(String, u32)>,
}

impl Default for InventoryConfig {
    fn default() -> Self {
        Self {
            starting_money: 3000,
            max_slots: 40,
            starting_items: vec![
                ("elite_ball".to_string(), 10),
                ("potion".to_string(), 5),
                ("antidote".to_string(), 3),
            ],
        }
    }
}

/// Tunables for a game session. Every field has a default, so a config
/// file only needs to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub battle: BattleConfig,
    pub encounters: EncounterConfig,
    pub inventory: InventoryConfig,
    pub leveling: LevelingPolicy,
    /// Key the save snapshot is stored under.
    pub save_key: String,
    /// Quests active in a brand new game.
    pub starting_quests: Vec<String>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            battle: BattleConfig::default(),
            encounters: EncounterConfig::default(),
            inventory: InventoryConfig::default(),
            leveling: LevelingPolicy::default(),
            save_key: "rise_of_elites_save".to_string(),
            starting_quests: vec!["welcome".to_string()],
        }
    }
}

impl GameConfig {
    pub fn from_ron_str(text: &str) -> Result<Self, ron::error::SpannedError> {
        ron::from_str(text)
    }

    /// Loads a config file, falling back to defaults when it is missing or invalid.
    pub fn load(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(text) => match Self::from_ron_str(&text) {
                Ok(config) => {
                    tracing::info!(path = %path.display(), "loaded game config");
                    config
                }
                Err(e) => {
                    tracing::warn!(path = %path.display(), error = %e, "invalid game config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no game config, using defaults");
                Self::default()
            }
        }
    }

    /// Zero-delay config for scripted play and tests.
    pub fn instant() -> Self {
        Self {
            battle: BattleConfig {
                attack_delay_ms: 0,
                capture_delay_ms: 0,
                enemy_delay_ms: 0,
            },
            ..Self::default()
        }
    }
}
