use crate::EliteType;
use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BaseStats {
    pub hp: u16,
    pub attack: u16,
    pub defense: u16,
    pub speed: u16,
}

impl BaseStats {
    pub fn total(&self) -> u32 {
        self.hp as u32 + self.attack as u32 + self.defense as u32 + self.speed as u32
    }

    /// Element-wise floored mean of two stat blocks.
    pub fn averaged_with(&self, other: &BaseStats) -> BaseStats {
        let mean = |a: u16, b: u16| ((a as u32 + b as u32) / 2) as u16;
        BaseStats {
            hp: mean(self.hp, other.hp),
            attack: mean(self.attack, other.attack),
            defense: mean(self.defense, other.defense),
            speed: mean(self.speed, other.speed),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum EvolutionMethod {
    Level(u8),
    /// Evolves when the named item from the item catalog is used on it.
    Item(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EvolutionData {
    pub evolves_into: String,
    pub method: EvolutionMethod,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureDefinition {
    pub id: String,
    pub name: String,
    pub primary_type: EliteType,
    pub secondary_type: Option<EliteType>,
    pub base_stats: BaseStats,
    pub abilities: Vec<String>,
    pub rarity: Rarity,
    pub description: String,
    pub evolution: Option<EvolutionData>,
    pub color: Option<String>,
}

impl CreatureDefinition {
    /// Distinct types; a secondary equal to the primary counts once.
    pub fn types(&self) -> Vec<EliteType> {
        std::iter::once(self.primary_type)
            .chain(self.secondary_type.filter(|t| *t != self.primary_type))
            .collect()
    }

    pub fn has_type(&self, elite_type: EliteType) -> bool {
        self.primary_type == elite_type || self.secondary_type == Some(elite_type)
    }
}
