use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemCategory {
    Capture,
    Medicine,
    Berry,
    Evolution,
    Battle,
    Held,
    Key,
    Material,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, EnumIter, EnumString,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    UltraRare,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BattleStat {
    Attack,
    Defense,
    Speed,
    Accuracy,
    CriticalRate,
}

/// What happens when an item is used. Kept closed so every category
/// dispatch is checked exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ItemEffect {
    /// Ball strength applied to capture probability.
    Capture(f32),
    Heal(u16),
    HealPercent(u8),
    FullHeal,
    /// Revives a fainted creature to the given percentage of max HP.
    Revive(u8),
    CureStatus,
    StatBoost(BattleStat, f32),
    Evolve,
    /// Held, key and crafting items with no direct use.
    Passive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDefinition {
    pub id: String,
    pub name: String,
    pub description: String,
    pub category: ItemCategory,
    pub rarity: ItemRarity,
    pub effect: ItemEffect,
    /// Shop price; `None` means it cannot be bought.
    pub price: Option<u32>,
}

impl fmt::Display for ItemCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl fmt::Display for ItemRarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemRarity::UltraRare => write!(f, "Ultra Rare"),
            other => write!(f, "{:?}", other),
        }
    }
}

impl fmt::Display for BattleStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BattleStat::CriticalRate => write!(f, "Critical Rate"),
            other => write!(f, "{:?}", other),
        }
    }
}
