use crate::errors::SpeciesDataResult;
use crate::species::get_elite_data;
use schema::{BaseStats, CreatureDefinition, EliteType, Rarity};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// HP gained per level on top of the species' base HP.
pub const HP_PER_LEVEL: u16 = 5;

/// Unique identity of a creature instance. Regenerated whenever ownership changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(Uuid);

impl InstanceId {
    pub fn new() -> Self {
        InstanceId(Uuid::new_v4())
    }

    /// First eight hex digits, enough to tell instances apart on screen.
    pub fn short(&self) -> String {
        self.0.simple().to_string()[..8].to_string()
    }
}

impl Default for InstanceId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for InstanceId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(InstanceId)
    }
}

/// World placement. Owned by the navigator; battle logic never reads it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Position {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Distance on the ground plane, ignoring height.
    pub fn planar_distance(&self, other: &Position) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        (dx * dx + dz * dz).sqrt()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.1}, {:.1}, {:.1})", self.x, self.y, self.z)
    }
}

/// Where an instance's species definition lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SpeciesRef {
    /// A species from the static catalog.
    Catalog(String),
    /// A fused species, which exists only on this instance.
    Fused(Box<CreatureDefinition>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatureInstance {
    pub id: InstanceId,
    pub species: SpeciesRef,
    pub level: u8,
    current_hp: u16,
    max_hp: u16,
    pub is_wild: bool,
    pub position: Option<Position>,
}

impl CreatureInstance {
    fn from_definition(species: SpeciesRef, base_hp: u16, level: u8) -> Self {
        let level = level.max(1);
        let max_hp = max_hp_for(base_hp, level);
        Self {
            id: InstanceId::new(),
            species,
            level,
            current_hp: max_hp,
            max_hp,
            is_wild: false,
            position: None,
        }
    }

    /// A player-owned instance of a catalog species at full HP.
    pub fn new_owned(definition: &CreatureDefinition, level: u8) -> Self {
        Self::from_definition(
            SpeciesRef::Catalog(definition.id.clone()),
            definition.base_stats.hp,
            level,
        )
    }

    pub fn new_wild(definition: &CreatureDefinition, level: u8, position: Position) -> Self {
        let mut instance = Self::new_owned(definition, level);
        instance.is_wild = true;
        instance.position = Some(position);
        instance
    }

    /// An owned instance whose species is carried inline rather than in the catalog.
    pub fn new_fused(definition: CreatureDefinition, level: u8) -> Self {
        let base_hp = definition.base_stats.hp;
        Self::from_definition(SpeciesRef::Fused(Box::new(definition)), base_hp, level)
    }

    pub fn definition(&self) -> SpeciesDataResult<&CreatureDefinition> {
        match &self.species {
            SpeciesRef::Catalog(id) => get_elite_data(id),
            SpeciesRef::Fused(definition) => Ok(definition),
        }
    }

    pub fn species_id(&self) -> &str {
        match &self.species {
            SpeciesRef::Catalog(id) => id,
            SpeciesRef::Fused(definition) => &definition.id,
        }
    }

    pub fn name(&self) -> String {
        self.definition()
            .map(|d| d.name.clone())
            .unwrap_or_else(|_| self.species_id().to_string())
    }

    pub fn base_stats(&self) -> SpeciesDataResult<BaseStats> {
        self.definition().map(|d| d.base_stats)
    }

    pub fn types(&self) -> Vec<EliteType> {
        self.definition().map(|d| d.types()).unwrap_or_default()
    }

    pub fn rarity(&self) -> Rarity {
        self.definition().map(|d| d.rarity).unwrap_or(Rarity::Common)
    }

    pub fn current_hp(&self) -> u16 {
        self.current_hp
    }

    pub fn max_hp(&self) -> u16 {
        self.max_hp
    }

    pub fn is_fainted(&self) -> bool {
        self.current_hp == 0
    }

    pub fn is_full_hp(&self) -> bool {
        self.current_hp == self.max_hp
    }

    /// Returns true if the creature fainted from this damage.
    pub fn take_damage(&mut self, damage: u16) -> bool {
        self.current_hp = self.current_hp.saturating_sub(damage);
        self.is_fainted()
    }

    /// Restores up to `amount` HP and returns how much was actually restored.
    pub fn heal(&mut self, amount: u16) -> u16 {
        let before = self.current_hp;
        self.current_hp = self.current_hp.saturating_add(amount).min(self.max_hp);
        self.current_hp.saturating_sub(before)
    }

    /// Pulls level and HP back into range after deserializing.
    /// Returns true if anything changed.
    pub fn clamp_to_bounds(&mut self) -> bool {
        let before = (self.level, self.current_hp, self.max_hp);
        self.level = self.level.max(1);
        self.max_hp = self.max_hp.max(1);
        self.current_hp = self.current_hp.min(self.max_hp);
        before != (self.level, self.current_hp, self.max_hp)
    }

    pub fn set_hp(&mut self, hp: u16) {
        self.current_hp = hp.min(self.max_hp);
    }

    pub fn restore_full(&mut self) {
        self.current_hp = self.max_hp;
    }

    /// Hands a wild creature to the player: fresh id, no longer wild, no world position.
    pub fn into_owned(mut self) -> Self {
        self.id = InstanceId::new();
        self.is_wild = false;
        self.position = None;
        self
    }
}

impl fmt::Display for CreatureInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let types: Vec<String> = self.types().iter().map(|t| t.to_string()).collect();
        write!(
            f,
            "{} Lv.{} [{}] HP {}/{}",
            self.name(),
            self.level,
            types.join("/"),
            self.current_hp,
            self.max_hp
        )?;
        if self.is_fainted() {
            write!(f, " (fainted)")?;
        }
        Ok(())
    }
}

/// `base_hp + level * 5`.
pub fn max_hp_for(base_hp: u16, level: u8) -> u16 {
    base_hp.saturating_add(level as u16 * HP_PER_LEVEL)
}
