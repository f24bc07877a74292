use crate::elite::{CreatureInstance, InstanceId, Position};
use crate::errors::ProgressionError;
use crate::progression::Progression;
use schema::EliteType;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const SPAWN_POSITION: Position = Position {
    x: 0.0,
    y: 2.0,
    z: 0.0,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub progression: Progression,
    pub position: Position,
    captured: Vec<CreatureInstance>,
    /// Weak reference into `captured`; cleared whenever the creature leaves.
    active: Option<InstanceId>,
}

impl Default for PlayerProfile {
    fn default() -> Self {
        Self {
            progression: Progression::default(),
            position: SPAWN_POSITION,
            captured: Vec::new(),
            active: None,
        }
    }
}

impl PlayerProfile {
    pub fn captured(&self) -> &[CreatureInstance] {
        &self.captured
    }

    pub fn get(&self, id: InstanceId) -> Option<&CreatureInstance> {
        self.captured.iter().find(|c| c.id == id)
    }

    pub fn get_mut(&mut self, id: InstanceId) -> Option<&mut CreatureInstance> {
        self.captured.iter_mut().find(|c| c.id == id)
    }

    /// Resolves a 1-based roster number, as typed by players.
    pub fn by_number(&self, number: usize) -> Option<&CreatureInstance> {
        number.checked_sub(1).and_then(|i| self.captured.get(i))
    }

    pub fn add_captured(&mut self, mut instance: CreatureInstance) -> InstanceId {
        instance.is_wild = false;
        instance.position = None;
        let id = instance.id;
        self.captured.push(instance);
        id
    }

    pub fn active_id(&self) -> Option<InstanceId> {
        self.active
    }

    pub fn active_elite(&self) -> Option<&CreatureInstance> {
        self.active.and_then(|id| self.get(id))
    }

    pub fn set_active(&mut self, id: InstanceId) -> Result<(), ProgressionError> {
        if self.get(id).is_none() {
            return Err(ProgressionError::UnknownElite(id.to_string()));
        }
        self.active = Some(id);
        Ok(())
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    /// The creature sent into battle: the active one, else the first captured.
    pub fn battle_elite(&self) -> Option<&CreatureInstance> {
        self.active_elite().or_else(|| self.captured.first())
    }

    /// Removes an owned creature for good.
    pub fn release(&mut self, id: InstanceId) -> Result<CreatureInstance, ProgressionError> {
        let index = self
            .captured
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| ProgressionError::UnknownElite(id.to_string()))?;
        if self.active == Some(id) {
            self.active = None;
        }
        Ok(self.captured.remove(index))
    }

    /// Swaps an owned creature for its replacement in the same roster slot,
    /// moving the active reference along with it.
    pub fn replace(
        &mut self,
        id: InstanceId,
        replacement: CreatureInstance,
    ) -> Result<InstanceId, ProgressionError> {
        let slot = self
            .get_mut(id)
            .ok_or_else(|| ProgressionError::UnknownElite(id.to_string()))?;
        let new_id = replacement.id;
        *slot = replacement;
        slot.is_wild = false;
        if self.active == Some(id) {
            self.active = Some(new_id);
        }
        Ok(new_id)
    }

    /// Clamps every owned creature into range and drops an active reference
    /// that no longer points into the roster. Returns how many creatures changed.
    pub fn repair(&mut self) -> usize {
        let repaired = self
            .captured
            .iter_mut()
            .map(|c| c.clamp_to_bounds())
            .filter(|changed| *changed)
            .count();
        if let Some(id) = self.active {
            if self.get(id).is_none() {
                self.active = None;
            }
        }
        repaired
    }

    pub fn distinct_species(&self) -> usize {
        self.captured
            .iter()
            .map(|c| c.species_id())
            .collect::<HashSet<_>>()
            .len()
    }

    pub fn owns_type(&self, elite_type: EliteType) -> bool {
        self.captured.iter().any(|c| c.types().contains(&elite_type))
    }
}

impl fmt::Display for PlayerProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let p = &self.progression;
        writeln!(
            f,
            "Trainer Lv.{}  EXP {}/{}  Health {}/{}",
            p.level, p.experience, p.max_experience, p.health, p.max_health
        )?;
        writeln!(f, "Position: {}", self.position)?;
        if self.captured.is_empty() {
            write!(f, "No Elites captured yet.")
        } else {
            write!(f, "Elites ({}):", self.captured.len())?;
            for (i, elite) in self.captured.iter().enumerate() {
                let marker = if self.active == Some(elite.id) { "*" } else { " " };
                write!(f, "\n {}{}. {}", marker, i + 1, elite)?;
            }
            Ok(())
        }
    }
}
