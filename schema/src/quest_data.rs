use crate::{EliteType, Zone};
use serde::{Deserialize, Serialize};
use strum::EnumString;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumString)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum QuestPriority {
    Main,
    Side,
    Daily,
}

/// Game signal that advances an objective automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveTrigger {
    /// Entering or exploring the zone.
    EnterZone(Zone),
    /// Progress tracks the number of discovered zones.
    DiscoverZones,
    /// Any battle starting, wherever it happens.
    EncounterElite,
    /// A battle starting while the player is in the zone.
    EncounterEliteIn(Zone),
    WinBattle,
    CaptureAny,
    CaptureType(EliteType),
    /// Progress tracks the number of distinct species owned.
    CaptureDistinctSpecies,
    Evolve,
    Fuse,
    /// Progress tracks the player's level.
    PlayerLevel,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectiveTemplate {
    pub description: String,
    pub target: u32,
    pub trigger: Option<ObjectiveTrigger>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestTemplate {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: QuestPriority,
    pub objectives: Vec<ObjectiveTemplate>,
    pub rewards: Option<String>,
    pub prerequisites: Vec<String>,
}
