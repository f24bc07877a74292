use crate::battle::state::BattlePhase;
use crate::elite::InstanceId;
use crate::species::get_elite_data;
use schema::{EliteType, Zone};
use serde::{Deserialize, Serialize};

/// A committed state change, published for front ends and for quest progress.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub enum GameEvent {
    // Battle flow
    BattleStarted {
        enemy: String,
        level: u8,
    },
    DamageDealt {
        attacker: String,
        target: String,
        damage: u16,
        remaining_hp: u16,
    },
    BattleWon {
        enemy: String,
        experience: u32,
    },
    BattleLost {
        elite: String,
    },
    CaptureAttempted {
        ball: String,
        chance: f64,
    },
    CaptureFailed {
        enemy: String,
    },
    EliteCaptured {
        id: InstanceId,
        species: String,
        elite_type: EliteType,
    },
    BattleFled,
    BattleEnded {
        outcome: BattlePhase,
    },

    // Progression
    ExperienceGained {
        amount: u32,
    },
    LeveledUp {
        new_level: u32,
    },
    EliteEvolved {
        from: String,
        to: String,
        id: InstanceId,
    },
    ElitesFused {
        id: InstanceId,
        name: String,
    },
    EliteReleased {
        id: InstanceId,
    },

    // Items
    ItemUsed {
        item: String,
        target: Option<InstanceId>,
    },

    // World
    ZoneEntered {
        zone: Zone,
        first_visit: bool,
    },
    ZoneExplored {
        zone: Zone,
    },
    EncounterTriggered {
        species: String,
    },

    // Quests
    QuestStarted {
        quest_id: String,
    },
    ObjectiveCompleted {
        quest_id: String,
        index: usize,
    },
    /// Hand-off point for reward granting. The reward text is not interpreted here.
    QuestCompleted {
        quest_id: String,
        reward: Option<String>,
    },
}

impl GameEvent {
    /// Player-facing text for the event, or `None` for events that are silent.
    pub fn format(&self) -> Option<String> {
        match self {
            GameEvent::BattleStarted { enemy, level } => {
                Some(format!("A wild {} (Lv.{}) appeared!", enemy, level))
            }
            GameEvent::DamageDealt { .. } => None,
            GameEvent::BattleWon { enemy, experience } => {
                Some(format!("Defeated {} for {} experience.", enemy, experience))
            }
            GameEvent::BattleLost { elite } => Some(format!("{} can no longer fight.", elite)),
            GameEvent::CaptureAttempted { ball, chance } => Some(format!(
                "Threw a {} ({:.0}% chance).",
                ball,
                chance * 100.0
            )),
            GameEvent::CaptureFailed { .. } => None,
            GameEvent::EliteCaptured { species, .. } => {
                let name = get_elite_data(species).map_or(species.as_str(), |d| d.name.as_str());
                Some(format!("{} joined your team!", name))
            }
            GameEvent::BattleFled => Some("Got away safely.".to_string()),
            GameEvent::BattleEnded { .. } => None,
            GameEvent::ExperienceGained { .. } => None,
            GameEvent::LeveledUp { new_level } => {
                Some(format!("You reached trainer level {}!", new_level))
            }
            GameEvent::EliteEvolved { from, to, .. } => {
                Some(format!("{} evolved into {}!", from, to))
            }
            GameEvent::ElitesFused { name, .. } => Some(format!("Fusion complete: {}!", name)),
            GameEvent::EliteReleased { .. } => None,
            GameEvent::ItemUsed { .. } => None,
            GameEvent::ZoneEntered { zone, first_visit } => Some(if *first_visit {
                format!("Discovered {}!", zone.title())
            } else {
                format!("Entered {}.", zone.title())
            }),
            GameEvent::ZoneExplored { .. } => None,
            GameEvent::EncounterTriggered { .. } => None,
            GameEvent::QuestStarted { quest_id } => Some(format!("Quest started: {}", quest_id)),
            GameEvent::ObjectiveCompleted { .. } => None,
            GameEvent::QuestCompleted { quest_id, reward } => Some(match reward {
                Some(reward) => format!("Quest complete: {} (reward: {})", quest_id, reward),
                None => format!("Quest complete: {}", quest_id),
            }),
        }
    }
}

/// Queue of events waiting to be collected by the front end.
#[derive(Debug, Clone, Default)]
pub struct EventBus {
    events: Vec<GameEvent>,
}

impl EventBus {
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    pub fn push(&mut self, event: GameEvent) {
        tracing::trace!(?event, "game event");
        self.events.push(event);
    }

    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Takes every pending event, oldest first.
    pub fn drain(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}
