use crate::errors::{QuestError, QuestResult};
use crate::events::GameEvent;
use crate::generated::{QUEST_DATA, QUEST_ORDER};
use chrono::{DateTime, Utc};
use schema::{EliteType, ObjectiveTrigger, QuestPriority, QuestTemplate, Zone};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

static QUEST_CATALOG: LazyLock<HashMap<&'static str, QuestTemplate>> = LazyLock::new(|| {
    let mut catalog = HashMap::with_capacity(QUEST_DATA.len());
    for (id, bytes) in QUEST_DATA.entries() {
        match schema::decode::<QuestTemplate>(*bytes) {
            Ok(template) => {
                catalog.insert(*id, template);
            }
            Err(e) => tracing::error!(quest = *id, error = %e, "corrupt quest catalog entry"),
        }
    }
    catalog
});

pub fn get_quest_template(id: &str) -> QuestResult<&'static QuestTemplate> {
    QUEST_CATALOG
        .get(id)
        .ok_or_else(|| QuestError::UnknownQuest(id.to_string()))
}

/// Every quest template, in catalog file order.
pub fn all_quests() -> impl Iterator<Item = &'static QuestTemplate> {
    QUEST_ORDER.iter().filter_map(|id| QUEST_CATALOG.get(id))
}

/// Something that happened in the game that objectives may be waiting for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestSignal {
    ZoneVisited(Zone),
    ZonesDiscovered(u32),
    EliteEncountered(Zone),
    BattleWon,
    EliteCaptured(EliteType),
    DistinctSpecies(u32),
    EliteEvolved,
    ElitesFused,
    PlayerLevel(u32),
}

/// How a signal moves an objective.
enum ProgressChange {
    Increment,
    Set(u32),
}

fn progress_change(trigger: ObjectiveTrigger, signal: QuestSignal) -> Option<ProgressChange> {
    use ObjectiveTrigger as T;
    use QuestSignal as S;
    match (trigger, signal) {
        (T::EnterZone(wanted), S::ZoneVisited(zone)) if wanted == zone => {
            Some(ProgressChange::Set(1))
        }
        (T::EncounterEliteIn(wanted), S::EliteEncountered(zone)) if wanted == zone => {
            Some(ProgressChange::Increment)
        }
        (T::EncounterElite, S::EliteEncountered(_))
        | (T::WinBattle, S::BattleWon)
        | (T::CaptureAny, S::EliteCaptured(_))
        | (T::Evolve, S::EliteEvolved)
        | (T::Fuse, S::ElitesFused) => Some(ProgressChange::Increment),
        (T::CaptureType(wanted), S::EliteCaptured(caught)) if wanted == caught => {
            Some(ProgressChange::Increment)
        }
        (T::DiscoverZones, S::ZonesDiscovered(n))
        | (T::CaptureDistinctSpecies, S::DistinctSpecies(n))
        | (T::PlayerLevel, S::PlayerLevel(n)) => Some(ProgressChange::Set(n)),
        _ => None,
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub description: String,
    pub completed: bool,
    pub progress: u32,
    pub target: u32,
    pub trigger: Option<ObjectiveTrigger>,
}

impl Objective {
    /// Sets progress. Reaching the target completes the objective, and a
    /// completed objective stays completed. Returns true if this call completed it.
    fn set_progress(&mut self, value: u32) -> bool {
        self.progress = value;
        if !self.completed && value >= self.target {
            self.completed = true;
            return true;
        }
        false
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuestRecord {
    pub id: String,
    pub title: String,
    pub description: String,
    pub priority: QuestPriority,
    pub objectives: Vec<Objective>,
    pub reward: Option<String>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl QuestRecord {
    pub fn from_template(template: &QuestTemplate) -> Self {
        Self {
            id: template.id.clone(),
            title: template.title.clone(),
            description: template.description.clone(),
            priority: template.priority,
            objectives: template
                .objectives
                .iter()
                .map(|o| Objective {
                    description: o.description.clone(),
                    completed: false,
                    progress: 0,
                    target: o.target,
                    trigger: o.trigger,
                })
                .collect(),
            reward: template.rewards.clone(),
            completed_at: None,
        }
    }

    /// Derived from the objectives, never stored.
    pub fn is_complete(&self) -> bool {
        self.objectives.iter().all(|o| o.completed)
    }

    pub fn completed_objectives(&self) -> usize {
        self.objectives.iter().filter(|o| o.completed).count()
    }
}

impl fmt::Display for QuestRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{:?}] ({}/{})",
            self.title,
            self.priority,
            self.completed_objectives(),
            self.objectives.len()
        )?;
        for objective in &self.objectives {
            let mark = if objective.completed { "x" } else { " " };
            write!(
                f,
                "\n  [{}] {} {}/{}",
                mark, objective.description, objective.progress, objective.target
            )?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QuestTracker {
    active: Vec<QuestRecord>,
    completed: Vec<QuestRecord>,
}

impl QuestTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> &[QuestRecord] {
        &self.active
    }

    pub fn completed(&self) -> &[QuestRecord] {
        &self.completed
    }

    pub fn active_quest(&self, id: &str) -> Option<&QuestRecord> {
        self.active.iter().find(|q| q.id == id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active_quest(id).is_some()
    }

    pub fn is_completed(&self, id: &str) -> bool {
        self.completed.iter().any(|q| q.id == id)
    }

    /// Copies a catalog quest into the active list.
    ///
    /// Prerequisites must already be completed. Only daily quests may be
    /// taken again after completion; doing so drops the previous record.
    pub fn start(&mut self, id: &str) -> QuestResult<&QuestRecord> {
        let template = get_quest_template(id)?;
        if self.is_active(id) {
            return Err(QuestError::AlreadyActive(id.to_string()));
        }
        if self.is_completed(id) {
            if template.priority != QuestPriority::Daily {
                return Err(QuestError::AlreadyCompleted(id.to_string()));
            }
            self.completed.retain(|q| q.id != id);
        }
        if let Some(missing) = template
            .prerequisites
            .iter()
            .find(|p| !self.is_completed(p))
        {
            return Err(QuestError::PrerequisiteMissing {
                quest: id.to_string(),
                missing: missing.clone(),
            });
        }

        tracing::debug!(quest = id, "quest started");
        self.active.push(QuestRecord::from_template(template));
        let index = self.active.len() - 1;
        Ok(&self.active[index])
    }

    fn objective_mut(&mut self, quest_id: &str, index: usize) -> QuestResult<&mut Objective> {
        let quest = self
            .active
            .iter_mut()
            .find(|q| q.id == quest_id)
            .ok_or_else(|| QuestError::NotActive(quest_id.to_string()))?;
        quest
            .objectives
            .get_mut(index)
            .ok_or_else(|| QuestError::InvalidObjective {
                quest: quest_id.to_string(),
                index,
            })
    }

    /// Marks an objective done, with progress at its target.
    pub fn complete_objective(&mut self, quest_id: &str, index: usize) -> QuestResult<Vec<GameEvent>> {
        let objective = self.objective_mut(quest_id, index)?;
        let value = objective.target.max(objective.progress);
        let newly_completed = objective.set_progress(value);
        Ok(self.after_objective_change(quest_id, index, newly_completed))
    }

    pub fn update_progress(
        &mut self,
        quest_id: &str,
        index: usize,
        value: u32,
    ) -> QuestResult<Vec<GameEvent>> {
        let newly_completed = self.objective_mut(quest_id, index)?.set_progress(value);
        Ok(self.after_objective_change(quest_id, index, newly_completed))
    }

    /// Feeds a game signal to every active objective with a matching trigger.
    pub fn record(&mut self, signal: QuestSignal) -> Vec<GameEvent> {
        let mut events = Vec::new();
        let mut touched = Vec::new();
        for quest in &mut self.active {
            for (index, objective) in quest.objectives.iter_mut().enumerate() {
                let Some(trigger) = objective.trigger else {
                    continue;
                };
                let value = match progress_change(trigger, signal) {
                    Some(ProgressChange::Increment) => objective.progress.saturating_add(1),
                    Some(ProgressChange::Set(value)) => value,
                    None => continue,
                };
                let completes = !objective.completed && value >= objective.target;
                if value == objective.progress && !completes {
                    continue;
                }
                if objective.set_progress(value) {
                    events.push(GameEvent::ObjectiveCompleted {
                        quest_id: quest.id.clone(),
                        index,
                    });
                }
                if !touched.contains(&quest.id) {
                    touched.push(quest.id.clone());
                }
            }
        }

        for quest_id in touched {
            events.extend(self.finish_if_complete(&quest_id));
        }
        events
    }

    fn after_objective_change(
        &mut self,
        quest_id: &str,
        index: usize,
        newly_completed: bool,
    ) -> Vec<GameEvent> {
        let mut events = Vec::new();
        if newly_completed {
            events.push(GameEvent::ObjectiveCompleted {
                quest_id: quest_id.to_string(),
                index,
            });
        }
        events.extend(self.finish_if_complete(quest_id));
        events
    }

    /// Moves the quest to the completed list once every objective is done.
    fn finish_if_complete(&mut self, quest_id: &str) -> Option<GameEvent> {
        let position = self
            .active
            .iter()
            .position(|q| q.id == quest_id && q.is_complete())?;
        let mut quest = self.active.remove(position);
        quest.completed_at = Some(Utc::now());
        tracing::debug!(quest = quest_id, "quest completed");

        let event = GameEvent::QuestCompleted {
            quest_id: quest.id.clone(),
            reward: quest.reward.clone(),
        };
        self.completed.push(quest);
        Some(event)
    }
}
