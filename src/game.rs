use crate::battle::catch::{calculate_capture_chance, calculate_capture_commands, can_attempt_capture};
use crate::battle::commands::{execute_command_batch, BattleCommand};
use crate::battle::engine::{
    build_battle_session, calculate_attack_commands, calculate_task_commands, task_is_live,
    validate_player_action,
};
use crate::battle::scheduler::{ScheduledTask, TaskQueue};
use crate::battle::state::{AttackKind, BattlePhase, BattleSession, StatModifier};
use crate::config::GameConfig;
use crate::elite::{CreatureInstance, InstanceId, Position};
use crate::encounter;
use crate::errors::{
    BattleError, GameResult, InventoryError, ItemError, ProgressionError, QuestError,
};
use crate::events::{EventBus, GameEvent};
use crate::inventory::InventoryLedger;
use crate::item_data::{ball_multiplier, get_item_data};
use crate::item_effects::{apply_restoration, check_usable, restoration_for, ItemOutcome};
use crate::persistence::{load_game, save_game, KeyValueStore, SaveSnapshot};
use crate::player::PlayerProfile;
use crate::progression::{evolve_by_level, evolve_with_item, fuse};
use crate::quests::{QuestRecord, QuestSignal, QuestTracker};
use crate::rng::GameRng;
use crate::world::WorldNavigator;
use schema::{BattleStat, ItemDefinition, ItemEffect, Zone};
use std::time::Duration;

/// Item consumed by every fusion.
pub const FUSION_ITEM_ID: &str = "fusion_crystal";

/// The whole game: one player, their ledger and quests, the world around them
/// and at most one battle.
///
/// Every command either commits and publishes events, or returns an error and
/// leaves the state untouched.
#[derive(Debug, Clone)]
pub struct GameSession {
    pub(crate) config: GameConfig,
    pub(crate) profile: PlayerProfile,
    pub(crate) inventory: InventoryLedger,
    pub(crate) quests: QuestTracker,
    pub(crate) world: WorldNavigator,
    pub(crate) battle: Option<BattleSession>,
    pub(crate) scheduler: TaskQueue,
    pub(crate) rng: GameRng,
    events: EventBus,
    next_session_id: u64,
}

impl GameSession {
    pub fn new(config: GameConfig) -> Self {
        Self::with_rng(config, GameRng::new_random())
    }

    pub fn with_rng(config: GameConfig, rng: GameRng) -> Self {
        let inventory = InventoryLedger::from_config(&config.inventory);
        let starting_quests = config.starting_quests.clone();
        let mut game = Self {
            config,
            profile: PlayerProfile::default(),
            inventory,
            quests: QuestTracker::new(),
            world: WorldNavigator::default(),
            battle: None,
            scheduler: TaskQueue::new(),
            rng,
            events: EventBus::new(),
            next_session_id: 1,
        };
        for quest in starting_quests {
            if let Err(e) = game.start_quest(&quest) {
                tracing::warn!(quest = %quest, error = %e, "could not start configured quest");
            }
        }
        game
    }

    // --- Queries ---

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn profile(&self) -> &PlayerProfile {
        &self.profile
    }

    pub fn inventory(&self) -> &InventoryLedger {
        &self.inventory
    }

    pub fn quests(&self) -> &QuestTracker {
        &self.quests
    }

    pub fn world(&self) -> &WorldNavigator {
        &self.world
    }

    pub fn battle(&self) -> Option<&BattleSession> {
        self.battle.as_ref()
    }

    pub fn phase(&self) -> BattlePhase {
        self.battle
            .as_ref()
            .map_or(BattlePhase::Idle, |session| session.phase)
    }

    /// Logical time, advanced only by `advance` and `run_until_idle`.
    pub fn now(&self) -> Duration {
        self.scheduler.now()
    }

    pub fn pending_tasks(&self) -> usize {
        self.scheduler.len()
    }

    pub fn pending_events(&self) -> &[GameEvent] {
        self.events.events()
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    // --- Battle commands ---

    pub fn start_battle(&mut self, wild: &CreatureInstance) -> GameResult<()> {
        if self.battle.is_some() {
            return Err(BattleError::AlreadyInBattle.into());
        }
        let session = build_battle_session(self.next_session_id, &self.profile, wild)?;
        self.next_session_id += 1;

        let event = GameEvent::BattleStarted {
            enemy: session.enemy.name(),
            level: session.enemy.level,
        };
        tracing::debug!(session = session.id, enemy = session.enemy.species_id(), "battle started");
        self.battle = Some(session);
        self.emit(event);
        Ok(())
    }

    pub fn attack(&mut self, kind: AttackKind) -> GameResult<()> {
        let session = validate_player_action(self.battle.as_ref()).inspect_err(|e| {
            tracing::warn!(error = %e, "attack rejected");
        })?;
        let commands = calculate_attack_commands(session, kind, &mut self.rng, &self.config.battle)?;
        self.execute(commands)
    }

    /// Throws a ball. Returns the success chance that was rolled against.
    pub fn capture(&mut self, ball_id: &str) -> GameResult<f64> {
        let multiplier = can_attempt_capture(self.battle.as_ref(), &self.inventory, ball_id)
            .inspect_err(|e| tracing::warn!(ball = ball_id, error = %e, "capture rejected"))?;
        let session = self.battle.as_ref().ok_or(BattleError::NoActiveBattle)?;
        let chance = calculate_capture_chance(&session.enemy, multiplier);
        let commands = calculate_capture_commands(
            session,
            ball_id,
            multiplier,
            &mut self.rng,
            &self.config.battle,
        );
        self.execute(commands)?;
        Ok(chance)
    }

    /// Leaves the battle without rewards.
    pub fn flee(&mut self) -> GameResult<()> {
        let mut session = self.battle.take().ok_or(BattleError::NoActiveBattle)?;
        session.append_log("You fled the battle.");
        let cancelled = self.scheduler.cancel_session(session.id);
        tracing::debug!(session = session.id, cancelled, "fled battle");

        self.emit(GameEvent::BattleFled);
        self.emit(GameEvent::BattleEnded {
            outcome: session.phase,
        });
        Ok(())
    }

    /// Closes the battle and returns the phase it ended in. Defeated and
    /// captured wild elites leave the world.
    pub fn end_battle(&mut self) -> GameResult<BattlePhase> {
        let session = self.battle.take().ok_or(BattleError::NoActiveBattle)?;
        self.scheduler.cancel_session(session.id);
        if matches!(session.phase, BattlePhase::Victory | BattlePhase::Captured) {
            self.world.remove_wild(session.enemy.id);
        }
        tracing::debug!(session = session.id, outcome = ?session.phase, "battle ended");
        self.emit(GameEvent::BattleEnded {
            outcome: session.phase,
        });
        Ok(session.phase)
    }

    /// Moves the logical clock forward and fires every task that falls due.
    /// Returns how many tasks fired.
    pub fn advance(&mut self, elapsed: Duration) -> usize {
        let deadline = self.scheduler.now() + elapsed;
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            self.run_task(task);
            fired += 1;
        }
        self.scheduler.advance_to(deadline);
        fired
    }

    /// Fires queued tasks until none are left, including the ones they schedule.
    pub fn run_until_idle(&mut self) -> usize {
        let mut fired = 0;
        while let Some(due) = self.scheduler.next_due() {
            let Some(task) = self.scheduler.pop_due(due) else {
                break;
            };
            self.run_task(task);
            fired += 1;
        }
        fired
    }

    /// Logical time left before the next queued task falls due.
    pub fn time_until_next_task(&self) -> Option<Duration> {
        self.scheduler
            .next_due()
            .map(|due| due.saturating_sub(self.scheduler.now()))
    }

    fn run_task(&mut self, task: ScheduledTask) {
        if !task_is_live(self.battle.as_ref(), &task) {
            tracing::warn!(session = task.session_id, kind = ?task.kind, "skipping stale battle task");
            return;
        }
        let Some(session) = self.battle.as_ref() else {
            return;
        };
        let commands =
            match calculate_task_commands(session, &task, &mut self.rng, &self.config.battle) {
                Ok(commands) => commands,
                Err(e) => {
                    tracing::error!(session = task.session_id, error = %e, "battle task failed");
                    return;
                }
            };
        if let Err(e) = self.execute(commands) {
            tracing::error!(session = task.session_id, error = %e, "battle task commands failed");
        }
    }

    fn execute(&mut self, commands: Vec<BattleCommand>) -> GameResult<()> {
        execute_command_batch(commands, self)?;
        Ok(())
    }

    // --- Items ---

    pub fn add_item(&mut self, item_id: &str, quantity: u32) -> GameResult<u32> {
        Ok(self.inventory.add_item(item_id, quantity)?)
    }

    pub fn remove_item(&mut self, item_id: &str, quantity: u32) -> GameResult<u32> {
        Ok(self.inventory.remove_item(item_id, quantity)?)
    }

    pub fn purchase(&mut self, item_id: &str, quantity: u32) -> GameResult<u32> {
        Ok(self.inventory.purchase(item_id, quantity)?)
    }

    /// Uses one held item. `target` defaults to the creature in battle, then
    /// to the active creature.
    ///
    /// Capture items go through `capture`. Nothing is consumed when the item
    /// would have no effect.
    pub fn use_item(&mut self, item_id: &str, target: Option<InstanceId>) -> GameResult<ItemOutcome> {
        let item = get_item_data(item_id)?;
        let held = self.inventory.quantity_of(item_id);
        if held == 0 {
            return Err(InventoryError::InsufficientQuantity {
                item: item_id.to_string(),
                held,
                requested: 1,
            }
            .into());
        }
        if ball_multiplier(item).is_some() {
            return Err(ItemError::NotUsable {
                item: item.id.clone(),
                category: item.category,
            }
            .into());
        }
        check_usable(item)?;

        let outcome = match item.effect {
            ItemEffect::StatBoost(stat, multiplier) => self.apply_stat_boost(item, stat, multiplier)?,
            ItemEffect::Evolve => self.apply_evolution_item(item, target)?,
            ItemEffect::Heal(_)
            | ItemEffect::HealPercent(_)
            | ItemEffect::FullHeal
            | ItemEffect::Revive(_) => self.apply_restorative(item, target)?,
            ItemEffect::CureStatus | ItemEffect::Capture(_) | ItemEffect::Passive => {
                return Err(ItemError::NoEffect(item.id.clone()).into());
            }
        };

        self.inventory.remove_item(item_id, 1)?;
        let target = match &outcome {
            ItemOutcome::Healed { target, .. } | ItemOutcome::Revived { target, .. } => Some(*target),
            ItemOutcome::Evolved { id, .. } => Some(*id),
            ItemOutcome::StatBoosted { .. } => None,
        };
        tracing::debug!(item = item_id, ?target, "item used");
        self.emit(GameEvent::ItemUsed {
            item: item_id.to_string(),
            target,
        });
        Ok(outcome)
    }

    fn default_target(&self) -> Option<InstanceId> {
        self.battle
            .as_ref()
            .map(|session| session.player.id)
            .or_else(|| self.profile.active_id())
    }

    fn restorative_target(
        &mut self,
        item: &ItemDefinition,
        target: Option<InstanceId>,
    ) -> GameResult<&mut CreatureInstance> {
        let id = target
            .or_else(|| self.default_target())
            .ok_or_else(|| ItemError::TargetRequired(item.id.clone()))?;
        if let Some(session) = self.battle.as_mut() {
            if session.player.id == id {
                return Ok(&mut session.player);
            }
        }
        self.profile
            .get_mut(id)
            .ok_or_else(|| ItemError::UnknownTarget(id.to_string()).into())
    }

    fn apply_restorative(
        &mut self,
        item: &ItemDefinition,
        target: Option<InstanceId>,
    ) -> GameResult<ItemOutcome> {
        let creature = self.restorative_target(item, target)?;
        let restoration = restoration_for(item, creature)?;
        Ok(apply_restoration(creature, restoration))
    }

    fn apply_stat_boost(
        &mut self,
        item: &'static ItemDefinition,
        stat: BattleStat,
        multiplier: f32,
    ) -> GameResult<ItemOutcome> {
        if self.battle.is_none() {
            return Err(ItemError::BattleOnly(item.id.clone()).into());
        }
        validate_player_action(self.battle.as_ref())?;
        self.execute(vec![BattleCommand::AddModifier(StatModifier {
            stat,
            multiplier,
            source_item: item.id.as_str(),
        })])?;
        Ok(ItemOutcome::StatBoosted { stat, multiplier })
    }

    fn apply_evolution_item(
        &mut self,
        item: &ItemDefinition,
        target: Option<InstanceId>,
    ) -> GameResult<ItemOutcome> {
        let id = target
            .or_else(|| self.profile.active_id())
            .ok_or_else(|| ItemError::TargetRequired(item.id.clone()))?;
        self.ensure_not_fighting(id)?;
        let instance = self
            .profile
            .get(id)
            .ok_or_else(|| ItemError::UnknownTarget(id.to_string()))?;
        let evolved = evolve_with_item(instance, &item.id).map_err(ItemError::from)?;
        let (from, to) = (instance.name(), evolved.name());

        let new_id = self.profile.replace(id, evolved)?;
        self.emit(GameEvent::EliteEvolved {
            from: from.clone(),
            to: to.clone(),
            id: new_id,
        });
        Ok(ItemOutcome::Evolved { from, to, id: new_id })
    }

    // --- Owned elites ---

    fn owned(&self, id: InstanceId) -> GameResult<&CreatureInstance> {
        self.profile
            .get(id)
            .ok_or_else(|| ProgressionError::UnknownElite(id.to_string()).into())
    }

    /// The creature a live battle was built from cannot leave or change species.
    fn ensure_not_fighting(&self, id: InstanceId) -> GameResult<()> {
        match self.battle.as_ref().and_then(|b| b.player_source) {
            Some(fighting) if fighting == id => {
                let name = self.profile.get(id).map(|c| c.name()).unwrap_or_default();
                Err(ProgressionError::InBattle(name).into())
            }
            _ => Ok(()),
        }
    }

    /// Evolves an owned elite that has reached its evolution level.
    pub fn evolve_elite(&mut self, id: InstanceId) -> GameResult<InstanceId> {
        self.ensure_not_fighting(id)?;
        let instance = self.owned(id)?;
        let evolved = evolve_by_level(instance)?;
        let (from, to) = (instance.name(), evolved.name());

        let new_id = self.profile.replace(id, evolved)?;
        self.emit(GameEvent::EliteEvolved { from, to, id: new_id });
        Ok(new_id)
    }

    /// Fuses two owned elites into a new one, consuming both and a fusion crystal.
    pub fn fuse_elites(&mut self, a: InstanceId, b: InstanceId) -> GameResult<InstanceId> {
        self.ensure_not_fighting(a)?;
        self.ensure_not_fighting(b)?;
        let fused = fuse(self.owned(a)?, self.owned(b)?)?;
        let held = self.inventory.quantity_of(FUSION_ITEM_ID);
        if held == 0 {
            return Err(InventoryError::InsufficientQuantity {
                item: FUSION_ITEM_ID.to_string(),
                held,
                requested: 1,
            }
            .into());
        }

        self.inventory.remove_item(FUSION_ITEM_ID, 1)?;
        self.profile.release(a)?;
        self.profile.release(b)?;
        let name = fused.name();
        let id = self.profile.add_captured(fused);
        self.emit(GameEvent::ElitesFused { id, name });
        Ok(id)
    }

    pub fn release_elite(&mut self, id: InstanceId) -> GameResult<CreatureInstance> {
        self.ensure_not_fighting(id)?;
        let released = self.profile.release(id)?;
        self.emit(GameEvent::EliteReleased { id });
        Ok(released)
    }

    pub fn set_active_elite(&mut self, id: InstanceId) -> GameResult<()> {
        Ok(self.profile.set_active(id)?)
    }

    // --- Quests ---

    pub fn start_quest(&mut self, quest_id: &str) -> GameResult<&QuestRecord> {
        self.quests
            .start(quest_id)
            .inspect_err(|e| tracing::warn!(quest = quest_id, error = %e, "quest not started"))?;
        self.emit(GameEvent::QuestStarted {
            quest_id: quest_id.to_string(),
        });
        // Aggregate objectives start from the current totals.
        for signal in self.aggregate_signals() {
            let events = self.quests.record(signal);
            self.publish(events);
        }
        // The quest may have completed at once from the totals above.
        self.quests
            .active_quest(quest_id)
            .or_else(|| self.quests.completed().iter().rev().find(|q| q.id == quest_id))
            .ok_or_else(|| QuestError::UnknownQuest(quest_id.to_string()).into())
    }

    pub fn complete_objective(&mut self, quest_id: &str, index: usize) -> GameResult<()> {
        let events = self.quests.complete_objective(quest_id, index)?;
        self.publish(events);
        Ok(())
    }

    pub fn update_progress(&mut self, quest_id: &str, index: usize, value: u32) -> GameResult<()> {
        let events = self.quests.update_progress(quest_id, index, value)?;
        self.publish(events);
        Ok(())
    }

    // --- World ---

    /// Returns true on the first visit.
    pub fn change_zone(&mut self, zone: Zone) -> bool {
        let first_visit = self.world.change_zone(zone);
        self.emit(GameEvent::ZoneEntered { zone, first_visit });
        first_visit
    }

    /// Repopulates the current zone and gives each nearby wild elite a chance
    /// to start a battle. Returns true if a battle started.
    pub fn check_for_elites(&mut self, position: Position) -> bool {
        self.profile.position = position;
        if self.battle.is_some() {
            return false;
        }

        let zone = self.world.current_zone();
        let wild = encounter::generate(zone, &mut self.rng, &self.config.encounters);
        self.world.set_wild(wild);
        self.emit(GameEvent::ZoneExplored { zone });

        let Some(found) = self
            .world
            .scan_for_encounter(&position, &self.config.encounters, &mut self.rng)
            .cloned()
        else {
            return false;
        };

        self.emit(GameEvent::EncounterTriggered {
            species: found.species_id().to_string(),
        });
        match self.start_battle(&found) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(error = %e, "encounter could not start a battle");
                false
            }
        }
    }

    // --- Persistence ---

    pub fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot::new(
            &self.profile,
            &self.inventory,
            &self.world,
            &self.quests,
        )
    }

    /// Replaces whatever parts the snapshot carries. A live battle is dropped.
    pub fn restore(&mut self, snapshot: SaveSnapshot) {
        if let Some(session) = self.battle.take() {
            self.scheduler.cancel_session(session.id);
        }
        if let Some(profile) = snapshot.profile {
            self.profile = profile;
        }
        if let Some(inventory) = snapshot.inventory {
            self.inventory = InventoryLedger::from_snapshot(&inventory);
        }
        if let Some(world) = snapshot.world {
            self.world = world;
        }
        if let Some(quests) = snapshot.quests {
            self.quests = quests;
        }
    }

    /// Saves under the configured key. Returns false if nothing was written.
    pub fn save(&self, store: &mut dyn KeyValueStore) -> bool {
        save_game(store, &self.config.save_key, &self.snapshot())
    }

    /// Loads the configured save, if there is a readable one.
    pub fn load(&mut self, store: &dyn KeyValueStore) -> bool {
        match load_game(store, &self.config.save_key) {
            Some(snapshot) => {
                self.restore(snapshot);
                true
            }
            None => false,
        }
    }

    // --- Events ---

    /// Publishes a committed change and lets quest objectives react to it.
    pub(crate) fn emit(&mut self, event: GameEvent) {
        let signals = self.quest_signals(&event);
        self.events.push(event);
        for signal in signals {
            let events = self.quests.record(signal);
            self.publish(events);
        }
    }

    fn publish(&mut self, events: Vec<GameEvent>) {
        for event in events {
            self.events.push(event);
        }
    }

    fn aggregate_signals(&self) -> [QuestSignal; 3] {
        [
            QuestSignal::ZonesDiscovered(self.world.discovered().len() as u32),
            QuestSignal::DistinctSpecies(self.profile.distinct_species() as u32),
            QuestSignal::PlayerLevel(self.profile.progression.level),
        ]
    }

    fn quest_signals(&self, event: &GameEvent) -> Vec<QuestSignal> {
        let distinct = QuestSignal::DistinctSpecies(self.profile.distinct_species() as u32);
        match event {
            GameEvent::ZoneEntered { zone, .. } => vec![
                QuestSignal::ZoneVisited(*zone),
                QuestSignal::ZonesDiscovered(self.world.discovered().len() as u32),
            ],
            GameEvent::ZoneExplored { zone } => vec![QuestSignal::ZoneVisited(*zone)],
            GameEvent::BattleStarted { .. } => {
                vec![QuestSignal::EliteEncountered(self.world.current_zone())]
            }
            GameEvent::BattleWon { .. } => vec![QuestSignal::BattleWon],
            GameEvent::EliteCaptured { elite_type, .. } => {
                vec![QuestSignal::EliteCaptured(*elite_type), distinct]
            }
            GameEvent::EliteEvolved { .. } => vec![QuestSignal::EliteEvolved, distinct],
            GameEvent::ElitesFused { .. } => vec![QuestSignal::ElitesFused, distinct],
            GameEvent::EliteReleased { .. } => vec![distinct],
            GameEvent::LeveledUp { new_level } => vec![QuestSignal::PlayerLevel(*new_level)],
            _ => Vec::new(),
        }
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(GameConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::get_elite_data;
    use pretty_assertions::assert_eq;

    fn game(outcomes: Vec<f64>) -> GameSession {
        let mut game = GameSession::with_rng(GameConfig::instant(), GameRng::new_for_test(outcomes));
        game.drain_events();
        game
    }

    fn owned(game: &mut GameSession, species: &str, level: u8) -> InstanceId {
        game.profile
            .add_captured(CreatureInstance::new_owned(get_elite_data(species).unwrap(), level))
    }

    #[test]
    fn test_new_game_state() {
        let game = GameSession::with_rng(GameConfig::default(), GameRng::new_for_test(vec![]));
        assert_eq!(game.phase(), BattlePhase::Idle);
        assert_eq!(game.inventory().money(), 3000);
        assert_eq!(game.inventory().quantity_of("elite_ball"), 10);
        assert_eq!(game.inventory().quantity_of("potion"), 5);
        assert!(game.quests().is_active("welcome"));
        assert_eq!(game.world().current_zone(), Zone::Starting);
        assert_eq!(
            game.pending_events(),
            &[GameEvent::QuestStarted {
                quest_id: "welcome".to_string()
            }]
        );
    }

    #[test]
    fn test_use_potion_on_owned_elite() {
        let mut game = game(vec![]);
        let id = owned(&mut game, "leaf", 4); // 70 max HP
        game.profile.get_mut(id).unwrap().take_damage(50);

        let outcome = game.use_item("potion", Some(id)).unwrap();
        assert_eq!(
            outcome,
            ItemOutcome::Healed {
                target: id,
                name: "Leaf".to_string(),
                restored: 20
            }
        );
        assert_eq!(game.profile().get(id).unwrap().current_hp(), 40);
        assert_eq!(game.inventory().quantity_of("potion"), 4);
    }

    #[test]
    fn test_wasted_items_are_not_consumed() {
        let mut game = game(vec![]);
        let id = owned(&mut game, "leaf", 4);

        assert!(matches!(
            game.use_item("potion", Some(id)),
            Err(crate::errors::GameError::Item(ItemError::NoEffect(_)))
        ));
        assert!(matches!(
            game.use_item("antidote", Some(id)),
            Err(crate::errors::GameError::Item(ItemError::NoEffect(_)))
        ));
        assert!(matches!(
            game.use_item("elite_ball", Some(id)),
            Err(crate::errors::GameError::Item(ItemError::NotUsable { .. }))
        ));
        assert_eq!(game.inventory().quantity_of("potion"), 5);
        assert_eq!(game.inventory().quantity_of("antidote"), 3);
        assert_eq!(game.inventory().quantity_of("elite_ball"), 10);
    }

    #[test]
    fn test_unheld_item_is_rejected() {
        let mut game = game(vec![]);
        let id = owned(&mut game, "leaf", 4);
        assert!(matches!(
            game.use_item("revive", Some(id)),
            Err(crate::errors::GameError::Inventory(
                InventoryError::InsufficientQuantity { held: 0, .. }
            ))
        ));
    }

    #[test]
    fn test_stat_boost_needs_battle() {
        let mut game = game(vec![]);
        game.add_item("x_attack", 1).unwrap();
        assert!(matches!(
            game.use_item("x_attack", None),
            Err(crate::errors::GameError::Item(ItemError::BattleOnly(_)))
        ));
        assert_eq!(game.inventory().quantity_of("x_attack"), 1);
    }

    #[test]
    fn test_evolution_item_replaces_elite_and_keeps_active() {
        let mut game = game(vec![]);
        let id = owned(&mut game, "crystal", 9);
        game.set_active_elite(id).unwrap();
        game.add_item("moon_stone", 1).unwrap();

        let outcome = game.use_item("moon_stone", None).unwrap();
        let ItemOutcome::Evolved { id: new_id, ref to, .. } = outcome else {
            panic!("expected evolution, got {:?}", outcome);
        };
        assert_eq!(to, "Prismara");
        assert_eq!(game.profile().active_id(), Some(new_id));
        assert_eq!(game.profile().captured().len(), 1);
        assert_eq!(game.profile().captured()[0].level, 9);
        assert!(!game.inventory().has_item("moon_stone", 1));
    }

    #[test]
    fn test_level_evolution() {
        let mut game = game(vec![]);
        let young = owned(&mut game, "swift", 19);
        let grown = owned(&mut game, "swift", 20);

        assert!(game.evolve_elite(young).is_err());
        let new_id = game.evolve_elite(grown).unwrap();
        assert_eq!(game.profile().get(new_id).unwrap().species_id(), "tempest");
        assert!(game.pending_events().contains(&GameEvent::EliteEvolved {
            from: "Swift".to_string(),
            to: "Tempest".to_string(),
            id: new_id,
        }));
    }

    #[test]
    fn test_fusion_consumes_inputs_and_crystal() {
        let mut game = game(vec![]);
        let a = owned(&mut game, "spark", 6);
        let b = owned(&mut game, "boulder", 9);

        assert!(matches!(
            game.fuse_elites(a, b),
            Err(crate::errors::GameError::Inventory(_))
        ));
        assert_eq!(game.profile().captured().len(), 2);

        game.add_item(FUSION_ITEM_ID, 1).unwrap();
        assert!(game.fuse_elites(a, a).is_err());
        let fused = game.fuse_elites(a, b).unwrap();

        let roster = game.profile().captured();
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].id, fused);
        assert_eq!(roster[0].name(), "SparkBoulder");
        assert_eq!(roster[0].level, 9);
        assert_eq!(game.inventory().quantity_of(FUSION_ITEM_ID), 0);
    }

    #[test]
    fn test_zone_change_feeds_quests() {
        let mut game = game(vec![]);
        game.quests.start("daily_explorer").unwrap();

        assert!(game.change_zone(Zone::Forest));
        assert!(!game.change_zone(Zone::Forest));
        assert!(game.change_zone(Zone::Cave));

        let explorer = game.quests().active_quest("daily_explorer").unwrap();
        assert_eq!(explorer.objectives[0].progress, 3);
        assert!(explorer.objectives[0].completed);
    }

    #[test]
    fn test_forest_battles_count_only_in_forest() {
        let mut game = game(vec![]);
        game.quests.complete_objective("welcome", 0).unwrap();
        game.quests.complete_objective("welcome", 1).unwrap();
        game.quests.complete_objective("welcome", 2).unwrap();
        game.start_quest("forest_explorer").unwrap();

        let wild = CreatureInstance::new_wild(
            get_elite_data("leaf").unwrap(),
            3,
            Position::new(0.0, 1.0, 0.0),
        );
        for _ in 0..3 {
            game.start_battle(&wild).unwrap();
            game.flee().unwrap();
        }
        let explorer = game.quests().active_quest("forest_explorer").unwrap();
        assert_eq!(explorer.objectives[1].progress, 0);

        game.change_zone(Zone::Forest);
        game.start_battle(&wild).unwrap();
        game.flee().unwrap();
        let explorer = game.quests().active_quest("forest_explorer").unwrap();
        assert!(explorer.objectives[0].completed);
        assert_eq!(explorer.objectives[1].progress, 1);
    }

    #[test]
    fn test_started_quest_catches_up_on_totals() {
        let mut game = game(vec![]);
        game.change_zone(Zone::Forest);
        game.change_zone(Zone::Cave);
        game.start_quest("daily_explorer").unwrap();

        let explorer = game.quests().active_quest("daily_explorer").unwrap();
        assert!(explorer.objectives[0].completed);
    }

    #[test]
    fn test_check_for_elites_skips_during_battle() {
        let mut game = game(vec![]);
        let wild = CreatureInstance::new_wild(
            get_elite_data("leaf").unwrap(),
            3,
            Position::new(0.0, 1.0, 0.0),
        );
        game.start_battle(&wild).unwrap();
        // An exhausted scripted rng would panic if anything were rolled.
        assert!(!game.check_for_elites(Position::new(0.0, 2.0, 0.0)));
    }

    #[test]
    fn test_snapshot_restore_round_trip() {
        let mut game = game(vec![]);
        owned(&mut game, "earth", 12);
        game.change_zone(Zone::Rift);
        game.purchase("great_ball", 2).unwrap();
        let snapshot = game.snapshot();

        let mut restored = GameSession::with_rng(GameConfig::instant(), GameRng::new_for_test(vec![]));
        restored.restore(snapshot);
        assert_eq!(restored.profile(), game.profile());
        assert_eq!(restored.inventory(), game.inventory());
        assert_eq!(restored.world().discovered(), game.world().discovered());
        assert_eq!(restored.quests(), game.quests());
    }

    #[test]
    fn test_save_and_load_through_store() {
        let mut store = crate::persistence::MemoryStore::new();
        let mut game = game(vec![]);
        let id = owned(&mut game, "shadow", 4);
        assert!(game.save(&mut store));

        let mut fresh = GameSession::with_rng(GameConfig::instant(), GameRng::new_for_test(vec![]));
        assert!(fresh.profile().get(id).is_none());
        assert!(fresh.load(&store));
        assert_eq!(fresh.profile().get(id).map(|c| c.level), Some(4));

        let empty = crate::persistence::MemoryStore::new();
        assert!(!fresh.load(&empty));
        assert!(fresh.profile().get(id).is_some());
    }
}
