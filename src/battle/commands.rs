use crate::battle::scheduler::TaskKind;
use crate::battle::state::{BattlePhase, BattleSession, Side, StatModifier};
use crate::errors::{InventoryError, SpeciesDataError};
use crate::events::GameEvent;
use crate::game::GameSession;
use std::time::Duration;
use thiserror::Error;

/// Atomic commands representing final state changes
#[derive(Debug, Clone, PartialEq)]
pub enum BattleCommand {
    // Session flow
    SetPhase(BattlePhase),
    SetTurn(Side),
    AppendLog(String),

    // Creature modifications
    DealDamage { target: Side, amount: u16 },
    AddModifier(StatModifier),

    // Rewards and ownership
    AwardExperience(u32),
    ConsumeItem(String),
    CaptureEnemy,

    // Deferred steps and notifications
    Schedule { kind: TaskKind, delay: Duration },
    EmitEvent(GameEvent),
}

/// Error types for command execution
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExecutionError {
    #[error("command needs a live battle session")]
    NoActiveBattle,
    #[error(transparent)]
    Inventory(#[from] InventoryError),
    #[error(transparent)]
    SpeciesData(#[from] SpeciesDataError),
}

/// Execute a batch of commands in order, stopping at the first failure
pub fn execute_command_batch(
    commands: Vec<BattleCommand>,
    game: &mut GameSession,
) -> Result<(), ExecutionError> {
    for command in commands {
        execute_command(command, game)?;
    }
    Ok(())
}

fn live_session(game: &mut GameSession) -> Result<&mut BattleSession, ExecutionError> {
    game.battle.as_mut().ok_or(ExecutionError::NoActiveBattle)
}

/// Helper function specifically for DealDamage command with event emission
fn execute_deal_damage_command(
    target: Side,
    amount: u16,
    game: &mut GameSession,
) -> Result<(), ExecutionError> {
    let session = live_session(game)?;
    let attacker = session.elite(target.opponent()).name();
    let defender = session.elite_mut(target);
    defender.take_damage(amount);

    let event = GameEvent::DamageDealt {
        attacker,
        target: defender.name(),
        damage: amount,
        remaining_hp: defender.current_hp(),
    };
    game.emit(event);
    Ok(())
}

fn execute_award_experience_command(amount: u32, game: &mut GameSession) {
    let policy = game.config.leveling;
    let level_ups = game.profile.progression.gain_experience(amount, policy);
    if let Some(session) = game.battle.as_mut() {
        session.append_log(format!("Gained {} experience!", amount));
    }

    game.emit(GameEvent::ExperienceGained { amount });
    for level_up in level_ups {
        tracing::debug!(level = level_up.new_level, "player leveled up");
        game.emit(GameEvent::LeveledUp {
            new_level: level_up.new_level,
        });
    }
}

fn execute_capture_command(game: &mut GameSession) -> Result<(), ExecutionError> {
    let captured = live_session(game)?.enemy.clone().into_owned();
    let definition = captured.definition()?;
    let event = GameEvent::EliteCaptured {
        id: captured.id,
        species: definition.id.clone(),
        elite_type: definition.primary_type,
    };

    let id = game.profile.add_captured(captured);
    tracing::debug!(%id, "elite added to roster");
    game.emit(event);
    Ok(())
}

fn execute_command(command: BattleCommand, game: &mut GameSession) -> Result<(), ExecutionError> {
    match command {
        BattleCommand::EmitEvent(event) => {
            game.emit(event);
            Ok(())
        }
        BattleCommand::SetPhase(phase) => {
            live_session(game)?.phase = phase;
            Ok(())
        }
        BattleCommand::SetTurn(side) => {
            live_session(game)?.turn = side;
            Ok(())
        }
        BattleCommand::AppendLog(line) => {
            live_session(game)?.append_log(line);
            Ok(())
        }
        BattleCommand::DealDamage { target, amount } => {
            execute_deal_damage_command(target, amount, game)
        }
        BattleCommand::AddModifier(modifier) => {
            live_session(game)?.add_modifier(modifier);
            Ok(())
        }
        BattleCommand::AwardExperience(amount) => {
            execute_award_experience_command(amount, game);
            Ok(())
        }
        BattleCommand::ConsumeItem(item) => {
            game.inventory.remove_item(&item, 1)?;
            Ok(())
        }
        BattleCommand::CaptureEnemy => execute_capture_command(game),
        BattleCommand::Schedule { kind, delay } => {
            let session_id = live_session(game)?.id;
            game.scheduler.schedule(session_id, delay, kind);
            Ok(())
        }
    }
}
