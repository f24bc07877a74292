use crate::battle::calculators::{calculate_attack_damage, calculate_enemy_damage};
use crate::battle::commands::BattleCommand;
use crate::battle::scheduler::{ScheduledTask, TaskKind};
use crate::battle::state::{AttackKind, BattlePhase, BattleSession, Side};
use crate::config::BattleConfig;
use crate::elite::{CreatureInstance, InstanceId};
use crate::errors::{BattleError, BattleResult, SpeciesDataResult};
use crate::events::GameEvent;
use crate::player::PlayerProfile;
use crate::progression::RewardCalculator;
use crate::rng::GameRng;
use crate::species::{default_starter, DEFAULT_STARTER_LEVEL};
use schema::BattleStat;

/// Checks that a player command may act on the battle right now.
///
/// Returns the live session so callers can build commands against it.
pub fn validate_player_action(session: Option<&BattleSession>) -> BattleResult<&BattleSession> {
    let session = session.ok_or(BattleError::NoActiveBattle)?;
    if session.phase != BattlePhase::Menu {
        return Err(BattleError::WrongPhase {
            phase: session.phase,
        });
    }
    if session.turn != Side::Player {
        return Err(BattleError::NotPlayerTurn { turn: session.turn });
    }
    Ok(session)
}

/// Picks the creature the player fights with and returns its battle view.
///
/// The active creature wins, then the first captured one, then the loaned
/// default starter. Owned creatures keep their id in the view so battle-only
/// effects can be traced back to them.
pub fn player_battle_view(
    profile: &PlayerProfile,
) -> SpeciesDataResult<(CreatureInstance, Option<InstanceId>)> {
    match profile.battle_elite() {
        Some(owned) => {
            let mut view = owned.clone();
            view.restore_full();
            Ok((view, Some(owned.id)))
        }
        None => {
            let starter = CreatureInstance::new_owned(default_starter()?, DEFAULT_STARTER_LEVEL);
            Ok((starter, None))
        }
    }
}

/// Builds a fresh session against a wild creature.
pub fn build_battle_session(
    id: u64,
    profile: &PlayerProfile,
    wild: &CreatureInstance,
) -> SpeciesDataResult<BattleSession> {
    let (player, player_source) = player_battle_view(profile)?;
    let mut enemy = wild.clone();
    enemy.restore_full();

    let mut session = BattleSession::new(id, player, player_source, enemy);
    session.append_log(format!("A wild {} appeared!", session.enemy.name()));
    Ok(session)
}

/// Commands for a validated player attack. Damage is rolled now and applied
/// when the scheduled resolution fires.
pub fn calculate_attack_commands(
    session: &BattleSession,
    kind: AttackKind,
    rng: &mut GameRng,
    config: &BattleConfig,
) -> SpeciesDataResult<Vec<BattleCommand>> {
    let attack_multiplier = session.stat_multiplier(BattleStat::Attack);
    let damage = calculate_attack_damage(
        &session.player,
        &session.enemy,
        kind,
        attack_multiplier,
        rng,
    )?;

    Ok(vec![
        BattleCommand::SetPhase(BattlePhase::Animation),
        BattleCommand::Schedule {
            kind: TaskKind::ResolvePlayerAttack { kind, damage },
            delay: config.attack_delay(),
        },
    ])
}

pub fn resolve_player_attack_commands(
    session: &BattleSession,
    kind: AttackKind,
    damage: u16,
    config: &BattleConfig,
) -> Vec<BattleCommand> {
    let player_name = session.player.name();
    let enemy_name = session.enemy.name();
    let remaining = session.enemy.current_hp().saturating_sub(damage);

    let mut commands = vec![
        BattleCommand::DealDamage {
            target: Side::Enemy,
            amount: damage,
        },
        BattleCommand::AppendLog(format!(
            "{} used {}! Dealt {} damage!",
            player_name,
            kind.label(),
            damage
        )),
    ];

    if remaining == 0 {
        let experience = RewardCalculator.experience_for_defeat(&session.enemy);
        commands.extend([
            BattleCommand::AppendLog(format!("{} fainted! You won!", enemy_name)),
            BattleCommand::SetPhase(BattlePhase::Victory),
            BattleCommand::AwardExperience(experience),
            BattleCommand::EmitEvent(GameEvent::BattleWon {
                enemy: session.enemy.name(),
                experience,
            }),
        ]);
    } else {
        commands.extend(hand_turn_to_enemy(config));
    }
    commands
}

/// Flips the turn and queues the enemy's reply.
pub fn hand_turn_to_enemy(config: &BattleConfig) -> Vec<BattleCommand> {
    vec![
        BattleCommand::SetTurn(Side::Enemy),
        BattleCommand::SetPhase(BattlePhase::Menu),
        BattleCommand::Schedule {
            kind: TaskKind::EnemyAttack,
            delay: config.enemy_delay(),
        },
    ]
}

pub fn calculate_enemy_attack_commands(
    session: &BattleSession,
    rng: &mut GameRng,
) -> SpeciesDataResult<Vec<BattleCommand>> {
    let damage = calculate_enemy_damage(&session.enemy, rng)?;
    let remaining = session.player.current_hp().saturating_sub(damage);

    let mut commands = vec![
        BattleCommand::DealDamage {
            target: Side::Player,
            amount: damage,
        },
        BattleCommand::AppendLog(format!(
            "{} attacked! Dealt {} damage!",
            session.enemy.name(),
            damage
        )),
    ];

    if remaining == 0 {
        let player_name = session.player.name();
        commands.extend([
            BattleCommand::AppendLog(format!("{} fainted! You lost!", player_name)),
            BattleCommand::SetPhase(BattlePhase::Defeat),
            BattleCommand::EmitEvent(GameEvent::BattleLost { elite: player_name }),
        ]);
    } else {
        commands.extend([
            BattleCommand::SetTurn(Side::Player),
            BattleCommand::SetPhase(BattlePhase::Menu),
        ]);
    }
    Ok(commands)
}

/// A task may only touch the session that scheduled it, and only while that
/// session is still in the phase the task was scheduled for.
pub fn task_is_live(session: Option<&BattleSession>, task: &ScheduledTask) -> bool {
    let Some(session) = session else {
        return false;
    };
    if session.id != task.session_id {
        return false;
    }
    match task.kind {
        TaskKind::ResolvePlayerAttack { .. } | TaskKind::ResolveCapture { .. } => {
            session.phase == BattlePhase::Animation
        }
        TaskKind::EnemyAttack => session.phase == BattlePhase::Menu && session.turn == Side::Enemy,
    }
}

/// Builds the commands a due task resolves to. Callers check liveness first.
pub fn calculate_task_commands(
    session: &BattleSession,
    task: &ScheduledTask,
    rng: &mut GameRng,
    config: &BattleConfig,
) -> SpeciesDataResult<Vec<BattleCommand>> {
    match task.kind {
        TaskKind::ResolvePlayerAttack { kind, damage } => {
            Ok(resolve_player_attack_commands(session, kind, damage, config))
        }
        TaskKind::ResolveCapture { success } => Ok(
            crate::battle::catch::resolve_capture_commands(session, success, config),
        ),
        TaskKind::EnemyAttack => calculate_enemy_attack_commands(session, rng),
    }
}
