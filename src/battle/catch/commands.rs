use crate::battle::catch::{calculate_capture_chance, roll_capture_success};
use crate::battle::commands::BattleCommand;
use crate::battle::engine::hand_turn_to_enemy;
use crate::battle::scheduler::TaskKind;
use crate::battle::state::{BattlePhase, BattleSession};
use crate::config::BattleConfig;
use crate::events::GameEvent;
use crate::rng::GameRng;

/// Calculate commands for a validated capture attempt
/// The ball is spent up front; the outcome is rolled now and revealed when the
/// scheduled resolution fires.
pub fn calculate_capture_commands(
    session: &BattleSession,
    ball_id: &str,
    ball_multiplier: f32,
    rng: &mut GameRng,
    config: &BattleConfig,
) -> Vec<BattleCommand> {
    let chance = calculate_capture_chance(&session.enemy, ball_multiplier);
    let success = roll_capture_success(chance, rng);
    tracing::debug!(ball = ball_id, chance, success, "capture rolled");

    vec![
        BattleCommand::ConsumeItem(ball_id.to_string()),
        BattleCommand::SetPhase(BattlePhase::Animation),
        BattleCommand::EmitEvent(GameEvent::CaptureAttempted {
            ball: ball_id.to_string(),
            chance,
        }),
        BattleCommand::Schedule {
            kind: TaskKind::ResolveCapture { success },
            delay: config.capture_delay(),
        },
    ]
}

/// Commands revealing a capture outcome
pub fn resolve_capture_commands(
    session: &BattleSession,
    success: bool,
    config: &BattleConfig,
) -> Vec<BattleCommand> {
    let enemy_name = session.enemy.name();
    if success {
        return vec![
            BattleCommand::CaptureEnemy,
            BattleCommand::AppendLog(format!("{} was captured!", enemy_name)),
            BattleCommand::SetPhase(BattlePhase::Captured),
        ];
    }

    let mut commands = vec![
        BattleCommand::AppendLog(format!("{} broke free!", enemy_name)),
        BattleCommand::EmitEvent(GameEvent::CaptureFailed {
            enemy: enemy_name.clone(),
        }),
    ];
    commands.extend(hand_turn_to_enemy(config));
    commands
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::battle::state::Side;
    use crate::elite::CreatureInstance;
    use crate::species::get_elite_data;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn session() -> BattleSession {
        let spark = CreatureInstance::new_owned(get_elite_data("spark").unwrap(), 5);
        let leaf = CreatureInstance::new_owned(get_elite_data("leaf").unwrap(), 5);
        BattleSession::new(1, spark, None, leaf)
    }

    #[test]
    fn test_capture_commands_spend_ball_and_schedule() {
        let session = session();
        // Full HP Lv.5 common with a basic ball: 0.1 * 0.95 = 0.095; 0.05 rolls under it.
        let mut rng = GameRng::new_for_test(vec![0.05]);
        let commands =
            calculate_capture_commands(&session, "elite_ball", 1.0, &mut rng, &BattleConfig::default());

        assert_eq!(commands.len(), 4);
        assert_eq!(commands[0], BattleCommand::ConsumeItem("elite_ball".to_string()));
        assert_eq!(commands[1], BattleCommand::SetPhase(BattlePhase::Animation));
        assert!(matches!(
            &commands[2],
            BattleCommand::EmitEvent(GameEvent::CaptureAttempted { ball, chance })
                if ball == "elite_ball" && (*chance - 0.095).abs() < 1e-9
        ));
        assert_eq!(
            commands[3],
            BattleCommand::Schedule {
                kind: TaskKind::ResolveCapture { success: true },
                delay: Duration::from_millis(1500),
            }
        );
    }

    #[test]
    fn test_failed_roll_schedules_failed_resolution() {
        let session = session();
        let mut rng = GameRng::new_for_test(vec![0.5]);
        let commands =
            calculate_capture_commands(&session, "elite_ball", 1.0, &mut rng, &BattleConfig::default());
        assert!(matches!(
            commands.last(),
            Some(BattleCommand::Schedule {
                kind: TaskKind::ResolveCapture { success: false },
                ..
            })
        ));
    }

    #[test]
    fn test_resolve_success() {
        let commands = resolve_capture_commands(&session(), true, &BattleConfig::default());
        assert_eq!(
            commands,
            vec![
                BattleCommand::CaptureEnemy,
                BattleCommand::AppendLog("Leaf was captured!".to_string()),
                BattleCommand::SetPhase(BattlePhase::Captured),
            ]
        );
    }

    #[test]
    fn test_resolve_failure_hands_turn_to_enemy() {
        let commands = resolve_capture_commands(&session(), false, &BattleConfig::default());
        assert_eq!(
            commands,
            vec![
                BattleCommand::AppendLog("Leaf broke free!".to_string()),
                BattleCommand::EmitEvent(GameEvent::CaptureFailed {
                    enemy: "Leaf".to_string()
                }),
                BattleCommand::SetTurn(Side::Enemy),
                BattleCommand::SetPhase(BattlePhase::Menu),
                BattleCommand::Schedule {
                    kind: TaskKind::EnemyAttack,
                    delay: Duration::from_millis(1000),
                },
            ]
        );
    }
}
