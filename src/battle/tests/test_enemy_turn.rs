use crate::battle::state::{AttackKind, BattlePhase, Side};
use crate::battle::tests::common::{battle_log, start_wild_battle, test_game};
use crate::events::GameEvent;
use pretty_assertions::assert_eq;

#[test]
fn test_enemy_knocks_out_player() {
    // Two rounds against Rift Lv.50: player rolls 0.0, Rift rolls 0.99 then 0.0
    let mut game = test_game(vec![0.0, 0.99, 0.0, 0.0]);
    let wild = start_wild_battle(&mut game, "rift", 50);
    game.world.set_wild(vec![wild.clone()]);

    game.attack(AttackKind::Tackle).unwrap();
    assert_eq!(game.run_until_idle(), 2);
    assert_eq!(game.battle().unwrap().player.current_hp(), 70 - 64);

    game.attack(AttackKind::Tackle).unwrap();
    assert_eq!(game.run_until_idle(), 2);

    let session = game.battle().unwrap();
    assert_eq!(session.phase, BattlePhase::Defeat);
    assert_eq!(session.player.current_hp(), 0);
    assert_eq!(session.enemy.current_hp(), 330 - 4);
    assert_eq!(
        battle_log(&game),
        vec![
            "A wild Rift appeared!",
            "Spark used Tackle! Dealt 2 damage!",
            "Rift attacked! Dealt 64 damage!",
            "Spark used Tackle! Dealt 2 damage!",
            "Rift attacked! Dealt 39 damage!",
            "Spark fainted! You lost!",
        ]
    );
    assert_eq!(
        game.pending_events().last(),
        Some(&GameEvent::BattleLost {
            elite: "Spark".to_string()
        })
    );
    assert!(!game
        .pending_events()
        .iter()
        .any(|e| matches!(e, GameEvent::ExperienceGained { .. })));

    // A defeated wild elite is the only kind that stays in the world.
    assert_eq!(game.end_battle(), Ok(BattlePhase::Defeat));
    assert_eq!(game.world().wild().len(), 1);
}

#[test]
fn test_enemy_waits_for_its_delay() {
    let mut game = test_game(vec![0.0, 0.0]);
    game.config.battle.enemy_delay_ms = 500;
    start_wild_battle(&mut game, "leaf", 5);

    game.attack(AttackKind::Tackle).unwrap();
    assert_eq!(game.advance(std::time::Duration::ZERO), 1);
    let session = game.battle().unwrap();
    assert_eq!(session.turn, Side::Enemy);
    assert_eq!(session.player.current_hp(), 70);

    assert_eq!(game.advance(std::time::Duration::from_millis(499)), 0);
    assert_eq!(game.advance(std::time::Duration::from_millis(1)), 1);
    let session = game.battle().unwrap();
    assert_eq!(session.turn, Side::Player);
    assert_eq!(session.player.current_hp(), 70 - 15);
}
