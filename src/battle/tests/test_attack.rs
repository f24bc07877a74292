use crate::battle::state::{AttackKind, BattlePhase, Side};
use crate::battle::tests::common::{
    battle_log, give_active, start_wild_battle, test_game, test_game_with_config,
    TestEliteBuilder,
};
use crate::config::GameConfig;
use crate::errors::{BattleError, GameError, ProgressionError};
use crate::events::GameEvent;
use pretty_assertions::assert_eq;
use std::time::Duration;

#[test]
fn test_attack_round_follows_the_clock() {
    // Damage roll 0.0, enemy roll 0.5
    let mut game = test_game_with_config(GameConfig::default(), vec![0.0, 0.5]);
    start_wild_battle(&mut game, "splash", 3);

    game.attack(AttackKind::Tackle).unwrap();
    assert_eq!(game.phase(), BattlePhase::Animation);
    assert_eq!(game.pending_tasks(), 1);
    assert_eq!(
        game.attack(AttackKind::Tackle),
        Err(GameError::Battle(BattleError::WrongPhase {
            phase: BattlePhase::Animation
        }))
    );

    assert_eq!(game.advance(Duration::from_millis(999)), 0);
    assert_eq!(game.battle().unwrap().enemy.current_hp(), 63);

    // Spark Lv.5 into Splash: base 5, rolled to 4, doubled by Electric vs Water
    assert_eq!(game.advance(Duration::from_millis(1)), 1);
    let session = game.battle().unwrap();
    assert_eq!(session.enemy.current_hp(), 55);
    assert_eq!(session.phase, BattlePhase::Menu);
    assert_eq!(session.turn, Side::Enemy);
    assert_eq!(
        game.attack(AttackKind::Tackle),
        Err(GameError::Battle(BattleError::NotPlayerTurn { turn: Side::Enemy }))
    );

    // Splash attack 28 * 0.8
    assert_eq!(game.advance(Duration::from_millis(1000)), 1);
    let session = game.battle().unwrap();
    assert_eq!(session.player.current_hp(), 48);
    assert!(session.accepts_player_action());
    assert_eq!(game.now(), Duration::from_millis(2000));

    assert_eq!(
        battle_log(&game),
        vec![
            "A wild Splash appeared!",
            "Spark used Tackle! Dealt 8 damage!",
            "Splash attacked! Dealt 22 damage!",
        ]
    );
    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::DamageDealt {
                attacker: "Spark".to_string(),
                target: "Splash".to_string(),
                damage: 8,
                remaining_hp: 55,
            },
            GameEvent::DamageDealt {
                attacker: "Splash".to_string(),
                target: "Spark".to_string(),
                damage: 22,
                remaining_hp: 48,
            },
        ]
    );
}

#[test]
fn test_special_attack_wins_battle() {
    let mut game = test_game(vec![0.0]);
    give_active(&mut game, "spark", 60);
    let wild = start_wild_battle(&mut game, "splash", 1);
    game.world.set_wild(vec![wild.clone()]);

    game.attack(AttackKind::Special).unwrap();
    assert_eq!(game.run_until_idle(), 1);

    // Base 35, rolled to 29, doubled: more than Splash Lv.1's 53 HP
    assert_eq!(game.phase(), BattlePhase::Victory);
    assert_eq!(
        battle_log(&game),
        vec![
            "A wild Splash appeared!",
            "Spark used Special Attack! Dealt 58 damage!",
            "Splash fainted! You won!",
            "Gained 50 experience!",
        ]
    );
    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::DamageDealt {
                attacker: "Spark".to_string(),
                target: "Splash".to_string(),
                damage: 58,
                remaining_hp: 0,
            },
            GameEvent::ExperienceGained { amount: 50 },
            GameEvent::BattleWon {
                enemy: "Splash".to_string(),
                experience: 50,
            },
        ]
    );
    assert_eq!(game.profile().progression.experience, 50);
    assert_eq!(game.pending_tasks(), 0);

    assert_eq!(
        game.attack(AttackKind::Tackle),
        Err(GameError::Battle(BattleError::WrongPhase {
            phase: BattlePhase::Victory
        }))
    );
    assert_eq!(game.end_battle(), Ok(BattlePhase::Victory));
    assert_eq!(game.phase(), BattlePhase::Idle);
    assert!(game.world().wild().iter().all(|w| w.id != wild.id));
    assert_eq!(
        game.drain_events(),
        vec![GameEvent::BattleEnded {
            outcome: BattlePhase::Victory
        }]
    );
}

#[test]
fn test_victory_can_level_up_the_player() {
    let mut game = test_game(vec![0.0]);
    give_active(&mut game, "spark", 60);
    game.profile.progression.experience = 80;
    start_wild_battle(&mut game, "splash", 1);

    game.attack(AttackKind::Special).unwrap();
    game.run_until_idle();

    let progression = &game.profile().progression;
    assert_eq!(progression.level, 2);
    assert_eq!(progression.experience, 30);
    assert_eq!(progression.max_experience, 150);
    assert!(game
        .pending_events()
        .contains(&GameEvent::LeveledUp { new_level: 2 }));
}

#[test]
fn test_attack_without_battle_is_rejected() {
    let mut game = test_game(vec![]);
    assert_eq!(
        game.attack(AttackKind::Tackle),
        Err(GameError::Battle(BattleError::NoActiveBattle))
    );
    assert!(game.pending_events().is_empty());
}

#[test]
fn test_battle_copy_does_not_touch_owned_elite() {
    let mut game = test_game(vec![0.0, 0.99]);
    let id = game
        .profile
        .add_captured(TestEliteBuilder::new("leaf", 5).with_hp(10).build());
    game.set_active_elite(id).unwrap();
    start_wild_battle(&mut game, "shadow", 5);

    assert_eq!(game.battle().unwrap().player.current_hp(), 75);
    assert_eq!(game.battle().unwrap().player_source, Some(id));

    game.attack(AttackKind::Tackle).unwrap();
    game.run_until_idle();
    assert!(game.battle().unwrap().player.current_hp() < 75);
    assert_eq!(game.profile().get(id).unwrap().current_hp(), 10);
}

#[test]
fn test_fighting_elite_cannot_leave_or_change() {
    let mut game = test_game(vec![]);
    let fighter = give_active(&mut game, "swift", 20);
    let bench = give_active(&mut game, "spark", 5);
    game.set_active_elite(fighter).unwrap();
    start_wild_battle(&mut game, "leaf", 3);

    let in_battle = Err(GameError::Progression(ProgressionError::InBattle(
        "Swift".to_string(),
    )));
    assert_eq!(game.release_elite(fighter).map(|c| c.id), in_battle.clone());
    assert_eq!(game.evolve_elite(fighter), in_battle.clone());
    assert_eq!(game.fuse_elites(bench, fighter), in_battle);
    assert_eq!(game.profile().captured().len(), 2);

    assert_eq!(game.release_elite(bench).map(|c| c.id), Ok(bench));
    game.flee().unwrap();
    assert!(game.evolve_elite(fighter).is_ok());
}
