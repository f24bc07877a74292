use crate::battle::tests::common::{test_game, TestEliteBuilder};
use crate::elite::Position;
use crate::errors::{GameError, QuestError};
use crate::events::GameEvent;
use pretty_assertions::assert_eq;
use schema::Zone;

#[test]
fn test_welcome_quest_completes_through_play() {
    let mut game = test_game(vec![0.05]);
    assert_eq!(
        game.start_quest("forest_explorer").map(|q| q.id.clone()),
        Err(GameError::Quest(QuestError::PrerequisiteMissing {
            quest: "forest_explorer".to_string(),
            missing: "welcome".to_string(),
        }))
    );

    game.change_zone(Zone::Starting);
    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::ZoneEntered {
                zone: Zone::Starting,
                first_visit: false
            },
            GameEvent::ObjectiveCompleted {
                quest_id: "welcome".to_string(),
                index: 0
            },
        ]
    );

    let wild = TestEliteBuilder::new("leaf", 5)
        .wild()
        .build();
    game.start_battle(&wild).unwrap();
    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::BattleStarted {
                enemy: "Leaf".to_string(),
                level: 5
            },
            GameEvent::ObjectiveCompleted {
                quest_id: "welcome".to_string(),
                index: 1
            },
        ]
    );

    game.capture("elite_ball").unwrap();
    game.run_until_idle();
    let events = game.drain_events();
    assert_eq!(
        &events[2..],
        &[
            GameEvent::ObjectiveCompleted {
                quest_id: "welcome".to_string(),
                index: 2
            },
            GameEvent::QuestCompleted {
                quest_id: "welcome".to_string(),
                reward: Some("Elite Ball x5, Potion x3".to_string()),
            },
        ]
    );

    assert!(game.quests().is_completed("welcome"));
    assert!(game.quests().completed()[0].completed_at.is_some());
    assert!(game.start_quest("forest_explorer").is_ok());
}

#[test]
fn test_proximity_check_starts_battle() {
    // 3 spawns; the first is a Lv.1 Spark at the origin, the rest far away.
    // Then one encounter roll for the only elite in range.
    let mut game = test_game(vec![
        0.0, //
        0.0, 0.0, 0.5, 0.5, //
        0.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 0.0, //
        0.1,
    ]);

    assert!(game.check_for_elites(Position::new(1.0, 2.0, 0.0)));
    assert_eq!(game.world().wild().len(), 3);
    assert_eq!(game.profile().position, Position::new(1.0, 2.0, 0.0));
    let session = game.battle().unwrap();
    assert_eq!(session.enemy.species_id(), "spark");
    assert_eq!(session.enemy.level, 1);

    assert_eq!(
        game.drain_events(),
        vec![
            GameEvent::ZoneExplored {
                zone: Zone::Starting
            },
            GameEvent::ObjectiveCompleted {
                quest_id: "welcome".to_string(),
                index: 0
            },
            GameEvent::EncounterTriggered {
                species: "spark".to_string()
            },
            GameEvent::BattleStarted {
                enemy: "Spark".to_string(),
                level: 1
            },
            GameEvent::ObjectiveCompleted {
                quest_id: "welcome".to_string(),
                index: 1
            },
        ]
    );
}

#[test]
fn test_no_battle_when_rolls_fail() {
    let mut game = test_game(vec![
        0.0, //
        0.0, 0.0, 0.5, 0.5, //
        0.0, 0.0, 0.0, 0.0, //
        0.0, 0.0, 0.0, 0.0, //
        0.3,
    ]);
    assert!(!game.check_for_elites(Position::new(1.0, 2.0, 0.0)));
    assert!(game.battle().is_none());
    let nearest = game.world().nearest_elite(&Position::new(1.0, 2.0, 0.0));
    assert_eq!(nearest.map(|(_, d)| d), Some(1.0));
}
