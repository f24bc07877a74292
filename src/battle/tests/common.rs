use crate::config::GameConfig;
use crate::elite::{CreatureInstance, InstanceId, Position};
use crate::game::GameSession;
use crate::rng::GameRng;
use crate::species::get_elite_data;

/// A builder for creature instances with common test defaults.
///
/// # Example
/// ```ignore
/// let splash = TestEliteBuilder::new("splash", 3).wild().build();
/// ```
pub struct TestEliteBuilder {
    species: &'static str,
    level: u8,
    position: Option<Position>,
    current_hp: Option<u16>,
}

impl TestEliteBuilder {
    pub fn new(species: &'static str, level: u8) -> Self {
        Self {
            species,
            level,
            position: None,
            current_hp: None,
        }
    }

    /// Places the creature in the world as a wild elite next to the spawn point.
    pub fn wild(mut self) -> Self {
        self.position = Some(Position::new(0.0, 1.0, 0.0));
        self
    }

    pub fn with_hp(mut self, hp: u16) -> Self {
        self.current_hp = Some(hp);
        self
    }

    pub fn build(self) -> CreatureInstance {
        let definition = match get_elite_data(self.species) {
            Ok(data) => data,
            Err(err) => panic!("Failed to load species data for {}: {}", self.species, err),
        };
        let mut instance = match self.position {
            Some(position) => CreatureInstance::new_wild(definition, self.level, position),
            None => CreatureInstance::new_owned(definition, self.level),
        };
        if let Some(hp) = self.current_hp {
            instance.set_hp(hp);
        }
        instance
    }
}

/// A zero-delay game with a scripted rng and no pending events.
pub fn test_game(outcomes: Vec<f64>) -> GameSession {
    test_game_with_config(GameConfig::instant(), outcomes)
}

pub fn test_game_with_config(config: GameConfig, outcomes: Vec<f64>) -> GameSession {
    let mut game = GameSession::with_rng(config, GameRng::new_for_test(outcomes));
    game.drain_events();
    game
}

/// Adds an owned creature and makes it the active one.
pub fn give_active(game: &mut GameSession, species: &'static str, level: u8) -> InstanceId {
    let id = game
        .profile
        .add_captured(TestEliteBuilder::new(species, level).build());
    game.profile
        .set_active(id)
        .unwrap_or_else(|e| panic!("could not activate {}: {}", species, e));
    id
}

/// Starts a battle against a fresh wild creature and clears the start events.
pub fn start_wild_battle(game: &mut GameSession, species: &'static str, level: u8) -> CreatureInstance {
    let wild = TestEliteBuilder::new(species, level).wild().build();
    if let Err(e) = game.start_battle(&wild) {
        panic!("Expected battle to start but got error: {}", e);
    }
    game.drain_events();
    wild
}

pub fn battle_log(game: &GameSession) -> Vec<String> {
    game.battle()
        .map(|session| session.log().to_vec())
        .unwrap_or_default()
}
