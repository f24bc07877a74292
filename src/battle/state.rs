use crate::elite::{CreatureInstance, InstanceId};
use schema::BattleStat;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BattlePhase {
    /// No battle. Never stored on a live session.
    Idle,
    /// Waiting for the side whose turn it is.
    Menu,
    /// An action is resolving; player input is refused.
    Animation,
    Victory,
    Defeat,
    Captured,
}

impl BattlePhase {
    /// Victory, defeat and capture wait for `end_battle`.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            BattlePhase::Victory | BattlePhase::Defeat | BattlePhase::Captured
        )
    }
}

/// One of the two combatants. Also names whose turn it is.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttackKind {
    Tackle,
    Special,
}

impl AttackKind {
    pub fn power(self) -> f64 {
        match self {
            AttackKind::Tackle => 40.0,
            AttackKind::Special => 60.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttackKind::Tackle => "Tackle",
            AttackKind::Special => "Special Attack",
        }
    }
}

/// Multiplier applied to the player's creature for the rest of the battle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatModifier {
    pub stat: BattleStat,
    pub multiplier: f32,
    pub source_item: &'static str,
}

/// The single live battle. Exists exactly while the phase is not idle.
#[derive(Debug, Clone, PartialEq)]
pub struct BattleSession {
    pub id: u64,
    pub phase: BattlePhase,
    pub turn: Side,
    /// In-battle copy of the player's creature. Shares the owned instance's id
    /// when one exists.
    pub player: CreatureInstance,
    pub enemy: CreatureInstance,
    /// Owned creature the player view was built from; `None` for the loaned starter.
    pub player_source: Option<InstanceId>,
    log: Vec<String>,
    modifiers: Vec<StatModifier>,
}

impl BattleSession {
    pub fn new(
        id: u64,
        player: CreatureInstance,
        player_source: Option<InstanceId>,
        enemy: CreatureInstance,
    ) -> Self {
        Self {
            id,
            phase: BattlePhase::Menu,
            turn: Side::Player,
            player,
            enemy,
            player_source,
            log: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn elite(&self, side: Side) -> &CreatureInstance {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn elite_mut(&mut self, side: Side) -> &mut CreatureInstance {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// The log only ever grows.
    pub fn append_log(&mut self, line: impl Into<String>) {
        let line = line.into();
        tracing::debug!(session = self.id, "{}", line);
        self.log.push(line);
    }

    pub fn modifiers(&self) -> &[StatModifier] {
        &self.modifiers
    }

    pub fn add_modifier(&mut self, modifier: StatModifier) {
        self.modifiers.push(modifier);
    }

    /// Combined multiplier for a stat; modifiers stack multiplicatively.
    pub fn stat_multiplier(&self, stat: BattleStat) -> f64 {
        self.modifiers
            .iter()
            .filter(|m| m.stat == stat)
            .map(|m| m.multiplier as f64)
            .product()
    }

    pub fn accepts_player_action(&self) -> bool {
        self.phase == BattlePhase::Menu && self.turn == Side::Player
    }
}

impl fmt::Display for BattleSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "=== Battle ({:?}, {:?} turn) ===", self.phase, self.turn)?;
        writeln!(f, "Wild:  {}", self.enemy)?;
        write!(f, "Yours: {}", self.player)?;
        for modifier in &self.modifiers {
            write!(
                f,
                "\n  {} x{:.1} ({})",
                modifier.stat, modifier.multiplier, modifier.source_item
            )?;
        }
        Ok(())
    }
}
