use crate::battle::commands::ExecutionError;
use crate::battle::state::{BattlePhase, Side};
use schema::ItemCategory;
use thiserror::Error;

/// Top-level error for game commands.
///
/// Every variant is a rejected command, never a fatal condition: the game
/// state is unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("species data error: {0}")]
    SpeciesData(#[from] SpeciesDataError),
    #[error("battle error: {0}")]
    Battle(#[from] BattleError),
    #[error("capture error: {0}")]
    Catch(#[from] CatchError),
    #[error("item error: {0}")]
    Item(#[from] ItemError),
    #[error("inventory error: {0}")]
    Inventory(#[from] InventoryError),
    #[error("quest error: {0}")]
    Quest(#[from] QuestError),
    #[error("progression error: {0}")]
    Progression(#[from] ProgressionError),
    #[error("command execution failed: {0}")]
    Execution(#[from] ExecutionError),
}

/// Errors related to creature catalog lookups and creature transformations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SpeciesDataError {
    #[error("species not found: {0}")]
    SpeciesNotFound(String),
    #[error("{0} has no evolution")]
    NoEvolution(String),
    #[error("{species} evolves with {required}, not {offered}")]
    WrongEvolutionItem {
        species: String,
        required: String,
        offered: String,
    },
    #[error("{species} needs level {required} to evolve (currently {level})")]
    LevelTooLow {
        species: String,
        level: u8,
        required: u8,
    },
    #[error("{species} evolves with {item}, not by level")]
    ItemRequired { species: String, item: String },
    #[error("cannot fuse an elite with itself")]
    SelfFusion,
}

/// Precondition violations in the battle state machine.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BattleError {
    #[error("a battle is already in progress")]
    AlreadyInBattle,
    #[error("no battle is in progress")]
    NoActiveBattle,
    #[error("action not allowed during {phase:?} phase")]
    WrongPhase { phase: BattlePhase },
    #[error("it is not the player's turn ({turn:?} is acting)")]
    NotPlayerTurn { turn: Side },
}

/// Reasons a capture attempt is refused before any ball is thrown.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatchError {
    #[error(transparent)]
    Battle(#[from] BattleError),
    #[error("unknown item: {0}")]
    UnknownBall(String),
    #[error("{0} is not a capture item")]
    NotABall(String),
    #[error("no {0} left")]
    NoBallsLeft(String),
}

/// Item catalog and item effect failures.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ItemError {
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("{item} ({category}) cannot be used directly")]
    NotUsable { item: String, category: ItemCategory },
    #[error("{0} needs a target elite")]
    TargetRequired(String),
    #[error("no elite with id {0}")]
    UnknownTarget(String),
    #[error("{0} would have no effect")]
    NoEffect(String),
    #[error("{0} can only be used during a battle")]
    BattleOnly(String),
    #[error("{0} cannot be used on a fainted elite")]
    TargetFainted(String),
    #[error("evolution failed: {0}")]
    Evolution(#[from] SpeciesDataError),
}

/// Ledger bookkeeping failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InventoryError {
    #[error("unknown item: {0}")]
    UnknownItem(String),
    #[error("not enough {item}: have {held}, need {requested}")]
    InsufficientQuantity {
        item: String,
        held: u32,
        requested: u32,
    },
    #[error("not enough money: have {held}, need {requested}")]
    InsufficientFunds { held: u64, requested: u64 },
    #[error("inventory is full ({capacity} slots)")]
    InventoryFull { capacity: usize },
    #[error("{0} is not for sale")]
    NotForSale(String),
    #[error("quantity must be positive")]
    ZeroQuantity,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuestError {
    #[error("unknown quest: {0}")]
    UnknownQuest(String),
    #[error("quest {0} is already active")]
    AlreadyActive(String),
    #[error("quest {0} was already completed")]
    AlreadyCompleted(String),
    #[error("quest {quest} requires {missing} to be completed first")]
    PrerequisiteMissing { quest: String, missing: String },
    #[error("quest {0} is not active")]
    NotActive(String),
    #[error("quest {quest} has no objective {index}")]
    InvalidObjective { quest: String, index: usize },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProgressionError {
    #[error("no owned elite with id {0}")]
    UnknownElite(String),
    #[error("{0} is fighting in the current battle")]
    InBattle(String),
}

/// Persistence failures. These never leave the persistence module; they are
/// logged and turned into "nothing saved" / "nothing to load".
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("no storage location available")]
    NoStorageLocation,
}

pub type GameResult<T> = Result<T, GameError>;

pub type SpeciesDataResult<T> = Result<T, SpeciesDataError>;

pub type BattleResult<T> = Result<T, BattleError>;

pub type CatchResult<T> = Result<T, CatchError>;

pub type ItemResult<T> = Result<T, ItemError>;

pub type InventoryResult<T> = Result<T, InventoryError>;

pub type QuestResult<T> = Result<T, QuestError>;
