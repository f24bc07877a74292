// In: src/lib.rs

//! Rise of Elites game core
//!
//! Creature collection, turn-based battles paced by a logical clock, items,
//! quests and zone exploration. Catalog data is compiled in from `data/*.ron`
//! by the build script; everything a front end needs goes through
//! [`GameSession`].

// --- MODULE DECLARATIONS ---
pub mod battle;
pub mod config;
pub mod elite;
pub mod encounter;
pub mod errors;
pub mod events;
pub mod game;
mod generated;
pub mod inventory;
pub mod item_data;
pub mod item_effects;
pub mod persistence;
pub mod player;
pub mod progression;
pub mod quests;
pub mod rng;
pub mod species;
pub mod text_interface;
pub mod world;

// --- PUBLIC API RE-EXPORTS ---

// --- From the `schema` crate ---
pub use schema::{
    BaseStats, BattleStat, CreatureDefinition, EliteType, EvolutionData, EvolutionMethod,
    ItemCategory, ItemDefinition, ItemEffect, ItemRarity, QuestPriority, QuestTemplate, Rarity,
    Zone,
};

// --- From this crate's modules (`src/`) ---

// The session and its inputs.
pub use config::GameConfig;
pub use game::GameSession;
pub use rng::GameRng;

// Runtime state types.
pub use battle::state::{AttackKind, BattlePhase, BattleSession, Side};
pub use elite::{CreatureInstance, InstanceId, Position};
pub use events::GameEvent;
pub use inventory::{InventoryLedger, InventorySort};
pub use item_effects::ItemOutcome;
pub use player::PlayerProfile;
pub use quests::{QuestRecord, QuestTracker};
pub use world::WorldNavigator;

// Catalog lookups.
pub use item_data::{find_item, get_item_data};
pub use species::{find_elite, get_elite_data};

// Persistence.
pub use persistence::{FileStore, KeyValueStore, MemoryStore, SaveSnapshot};

// Crate-specific error and result types.
pub use errors::{
    BattleError, CatchError, GameError, GameResult, InventoryError, ItemError, PersistenceError,
    ProgressionError, QuestError, SpeciesDataError, SpeciesDataResult,
};
