pub mod evolution;
pub mod fusion;
pub mod leveling;
pub mod rewards;

pub use evolution::{evolve, evolve_by_level, evolve_with_item};
pub use fusion::fuse;
pub use leveling::{LevelUp, Progression};
pub use rewards::RewardCalculator;
