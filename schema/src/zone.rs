use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// A discrete explorable region of the world.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    Serialize,
    Deserialize,
    Display,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum Zone {
    #[default]
    Starting,
    Forest,
    Cave,
    Rift,
    Jungle,
    Village,
    City,
    Valley,
    Mountain,
    Metropolis,
    Desert,
    Coastal,
    Capital,
    Industrial,
    Trading,
    Academic,
}

impl Zone {
    pub fn title(self) -> &'static str {
        match self {
            Zone::Starting => "Starting Meadow",
            Zone::Forest => "Whispering Forest",
            Zone::Cave => "Crystal Caves",
            Zone::Rift => "Dimensional Rift",
            Zone::Jungle => "Emerald Jungle",
            Zone::Village => "Quiet Village",
            Zone::City => "Elite City",
            Zone::Valley => "Sunlit Valley",
            Zone::Mountain => "Iron Peaks",
            Zone::Metropolis => "Neon Metropolis",
            Zone::Desert => "Scorched Desert",
            Zone::Coastal => "Tidal Coast",
            Zone::Capital => "Royal Capital",
            Zone::Industrial => "Industrial District",
            Zone::Trading => "Trading Post",
            Zone::Academic => "Academy Grounds",
        }
    }
}
