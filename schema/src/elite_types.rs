use serde::{Deserialize, Serialize};
use std::fmt;
use strum::{EnumIter, EnumString, IntoStaticStr};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    EnumIter,
    EnumString,
    IntoStaticStr,
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum EliteType {
    Electric,
    Grass,
    Rock,
    Water,
    Fire,
    Wind,
    Poison,
    Crystal,
    Steel,
    Earth,
    Shadow,
    Void,
    Ghost,
    Rift,
}

impl fmt::Display for EliteType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl EliteType {
    /// Multiplier for an attacking type hitting a single defending type.
    ///
    /// The chart is deliberately sparse and directed: electric beats water,
    /// but water is only resisted by electric, not the other way round.
    /// Anything not listed is neutral.
    pub fn type_effectiveness(attacking: EliteType, defending: EliteType) -> f32 {
        use EliteType::*;

        match (attacking, defending) {
            // Electric
            (Electric, Water) => 2.0,
            (Electric, Grass) | (Electric, Electric) => 0.5,
            (Electric, Rock) => 1.0,
            (Electric, _) => 1.0,

            // Water
            (Water, Fire) | (Water, Rock) => 2.0,
            (Water, Grass) | (Water, Electric) => 0.5,
            (Water, _) => 1.0,

            // Fire
            (Fire, Grass) => 2.0,
            (Fire, Water) | (Fire, Rock) => 0.5,
            (Fire, _) => 1.0,

            // Grass
            (Grass, Water) | (Grass, Rock) => 2.0,
            (Grass, Fire) | (Grass, Grass) => 0.5,
            (Grass, _) => 1.0,

            // Rock
            (Rock, Fire) | (Rock, Electric) => 2.0,
            (Rock, Water) | (Rock, Grass) => 0.5,
            (Rock, _) => 1.0,

            _ => 1.0,
        }
    }

    /// Combined multiplier against every type a defender carries.
    pub fn effectiveness_against(self, defending: &[EliteType]) -> f32 {
        defending
            .iter()
            .map(|&d| Self::type_effectiveness(self, d))
            .product()
    }

    /// Display colour tag. Opaque to the game core; front ends use it for theming.
    pub fn color(self) -> &'static str {
        use EliteType::*;

        match self {
            Electric => "#FFD700",
            Grass => "#32CD32",
            Rock => "#8B4513",
            Water => "#1E90FF",
            Fire => "#FF4500",
            Wind => "#87CEEB",
            Poison => "#9932CC",
            Crystal => "#E0E6FF",
            Steel => "#708090",
            Earth => "#DEB887",
            Shadow => "#2F2F2F",
            Void => "#000000",
            Ghost => "#663399",
            Rift => "#FF1493",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chart_is_directed() {
        assert_eq!(EliteType::type_effectiveness(EliteType::Electric, EliteType::Water), 2.0);
        assert_eq!(EliteType::type_effectiveness(EliteType::Water, EliteType::Electric), 0.5);
        assert_eq!(EliteType::type_effectiveness(EliteType::Fire, EliteType::Grass), 2.0);
        assert_eq!(EliteType::type_effectiveness(EliteType::Grass, EliteType::Fire), 0.5);
        // Not tabulated in either direction.
        assert_eq!(EliteType::type_effectiveness(EliteType::Fire, EliteType::Electric), 1.0);
        assert_eq!(EliteType::type_effectiveness(EliteType::Shadow, EliteType::Ghost), 1.0);
    }

    #[test]
    fn test_dual_type_multiplies() {
        let defender = [EliteType::Water, EliteType::Rock];
        assert_eq!(EliteType::Grass.effectiveness_against(&defender), 4.0);
        assert_eq!(EliteType::Fire.effectiveness_against(&defender), 0.25);
        assert_eq!(EliteType::Void.effectiveness_against(&[]), 1.0);
    }

    #[test]
    fn test_parse_snake_case() {
        assert_eq!("electric".parse::<EliteType>(), Ok(EliteType::Electric));
        assert_eq!("Rift".parse::<EliteType>(), Ok(EliteType::Rift));
        assert!("plasma".parse::<EliteType>().is_err());
    }
}
