use crate::elite::{CreatureInstance, InstanceId};
use crate::errors::{ItemError, ItemResult};
use schema::{BattleStat, ItemCategory, ItemDefinition, ItemEffect};
use std::fmt;

/// What a restorative item will do to its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restoration {
    /// Restore up to this much HP to a conscious creature.
    Heal(u16),
    /// Bring a fainted creature back with this much HP.
    Revive(u16),
}

/// Result of a successful `use_item`, for the front end to report.
#[derive(Debug, Clone, PartialEq)]
pub enum ItemOutcome {
    Healed {
        target: InstanceId,
        name: String,
        restored: u16,
    },
    Revived {
        target: InstanceId,
        name: String,
        hp: u16,
    },
    StatBoosted {
        stat: BattleStat,
        multiplier: f32,
    },
    Evolved {
        from: String,
        to: String,
        id: InstanceId,
    },
}

impl fmt::Display for ItemOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemOutcome::Healed { name, restored, .. } => {
                write!(f, "{} recovered {} HP.", name, restored)
            }
            ItemOutcome::Revived { name, hp, .. } => {
                write!(f, "{} was revived with {} HP!", name, hp)
            }
            ItemOutcome::StatBoosted { stat, multiplier } => {
                write!(f, "{} rose (x{:.1})!", stat, multiplier)
            }
            ItemOutcome::Evolved { from, to, .. } => write!(f, "{} evolved into {}!", from, to),
        }
    }
}

/// Rejects items `use_item` never consumes: held items, key items and materials.
pub fn check_usable(item: &ItemDefinition) -> ItemResult<()> {
    match item.category {
        ItemCategory::Held | ItemCategory::Key | ItemCategory::Material => {
            Err(ItemError::NotUsable {
                item: item.id.clone(),
                category: item.category,
            })
        }
        _ if item.effect == ItemEffect::Passive => Err(ItemError::NotUsable {
            item: item.id.clone(),
            category: item.category,
        }),
        _ => Ok(()),
    }
}

fn percent_of(max_hp: u16, percent: u8) -> u16 {
    ((max_hp as u32 * percent as u32) / 100).max(1) as u16
}

/// Works out how a restorative item applies to `target`.
///
/// Fainted creatures only accept revives, and a revive on a conscious creature
/// or a heal at full HP would be wasted, so both are rejected.
pub fn restoration_for(item: &ItemDefinition, target: &CreatureInstance) -> ItemResult<Restoration> {
    let max_hp = target.max_hp();
    let restoration = match item.effect {
        ItemEffect::Revive(percent) => {
            if !target.is_fainted() {
                return Err(ItemError::NoEffect(item.id.clone()));
            }
            return Ok(Restoration::Revive(percent_of(max_hp, percent)));
        }
        ItemEffect::Heal(hp) => Restoration::Heal(hp),
        ItemEffect::HealPercent(percent) => Restoration::Heal(percent_of(max_hp, percent)),
        ItemEffect::FullHeal => Restoration::Heal(max_hp),
        _ => return Err(ItemError::NoEffect(item.id.clone())),
    };

    if target.is_fainted() {
        return Err(ItemError::TargetFainted(item.id.clone()));
    }
    if target.is_full_hp() {
        return Err(ItemError::NoEffect(item.id.clone()));
    }
    Ok(restoration)
}

pub fn apply_restoration(target: &mut CreatureInstance, restoration: Restoration) -> ItemOutcome {
    match restoration {
        Restoration::Heal(amount) => {
            let restored = target.heal(amount);
            ItemOutcome::Healed {
                target: target.id,
                name: target.name(),
                restored,
            }
        }
        Restoration::Revive(hp) => {
            target.set_hp(hp);
            ItemOutcome::Revived {
                target: target.id,
                name: target.name(),
                hp: target.current_hp(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item_data::get_item_data;
    use crate::species::get_elite_data;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Spark Lv.5 has 70 max HP.
    fn spark_with_hp(hp: u16) -> CreatureInstance {
        let mut spark = CreatureInstance::new_owned(get_elite_data("spark").unwrap(), 5);
        spark.set_hp(hp);
        spark
    }

    #[rstest]
    #[case("potion", 30, Ok(Restoration::Heal(20)))]
    #[case("max_potion", 30, Ok(Restoration::Heal(70)))]
    #[case("sitrus_berry", 30, Ok(Restoration::Heal(17)))]
    #[case("revive", 0, Ok(Restoration::Revive(35)))]
    #[case("max_revive", 0, Ok(Restoration::Revive(70)))]
    #[case("potion", 70, Err(ItemError::NoEffect("potion".to_string())))]
    #[case("potion", 0, Err(ItemError::TargetFainted("potion".to_string())))]
    #[case("revive", 30, Err(ItemError::NoEffect("revive".to_string())))]
    #[case("antidote", 30, Err(ItemError::NoEffect("antidote".to_string())))]
    fn test_restoration_for(
        #[case] item: &str,
        #[case] hp: u16,
        #[case] expected: ItemResult<Restoration>,
    ) {
        let item = get_item_data(item).unwrap();
        assert_eq!(restoration_for(item, &spark_with_hp(hp)), expected);
    }

    #[test]
    fn test_heal_is_capped_at_max() {
        let mut spark = spark_with_hp(60);
        let outcome = apply_restoration(&mut spark, Restoration::Heal(20));
        assert_eq!(spark.current_hp(), 70);
        assert!(matches!(outcome, ItemOutcome::Healed { restored: 10, .. }));
    }

    #[rstest]
    #[case("leftovers")]
    #[case("bike")]
    #[case("fusion_crystal")]
    fn test_held_key_and_material_items_are_not_usable(#[case] item: &str) {
        let item = get_item_data(item).unwrap();
        assert!(matches!(check_usable(item), Err(ItemError::NotUsable { .. })));
    }

    #[test]
    fn test_consumables_are_usable() {
        for id in ["potion", "revive", "x_attack", "fire_stone"] {
            assert_eq!(check_usable(get_item_data(id).unwrap()), Ok(()), "{}", id);
        }
    }
}
