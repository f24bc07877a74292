use crate::config::EncounterConfig;
use crate::elite::{CreatureInstance, Position};
use crate::rng::GameRng;
use crate::species::get_elite_data;
use schema::Zone;

const STARTING_SPECIES: &[&str] = &["spark", "leaf", "boulder", "splash"];
const FOREST_SPECIES: &[&str] = &["leaf", "thorn", "swift", "nature"];
const CAVE_SPECIES: &[&str] = &["boulder", "crystal", "metal", "earth"];
const RIFT_SPECIES: &[&str] = &["shadow", "void", "phantom", "rift"];

/// Candidate species for a zone. Zones without their own table use the
/// starting meadow's.
pub fn zone_species(zone: Zone) -> &'static [&'static str] {
    match zone {
        Zone::Forest => FOREST_SPECIES,
        Zone::Cave => CAVE_SPECIES,
        Zone::Rift => RIFT_SPECIES,
        _ => STARTING_SPECIES,
    }
}

/// Rolls a fresh set of wild elites for a zone.
///
/// Each call is independent: nothing is carried over from earlier spawns.
pub fn generate(zone: Zone, rng: &mut GameRng, config: &EncounterConfig) -> Vec<CreatureInstance> {
    let candidates = zone_species(zone);
    let counts = config.spawn_count_range();
    let levels = config.level_range();
    let count = rng.range_inclusive(*counts.start(), *counts.end(), "spawn count");

    let mut spawned = Vec::with_capacity(count as usize);
    for _ in 0..count {
        let Some(species_id) = rng.choose(candidates, "spawn species") else {
            break;
        };
        let level = rng.range_inclusive(*levels.start() as u32, *levels.end() as u32, "spawn level");
        let extent = config.spawn_half_extent;
        let x = rng.range_f32(-extent, extent, "spawn x");
        let z = rng.range_f32(-extent, extent, "spawn z");

        match get_elite_data(species_id) {
            Ok(definition) => spawned.push(CreatureInstance::new_wild(
                definition,
                level.min(u8::MAX as u32) as u8,
                Position::new(x, config.spawn_height, z),
            )),
            Err(e) => tracing::error!(%zone, error = %e, "encounter table names a missing species"),
        }
    }

    tracing::debug!(%zone, count = spawned.len(), "wild elites generated");
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(Zone::Starting, &["spark", "leaf", "boulder", "splash"])]
    #[case(Zone::Cave, &["boulder", "crystal", "metal", "earth"])]
    #[case(Zone::Rift, &["shadow", "void", "phantom", "rift"])]
    #[case(Zone::Desert, &["spark", "leaf", "boulder", "splash"])]
    fn test_zone_tables(#[case] zone: Zone, #[case] expected: &[&str]) {
        assert_eq!(zone_species(zone), expected);
    }

    #[test]
    fn test_every_table_entry_is_in_catalog() {
        for table in [STARTING_SPECIES, FOREST_SPECIES, CAVE_SPECIES, RIFT_SPECIES] {
            for id in table {
                assert!(get_elite_data(id).is_ok(), "missing species {}", id);
            }
        }
    }

    #[test]
    fn test_generate_scripted_spawn() {
        // count, then species/level/x/z for each spawn
        let mut rng = GameRng::new_for_test(vec![
            0.0, // 3 spawns
            0.0, 0.0, 0.5, 0.5, // boulder Lv.1 at origin
            0.5, 0.95, 0.0, 0.75, // metal Lv.10
            0.99, 0.45, 0.25, 0.0, // earth Lv.5
        ]);
        let wild = generate(Zone::Cave, &mut rng, &EncounterConfig::default());

        let summary: Vec<(&str, u8)> = wild.iter().map(|w| (w.species_id(), w.level)).collect();
        assert_eq!(summary, vec![("boulder", 1), ("metal", 10), ("earth", 5)]);
        assert_eq!(wild[0].position, Some(Position::new(0.0, 1.0, 0.0)));
        assert_eq!(wild[1].position, Some(Position::new(-15.0, 1.0, 7.5)));
        assert!(wild.iter().all(|w| w.is_wild && w.is_full_hp()));
    }

    #[test]
    fn test_generate_stays_in_bounds() {
        let config = EncounterConfig::default();
        let mut rng = GameRng::from_seed(7);
        for _ in 0..50 {
            let wild = generate(Zone::Forest, &mut rng, &config);
            assert!((3..=5).contains(&wild.len()));
            for elite in &wild {
                assert!(FOREST_SPECIES.contains(&elite.species_id()));
                assert!((1..=10).contains(&elite.level));
                let position = elite.position.unwrap();
                assert!(position.x.abs() <= 15.0 && position.z.abs() <= 15.0);
            }
        }
    }

    #[test]
    fn test_each_call_spawns_new_instances() {
        let config = EncounterConfig::default();
        let mut rng = GameRng::from_seed(11);
        let first = generate(Zone::Starting, &mut rng, &config);
        let second = generate(Zone::Starting, &mut rng, &config);
        assert!(first.iter().all(|a| second.iter().all(|b| a.id != b.id)));
    }
}
