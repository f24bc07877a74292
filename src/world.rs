use crate::config::EncounterConfig;
use crate::elite::{CreatureInstance, InstanceId, Position};
use crate::rng::GameRng;
use ordered_float::OrderedFloat;
use schema::Zone;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the player is, where they have been, and what is roaming nearby.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorldNavigator {
    current_zone: Zone,
    /// In discovery order, each zone at most once.
    discovered: Vec<Zone>,
    /// Wild elites of the current zone. Regenerated on every proximity check,
    /// so never saved.
    #[serde(skip)]
    wild: Vec<CreatureInstance>,
}

impl Default for WorldNavigator {
    fn default() -> Self {
        Self {
            current_zone: Zone::Starting,
            discovered: vec![Zone::Starting],
            wild: Vec::new(),
        }
    }
}

impl WorldNavigator {
    pub fn current_zone(&self) -> Zone {
        self.current_zone
    }

    pub fn discovered(&self) -> &[Zone] {
        &self.discovered
    }

    pub fn is_discovered(&self, zone: Zone) -> bool {
        self.discovered.contains(&zone)
    }

    /// Adds a zone to the discovered list. Returns true on the first visit only.
    pub fn discover(&mut self, zone: Zone) -> bool {
        if self.is_discovered(zone) {
            return false;
        }
        self.discovered.push(zone);
        true
    }

    /// Moves to `zone`, discovering it. The old zone's wild list is dropped.
    /// Returns true when the zone was visited for the first time.
    pub fn change_zone(&mut self, zone: Zone) -> bool {
        if self.current_zone != zone {
            self.wild.clear();
        }
        self.current_zone = zone;
        let first_visit = self.discover(zone);
        tracing::debug!(%zone, first_visit, "zone changed");
        first_visit
    }

    pub fn wild(&self) -> &[CreatureInstance] {
        &self.wild
    }

    pub fn set_wild(&mut self, wild: Vec<CreatureInstance>) {
        self.wild = wild;
    }

    /// Drops a wild elite that was defeated or captured.
    pub fn remove_wild(&mut self, id: InstanceId) -> Option<CreatureInstance> {
        let index = self.wild.iter().position(|w| w.id == id)?;
        Some(self.wild.remove(index))
    }

    /// Closest wild elite on the ground plane, with its distance.
    pub fn nearest_elite(&self, position: &Position) -> Option<(&CreatureInstance, f32)> {
        self.wild
            .iter()
            .filter_map(|w| w.position.map(|p| (w, p.planar_distance(position))))
            .min_by_key(|(_, distance)| OrderedFloat(*distance))
    }

    /// Scans the wild list in order. Every elite strictly inside the radius
    /// gets one roll; the first success is returned and scanning stops.
    pub fn scan_for_encounter(
        &self,
        position: &Position,
        config: &EncounterConfig,
        rng: &mut GameRng,
    ) -> Option<&CreatureInstance> {
        for wild in &self.wild {
            let Some(spot) = wild.position else {
                continue;
            };
            if spot.planar_distance(position) >= config.radius {
                continue;
            }
            if rng.chance(config.chance, "encounter roll") {
                return Some(wild);
            }
        }
        None
    }
}

impl fmt::Display for WorldNavigator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Current zone: {} ({})",
            self.current_zone.title(),
            self.current_zone
        )?;
        let discovered: Vec<&str> = self.discovered.iter().map(|z| z.title()).collect();
        write!(f, "Discovered: {}", discovered.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::species::get_elite_data;
    use pretty_assertions::assert_eq;

    fn wild_at(species: &str, x: f32, z: f32) -> CreatureInstance {
        CreatureInstance::new_wild(get_elite_data(species).unwrap(), 3, Position::new(x, 1.0, z))
    }

    #[test]
    fn test_zone_discovery_is_idempotent() {
        let mut world = WorldNavigator::default();
        assert_eq!(world.discovered(), &[Zone::Starting]);

        assert!(world.change_zone(Zone::Cave));
        assert!(!world.change_zone(Zone::Cave));
        assert!(!world.change_zone(Zone::Starting));
        assert!(world.change_zone(Zone::Forest));

        assert_eq!(world.current_zone(), Zone::Forest);
        assert_eq!(world.discovered(), &[Zone::Starting, Zone::Cave, Zone::Forest]);
    }

    #[test]
    fn test_nearest_elite_ignores_height() {
        let mut world = WorldNavigator::default();
        world.set_wild(vec![wild_at("spark", 10.0, 0.0), wild_at("leaf", 0.0, 4.0)]);

        let (nearest, distance) = world.nearest_elite(&Position::new(0.0, 50.0, 0.0)).unwrap();
        assert_eq!(nearest.species_id(), "leaf");
        assert_eq!(distance, 4.0);
    }

    #[test]
    fn test_scan_rolls_only_inside_radius() {
        let mut world = WorldNavigator::default();
        world.set_wild(vec![
            wild_at("spark", 3.0, 0.0), // on the boundary: no roll
            wild_at("leaf", 1.0, 0.0),  // roll fails
            wild_at("boulder", 0.0, 2.0), // roll succeeds
            wild_at("splash", 0.5, 0.0), // never reached
        ]);
        let mut rng = GameRng::new_for_test(vec![0.9, 0.1]);

        let found = world
            .scan_for_encounter(&Position::new(0.0, 2.0, 0.0), &EncounterConfig::default(), &mut rng)
            .unwrap();
        assert_eq!(found.species_id(), "boulder");
    }

    #[test]
    fn test_changing_zone_clears_wild_list() {
        let mut world = WorldNavigator::default();
        world.set_wild(vec![wild_at("spark", 1.0, 1.0)]);
        world.change_zone(Zone::Starting);
        assert_eq!(world.wild().len(), 1);
        world.change_zone(Zone::Rift);
        assert!(world.wild().is_empty());
    }
}
