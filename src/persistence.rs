//! Save snapshots and the key-value stores they are written to.
//!
//! Nothing here reports failure to the caller: a save that fails is logged
//! and returns `false`, and a missing or unreadable save loads as `None`.

use crate::errors::PersistenceError;
use crate::inventory::{InventoryLedger, InventorySnapshot};
use crate::player::PlayerProfile;
use crate::quests::QuestTracker;
use crate::world::WorldNavigator;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

pub const SAVE_VERSION: u32 = 1;

/// Everything that survives a restart. Every part is optional, so older or
/// hand-written saves with missing sections still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<PlayerProfile>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory: Option<InventorySnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub world: Option<WorldNavigator>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quests: Option<QuestTracker>,
}

impl SaveSnapshot {
    pub fn new(
        profile: &PlayerProfile,
        inventory: &InventoryLedger,
        world: &WorldNavigator,
        quests: &QuestTracker,
    ) -> Self {
        Self {
            version: SAVE_VERSION,
            profile: Some(profile.clone()),
            inventory: Some(inventory.snapshot()),
            world: Some(world.clone()),
            quests: Some(quests.clone()),
        }
    }

    pub fn to_json(&self) -> Result<String, PersistenceError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(text: &str) -> Result<Self, PersistenceError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// A flat string store keyed by name.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;
    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError>;
    fn remove(&mut self, key: &str) -> Result<(), PersistenceError>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    values: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        Ok(self.values.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        self.values.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The platform data directory for the game, e.g. `~/.local/share/rise-of-elites`.
    pub fn default_location() -> Result<Self, PersistenceError> {
        let dirs = ProjectDirs::from("", "", "rise-of-elites")
            .ok_or(PersistenceError::NoStorageLocation)?;
        Ok(Self::new(dirs.data_dir()))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        let file_name: String = key
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{}.json", file_name))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), PersistenceError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.path_for(key), value)?;
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), PersistenceError> {
        match fs::remove_file(self.path_for(key)) {
            Err(e) if e.kind() != io::ErrorKind::NotFound => Err(e.into()),
            _ => Ok(()),
        }
    }
}

/// The platform file store, or an in-memory one when no data directory exists.
pub fn default_store() -> Box<dyn KeyValueStore + Send> {
    match FileStore::default_location() {
        Ok(store) => {
            tracing::info!(dir = %store.dir().display(), "saving to file store");
            Box::new(store)
        }
        Err(e) => {
            tracing::warn!(error = %e, "saves will not outlive this process");
            Box::new(MemoryStore::new())
        }
    }
}

/// Writes the snapshot under `key`. Returns false if anything failed.
pub fn save_game(store: &mut dyn KeyValueStore, key: &str, snapshot: &SaveSnapshot) -> bool {
    let result = snapshot
        .to_json()
        .and_then(|json| store.set(key, json));
    match result {
        Ok(()) => {
            tracing::info!(key, "game saved");
            true
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "could not save game");
            false
        }
    }
}

/// Reads the snapshot under `key`. Missing, corrupt and too-new saves load as `None`.
pub fn load_game(store: &dyn KeyValueStore, key: &str) -> Option<SaveSnapshot> {
    let text = match store.get(key) {
        Ok(Some(text)) => text,
        Ok(None) => {
            tracing::debug!(key, "no saved game");
            return None;
        }
        Err(e) => {
            tracing::warn!(key, error = %e, "could not read saved game");
            return None;
        }
    };

    let mut snapshot = match SaveSnapshot::from_json(&text) {
        Ok(snapshot) => snapshot,
        Err(e) => {
            tracing::warn!(key, error = %e, "saved game is corrupt");
            return None;
        }
    };
    if snapshot.version > SAVE_VERSION {
        tracing::warn!(key, version = snapshot.version, "saved game is from a newer version");
        return None;
    }
    if let Some(profile) = snapshot.profile.as_mut() {
        let repaired = profile.repair();
        if repaired > 0 {
            tracing::warn!(key, repaired, "saved Elites were out of range and have been clamped");
        }
    }
    Some(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::elite::CreatureInstance;
    use crate::species::get_elite_data;
    use pretty_assertions::assert_eq;
    use schema::Zone;

    const KEY: &str = "rise_of_elites_save";

    fn sample_snapshot() -> SaveSnapshot {
        let mut profile = PlayerProfile::default();
        let id = profile.add_captured(CreatureInstance::new_owned(get_elite_data("thorn").unwrap(), 7));
        profile.set_active(id).unwrap();
        profile.progression.level = 3;

        let mut inventory = InventoryLedger::new(450, 40);
        inventory.add_item("potion", 2).unwrap();

        let mut world = WorldNavigator::default();
        world.change_zone(Zone::Cave);

        let mut quests = QuestTracker::new();
        quests.start("welcome").unwrap();

        SaveSnapshot::new(&profile, &inventory, &world, &quests)
    }

    #[test]
    fn test_memory_store_round_trip() {
        let mut store = MemoryStore::new();
        let snapshot = sample_snapshot();

        assert!(save_game(&mut store, KEY, &snapshot));
        assert_eq!(load_game(&store, KEY), Some(snapshot));
    }

    #[test]
    fn test_missing_save_loads_nothing() {
        let store = MemoryStore::new();
        assert_eq!(load_game(&store, KEY), None);
    }

    #[test]
    fn test_corrupt_save_loads_nothing() {
        let mut store = MemoryStore::new();
        store.set(KEY, "{ not json".to_string()).unwrap();
        assert_eq!(load_game(&store, KEY), None);
    }

    #[test]
    fn test_newer_version_is_ignored() {
        let mut store = MemoryStore::new();
        store.set(KEY, r#"{"version": 99}"#.to_string()).unwrap();
        assert_eq!(load_game(&store, KEY), None);
    }

    #[test]
    fn test_out_of_range_hp_is_clamped_on_load() {
        let mut store = MemoryStore::new();
        let mut json: serde_json::Value =
            serde_json::from_str(&sample_snapshot().to_json().unwrap()).unwrap();
        json["profile"]["captured"][0]["current_hp"] = serde_json::json!(9999);
        json["profile"]["captured"][0]["level"] = serde_json::json!(0);
        store.set(KEY, json.to_string()).unwrap();

        let profile = load_game(&store, KEY).unwrap().profile.unwrap();
        let thorn = &profile.captured()[0];
        assert_eq!(thorn.level, 1);
        assert_eq!(thorn.current_hp(), thorn.max_hp());
        assert_eq!(profile.active_id(), Some(thorn.id));
    }

    #[test]
    fn test_partial_snapshot_loads() {
        let mut store = MemoryStore::new();
        store
            .set(
                KEY,
                r#"{"version": 1, "inventory": {"items": {"potion": 4}, "money": 10, "max_slots": 40}}"#
                    .to_string(),
            )
            .unwrap();

        let snapshot = load_game(&store, KEY).unwrap();
        assert_eq!(snapshot.profile, None);
        assert_eq!(snapshot.world, None);
        let inventory = snapshot.inventory.unwrap();
        assert_eq!(inventory.items.get("potion"), Some(&4));
        assert_eq!(inventory.money, 10);
    }

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("saves"));
        let snapshot = sample_snapshot();

        assert_eq!(store.get(KEY).unwrap(), None);
        assert!(save_game(&mut store, KEY, &snapshot));
        assert!(dir.path().join("saves").join("rise_of_elites_save.json").exists());
        assert_eq!(load_game(&store, KEY), Some(snapshot));

        store.remove(KEY).unwrap();
        store.remove(KEY).unwrap();
        assert_eq!(load_game(&store, KEY), None);
    }

    #[test]
    fn test_file_store_keys_stay_inside_directory() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStore::new(dir.path());
        assert_eq!(store.path_for("../escape"), dir.path().join("___escape.json"));
    }
}
