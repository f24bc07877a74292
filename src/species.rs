use crate::errors::{SpeciesDataError, SpeciesDataResult};
use crate::generated::{ELITE_DATA, ELITE_ORDER};
use schema::{CreatureDefinition, EliteType, Rarity};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Id of the creature lent to players who own nothing yet.
pub const DEFAULT_STARTER_ID: &str = "spark";
pub const DEFAULT_STARTER_LEVEL: u8 = 5;

static ELITE_CATALOG: LazyLock<HashMap<&'static str, CreatureDefinition>> = LazyLock::new(|| {
    let mut catalog = HashMap::with_capacity(ELITE_DATA.len());
    for (id, bytes) in ELITE_DATA.entries() {
        match schema::decode::<CreatureDefinition>(*bytes) {
            Ok(definition) => {
                catalog.insert(*id, definition);
            }
            Err(e) => tracing::error!(elite = *id, error = %e, "corrupt elite catalog entry"),
        }
    }
    tracing::debug!(count = catalog.len(), "elite catalog loaded");
    catalog
});

/// Look up a species definition by id.
pub fn get_elite_data(id: &str) -> SpeciesDataResult<&'static CreatureDefinition> {
    ELITE_CATALOG
        .get(id)
        .ok_or_else(|| SpeciesDataError::SpeciesNotFound(id.to_string()))
}

/// Every species, in catalog file order.
pub fn all_elites() -> impl Iterator<Item = &'static CreatureDefinition> {
    ELITE_ORDER.iter().filter_map(|id| ELITE_CATALOG.get(id))
}

pub fn elites_by_type(elite_type: EliteType) -> Vec<&'static CreatureDefinition> {
    all_elites().filter(|d| d.has_type(elite_type)).collect()
}

pub fn elites_by_rarity(rarity: Rarity) -> Vec<&'static CreatureDefinition> {
    all_elites().filter(|d| d.rarity == rarity).collect()
}

/// Case-insensitive lookup by id or display name.
pub fn find_elite(name: &str) -> Option<&'static CreatureDefinition> {
    let wanted = name.trim().to_lowercase();
    all_elites().find(|d| d.id == wanted || d.name.to_lowercase() == wanted)
}

pub fn default_starter() -> SpeciesDataResult<&'static CreatureDefinition> {
    get_elite_data(DEFAULT_STARTER_ID)
}

/// Display detailed information about a species including stats and description
pub fn display_elite_detailed(definition: &CreatureDefinition, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    // --- 1. Name and Rarity ---
    writeln!(f, "{} [{}]", definition.name, definition.rarity)?;
    writeln!(f, "--------------------")?;

    // --- 2. Description ---
    writeln!(f, "{}", definition.description)?;
    writeln!(f, "--------------------")?;

    // --- 3. Types ---
    let type_names: Vec<String> = definition.types().iter().map(|t| t.to_string()).collect();
    writeln!(f, "Type(s): {}", type_names.join(" / "))?;
    writeln!(f, "Abilities: {}", definition.abilities.join(", "))?;
    writeln!(f, "--------------------")?;

    // --- 4. Base Stats ---
    writeln!(f, "Base Stats:")?;
    let base_stats = &definition.base_stats;
    const LABEL_WIDTH: usize = 12;

    writeln!(f, "{:<LABEL_WIDTH$} : {}", "HP", base_stats.hp)?;
    writeln!(f, "{:<LABEL_WIDTH$} : {}", "Attack", base_stats.attack)?;
    writeln!(f, "{:<LABEL_WIDTH$} : {}", "Defense", base_stats.defense)?;
    write!(f, "{:<LABEL_WIDTH$} : {}", "Speed", base_stats.speed)?;

    // --- 5. Evolution ---
    if let Some(evolution) = &definition.evolution {
        let target = get_elite_data(&evolution.evolves_into)
            .map(|d| d.name.as_str())
            .unwrap_or(evolution.evolves_into.as_str());
        match &evolution.method {
            schema::EvolutionMethod::Level(level) => {
                write!(f, "\nEvolves into {} at level {}", target, level)?
            }
            schema::EvolutionMethod::Item(item) => {
                write!(f, "\nEvolves into {} with {}", target, item)?
            }
        }
    }
    Ok(())
}

/// Adapter so a definition can be rendered with `{}`.
pub struct DetailedElite<'a>(pub &'a CreatureDefinition);

impl fmt::Display for DetailedElite<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        display_elite_detailed(self.0, f)
    }
}
