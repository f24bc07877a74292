use super::RewardCalculator;
use crate::elite::CreatureInstance;
use crate::errors::{SpeciesDataError, SpeciesDataResult};
use crate::species::get_elite_data;
use schema::EvolutionMethod;

impl RewardCalculator {
    /// Check if a creature has reached its evolution level
    /// Item evolutions never trigger on their own.
    pub fn can_evolve(&self, instance: &CreatureInstance) -> SpeciesDataResult<bool> {
        let definition = instance.definition()?;
        Ok(match definition.evolution.as_ref().map(|e| &e.method) {
            Some(EvolutionMethod::Level(required_level)) => instance.level >= *required_level,
            Some(EvolutionMethod::Item(_)) | None => false,
        })
    }
}

/// Replaces a creature with its evolved form at the same level.
///
/// Fails with [`SpeciesDataError::NoEvolution`] if the species has no evolution link.
/// The level trigger is not checked here; callers that require it use
/// [`RewardCalculator::can_evolve`].
pub fn evolve(instance: &CreatureInstance) -> SpeciesDataResult<CreatureInstance> {
    let definition = instance.definition()?;
    let evolution = definition
        .evolution
        .as_ref()
        .ok_or_else(|| SpeciesDataError::NoEvolution(definition.name.clone()))?;

    let evolved_definition = get_elite_data(&evolution.evolves_into)?;
    let mut evolved = CreatureInstance::new_owned(evolved_definition, instance.level);
    evolved.is_wild = instance.is_wild;
    evolved.position = instance.position;

    tracing::debug!(
        from = instance.species_id(),
        to = evolved.species_id(),
        level = instance.level,
        "elite evolved"
    );
    Ok(evolved)
}

/// Level-triggered evolution, as requested from the roster screen.
pub fn evolve_by_level(instance: &CreatureInstance) -> SpeciesDataResult<CreatureInstance> {
    let definition = instance.definition()?;
    match definition.evolution.as_ref().map(|e| &e.method) {
        None => Err(SpeciesDataError::NoEvolution(definition.name.clone())),
        Some(EvolutionMethod::Level(required)) if instance.level < *required => {
            Err(SpeciesDataError::LevelTooLow {
                species: definition.name.clone(),
                level: instance.level,
                required: *required,
            })
        }
        Some(EvolutionMethod::Level(_)) => evolve(instance),
        Some(EvolutionMethod::Item(item)) => Err(SpeciesDataError::ItemRequired {
            species: definition.name.clone(),
            item: item.clone(),
        }),
    }
}

/// Evolution triggered by using an evolution item.
///
/// Level-based species accept any evolution item as a catalyst. Item-based
/// species only accept their own item.
pub fn evolve_with_item(instance: &CreatureInstance, item_id: &str) -> SpeciesDataResult<CreatureInstance> {
    let definition = instance.definition()?;
    if let Some(evolution) = &definition.evolution {
        if let EvolutionMethod::Item(required) = &evolution.method {
            if required != item_id {
                return Err(SpeciesDataError::WrongEvolutionItem {
                    species: definition.name.clone(),
                    required: required.clone(),
                    offered: item_id.to_string(),
                });
            }
        }
    }
    evolve(instance)
}
