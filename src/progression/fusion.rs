use crate::elite::CreatureInstance;
use crate::errors::{SpeciesDataError, SpeciesDataResult};
use schema::{CreatureDefinition, Rarity};

/// Combines two owned creatures into a new legendary species.
///
/// Stats are the floored element-wise mean, the primary type comes from `a`,
/// the secondary from `b`'s primary, abilities are the ordered union, and
/// the result takes the higher of the two levels.
pub fn fuse(a: &CreatureInstance, b: &CreatureInstance) -> SpeciesDataResult<CreatureInstance> {
    if a.id == b.id {
        return Err(SpeciesDataError::SelfFusion);
    }
    let first = a.definition()?;
    let second = b.definition()?;

    let mut abilities = first.abilities.clone();
    for ability in &second.abilities {
        if !abilities.contains(ability) {
            abilities.push(ability.clone());
        }
    }

    let definition = CreatureDefinition {
        id: format!("fusion_{}_{}", first.id, second.id),
        name: format!("{}{}", first.name, second.name),
        primary_type: first.primary_type,
        secondary_type: Some(second.primary_type),
        base_stats: first.base_stats.averaged_with(&second.base_stats),
        abilities,
        rarity: Rarity::Legendary,
        description: format!("A fusion of {} and {}.", first.name, second.name),
        evolution: None,
        color: first.color.clone(),
    };

    let level = a.level.max(b.level);
    tracing::debug!(fused = %definition.id, level, "elites fused");
    Ok(CreatureInstance::new_fused(definition, level))
}
