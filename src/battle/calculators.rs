use crate::battle::state::AttackKind;
use crate::elite::CreatureInstance;
use crate::errors::SpeciesDataResult;
use crate::rng::GameRng;

const MIN_DAMAGE: u16 = 1;
const DAMAGE_ROLL_MIN: f64 = 0.85;
const DAMAGE_ROLL_SPAN: f64 = 0.15;
const ENEMY_ROLL_MIN: f64 = 0.6;
const ENEMY_ROLL_SPAN: f64 = 0.4;

/// Deterministic part of the damage formula
/// Formula: floor(((2 × level + 10) / 250) × (attack / defense) × power + 2)
pub fn base_damage(level: u8, attack: f64, defense: f64, kind: AttackKind) -> u16 {
    let level_factor = (2.0 * level as f64 + 10.0) / 250.0;
    let ratio = attack / defense.max(1.0);
    (level_factor * ratio * kind.power() + 2.0).floor() as u16
}

/// Full player attack: base damage, a roll in [0.85, 1.0), then type effectiveness
/// of the attacker's primary type against every defending type. Never below 1.
pub fn calculate_attack_damage(
    attacker: &CreatureInstance,
    defender: &CreatureInstance,
    kind: AttackKind,
    attack_multiplier: f64,
    rng: &mut GameRng,
) -> SpeciesDataResult<u16> {
    let attacker_data = attacker.definition()?;
    let defender_data = defender.definition()?;

    let attack = attacker_data.base_stats.attack as f64 * attack_multiplier;
    let defense = defender_data.base_stats.defense as f64;
    let base = base_damage(attacker.level, attack, defense, kind) as f64;

    let roll = DAMAGE_ROLL_MIN + rng.next_unit("damage roll") * DAMAGE_ROLL_SPAN;
    let randomized = (base * roll).floor();

    let effectiveness = attacker_data
        .primary_type
        .effectiveness_against(&defender_data.types()) as f64;
    let damage = (randomized * effectiveness).floor() as u16;

    Ok(damage.max(MIN_DAMAGE))
}

/// Wild elite reply: floor(attack × roll) with a roll in [0.6, 1.0).
/// No type or ability modifiers apply.
pub fn calculate_enemy_damage(enemy: &CreatureInstance, rng: &mut GameRng) -> SpeciesDataResult<u16> {
    let attack = enemy.definition()?.base_stats.attack as f64;
    let roll = ENEMY_ROLL_MIN + rng.next_unit("enemy damage roll") * ENEMY_ROLL_SPAN;
    Ok((attack * roll).floor() as u16)
}
