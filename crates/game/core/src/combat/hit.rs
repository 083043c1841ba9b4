//! Hit probability.

use crate::env::RulesOracle;
use crate::state::{Coord, TerrainId, Tile, Unit, UnitTypeId};

use super::CombatError;

/// Everything the damage formula reads about one attacker/defender pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CombatContext {
    pub attacker_type: UnitTypeId,
    pub attacker_terrain: TerrainId,
    pub attacker_health: u32,
    pub defender_type: UnitTypeId,
    pub defender_terrain: TerrainId,
    pub defender_coord: Coord,
    /// `B` in the formula.
    pub wound_bonus: i32,
}

impl CombatContext {
    pub fn new(attacker: &Unit, attacker_tile: &Tile, defender: &Unit, defender_tile: &Tile) -> Self {
        Self {
            attacker_type: attacker.unit_type,
            attacker_terrain: attacker_tile.tile_type,
            attacker_health: attacker.health,
            defender_type: defender.unit_type,
            defender_terrain: defender_tile.tile_type,
            defender_coord: defender.coord,
            wound_bonus: 0,
        }
    }

    #[must_use]
    pub fn with_wound_bonus(mut self, wound_bonus: i32) -> Self {
        self.wound_bonus = wound_bonus;
        self
    }

    #[must_use]
    pub fn with_attacker_health(mut self, health: u32) -> Self {
        self.attacker_health = health;
        self
    }
}

/// Probability that a single roll hits.
///
/// # Formula
///
/// ```text
/// p = 0.05 * ((A + Ta) - (D + Td) + B) + 0.5
/// clamped to [0, 1]
/// ```
///
/// `A` comes from the attacker's `attack_vs_class` entry for the defender's
/// `"<class>:<terrain>"` key, `Ta`/`Td` from the terrain-unit table and `D`
/// from the defender's definition.
///
/// # Errors
///
/// `CombatError::CannotAttack` when the attacker has no table entry for the
/// defender, or an oracle error for unknown unit types.
pub fn hit_probability(
    rules: &(impl RulesOracle + ?Sized),
    ctx: &CombatContext,
) -> Result<f64, CombatError> {
    let attacker = rules.unit_def(ctx.attacker_type)?;
    let defender = rules.unit_def(ctx.defender_type)?;

    let base_attack = attacker
        .attack_against(defender)
        .ok_or_else(|| CombatError::CannotAttack {
            attacker: attacker.name.clone(),
            target: defender.class_key(),
        })?;

    let attack = base_attack + rules.attack_bonus(ctx.attacker_type, ctx.attacker_terrain);
    let defense = defender.defense + rules.defense_bonus(ctx.defender_type, ctx.defender_terrain);
    let p = 0.05 * f64::from(attack - defense + ctx.wound_bonus) + 0.5;

    Ok(p.clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{duel_rules, tile, unit};

    fn ctx(bonus: i32) -> CombatContext {
        let attacker = unit(0, 0, 1, 1);
        let defender = unit(1, 0, 2, 1);
        CombatContext::new(&attacker, &tile(0, 0), &defender, &tile(1, 0)).with_wound_bonus(bonus)
    }

    #[test]
    fn equal_attack_and_defense_is_a_coin_flip() {
        let rules = duel_rules(6, 6);
        assert!((hit_probability(&rules, &ctx(0)).unwrap() - 0.5).abs() < 1e-12);
        assert!((hit_probability(&rules, &ctx(2)).unwrap() - 0.6).abs() < 1e-12);
    }

    #[test]
    fn probability_is_clamped() {
        assert_eq!(hit_probability(&duel_rules(40, 0), &ctx(0)).unwrap(), 1.0);
        assert_eq!(hit_probability(&duel_rules(0, 40), &ctx(0)).unwrap(), 0.0);
    }

    #[test]
    fn missing_table_entry_is_an_error() {
        let rules = duel_rules(6, 6);
        let unarmed = crate::env::UnitDefinition {
            attack_vs_class: Default::default(),
            ..rules.unit_def(1).unwrap().clone()
        };
        let rules = rules.with_unit(unarmed);
        assert!(matches!(
            hit_probability(&rules, &ctx(0)),
            Err(CombatError::CannotAttack { .. })
        ));
    }
}
