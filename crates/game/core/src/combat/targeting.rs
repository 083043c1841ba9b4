//! Attack eligibility.

use crate::env::RulesOracle;
use crate::state::{Coord, Unit, World};

/// Whether `attacker` may attack `target` from where both stand.
///
/// Requires different owners, an attack table entry for the target and the
/// target within the attacker's range.
pub fn can_attack(rules: &(impl RulesOracle + ?Sized), attacker: &Unit, target: &Unit) -> bool {
    if attacker.player == target.player {
        return false;
    }
    let (Some(attacker_def), Some(target_def)) =
        (rules.unit(attacker.unit_type), rules.unit(target.unit_type))
    else {
        return false;
    };
    attacker_def.attack_against(target_def).is_some()
        && attacker.coord.distance(target.coord) <= attacker_def.attack_range
}

/// Coordinates of enemy units `unit` can attack right now.
pub fn attack_options(
    world: &World,
    rules: &(impl RulesOracle + ?Sized),
    unit: &Unit,
) -> Vec<Coord> {
    let Some(def) = rules.unit(unit.unit_type) else {
        return Vec::new();
    };
    unit.coord
        .within(def.attack_range)
        .into_iter()
        .filter(|coord| *coord != unit.coord)
        .filter(|coord| {
            world
                .unit_at(*coord)
                .is_some_and(|target| can_attack(rules, unit, target))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{duel_rules, unit};

    #[test]
    fn requires_enemy_in_range() {
        let rules = duel_rules(6, 6);
        let attacker = unit(0, 0, 1, 1);
        assert!(can_attack(&rules, &attacker, &unit(1, 0, 2, 1)));
        assert!(!can_attack(&rules, &attacker, &unit(1, 0, 1, 1)));
        assert!(!can_attack(&rules, &attacker, &unit(2, 0, 2, 1)));
    }

    #[test]
    fn options_list_attackable_enemies() {
        let rules = duel_rules(6, 6);
        let mut world = World::new();
        let attacker = unit(0, 0, 1, 1);
        world.add_unit(attacker.clone());
        world.add_unit(unit(1, 0, 2, 1));
        world.add_unit(unit(0, 1, 1, 1));
        world.add_unit(unit(3, 0, 2, 1));
        assert_eq!(attack_options(&world, &rules, &attacker), vec![Coord::new(1, 0)]);
    }
}
