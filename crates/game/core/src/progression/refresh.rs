//! Lazy per-turn refresh ("top-up") of units.

use crate::change::Change;
use crate::env::{OracleError, RulesOracle, tiles};
use crate::state::{Coord, GameState, NEUTRAL, Turn, Unit, World};

/// Health a unit regains when refreshed on its current tile.
///
/// Nothing is regained if the unit acted in the previous turn (or later),
/// stands off the board, stands on a tile owned by another player, or is an
/// air unit away from an airport.
pub fn heal_amount(world: &World, rules: &(impl RulesOracle + ?Sized), unit: &Unit, turn: Turn) -> u32 {
    if unit.last_acted_turn >= turn.saturating_sub(1).max(1) {
        return 0;
    }
    let Some(tile) = world.tile_at(unit.coord) else {
        return 0;
    };
    if tile.player != NEUTRAL && tile.player != unit.player {
        return 0;
    }
    let Some(def) = rules.unit(unit.unit_type) else {
        return 0;
    };
    if def.is_air() {
        let at_airport = rules
            .terrain(tile.tile_type)
            .is_some_and(|terrain| terrain.name == tiles::AIRPORT_BASE_NAME);
        if !at_airport {
            return 0;
        }
    }
    rules.healing_bonus(unit.unit_type, tile.tile_type)
}

/// Refreshes the unit at `coord` if it has not been refreshed this turn.
///
/// Restores the movement budget, regenerates health, clears the attack
/// history and progression, and completes a capture started in an earlier
/// turn. Capture completion is reported through `changes`.
///
/// Returns whether a refresh happened.
///
/// # Errors
///
/// `OracleError::UnknownUnit` if the unit's definition is missing.
pub fn top_up_unit(
    world: &mut World,
    rules: &(impl RulesOracle + ?Sized),
    coord: Coord,
    turn: Turn,
    changes: &mut Vec<Change>,
) -> Result<bool, OracleError> {
    let Some(unit) = world.unit_at(coord) else {
        return Ok(false);
    };
    if !unit.needs_top_up(turn) {
        return Ok(false);
    }

    let def = rules.unit_def(unit.unit_type)?;
    let regained = heal_amount(world, rules, unit, turn);
    let capture_started = unit.capture_started_turn;
    let player = unit.player;

    if capture_started > 0 && capture_started < turn {
        if let Some(tile) = world.tile_at_mut(coord) {
            if tile.player != player {
                let previous_owner = tile.player;
                tile.player = player;
                changes.push(Change::TileOwnershipChanged {
                    coord,
                    previous_owner,
                    new_owner: player,
                });
            }
        }
        changes.push(Change::CaptureCompleted { coord, player });
    }

    let Some(unit) = world.unit_at_mut(coord) else {
        return Ok(false);
    };
    unit.distance_left = def.movement_points;
    unit.health = if unit.health == 0 {
        def.health
    } else {
        unit.health.saturating_add(regained).min(def.health)
    };
    unit.attack_history.clear();
    unit.progression_step = 0;
    unit.chosen_alternative = None;
    if capture_started > 0 && capture_started < turn {
        unit.capture_started_turn = 0;
    }
    unit.last_topped_up_turn = turn;
    Ok(true)
}

/// A unit refreshed this turn with no movement left.
///
/// Units not yet refreshed this turn are never exhausted: they will get a
/// fresh budget as soon as they are touched.
pub fn is_exhausted(unit: &Unit, turn: Turn) -> bool {
    unit.is_exhausted(turn)
}

/// Coordinates of the current player's exhausted units.
pub fn exhausted_units(state: &GameState) -> Vec<Coord> {
    state
        .world
        .player_units(state.current_player)
        .filter(|unit| is_exhausted(unit, state.turn))
        .map(|unit| unit.coord)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Tile;
    use crate::test_support::{JET, SOLDIER, grass_world, standard_rules, unit};

    fn base_world(owner: u32) -> World {
        let mut world = grass_world(2);
        world.add_tile(Tile::new(Coord::ORIGIN, tiles::LAND_BASE).with_owner(owner));
        world
    }

    #[test]
    fn top_up_restores_budget_and_resets_progression() {
        let rules = standard_rules();
        let mut world = grass_world(1);
        let mut soldier = unit(0, 0, 1, SOLDIER);
        soldier.progression_step = 2;
        soldier.chosen_alternative = Some(crate::action::ActionKind::Attack);
        soldier.attack_history.push(crate::state::AttackRecord {
            q: 1,
            r: 0,
            is_ranged: false,
            turn: 1,
        });
        soldier.last_topped_up_turn = 1;
        world.add_unit(soldier);

        let mut changes = Vec::new();
        assert!(top_up_unit(&mut world, &rules, Coord::ORIGIN, 2, &mut changes).unwrap());
        assert!(!top_up_unit(&mut world, &rules, Coord::ORIGIN, 2, &mut changes).unwrap());

        let unit = world.unit_at(Coord::ORIGIN).unwrap();
        assert_eq!(unit.distance_left, 3.0);
        assert_eq!(unit.progression_step, 0);
        assert_eq!(unit.chosen_alternative, None);
        assert!(unit.attack_history.is_empty());
        assert_eq!(unit.last_topped_up_turn, 2);
        assert!(changes.is_empty());
    }

    #[test]
    fn zero_budget_unrefreshed_unit_is_not_exhausted() {
        let mut soldier = unit(0, 0, 1, SOLDIER);
        soldier.last_topped_up_turn = 1;
        assert!(!is_exhausted(&soldier, 2));
        soldier.last_topped_up_turn = 2;
        assert!(is_exhausted(&soldier, 2));
        soldier.distance_left = 0.5;
        assert!(!is_exhausted(&soldier, 2));
    }

    #[test]
    fn healing_rules() {
        let rules = standard_rules();
        let world = base_world(1);
        let mut soldier = unit(0, 0, 1, SOLDIER).with_health(5);
        assert_eq!(heal_amount(&world, &rules, &soldier, 3), 2);

        soldier.last_acted_turn = 2;
        assert_eq!(heal_amount(&world, &rules, &soldier, 3), 0);

        soldier.last_acted_turn = 0;
        let enemy_base = base_world(2);
        assert_eq!(heal_amount(&enemy_base, &rules, &soldier, 3), 0);
        assert_eq!(heal_amount(&base_world(NEUTRAL), &rules, &soldier, 3), 2);

        let jet = unit(0, 0, 1, JET);
        assert_eq!(heal_amount(&world, &rules, &jet, 3), 0);
        let mut airport = grass_world(1);
        airport.add_tile(Tile::new(Coord::ORIGIN, tiles::AIRPORT_BASE).with_owner(1));
        assert_eq!(heal_amount(&airport, &rules, &jet, 3), 3);
    }

    #[test]
    fn dead_units_return_at_full_health() {
        let rules = standard_rules();
        let mut world = grass_world(1);
        world.add_unit(unit(0, 0, 1, SOLDIER).with_health(0));
        top_up_unit(&mut world, &rules, Coord::ORIGIN, 1, &mut Vec::new()).unwrap();
        assert_eq!(world.unit_at(Coord::ORIGIN).map(|u| u.health), Some(10));
    }

    #[test]
    fn capture_completes_on_a_later_refresh() {
        let rules = standard_rules();
        let mut world = base_world(2);
        let mut soldier = unit(0, 0, 1, SOLDIER);
        soldier.capture_started_turn = 1;
        soldier.last_topped_up_turn = 1;
        world.add_unit(soldier);

        let mut changes = Vec::new();
        top_up_unit(&mut world, &rules, Coord::ORIGIN, 2, &mut changes).unwrap();
        assert_eq!(world.tile_at(Coord::ORIGIN).map(|t| t.player), Some(1));
        assert_eq!(
            world.unit_at(Coord::ORIGIN).map(|u| u.capture_started_turn),
            Some(0)
        );
        assert_eq!(
            changes,
            vec![
                Change::TileOwnershipChanged {
                    coord: Coord::ORIGIN,
                    previous_owner: 2,
                    new_owner: 1,
                },
                Change::CaptureCompleted {
                    coord: Coord::ORIGIN,
                    player: 1,
                },
            ]
        );
    }
}
