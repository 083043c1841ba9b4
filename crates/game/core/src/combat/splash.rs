//! Splash damage around the defender.

use arrayvec::ArrayVec;

use crate::env::{RandomSource, RulesOracle};
use crate::state::{Coord, Tile, Unit, World};

use super::{CombatContext, CombatError, simulate_damage};

/// Splash totals at or below this value are discarded.
pub const SPLASH_THRESHOLD: u32 = 4;

/// One unit hit by splash damage.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SplashTarget {
    pub coord: Coord,
    pub damage: u32,
}

/// Rolls splash damage for units around `defender_coord`.
///
/// Applies only when the attacker's definition has `splash_damage > 0`.
/// Every neighbour of the defender holding a unit is considered, friends
/// included; the attacker itself, air units and units without a tile are
/// skipped. A target takes the sum of `splash_damage` rolls without wound
/// bonus, and is reported only when that sum exceeds [`SPLASH_THRESHOLD`].
/// Targets the attacker has no table entry for take nothing.
///
/// Rolls draw from `rng` in neighbour order.
pub fn splash_damage(
    world: &World,
    rules: &(impl RulesOracle + ?Sized),
    attacker: &Unit,
    attacker_tile: &Tile,
    defender_coord: Coord,
    rng: &mut impl RandomSource,
) -> Result<ArrayVec<SplashTarget, 6>, CombatError> {
    let mut targets = ArrayVec::new();
    let attacker_def = rules.unit_def(attacker.unit_type)?;
    if attacker_def.splash_damage == 0 {
        return Ok(targets);
    }

    for coord in defender_coord.neighbors() {
        if coord == attacker.coord {
            continue;
        }
        let Some(target) = world.unit_at(coord) else {
            continue;
        };
        let Some(target_def) = rules.unit(target.unit_type) else {
            continue;
        };
        if target_def.is_air() {
            continue;
        }
        let Some(target_tile) = world.tile_at(coord) else {
            continue;
        };
        if attacker_def.attack_against(target_def).is_none() {
            continue;
        }

        let ctx = CombatContext::new(attacker, attacker_tile, target, target_tile);
        let mut total = 0;
        for _ in 0..attacker_def.splash_damage {
            total += simulate_damage(rules, &ctx, rng)?;
        }
        if total > SPLASH_THRESHOLD {
            targets.push(SplashTarget {
                coord,
                damage: total,
            });
        }
    }

    Ok(targets)
}
