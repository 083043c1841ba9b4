//! Repair ("fix") rolls and eligibility.

use crate::env::{RandomSource, RulesOracle};
use crate::state::{Coord, Unit, World};

use super::DamageDistribution;
use super::damage::summarize;

/// Rolls per point of fixer health.
pub const FIX_ROLLS_PER_HEALTH: u32 = 3;

/// Inputs of one repair roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FixContext {
    pub fixer_health: u32,
    /// `F` in the formula.
    pub fix_value: i32,
}

impl FixContext {
    pub fn new(fixer: &Unit, fix_value: i32) -> Self {
        Self {
            fixer_health: fixer.health,
            fix_value,
        }
    }
}

/// Probability that a single repair roll succeeds.
///
/// ```text
/// p = 0.05 * F
/// clamped to [0, 1]
/// ```
pub fn fix_probability(fix_value: i32) -> f64 {
    (0.05 * f64::from(fix_value)).clamp(0.0, 1.0)
}

/// Rolls the health one fix restores.
///
/// Three uniform values are drawn per point of fixer health; every value below
/// the fix probability counts, and each three successes restore one point.
pub fn simulate_fix(ctx: &FixContext, rng: &mut impl RandomSource) -> u32 {
    let p = fix_probability(ctx.fix_value);
    let mut fixes = 0u32;
    for _ in 0..ctx.fixer_health.saturating_mul(FIX_ROLLS_PER_HEALTH) {
        if rng.next_f64() < p {
            fixes += 1;
        }
    }
    fixes / FIX_ROLLS_PER_HEALTH
}

/// Monte Carlo summary of the health a fix restores.
///
/// Uses the same diagnostic generator as
/// [`damage_distribution`](super::damage_distribution); `runs == 0` means
/// [`DEFAULT_SIMULATIONS`](super::DEFAULT_SIMULATIONS).
pub fn fix_distribution(ctx: &FixContext, runs: u32) -> DamageDistribution {
    summarize(runs, |rng| simulate_fix(ctx, rng))
}

/// Whether `fixer` may repair `target`.
///
/// The fixer needs a positive fix value, both units share an owner, and the
/// target's unit terrain is one the fixer repairs.
pub fn can_fix(rules: &(impl RulesOracle + ?Sized), fixer: &Unit, target: &Unit) -> bool {
    if fixer.player != target.player {
        return false;
    }
    let (Some(fixer_def), Some(target_def)) =
        (rules.unit(fixer.unit_type), rules.unit(target.unit_type))
    else {
        return false;
    };
    fixer_def.can_fix() && fixer_def.fix_targets().contains(&target_def.unit_terrain)
}

/// Damaged friendly neighbours `fixer` can repair.
pub fn fix_options(world: &World, rules: &(impl RulesOracle + ?Sized), fixer: &Unit) -> Vec<Coord> {
    world
        .neighbors(fixer.coord)
        .into_iter()
        .filter(|coord| {
            world.unit_at(*coord).is_some_and(|target| {
                let damaged = rules
                    .unit(target.unit_type)
                    .is_some_and(|def| target.health < def.health);
                damaged && can_fix(rules, fixer, target)
            })
        })
        .collect()
}
