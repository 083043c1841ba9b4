//! Seeded damage rolls and Monte Carlo summaries.

use std::collections::BTreeMap;

use crate::env::{GameRng, RandomSource, RulesOracle};

use super::{CombatContext, CombatError, hit_probability};

/// Rolls per point of attacker health.
pub const ROLLS_PER_HEALTH: u32 = 6;

/// Simulations run by [`damage_distribution`] when asked for zero.
pub const DEFAULT_SIMULATIONS: u32 = 10_000;

/// Rolls the damage one attack deals.
///
/// For each point of attacker health six uniform values are drawn; every value
/// below the hit probability is a hit, and each six hits deal one damage.
/// Damage never exceeds the attacker's health.
pub fn simulate_damage(
    rules: &(impl RulesOracle + ?Sized),
    ctx: &CombatContext,
    rng: &mut impl RandomSource,
) -> Result<u32, CombatError> {
    let p = hit_probability(rules, ctx)?;
    Ok(roll_damage(p, ctx.attacker_health, rng))
}

/// Hit rolls an attacker with `attacker_health` makes, capped at `u32::MAX`.
fn roll_count(attacker_health: u32) -> u32 {
    attacker_health.saturating_mul(ROLLS_PER_HEALTH)
}

fn roll_damage(p: f64, attacker_health: u32, rng: &mut impl RandomSource) -> u32 {
    let mut hits = 0u32;
    for _ in 0..roll_count(attacker_health) {
        if rng.next_f64() < p {
            hits += 1;
        }
    }
    (hits / ROLLS_PER_HEALTH).min(attacker_health)
}

/// Probability of one observed damage value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageRange {
    pub min_value: f64,
    pub max_value: f64,
    pub probability: f64,
}

/// Summary of many simulated attacks.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DamageDistribution {
    pub min_damage: f64,
    pub max_damage: f64,
    pub expected_damage: f64,
    /// One range per observed damage value, ascending.
    pub ranges: Vec<DamageRange>,
}

/// Monte Carlo damage summary for UI previews and option listings.
///
/// Runs on a private generator seeded with
/// [`DIAGNOSTIC_SEED`](crate::env::DIAGNOSTIC_SEED), so it is reproducible and
/// never advances the game RNG. `runs == 0` means [`DEFAULT_SIMULATIONS`].
pub fn damage_distribution(
    rules: &(impl RulesOracle + ?Sized),
    ctx: &CombatContext,
    runs: u32,
) -> Result<DamageDistribution, CombatError> {
    let p = hit_probability(rules, ctx)?;
    Ok(summarize(runs, |rng| roll_damage(p, ctx.attacker_health, rng)))
}

/// Runs `sample` on the diagnostic generator and tallies the outcomes.
pub(super) fn summarize(
    runs: u32,
    mut sample: impl FnMut(&mut GameRng) -> u32,
) -> DamageDistribution {
    let runs = if runs == 0 { DEFAULT_SIMULATIONS } else { runs };
    let mut rng = GameRng::diagnostic();
    let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
    let mut total = 0u64;
    for _ in 0..runs {
        let value = sample(&mut rng);
        *counts.entry(value).or_insert(0) += 1;
        total += u64::from(value);
    }

    let runs = f64::from(runs);
    let min_damage = counts.keys().next().copied().unwrap_or(0);
    let max_damage = counts.keys().next_back().copied().unwrap_or(0);
    let ranges = counts
        .into_iter()
        .map(|(value, count)| DamageRange {
            min_value: f64::from(value),
            max_value: f64::from(value),
            probability: f64::from(count) / runs,
        })
        .collect();

    DamageDistribution {
        min_damage: f64::from(min_damage),
        max_damage: f64::from(max_damage),
        expected_damage: total as f64 / runs,
        ranges,
    }
}
