//! Combat resolution.
//!
//! Pure functions over rules and units. Randomness is always injected as a
//! [`RandomSource`](crate::env::RandomSource) so the same draws happen in the
//! same order on every run.
//!
//! # Core Functions
//!
//! - `hit_probability`: `p = 0.05 * ((A + Ta) - (D + Td) + B) + 0.5`, clamped
//! - `simulate_damage`: six rolls per attacker health point
//! - `damage_distribution`: Monte Carlo summary on a diagnostic generator
//! - `wound_bonus`: flanking bonus from the defender's attack history
//! - `splash_damage`: area damage around the defender
//! - `simulate_fix`: three repair rolls per fixer health point

mod damage;
mod error;
mod fix;
mod hit;
mod splash;
mod targeting;
mod wound;

pub use damage::{
    DEFAULT_SIMULATIONS, DamageDistribution, DamageRange, ROLLS_PER_HEALTH, damage_distribution,
    simulate_damage,
};
pub use error::CombatError;
pub use fix::{
    FIX_ROLLS_PER_HEALTH, FixContext, can_fix, fix_distribution, fix_options, fix_probability,
    simulate_fix,
};
pub use hit::{CombatContext, hit_probability};
pub use splash::{SPLASH_THRESHOLD, SplashTarget, splash_damage};
pub use targeting::{attack_options, can_attack};
pub use wound::wound_bonus;
