//! Read-only rules, per-game settings and deterministic randomness.
//!
//! Rules and settings are injected as oracles through the [`Env`] bundle so
//! the engine never reaches for process-wide state. The per-game RNG lives
//! in [`GameState`](crate::state::GameState) because it advances with play.
mod config;
mod error;
mod rng;
mod rules;
mod tables;

pub use config::{GameSettings, IncomeConfig, PassThrough, SettingsOracle};
pub use error::OracleError;
pub use rng::{DIAGNOSTIC_SEED, GameRng, RandomSource};
pub use rules::{
    DEFAULT_ACTION_ORDER, DEFAULT_MOVEMENT_COST, RulesOracle, TerrainDefinition,
    TerrainUnitProperties, UnitDefinition, UnitTerrain, repair, tiles,
};
pub use tables::{RulesData, RulesTable};

/// Aggregates the read-only oracles required by the engine.
pub struct Env<'a, R, S>
where
    R: RulesOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
    rules: Option<&'a R>,
    settings: Option<&'a S>,
}

impl<R, S> Clone for Env<'_, R, S>
where
    R: RulesOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<R, S> Copy for Env<'_, R, S>
where
    R: RulesOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
}

pub type GameEnv<'a> = Env<'a, dyn RulesOracle + 'a, dyn SettingsOracle + 'a>;

impl<'a, R, S> Env<'a, R, S>
where
    R: RulesOracle + ?Sized,
    S: SettingsOracle + ?Sized,
{
    pub fn new(rules: Option<&'a R>, settings: Option<&'a S>) -> Self {
        Self { rules, settings }
    }

    pub fn with_all(rules: &'a R, settings: &'a S) -> Self {
        Self::new(Some(rules), Some(settings))
    }

    pub fn empty() -> Self {
        Self {
            rules: None,
            settings: None,
        }
    }

    /// Returns the RulesOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::RulesNotAvailable` if no rules oracle was provided.
    pub fn rules(&self) -> Result<&'a R, OracleError> {
        self.rules.ok_or(OracleError::RulesNotAvailable)
    }

    /// Returns the SettingsOracle, or an error if not available.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::SettingsNotAvailable` if no settings oracle was provided.
    pub fn settings(&self) -> Result<&'a S, OracleError> {
        self.settings.ok_or(OracleError::SettingsNotAvailable)
    }
}

impl<'a, R, S> Env<'a, R, S>
where
    R: RulesOracle + 'a,
    S: SettingsOracle + 'a,
{
    /// Converts this environment into a trait-object based `GameEnv`.
    pub fn into_game_env(self) -> GameEnv<'a> {
        let rules: Option<&'a dyn RulesOracle> = self.rules.map(|rules| rules as _);
        let settings: Option<&'a dyn SettingsOracle> =
            self.settings.map(|settings| settings as _);
        Env::new(rules, settings)
    }
}
