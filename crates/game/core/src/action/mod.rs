//! Player moves and the transitions that execute them.
//!
//! A [`Move`] is a fully resolved player intent (coordinates and ids only).
//! Each variant wraps a transition type implementing [`ActionTransition`];
//! the [`GameEngine`](crate::engine::GameEngine) drives the transition through
//! `pre_validate -> apply -> post_validate` inside a world transaction.
//!
//! Checks that only read the state as submitted run in `pre_validate`.
//! Checks that depend on a unit's lazy refresh (movement budget, progression,
//! a capture completed by the refresh) run in `apply`, after the refresh.

mod attack;
mod build;
mod capture;
mod end_turn;
mod heal;
mod kind;
mod movement;
mod options;

pub use attack::{AttackError, AttackUnitAction};
pub use build::{BuildError, BuildUnitAction};
pub use capture::{CaptureBuildingAction, CaptureError};
pub use end_turn::{EndTurnAction, EndTurnError};
pub use heal::{HealError, HealUnitAction};
pub use kind::ActionKind;
pub use movement::{MoveError, MoveUnitAction};
pub use options::{
    AttackOption, CaptureOption, FixOption, HealOption, MoveOption, OptionsError, TileOptions,
    UnitOptions, tile_options, unit_options,
};

use crate::change::Change;
use crate::env::{GameEnv, OracleError, RulesOracle};
use crate::progression;
use crate::state::{Coord, GameState, UnitTypeId};

/// Defines how a concrete move mutates game state.
///
/// `apply` appends every change it makes to `changes`, in the order the
/// mutations happen. The engine discards both the mutations and the changes
/// when any phase fails.
pub trait ActionTransition {
    type Error;

    /// Validates pre-conditions using the state **before** mutation.
    fn pre_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Applies the move by mutating the game state directly. Implementations
    /// may assume that `pre_validate` has already run successfully.
    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        changes: &mut Vec<Change>,
    ) -> Result<(), Self::Error>;

    /// Validates post-conditions using the state **after** mutation.
    fn post_validate(&self, _state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// A resolved player move.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Move {
    MoveUnit(MoveUnitAction),
    AttackUnit(AttackUnitAction),
    BuildUnit(BuildUnitAction),
    CaptureBuilding(CaptureBuildingAction),
    HealUnit(HealUnitAction),
    EndTurn(EndTurnAction),
}

impl Move {
    pub fn move_unit(from: Coord, to: Coord) -> Self {
        Move::MoveUnit(MoveUnitAction::new(from, to))
    }

    pub fn attack(attacker: Coord, defender: Coord) -> Self {
        Move::AttackUnit(AttackUnitAction::new(attacker, defender))
    }

    pub fn build(pos: Coord, unit_type: UnitTypeId) -> Self {
        Move::BuildUnit(BuildUnitAction::new(pos, unit_type))
    }

    pub fn capture(pos: Coord) -> Self {
        Move::CaptureBuilding(CaptureBuildingAction::new(pos))
    }

    /// Heals the unit at `pos`; `amount == 0` heals by the terrain's rate.
    pub fn heal(pos: Coord, amount: u32) -> Self {
        Move::HealUnit(HealUnitAction::new(pos, amount))
    }

    pub fn end_turn() -> Self {
        Move::EndTurn(EndTurnAction)
    }

    /// Stable snake_case name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Move::MoveUnit(_) => "move_unit",
            Move::AttackUnit(_) => "attack_unit",
            Move::BuildUnit(_) => "build_unit",
            Move::CaptureBuilding(_) => "capture_building",
            Move::HealUnit(_) => "heal_unit",
            Move::EndTurn(_) => "end_turn",
        }
    }
}

/// Runs the lazy refresh for the unit at `coord` in the current turn.
///
/// Only the current player's units are refreshed. Other units are read as
/// they stand until their owner's turn comes round.
pub(crate) fn refresh_unit(
    state: &mut GameState,
    rules: &(impl RulesOracle + ?Sized),
    coord: Coord,
    changes: &mut Vec<Change>,
) -> Result<(), OracleError> {
    let owned = state
        .world
        .unit_at(coord)
        .is_some_and(|unit| unit.player == state.current_player);
    if !owned {
        return Ok(());
    }
    let turn = state.turn;
    progression::top_up_unit(&mut state.world, rules, coord, turn, changes)?;
    Ok(())
}
