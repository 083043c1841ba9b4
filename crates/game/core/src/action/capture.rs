use crate::action::{ActionKind, ActionTransition};
use crate::change::Change;
use crate::env::{GameEnv, OracleError, RulesOracle};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::progression::{self, ProgressionError};
use crate::state::{Coord, GameState, PlayerId, TerrainId, UnitTypeId};

use super::refresh_unit;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CaptureError {
    #[error("no unit at {0}")]
    UnitNotFound(Coord),

    #[error("unit at {} belongs to player {owner}", .context.coord.unwrap_or_default())]
    NotOwner {
        owner: PlayerId,
        context: ErrorContext,
    },

    #[error("no tile at {0}")]
    TileNotFound(Coord),

    #[error("tile at {coord} is already owned by player {player}")]
    AlreadyOwned { coord: Coord, player: PlayerId },

    #[error("unit type {unit_type} cannot capture terrain {terrain}")]
    CannotCapture {
        unit_type: UnitTypeId,
        terrain: TerrainId,
    },

    #[error("unit at {0} is already capturing")]
    AlreadyCapturing(Coord),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for CaptureError {
    fn severity(&self) -> ErrorSeverity {
        use CaptureError::*;
        match self {
            Progression(inner) => inner.severity(),
            Oracle(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            CaptureError::NotOwner { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use CaptureError::*;
        match self {
            UnitNotFound(_) => "CAPTURE_UNIT_NOT_FOUND",
            NotOwner { .. } => "CAPTURE_NOT_OWNER",
            TileNotFound(_) => "CAPTURE_TILE_NOT_FOUND",
            AlreadyOwned { .. } => "CAPTURE_ALREADY_OWNED",
            CannotCapture { .. } => "CAPTURE_NOT_ELIGIBLE",
            AlreadyCapturing(_) => "CAPTURE_IN_PROGRESS",
            Progression(inner) => inner.error_code(),
            Oracle(inner) => inner.error_code(),
        }
    }
}

/// Starts capturing the building under the unit at `pos`.
///
/// Ownership changes when the unit is next refreshed in a later turn, if it
/// is still standing there.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CaptureBuildingAction {
    pub pos: Coord,
}

impl CaptureBuildingAction {
    pub fn new(pos: Coord) -> Self {
        Self { pos }
    }
}

impl ActionTransition for CaptureBuildingAction {
    type Error = CaptureError;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let unit = state
            .world
            .unit_at(self.pos)
            .ok_or(CaptureError::UnitNotFound(self.pos))?;
        if unit.player != state.current_player {
            return Err(CaptureError::NotOwner {
                owner: unit.player,
                context: ErrorContext::new(state.turn)
                    .with_coord(self.pos)
                    .with_player(state.current_player),
            });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        changes: &mut Vec<Change>,
    ) -> Result<(), Self::Error> {
        let rules = env.rules()?;
        refresh_unit(state, rules, self.pos, changes)?;

        // Ownership may have just flipped in the refresh, so the tile is read
        // afterwards.
        let tile = state
            .world
            .tile_at(self.pos)
            .cloned()
            .ok_or(CaptureError::TileNotFound(self.pos))?;
        let previous = state
            .world
            .unit_at(self.pos)
            .cloned()
            .ok_or(CaptureError::UnitNotFound(self.pos))?;

        if tile.player == state.current_player {
            return Err(CaptureError::AlreadyOwned {
                coord: self.pos,
                player: tile.player,
            });
        }
        if !rules.can_capture(previous.unit_type, tile.tile_type) {
            return Err(CaptureError::CannotCapture {
                unit_type: previous.unit_type,
                terrain: tile.tile_type,
            });
        }
        if previous.is_capturing() {
            return Err(CaptureError::AlreadyCapturing(self.pos));
        }

        let def = rules.unit_def(previous.unit_type)?;
        let mut updated = previous.clone();
        progression::begin(&mut updated, def, ActionKind::Capture)?;
        updated.capture_started_turn = state.turn;
        updated.last_acted_turn = state.turn;
        progression::record_choice(&mut updated, def, ActionKind::Capture);
        progression::complete_step(&mut updated, def);

        if let Some(slot) = state.world.unit_at_mut(self.pos) {
            *slot = updated.clone();
        }

        changes.push(Change::CaptureStarted {
            unit: updated.clone(),
            tile: self.pos,
            tile_type: tile.tile_type,
            current_owner: tile.player,
        });
        changes.push(Change::UnitUpdated { previous, updated });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Env, GameSettings, tiles};
    use crate::state::{NEUTRAL, Tile};
    use crate::test_support::{SOLDIER, TANK, game, grass_world, ready_unit, standard_rules};

    fn run(state: &mut GameState, pos: Coord) -> Result<Vec<Change>, CaptureError> {
        let rules = standard_rules();
        let settings = GameSettings::default();
        let env = Env::with_all(&rules, &settings).into_game_env();
        let action = CaptureBuildingAction::new(pos);
        let mut changes = Vec::new();
        action.pre_validate(state, &env)?;
        action.apply(state, &env, &mut changes)?;
        action.post_validate(state, &env)?;
        Ok(changes)
    }

    fn base_game(owner: PlayerId, unit_type: UnitTypeId) -> GameState {
        let rules = standard_rules();
        let mut world = grass_world(1);
        world.add_tile(Tile::new(Coord::ORIGIN, tiles::LAND_BASE).with_owner(owner));
        world.add_unit(ready_unit(&rules, 0, 0, 1, unit_type, 1));
        game(world)
    }

    #[test]
    fn starts_capture_without_changing_owner() {
        let mut state = base_game(2, SOLDIER);
        let changes = run(&mut state, Coord::ORIGIN).unwrap();

        assert_eq!(state.world.tile_at(Coord::ORIGIN).map(|t| t.player), Some(2));
        let unit = state.world.unit_at(Coord::ORIGIN).unwrap();
        assert_eq!(unit.capture_started_turn, 1);
        assert_eq!(unit.progression_step, 2);
        assert!(matches!(
            &changes[..],
            [
                Change::CaptureStarted { current_owner: 2, tile_type: tiles::LAND_BASE, .. },
                Change::UnitUpdated { .. },
            ]
        ));
    }

    #[test]
    fn neutral_buildings_can_be_captured() {
        let mut state = base_game(NEUTRAL, SOLDIER);
        assert!(run(&mut state, Coord::ORIGIN).is_ok());
    }

    #[test]
    fn rejected_captures_leave_state_untouched() {
        let mut own = base_game(1, SOLDIER);
        let before = own.clone();
        assert_eq!(
            run(&mut own, Coord::ORIGIN).unwrap_err().error_code(),
            "CAPTURE_ALREADY_OWNED"
        );
        assert_eq!(own, before);

        let mut tank = base_game(2, TANK);
        let before = tank.clone();
        assert_eq!(
            run(&mut tank, Coord::ORIGIN).unwrap_err().error_code(),
            "CAPTURE_NOT_ELIGIBLE"
        );
        assert_eq!(tank, before);

        let mut capturing = base_game(2, SOLDIER);
        run(&mut capturing, Coord::ORIGIN).unwrap();
        let before = capturing.clone();
        assert_eq!(
            run(&mut capturing, Coord::ORIGIN),
            Err(CaptureError::AlreadyCapturing(Coord::ORIGIN))
        );
        assert_eq!(capturing, before);
    }
}
