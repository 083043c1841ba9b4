use crate::action::ActionTransition;
use crate::change::Change;
use crate::env::{GameEnv, OracleError, RulesOracle, SettingsOracle};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::movement::{PathError, find_path};
use crate::progression::{self, ProgressionError};
use crate::state::{Coord, GameState, PlayerId, WorldError};

use super::refresh_unit;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(deserialize = "'de: 'static")))]
pub enum MoveError {
    #[error("no unit at {0}")]
    UnitNotFound(Coord),

    #[error("unit at {} belongs to player {owner}", .context.coord.unwrap_or_default())]
    NotOwner {
        owner: PlayerId,
        context: ErrorContext,
    },

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    World(#[from] WorldError),

    /// The moved unit is not where the move left it.
    #[error("moved unit missing at {0}")]
    Desync(Coord),
}

impl GameError for MoveError {
    fn severity(&self) -> ErrorSeverity {
        use MoveError::*;
        match self {
            UnitNotFound(_) | NotOwner { .. } => ErrorSeverity::Validation,
            Path(inner) => inner.severity(),
            Progression(inner) => inner.severity(),
            Oracle(inner) => inner.severity(),
            World(_) | Desync(_) => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            MoveError::NotOwner { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use MoveError::*;
        match self {
            UnitNotFound(_) => "MOVE_UNIT_NOT_FOUND",
            NotOwner { .. } => "MOVE_NOT_OWNER",
            Path(inner) => inner.error_code(),
            Progression(inner) => inner.error_code(),
            Oracle(inner) => inner.error_code(),
            World(_) => "MOVE_WORLD",
            Desync(_) => "MOVE_DESYNC",
        }
    }
}

/// Moves the unit at `from` to `to` along the cheapest affordable path.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MoveUnitAction {
    pub from: Coord,
    pub to: Coord,
}

impl MoveUnitAction {
    pub fn new(from: Coord, to: Coord) -> Self {
        Self { from, to }
    }
}

impl ActionTransition for MoveUnitAction {
    type Error = MoveError;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let unit = state
            .world
            .unit_at(self.from)
            .ok_or(MoveError::UnitNotFound(self.from))?;
        if unit.player != state.current_player {
            return Err(MoveError::NotOwner {
                owner: unit.player,
                context: ErrorContext::new(state.turn)
                    .with_coord(self.from)
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
        let policy = env.settings()?.pass_through();
        refresh_unit(state, rules, self.from, changes)?;

        let previous = state
            .world
            .unit_at(self.from)
            .cloned()
            .ok_or(MoveError::UnitNotFound(self.from))?;
        let def = rules.unit_def(previous.unit_type)?;

        let mut updated = previous.clone();
        let kind = progression::movement_kind(&updated, def);
        progression::begin(&mut updated, def, kind)?;
        let path = find_path(&state.world, rules, &updated, self.to, policy)?;

        state.world.move_unit(self.from, self.to)?;

        updated.coord = self.to;
        updated.distance_left = (updated.distance_left - path.total_cost).max(0.0);
        updated.last_acted_turn = state.turn;
        progression::record_choice(&mut updated, def, kind);
        if updated.distance_left <= 0.0 {
            progression::complete_step(&mut updated, def);
        }

        let slot = state
            .world
            .unit_at_mut(self.to)
            .ok_or(MoveError::Desync(self.to))?;
        *slot = updated.clone();

        changes.push(Change::UnitMoved { previous, updated });
        Ok(())
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match state.world.unit_at(self.to) {
            Some(unit) if unit.coord == self.to && unit.distance_left >= 0.0 => Ok(()),
            _ => Err(MoveError::Desync(self.to)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionKind;
    use crate::env::{Env, GameSettings, PassThrough};
    use crate::state::Tile;
    use crate::test_support::{MOUNTAINS, SOLDIER, game, grass_world, ready_unit, standard_rules};

    fn run(
        state: &mut GameState,
        action: MoveUnitAction,
        settings: &GameSettings,
    ) -> Result<Vec<Change>, MoveError> {
        let rules = standard_rules();
        let env = Env::with_all(&rules, settings).into_game_env();
        let mut changes = Vec::new();
        action.pre_validate(state, &env)?;
        action.apply(state, &env, &mut changes)?;
        action.post_validate(state, &env)?;
        Ok(changes)
    }

    #[test]
    fn spends_path_cost_and_keeps_slot_open() {
        let rules = standard_rules();
        let mut state = game(grass_world(3));
        state.world.add_unit(ready_unit(&rules, 0, 0, 1, SOLDIER, 1));

        let changes = run(
            &mut state,
            MoveUnitAction::new(Coord::ORIGIN, Coord::new(2, 0)),
            &GameSettings::default(),
        )
        .unwrap();

        let unit = state.world.unit_at(Coord::new(2, 0)).unwrap();
        assert_eq!(unit.distance_left, 1.0);
        assert_eq!(unit.progression_step, 0);
        assert_eq!(unit.last_acted_turn, 1);
        assert!(!state.world.has_unit(Coord::ORIGIN));
        assert!(matches!(&changes[..], [Change::UnitMoved { previous, updated }]
            if previous.coord == Coord::ORIGIN && updated.coord == Coord::new(2, 0)));
    }

    #[test]
    fn spending_the_whole_budget_closes_the_slot() {
        let rules = standard_rules();
        let mut state = game(grass_world(3));
        state.world.add_unit(ready_unit(&rules, 0, 0, 1, SOLDIER, 1));

        run(
            &mut state,
            MoveUnitAction::new(Coord::ORIGIN, Coord::new(3, 0)),
            &GameSettings::default(),
        )
        .unwrap();
        let unit = state.world.unit_at(Coord::new(3, 0)).unwrap();
        assert_eq!(unit.distance_left, 0.0);
        assert_eq!(unit.progression_step, 1);

        let err = run(
            &mut state,
            MoveUnitAction::new(Coord::new(3, 0), Coord::new(2, 0)),
            &GameSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MoveError::Progression(ProgressionError::NotAllowed {
                action: ActionKind::Move,
                ..
            })
        ));
    }

    #[test]
    fn same_position_is_free() {
        let rules = standard_rules();
        let mut state = game(grass_world(1));
        state.world.add_unit(ready_unit(&rules, 0, 0, 1, SOLDIER, 1));
        run(
            &mut state,
            MoveUnitAction::new(Coord::ORIGIN, Coord::ORIGIN),
            &GameSettings::default(),
        )
        .unwrap();
        assert_eq!(
            state.world.unit_at(Coord::ORIGIN).map(|u| u.distance_left),
            Some(3.0)
        );
    }

    #[test]
    fn expensive_terrain_limits_reach() {
        let rules = standard_rules();
        let mut world = grass_world(3);
        world.add_tile(Tile::new(Coord::new(1, 0), MOUNTAINS));
        let mut state = game(world);
        state.world.add_unit(ready_unit(&rules, 0, 0, 1, SOLDIER, 1));

        run(
            &mut state,
            MoveUnitAction::new(Coord::ORIGIN, Coord::new(1, 0)),
            &GameSettings::default(),
        )
        .unwrap();
        assert_eq!(
            state.world.unit_at(Coord::new(1, 0)).map(|u| u.distance_left),
            Some(0.0)
        );
    }

    #[test]
    fn rejects_foreign_and_blocked_moves() {
        let rules = standard_rules();
        let mut state = game(grass_world(3));
        state.world.add_unit(ready_unit(&rules, 0, 0, 1, SOLDIER, 1));
        state.world.add_unit(ready_unit(&rules, 1, 0, 2, SOLDIER, 1));
        let settings = GameSettings::default();

        let err = run(
            &mut state,
            MoveUnitAction::new(Coord::new(1, 0), Coord::new(2, 0)),
            &settings,
        )
        .unwrap_err();
        assert_eq!(err.error_code(), "MOVE_NOT_OWNER");
        assert_eq!(err.context().and_then(|ctx| ctx.player), Some(1));

        let err = run(
            &mut state,
            MoveUnitAction::new(Coord::ORIGIN, Coord::new(1, 0)),
            &settings,
        )
        .unwrap_err();
        assert_eq!(err, MoveError::Path(PathError::Occupied(Coord::new(1, 0))));

        let forbid = GameSettings {
            pass_through: PassThrough::Forbid,
            ..GameSettings::default()
        };
        // Walling off (1,0) still leaves a detour of cost 3 around it.
        assert!(
            run(
                &mut state,
                MoveUnitAction::new(Coord::ORIGIN, Coord::new(2, 0)),
                &forbid,
            )
            .is_ok()
        );
    }
}
