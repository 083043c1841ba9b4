use crate::action::ActionTransition;
use crate::change::Change;
use crate::env::{GameEnv, OracleError, RulesOracle};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::progression::heal_amount;
use crate::state::{Coord, GameState, PlayerId};

use super::refresh_unit;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HealError {
    #[error("no unit at {0}")]
    UnitNotFound(Coord),

    #[error("unit at {} belongs to player {owner}", .context.coord.unwrap_or_default())]
    NotOwner {
        owner: PlayerId,
        context: ErrorContext,
    },

    #[error("unit at {0} is already at full health")]
    FullHealth(Coord),

    #[error("unit at {0} already acted this turn")]
    AlreadyActed(Coord),

    #[error("unit at {0} cannot heal on this terrain")]
    NothingToHeal(Coord),

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for HealError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            HealError::Oracle(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            HealError::NotOwner { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use HealError::*;
        match self {
            UnitNotFound(_) => "HEAL_UNIT_NOT_FOUND",
            NotOwner { .. } => "HEAL_NOT_OWNER",
            FullHealth(_) => "HEAL_FULL_HEALTH",
            AlreadyActed(_) => "HEAL_ALREADY_ACTED",
            NothingToHeal(_) => "HEAL_NOTHING_TO_HEAL",
            Oracle(inner) => inner.error_code(),
        }
    }
}

/// Spends the unit's turn on healing.
///
/// `amount == 0` heals by the rate of the tile the unit stands on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HealUnitAction {
    pub pos: Coord,
    pub amount: u32,
}

impl HealUnitAction {
    pub fn new(pos: Coord, amount: u32) -> Self {
        Self { pos, amount }
    }
}

impl ActionTransition for HealUnitAction {
    type Error = HealError;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let unit = state
            .world
            .unit_at(self.pos)
            .ok_or(HealError::UnitNotFound(self.pos))?;
        if unit.player != state.current_player {
            return Err(HealError::NotOwner {
                owner: unit.player,
                context: ErrorContext::new(state.turn)
                    .with_coord(self.pos)
                    .with_player(state.current_player),
            });
        }
        if unit.last_acted_turn == state.turn {
            return Err(HealError::AlreadyActed(self.pos));
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

        let previous = state
            .world
            .unit_at(self.pos)
            .cloned()
            .ok_or(HealError::UnitNotFound(self.pos))?;
        let max_health = rules.unit_def(previous.unit_type)?.health;
        if previous.health >= max_health {
            return Err(HealError::FullHealth(self.pos));
        }

        let requested = if self.amount > 0 {
            self.amount
        } else {
            heal_amount(&state.world, rules, &previous, state.turn)
        };
        if requested == 0 {
            return Err(HealError::NothingToHeal(self.pos));
        }

        let mut updated = previous.clone();
        updated.health = previous.health.saturating_add(requested).min(max_health);
        updated.last_acted_turn = state.turn;
        updated.progression_step += 1;
        updated.chosen_alternative = None;
        let amount = updated.health - previous.health;

        if let Some(slot) = state.world.unit_at_mut(self.pos) {
            *slot = updated.clone();
        }
        changes.push(Change::UnitHealed {
            previous,
            updated,
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::{Env, GameSettings, tiles};
    use crate::state::Tile;
    use crate::test_support::{SOLDIER, game, grass_world, ready_unit, standard_rules};

    fn run(state: &mut GameState, action: HealUnitAction) -> Result<Vec<Change>, HealError> {
        let rules = standard_rules();
        let settings = GameSettings::default();
        let env = Env::with_all(&rules, &settings).into_game_env();
        let mut changes = Vec::new();
        action.pre_validate(state, &env)?;
        action.apply(state, &env, &mut changes)?;
        action.post_validate(state, &env)?;
        Ok(changes)
    }

    fn wounded_on(terrain: u32, health: u32) -> GameState {
        let rules = standard_rules();
        let mut world = grass_world(1);
        world.add_tile(Tile::new(Coord::ORIGIN, terrain).with_owner(1));
        world.add_unit(ready_unit(&rules, 0, 0, 1, SOLDIER, 1).with_health(health));
        game(world)
    }

    #[test]
    fn heals_by_terrain_rate_when_no_amount_given() {
        let mut state = wounded_on(tiles::LAND_BASE, 5);
        let changes = run(&mut state, HealUnitAction::new(Coord::ORIGIN, 0)).unwrap();

        let unit = state.world.unit_at(Coord::ORIGIN).unwrap();
        assert_eq!(unit.health, 7);
        assert_eq!(unit.last_acted_turn, 1);
        assert_eq!(unit.progression_step, 1);
        assert!(matches!(changes[..], [Change::UnitHealed { amount: 2, .. }]));
    }

    #[test]
    fn explicit_amount_is_capped_at_max_health() {
        let mut state = wounded_on(tiles::GRASS, 8);
        let changes = run(&mut state, HealUnitAction::new(Coord::ORIGIN, 5)).unwrap();
        assert_eq!(state.world.unit_at(Coord::ORIGIN).map(|u| u.health), Some(10));
        assert!(matches!(changes[..], [Change::UnitHealed { amount: 2, .. }]));
    }

    #[test]
    fn rejects_full_health_barren_terrain_and_repeat() {
        let mut full = wounded_on(tiles::LAND_BASE, 10);
        assert_eq!(
            run(&mut full, HealUnitAction::new(Coord::ORIGIN, 0)),
            Err(HealError::FullHealth(Coord::ORIGIN))
        );

        let mut grass = wounded_on(tiles::GRASS, 5);
        assert_eq!(
            run(&mut grass, HealUnitAction::new(Coord::ORIGIN, 0)),
            Err(HealError::NothingToHeal(Coord::ORIGIN))
        );

        let mut twice = wounded_on(tiles::LAND_BASE, 3);
        run(&mut twice, HealUnitAction::new(Coord::ORIGIN, 0)).unwrap();
        assert_eq!(
            run(&mut twice, HealUnitAction::new(Coord::ORIGIN, 0)),
            Err(HealError::AlreadyActed(Coord::ORIGIN))
        );
    }
}
