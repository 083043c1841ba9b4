use crate::action::ActionTransition;
use crate::change::{Change, CoinReason};
use crate::env::{GameEnv, OracleError, RulesOracle, SettingsOracle};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::state::{Coord, GameState, PlayerId, TerrainId, Turn, Unit, UnitTypeId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BuildError {
    #[error("no tile at {0}")]
    TileNotFound(Coord),

    #[error("tile at {} belongs to player {owner}", .context.coord.unwrap_or_default())]
    NotOwner {
        owner: PlayerId,
        context: ErrorContext,
    },

    #[error("terrain {terrain} cannot build unit type {unit_type}")]
    NotBuildable {
        terrain: TerrainId,
        unit_type: UnitTypeId,
    },

    #[error("unit type {0} is not allowed in this game")]
    NotAllowed(UnitTypeId),

    #[error("tile at {coord} already built a unit in turn {turn}")]
    AlreadyBuilt { coord: Coord, turn: Turn },

    #[error("tile at {0} is occupied")]
    Occupied(Coord),

    #[error("insufficient coins: need {needed}, have {available}")]
    InsufficientCoins { needed: i64, available: i64 },

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error("built unit missing at {0}")]
    Desync(Coord),
}

impl GameError for BuildError {
    fn severity(&self) -> ErrorSeverity {
        use BuildError::*;
        match self {
            InsufficientCoins { .. } | AlreadyBuilt { .. } => ErrorSeverity::Recoverable,
            TileNotFound(_) | NotOwner { .. } | NotBuildable { .. } | NotAllowed(_)
            | Occupied(_) => ErrorSeverity::Validation,
            Oracle(inner) => inner.severity(),
            Desync(_) => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            BuildError::NotOwner { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use BuildError::*;
        match self {
            TileNotFound(_) => "BUILD_TILE_NOT_FOUND",
            NotOwner { .. } => "BUILD_NOT_OWNER",
            NotBuildable { .. } => "BUILD_NOT_BUILDABLE",
            NotAllowed(_) => "BUILD_NOT_ALLOWED",
            AlreadyBuilt { .. } => "BUILD_ALREADY_BUILT",
            Occupied(_) => "BUILD_OCCUPIED",
            InsufficientCoins { .. } => "BUILD_INSUFFICIENT_COINS",
            Oracle(inner) => inner.error_code(),
            Desync(_) => "BUILD_DESYNC",
        }
    }
}

/// Builds a unit of `unit_type` on the current player's tile at `pos`.
///
/// The new unit starts at full health with no movement budget and its first
/// progression slot already consumed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildUnitAction {
    pub pos: Coord,
    pub unit_type: UnitTypeId,
}

impl BuildUnitAction {
    pub fn new(pos: Coord, unit_type: UnitTypeId) -> Self {
        Self { pos, unit_type }
    }
}

impl ActionTransition for BuildUnitAction {
    type Error = BuildError;

    fn pre_validate(&self, state: &GameState, env: &GameEnv<'_>) -> Result<(), Self::Error> {
        let rules = env.rules()?;
        let settings = env.settings()?;
        let tile = state
            .world
            .tile_at(self.pos)
            .ok_or(BuildError::TileNotFound(self.pos))?;
        if tile.player != state.current_player {
            return Err(BuildError::NotOwner {
                owner: tile.player,
                context: ErrorContext::new(state.turn)
                    .with_coord(self.pos)
                    .with_player(state.current_player),
            });
        }
        if !rules.terrain_def(tile.tile_type)?.can_build(self.unit_type) {
            return Err(BuildError::NotBuildable {
                terrain: tile.tile_type,
                unit_type: self.unit_type,
            });
        }
        if !settings.is_unit_allowed(self.unit_type) {
            return Err(BuildError::NotAllowed(self.unit_type));
        }
        if tile.last_acted_turn == state.turn {
            return Err(BuildError::AlreadyBuilt {
                coord: self.pos,
                turn: state.turn,
            });
        }
        if state.world.has_unit(self.pos) {
            return Err(BuildError::Occupied(self.pos));
        }
        let needed = rules.unit_def(self.unit_type)?.coins;
        let available = state.coins(state.current_player);
        if available < needed {
            return Err(BuildError::InsufficientCoins { needed, available });
        }
        Ok(())
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        changes: &mut Vec<Change>,
    ) -> Result<(), Self::Error> {
        let def = env.rules()?.unit_def(self.unit_type)?;
        let player = state.current_player;
        let turn = state.turn;

        let previous = state.coins(player);
        let remaining = previous - def.coins;
        state.set_coins(player, remaining);

        let mut unit = Unit::new(self.pos, player, self.unit_type, def.health);
        unit.progression_step = 1;
        unit.last_acted_turn = turn;
        unit.last_topped_up_turn = turn;
        unit.shortcut = state.world.next_unit_shortcut(player);
        state.world.add_unit(unit.clone());

        let tile = state
            .world
            .tile_at_mut(self.pos)
            .ok_or(BuildError::TileNotFound(self.pos))?;
        tile.last_acted_turn = turn;

        changes.push(Change::UnitBuilt {
            unit,
            tile: self.pos,
            cost: def.coins,
            player_coins: remaining,
        });
        changes.push(Change::CoinsChanged {
            player,
            previous,
            new: remaining,
            reason: CoinReason::Build,
        });
        Ok(())
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        match state.world.unit_at(self.pos) {
            Some(unit) if unit.unit_type == self.unit_type => Ok(()),
            _ => Err(BuildError::Desync(self.pos)),
        }
    }
}
