use crate::action::ActionTransition;
use crate::change::{Change, CoinReason};
use crate::env::{GameEnv, OracleError, SettingsOracle};
use crate::error::{ErrorSeverity, GameError};
use crate::state::{GameState, GameStatus, PlayerId};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EndTurnError {
    #[error("current player {player} is outside 1..={player_count}")]
    PlayerOutOfRange { player: PlayerId, player_count: u32 },

    #[error(transparent)]
    Oracle(#[from] OracleError),
}

impl GameError for EndTurnError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            EndTurnError::PlayerOutOfRange { .. } => ErrorSeverity::Internal,
            EndTurnError::Oracle(inner) => inner.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            EndTurnError::PlayerOutOfRange { .. } => "END_TURN_PLAYER_OUT_OF_RANGE",
            EndTurnError::Oracle(inner) => inner.error_code(),
        }
    }
}

/// Ends the current player's turn.
///
/// Pays the ending player's income, hands the turn to the next player
/// (advancing the turn counter after the last player), refreshes the incoming
/// player's units and checks for a winner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EndTurnAction;

fn check_player(state: &GameState) -> Result<(), EndTurnError> {
    if (1..=state.player_count).contains(&state.current_player) {
        Ok(())
    } else {
        Err(EndTurnError::PlayerOutOfRange {
            player: state.current_player,
            player_count: state.player_count,
        })
    }
}

/// The only player with units left on the board, if exactly one remains.
fn sole_survivor(state: &GameState) -> Option<PlayerId> {
    let mut survivors = state
        .players()
        .filter(|player| state.world.player_units(*player).next().is_some());
    let winner = survivors.next()?;
    survivors.next().is_none().then_some(winner)
}

impl ActionTransition for EndTurnAction {
    type Error = EndTurnError;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        check_player(state)
    }

    fn apply(
        &self,
        state: &mut GameState,
        env: &GameEnv<'_>,
        changes: &mut Vec<Change>,
    ) -> Result<(), Self::Error> {
        let rules = env.rules()?;
        let settings = env.settings()?;
        let previous_player = state.current_player;
        let previous_turn = state.turn;

        let income = settings.income().player_income(
            state
                .world
                .player_tiles(previous_player)
                .map(|tile| tile.tile_type),
        );
        if income > 0 {
            let previous = state.coins(previous_player);
            let new = previous + income;
            state.set_coins(previous_player, new);
            changes.push(Change::CoinsChanged {
                player: previous_player,
                previous,
                new,
                reason: CoinReason::Income,
            });
        }

        let (new_player, new_turn) = state.next_player();
        state.current_player = new_player;
        state.turn = new_turn;

        let mut reset_units = Vec::new();
        for coord in state.world.player_unit_coords(new_player) {
            super::refresh_unit(state, rules, coord, changes)?;
            if let Some(unit) = state.world.unit_at(coord) {
                reset_units.push(unit.clone());
            }
        }

        changes.push(Change::PlayerChanged {
            previous_player,
            new_player,
            previous_turn,
            new_turn,
            reset_units,
        });

        if let Some(winner) = sole_survivor(state) {
            state.status = GameStatus::Finished { winner };
            changes.push(Change::GameEnded { winner });
        }
        Ok(())
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        check_player(state)
    }
}
