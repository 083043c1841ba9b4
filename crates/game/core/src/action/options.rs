//! Read-only queries for what a unit or tile can do right now.
//!
//! Clients use these to present choices; they never advance the game. A
//! unit's options are computed on its refreshed view, so the query runs the
//! refresh inside a scratch world layer that is always discarded.

use crate::combat::{
    CombatContext, CombatError, DamageDistribution, FixContext, attack_options,
    damage_distribution, fix_distribution, fix_options, wound_bonus,
};
use crate::env::{GameEnv, OracleError, RulesOracle, SettingsOracle};
use crate::error::{ErrorSeverity, GameError};
use crate::movement::{Path, PathError, destinations, movement_options, reconstruct_path};
use crate::progression::{self, allowed_tile_actions, build_options, heal_amount};
use crate::state::{Coord, GameState, PlayerId, TerrainId, UnitTypeId, WorldError};

use super::ActionKind;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum OptionsError {
    #[error("no unit at {0}")]
    UnitNotFound(Coord),

    #[error("no tile at {0}")]
    TileNotFound(Coord),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Path(#[from] PathError),

    #[error(transparent)]
    World(#[from] WorldError),
}

impl GameError for OptionsError {
    fn severity(&self) -> ErrorSeverity {
        use OptionsError::*;
        match self {
            UnitNotFound(_) | TileNotFound(_) => ErrorSeverity::Validation,
            Oracle(inner) => inner.severity(),
            Combat(inner) => inner.severity(),
            Path(inner) => inner.severity(),
            World(_) => ErrorSeverity::Internal,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MoveOption {
    pub dest: Coord,
    pub path: Path,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttackOption {
    pub target: Coord,
    pub distribution: DamageDistribution,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CaptureOption {
    pub tile_type: TerrainId,
    pub current_owner: PlayerId,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HealOption {
    pub amount: u32,
}

/// A damaged friendly neighbour and the health a fix would restore.
#[derive(Clone, Debug, PartialEq)]
pub struct FixOption {
    pub target: Coord,
    pub distribution: DamageDistribution,
}

/// Everything the unit at `coord` may do this turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct UnitOptions {
    pub coord: Coord,
    /// Actions open in the unit's current progression slot.
    pub allowed: Vec<ActionKind>,
    pub moves: Vec<MoveOption>,
    pub attacks: Vec<AttackOption>,
    pub capture: Option<CaptureOption>,
    pub heal: Option<HealOption>,
    pub fixes: Vec<FixOption>,
}

impl UnitOptions {
    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
            && self.attacks.is_empty()
            && self.capture.is_none()
            && self.heal.is_none()
            && self.fixes.is_empty()
    }
}

/// Builds the tile at `coord` offers this turn.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TileOptions {
    pub coord: Coord,
    pub actions: Vec<ActionKind>,
    pub buildable: Vec<UnitTypeId>,
}

/// Options for the current player's unit at `coord`.
///
/// Units of other players have no options. Attack options carry a damage
/// distribution from the diagnostic generator, so the game RNG is untouched.
pub fn unit_options(
    state: &mut GameState,
    env: &GameEnv<'_>,
    coord: Coord,
) -> Result<UnitOptions, OptionsError> {
    state.world.push();
    let result = collect_unit_options(state, env, coord);
    state.world.pop()?;
    result
}

fn collect_unit_options(
    state: &mut GameState,
    env: &GameEnv<'_>,
    coord: Coord,
) -> Result<UnitOptions, OptionsError> {
    let rules = env.rules()?;
    let policy = env.settings()?.pass_through();
    if !state.world.has_unit(coord) {
        return Err(OptionsError::UnitNotFound(coord));
    }
    super::refresh_unit(state, rules, coord, &mut Vec::new())?;

    let world = &state.world;
    let unit = world.unit_at(coord).ok_or(OptionsError::UnitNotFound(coord))?;
    let mut options = UnitOptions {
        coord,
        ..UnitOptions::default()
    };
    if unit.player != state.current_player {
        return Ok(options);
    }

    let def = rules.unit_def(unit.unit_type)?;
    options.allowed = progression::allowed_actions(unit, def);
    let opens = |action: ActionKind| progression::begin(&mut unit.clone(), def, action).is_ok();

    if options.allowed.iter().any(|action| action.uses_movement()) {
        let all_paths = movement_options(world, rules, unit, unit.distance_left, policy);
        for dest in destinations(&all_paths) {
            let path = reconstruct_path(&all_paths, dest)?;
            options.moves.push(MoveOption { dest, path });
        }
    }

    if opens(ActionKind::Attack) {
        let attacker_tile = world.tile_at(coord).ok_or(CombatError::MissingTile(coord))?;
        for target in attack_options(world, rules, unit) {
            let (Some(defender), Some(defender_tile)) = (world.unit_at(target), world.tile_at(target))
            else {
                continue;
            };
            let ctx = CombatContext::new(unit, attacker_tile, defender, defender_tile)
                .with_wound_bonus(wound_bonus(defender, coord, state.turn));
            options.attacks.push(AttackOption {
                target,
                distribution: damage_distribution(rules, &ctx, 0)?,
            });
        }
    }

    if opens(ActionKind::Capture) && !unit.is_capturing() {
        if let Some(tile) = world.tile_at(coord) {
            if tile.player != unit.player && rules.can_capture(unit.unit_type, tile.tile_type) {
                options.capture = Some(CaptureOption {
                    tile_type: tile.tile_type,
                    current_owner: tile.player,
                });
            }
        }
    }

    if unit.health < def.health && unit.last_acted_turn != state.turn {
        let amount = heal_amount(world, rules, unit, state.turn).min(def.health - unit.health);
        if amount > 0 {
            options.heal = Some(HealOption { amount });
        }
    }

    if def.can_fix() && unit.last_acted_turn != state.turn {
        let distribution = fix_distribution(&FixContext::new(unit, def.fix_value), 0);
        for target in fix_options(world, rules, unit) {
            options.fixes.push(FixOption {
                target,
                distribution: distribution.clone(),
            });
        }
    }

    Ok(options)
}

/// Build options of the current player's tile at `coord`.
///
/// A tile that already built this turn, or stands under a unit, offers
/// nothing.
pub fn tile_options(
    state: &GameState,
    env: &GameEnv<'_>,
    coord: Coord,
) -> Result<TileOptions, OptionsError> {
    let rules = env.rules()?;
    let settings = env.settings()?;
    let tile = state
        .world
        .tile_at(coord)
        .ok_or(OptionsError::TileNotFound(coord))?;

    let mut options = TileOptions {
        coord,
        ..TileOptions::default()
    };
    if tile.player != state.current_player
        || tile.last_acted_turn == state.turn
        || state.world.has_unit(coord)
    {
        return Ok(options);
    }

    let Some(terrain) = rules.terrain(tile.tile_type) else {
        return Ok(options);
    };
    let coins = state.coins(state.current_player);
    options.actions = allowed_tile_actions(rules, settings, terrain, coins);
    options.buildable = build_options(rules, settings, terrain, coins)
        .into_iter()
        .map(|def| def.id)
        .collect();
    Ok(options)
}
