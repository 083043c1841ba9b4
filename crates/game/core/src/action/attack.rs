use crate::action::{ActionKind, ActionTransition};
use crate::change::Change;
use crate::combat::{CombatContext, CombatError, can_attack, simulate_damage, splash_damage, wound_bonus};
use crate::env::{GameEnv, OracleError, RulesOracle};
use crate::error::{ErrorContext, ErrorSeverity, GameError};
use crate::progression::{self, ProgressionError};
use crate::state::{AttackRecord, Coord, GameState, PlayerId, Unit, WorldError};

use super::refresh_unit;

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(bound(deserialize = "'de: 'static")))]
pub enum AttackError {
    #[error("no unit at {0}")]
    UnitNotFound(Coord),

    #[error("unit at {} belongs to player {owner}", .context.coord.unwrap_or_default())]
    NotOwner {
        owner: PlayerId,
        context: ErrorContext,
    },

    #[error("a unit cannot attack itself at {0}")]
    SelfTarget(Coord),

    #[error("unit at {attacker} cannot attack unit at {defender}")]
    CannotAttack { attacker: Coord, defender: Coord },

    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Progression(#[from] ProgressionError),

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    World(#[from] WorldError),

    #[error("dead unit left on the board at {0}")]
    DeadUnitRemains(Coord),
}

impl GameError for AttackError {
    fn severity(&self) -> ErrorSeverity {
        use AttackError::*;
        match self {
            UnitNotFound(_) | NotOwner { .. } | SelfTarget(_) | CannotAttack { .. } => {
                ErrorSeverity::Validation
            }
            Combat(inner) => inner.severity(),
            Progression(inner) => inner.severity(),
            Oracle(inner) => inner.severity(),
            World(_) | DeadUnitRemains(_) => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            AttackError::NotOwner { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        use AttackError::*;
        match self {
            UnitNotFound(_) => "ATTACK_UNIT_NOT_FOUND",
            NotOwner { .. } => "ATTACK_NOT_OWNER",
            SelfTarget(_) => "ATTACK_SELF_TARGET",
            CannotAttack { .. } => "ATTACK_CANNOT_ATTACK",
            Combat(inner) => inner.error_code(),
            Progression(inner) => inner.error_code(),
            Oracle(inner) => inner.error_code(),
            World(_) => "ATTACK_WORLD",
            DeadUnitRemains(_) => "ATTACK_DEAD_UNIT_REMAINS",
        }
    }
}

/// Attacks the unit at `defender` with the unit at `attacker`.
///
/// Damage is rolled on the game RNG: first the attack, then the counter
/// attack (when the defender can reach back), then splash rolls in neighbour
/// order around the defender.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackUnitAction {
    pub attacker: Coord,
    pub defender: Coord,
}

impl AttackUnitAction {
    pub fn new(attacker: Coord, defender: Coord) -> Self {
        Self { attacker, defender }
    }
}

/// `UnitDamaged` when health dropped, `UnitUpdated` otherwise.
fn damage_change(previous: Unit, updated: Unit, damage: u32) -> Change {
    if damage > 0 {
        Change::UnitDamaged {
            previous,
            updated,
            damage,
        }
    } else {
        Change::UnitUpdated { previous, updated }
    }
}

impl ActionTransition for AttackUnitAction {
    type Error = AttackError;

    fn pre_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        if self.attacker == self.defender {
            return Err(AttackError::SelfTarget(self.attacker));
        }
        let attacker = state
            .world
            .unit_at(self.attacker)
            .ok_or(AttackError::UnitNotFound(self.attacker))?;
        if !state.world.has_unit(self.defender) {
            return Err(AttackError::UnitNotFound(self.defender));
        }
        if attacker.player != state.current_player {
            return Err(AttackError::NotOwner {
                owner: attacker.player,
                context: ErrorContext::new(state.turn)
                    .with_coord(self.attacker)
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
        refresh_unit(state, rules, self.attacker, changes)?;

        let attacker = state
            .world
            .unit_at(self.attacker)
            .cloned()
            .ok_or(AttackError::UnitNotFound(self.attacker))?;
        let defender = state
            .world
            .unit_at(self.defender)
            .cloned()
            .ok_or(AttackError::UnitNotFound(self.defender))?;
        if !can_attack(rules, &attacker, &defender) {
            return Err(AttackError::CannotAttack {
                attacker: self.attacker,
                defender: self.defender,
            });
        }

        let attacker_def = rules.unit_def(attacker.unit_type)?;
        let mut attacker_after = attacker.clone();
        progression::begin(&mut attacker_after, attacker_def, ActionKind::Attack)?;

        let attacker_tile = state
            .world
            .tile_at(self.attacker)
            .cloned()
            .ok_or(CombatError::MissingTile(self.attacker))?;
        let defender_tile = state
            .world
            .tile_at(self.defender)
            .cloned()
            .ok_or(CombatError::MissingTile(self.defender))?;

        let ctx = CombatContext::new(&attacker, &attacker_tile, &defender, &defender_tile)
            .with_wound_bonus(wound_bonus(&defender, self.attacker, state.turn));
        let damage = simulate_damage(rules, &ctx, &mut state.rng)?;

        // The counter attack is rolled with the defender's health before the hit.
        let counter = if can_attack(rules, &defender, &attacker) {
            let ctx = CombatContext::new(&defender, &defender_tile, &attacker, &attacker_tile);
            simulate_damage(rules, &ctx, &mut state.rng)?
        } else {
            0
        };

        progression::record_choice(&mut attacker_after, attacker_def, ActionKind::Attack);
        progression::complete_step(&mut attacker_after, attacker_def);
        attacker_after.last_acted_turn = state.turn;
        attacker_after.health = attacker_after.health.saturating_sub(counter);

        let mut defender_after = defender.clone();
        defender_after
            .attack_history
            .retain(|record| record.turn == state.turn);
        defender_after.attack_history.push(AttackRecord {
            q: self.attacker.q,
            r: self.attacker.r,
            is_ranged: self.attacker.distance(self.defender) >= 2,
            turn: state.turn,
        });
        defender_after.health = defender_after.health.saturating_sub(damage);

        for unit in [&defender_after, &attacker_after] {
            if let Some(slot) = state.world.unit_at_mut(unit.coord) {
                *slot = unit.clone();
            }
        }

        changes.push(damage_change(defender.clone(), defender_after.clone(), damage));
        changes.push(damage_change(attacker.clone(), attacker_after.clone(), counter));

        if !defender_after.is_alive() {
            state.world.remove_unit(self.defender)?;
            changes.push(Change::UnitKilled { unit: defender });
        }
        if !attacker_after.is_alive() {
            state.world.remove_unit(self.attacker)?;
            changes.push(Change::UnitKilled { unit: attacker });
            return Ok(());
        }

        let targets = splash_damage(
            &state.world,
            rules,
            &attacker_after,
            &attacker_tile,
            self.defender,
            &mut state.rng,
        )?;
        for target in targets {
            let Some(previous) = state.world.unit_at(target.coord).cloned() else {
                continue;
            };
            let mut updated = previous.clone();
            updated.health = updated.health.saturating_sub(target.damage);
            if let Some(slot) = state.world.unit_at_mut(target.coord) {
                *slot = updated.clone();
            }
            let killed = !updated.is_alive();
            changes.push(Change::UnitDamaged {
                previous: previous.clone(),
                updated,
                damage: target.damage,
            });
            if killed {
                state.world.remove_unit(target.coord)?;
                changes.push(Change::UnitKilled { unit: previous });
            }
        }

        Ok(())
    }

    fn post_validate(&self, state: &GameState, _env: &GameEnv<'_>) -> Result<(), Self::Error> {
        for coord in [self.attacker, self.defender] {
            if state.world.unit_at(coord).is_some_and(|unit| !unit.is_alive()) {
                return Err(AttackError::DeadUnitRemains(coord));
            }
        }
        Ok(())
    }
}
