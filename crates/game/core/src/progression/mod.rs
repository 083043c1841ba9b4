//! Per-unit turn progression.
//!
//! A unit's definition lists ordered action slots (`["move",
//! "attack|capture"]`). The unit's `progression_step` indexes the open slot;
//! a slot with `|` offers alternatives until one is chosen. Slots close as
//! actions complete and reopen only when the unit is refreshed in a later
//! turn (see [`refresh`]).
mod error;
mod refresh;
mod tile;

pub use error::ProgressionError;
pub use refresh::{exhausted_units, heal_amount, is_exhausted, top_up_unit};
pub use tile::{allowed_tile_actions, build_options};

use crate::action::ActionKind;
use crate::env::UnitDefinition;
use crate::state::Unit;

/// Slot token that switches the unit's budget to its retreat points.
const RETREAT_SLOT: &str = "retreat";

/// Parses a slot into its alternatives. Unknown names are dropped since they
/// can never be performed.
fn alternatives(slot: &str) -> Vec<ActionKind> {
    slot.split('|')
        .filter_map(|name| name.trim().parse().ok())
        .collect()
}

fn current_slot<'d>(unit: &Unit, def: &'d UnitDefinition) -> Option<&'d str> {
    def.action_slots()
        .get(unit.progression_step as usize)
        .copied()
}

/// Whether `action` is possible for `unit` regardless of slot.
pub fn can_perform(unit: &Unit, action: ActionKind) -> bool {
    match action {
        ActionKind::Move | ActionKind::Retreat => unit.distance_left > 0.0,
        ActionKind::Attack | ActionKind::Capture | ActionKind::Build | ActionKind::Heal => true,
    }
}

/// Actions open to `unit` in its current slot.
///
/// Empty once every slot is used. When an alternative has been chosen only
/// that alternative remains.
pub fn allowed_actions(unit: &Unit, def: &UnitDefinition) -> Vec<ActionKind> {
    let Some(slot) = current_slot(unit, def) else {
        return Vec::new();
    };
    let candidates = match unit.chosen_alternative {
        Some(chosen) => vec![chosen],
        None => alternatives(slot),
    };
    candidates
        .into_iter()
        .filter(|action| can_perform(unit, *action))
        .collect()
}

/// Opens a slot for `action`, moving past an unfinished movement slot when
/// the action belongs to the next one.
///
/// A unit that has moved part of its budget may still attack: its movement
/// slot is abandoned and the following slot becomes current.
///
/// # Errors
///
/// `ProgressionError::NotAllowed` when neither the current nor (after a
/// movement slot) the next slot offers `action`.
pub fn begin(
    unit: &mut Unit,
    def: &UnitDefinition,
    action: ActionKind,
) -> Result<(), ProgressionError> {
    let allowed = allowed_actions(unit, def);
    if allowed.contains(&action) {
        return Ok(());
    }

    let slots = def.action_slots();
    let step = unit.progression_step as usize;
    let movement_slot = unit.chosen_alternative.is_none_or(ActionKind::uses_movement)
        && slots
            .get(step)
            .is_some_and(|slot| alternatives(slot).iter().all(|kind| kind.uses_movement()));
    if movement_slot && !action.uses_movement() {
        if let Some(next) = slots.get(step + 1) {
            if alternatives(next).contains(&action) {
                unit.progression_step += 1;
                unit.chosen_alternative = None;
                return Ok(());
            }
        }
    }

    Err(ProgressionError::NotAllowed {
        action,
        step: unit.progression_step,
        allowed,
    })
}

/// Records which alternative of a `|` slot the unit committed to.
pub fn record_choice(unit: &mut Unit, def: &UnitDefinition, action: ActionKind) {
    if current_slot(unit, def).is_some_and(|slot| slot.contains('|')) {
        unit.chosen_alternative = Some(action);
    }
}

/// Closes the current slot.
///
/// Entering a `retreat` slot replaces the movement budget with the unit's
/// retreat points.
pub fn complete_step(unit: &mut Unit, def: &UnitDefinition) {
    unit.progression_step += 1;
    unit.chosen_alternative = None;
    if current_slot(unit, def) == Some(RETREAT_SLOT) {
        unit.distance_left = def.retreat_points;
    }
}

/// Movement flavour of the current slot: `Retreat` inside a retreat slot,
/// `Move` otherwise.
pub fn movement_kind(unit: &Unit, def: &UnitDefinition) -> ActionKind {
    let retreating = current_slot(unit, def).is_some_and(|slot| {
        let options = alternatives(slot);
        options.contains(&ActionKind::Retreat) && !options.contains(&ActionKind::Move)
    });
    if retreating {
        ActionKind::Retreat
    } else {
        ActionKind::Move
    }
}
