//! Units placed on the board.
use crate::action::ActionKind;

use super::{Coord, PlayerId, Turn, UnitTypeId};

/// One entry of a unit's per-turn attack history.
///
/// `q`/`r` record where the attacker stood, which drives the wound bonus for
/// follow-up attacks on the same defender within a turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AttackRecord {
    pub q: i32,
    pub r: i32,
    pub is_ranged: bool,
    pub turn: Turn,
}

impl AttackRecord {
    pub fn attacker(&self) -> Coord {
        Coord::new(self.q, self.r)
    }
}

/// Live unit state.
///
/// Turn bookkeeping is lazy: `distance_left`, health regeneration and the
/// progression step are only refreshed when the unit is next touched in a
/// turn later than `last_topped_up_turn`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Unit {
    pub coord: Coord,
    pub player: PlayerId,
    pub unit_type: UnitTypeId,
    pub health: u32,
    /// Remaining movement budget. Never negative.
    pub distance_left: f64,
    pub progression_step: u32,
    pub chosen_alternative: Option<ActionKind>,
    pub last_topped_up_turn: Turn,
    pub last_acted_turn: Turn,
    /// Turn a capture was started on (0 when not capturing).
    pub capture_started_turn: Turn,
    pub attack_history: Vec<AttackRecord>,
    pub shortcut: Option<String>,
}

impl Unit {
    /// Fresh unit with no turn bookkeeping.
    pub fn new(coord: Coord, player: PlayerId, unit_type: UnitTypeId, health: u32) -> Self {
        Self {
            coord,
            player,
            unit_type,
            health,
            distance_left: 0.0,
            progression_step: 0,
            chosen_alternative: None,
            last_topped_up_turn: 0,
            last_acted_turn: 0,
            capture_started_turn: 0,
            attack_history: Vec::new(),
            shortcut: None,
        }
    }

    #[must_use]
    pub fn with_health(mut self, health: u32) -> Self {
        self.health = health;
        self
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0
    }

    pub fn is_capturing(&self) -> bool {
        self.capture_started_turn > 0
    }

    pub fn needs_top_up(&self, turn: Turn) -> bool {
        self.last_topped_up_turn < turn
    }

    /// Refreshed this turn with no movement budget left.
    pub fn is_exhausted(&self, turn: Turn) -> bool {
        self.last_topped_up_turn >= turn && self.distance_left <= 0.0
    }
}
