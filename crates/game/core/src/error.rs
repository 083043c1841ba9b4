//! Common error infrastructure for hexline-core.
//!
//! Domain-specific errors (`MoveError`, `AttackError`, `WorldError`, ...) live
//! next to the code that raises them. They all implement [`GameError`] so the
//! runtime can classify a failure without matching on every variant.
//!
//! Errors that a player can cause carry an [`ErrorContext`] naming the turn,
//! coordinate and player involved.

use crate::state::{Coord, PlayerId, Turn};

/// How a caller should react to a failed move.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// The same move may succeed against a later state.
    Recoverable,

    /// The move is wrong for this state (foreign unit, unreachable tile,
    /// too few coins). Never retried internally.
    Validation,

    /// Engine bookkeeping went wrong, e.g. a layer pop with no overlay.
    Internal,

    /// The environment or state cannot support play: a missing oracle or an
    /// undefined unit type.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Internal and fatal errors both point at a bug or bad content.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where and when a rejected move happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub coord: Option<Coord>,
    pub player: Option<PlayerId>,
    pub turn: Turn,

    /// Not restored when a context is deserialized.
    #[cfg_attr(feature = "serde", serde(skip_deserializing))]
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(turn: Turn) -> Self {
        Self {
            coord: None,
            player: None,
            turn,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_coord(mut self, coord: Coord) -> Self {
        self.coord = Some(coord);
        self
    }

    #[must_use]
    pub const fn with_player(mut self, player: PlayerId) -> Self {
        self.player = Some(player);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

impl Default for ErrorContext {
    fn default() -> Self {
        Self::new(0)
    }
}

/// Classification shared by every error the engine raises.
///
/// Implementors derive `thiserror::Error` for their message and pick the
/// severity from what the caller can do about it.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Stable upper-case code such as `MOVE_NOT_OWNER`. Falls back to the
    /// type name.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}
