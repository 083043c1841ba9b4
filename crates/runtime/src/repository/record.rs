//! Persisted shape of one game.

use chrono::{DateTime, Utc};
use hexline_core::{GameState, History};
use serde::{Deserialize, Serialize};

/// When a move group was committed and the version it produced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitInfo {
    /// Index of the group in [`GameRecord::history`].
    pub group: usize,
    pub version: u64,
    pub committed_at: DateTime<Utc>,
}

/// Everything a repository stores for a game.
///
/// `initial` is kept so replicas and audits can replay `history` from the
/// start. `state.version` is the version optimistic saves compare against.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameRecord {
    pub initial: GameState,
    pub state: GameState,
    #[serde(default)]
    pub history: History,
    #[serde(default)]
    pub commits: Vec<CommitInfo>,
}

impl GameRecord {
    pub fn new(initial: GameState) -> Self {
        Self {
            state: initial.clone(),
            initial,
            history: History::new(),
            commits: Vec::new(),
        }
    }

    pub fn version(&self) -> u64 {
        self.state.version
    }
}
