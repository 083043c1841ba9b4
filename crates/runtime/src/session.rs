//! Game sessions: the write path from proposed moves to stored records.
//!
//! A [`GameSession`] never holds game state between calls. Each call loads
//! the stored record, runs the engine on a private copy and writes back
//! with an optimistic version check, so any number of sessions (in one
//! process or several) can front the same repository.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use hexline_content::ContentFactory;
use hexline_core::{
    Change, Coord, Env, ExecutionOutcome, GameEngine, GameEnv, GameError, GameSettings,
    GameState, GameStatus, Move, RecordedMove, RulesTable, TileOptions, UnitOptions,
    tile_options, unit_options,
};
use tracing::{debug, info, instrument, warn};

use crate::error::{Result, RuntimeError};
use crate::repository::{CommitInfo, GameRecord, GameRepository, RepositoryError};
use crate::utils::short_digest;

/// Summary of a committed move group.
#[derive(Clone, Debug, PartialEq)]
pub struct Committed {
    /// Stored version after the group.
    pub version: u64,
    /// Per-move changes, in submission order.
    pub outcomes: Vec<ExecutionOutcome>,
    /// Sequence number of the group's first move.
    pub first_sequence: u64,
    pub committed_at: DateTime<Utc>,
    pub status: GameStatus,
}

impl Committed {
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.outcomes.iter().flat_map(|outcome| outcome.changes.iter())
    }
}

/// Handle on one stored game.
pub struct GameSession<R> {
    game_id: String,
    rules: Arc<RulesTable>,
    settings: Arc<GameSettings>,
    repo: Arc<R>,
}

impl<R> Clone for GameSession<R> {
    fn clone(&self) -> Self {
        Self {
            game_id: self.game_id.clone(),
            rules: Arc::clone(&self.rules),
            settings: Arc::clone(&self.settings),
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R: GameRepository> GameSession<R> {
    /// Stores `initial` as a new game and returns a session on it.
    #[instrument(skip_all, fields(game_id = %game_id))]
    pub fn create(
        game_id: &str,
        rules: Arc<RulesTable>,
        settings: Arc<GameSettings>,
        repo: Arc<R>,
        initial: GameState,
    ) -> Result<Self> {
        let record = GameRecord::new(initial);
        repo.create(game_id, &record)?;
        info!(
            players = record.state.player_count,
            units = record.state.world.num_units(),
            digest = %short_digest(&record.state),
            "game created"
        );
        Ok(Self {
            game_id: game_id.to_owned(),
            rules,
            settings,
            repo,
        })
    }

    /// Creates a game from a content directory's rules, settings and map.
    pub fn from_content(
        game_id: &str,
        factory: &ContentFactory,
        map: &str,
        seed: u64,
        repo: Arc<R>,
    ) -> Result<Self> {
        let (initial, rules, settings) = factory
            .new_game(map, seed)
            .map_err(|e| RuntimeError::Content(format!("{e:#}")))?;
        Self::create(game_id, Arc::new(rules), Arc::new(settings), repo, initial)
    }

    /// Opens an existing game.
    pub fn open(
        game_id: &str,
        rules: Arc<RulesTable>,
        settings: Arc<GameSettings>,
        repo: Arc<R>,
    ) -> Result<Self> {
        if !repo.exists(game_id) {
            return Err(RuntimeError::UnknownGame(game_id.to_owned()));
        }
        Ok(Self {
            game_id: game_id.to_owned(),
            rules,
            settings,
            repo,
        })
    }

    pub fn game_id(&self) -> &str {
        &self.game_id
    }

    fn env(&self) -> GameEnv<'_> {
        Env::with_all(self.rules.as_ref(), self.settings.as_ref()).into_game_env()
    }

    pub fn load(&self) -> Result<GameRecord> {
        self.repo
            .load(&self.game_id)?
            .ok_or_else(|| RuntimeError::UnknownGame(self.game_id.clone()))
    }

    pub fn state(&self) -> Result<GameState> {
        Ok(self.load()?.state)
    }

    /// Executes `moves` atomically against the stored game.
    ///
    /// `expected_version` is the version the caller based its moves on. If
    /// another writer committed first the call fails with a retryable
    /// version conflict; if any move is invalid nothing is stored.
    #[instrument(skip(self, moves), fields(game_id = %self.game_id, moves = moves.len()))]
    pub fn submit(&self, expected_version: u64, moves: &[Move]) -> Result<Committed> {
        let mut record = self.load()?;
        if record.version() != expected_version {
            warn!(found = record.version(), "stale submission");
            return Err(RepositoryError::VersionConflict {
                game_id: self.game_id.clone(),
                expected: expected_version,
                found: record.version(),
            }
            .into());
        }

        let first_sequence = record.history.last_sequence() + 1;
        let committed_at = Utc::now();
        if moves.is_empty() {
            debug!("empty submission");
            return Ok(Committed {
                version: record.version(),
                outcomes: Vec::new(),
                first_sequence,
                committed_at,
                status: record.state.status,
            });
        }

        let mut state = record.state.clone();
        let outcomes = match GameEngine::new(&mut state).execute_all(self.env(), moves) {
            Ok(outcomes) => outcomes,
            Err(err) => {
                warn!(code = err.error_code(), error = %err, "moves rejected");
                return Err(err.into());
            }
        };

        record.history.push_group(
            moves
                .iter()
                .cloned()
                .zip(outcomes.iter().map(|outcome| outcome.changes.clone())),
        );
        record.commits.push(CommitInfo {
            group: record.history.groups().len() - 1,
            version: state.version,
            committed_at,
        });
        record.state = state;

        if let Err(err) = self.repo.save(&self.game_id, expected_version, &record) {
            if err.is_version_conflict() {
                warn!(error = %err, "lost the commit race");
            }
            return Err(err.into());
        }

        let state = &record.state;
        info!(
            version = state.version,
            player = state.current_player,
            turn = state.turn,
            digest = %short_digest(state),
            "committed move group"
        );
        if let GameStatus::Finished { winner } = state.status {
            info!(winner, "game ended");
        }

        Ok(Committed {
            version: state.version,
            outcomes,
            first_sequence,
            committed_at,
            status: state.status,
        })
    }

    /// Changes `mv` would produce against the stored game, without storing
    /// anything.
    #[instrument(skip(self), fields(game_id = %self.game_id))]
    pub fn preview(&self, mv: &Move) -> Result<Vec<Change>> {
        let mut state = self.state()?;
        let changes = GameEngine::new(&mut state).dry_run(self.env(), mv)?;
        debug!(changes = changes.len(), "dry run");
        Ok(changes)
    }

    pub fn unit_options(&self, coord: Coord) -> Result<UnitOptions> {
        let mut state = self.state()?;
        Ok(unit_options(&mut state, &self.env(), coord)?)
    }

    pub fn tile_options(&self, coord: Coord) -> Result<TileOptions> {
        let state = self.state()?;
        Ok(tile_options(&state, &self.env(), coord)?)
    }

    /// Moves recorded after `sequence`, for replicas catching up.
    pub fn moves_since(&self, sequence: u64) -> Result<Vec<RecordedMove>> {
        let record = self.load()?;
        Ok(record.history.since(sequence).cloned().collect())
    }

    /// Current state as pretty JSON in its persisted shape.
    pub fn export_snapshot(&self) -> Result<String> {
        let snapshot = self.state()?.to_snapshot();
        serde_json::to_string_pretty(&snapshot)
            .map_err(|e| RuntimeError::Repository(RepositoryError::Json(e)))
    }
}
