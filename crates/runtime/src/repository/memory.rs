//! In-memory GameRepository implementation for tests and local runs.

use std::collections::BTreeMap;
use std::sync::RwLock;

use super::{GameRecord, GameRepository, RepositoryError, Result};

/// In-memory implementation of [`GameRepository`].
///
/// The lock only guards the map; the version check and the write happen
/// under the same write guard.
#[derive(Default)]
pub struct InMemoryGameRepo {
    games: RwLock<BTreeMap<String, GameRecord>>,
}

impl InMemoryGameRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl GameRepository for InMemoryGameRepo {
    fn create(&self, game_id: &str, record: &GameRecord) -> Result<()> {
        let mut games = self
            .games
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if games.contains_key(game_id) {
            return Err(RepositoryError::AlreadyExists(game_id.to_owned()));
        }
        games.insert(game_id.to_owned(), record.clone());
        Ok(())
    }

    fn load(&self, game_id: &str) -> Result<Option<GameRecord>> {
        let games = self
            .games
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(games.get(game_id).cloned())
    }

    fn save(&self, game_id: &str, expected_version: u64, record: &GameRecord) -> Result<()> {
        let mut games = self
            .games
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let stored = games
            .get_mut(game_id)
            .ok_or_else(|| RepositoryError::NotFound(game_id.to_owned()))?;
        if stored.version() != expected_version {
            return Err(RepositoryError::VersionConflict {
                game_id: game_id.to_owned(),
                expected: expected_version,
                found: stored.version(),
            });
        }
        *stored = record.clone();
        Ok(())
    }

    fn exists(&self, game_id: &str) -> bool {
        self.games
            .read()
            .map(|games| games.contains_key(game_id))
            .unwrap_or(false)
    }

    fn delete(&self, game_id: &str) -> Result<()> {
        let mut games = self
            .games
            .write()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        games.remove(game_id);
        Ok(())
    }

    fn list_games(&self) -> Result<Vec<String>> {
        let games = self
            .games
            .read()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        Ok(games.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexline_core::{GameState, World};

    fn record(version: u64) -> GameRecord {
        let mut state = GameState::new(World::new(), 1, 2, 300);
        state.version = version;
        GameRecord::new(state)
    }

    #[test]
    fn stale_saves_are_rejected() {
        let repo = InMemoryGameRepo::new();
        repo.create("g", &record(0)).unwrap();

        repo.save("g", 0, &record(1)).unwrap();
        let err = repo.save("g", 0, &record(1)).unwrap_err();
        assert!(err.is_version_conflict());
        assert_eq!(repo.load("g").unwrap().map(|r| r.version()), Some(1));
    }

    #[test]
    fn create_refuses_existing_ids() {
        let repo = InMemoryGameRepo::new();
        repo.create("g", &record(0)).unwrap();
        assert!(matches!(
            repo.create("g", &record(0)),
            Err(RepositoryError::AlreadyExists(_))
        ));
        assert!(matches!(
            repo.save("missing", 0, &record(0)),
            Err(RepositoryError::NotFound(_))
        ));
        assert_eq!(repo.list_games().unwrap(), vec!["g".to_owned()]);
    }
}
