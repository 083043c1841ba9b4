//! File-based GameRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use super::{GameRecord, GameRepository, RepositoryError, Result};

/// Stores each game as `<game_id>.json` under a base directory.
///
/// Writes go to a temporary file first and are renamed into place. A mutex
/// serialises version checks and writes within one process.
pub struct FileGameRepository {
    base_dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileGameRepository {
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self {
            base_dir,
            write_lock: Mutex::new(()),
        })
    }

    fn game_path(&self, game_id: &str) -> Result<PathBuf> {
        let valid = !game_id.is_empty()
            && game_id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(RepositoryError::CorruptedData(format!(
                "invalid game id {game_id:?}"
            )));
        }
        Ok(self.base_dir.join(format!("{game_id}.json")))
    }

    fn read(&self, path: &Path) -> Result<Option<GameRecord>> {
        if !path.exists() {
            return Ok(None);
        }
        let bytes = fs::read(path)?;
        let record = serde_json::from_slice(&bytes)?;
        Ok(Some(record))
    }

    fn write(&self, path: &Path, record: &GameRecord) -> Result<()> {
        let temp_path = path.with_extension("json.tmp");
        let bytes = serde_json::to_vec_pretty(record)?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, path)?;
        tracing::debug!("Saved game record v{} to {}", record.version(), path.display());
        Ok(())
    }
}

impl GameRepository for FileGameRepository {
    fn create(&self, game_id: &str, record: &GameRecord) -> Result<()> {
        let path = self.game_path(game_id)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        if path.exists() {
            return Err(RepositoryError::AlreadyExists(game_id.to_owned()));
        }
        self.write(&path, record)
    }

    fn load(&self, game_id: &str) -> Result<Option<GameRecord>> {
        let path = self.game_path(game_id)?;
        self.read(&path)
    }

    fn save(&self, game_id: &str, expected_version: u64, record: &GameRecord) -> Result<()> {
        let path = self.game_path(game_id)?;
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| RepositoryError::LockPoisoned)?;
        let stored = self
            .read(&path)?
            .ok_or_else(|| RepositoryError::NotFound(game_id.to_owned()))?;
        if stored.version() != expected_version {
            return Err(RepositoryError::VersionConflict {
                game_id: game_id.to_owned(),
                expected: expected_version,
                found: stored.version(),
            });
        }
        self.write(&path, record)
    }

    fn exists(&self, game_id: &str) -> bool {
        self.game_path(game_id).is_ok_and(|path| path.exists())
    }

    fn delete(&self, game_id: &str) -> Result<()> {
        let path = self.game_path(game_id)?;
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!("Deleted game {}", game_id);
        }
        Ok(())
    }

    fn list_games(&self) -> Result<Vec<String>> {
        let mut ids = Vec::new();
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename.strip_suffix(".json")
            {
                ids.push(id.to_owned());
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}
