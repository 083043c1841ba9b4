//! Repository contract for game records.

use super::{GameRecord, Result};

/// Storage for game records keyed by game id.
///
/// Writers use optimistic concurrency: [`save`](GameRepository::save)
/// succeeds only while the stored version still equals the version the
/// caller read. Implementations must make the check and the write atomic
/// with respect to other savers.
pub trait GameRepository: Send + Sync {
    /// Store a new game. Fails with `AlreadyExists` if the id is taken.
    fn create(&self, game_id: &str, record: &GameRecord) -> Result<()>;

    fn load(&self, game_id: &str) -> Result<Option<GameRecord>>;

    /// Replace the stored record if its version is still `expected_version`.
    ///
    /// Returns `VersionConflict` otherwise and leaves the stored record
    /// untouched.
    fn save(&self, game_id: &str, expected_version: u64, record: &GameRecord) -> Result<()>;

    fn exists(&self, game_id: &str) -> bool;

    fn delete(&self, game_id: &str) -> Result<()>;

    /// List stored game ids in ascending order.
    fn list_games(&self) -> Result<Vec<String>> {
        Ok(vec![])
    }
}
