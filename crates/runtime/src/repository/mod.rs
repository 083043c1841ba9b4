//! Repository layer for game records.
//!
//! Repositories hold data that changes during play: the current state,
//! the initial state and the recorded history of each game. Rules and
//! settings come from content files and are never stored here.

mod error;
mod file;
mod memory;
mod record;
mod traits;

pub use error::{RepositoryError, Result};
pub use file::FileGameRepository;
pub use memory::InMemoryGameRepo;
pub use record::{CommitInfo, GameRecord};
pub use traits::GameRepository;
