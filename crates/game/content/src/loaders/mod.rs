//! Content loaders for reading game data from files.
//!
//! Each loader turns one RON/TOML file into the `hexline-core` type the
//! engine consumes. [`ContentFactory`] ties them to a data directory.

pub mod factory;
pub mod map;
pub mod rules;
pub mod settings;

pub use factory::ContentFactory;
pub use map::{MapData, MapLoader, MapTile, MapUnit};
pub use rules::RulesLoader;
pub use settings::SettingsLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
