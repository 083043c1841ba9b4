//! Content factory for building game inputs from a data directory.

use std::path::{Path, PathBuf};

use hexline_core::{GameSettings, GameState, RulesTable};

use crate::loaders::{LoadResult, MapData, MapLoader, RulesLoader, SettingsLoader};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.ron
/// ├── settings.toml
/// └── maps/
///     └── skirmish.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Factory over the sample data shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load unit and terrain rules from `rules.ron`.
    pub fn load_rules(&self) -> LoadResult<RulesTable> {
        RulesLoader::load(&self.data_dir.join("rules.ron"))
    }

    /// Load game settings from `settings.toml`.
    pub fn load_settings(&self) -> LoadResult<GameSettings> {
        SettingsLoader::load(&self.data_dir.join("settings.toml"))
    }

    /// Load map `name` from `maps/<name>.ron`.
    pub fn load_map(&self, name: &str) -> LoadResult<MapData> {
        let path = self.data_dir.join("maps").join(format!("{name}.ron"));
        MapLoader::load(&path)
    }

    /// Builds a fresh game on map `name` with the directory's rules and
    /// settings.
    pub fn new_game(&self, name: &str, seed: u64) -> LoadResult<(GameState, RulesTable, GameSettings)> {
        let rules = self.load_rules()?;
        let settings = self.load_settings()?;
        let world = self.load_map(name)?.into_world(&rules)?;
        let state = GameState::new(world, seed, settings.player_count, settings.starting_coins);
        Ok((state, rules, settings))
    }
}
