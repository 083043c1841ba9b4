//! Game settings loader.

use std::path::Path;

use hexline_core::GameSettings;

use crate::loaders::{LoadResult, read_file};

/// Loader for per-game settings from TOML files.
pub struct SettingsLoader;

impl SettingsLoader {
    /// Load settings from a TOML file.
    ///
    /// Missing keys take their defaults, so an empty file yields
    /// [`GameSettings::default`].
    pub fn load(path: &Path) -> LoadResult<GameSettings> {
        let content = read_file(path)?;
        let settings = Self::parse(&content)?;
        anyhow::ensure!(
            settings.player_count >= 2,
            "{}: a game needs at least two players, got {}",
            path.display(),
            settings.player_count
        );
        Ok(settings)
    }

    /// Parse settings from TOML text.
    pub fn parse(content: &str) -> LoadResult<GameSettings> {
        let settings: GameSettings = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse settings TOML: {}", e))?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexline_core::PassThrough;

    #[test]
    fn empty_settings_are_defaults() {
        assert_eq!(SettingsLoader::parse("").unwrap(), GameSettings::default());
    }

    #[test]
    fn parses_overrides() {
        let settings = SettingsLoader::parse(
            r#"
            player_count = 3
            allowed_units = [1, 2]
            pass_through = "forbid"

            [income]
            mines = 250
            game_income = 20
            "#,
        )
        .unwrap();

        assert_eq!(settings.player_count, 3);
        assert_eq!(settings.starting_coins, GameSettings::DEFAULT_STARTING_COINS);
        assert_eq!(settings.allowed_units, Some(vec![1, 2]));
        assert_eq!(settings.pass_through, PassThrough::Forbid);
        assert_eq!(settings.income.mines, 250);
        assert_eq!(settings.income.landbase, 0);
    }
}
