//! Actions offered by tiles.

use crate::action::ActionKind;
use crate::env::{RulesOracle, SettingsOracle, TerrainDefinition, UnitDefinition};

/// Units `terrain` can build that the settings allow and `coins` can pay for.
pub fn build_options<'r>(
    rules: &'r (impl RulesOracle + ?Sized),
    settings: &(impl SettingsOracle + ?Sized),
    terrain: &TerrainDefinition,
    coins: i64,
) -> Vec<&'r UnitDefinition> {
    terrain
        .buildable_unit_ids
        .iter()
        .filter(|id| settings.is_unit_allowed(**id))
        .filter_map(|id| rules.unit(*id))
        .filter(|def| def.coins <= coins)
        .collect()
}

/// Actions available on a tile for a player holding `coins`.
pub fn allowed_tile_actions(
    rules: &(impl RulesOracle + ?Sized),
    settings: &(impl SettingsOracle + ?Sized),
    terrain: &TerrainDefinition,
    coins: i64,
) -> Vec<ActionKind> {
    if build_options(rules, settings, terrain, coins).is_empty() {
        Vec::new()
    } else {
        vec![ActionKind::Build]
    }
}
