//! Rules table loader.

use std::path::Path;

use anyhow::Context;
use hexline_core::env::{RulesData, RulesTable};

use crate::loaders::{LoadResult, read_file};

/// Loader for rules tables from RON files.
pub struct RulesLoader;

impl RulesLoader {
    /// Load and index the rules in a RON file.
    ///
    /// The file holds a `RulesData` value: `units`, `terrains` and
    /// `terrain_units` lists. Duplicate ids and references to undefined
    /// units or terrains are rejected.
    pub fn load(path: &Path) -> LoadResult<RulesTable> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("in rules file {}", path.display()))
    }

    /// Parse rules from RON text.
    pub fn parse(content: &str) -> LoadResult<RulesTable> {
        let data: RulesData = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse rules RON: {}", e))?;
        let table = RulesTable::from_data(data)?;
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hexline_core::RulesOracle;

    const RULES: &str = r#"(
        units: [
            (
                id: 1,
                name: "Soldier",
                health: 10,
                coins: 75,
                movement_points: 3.0,
                attack_range: 1,
                defense: 6,
                unit_class: "Light",
                attack_vs_class: { "Light:Land": 6 },
            ),
        ],
        terrains: [
            (id: 1, name: "Land Base", buildable_unit_ids: [1]),
            (id: 5, name: "Grass"),
        ],
        terrain_units: [
            (terrain_id: 1, unit_id: 1, healing_bonus: 2, can_capture: true),
        ],
    )"#;

    #[test]
    fn parses_authored_rules() {
        let rules = RulesLoader::parse(RULES).unwrap();
        let soldier = rules.unit(1).unwrap();
        assert_eq!(soldier.name, "Soldier");
        assert!(soldier.action_order.is_empty());
        assert_eq!(soldier.class_key(), "Light:Land");
        assert!(rules.terrain(1).unwrap().can_build(1));
        assert_eq!(rules.terrain_unit(1, 1).map(|p| p.healing_bonus), Some(2));
    }

    #[test]
    fn rejects_dangling_references() {
        let broken = RULES.replace("buildable_unit_ids: [1]", "buildable_unit_ids: [7]");
        let err = RulesLoader::parse(&broken).unwrap_err();
        assert!(err.to_string().contains("unknown unit 7"), "{err}");
    }
}
