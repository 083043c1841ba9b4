//! In-memory rules table backing [`RulesOracle`].
use std::collections::BTreeMap;

use crate::state::{TerrainId, UnitTypeId};

use super::{
    OracleError, RulesOracle, TerrainDefinition, TerrainUnitProperties, UnitDefinition, repair,
};

/// Flat, serializable form of the rules as authored in content files.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RulesData {
    pub units: Vec<UnitDefinition>,
    pub terrains: Vec<TerrainDefinition>,
    pub terrain_units: Vec<TerrainUnitProperties>,
}

/// Rules indexed by id.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RulesTable {
    units: BTreeMap<UnitTypeId, UnitDefinition>,
    terrains: BTreeMap<TerrainId, TerrainDefinition>,
    terrain_units: BTreeMap<(TerrainId, UnitTypeId), TerrainUnitProperties>,
}

impl RulesTable {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_unit(mut self, unit: UnitDefinition) -> Self {
        self.units.insert(unit.id, unit);
        self
    }

    #[must_use]
    pub fn with_terrain(mut self, terrain: TerrainDefinition) -> Self {
        self.terrains.insert(terrain.id, terrain);
        self
    }

    #[must_use]
    pub fn with_terrain_unit(mut self, props: TerrainUnitProperties) -> Self {
        self.terrain_units
            .insert((props.terrain_id, props.unit_id), props);
        self
    }

    /// Indexes authored rules, rejecting duplicates and dangling ids.
    ///
    /// # Errors
    ///
    /// Returns `OracleError::InvalidRules` describing the first problem found.
    pub fn from_data(data: RulesData) -> Result<Self, OracleError> {
        let mut table = Self::new();
        for mut unit in data.units {
            if table.units.contains_key(&unit.id) {
                return Err(OracleError::InvalidRules(format!(
                    "duplicate unit id {}",
                    unit.id
                )));
            }
            if unit.fix_value == 0 {
                unit.fix_value = repair::default_fix_value(unit.id).unwrap_or(0);
            }
            table.units.insert(unit.id, unit);
        }
        for terrain in data.terrains {
            if table.terrains.contains_key(&terrain.id) {
                return Err(OracleError::InvalidRules(format!(
                    "duplicate terrain id {}",
                    terrain.id
                )));
            }
            if let Some(missing) = terrain
                .buildable_unit_ids
                .iter()
                .find(|id| !table.units.contains_key(id))
            {
                return Err(OracleError::InvalidRules(format!(
                    "terrain {} builds unknown unit {missing}",
                    terrain.id
                )));
            }
            table.terrains.insert(terrain.id, terrain);
        }
        for props in data.terrain_units {
            if !table.terrains.contains_key(&props.terrain_id) {
                return Err(OracleError::UnknownTerrain(props.terrain_id));
            }
            if !table.units.contains_key(&props.unit_id) {
                return Err(OracleError::UnknownUnit(props.unit_id));
            }
            let key = (props.terrain_id, props.unit_id);
            if table.terrain_units.insert(key, props).is_some() {
                return Err(OracleError::InvalidRules(format!(
                    "duplicate terrain-unit entry {}:{}",
                    key.0, key.1
                )));
            }
        }
        Ok(table)
    }

    /// Flattens the table back into authored form.
    pub fn to_data(&self) -> RulesData {
        RulesData {
            units: self.units.values().cloned().collect(),
            terrains: self.terrains.values().cloned().collect(),
            terrain_units: self.terrain_units.values().cloned().collect(),
        }
    }

    pub fn units(&self) -> impl Iterator<Item = &UnitDefinition> {
        self.units.values()
    }

    pub fn terrains(&self) -> impl Iterator<Item = &TerrainDefinition> {
        self.terrains.values()
    }
}

impl RulesOracle for RulesTable {
    fn unit(&self, id: UnitTypeId) -> Option<&UnitDefinition> {
        self.units.get(&id)
    }

    fn terrain(&self, id: TerrainId) -> Option<&TerrainDefinition> {
        self.terrains.get(&id)
    }

    fn terrain_unit(
        &self,
        terrain: TerrainId,
        unit: UnitTypeId,
    ) -> Option<&TerrainUnitProperties> {
        self.terrain_units.get(&(terrain, unit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::UnitTerrain;

    fn soldier() -> UnitDefinition {
        UnitDefinition {
            id: 1,
            name: "Soldier".into(),
            health: 10,
            coins: 75,
            movement_points: 3.0,
            retreat_points: 0.0,
            attack_range: 1,
            defense: 6,
            unit_class: "Light".into(),
            unit_terrain: UnitTerrain::Land,
            attack_vs_class: BTreeMap::new(),
            splash_damage: 0,
            fix_value: 0,
            action_order: Vec::new(),
        }
    }

    #[test]
    fn movement_cost_falls_back_to_default() {
        let table = RulesTable::new()
            .with_unit(soldier())
            .with_terrain(TerrainDefinition {
                id: 5,
                name: "Grass".into(),
                buildable_unit_ids: Vec::new(),
            })
            .with_terrain_unit(TerrainUnitProperties {
                terrain_id: 5,
                unit_id: 1,
                movement_cost: 0.0,
                ..Default::default()
            });
        assert_eq!(table.movement_cost(1, 5), 1.0);
        assert_eq!(table.movement_cost(1, 99), 1.0);
    }

    #[test]
    fn from_data_rejects_dangling_references() {
        let data = RulesData {
            units: vec![soldier()],
            terrains: vec![TerrainDefinition {
                id: 1,
                name: "Land Base".into(),
                buildable_unit_ids: vec![1, 7],
            }],
            terrain_units: Vec::new(),
        };
        assert!(matches!(
            RulesTable::from_data(data),
            Err(OracleError::InvalidRules(_))
        ));

        let data = RulesData {
            units: vec![soldier()],
            terrains: Vec::new(),
            terrain_units: vec![TerrainUnitProperties {
                terrain_id: 3,
                unit_id: 1,
                ..Default::default()
            }],
        };
        assert_eq!(
            RulesTable::from_data(data),
            Err(OracleError::UnknownTerrain(3))
        );
    }

    #[test]
    fn builtin_repair_units_get_a_default_fix_value() {
        let medic = UnitDefinition {
            id: repair::MEDIC,
            name: "Medic".into(),
            ..soldier()
        };
        let carrier = UnitDefinition {
            id: repair::AIRCRAFT_CARRIER,
            name: "Aircraft Carrier".into(),
            unit_terrain: UnitTerrain::Water,
            fix_value: 4,
            ..soldier()
        };
        let data = RulesData {
            units: vec![soldier(), medic, carrier],
            ..RulesData::default()
        };
        let table = RulesTable::from_data(data).unwrap();

        assert_eq!(table.unit(1).map(|u| u.fix_value), Some(0));
        assert_eq!(
            table.unit(repair::MEDIC).map(|u| u.fix_value),
            Some(repair::DEFAULT_FIX_VALUE)
        );
        assert_eq!(table.unit(repair::AIRCRAFT_CARRIER).map(|u| u.fix_value), Some(4));

        let carrier = table.unit(repair::AIRCRAFT_CARRIER).unwrap();
        assert_eq!(carrier.fix_targets(), vec![UnitTerrain::Air]);
        assert_eq!(soldier().fix_targets(), vec![UnitTerrain::Land]);
        assert!(!soldier().can_fix());
    }

    #[test]
    fn default_action_order_applies_when_empty() {
        assert_eq!(soldier().action_slots(), vec!["move", "attack|capture"]);
        assert_eq!(soldier().class_key(), "Light:Land");
    }
}
