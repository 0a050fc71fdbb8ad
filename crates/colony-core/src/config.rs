//! Colony start-up configuration.

use std::collections::BTreeMap;

use colony_logic::ore::{OreAmounts, OreType};
use serde::{Deserialize, Serialize};

use crate::sector::SectorCoord;

/// Starting state for a new colony.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColonyConfig {
    pub name: String,
    /// Sector the colony sits in. Ore richness is read here.
    pub location: SectorCoord,
    pub starting_resources: OreAmounts,
    /// Building id → level. Must name catalog buildings.
    pub starting_buildings: BTreeMap<String, u32>,
    /// Research id → completed level. Must name catalog research.
    pub starting_research: BTreeMap<String, u32>,
    /// Multiplier applied to every tick's `dt`.
    pub time_scale: f64,
}

impl Default for ColonyConfig {
    fn default() -> Self {
        Self {
            name: "Colony".to_string(),
            location: SectorCoord::default(),
            starting_resources: OreAmounts::from_pairs(&[(OreType::Iron, 1000.0)]),
            starting_buildings: BTreeMap::from([("colony_hub".to_string(), 1)]),
            starting_research: BTreeMap::new(),
            time_scale: 1.0,
        }
    }
}

impl ColonyConfig {
    pub fn with_location(mut self, location: SectorCoord) -> Self {
        self.location = location;
        self
    }

    pub fn with_resources(mut self, resources: OreAmounts) -> Self {
        self.starting_resources = resources;
        self
    }

    pub fn with_building(mut self, id: &str, level: u32) -> Self {
        self.starting_buildings.insert(id.to_string(), level);
        self
    }

    pub fn with_research(mut self, id: &str, level: u32) -> Self {
        self.starting_research.insert(id.to_string(), level);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_hub_and_iron() {
        let config = ColonyConfig::default();
        assert_eq!(config.starting_buildings.get("colony_hub"), Some(&1));
        assert_eq!(config.starting_resources[OreType::Iron], 1000.0);
        assert_eq!(config.starting_resources[OreType::Copper], 0.0);
        assert_eq!(config.time_scale, 1.0);
    }

    #[test]
    fn test_partial_json_fills_defaults() {
        let config: ColonyConfig =
            serde_json::from_str(r#"{"location":{"x":3,"y":-2},"time_scale":2.0}"#).unwrap();
        assert_eq!(config.location, SectorCoord::new(3, -2));
        assert_eq!(config.time_scale, 2.0);
        assert_eq!(config.starting_buildings.get("colony_hub"), Some(&1));
    }

    #[test]
    fn test_builders() {
        let config = ColonyConfig::default()
            .with_building("solar_plant", 2)
            .with_research("laser_tech", 1)
            .with_resources(OreAmounts::from_pairs(&[(OreType::Gold, 5.0)]));
        assert_eq!(config.starting_buildings.len(), 2);
        assert_eq!(config.starting_research.get("laser_tech"), Some(&1));
        assert_eq!(config.starting_resources[OreType::Gold], 5.0);
    }
}
