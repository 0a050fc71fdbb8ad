//! Colony-wide state: ore ledger, energy totals, building and research levels.

use std::collections::BTreeMap;

use colony_logic::economy::EnergyState;
use colony_logic::ore::OreAmounts;
use serde::{Deserialize, Serialize};

/// Stored ore plus this tick's energy totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceLedger {
    pub stored: OreAmounts,
    pub energy: EnergyState,
}

impl ResourceLedger {
    pub fn new(stored: OreAmounts) -> Self {
        Self {
            stored,
            energy: EnergyState::default(),
        }
    }

    pub fn can_afford(&self, cost: &OreAmounts) -> bool {
        self.stored.covers(cost)
    }
}

/// Level per catalog id. Absent ids are level 0.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelTable {
    levels: BTreeMap<String, u32>,
}

/// Building id → current level.
pub type BuildingLevels = LevelTable;
/// Research id → completed level.
pub type ResearchLevels = LevelTable;

impl LevelTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self, id: &str) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }

    pub fn is_built(&self, id: &str) -> bool {
        self.level(id) >= 1
    }

    pub fn set_level(&mut self, id: &str, level: u32) {
        if level == 0 {
            self.levels.remove(id);
        } else {
            self.levels.insert(id.to_string(), level);
        }
    }

    /// Ids with level ≥ 1, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u32)> {
        self.levels.iter().map(|(id, level)| (id.as_str(), *level))
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}
